//! Cache layout for the GEVCU parameter set
//!
//! Slot numbers only need to be unique; they are grouped by service to keep
//! the layout readable.

use super::cache::{Field, Width};

// Motor config / performance
pub const TORQUE_REQUESTED: Field = Field::signed(0, Width::Two);
pub const TORQUE_ACTUAL: Field = Field::signed(1, Width::Two);
pub const SPEED_REQUESTED: Field = Field::signed(2, Width::Two);
pub const SPEED_ACTUAL: Field = Field::signed(3, Width::Two);
pub const POWER_MODE: Field = Field::unsigned(4, Width::One);
pub const GEAR: Field = Field::unsigned(5, Width::One);
pub const MOTOR_CURRENT: Field = Field::signed(6, Width::Two);
pub const MECH_POWER: Field = Field::signed(7, Width::Two);
pub const MOTOR_TEMPERATURE: Field = Field::signed(8, Width::Two);
pub const INVERTER_TEMPERATURE: Field = Field::signed(9, Width::Two);
pub const SYSTEM_TEMPERATURE: Field = Field::signed(10, Width::Two);
pub const NOMINAL_VOLTAGE: Field = Field::unsigned(11, Width::Two);
pub const MAX_RPM: Field = Field::unsigned(12, Width::Two);
pub const MAX_TORQUE: Field = Field::unsigned(13, Width::Two);
pub const TIME_RUNNING: Field = Field::unsigned(14, Width::Four);

// BMS and throttle
pub const BUS_VOLTAGE: Field = Field::unsigned(15, Width::Two);
pub const BUS_CURRENT: Field = Field::signed(16, Width::Two);
pub const KWH_REMAINING: Field = Field::unsigned(17, Width::Two);
pub const STATE_OF_CHARGE: Field = Field::unsigned(18, Width::One);
pub const THROTTLE_RAW_1: Field = Field::signed(19, Width::Two);
pub const THROTTLE_RAW_2: Field = Field::signed(20, Width::Two);
pub const BRAKE_RAW: Field = Field::signed(21, Width::Two);
pub const THROTTLE_PERCENTAGE: Field = Field::unsigned(22, Width::One);
pub const BRAKE_PERCENTAGE: Field = Field::unsigned(23, Width::One);
pub const THROTTLE_1_MIN: Field = Field::signed(24, Width::Two);
pub const THROTTLE_2_MIN: Field = Field::signed(25, Width::Two);
pub const THROTTLE_1_MAX: Field = Field::signed(26, Width::Two);
pub const THROTTLE_2_MAX: Field = Field::signed(27, Width::Two);
pub const THROTTLE_REGEN_MAX: Field = Field::unsigned(28, Width::Two);
pub const THROTTLE_REGEN_MIN: Field = Field::unsigned(29, Width::Two);
pub const THROTTLE_FWD_START: Field = Field::unsigned(30, Width::Two);
pub const THROTTLE_MAP_POINT: Field = Field::unsigned(31, Width::Two);
pub const THROTTLE_LOWEST_REGEN: Field = Field::unsigned(32, Width::One);
pub const THROTTLE_HIGHEST_REGEN: Field = Field::unsigned(33, Width::One);
pub const THROTTLE_CREEP: Field = Field::unsigned(34, Width::One);
pub const BRAKE_MIN: Field = Field::signed(35, Width::Two);
pub const BRAKE_MAX: Field = Field::signed(36, Width::Two);
pub const BRAKE_REGEN_MIN: Field = Field::unsigned(37, Width::One);
pub const BRAKE_REGEN_MAX: Field = Field::unsigned(38, Width::One);

// System config and status
pub const IS_RUNNING: Field = Field::unsigned(39, Width::One);
pub const IS_FAULTED: Field = Field::unsigned(40, Width::One);
pub const IS_WARNING: Field = Field::unsigned(41, Width::One);
pub const LOG_LEVEL: Field = Field::unsigned(42, Width::One);
pub const CAN0_BITRATE: Field = Field::unsigned(43, Width::Two);
pub const CAN1_BITRATE: Field = Field::unsigned(44, Width::Two);
pub const STATUS_BITFIELD_1: Field = Field::unsigned(45, Width::Four);
pub const STATUS_BITFIELD_2: Field = Field::unsigned(46, Width::Four);
pub const DIGITAL_INPUTS: Field = Field::unsigned(47, Width::Four);
pub const DIGITAL_OUTPUTS: Field = Field::unsigned(48, Width::Four);
pub const PRECHARGE_DURATION: Field = Field::unsigned(49, Width::Two);
pub const PRECHARGE_RELAY: Field = Field::unsigned(50, Width::One);
pub const MAIN_CONTACTOR_RELAY: Field = Field::unsigned(51, Width::One);
pub const COOLING_RELAY: Field = Field::unsigned(52, Width::One);
pub const COOL_ON_TEMP: Field = Field::signed(53, Width::One);
pub const COOL_OFF_TEMP: Field = Field::signed(54, Width::One);
pub const BRAKE_LIGHT_OUTPUT: Field = Field::unsigned(55, Width::One);
pub const REVERSE_LIGHT_OUTPUT: Field = Field::unsigned(56, Width::One);
pub const ENABLE_INPUT: Field = Field::unsigned(57, Width::One);
pub const REVERSE_INPUT: Field = Field::unsigned(58, Width::One);
pub const DEVICE_ENABLE_1: Field = Field::unsigned(59, Width::Four);
pub const DEVICE_ENABLE_2: Field = Field::unsigned(60, Width::Four);
pub const NUM_THROTTLE_POTS: Field = Field::unsigned(61, Width::One);
pub const THROTTLE_TYPE: Field = Field::unsigned(62, Width::One);
