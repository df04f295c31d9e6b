//! GEVCU descriptor table
//!
//! Characteristics are split into three services: motor config/performance
//! (0x3100), BMS and throttle (0x3200), system config and status (0x3300).
//! The host stack tops out around 100 records per service, so no service
//! should grow past 24 characteristics.

use super::descriptor::{unit, Entry, Format, Presentation, Properties};
use crate::params::fields;

const R: Properties = Properties::READ;
const RW: Properties = Properties::READ_WRITE;

const fn p(format: Format, unit: u16) -> Presentation {
    Presentation::new(format, unit)
}

pub static GEVCU_TABLE: &[Entry] = &[
    Entry::group(0x3100),
    Entry::characteristic(0x3101, R, "TorqueRequested", p(Format::I16, unit::NEWTON_METRE), fields::TORQUE_REQUESTED),
    Entry::characteristic(0x3102, R, "TorqueActual", p(Format::I16, unit::NEWTON_METRE), fields::TORQUE_ACTUAL),
    Entry::characteristic(0x3103, R, "SpeedRequested", p(Format::I16, unit::REVOLUTION_PER_MINUTE), fields::SPEED_REQUESTED),
    Entry::characteristic(0x3104, R, "SpeedActual", p(Format::I16, unit::REVOLUTION_PER_MINUTE), fields::SPEED_ACTUAL),
    Entry::characteristic(0x3105, RW, "PowerMode", p(Format::U8, unit::NONE), fields::POWER_MODE),
    Entry::characteristic(0x3106, RW, "Gear", p(Format::U8, unit::NONE), fields::GEAR),
    Entry::characteristic(0x3107, R, "Motor Current", p(Format::I16, unit::AMPERE), fields::MOTOR_CURRENT),
    Entry::characteristic(0x3108, R, "Mechanical Power", p(Format::I16, unit::WATT), fields::MECH_POWER),
    Entry::characteristic(0x3109, R, "Motor Temperature", p(Format::I16, unit::FAHRENHEIT), fields::MOTOR_TEMPERATURE),
    Entry::characteristic(0x310A, R, "Inverter Temperature", p(Format::I16, unit::FAHRENHEIT), fields::INVERTER_TEMPERATURE),
    Entry::characteristic(0x310B, R, "System Temperature", p(Format::I16, unit::FAHRENHEIT), fields::SYSTEM_TEMPERATURE),
    Entry::characteristic(0x310C, RW, "Nominal Voltage", p(Format::U16, unit::VOLT), fields::NOMINAL_VOLTAGE),
    Entry::characteristic(0x310D, RW, "Max RPMs", p(Format::U16, unit::REVOLUTION_PER_MINUTE), fields::MAX_RPM),
    Entry::characteristic(0x310E, RW, "Max Torque", p(Format::U16, unit::NEWTON_METRE), fields::MAX_TORQUE),
    Entry::characteristic(0x310F, R, "Time Running", p(Format::U32, unit::SECOND), fields::TIME_RUNNING),

    Entry::group(0x3200),
    Entry::characteristic(0x3201, R, "HV Bus Voltage", p(Format::U16, unit::VOLT), fields::BUS_VOLTAGE),
    Entry::characteristic(0x3202, R, "HV Bus Current", p(Format::I16, unit::AMPERE), fields::BUS_CURRENT),
    Entry::characteristic(0x3203, R, "Kwh Remaining", p(Format::U16, unit::KILOWATT_HOUR), fields::KWH_REMAINING),
    Entry::characteristic(0x3204, R, "State of Charge", p(Format::U8, unit::PERCENTAGE), fields::STATE_OF_CHARGE),
    Entry::characteristic(0x3205, R, "ThrottleRaw1", p(Format::I16, unit::NONE), fields::THROTTLE_RAW_1),
    Entry::characteristic(0x3206, R, "ThrottleRaw2", p(Format::I16, unit::NONE), fields::THROTTLE_RAW_2),
    Entry::characteristic(0x3207, R, "BrakeRaw", p(Format::I16, unit::NONE), fields::BRAKE_RAW),
    Entry::characteristic(0x3208, RW, "ThrottlePercentage", p(Format::U8, unit::PERCENTAGE), fields::THROTTLE_PERCENTAGE),
    Entry::characteristic(0x3209, RW, "BrakePercentage", p(Format::U8, unit::PERCENTAGE), fields::BRAKE_PERCENTAGE),
    Entry::characteristic(0x320A, RW, "Throttle 1 Min", p(Format::I16, unit::NONE), fields::THROTTLE_1_MIN),
    Entry::characteristic(0x320B, RW, "Throttle 2 Min", p(Format::I16, unit::NONE), fields::THROTTLE_2_MIN),
    Entry::characteristic(0x320C, RW, "Throttle 1 Max", p(Format::I16, unit::NONE), fields::THROTTLE_1_MAX),
    Entry::characteristic(0x320D, RW, "Throttle 2 Max", p(Format::I16, unit::NONE), fields::THROTTLE_2_MAX),
    Entry::characteristic(0x320E, RW, "Throttle Regen Max", p(Format::U16, unit::PERCENTAGE), fields::THROTTLE_REGEN_MAX),
    Entry::characteristic(0x320F, RW, "Throttle Regen Min", p(Format::U16, unit::PERCENTAGE), fields::THROTTLE_REGEN_MIN),
    Entry::characteristic(0x3210, RW, "Throttle Fwd Start", p(Format::U16, unit::PERCENTAGE), fields::THROTTLE_FWD_START),
    Entry::characteristic(0x3211, RW, "Throttle Map Point", p(Format::U16, unit::PERCENTAGE), fields::THROTTLE_MAP_POINT),
    Entry::characteristic(0x3212, RW, "Throttle Min Regen", p(Format::U8, unit::PERCENTAGE), fields::THROTTLE_LOWEST_REGEN),
    Entry::characteristic(0x3213, RW, "Throttle Max Regen", p(Format::U8, unit::PERCENTAGE), fields::THROTTLE_HIGHEST_REGEN),
    Entry::characteristic(0x3214, RW, "Throttle Creep", p(Format::U8, unit::PERCENTAGE), fields::THROTTLE_CREEP),
    Entry::characteristic(0x3215, RW, "Brake Min", p(Format::I16, unit::NONE), fields::BRAKE_MIN),
    Entry::characteristic(0x3216, RW, "Brake Max", p(Format::I16, unit::NONE), fields::BRAKE_MAX),
    Entry::characteristic(0x3217, RW, "Brake Min Regen", p(Format::U8, unit::PERCENTAGE), fields::BRAKE_REGEN_MIN),
    Entry::characteristic(0x3218, RW, "Brake Max Regen", p(Format::U8, unit::PERCENTAGE), fields::BRAKE_REGEN_MAX),

    Entry::group(0x3300),
    Entry::characteristic(0x3301, R, "isRunning", p(Format::Boolean, unit::NONE), fields::IS_RUNNING),
    Entry::characteristic(0x3302, R, "isFaulted", p(Format::Boolean, unit::NONE), fields::IS_FAULTED),
    Entry::characteristic(0x3303, R, "isWarning", p(Format::Boolean, unit::NONE), fields::IS_WARNING),
    Entry::characteristic(0x3304, RW, "LoggingLevel", p(Format::U8, unit::NONE), fields::LOG_LEVEL),
    Entry::characteristic(0x3305, RW, "Can0 Bitrate", p(Format::U16, unit::HERTZ), fields::CAN0_BITRATE),
    Entry::characteristic(0x3306, RW, "Can1 Bitrate", p(Format::U16, unit::HERTZ), fields::CAN1_BITRATE),
    Entry::characteristic(0x3307, R, "Status Bitfield 1", p(Format::U32, unit::NONE), fields::STATUS_BITFIELD_1),
    Entry::characteristic(0x3308, R, "Status Bitfield 2", p(Format::U32, unit::NONE), fields::STATUS_BITFIELD_2),
    Entry::characteristic(0x3309, R, "Dig In Bitfield", p(Format::U32, unit::NONE), fields::DIGITAL_INPUTS),
    Entry::characteristic(0x330A, R, "Dig Out Bitfield", p(Format::U32, unit::NONE), fields::DIGITAL_OUTPUTS),
    Entry::characteristic(0x330B, RW, "Precharge Time", p(Format::U16, unit::SECOND), fields::PRECHARGE_DURATION),
    // Shares its id with "Throttle 1 Max"; reported at bring-up by duplicate_ids
    Entry::characteristic(0x320C, RW, "Precharge Output", p(Format::U8, unit::NONE), fields::PRECHARGE_RELAY),
    Entry::characteristic(0x330D, RW, "Main Contactor Output", p(Format::U8, unit::NONE), fields::MAIN_CONTACTOR_RELAY),
    Entry::characteristic(0x330E, RW, "Cooling Relay Output", p(Format::U8, unit::NONE), fields::COOLING_RELAY),
    Entry::characteristic(0x330F, RW, "Cool On Temperature", p(Format::I8, unit::FAHRENHEIT), fields::COOL_ON_TEMP),
    Entry::characteristic(0x3310, RW, "Cool Off Temperature", p(Format::I8, unit::FAHRENHEIT), fields::COOL_OFF_TEMP),
    Entry::characteristic(0x3311, RW, "Brake Light Output", p(Format::U8, unit::NONE), fields::BRAKE_LIGHT_OUTPUT),
    Entry::characteristic(0x3312, RW, "Reverse Light Output", p(Format::U8, unit::NONE), fields::REVERSE_LIGHT_OUTPUT),
    Entry::characteristic(0x3313, RW, "Enable Input", p(Format::U8, unit::NONE), fields::ENABLE_INPUT),
    Entry::characteristic(0x3314, RW, "Reverse Input", p(Format::U8, unit::NONE), fields::REVERSE_INPUT),
    Entry::characteristic(0x3315, RW, "Device Enable Bits1", p(Format::U32, unit::NONE), fields::DEVICE_ENABLE_1),
    Entry::characteristic(0x3316, RW, "Device Enable Bits2", p(Format::U32, unit::NONE), fields::DEVICE_ENABLE_2),
    Entry::characteristic(0x3317, RW, "Num Throttle Pots", p(Format::U8, unit::NONE), fields::NUM_THROTTLE_POTS),
    Entry::characteristic(0x3318, RW, "Throttle Type", p(Format::U8, unit::NONE), fields::THROTTLE_TYPE),

    Entry::group(super::descriptor::END_OF_TABLE),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gatt::descriptor::{characteristics, duplicate_ids, EntryKind};

    #[test]
    fn test_three_services() {
        let groups: std::vec::Vec<u16> = GEVCU_TABLE
            .iter()
            .filter_map(|e| match e.kind() {
                EntryKind::Group(id) => Some(id),
                _ => None,
            })
            .collect();
        assert_eq!(groups, [0x3100, 0x3200, 0x3300]);
    }

    #[test]
    fn test_every_characteristic_is_named_and_sized() {
        let mut count = 0;
        for c in characteristics(GEVCU_TABLE) {
            assert!(!c.name.is_empty());
            assert_eq!(c.len as usize, c.field.len(), "{}", c.name);
            count += 1;
        }
        assert_eq!(count, 15 + 24 + 24);
    }

    #[test]
    fn test_known_duplicate_reported() {
        assert_eq!(duplicate_ids(GEVCU_TABLE).as_slice(), &[0x320C]);
    }

    #[test]
    fn test_fields_unique() {
        let slots: std::vec::Vec<usize> = characteristics(GEVCU_TABLE).map(|c| c.field.slot()).collect();
        for (i, slot) in slots.iter().enumerate() {
            assert!(!slots[i + 1..].contains(slot), "slot {} reused", slot);
        }
    }
}
