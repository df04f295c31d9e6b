//! Wireless host stack boundary
//!
//! The host stack owns advertising, connections and the attribute database.
//! It reports progress through [`GattsEvent`] and [`GapEvent`] and accepts
//! requests through [`HostStack`]. Calls made through the trait only queue
//! work in the stack; their outcome arrives later as an event.

use heapless::Vec;

use super::compiler::AttributeRecord;
use crate::config::ble;
use crate::config::gatt::{MAX_RECORDS_PER_GROUP, MAX_WRITE_LEN};

/// Completion status carried by host notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    /// Stack-specific failure code
    Failed(u8),
}

impl Status {
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Interface id the stack hands out when an application registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GattsInterface(pub u8);

impl GattsInterface {
    /// Not bound to a specific application; events carrying it reach everyone
    pub const NONE: Self = Self(0xFF);
}

/// Request rejected by the host stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostError(pub u8);

/// Advertising payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvertisingData {
    pub include_name: bool,
    pub include_tx_power: bool,
    /// Preferred connection interval bounds
    pub min_interval: u16,
    pub max_interval: u16,
    pub appearance: u16,
    /// 128-bit service UUID, LSB first
    pub service_uuid: [u8; 16],
    pub flags: u8,
}

/// AD flags: LE general discoverable, BR/EDR not supported
pub const FLAG_GENERAL_DISCOVERABLE: u8 = 0x02;
pub const FLAG_BREDR_NOT_SUPPORTED: u8 = 0x04;

impl AdvertisingData {
    pub const GEVCU: Self = Self {
        include_name: true,
        include_tx_power: true,
        min_interval: ble::ADV_INTERVAL_MIN,
        max_interval: ble::ADV_INTERVAL_MAX,
        appearance: 0,
        service_uuid: ble::SERVICE_UUID,
        flags: FLAG_GENERAL_DISCOVERABLE | FLAG_BREDR_NOT_SUPPORTED,
    };
}

/// Advertising timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvertisingParams {
    /// Interval bounds in 0.625 ms units
    pub interval_min: u16,
    pub interval_max: u16,
    /// Connectable undirected advertising
    pub connectable: bool,
}

impl AdvertisingParams {
    pub const GEVCU: Self = Self {
        interval_min: ble::ADV_INTERVAL_MIN,
        interval_max: ble::ADV_INTERVAL_MAX,
        connectable: true,
    };
}

/// Attribute server notifications
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GattsEvent {
    /// Application registration finished
    Registered { status: Status, app_id: u16 },
    /// A group's attribute table was created
    ///
    /// `handles` is `None` when the stack did not supply a handle list.
    TableCreated {
        status: Status,
        group: u8,
        num_handles: u16,
        handles: Option<Vec<u16, MAX_RECORDS_PER_GROUP>>,
    },
    /// A service was started
    ServiceStarted { status: Status, handle: u16 },
    /// A client read an attribute; the stack serves the bytes itself
    Read { handle: u16 },
    /// A client wrote an attribute
    Write {
        handle: u16,
        data: Vec<u8, MAX_WRITE_LEN>,
    },
    Connected,
    Disconnected,
}

impl GattsEvent {
    /// Short name for log lines
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Registered { .. } => "Registered",
            Self::TableCreated { .. } => "TableCreated",
            Self::ServiceStarted { .. } => "ServiceStarted",
            Self::Read { .. } => "Read",
            Self::Write { .. } => "Write",
            Self::Connected => "Connected",
            Self::Disconnected => "Disconnected",
        }
    }

    /// Bring-up waits on this notification; losing it stalls the server
    pub fn drives_bringup(&self) -> bool {
        matches!(self, Self::Registered { .. } | Self::TableCreated { .. })
    }
}

/// Advertising notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapEvent {
    /// Advertising payload accepted
    AdvertisingDataSet,
    AdvertisingStarted { status: Status },
}

/// Requests the bridge makes of the host stack
///
/// None of these may block: they run inside the stack's own event dispatch.
pub trait HostStack {
    fn register_app(&mut self, app_id: u16) -> Result<(), HostError>;

    fn set_device_name(&mut self, name: &str) -> Result<(), HostError>;

    fn configure_advertising(&mut self, data: &AdvertisingData) -> Result<(), HostError>;

    fn start_advertising(&mut self, params: &AdvertisingParams) -> Result<(), HostError>;

    /// Submit one group's records; completion arrives as
    /// [`GattsEvent::TableCreated`] tagged with `group`
    fn create_attribute_table(
        &mut self,
        interface: GattsInterface,
        group: u8,
        records: &[AttributeRecord],
    ) -> Result<(), HostError>;

    /// Activate a created group by its service handle
    fn start_service(&mut self, handle: u16) -> Result<(), HostError>;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kinds() {
        let created = GattsEvent::TableCreated {
            status: Status::Success,
            group: 2,
            num_handles: 0,
            handles: None,
        };
        assert_eq!(created.kind(), "TableCreated");
        assert!(created.drives_bringup());

        let registered = GattsEvent::Registered {
            status: Status::Failed(1),
            app_id: 0x55,
        };
        assert!(registered.drives_bringup());

        let write = GattsEvent::Write {
            handle: 42,
            data: Vec::new(),
        };
        assert_eq!(write.kind(), "Write");
        assert!(!write.drives_bringup());
        assert!(!GattsEvent::Read { handle: 42 }.drives_bringup());
        assert_eq!(GattsEvent::Disconnected.kind(), "Disconnected");
    }
}
