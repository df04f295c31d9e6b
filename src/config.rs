//! Configuration constants for the GEVCU BLE/SPI bridge on the ESP32

/// SPI slave pins wired to the vehicle controller
pub mod spi {
    /// Handshake line, raised while a transaction is queued
    pub const INT: u8 = 4;
    pub const MOSI: u8 = 23;
    pub const MISO: u8 = 19;
    pub const SCLK: u8 = 18;
    pub const CS: u8 = 5;
}

/// Wired command protocol constants
pub mod protocol {
    /// Every transaction on the wired channel is exactly this long
    pub const FRAME_SIZE: usize = 32;

    /// First byte of every valid frame
    pub const SYNC: u8 = 0xA5;

    /// Store the payload into the indexed parameter
    pub const OP_SET: u8 = 0x40;

    /// Read back the indexed parameter
    pub const OP_GET: u8 = 0xC0;

    /// Sync + opcode + parameter index
    pub const HEADER_SIZE: usize = 3;

    /// Room left for value bytes after the header
    pub const MAX_PAYLOAD: usize = FRAME_SIZE - HEADER_SIZE;

    /// Maximum wait for the master to clock a transaction
    pub const EXCHANGE_TIMEOUT_MS: u32 = 1000;
}

/// Attribute database layout
pub mod gatt {
    /// Application id registered with the host stack
    pub const APP_ID: u16 = 0x55;

    /// Upper bound on service groups in one table
    pub const MAX_GROUPS: usize = 6;

    /// Host stack ceiling on records per service (about 24 characteristics)
    pub const MAX_RECORDS_PER_GROUP: usize = 100;

    /// Capacity of the handle resolution table (power of two)
    pub const MAX_HANDLES: usize = 512;

    /// Largest write payload carried by a write notification
    pub const MAX_WRITE_LEN: usize = 64;

    /// Length of a characteristic presentation format value
    pub const PRESENTATION_LEN: usize = 7;

    /// Attribute type UUIDs
    pub const PRIMARY_SERVICE: u16 = 0x2800;
    pub const CHARACTERISTIC: u16 = 0x2803;
    pub const USER_DESCRIPTION: u16 = 0x2901;
    pub const PRESENTATION_FORMAT: u16 = 0x2904;
}

/// Advertising configuration
pub mod ble {
    pub const DEVICE_NAME: &str = "GEVCU 6.2 ECU";

    /// Advertising interval bounds in 0.625 ms units
    pub const ADV_INTERVAL_MIN: u16 = 0x20;
    pub const ADV_INTERVAL_MAX: u16 = 0x40;

    /// 128-bit service UUID advertised to scanners, LSB first.
    /// Bytes 12 and 13 carry the 16-bit service id.
    pub const SERVICE_UUID: [u8; 16] = [
        0xfb, 0x34, 0x9b, 0x5f, 0x80, 0x00, 0x00, 0x80, 0x00, 0x10, 0x00, 0x00, 0x31, 0x00, 0x00,
        0x00,
    ];
}
