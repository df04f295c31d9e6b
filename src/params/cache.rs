//! Live parameter cache
//!
//! One cache instance holds every value exposed over BLE and SPI. Each value
//! lives in its own 32-bit atomic slot, so a store from the BLE event context
//! and a store from the SPI task never produce a torn value. There is no
//! ordering between the two writers: whichever stores last wins.
//!
//! Values are kept in the low `width` bytes of their slot and exchanged with
//! the outside world as little-endian byte strings, matching the wire layout
//! of both transports.

use core::sync::atomic::{AtomicU32, Ordering};

/// Number of slots in the cache
pub const CACHE_SLOTS: usize = 64;

/// Byte width of a cached value
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    One = 1,
    Two = 2,
    Four = 4,
}

impl Width {
    /// Number of bytes a value of this width occupies on the wire
    pub const fn bytes(self) -> usize {
        self as usize
    }

    /// Try to convert a byte length to a width
    pub fn from_len(len: usize) -> Option<Self> {
        match len {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            4 => Some(Self::Four),
            _ => None,
        }
    }

    const fn mask(self) -> u32 {
        match self {
            Self::One => 0xFF,
            Self::Two => 0xFFFF,
            Self::Four => 0xFFFF_FFFF,
        }
    }
}

/// Location and shape of one value in the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    slot: u8,
    width: Width,
    signed: bool,
}

impl Field {
    /// Unsigned field in `slot`
    pub const fn unsigned(slot: u8, width: Width) -> Self {
        assert!((slot as usize) < CACHE_SLOTS, "cache slot out of range");
        Self {
            slot,
            width,
            signed: false,
        }
    }

    /// Two's complement field in `slot`
    pub const fn signed(slot: u8, width: Width) -> Self {
        assert!((slot as usize) < CACHE_SLOTS, "cache slot out of range");
        Self {
            slot,
            width,
            signed: true,
        }
    }

    pub const fn slot(self) -> usize {
        self.slot as usize
    }

    pub const fn width(self) -> Width {
        self.width
    }

    pub const fn is_signed(self) -> bool {
        self.signed
    }

    /// Byte length of the value
    pub const fn len(self) -> usize {
        self.width.bytes()
    }
}

/// Typed view of a cached value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    U8(u8),
    U16(u16),
    U32(u32),
    I8(i8),
    I16(i16),
    I32(i32),
}

impl Value {
    /// Interpret a raw slot according to the field's shape
    pub fn from_raw(field: Field, raw: u32) -> Self {
        match (field.width(), field.is_signed()) {
            (Width::One, false) => Self::U8(raw as u8),
            (Width::Two, false) => Self::U16(raw as u16),
            (Width::Four, false) => Self::U32(raw),
            (Width::One, true) => Self::I8(raw as u8 as i8),
            (Width::Two, true) => Self::I16(raw as u16 as i16),
            (Width::Four, true) => Self::I32(raw as i32),
        }
    }

    /// Raw slot contents, truncated to the value's own width
    pub fn to_raw(self) -> u32 {
        match self {
            Self::U8(v) => v as u32,
            Self::U16(v) => v as u32,
            Self::U32(v) => v,
            Self::I8(v) => v as u8 as u32,
            Self::I16(v) => v as u16 as u32,
            Self::I32(v) => v as u32,
        }
    }

    /// Widened signed view, useful for logging
    pub fn as_i64(self) -> i64 {
        match self {
            Self::U8(v) => v as i64,
            Self::U16(v) => v as i64,
            Self::U32(v) => v as i64,
            Self::I8(v) => v as i64,
            Self::I16(v) => v as i64,
            Self::I32(v) => v as i64,
        }
    }
}

/// Errors from byte-level cache access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheError {
    /// Source or destination buffer shorter than the field
    ShortBuffer { expected: usize, actual: usize },
}

/// The shared store of live parameter values
pub struct ParameterCache {
    slots: [AtomicU32; CACHE_SLOTS],
}

impl ParameterCache {
    /// Create a cache with every value zeroed
    pub const fn new() -> Self {
        #[allow(clippy::declare_interior_mutable_const)]
        const ZERO: AtomicU32 = AtomicU32::new(0);
        Self {
            slots: [ZERO; CACHE_SLOTS],
        }
    }

    /// Raw contents of a field
    pub fn load(&self, field: Field) -> u32 {
        self.slots[field.slot()].load(Ordering::Relaxed) & field.width().mask()
    }

    /// Replace a field with a raw value, truncated to the field width
    pub fn store(&self, field: Field, raw: u32) {
        self.slots[field.slot()].store(raw & field.width().mask(), Ordering::Relaxed);
    }

    /// Typed read
    pub fn get(&self, field: Field) -> Value {
        Value::from_raw(field, self.load(field))
    }

    /// Typed write
    pub fn set(&self, field: Field, value: Value) {
        self.store(field, value.to_raw());
    }

    /// Copy a field out as little-endian bytes
    ///
    /// Returns the number of bytes written, which is always the field length.
    pub fn read_bytes(&self, field: Field, out: &mut [u8]) -> Result<usize, CacheError> {
        let len = field.len();
        if out.len() < len {
            return Err(CacheError::ShortBuffer {
                expected: len,
                actual: out.len(),
            });
        }
        out[..len].copy_from_slice(&self.load(field).to_le_bytes()[..len]);
        Ok(len)
    }

    /// Store a field from little-endian bytes
    ///
    /// Only the first `field.len()` bytes of `data` are used.
    pub fn write_bytes(&self, field: Field, data: &[u8]) -> Result<(), CacheError> {
        let len = field.len();
        if data.len() < len {
            return Err(CacheError::ShortBuffer {
                expected: len,
                actual: data.len(),
            });
        }
        let mut raw = [0u8; 4];
        raw[..len].copy_from_slice(&data[..len]);
        self.store(field, u32::from_le_bytes(raw));
        Ok(())
    }
}

impl Default for ParameterCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_cache_is_zeroed() {
        let cache = ParameterCache::new();
        let field = Field::unsigned(3, Width::Four);
        assert_eq!(cache.load(field), 0);
        assert_eq!(cache.get(field), Value::U32(0));
    }

    #[test]
    fn test_store_truncates_to_width() {
        let cache = ParameterCache::new();
        let field = Field::unsigned(0, Width::One);
        cache.store(field, 0x1234);
        assert_eq!(cache.load(field), 0x34);
    }

    #[test]
    fn test_signed_values() {
        let cache = ParameterCache::new();
        let field = Field::signed(1, Width::Two);

        cache.set(field, Value::I16(i16::MIN));
        assert_eq!(cache.get(field), Value::I16(i16::MIN));

        let mut out = [0u8; 2];
        cache.read_bytes(field, &mut out).unwrap();
        assert_eq!(out, [0x00, 0x80]);

        cache.write_bytes(field, &[0xFF, 0xFF]).unwrap();
        assert_eq!(cache.get(field), Value::I16(-1));
        assert_eq!(cache.get(field).as_i64(), -1);
    }

    #[test]
    fn test_bytes_are_little_endian() {
        let cache = ParameterCache::new();
        let field = Field::unsigned(2, Width::Four);

        cache.write_bytes(field, &[0x78, 0x56, 0x34, 0x12]).unwrap();
        assert_eq!(cache.get(field), Value::U32(0x1234_5678));
    }

    #[test]
    fn test_write_ignores_trailing_bytes() {
        let cache = ParameterCache::new();
        let field = Field::unsigned(4, Width::Two);

        cache.write_bytes(field, &[0x2A, 0x00, 0xEE, 0xEE]).unwrap();
        assert_eq!(cache.get(field), Value::U16(42));
    }

    #[test]
    fn test_short_buffers_rejected() {
        let cache = ParameterCache::new();
        let field = Field::unsigned(5, Width::Four);
        cache.store(field, 7);

        assert_eq!(
            cache.write_bytes(field, &[0x01]),
            Err(CacheError::ShortBuffer {
                expected: 4,
                actual: 1
            })
        );
        // Rejected write leaves the value alone
        assert_eq!(cache.load(field), 7);

        let mut out = [0u8; 2];
        assert!(cache.read_bytes(field, &mut out).is_err());
    }

    #[test]
    fn test_fields_do_not_alias() {
        let cache = ParameterCache::new();
        let a = Field::unsigned(10, Width::Four);
        let b = Field::unsigned(11, Width::Four);

        cache.store(a, u32::MAX);
        assert_eq!(cache.load(b), 0);
    }

    #[test]
    fn test_width_from_len() {
        assert_eq!(Width::from_len(2), Some(Width::Two));
        assert_eq!(Width::from_len(3), None);
        assert_eq!(Width::Four.bytes(), 4);
    }
}
