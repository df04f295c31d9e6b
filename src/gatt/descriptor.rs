//! Characteristic descriptors
//!
//! A descriptor table is a flat, ordered list of [`Entry`] values. Each
//! [`Entry::GroupMarker`] opens a new service group and every
//! [`Entry::Characteristic`] that follows belongs to it, up to the next marker
//! or the end of the table. The table ends at the end of the slice or at the
//! first entry carrying [`END_OF_TABLE`], whichever comes first.

use bitflags::bitflags;
use heapless::Vec;

use crate::config::gatt::PRESENTATION_LEN;
use crate::params::Field;

/// Reserved id terminating a descriptor table
pub const END_OF_TABLE: u16 = 0xFFFF;

bitflags! {
    /// Characteristic properties carried by the declaration record
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Properties: u8 {
        const READ = 0x02;
        const WRITE = 0x08;
        /// Declared by the table format, never emitted
        const NOTIFY = 0x10;
    }
}

impl Properties {
    pub const READ_WRITE: Self = Self::READ.union(Self::WRITE);
}

/// Presentation format codes
///
/// <https://bitbucket.org/bluetooth-SIG/public/src/main/assigned_numbers/core/formattypes.yaml>
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Boolean = 0x01,
    U8 = 0x04,
    U16 = 0x06,
    U32 = 0x08,
    I8 = 0x0C,
    I16 = 0x0E,
}

/// Presentation unit codes
///
/// <https://bitbucket.org/bluetooth-SIG/public/src/main/assigned_numbers/uuids/units.yaml>
pub mod unit {
    pub const NONE: u16 = 0x2700;
    pub const SECOND: u16 = 0x2703;
    pub const AMPERE: u16 = 0x2704;
    pub const HERTZ: u16 = 0x2722;
    pub const WATT: u16 = 0x2726;
    pub const VOLT: u16 = 0x2728;
    pub const NEWTON_METRE: u16 = 0x2741;
    pub const REVOLUTION_PER_MINUTE: u16 = 0x27A8;
    pub const FAHRENHEIT: u16 = 0x27AC;
    pub const PERCENTAGE: u16 = 0x27AD;
    pub const KILOWATT_HOUR: u16 = 0x27D4;
}

/// Bluetooth SIG namespace for presentation descriptions
pub const NAMESPACE_BLUETOOTH: u8 = 0x01;

/// Characteristic presentation format (Core v5.3, Vol 3, Part G, 3.3.3.5)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presentation {
    pub format: Format,
    pub exponent: i8,
    pub unit: u16,
    pub namespace: u8,
    pub description: u16,
}

impl Presentation {
    /// Presentation with no exponent in the Bluetooth namespace
    pub const fn new(format: Format, unit: u16) -> Self {
        Self {
            format,
            exponent: 0,
            unit,
            namespace: NAMESPACE_BLUETOOTH,
            description: 0,
        }
    }

    /// Wire form of the presentation descriptor value
    pub fn to_bytes(&self) -> [u8; PRESENTATION_LEN] {
        let mut buf = [0u8; PRESENTATION_LEN];
        buf[0] = self.format as u8;
        buf[1] = self.exponent as u8;
        buf[2..4].copy_from_slice(&self.unit.to_le_bytes());
        buf[4] = self.namespace;
        buf[5..7].copy_from_slice(&self.description.to_le_bytes());
        buf
    }
}

/// One exposed parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Characteristic {
    /// 16-bit characteristic UUID
    pub id: u16,
    pub properties: Properties,
    /// Value length in bytes. Zero turns the entry into a group marker.
    pub len: u8,
    pub name: &'static str,
    pub presentation: Presentation,
    /// Where the live value lives
    pub field: Field,
}

/// An entry in a descriptor table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    /// Starts a new service group
    GroupMarker { id: u16 },
    /// A parameter inside the current group
    Characteristic(Characteristic),
}

/// How the compiler must treat an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind<'e> {
    Group(u16),
    Characteristic(&'e Characteristic),
    End,
}

impl Entry {
    /// Characteristic whose length matches its cache field
    pub const fn characteristic(
        id: u16,
        properties: Properties,
        name: &'static str,
        presentation: Presentation,
        field: Field,
    ) -> Self {
        Self::Characteristic(Characteristic {
            id,
            properties,
            len: field.len() as u8,
            name,
            presentation,
            field,
        })
    }

    pub const fn group(id: u16) -> Self {
        Self::GroupMarker { id }
    }

    pub fn id(&self) -> u16 {
        match self {
            Self::GroupMarker { id } => *id,
            Self::Characteristic(c) => c.id,
        }
    }

    /// Human-readable name, empty for group markers
    pub fn name(&self) -> &'static str {
        match self {
            Self::GroupMarker { .. } => "",
            Self::Characteristic(c) => c.name,
        }
    }

    /// Classify the entry. A zero-length characteristic is always a group
    /// marker, never a zero-length value.
    pub fn kind(&self) -> EntryKind<'_> {
        if self.id() == END_OF_TABLE {
            return EntryKind::End;
        }
        match self {
            Self::GroupMarker { id } => EntryKind::Group(*id),
            Self::Characteristic(c) if c.len == 0 => EntryKind::Group(c.id),
            Self::Characteristic(c) => EntryKind::Characteristic(c),
        }
    }
}

/// Characteristics in table order, skipping group markers
///
/// The position of a characteristic in this sequence is its parameter index
/// on the wired channel.
pub fn characteristics(entries: &[Entry]) -> impl Iterator<Item = &Characteristic> {
    entries
        .iter()
        .map(Entry::kind)
        .take_while(|kind| !matches!(kind, EntryKind::End))
        .filter_map(|kind| match kind {
            EntryKind::Characteristic(c) => Some(c),
            _ => None,
        })
}

/// Look up a characteristic by its wired parameter index
pub fn parameter(entries: &[Entry], index: u8) -> Option<&Characteristic> {
    characteristics(entries).nth(index as usize)
}

/// Maximum number of duplicates reported by [`duplicate_ids`]
pub const MAX_DUPLICATES: usize = 8;

/// Ids that appear on more than one entry before the end of the table
///
/// The compiler accepts duplicates; this only feeds diagnostics.
pub fn duplicate_ids(entries: &[Entry]) -> Vec<u16, MAX_DUPLICATES> {
    let live = entries
        .iter()
        .position(|e| matches!(e.kind(), EntryKind::End))
        .unwrap_or(entries.len());
    let entries = &entries[..live];

    let mut found: Vec<u16, MAX_DUPLICATES> = Vec::new();
    for (i, entry) in entries.iter().enumerate() {
        let id = entry.id();
        if found.contains(&id) {
            continue;
        }
        if entries[i + 1..].iter().any(|other| other.id() == id) && found.push(id).is_err() {
            break;
        }
    }
    found
}
