//! Descriptor table compiler
//!
//! Turns a descriptor table into per-service attribute record lists in the
//! shape the host attribute database expects:
//!
//! ```text
//! group marker    -> [Service]
//! characteristic  -> [Declaration][Value][Description][Presentation]
//! ```
//!
//! The host assigns handles in record order, which is what lets the handle
//! table map every run of four handles back to a single characteristic.

use bitflags::bitflags;
use crc::{Crc, CRC_16_XMODEM};
use heapless::Vec;

use super::descriptor::{Characteristic, Entry, EntryKind, Properties};
use crate::config::gatt::{
    CHARACTERISTIC, MAX_GROUPS, MAX_RECORDS_PER_GROUP, PRESENTATION_FORMAT, PRESENTATION_LEN,
    PRIMARY_SERVICE, USER_DESCRIPTION,
};
use crate::params::Field;

const CRC: Crc<u16> = Crc::<u16>::new(&CRC_16_XMODEM);

bitflags! {
    /// Attribute access permissions
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Perms: u8 {
        const READ = 0x01;
        const WRITE = 0x10;
    }
}

/// Role of a record within its service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Service,
    Declaration,
    Value,
    Description,
    Presentation,
}

/// Record order emitted for every characteristic
pub const CHARACTERISTIC_LAYOUT: [AttributeKind; 4] = [
    AttributeKind::Declaration,
    AttributeKind::Value,
    AttributeKind::Description,
    AttributeKind::Presentation,
];

/// Records emitted per characteristic
pub const RECORDS_PER_CHARACTERISTIC: usize = CHARACTERISTIC_LAYOUT.len();

/// Characteristics that fit in one service next to its service record
pub const MAX_CHARACTERISTICS_PER_GROUP: usize =
    (MAX_RECORDS_PER_GROUP - 1) / RECORDS_PER_CHARACTERISTIC;

/// Where the host finds the bytes of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeValue {
    /// 16-bit id of the service
    ServiceId(u16),
    /// Declaration properties byte
    Properties(Properties),
    /// Live value in the parameter cache
    Field(Field),
    /// User description string
    Text(&'static str),
    /// Presentation format descriptor
    Presentation([u8; PRESENTATION_LEN]),
}

impl AttributeValue {
    pub fn len(&self) -> usize {
        match self {
            Self::ServiceId(_) => 2,
            Self::Properties(_) => 1,
            Self::Field(field) => field.len(),
            Self::Text(text) => text.len(),
            Self::Presentation(bytes) => bytes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One host-facing attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeRecord {
    pub kind: AttributeKind,
    /// Attribute type UUID
    pub uuid: u16,
    pub perms: Perms,
    pub max_len: u16,
    pub value: AttributeValue,
}

impl AttributeRecord {
    fn new(kind: AttributeKind, uuid: u16, perms: Perms, value: AttributeValue) -> Self {
        Self {
            kind,
            uuid,
            perms,
            max_len: value.len() as u16,
            value,
        }
    }
}

/// Service record opening a group
pub fn service_record(id: u16) -> AttributeRecord {
    AttributeRecord::new(
        AttributeKind::Service,
        PRIMARY_SERVICE,
        Perms::READ,
        AttributeValue::ServiceId(id),
    )
}

/// Expand a characteristic into its four records
pub fn expand(c: &Characteristic) -> [AttributeRecord; RECORDS_PER_CHARACTERISTIC] {
    let mut value_perms = Perms::READ;
    if c.properties.contains(Properties::WRITE) {
        value_perms |= Perms::WRITE;
    }

    let mut value = AttributeRecord::new(
        AttributeKind::Value,
        c.id,
        value_perms,
        AttributeValue::Field(c.field),
    );
    value.max_len = c.len as u16;

    [
        AttributeRecord::new(
            AttributeKind::Declaration,
            CHARACTERISTIC,
            Perms::READ,
            AttributeValue::Properties(c.properties),
        ),
        value,
        AttributeRecord::new(
            AttributeKind::Description,
            USER_DESCRIPTION,
            Perms::READ,
            AttributeValue::Text(c.name),
        ),
        AttributeRecord::new(
            AttributeKind::Presentation,
            PRESENTATION_FORMAT,
            Perms::READ,
            AttributeValue::Presentation(c.presentation.to_bytes()),
        ),
    ]
}

/// Errors raised while compiling a descriptor table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileError {
    /// Characteristic at `position` appears before any group marker
    OrphanCharacteristic { position: usize },
    /// More groups than `MAX_GROUPS`
    TooManyGroups,
    /// Group would exceed `MAX_RECORDS_PER_GROUP`
    GroupOverflow { group: u8 },
}

/// Records for one service plus the table positions they came from
#[derive(Debug)]
pub struct CompiledGroup {
    index: u8,
    service_id: u16,
    marker: usize,
    characteristics: Vec<usize, MAX_CHARACTERISTICS_PER_GROUP>,
    records: Vec<AttributeRecord, MAX_RECORDS_PER_GROUP>,
}

impl CompiledGroup {
    fn open(index: u8, service_id: u16, marker: usize) -> Self {
        let mut records = Vec::new();
        // Capacity is never zero, the service record always fits
        let _ = records.push(service_record(service_id));
        Self {
            index,
            service_id,
            marker,
            characteristics: Vec::new(),
            records,
        }
    }

    fn append(&mut self, position: usize, c: &Characteristic) -> Result<(), CompileError> {
        let overflow = CompileError::GroupOverflow { group: self.index };
        self.characteristics.push(position).map_err(|_| overflow)?;
        self.records
            .extend_from_slice(&expand(c))
            .map_err(|_| overflow)
    }

    /// Position of the group in table order
    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn service_id(&self) -> u16 {
        self.service_id
    }

    /// Table position of the group marker
    pub fn marker(&self) -> usize {
        self.marker
    }

    /// Table positions of the group's characteristics, in record order
    pub fn characteristics(&self) -> &[usize] {
        &self.characteristics
    }

    pub fn records(&self) -> &[AttributeRecord] {
        &self.records
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

/// Output of [`compile`]
#[derive(Debug)]
pub struct CompiledTable<'t> {
    entries: &'t [Entry],
    groups: Vec<CompiledGroup, MAX_GROUPS>,
}

impl<'t> CompiledTable<'t> {
    /// The descriptor table the records were compiled from
    pub fn entries(&self) -> &'t [Entry] {
        self.entries
    }

    pub fn groups(&self) -> &[CompiledGroup] {
        &self.groups
    }

    pub fn group(&self, index: u8) -> Option<&CompiledGroup> {
        self.groups.get(index as usize)
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Records across all groups
    pub fn record_count(&self) -> usize {
        self.groups.iter().map(CompiledGroup::record_count).sum()
    }

    /// CRC-16/XMODEM over the static shape of every record
    ///
    /// Live values are excluded, so the fingerprint only changes when the
    /// layout does.
    pub fn fingerprint(&self) -> u16 {
        let mut digest = CRC.digest();
        for record in self.groups.iter().flat_map(|g| g.records.iter()) {
            digest.update(&record.uuid.to_le_bytes());
            digest.update(&[record.perms.bits()]);
            digest.update(&record.max_len.to_le_bytes());
            match record.value {
                AttributeValue::ServiceId(id) => digest.update(&id.to_le_bytes()),
                AttributeValue::Properties(props) => digest.update(&[props.bits()]),
                AttributeValue::Field(field) => digest.update(&[field.len() as u8]),
                AttributeValue::Text(text) => digest.update(text.as_bytes()),
                AttributeValue::Presentation(bytes) => digest.update(&bytes),
            }
        }
        digest.finalize()
    }
}

/// Compile a descriptor table into per-service record lists
///
/// Scanning stops at the end-of-table id or the end of the slice. Duplicate
/// ids are accepted as-is.
pub fn compile(entries: &[Entry]) -> Result<CompiledTable<'_>, CompileError> {
    let mut groups: Vec<CompiledGroup, MAX_GROUPS> = Vec::new();

    for (position, entry) in entries.iter().enumerate() {
        match entry.kind() {
            EntryKind::End => break,
            EntryKind::Group(id) => {
                let index = groups.len() as u8;
                groups
                    .push(CompiledGroup::open(index, id, position))
                    .map_err(|_| CompileError::TooManyGroups)?;
            }
            EntryKind::Characteristic(c) => {
                let group = groups
                    .last_mut()
                    .ok_or(CompileError::OrphanCharacteristic { position })?;
                group.append(position, c)?;
            }
        }
    }

    Ok(CompiledTable { entries, groups })
}
