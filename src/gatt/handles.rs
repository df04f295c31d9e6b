//! Handle resolution table
//!
//! Maps host-assigned attribute handles back to the descriptor entry they
//! were compiled from. Handles are sparse and only known once the host stack
//! reports a group as created, so the table is keyed by the handle value
//! itself rather than by an offset from some assumed base.

use heapless::FnvIndexMap;

use super::compiler::{AttributeKind, CompiledGroup, CHARACTERISTIC_LAYOUT, RECORDS_PER_CHARACTERISTIC};
use crate::config::gatt::MAX_HANDLES;

/// What a handle points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Group the handle was assigned in
    pub group: u8,
    /// Position of the originating entry in the descriptor table
    pub entry: usize,
    /// Which of the entry's records the handle names
    pub kind: AttributeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleError {
    /// Handle list length differs from the group's record count
    CountMismatch { expected: usize, reported: usize },
    /// Handle already mapped, by an earlier group or earlier in the list
    DuplicateHandle { handle: u16 },
    /// No room left for the group's handles
    TableFull,
}

/// Sparse handle to entry map, filled one group at a time
pub struct HandleTable {
    map: FnvIndexMap<u16, Resolution, MAX_HANDLES>,
}

impl HandleTable {
    pub const fn new() -> Self {
        Self {
            map: FnvIndexMap::new(),
        }
    }

    /// Record the handles assigned to `group`
    ///
    /// `handles[0]` names the service record, every following run of four
    /// names one characteristic in compiled order. Entries are written once:
    /// a handle that is already mapped rejects the whole list. Nothing is
    /// inserted unless the whole list fits.
    pub fn insert_group(&mut self, group: &CompiledGroup, handles: &[u16]) -> Result<(), HandleError> {
        if handles.len() != group.record_count() {
            return Err(HandleError::CountMismatch {
                expected: group.record_count(),
                reported: handles.len(),
            });
        }
        for (i, &handle) in handles.iter().enumerate() {
            if self.map.contains_key(&handle) || handles[..i].contains(&handle) {
                return Err(HandleError::DuplicateHandle { handle });
            }
        }
        if self.map.len() + handles.len() > self.map.capacity() {
            return Err(HandleError::TableFull);
        }

        let index = group.index();
        let (service, runs) = handles.split_at(1);
        self.put(service[0], index, group.marker(), AttributeKind::Service)?;

        for (run, &entry) in runs
            .chunks_exact(RECORDS_PER_CHARACTERISTIC)
            .zip(group.characteristics())
        {
            for (&handle, &kind) in run.iter().zip(CHARACTERISTIC_LAYOUT.iter()) {
                self.put(handle, index, entry, kind)?;
            }
        }
        Ok(())
    }

    fn put(&mut self, handle: u16, group: u8, entry: usize, kind: AttributeKind) -> Result<(), HandleError> {
        self.map
            .insert(handle, Resolution { group, entry, kind })
            .map(|_| ())
            .map_err(|_| HandleError::TableFull)
    }

    pub fn resolve(&self, handle: u16) -> Option<Resolution> {
        self.map.get(&handle).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Default for HandleTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gatt::compiler::compile;
    use crate::gatt::descriptor::{unit, Entry, Format, Presentation, Properties, END_OF_TABLE};
    use crate::gatt::table::GEVCU_TABLE;
    use crate::params::{Field, Width};

    fn chr(id: u16, slot: u8) -> Entry {
        Entry::characteristic(
            id,
            Properties::READ_WRITE,
            "param",
            Presentation::new(Format::U16, unit::NONE),
            Field::unsigned(slot, Width::Two),
        )
    }

    #[test]
    fn test_single_characteristic_group() {
        let entries = [Entry::group(0x1000), chr(0x1001, 0), Entry::group(END_OF_TABLE)];
        let table = compile(&entries).unwrap();
        let mut handles = HandleTable::new();

        handles
            .insert_group(table.group(0).unwrap(), &[100, 101, 102, 103, 104])
            .unwrap();

        assert_eq!(
            handles.resolve(100),
            Some(Resolution {
                group: 0,
                entry: 0,
                kind: AttributeKind::Service
            })
        );
        for (handle, kind) in (101..=104).zip(CHARACTERISTIC_LAYOUT) {
            assert_eq!(
                handles.resolve(handle),
                Some(Resolution {
                    group: 0,
                    entry: 1,
                    kind
                })
            );
        }
        assert_eq!(handles.resolve(105), None);
        assert_eq!(handles.len(), 5);
    }

    #[test]
    fn test_runs_of_four_map_to_one_entry() {
        let table = compile(GEVCU_TABLE).unwrap();
        let group = table.group(1).unwrap();
        let assigned: std::vec::Vec<u16> = (0..group.record_count() as u16).map(|i| 0x40 + i).collect();

        let mut handles = HandleTable::new();
        handles.insert_group(group, &assigned).unwrap();

        assert_eq!(handles.resolve(assigned[0]).unwrap().entry, group.marker());
        for (i, &entry) in group.characteristics().iter().enumerate() {
            let run = &assigned[1 + 4 * i..1 + 4 * i + 4];
            for &h in run {
                assert_eq!(handles.resolve(h).unwrap().entry, entry);
            }
        }
    }

    #[test]
    fn test_sparse_handles_across_groups() {
        let entries = [
            Entry::group(0x1000),
            chr(0x1001, 0),
            Entry::group(0x2000),
            Entry::group(END_OF_TABLE),
        ];
        let table = compile(&entries).unwrap();
        let mut handles = HandleTable::new();

        handles.insert_group(table.group(0).unwrap(), &[40, 41, 42, 43, 44]).unwrap();
        handles.insert_group(table.group(1).unwrap(), &[9000]).unwrap();

        let service = handles.resolve(9000).unwrap();
        assert_eq!(service.group, 1);
        assert_eq!(service.entry, 2);
        // Earlier group untouched
        assert_eq!(handles.resolve(42).unwrap().entry, 1);
    }

    #[test]
    fn test_reused_handle_is_rejected() {
        let entries = [
            Entry::group(0x1000),
            chr(0x1001, 0),
            Entry::group(0x2000),
            Entry::group(END_OF_TABLE),
        ];
        let table = compile(&entries).unwrap();
        let mut handles = HandleTable::new();

        handles.insert_group(table.group(0).unwrap(), &[40, 41, 42, 43, 44]).unwrap();
        assert_eq!(
            handles.insert_group(table.group(1).unwrap(), &[42]),
            Err(HandleError::DuplicateHandle { handle: 42 })
        );

        // The value handle still resolves to group 0
        assert_eq!(
            handles.resolve(42),
            Some(Resolution {
                group: 0,
                entry: 1,
                kind: AttributeKind::Value
            })
        );
        assert_eq!(handles.len(), 5);
    }

    #[test]
    fn test_repeated_handle_within_group_is_rejected() {
        let entries = [Entry::group(0x1000), chr(0x1001, 0)];
        let table = compile(&entries).unwrap();
        let mut handles = HandleTable::new();

        assert_eq!(
            handles.insert_group(table.group(0).unwrap(), &[40, 41, 42, 42, 44]),
            Err(HandleError::DuplicateHandle { handle: 42 })
        );
        assert!(handles.is_empty());
    }

    #[test]
    fn test_count_mismatch_inserts_nothing() {
        let entries = [Entry::group(0x1000), chr(0x1001, 0)];
        let table = compile(&entries).unwrap();
        let mut handles = HandleTable::new();

        assert_eq!(
            handles.insert_group(table.group(0).unwrap(), &[1, 2, 3]),
            Err(HandleError::CountMismatch {
                expected: 5,
                reported: 3
            })
        );
        assert!(handles.is_empty());
    }

    #[test]
    fn test_table_full() {
        let entries = [Entry::group(0x1000), chr(0x1001, 0)];
        let table = compile(&entries).unwrap();
        let group = table.group(0).unwrap();
        let mut handles = HandleTable::new();

        let mut next = 0u16;
        while handles.len() + 5 <= MAX_HANDLES {
            let run = [next, next + 1, next + 2, next + 3, next + 4];
            handles.insert_group(group, &run).unwrap();
            next += 5;
        }
        let before = handles.len();
        let run = [next, next + 1, next + 2, next + 3, next + 4];
        assert_eq!(handles.insert_group(group, &run), Err(HandleError::TableFull));
        assert_eq!(handles.len(), before);
    }
}
