//! GATT server: service bring-up and attribute event handling
//!
//! Bring-up creates one service group at a time:
//!
//! ```text
//! Idle --Registered--> AwaitingGroup(0) --TableCreated(0)--> ... --TableCreated(G-1)--> Running
//! ```
//!
//! Each `TableCreated` notification fills the handle table for that group,
//! activates the service and only then submits the next group. Any failure
//! parks the server in `Failed` for good; later groups are never submitted.

use log::{debug, error, info, warn};

use super::compiler::{compile, AttributeKind, CompileError, CompiledTable};
use super::descriptor::{duplicate_ids, Entry, Properties};
use super::handles::{HandleError, HandleTable, Resolution};
use super::host::{AdvertisingData, AdvertisingParams, GapEvent, GattsEvent, GattsInterface, HostStack, Status};
use crate::config::{ble, gatt::APP_ID};
use crate::params::ParameterCache;

/// Why bring-up stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BringupError {
    RegistrationFailed(Status),
    /// The stack refused to accept a group submission
    SubmitRejected { group: u8 },
    /// The stack reported a failed table creation
    GroupRejected { group: u8, status: Status },
    /// Handle list missing or of the wrong length
    HandleMismatch {
        group: u8,
        expected: usize,
        reported: usize,
    },
    /// The stack reported a handle that is already mapped
    DuplicateHandle { group: u8, handle: u16 },
    TableFull { group: u8 },
    ActivationRejected { group: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BringupState {
    /// Waiting for application registration
    Idle,
    /// Group submitted, waiting for its handles
    AwaitingGroup(u8),
    Running,
    Failed(BringupError),
}

/// Why a client write was not stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteRejection {
    /// Handle names a record other than a characteristic value
    NotValue,
    NotWritable,
    LengthMismatch { expected: usize, actual: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Stored,
    Rejected(WriteRejection),
    UnknownHandle,
}

pub struct GattServer<'t> {
    table: CompiledTable<'t>,
    handles: HandleTable,
    cache: &'t ParameterCache,
    state: BringupState,
    interface: GattsInterface,
}

impl<'t> GattServer<'t> {
    /// Compile `entries` and prepare a server backed by `cache`
    pub fn new(entries: &'t [Entry], cache: &'t ParameterCache) -> Result<Self, CompileError> {
        let table = compile(entries)?;
        Ok(Self {
            table,
            handles: HandleTable::new(),
            cache,
            state: BringupState::Idle,
            interface: GattsInterface::NONE,
        })
    }

    /// Register the application; bring-up continues on `Registered`
    pub fn start<S: HostStack>(&mut self, stack: &mut S) {
        if let Err(e) = stack.register_app(APP_ID) {
            self.fail(BringupError::RegistrationFailed(Status::Failed(e.0)));
        }
    }

    pub fn state(&self) -> BringupState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == BringupState::Running
    }

    pub fn table(&self) -> &CompiledTable<'t> {
        &self.table
    }

    pub fn handles(&self) -> &HandleTable {
        &self.handles
    }

    /// Interface assigned at registration
    pub fn interface(&self) -> GattsInterface {
        self.interface
    }

    /// Feed one attribute server notification
    pub fn handle_gatts_event<S: HostStack>(
        &mut self,
        interface: GattsInterface,
        event: &GattsEvent,
        stack: &mut S,
    ) {
        if let GattsEvent::Registered { status, app_id } = event {
            if *app_id == APP_ID {
                self.on_registered(interface, *status, stack);
            }
            return;
        }
        if interface != GattsInterface::NONE && interface != self.interface {
            return;
        }

        match event {
            GattsEvent::Registered { .. } => {}
            GattsEvent::TableCreated {
                status,
                group,
                num_handles,
                handles,
            } => {
                let handles = handles.as_ref().map(|h| h.as_slice());
                self.on_table_created(*status, *group, *num_handles, handles, stack);
            }
            GattsEvent::ServiceStarted { status, handle } => {
                debug!("Service {} started: {:?}", handle, status);
            }
            GattsEvent::Read { handle } => {
                self.on_read(*handle);
            }
            GattsEvent::Write { handle, data } => {
                self.on_write(*handle, data);
            }
            GattsEvent::Connected => info!("Client connected"),
            GattsEvent::Disconnected => {
                info!("Client disconnected, advertising again");
                if let Err(e) = stack.start_advertising(&AdvertisingParams::GEVCU) {
                    error!("Advertising restart rejected: {:?}", e);
                }
            }
        }
    }

    /// Feed one advertising notification
    pub fn handle_gap_event<S: HostStack>(&mut self, event: &GapEvent, stack: &mut S) {
        match event {
            GapEvent::AdvertisingDataSet => {
                if let Err(e) = stack.start_advertising(&AdvertisingParams::GEVCU) {
                    error!("Advertising start rejected: {:?}", e);
                }
            }
            GapEvent::AdvertisingStarted { status } => {
                if !status.is_success() {
                    error!("Advertising start failed: {:?}", status);
                }
            }
        }
    }

    fn on_registered<S: HostStack>(&mut self, interface: GattsInterface, status: Status, stack: &mut S) {
        if self.state != BringupState::Idle {
            warn!("Duplicate registration ignored");
            return;
        }
        if !status.is_success() {
            self.fail(BringupError::RegistrationFailed(status));
            return;
        }
        self.interface = interface;
        info!("Registered as interface {}", interface.0);

        if let Err(e) = stack.set_device_name(ble::DEVICE_NAME) {
            error!("Device name rejected: {:?}", e);
        }
        if let Err(e) = stack.configure_advertising(&AdvertisingData::GEVCU) {
            error!("Advertising data rejected: {:?}", e);
        }

        info!(
            "Attribute table: {} groups, {} records, fingerprint {:04x}",
            self.table.group_count(),
            self.table.record_count(),
            self.table.fingerprint()
        );
        for id in duplicate_ids(self.table.entries()) {
            warn!("Characteristic id {:04x} appears more than once", id);
        }

        if self.table.group_count() == 0 {
            self.state = BringupState::Running;
            info!("No groups to create, running");
        } else {
            self.submit(0, stack);
        }
    }

    fn submit<S: HostStack>(&mut self, group: u8, stack: &mut S) {
        let Some(compiled) = self.table.group(group) else {
            self.fail(BringupError::SubmitRejected { group });
            return;
        };
        info!(
            "Submitting group {} ({:04x}, {} records)",
            group,
            compiled.service_id(),
            compiled.record_count()
        );
        match stack.create_attribute_table(self.interface, group, compiled.records()) {
            Ok(()) => self.state = BringupState::AwaitingGroup(group),
            Err(_) => self.fail(BringupError::SubmitRejected { group }),
        }
    }

    fn on_table_created<S: HostStack>(
        &mut self,
        status: Status,
        group: u8,
        num_handles: u16,
        handles: Option<&[u16]>,
        stack: &mut S,
    ) {
        if self.state != BringupState::AwaitingGroup(group) {
            warn!("Unexpected table for group {} in state {:?}", group, self.state);
            return;
        }
        if !status.is_success() {
            self.fail(BringupError::GroupRejected { group, status });
            return;
        }

        let Some(compiled) = self.table.group(group) else {
            return;
        };
        let expected = compiled.record_count();
        let Some(handles) = handles else {
            error!(
                "Group {} created without a handle list ({} reported)",
                group, num_handles
            );
            self.fail(BringupError::HandleMismatch {
                group,
                expected,
                reported: num_handles as usize,
            });
            return;
        };
        info!("Group {} created with {} handles", group, handles.len());

        match self.handles.insert_group(compiled, handles) {
            Ok(()) => {}
            Err(HandleError::CountMismatch { expected, reported }) => {
                self.fail(BringupError::HandleMismatch {
                    group,
                    expected,
                    reported,
                });
                return;
            }
            Err(HandleError::DuplicateHandle { handle }) => {
                self.fail(BringupError::DuplicateHandle { group, handle });
                return;
            }
            Err(HandleError::TableFull) => {
                self.fail(BringupError::TableFull { group });
                return;
            }
        }

        if stack.start_service(handles[0]).is_err() {
            self.fail(BringupError::ActivationRejected { group });
            return;
        }
        info!("Group {} activated at handle {}", group, handles[0]);

        let next = group + 1;
        if (next as usize) < self.table.group_count() {
            self.submit(next, stack);
        } else {
            self.state = BringupState::Running;
            info!("All {} groups running", self.table.group_count());
        }
    }

    /// Resolve a client read; the stack serves the value itself
    pub fn on_read(&self, handle: u16) -> Option<Resolution> {
        let resolved = self.handles.resolve(handle);
        match resolved {
            Some(r) => info!("Read handle {} ({})", handle, self.name_of(r)),
            None => warn!("Read on unknown handle {}", handle),
        }
        resolved
    }

    /// Store a client write into the cache
    ///
    /// Only the value record of a writable characteristic is stored, and
    /// only when the payload length matches the characteristic exactly.
    pub fn on_write(&self, handle: u16, data: &[u8]) -> WriteOutcome {
        let Some(resolved) = self.handles.resolve(handle) else {
            warn!("Write on unknown handle {} ({} bytes)", handle, data.len());
            return WriteOutcome::UnknownHandle;
        };
        info!(
            "Write handle {} ({}) len {} first {:#04x}",
            handle,
            self.name_of(resolved),
            data.len(),
            data.first().copied().unwrap_or(0)
        );

        let outcome = self.store(resolved, data);
        if let WriteOutcome::Rejected(reason) = outcome {
            warn!("Write on handle {} rejected: {:?}", handle, reason);
        }
        outcome
    }

    fn store(&self, resolved: Resolution, data: &[u8]) -> WriteOutcome {
        if resolved.kind != AttributeKind::Value {
            return WriteOutcome::Rejected(WriteRejection::NotValue);
        }
        let Some(Entry::Characteristic(c)) = self.table.entries().get(resolved.entry) else {
            return WriteOutcome::Rejected(WriteRejection::NotValue);
        };
        if !c.properties.contains(Properties::WRITE) {
            return WriteOutcome::Rejected(WriteRejection::NotWritable);
        }
        let mismatch = WriteRejection::LengthMismatch {
            expected: c.len as usize,
            actual: data.len(),
        };
        if data.len() != c.len as usize {
            return WriteOutcome::Rejected(mismatch);
        }
        match self.cache.write_bytes(c.field, data) {
            Ok(()) => WriteOutcome::Stored,
            Err(_) => WriteOutcome::Rejected(mismatch),
        }
    }

    fn name_of(&self, resolved: Resolution) -> &'static str {
        self.table
            .entries()
            .get(resolved.entry)
            .map(Entry::name)
            .unwrap_or("")
    }

    fn fail(&mut self, err: BringupError) {
        error!("Bring-up failed: {:?}", err);
        self.state = BringupState::Failed(err);
    }
}
