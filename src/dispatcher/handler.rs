//! Command dispatcher
//!
//! Applies decoded wired commands to the parameter cache. Parameters are
//! addressed by their position among the descriptor table's characteristics,
//! so the wired channel works whether or not wireless bring-up finished.

use crate::commands::types::{Command, Response};
use crate::gatt::descriptor::{parameter, Characteristic, Entry};
use crate::params::{CacheError, ParameterCache};
use heapless::Vec;
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchError {
    /// No characteristic at this index
    IndexOutOfRange(u8),
    /// Payload or reply buffer too short for the parameter
    Cache(CacheError),
}

impl From<CacheError> for DispatchError {
    fn from(err: CacheError) -> Self {
        Self::Cache(err)
    }
}

/// Command dispatcher over one descriptor table
pub struct CommandDispatcher<'t> {
    entries: &'t [Entry],
}

impl<'t> CommandDispatcher<'t> {
    /// Create a new command dispatcher
    pub fn new(entries: &'t [Entry]) -> Self {
        Self { entries }
    }

    /// Dispatch a command, returning the reply to stage if it has one
    pub fn dispatch(
        &self,
        cache: &ParameterCache,
        command: Command,
    ) -> Result<Option<Response>, DispatchError> {
        match command {
            Command::Set { index, payload } => {
                self.handle_set(cache, index, &payload)?;
                Ok(None)
            }
            Command::Get { index } => self.handle_get(cache, index).map(Some),
        }
    }

    fn lookup(&self, index: u8) -> Result<&'t Characteristic, DispatchError> {
        parameter(self.entries, index).ok_or(DispatchError::IndexOutOfRange(index))
    }

    /// Store the first bytes of `payload` into the parameter
    ///
    /// The wireless write property does not apply here.
    fn handle_set(&self, cache: &ParameterCache, index: u8, payload: &[u8]) -> Result<(), DispatchError> {
        let c = self.lookup(index)?;
        cache.write_bytes(c.field, payload)?;
        debug!("SET {} ({}) = {}", index, c.name, cache.get(c.field).as_i64());
        Ok(())
    }

    fn handle_get(&self, cache: &ParameterCache, index: u8) -> Result<Response, DispatchError> {
        let c = self.lookup(index)?;
        let mut raw = [0u8; 4];
        let len = cache.read_bytes(c.field, &mut raw)?;

        let data = Vec::from_slice(&raw[..len]).map_err(|_| CacheError::ShortBuffer {
            expected: len,
            actual: raw.len(),
        })?;
        debug!("GET {} ({}) = {}", index, c.name, cache.get(c.field).as_i64());
        Ok(Response::Value { index, data })
    }
}
