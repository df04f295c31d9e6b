//! Command parser for received frames

use crate::commands::types::{Command, DecodeError, Frame, Opcode};
use crate::config::protocol::{HEADER_SIZE, MAX_PAYLOAD, SYNC};

/// Parser for wired protocol frames
pub struct CommandParser;

impl CommandParser {
    /// Create a new command parser
    pub fn new() -> Self {
        Self
    }

    /// Parse one received frame
    ///
    /// Only the sync byte and opcode are validated here. The index is checked
    /// against the descriptor table by the dispatcher.
    pub fn parse(&self, frame: &Frame) -> Result<Command, DecodeError> {
        if frame[0] != SYNC {
            return Err(DecodeError::BadSync(frame[0]));
        }

        let index = frame[2];
        match Opcode::from_byte(frame[1]) {
            Some(Opcode::Set) => {
                let mut payload = [0u8; MAX_PAYLOAD];
                payload.copy_from_slice(&frame[HEADER_SIZE..]);
                Ok(Command::Set { index, payload })
            }
            Some(Opcode::Get) => Ok(Command::Get { index }),
            None => Err(DecodeError::UnknownOpcode(frame[1])),
        }
    }
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new()
    }
}
