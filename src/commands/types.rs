//! Command and response types for the wired protocol
//!
//! # Frame Format
//!
//! Every transaction carries exactly one 32-byte frame in each direction:
//! ```text
//! [sync: u8 = 0xA5][opcode: u8][index: u8][payload: [u8; 29]]
//! ```
//!
//! - `opcode`: `0x40` SET or `0xC0` GET
//! - `index`: position of the parameter among the table's characteristics
//!   (group markers are not counted)
//! - `payload`: SET carries the value little-endian in its first bytes, GET
//!   ignores it on request and carries the value on reply
//!
//! There is no length or checksum field: the value length comes from the
//! indexed characteristic.

use crate::config::protocol::{FRAME_SIZE, HEADER_SIZE, MAX_PAYLOAD, OP_GET, OP_SET, SYNC};
use heapless::Vec;

/// One fixed-size transaction buffer
pub type Frame = [u8; FRAME_SIZE];

/// Opcodes for the wired protocol
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    /// Store the payload into the indexed parameter (0x40)
    ///
    /// - Response: none
    Set = OP_SET,

    /// Read back the indexed parameter (0xC0)
    ///
    /// - Response: [`Response::Value`]
    Get = OP_GET,
}

impl Opcode {
    /// Try to convert a byte to an Opcode
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            OP_SET => Some(Self::Set),
            OP_GET => Some(Self::Get),
            _ => None,
        }
    }
}

/// Decoded command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set { index: u8, payload: [u8; MAX_PAYLOAD] },
    Get { index: u8 },
}

impl Command {
    pub fn opcode(&self) -> Opcode {
        match self {
            Command::Set { .. } => Opcode::Set,
            Command::Get { .. } => Opcode::Get,
        }
    }

    pub fn index(&self) -> u8 {
        match self {
            Command::Set { index, .. } | Command::Get { index } => *index,
        }
    }

    /// SET carrying `value` in the first payload bytes
    pub fn set(index: u8, value: &[u8]) -> Self {
        let mut payload = [0u8; MAX_PAYLOAD];
        let len = value.len().min(MAX_PAYLOAD);
        payload[..len].copy_from_slice(&value[..len]);
        Command::Set { index, payload }
    }

    /// Frame as the bus master would send it
    pub fn encode(&self) -> Frame {
        let mut frame = [0u8; FRAME_SIZE];
        frame[0] = SYNC;
        frame[1] = self.opcode() as u8;
        frame[2] = self.index();
        if let Command::Set { payload, .. } = self {
            frame[HEADER_SIZE..].copy_from_slice(payload);
        }
        frame
    }
}

/// Reasons a received frame is dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// First byte was not the sync marker
    BadSync(u8),
    UnknownOpcode(u8),
}

/// Reply staged for the bus master
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Current value of a parameter, little-endian
    ///
    /// Frame: `[0xA5][0xC0][index][value...][zero fill]`
    Value { index: u8, data: Vec<u8, 4> },
}
