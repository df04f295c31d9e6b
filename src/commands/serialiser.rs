//! Response serialiser
//!
//! Lays replies out in a full frame ready to be clocked out on the next
//! transaction.

use crate::commands::types::{Frame, Opcode, Response};
use crate::config::protocol::{FRAME_SIZE, HEADER_SIZE, SYNC};

/// Serialiser for reply frames
pub struct ResponseSerialiser;

impl ResponseSerialiser {
    /// Create a new response serialiser
    pub fn new() -> Self {
        Self
    }

    /// Serialise a response into a zero-filled frame
    pub fn serialise(&self, response: &Response) -> Frame {
        let mut frame = [0u8; FRAME_SIZE];
        frame[0] = SYNC;

        match response {
            Response::Value { index, data } => {
                frame[1] = Opcode::Get as u8;
                frame[2] = *index;
                frame[HEADER_SIZE..HEADER_SIZE + data.len()].copy_from_slice(data);
            }
        }

        frame
    }
}

impl Default for ResponseSerialiser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::Vec;

    #[test]
    fn test_serialise_value() {
        let serialiser = ResponseSerialiser::new();
        let mut data = Vec::new();
        data.extend_from_slice(&[0x78, 0x56, 0x34, 0x12]).unwrap();

        let frame = serialiser.serialise(&Response::Value { index: 14, data });

        assert_eq!(&frame[..7], &[0xA5, 0xC0, 14, 0x78, 0x56, 0x34, 0x12]);
        assert!(frame[7..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_serialise_single_byte() {
        let serialiser = ResponseSerialiser::new();
        let mut data = Vec::new();
        data.push(0x80).unwrap();

        let frame = serialiser.serialise(&Response::Value { index: 0, data });
        assert_eq!(&frame[..5], &[0xA5, 0xC0, 0, 0x80, 0]);
    }
}
