pub mod parser;
pub mod serialiser;
pub mod types;

pub use parser::CommandParser;
pub use serialiser::ResponseSerialiser;
pub use types::{Command, DecodeError, Frame, Opcode, Response};
