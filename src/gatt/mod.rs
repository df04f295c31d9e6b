//! Attribute database for the GEVCU parameters
//!
//! `descriptor` and `table` describe what is exposed, `compiler` turns that
//! into host records, and `server` drives the host stack through bring-up and
//! resolves client traffic with `handles`.

pub mod compiler;
pub mod descriptor;
pub mod handles;
pub mod host;
pub mod server;
pub mod table;

pub use compiler::{compile, CompileError, CompiledTable};
pub use descriptor::{Entry, Properties};
pub use host::{GapEvent, GattsEvent, GattsInterface, HostStack};
pub use server::{BringupError, BringupState, GattServer};
pub use table::GEVCU_TABLE;
