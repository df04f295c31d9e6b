pub mod link;
pub mod traits;

pub use link::{DropReason, LinkEvent, WiredLink};
pub use traits::{DuplexTransport, TransportError};
