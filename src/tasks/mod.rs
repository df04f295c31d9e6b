//! Embassy tasks module
//!
//! The firmware binary spawns one of each, sharing a `'static` descriptor
//! table and parameter cache.

pub mod gatt;
pub mod wired;

pub use gatt::{gatt_task, post_gap_event, post_gatts_event, GAP_CHANNEL, GATTS_CHANNEL};
pub use wired::wired_task;
