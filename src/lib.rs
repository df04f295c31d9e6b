#![cfg_attr(not(test), no_std)]

pub mod commands;
pub mod config;
pub mod dispatcher;
pub mod gatt;
pub mod params;
pub mod spi;

// Event pumps depend on embassy and are only built for the target
#[cfg(feature = "embedded")]
pub mod tasks;
