//! Wired link task
//!
//! Runs the command protocol for as long as the device is up. Transport and
//! decode failures only cost the transaction they happened in.

use embassy_time::{Duration, Timer};
use log::info;

use crate::gatt::descriptor::Entry;
use crate::params::ParameterCache;
use crate::spi::{DropReason, DuplexTransport, LinkEvent, TransportError, WiredLink};

/// Pause after a driver failure before the next transaction is armed
const FAILURE_BACKOFF_MS: u64 = 10;

/// Task that serves SET/GET frames from the bus master
pub async fn wired_task<T: DuplexTransport>(
    mut transport: T,
    entries: &'static [Entry],
    cache: &'static ParameterCache,
) {
    let mut link = WiredLink::new(entries, cache);
    info!("Wired link up");

    loop {
        let event = link.poll(&mut transport).await;
        if event == LinkEvent::Dropped(DropReason::Transport(TransportError::Failed)) {
            Timer::after(Duration::from_millis(FAILURE_BACKOFF_MS)).await;
        }
    }
}
