//! GATT event task
//!
//! Host stack callbacks post their notifications into the channels below;
//! this task feeds them to the [`GattServer`] one at a time, so bring-up and
//! attribute handling never run concurrently with each other.

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, TrySendError};
use log::{error, warn};

use crate::gatt::descriptor::Entry;
use crate::gatt::host::{GapEvent, GattsEvent, GattsInterface, HostStack};
use crate::gatt::server::GattServer;
use crate::params::ParameterCache;

/// Channel capacity for attribute server notifications
const GATTS_CHANNEL_SIZE: usize = 8;

/// Channel capacity for advertising notifications
const GAP_CHANNEL_SIZE: usize = 4;

/// Attribute server notifications from the host stack
pub static GATTS_CHANNEL: Channel<
    CriticalSectionRawMutex,
    (GattsInterface, GattsEvent),
    GATTS_CHANNEL_SIZE,
> = Channel::new();

/// Advertising notifications from the host stack
pub static GAP_CHANNEL: Channel<CriticalSectionRawMutex, GapEvent, GAP_CHANNEL_SIZE> =
    Channel::new();

/// Post an attribute server notification from a host stack callback
///
/// Never blocks. Returns false when the notification had to be dropped.
pub fn post_gatts_event(interface: GattsInterface, event: GattsEvent) -> bool {
    match GATTS_CHANNEL.try_send((interface, event)) {
        Ok(()) => true,
        Err(TrySendError::Full((_, event))) => {
            if event.drives_bringup() {
                error!("GATTS {} dropped, channel full; bring-up stalls", event.kind());
            } else {
                warn!("GATTS {} dropped, channel full", event.kind());
            }
            false
        }
    }
}

/// Post an advertising notification from a host stack callback
pub fn post_gap_event(event: GapEvent) -> bool {
    let posted = GAP_CHANNEL.try_send(event).is_ok();
    if !posted {
        warn!("GAP {:?} dropped, channel full", event);
    }
    posted
}

/// Task that owns the GATT server
pub async fn gatt_task<S: HostStack>(
    mut stack: S,
    entries: &'static [Entry],
    cache: &'static ParameterCache,
) {
    let mut server = match GattServer::new(entries, cache) {
        Ok(server) => server,
        Err(e) => {
            error!("Descriptor table rejected: {:?}", e);
            return;
        }
    };
    server.start(&mut stack);

    loop {
        match select(GATTS_CHANNEL.receive(), GAP_CHANNEL.receive()).await {
            Either::First((interface, event)) => {
                server.handle_gatts_event(interface, &event, &mut stack);
            }
            Either::Second(event) => {
                server.handle_gap_event(&event, &mut stack);
            }
        }
    }
}
