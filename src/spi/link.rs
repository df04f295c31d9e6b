//! Wired link
//!
//! Runs the command protocol over a [`DuplexTransport`]. A GET reply cannot
//! go out in the transaction that carried the request, since both directions
//! are clocked at once, so it is staged and sent with the next transaction.
//! When nothing is staged the device sends zeros.

use log::{debug, log, warn, Level};

use crate::commands::{CommandParser, DecodeError, Frame, ResponseSerialiser};
use crate::config::protocol::{EXCHANGE_TIMEOUT_MS, FRAME_SIZE};
use crate::dispatcher::{CommandDispatcher, DispatchError};
use crate::gatt::descriptor::Entry;
use crate::params::ParameterCache;
use crate::spi::traits::{DuplexTransport, TransportError};

/// Why a transaction produced nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    Transport(TransportError),
    Decode(DecodeError),
    Dispatch(DispatchError),
}

/// Result of one transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEvent {
    /// Parameter stored
    Set { index: u8 },
    /// Reply staged for the next transaction
    Get { index: u8 },
    Dropped(DropReason),
}

pub struct WiredLink<'t> {
    parser: CommandParser,
    serialiser: ResponseSerialiser,
    dispatcher: CommandDispatcher<'t>,
    cache: &'t ParameterCache,
    pending: Option<Frame>,
}

impl<'t> WiredLink<'t> {
    pub fn new(entries: &'t [Entry], cache: &'t ParameterCache) -> Self {
        Self {
            parser: CommandParser::new(),
            serialiser: ResponseSerialiser::new(),
            dispatcher: CommandDispatcher::new(entries),
            cache,
            pending: None,
        }
    }

    /// Reply waiting for the next transaction
    pub fn pending(&self) -> Option<&Frame> {
        self.pending.as_ref()
    }

    /// Run one transaction and act on what the master sent
    ///
    /// A failed or short transaction leaves the cache untouched and keeps any
    /// staged reply for the next attempt.
    pub async fn poll<T: DuplexTransport>(&mut self, transport: &mut T) -> LinkEvent {
        let staged = self.pending.take();
        let tx = staged.unwrap_or([0u8; FRAME_SIZE]);
        let mut rx = [0u8; FRAME_SIZE];

        let received = match transport.exchange(&tx, &mut rx, EXCHANGE_TIMEOUT_MS).await {
            Ok(n) if n < FRAME_SIZE => Err(TransportError::Short(n)),
            other => other,
        };
        if let Err(e) = received {
            self.pending = staged;
            log!(failure_level(e), "Wired transaction failed: {:?}", e);
            return LinkEvent::Dropped(DropReason::Transport(e));
        }

        let command = match self.parser.parse(&rx) {
            Ok(command) => command,
            Err(e) => {
                debug!("Frame dropped: {:?}", e);
                return LinkEvent::Dropped(DropReason::Decode(e));
            }
        };

        let index = command.index();
        match self.dispatcher.dispatch(self.cache, command) {
            Ok(Some(response)) => {
                self.pending = Some(self.serialiser.serialise(&response));
                LinkEvent::Get { index }
            }
            Ok(None) => LinkEvent::Set { index },
            Err(e) => {
                warn!("Frame dropped: {:?}", e);
                LinkEvent::Dropped(DropReason::Dispatch(e))
            }
        }
    }
}

/// Timeouts are routine while the master is idle
fn failure_level(e: TransportError) -> Level {
    match e {
        TransportError::Timeout => Level::Trace,
        TransportError::Failed | TransportError::Short(_) => Level::Warn,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;
    use crate::gatt::table::GEVCU_TABLE;
    use crate::params::{fields, Value};
    use crate::spi::traits::mock::MockTransport;
    use futures::executor::block_on;

    const ZERO: Frame = [0u8; FRAME_SIZE];

    #[test]
    fn test_get_reply_goes_out_next_transaction() {
        let cache = ParameterCache::new();
        cache.set(fields::TIME_RUNNING, Value::U32(0x0102_0304));
        let mut link = WiredLink::new(GEVCU_TABLE, &cache);
        let mut transport = MockTransport::new();

        block_on(async {
            transport.queue_frame(Command::Get { index: 14 }.encode());
            transport.queue_frame(ZERO);

            assert_eq!(link.poll(&mut transport).await, LinkEvent::Get { index: 14 });
            assert!(link.pending().is_some());
            assert_eq!(
                link.poll(&mut transport).await,
                LinkEvent::Dropped(DropReason::Decode(DecodeError::BadSync(0)))
            );
        });

        let sent = transport.sent();
        assert_eq!(sent[0], ZERO);
        assert_eq!(&sent[1][..7], &[0xA5, 0xC0, 14, 0x04, 0x03, 0x02, 0x01]);
        assert!(link.pending().is_none());
    }

    #[test]
    fn test_set_stores_value() {
        let cache = ParameterCache::new();
        let mut link = WiredLink::new(GEVCU_TABLE, &cache);
        let mut transport = MockTransport::new();

        block_on(async {
            transport.queue_frame(Command::set(0, &(-300i16).to_le_bytes()).encode());
            assert_eq!(link.poll(&mut transport).await, LinkEvent::Set { index: 0 });
        });
        assert_eq!(cache.get(fields::TORQUE_REQUESTED), Value::I16(-300));
        assert!(link.pending().is_none());
    }

    #[test]
    fn test_bad_sync_never_mutates_cache() {
        let cache = ParameterCache::new();
        let mut link = WiredLink::new(GEVCU_TABLE, &cache);
        let mut transport = MockTransport::new();

        let mut frame = Command::set(0, &[0x34, 0x12]).encode();
        frame[0] = 0x5A;

        block_on(async {
            transport.queue_frame(frame);
            transport.queue_frame(ZERO);
            link.poll(&mut transport).await;
            link.poll(&mut transport).await;
        });

        assert_eq!(cache.load(fields::TORQUE_REQUESTED), 0);
        // No reply was staged
        assert_eq!(transport.sent()[1], ZERO);
    }

    #[test]
    fn test_timeout_keeps_staged_reply() {
        let cache = ParameterCache::new();
        cache.set(fields::GEAR, Value::U8(2));
        let mut link = WiredLink::new(GEVCU_TABLE, &cache);
        let mut transport = MockTransport::new();

        block_on(async {
            transport.queue_frame(Command::Get { index: 5 }.encode());
            link.poll(&mut transport).await;

            // Nothing scripted: times out
            assert_eq!(
                link.poll(&mut transport).await,
                LinkEvent::Dropped(DropReason::Transport(TransportError::Timeout))
            );
            assert!(link.pending().is_some());

            transport.queue_frame(ZERO);
            link.poll(&mut transport).await;
        });

        assert_eq!(&transport.sent()[1][..4], &[0xA5, 0xC0, 5, 2]);
    }

    #[test]
    fn test_only_timeouts_log_quietly() {
        assert_eq!(failure_level(TransportError::Timeout), Level::Trace);
        assert_eq!(failure_level(TransportError::Failed), Level::Warn);
        assert_eq!(failure_level(TransportError::Short(4)), Level::Warn);
    }

    #[test]
    fn test_short_transaction_is_dropped() {
        let cache = ParameterCache::new();
        let mut link = WiredLink::new(GEVCU_TABLE, &cache);
        let mut transport = MockTransport::new();

        block_on(async {
            transport.queue_partial(Command::set(0, &[0x01, 0x00]).encode(), 4);
            transport.queue_error(TransportError::Failed);

            assert_eq!(
                link.poll(&mut transport).await,
                LinkEvent::Dropped(DropReason::Transport(TransportError::Short(4)))
            );
            assert_eq!(
                link.poll(&mut transport).await,
                LinkEvent::Dropped(DropReason::Transport(TransportError::Failed))
            );
        });
        assert_eq!(cache.load(fields::TORQUE_REQUESTED), 0);
    }

    #[test]
    fn test_unknown_opcode_and_index() {
        let cache = ParameterCache::new();
        let mut link = WiredLink::new(GEVCU_TABLE, &cache);
        let mut transport = MockTransport::new();

        let mut bad_op = ZERO;
        bad_op[..3].copy_from_slice(&[0xA5, 0x22, 0]);

        block_on(async {
            transport.queue_frame(bad_op);
            transport.queue_frame(Command::Get { index: 200 }.encode());

            assert_eq!(
                link.poll(&mut transport).await,
                LinkEvent::Dropped(DropReason::Decode(DecodeError::UnknownOpcode(0x22)))
            );
            assert_eq!(
                link.poll(&mut transport).await,
                LinkEvent::Dropped(DropReason::Dispatch(DispatchError::IndexOutOfRange(200)))
            );
        });
        assert!(link.pending().is_none());
    }
}
