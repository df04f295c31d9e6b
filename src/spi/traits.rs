//! Duplex transport trait for abstraction and testability
//!
//! The device is the slave on the wired bus: every transaction clocks one
//! frame out of the send buffer while clocking one frame into the receive
//! buffer, at a time of the master's choosing.

use core::future::Future;

use crate::commands::types::Frame;

/// Errors that can occur during a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// Master did not clock a transaction in time
    Timeout,
    /// Driver reported a failure
    Failed,
    /// Transaction ended after this many bytes
    Short(usize),
}

/// Abstract duplex transport for testability
pub trait DuplexTransport {
    /// Run one transaction
    ///
    /// Sends `tx` while receiving into `rx`, waiting at most `timeout_ms` for
    /// the master. Returns the number of bytes actually received.
    fn exchange(
        &mut self,
        tx: &Frame,
        rx: &mut Frame,
        timeout_ms: u32,
    ) -> impl Future<Output = Result<usize, TransportError>>;
}

#[cfg(test)]
pub mod mock {
    //! Mock duplex transport for testing

    use super::*;
    use crate::config::protocol::FRAME_SIZE;
    use core::cell::RefCell;
    use heapless::{Deque, Vec};

    /// One scripted transaction
    #[derive(Debug, Clone, Copy)]
    enum Scripted {
        Frame(Frame, usize),
        Error(TransportError),
    }

    /// Mock transport for unit testing
    pub struct MockTransport {
        /// Transactions to replay, oldest first
        script: RefCell<Deque<Scripted, 16>>,
        /// Frames sent, one per transaction
        sent: RefCell<Vec<Frame, 16>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self {
                script: RefCell::new(Deque::new()),
                sent: RefCell::new(Vec::new()),
            }
        }

        /// Queue a full frame from the master
        pub fn queue_frame(&self, frame: Frame) {
            let _ = self.script.borrow_mut().push_back(Scripted::Frame(frame, FRAME_SIZE));
        }

        /// Queue a transaction that ends after `len` bytes
        pub fn queue_partial(&self, frame: Frame, len: usize) {
            let _ = self.script.borrow_mut().push_back(Scripted::Frame(frame, len));
        }

        /// Queue a failed transaction
        pub fn queue_error(&self, error: TransportError) {
            let _ = self.script.borrow_mut().push_back(Scripted::Error(error));
        }

        /// Frames sent so far
        pub fn sent(&self) -> Vec<Frame, 16> {
            self.sent.borrow().clone()
        }
    }

    impl Default for MockTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    impl DuplexTransport for MockTransport {
        async fn exchange(
            &mut self,
            tx: &Frame,
            rx: &mut Frame,
            _timeout_ms: u32,
        ) -> Result<usize, TransportError> {
            // Nothing scripted: the master never showed up
            let step = self
                .script
                .borrow_mut()
                .pop_front()
                .unwrap_or(Scripted::Error(TransportError::Timeout));

            match step {
                Scripted::Error(e) => Err(e),
                Scripted::Frame(frame, len) => {
                    let _ = self.sent.borrow_mut().push(*tx);
                    rx[..len].copy_from_slice(&frame[..len]);
                    Ok(len)
                }
            }
        }
    }
}
