//! Cooperative cancellation for in-flight requests.
//!
//! An [`AbortController`] is owned by whoever may cancel a request; the
//! transport receives the matching [`AbortSignal`] and resolves with
//! [`TransportError::Cancelled`](super::TransportError::Cancelled) once it fires.

use tokio::sync::watch;

/// The owning side of a cancellation pair.
#[derive(Debug)]
pub struct AbortController {
    tx: watch::Sender<bool>,
    signal: AbortSignal,
}

impl Default for AbortController {
    fn default() -> Self {
        Self::new()
    }
}

impl AbortController {
    /// Creates a controller whose signal has not fired.
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            tx,
            signal: AbortSignal { rx },
        }
    }

    /// Returns a signal observing this controller.
    pub fn signal(&self) -> AbortSignal {
        self.signal.clone()
    }

    /// Fires the signal. Aborting twice is a no-op.
    pub fn abort(&self) {
        self.tx.send_replace(true);
    }

    /// Returns `true` once [`abort`](Self::abort) has been called.
    pub fn is_aborted(&self) -> bool {
        *self.tx.borrow()
    }
}

/// The observing side of a cancellation pair.
#[derive(Debug, Clone)]
pub struct AbortSignal {
    rx: watch::Receiver<bool>,
}

impl AbortSignal {
    /// Returns `true` if the signal has fired.
    pub fn is_aborted(&self) -> bool {
        *self.rx.borrow()
    }

    /// Completes when the signal fires.
    ///
    /// If the controller is dropped without aborting, this never completes.
    pub async fn aborted(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}
