//! One-shot "I'm ready" signal.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tokio::sync::Notify;

/// Single-resolution rendezvous between the player and a playback.
///
/// Any clone may [`fire`](Self::fire) it; only the first call has an effect.
/// [`wait`](Self::wait) resolves once the signal has fired, immediately if it
/// already has. A new signal is created for every playback.
#[derive(Clone, Debug, Default)]
pub struct InterruptSignal {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    fired: AtomicBool,
    notify: Notify,
}

impl InterruptSignal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the signal. Returns `true` only for the call that actually
    /// resolved it.
    pub fn fire(&self) -> bool {
        if self.inner.fired.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.inner.notify.notify_waiters();
        true
    }

    #[must_use]
    pub fn is_fired(&self) -> bool {
        self.inner.fired.load(Ordering::Acquire)
    }

    /// Wait until the signal fires
    pub async fn wait(&self) {
        // Registered before the flag check so a concurrent fire cannot be missed
        let notified = self.inner.notify.notified();
        if self.is_fired() {
            return;
        }
        notified.await;
    }
}
