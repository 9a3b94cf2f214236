//! Digits currently on screen.

use crate::game::entities::Digit;
use std::sync::Arc;
use tokio::sync::watch;

/// Cumulative buffer of the digits shown so far in the current playback.
///
/// Backed by a watch channel so presentation adapters can
/// [`subscribe`](Self::subscribe) and redraw on every change.
#[derive(Clone, Debug)]
pub struct VisibleBuffer {
    sender: Arc<watch::Sender<Vec<Digit>>>,
}

impl Default for VisibleBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl VisibleBuffer {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(Vec::new());
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn push(&self, digit: Digit) {
        self.sender.send_modify(|digits| digits.push(digit));
    }

    pub fn clear(&self) {
        self.sender.send_if_modified(|digits| {
            let changed = !digits.is_empty();
            digits.clear();
            changed
        });
    }

    #[must_use]
    pub fn snapshot(&self) -> Vec<Digit> {
        self.sender.borrow().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sender.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sender.borrow().is_empty()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<Digit>> {
        self.sender.subscribe()
    }
}
