//! Session actor message types.

use crate::game::{Digit, GameView, SubmitOutcome};
use crate::settings::{Settings, SettingsCandidate};
use tokio::sync::{mpsc, oneshot, watch};
use uuid::Uuid;

pub type SessionId = Uuid;
pub type SubscriberId = Uuid;

/// Messages that can be sent to a SessionActor
#[derive(Debug)]
pub enum SessionMessage {
    /// Start a new game
    Start { response: oneshot::Sender<bool> },

    /// Player is ready to answer
    Interrupt { response: oneshot::Sender<bool> },

    /// Player typed an answer
    SubmitAnswer {
        answer: String,
        response: oneshot::Sender<SubmitOutcome>,
    },

    /// Abandon the current game
    Stop { response: oneshot::Sender<bool> },

    /// Change difficulty settings
    ApplySettings {
        candidate: SettingsCandidate,
        response: oneshot::Sender<Settings>,
    },

    /// Get the current view
    GetView { response: oneshot::Sender<GameView> },

    /// Get a receiver for the visible digits
    WatchDisplay {
        response: oneshot::Sender<watch::Receiver<Vec<Digit>>>,
    },

    /// Subscribe to view change notifications
    Subscribe {
        subscriber_id: SubscriberId,
        sender: mpsc::Sender<GameView>,
    },

    /// Unsubscribe from view change notifications
    Unsubscribe { subscriber_id: SubscriberId },

    /// Shut the session down
    Close,
}
