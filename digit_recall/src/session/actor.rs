//! Session actor implementation with async message handling.

use super::{
    errors::{SessionError, SessionResult},
    messages::{SessionId, SessionMessage, SubscriberId},
};
use crate::game::{Digit, GameStateMachine, GameView, SubmitOutcome};
use crate::settings::{Settings, SettingsCandidate};
use std::collections::HashMap;
use tokio::sync::{mpsc, oneshot, watch};
use uuid::Uuid;

/// Session actor handle for sending messages
#[derive(Clone, Debug)]
pub struct SessionHandle {
    sender: mpsc::Sender<SessionMessage>,
    session_id: SessionId,
}

impl SessionHandle {
    /// Create a new session handle
    pub fn new(sender: mpsc::Sender<SessionMessage>, session_id: SessionId) -> Self {
        Self { sender, session_id }
    }

    /// Get session ID
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Send a message to the session
    pub async fn send(&self, message: SessionMessage) -> SessionResult<()> {
        self.sender
            .send(message)
            .await
            .map_err(|_| SessionError::Closed(self.session_id))
    }

    async fn request<T>(
        &self,
        message: impl FnOnce(oneshot::Sender<T>) -> SessionMessage,
    ) -> SessionResult<T> {
        let (response, rx) = oneshot::channel();
        self.send(message(response)).await?;
        rx.await.map_err(|_| SessionError::Closed(self.session_id))
    }

    /// Start a new game; `false` if one is already running
    pub async fn start(&self) -> SessionResult<bool> {
        self.request(|response| SessionMessage::Start { response })
            .await
    }

    /// Signal readiness; `false` if it had no effect
    pub async fn interrupt(&self) -> SessionResult<bool> {
        self.request(|response| SessionMessage::Interrupt { response })
            .await
    }

    /// Submit a typed answer
    pub async fn submit_answer(&self, answer: impl Into<String>) -> SessionResult<SubmitOutcome> {
        let answer = answer.into();
        self.request(|response| SessionMessage::SubmitAnswer { answer, response })
            .await
    }

    /// Abandon the current game; `false` if none was running
    pub async fn stop(&self) -> SessionResult<bool> {
        self.request(|response| SessionMessage::Stop { response })
            .await
    }

    /// Apply settings, returning what was actually stored
    pub async fn apply_settings(&self, candidate: SettingsCandidate) -> SessionResult<Settings> {
        self.request(|response| SessionMessage::ApplySettings {
            candidate,
            response,
        })
        .await
    }

    /// Get the current view
    pub async fn view(&self) -> SessionResult<GameView> {
        self.request(|response| SessionMessage::GetView { response })
            .await
    }

    /// Receiver that updates every time a digit appears or the screen clears
    pub async fn watch_display(&self) -> SessionResult<watch::Receiver<Vec<Digit>>> {
        self.request(|response| SessionMessage::WatchDisplay { response })
            .await
    }

    /// Subscribe to view changes. Notifications are dropped, not queued,
    /// once `capacity` views are pending.
    pub async fn subscribe(
        &self,
        capacity: usize,
    ) -> SessionResult<(SubscriberId, mpsc::Receiver<GameView>)> {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let subscriber_id = Uuid::new_v4();
        self.send(SessionMessage::Subscribe {
            subscriber_id,
            sender,
        })
        .await?;
        Ok((subscriber_id, receiver))
    }

    /// Stop receiving view changes
    pub async fn unsubscribe(&self, subscriber_id: SubscriberId) -> SessionResult<()> {
        self.send(SessionMessage::Unsubscribe { subscriber_id })
            .await
    }

    /// Shut the session down
    pub async fn close(&self) -> SessionResult<()> {
        self.send(SessionMessage::Close).await
    }
}

/// Session actor owning a single game
pub struct SessionActor {
    /// Session ID
    id: SessionId,

    /// Game state machine
    machine: GameStateMachine,

    /// Message inbox
    inbox: mpsc::Receiver<SessionMessage>,

    /// Is session closed
    is_closed: bool,

    /// Subscribers for view change notifications
    subscribers: HashMap<SubscriberId, mpsc::Sender<GameView>>,
}

impl SessionActor {
    /// Create a new session actor
    ///
    /// # Returns
    ///
    /// * `(SessionActor, SessionHandle)` - Actor and handle for sending messages
    pub fn new(machine: GameStateMachine) -> (Self, SessionHandle) {
        let (sender, inbox) = mpsc::channel(100);
        let id = Uuid::new_v4();

        let actor = Self {
            id,
            machine,
            inbox,
            is_closed: false,
            subscribers: HashMap::new(),
        };

        (actor, SessionHandle::new(sender, id))
    }

    /// Spawn the actor on the current runtime and return its handle
    pub fn spawn(machine: GameStateMachine) -> SessionHandle {
        let (actor, handle) = Self::new(machine);
        tokio::spawn(actor.run());
        handle
    }

    /// Run the session actor event loop
    pub async fn run(mut self) {
        log::info!("Session {} starting", self.id);

        loop {
            tokio::select! {
                message = self.inbox.recv() => {
                    match message {
                        Some(message) => self.handle_message(message),
                        // Every handle is gone
                        None => break,
                    }

                    if self.is_closed {
                        break;
                    }
                }

                Some(report) = self.machine.next_report() => {
                    if self.machine.on_playback_finished(report) {
                        self.notify_view_change();
                    }
                }
            }
        }

        self.machine.stop();
        log::info!("Session {} closed", self.id);
    }

    /// Handle a session message
    fn handle_message(&mut self, message: SessionMessage) {
        match message {
            SessionMessage::Start { response } => {
                let started = self.machine.start();
                if started {
                    self.notify_view_change();
                }
                let _ = response.send(started);
            }

            SessionMessage::Interrupt { response } => {
                let _ = response.send(self.machine.interrupt());
            }

            SessionMessage::SubmitAnswer { answer, response } => {
                let outcome = self.machine.submit_answer(&answer);
                if outcome != SubmitOutcome::Ignored {
                    self.notify_view_change();
                }
                let _ = response.send(outcome);
            }

            SessionMessage::Stop { response } => {
                let stopped = self.machine.stop();
                if stopped {
                    self.notify_view_change();
                }
                let _ = response.send(stopped);
            }

            SessionMessage::ApplySettings {
                candidate,
                response,
            } => {
                let settings = self.machine.apply_settings(&candidate);
                self.notify_view_change();
                let _ = response.send(settings);
            }

            SessionMessage::GetView { response } => {
                let _ = response.send(self.machine.view());
            }

            SessionMessage::WatchDisplay { response } => {
                let _ = response.send(self.machine.display().subscribe());
            }

            SessionMessage::Subscribe {
                subscriber_id,
                sender,
            } => {
                self.subscribers.insert(subscriber_id, sender);
                log::debug!("Subscriber {} joined session {}", subscriber_id, self.id);
            }

            SessionMessage::Unsubscribe { subscriber_id } => {
                self.subscribers.remove(&subscriber_id);
                log::debug!("Subscriber {} left session {}", subscriber_id, self.id);
            }

            SessionMessage::Close => {
                self.is_closed = true;
            }
        }
    }

    /// Broadcast the current view to all subscribers
    fn notify_view_change(&mut self) {
        if self.subscribers.is_empty() {
            return;
        }

        let view = self.machine.view();
        self.subscribers.retain(|subscriber_id, sender| {
            match sender.try_send(view.clone()) {
                Ok(()) => true,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    log::warn!("Subscriber {subscriber_id} channel full, dropping view");
                    true
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    log::debug!("Subscriber {subscriber_id} disconnected, removing");
                    false
                }
            }
        });
    }
}
