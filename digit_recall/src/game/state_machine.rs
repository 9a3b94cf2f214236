//! Recall game state machine.
//!
//! Owns the active sequence and moves between phases in response to player
//! intents and playback completions:
//!
//! ```text
//! Idle|Lost --start--> Showing --playback done--> Answering
//! Answering --correct--> Showing (next round, one digit longer)
//! Answering --wrong--> Lost
//! Showing|Answering --stop--> Idle
//! ```
//!
//! Playback runs on a spawned Tokio task that reports back through a channel.
//! Every report carries the [`RoundId`] it was started with and is dropped
//! unless that round is still the live one.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::{sync::Arc, time::Duration};
use tokio::{sync::mpsc, task::JoinHandle, time::sleep};

use super::digits::{DigitSource, RandomDigits};
use super::entities::{GameView, Mismatch, Phase, PlaybackReport, RoundId, Sequence};
use crate::config::PlaybackTiming;
use crate::player::{InterruptSignal, SequencePlayer, VisibleBuffer};
use crate::score::{ScoreTracker, StreakUpdate};
use crate::settings::{Settings, SettingsCandidate, SettingsStore};
use crate::storage::KeyValueStore;

/// Result of submitting an answer
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum SubmitOutcome {
    /// Not answering, or the input contained no digits
    Ignored,
    /// Answer matched; the next round is starting
    Correct(StreakUpdate),
    /// Answer did not match; the game is over
    Wrong(Mismatch),
}

/// One game session: settings, score, the active sequence and its playback.
pub struct GameStateMachine {
    settings: SettingsStore,
    score: ScoreTracker,
    player: SequencePlayer,
    settle: Duration,
    digits: Box<dyn DigitSource>,
    phase: Phase,
    sequence: Sequence,
    round: RoundId,
    signal: Option<InterruptSignal>,
    playback: Option<JoinHandle<()>>,
    display: VisibleBuffer,
    mismatch: Option<Mismatch>,
    reports_tx: mpsc::UnboundedSender<PlaybackReport>,
    reports_rx: mpsc::UnboundedReceiver<PlaybackReport>,
}

impl GameStateMachine {
    /// Create a session with random digits
    pub fn new(store: Arc<dyn KeyValueStore>, timing: PlaybackTiming) -> Self {
        Self::with_digits(store, timing, Box::new(RandomDigits::new()))
    }

    /// Create a session drawing digits from `digits`
    pub fn with_digits(
        store: Arc<dyn KeyValueStore>,
        timing: PlaybackTiming,
        digits: Box<dyn DigitSource>,
    ) -> Self {
        let (reports_tx, reports_rx) = mpsc::unbounded_channel();

        Self {
            settings: SettingsStore::load(store.clone()),
            score: ScoreTracker::new(store),
            player: SequencePlayer::new(timing),
            settle: timing.settle,
            digits,
            phase: Phase::Idle,
            sequence: Sequence::new(),
            round: 0,
            signal: None,
            playback: None,
            display: VisibleBuffer::new(),
            mismatch: None,
            reports_tx,
            reports_rx,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub const fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    #[must_use]
    pub const fn round(&self) -> RoundId {
        self.round
    }

    #[must_use]
    pub fn settings(&self) -> Settings {
        self.settings.get()
    }

    #[must_use]
    pub const fn current_streak(&self) -> u32 {
        self.score.current()
    }

    #[must_use]
    pub const fn best_streak(&self) -> u32 {
        self.score.current_best()
    }

    #[must_use]
    pub const fn mismatch(&self) -> Option<&Mismatch> {
        self.mismatch.as_ref()
    }

    #[must_use]
    pub const fn display(&self) -> &VisibleBuffer {
        &self.display
    }

    /// Snapshot for presentation
    #[must_use]
    pub fn view(&self) -> GameView {
        GameView {
            phase: self.phase,
            visible: self.display.snapshot(),
            sequence_len: self.sequence.len(),
            current_streak: self.score.current(),
            best_streak: self.score.current_best(),
            settings: self.settings.get(),
            mismatch: self.mismatch.clone(),
        }
    }

    /// Start a new game. Must be called from within a Tokio runtime.
    ///
    /// Returns `false` (and does nothing) unless idle or lost.
    pub fn start(&mut self) -> bool {
        if !self.phase.is_idle() {
            debug!("Ignoring start while {}", self.phase);
            return false;
        }

        self.score.reset();
        self.mismatch = None;
        self.sequence = Sequence::starting_with(self.digits.next_digit());
        self.round += 1;
        info!("Game started (round {})", self.round);

        self.begin_playback(Duration::ZERO);
        true
    }

    /// Signal that the player is ready to answer.
    ///
    /// Returns `true` only if this call resolved the live playback signal.
    pub fn interrupt(&mut self) -> bool {
        if self.phase != Phase::Showing {
            debug!("Ignoring interrupt while {}", self.phase);
            return false;
        }

        self.signal.as_ref().is_some_and(InterruptSignal::fire)
    }

    /// Grade `answer` against the current sequence.
    ///
    /// Non-digit characters are dropped before comparison; an answer with no
    /// digits left is ignored.
    pub fn submit_answer(&mut self, answer: &str) -> SubmitOutcome {
        if self.phase != Phase::Answering {
            debug!("Ignoring answer while {}", self.phase);
            return SubmitOutcome::Ignored;
        }

        let entered: String = answer.chars().filter(char::is_ascii_digit).collect();
        if entered.is_empty() {
            return SubmitOutcome::Ignored;
        }

        let expected = self.sequence.joined();
        if entered == expected {
            let update = self.score.increment();
            if update.is_new_record() {
                info!("New best streak: {}", update.best);
            }

            let next = self.digits.next_digit();
            self.sequence.push(next);
            self.round += 1;
            self.begin_playback(self.settle);

            SubmitOutcome::Correct(update)
        } else {
            let mismatch = Mismatch { expected, entered };
            info!(
                "Game over at streak {}: {}",
                self.score.current(),
                mismatch
            );

            self.round += 1;
            self.sequence.clear();
            self.mismatch = Some(mismatch.clone());
            self.phase = Phase::Lost;

            SubmitOutcome::Wrong(mismatch)
        }
    }

    /// Abandon the current game.
    ///
    /// Any in-flight playback is aborted on a best-effort basis; its report,
    /// should one still arrive, belongs to a dead round and is discarded.
    pub fn stop(&mut self) -> bool {
        if !matches!(self.phase, Phase::Showing | Phase::Answering) {
            debug!("Ignoring stop while {}", self.phase);
            return false;
        }

        self.round += 1;
        self.cancel_playback();
        self.sequence.clear();
        self.display.clear();
        self.phase = Phase::Idle;
        info!("Game stopped");
        true
    }

    /// Normalize and persist new settings. Takes effect from the next playback.
    pub fn apply_settings(&mut self, candidate: &SettingsCandidate) -> Settings {
        let settings = self.settings.apply(candidate);
        info!(
            "Settings applied: mode={}, reveal={}ms, goal={}",
            settings.mode, settings.reveal_interval_ms, settings.goal
        );
        settings
    }

    /// Next playback report. Pending forever while nothing is playing.
    pub async fn next_report(&mut self) -> Option<PlaybackReport> {
        self.reports_rx.recv().await
    }

    /// Apply a playback report. Returns whether it moved the game to
    /// [`Phase::Answering`]; stale reports are dropped.
    pub fn on_playback_finished(&mut self, report: PlaybackReport) -> bool {
        if report.round != self.round || self.phase != Phase::Showing {
            debug!(
                "Discarding playback report for round {} (live round {}, {})",
                report.round, self.round, self.phase
            );
            return false;
        }

        debug!("Round {} playback ended: {:?}", report.round, report.outcome);
        self.playback = None;
        self.signal = None;
        self.display.clear();
        self.phase = Phase::Answering;
        true
    }

    /// Wait for the next playback report and apply it
    pub async fn await_playback(&mut self) -> bool {
        match self.next_report().await {
            Some(report) => self.on_playback_finished(report),
            None => false,
        }
    }

    fn begin_playback(&mut self, settle: Duration) {
        self.cancel_playback();
        self.display.clear();

        let signal = InterruptSignal::new();
        let settings = self.settings.get();
        let digits = self.sequence.digits().to_vec();
        let player = self.player;
        let display = self.display.clone();
        let reports = self.reports_tx.clone();
        let round = self.round;
        let task_signal = signal.clone();

        self.playback = Some(tokio::spawn(async move {
            if !settle.is_zero() {
                sleep(settle).await;
            }

            let outcome = player
                .play(
                    &digits,
                    settings.reveal_interval(),
                    settings.mode,
                    &task_signal,
                    &display,
                )
                .await;

            if reports.send(PlaybackReport { round, outcome }).is_err() {
                debug!("Round {round} finished after its session was dropped");
            }
        }));

        self.signal = Some(signal);
        self.phase = Phase::Showing;
    }

    fn cancel_playback(&mut self) {
        if let Some(handle) = self.playback.take() {
            handle.abort();
        }
        self.signal = None;
    }
}

impl Drop for GameStateMachine {
    fn drop(&mut self) {
        self.cancel_playback();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::digits::ScriptedDigits;
    use crate::player::PlaybackOutcome;
    use crate::score::BEST_STREAK_KEY;
    use crate::storage::MemoryStore;

    fn machine_with(store: Arc<MemoryStore>, script: &[u8]) -> GameStateMachine {
        GameStateMachine::with_digits(
            store,
            PlaybackTiming::default(),
            Box::new(ScriptedDigits::from_values(script)),
        )
    }

    fn machine(script: &[u8]) -> GameStateMachine {
        machine_with(Arc::new(MemoryStore::new()), script)
    }

    async fn reach_answering(machine: &mut GameStateMachine) {
        assert_eq!(machine.phase(), Phase::Showing);
        machine.interrupt();
        assert!(machine.await_playback().await);
        assert_eq!(machine.phase(), Phase::Answering);
    }

    #[test]
    fn test_new_machine_is_idle() {
        let machine = machine(&[1]);
        let view = machine.view();

        assert_eq!(view.phase, Phase::Idle);
        assert!(view.visible.is_empty());
        assert_eq!(view.sequence_len, 0);
        assert_eq!(view.current_streak, 0);
        assert_eq!(view.mismatch, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_shows_single_digit() {
        let mut machine = machine(&[7]);

        assert!(machine.start());
        assert_eq!(machine.phase(), Phase::Showing);
        assert_eq!(machine.sequence().joined(), "7");
        assert_eq!(machine.round(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_ignored_while_playing() {
        let mut machine = machine(&[7, 1]);
        machine.start();

        assert!(!machine.start());
        assert_eq!(machine.sequence().joined(), "7");
        assert_eq!(machine.round(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_correct_answer_advances_round() {
        let mut machine = machine(&[7, 4]);
        machine.start();
        reach_answering(&mut machine).await;

        let outcome = machine.submit_answer("7");

        assert!(matches!(outcome, SubmitOutcome::Correct(update) if update.current == 1));
        assert_eq!(machine.phase(), Phase::Showing);
        assert_eq!(machine.current_streak(), 1);
        assert_eq!(machine.sequence().joined(), "74");
    }

    #[tokio::test(start_paused = true)]
    async fn test_wrong_answer_loses() {
        let mut machine = machine(&[3]);
        machine.start();
        reach_answering(&mut machine).await;

        let outcome = machine.submit_answer("9");

        let expected = Mismatch {
            expected: "3".to_string(),
            entered: "9".to_string(),
        };
        assert_eq!(outcome, SubmitOutcome::Wrong(expected.clone()));
        assert_eq!(machine.phase(), Phase::Lost);
        assert_eq!(machine.mismatch(), Some(&expected));
    }

    #[tokio::test(start_paused = true)]
    async fn test_streak_survives_loss_until_next_start() {
        let mut machine = machine(&[2, 2, 5]);
        machine.start();
        reach_answering(&mut machine).await;
        machine.submit_answer("2");
        reach_answering(&mut machine).await;
        machine.submit_answer("21");

        assert_eq!(machine.phase(), Phase::Lost);
        assert_eq!(machine.current_streak(), 1);

        assert!(machine.start());
        assert_eq!(machine.current_streak(), 0);
        assert_eq!(machine.mismatch(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_answer_filters_non_digits() {
        let mut machine = machine(&[1, 2]);
        machine.start();
        reach_answering(&mut machine).await;

        assert!(matches!(
            machine.submit_answer(" 1\n"),
            SubmitOutcome::Correct(_)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_answer_is_noop() {
        let mut machine = machine(&[1]);
        machine.start();
        reach_answering(&mut machine).await;

        assert_eq!(machine.submit_answer(""), SubmitOutcome::Ignored);
        assert_eq!(machine.submit_answer("abc"), SubmitOutcome::Ignored);
        assert_eq!(machine.phase(), Phase::Answering);
    }

    #[tokio::test(start_paused = true)]
    async fn test_answer_while_showing_is_ignored() {
        let mut machine = machine(&[1]);
        machine.start();

        assert_eq!(machine.submit_answer("1"), SubmitOutcome::Ignored);
        assert_eq!(machine.phase(), Phase::Showing);
    }

    #[test]
    fn test_interrupt_while_idle_is_ignored() {
        let mut machine = machine(&[1]);
        assert!(!machine.interrupt());
        assert_eq!(machine.phase(), Phase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_interrupt_has_no_effect() {
        let mut machine = machine(&[6]);
        machine.start();

        assert!(machine.interrupt());
        assert!(!machine.interrupt());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_discards_stale_report() {
        let mut machine = machine(&[5, 5]);
        machine.start();
        let stale_round = machine.round();

        assert!(machine.stop());
        assert_eq!(machine.phase(), Phase::Idle);
        assert!(machine.sequence().is_empty());

        let applied = machine.on_playback_finished(PlaybackReport {
            round: stale_round,
            outcome: PlaybackOutcome::FullyShown,
        });

        assert!(!applied);
        assert_eq!(machine.phase(), Phase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_report_from_previous_round_is_discarded() {
        let mut machine = machine(&[1, 2]);
        machine.start();
        reach_answering(&mut machine).await;
        machine.submit_answer("1");

        let applied = machine.on_playback_finished(PlaybackReport {
            round: machine.round() - 1,
            outcome: PlaybackOutcome::FullyShown,
        });

        assert!(!applied);
        assert_eq!(machine.phase(), Phase::Showing);
    }

    #[test]
    fn test_stop_while_idle_is_ignored() {
        let mut machine = machine(&[1]);
        assert!(!machine.stop());
    }

    #[tokio::test(start_paused = true)]
    async fn test_best_streak_persisted() {
        let store = Arc::new(MemoryStore::new());
        let mut machine = machine_with(store.clone(), &[1, 2, 3]);
        machine.start();
        reach_answering(&mut machine).await;
        machine.submit_answer("1");
        reach_answering(&mut machine).await;
        machine.submit_answer("12");

        assert_eq!(machine.best_streak(), 2);
        assert_eq!(store.get(BEST_STREAK_KEY).as_deref(), Some("2"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_visible_buffer_cleared_when_answering() {
        let mut machine = machine(&[4, 4]);
        machine.start();
        machine.interrupt();

        let report = machine.next_report().await.unwrap();
        assert_eq!(machine.display().snapshot().len(), 1);

        machine.on_playback_finished(report);
        assert!(machine.view().visible.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_settings_apply_in_any_phase() {
        let mut machine = machine(&[1]);
        machine.start();

        let settings = machine.apply_settings(&SettingsCandidate {
            mode: "speed".to_string(),
            reveal_interval_ms: 5000,
            goal: 200,
        });

        assert_eq!(settings.reveal_interval_ms, 3000);
        assert_eq!(machine.view().goal(), 99);
        assert_eq!(machine.phase(), Phase::Showing);
    }
}
