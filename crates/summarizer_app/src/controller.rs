//! The owned submission workflow: one state cell, one writer.

use std::sync::mpsc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use summarizer_core::{
    update, AppState, Msg, SubmissionError, SubmissionId, SubmissionState, SubmissionView,
    SubmitError,
};
use summarizer_engine::{ClientSettings, EngineError, EngineHandle};
use summarizer_logging::{app_debug, app_info, app_warn};

use crate::effects::EffectRunner;

/// Owns the submission state and the engine that serves it.
///
/// Readers either poll [`SubmissionController::view`] or take a receiver from
/// [`SubmissionController::subscribe`], which gets a fresh view every time
/// something visible changes. Completions are only applied when the owner
/// calls [`pump`](Self::pump) or [`wait_until_settled`](Self::wait_until_settled),
/// so all state changes happen on the owner's thread, in arrival order.
pub struct SubmissionController {
    state: AppState,
    runner: EffectRunner,
    subscribers: Vec<mpsc::Sender<SubmissionView>>,
    completed_at: Option<DateTime<Utc>>,
}

impl SubmissionController {
    pub fn new(settings: ClientSettings) -> Result<Self, EngineError> {
        Ok(Self::with_engine(EngineHandle::new(settings)?))
    }

    pub fn with_engine(engine: EngineHandle) -> Self {
        Self {
            state: AppState::new(),
            runner: EffectRunner::new(engine),
            subscribers: Vec::new(),
            completed_at: None,
        }
    }

    pub fn view(&self) -> SubmissionView {
        self.state.view()
    }

    pub fn submission(&self) -> &SubmissionState {
        self.state.submission()
    }

    /// When the current `Succeeded`/`Failed` outcome was applied.
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn subscribe(&mut self) -> mpsc::Receiver<SubmissionView> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn input_changed(&mut self, text: &str) {
        self.dispatch(Msg::InputChanged(text.to_string()));
    }

    /// Validate `raw` and, if accepted, send it to the summarization service.
    ///
    /// On success the state is `Pending` when this returns. A rejection sends
    /// nothing and leaves the submission state as it was.
    pub fn submit(&mut self, raw: &str) -> Result<SubmissionId, SubmitError> {
        let state = std::mem::take(&mut self.state);
        let (state, outcome) = summarizer_core::submit(state, raw.to_string());
        self.commit(state);

        match outcome {
            Ok((submission_id, effect)) => {
                app_info!("Submission {} pending", submission_id);
                self.runner.run(vec![effect]);
                Ok(submission_id)
            }
            Err(SubmitError::Busy) => {
                app_warn!("Submit ignored: a request is already in flight");
                Err(SubmitError::Busy)
            }
            Err(err) => {
                app_debug!("Submit rejected: {}", err);
                Err(err)
            }
        }
    }

    /// Apply every completion that has already arrived. Never blocks.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Some(msg) = self.runner.try_next() {
            self.apply_completion(msg);
            applied += 1;
        }
        if self.runner.engine_stopped() {
            self.fail_orphaned();
        }
        applied
    }

    /// Block until no request is pending, or `timeout` elapses.
    ///
    /// Returns `true` when the state is settled.
    pub fn wait_until_settled(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        self.pump();
        while self.state.submission().is_pending() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            match self.runner.next_timeout(remaining) {
                Some(msg) => self.apply_completion(msg),
                None if self.runner.engine_stopped() => self.fail_orphaned(),
                None => break,
            }
        }
        !self.state.submission().is_pending()
    }

    fn apply_completion(&mut self, msg: Msg) {
        let was_pending = self.state.submission().pending_id();
        self.dispatch(msg);
        if was_pending.is_some() && !self.state.submission().is_pending() {
            self.completed_at = Some(Utc::now());
            app_info!(
                "Submission {:?} settled as {:?}",
                was_pending,
                self.state.submission().tag()
            );
        }
    }

    /// A pending submission can never complete once the engine is gone.
    fn fail_orphaned(&mut self) {
        if let Some(submission_id) = self.state.submission().pending_id() {
            self.apply_completion(Msg::SubmissionFinished {
                submission_id,
                outcome: Err(SubmissionError::Transport {
                    message: "summarization engine stopped".to_string(),
                }),
            });
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.commit(state);
        // Only submissions produce effects, and those go through `submit`.
        debug_assert!(effects.is_empty());
    }

    fn commit(&mut self, state: AppState) {
        self.state = state;
        if self.state.consume_dirty() {
            self.publish();
        }
    }

    fn publish(&mut self) {
        if self.subscribers.is_empty() {
            return;
        }
        let view = self.state.view();
        self.subscribers.retain(|tx| tx.send(view.clone()).is_ok());
    }
}
