use crate::{
    error::{GenerationError, Result},
    history::HistoryStore,
    models::{GeneratedImage, HistoryEntry},
    openai::ImageGenerator,
};
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    InFlight,
    Succeeded(GeneratedImage),
    Failed(GenerationError),
}

impl SessionState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, SessionState::InFlight)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Succeeded(_) | SessionState::Failed(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::InFlight => "in-flight",
            SessionState::Succeeded(_) => "succeeded",
            SessionState::Failed(_) => "failed",
        }
    }
}

/// Drives one generation at a time and records successes in the history.
///
/// `submit` moves the session to `InFlight` before its first suspension
/// point, so a second `submit` issued while the first is outstanding is
/// rejected with [`GenerationError::SessionBusy`] instead of queued.
pub struct GenerationSession {
    generator: Arc<dyn ImageGenerator>,
    history: Arc<HistoryStore>,
    state: watch::Sender<SessionState>,
}

impl GenerationSession {
    pub fn new(generator: Arc<dyn ImageGenerator>, history: Arc<HistoryStore>) -> Self {
        let (state, _) = watch::channel(SessionState::Idle);
        Self {
            generator,
            history,
            state,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn history(&self) -> &Arc<HistoryStore> {
        &self.history
    }

    pub async fn submit(&self, prompt: impl Into<String>) -> Result<GeneratedImage> {
        let prompt = prompt.into();
        let mut guard = self.begin()?;

        let outcome = self.generator.submit(&prompt).await;
        guard.finished = true;

        match outcome {
            Ok(image) => {
                if let Err(e) = self.history.append(HistoryEntry::new(prompt, image.clone())) {
                    log::warn!("Generation succeeded but history was not saved: {}", e);
                }
                self.transition(SessionState::Succeeded(image.clone()));
                Ok(image)
            }
            Err(e) => {
                log::warn!("Generation failed: {}", e);
                self.transition(SessionState::Failed(e.clone()));
                Err(e)
            }
        }
    }

    /// Returns a finished session to `Idle`.
    pub fn reset(&self) -> Result<()> {
        let mut busy = false;
        self.state.send_if_modified(|state| match state {
            SessionState::InFlight => {
                busy = true;
                false
            }
            SessionState::Idle => false,
            _ => {
                *state = SessionState::Idle;
                true
            }
        });
        if busy {
            return Err(GenerationError::SessionBusy);
        }
        Ok(())
    }

    fn begin(&self) -> Result<InFlightGuard<'_>> {
        let accepted = self.state.send_if_modified(|state| {
            if state.is_in_flight() {
                return false;
            }
            *state = SessionState::InFlight;
            true
        });
        if !accepted {
            log::debug!("Rejecting submit: generation already in flight");
            return Err(GenerationError::SessionBusy);
        }
        log::debug!("Session state -> in-flight");
        Ok(InFlightGuard {
            state: &self.state,
            finished: false,
        })
    }

    fn transition(&self, next: SessionState) {
        log::debug!("Session state -> {}", next.label());
        self.state.send_replace(next);
    }
}

// A dropped submit future must not leave the session stuck in-flight.
struct InFlightGuard<'a> {
    state: &'a watch::Sender<SessionState>,
    finished: bool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            log::debug!("Submit dropped before completion, session back to idle");
            self.state.send_replace(SessionState::Idle);
        }
    }
}
