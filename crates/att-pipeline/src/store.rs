//! Shared, observable pipeline state.

use std::sync::Arc;

use tokio::sync::watch;

use crate::state::{Action, PipelineState, TransitionError, reduce};

/// Cheaply cloneable handle to one pipeline's state.
///
/// Every dispatch runs [`reduce`] under the channel lock, so actions apply
/// atomically and in order. Subscribers are woken only by actual changes.
#[derive(Debug, Clone)]
pub struct Store {
    tx: Arc<watch::Sender<PipelineState>>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    #[must_use]
    pub fn new() -> Self {
        Self::with_state(PipelineState::default())
    }

    #[must_use]
    pub fn with_state(state: PipelineState) -> Self {
        let (tx, _rx) = watch::channel(state);
        Self { tx: Arc::new(tx) }
    }

    #[must_use]
    pub fn snapshot(&self) -> PipelineState {
        self.tx.borrow().clone()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.tx.borrow().generation
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PipelineState> {
        self.tx.subscribe()
    }

    /// Apply `action`.
    ///
    /// # Errors
    ///
    /// Returns the reducer's [`TransitionError`]; the state is left as it was.
    pub fn dispatch(&self, action: Action) -> Result<(), TransitionError> {
        self.apply(None, action).map(|_| ())
    }

    /// Apply `action` only if no reset happened since `generation` was read.
    /// Returns whether it was applied.
    ///
    /// # Errors
    ///
    /// Same as [`Self::dispatch`].
    pub fn dispatch_if_current(
        &self,
        generation: u64,
        action: Action,
    ) -> Result<bool, TransitionError> {
        self.apply(Some(generation), action)
    }

    fn apply(&self, expected: Option<u64>, action: Action) -> Result<bool, TransitionError> {
        let name = action.name();
        let mut outcome = Ok(false);
        self.tx.send_if_modified(|state| {
            if expected.is_some_and(|generation| generation != state.generation) {
                tracing::debug!(action = name, "dropping update from a previous generation");
                return false;
            }
            match reduce(state, action) {
                Ok(next) => {
                    outcome = Ok(true);
                    if next == *state {
                        return false;
                    }
                    *state = next;
                    true
                }
                Err(error) => {
                    outcome = Err(error);
                    false
                }
            }
        });
        outcome
    }
}
