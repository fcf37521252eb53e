//! Orchestration: runs each stage and records its outcome in the [`Store`].

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use att_chain::{DEFAULT_POLL_INTERVAL, PollHandle, TransactionTracker, spawn_poller};
use att_core::entities::{ComplianceVerdict, EmployeeRecord, TransactionRecord};
use att_core::enums::TransactionStatus;
use att_rules::Predictor;

use crate::error::PipelineError;
use crate::state::{Action, PipelineState, TransitionError};
use crate::store::Store;

/// How an evaluation ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    Completed(ComplianceVerdict),
    /// The pipeline was reset first; nothing was written.
    Cancelled,
}

/// One employee-month moving from raw data to an on-chain record.
///
/// Failures are written to the store's `error` field and returned. Earlier
/// artifacts survive them, so every stage can be retried.
pub struct Pipeline {
    store: Store,
    predictor: Arc<dyn Predictor>,
    tracker: TransactionTracker,
    poll_interval: Duration,
    submitting: tokio::sync::Mutex<()>,
    poller: Mutex<Option<PollHandle>>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("state", &self.store.snapshot())
            .field("tracker", &self.tracker)
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    pub fn new(predictor: Arc<dyn Predictor>, tracker: TransactionTracker) -> Self {
        Self {
            store: Store::new(),
            predictor,
            tracker,
            poll_interval: DEFAULT_POLL_INTERVAL,
            submitting: tokio::sync::Mutex::new(()),
            poller: Mutex::new(None),
        }
    }

    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    #[must_use]
    pub const fn store(&self) -> &Store {
        &self.store
    }

    #[must_use]
    pub fn snapshot(&self) -> PipelineState {
        self.store.snapshot()
    }

    #[must_use]
    pub const fn tracker(&self) -> &TransactionTracker {
        &self.tracker
    }

    /// Validate and store the employee record.
    ///
    /// # Errors
    ///
    /// - `PipelineError::Conflict` if an evaluation or submission is running.
    /// - `PipelineError::Validation` if the record is out of range.
    /// - `PipelineError::Transition` if a verdict already exists.
    pub fn submit_employee(&self, record: EmployeeRecord) -> Result<(), PipelineError> {
        let state = self.store.snapshot();
        if state.is_loading {
            return Err(TransitionError::Busy.into());
        }
        if let Err(error) = record.validate() {
            let _ = self
                .store
                .dispatch_if_current(state.generation, Action::SetError(Some(error.to_string())));
            return Err(error.into());
        }
        self.store.dispatch(Action::SetEmployee(record))?;
        self.store.dispatch(Action::SetError(None))?;
        Ok(())
    }

    /// Evaluate the stored employee record.
    ///
    /// The record stays locked until the evaluation ends. A reset while the
    /// predictor is running resolves to [`Evaluation::Cancelled`] and leaves
    /// the fresh state untouched.
    ///
    /// # Errors
    ///
    /// - `PipelineError::Conflict` if an evaluation or submission is running.
    /// - `PipelineError::Transition` if there is no employee record or a
    ///   transaction was already submitted.
    /// - `PipelineError::Prediction` if the predictor fails.
    pub async fn predict(&self) -> Result<Evaluation, PipelineError> {
        let state = self.store.snapshot();
        let generation = state.generation;
        check_can_predict(&state)?;

        let Some(state) = self.begin(generation)? else {
            return Ok(Evaluation::Cancelled);
        };
        let record = match check_can_predict(&state) {
            Ok(record) => record,
            Err(error) => {
                self.settle(generation, Some(error.to_string()));
                return Err(error.into());
            }
        };

        let mut changes = self.store.subscribe();
        let outcome = tokio::select! {
            result = self.predictor.predict(&record) => Some(result),
            _ = changes.wait_for(|s| s.generation != generation) => None,
        };

        match outcome {
            None => {
                tracing::info!(employee_id = %record.employee_id, "evaluation cancelled by reset");
                Ok(Evaluation::Cancelled)
            }
            Some(Ok(verdict)) => {
                let applied = self
                    .store
                    .dispatch_if_current(generation, Action::SetVerdict(verdict.clone()));
                match applied {
                    Ok(true) => {
                        self.settle(generation, None);
                        Ok(Evaluation::Completed(verdict))
                    }
                    Ok(false) => {
                        tracing::info!(
                            employee_id = %record.employee_id,
                            "evaluation cancelled by reset"
                        );
                        Ok(Evaluation::Cancelled)
                    }
                    Err(error) => {
                        self.settle(generation, Some(error.to_string()));
                        Err(error.into())
                    }
                }
            }
            Some(Err(error)) => {
                self.settle(generation, Some(error.to_string()));
                Err(error.into())
            }
        }
    }

    /// Record the stored verdict on-chain and start polling for its receipt.
    ///
    /// Returns the `Pending` record as soon as the wallet accepts it. The
    /// verdict stays locked while the wallet is deciding.
    ///
    /// # Errors
    ///
    /// - `PipelineError::Conflict` if an evaluation or submission is in
    ///   flight, or a transaction is pending or confirmed. A failed
    ///   transaction may be replaced.
    /// - `PipelineError::Transition` if there is no verdict.
    /// - `PipelineError::Chain` if submission fails.
    /// - `PipelineError::Cancelled` if the pipeline was reset meanwhile.
    pub async fn submit_transaction(&self) -> Result<TransactionRecord, PipelineError> {
        let Ok(_guard) = self.submitting.try_lock() else {
            return Err(PipelineError::Conflict(
                "a submission is already in flight".into(),
            ));
        };

        let state = self.store.snapshot();
        let generation = state.generation;
        check_can_submit(&state)?;

        let Some(state) = self.begin(generation)? else {
            return Err(PipelineError::Cancelled);
        };
        let (record, verdict) = match check_can_submit(&state) {
            Ok(artifacts) => artifacts,
            Err(error) => {
                self.settle(generation, Some(error.to_string()));
                return Err(error.into());
            }
        };

        let submitted = match self.tracker.submit(&record, &verdict).await {
            Ok(tx) => tx,
            Err(error) => {
                self.settle(generation, Some(error.to_string()));
                return Err(error.into());
            }
        };

        let applied = self
            .store
            .dispatch_if_current(generation, Action::SetTransaction(submitted.clone()));
        match applied {
            Ok(true) => self.settle(generation, None),
            Ok(false) => {
                tracing::warn!(
                    hash = %submitted.hash,
                    "pipeline was reset during submission; transaction will not be tracked"
                );
                return Err(PipelineError::Cancelled);
            }
            Err(error) => {
                self.settle(generation, Some(error.to_string()));
                return Err(error.into());
            }
        }

        self.start_polling(generation, submitted.hash.clone());
        Ok(submitted)
    }

    /// Resolves once the tracked transaction is terminal. `None` if there is
    /// no transaction or the pipeline is reset first.
    pub async fn settled_transaction(&self) -> Option<TransactionRecord> {
        let generation = self.store.generation();
        let mut changes = self.store.subscribe();
        let state = changes
            .wait_for(|s| {
                s.generation != generation
                    || s.transaction.as_ref().is_none_or(TransactionRecord::is_terminal)
            })
            .await
            .ok()?;
        if state.generation != generation {
            return None;
        }
        state.transaction.clone()
    }

    /// Discard every artifact and stop polling. No-op when already empty.
    pub fn reset(&self) {
        self.cancel_polling();
        // The reducer accepts Reset from every state.
        let _ = self.store.dispatch(Action::Reset);
    }

    /// Whether a poller is still running.
    #[must_use]
    pub fn is_polling(&self) -> bool {
        self.poller_slot().as_ref().is_some_and(|handle| !handle.is_finished())
    }

    fn start_polling(&self, generation: u64, hash: String) {
        let store = self.store.clone();
        let handle = spawn_poller(self.tracker.clone(), hash, self.poll_interval, move |record| {
            match store.dispatch_if_current(generation, Action::SetTransaction(record)) {
                Ok(true) => tracing::debug!("transaction settled"),
                Ok(false) => {}
                Err(error) => tracing::warn!(%error, "settled transaction rejected by store"),
            }
        });
        if let Some(mut previous) = self.poller_slot().replace(handle) {
            previous.cancel();
        }
    }

    fn cancel_polling(&self) {
        if let Some(mut handle) = self.poller_slot().take() {
            handle.cancel();
        }
    }

    fn poller_slot(&self) -> std::sync::MutexGuard<'_, Option<PollHandle>> {
        self.poller.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mark the pipeline busy and clear the last error. `None` if a reset
    /// happened since `generation` was read.
    fn begin(&self, generation: u64) -> Result<Option<PipelineState>, PipelineError> {
        if !self
            .store
            .dispatch_if_current(generation, Action::SetLoading(true))?
        {
            return Ok(None);
        }
        // Error updates are accepted in every state.
        let _ = self.store.dispatch_if_current(generation, Action::SetError(None));
        let state = self.store.snapshot();
        Ok((state.generation == generation).then_some(state))
    }

    fn settle(&self, generation: u64, error: Option<String>) {
        if error.is_some() {
            let _ = self.store.dispatch_if_current(generation, Action::SetError(error));
        }
        let _ = self.store.dispatch_if_current(generation, Action::SetLoading(false));
    }
}

fn check_can_predict(state: &PipelineState) -> Result<EmployeeRecord, TransitionError> {
    if state.transaction.is_some() {
        return Err(TransitionError::TransactionLocked);
    }
    state.employee.clone().ok_or(TransitionError::MissingEmployee)
}

fn check_can_submit(
    state: &PipelineState,
) -> Result<(EmployeeRecord, ComplianceVerdict), TransitionError> {
    if let Some(current) = state
        .transaction
        .as_ref()
        .filter(|tx| tx.status != TransactionStatus::Failed)
    {
        return Err(TransitionError::Conflict {
            current: current.hash.clone(),
            status: current.status,
        });
    }
    let verdict = state.verdict.clone().ok_or(TransitionError::MissingVerdict)?;
    let record = state.employee.clone().ok_or(TransitionError::MissingEmployee)?;
    Ok((record, verdict))
}

#[cfg(test)]
mod tests {
    use att_chain::ScriptedGateway;
    use att_rules::{FixedNoise, LocalPredictor, RuleEngine, RuleThresholds};

    use super::*;

    fn employee() -> EmployeeRecord {
        EmployeeRecord {
            employee_id: "EMP001".into(),
            name: "John Doe".into(),
            working_days: 22,
            target_sales: 50_000.0,
            actual_sales: 55_000.0,
            customer_satisfaction_score: 5.0,
            month: "2024-01".into(),
        }
    }

    fn pipeline() -> Pipeline {
        let predictor = LocalPredictor::new(
            RuleEngine::new(RuleThresholds::default(), Arc::new(FixedNoise(0.0))),
            Duration::from_millis(1_500),
        );
        let tracker = TransactionTracker::new(
            Arc::new(ScriptedGateway::new()),
            Some("0x5fbdb2315678afecb367f032d93f642f64180aa3"),
        );
        Pipeline::new(Arc::new(predictor), tracker)
    }

    #[test]
    fn invalid_employee_is_recorded_as_error() {
        let pipeline = pipeline();
        let mut record = employee();
        record.working_days = 0;

        let err = pipeline.submit_employee(record).unwrap_err();
        assert!(matches!(err, PipelineError::Validation(_)));
        let state = pipeline.snapshot();
        assert!(state.employee.is_none());
        assert!(state.error.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn predict_without_employee_is_a_transition_error() {
        let err = pipeline().predict().await.unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Transition(TransitionError::MissingEmployee)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn predict_stores_verdict_and_clears_loading() {
        let pipeline = pipeline();
        pipeline.submit_employee(employee()).unwrap();

        let evaluation = pipeline.predict().await.unwrap();
        let Evaluation::Completed(verdict) = evaluation else {
            panic!("expected a completed evaluation");
        };
        let state = pipeline.snapshot();
        assert_eq!(state.verdict, Some(verdict));
        assert!(!state.is_loading);
        assert!(state.error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn reset_is_idempotent() {
        let pipeline = pipeline();
        pipeline.reset();
        pipeline.reset();
        assert_eq!(pipeline.snapshot(), PipelineState::default());
    }
}
