//! Pipeline state and the reducer that is the only way to change it.
//!
//! Artifacts form a strict chain: an employee record, then a verdict for it,
//! then a transaction recording that verdict. [`reduce`] rejects any action
//! that would skip a link or rewrite one that a later link depends on.

use att_core::entities::{ComplianceVerdict, EmployeeRecord, TransactionRecord};
use att_core::enums::{TransactionStatus, WizardStep};
use att_core::errors::CoreError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineState {
    pub employee: Option<EmployeeRecord>,
    pub verdict: Option<ComplianceVerdict>,
    pub transaction: Option<TransactionRecord>,
    pub is_loading: bool,
    /// Last failure message. Replaced by each new failure.
    pub error: Option<String>,
    /// Bumped by every effective reset. Work started under an older
    /// generation must not write back.
    pub generation: u64,
}

impl PipelineState {
    #[must_use]
    pub const fn step(&self) -> WizardStep {
        WizardStep::from_artifacts(
            self.employee.is_some(),
            self.verdict.is_some(),
            self.transaction.is_some(),
        )
    }

    /// Nothing to reset.
    #[must_use]
    pub const fn is_pristine(&self) -> bool {
        self.employee.is_none()
            && self.verdict.is_none()
            && self.transaction.is_none()
            && !self.is_loading
            && self.error.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetEmployee(EmployeeRecord),
    SetVerdict(ComplianceVerdict),
    SetTransaction(TransactionRecord),
    SetLoading(bool),
    SetError(Option<String>),
    Reset,
}

impl Action {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetEmployee(_) => "set_employee",
            Self::SetVerdict(_) => "set_verdict",
            Self::SetTransaction(_) => "set_transaction",
            Self::SetLoading(_) => "set_loading",
            Self::SetError(_) => "set_error",
            Self::Reset => "reset",
        }
    }
}

/// An action that is out of order for the current state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("a verdict already exists; reset before changing employee data")]
    VerdictLocked,

    #[error("no employee data to evaluate")]
    MissingEmployee,

    #[error("a transaction was already submitted; reset before re-evaluating")]
    TransactionLocked,

    #[error("no verdict to record")]
    MissingVerdict,

    /// An evaluation or submission is running on the current artifacts.
    #[error("an evaluation or submission is already in progress")]
    Busy,

    /// A different transaction is still pending or has already confirmed.
    #[error("transaction {current} is {status}; a new submission is not allowed")]
    Conflict {
        current: String,
        status: TransactionStatus,
    },

    #[error(transparent)]
    Status(#[from] CoreError),
}

/// Apply `action` to `state`.
///
/// # Errors
///
/// Returns a [`TransitionError`] when the action breaks the artifact
/// ordering or the transaction status machine. `state` is never modified.
pub fn reduce(state: &PipelineState, action: Action) -> Result<PipelineState, TransitionError> {
    let mut next = state.clone();
    match action {
        Action::SetEmployee(record) => {
            if state.is_loading {
                return Err(TransitionError::Busy);
            }
            if state.verdict.is_some() {
                return Err(TransitionError::VerdictLocked);
            }
            next.employee = Some(record);
        }
        Action::SetVerdict(verdict) => {
            if state.employee.is_none() {
                return Err(TransitionError::MissingEmployee);
            }
            if state.transaction.is_some() {
                return Err(TransitionError::TransactionLocked);
            }
            next.verdict = Some(verdict);
        }
        Action::SetTransaction(incoming) => {
            if state.verdict.is_none() {
                return Err(TransitionError::MissingVerdict);
            }
            next.transaction = Some(match &state.transaction {
                None => incoming,
                Some(current) if current.hash == incoming.hash => {
                    current.resolve(incoming.status, incoming.block_number)?
                }
                Some(current) if current.status == TransactionStatus::Failed => incoming,
                Some(current) => {
                    return Err(TransitionError::Conflict {
                        current: current.hash.clone(),
                        status: current.status,
                    });
                }
            });
        }
        Action::SetLoading(true) if state.is_loading => return Err(TransitionError::Busy),
        Action::SetLoading(loading) => next.is_loading = loading,
        Action::SetError(error) => next.error = error,
        Action::Reset => {
            if state.is_pristine() {
                return Ok(next);
            }
            next = PipelineState {
                generation: state.generation + 1,
                ..PipelineState::default()
            };
        }
    }
    Ok(next)
}

#[cfg(test)]
mod tests {
    use att_core::entities::DerivedFlags;
    use pretty_assertions::assert_eq;

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

    fn verdict(confidence: f64) -> ComplianceVerdict {
        ComplianceVerdict {
            is_compliant: true,
            confidence,
            derived_flags: DerivedFlags::default(),
            non_compliance_reason: None,
        }
    }

    fn with_verdict() -> PipelineState {
        let state = reduce(&PipelineState::default(), Action::SetEmployee(employee())).unwrap();
        reduce(&state, Action::SetVerdict(verdict(0.9))).unwrap()
    }

    fn with_transaction(status: TransactionStatus) -> PipelineState {
        let tx = TransactionRecord::pending("0xaa");
        let state = reduce(&with_verdict(), Action::SetTransaction(tx.clone())).unwrap();
        if status == TransactionStatus::Pending {
            return state;
        }
        reduce(
            &state,
            Action::SetTransaction(tx.resolve(status, Some(10)).unwrap()),
        )
        .unwrap()
    }

    #[test]
    fn step_tracks_artifacts() {
        let state = PipelineState::default();
        assert_eq!(state.step(), WizardStep::EmployeeData);
        let state = reduce(&state, Action::SetEmployee(employee())).unwrap();
        assert_eq!(state.step(), WizardStep::Prediction);
        assert_eq!(with_verdict().step(), WizardStep::Blockchain);
        assert_eq!(
            with_transaction(TransactionStatus::Pending).step(),
            WizardStep::Complete
        );
    }

    #[test]
    fn out_of_order_actions_are_rejected() {
        let empty = PipelineState::default();
        assert_eq!(
            reduce(&empty, Action::SetVerdict(verdict(0.9))),
            Err(TransitionError::MissingEmployee)
        );
        let with_employee = reduce(&empty, Action::SetEmployee(employee())).unwrap();
        assert_eq!(
            reduce(
                &with_employee,
                Action::SetTransaction(TransactionRecord::pending("0xaa"))
            ),
            Err(TransitionError::MissingVerdict)
        );
        assert_eq!(
            reduce(&with_verdict(), Action::SetEmployee(employee())),
            Err(TransitionError::VerdictLocked)
        );
        assert_eq!(
            reduce(
                &with_transaction(TransactionStatus::Pending),
                Action::SetVerdict(verdict(0.6))
            ),
            Err(TransitionError::TransactionLocked)
        );
    }

    #[test]
    fn employee_is_locked_while_work_is_in_flight() {
        let state = reduce(&PipelineState::default(), Action::SetEmployee(employee())).unwrap();
        let loading = reduce(&state, Action::SetLoading(true)).unwrap();

        assert_eq!(
            reduce(&loading, Action::SetEmployee(employee())),
            Err(TransitionError::Busy)
        );
        assert_eq!(
            reduce(&loading, Action::SetLoading(true)),
            Err(TransitionError::Busy)
        );

        let idle = reduce(&loading, Action::SetLoading(false)).unwrap();
        assert!(reduce(&idle, Action::SetEmployee(employee())).is_ok());
    }

    #[test]
    fn verdict_may_be_replaced_before_submission() {
        let state = reduce(&with_verdict(), Action::SetVerdict(verdict(0.7))).unwrap();
        assert_eq!(state.verdict.unwrap().confidence, 0.7);
    }

    #[test]
    fn transaction_moves_to_terminal_once() {
        let confirmed = with_transaction(TransactionStatus::Confirmed);
        assert_eq!(
            confirmed.transaction.as_ref().unwrap().block_number,
            Some(10)
        );

        let failed_again = TransactionRecord {
            hash: "0xaa".into(),
            status: TransactionStatus::Failed,
            block_number: None,
        };
        let err = reduce(&confirmed, Action::SetTransaction(failed_again)).unwrap_err();
        assert!(matches!(err, TransitionError::Status(CoreError::InvalidTransition { .. })));

        // Seeing the same terminal record again changes nothing.
        let again = reduce(
            &confirmed,
            Action::SetTransaction(confirmed.transaction.clone().unwrap()),
        )
        .unwrap();
        assert_eq!(again, confirmed);
    }

    #[test]
    fn second_submission_conflicts_unless_previous_failed() {
        let other = TransactionRecord::pending("0xbb");
        for status in [TransactionStatus::Pending, TransactionStatus::Confirmed] {
            let err = reduce(&with_transaction(status), Action::SetTransaction(other.clone()))
                .unwrap_err();
            assert_eq!(
                err,
                TransitionError::Conflict {
                    current: "0xaa".into(),
                    status
                }
            );
        }

        let retried = reduce(
            &with_transaction(TransactionStatus::Failed),
            Action::SetTransaction(other.clone()),
        )
        .unwrap();
        assert_eq!(retried.transaction, Some(other));
    }

    #[test]
    fn errors_do_not_touch_artifacts() {
        let state = with_verdict();
        let failed = reduce(&state, Action::SetError(Some("wallet rejected".into()))).unwrap();
        assert_eq!(failed.verdict, state.verdict);
        assert_eq!(failed.employee, state.employee);
        let replaced = reduce(&failed, Action::SetError(Some("again".into()))).unwrap();
        assert_eq!(replaced.error.as_deref(), Some("again"));
    }

    #[test]
    fn reset_discards_everything_and_bumps_generation() {
        let state = with_transaction(TransactionStatus::Pending);
        let reset = reduce(&state, Action::Reset).unwrap();
        assert_eq!(
            reset,
            PipelineState {
                generation: state.generation + 1,
                ..PipelineState::default()
            }
        );
    }

    #[test]
    fn reset_on_pristine_state_is_a_no_op() {
        let state = PipelineState::default();
        let once = reduce(&state, Action::Reset).unwrap();
        let twice = reduce(&once, Action::Reset).unwrap();
        assert_eq!(once, state);
        assert_eq!(twice, state);
    }
}
