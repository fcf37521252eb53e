//! Status enums, wizard steps, and compliance flags for attest.
//!
//! Every enum serializes as a lowercase `snake_case` string. Transaction
//! status transitions are checked here so no other layer can move a record
//! out of a terminal state.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// TransactionStatus
// ---------------------------------------------------------------------------

/// Status of a blockchain submission.
///
/// ```text
/// pending → confirmed
///         → failed
/// ```
///
/// `confirmed` and `failed` are terminal: a transaction never leaves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Confirmed,
    Failed,
}

impl TransactionStatus {
    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Confirmed, Self::Failed],
            Self::Confirmed | Self::Failed => &[],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Confirmed | Self::Failed)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "failed" => Ok(Self::Failed),
            other => Err(CoreError::Validation(format!(
                "unknown transaction status '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// WizardStep
// ---------------------------------------------------------------------------

/// Where a pipeline currently stands, derived from which artifacts exist.
///
/// ```text
/// employee_data → prediction → blockchain → complete
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    EmployeeData,
    Prediction,
    Blockchain,
    Complete,
}

impl WizardStep {
    /// Derive the current step from artifact presence.
    #[must_use]
    pub const fn from_artifacts(
        has_employee: bool,
        has_verdict: bool,
        has_transaction: bool,
    ) -> Self {
        match (has_employee, has_verdict, has_transaction) {
            (false, _, _) => Self::EmployeeData,
            (true, false, _) => Self::Prediction,
            (true, true, false) => Self::Blockchain,
            (true, true, true) => Self::Complete,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EmployeeData => "employee_data",
            Self::Prediction => "prediction",
            Self::Blockchain => "blockchain",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ComplianceFlag
// ---------------------------------------------------------------------------

/// A derived non-compliance signal.
///
/// Declaration order is the order labels appear in a non-compliance reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceFlag {
    LowWorkingDays,
    TargetNotMet,
    LowCustomerSatisfaction,
}

impl ComplianceFlag {
    pub const ALL: [Self; 3] = [
        Self::LowWorkingDays,
        Self::TargetNotMet,
        Self::LowCustomerSatisfaction,
    ];

    /// Human-readable label used in non-compliance reasons.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::LowWorkingDays => "Insufficient working days",
            Self::TargetNotMet => "Sales target not met",
            Self::LowCustomerSatisfaction => "Low customer satisfaction",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LowWorkingDays => "low_working_days",
            Self::TargetNotMet => "target_not_met",
            Self::LowCustomerSatisfaction => "low_customer_satisfaction",
        }
    }
}

impl fmt::Display for ComplianceFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
