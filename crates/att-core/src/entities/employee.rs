use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Performance data for one employee-month.
///
/// Field names serialize in camelCase; this is the body the prediction API
/// accepts.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRecord {
    pub employee_id: String,
    pub name: String,
    pub working_days: u32,
    pub target_sales: f64,
    pub actual_sales: f64,
    pub customer_satisfaction_score: f64,
    /// Calendar month, `YYYY-MM`.
    pub month: String,
}

impl EmployeeRecord {
    pub const MAX_WORKING_DAYS: u32 = 31;
    pub const MIN_SATISFACTION: f64 = 1.0;
    pub const MAX_SATISFACTION: f64 = 5.0;

    /// Check the input-layer ranges.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` naming the first offending field.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.employee_id.trim().is_empty() {
            return Err(invalid("employeeId must not be empty"));
        }
        if !(1..=Self::MAX_WORKING_DAYS).contains(&self.working_days) {
            return Err(invalid(format!(
                "workingDays must be between 1 and {}, got {}",
                Self::MAX_WORKING_DAYS,
                self.working_days
            )));
        }
        check_sales("targetSales", self.target_sales)?;
        check_sales("actualSales", self.actual_sales)?;
        if !(Self::MIN_SATISFACTION..=Self::MAX_SATISFACTION)
            .contains(&self.customer_satisfaction_score)
        {
            return Err(invalid(format!(
                "customerSatisfactionScore must be between 1 and 5, got {}",
                self.customer_satisfaction_score
            )));
        }
        self.month_start()?;
        Ok(())
    }

    /// First day of the record's month.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if `month` is not `YYYY-MM`.
    pub fn month_start(&self) -> Result<NaiveDate, CoreError> {
        let bytes = self.month.as_bytes();
        if bytes.len() != 7 || bytes[4] != b'-' {
            return Err(invalid(format!("month must be YYYY-MM, got '{}'", self.month)));
        }
        NaiveDate::parse_from_str(&format!("{}-01", self.month), "%Y-%m-%d")
            .map_err(|_| invalid(format!("month must be YYYY-MM, got '{}'", self.month)))
    }
}

fn check_sales(field: &str, value: f64) -> Result<(), CoreError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{field} must be a non-negative number, got {value}")))
    }
}

fn invalid(message: impl Into<String>) -> CoreError {
    CoreError::Validation(message.into())
}
