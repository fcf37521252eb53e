use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::ComplianceFlag;

/// Boolean signals derived from an employee record.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DerivedFlags {
    pub low_working_days: bool,
    pub target_not_met: bool,
    pub low_customer_satisfaction: bool,
}

impl DerivedFlags {
    #[must_use]
    pub const fn is_set(&self, flag: ComplianceFlag) -> bool {
        match flag {
            ComplianceFlag::LowWorkingDays => self.low_working_days,
            ComplianceFlag::TargetNotMet => self.target_not_met,
            ComplianceFlag::LowCustomerSatisfaction => self.low_customer_satisfaction,
        }
    }

    /// The flags that are set, in reason order.
    #[must_use]
    pub fn raised(&self) -> Vec<ComplianceFlag> {
        ComplianceFlag::ALL
            .into_iter()
            .filter(|flag| self.is_set(*flag))
            .collect()
    }

    #[must_use]
    pub const fn any(&self) -> bool {
        self.low_working_days || self.target_not_met || self.low_customer_satisfaction
    }
}

/// The compliance decision for one employee-month.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceVerdict {
    pub is_compliant: bool,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
    #[serde(alias = "derivedFields")]
    pub derived_flags: DerivedFlags,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub non_compliance_reason: Option<String>,
}
