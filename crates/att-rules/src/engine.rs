//! Threshold rules that decide compliance for one employee-month.
//!
//! The score is a sum of three all-or-nothing indicators:
//!
//! | indicator | passes when | weight |
//! |---|---|---|
//! | sales | `actual / target >= 0.8` | 0.4 |
//! | attendance | `working_days / 22 >= 0.8` | 0.3 |
//! | satisfaction | `score >= 3.5` | 0.3 |
//!
//! A record is compliant at a score of 0.6 or more. Weights are held in basis
//! points so sums compare exactly against the cutoff.

use std::sync::Arc;

use att_core::entities::{ComplianceVerdict, DerivedFlags, EmployeeRecord};

use crate::error::RuleError;
use crate::noise::{NoiseSource, SystemNoise};

const BASIS_POINTS: f64 = 10_000.0;

/// Tunable thresholds. [`Default`] carries the production values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleThresholds {
    /// Working days in a canonical full month.
    pub full_month_days: u32,
    /// Fewer working days than this raises `low_working_days`.
    pub min_working_days: u32,
    pub min_sales_performance: f64,
    pub min_working_days_ratio: f64,
    pub min_customer_satisfaction: f64,
    pub sales_weight_bps: u32,
    pub attendance_weight_bps: u32,
    pub satisfaction_weight_bps: u32,
    /// Minimum score, in basis points, for a compliant verdict.
    pub compliance_cutoff_bps: u32,
    pub confidence_floor: f64,
    pub confidence_ceiling: f64,
    /// Width of the noise added to the score before clamping.
    pub noise_span: f64,
}

impl Default for RuleThresholds {
    fn default() -> Self {
        Self {
            full_month_days: 22,
            min_working_days: 18,
            min_sales_performance: 0.8,
            min_working_days_ratio: 0.8,
            min_customer_satisfaction: 3.5,
            sales_weight_bps: 4_000,
            attendance_weight_bps: 3_000,
            satisfaction_weight_bps: 3_000,
            compliance_cutoff_bps: 6_000,
            confidence_floor: 0.55,
            confidence_ceiling: 0.95,
            noise_span: 0.2,
        }
    }
}

impl RuleThresholds {
    #[must_use]
    pub fn with_full_month_days(mut self, days: u32) -> Self {
        self.full_month_days = days;
        self
    }
}

/// The deterministic part of an evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assessment {
    pub sales_performance: f64,
    pub working_days_ratio: f64,
    pub flags: DerivedFlags,
    pub score_bps: u32,
    pub is_compliant: bool,
}

impl Assessment {
    #[must_use]
    pub fn score(&self) -> f64 {
        f64::from(self.score_bps) / BASIS_POINTS
    }
}

#[derive(Debug, Clone)]
pub struct RuleEngine {
    thresholds: RuleThresholds,
    noise: Arc<dyn NoiseSource>,
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(RuleThresholds::default(), Arc::new(SystemNoise))
    }
}

impl RuleEngine {
    pub fn new(thresholds: RuleThresholds, noise: Arc<dyn NoiseSource>) -> Self {
        Self { thresholds, noise }
    }

    #[must_use]
    pub const fn thresholds(&self) -> &RuleThresholds {
        &self.thresholds
    }

    /// Score a record without touching the noise source.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::Validation` if `target_sales` is not a positive
    /// number or `actual_sales` is negative or not finite.
    pub fn assess(&self, record: &EmployeeRecord) -> Result<Assessment, RuleError> {
        let t = &self.thresholds;
        if !(record.target_sales.is_finite() && record.target_sales > 0.0) {
            return Err(RuleError::Validation(format!(
                "targetSales must be greater than zero, got {}",
                record.target_sales
            )));
        }
        if !(record.actual_sales.is_finite() && record.actual_sales >= 0.0) {
            return Err(RuleError::Validation(format!(
                "actualSales must be a non-negative number, got {}",
                record.actual_sales
            )));
        }
        if t.full_month_days == 0 {
            return Err(RuleError::Validation(
                "full month length must be at least one day".into(),
            ));
        }

        let sales_performance = record.actual_sales / record.target_sales;
        let working_days_ratio =
            f64::from(record.working_days) / f64::from(t.full_month_days);

        let flags = DerivedFlags {
            low_working_days: record.working_days < t.min_working_days,
            target_not_met: sales_performance < t.min_sales_performance,
            low_customer_satisfaction: record.customer_satisfaction_score
                < t.min_customer_satisfaction,
        };

        let mut score_bps = 0;
        if sales_performance >= t.min_sales_performance {
            score_bps += t.sales_weight_bps;
        }
        if working_days_ratio >= t.min_working_days_ratio {
            score_bps += t.attendance_weight_bps;
        }
        if record.customer_satisfaction_score >= t.min_customer_satisfaction {
            score_bps += t.satisfaction_weight_bps;
        }

        Ok(Assessment {
            sales_performance,
            working_days_ratio,
            flags,
            score_bps,
            is_compliant: score_bps >= t.compliance_cutoff_bps,
        })
    }

    /// Produce the full verdict for a record.
    ///
    /// # Errors
    ///
    /// Same as [`Self::assess`].
    pub fn evaluate(&self, record: &EmployeeRecord) -> Result<ComplianceVerdict, RuleError> {
        let assessment = self.assess(record)?;
        let t = &self.thresholds;

        let sample = self.noise.sample();
        let sample = if sample.is_finite() {
            sample.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let confidence = (assessment.score() + sample * t.noise_span)
            .clamp(t.confidence_floor, t.confidence_ceiling);

        let non_compliance_reason = if assessment.is_compliant {
            None
        } else {
            reason_for(&assessment.flags)
        };

        tracing::debug!(
            employee_id = %record.employee_id,
            month = %record.month,
            score_bps = assessment.score_bps,
            is_compliant = assessment.is_compliant,
            "compliance evaluated"
        );

        Ok(ComplianceVerdict {
            is_compliant: assessment.is_compliant,
            confidence,
            derived_flags: assessment.flags,
            non_compliance_reason,
        })
    }
}

fn reason_for(flags: &DerivedFlags) -> Option<String> {
    let labels: Vec<&str> = flags.raised().into_iter().map(|flag| flag.label()).collect();
    (!labels.is_empty()).then(|| labels.join(", "))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::noise::FixedNoise;

    fn engine(noise: f64) -> RuleEngine {
        RuleEngine::new(RuleThresholds::default(), Arc::new(FixedNoise(noise)))
    }

    fn employee(working_days: u32, target: f64, actual: f64, satisfaction: f64) -> EmployeeRecord {
        EmployeeRecord {
            employee_id: "EMP001".into(),
            name: "John Doe".into(),
            working_days,
            target_sales: target,
            actual_sales: actual,
            customer_satisfaction_score: satisfaction,
            month: "2024-01".into(),
        }
    }

    #[test]
    fn compliant_scenario() {
        let verdict = engine(0.0)
            .evaluate(&employee(22, 50_000.0, 55_000.0, 5.0))
            .unwrap();

        assert!(verdict.is_compliant);
        assert_eq!(verdict.derived_flags, DerivedFlags::default());
        assert_eq!(verdict.non_compliance_reason, None);
        // Full score 1.0 is clamped to the ceiling.
        assert!((verdict.confidence - 0.95).abs() < 1e-12);
    }

    #[test]
    fn all_flags_scenario() {
        let verdict = engine(0.0)
            .evaluate(&employee(15, 50_000.0, 30_000.0, 2.0))
            .unwrap();

        assert!(!verdict.is_compliant);
        assert_eq!(
            verdict.derived_flags,
            DerivedFlags {
                low_working_days: true,
                target_not_met: true,
                low_customer_satisfaction: true,
            }
        );
        assert_eq!(
            verdict.non_compliance_reason.as_deref(),
            Some("Insufficient working days, Sales target not met, Low customer satisfaction")
        );
        assert!((verdict.confidence - 0.55).abs() < 1e-12);
    }

    #[rstest]
    #[case::sales_exactly_at_threshold(employee(22, 50_000.0, 40_000.0, 4.0))]
    #[case::satisfaction_exactly_at_threshold(employee(22, 50_000.0, 50_000.0, 3.5))]
    #[case::working_days_exactly_at_threshold(employee(18, 50_000.0, 50_000.0, 4.0))]
    fn boundary_ties_favour_compliance(#[case] record: EmployeeRecord) {
        let verdict = engine(0.0).evaluate(&record).unwrap();
        assert!(verdict.is_compliant);
        assert!(!verdict.derived_flags.any());
        assert_eq!(verdict.non_compliance_reason, None);
    }

    #[test]
    fn attendance_and_satisfaction_alone_reach_cutoff() {
        let assessment = engine(0.0)
            .assess(&employee(22, 50_000.0, 10_000.0, 4.0))
            .unwrap();
        assert_eq!(assessment.score_bps, 6_000);
        assert!(assessment.is_compliant);
        assert!(assessment.flags.target_not_met);
    }

    #[test]
    fn compliant_verdict_never_carries_reason_even_with_flags() {
        let verdict = engine(0.0)
            .evaluate(&employee(22, 50_000.0, 10_000.0, 4.0))
            .unwrap();
        assert!(verdict.is_compliant);
        assert!(verdict.derived_flags.target_not_met);
        assert_eq!(verdict.non_compliance_reason, None);
    }

    #[test]
    fn sales_alone_is_not_enough() {
        let verdict = engine(0.0)
            .evaluate(&employee(10, 50_000.0, 60_000.0, 2.0))
            .unwrap();
        assert!(!verdict.is_compliant);
        assert_eq!(
            verdict.non_compliance_reason.as_deref(),
            Some("Insufficient working days, Low customer satisfaction")
        );
    }

    #[rstest]
    #[case(0.0)]
    #[case(0.5)]
    #[case(0.999_999)]
    #[case(7.0)]
    #[case(-3.0)]
    #[case(f64::NAN)]
    fn confidence_is_always_clamped(#[case] noise: f64) {
        for record in [
            employee(22, 50_000.0, 55_000.0, 5.0),
            employee(15, 50_000.0, 30_000.0, 2.0),
            employee(22, 50_000.0, 10_000.0, 4.0),
        ] {
            let verdict = engine(noise).evaluate(&record).unwrap();
            assert!(
                (0.55..=0.95).contains(&verdict.confidence),
                "confidence {} out of range",
                verdict.confidence
            );
        }
    }

    #[test]
    fn noise_is_scaled_into_span() {
        // score 0.6 + 0.5 * 0.2 = 0.7
        let verdict = engine(0.5)
            .evaluate(&employee(22, 50_000.0, 10_000.0, 4.0))
            .unwrap();
        assert!((verdict.confidence - 0.7).abs() < 1e-9);
    }

    #[rstest]
    #[case::zero_target(0.0)]
    #[case::negative_target(-100.0)]
    #[case::infinite_target(f64::INFINITY)]
    fn unusable_target_is_a_validation_error(#[case] target: f64) {
        let err = engine(0.0)
            .evaluate(&employee(22, target, 1_000.0, 4.0))
            .unwrap_err();
        assert!(matches!(err, RuleError::Validation(_)));
    }

    #[test]
    fn month_length_is_configurable() {
        let engine = RuleEngine::new(
            RuleThresholds::default().with_full_month_days(20),
            Arc::new(FixedNoise(0.0)),
        );
        let assessment = engine.assess(&employee(16, 1.0, 1.0, 4.0)).unwrap();
        assert!((assessment.working_days_ratio - 0.8).abs() < 1e-12);
        assert!(assessment.flags.low_working_days);
        assert_eq!(assessment.score_bps, 10_000);
    }
}
