//! Prediction over HTTP: `POST {base}/api/predict`.

use std::time::Duration;

use async_trait::async_trait;
use att_core::entities::{ComplianceVerdict, EmployeeRecord};

use crate::error::{PredictionError, RuleError};
use crate::predictor::Predictor;

/// Client for a remote prediction API that speaks the camelCase record and
/// verdict shapes.
#[derive(Debug, Clone)]
pub struct HttpPredictor {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpPredictor {
    /// # Errors
    ///
    /// Returns `PredictionError::Http` if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, PredictionError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("attest/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            http,
            endpoint: predict_endpoint(base_url),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Predictor for HttpPredictor {
    async fn predict(&self, record: &EmployeeRecord) -> Result<ComplianceVerdict, PredictionError> {
        record.validate().map_err(RuleError::from)?;

        tracing::debug!(
            endpoint = %self.endpoint,
            employee_id = %record.employee_id,
            "requesting remote prediction"
        );
        let resp = self.http.post(&self.endpoint).json(record).send().await?;
        let resp = check_response(resp).await?;
        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| PredictionError::InvalidResponse(e.to_string()))?;
        decode_verdict(body)
    }
}

fn predict_endpoint(base_url: &str) -> String {
    format!("{}/api/predict", base_url.trim_end_matches('/'))
}

/// Map non-success statuses to [`PredictionError::Api`].
async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, PredictionError> {
    if !resp.status().is_success() {
        return Err(PredictionError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

/// Parse a verdict body and reject values the pipeline cannot use.
fn decode_verdict(body: serde_json::Value) -> Result<ComplianceVerdict, PredictionError> {
    let mut verdict: ComplianceVerdict = serde_json::from_value(body)
        .map_err(|e| PredictionError::InvalidResponse(e.to_string()))?;

    if !(verdict.confidence.is_finite() && (0.0..=1.0).contains(&verdict.confidence)) {
        return Err(PredictionError::InvalidResponse(format!(
            "confidence must be within [0, 1], got {}",
            verdict.confidence
        )));
    }
    if verdict
        .non_compliance_reason
        .as_deref()
        .is_some_and(|reason| reason.trim().is_empty())
    {
        verdict.non_compliance_reason = None;
    }

    let expects_reason = !verdict.is_compliant && verdict.derived_flags.any();
    match (expects_reason, verdict.non_compliance_reason.is_some()) {
        (true, false) => Err(PredictionError::InvalidResponse(
            "non-compliant verdict with raised flags must carry a reason".into(),
        )),
        (false, true) => Err(PredictionError::InvalidResponse(
            "reason given for a verdict that is compliant or has no raised flags".into(),
        )),
        _ => Ok(verdict),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn mock_response(status: u16, body: &'static str) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(status)
                .body(body)
                .unwrap(),
        )
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        assert_eq!(predict_endpoint("http://localhost:3001"), "http://localhost:3001/api/predict");
        assert_eq!(predict_endpoint("http://localhost:3001/"), "http://localhost:3001/api/predict");
    }

    #[tokio::test]
    async fn check_response_maps_server_error() {
        let err = check_response(mock_response(503, "model offline"))
            .await
            .unwrap_err();
        match err {
            PredictionError::Api { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "model offline");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn check_response_passes_success_through() {
        assert!(check_response(mock_response(200, "{}")).await.is_ok());
    }

    #[test]
    fn decodes_legacy_derived_fields_and_drops_blank_reason() {
        let verdict = decode_verdict(json!({
            "isCompliant": true,
            "confidence": 0.9,
            "derivedFields": {
                "lowWorkingDays": false,
                "targetNotMet": false,
                "lowCustomerSatisfaction": false
            },
            "nonComplianceReason": ""
        }))
        .unwrap();

        assert!(verdict.is_compliant);
        assert_eq!(verdict.non_compliance_reason, None);
    }

    #[test]
    fn rejects_out_of_range_confidence() {
        let err = decode_verdict(json!({
            "isCompliant": false,
            "confidence": 1.4,
            "derivedFlags": {
                "lowWorkingDays": true,
                "targetNotMet": false,
                "lowCustomerSatisfaction": false
            },
            "nonComplianceReason": "Insufficient working days"
        }))
        .unwrap_err();
        assert!(matches!(err, PredictionError::InvalidResponse(_)));
    }

    #[test]
    fn rejects_reason_that_disagrees_with_the_verdict() {
        let compliant_with_reason = decode_verdict(json!({
            "isCompliant": true,
            "confidence": 0.9,
            "derivedFlags": {
                "lowWorkingDays": false,
                "targetNotMet": false,
                "lowCustomerSatisfaction": false
            },
            "nonComplianceReason": "Sales target not met"
        }));
        assert!(matches!(
            compliant_with_reason,
            Err(PredictionError::InvalidResponse(_))
        ));

        let flagged_without_reason = decode_verdict(json!({
            "isCompliant": false,
            "confidence": 0.6,
            "derivedFlags": {
                "lowWorkingDays": true,
                "targetNotMet": false,
                "lowCustomerSatisfaction": false
            }
        }));
        assert!(matches!(
            flagged_without_reason,
            Err(PredictionError::InvalidResponse(_))
        ));
    }

    #[test]
    fn accepts_flagged_verdict_with_reason() {
        let verdict = decode_verdict(json!({
            "isCompliant": false,
            "confidence": 0.6,
            "derivedFlags": {
                "lowWorkingDays": true,
                "targetNotMet": false,
                "lowCustomerSatisfaction": false
            },
            "nonComplianceReason": "Insufficient working days"
        }))
        .unwrap();
        assert_eq!(
            verdict.non_compliance_reason.as_deref(),
            Some("Insufficient working days")
        );
    }

    #[test]
    fn rejects_body_missing_fields() {
        let err = decode_verdict(json!({ "ok": true })).unwrap_err();
        assert!(matches!(err, PredictionError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn invalid_record_is_rejected_before_any_request() {
        let predictor = HttpPredictor::new("http://127.0.0.1:9").unwrap();
        let record = EmployeeRecord {
            employee_id: "EMP001".into(),
            name: "John Doe".into(),
            working_days: 40,
            target_sales: 1.0,
            actual_sales: 1.0,
            customer_satisfaction_score: 3.0,
            month: "2024-01".into(),
        };
        let err = predictor.predict(&record).await.unwrap_err();
        assert!(matches!(err, PredictionError::Rules(_)));
    }
}
