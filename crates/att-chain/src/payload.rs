//! The compliance record as the contract sees it.
//!
//! Contract method:
//!
//! ```text
//! recordCompliance(string employeeId, string name, bool isCompliant,
//!                  uint256 confidence, string month, string reason)
//! ```
//!
//! `confidence` is in basis points (`0..=10_000`). `reason` is empty for
//! compliant records.

use att_core::entities::{ComplianceVerdict, EmployeeRecord};
use serde::{Deserialize, Serialize};

/// `keccak256("recordCompliance(string,string,bool,uint256,string,string)")[..4]`
pub const RECORD_COMPLIANCE_SELECTOR: [u8; 4] = [0xc8, 0x2f, 0x9a, 0x93];

const WORD: usize = 32;
const ARG_COUNT: usize = 6;

/// Map a `[0, 1]` confidence to basis points, rounding half away from zero.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn confidence_to_basis_points(confidence: f64) -> u32 {
    if confidence.is_nan() {
        return 0;
    }
    (confidence.clamp(0.0, 1.0) * 10_000.0).round() as u32
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompliancePayload {
    pub employee_id: String,
    pub name: String,
    pub is_compliant: bool,
    pub confidence_bps: u32,
    pub month: String,
    pub reason: String,
}

impl CompliancePayload {
    #[must_use]
    pub fn new(record: &EmployeeRecord, verdict: &ComplianceVerdict) -> Self {
        Self {
            employee_id: record.employee_id.clone(),
            name: record.name.clone(),
            is_compliant: verdict.is_compliant,
            confidence_bps: confidence_to_basis_points(verdict.confidence),
            month: record.month.clone(),
            reason: verdict.non_compliance_reason.clone().unwrap_or_default(),
        }
    }

    /// Arguments in call order, rendered as strings.
    #[must_use]
    pub fn wire_fields(&self) -> [(&'static str, String); ARG_COUNT] {
        [
            ("employeeId", self.employee_id.clone()),
            ("name", self.name.clone()),
            ("isCompliant", self.is_compliant.to_string()),
            ("confidence", self.confidence_bps.to_string()),
            ("month", self.month.clone()),
            ("reason", self.reason.clone()),
        ]
    }

    /// ABI-encoded calldata: selector, head words, then the string tails.
    #[must_use]
    pub fn encode_call(&self) -> Vec<u8> {
        enum Arg<'a> {
            Inline([u8; WORD]),
            Dynamic(&'a [u8]),
        }

        let args = [
            Arg::Dynamic(self.employee_id.as_bytes()),
            Arg::Dynamic(self.name.as_bytes()),
            Arg::Inline(uint_word(u64::from(self.is_compliant))),
            Arg::Inline(uint_word(u64::from(self.confidence_bps))),
            Arg::Dynamic(self.month.as_bytes()),
            Arg::Dynamic(self.reason.as_bytes()),
        ];

        let mut head = Vec::with_capacity(ARG_COUNT * WORD);
        let mut tail = Vec::new();
        for arg in &args {
            match arg {
                Arg::Inline(word) => head.extend_from_slice(word),
                Arg::Dynamic(bytes) => {
                    head.extend_from_slice(&uint_word((ARG_COUNT * WORD + tail.len()) as u64));
                    tail.extend_from_slice(&uint_word(bytes.len() as u64));
                    tail.extend_from_slice(bytes);
                    tail.resize(tail.len() + padding(bytes.len()), 0);
                }
            }
        }

        let mut out = Vec::with_capacity(4 + head.len() + tail.len());
        out.extend_from_slice(&RECORD_COMPLIANCE_SELECTOR);
        out.extend_from_slice(&head);
        out.extend_from_slice(&tail);
        out
    }

    /// [`Self::encode_call`] as a `0x`-prefixed hex string.
    #[must_use]
    pub fn encode_call_hex(&self) -> String {
        format!("0x{}", hex::encode(self.encode_call()))
    }
}

fn uint_word(value: u64) -> [u8; WORD] {
    let mut word = [0_u8; WORD];
    word[WORD - 8..].copy_from_slice(&value.to_be_bytes());
    word
}

const fn padding(len: usize) -> usize {
    (WORD - len % WORD) % WORD
}
