//! Pipeline artifacts: the employee record, its verdict, and the on-chain record.

mod employee;
mod transaction;
mod verdict;

pub use employee::EmployeeRecord;
pub use transaction::TransactionRecord;
pub use verdict::{ComplianceVerdict, DerivedFlags};
