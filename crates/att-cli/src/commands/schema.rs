use att_core::entities::{ComplianceVerdict, EmployeeRecord, TransactionRecord};
use schemars::schema_for;

use crate::cli::GlobalFlags;
use crate::cli::commands::{SchemaArgs, SchemaType};
use crate::output::output;

/// Handle `attest schema`: print the JSON Schema of an artifact type.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let schema = match args.type_name {
        SchemaType::Employee => schema_for!(EmployeeRecord),
        SchemaType::Verdict => schema_for!(ComplianceVerdict),
        SchemaType::Transaction => schema_for!(TransactionRecord),
    };
    output(&schema, flags.format)
}
