use att_core::entities::EmployeeRecord;
use clap::{Args, Subcommand, ValueEnum};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Evaluate an employee-month and print the verdict.
    Predict(PredictArgs),
    /// Evaluate, then record the verdict on-chain.
    Record(RecordArgs),
    /// Look up a submitted transaction once.
    Status(StatusArgs),
    /// Print the effective configuration.
    Config,
    /// Print the JSON Schema of a data type.
    Schema(SchemaArgs),
}

/// Performance data for one employee-month.
#[derive(Clone, Debug, Args)]
pub struct EmployeeArgs {
    #[arg(long)]
    pub employee_id: String,
    #[arg(long)]
    pub name: String,
    /// Days worked this month (1-31).
    #[arg(long)]
    pub working_days: u32,
    #[arg(long)]
    pub target_sales: f64,
    #[arg(long)]
    pub actual_sales: f64,
    /// Customer satisfaction score (1-5).
    #[arg(long)]
    pub satisfaction: f64,
    /// Calendar month, YYYY-MM.
    #[arg(long)]
    pub month: String,
}

impl From<EmployeeArgs> for EmployeeRecord {
    fn from(args: EmployeeArgs) -> Self {
        Self {
            employee_id: args.employee_id,
            name: args.name,
            working_days: args.working_days,
            target_sales: args.target_sales,
            actual_sales: args.actual_sales,
            customer_satisfaction_score: args.satisfaction,
            month: args.month,
        }
    }
}

#[derive(Clone, Debug, Args)]
pub struct PredictArgs {
    #[command(flatten)]
    pub employee: EmployeeArgs,
    /// Ask the configured prediction API instead of evaluating locally.
    #[arg(long)]
    pub remote: bool,
}

#[derive(Clone, Debug, Args)]
pub struct RecordArgs {
    #[command(flatten)]
    pub employee: EmployeeArgs,
    #[arg(long)]
    pub remote: bool,
    /// Keep polling until the transaction is confirmed or fails.
    #[arg(long)]
    pub wait: bool,
}

#[derive(Clone, Debug, Args)]
pub struct StatusArgs {
    /// Transaction hash.
    pub hash: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SchemaType {
    Employee,
    Verdict,
    Transaction,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    #[arg(value_enum)]
    pub type_name: SchemaType,
}
