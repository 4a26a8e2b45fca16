use clap::Args;
use serde_json::Value;

use islamic_finance_core::compliance;

use crate::input;

/// Arguments for compliance review
#[derive(Args)]
pub struct CheckArgs {
    /// Path to JSON contract terms
    #[arg(long)]
    pub input: Option<String>,

    /// Exit with an error when the contract has violations
    #[arg(long)]
    pub strict: bool,
}

pub fn run_check(args: CheckArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let value = input::contract_value(args.input.as_deref(), "compliance review")?;
    let output = compliance::check_compliance_from_value(&value)?;
    if args.strict && !output.result.is_compliant() {
        return Err(format!(
            "{} violation(s): {}",
            output.warnings.len(),
            output.warnings.join("; ")
        )
        .into());
    }
    Ok(serde_json::to_value(output)?)
}
