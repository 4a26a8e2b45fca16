use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use islamic_finance_core::metrics;

use crate::input;

/// Arguments for contract metrics
#[derive(Args)]
pub struct MetricsArgs {
    /// Path to JSON contract terms
    #[arg(long)]
    pub input: Option<String>,

    /// Realised profit, for the annualised ROI of profit-sharing contracts
    #[arg(long)]
    pub actual_profit: Option<Decimal>,
}

pub fn run_metrics(args: MetricsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let value = input::contract_value(args.input.as_deref(), "contract metrics")?;
    let result = metrics::compute_metrics_from_value(&value, args.actual_profit)?;
    Ok(serde_json::to_value(result)?)
}
