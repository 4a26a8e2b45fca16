use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use islamic_finance_core::distribution;

use crate::input;

/// Arguments for profit and loss distribution
#[derive(Args)]
pub struct DistributeArgs {
    /// Path to JSON contract terms (Musharakah or Mudarabah)
    #[arg(long)]
    pub input: Option<String>,

    /// Actual profit for the period
    #[arg(long)]
    pub profit: Option<Decimal>,

    /// Actual loss for the period
    #[arg(long)]
    pub loss: Option<Decimal>,
}

pub fn run_distribute(args: DistributeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let value = input::contract_value(args.input.as_deref(), "distribution")?;
    let profit = args.profit.unwrap_or(dec!(0));
    let loss = args.loss.unwrap_or(dec!(0));
    if profit.is_zero() && loss.is_zero() {
        return Err("--profit and/or --loss is required for distribution".into());
    }
    let result = distribution::distribute_from_value(&value, profit, loss)?;
    Ok(serde_json::to_value(result)?)
}
