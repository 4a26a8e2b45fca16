use chrono::NaiveDate;
use clap::Args;
use serde_json::Value;

use islamic_finance_core::contracts::{parse_contract, ContractTerms};
use islamic_finance_core::schedules;

use crate::input;

/// Arguments for payment schedules
#[derive(Args)]
pub struct ScheduleArgs {
    /// Path to JSON contract terms (Murabaha or Ijarah)
    #[arg(long)]
    pub input: Option<String>,

    /// Contract start date (YYYY-MM-DD)
    #[arg(long)]
    pub start: NaiveDate,
}

/// Arguments for early settlement
#[derive(Args)]
pub struct SettlementArgs {
    /// Path to JSON Murabaha terms
    #[arg(long)]
    pub input: Option<String>,

    /// Installments already paid
    #[arg(long)]
    pub paid: u32,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let value = input::contract_value(args.input.as_deref(), "payment schedule")?;
    match parse_contract(&value)? {
        ContractTerms::Murabaha(t) => Ok(serde_json::to_value(schedules::murabaha_schedule(
            &t, args.start,
        )?)?),
        ContractTerms::Ijarah(t) => Ok(serde_json::to_value(schedules::ijarah_schedule(
            &t, args.start,
        )?)?),
        other => Err(format!(
            "{} contracts have no payment schedule",
            other.contract_type().display_name()
        )
        .into()),
    }
}

pub fn run_settlement(args: SettlementArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let value = input::contract_value(args.input.as_deref(), "early settlement")?;
    match parse_contract(&value)? {
        ContractTerms::Murabaha(t) => Ok(serde_json::to_value(
            schedules::murabaha_early_settlement(&t, args.paid)?,
        )?),
        other => Err(format!(
            "early settlement applies to Murabaha only, not {}",
            other.contract_type().display_name()
        )
        .into()),
    }
}
