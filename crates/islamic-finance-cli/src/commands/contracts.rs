use clap::Args;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use islamic_finance_core::contracts::{self, ContractType};

use crate::input;

/// Arguments for contract classification
#[derive(Args)]
pub struct ClassifyArgs {
    /// Path to JSON contract terms
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClassifyOutput {
    contract_type: ContractType,
    display_name: String,
    description: String,
    profit_sharing: bool,
    well_formed: bool,
}

impl ClassifyOutput {
    fn new(contract_type: ContractType, well_formed: bool) -> Self {
        ClassifyOutput {
            contract_type,
            display_name: contract_type.display_name().to_string(),
            description: contract_type.description().to_string(),
            profit_sharing: contract_type.is_profit_sharing(),
            well_formed,
        }
    }
}

pub fn run_classify(args: ClassifyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let value = input::contract_value(args.input.as_deref(), "classification")?;
    let contract_type = contracts::classify(&value)?;
    // Classification alone does not prove the document is complete.
    let well_formed = contracts::parse_contract(&value).is_ok();

    let output = ClassifyOutput::new(contract_type, well_formed);
    Ok(json!({ "result": serde_json::to_value(output)? }))
}
