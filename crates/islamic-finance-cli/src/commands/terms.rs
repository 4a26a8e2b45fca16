use clap::Args;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use islamic_finance_core::explanation;
use islamic_finance_core::ContractType;
use islamic_finance_core::policy::TermPolicy;
use islamic_finance_core::terms;

use crate::input;

/// Arguments for investment term derivation
#[derive(Args)]
pub struct TermsArgs {
    /// Path to JSON contract terms
    #[arg(long)]
    pub input: Option<String>,

    /// Attach the derivation explanation to the output
    #[arg(long)]
    pub explain: bool,
}

/// Arguments for the derivation explanation
#[derive(Args)]
pub struct ExplainArgs {
    /// Path to JSON contract terms
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExplainOutput {
    contract_type: ContractType,
    explanation: String,
}

pub fn run_terms(args: TermsArgs, policy: &TermPolicy) -> Result<Value, Box<dyn std::error::Error>> {
    let value = input::contract_value(args.input.as_deref(), "term derivation")?;
    let output = terms::derive_investment_terms_from_value(&value, policy)?;
    let mut rendered = serde_json::to_value(output)?;

    if args.explain {
        let text = explanation::explain_derivation_from_value(&value, policy)?;
        if let Some(obj) = rendered.as_object_mut() {
            obj.insert("explanation".into(), Value::String(text));
        }
    }
    Ok(rendered)
}

pub fn run_explain(args: ExplainArgs, policy: &TermPolicy) -> Result<Value, Box<dyn std::error::Error>> {
    let value = input::contract_value(args.input.as_deref(), "explanation")?;
    let contract_type = islamic_finance_core::classify(&value)?;
    let output = ExplainOutput {
        contract_type,
        explanation: explanation::explain_derivation_from_value(&value, policy)?,
    };
    Ok(json!({ "result": serde_json::to_value(output)? }))
}
