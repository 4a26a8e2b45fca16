use chrono::NaiveDate;
use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use islamic_finance_core::contracts::{parse_contract, ContractTerms};
use islamic_finance_core::policy::TermPolicy;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_value(json: &str) -> NapiResult<Value> {
    serde_json::from_str(json).map_err(to_napi_error)
}

fn parse_policy(policy_json: Option<String>) -> NapiResult<TermPolicy> {
    match policy_json {
        Some(json) => serde_json::from_str(&json).map_err(to_napi_error),
        None => Ok(TermPolicy::default()),
    }
}

// ---------------------------------------------------------------------------
// Contracts
// ---------------------------------------------------------------------------

#[napi]
pub fn classify_contract(contract_json: String) -> NapiResult<String> {
    let value = parse_value(&contract_json)?;
    let contract_type = islamic_finance_core::classify(&value).map_err(to_napi_error)?;
    Ok(contract_type.as_str().to_string())
}

// ---------------------------------------------------------------------------
// Investment terms
// ---------------------------------------------------------------------------

#[napi]
pub fn derive_investment_terms(contract_json: String, policy_json: Option<String>) -> NapiResult<String> {
    let value = parse_value(&contract_json)?;
    let policy = parse_policy(policy_json)?;
    let output = islamic_finance_core::derive_investment_terms_from_value(&value, &policy)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn explain_derivation(contract_json: String, policy_json: Option<String>) -> NapiResult<String> {
    let value = parse_value(&contract_json)?;
    let policy = parse_policy(policy_json)?;
    islamic_finance_core::explain_derivation_from_value(&value, &policy).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Distribution
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DistributionRequest {
    contract: Value,
    #[serde(default)]
    actual_profit: Decimal,
    #[serde(default)]
    actual_loss: Decimal,
}

#[napi]
pub fn distribute_profit_loss(input_json: String) -> NapiResult<String> {
    let req: DistributionRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = islamic_finance_core::distribute_from_value(
        &req.contract,
        req.actual_profit,
        req.actual_loss,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Compliance and metrics
// ---------------------------------------------------------------------------

#[napi]
pub fn check_compliance(contract_json: String) -> NapiResult<String> {
    let value = parse_value(&contract_json)?;
    let output = islamic_finance_core::compliance::check_compliance_from_value(&value)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn contract_metrics(contract_json: String, actual_profit: Option<String>) -> NapiResult<String> {
    let value = parse_value(&contract_json)?;
    let actual_profit = actual_profit
        .map(|p| p.parse::<Decimal>())
        .transpose()
        .map_err(to_napi_error)?;
    let output = islamic_finance_core::metrics::compute_metrics_from_value(&value, actual_profit)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Schedules
// ---------------------------------------------------------------------------

#[napi]
pub fn payment_schedule(contract_json: String, start_date: String) -> NapiResult<String> {
    let value = parse_value(&contract_json)?;
    let start: NaiveDate = start_date.parse().map_err(to_napi_error)?;
    let terms = parse_contract(&value).map_err(to_napi_error)?;
    match terms {
        ContractTerms::Murabaha(t) => {
            let output = islamic_finance_core::schedules::murabaha_schedule(&t, start)
                .map_err(to_napi_error)?;
            serde_json::to_string(&output).map_err(to_napi_error)
        }
        ContractTerms::Ijarah(t) => {
            let output = islamic_finance_core::schedules::ijarah_schedule(&t, start)
                .map_err(to_napi_error)?;
            serde_json::to_string(&output).map_err(to_napi_error)
        }
        other => Err(napi::Error::from_reason(format!(
            "{} contracts have no payment schedule",
            other.contract_type().display_name()
        ))),
    }
}

#[napi]
pub fn early_settlement(contract_json: String, paid_installments: u32) -> NapiResult<String> {
    let value = parse_value(&contract_json)?;
    match parse_contract(&value).map_err(to_napi_error)? {
        ContractTerms::Murabaha(t) => {
            let output = islamic_finance_core::schedules::murabaha_early_settlement(&t, paid_installments)
                .map_err(to_napi_error)?;
            serde_json::to_string(&output).map_err(to_napi_error)
        }
        other => Err(napi::Error::from_reason(format!(
            "early settlement applies to Murabaha only, not {}",
            other.contract_type().display_name()
        ))),
    }
}
