//! Derivation of publishable investment terms from contract terms.
//!
//! Each variant has its own calculator module producing a [`Derivation`]: the
//! normalised [`InvestmentTerms`] plus the intermediate figures they were
//! built from. The explanation generator reads the same [`Derivation`], so
//! narrative text and published numbers cannot drift apart.

pub mod ijarah;
pub mod mudarabah;
pub mod murabaha;
pub mod musharakah;
pub mod salam;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::contracts::{parse_contract, ContractTerms, ContractType};
use crate::error::IslamicFinanceError;
use crate::policy::{TermPolicy, VariantPolicy};
use crate::types::*;
use crate::IslamicFinanceResult;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Investor-facing terms of an investment opportunity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentTerms {
    /// Lower bound of the expected annual return, in percent.
    pub return_min: Percent,
    /// Upper bound of the expected annual return, in percent.
    pub return_max: Percent,
    /// Copied from the contract duration.
    pub term_months: Months,
    /// Smallest accepted ticket, whole currency units.
    pub minimum_investment: Money,
    /// Fundraising campaign length.
    pub campaign_days: u32,
}

/// Where the annual return figure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnBasis {
    /// Murabaha profit rate spread over the term in years.
    ProfitRate,
    /// Stated `expectedAnnualReturn`.
    ExpectedAnnualReturn,
    /// Stated `expectedReturnRate` (older documents).
    ExpectedReturnRate,
    /// Investor profit share applied to the policy baseline return.
    BaselineEstimate,
    /// Ijarah annual rent over asset value.
    RentalYield,
    /// Salam delivery margin over the advance, spread over the term in years.
    SalamMargin,
}

/// A calculator's result together with the figures it used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Derivation {
    pub contract_type: ContractType,
    pub basis: ReturnBasis,
    /// Rate the calculation started from (profit rate, margin, yield or
    /// expected return), rounded to two decimals.
    pub source_rate: Percent,
    /// Annual return before the band is applied, rounded to two decimals.
    pub annual_return: Percent,
    /// Amount the minimum ticket is a share of.
    pub minimum_investment_basis: Money,
    pub minimum_investment_pct: Percent,
    pub minimum_investment_floor: Money,
    pub terms: InvestmentTerms,
    pub warnings: Vec<String>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Route typed contract terms to the matching calculator.
pub fn derive(terms: &ContractTerms, policy: &TermPolicy) -> IslamicFinanceResult<Derivation> {
    policy.validate()?;
    terms.ensure_in_range()?;

    let derivation = match terms {
        ContractTerms::Murabaha(t) => murabaha::derive_murabaha(t, &policy.murabaha)?,
        ContractTerms::Mudarabah(t) => mudarabah::derive_mudarabah(t, &policy.mudarabah)?,
        ContractTerms::Musharakah(t) => musharakah::derive_musharakah(t, &policy.musharakah)?,
        ContractTerms::Ijarah(t) => ijarah::derive_ijarah(t, &policy.ijarah)?,
        ContractTerms::Salam(t) => salam::derive_salam(t, &policy.salam)?,
    };

    debug_assert!(derivation.terms.return_max >= derivation.terms.return_min);
    debug_assert!(derivation.terms.return_min >= Decimal::ZERO);

    tracing::debug!(
        contract_type = %derivation.contract_type,
        annual_return = %derivation.annual_return,
        return_min = %derivation.terms.return_min,
        return_max = %derivation.terms.return_max,
        "derived investment terms"
    );
    Ok(derivation)
}

/// Derive investment terms for typed contract terms.
pub fn derive_investment_terms(
    terms: &ContractTerms,
    policy: &TermPolicy,
) -> IslamicFinanceResult<ComputationOutput<InvestmentTerms>> {
    let derivation = derive(terms, policy)?;
    let variant_policy = policy.for_contract(derivation.contract_type);

    Ok(with_metadata(
        methodology(derivation.contract_type),
        &serde_json::json!({
            "contract_type": derivation.contract_type,
            "return_basis": derivation.basis,
            "source_rate": derivation.source_rate.to_string(),
            "annual_return": derivation.annual_return.to_string(),
            "band": variant_policy.band,
            "minimum_investment": variant_policy.minimum_investment,
            "minimum_investment_basis": derivation.minimum_investment_basis.to_string(),
            "campaign": variant_policy.campaign,
        }),
        derivation.warnings,
        derivation.terms,
    ))
}

/// Classify an opaque contract value and derive its investment terms.
///
/// Any unrecognised or malformed contract yields an error for which
/// [`IslamicFinanceError::is_no_derivable_terms`] holds.
pub fn derive_investment_terms_from_value(
    value: &Value,
    policy: &TermPolicy,
) -> IslamicFinanceResult<ComputationOutput<InvestmentTerms>> {
    let terms = parse_contract(value)?;
    derive_investment_terms(&terms, policy)
}

fn methodology(contract_type: ContractType) -> &'static str {
    match contract_type {
        ContractType::Murabaha => "Murabaha: profit rate spread over term in years, symmetric band",
        ContractType::Mudarabah => {
            "Mudarabah: expected annual return (or baseline estimate from investor share), upside-skewed band"
        }
        ContractType::Musharakah => {
            "Musharakah: expected annual return (or baseline estimate from investor share), asymmetric band"
        }
        ContractType::Ijarah => "Ijarah: annual rental yield on asset value, symmetric band",
        ContractType::Salam => "Salam: delivery margin over advance spread over term in years, symmetric band",
    }
}

// ---------------------------------------------------------------------------
// Shared calculator helpers
// ---------------------------------------------------------------------------

/// Apply a variant policy to an unrounded annual return.
pub(crate) fn build_terms(
    annual_return: Percent,
    duration: Months,
    minimum_basis: Money,
    policy: &VariantPolicy,
) -> IslamicFinanceResult<InvestmentTerms> {
    let return_min =
        round_percent(checked_difference(annual_return, policy.band.below, "returnMin")?).max(Decimal::ZERO);
    let return_max =
        round_percent(checked_sum(annual_return, policy.band.above, "returnMax")?).max(return_min);

    let minimum_investment = round_currency(apply_percent(
        minimum_basis,
        policy.minimum_investment.percent_of_basis,
        "minimumInvestment",
    )?)
    .max(round_currency(policy.minimum_investment.floor));

    Ok(InvestmentTerms {
        return_min,
        return_max,
        term_months: duration,
        minimum_investment,
        campaign_days: policy.campaign.days_for(duration),
    })
}

/// Assemble a [`Derivation`] from a calculator's intermediate figures.
#[allow(clippy::too_many_arguments)]
pub(crate) fn finish(
    contract_type: ContractType,
    basis: ReturnBasis,
    source_rate: Percent,
    annual_return: Percent,
    duration: Months,
    minimum_basis: Money,
    policy: &VariantPolicy,
    mut warnings: Vec<String>,
) -> IslamicFinanceResult<Derivation> {
    if annual_return < Decimal::ZERO {
        warnings.push(format!(
            "Computed annual return {}% is negative; return range floored at zero",
            round_percent(annual_return)
        ));
    }

    Ok(Derivation {
        contract_type,
        basis,
        source_rate: round_percent(source_rate),
        annual_return: round_percent(annual_return),
        minimum_investment_basis: minimum_basis,
        minimum_investment_pct: policy.minimum_investment.percent_of_basis,
        minimum_investment_floor: policy.minimum_investment.floor,
        terms: build_terms(annual_return, duration, minimum_basis, policy)?,
        warnings,
    })
}

pub(crate) fn ensure_duration(duration: Months) -> IslamicFinanceResult<()> {
    if duration == 0 {
        return Err(IslamicFinanceError::InvalidInput {
            field: "duration".into(),
            reason: "Duration must be at least one month".into(),
        });
    }
    Ok(())
}

pub(crate) fn ensure_non_negative(value: Decimal, field: &str) -> IslamicFinanceResult<()> {
    if value < Decimal::ZERO {
        return Err(IslamicFinanceError::InvalidInput {
            field: field.into(),
            reason: "Cannot be negative".into(),
        });
    }
    Ok(())
}

pub(crate) fn ensure_positive(value: Decimal, field: &str) -> IslamicFinanceResult<()> {
    if value <= Decimal::ZERO {
        return Err(IslamicFinanceError::InvalidInput {
            field: field.into(),
            reason: "Must be positive".into(),
        });
    }
    Ok(())
}

/// A value about to be used as a divisor: zero is a division error,
/// negative is invalid input.
pub(crate) fn ensure_divisor(value: Decimal, field: &str, context: &str) -> IslamicFinanceResult<()> {
    if value.is_zero() {
        return Err(IslamicFinanceError::DivisionByZero {
            context: format!("{context}: {field} is zero"),
        });
    }
    ensure_positive(value, field)
}

pub(crate) fn ensure_percent(value: Percent, field: &str) -> IslamicFinanceResult<()> {
    if value < Decimal::ZERO || value > rust_decimal_macros::dec!(100) {
        return Err(IslamicFinanceError::InvalidInput {
            field: field.into(),
            reason: "Must be between 0 and 100".into(),
        });
    }
    Ok(())
}

pub(crate) fn ensure_full_split(
    a: Percent,
    b: Percent,
    field: &str,
) -> IslamicFinanceResult<()> {
    if !is_full_split(a, b) {
        return Err(IslamicFinanceError::InvalidInput {
            field: field.into(),
            reason: match a.checked_add(b) {
                Some(sum) => format!("Shares must sum to 100% (got {sum}%)"),
                None => "Shares must sum to 100%".into(),
            },
        });
    }
    Ok(())
}

/// First stated rate that is present and non-zero. Unset numeric fields in
/// stored contract documents are written as zero, so zero means "not stated".
pub(crate) fn first_stated(rates: &[(Option<Percent>, ReturnBasis)]) -> Option<(Percent, ReturnBasis)> {
    rates
        .iter()
        .find_map(|(rate, basis)| rate.filter(|r| !r.is_zero()).map(|r| (r, *basis)))
}
