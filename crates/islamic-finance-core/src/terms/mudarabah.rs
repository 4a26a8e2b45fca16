use super::{
    ensure_duration, ensure_full_split, ensure_non_negative, ensure_percent, ensure_positive,
    finish, first_stated, Derivation, ReturnBasis,
};
use crate::contracts::{ContractType, MudarabahTerms};
use crate::error::IslamicFinanceError;
use crate::policy::VariantPolicy;
use crate::types::apply_percent;
use crate::IslamicFinanceResult;

/// Mudarabah: use the stated expected return, otherwise estimate it as the
/// investor's profit share of the policy baseline business return.
pub fn derive_mudarabah(
    terms: &MudarabahTerms,
    policy: &VariantPolicy,
) -> IslamicFinanceResult<Derivation> {
    ensure_duration(terms.duration)?;
    ensure_positive(terms.capital_amount, "capitalAmount")?;
    ensure_percent(terms.investor_profit_share, "investorProfitShare")?;
    ensure_percent(terms.mudarib_profit_share, "mudaribProfitShare")?;
    ensure_full_split(
        terms.investor_profit_share,
        terms.mudarib_profit_share,
        "investorProfitShare/mudaribProfitShare",
    )?;
    if let Some(r) = terms.expected_annual_return {
        ensure_non_negative(r, "expectedAnnualReturn")?;
    }
    if let Some(r) = terms.expected_return_rate {
        ensure_non_negative(r, "expectedReturnRate")?;
    }

    let (expected, basis) = match first_stated(&[
        (terms.expected_annual_return, ReturnBasis::ExpectedAnnualReturn),
        (terms.expected_return_rate, ReturnBasis::ExpectedReturnRate),
    ]) {
        Some(stated) => stated,
        None => {
            let baseline = policy.baseline_return.ok_or_else(|| IslamicFinanceError::InvalidInput {
                field: "mudarabah.baseline_return".into(),
                reason: "No expected return stated and no baseline configured".into(),
            })?;
            (
                apply_percent(baseline, terms.investor_profit_share, "expectedAnnualReturn")?,
                ReturnBasis::BaselineEstimate,
            )
        }
    };

    finish(
        ContractType::Mudarabah,
        basis,
        expected,
        expected,
        terms.duration,
        terms.capital_amount,
        policy,
        Vec::new(),
    )
}
