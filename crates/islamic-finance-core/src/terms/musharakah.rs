use super::{
    ensure_duration, ensure_full_split, ensure_non_negative, ensure_percent, ensure_positive,
    finish, first_stated, Derivation, ReturnBasis,
};
use crate::contracts::{ContractType, MusharakahTerms};
use crate::distribution::musharakah::check_loss_shares;
use crate::error::IslamicFinanceError;
use crate::policy::VariantPolicy;
use crate::types::apply_percent;
use crate::IslamicFinanceResult;

/// Musharakah: use the stated expected return, otherwise estimate it as
/// party 2's (the investor's) profit share of the policy baseline return.
/// Minimum ticket is a share of party 2's capital.
pub fn derive_musharakah(
    terms: &MusharakahTerms,
    policy: &VariantPolicy,
) -> IslamicFinanceResult<Derivation> {
    ensure_duration(terms.duration)?;
    validate_partnership(terms)?;
    if let Some(r) = terms.expected_annual_return {
        ensure_non_negative(r, "expectedAnnualReturn")?;
    }

    let mut warnings = Vec::new();
    if let Some(discrepancy) = check_loss_shares(terms) {
        warnings.push(discrepancy.to_string());
    }

    let (expected, basis) = match first_stated(&[(
        terms.expected_annual_return,
        ReturnBasis::ExpectedAnnualReturn,
    )]) {
        Some(stated) => stated,
        None => {
            let baseline = policy.baseline_return.ok_or_else(|| IslamicFinanceError::InvalidInput {
                field: "musharakah.baseline_return".into(),
                reason: "No expected return stated and no baseline configured".into(),
            })?;
            (
                apply_percent(baseline, terms.party2_profit_share, "expectedAnnualReturn")?,
                ReturnBasis::BaselineEstimate,
            )
        }
    };

    finish(
        ContractType::Musharakah,
        basis,
        expected,
        expected,
        terms.duration,
        terms.party2_capital,
        policy,
        warnings,
    )
}

/// Capital and profit-share checks shared with the distribution engine.
/// Stored loss shares are compared separately by `check_loss_shares`.
pub(crate) fn validate_partnership(terms: &MusharakahTerms) -> IslamicFinanceResult<()> {
    ensure_positive(terms.party1_capital, "party1Capital")?;
    ensure_positive(terms.party2_capital, "party2Capital")?;
    ensure_percent(terms.party1_profit_share, "party1ProfitShare")?;
    ensure_percent(terms.party2_profit_share, "party2ProfitShare")?;
    ensure_full_split(
        terms.party1_profit_share,
        terms.party2_profit_share,
        "party1ProfitShare/party2ProfitShare",
    )
}
