//! Musharakah profit and loss distribution.
//!
//! Profits are split by the negotiated profit shares. Losses are split by
//! capital contribution, computed fresh from `party1Capital` and
//! `party2Capital` on every call. The stored `party1LossShare` /
//! `party2LossShare` are display values only; when they drift from the
//! capital ratio the result carries a [`LossShareDiscrepancy`] so the stored
//! contract can be corrected upstream.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ensure_period_amounts, split_by_weights, DistributionResult, SplitBasis};
use crate::contracts::MusharakahTerms;
use crate::terms::musharakah::validate_partnership;
use crate::types::*;
use crate::IslamicFinanceResult;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Stored loss shares that disagree with the capital ratio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LossShareDiscrepancy {
    pub stored_party1_loss_share: Percent,
    pub stored_party2_loss_share: Percent,
    /// Capital ratio of party 1, rounded to two decimals.
    pub party1_capital_ratio: Percent,
    pub party2_capital_ratio: Percent,
}

impl std::fmt::Display for LossShareDiscrepancy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Stored loss shares {}/{} do not match capital ratio {}/{}; losses are allocated by capital ratio",
            self.stored_party1_loss_share,
            self.stored_party2_loss_share,
            self.party1_capital_ratio,
            self.party2_capital_ratio
        )
    }
}

/// One partner's outcome for the period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyPosition {
    pub label: String,
    pub capital: Money,
    pub profit_share: Money,
    pub loss_share: Money,
    /// `profit_share - loss_share`.
    pub net_result: Money,
    /// Net result over own capital, in percent, two decimals.
    pub roi_pct: Percent,
    /// Capital after absorbing this period's loss, floored at zero.
    pub capital_remaining: Money,
}

/// Full Musharakah distribution for a reporting period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MusharakahDistribution {
    /// Present only when the period made a profit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profit: Option<DistributionResult>,
    /// Present only when the period made a loss.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loss: Option<DistributionResult>,
    /// `actual_profit - actual_loss`.
    pub net_result: Money,
    pub party1: PartyPosition,
    pub party2: PartyPosition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loss_share_discrepancy: Option<LossShareDiscrepancy>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Each party's capital over total capital, in percent (unrounded).
/// Returns `None` unless both capitals are positive.
pub fn capital_ratio(terms: &MusharakahTerms) -> Option<(Percent, Percent)> {
    if terms.party1_capital <= Decimal::ZERO || terms.party2_capital <= Decimal::ZERO {
        return None;
    }
    let total = terms.party1_capital.checked_add(terms.party2_capital)?;
    Some((
        percent_of(terms.party1_capital, total, "party1Capital").ok()?,
        percent_of(terms.party2_capital, total, "party2Capital").ok()?,
    ))
}

/// Compare stored loss shares against the capital ratio.
pub fn check_loss_shares(terms: &MusharakahTerms) -> Option<LossShareDiscrepancy> {
    let (ratio1, ratio2) = capital_ratio(terms)?;
    let matches = within_tolerance(terms.party1_loss_share, ratio1)
        && within_tolerance(terms.party2_loss_share, ratio2);
    if matches {
        return None;
    }
    Some(LossShareDiscrepancy {
        stored_party1_loss_share: terms.party1_loss_share,
        stored_party2_loss_share: terms.party2_loss_share,
        party1_capital_ratio: round_percent(ratio1),
        party2_capital_ratio: round_percent(ratio2),
    })
}

/// Distribute a period's profit and loss between the two partners.
pub fn distribute_musharakah(
    terms: &MusharakahTerms,
    actual_profit: Money,
    actual_loss: Money,
) -> IslamicFinanceResult<ComputationOutput<MusharakahDistribution>> {
    terms.ensure_in_range()?;
    validate_partnership(terms)?;
    ensure_period_amounts(actual_profit, actual_loss)?;

    let mut warnings: Vec<String> = Vec::new();
    let discrepancy = check_loss_shares(terms);
    if let Some(ref d) = discrepancy {
        tracing::warn!(
            stored_party1 = %d.stored_party1_loss_share,
            capital_party1 = %d.party1_capital_ratio,
            "musharakah loss shares drift from capital ratio"
        );
        warnings.push(d.to_string());
    }

    let profit = (actual_profit > Decimal::ZERO)
        .then(|| {
            split_by_weights(
                actual_profit,
                terms.party1_profit_share,
                terms.party2_profit_share,
                SplitBasis::ProfitRatio,
            )
        })
        .transpose()?;
    let loss = (actual_loss > Decimal::ZERO)
        .then(|| {
            split_by_weights(
                actual_loss,
                terms.party1_capital,
                terms.party2_capital,
                SplitBasis::CapitalRatio,
            )
        })
        .transpose()?;

    let party1 = position(
        terms.party1_label(),
        terms.party1_capital,
        profit.as_ref().map(|p| p.party1_share),
        loss.as_ref().map(|l| l.party1_share),
    )?;
    let party2 = position(
        terms.party2_label(),
        terms.party2_capital,
        profit.as_ref().map(|p| p.party2_share),
        loss.as_ref().map(|l| l.party2_share),
    )?;

    let output = MusharakahDistribution {
        profit,
        loss,
        net_result: actual_profit - actual_loss,
        party1,
        party2,
        loss_share_discrepancy: discrepancy,
    };

    Ok(with_metadata(
        "Musharakah distribution: profit by negotiated ratio, loss by capital ratio",
        &serde_json::json!({
            "actual_profit": actual_profit.to_string(),
            "actual_loss": actual_loss.to_string(),
            "party1_profit_share": terms.party1_profit_share.to_string(),
            "party2_profit_share": terms.party2_profit_share.to_string(),
            "loss_basis": "capital_ratio",
        }),
        warnings,
        output,
    ))
}

fn position(
    label: &str,
    capital: Money,
    profit_share: Option<Money>,
    loss_share: Option<Money>,
) -> IslamicFinanceResult<PartyPosition> {
    let profit_share = profit_share.unwrap_or(Decimal::ZERO);
    let loss_share = loss_share.unwrap_or(Decimal::ZERO);
    let net_result = profit_share - loss_share;
    Ok(PartyPosition {
        label: label.to_string(),
        capital,
        profit_share,
        loss_share,
        net_result,
        roi_pct: round_percent(percent_of(net_result, capital, "roi")?),
        capital_remaining: (capital - loss_share).max(Decimal::ZERO),
    })
}
