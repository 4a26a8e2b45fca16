use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ensure_period_amounts, split_by_weights, DistributionResult, SplitBasis};
use crate::contracts::MudarabahTerms;
use crate::terms::{ensure_full_split, ensure_percent, ensure_positive};
use crate::types::*;
use crate::IslamicFinanceResult;

/// Mudarabah distribution for a reporting period. Party 1 is the investor
/// (capital provider), party 2 the mudarib.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MudarabahDistribution {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profit: Option<DistributionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loss: Option<DistributionResult>,
    pub net_result: Money,
    /// Investor profit share minus the full capital loss.
    pub investor_net_result: Money,
    /// Investor net result over capital, in percent, two decimals.
    pub investor_roi_pct: Percent,
    /// The mudarib's net; never negative since it bears no capital loss.
    pub mudarib_net_result: Money,
    pub capital_remaining: Money,
}

/// Profit split by the agreed ratio; all capital loss falls on the investor.
pub fn distribute_mudarabah(
    terms: &MudarabahTerms,
    actual_profit: Money,
    actual_loss: Money,
) -> IslamicFinanceResult<ComputationOutput<MudarabahDistribution>> {
    terms.ensure_in_range()?;
    ensure_positive(terms.capital_amount, "capitalAmount")?;
    ensure_percent(terms.investor_profit_share, "investorProfitShare")?;
    ensure_percent(terms.mudarib_profit_share, "mudaribProfitShare")?;
    ensure_full_split(
        terms.investor_profit_share,
        terms.mudarib_profit_share,
        "investorProfitShare/mudaribProfitShare",
    )?;
    ensure_period_amounts(actual_profit, actual_loss)?;

    let profit = (actual_profit > Decimal::ZERO)
        .then(|| {
            split_by_weights(
                actual_profit,
                terms.investor_profit_share,
                terms.mudarib_profit_share,
                SplitBasis::ProfitRatio,
            )
        })
        .transpose()?;
    let loss = (actual_loss > Decimal::ZERO).then(|| DistributionResult {
        total_amount: actual_loss,
        party1_share: actual_loss,
        party2_share: Decimal::ZERO,
        party1_pct: rust_decimal_macros::dec!(100),
        party2_pct: Decimal::ZERO,
        basis: SplitBasis::CapitalProviderOnly,
    });

    let investor_profit = profit.as_ref().map_or(Decimal::ZERO, |p| p.party1_share);
    let mudarib_profit = profit.as_ref().map_or(Decimal::ZERO, |p| p.party2_share);
    let investor_net_result = investor_profit - actual_loss;

    let output = MudarabahDistribution {
        profit,
        loss,
        net_result: actual_profit - actual_loss,
        investor_net_result,
        investor_roi_pct: round_percent(percent_of(investor_net_result, terms.capital_amount, "roi")?),
        mudarib_net_result: mudarib_profit,
        capital_remaining: (terms.capital_amount - actual_loss).max(Decimal::ZERO),
    };

    Ok(with_metadata(
        "Mudarabah distribution: profit by agreed ratio, capital loss borne by capital provider",
        &serde_json::json!({
            "actual_profit": actual_profit.to_string(),
            "actual_loss": actual_loss.to_string(),
            "loss_distribution": terms.loss_distribution,
        }),
        Vec::new(),
        output,
    ))
}
