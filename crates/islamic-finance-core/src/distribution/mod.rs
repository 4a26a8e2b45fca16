//! Profit and loss distribution for profit-sharing contracts.
//!
//! Profits follow the negotiated ratios. Losses never do: in a Musharakah
//! they follow the capital ratio, and in a Mudarabah the capital provider
//! bears all of them.

pub mod mudarabah;
pub mod musharakah;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::contracts::{parse_contract, ContractTerms};
use crate::error::IslamicFinanceError;
use crate::types::*;
use crate::IslamicFinanceResult;

pub use mudarabah::{distribute_mudarabah, MudarabahDistribution};
pub use musharakah::{distribute_musharakah, LossShareDiscrepancy, MusharakahDistribution};

/// What a split was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitBasis {
    /// Negotiated profit-sharing ratio.
    ProfitRatio,
    /// Each party's capital over total capital.
    CapitalRatio,
    /// Entire amount to the capital provider.
    CapitalProviderOnly,
}

/// A two-party split of one amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionResult {
    pub total_amount: Money,
    pub party1_share: Money,
    pub party2_share: Money,
    /// Percentage basis used for party 1, rounded to two decimals.
    pub party1_pct: Percent,
    pub party2_pct: Percent,
    pub basis: SplitBasis,
}

/// Distribution for any profit-sharing contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "contractType", rename_all = "lowercase")]
pub enum Distribution {
    Mudarabah(MudarabahDistribution),
    Musharakah(MusharakahDistribution),
}

/// Split `total` in proportion to two non-negative weights.
///
/// Normalising by the weight sum keeps `party1_share + party2_share` equal
/// to `total` even when stored percentages are off by a rounding cent.
pub(crate) fn split_by_weights(
    total: Money,
    weight1: Decimal,
    weight2: Decimal,
    basis: SplitBasis,
) -> IslamicFinanceResult<DistributionResult> {
    let weight_sum = checked_sum(weight1, weight2, "weights")?;

    Ok(DistributionResult {
        total_amount: total,
        party1_share: weighted_share(total, weight1, weight_sum)?,
        party2_share: weighted_share(total, weight2, weight_sum)?,
        party1_pct: round_percent(percent_of(weight1, weight_sum, "weights")?),
        party2_pct: round_percent(percent_of(weight2, weight_sum, "weights")?),
        basis,
    })
}

/// `total x weight / weight_sum`. Multiplies first when the product fits,
/// otherwise scales `total` by the normalised weight.
fn weighted_share(total: Money, weight: Decimal, weight_sum: Decimal) -> IslamicFinanceResult<Money> {
    match total.checked_mul(weight) {
        Some(product) => checked_quotient(product, weight_sum, "distribution share"),
        None => {
            let ratio = checked_quotient(weight, weight_sum, "distribution share")?;
            checked_product(total, ratio, "distribution share")
        }
    }
}

pub(crate) fn ensure_period_amounts(actual_profit: Money, actual_loss: Money) -> IslamicFinanceResult<()> {
    ensure_in_range(&[("actual_profit", actual_profit), ("actual_loss", actual_loss)])?;
    if actual_profit < Decimal::ZERO {
        return Err(IslamicFinanceError::InvalidInput {
            field: "actual_profit".into(),
            reason: "Actual profit cannot be negative; report losses as actual_loss".into(),
        });
    }
    if actual_loss < Decimal::ZERO {
        return Err(IslamicFinanceError::InvalidInput {
            field: "actual_loss".into(),
            reason: "Actual loss cannot be negative".into(),
        });
    }
    Ok(())
}

/// Distribute a reporting period's profit and loss for typed contract terms.
/// Only Musharakah and Mudarabah share profit and loss; other variants are
/// rejected.
pub fn distribute(
    terms: &ContractTerms,
    actual_profit: Money,
    actual_loss: Money,
) -> IslamicFinanceResult<ComputationOutput<Distribution>> {
    match terms {
        ContractTerms::Musharakah(t) => {
            let out = distribute_musharakah(t, actual_profit, actual_loss)?;
            Ok(map_result(out, Distribution::Musharakah))
        }
        ContractTerms::Mudarabah(t) => {
            let out = distribute_mudarabah(t, actual_profit, actual_loss)?;
            Ok(map_result(out, Distribution::Mudarabah))
        }
        other => Err(IslamicFinanceError::UnsupportedOperation(format!(
            "{} contracts do not share profit and loss",
            other.contract_type().display_name()
        ))),
    }
}

/// Classify an opaque contract value and distribute its profit and loss.
pub fn distribute_from_value(
    value: &Value,
    actual_profit: Money,
    actual_loss: Money,
) -> IslamicFinanceResult<ComputationOutput<Distribution>> {
    let terms = parse_contract(value)?;
    distribute(&terms, actual_profit, actual_loss)
}

fn map_result<T: Serialize, U: Serialize>(
    out: ComputationOutput<T>,
    f: impl FnOnce(T) -> U,
) -> ComputationOutput<U> {
    ComputationOutput {
        result: f(out.result),
        methodology: out.methodology,
        assumptions: out.assumptions,
        warnings: out.warnings,
        metadata: out.metadata,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_split_by_weights_sums_to_total() {
        let r = split_by_weights(dec!(100), dec!(1), dec!(2), SplitBasis::CapitalRatio).unwrap();
        assert_eq!(r.party1_pct, dec!(33.33));
        assert_eq!(r.party2_pct, dec!(66.67));
        assert!((r.party1_share + r.party2_share - dec!(100)).abs() < dec!(0.000001));
    }

    #[test]
    fn test_split_exact_for_capital_ratio() {
        let r = split_by_weights(dec!(1500000), dec!(10000000), dec!(5000000), SplitBasis::CapitalRatio)
            .unwrap();
        assert_eq!(r.party1_share, dec!(1000000));
        assert_eq!(r.party2_share, dec!(500000));
    }

    #[test]
    fn test_split_of_large_products_scales_by_ratio() {
        // 1e15 x 1e15 does not fit in a Decimal.
        let big = MAX_INPUT_MAGNITUDE;
        let r = split_by_weights(big, big, big, SplitBasis::CapitalRatio).unwrap();
        assert_eq!(r.party1_share, big / dec!(2));
        assert_eq!(r.party1_pct, dec!(50));
    }

    #[test]
    fn test_oversized_period_amounts_rejected() {
        assert!(ensure_period_amounts(Decimal::MAX, dec!(0)).is_err());
        assert!(ensure_period_amounts(dec!(0), MAX_INPUT_MAGNITUDE + dec!(1)).is_err());
    }

    #[test]
    fn test_negative_period_amounts_rejected() {
        assert!(ensure_period_amounts(dec!(-1), dec!(0)).is_err());
        assert!(ensure_period_amounts(dec!(0), dec!(-1)).is_err());
        assert!(ensure_period_amounts(dec!(0), dec!(0)).is_ok());
    }
}
