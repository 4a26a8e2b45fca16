//! Per-variant contract metrics: markup and APR for Murabaha, yield and
//! payback for Ijarah, discount for Salam, projected party returns for the
//! profit-sharing variants.
//!
//! Percentages are rounded to two decimals; currency amounts are left
//! unrounded so callers can aggregate them.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::contracts::{
    parse_contract, ContractTerms, IjarahTerms, MudarabahTerms, MurabahaTerms, MusharakahTerms,
    SalamTerms,
};
use crate::error::IslamicFinanceError;
use crate::terms::{ensure_divisor, ensure_duration};
use crate::types::*;
use crate::IslamicFinanceResult;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MurabahaMetrics {
    /// Selling price.
    pub total_amount: Money,
    /// Stored profit amount.
    pub total_return: Money,
    pub markup: Money,
    /// Markup over cost, in percent.
    pub markup_rate: Percent,
    /// Markup rate annualised by simple proration.
    pub apr: Percent,
    pub duration: Months,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MudarabahMetrics {
    pub capital_amount: Money,
    pub projected_profit: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projected_roi: Option<Percent>,
    /// Annualised return on capital from an actual period profit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_roi: Option<Percent>,
    pub investor_expected_return: Money,
    pub mudarib_expected_return: Money,
    pub duration: Months,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MusharakahMetrics {
    pub total_capital: Money,
    pub projected_profit: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projected_roi: Option<Percent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_roi: Option<Percent>,
    pub party1_expected_return: Money,
    pub party2_expected_return: Money,
    /// Capital contribution of each party, in percent.
    pub party1_equity: Percent,
    pub party2_equity: Percent,
    pub duration: Months,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IjarahMetrics {
    pub asset_value: Money,
    pub total_rental_income: Money,
    pub total_maintenance: Money,
    /// Rental income net of maintenance over the term.
    pub net_return: Money,
    pub asset_depreciation: Money,
    pub residual_value: Money,
    pub rental_yield: Percent,
    pub monthly_return_rate: Percent,
    /// Months of rent needed to recover the asset value, two decimals.
    pub payback_months: Decimal,
    pub duration: Months,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalamMetrics {
    pub advance_payment: Money,
    pub delivery_value: Money,
    /// Buyer's gain: delivery value minus advance payment.
    pub discount: Money,
    /// Discount as a share of delivery value.
    pub discount_rate: Percent,
    pub annualized_return: Percent,
    pub duration: Months,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "contractType", rename_all = "lowercase")]
pub enum ContractMetrics {
    Murabaha(MurabahaMetrics),
    Mudarabah(MudarabahMetrics),
    Musharakah(MusharakahMetrics),
    Ijarah(IjarahMetrics),
    Salam(SalamMetrics),
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute metrics for typed contract terms. `actual_profit` feeds the
/// realised ROI of the profit-sharing variants and is ignored elsewhere.
pub fn compute_metrics(
    terms: &ContractTerms,
    actual_profit: Option<Money>,
) -> IslamicFinanceResult<ComputationOutput<ContractMetrics>> {
    ensure_duration(terms.duration())?;
    terms.ensure_in_range()?;
    if let Some(p) = actual_profit {
        ensure_in_range(&[("actual_profit", p)])?;
        if p < Decimal::ZERO {
            return Err(IslamicFinanceError::InvalidInput {
                field: "actual_profit".into(),
                reason: "Actual profit cannot be negative".into(),
            });
        }
    }

    let mut warnings = Vec::new();
    let (methodology, metrics) = match terms {
        ContractTerms::Murabaha(t) => (
            "Murabaha markup and simple annualised rate over cost",
            ContractMetrics::Murabaha(murabaha_metrics(t)?),
        ),
        ContractTerms::Mudarabah(t) => (
            "Mudarabah projected returns by profit-sharing ratio",
            ContractMetrics::Mudarabah(mudarabah_metrics(t, actual_profit)?),
        ),
        ContractTerms::Musharakah(t) => (
            "Musharakah projected returns by profit-sharing ratio and equity by capital",
            ContractMetrics::Musharakah(musharakah_metrics(t, actual_profit)?),
        ),
        ContractTerms::Ijarah(t) => {
            let m = ijarah_metrics(t)?;
            if m.net_return < Decimal::ZERO {
                warnings.push(format!(
                    "Maintenance {} exceeds rental income {}",
                    m.total_maintenance, m.total_rental_income
                ));
            }
            ("Ijarah rental yield, net return and payback", ContractMetrics::Ijarah(m))
        }
        ContractTerms::Salam(t) => (
            "Salam discount to delivery value, annualised over advance payment",
            ContractMetrics::Salam(salam_metrics(t)?),
        ),
    };

    Ok(with_metadata(
        methodology,
        &serde_json::json!({
            "contract_type": terms.contract_type(),
            "duration_months": terms.duration(),
            "actual_profit": actual_profit.map(|p| p.to_string()),
        }),
        warnings,
        metrics,
    ))
}

/// Classify an opaque contract value and compute its metrics.
pub fn compute_metrics_from_value(
    value: &Value,
    actual_profit: Option<Money>,
) -> IslamicFinanceResult<ComputationOutput<ContractMetrics>> {
    let terms = parse_contract(value)?;
    compute_metrics(&terms, actual_profit)
}

// ---------------------------------------------------------------------------
// Per-variant calculators
// ---------------------------------------------------------------------------

fn murabaha_metrics(t: &MurabahaTerms) -> IslamicFinanceResult<MurabahaMetrics> {
    ensure_divisor(t.cost_price, "costPrice", "murabaha markup rate")?;
    let markup = t.selling_price - t.cost_price;
    let markup_rate = percent_of(markup, t.cost_price, "markupRate")?;
    let apr = annualise(markup_rate, t.duration, "apr")?;

    Ok(MurabahaMetrics {
        total_amount: t.selling_price,
        total_return: t.profit_amount,
        markup,
        markup_rate: round_percent(markup_rate),
        apr: round_percent(apr),
        duration: t.duration,
    })
}

/// Scale a whole-term rate to a year: `rate / duration x 12`.
fn annualise(rate: Percent, duration: Months, field: &str) -> IslamicFinanceResult<Percent> {
    checked_product(
        checked_quotient(rate, Decimal::from(duration), field)?,
        dec!(12),
        field,
    )
}

fn annualised_roi(
    profit: Option<Money>,
    capital: Money,
    duration: Months,
) -> IslamicFinanceResult<Option<Percent>> {
    profit
        .filter(|p| !p.is_zero())
        .map(|p| annualise(percent_of(p, capital, "actualRoi")?, duration, "actualRoi").map(round_percent))
        .transpose()
}

fn mudarabah_metrics(
    t: &MudarabahTerms,
    actual_profit: Option<Money>,
) -> IslamicFinanceResult<MudarabahMetrics> {
    ensure_divisor(t.capital_amount, "capitalAmount", "mudarabah return on capital")?;
    Ok(MudarabahMetrics {
        capital_amount: t.capital_amount,
        projected_profit: t.projected_profit,
        projected_roi: t.expected_annual_return.or(t.expected_return_rate),
        actual_roi: annualised_roi(actual_profit, t.capital_amount, t.duration)?,
        investor_expected_return: apply_percent(t.projected_profit, t.investor_profit_share, "investorExpectedReturn")?,
        mudarib_expected_return: apply_percent(t.projected_profit, t.mudarib_profit_share, "mudaribExpectedReturn")?,
        duration: t.duration,
    })
}

fn musharakah_metrics(
    t: &MusharakahTerms,
    actual_profit: Option<Money>,
) -> IslamicFinanceResult<MusharakahMetrics> {
    let total = t.total_capital();
    ensure_divisor(total, "party1Capital+party2Capital", "musharakah equity")?;
    Ok(MusharakahMetrics {
        total_capital: total,
        projected_profit: t.projected_profit,
        projected_roi: t.expected_annual_return,
        actual_roi: annualised_roi(actual_profit, total, t.duration)?,
        party1_expected_return: apply_percent(t.projected_profit, t.party1_profit_share, "party1ExpectedReturn")?,
        party2_expected_return: apply_percent(t.projected_profit, t.party2_profit_share, "party2ExpectedReturn")?,
        party1_equity: round_percent(percent_of(t.party1_capital, total, "party1Equity")?),
        party2_equity: round_percent(percent_of(t.party2_capital, total, "party2Equity")?),
        duration: t.duration,
    })
}

fn ijarah_metrics(t: &IjarahTerms) -> IslamicFinanceResult<IjarahMetrics> {
    ensure_divisor(t.asset_value, "assetValue", "ijarah rental yield")?;
    ensure_divisor(t.monthly_rental, "monthlyRental", "ijarah payback period")?;

    let months = Decimal::from(t.duration);
    let total_rental_income = checked_product(t.monthly_rental, months, "totalRentalIncome")?;
    let total_maintenance = checked_product(t.maintenance_cost, months, "totalMaintenance")?;
    let annual_rent = checked_product(t.monthly_rental, dec!(12), "rentalYield")?;

    Ok(IjarahMetrics {
        asset_value: t.asset_value,
        total_rental_income,
        total_maintenance,
        net_return: total_rental_income - total_maintenance,
        asset_depreciation: t.asset_value - t.residual_value,
        residual_value: t.residual_value,
        rental_yield: round_percent(percent_of(annual_rent, t.asset_value, "rentalYield")?),
        monthly_return_rate: round_percent(percent_of(t.monthly_rental, t.asset_value, "monthlyReturnRate")?),
        payback_months: round_percent(checked_quotient(t.asset_value, t.monthly_rental, "paybackMonths")?),
        duration: t.duration,
    })
}

fn salam_metrics(t: &SalamTerms) -> IslamicFinanceResult<SalamMetrics> {
    ensure_divisor(t.advance_payment, "advancePayment", "salam annualised return")?;
    ensure_divisor(t.delivery_value, "deliveryValue", "salam discount rate")?;
    let discount = t.delivery_value - t.advance_payment;
    let annualized = annualise(
        percent_of(discount, t.advance_payment, "annualizedReturn")?,
        t.duration,
        "annualizedReturn",
    )?;

    Ok(SalamMetrics {
        advance_payment: t.advance_payment,
        delivery_value: t.delivery_value,
        discount,
        discount_rate: round_percent(percent_of(discount, t.delivery_value, "discountRate")?),
        annualized_return: round_percent(annualized),
        duration: t.duration,
    })
}
