//! Payment schedules and early settlement.
//!
//! Murabaha installments are rounded to cents, with the final installment
//! absorbing the rounding remainder so the schedule sums exactly to the
//! selling price. Due dates step by calendar month; a start on the 31st
//! lands on the last day of shorter months.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::contracts::{IjarahTerms, MurabahaTerms, PaymentStructure};
use crate::error::IslamicFinanceError;
use crate::terms::{ensure_duration, ensure_non_negative, ensure_percent};
use crate::types::*;
use crate::IslamicFinanceResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One Murabaha installment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentScheduleEntry {
    pub payment_number: u32,
    pub due_date: NaiveDate,
    pub principal_amount: Money,
    pub profit_amount: Money,
    pub total_payment: Money,
    /// Outstanding selling price after this payment, never negative.
    pub remaining_balance: Money,
}

/// One Ijarah rental period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalScheduleEntry {
    pub period: u32,
    pub due_date: NaiveDate,
    pub rental_amount: Money,
    pub cumulative_amount: Money,
}

/// Settlement quote after some installments have been paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarlySettlement {
    pub paid_installments: u32,
    pub remaining_installments: u32,
    pub remaining_principal: Money,
    pub remaining_profit: Money,
    /// Rebate on the remaining profit; principal is never discounted.
    pub discount: Money,
    pub settlement_amount: Money,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Longest schedule produced: one hundred years of monthly periods.
pub const MAX_SCHEDULE_PERIODS: u32 = 1200;

fn ensure_schedule_length(periods: u32, field: &str) -> IslamicFinanceResult<()> {
    if periods > MAX_SCHEDULE_PERIODS {
        return Err(IslamicFinanceError::InvalidInput {
            field: field.into(),
            reason: format!("Schedules are limited to {MAX_SCHEDULE_PERIODS} periods"),
        });
    }
    Ok(())
}

/// Months from start to installment `index` (1-based).
fn due_offset(deferment: u32, index: u32, step: u32) -> IslamicFinanceResult<u32> {
    (index - 1)
        .checked_mul(step)
        .and_then(|m| m.checked_add(deferment))
        .ok_or_else(|| IslamicFinanceError::InvalidInput {
            field: "defermentPeriod".into(),
            reason: "Installment due date is out of range".into(),
        })
}

fn round_cents(value: Money) -> Money {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

fn add_months(start: NaiveDate, months: u32) -> IslamicFinanceResult<NaiveDate> {
    start
        .checked_add_months(chrono::Months::new(months))
        .ok_or_else(|| IslamicFinanceError::InvalidInput {
            field: "startDate".into(),
            reason: format!("{start} plus {months} months is out of range"),
        })
}

/// Installment count for a Murabaha; lump-sum contracts settle in one.
fn installment_count(terms: &MurabahaTerms) -> IslamicFinanceResult<u32> {
    if terms.payment_structure == PaymentStructure::LumpSum {
        return Ok(1);
    }
    match terms.number_of_installments {
        Some(0) => Err(IslamicFinanceError::InvalidInput {
            field: "numberOfInstallments".into(),
            reason: "Must be at least one".into(),
        }),
        Some(n) => {
            ensure_schedule_length(n, "numberOfInstallments")?;
            Ok(n)
        }
        None => Ok(1),
    }
}

/// Split `total` into `n` cent-rounded parts; the last part takes the remainder.
fn split_evenly(total: Money, n: u32, index: u32) -> Money {
    let part = round_cents(total / Decimal::from(n));
    if index == n {
        total - part * Decimal::from(n - 1)
    } else {
        part
    }
}

// ---------------------------------------------------------------------------
// Murabaha
// ---------------------------------------------------------------------------

/// Build the Murabaha repayment schedule from `start`.
///
/// Lump-sum contracts pay the full selling price at `start + duration`.
/// Otherwise the first installment falls due after the deferment period and
/// the rest follow at the installment frequency.
pub fn murabaha_schedule(
    terms: &MurabahaTerms,
    start: NaiveDate,
) -> IslamicFinanceResult<ComputationOutput<Vec<PaymentScheduleEntry>>> {
    ensure_duration(terms.duration)?;
    terms.ensure_in_range()?;
    ensure_non_negative(terms.cost_price, "costPrice")?;
    ensure_non_negative(terms.selling_price, "sellingPrice")?;

    let mut warnings = Vec::new();
    if !within_tolerance(terms.selling_price - terms.cost_price, terms.profit_amount) {
        warnings.push(format!(
            "Profit amount {} differs from selling price minus cost; installments use selling price",
            terms.profit_amount
        ));
    }

    let schedule = if terms.payment_structure == PaymentStructure::LumpSum {
        vec![PaymentScheduleEntry {
            payment_number: 1,
            due_date: add_months(start, terms.duration)?,
            principal_amount: terms.cost_price,
            profit_amount: terms.selling_price - terms.cost_price,
            total_payment: terms.selling_price,
            remaining_balance: Decimal::ZERO,
        }]
    } else {
        let n = installment_count(terms)?;
        let step = terms.installment_frequency.months();
        let mut remaining = terms.selling_price;
        let mut entries = Vec::with_capacity(n as usize);

        for i in 1..=n {
            let total_payment = split_evenly(terms.selling_price, n, i);
            let principal_amount = split_evenly(terms.cost_price, n, i);
            remaining -= total_payment;
            entries.push(PaymentScheduleEntry {
                payment_number: i,
                due_date: add_months(start, due_offset(terms.deferment_period, i, step)?)?,
                principal_amount,
                profit_amount: total_payment - principal_amount,
                total_payment,
                remaining_balance: remaining.max(Decimal::ZERO),
            });
        }

        let last_due = due_offset(terms.deferment_period, n, step)?;
        if last_due > terms.duration {
            warnings.push(format!(
                "Last installment falls {} months after start, beyond the {}-month term",
                last_due, terms.duration
            ));
        }
        entries
    };

    Ok(with_metadata(
        "Murabaha repayment schedule: selling price in equal installments",
        &serde_json::json!({
            "start_date": start,
            "payment_structure": terms.payment_structure,
            "installment_frequency": terms.installment_frequency,
            "deferment_period": terms.deferment_period,
        }),
        warnings,
        schedule,
    ))
}

/// Quote early settlement after `paid_installments` installments.
pub fn murabaha_early_settlement(
    terms: &MurabahaTerms,
    paid_installments: u32,
) -> IslamicFinanceResult<ComputationOutput<EarlySettlement>> {
    terms.ensure_in_range()?;
    ensure_percent(terms.early_settlement_discount, "earlySettlementDiscount")?;
    let n = installment_count(terms)?;
    if paid_installments > n {
        return Err(IslamicFinanceError::InvalidInput {
            field: "paid_installments".into(),
            reason: format!("Cannot exceed the {n} scheduled installments"),
        });
    }

    let remaining_installments = n - paid_installments;
    let share = checked_quotient(
        Decimal::from(remaining_installments),
        Decimal::from(n),
        "paid_installments",
    )?;
    let remaining_principal = round_cents(checked_product(terms.cost_price, share, "remainingPrincipal")?);
    let remaining_profit = round_cents(checked_product(terms.profit_amount, share, "remainingProfit")?);
    let discount = round_cents(apply_percent(
        remaining_profit,
        terms.early_settlement_discount,
        "earlySettlementDiscount",
    )?);

    let quote = EarlySettlement {
        paid_installments,
        remaining_installments,
        remaining_principal,
        remaining_profit,
        discount,
        settlement_amount: remaining_principal + remaining_profit - discount,
    };

    Ok(with_metadata(
        "Murabaha early settlement: remaining principal plus discounted remaining profit",
        &serde_json::json!({
            "number_of_installments": n,
            "early_settlement_discount": terms.early_settlement_discount.to_string(),
        }),
        Vec::new(),
        quote,
    ))
}

// ---------------------------------------------------------------------------
// Ijarah
// ---------------------------------------------------------------------------

/// Monthly rental schedule; the first rent falls due one month after `start`.
pub fn ijarah_schedule(
    terms: &IjarahTerms,
    start: NaiveDate,
) -> IslamicFinanceResult<ComputationOutput<Vec<RentalScheduleEntry>>> {
    ensure_duration(terms.duration)?;
    ensure_schedule_length(terms.duration, "duration")?;
    terms.ensure_in_range()?;
    ensure_non_negative(terms.monthly_rental, "monthlyRental")?;

    let mut cumulative = Decimal::ZERO;
    let mut schedule = Vec::with_capacity(terms.duration as usize);
    for period in 1..=terms.duration {
        cumulative += terms.monthly_rental;
        schedule.push(RentalScheduleEntry {
            period,
            due_date: add_months(start, period)?,
            rental_amount: terms.monthly_rental,
            cumulative_amount: cumulative,
        });
    }

    let mut warnings = Vec::new();
    if terms.purchase_option_included && terms.residual_value > dec!(0) {
        warnings.push(format!(
            "Purchase option of {} is payable at lease end and not included in the schedule",
            terms.residual_value
        ));
    }

    Ok(with_metadata(
        "Ijarah rental schedule: fixed monthly rent in arrears",
        &serde_json::json!({
            "start_date": start,
            "maintenance_responsibility": terms.maintenance_responsibility,
        }),
        warnings,
        schedule,
    ))
}
