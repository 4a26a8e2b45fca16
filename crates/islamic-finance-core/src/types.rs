use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::IslamicFinanceError;
use crate::IslamicFinanceResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Percentages expressed in points (12 = 12%), the way contract documents
/// state them. Never as fractions.
pub type Percent = Decimal;

/// Whole calendar months.
pub type Months = u32;

/// Tolerance, in percentage points, for pairs that must sum to 100 and for
/// comparing stored ratios against derived ones.
pub const SPLIT_TOLERANCE: Percent = dec!(0.01);

/// Largest magnitude accepted for any amount or rate in contract terms,
/// policy floors and period figures (one quadrillion).
pub const MAX_INPUT_MAGNITUDE: Decimal = dec!(1_000_000_000_000_000);

const HUNDRED: Decimal = dec!(100);

/// Standard computation output envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation. Carries no timing so identical input
/// always serialises to identical output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

/// Round a percentage to two decimals, half away from zero.
pub fn round_percent(value: Percent) -> Percent {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Round a currency amount to whole units, half away from zero.
pub fn round_currency(value: Money) -> Money {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

fn out_of_range(field: &str) -> IslamicFinanceError {
    IslamicFinanceError::InvalidInput {
        field: field.into(),
        reason: "value out of range".into(),
    }
}

/// `a * b`, or an out-of-range error naming `field`.
pub fn checked_product(a: Decimal, b: Decimal, field: &str) -> IslamicFinanceResult<Decimal> {
    a.checked_mul(b).ok_or_else(|| out_of_range(field))
}

/// `a / b`. A zero divisor is a division error, an overflowing quotient an
/// out-of-range error naming `field`.
pub fn checked_quotient(a: Decimal, b: Decimal, field: &str) -> IslamicFinanceResult<Decimal> {
    if b.is_zero() {
        return Err(IslamicFinanceError::DivisionByZero {
            context: format!("{field} divisor is zero"),
        });
    }
    a.checked_div(b).ok_or_else(|| out_of_range(field))
}

/// `a + b`, or an out-of-range error naming `field`.
pub fn checked_sum(a: Decimal, b: Decimal, field: &str) -> IslamicFinanceResult<Decimal> {
    a.checked_add(b).ok_or_else(|| out_of_range(field))
}

/// `a - b`, or an out-of-range error naming `field`.
pub fn checked_difference(a: Decimal, b: Decimal, field: &str) -> IslamicFinanceResult<Decimal> {
    a.checked_sub(b).ok_or_else(|| out_of_range(field))
}

/// `part` as a percentage of `whole`.
pub fn percent_of(part: Decimal, whole: Decimal, field: &str) -> IslamicFinanceResult<Percent> {
    checked_quotient(checked_product(part, HUNDRED, field)?, whole, field)
}

/// `pct` percent of `amount`.
pub fn apply_percent(amount: Money, pct: Percent, field: &str) -> IslamicFinanceResult<Money> {
    checked_quotient(checked_product(amount, pct, field)?, HUNDRED, field)
}

/// Reject any named figure whose magnitude exceeds [`MAX_INPUT_MAGNITUDE`].
pub fn ensure_in_range(fields: &[(&str, Decimal)]) -> IslamicFinanceResult<()> {
    match fields
        .iter()
        .find(|(_, value)| value.abs() > MAX_INPUT_MAGNITUDE)
    {
        Some((field, _)) => Err(out_of_range(field)),
        None => Ok(()),
    }
}

/// Whether two percentages form a complete 100% split.
pub fn is_full_split(a: Percent, b: Percent) -> bool {
    match a.checked_add(b) {
        Some(sum) => (sum - HUNDRED).abs() <= SPLIT_TOLERANCE,
        None => false,
    }
}

/// Whether two figures agree to within [`SPLIT_TOLERANCE`].
pub fn within_tolerance(a: Decimal, b: Decimal) -> bool {
    match a.checked_sub(b) {
        Some(diff) => diff.abs() <= SPLIT_TOLERANCE,
        None => false,
    }
}

/// Term length in years (`months / 12`).
pub fn years(months: Months) -> Decimal {
    Decimal::from(months) / dec!(12)
}
