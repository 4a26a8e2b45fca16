use super::{ensure_divisor, ensure_duration, ensure_non_negative, finish, Derivation, ReturnBasis};
use crate::contracts::{ContractType, SalamTerms};
use crate::policy::VariantPolicy;
use crate::types::{checked_quotient, percent_of, years, Percent};
use crate::IslamicFinanceResult;

/// Profit margin of a Salam over the whole term:
/// `(delivery_value - advance_payment) / advance_payment x 100`.
pub fn profit_margin(terms: &SalamTerms) -> IslamicFinanceResult<Percent> {
    ensure_divisor(terms.advance_payment, "advancePayment", "salam profit margin")?;
    ensure_non_negative(terms.delivery_value, "deliveryValue")?;
    percent_of(
        terms.delivery_value - terms.advance_payment,
        terms.advance_payment,
        "profitMargin",
    )
}

/// Salam: the delivery margin spread over the term in years. Minimum ticket
/// is a share of the advance payment.
pub fn derive_salam(terms: &SalamTerms, policy: &VariantPolicy) -> IslamicFinanceResult<Derivation> {
    ensure_duration(terms.duration)?;
    ensure_non_negative(terms.spot_price, "spotPrice")?;
    ensure_non_negative(terms.agreed_price, "agreedPrice")?;
    let margin = profit_margin(terms)?;

    let mut warnings = Vec::new();
    if terms.delivery_value <= terms.advance_payment {
        warnings.push(format!(
            "Delivery value {} does not exceed advance payment {}; contract is not profitable",
            terms.delivery_value, terms.advance_payment
        ));
    }

    let annual_return = checked_quotient(margin, years(terms.duration), "profitMargin")?;

    finish(
        ContractType::Salam,
        ReturnBasis::SalamMargin,
        margin,
        annual_return,
        terms.duration,
        terms.advance_payment,
        policy,
        warnings,
    )
}
