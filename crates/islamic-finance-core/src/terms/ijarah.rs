use rust_decimal_macros::dec;

use super::{ensure_divisor, ensure_duration, ensure_non_negative, finish, Derivation, ReturnBasis};
use crate::contracts::{ContractType, IjarahTerms};
use crate::policy::VariantPolicy;
use crate::types::{checked_product, percent_of, Percent};
use crate::IslamicFinanceResult;

/// Annual rental yield: `monthly_rental x 12 / asset_value x 100`.
pub fn rental_yield(terms: &IjarahTerms) -> IslamicFinanceResult<Percent> {
    ensure_divisor(terms.asset_value, "assetValue", "ijarah rental yield")?;
    ensure_non_negative(terms.monthly_rental, "monthlyRental")?;
    let annual_rent = checked_product(terms.monthly_rental, dec!(12), "monthlyRental")?;
    percent_of(annual_rent, terms.asset_value, "rentalYield")
}

/// Ijarah: the return is the rental yield on the leased asset.
pub fn derive_ijarah(terms: &IjarahTerms, policy: &VariantPolicy) -> IslamicFinanceResult<Derivation> {
    ensure_duration(terms.duration)?;
    let yield_pct = rental_yield(terms)?;

    let mut warnings = Vec::new();
    if terms.monthly_rental.is_zero() {
        warnings.push("Monthly rental is zero; lease produces no return".into());
    }

    finish(
        ContractType::Ijarah,
        ReturnBasis::RentalYield,
        yield_pct,
        yield_pct,
        terms.duration,
        terms.asset_value,
        policy,
        warnings,
    )
}
