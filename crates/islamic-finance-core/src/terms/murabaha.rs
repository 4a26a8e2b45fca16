use rust_decimal::Decimal;

use super::{ensure_duration, ensure_non_negative, ensure_positive, finish, Derivation, ReturnBasis};
use crate::contracts::{ContractType, MurabahaTerms};
use crate::policy::VariantPolicy;
use crate::types::{checked_quotient, within_tolerance, years};
use crate::IslamicFinanceResult;

/// Murabaha: the stated profit rate covers the whole term, so the annual
/// figure is `profit_rate / (duration / 12)`. Minimum ticket is a share of
/// the asset cost.
pub fn derive_murabaha(
    terms: &MurabahaTerms,
    policy: &VariantPolicy,
) -> IslamicFinanceResult<Derivation> {
    ensure_duration(terms.duration)?;
    ensure_non_negative(terms.profit_rate, "profitRate")?;
    ensure_positive(terms.asset_cost, "assetCost")?;
    ensure_non_negative(terms.cost_price, "costPrice")?;
    ensure_non_negative(terms.selling_price, "sellingPrice")?;

    let mut warnings = Vec::new();
    let markup = terms.selling_price - terms.cost_price;
    if !within_tolerance(markup, terms.profit_amount) {
        warnings.push(format!(
            "profitAmount {} does not equal sellingPrice - costPrice ({})",
            terms.profit_amount, markup
        ));
    }
    if markup < Decimal::ZERO {
        warnings.push("Selling price is below cost price".into());
    }

    let annual_return = checked_quotient(terms.profit_rate, years(terms.duration), "profitRate")?;

    finish(
        ContractType::Murabaha,
        ReturnBasis::ProfitRate,
        terms.profit_rate,
        annual_return,
        terms.duration,
        terms.asset_cost,
        policy,
        warnings,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::{InstallmentFrequency, PaymentStructure};
    use crate::error::IslamicFinanceError;
    use crate::policy::TermPolicy;
    use rust_decimal_macros::dec;

    fn sample(duration: u32, profit_rate: Decimal) -> MurabahaTerms {
        MurabahaTerms {
            amount: dec!(5000000),
            duration,
            cost_price: dec!(5000000),
            selling_price: dec!(5600000),
            profit_amount: dec!(600000),
            profit_rate,
            asset_cost: dec!(5000000),
            installment_frequency: InstallmentFrequency::Monthly,
            payment_structure: PaymentStructure::Installment,
            number_of_installments: Some(12),
            deferment_period: 0,
            early_settlement_discount: dec!(0),
        }
    }

    #[test]
    fn test_twelve_month_contract() {
        let d = derive_murabaha(&sample(12, dec!(12)), &TermPolicy::default().murabaha).unwrap();
        assert_eq!(d.annual_return, dec!(12));
        assert_eq!(d.terms.return_min, dec!(11));
        assert_eq!(d.terms.return_max, dec!(13));
        assert_eq!(d.terms.term_months, 12);
        // 15% of 5,000,000
        assert_eq!(d.terms.minimum_investment, dec!(750000));
        assert_eq!(d.terms.campaign_days, 21);
        assert!(d.warnings.is_empty());
    }

    #[test]
    fn test_two_year_contract_halves_rate() {
        let d = derive_murabaha(&sample(24, dec!(20)), &TermPolicy::default().murabaha).unwrap();
        assert_eq!(d.annual_return, dec!(10));
        assert_eq!(d.terms.return_min, dec!(9));
        assert_eq!(d.terms.return_max, dec!(11));
        assert_eq!(d.terms.campaign_days, 30);
    }

    #[test]
    fn test_zero_rate_stays_non_negative() {
        let d = derive_murabaha(&sample(1, dec!(0)), &TermPolicy::default().murabaha).unwrap();
        assert_eq!(d.terms.return_min, dec!(0));
        assert_eq!(d.terms.return_max, dec!(1));
    }

    #[test]
    fn test_profit_amount_mismatch_warns() {
        let mut t = sample(12, dec!(12));
        t.profit_amount = dec!(500000);
        let d = derive_murabaha(&t, &TermPolicy::default().murabaha).unwrap();
        assert_eq!(d.warnings.len(), 1);
    }

    #[test]
    fn test_zero_duration_rejected() {
        let err = derive_murabaha(&sample(0, dec!(12)), &TermPolicy::default().murabaha);
        assert!(matches!(err, Err(IslamicFinanceError::InvalidInput { .. })));
    }

    #[test]
    fn test_negative_rate_rejected() {
        assert!(derive_murabaha(&sample(12, dec!(-1)), &TermPolicy::default().murabaha).is_err());
    }
}
