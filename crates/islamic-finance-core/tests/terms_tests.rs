use islamic_finance_core::contracts::{ContractTerms, IjarahTerms, MaintenanceResponsibility};
use islamic_finance_core::policy::{CampaignRule, ReturnBand, TermPolicy};
use islamic_finance_core::explanation::explain_derivation_from_value;
use islamic_finance_core::terms::{derive, derive_investment_terms, derive_investment_terms_from_value};
use islamic_finance_core::IslamicFinanceError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

// ===========================================================================
// Fixtures
// ===========================================================================

fn sample_murabaha() -> Value {
    json!({
        "contractType": "murabaha",
        "amount": 5000000,
        "duration": 12,
        "costPrice": 5000000,
        "sellingPrice": 5600000,
        "profitAmount": 600000,
        "profitRate": 12,
        "assetCost": 5000000
    })
}

fn sample_mudarabah() -> Value {
    json!({
        "contractType": "mudarabah",
        "amount": 8000000,
        "duration": 18,
        "capitalAmount": 8000000,
        "investorProfitShare": 60,
        "mudaribProfitShare": 40,
        "expectedAnnualReturn": 15
    })
}

fn sample_musharakah() -> Value {
    json!({
        "contractType": "musharakah",
        "amount": 15000000,
        "duration": 24,
        "party1Capital": 10000000,
        "party2Capital": 5000000,
        "party1ProfitShare": 60,
        "party2ProfitShare": 40,
        "party1LossShare": 66.67,
        "party2LossShare": 33.33,
        "expectedAnnualReturn": 18
    })
}

fn sample_ijarah() -> Value {
    json!({
        "contractType": "ijarah",
        "amount": 20000000,
        "duration": 36,
        "assetValue": 20000000,
        "monthlyRental": 300000,
        "purchaseOptionIncluded": true,
        "maintenanceResponsibility": "lessor"
    })
}

fn sample_salam() -> Value {
    json!({
        "contractType": "salam",
        "amount": 4000000,
        "duration": 6,
        "advancePayment": 4000000,
        "deliveryValue": 4600000,
        "spotPrice": 460,
        "agreedPrice": 400,
        "deliveryDate": "2027-06-30"
    })
}

fn all_samples() -> Vec<Value> {
    vec![
        sample_murabaha(),
        sample_mudarabah(),
        sample_musharakah(),
        sample_ijarah(),
        sample_salam(),
    ]
}

fn terms_of(value: Value) -> islamic_finance_core::InvestmentTerms {
    derive_investment_terms_from_value(&value, &TermPolicy::default())
        .unwrap()
        .result
}

// ===========================================================================
// Scenario tests
// ===========================================================================

#[test]
fn test_murabaha_twelve_months() {
    let t = terms_of(sample_murabaha());
    assert_eq!(t.return_min, dec!(11));
    assert_eq!(t.return_max, dec!(13));
    assert_eq!(t.term_months, 12);
    assert_eq!(t.minimum_investment, dec!(750000));
    assert_eq!(t.campaign_days, 21);
}

#[test]
fn test_murabaha_long_term_campaign() {
    let mut v = sample_murabaha();
    v["duration"] = json!(24);
    v["profitRate"] = json!(24);
    let t = terms_of(v);
    // 24% over two years
    assert_eq!(t.return_min, dec!(11));
    assert_eq!(t.return_max, dec!(13));
    assert_eq!(t.campaign_days, 30);
}

#[test]
fn test_mudarabah_stated_return() {
    let t = terms_of(sample_mudarabah());
    assert_eq!(t.return_min, dec!(13));
    assert_eq!(t.return_max, dec!(19));
    // 12% of 8,000,000
    assert_eq!(t.minimum_investment, dec!(960000));
    assert_eq!(t.campaign_days, 30);
}

#[test]
fn test_mudarabah_zero_return_falls_back_to_older_field() {
    let mut v = sample_mudarabah();
    v["expectedAnnualReturn"] = json!(0);
    v["expectedReturnRate"] = json!(14);
    let t = terms_of(v);
    assert_eq!(t.return_min, dec!(12));
    assert_eq!(t.return_max, dec!(18));
}

#[test]
fn test_musharakah_stated_return() {
    let t = terms_of(sample_musharakah());
    assert_eq!(t.return_min, dec!(16));
    assert_eq!(t.return_max, dec!(21));
    // 12% of the 5,000,000 investor capital
    assert_eq!(t.minimum_investment, dec!(600000));
    // 24-month term counts as long
    assert_eq!(t.campaign_days, 45);
}

#[test]
fn test_ijarah_rental_yield() {
    let t = terms_of(sample_ijarah());
    // 3,600,000 / 20,000,000 = 18%
    assert_eq!(t.return_min, dec!(17));
    assert_eq!(t.return_max, dec!(19));
    assert_eq!(t.minimum_investment, dec!(3400000));
    assert_eq!(t.term_months, 36);
}

#[test]
fn test_salam_margin() {
    let t = terms_of(sample_salam());
    assert_eq!(t.return_min, dec!(28));
    assert_eq!(t.return_max, dec!(32));
    assert_eq!(t.minimum_investment, dec!(440000));
    assert_eq!(t.campaign_days, 45);
}

#[test]
fn test_murabaha_sub_cent_profit_difference_not_flagged() {
    let mut v = sample_murabaha();
    v["profitAmount"] = json!("600000.001");
    let out = derive_investment_terms_from_value(&v, &TermPolicy::default()).unwrap();
    assert!(out.warnings.iter().all(|w| !w.contains("profitAmount")), "{:?}", out.warnings);
}

#[test]
fn test_minimum_investment_floor_applies() {
    let mut v = sample_murabaha();
    v["assetCost"] = json!(100000);
    let t = terms_of(v);
    assert_eq!(t.minimum_investment, dec!(100000));
}

// ===========================================================================
// Invariants
// ===========================================================================

#[test]
fn test_derivation_is_deterministic() {
    let policy = TermPolicy::default();
    for sample in all_samples() {
        let a = derive_investment_terms_from_value(&sample, &policy).unwrap();
        let b = derive_investment_terms_from_value(&sample, &policy).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}

#[test]
fn test_bounds_ordered_and_non_negative() {
    let policy = TermPolicy::default();
    for sample in all_samples() {
        let t = derive_investment_terms_from_value(&sample, &policy).unwrap().result;
        assert!(t.return_min >= Decimal::ZERO);
        assert!(t.return_max >= t.return_min);
        assert!(t.term_months > 0);
    }
}

#[test]
fn test_bounds_ordered_at_extremes() {
    let policy = TermPolicy::default();

    let mut huge = sample_murabaha();
    huge["profitRate"] = json!(1000);
    huge["duration"] = json!(1);
    let t = derive_investment_terms_from_value(&huge, &policy).unwrap().result;
    assert_eq!(t.return_min, dec!(11999));
    assert!(t.return_max >= t.return_min);

    let mut nothing = sample_murabaha();
    nothing["profitRate"] = json!(0);
    let t = derive_investment_terms_from_value(&nothing, &policy).unwrap().result;
    assert_eq!(t.return_min, dec!(0));
    assert_eq!(t.return_max, dec!(1));

    let mut losing = sample_salam();
    losing["deliveryValue"] = json!(3000000);
    let out = derive_investment_terms_from_value(&losing, &policy).unwrap();
    assert_eq!(out.result.return_min, dec!(0));
    assert_eq!(out.result.return_max, dec!(0));
    assert!(!out.warnings.is_empty());
}

#[test]
fn test_term_months_copied_from_duration() {
    for months in [1u32, 6, 13, 60] {
        let mut v = sample_ijarah();
        v["duration"] = json!(months);
        assert_eq!(terms_of(v).term_months, months);
    }
}

// ===========================================================================
// Failures
// ===========================================================================

#[test]
fn test_salam_zero_advance_is_failure() {
    let mut v = sample_salam();
    v["advancePayment"] = json!(0);
    let err = derive_investment_terms_from_value(&v, &TermPolicy::default()).unwrap_err();
    assert!(matches!(err, IslamicFinanceError::DivisionByZero { .. }));
    assert!(err.is_no_derivable_terms());
}

#[test]
fn test_ijarah_zero_asset_value_is_failure() {
    let terms = ContractTerms::Ijarah(IjarahTerms {
        amount: dec!(1),
        duration: 12,
        asset_value: dec!(0),
        monthly_rental: dec!(1000),
        purchase_option_included: false,
        maintenance_responsibility: MaintenanceResponsibility::Lessee,
        residual_value: dec!(0),
        maintenance_cost: dec!(0),
    });
    assert!(derive_investment_terms(&terms, &TermPolicy::default()).is_err());
}

#[test]
fn test_zero_duration_rejected() {
    let mut v = sample_murabaha();
    v["duration"] = json!(0);
    assert!(derive_investment_terms_from_value(&v, &TermPolicy::default()).is_err());
}

#[test]
fn test_oversized_amounts_are_errors_not_panics() {
    let policy = TermPolicy::default();

    let mut rent = sample_ijarah();
    rent["monthlyRental"] = json!("10000000000000000000000000000");
    let err = derive_investment_terms_from_value(&rent, &policy).unwrap_err();
    assert!(matches!(err, IslamicFinanceError::InvalidInput { ref field, .. } if field == "monthlyRental"));

    let mut rate = sample_murabaha();
    rate["duration"] = json!(1);
    rate["profitRate"] = json!("10000000000000000000000000000");
    let err = explain_derivation_from_value(&rate, &policy).unwrap_err();
    assert!(matches!(err, IslamicFinanceError::InvalidInput { ref field, .. } if field == "profitRate"));
    assert!(err.is_no_derivable_terms());
}

#[test]
fn test_tiny_divisor_is_error_not_panic() {
    let mut v = sample_salam();
    v["advancePayment"] = json!("0.0000000000000000000000000001");
    let err = derive_investment_terms_from_value(&v, &TermPolicy::default()).unwrap_err();
    assert!(matches!(err, IslamicFinanceError::InvalidInput { .. }));
}

#[test]
fn test_typed_terms_bypassing_parser_still_bounded() {
    let terms = ContractTerms::Ijarah(IjarahTerms {
        amount: dec!(1),
        duration: 12,
        asset_value: dec!(1000),
        monthly_rental: Decimal::MAX,
        purchase_option_included: false,
        maintenance_responsibility: MaintenanceResponsibility::Lessee,
        residual_value: dec!(0),
        maintenance_cost: dec!(0),
    });
    assert!(matches!(
        derive_investment_terms(&terms, &TermPolicy::default()),
        Err(IslamicFinanceError::InvalidInput { .. })
    ));
}

#[test]
fn test_unknown_variant_has_no_terms() {
    for v in [
        json!({ "contractType": "istisna", "amount": 1 }),
        json!({ "amount": 1 }),
        json!(null),
        json!("murabaha"),
    ] {
        let err = derive_investment_terms_from_value(&v, &TermPolicy::default()).unwrap_err();
        assert!(err.is_no_derivable_terms(), "{err}");
    }
}

// ===========================================================================
// Policy overrides
// ===========================================================================

#[test]
fn test_custom_policy_band_and_campaign() {
    let mut policy = TermPolicy::default();
    policy.ijarah.band = ReturnBand {
        below: dec!(3),
        above: dec!(0),
    };
    policy.ijarah.campaign = CampaignRule::Fixed { days: 14 };

    let out = derive_investment_terms_from_value(&sample_ijarah(), &policy).unwrap();
    assert_eq!(out.result.return_min, dec!(15));
    assert_eq!(out.result.return_max, dec!(18));
    assert_eq!(out.result.campaign_days, 14);
}

#[test]
fn test_derivation_exposes_intermediate_figures() {
    let terms: ContractTerms = serde_json::from_value(sample_salam()).unwrap();
    let d = derive(&terms, &TermPolicy::default()).unwrap();
    assert_eq!(d.source_rate, dec!(15));
    assert_eq!(d.annual_return, dec!(30));
    assert_eq!(d.minimum_investment_basis, dec!(4000000));
}
