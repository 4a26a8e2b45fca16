use islamic_finance_core::explanation::explain_derivation_from_value;
use islamic_finance_core::policy::TermPolicy;
use islamic_finance_core::terms::derive_investment_terms_from_value;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use std::str::FromStr;

// ===========================================================================
// Helpers
// ===========================================================================

fn samples() -> Vec<Value> {
    vec![
        json!({
            "contractType": "murabaha",
            "amount": 5000000, "duration": 18,
            "costPrice": 5000000, "sellingPrice": 5750000,
            "profitAmount": 750000, "profitRate": 15, "assetCost": 5000000
        }),
        json!({
            "contractType": "mudarabah",
            "amount": 8000000, "duration": 18, "capitalAmount": 8000000,
            "investorProfitShare": 60, "mudaribProfitShare": 40
        }),
        json!({
            "contractType": "musharakah",
            "amount": 15000000, "duration": 36,
            "party1Capital": 10000000, "party2Capital": 5000000,
            "party1ProfitShare": 55, "party2ProfitShare": 45,
            "party1LossShare": 66.67, "party2LossShare": 33.33,
            "expectedAnnualReturn": 17.5
        }),
        json!({
            "contractType": "ijarah",
            "amount": 20000000, "duration": 36,
            "assetValue": 20000000, "monthlyRental": 275000
        }),
        json!({
            "contractType": "salam",
            "amount": 4000000, "duration": 9,
            "advancePayment": 4000000, "deliveryValue": 4500000,
            "spotPrice": 450, "agreedPrice": 400, "deliveryDate": "2027-03-31"
        }),
    ]
}

/// Pull the decimal that follows `marker` in `text`.
fn number_after(text: &str, marker: &str) -> Decimal {
    let start = text.find(marker).unwrap_or_else(|| panic!("'{marker}' not in: {text}")) + marker.len();
    let digits: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    Decimal::from_str(digits.trim_end_matches('.')).unwrap()
}

// ===========================================================================
// Consistency with the calculators
// ===========================================================================

#[test]
fn test_explanation_matches_derived_terms() {
    let policy = TermPolicy::default();
    for sample in samples() {
        let terms = derive_investment_terms_from_value(&sample, &policy).unwrap().result;
        let text = explain_derivation_from_value(&sample, &policy).unwrap();

        assert_eq!(number_after(&text, "annual return of "), terms.return_min, "{text}");
        assert_eq!(number_after(&text, "% to "), terms.return_max, "{text}");
        assert_eq!(number_after(&text, ": "), terms.minimum_investment, "{text}");
        assert_eq!(number_after(&text, "Term "), Decimal::from(terms.term_months), "{text}");
        assert_eq!(
            number_after(&text, "campaign runs "),
            Decimal::from(terms.campaign_days),
            "{text}"
        );
    }
}

#[test]
fn test_explanation_is_deterministic() {
    let policy = TermPolicy::default();
    for sample in samples() {
        assert_eq!(
            explain_derivation_from_value(&sample, &policy).unwrap(),
            explain_derivation_from_value(&sample, &policy).unwrap()
        );
    }
}

#[test]
fn test_explanation_follows_policy_override() {
    let mut policy = TermPolicy::default();
    policy.ijarah.band.above = dec!(3);
    let sample = &samples()[3];
    let text = explain_derivation_from_value(sample, &policy).unwrap();
    // 3,300,000 / 20,000,000 = 16.5%
    assert!(text.contains("16.50% rental yield"), "{text}");
    assert!(text.contains("15.50% to 19.50%"), "{text}");
}

// ===========================================================================
// Variant-specific narrative
// ===========================================================================

#[test]
fn test_mudarabah_baseline_narrative() {
    let text = explain_derivation_from_value(&samples()[1], &TermPolicy::default()).unwrap();
    // 60% of an 18% baseline
    assert!(text.contains("60% investor profit share of a 18% baseline"), "{text}");
    assert!(text.contains("(10.80% per year)"), "{text}");
    assert!(text.contains("8.80% to 14.80%"), "{text}");
}

#[test]
fn test_musharakah_narrative_mentions_contribution() {
    let text = explain_derivation_from_value(&samples()[2], &TermPolicy::default()).unwrap();
    assert!(text.contains("stated 17.50% annual return"), "{text}");
    assert!(text.contains("45% investor profit share (33.33% capital contribution)"), "{text}");
}

#[test]
fn test_salam_narrative() {
    let text = explain_derivation_from_value(&samples()[4], &TermPolicy::default()).unwrap();
    // 12.5% over nine months
    assert!(text.contains("12.50% profit margin over 9 months"), "{text}");
    assert!(text.contains("500000 profit on 4000000 advance"), "{text}");
    assert!(text.contains("16.67% per year"), "{text}");
}

#[test]
fn test_unknown_variant_has_no_explanation() {
    for v in [json!({ "contractType": "wakala" }), json!([]), json!(null)] {
        let err = explain_derivation_from_value(&v, &TermPolicy::default()).unwrap_err();
        assert!(err.is_no_derivable_terms());
    }
}
