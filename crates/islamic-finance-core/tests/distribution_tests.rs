use islamic_finance_core::contracts::MusharakahTerms;
use islamic_finance_core::distribution::musharakah::{capital_ratio, check_loss_shares};
use islamic_finance_core::distribution::{
    distribute, distribute_from_value, distribute_musharakah, Distribution, SplitBasis,
};
use islamic_finance_core::IslamicFinanceError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

// ===========================================================================
// Fixtures
// ===========================================================================

fn sample_partnership() -> MusharakahTerms {
    MusharakahTerms {
        amount: dec!(15_000_000),
        duration: 24,
        party1_capital: dec!(10_000_000),
        party2_capital: dec!(5_000_000),
        party1_profit_share: dec!(60),
        party2_profit_share: dec!(40),
        party1_loss_share: dec!(66.67),
        party2_loss_share: dec!(33.33),
        expected_annual_return: None,
        projected_profit: dec!(0),
        party1_name: Some("Operator".into()),
        party2_name: Some("Investors".into()),
    }
}

// ===========================================================================
// Musharakah
// ===========================================================================

#[test]
fn test_losses_follow_capital_ratio() {
    let out = distribute_musharakah(&sample_partnership(), dec!(0), dec!(3_000_000)).unwrap();
    let loss = out.result.loss.unwrap();
    assert_eq!(loss.basis, SplitBasis::CapitalRatio);
    assert_eq!(loss.party1_share, dec!(2_000_000));
    assert_eq!(loss.party2_share, dec!(1_000_000));
    assert_eq!(loss.party1_share + loss.party2_share, dec!(3_000_000));
}

#[test]
fn test_loss_law_holds_for_any_capital_mix() {
    let mixes = [
        (dec!(1), dec!(1)),
        (dec!(7_500_000), dec!(2_500_000)),
        (dec!(123_456), dec!(654_321)),
        (dec!(1), dec!(999_999)),
    ];
    for (c1, c2) in mixes {
        let mut t = sample_partnership();
        t.party1_capital = c1;
        t.party2_capital = c2;
        let loss_total = dec!(250_000);
        let r = distribute_musharakah(&t, dec!(0), loss_total).unwrap().result;
        let loss = r.loss.unwrap();
        let expected1 = loss_total * c1 / (c1 + c2);
        assert!((loss.party1_share - expected1).abs() < dec!(0.000001));
        assert!((loss.party1_share + loss.party2_share - loss_total).abs() < dec!(0.000001));
    }
}

#[test]
fn test_stored_loss_shares_never_used() {
    let mut t = sample_partnership();
    t.party1_loss_share = dec!(50);
    t.party2_loss_share = dec!(50);
    let out = distribute_musharakah(&t, dec!(0), dec!(3_000_000)).unwrap();
    let loss = out.result.loss.as_ref().unwrap();
    assert_eq!(loss.party1_share, dec!(2_000_000));

    let discrepancy = out.result.loss_share_discrepancy.unwrap();
    assert_eq!(discrepancy.stored_party1_loss_share, dec!(50));
    assert_eq!(discrepancy.party1_capital_ratio, dec!(66.67));
    assert_eq!(discrepancy.party2_capital_ratio, dec!(33.33));
    assert_eq!(out.warnings.len(), 1);
}

#[test]
fn test_profit_follows_negotiated_ratio() {
    let out = distribute_musharakah(&sample_partnership(), dec!(2_000_000), dec!(0)).unwrap();
    let profit = out.result.profit.unwrap();
    assert_eq!(profit.basis, SplitBasis::ProfitRatio);
    assert_eq!(profit.party1_share, dec!(1_200_000));
    assert_eq!(profit.party2_share, dec!(800_000));
    assert_eq!(profit.party1_pct, dec!(60));
}

#[test]
fn test_party_positions() {
    let r = distribute_musharakah(&sample_partnership(), dec!(2_000_000), dec!(3_000_000))
        .unwrap()
        .result;
    assert_eq!(r.net_result, dec!(-1_000_000));
    assert_eq!(r.party1.label, "Operator");
    assert_eq!(r.party1.net_result, dec!(-800_000));
    assert_eq!(r.party1.capital_remaining, dec!(8_000_000));
    assert_eq!(r.party2.label, "Investors");
    assert_eq!(r.party2.net_result, dec!(-200_000));
    assert_eq!(r.party2.roi_pct, dec!(-4));
}

#[test]
fn test_capital_ratio_helper() {
    let (r1, r2) = capital_ratio(&sample_partnership()).unwrap();
    assert!((r1 + r2 - dec!(100)).abs() < dec!(0.000001));
    assert!(check_loss_shares(&sample_partnership()).is_none());
}

#[test]
fn test_zero_capital_rejected() {
    let mut t = sample_partnership();
    t.party2_capital = Decimal::ZERO;
    assert!(matches!(
        distribute_musharakah(&t, dec!(0), dec!(100)),
        Err(IslamicFinanceError::InvalidInput { .. })
    ));
}

// ===========================================================================
// Dispatch from opaque values
// ===========================================================================

#[test]
fn test_mudarabah_loss_falls_on_investor() {
    let v = json!({
        "contractType": "mudarabah",
        "amount": 8000000,
        "duration": 18,
        "capitalAmount": 8000000,
        "investorProfitShare": 60,
        "mudaribProfitShare": 40
    });
    let out = distribute_from_value(&v, dec!(0), dec!(1_000_000)).unwrap();
    let Distribution::Mudarabah(m) = out.result else {
        panic!("expected mudarabah distribution");
    };
    let loss = m.loss.unwrap();
    assert_eq!(loss.basis, SplitBasis::CapitalProviderOnly);
    assert_eq!(loss.party1_share, dec!(1_000_000));
    assert_eq!(loss.party2_share, dec!(0));
    assert_eq!(m.capital_remaining, dec!(7_000_000));
}

#[test]
fn test_legacy_tag_distributes() {
    let v = json!({
        "contractType": "musharaka",
        "amount": 15000000,
        "duration": 24,
        "party1Capital": 10000000,
        "party2Capital": 5000000,
        "party1ProfitShare": 60,
        "party2ProfitShare": 40,
        "party1LossShare": 66.67,
        "party2LossShare": 33.33
    });
    let out = distribute_from_value(&v, dec!(300), dec!(0)).unwrap();
    assert!(matches!(out.result, Distribution::Musharakah(_)));
}

#[test]
fn test_non_sharing_contract_rejected() {
    let v = json!({
        "contractType": "ijarah",
        "amount": 1000,
        "duration": 12,
        "assetValue": 1000,
        "monthlyRental": 10
    });
    let terms = islamic_finance_core::parse_contract(&v).unwrap();
    assert!(matches!(
        distribute(&terms, dec!(100), dec!(0)),
        Err(IslamicFinanceError::UnsupportedOperation(_))
    ));
}

#[test]
fn test_oversized_period_figures_are_errors() {
    let v = json!({
        "contractType": "musharakah",
        "amount": 15000000,
        "duration": 24,
        "party1Capital": 10000000,
        "party2Capital": 5000000,
        "party1ProfitShare": 60,
        "party2ProfitShare": 40,
        "party1LossShare": 66.67,
        "party2LossShare": 33.33
    });
    for (profit, loss) in [(Decimal::MAX, dec!(0)), (dec!(0), Decimal::MAX)] {
        assert!(matches!(
            distribute_from_value(&v, profit, loss),
            Err(IslamicFinanceError::InvalidInput { .. })
        ));
    }
}

#[test]
fn test_large_loss_on_large_capital_still_splits() {
    // loss x capital does not fit in a Decimal; the split scales by ratio.
    let mut t = sample_partnership();
    t.party1_capital = dec!(600_000_000_000_000);
    t.party2_capital = dec!(300_000_000_000_000);
    t.party1_loss_share = dec!(66.67);
    t.party2_loss_share = dec!(33.33);
    let loss_total = dec!(900_000_000_000_000);
    let loss = distribute_musharakah(&t, dec!(0), loss_total).unwrap().result.loss.unwrap();
    assert!((loss.party1_share - dec!(600_000_000_000_000)).abs() < dec!(0.0001));
    assert!((loss.party2_share - dec!(300_000_000_000_000)).abs() < dec!(0.0001));
}

#[test]
fn test_unknown_variant_rejected() {
    let err = distribute_from_value(&json!({ "contractType": "tawarruq" }), dec!(1), dec!(0))
        .unwrap_err();
    assert!(err.is_no_derivable_terms());
}
