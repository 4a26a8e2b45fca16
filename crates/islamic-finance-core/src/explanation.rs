//! Human-readable derivation text for audit and display.
//!
//! The text is rendered from the same [`Derivation`] that produces the
//! published [`InvestmentTerms`](crate::terms::InvestmentTerms), so every
//! figure in it matches the calculator output exactly. Percentages are shown
//! with two decimals, currency amounts unformatted.

use serde_json::Value;

use crate::contracts::{parse_contract, ContractTerms};
use crate::distribution::musharakah::capital_ratio;
use crate::policy::TermPolicy;
use crate::terms::{derive, Derivation, ReturnBasis};
use crate::IslamicFinanceResult;

/// Explain how the investment terms of a contract were derived.
pub fn explain_derivation(terms: &ContractTerms, policy: &TermPolicy) -> IslamicFinanceResult<String> {
    let derivation = derive(terms, policy)?;
    Ok(render(terms, &derivation, policy))
}

/// Classify an opaque contract value and explain its derivation.
pub fn explain_derivation_from_value(value: &Value, policy: &TermPolicy) -> IslamicFinanceResult<String> {
    let terms = parse_contract(value)?;
    explain_derivation(&terms, policy)
}

/// Render the narrative for an already computed derivation.
pub fn render(terms: &ContractTerms, d: &Derivation, policy: &TermPolicy) -> String {
    let source = match terms {
        ContractTerms::Murabaha(t) => format!(
            "Returns calculated from {:.2}% profit rate over {} months ({:.2}% per year)",
            d.source_rate, t.duration, d.annual_return
        ),
        ContractTerms::Mudarabah(t) => match d.basis {
            ReturnBasis::BaselineEstimate => format!(
                "Expected returns estimated from {}% investor profit share of a {}% baseline business return ({:.2}% per year)",
                t.investor_profit_share,
                policy.mudarabah.baseline_return.unwrap_or_default(),
                d.annual_return
            ),
            _ => format!(
                "Expected returns based on a stated {:.2}% annual return with {}% investor profit share",
                d.annual_return, t.investor_profit_share
            ),
        },
        ContractTerms::Musharakah(t) => {
            let contribution = capital_ratio(t).map(|(_, r2)| r2).unwrap_or_default();
            let share = format!(
                "{}% investor profit share ({:.2}% capital contribution)",
                t.party2_profit_share, contribution
            );
            match d.basis {
                ReturnBasis::BaselineEstimate => format!(
                    "Expected returns estimated from {} of a {}% baseline business return ({:.2}% per year)",
                    share,
                    policy.musharakah.baseline_return.unwrap_or_default(),
                    d.annual_return
                ),
                _ => format!(
                    "Expected returns based on a stated {:.2}% annual return with {}",
                    d.annual_return, share
                ),
            }
        }
        ContractTerms::Ijarah(t) => format!(
            "Returns calculated from {:.2}% rental yield ({}/month x 12 / {} asset value)",
            d.annual_return, t.monthly_rental, t.asset_value
        ),
        ContractTerms::Salam(t) => format!(
            "Returns calculated from {:.2}% profit margin over {} months ({} profit on {} advance, {:.2}% per year)",
            d.source_rate,
            t.duration,
            t.delivery_value.saturating_sub(t.advance_payment),
            t.advance_payment,
            d.annual_return
        ),
    };

    format!(
        "{source}, giving an expected annual return of {:.2}% to {:.2}%. \
         Min investment is {}% of {} {}: {} (floor {}). \
         Term {} months, campaign runs {} days.",
        d.terms.return_min,
        d.terms.return_max,
        d.minimum_investment_pct,
        d.minimum_investment_basis,
        basis_label(terms),
        d.terms.minimum_investment,
        d.minimum_investment_floor,
        d.terms.term_months,
        d.terms.campaign_days,
    )
}

fn basis_label(terms: &ContractTerms) -> &'static str {
    match terms {
        ContractTerms::Murabaha(_) => "asset cost",
        ContractTerms::Mudarabah(_) => "capital",
        ContractTerms::Musharakah(_) => "investor capital",
        ContractTerms::Ijarah(_) => "asset value",
        ContractTerms::Salam(_) => "advance payment",
    }
}
