//! Shariah-structure checks on contract terms.
//!
//! Unlike the term calculators, which fail on the first unusable input,
//! compliance review collects every finding so a contract can be corrected
//! in one pass. A contract is compliant when it has no
//! [`Severity::Violation`] findings; warnings and informational notes are
//! advisory.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::contracts::classifier::deserialize_contract;
use crate::contracts::{
    ContractTerms, ContractType, IjarahTerms, MudarabahTerms, MurabahaTerms,
    MusharakahTerms, SalamTerms,
};
use crate::distribution::musharakah::{capital_ratio, check_loss_shares};
use crate::error::IslamicFinanceError;
use crate::types::*;
use crate::IslamicFinanceResult;

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Markup above this share of cost is flagged on a Murabaha.
const MAX_MURABAHA_MARKUP_PCT: Percent = dec!(30);
/// Total rentals above this multiple of asset value are flagged on an Ijarah.
const MAX_RENTAL_TO_ASSET_MULTIPLE: Decimal = dec!(1.5);
/// Monthly maintenance above this share of asset value is flagged.
const MAX_MAINTENANCE_PCT: Percent = dec!(20);
/// Profit share this many points away from the capital ratio is noted.
const PROFIT_SHARE_DEVIATION_PTS: Percent = dec!(20);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Violation,
}

/// One observation about a contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    /// Stable identifier, e.g. `murabaha.markup_limit`.
    pub code: String,
    pub severity: Severity,
    /// Wire name of the field the finding concerns.
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReport {
    pub contract_type: ContractType,
    pub findings: Vec<Finding>,
}

impl ComplianceReport {
    pub fn is_compliant(&self) -> bool {
        !self.findings.iter().any(|f| f.severity == Severity::Violation)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.findings.iter().filter(|f| f.severity == severity).count()
    }

    /// Most severe finding level, if any.
    pub fn worst(&self) -> Option<Severity> {
        self.findings.iter().map(|f| f.severity).max()
    }
}

struct Findings {
    prefix: &'static str,
    items: Vec<Finding>,
}

impl Findings {
    fn new(contract_type: ContractType) -> Self {
        Findings {
            prefix: contract_type.as_str(),
            items: Vec::new(),
        }
    }

    fn push(&mut self, severity: Severity, code: &str, field: &str, message: String) {
        self.items.push(Finding {
            code: format!("{}.{}", self.prefix, code),
            severity,
            field: field.to_string(),
            message,
        });
    }

    fn require_positive(&mut self, value: Decimal, field: &str) {
        if value <= Decimal::ZERO {
            self.push(
                Severity::Violation,
                "non_positive",
                field,
                format!("{field} must be positive, got {value}"),
            );
        }
    }

    fn require_percent(&mut self, value: Percent, field: &str) {
        if value < Decimal::ZERO || value > dec!(100) {
            self.push(
                Severity::Violation,
                "share_out_of_range",
                field,
                format!("{field} must be between 0 and 100, got {value}"),
            );
        }
    }

    fn require_full_split(&mut self, a: Percent, b: Percent, field: &str, what: &str) {
        if !is_full_split(a, b) {
            self.push(
                Severity::Violation,
                "split_not_100",
                field,
                format!("{what} shares must total 100%, got {}", a + b),
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Review typed contract terms.
pub fn check_compliance(terms: &ContractTerms) -> ComputationOutput<ComplianceReport> {
    let contract_type = terms.contract_type();
    let mut findings = Findings::new(contract_type);

    match terms.ensure_in_range() {
        Ok(()) => check_rules(terms, &mut findings),
        Err(IslamicFinanceError::InvalidInput { field, reason }) => findings.push(
            Severity::Violation,
            "value_out_of_range",
            &field,
            format!("{field}: {reason}"),
        ),
        Err(e) => findings.push(Severity::Violation, "value_out_of_range", "", e.to_string()),
    }

    let report = ComplianceReport {
        contract_type,
        findings: findings.items,
    };
    tracing::debug!(
        contract_type = %contract_type,
        findings = report.findings.len(),
        compliant = report.is_compliant(),
        "compliance review complete"
    );

    let warnings = report
        .findings
        .iter()
        .filter(|f| f.severity == Severity::Violation)
        .map(|f| f.message.clone())
        .collect();

    with_metadata(
        "Structural review of contract terms against profit/loss sharing rules",
        &serde_json::json!({
            "max_murabaha_markup_pct": MAX_MURABAHA_MARKUP_PCT.to_string(),
            "max_rental_to_asset_multiple": MAX_RENTAL_TO_ASSET_MULTIPLE.to_string(),
            "max_monthly_maintenance_pct": MAX_MAINTENANCE_PCT.to_string(),
            "profit_share_deviation_pts": PROFIT_SHARE_DEVIATION_PTS.to_string(),
            "split_tolerance": SPLIT_TOLERANCE.to_string(),
        }),
        warnings,
        report,
    )
}

/// Classify an opaque contract value and review it. Out-of-range amounts
/// are reported as findings rather than rejected.
pub fn check_compliance_from_value(value: &Value) -> IslamicFinanceResult<ComputationOutput<ComplianceReport>> {
    let terms = deserialize_contract(value)?;
    Ok(check_compliance(&terms))
}

// ---------------------------------------------------------------------------
// Per-variant rules
// ---------------------------------------------------------------------------

fn check_rules(terms: &ContractTerms, f: &mut Findings) {
    match terms {
        ContractTerms::Murabaha(t) => check_murabaha(t, f),
        ContractTerms::Mudarabah(t) => check_mudarabah(t, f),
        ContractTerms::Musharakah(t) => check_musharakah(t, f),
        ContractTerms::Ijarah(t) => check_ijarah(t, f),
        ContractTerms::Salam(t) => check_salam(t, f),
    }
}

fn check_murabaha(t: &MurabahaTerms, f: &mut Findings) {
    f.require_positive(t.cost_price, "costPrice");
    f.require_positive(t.asset_cost, "assetCost");

    let markup = t.selling_price - t.cost_price;
    if t.selling_price < t.cost_price {
        f.push(
            Severity::Violation,
            "sale_below_cost",
            "sellingPrice",
            format!(
                "Selling price {} is below cost {}; a Murabaha sale must carry a markup",
                t.selling_price, t.cost_price
            ),
        );
    }
    if !within_tolerance(t.profit_amount, markup) {
        f.push(
            Severity::Warning,
            "profit_amount_mismatch",
            "profitAmount",
            format!(
                "Stored profit amount {} differs from selling price minus cost {}",
                t.profit_amount, markup
            ),
        );
    }
    if t.cost_price > Decimal::ZERO {
        let markup_label = match percent_of(markup, t.cost_price, "sellingPrice") {
            Ok(pct) if pct <= MAX_MURABAHA_MARKUP_PCT => None,
            Ok(pct) => Some(format!("Markup {}%", round_percent(pct))),
            Err(_) => Some("Markup".to_string()),
        };
        if let Some(label) = markup_label {
            f.push(
                Severity::Warning,
                "markup_limit",
                "sellingPrice",
                format!(
                    "{label} exceeds the recommended limit of {}%",
                    MAX_MURABAHA_MARKUP_PCT
                ),
            );
        }
    }
    if t.number_of_installments == Some(0) {
        f.push(
            Severity::Violation,
            "zero_installments",
            "numberOfInstallments",
            "Number of installments cannot be zero".to_string(),
        );
    }
}

fn check_mudarabah(t: &MudarabahTerms, f: &mut Findings) {
    f.require_positive(t.capital_amount, "capitalAmount");
    f.require_percent(t.investor_profit_share, "investorProfitShare");
    f.require_percent(t.mudarib_profit_share, "mudaribProfitShare");
    f.require_full_split(
        t.investor_profit_share,
        t.mudarib_profit_share,
        "investorProfitShare",
        "Investor and mudarib profit",
    );
}

fn check_musharakah(t: &MusharakahTerms, f: &mut Findings) {
    f.require_positive(t.party1_capital, "party1Capital");
    f.require_positive(t.party2_capital, "party2Capital");
    f.require_percent(t.party1_profit_share, "party1ProfitShare");
    f.require_percent(t.party2_profit_share, "party2ProfitShare");
    f.require_full_split(
        t.party1_profit_share,
        t.party2_profit_share,
        "party1ProfitShare",
        "Partner profit",
    );
    f.require_full_split(
        t.party1_loss_share,
        t.party2_loss_share,
        "party1LossShare",
        "Partner loss",
    );

    if let Some(d) = check_loss_shares(t) {
        f.push(
            Severity::Violation,
            "loss_not_capital_ratio",
            "party1LossShare",
            d.to_string(),
        );
    }

    if let Some((ratio1, _)) = capital_ratio(t) {
        let deviation = (t.party1_profit_share - ratio1).abs();
        if deviation > PROFIT_SHARE_DEVIATION_PTS {
            f.push(
                Severity::Info,
                "profit_share_deviation",
                "party1ProfitShare",
                format!(
                    "Partner 1 profit share {}% differs from capital ratio {}% by more than {} points",
                    t.party1_profit_share,
                    round_percent(ratio1),
                    PROFIT_SHARE_DEVIATION_PTS
                ),
            );
        }
    }
}

fn check_ijarah(t: &IjarahTerms, f: &mut Findings) {
    f.require_positive(t.asset_value, "assetValue");
    f.require_positive(t.monthly_rental, "monthlyRental");
    if t.maintenance_cost < Decimal::ZERO {
        f.push(
            Severity::Violation,
            "negative_maintenance",
            "maintenanceCost",
            format!("Maintenance cost cannot be negative, got {}", t.maintenance_cost),
        );
    }
    if t.asset_value <= Decimal::ZERO {
        return;
    }

    let total_rentals = t.monthly_rental * Decimal::from(t.duration);
    let ceiling = t.asset_value * MAX_RENTAL_TO_ASSET_MULTIPLE;
    if total_rentals > ceiling {
        f.push(
            Severity::Warning,
            "rental_ceiling",
            "monthlyRental",
            format!(
                "Total rentals {} exceed {}x asset value ({})",
                total_rentals, MAX_RENTAL_TO_ASSET_MULTIPLE, ceiling
            ),
        );
    }
    let maintenance_cap = apply_percent(t.asset_value, MAX_MAINTENANCE_PCT, "maintenanceCost");
    if matches!(maintenance_cap, Ok(cap) if t.maintenance_cost > cap) {
        f.push(
            Severity::Warning,
            "maintenance_ceiling",
            "maintenanceCost",
            format!(
                "Monthly maintenance {} exceeds {}% of asset value",
                t.maintenance_cost, MAX_MAINTENANCE_PCT
            ),
        );
    }
}

fn check_salam(t: &SalamTerms, f: &mut Findings) {
    f.require_positive(t.advance_payment, "advancePayment");
    if t.delivery_value <= t.advance_payment {
        f.push(
            Severity::Warning,
            "not_profitable",
            "deliveryValue",
            format!(
                "Delivery value {} does not exceed advance payment {}",
                t.delivery_value, t.advance_payment
            ),
        );
    }
}
