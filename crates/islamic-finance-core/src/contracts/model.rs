//! Contract term model for the five supported Islamic financing contracts.
//!
//! Field names follow the persisted contract documents (camelCase on the
//! wire) and the discriminant lives in the `contractType` tag. Only the
//! fields the engine computes with are modelled; extra document fields are
//! ignored on deserialisation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{ensure_in_range, Money, Months, Percent};
use crate::IslamicFinanceResult;

// ---------------------------------------------------------------------------
// Contract type
// ---------------------------------------------------------------------------

/// Discriminant of a contract-terms value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractType {
    /// Cost-plus sale.
    Murabaha,
    /// Profit-sharing trust.
    Mudarabah,
    /// Joint-venture partnership.
    Musharakah,
    /// Lease.
    Ijarah,
    /// Forward commodity sale.
    Salam,
}

impl ContractType {
    pub const ALL: [ContractType; 5] = [
        ContractType::Murabaha,
        ContractType::Mudarabah,
        ContractType::Musharakah,
        ContractType::Ijarah,
        ContractType::Salam,
    ];

    /// Canonical wire tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractType::Murabaha => "murabaha",
            ContractType::Mudarabah => "mudarabah",
            ContractType::Musharakah => "musharakah",
            ContractType::Ijarah => "ijarah",
            ContractType::Salam => "salam",
        }
    }

    /// Parse a wire tag. Accepts the canonical tags plus the legacy
    /// `mudaraba` / `musharaka` / `ijara` spellings used by older reports.
    pub fn from_tag(tag: &str) -> Option<ContractType> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "murabaha" => Some(ContractType::Murabaha),
            "mudarabah" | "mudaraba" => Some(ContractType::Mudarabah),
            "musharakah" | "musharaka" => Some(ContractType::Musharakah),
            "ijarah" | "ijara" => Some(ContractType::Ijarah),
            "salam" => Some(ContractType::Salam),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ContractType::Murabaha => "Murabaha (Cost-Plus Financing)",
            ContractType::Mudarabah => "Mudarabah (Profit-Sharing Partnership)",
            ContractType::Musharakah => "Musharakah (Joint Venture Partnership)",
            ContractType::Ijarah => "Ijarah (Leasing)",
            ContractType::Salam => "Salam (Forward Purchase)",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ContractType::Murabaha => {
                "Asset purchase with disclosed markup. Suitable for asset acquisition with fixed repayment terms."
            }
            ContractType::Mudarabah => {
                "Capital provider and entrepreneur partnership. Profits shared per ratio, losses borne by capital provider."
            }
            ContractType::Musharakah => {
                "Joint venture where both parties contribute capital. Profits shared per agreement, losses per capital ratio."
            }
            ContractType::Ijarah => {
                "Asset leasing with option to purchase. Lessor retains ownership, lessee pays rental."
            }
            ContractType::Salam => {
                "Advance payment for future commodity delivery. Typically for agricultural products or standardized goods."
            }
        }
    }

    /// Whether the contract shares business profit and loss between parties.
    pub fn is_profit_sharing(&self) -> bool {
        matches!(self, ContractType::Mudarabah | ContractType::Musharakah)
    }
}

impl std::fmt::Display for ContractType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Supporting enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InstallmentFrequency {
    #[default]
    Monthly,
    Quarterly,
    SemiAnnual,
    Annual,
}

impl InstallmentFrequency {
    pub fn months(&self) -> u32 {
        match self {
            InstallmentFrequency::Monthly => 1,
            InstallmentFrequency::Quarterly => 3,
            InstallmentFrequency::SemiAnnual => 6,
            InstallmentFrequency::Annual => 12,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentStructure {
    #[default]
    Installment,
    LumpSum,
    Deferred,
}

/// Who bears capital loss in a Mudarabah.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LossDistribution {
    /// The mudarib loses only effort; capital loss falls on the investor.
    #[default]
    CapitalProviderOnly,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaintenanceResponsibility {
    #[default]
    Lessor,
    Lessee,
    Shared,
}

// ---------------------------------------------------------------------------
// Variant terms
// ---------------------------------------------------------------------------

/// Murabaha: the financier buys an asset and resells it at a disclosed markup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MurabahaTerms {
    pub amount: Money,
    pub duration: Months,
    pub cost_price: Money,
    pub selling_price: Money,
    /// Stored markup; expected to equal `selling_price - cost_price`.
    pub profit_amount: Money,
    /// Profit rate in percent, stated over the full term.
    pub profit_rate: Percent,
    pub asset_cost: Money,
    #[serde(default)]
    pub installment_frequency: InstallmentFrequency,
    #[serde(default)]
    pub payment_structure: PaymentStructure,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_installments: Option<u32>,
    /// Grace period before the first installment, in months.
    #[serde(default)]
    pub deferment_period: Months,
    /// Discount on remaining profit for early settlement, in percent.
    #[serde(default)]
    pub early_settlement_discount: Percent,
}

/// Mudarabah: investor supplies capital, the mudarib supplies management.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MudarabahTerms {
    pub amount: Money,
    pub duration: Months,
    pub capital_amount: Money,
    pub investor_profit_share: Percent,
    pub mudarib_profit_share: Percent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_annual_return: Option<Percent>,
    /// Older documents carry the expected return under this name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_return_rate: Option<Percent>,
    #[serde(default)]
    pub projected_profit: Money,
    #[serde(default)]
    pub loss_distribution: LossDistribution,
}

/// Musharakah: both parties contribute capital. Party 2 is conventionally
/// the investor side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MusharakahTerms {
    pub amount: Money,
    pub duration: Months,
    pub party1_capital: Money,
    pub party2_capital: Money,
    pub party1_profit_share: Percent,
    pub party2_profit_share: Percent,
    /// Stored for display; losses are always split by capital ratio.
    pub party1_loss_share: Percent,
    pub party2_loss_share: Percent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_annual_return: Option<Percent>,
    #[serde(default)]
    pub projected_profit: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party1_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party2_name: Option<String>,
}

impl MurabahaTerms {
    pub fn ensure_in_range(&self) -> IslamicFinanceResult<()> {
        ensure_in_range(&[
            ("amount", self.amount),
            ("costPrice", self.cost_price),
            ("sellingPrice", self.selling_price),
            ("profitAmount", self.profit_amount),
            ("profitRate", self.profit_rate),
            ("assetCost", self.asset_cost),
            ("earlySettlementDiscount", self.early_settlement_discount),
        ])
    }
}

impl MudarabahTerms {
    pub fn ensure_in_range(&self) -> IslamicFinanceResult<()> {
        ensure_in_range(&[
            ("amount", self.amount),
            ("capitalAmount", self.capital_amount),
            ("investorProfitShare", self.investor_profit_share),
            ("mudaribProfitShare", self.mudarib_profit_share),
            ("expectedAnnualReturn", self.expected_annual_return.unwrap_or_default()),
            ("expectedReturnRate", self.expected_return_rate.unwrap_or_default()),
            ("projectedProfit", self.projected_profit),
        ])
    }
}

impl MusharakahTerms {
    /// Bounded inputs keep this sum inside Decimal's range.
    pub fn total_capital(&self) -> Money {
        self.party1_capital + self.party2_capital
    }

    pub fn ensure_in_range(&self) -> IslamicFinanceResult<()> {
        ensure_in_range(&[
            ("amount", self.amount),
            ("party1Capital", self.party1_capital),
            ("party2Capital", self.party2_capital),
            ("party1ProfitShare", self.party1_profit_share),
            ("party2ProfitShare", self.party2_profit_share),
            ("party1LossShare", self.party1_loss_share),
            ("party2LossShare", self.party2_loss_share),
            ("expectedAnnualReturn", self.expected_annual_return.unwrap_or_default()),
            ("projectedProfit", self.projected_profit),
        ])
    }

    pub fn party1_label(&self) -> &str {
        self.party1_name.as_deref().unwrap_or("party1")
    }

    pub fn party2_label(&self) -> &str {
        self.party2_name.as_deref().unwrap_or("party2")
    }
}

/// Ijarah: the lessor keeps ownership and the lessee pays rent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IjarahTerms {
    pub amount: Money,
    pub duration: Months,
    pub asset_value: Money,
    pub monthly_rental: Money,
    #[serde(default)]
    pub purchase_option_included: bool,
    #[serde(default)]
    pub maintenance_responsibility: MaintenanceResponsibility,
    /// Purchase price at lease end, if a purchase option exists.
    #[serde(default)]
    pub residual_value: Money,
    /// Monthly maintenance cost.
    #[serde(default)]
    pub maintenance_cost: Money,
}

impl IjarahTerms {
    pub fn ensure_in_range(&self) -> IslamicFinanceResult<()> {
        ensure_in_range(&[
            ("amount", self.amount),
            ("assetValue", self.asset_value),
            ("monthlyRental", self.monthly_rental),
            ("residualValue", self.residual_value),
            ("maintenanceCost", self.maintenance_cost),
        ])
    }
}

/// Salam: full price paid up front for goods delivered at maturity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalamTerms {
    pub amount: Money,
    pub duration: Months,
    pub advance_payment: Money,
    pub delivery_value: Money,
    pub spot_price: Money,
    pub agreed_price: Money,
    pub delivery_date: NaiveDate,
}

impl SalamTerms {
    pub fn ensure_in_range(&self) -> IslamicFinanceResult<()> {
        ensure_in_range(&[
            ("amount", self.amount),
            ("advancePayment", self.advance_payment),
            ("deliveryValue", self.delivery_value),
            ("spotPrice", self.spot_price),
            ("agreedPrice", self.agreed_price),
        ])
    }
}

// ---------------------------------------------------------------------------
// Tagged union
// ---------------------------------------------------------------------------

/// Contract terms, discriminated by the `contractType` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "contractType", rename_all = "lowercase")]
pub enum ContractTerms {
    Murabaha(MurabahaTerms),
    Mudarabah(MudarabahTerms),
    Musharakah(MusharakahTerms),
    Ijarah(IjarahTerms),
    Salam(SalamTerms),
}

impl ContractTerms {
    pub fn contract_type(&self) -> ContractType {
        match self {
            ContractTerms::Murabaha(_) => ContractType::Murabaha,
            ContractTerms::Mudarabah(_) => ContractType::Mudarabah,
            ContractTerms::Musharakah(_) => ContractType::Musharakah,
            ContractTerms::Ijarah(_) => ContractType::Ijarah,
            ContractTerms::Salam(_) => ContractType::Salam,
        }
    }

    pub fn amount(&self) -> Money {
        match self {
            ContractTerms::Murabaha(t) => t.amount,
            ContractTerms::Mudarabah(t) => t.amount,
            ContractTerms::Musharakah(t) => t.amount,
            ContractTerms::Ijarah(t) => t.amount,
            ContractTerms::Salam(t) => t.amount,
        }
    }

    pub fn duration(&self) -> Months {
        match self {
            ContractTerms::Murabaha(t) => t.duration,
            ContractTerms::Mudarabah(t) => t.duration,
            ContractTerms::Musharakah(t) => t.duration,
            ContractTerms::Ijarah(t) => t.duration,
            ContractTerms::Salam(t) => t.duration,
        }
    }

    /// Reject amounts and rates beyond
    /// [`MAX_INPUT_MAGNITUDE`](crate::types::MAX_INPUT_MAGNITUDE).
    pub fn ensure_in_range(&self) -> IslamicFinanceResult<()> {
        match self {
            ContractTerms::Murabaha(t) => t.ensure_in_range(),
            ContractTerms::Mudarabah(t) => t.ensure_in_range(),
            ContractTerms::Musharakah(t) => t.ensure_in_range(),
            ContractTerms::Ijarah(t) => t.ensure_in_range(),
            ContractTerms::Salam(t) => t.ensure_in_range(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_deserialize_tagged_musharakah() {
        let value = json!({
            "contractType": "musharakah",
            "amount": 15000000,
            "duration": 24,
            "party1Capital": 10000000,
            "party2Capital": 5000000,
            "party1ProfitShare": 60,
            "party2ProfitShare": 40,
            "party1LossShare": 66.67,
            "party2LossShare": 33.33,
            "businessPurpose": "ignored by the engine"
        });
        let terms: ContractTerms = serde_json::from_value(value).unwrap();
        assert_eq!(terms.contract_type(), ContractType::Musharakah);
        assert_eq!(terms.duration(), 24);
        match terms {
            ContractTerms::Musharakah(m) => {
                assert_eq!(m.total_capital(), dec!(15000000));
                assert_eq!(m.expected_annual_return, None);
                assert_eq!(m.party1_label(), "party1");
            }
            other => panic!("unexpected variant {other:?}"),
        }
    }

    #[test]
    fn test_enum_wire_names() {
        let v = serde_json::to_value(InstallmentFrequency::SemiAnnual).unwrap();
        assert_eq!(v, json!("semi-annual"));
        let v = serde_json::to_value(LossDistribution::CapitalProviderOnly).unwrap();
        assert_eq!(v, json!("capital-provider-only"));
    }

    #[test]
    fn test_legacy_tags() {
        assert_eq!(ContractType::from_tag("ijara"), Some(ContractType::Ijarah));
        assert_eq!(ContractType::from_tag("Musharaka"), Some(ContractType::Musharakah));
        assert_eq!(ContractType::from_tag("istisna"), None);
    }
}
