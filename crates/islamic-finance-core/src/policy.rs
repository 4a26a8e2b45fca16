//! Economic assumptions used when deriving investment terms.
//!
//! None of these values are mathematical necessities. They encode platform
//! policy (how wide the advertised return band is, how large the smallest
//! ticket is, how long a campaign runs) and can be overridden per call. The
//! defaults reproduce the figures currently published to investors.
//!
//! The Mudarabah and Musharakah baseline business returns (18% and 20%) are
//! placeholder estimates with no documented provenance. They are kept as
//! defaults until confirmed by the Shariah and product teams.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::contracts::ContractType;
use crate::error::IslamicFinanceError;
use crate::types::{Money, Months, Percent, MAX_INPUT_MAGNITUDE};
use crate::IslamicFinanceResult;

/// Band, in percentage points, around the computed annual return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnBand {
    /// Subtracted to obtain `return_min`.
    pub below: Percent,
    /// Added to obtain `return_max`.
    pub above: Percent,
}

/// Minimum ticket as a share of a contract-specific basis amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimumInvestmentRule {
    pub percent_of_basis: Percent,
    /// Absolute floor in currency units.
    pub floor: Money,
}

/// How long the fundraising campaign runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum CampaignRule {
    /// Same length for every term.
    Fixed { days: u32 },
    /// `long_days` when the term is at least `long_term_from_months`,
    /// otherwise `short_days`.
    ByTerm {
        long_term_from_months: Months,
        short_days: u32,
        long_days: u32,
    },
}

impl CampaignRule {
    pub fn days_for(&self, duration: Months) -> u32 {
        match *self {
            CampaignRule::Fixed { days } => days,
            CampaignRule::ByTerm {
                long_term_from_months,
                short_days,
                long_days,
            } => {
                if duration >= long_term_from_months {
                    long_days
                } else {
                    short_days
                }
            }
        }
    }

    fn validate(&self, field: &str) -> IslamicFinanceResult<()> {
        let ok = match *self {
            CampaignRule::Fixed { days } => days > 0,
            CampaignRule::ByTerm {
                short_days,
                long_days,
                ..
            } => short_days > 0 && long_days > 0,
        };
        if ok {
            Ok(())
        } else {
            Err(IslamicFinanceError::InvalidInput {
                field: field.into(),
                reason: "Campaign length must be at least one day".into(),
            })
        }
    }
}

/// Policy for a single contract variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantPolicy {
    pub band: ReturnBand,
    pub minimum_investment: MinimumInvestmentRule,
    pub campaign: CampaignRule,
    /// Assumed business return used to estimate the investor's return when
    /// the contract states none. Only profit-sharing contracts use it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_return: Option<Percent>,
}

impl VariantPolicy {
    fn validate(&self, name: &str) -> IslamicFinanceResult<()> {
        if self.band.below < Decimal::ZERO || self.band.above < Decimal::ZERO {
            return Err(IslamicFinanceError::InvalidInput {
                field: format!("{name}.band"),
                reason: "Band widths cannot be negative".into(),
            });
        }
        if self.band.below > dec!(100) || self.band.above > dec!(100) {
            return Err(IslamicFinanceError::InvalidInput {
                field: format!("{name}.band"),
                reason: "Band widths cannot exceed 100 points".into(),
            });
        }
        let pct = self.minimum_investment.percent_of_basis;
        if pct <= Decimal::ZERO || pct > dec!(100) {
            return Err(IslamicFinanceError::InvalidInput {
                field: format!("{name}.minimum_investment.percent_of_basis"),
                reason: "Must be in (0, 100]".into(),
            });
        }
        if self.minimum_investment.floor < Decimal::ZERO {
            return Err(IslamicFinanceError::InvalidInput {
                field: format!("{name}.minimum_investment.floor"),
                reason: "Floor cannot be negative".into(),
            });
        }
        if self.minimum_investment.floor > MAX_INPUT_MAGNITUDE {
            return Err(IslamicFinanceError::InvalidInput {
                field: format!("{name}.minimum_investment.floor"),
                reason: "value out of range".into(),
            });
        }
        if let Some(baseline) = self.baseline_return {
            if baseline < Decimal::ZERO || baseline > dec!(100) {
                return Err(IslamicFinanceError::InvalidInput {
                    field: format!("{name}.baseline_return"),
                    reason: "Must be between 0 and 100".into(),
                });
            }
        }
        self.campaign.validate(&format!("{name}.campaign"))
    }
}

/// Complete term-derivation policy. Each variant block is replaced whole
/// when overridden; omitted blocks keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TermPolicy {
    pub murabaha: VariantPolicy,
    pub mudarabah: VariantPolicy,
    pub musharakah: VariantPolicy,
    pub ijarah: VariantPolicy,
    pub salam: VariantPolicy,
}

impl Default for TermPolicy {
    fn default() -> Self {
        Self {
            murabaha: VariantPolicy {
                band: ReturnBand {
                    below: dec!(1),
                    above: dec!(1),
                },
                minimum_investment: MinimumInvestmentRule {
                    percent_of_basis: dec!(15),
                    floor: dec!(100000),
                },
                // 21 days up to a one-year term, 30 beyond.
                campaign: CampaignRule::ByTerm {
                    long_term_from_months: 13,
                    short_days: 21,
                    long_days: 30,
                },
                baseline_return: None,
            },
            mudarabah: VariantPolicy {
                // Upside-skewed: profit-sharing returns vary with performance.
                band: ReturnBand {
                    below: dec!(2),
                    above: dec!(4),
                },
                minimum_investment: MinimumInvestmentRule {
                    percent_of_basis: dec!(12),
                    floor: dec!(250000),
                },
                campaign: CampaignRule::Fixed { days: 30 },
                baseline_return: Some(dec!(18)),
            },
            musharakah: VariantPolicy {
                band: ReturnBand {
                    below: dec!(2),
                    above: dec!(3),
                },
                minimum_investment: MinimumInvestmentRule {
                    percent_of_basis: dec!(12),
                    floor: dec!(500000),
                },
                campaign: CampaignRule::ByTerm {
                    long_term_from_months: 24,
                    short_days: 30,
                    long_days: 45,
                },
                baseline_return: Some(dec!(20)),
            },
            ijarah: VariantPolicy {
                band: ReturnBand {
                    below: dec!(1),
                    above: dec!(1),
                },
                minimum_investment: MinimumInvestmentRule {
                    percent_of_basis: dec!(17),
                    floor: dec!(300000),
                },
                campaign: CampaignRule::Fixed { days: 30 },
                baseline_return: None,
            },
            salam: VariantPolicy {
                band: ReturnBand {
                    below: dec!(2),
                    above: dec!(2),
                },
                minimum_investment: MinimumInvestmentRule {
                    percent_of_basis: dec!(11),
                    floor: dec!(150000),
                },
                campaign: CampaignRule::ByTerm {
                    long_term_from_months: 12,
                    short_days: 45,
                    long_days: 60,
                },
                baseline_return: None,
            },
        }
    }
}

impl TermPolicy {
    pub fn for_contract(&self, contract_type: ContractType) -> &VariantPolicy {
        match contract_type {
            ContractType::Murabaha => &self.murabaha,
            ContractType::Mudarabah => &self.mudarabah,
            ContractType::Musharakah => &self.musharakah,
            ContractType::Ijarah => &self.ijarah,
            ContractType::Salam => &self.salam,
        }
    }

    pub fn validate(&self) -> IslamicFinanceResult<()> {
        for ct in ContractType::ALL {
            self.for_contract(ct).validate(ct.as_str())?;
        }
        for ct in [ContractType::Mudarabah, ContractType::Musharakah] {
            if self.for_contract(ct).baseline_return.is_none() {
                return Err(IslamicFinanceError::InvalidInput {
                    field: format!("{ct}.baseline_return"),
                    reason: "Profit-sharing contracts need a baseline return".into(),
                });
            }
        }
        Ok(())
    }
}
