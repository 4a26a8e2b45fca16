pub mod contracts;
pub mod distribution;
pub mod error;
pub mod explanation;
pub mod policy;
pub mod terms;
pub mod types;

#[cfg(feature = "compliance")]
pub mod compliance;

#[cfg(feature = "metrics")]
pub mod metrics;

#[cfg(feature = "schedules")]
pub mod schedules;

pub use contracts::{classify, parse_contract, ContractTerms, ContractType};
pub use distribution::{distribute, distribute_from_value, Distribution};
pub use error::IslamicFinanceError;
pub use explanation::{explain_derivation, explain_derivation_from_value};
pub use policy::TermPolicy;
pub use terms::{derive_investment_terms, derive_investment_terms_from_value, InvestmentTerms};
pub use types::*;

/// Standard result type for all islamic-finance operations
pub type IslamicFinanceResult<T> = Result<T, IslamicFinanceError>;
