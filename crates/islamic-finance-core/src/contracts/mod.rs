pub mod classifier;
pub mod model;

pub use classifier::{classify, parse_contract};
pub use model::*;
