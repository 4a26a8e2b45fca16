use thiserror::Error;

#[derive(Debug, Error)]
pub enum IslamicFinanceError {
    #[error("Unrecognized contract: {0}")]
    UnrecognizedContract(String),

    #[error("Malformed contract: {0}")]
    MalformedContract(String),

    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl IslamicFinanceError {
    /// True for every failure that means "no derivable terms" for a contract,
    /// as opposed to a problem with the caller's own request.
    pub fn is_no_derivable_terms(&self) -> bool {
        matches!(
            self,
            IslamicFinanceError::UnrecognizedContract(_)
                | IslamicFinanceError::MalformedContract(_)
                | IslamicFinanceError::InvalidInput { .. }
                | IslamicFinanceError::DivisionByZero { .. }
        )
    }
}

impl From<serde_json::Error> for IslamicFinanceError {
    fn from(e: serde_json::Error) -> Self {
        IslamicFinanceError::SerializationError(e.to_string())
    }
}
