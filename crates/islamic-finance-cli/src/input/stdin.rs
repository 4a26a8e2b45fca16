use serde_json::Value;
use std::io::{self, Read};

/// Contract terms piped on stdin.
///
/// `Ok(None)` when stdin is a terminal or carries only whitespace.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(parse_contract_document(&buffer)?)
}

/// Contract documents must be JSON objects.
fn parse_contract_document(text: &str) -> Result<Option<Value>, String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value: Value = serde_json::from_str(trimmed)
        .map_err(|e| format!("stdin is not valid contract JSON: {e}"))?;
    if !value.is_object() {
        return Err("stdin must hold a single contract object".to_string());
    }
    tracing::debug!(bytes = trimmed.len(), "read contract terms from stdin");
    Ok(Some(value))
}
