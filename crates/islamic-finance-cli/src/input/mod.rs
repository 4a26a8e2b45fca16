pub mod file;
pub mod policy;
pub mod stdin;

use serde_json::Value;

/// Contract terms from `--input`, falling back to piped stdin.
pub fn contract_value(path: Option<&str>, command: &str) -> Result<Value, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        file::read_json_value(path)
    } else if let Some(data) = stdin::read_stdin()? {
        Ok(data)
    } else {
        Err(format!("--input <contract.json> or stdin required for {command}").into())
    }
}
