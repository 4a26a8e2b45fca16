use colored::Colorize;
use serde_json::Value;

/// Pretty-print a command result to stdout.
pub fn print_json(value: &Value) {
    match render(value) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            tracing::debug!(error = %e, "result serialisation failed");
            eprintln!("{}: {}", "error".red().bold(), e);
        }
    }
}

fn render(value: &Value) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("could not render result as JSON: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_keeps_result_envelope() {
        let text = render(&json!({ "result": { "contractType": "ijarah" } })).unwrap();
        assert!(text.starts_with("{\n"));
        assert!(text.contains("\"contractType\": \"ijarah\""));
    }
}
