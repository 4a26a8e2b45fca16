use serde_json::Value;

use super::cell;

/// Priority list of key output fields, checked in order.
const PRIORITY_KEYS: [&str; 8] = [
    "explanation",
    "contractType",
    "settlementAmount",
    "netResult",
    "apr",
    "rentalYield",
    "annualizedReturn",
    "findings",
];

/// Print just the key answer from the output.
///
/// Investment terms print as `min-max% | minimum | months | days`; other
/// results print the first priority field present, then the first field.
pub fn print_minimal(value: &Value) {
    println!("{}", render_minimal(value));
}

fn render_minimal(value: &Value) -> String {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let Value::Object(map) = result else {
        return cell(result);
    };

    if let (Some(min), Some(max)) = (map.get("returnMin"), map.get("returnMax")) {
        return format!(
            "{}-{}% | min {} | {} months | {} days",
            cell(min),
            cell(max),
            map.get("minimumInvestment").map(cell).unwrap_or_default(),
            map.get("termMonths").map(cell).unwrap_or_default(),
            map.get("campaignDays").map(cell).unwrap_or_default(),
        );
    }

    for key in PRIORITY_KEYS {
        if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
            return cell(val);
        }
    }

    map.iter()
        .next()
        .map(|(key, val)| format!("{}: {}", key, cell(val)))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_investment_terms() {
        let v = json!({ "result": {
            "returnMin": "11", "returnMax": "13", "termMonths": 12,
            "minimumInvestment": "750000", "campaignDays": 21
        }});
        assert_eq!(render_minimal(&v), "11-13% | min 750000 | 12 months | 21 days");
    }

    #[test]
    fn test_minimal_priority_key() {
        let v = json!({ "result": { "contractType": "salam", "explanation": "text" } });
        assert_eq!(render_minimal(&v), "text");
    }
}
