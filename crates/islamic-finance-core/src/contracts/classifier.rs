//! Runtime discrimination of opaque contract-terms values.

use serde::Deserialize;
use serde_json::Value;

use super::model::{ContractTerms, ContractType};
use crate::error::IslamicFinanceError;
use crate::IslamicFinanceResult;

/// Wire name of the discriminant.
pub const TAG_FIELD: &str = "contractType";

/// Classify an opaque contract-terms value into exactly one variant.
///
/// Fails with [`IslamicFinanceError::UnrecognizedContract`] when the payload
/// is null or not an object, or when the tag is missing, not a string, or not
/// one of the known variants.
pub fn classify(value: &Value) -> IslamicFinanceResult<ContractType> {
    let obj = match value {
        Value::Object(map) => map,
        Value::Null => {
            return Err(IslamicFinanceError::UnrecognizedContract(
                "contract terms are absent".into(),
            ))
        }
        _ => {
            return Err(IslamicFinanceError::UnrecognizedContract(
                "contract terms must be an object".into(),
            ))
        }
    };

    let tag = match obj.get(TAG_FIELD) {
        Some(Value::String(s)) => s,
        Some(_) => {
            return Err(IslamicFinanceError::UnrecognizedContract(format!(
                "'{TAG_FIELD}' must be a string"
            )))
        }
        None => {
            return Err(IslamicFinanceError::UnrecognizedContract(format!(
                "missing '{TAG_FIELD}'"
            )))
        }
    };

    ContractType::from_tag(tag).ok_or_else(|| {
        IslamicFinanceError::UnrecognizedContract(format!("unknown contract type '{tag}'"))
    })
}

/// Classify and then deserialise an opaque value into typed [`ContractTerms`].
///
/// Legacy tag spellings are normalised before deserialisation. Missing or
/// mistyped fields for a recognised variant yield
/// [`IslamicFinanceError::MalformedContract`]; amounts beyond
/// [`MAX_INPUT_MAGNITUDE`](crate::types::MAX_INPUT_MAGNITUDE) yield
/// [`IslamicFinanceError::InvalidInput`].
pub fn parse_contract(value: &Value) -> IslamicFinanceResult<ContractTerms> {
    let terms = deserialize_contract(value)?;
    terms.ensure_in_range()?;
    Ok(terms)
}

/// Classify and deserialise without the magnitude check.
pub(crate) fn deserialize_contract(value: &Value) -> IslamicFinanceResult<ContractTerms> {
    let contract_type = classify(value)?;
    let canonical = value.get(TAG_FIELD).and_then(Value::as_str) == Some(contract_type.as_str());

    let parsed = if canonical {
        ContractTerms::deserialize(value)
    } else {
        let mut normalised = value.clone();
        if let Some(obj) = normalised.as_object_mut() {
            obj.insert(
                TAG_FIELD.to_string(),
                Value::String(contract_type.as_str().to_string()),
            );
        }
        ContractTerms::deserialize(&normalised)
    };

    let terms = parsed.map_err(|e| {
        IslamicFinanceError::MalformedContract(format!("{contract_type}: {e}"))
    })?;

    tracing::debug!(contract_type = %contract_type, "classified contract terms");
    Ok(terms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_each_variant() {
        for ct in ContractType::ALL {
            let value = json!({ "contractType": ct.as_str() });
            assert_eq!(classify(&value).unwrap(), ct);
        }
    }

    #[test]
    fn test_parse_rejects_oversized_amount() {
        let value = json!({
            "contractType": "ijarah",
            "amount": 1000,
            "duration": 12,
            "assetValue": 1000,
            "monthlyRental": "10000000000000000000000000000"
        });
        match parse_contract(&value) {
            Err(IslamicFinanceError::InvalidInput { field, .. }) => assert_eq!(field, "monthlyRental"),
            other => panic!("expected out-of-range input, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_null_and_non_object() {
        assert!(matches!(
            classify(&Value::Null),
            Err(IslamicFinanceError::UnrecognizedContract(_))
        ));
        assert!(matches!(
            classify(&json!([1, 2])),
            Err(IslamicFinanceError::UnrecognizedContract(_))
        ));
    }

    #[test]
    fn test_classify_missing_or_bad_tag() {
        assert!(classify(&json!({ "amount": 1 })).is_err());
        assert!(classify(&json!({ "contractType": 3 })).is_err());
        assert!(classify(&json!({ "contractType": "istisna" })).is_err());
    }

    #[test]
    fn test_parse_legacy_tag() {
        let value = json!({
            "contractType": "ijara",
            "amount": 20000000,
            "duration": 36,
            "assetValue": 20000000,
            "monthlyRental": 300000
        });
        let terms = parse_contract(&value).unwrap();
        assert_eq!(terms.contract_type(), ContractType::Ijarah);
    }

    #[test]
    fn test_parse_missing_field_is_malformed() {
        let value = json!({
            "contractType": "salam",
            "amount": 1000,
            "duration": 6
        });
        assert!(matches!(
            parse_contract(&value),
            Err(IslamicFinanceError::MalformedContract(_))
        ));
    }

    #[test]
    fn test_parse_negative_duration_is_malformed() {
        let value = json!({
            "contractType": "ijarah",
            "amount": 1000,
            "duration": -3,
            "assetValue": 1000,
            "monthlyRental": 10
        });
        assert!(matches!(
            parse_contract(&value),
            Err(IslamicFinanceError::MalformedContract(_))
        ));
    }
}
