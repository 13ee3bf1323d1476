//! Lightweight structural schema validation.
//!
//! No JSON-Schema validator crate is part of the dependency stack; the Tool
//! Runtime only needs the subset of JSON Schema that actually matters for
//! gating a step: does the instance match the schema's declared top-level
//! `type`, and are the schema's `required` fields present.

use serde_json::Value;

/// Check `instance` against `schema`'s top-level `type` and `required`
/// fields, returning a human-readable reason on mismatch.
///
/// A schema that isn't a JSON object (or carries neither `type` nor
/// `required`) passes everything — this is a structural check, not a full
/// JSON Schema implementation.
pub fn validate_structural(schema: &Value, instance: &Value) -> Result<(), String> {
    let Some(schema_obj) = schema.as_object() else {
        return Ok(());
    };

    if let Some(expected_type) = schema_obj.get("type").and_then(Value::as_str)
        && !matches_json_type(expected_type, instance)
    {
        return Err(format!(
            "expected type \"{expected_type}\", got {}",
            type_name(instance)
        ));
    }

    if let Some(required) = schema_obj.get("required").and_then(Value::as_array) {
        let Some(obj) = instance.as_object() else {
            return Err("expected an object to check required fields against".to_string());
        };
        for field in required {
            if let Some(name) = field.as_str()
                && !obj.contains_key(name)
            {
                return Err(format!("missing required field \"{name}\""));
            }
        }
    }

    Ok(())
}

fn matches_json_type(expected: &str, value: &Value) -> bool {
    match expected {
        "object" => value.is_object(),
        "array" => value.is_array(),
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "null" => value.is_null(),
        _ => true,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_required_field_fails() {
        let schema = json!({"type": "object", "required": ["file_path"]});
        let err = validate_structural(&schema, &json!({})).unwrap_err();
        assert!(err.contains("file_path"));
    }

    #[test]
    fn present_required_field_passes() {
        let schema = json!({"type": "object", "required": ["file_path"]});
        assert!(validate_structural(&schema, &json!({"file_path": "/a"})).is_ok());
    }

    #[test]
    fn wrong_top_level_type_fails() {
        let schema = json!({"type": "object"});
        assert!(validate_structural(&schema, &json!("not an object")).is_err());
    }

    #[test]
    fn schema_without_constraints_passes_anything() {
        let schema = json!({"description": "no type or required here"});
        assert!(validate_structural(&schema, &json!(42)).is_ok());
    }
}
