use jsonschema::Validator;
use serde_json::{Map, Value};

use crate::error::{Result, SchemaError, SchemaRole};

pub(crate) fn validate_value(
    role: SchemaRole,
    value: &Value,
    validator: &Validator,
    max_reported: usize,
) -> Result<()> {
    let mut errors = validator.iter_errors(value);
    if let Some(first) = errors.next() {
        let mut message = first.to_string();
        for err in errors.take(max_reported.saturating_sub(1)) {
            message.push_str("; ");
            message.push_str(&err.to_string());
        }
        return Err(SchemaError::ValidationFailed { role, message });
    }

    Ok(())
}

/// Close every object schema against undeclared properties.
pub(crate) fn apply_strict_mode(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if is_object_schema(map) && !map.contains_key("additionalProperties") {
                map.insert("additionalProperties".to_string(), Value::Bool(false));
            }

            recurse_object_schema_children(map);
        }
        Value::Array(items) => {
            for item in items {
                apply_strict_mode(item);
            }
        }
        _ => {}
    }
}

fn recurse_object_schema_children(map: &mut Map<String, Value>) {
    for key in [
        "properties",
        "patternProperties",
        "dependentSchemas",
        "$defs",
        "definitions",
    ] {
        if let Some(Value::Object(obj)) = map.get_mut(key) {
            obj.values_mut().for_each(apply_strict_mode);
        }
    }

    for key in [
        "propertyNames",
        "additionalProperties",
        "unevaluatedProperties",
        "items",
        "contains",
        "additionalItems",
        "unevaluatedItems",
        "not",
        "if",
        "then",
        "else",
    ] {
        if let Some(value) = map.get_mut(key) {
            apply_strict_mode(value);
        }
    }

    for key in ["prefixItems", "allOf", "anyOf", "oneOf"] {
        if let Some(Value::Array(items)) = map.get_mut(key) {
            items.iter_mut().for_each(apply_strict_mode);
        }
    }
}

fn is_object_schema(map: &Map<String, Value>) -> bool {
    const OBJECT_KEYWORDS: [&str; 8] = [
        "properties",
        "patternProperties",
        "additionalProperties",
        "unevaluatedProperties",
        "required",
        "dependentRequired",
        "dependentSchemas",
        "propertyNames",
    ];

    match map.get("type") {
        Some(Value::String(kind)) => kind == "object",
        Some(Value::Array(items)) => items
            .iter()
            .any(|item| matches!(item, Value::String(kind) if kind == "object")),
        _ => OBJECT_KEYWORDS
            .iter()
            .any(|keyword| map.contains_key(*keyword)),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn strict_mode_closes_nested_objects() {
        let mut schema = json!({
            "type": "object",
            "properties": {
                "nested": { "properties": { "v": { "type": "integer" } } }
            },
            "anyOf": [{ "type": "object" }]
        });
        apply_strict_mode(&mut schema);

        assert_eq!(schema["additionalProperties"], json!(false));
        assert_eq!(
            schema["properties"]["nested"]["additionalProperties"],
            json!(false)
        );
        assert_eq!(schema["anyOf"][0]["additionalProperties"], json!(false));
    }

    #[test]
    fn strict_mode_keeps_explicit_additional_properties() {
        let mut schema = json!({ "type": "object", "additionalProperties": true });
        apply_strict_mode(&mut schema);
        assert_eq!(schema["additionalProperties"], json!(true));
    }

    #[test]
    fn diagnostics_are_capped() {
        let schema = json!({
            "type": "object",
            "properties": {
                "a": { "type": "integer" },
                "b": { "type": "integer" },
                "c": { "type": "integer" }
            }
        });
        let validator = jsonschema::validator_for(&schema).unwrap();
        let value = json!({ "a": "x", "b": "y", "c": "z" });

        let err = validate_value(SchemaRole::Input, &value, &validator, 2).unwrap_err();
        let SchemaError::ValidationFailed { role, message } = err else {
            panic!("expected validation failure");
        };
        assert_eq!(role, SchemaRole::Input);
        assert_eq!(message.matches("; ").count(), 1);
    }
}
