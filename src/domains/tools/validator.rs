//! Argument validation against a tool's declared input schema.

use rmcp::model::JsonObject;
use serde_json::Value;

use super::ToolError;
use super::schema::{FieldSpec, InputSchema};

/// Check `arguments` against `schema`, failing on the first violation.
///
/// Fields are checked in declaration order. Fields the schema does not
/// declare are left untouched.
pub fn validate(schema: &InputSchema, arguments: &JsonObject) -> Result<(), ToolError> {
    for field in schema.fields() {
        match arguments.get(&field.name) {
            None if field.required => {
                return Err(ToolError::invalid_field(&field.name, "is required"));
            }
            None => {}
            Some(Value::Null) if field.nullable => {}
            Some(value) => check_value(field, value)?,
        }
    }
    Ok(())
}

fn check_value(field: &FieldSpec, value: &Value) -> Result<(), ToolError> {
    if !field.field_type.matches(value) {
        return Err(ToolError::invalid_field(
            &field.name,
            format_args!(
                "must be of type {}, got {}",
                field.field_type.as_str(),
                json_type_name(value)
            ),
        ));
    }

    if let Some(number) = value.as_f64() {
        if let Some(min) = field.minimum {
            if number < min {
                return Err(ToolError::invalid_field(
                    &field.name,
                    format_args!("must be >= {}, got {}", min, number),
                ));
            }
        }
        if let Some(max) = field.maximum {
            if number > max {
                return Err(ToolError::invalid_field(
                    &field.name,
                    format_args!("must be <= {}, got {}", max, number),
                ));
            }
        }
    }

    Ok(())
}

fn json_type_name(value: &Value) -> &'static str {
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
    use crate::domains::tools::schema::FieldType;
    use serde_json::json;

    fn args(value: Value) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    fn search_schema() -> InputSchema {
        InputSchema::new()
            .required("query", FieldType::String)
            .field(FieldSpec {
                nullable: true,
                ..FieldSpec::new("max_results", FieldType::Integer, false)
                    .with_bounds(Some(1.0), Some(50.0))
            })
            .optional("exact", FieldType::Boolean)
    }

    #[test]
    fn test_accepts_valid_arguments() {
        let result = validate(&search_schema(), &args(json!({"query": "intro", "max_results": 5})));
        assert!(result.is_ok());
    }

    #[test]
    fn test_missing_required_field() {
        let err = validate(&search_schema(), &args(json!({"max_results": 5}))).unwrap_err();
        assert!(matches!(err, ToolError::InvalidParams(ref m) if m.contains("query")));
    }

    #[test]
    fn test_wrong_type() {
        let err = validate(&search_schema(), &args(json!({"query": 42}))).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("query"));
        assert!(msg.contains("string"));
    }

    #[test]
    fn test_bounds() {
        let schema = search_schema();
        assert!(validate(&schema, &args(json!({"query": "a", "max_results": 0}))).is_err());
        assert!(validate(&schema, &args(json!({"query": "a", "max_results": 51}))).is_err());
        assert!(validate(&schema, &args(json!({"query": "a", "max_results": 50}))).is_ok());
    }

    #[test]
    fn test_integer_rejects_fraction() {
        let err = validate(&search_schema(), &args(json!({"query": "a", "max_results": 2.5})));
        assert!(err.is_err());
    }

    #[test]
    fn test_unknown_fields_pass_through() {
        let result = validate(&search_schema(), &args(json!({"query": "a", "future_flag": true})));
        assert!(result.is_ok());
    }

    #[test]
    fn test_null_only_for_nullable_field() {
        let result = validate(&search_schema(), &args(json!({"query": "a", "max_results": null})));
        assert!(result.is_ok());

        let err = validate(&search_schema(), &args(json!({"query": null})));
        assert!(err.is_err());

        let err = validate(&search_schema(), &args(json!({"query": "a", "exact": null}))).unwrap_err();
        assert!(matches!(err, ToolError::InvalidParams(ref m) if m.contains("exact") && m.contains("null")));
    }

    #[test]
    fn test_fail_fast_reports_first_violation() {
        let err = validate(&search_schema(), &args(json!({"max_results": "x"}))).unwrap_err();
        assert!(err.to_string().contains("query"));
    }
}
