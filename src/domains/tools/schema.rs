//! Typed view of a tool's JSON input schema.
//!
//! Tool parameter structs derive `JsonSchema`; the generated object schema is
//! reduced here to the few facts the validator checks: which fields exist,
//! which are required, their primitive type and numeric bounds.

use std::sync::Arc;

use rmcp::model::JsonObject;
use serde_json::{Value, json};

use super::ToolError;

/// Primitive type declared for an argument field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
    /// No checkable type (e.g. a `$ref` or untyped property).
    Any,
}

impl FieldType {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "number" => Some(Self::Number),
            "integer" => Some(Self::Integer),
            "boolean" => Some(Self::Boolean),
            "object" => Some(Self::Object),
            "array" => Some(Self::Array),
            _ => None,
        }
    }

    /// JSON Schema name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
            Self::Any => "any",
        }
    }

    /// Whether a JSON value has this type.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Boolean => value.is_boolean(),
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
            Self::Any => true,
        }
    }
}

/// A single declared argument field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub field_type: FieldType,
    pub required: bool,
    pub nullable: bool,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
}

impl FieldSpec {
    /// Create a field with no bounds.
    pub fn new(name: impl Into<String>, field_type: FieldType, required: bool) -> Self {
        Self {
            name: name.into(),
            field_type,
            required,
            nullable: false,
            minimum: None,
            maximum: None,
        }
    }

    /// Set inclusive numeric bounds.
    pub fn with_bounds(mut self, minimum: Option<f64>, maximum: Option<f64>) -> Self {
        self.minimum = minimum;
        self.maximum = maximum;
        self
    }
}

/// Structural description of a tool's arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSchema {
    fields: Vec<FieldSpec>,
}

impl InputSchema {
    /// Create an empty schema (accepts any arguments).
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a required field.
    pub fn required(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.push(FieldSpec::new(name, field_type, true));
        self
    }

    /// Add an optional field.
    pub fn optional(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.push(FieldSpec::new(name, field_type, false));
        self
    }

    /// Add a fully specified field.
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Declared fields in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Build a typed schema from a JSON Schema object (as produced by schemars).
    pub fn from_json_schema(tool: &str, schema: &JsonObject) -> Result<Self, ToolError> {
        if let Some(kind) = schema.get("type").and_then(Value::as_str) {
            if kind != "object" {
                return Err(ToolError::invalid_schema(
                    tool,
                    format!("expected an object schema, found '{}'", kind),
                ));
            }
        }

        let required: Vec<&str> = match schema.get("required") {
            None => Vec::new(),
            Some(Value::Array(names)) => names.iter().filter_map(Value::as_str).collect(),
            Some(_) => {
                return Err(ToolError::invalid_schema(tool, "'required' must be an array"));
            }
        };

        let properties = match schema.get("properties") {
            None => return Ok(Self::new()),
            Some(Value::Object(props)) => props,
            Some(_) => {
                return Err(ToolError::invalid_schema(tool, "'properties' must be an object"));
            }
        };

        let mut fields = Vec::with_capacity(properties.len());
        for (name, prop) in properties {
            let prop = prop.as_object().ok_or_else(|| {
                ToolError::invalid_schema(tool, format!("property '{}' is not an object", name))
            })?;

            let (field_type, mut nullable) = parse_type(prop.get("type"));
            if prop.get("nullable").and_then(Value::as_bool) == Some(true) {
                nullable = true;
            }

            fields.push(FieldSpec {
                name: name.clone(),
                field_type,
                required: required.contains(&name.as_str()),
                nullable,
                minimum: prop.get("minimum").and_then(Value::as_f64),
                maximum: prop.get("maximum").and_then(Value::as_f64),
            });
        }

        Ok(Self { fields })
    }

    /// Render this schema as a JSON Schema object.
    pub fn to_json_schema(&self) -> Arc<JsonObject> {
        let mut properties = serde_json::Map::new();
        for field in &self.fields {
            let mut prop = serde_json::Map::new();
            if field.field_type != FieldType::Any {
                let kind = if field.nullable {
                    json!([field.field_type.as_str(), "null"])
                } else {
                    json!(field.field_type.as_str())
                };
                prop.insert("type".into(), kind);
            }
            if let Some(min) = field.minimum {
                prop.insert("minimum".into(), json!(min));
            }
            if let Some(max) = field.maximum {
                prop.insert("maximum".into(), json!(max));
            }
            properties.insert(field.name.clone(), Value::Object(prop));
        }

        let required: Vec<&str> = self
            .fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name.as_str())
            .collect();

        let mut schema = JsonObject::new();
        schema.insert("type".into(), json!("object"));
        schema.insert("properties".into(), Value::Object(properties));
        if !required.is_empty() {
            schema.insert("required".into(), json!(required));
        }
        Arc::new(schema)
    }
}

/// Interpret a JSON Schema `type` keyword: a name, or a list of names that may include `null`.
fn parse_type(kind: Option<&Value>) -> (FieldType, bool) {
    match kind {
        Some(Value::String(name)) => (FieldType::from_name(name).unwrap_or(FieldType::Any), false),
        Some(Value::Array(names)) => {
            let names: Vec<&str> = names.iter().filter_map(Value::as_str).collect();
            let nullable = names.contains(&"null");
            let mut concrete = names.iter().filter(|n| **n != "null");
            let field_type = match (concrete.next(), concrete.next()) {
                (Some(name), None) => FieldType::from_name(name).unwrap_or(FieldType::Any),
                _ => FieldType::Any,
            };
            (field_type, nullable)
        }
        _ => (FieldType::Any, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemars::JsonSchema;
    use serde::Deserialize;

    #[allow(dead_code)]
    #[derive(Deserialize, JsonSchema)]
    #[serde(rename_all = "camelCase")]
    struct SampleParams {
        file_path: String,
        #[schemars(range(min = 1, max = 50))]
        limit: Option<u32>,
        #[serde(default)]
        verbose: bool,
    }

    fn field<'a>(schema: &'a InputSchema, name: &str) -> &'a FieldSpec {
        schema.fields().iter().find(|f| f.name == name).unwrap()
    }

    #[test]
    fn test_from_derived_schema() {
        let json = rmcp::handler::server::tool::schema_for_type::<SampleParams>();
        let schema = InputSchema::from_json_schema("sample", &json).unwrap();

        let path = field(&schema, "filePath");
        assert_eq!(path.field_type, FieldType::String);
        assert!(path.required);

        let limit = field(&schema, "limit");
        assert_eq!(limit.field_type, FieldType::Integer);
        assert!(!limit.required);
        assert!(limit.nullable);
        assert_eq!(limit.minimum, Some(1.0));
        assert_eq!(limit.maximum, Some(50.0));

        let verbose = field(&schema, "verbose");
        assert_eq!(verbose.field_type, FieldType::Boolean);
        assert!(!verbose.required);
    }

    #[test]
    fn test_rejects_non_object_schema() {
        let mut json = JsonObject::new();
        json.insert("type".into(), json!("string"));
        assert!(matches!(
            InputSchema::from_json_schema("bad", &json),
            Err(ToolError::InvalidSchema { .. })
        ));
    }

    #[test]
    fn test_builder_renders_json_schema() {
        let schema = InputSchema::new()
            .required("query", FieldType::String)
            .field(FieldSpec::new("max", FieldType::Integer, false).with_bounds(Some(1.0), None));
        let json = schema.to_json_schema();

        assert_eq!(json["properties"]["query"]["type"], "string");
        assert_eq!(json["properties"]["max"]["minimum"], 1.0);
        assert_eq!(json["required"], json!(["query"]));

        let parsed = InputSchema::from_json_schema("round", &json).unwrap();
        assert_eq!(parsed.fields().len(), 2);
    }

    #[test]
    fn test_ref_property_is_any() {
        let json = json!({
            "type": "object",
            "properties": { "mode": { "$ref": "#/$defs/Mode" } }
        });
        let schema = InputSchema::from_json_schema("refs", json.as_object().unwrap()).unwrap();
        assert_eq!(field(&schema, "mode").field_type, FieldType::Any);
    }
}
