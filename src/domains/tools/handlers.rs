//! Tool handler contract.
//!
//! A handler receives the already-validated argument object and produces a
//! `CallToolResult`. Operational failures a client should see as text are
//! returned as `CallToolResult::error`; anything returned as `Err` is
//! translated by the dispatcher (a `ToolError` keeps its kind, any other
//! error becomes an internal error).
//!
//! Most tools implement [`TypedTool`] instead, which adds a statically typed
//! parameter struct whose `JsonSchema` becomes the tool's input schema.

use std::borrow::Cow;
use std::marker::PhantomData;
use std::sync::Arc;

use rmcp::{
    handler::server::tool::schema_for_type,
    model::{CallToolResult, JsonObject, Tool},
};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;

use super::ToolError;
use super::schema::InputSchema;

/// Trait for tool logic invoked by the dispatcher.
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync {
    /// Execute the tool with validated arguments.
    async fn call(&self, arguments: JsonObject) -> anyhow::Result<CallToolResult>;
}

/// A tool with a typed parameter struct.
#[async_trait::async_trait]
pub trait TypedTool: Send + Sync + 'static {
    /// Tool name as registered in MCP.
    const NAME: &'static str;

    /// Tool description shown to clients.
    const DESCRIPTION: &'static str;

    /// Parameters deserialized from the validated arguments.
    type Params: DeserializeOwned + JsonSchema + Send + 'static;

    /// Execute the tool logic.
    async fn execute(&self, params: Self::Params) -> anyhow::Result<CallToolResult>;

    /// JSON Schema of the structured content this tool returns, if any.
    fn output_schema() -> Option<Arc<JsonObject>> {
        None
    }

    /// Build the descriptor for this tool from its parameter schema.
    fn descriptor() -> Result<ToolDescriptor, ToolError> {
        Ok(
            ToolDescriptor::from_params::<Self::Params>(Self::NAME, Self::DESCRIPTION)?
                .with_output_schema(Self::output_schema()),
        )
    }
}

/// Adapter turning a [`TypedTool`] into a [`ToolHandler`].
pub struct Typed<T>(pub T);

#[async_trait::async_trait]
impl<T: TypedTool> ToolHandler for Typed<T> {
    async fn call(&self, arguments: JsonObject) -> anyhow::Result<CallToolResult> {
        let params: T::Params = serde_json::from_value(serde_json::Value::Object(arguments))
            .map_err(|e| ToolError::invalid_params(e.to_string()))?;
        self.0.execute(params).await
    }
}

/// Metadata describing a registered tool.
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    name: Cow<'static, str>,
    description: Cow<'static, str>,
    input_schema: InputSchema,
    schema_json: Arc<JsonObject>,
    output_schema: Option<Arc<JsonObject>>,
}

impl ToolDescriptor {
    /// Create a descriptor from a hand-built schema.
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        description: impl Into<Cow<'static, str>>,
        input_schema: InputSchema,
    ) -> Self {
        let schema_json = input_schema.to_json_schema();
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
            schema_json,
            output_schema: None,
        }
    }

    /// Create a descriptor whose schema is derived from a parameter struct.
    pub fn from_params<P: JsonSchema>(
        name: &'static str,
        description: &'static str,
    ) -> Result<Self, ToolError> {
        let schema_json = schema_for_type::<P>();
        let input_schema = InputSchema::from_json_schema(name, &schema_json)?;
        Ok(Self {
            name: Cow::Borrowed(name),
            description: Cow::Borrowed(description),
            input_schema,
            schema_json: schema_json.into(),
            output_schema: None,
        })
    }

    /// Attach the schema of the tool's structured content.
    pub fn with_output_schema(mut self, schema: Option<Arc<JsonObject>>) -> Self {
        self.output_schema = schema;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn input_schema(&self) -> &InputSchema {
        &self.input_schema
    }

    /// Create a Tool model for this descriptor (protocol metadata).
    pub fn to_tool(&self) -> Tool {
        Tool {
            name: self.name.clone(),
            description: Some(self.description.clone()),
            input_schema: self.schema_json.clone(),
            annotations: None,
            output_schema: self.output_schema.clone(),
            icons: None,
            meta: None,
            title: None,
        }
    }
}

/// Handler built from an async closure, mostly useful for small built-in tools and tests.
pub struct FnHandler<F, Fut> {
    f: F,
    _marker: PhantomData<fn() -> Fut>,
}

impl<F, Fut> FnHandler<F, Fut>
where
    F: Fn(JsonObject) -> Fut + Send + Sync,
    Fut: std::future::Future<Output = anyhow::Result<CallToolResult>> + Send,
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            _marker: PhantomData,
        }
    }
}

#[async_trait::async_trait]
impl<F, Fut> ToolHandler for FnHandler<F, Fut>
where
    F: Fn(JsonObject) -> Fut + Send + Sync,
    Fut: std::future::Future<Output = anyhow::Result<CallToolResult>> + Send,
{
    async fn call(&self, arguments: JsonObject) -> anyhow::Result<CallToolResult> {
        (self.f)(arguments).await
    }
}
