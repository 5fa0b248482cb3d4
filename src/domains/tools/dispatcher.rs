//! Tool dispatcher.
//!
//! Routes an invocation through resolve → validate → execute and translates
//! every failure into a [`ToolError`]. Handler errors that are not already a
//! `ToolError`, and handler panics, become [`ToolError::Internal`].

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use rmcp::model::{CallToolRequestParam, CallToolResult, JsonObject, Tool};
use tracing::{debug, error, info, instrument, warn};

use super::ToolError;
use super::registry::ToolRegistry;
use super::validator::validate;

/// One request to execute a tool.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub tool_name: String,
    pub arguments: JsonObject,
}

impl Invocation {
    pub fn new(tool_name: impl Into<String>, arguments: JsonObject) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments,
        }
    }
}

impl From<CallToolRequestParam> for Invocation {
    fn from(request: CallToolRequestParam) -> Self {
        Self {
            tool_name: request.name.into_owned(),
            arguments: request.arguments.unwrap_or_default(),
        }
    }
}

/// Dispatches invocations to registered handlers.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Protocol metadata for every registered tool, in registration order.
    pub fn list_tools(&self) -> Vec<Tool> {
        self.registry.list().map(|d| d.to_tool()).collect()
    }

    /// Resolve, validate and execute an invocation.
    #[instrument(skip_all, fields(tool = %invocation.tool_name))]
    pub async fn dispatch(&self, invocation: Invocation) -> Result<CallToolResult, ToolError> {
        let tool = self.registry.resolve(&invocation.tool_name).inspect_err(|_| {
            warn!("Unknown tool requested: {}", invocation.tool_name);
        })?;

        validate(tool.descriptor().input_schema(), &invocation.arguments).inspect_err(|e| {
            warn!("Rejected arguments: {}", e);
        })?;

        debug!("Arguments validated, invoking handler");
        let handler = tool.handler().clone();
        let outcome = AssertUnwindSafe(handler.call(invocation.arguments))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(result)) => {
                info!(
                    is_error = result.is_error.unwrap_or(false),
                    "Tool call completed"
                );
                Ok(result)
            }
            Ok(Err(err)) => Err(translate(err)),
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                error!("Tool handler panicked: {}", message);
                Err(ToolError::internal(format!("tool handler panicked: {}", message)))
            }
        }
    }
}

/// Keep structured tool errors, wrap everything else as internal.
fn translate(err: anyhow::Error) -> ToolError {
    match err.downcast::<ToolError>() {
        Ok(tool_err) => {
            warn!("Tool failed: {}", tool_err);
            tool_err
        }
        Err(other) => {
            error!("Tool failed with unexpected error: {:#}", other);
            ToolError::internal(format!("{:#}", other))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
