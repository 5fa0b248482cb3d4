//! Tool-specific error types.

use rmcp::{ErrorData as McpError, model::ErrorCode};
use thiserror::Error;

/// Errors that can occur while registering, validating or dispatching tools.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool is not registered.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// A tool with the same name is already registered.
    #[error("Duplicate tool: {0}")]
    DuplicateTool(String),

    /// Arguments failed schema validation or a handler precondition.
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// A tool's input schema could not be interpreted.
    #[error("Invalid input schema for tool '{tool}': {reason}")]
    InvalidSchema { tool: String, reason: String },

    /// The handler or one of its dependencies failed.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Create a new "unknown tool" error.
    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool(name.into())
    }

    /// Create a new "duplicate tool" error.
    pub fn duplicate_tool(name: impl Into<String>) -> Self {
        Self::DuplicateTool(name.into())
    }

    /// Create a new "invalid params" error.
    pub fn invalid_params(msg: impl Into<String>) -> Self {
        Self::InvalidParams(msg.into())
    }

    /// Create an "invalid params" error naming the offending field.
    pub fn invalid_field(field: &str, reason: impl std::fmt::Display) -> Self {
        Self::InvalidParams(format!("field '{}' {}", field, reason))
    }

    /// Create a new "invalid schema" error.
    pub fn invalid_schema(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSchema {
            tool: tool.into(),
            reason: reason.into(),
        }
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// JSON-RPC error code reported to clients for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownTool(_) => ErrorCode::METHOD_NOT_FOUND,
            Self::InvalidParams(_) => ErrorCode::INVALID_PARAMS,
            Self::DuplicateTool(_) | Self::InvalidSchema { .. } | Self::Internal(_) => {
                ErrorCode::INTERNAL_ERROR
            }
        }
    }
}

impl From<ToolError> for McpError {
    fn from(err: ToolError) -> Self {
        McpError::new(err.code(), err.to_string(), None)
    }
}
