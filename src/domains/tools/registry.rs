//! Tool Registry - central registration of all tools.
//!
//! This module provides:
//! - Registration of tools with duplicate-name detection
//! - Listing in registration order (what clients see in `tools/list`)
//! - Resolution of a tool name to its descriptor and handler

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::ToolError;
use super::handlers::{ToolDescriptor, ToolHandler, Typed, TypedTool};

/// A registered tool: immutable descriptor plus shared handler.
#[derive(Clone)]
pub struct RegisteredTool {
    descriptor: ToolDescriptor,
    handler: Arc<dyn ToolHandler>,
}

impl RegisteredTool {
    pub fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    pub fn handler(&self) -> &Arc<dyn ToolHandler> {
        &self.handler
    }
}

/// Tool registry - manages all available tools.
///
/// Contents are fixed once the server starts; the registry is shared
/// read-only behind an `Arc`.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
    by_name: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create an empty tool registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under its descriptor's name.
    pub fn register(
        &mut self,
        descriptor: ToolDescriptor,
        handler: Arc<dyn ToolHandler>,
    ) -> Result<(), ToolError> {
        let name = descriptor.name().to_string();
        if self.by_name.contains_key(&name) {
            return Err(ToolError::duplicate_tool(name));
        }

        debug!("Registered tool: {}", name);
        self.by_name.insert(name, self.tools.len());
        self.tools.push(RegisteredTool {
            descriptor,
            handler,
        });
        Ok(())
    }

    /// Register a typed tool, deriving its descriptor from its parameters.
    pub fn register_tool<T: TypedTool>(&mut self, tool: T) -> Result<(), ToolError> {
        self.register(T::descriptor()?, Arc::new(Typed(tool)))
    }

    /// Descriptors of all tools, in registration order.
    pub fn list(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.tools.iter().map(|t| &t.descriptor)
    }

    /// Get all tool names, in registration order.
    pub fn tool_names(&self) -> Vec<&str> {
        self.list().map(|d| d.name()).collect()
    }

    /// Look up a tool by name.
    pub fn resolve(&self, name: &str) -> Result<&RegisteredTool, ToolError> {
        self.by_name
            .get(name)
            .map(|&idx| &self.tools[idx])
            .ok_or_else(|| ToolError::unknown_tool(name))
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
