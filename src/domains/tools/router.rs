//! Tool catalog - builds the registry served by every transport.
//!
//! Registration order here is the order clients see in `tools/list`.

use std::sync::Arc;

use crate::core::config::Config;

use super::ToolError;
use super::definitions::{DocsClient, GenerateDiffTool, GetPageTool, SearchDocsTool};
use super::registry::ToolRegistry;

/// Build the tool registry with all built-in tools.
pub fn build_tool_registry(
    config: Arc<Config>,
    docs: Arc<DocsClient>,
) -> Result<ToolRegistry, ToolError> {
    let mut registry = ToolRegistry::new();
    registry.register_tool(GenerateDiffTool::new(config))?;
    registry.register_tool(SearchDocsTool::new(docs.clone()))?;
    registry.register_tool(GetPageTool::new(docs))?;
    Ok(registry)
}
