//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol. Tool listing and tool calls are delegated to the
//! [`Dispatcher`]; transports only ever see this type.
//!
//! ## Tool Architecture
//!
//! Tools are defined in `domains/tools/definitions/` and registered in
//! `domains/tools/router.rs`.
//! **Adding a new tool does NOT require modifying this file!**

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, model::*, service::RequestContext,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::config::Config;
use super::error::{Error, Result};
use crate::domains::tools::{
    Dispatcher, Invocation, ToolError, build_tool_registry, definitions::DocsClient,
};

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Dispatcher over the fixed tool registry.
    dispatcher: Dispatcher,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    pub fn new(config: Config) -> Result<Self> {
        if !config.docs.base_url.starts_with("http://") && !config.docs.base_url.starts_with("https://")
        {
            return Err(Error::config(format!(
                "docs base URL must be http(s): {}",
                config.docs.base_url
            )));
        }

        let config = Arc::new(config);
        let docs = Arc::new(DocsClient::from_config(&config.docs)?);
        let registry = build_tool_registry(config.clone(), docs)?;
        info!("Registered {} tools", registry.len());

        Ok(Self {
            config,
            dispatcher: Dispatcher::new(Arc::new(registry)),
        })
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Get the tool dispatcher (used by the HTTP transport).
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Tools: generate_diff writes a unified diff of two files; \
                 search_docs finds documentation pages; get_page returns a page's content."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        info!("Listing tools");
        Ok(ListToolsResult::with_all_items(self.dispatcher.list_tools()))
    }

    #[instrument(skip_all, fields(tool = %request.name))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        info!("Calling tool: {}", request.name);
        let invocation = Invocation::from(request);

        tokio::select! {
            result = self.dispatcher.dispatch(invocation) => result.map_err(McpError::from),
            _ = context.ct.cancelled() => {
                warn!("Tool call cancelled before completion");
                Err(ToolError::internal("request cancelled").into())
            }
        }
    }
}
