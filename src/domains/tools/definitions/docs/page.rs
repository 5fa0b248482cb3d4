//! Get page tool definition.
//!
//! Retrieves a documentation page by path, raw or converted to plain text.

use std::sync::Arc;

use rmcp::model::{CallToolResult, Content};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument};

use super::client::{DocsClient, DocsError};
use crate::domains::tools::ToolError;
use crate::domains::tools::definitions::common::error_result;
use crate::domains::tools::handlers::TypedTool;

/// Line width used when rendering HTML as text.
const TEXT_WIDTH: usize = 100;

/// Parameters for the get page tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetPageParams {
    /// Page path relative to the documentation base URL (as returned by search_docs).
    pub path: String,

    /// Convert HTML to plain text instead of returning the raw body.
    #[serde(default)]
    pub as_text: bool,
}

/// Get page tool - returns the content of one documentation page.
pub struct GetPageTool {
    docs: Arc<DocsClient>,
}

impl GetPageTool {
    pub fn new(docs: Arc<DocsClient>) -> Self {
        Self { docs }
    }
}

#[async_trait::async_trait]
impl TypedTool for GetPageTool {
    const NAME: &'static str = "get_page";

    const DESCRIPTION: &'static str = "Fetch a documentation page by its path. Returns the raw page content, or plain text when as_text is true.";

    type Params = GetPageParams;

    #[instrument(skip_all, fields(path = %params.path))]
    async fn execute(&self, params: GetPageParams) -> anyhow::Result<CallToolResult> {
        let body = match self.docs.fetch_page(&params.path).await {
            Ok(body) => body,
            Err(DocsError::InvalidPath(reason)) => {
                return Err(ToolError::invalid_field("path", reason).into());
            }
            Err(e) => return Ok(error_result(&format!("Failed to fetch page: {}", e))),
        };

        let content = if params.as_text {
            match html2text::from_read(body.as_bytes(), TEXT_WIDTH) {
                Ok(text) => text,
                Err(e) => {
                    return Ok(error_result(&format!(
                        "Failed to convert page to text: {}",
                        e
                    )));
                }
            }
        } else {
            body
        };

        info!("Returning {} bytes for {}", content.len(), params.path);
        Ok(CallToolResult::success(vec![Content::text(content)]))
    }
}
