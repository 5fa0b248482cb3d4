//! Docs & Diff MCP Server
//!
//! A Model Context Protocol server exposing three tools:
//!
//! - `generate_diff`: writes a unified line diff of two local files
//! - `search_docs`: fuzzy search over a documentation site's page index
//! - `get_page`: fetches one documentation page, optionally as plain text
//!
//! # Architecture
//!
//! - **core**: configuration, errors, the TTL cache, path security, the
//!   server handler and its transports
//! - **domains::tools**: the tool registry, schema validation, dispatch and
//!   the tool definitions themselves
//!
//! # Example
//!
//! ```rust,no_run
//! use docs_diff_mcp_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config.clone())?;
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

pub use core::{Config, Error, McpServer, Result};
