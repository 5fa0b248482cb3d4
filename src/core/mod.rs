//! Core module containing shared infrastructure components.
//!
//! Configuration, error types, the response cache, path security, the MCP
//! server handler and the transports that carry it.

pub mod cache;
pub mod config;
pub mod error;
pub mod security;
pub mod server;
pub mod transport;

pub use cache::{Cache, TtlCache};
pub use config::Config;
pub use error::{Error, Result};
pub use security::{PathSecurityError, validate_output_path, validate_path};
pub use server::McpServer;
pub use transport::{TransportConfig, TransportService};
