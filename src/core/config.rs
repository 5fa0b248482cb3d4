//! Configuration management for the MCP server.
//!
//! Defaults are overridden by `MCP_*` environment variables, which may also
//! come from a `.env` file in the working directory.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Security and path validation configuration.
    pub security: SecurityConfig,

    /// Documentation source used by the docs tools.
    pub docs: DocsConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Configuration for security and path validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Optional root directory for file operations.
    /// If None, no path restrictions are enforced.
    pub root_path: Option<PathBuf>,

    /// Whether symlinks may be followed.
    /// If false, symlinks pointing outside the root are rejected.
    pub allow_symlinks: bool,
}

/// Configuration for the documentation search tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocsConfig {
    /// Base URL every documentation path is resolved against.
    pub base_url: String,

    /// Path of the page listing all documentation pages.
    pub index_path: String,

    /// How long fetched pages stay cached, in seconds.
    pub cache_ttl_secs: u64,

    /// Per-request timeout for the HTTP client, in seconds.
    pub request_timeout_secs: u64,
}

impl DocsConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            root_path: None,
            allow_symlinks: true,
        }
    }
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://modelcontextprotocol.io".to_string(),
            index_path: "/llms.txt".to_string(),
            cache_ttl_secs: 3600,
            request_timeout_secs: 30,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "docs-diff-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
            security: SecurityConfig::default(),
            docs: DocsConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_LOG_LEVEL`, `MCP_DOCS_BASE_URL`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.transport = TransportConfig::from_env();

        if let Ok(root_path) = std::env::var("MCP_ROOT_PATH") {
            config.security.root_path = Some(PathBuf::from(root_path));
            info!("Path security enabled: root directory set to {:?}", config.security.root_path);
        } else {
            warn!("MCP_ROOT_PATH not set - generate_diff may read and write any path");
        }

        if let Ok(allow_symlinks) = std::env::var("MCP_ALLOW_SYMLINKS") {
            config.security.allow_symlinks = allow_symlinks.parse().unwrap_or(true);
        }

        if let Ok(base_url) = std::env::var("MCP_DOCS_BASE_URL") {
            config.docs.base_url = base_url;
        }

        if let Ok(index_path) = std::env::var("MCP_DOCS_INDEX_PATH") {
            config.docs.index_path = index_path;
        }

        config.docs.cache_ttl_secs = env_u64("MCP_DOCS_CACHE_TTL_SECS", config.docs.cache_ttl_secs);
        config.docs.request_timeout_secs =
            env_u64("MCP_DOCS_TIMEOUT_SECS", config.docs.request_timeout_secs);

        info!(
            "Docs source: {}{} (cache TTL {}s)",
            config.docs.base_url, config.docs.index_path, config.docs.cache_ttl_secs
        );

        config
    }
}

/// Read a numeric variable, keeping `default` when unset or malformed.
fn env_u64(key: &str, default: u64) -> u64 {
    match std::env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid {}={:?}, using {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}
