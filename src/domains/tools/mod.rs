//! Tools domain module.
//!
//! This module handles all tool-related functionality for the MCP server.
//! Tools are executable functions that can be called by MCP clients.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `schema.rs` - Typed view of a tool's JSON input schema
//! - `validator.rs` - Argument checks against that schema
//! - `handlers.rs` - Handler contract and typed-tool adapter
//! - `registry.rs` - Ordered registry of descriptors and handlers
//! - `dispatcher.rs` - resolve → validate → execute, with error translation
//! - `router.rs` - Builds the registry of built-in tools
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` with a params struct and a
//!    `TypedTool` implementation
//! 2. Export it in `definitions/mod.rs`
//! 3. Register it in `router.rs`
//!
//! **No need to modify `server.rs` or the transports!**

pub mod definitions;
pub mod dispatcher;
mod error;
pub mod handlers;
mod registry;
pub mod router;
pub mod schema;
pub mod validator;

pub use dispatcher::{Dispatcher, Invocation};
pub use error::ToolError;
pub use handlers::{FnHandler, ToolDescriptor, ToolHandler, Typed, TypedTool};
pub use registry::{RegisteredTool, ToolRegistry};
pub use router::build_tool_registry;
pub use schema::{FieldSpec, FieldType, InputSchema};
pub use validator::validate;
