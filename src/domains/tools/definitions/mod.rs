//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each tool is defined in its own file for better maintainability.

pub mod common;
pub mod diff;
pub mod docs;

pub use diff::GenerateDiffTool;
pub use docs::{DocsClient, GetPageTool, SearchDocsTool};
