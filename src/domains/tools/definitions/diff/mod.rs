//! Diff tools module.

pub mod generate;

pub use generate::{GenerateDiffParams, GenerateDiffTool, line_diff};
