//! Generate diff tool definition.
//!
//! Compares two text files line by line and writes a unified diff to an
//! output file.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use rmcp::handler::server::tool::schema_for_type;
use rmcp::model::{CallToolResult, JsonObject};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use similar::{ChangeTag, TextDiff};
use tracing::{info, instrument};

use crate::core::config::Config;
use crate::core::security::{validate_output_path, validate_path};
use crate::domains::tools::ToolError;
use crate::domains::tools::definitions::common::structured_result;
use crate::domains::tools::handlers::TypedTool;

/// Unchanged lines shown around each change.
const CONTEXT_LINES: usize = 3;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the generate diff tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateDiffParams {
    /// Path to the original file.
    pub old_file_path: String,

    /// Path to the modified file.
    pub new_file_path: String,

    /// Where to write the diff. Overwritten if it exists.
    pub output_file_path: String,
}

/// Structured output for a generated diff.
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiffSummary {
    pub output_file_path: String,
    pub lines_added: usize,
    pub lines_removed: usize,
    pub identical: bool,
}

/// A rendered line diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDiff {
    pub text: String,
    pub added: usize,
    pub removed: usize,
}

impl LineDiff {
    pub fn is_empty(&self) -> bool {
        self.added == 0 && self.removed == 0
    }
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Generate diff tool - writes a unified diff of two files.
pub struct GenerateDiffTool {
    config: Arc<Config>,
}

impl GenerateDiffTool {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    fn resolve_input(&self, field: &str, path: &str) -> Result<PathBuf, ToolError> {
        let resolved = validate_path(path, &self.config.security)
            .map_err(|e| ToolError::invalid_field(field, e))?;
        if !resolved.is_file() {
            return Err(ToolError::invalid_field(
                field,
                format_args!("is not a file: {}", path),
            ));
        }
        Ok(resolved)
    }
}

#[async_trait::async_trait]
impl TypedTool for GenerateDiffTool {
    const NAME: &'static str = "generate_diff";

    const DESCRIPTION: &'static str = "Compare two text files line by line and write a unified diff (' ' unchanged, '-' removed, '+' added) to the output file.";

    type Params = GenerateDiffParams;

    fn output_schema() -> Option<Arc<JsonObject>> {
        Some(schema_for_type::<DiffSummary>().into())
    }

    #[instrument(skip_all, fields(old = %params.old_file_path, new = %params.new_file_path))]
    async fn execute(&self, params: GenerateDiffParams) -> anyhow::Result<CallToolResult> {
        let old_path = self.resolve_input("oldFilePath", &params.old_file_path)?;
        let new_path = self.resolve_input("newFilePath", &params.new_file_path)?;
        let output_path = validate_output_path(&params.output_file_path, &self.config.security)
            .map_err(|e| ToolError::invalid_field("outputFilePath", e))?;
        if output_path.is_dir() {
            return Err(ToolError::invalid_field("outputFilePath", "is a directory").into());
        }

        let old = tokio::fs::read_to_string(&old_path)
            .await
            .with_context(|| format!("failed to read {}", old_path.display()))?;
        let new = tokio::fs::read_to_string(&new_path)
            .await
            .with_context(|| format!("failed to read {}", new_path.display()))?;

        let diff = line_diff(&params.old_file_path, &params.new_file_path, &old, &new);

        tokio::fs::write(&output_path, &diff.text)
            .await
            .with_context(|| format!("failed to write {}", output_path.display()))?;

        let summary = if diff.is_empty() {
            format!(
                "Files are identical; wrote an empty diff to {}",
                params.output_file_path
            )
        } else {
            format!(
                "Diff written to {}: {} line(s) added, {} line(s) removed",
                params.output_file_path, diff.added, diff.removed
            )
        };
        info!("{}", summary);

        Ok(structured_result(
            summary,
            &DiffSummary {
                output_file_path: params.output_file_path,
                lines_added: diff.added,
                lines_removed: diff.removed,
                identical: diff.is_empty(),
            },
        ))
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Render a unified line diff of `old` against `new`.
///
/// Returns an empty text when the inputs are identical.
pub fn line_diff(old_label: &str, new_label: &str, old: &str, new: &str) -> LineDiff {
    let diff = TextDiff::from_lines(old, new);

    let (mut added, mut removed) = (0, 0);
    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Insert => added += 1,
            ChangeTag::Delete => removed += 1,
            ChangeTag::Equal => {}
        }
    }

    let text = if added == 0 && removed == 0 {
        String::new()
    } else {
        diff.unified_diff()
            .context_radius(CONTEXT_LINES)
            .header(old_label, new_label)
            .to_string()
    };

    LineDiff {
        text,
        added,
        removed,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SecurityConfig;
    use std::fs;
    use tempfile::TempDir;
    use tokio_test::{assert_err, assert_ok};

    fn tool(root: Option<PathBuf>) -> GenerateDiffTool {
        let mut config = Config::default();
        config.security = SecurityConfig {
            root_path: root,
            allow_symlinks: true,
        };
        GenerateDiffTool::new(Arc::new(config))
    }

    fn params(dir: &TempDir, old: &str, new: &str, out: &str) -> GenerateDiffParams {
        let p = |name: &str| dir.path().join(name).to_string_lossy().to_string();
        GenerateDiffParams {
            old_file_path: p(old),
            new_file_path: p(new),
            output_file_path: p(out),
        }
    }

    #[test]
    fn test_line_diff_orders_changes() {
        let diff = line_diff("a.txt", "b.txt", "x\ny\n", "x\nz\n");
        assert_eq!(diff.added, 1);
        assert_eq!(diff.removed, 1);

        let unchanged = diff.text.find("\n x\n").unwrap();
        let removed = diff.text.find("\n-y\n").unwrap();
        let added = diff.text.find("\n+z\n").unwrap();
        assert!(unchanged < removed && removed < added);
        assert!(diff.text.starts_with("--- a.txt\n+++ b.txt\n"));
    }

    #[test]
    fn test_line_diff_identical() {
        let diff = line_diff("a", "b", "same\n", "same\n");
        assert!(diff.is_empty());
        assert!(diff.text.is_empty());
    }

    #[tokio::test]
    async fn test_generate_diff_writes_output() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "x\ny\n").unwrap();
        fs::write(dir.path().join("b.txt"), "x\nz\n").unwrap();

        let result = tool(None)
            .execute(params(&dir, "a.txt", "b.txt", "out.diff"))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(false));
        assert_eq!(result.structured_content.unwrap()["linesAdded"], 1);

        let written = fs::read_to_string(dir.path().join("out.diff")).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert!(lines.contains(&" x"));
        assert!(lines.contains(&"-y"));
        assert!(lines.contains(&"+z"));
    }

    #[tokio::test]
    async fn test_generate_diff_idempotent() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "one\ntwo\nthree\n").unwrap();
        fs::write(dir.path().join("b.txt"), "one\n2\nthree\nfour\n").unwrap();
        let tool = tool(None);

        assert_ok!(tool.execute(params(&dir, "a.txt", "b.txt", "first.diff")).await);
        assert_ok!(tool.execute(params(&dir, "a.txt", "b.txt", "second.diff")).await);

        let first = fs::read(dir.path().join("first.diff")).unwrap();
        let second = fs::read(dir.path().join("second.diff")).unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_missing_input_is_invalid_params() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.txt"), "x\n").unwrap();

        let err = tool(None)
            .execute(params(&dir, "missing.txt", "b.txt", "out.diff"))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ToolError>(),
            Some(ToolError::InvalidParams(m)) if m.contains("oldFilePath")
        ));
        assert!(!dir.path().join("out.diff").exists());
    }

    #[tokio::test]
    async fn test_output_outside_root_rejected() {
        let root = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        fs::write(root.path().join("a.txt"), "x\n").unwrap();
        fs::write(root.path().join("b.txt"), "y\n").unwrap();

        let mut p = params(&root, "a.txt", "b.txt", "out.diff");
        p.output_file_path = outside.path().join("out.diff").to_string_lossy().to_string();

        let result = tool(Some(root.path().to_path_buf())).execute(p).await;
        assert_err!(result);
    }

    #[tokio::test]
    async fn test_identical_files_produce_empty_diff() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "same\n").unwrap();
        fs::write(dir.path().join("b.txt"), "same\n").unwrap();

        let result = tool(None)
            .execute(params(&dir, "a.txt", "b.txt", "out.diff"))
            .await
            .unwrap();
        assert_eq!(result.structured_content.unwrap()["identical"], true);
        assert_eq!(fs::read_to_string(dir.path().join("out.diff")).unwrap(), "");
    }
}
