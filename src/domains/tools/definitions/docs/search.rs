//! Search docs tool definition.
//!
//! Fuzzy keyword search over the titles and paths listed in the
//! documentation index.

use std::sync::Arc;

use rmcp::handler::server::tool::schema_for_type;
use rmcp::model::{CallToolResult, JsonObject};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::client::DocsClient;
use super::index::DocEntry;
use crate::domains::tools::ToolError;
use crate::domains::tools::definitions::common::{error_result, structured_result};
use crate::domains::tools::handlers::TypedTool;

/// Default number of hits returned.
pub const DEFAULT_MAX_RESULTS: u32 = 10;

/// Hits scoring below this are dropped.
const MIN_SCORE: f64 = 0.65;

/// Score given to titles that contain the whole query.
const CONTAINS_SCORE: f64 = 0.9;

/// Path matches count for slightly less than title matches.
const PATH_WEIGHT: f64 = 0.95;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the search docs tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchDocsParams {
    /// Keywords to look for in page titles and paths.
    pub query: String,

    /// Maximum number of results (default: 10, max: 50).
    #[schemars(range(min = 1, max = 50))]
    #[serde(default)]
    pub max_results: Option<u32>,
}

/// Structured output for search results.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct SearchDocsResult {
    pub query: String,
    pub results: Vec<SearchHit>,
}

/// A ranked index entry.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct SearchHit {
    pub title: String,
    pub path: String,
    pub score: f64,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Search docs tool - ranks documentation pages against a query.
pub struct SearchDocsTool {
    docs: Arc<DocsClient>,
}

impl SearchDocsTool {
    pub fn new(docs: Arc<DocsClient>) -> Self {
        Self { docs }
    }
}

#[async_trait::async_trait]
impl TypedTool for SearchDocsTool {
    const NAME: &'static str = "search_docs";

    const DESCRIPTION: &'static str = "Search the documentation index by keywords. Returns matching page titles and paths ranked by similarity; pass a path to get_page to read it.";

    type Params = SearchDocsParams;

    fn output_schema() -> Option<Arc<JsonObject>> {
        Some(schema_for_type::<SearchDocsResult>().into())
    }

    #[instrument(skip_all, fields(query = %params.query))]
    async fn execute(&self, params: SearchDocsParams) -> anyhow::Result<CallToolResult> {
        let query = params.query.trim();
        if query.is_empty() {
            return Err(ToolError::invalid_field("query", "must not be empty").into());
        }
        let limit = params.max_results.unwrap_or(DEFAULT_MAX_RESULTS) as usize;

        let entries = match self.docs.fetch_index().await {
            Ok(entries) => entries,
            Err(e) => {
                return Ok(error_result(&format!(
                    "Failed to load documentation index: {}",
                    e
                )));
            }
        };

        let hits = rank(&entries, query, limit);
        info!("{} of {} pages matched", hits.len(), entries.len());

        let summary = if hits.is_empty() {
            format!("No documentation pages matched '{}'", query)
        } else {
            let lines: Vec<String> = hits
                .iter()
                .enumerate()
                .map(|(i, hit)| {
                    format!("{}. {} ({}) score {:.2}", i + 1, hit.title, hit.path, hit.score)
                })
                .collect();
            format!("Results for '{}':\n{}", query, lines.join("\n"))
        };

        Ok(structured_result(
            summary,
            &SearchDocsResult {
                query: query.to_string(),
                results: hits,
            },
        ))
    }
}

// ============================================================================
// Ranking
// ============================================================================

/// Rank `entries` against `query`, best first, keeping at most `limit` hits.
///
/// Ties keep index order.
pub fn rank(entries: &[DocEntry], query: &str, limit: usize) -> Vec<SearchHit> {
    let query = query.trim().to_lowercase();

    let mut hits: Vec<SearchHit> = entries
        .iter()
        .map(|entry| SearchHit {
            title: entry.title.clone(),
            path: entry.path.clone(),
            score: score(&query, entry),
        })
        .filter(|hit| hit.score >= MIN_SCORE)
        .collect();

    hits.sort_by(|a, b| b.score.total_cmp(&a.score));
    hits.truncate(limit);
    hits
}

fn score(query: &str, entry: &DocEntry) -> f64 {
    let title = entry.title.to_lowercase();
    let mut best = strsim::jaro_winkler(query, &title);
    if title != query && title.contains(query) {
        best = best.max(CONTAINS_SCORE);
    }

    let stem = path_stem(&entry.path);
    if !stem.is_empty() {
        best = best.max(strsim::jaro_winkler(query, &stem) * PATH_WEIGHT);
    }
    best
}

/// Last path segment without extension, with separators turned into spaces.
fn path_stem(path: &str) -> String {
    let segment = path.trim_end_matches('/').rsplit('/').next().unwrap_or_default();
    let stem = segment.split('.').next().unwrap_or_default();
    stem.replace(['-', '_'], " ").to_lowercase()
}
