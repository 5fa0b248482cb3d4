//! Result helpers shared across tool definitions.

use rmcp::model::{CallToolResult, Content};
use serde::Serialize;
use tracing::warn;

/// Create an error result with a formatted message.
pub fn error_result(message: &str) -> CallToolResult {
    warn!("{}", message);
    CallToolResult::error(vec![Content::text(message.to_string())])
}

/// Create a success result with a text summary and structured content.
///
/// Falls back to the text summary alone if `data` cannot be serialized.
pub fn structured_result<T: Serialize>(summary: String, data: &T) -> CallToolResult {
    match serde_json::to_value(data) {
        Ok(structured) => CallToolResult {
            content: vec![Content::text(summary)],
            structured_content: Some(structured),
            is_error: Some(false),
            meta: None,
        },
        Err(e) => {
            warn!("Failed to serialize structured content: {}", e);
            CallToolResult::success(vec![Content::text(summary)])
        }
    }
}

/// First text block of a result, if any.
pub fn first_text(result: &CallToolResult) -> Option<&str> {
    result.content.iter().find_map(|c| match &c.raw {
        rmcp::model::RawContent::Text(text) => Some(text.text.as_str()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_result_flags_error() {
        let result = error_result("fetch failed");
        assert_eq!(result.is_error, Some(true));
        assert_eq!(first_text(&result), Some("fetch failed"));
    }

    #[test]
    fn test_structured_result() {
        let result = structured_result("2 hits".to_string(), &json!({"count": 2}));
        assert_eq!(result.is_error, Some(false));
        assert_eq!(result.structured_content.unwrap()["count"], 2);
    }
}
