pub mod analysis;
pub mod declarations;
pub mod system;

use rmcp::model::{CallToolResult, Content};
use serde_json::json;

use crate::types::ScoredDeclaration;

// ============================================================================
// Logic Constants & Helpers
// ============================================================================

pub const DEFAULT_LIMIT: usize = 20;
pub const MAX_LIMIT: usize = 100;

/// Suggestions offered when an exact name is missing.
pub const SUGGESTION_LIMIT: usize = 5;

pub fn normalize_limit(limit: Option<usize>) -> usize {
    limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT)
}

// ============================================================================
// Response Helpers
// ============================================================================

/// Create error response from any Display type
pub fn error_response(e: impl std::fmt::Display) -> CallToolResult {
    CallToolResult::success(vec![Content::text(
        json!({ "error": e.to_string() }).to_string(),
    )])
}

/// Error response for a missing name, carrying fuzzy suggestions.
pub fn not_found_response(
    e: impl std::fmt::Display,
    suggestions: &[ScoredDeclaration<'_>],
) -> CallToolResult {
    let suggestions: Vec<_> = suggestions
        .iter()
        .map(|s| {
            json!({
                "name": s.declaration.name,
                "kind": s.declaration.kind(),
                "module": s.declaration.module,
                "score": s.score
            })
        })
        .collect();
    success_json(json!({ "error": e.to_string(), "suggestions": suggestions }))
}

/// Create success response from JSON value
pub fn success_json(value: serde_json::Value) -> CallToolResult {
    CallToolResult::success(vec![Content::text(value.to_string())])
}

/// Create success response from serializable value
pub fn success_serialize<T: serde::Serialize>(value: &T) -> CallToolResult {
    CallToolResult::success(vec![Content::text(
        serde_json::to_string(value).unwrap_or_default(),
    )])
}

#[cfg(test)]
pub(crate) fn response_json(result: &CallToolResult) -> serde_json::Value {
    let val = serde_json::to_value(result).unwrap();
    let text = val["content"][0]["text"].as_str().unwrap();
    serde_json::from_str(text).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_limit() {
        assert_eq!(normalize_limit(None), DEFAULT_LIMIT);
        assert_eq!(normalize_limit(Some(10)), 10);
        assert_eq!(normalize_limit(Some(100)), 100);
        assert_eq!(normalize_limit(Some(101)), MAX_LIMIT);
    }

    #[test]
    fn test_error_response_shape() {
        let json = response_json(&error_response("boom"));
        assert_eq!(json["error"], "boom");
    }
}
