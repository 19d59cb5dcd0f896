//! Content summaries and metadata extraction for audit records.

use lethe_state::{MemoryMetadata, MemoryType, PrivacyLevel};
use serde_json::Value;

/// Bounded, display-only summary of raw memory content.
///
/// Strings are summarised as-is, anything else from its compact JSON form.
/// Output is at most `limit` characters; longer input is cut and ends in
/// `"..."`. Structured fields are never inspected.
pub fn summarize_content(content: &Value, limit: usize) -> String {
    let text = match content {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    if text.chars().count() <= limit {
        return text;
    }
    let keep = limit.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// Derives descriptive metadata from raw memory content.
///
/// Implementations must be pure; the control system calls this once per
/// request before consulting policy.
pub trait MetadataExtractor: Send + Sync {
    fn extract(&self, memory_type: MemoryType, content: &Value) -> MemoryMetadata;
}

/// Shape-based extractor.
///
/// Reads an optional top-level `privacy_level` string from object content
/// and otherwise classifies memories as `internal`.
#[derive(Debug, Clone, Default)]
pub struct DefaultMetadataExtractor;

impl MetadataExtractor for DefaultMetadataExtractor {
    fn extract(&self, memory_type: MemoryType, content: &Value) -> MemoryMetadata {
        let content_type = match content {
            Value::String(_) => "text",
            Value::Object(_) => "structured",
            Value::Array(_) => "collection",
            Value::Number(_) | Value::Bool(_) => "scalar",
            Value::Null => "empty",
        };
        let privacy_level = content
            .get("privacy_level")
            .and_then(Value::as_str)
            .and_then(PrivacyLevel::parse)
            .unwrap_or(PrivacyLevel::Internal);

        MemoryMetadata {
            content_type: content_type.to_string(),
            size_bytes: content.to_string().len(),
            category: memory_type.as_str().to_string(),
            privacy_level,
            access_frequency: 0.0,
        }
    }
}
