//! Common types for tools module

use crate::errors::PluginResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Grouping used when listing tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolCategory {
    /// Prices and price history
    Market,
    /// Company fundamentals and relationships
    Company,
    News,
}

impl std::fmt::Display for ToolCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolCategory::Market => write!(f, "market"),
            ToolCategory::Company => write!(f, "company"),
            ToolCategory::News => write!(f, "news"),
        }
    }
}

/// Name, description and JSON input schema of a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub category: ToolCategory,
    /// JSON Schema (`type: object`) describing accepted arguments
    pub parameters: Value,
}

impl ToolDefinition {
    /// Names listed under the schema's `required` array
    pub fn required_fields(&self) -> Vec<&str> {
        self.parameters
            .get("required")
            .and_then(Value::as_array)
            .map(|fields| fields.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text { text: String },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    pub fn as_text(&self) -> &str {
        match self {
            ContentBlock::Text { text } => text,
        }
    }
}

/// Outcome of a tool invocation
///
/// Success carries one or more text blocks; an error carries exactly one
/// block describing the failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: Vec<ContentBlock>,
    #[serde(rename = "isError", default)]
    pub is_error: bool,
}

impl ToolResult {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::text(text)],
            is_error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::text(message)],
            is_error: true,
        }
    }

    /// Success text, or the error rendered against `subject`
    pub fn from_outcome(outcome: PluginResult<String>, subject: &str) -> Self {
        match outcome {
            Ok(text) => Self::success(text),
            Err(err) => Self::error(err.describe(subject)),
        }
    }

    /// All text blocks joined by newlines
    pub fn text(&self) -> String {
        self.content
            .iter()
            .map(ContentBlock::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PluginError;
    use serde_json::json;

    #[test]
    fn test_tool_result_wire_shape() {
        let result = ToolResult::error("boom");
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"content": [{"type": "text", "text": "boom"}], "isError": true})
        );
    }

    #[test]
    fn test_from_outcome_describes_failures() {
        let ok = ToolResult::from_outcome(Ok("fine".to_string()), "quote for AAPL");
        assert!(!ok.is_error);
        assert_eq!(ok.text(), "fine");

        let failed = ToolResult::from_outcome(
            Err(PluginError::Upstream {
                status: 500,
                body: "oops".to_string(),
            }),
            "quote for AAPL",
        );
        assert!(failed.is_error);
        assert_eq!(failed.content.len(), 1);
        assert!(failed.text().starts_with("Failed to fetch quote for AAPL"));
    }

    #[test]
    fn test_required_fields() {
        let def = ToolDefinition {
            name: "quote".to_string(),
            description: String::new(),
            category: ToolCategory::Market,
            parameters: json!({"type": "object", "properties": {}, "required": ["symbol"]}),
        };
        assert_eq!(def.required_fields(), vec!["symbol"]);
    }
}
