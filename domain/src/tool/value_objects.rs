//! Tool domain value objects: immutable result and error types
//!
//! Every tool invocation produces a [`ToolResult`]. A failed result is an
//! *observation* for the model, not a fatal error: the agent loop feeds it
//! back into the conversation and lets the model decide what to do next.

use serde::{Deserialize, Serialize};

/// Error that occurred during a single tool invocation.
///
/// | Code | Description |
/// |------|-------------|
/// | `NOT_FOUND` | The model asked for a tool the provider does not expose |
/// | `INVALID_ARGUMENT` | The provider rejected the arguments |
/// | `EXECUTION_FAILED` | The provider reported a failure while running the tool |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolError {
    /// Error code (e.g., "NOT_FOUND", "EXECUTION_FAILED")
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ToolError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(tool: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", format!("Tool not found: {}", tool.into()))
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new("INVALID_ARGUMENT", message)
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new("EXECUTION_FAILED", message)
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ToolError {}

/// Result of a tool invocation, carrying output or error information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Name of the tool that was executed
    pub tool_name: String,
    /// Whether the execution was successful
    pub success: bool,
    /// Output content (for successful execution)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Error information (for failed execution)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
    /// Duration of execution in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(tool_name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: true,
            output: Some(output.into()),
            error: None,
            duration_ms: None,
        }
    }

    /// Create a failed result
    pub fn failure(tool_name: impl Into<String>, error: ToolError) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: false,
            output: None,
            error: Some(error),
            duration_ms: None,
        }
    }

    /// Add duration metadata
    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Check if execution was successful
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get the output content
    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    /// Get the error
    pub fn error(&self) -> Option<&ToolError> {
        self.error.as_ref()
    }

    /// Text to hand back to the model: the output on success, the error
    /// message on failure.
    pub fn observation(&self) -> String {
        match (&self.output, &self.error) {
            (_, Some(err)) if !self.success => err.message.clone(),
            (Some(out), _) => out.clone(),
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_error() {
        let err = ToolError::not_found("delete_page");
        assert_eq!(err.code, "NOT_FOUND");
        assert!(err.message.contains("delete_page"));
        assert_eq!(err.to_string(), "[NOT_FOUND] Tool not found: delete_page");
    }

    #[test]
    fn test_tool_result_success() {
        let result = ToolResult::success("search_pages", "Roadmap: Q1, Q2, Q3").with_duration(12);

        assert!(result.is_success());
        assert_eq!(result.output(), Some("Roadmap: Q1, Q2, Q3"));
        assert!(result.error().is_none());
        assert_eq!(result.duration_ms, Some(12));
        assert_eq!(result.observation(), "Roadmap: Q1, Q2, Q3");
    }

    #[test]
    fn test_tool_result_failure() {
        let result = ToolResult::failure(
            "fetch_page",
            ToolError::execution_failed("page is archived"),
        );

        assert!(!result.is_success());
        assert!(result.output().is_none());
        assert_eq!(result.error().unwrap().code, "EXECUTION_FAILED");
        assert_eq!(result.observation(), "page is archived");
    }
}
