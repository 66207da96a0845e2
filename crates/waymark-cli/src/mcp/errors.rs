//! Error handling utilities for MCP server

use rmcp::ErrorData;
use waymark_core::WorkflowError;

/// Helper to convert workflow errors to MCP protocol errors
///
/// Only used where no structured tool response can be produced; operation
/// failures are reported as failed tool results instead.
pub fn to_mcp_error(message: &str, error: &WorkflowError) -> ErrorData {
    ErrorData::internal_error(format!("{message}: {error}"), None)
}

/// Maps resource lookups onto the matching protocol error.
pub fn to_resource_error(uri: &str, error: &WorkflowError) -> ErrorData {
    match error {
        WorkflowError::NotFound { .. } => {
            ErrorData::resource_not_found(format!("{uri}: {error}"), None)
        }
        WorkflowError::InvalidInput { .. } => {
            ErrorData::invalid_params(format!("{uri}: {error}"), None)
        }
        _ => to_mcp_error("Failed to read resource", error),
    }
}
