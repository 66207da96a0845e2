//! Error types for the workflow library.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Comprehensive error type for all workflow operations.
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// Referenced instruction, step, or filesystem path does not exist
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },
    /// A later step was invoked before its predecessor produced its data
    #[error("{message}")]
    PreconditionFailed { message: String },
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// An external process exited unsuccessfully
    #[error("Command '{command}' failed: {message}")]
    ExternalCommand { command: String, message: String },
    /// Persisted document could not be parsed
    #[error("Corrupt instruction document at '{path}': {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The document was modified by another writer since it was loaded
    #[error("Instruction {id} was modified concurrently (expected revision {expected}, found {found})")]
    Conflict {
        id: String,
        expected: u64,
        found: u64,
    },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Serialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> WorkflowError {
        WorkflowError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl WorkflowError {
    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Missing instruction.
    pub fn instruction_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: "Instruction",
            id: id.into(),
        }
    }

    /// Missing execution step.
    pub fn step_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: "Step",
            id: id.into(),
        }
    }

    /// Missing filesystem path.
    pub fn path_not_found(path: &Path) -> Self {
        Self::NotFound {
            kind: "Path",
            id: path.display().to_string(),
        }
    }

    pub fn precondition(message: impl Into<String>) -> Self {
        Self::PreconditionFailed {
            message: message.into(),
        }
    }

    /// Short machine-readable name of the error category.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::PreconditionFailed { .. } => "precondition_failed",
            Self::InvalidInput { .. } => "invalid_argument",
            Self::ExternalCommand { .. } => "external_command_failure",
            Self::Corrupt { .. } => "corrupt",
            Self::Conflict { .. } => "conflict",
            Self::FileSystem { .. } => "file_system",
            Self::Serialization { .. } => "serialization",
            Self::Configuration { .. } => "configuration",
        }
    }
}

/// Extension trait for Result to provide concise error mapping with
/// anyhow-style context.
pub trait ResultExt<T, E> {
    /// Add context to any error type, converting to WorkflowError.
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;
}

/// Specialized extension trait for filesystem Results.
pub trait FsResultExt<T> {
    /// Attach the path the operation was acting on.
    fn fs_context(self, path: &Path) -> Result<T>;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| WorkflowError::Configuration {
            message: format!("{}: {}", context, e),
        })
    }
}

impl<T> FsResultExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, path: &Path) -> Result<T> {
        self.map_err(|source| WorkflowError::FileSystem {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Result type alias for workflow operations
pub type Result<T> = std::result::Result<T, WorkflowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_builder() {
        let err = WorkflowError::invalid_input("subtasks").with_reason("must not be empty");
        assert_eq!(
            err.to_string(),
            "Invalid input for field 'subtasks': must not be empty"
        );
        assert_eq!(err.kind(), "invalid_argument");
    }

    #[test]
    fn test_not_found_messages() {
        assert_eq!(
            WorkflowError::instruction_not_found("abc12345").to_string(),
            "Instruction abc12345 not found"
        );
        assert_eq!(
            WorkflowError::step_not_found("step-9").to_string(),
            "Step step-9 not found"
        );
    }

    #[test]
    fn test_fs_context_keeps_path() {
        let res: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let err = res.fs_context(Path::new("/tmp/x")).unwrap_err();
        assert!(err.to_string().contains("/tmp/x"));
        assert_eq!(err.kind(), "file_system");
    }
}
