//! Entry filtering for the tree renderer.

use glob::Pattern;

use crate::{
    error::{Result, WorkflowError},
    params::TreeDirectory,
};

/// Names skipped when common exclusions are enabled.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    ".git",
    ".svn",
    ".hg",
    "node_modules",
    "__pycache__",
    ".venv",
    "venv",
    "target",
    "dist",
    "build",
    ".next",
    ".cache",
    ".pytest_cache",
    ".mypy_cache",
    ".idea",
    ".vscode",
    "*.pyc",
    "*.pyo",
    "*.o",
    "*.so",
    "*.class",
    ".DS_Store",
];

/// Decides which directory entries appear in a tree.
#[derive(Debug, Clone)]
pub struct EntryFilter {
    show_hidden: bool,
    show_files: bool,
    excludes: Vec<Pattern>,
    include: Option<Pattern>,
}

impl EntryFilter {
    /// Compiles the exclusion and inclusion globs of a tree request.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::InvalidInput` for a malformed glob.
    pub fn from_params(params: &TreeDirectory) -> Result<Self> {
        let defaults: &[&str] = if params.exclude_common {
            DEFAULT_EXCLUDES
        } else {
            &[]
        };

        let mut excludes = Vec::with_capacity(defaults.len() + params.custom_excludes.len());
        for pattern in defaults {
            excludes.push(compile("exclude_common", pattern)?);
        }
        for pattern in &params.custom_excludes {
            excludes.push(compile("custom_excludes", pattern)?);
        }

        let include = params
            .pattern
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| compile("pattern", p))
            .transpose()?;

        Ok(Self {
            show_hidden: params.show_hidden,
            show_files: params.show_files,
            excludes,
            include,
        })
    }

    /// Whether an entry with this name should be rendered.
    ///
    /// Checks run in order: hidden names, file visibility, exclusion globs,
    /// then the inclusion glob, which only constrains files.
    pub fn admits(&self, name: &str, is_dir: bool) -> bool {
        if !self.show_hidden && name.starts_with('.') {
            return false;
        }
        if !self.show_files && !is_dir {
            return false;
        }
        if self.excludes.iter().any(|pattern| pattern.matches(name)) {
            return false;
        }
        match &self.include {
            Some(pattern) if !is_dir => pattern.matches(name),
            _ => true,
        }
    }
}

fn compile(field: &str, pattern: &str) -> Result<Pattern> {
    Pattern::new(pattern).map_err(|e| {
        WorkflowError::invalid_input(field).with_reason(format!("invalid glob '{pattern}': {e}"))
    })
}
