//! Parameter structures for Waymark operations
//!
//! These structures are shared by every interface (CLI, MCP) and carry no
//! framework-specific derives beyond serde. JSON Schema generation for the
//! MCP tool surface is enabled with the `schema` feature:
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │   MCP Params    │    │  Core Params    │
//! │  (clap derives) │───▶│ (serde derives) │───▶│ (minimal deps)  │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! Interface layers wrap these types (`#[serde(transparent)]` on the MCP
//! side, `From<Args>` conversions on the CLI side) instead of redefining
//! them.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::{Priority, StepStatus};

/// Parameters for operations requiring just an instruction ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct InstructionId {
    /// The unique identifier of the instruction
    pub instruction_id: String,
}

/// Parameters for creating a new instruction (step 1).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct CreateInstruction {
    /// Brief title for the instruction
    pub title: String,
    /// Detailed description of what needs to be done
    pub description: String,
    /// The specific goal or outcome to achieve
    pub goal: String,
    /// Priority level: low, medium (default) or high
    #[serde(default)]
    pub priority: Priority,
}

/// A subtask as supplied by the caller; missing ids and statuses are filled
/// in by position.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct SubtaskSpec {
    /// Optional identifier, defaults to `st-<n>`
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Numeric weight, defaults to 1
    pub complexity: Option<f64>,
    /// Defaults to "pending"
    pub status: Option<String>,
    /// Ids of subtasks this one depends on (informational)
    pub dependencies: Option<Vec<String>>,
    /// Additional fields kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Parameters for breaking an instruction into subtasks (step 2).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct CreateTaskPlan {
    pub instruction_id: String,
    /// Subtasks, each with title, description and complexity
    pub subtasks: Vec<SubtaskSpec>,
}

/// A typed descriptor of where to pull information from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct SourceSpec {
    /// One of: file, directory, command, search
    #[serde(rename = "type")]
    pub source_type: Option<String>,
    /// Path for file and directory sources
    pub path: Option<String>,
    /// Command line for command sources, literal text for search sources
    pub query: Option<String>,
}

/// Parameters for gathering information (step 3).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct GatherInformation {
    pub instruction_id: String,
    pub sources: Vec<SourceSpec>,
}

/// Caller analysis, stored verbatim.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct AnalysisInput {
    #[serde(default)]
    pub findings: Vec<Value>,
    #[serde(default)]
    pub recommendations: Vec<Value>,
    #[serde(default)]
    pub decision_points: Vec<Value>,
}

/// An execution step as supplied by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ExecutionStepSpec {
    /// Optional identifier, defaults to `step-<n>`
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    /// One of: file_creation, file_modification, command_execution,
    /// dependency_installation
    #[serde(rename = "type")]
    pub step_type: Option<String>,
    pub status: Option<StepStatus>,
    /// Additional fields kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Parameters for analysis and orchestration (step 4).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct AnalyzeAndOrchestrate {
    pub instruction_id: String,
    #[serde(default)]
    pub analysis: AnalysisInput,
    pub execution_plan: Vec<ExecutionStepSpec>,
}

/// A single text edit applied during file modification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Patch {
    /// Replace every occurrence of `old_text`
    Replace {
        #[serde(default)]
        old_text: String,
        #[serde(default)]
        new_text: String,
    },
    /// Insert `text` at a character offset
    Insert {
        position: usize,
        #[serde(default)]
        text: String,
    },
    /// Remove the character range `[start, end)`
    Delete { start: usize, end: usize },
}

/// A command given either as an argument vector or a single line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(untagged)]
pub enum CommandSpec {
    Args(Vec<String>),
    Line(String),
}

impl CommandSpec {
    /// Argument vector; lines are split on whitespace.
    pub fn argv(&self) -> Vec<String> {
        match self {
            CommandSpec::Args(args) => args.clone(),
            CommandSpec::Line(line) => split_command_line(line),
        }
    }
}

/// Naive whitespace split used for every command given as a single string.
pub fn split_command_line(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

/// How to perform a step; which fields matter depends on the step type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ExecutionDetails {
    /// Target file for file_creation and file_modification
    pub file_path: Option<String>,
    /// Full file content (creation, or full replacement on modification)
    pub content: Option<String>,
    /// Ordered patches applied when no full content is given
    #[serde(default)]
    pub patches: Vec<Patch>,
    /// Command for command_execution
    pub command: Option<CommandSpec>,
    /// Packages for dependency_installation
    #[serde(default)]
    pub packages: Vec<String>,
    /// npm (default) or pip
    pub package_manager: Option<String>,
}

/// Parameters for executing one step (step 5).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ExecuteStep {
    pub instruction_id: String,
    pub step_id: String,
    #[serde(default)]
    pub execution_details: ExecutionDetails,
}

/// Parameters for generating the final report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct GenerateReport {
    pub instruction_id: String,
    /// Whether to include full execution details (default true)
    #[serde(default = "default_true")]
    pub include_details: bool,
}

/// Parameters for rendering a directory tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct TreeDirectory {
    /// Directory relative to the project root; empty means the root
    #[serde(default)]
    pub directory_path: String,
    /// Maximum depth to descend (default 3)
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Show files as well as directories (default true)
    #[serde(default = "default_true")]
    pub show_files: bool,
    /// Show entries whose name starts with a dot (default false)
    #[serde(default)]
    pub show_hidden: bool,
    /// Glob that file names must match to be shown
    pub pattern: Option<String>,
    /// Skip VCS metadata, dependency and build directories (default true)
    #[serde(default = "default_true")]
    pub exclude_common: bool,
    /// Additional glob patterns to exclude
    #[serde(default)]
    pub custom_excludes: Vec<String>,
}

impl Default for TreeDirectory {
    fn default() -> Self {
        Self {
            directory_path: String::new(),
            max_depth: default_max_depth(),
            show_files: true,
            show_hidden: false,
            pattern: None,
            exclude_common: true,
            custom_excludes: Vec::new(),
        }
    }
}

/// Parameters for `git status`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct GitStatus {
    /// Include per-file change lists instead of counts only
    #[serde(default)]
    pub detailed: bool,
}

/// Parameters for `git log`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct GitLog {
    /// Number of commits to return (default 10)
    #[serde(default = "default_log_count")]
    pub count: usize,
    /// Include per-commit file statistics
    #[serde(default)]
    pub show_stats: bool,
}

impl Default for GitLog {
    fn default() -> Self {
        Self {
            count: default_log_count(),
            show_stats: false,
        }
    }
}

/// Parameters for `git branch`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct GitBranch {
    /// Include remote-tracking branches
    #[serde(default)]
    pub remote: bool,
}

/// Parameters for `git diff`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct GitDiff {
    /// Restrict the diff to one path
    pub file_path: Option<String>,
    /// Diff the index instead of the working tree
    #[serde(default)]
    pub staged: bool,
}

fn default_true() -> bool {
    true
}

fn default_max_depth() -> usize {
    3
}

fn default_log_count() -> usize {
    10
}
