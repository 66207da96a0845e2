//! Analysis results and the executable plan derived from them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::StepStatus;

/// Caller-supplied analysis, stored verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Analysis {
    #[serde(default)]
    pub findings: Vec<Value>,
    #[serde(default)]
    pub recommendations: Vec<Value>,
    #[serde(default)]
    pub decision_points: Vec<Value>,
    pub analyzed_at: i64,
}

/// Kind of side effect an artifact records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    File,
}

/// What happened to the artifact's target.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactAction {
    Created,
    Modified,
}

/// Record of a side effect produced by executing a step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Artifact {
    #[serde(rename = "type")]
    pub kind: ArtifactKind,
    pub path: String,
    pub action: ArtifactAction,
}

impl Artifact {
    pub fn file(path: impl Into<String>, action: ArtifactAction) -> Self {
        Self {
            kind: ArtifactKind::File,
            path: path.into(),
            action,
        }
    }
}

/// Result written into a step each time it is executed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepResult {
    pub step_id: String,
    pub step_type: String,
    pub success: bool,
    pub output: Option<String>,
    pub error: Option<String>,
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
}

impl StepResult {
    pub fn new(step_id: impl Into<String>, step_type: impl Into<String>) -> Self {
        Self {
            step_id: step_id.into(),
            step_type: step_type.into(),
            success: false,
            output: None,
            error: None,
            artifacts: Vec::new(),
        }
    }

    pub fn succeeded(mut self, output: impl Into<String>) -> Self {
        self.success = true;
        self.output = Some(output.into());
        self
    }

    pub fn failed(mut self, error: impl Into<String>) -> Self {
        self.success = false;
        self.error = Some(error.into());
        self
    }

    pub fn with_artifact(mut self, artifact: Artifact) -> Self {
        self.artifacts.push(artifact);
        self
    }

    /// Human-facing message: output on success, error otherwise.
    pub fn message(&self) -> String {
        let text = if self.success {
            self.output.as_deref()
        } else {
            self.error.as_deref()
        };
        text.unwrap_or_default().to_string()
    }
}

/// One actionable step of an execution plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExecutionStep {
    pub id: String,

    #[serde(default)]
    pub title: String,

    #[serde(rename = "type", default = "unknown_type")]
    pub step_type: String,

    #[serde(default)]
    pub status: StepStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<StepResult>,

    /// Any extra caller-supplied fields, stored verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub(crate) fn unknown_type() -> String {
    "unknown".to_string()
}

/// Ordered steps plus a pointer to the next step to run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExecutionPlan {
    pub steps: Vec<ExecutionStep>,
    pub total_steps: usize,
    /// Index of the next step not yet completed in sequence
    pub current_step: usize,
    pub created_at: i64,
}

impl ExecutionPlan {
    /// Index of the first step whose id matches.
    pub fn position(&self, step_id: &str) -> Option<usize> {
        self.steps.iter().position(|step| step.id == step_id)
    }

    pub fn all_completed(&self) -> bool {
        self.steps
            .iter()
            .all(|step| step.status == StepStatus::Completed)
    }
}
