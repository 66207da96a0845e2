//! Task plan produced by the planning phase.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A descriptive unit of work inside a task plan.
///
/// Subtasks are never executed; `dependencies` is informational only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subtask {
    pub id: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Relative weight used for the plan's complexity estimate
    pub complexity: f64,

    pub status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<String>>,

    /// Any extra caller-supplied fields, stored verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Subtask {
    pub fn has_dependencies(&self) -> bool {
        self.dependencies
            .as_ref()
            .is_some_and(|deps| !deps.is_empty())
    }
}

/// Ordered breakdown of an instruction into subtasks.
///
/// The aggregate fields are computed once when the plan is created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskPlan {
    pub subtasks: Vec<Subtask>,
    pub total_subtasks: usize,
    pub estimated_complexity: f64,
    pub has_dependencies: bool,
    pub created_at: i64,
}
