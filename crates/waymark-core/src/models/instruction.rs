//! Instruction model definition and related functionality.

use serde::{Deserialize, Serialize};

use super::{
    Analysis, ExecutionPlan, FinalReport, GatheredInformation, InstructionStatus, Priority,
    TaskPlan, WorkflowStep,
};

/// One workflow instance, persisted as a single JSON document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Instruction {
    /// Short opaque identifier, also the storage file stem
    pub id: String,

    pub title: String,

    pub description: String,

    pub goal: String,

    #[serde(default)]
    pub priority: Priority,

    pub status: InstructionStatus,

    pub workflow_step: WorkflowStep,

    /// Creation time in epoch seconds
    pub created_at: i64,

    /// Write counter used to detect lost updates
    #[serde(default)]
    pub revision: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_plan: Option<TaskPlan>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gathered_information: Option<GatheredInformation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Analysis>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_plan: Option<ExecutionPlan>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_report: Option<FinalReport>,
}

impl Instruction {
    /// Moves the instruction into a new phase.
    pub fn advance(&mut self, status: InstructionStatus, step: WorkflowStep) {
        self.status = status;
        self.workflow_step = step;
    }
}
