//! Final report snapshot.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    Artifact, GatherSummary, InstructionStatus, StepStatus, TaskPlan, WorkflowStep,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportSummary {
    pub planned_subtasks: usize,
    pub executed_steps: usize,
    pub successful_steps: usize,
    pub artifacts: Vec<Artifact>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserInstructionEcho {
    pub description: String,
    pub goal: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisEcho {
    pub findings: Vec<Value>,
    pub recommendations: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExecutedStep {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub step_type: String,
    pub status: StepStatus,
    pub output: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultSynthesis {
    pub executed_steps: Vec<ExecutedStep>,
}

/// Echoes of every phase, included on request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportDetails {
    pub user_instruction: UserInstructionEcho,
    pub task_planning: Option<TaskPlan>,
    pub information_gathering: Option<GatherSummary>,
    pub analysis_and_orchestration: AnalysisEcho,
    pub result_synthesis: ResultSynthesis,
}

/// Snapshot of an instruction at report time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinalReport {
    pub instruction_id: String,
    pub title: String,
    /// Status before the report forced completion
    pub status: InstructionStatus,
    pub created_at: i64,
    pub completed_at: i64,
    pub workflow_steps_completed: Vec<WorkflowStep>,
    pub summary: ReportSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ReportDetails>,
}
