//! Status enumerations for instructions and execution steps.

use std::str::FromStr;

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Priority assigned to an instruction at creation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(format!("Invalid priority: {s}")),
        }
    }
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

/// Coarse, derived state of an instruction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum InstructionStatus {
    #[default]
    Created,
    Planned,
    InformationGathered,
    Analyzed,
    Completed,
    Failed,
}

impl InstructionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstructionStatus::Created => "created",
            InstructionStatus::Planned => "planned",
            InstructionStatus::InformationGathered => "information_gathered",
            InstructionStatus::Analyzed => "analyzed",
            InstructionStatus::Completed => "completed",
            InstructionStatus::Failed => "failed",
        }
    }
}

/// The workflow phase an instruction last passed through.
///
/// Variants are declared in workflow order, so the derived `Ord` follows the
/// intended sequence of phases.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowStep {
    #[default]
    UserInstruction,
    TaskPlanning,
    InformationGathering,
    AnalysisAndOrchestration,
    ResultSynthesis,
}

impl WorkflowStep {
    /// All phases in workflow order.
    pub const ALL: [WorkflowStep; 5] = [
        WorkflowStep::UserInstruction,
        WorkflowStep::TaskPlanning,
        WorkflowStep::InformationGathering,
        WorkflowStep::AnalysisAndOrchestration,
        WorkflowStep::ResultSynthesis,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStep::UserInstruction => "USER_INSTRUCTION",
            WorkflowStep::TaskPlanning => "TASK_PLANNING",
            WorkflowStep::InformationGathering => "INFORMATION_GATHERING",
            WorkflowStep::AnalysisAndOrchestration => "ANALYSIS_AND_ORCHESTRATION",
            WorkflowStep::ResultSynthesis => "RESULT_SYNTHESIS",
        }
    }

    /// Every phase up to and including `self`.
    pub fn through(self) -> Vec<WorkflowStep> {
        WorkflowStep::ALL
            .into_iter()
            .filter(|step| *step <= self)
            .collect()
    }
}

/// Lifecycle of a single execution step.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl StepStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Pending => "pending",
            StepStatus::InProgress => "in_progress",
            StepStatus::Completed => "completed",
            StepStatus::Failed => "failed",
        }
    }

    /// Whether the step has been executed, successfully or not.
    pub fn is_executed(&self) -> bool {
        matches!(self, StepStatus::Completed | StepStatus::Failed)
    }

    /// Get status with consistent icon formatting for display.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use waymark_core::models::StepStatus;
    ///
    /// assert_eq!(StepStatus::Completed.with_icon(), "✓ Completed");
    /// assert_eq!(StepStatus::Failed.with_icon(), "✗ Failed");
    /// assert_eq!(StepStatus::Pending.with_icon(), "○ Pending");
    /// ```
    pub fn with_icon(&self) -> &'static str {
        match self {
            StepStatus::Completed => "✓ Completed",
            StepStatus::Failed => "✗ Failed",
            StepStatus::InProgress => "➤ In Progress",
            StepStatus::Pending => "○ Pending",
        }
    }
}
