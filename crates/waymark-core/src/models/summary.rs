//! InstructionSummary model for efficient list display.

use serde::{Deserialize, Serialize};

use super::{Instruction, InstructionStatus, Priority, StepStatus, WorkflowStep};

/// Lightweight view of an instruction with execution progress counts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InstructionSummary {
    pub id: String,
    pub title: String,
    pub priority: Priority,
    pub status: InstructionStatus,
    pub workflow_step: WorkflowStep,
    pub created_at: i64,
    pub total_steps: usize,
    pub completed_steps: usize,
}

impl From<&Instruction> for InstructionSummary {
    fn from(instruction: &Instruction) -> Self {
        let (total_steps, completed_steps) = instruction
            .execution_plan
            .as_ref()
            .map(|plan| {
                let completed = plan
                    .steps
                    .iter()
                    .filter(|step| step.status == StepStatus::Completed)
                    .count();
                (plan.steps.len(), completed)
            })
            .unwrap_or((0, 0));

        Self {
            id: instruction.id.clone(),
            title: instruction.title.clone(),
            priority: instruction.priority,
            status: instruction.status,
            workflow_step: instruction.workflow_step,
            created_at: instruction.created_at,
            total_steps,
            completed_steps,
        }
    }
}
