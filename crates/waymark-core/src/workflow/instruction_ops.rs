//! Instruction lifecycle entry points: create, read and list.

use log::info;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{now, Workflow};
use crate::{
    error::Result,
    models::{Instruction, InstructionStatus, InstructionSummary, WorkflowStep},
    params::{CreateInstruction, InstructionId},
    store::InstructionStore,
};

/// Hints returned by [`Workflow::build_feature`], in workflow order.
pub const NEXT_STEPS: [&str; 5] = [
    "1. Use create_task_plan to break down this feature into subtasks",
    "2. Use gather_information to collect necessary information for implementation",
    "3. Use analyze_and_orchestrate to analyze the info and create an execution plan",
    "4. Use execute_step for each step in your execution plan",
    "5. Use generate_final_report to summarize the implementation",
];

/// A freshly created instruction plus guidance for driving it to completion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureKickoff {
    pub instruction: Instruction,
    pub next_steps: Vec<String>,
}

impl Workflow {
    /// Creates and persists a new instruction in the `USER_INSTRUCTION` phase.
    pub async fn create_instruction(&self, params: &CreateInstruction) -> Result<Instruction> {
        let params = params.clone();
        self.blocking(move |this| this.create_instruction_blocking(params))
            .await
    }

    /// Loads an instruction by id.
    pub async fn get_instruction(&self, params: &InstructionId) -> Result<Instruction> {
        let id = params.instruction_id.clone();
        self.blocking(move |this| this.store.load(&id)).await
    }

    /// Every stored instruction, oldest first.
    pub async fn list_instructions(&self) -> Result<Vec<Instruction>> {
        self.blocking(|this| this.store.list_all()).await
    }

    /// Lightweight summaries of every stored instruction, oldest first.
    pub async fn list_summaries(&self) -> Result<Vec<InstructionSummary>> {
        let instructions = self.list_instructions().await?;
        Ok(instructions.iter().map(InstructionSummary::from).collect())
    }

    /// Creates an instruction for a feature and returns the remaining
    /// workflow steps to take.
    pub async fn build_feature(&self, params: &CreateInstruction) -> Result<FeatureKickoff> {
        let instruction = self.create_instruction(params).await?;
        info!("Started feature build for instruction {}", instruction.id);
        Ok(FeatureKickoff {
            instruction,
            next_steps: NEXT_STEPS.iter().map(|s| s.to_string()).collect(),
        })
    }

    fn create_instruction_blocking(&self, params: CreateInstruction) -> Result<Instruction> {
        let instruction = Instruction {
            id: unused_id(&self.store),
            title: params.title,
            description: params.description,
            goal: params.goal,
            priority: params.priority,
            status: InstructionStatus::Created,
            workflow_step: WorkflowStep::UserInstruction,
            created_at: now(),
            revision: 0,
            task_plan: None,
            gathered_information: None,
            analysis: None,
            execution_plan: None,
            final_report: None,
        };
        self.store.save(&instruction)?;
        info!("Created instruction {}: {}", instruction.id, instruction.title);
        Ok(instruction)
    }
}

/// Eight hex characters of a v4 UUID, regenerated until no document uses it.
fn unused_id(store: &InstructionStore) -> String {
    loop {
        let id = Uuid::new_v4().simple().to_string()[..8].to_string();
        if !store.exists(&id) {
            return id;
        }
    }
}
