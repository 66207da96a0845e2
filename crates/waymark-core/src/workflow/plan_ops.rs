//! Task planning and analysis/orchestration phases.

use log::{debug, info};

use super::{now, Workflow};
use crate::{
    error::{Result, WorkflowError},
    models::{
        execution::unknown_type, Analysis, ExecutionPlan, ExecutionStep, Instruction,
        InstructionStatus, Subtask, TaskPlan, WorkflowStep,
    },
    params::{AnalyzeAndOrchestrate, CreateTaskPlan, ExecutionStepSpec, SubtaskSpec},
};

impl Workflow {
    /// Breaks an instruction down into subtasks.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::NotFound` if the instruction does not exist
    /// Returns `WorkflowError::InvalidInput` if no subtasks are given or a
    /// complexity is not a finite number
    pub async fn create_task_plan(&self, params: &CreateTaskPlan) -> Result<Instruction> {
        let params = params.clone();
        self.blocking(move |this| {
            if params.subtasks.is_empty() {
                return Err(WorkflowError::invalid_input("subtasks")
                    .with_reason("at least one subtask is required"));
            }
            if let Some(bad) = params
                .subtasks
                .iter()
                .filter_map(|spec| spec.complexity)
                .find(|complexity| !complexity.is_finite())
            {
                return Err(WorkflowError::invalid_input("complexity")
                    .with_reason(format!("{bad} is not a finite number")));
            }

            let mut instruction = this.store.load(&params.instruction_id)?;
            let plan = build_task_plan(params.subtasks);
            info!(
                "Planned {} subtasks for instruction {} (complexity {:.2})",
                plan.total_subtasks, instruction.id, plan.estimated_complexity
            );

            instruction.task_plan = Some(plan);
            instruction.advance(InstructionStatus::Planned, WorkflowStep::TaskPlanning);
            this.store.commit(&mut instruction)?;
            Ok(instruction)
        })
        .await
    }

    /// Stores the caller's analysis and the execution plan derived from it.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::PreconditionFailed` if no information has been
    /// gathered yet; the instruction is left untouched.
    pub async fn analyze_and_orchestrate(
        &self,
        params: &AnalyzeAndOrchestrate,
    ) -> Result<Instruction> {
        let params = params.clone();
        self.blocking(move |this| {
            let mut instruction = this.store.load(&params.instruction_id)?;
            if instruction.gathered_information.is_none() {
                return Err(WorkflowError::precondition(
                    "No gathered information found. Complete information gathering first.",
                ));
            }

            let timestamp = now();
            instruction.analysis = Some(Analysis {
                findings: params.analysis.findings,
                recommendations: params.analysis.recommendations,
                decision_points: params.analysis.decision_points,
                analyzed_at: timestamp,
            });

            let steps: Vec<ExecutionStep> = params
                .execution_plan
                .into_iter()
                .enumerate()
                .map(|(index, spec)| execution_step(index, spec))
                .collect();
            info!(
                "Orchestrated {} execution steps for instruction {}",
                steps.len(),
                instruction.id
            );
            instruction.execution_plan = Some(ExecutionPlan {
                total_steps: steps.len(),
                steps,
                current_step: 0,
                created_at: timestamp,
            });

            instruction.advance(
                InstructionStatus::Analyzed,
                WorkflowStep::AnalysisAndOrchestration,
            );
            this.store.commit(&mut instruction)?;
            Ok(instruction)
        })
        .await
    }
}

/// Fills positional defaults and computes the plan aggregates.
pub(crate) fn build_task_plan(specs: Vec<SubtaskSpec>) -> TaskPlan {
    let subtasks: Vec<Subtask> = specs
        .into_iter()
        .enumerate()
        .map(|(index, spec)| Subtask {
            id: spec.id.unwrap_or_else(|| format!("st-{}", index + 1)),
            title: spec.title,
            description: spec.description,
            complexity: spec.complexity.unwrap_or(1.0),
            status: spec.status.unwrap_or_else(|| "pending".to_string()),
            dependencies: spec.dependencies,
            extra: spec.extra,
        })
        .collect();

    // Dividing before summing keeps the mean finite for any finite inputs.
    let count = subtasks.len() as f64;
    let estimated_complexity: f64 = subtasks
        .iter()
        .map(|subtask| subtask.complexity / count)
        .sum();

    TaskPlan {
        total_subtasks: subtasks.len(),
        estimated_complexity,
        has_dependencies: subtasks.iter().any(Subtask::has_dependencies),
        subtasks,
        created_at: now(),
    }
}

/// Keys of a stored step that only the workflow itself may write.
const RESERVED_STEP_KEYS: [&str; 1] = ["result"];

fn execution_step(index: usize, spec: ExecutionStepSpec) -> ExecutionStep {
    let mut extra = spec.extra;
    for key in RESERVED_STEP_KEYS {
        if extra.remove(key).is_some() {
            debug!("Dropped reserved field '{key}' from execution step {}", index + 1);
        }
    }
    ExecutionStep {
        id: spec.id.unwrap_or_else(|| format!("step-{}", index + 1)),
        title: spec.title,
        step_type: spec.step_type.unwrap_or_else(unknown_type),
        status: spec.status.unwrap_or_default(),
        result: None,
        extra,
    }
}
