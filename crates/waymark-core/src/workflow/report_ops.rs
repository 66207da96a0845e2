//! Final report synthesis.

use log::info;

use super::{now, Workflow};
use crate::{
    error::Result,
    models::{
        AnalysisEcho, ExecutedStep, FinalReport, Instruction, InstructionStatus, ReportDetails,
        ReportSummary, ResultSynthesis, StepStatus, UserInstructionEcho,
    },
    params::GenerateReport,
};

impl Workflow {
    /// Builds the final report, stores it on the instruction and marks the
    /// instruction completed unless it already failed.
    pub async fn generate_final_report(&self, params: &GenerateReport) -> Result<FinalReport> {
        let params = params.clone();
        self.blocking(move |this| {
            let mut instruction = this.store.load(&params.instruction_id)?;
            let report = build_report(&instruction, params.include_details);

            instruction.final_report = Some(report.clone());
            if instruction.status != InstructionStatus::Failed {
                instruction.status = InstructionStatus::Completed;
            }
            this.store.commit(&mut instruction)?;

            info!(
                "Generated final report for instruction {} ({}/{} steps succeeded)",
                instruction.id, report.summary.successful_steps, report.summary.executed_steps
            );
            Ok(report)
        })
        .await
    }
}

/// Snapshot of the instruction's current state.
pub(crate) fn build_report(instruction: &Instruction, include_details: bool) -> FinalReport {
    let steps = instruction
        .execution_plan
        .as_ref()
        .map(|plan| plan.steps.as_slice())
        .unwrap_or_default();

    let artifacts = steps
        .iter()
        .filter_map(|step| step.result.as_ref())
        .filter(|result| result.success)
        .flat_map(|result| result.artifacts.iter().cloned())
        .collect();

    let summary = ReportSummary {
        planned_subtasks: instruction
            .task_plan
            .as_ref()
            .map_or(0, |plan| plan.subtasks.len()),
        executed_steps: steps.iter().filter(|s| s.status.is_executed()).count(),
        successful_steps: steps
            .iter()
            .filter(|s| s.status == StepStatus::Completed)
            .count(),
        artifacts,
    };

    let details = include_details.then(|| ReportDetails {
        user_instruction: UserInstructionEcho {
            description: instruction.description.clone(),
            goal: instruction.goal.clone(),
        },
        task_planning: instruction.task_plan.clone(),
        information_gathering: instruction
            .gathered_information
            .as_ref()
            .map(|info| info.summary.clone()),
        analysis_and_orchestration: AnalysisEcho {
            findings: instruction
                .analysis
                .as_ref()
                .map(|a| a.findings.clone())
                .unwrap_or_default(),
            recommendations: instruction
                .analysis
                .as_ref()
                .map(|a| a.recommendations.clone())
                .unwrap_or_default(),
        },
        result_synthesis: ResultSynthesis {
            executed_steps: steps
                .iter()
                .filter_map(|step| {
                    step.result.as_ref().map(|result| ExecutedStep {
                        id: step.id.clone(),
                        title: step.title.clone(),
                        step_type: step.step_type.clone(),
                        status: step.status,
                        output: result.output.clone(),
                    })
                })
                .collect(),
        },
    });

    FinalReport {
        instruction_id: instruction.id.clone(),
        title: instruction.title.clone(),
        status: instruction.status,
        created_at: instruction.created_at,
        completed_at: now(),
        workflow_steps_completed: instruction.workflow_step.through(),
        summary,
        details,
    }
}
