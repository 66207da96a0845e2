//! Data models for instructions and their workflow artifacts.
//!
//! An [`Instruction`] is the only persisted entity. Each workflow phase adds
//! one optional section to it:
//!
//! | Phase                        | Section                 |
//! |------------------------------|-------------------------|
//! | `TASK_PLANNING`              | [`TaskPlan`]            |
//! | `INFORMATION_GATHERING`      | [`GatheredInformation`] |
//! | `ANALYSIS_AND_ORCHESTRATION` | [`Analysis`], [`ExecutionPlan`] |
//! | `RESULT_SYNTHESIS`           | [`StepResult`]s, [`FinalReport`] |
//!
//! Display implementations for these models live in
//! [`crate::display::models`].

pub mod execution;
pub mod gathering;
pub mod instruction;
pub mod plan;
pub mod report;
pub mod status;
pub mod summary;


pub use execution::{
    Analysis, Artifact, ArtifactAction, ArtifactKind, ExecutionPlan, ExecutionStep, StepResult,
};
pub use gathering::{GatherSummary, GatheredInformation, SearchMatch, SourceContent, SourceResult};
pub use instruction::Instruction;
pub use plan::{Subtask, TaskPlan};
pub use report::{
    AnalysisEcho, ExecutedStep, FinalReport, ReportDetails, ReportSummary, ResultSynthesis,
    UserInstructionEcho,
};
pub use status::{InstructionStatus, Priority, StepStatus, WorkflowStep};
pub use summary::InstructionSummary;
