//! Core library for the Waymark development workflow.
//!
//! An *instruction* moves through five phases, each recorded on a single JSON
//! document under `<project-root>/.state/instructions`:
//!
//! ```text
//! create ──▶ plan ──▶ gather ──▶ analyze ──▶ execute_step* ──▶ report
//! ```
//!
//! Alongside the workflow the crate renders directory trees and wraps a few
//! read-only git commands, all rooted at the same project directory.
//!
//! - [`workflow`]: the [`Workflow`] state machine and its builder
//! - [`store`]: atomic JSON persistence with revision checks
//! - [`runner`]: the [`CommandRunner`] process boundary
//! - [`tree`] and [`git`]: project inspection
//! - [`display`]: markdown rendering of every result type
//! - [`response`]: the uniform `{success, message, ...}` envelope
//!
//! # Quick Start
//!
//! ```rust
//! use waymark_core::{
//!     WorkflowBuilder,
//!     params::{CreateInstruction, CreateTaskPlan, SubtaskSpec},
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let workflow = WorkflowBuilder::new()
//!     .with_project_root(Some("."))
//!     .build()
//!     .await?;
//!
//! let instruction = workflow
//!     .create_instruction(&CreateInstruction {
//!         title: "Add dark mode".to_string(),
//!         description: "Theme toggle in the header".to_string(),
//!         goal: "Users can switch themes".to_string(),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! let planned = workflow
//!     .create_task_plan(&CreateTaskPlan {
//!         instruction_id: instruction.id.clone(),
//!         subtasks: vec![SubtaskSpec {
//!             title: "Add toggle component".to_string(),
//!             complexity: Some(2.0),
//!             ..Default::default()
//!         }],
//!     })
//!     .await?;
//! println!("{planned}");
//! # Ok(())
//! # }
//! ```

pub mod display;
pub mod error;
pub mod git;
pub mod models;
pub mod params;
pub mod response;
pub mod runner;
pub mod store;
pub mod tree;
pub mod workflow;

pub use display::{
    Commits, CreateResult, InstructionSummaries, LocalDateTime, OperationStatus, StepOutcome,
};
pub use error::{Result, WorkflowError};
pub use models::{
    Instruction, InstructionStatus, InstructionSummary, Priority, StepStatus, WorkflowStep,
};
pub use response::ToolResponse;
pub use runner::{CommandOutput, CommandRunner, SystemRunner};
pub use store::InstructionStore;
pub use tree::{TreeReport, TreeStats};
pub use workflow::{FeatureKickoff, StepExecution, Workflow, WorkflowBuilder};
