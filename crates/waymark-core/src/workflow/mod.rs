//! The instruction state machine.
//!
//! [`Workflow`] is the single entry point for every operation an interface
//! layer can invoke. Each call loads the instruction document, validates the
//! data earlier phases were expected to produce, mutates the document and
//! commits it back through the [`InstructionStore`].
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   Interfaces    │    │    Workflow     │    │     Storage     │
//! │   (CLI, MCP)    │───▶│ (phase ops,     │───▶│ (store, runner, │
//! │                 │    │  tree, git)     │    │  filesystem)    │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Submodules
//!
//! - [`builder`]: configures project root, state directory and runner
//! - `instruction_ops`: create, get, list and the feature kickoff
//! - `plan_ops`: task planning and analysis/orchestration
//! - [`gather`]: information sources and their collection
//! - [`execute`]: execution step actions
//! - `report_ops`: final report synthesis
//! - `project_ops`: directory tree and git inspection
//!
//! Every public method is async; blocking filesystem and process work runs
//! on the tokio blocking pool.
//!
//! # Usage
//!
//! ```rust
//! use waymark_core::{WorkflowBuilder, params::CreateInstruction};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let workflow = WorkflowBuilder::new()
//!     .with_project_root(Some("/path/to/project"))
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
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use jiff::Timestamp;
use tokio::task;

use crate::{
    error::{Result, WorkflowError},
    runner::CommandRunner,
    store::InstructionStore,
};

pub mod builder;
pub mod execute;
pub mod gather;
mod instruction_ops;
mod plan_ops;
mod project_ops;
mod report_ops;


pub use builder::WorkflowBuilder;
pub use execute::{StepAction, StepExecution};
pub use gather::SourceRequest;
pub use instruction_ops::{FeatureKickoff, NEXT_STEPS};

/// Main workflow interface bound to one project root.
#[derive(Clone)]
pub struct Workflow {
    pub(crate) root: PathBuf,
    pub(crate) store: InstructionStore,
    pub(crate) runner: Arc<dyn CommandRunner>,
}

impl Workflow {
    pub(crate) fn new(
        root: PathBuf,
        store: InstructionStore,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            root,
            store,
            runner,
        }
    }

    /// Directory all relative paths resolve against.
    pub fn project_root(&self) -> &Path {
        &self.root
    }

    pub fn store(&self) -> &InstructionStore {
        &self.store
    }

    /// Resolves a caller path against the project root.
    pub(crate) fn resolve(&self, path: &str) -> PathBuf {
        resolve_against(&self.root, path)
    }

    /// Runs `f` on the blocking pool with a clone of this workflow.
    pub(crate) async fn blocking<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(Workflow) -> Result<T> + Send + 'static,
    {
        let this = self.clone();
        task::spawn_blocking(move || f(this))
            .await
            .map_err(|e| WorkflowError::Configuration {
                message: format!("Task join error: {e}"),
            })?
    }
}

impl std::fmt::Debug for Workflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workflow")
            .field("root", &self.root)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

pub(crate) fn resolve_against(root: &Path, path: &str) -> PathBuf {
    let candidate = Path::new(path);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        root.join(candidate)
    }
}

/// Current time in epoch seconds.
pub(crate) fn now() -> i64 {
    Timestamp::now().as_second()
}
