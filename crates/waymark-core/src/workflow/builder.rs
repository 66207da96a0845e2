//! Builder for creating and configuring Workflow instances.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::debug;
use tokio::task;

use super::Workflow;
use crate::{
    error::{FsResultExt, Result, ResultExt, WorkflowError},
    runner::{CommandRunner, SystemRunner},
    store::InstructionStore,
};

/// Builder for creating and configuring Workflow instances.
#[derive(Clone, Default)]
pub struct WorkflowBuilder {
    project_root: Option<PathBuf>,
    state_dir: Option<PathBuf>,
    runner: Option<Arc<dyn CommandRunner>>,
}

impl WorkflowBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the project root.
    ///
    /// If not specified, the current working directory is used.
    pub fn with_project_root<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.project_root = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Overrides where instruction documents are stored.
    ///
    /// Defaults to `<project-root>/.state/instructions`.
    pub fn with_state_dir<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.state_dir = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Replaces the process runner used by command steps, command sources
    /// and git operations.
    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = Some(runner);
        self
    }

    /// Builds the configured workflow instance.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::NotFound` if the project root is not a directory
    /// Returns `WorkflowError::FileSystem` if the state directory cannot be created
    pub async fn build(self) -> Result<Workflow> {
        let root = match self.project_root {
            Some(path) => path,
            None => std::env::current_dir().with_context("Cannot determine current directory")?,
        };

        let (root, state_dir) = task::spawn_blocking(move || {
            if !root.is_dir() {
                return Err(WorkflowError::path_not_found(&root));
            }
            let root = root.canonicalize().fs_context(&root)?;
            let state_dir = match self.state_dir {
                Some(dir) if dir.is_absolute() => dir,
                Some(dir) => root.join(dir),
                None => InstructionStore::for_project(&root).dir().to_path_buf(),
            };
            std::fs::create_dir_all(&state_dir).fs_context(&state_dir)?;
            Ok::<_, WorkflowError>((root, state_dir))
        })
        .await
        .map_err(|e| WorkflowError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        debug!(
            "Workflow rooted at {} (state in {})",
            root.display(),
            state_dir.display()
        );

        let runner = self.runner.unwrap_or_else(|| Arc::new(SystemRunner));
        Ok(Workflow::new(root, InstructionStore::new(state_dir), runner))
    }
}
