//! Project inspection: directory trees, git and raw file access.

use std::fs;

use super::Workflow;
use crate::{
    error::{FsResultExt, Result, WorkflowError},
    git::{BranchList, Commit, DiffReport, Git, StatusReport},
    params::{GitBranch, GitDiff, GitLog, GitStatus, TreeDirectory},
    tree::{render_tree, TreeReport},
};

impl Workflow {
    /// Renders the tree of a directory relative to the project root.
    pub async fn tree_directory(&self, params: &TreeDirectory) -> Result<TreeReport> {
        let params = params.clone();
        self.blocking(move |this| {
            let target = this.resolve(&params.directory_path);
            let label = if params.directory_path.is_empty() {
                ".".to_string()
            } else {
                params.directory_path.clone()
            };
            render_tree(&target, &label, &params)
        })
        .await
    }

    pub async fn git_status(&self, params: &GitStatus) -> Result<StatusReport> {
        let params = params.clone();
        self.blocking(move |this| this.git().status(&params)).await
    }

    pub async fn git_log(&self, params: &GitLog) -> Result<Vec<Commit>> {
        let params = params.clone();
        self.blocking(move |this| this.git().log(&params)).await
    }

    pub async fn git_branch(&self, params: &GitBranch) -> Result<BranchList> {
        let params = params.clone();
        self.blocking(move |this| this.git().branches(&params)).await
    }

    pub async fn git_diff(&self, params: &GitDiff) -> Result<DiffReport> {
        let params = params.clone();
        self.blocking(move |this| this.git().diff(&params)).await
    }

    /// Reads a text file inside the project root.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::NotFound` if the file does not exist and
    /// `WorkflowError::InvalidInput` if it resolves outside the project root.
    pub async fn read_project_file(&self, path: &str) -> Result<String> {
        let path = path.to_string();
        self.blocking(move |this| {
            let target = this.resolve(&path);
            if !target.is_file() {
                return Err(WorkflowError::NotFound {
                    kind: "File",
                    id: path,
                });
            }
            let canonical = target.canonicalize().fs_context(&target)?;
            if !canonical.starts_with(&this.root) {
                return Err(WorkflowError::invalid_input("path")
                    .with_reason(format!("'{path}' is outside the project root")));
            }
            fs::read_to_string(&canonical).fs_context(&canonical)
        })
        .await
    }

    fn git(&self) -> Git<'_> {
        Git::new(self.runner.as_ref(), &self.root)
    }
}
