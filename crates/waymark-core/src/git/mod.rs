//! Read-only git inspection.
//!
//! Each operation runs one fixed `git` command line through a
//! [`CommandRunner`] and parses its stdout. Parsing is line oriented; lines
//! in an unrecognized format are dropped.

use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, WorkflowError},
    params::{GitBranch, GitDiff, GitLog, GitStatus},
    runner::CommandRunner,
};

mod parse;

pub use parse::{parse_branches, parse_diff, parse_log, parse_status, RECORD_SEP, UNIT_SEP};

/// A path with a one-letter porcelain status code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileChange {
    pub status: String,
    pub file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UntrackedFile {
    pub file: String,
}

/// Working tree changes grouped the way `git status` reports them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusChanges {
    pub staged: Vec<FileChange>,
    pub not_staged: Vec<FileChange>,
    pub untracked: Vec<UntrackedFile>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChangeCounts {
    pub staged: usize,
    pub not_staged: usize,
    pub untracked: usize,
}

impl From<&StatusChanges> for ChangeCounts {
    fn from(changes: &StatusChanges) -> Self {
        Self {
            staged: changes.staged.len(),
            not_staged: changes.not_staged.len(),
            untracked: changes.untracked.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusReport {
    pub branch: String,
    pub is_clean: bool,
    pub counts: ChangeCounts,
    /// Per-file lists, present only for detailed requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes: Option<StatusChanges>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Commit {
    pub hash: String,
    pub author_name: String,
    pub author_email: String,
    pub date: String,
    pub message: String,
    /// `--stat` lines, empty unless requested
    #[serde(default)]
    pub stats: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BranchKind {
    Local,
    Remote,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Branch {
    pub name: String,
    pub is_current: bool,
    #[serde(rename = "type")]
    pub kind: BranchKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BranchList {
    pub current_branch: Option<String>,
    pub branches: Vec<Branch>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineCounts {
    pub insertions: usize,
    pub deletions: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Hunk {
    pub header: String,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileDiff {
    pub old_file: String,
    pub new_file: String,
    pub changes: LineCounts,
    pub hunks: Vec<Hunk>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiffReport {
    pub files_changed: Vec<FileDiff>,
}

/// Git commands run in one working directory.
pub struct Git<'a> {
    runner: &'a dyn CommandRunner,
    workdir: &'a Path,
}

impl<'a> Git<'a> {
    pub fn new(runner: &'a dyn CommandRunner, workdir: &'a Path) -> Self {
        Self { runner, workdir }
    }

    pub fn status(&self, params: &GitStatus) -> Result<StatusReport> {
        let out = self.run_capture(&["status", "--porcelain=v1", "-b"])?;
        let (branch, changes) = parse_status(&out);
        let counts = ChangeCounts::from(&changes);
        Ok(StatusReport {
            branch,
            is_clean: counts.staged + counts.not_staged + counts.untracked == 0,
            counts,
            changes: params.detailed.then_some(changes),
        })
    }

    pub fn log(&self, params: &GitLog) -> Result<Vec<Commit>> {
        let count = format!("-n{}", params.count);
        let format = format!("--format={RECORD_SEP}%H{UNIT_SEP}%an{UNIT_SEP}%ae{UNIT_SEP}%aI{UNIT_SEP}%s");
        let mut args = vec!["log", count.as_str(), format.as_str()];
        if params.show_stats {
            args.push("--stat");
        }
        let out = self.run_capture(&args)?;
        Ok(parse_log(&out))
    }

    pub fn branches(&self, params: &GitBranch) -> Result<BranchList> {
        let mut args = vec!["branch", "--no-color"];
        if params.remote {
            args.push("-a");
        }
        let out = self.run_capture(&args)?;
        Ok(parse_branches(&out))
    }

    pub fn diff(&self, params: &GitDiff) -> Result<DiffReport> {
        let mut args = vec!["diff", "--no-color"];
        if params.staged {
            args.push("--cached");
        }
        if let Some(path) = params.file_path.as_deref().filter(|p| !p.is_empty()) {
            args.push("--");
            args.push(path);
        }
        let out = self.run_capture(&args)?;
        Ok(DiffReport {
            files_changed: parse_diff(&out),
        })
    }

    fn run_capture(&self, args: &[&str]) -> Result<String> {
        let argv: Vec<String> = std::iter::once("git")
            .chain(args.iter().copied())
            .map(str::to_string)
            .collect();
        let output = self.runner.run(&argv, self.workdir);
        if !output.success {
            let message = if output.stderr.trim().is_empty() {
                output.stdout.trim().to_string()
            } else {
                output.stderr.trim().to_string()
            };
            return Err(WorkflowError::ExternalCommand {
                command: argv.join(" "),
                message,
            });
        }
        debug!("{} produced {} bytes", argv.join(" "), output.stdout.len());
        Ok(output.stdout)
    }
}
