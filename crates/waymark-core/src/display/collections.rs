//! Collection wrapper types for displaying groups of domain objects.

use std::{fmt, ops::Index};

use crate::{git::Commit, models::InstructionSummary};

/// Newtype wrapper for displaying a list of instruction summaries.
///
/// # Examples
///
/// ```rust
/// use waymark_core::{
///     display::InstructionSummaries,
///     models::{InstructionStatus, InstructionSummary, Priority, WorkflowStep},
/// };
///
/// let summary = InstructionSummary {
///     id: "a1b2c3d4".to_string(),
///     title: "Add dark mode".to_string(),
///     priority: Priority::High,
///     status: InstructionStatus::Planned,
///     workflow_step: WorkflowStep::TaskPlanning,
///     created_at: 1_700_000_000,
///     total_steps: 0,
///     completed_steps: 0,
/// };
///
/// let output = InstructionSummaries(vec![summary]).to_string();
/// assert!(output.contains("Add dark mode (ID: a1b2c3d4)"));
/// ```
pub struct InstructionSummaries(pub Vec<InstructionSummary>);

impl InstructionSummaries {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, index: usize) -> Option<&InstructionSummary> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, InstructionSummary> {
        self.0.iter()
    }
}

impl Index<usize> for InstructionSummaries {
    type Output = InstructionSummary;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IntoIterator for InstructionSummaries {
    type Item = InstructionSummary;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a InstructionSummaries {
    type Item = &'a InstructionSummary;
    type IntoIter = std::slice::Iter<'a, InstructionSummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for InstructionSummaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No instructions found.");
        }
        for summary in &self.0 {
            write!(f, "{summary}")?;
        }
        Ok(())
    }
}

/// Newtype wrapper for displaying commit history.
pub struct Commits(pub Vec<Commit>);

impl fmt::Display for Commits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No commits found.");
        }
        for commit in &self.0 {
            let short = commit.hash.get(..7).unwrap_or(&commit.hash);
            writeln!(f, "## {short} {}", commit.message)?;
            writeln!(f)?;
            writeln!(
                f,
                "- **Author**: {} <{}>",
                commit.author_name, commit.author_email
            )?;
            writeln!(f, "- **Date**: {}", commit.date)?;
            if !commit.stats.is_empty() {
                writeln!(f)?;
                writeln!(f, "```text")?;
                for line in &commit.stats {
                    writeln!(f, "{line}")?;
                }
                writeln!(f, "```")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
