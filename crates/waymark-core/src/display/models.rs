//! Display implementations for domain models.
//!
//! Everything renders as markdown so the CLI can hand it to the terminal
//! renderer unchanged.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::{
    git::{BranchKind, BranchList, DiffReport, StatusReport},
    models::{
        ArtifactAction, ExecutionPlan, FinalReport, GatheredInformation, Instruction, InstructionStatus,
        InstructionSummary, Priority, SourceContent, StepStatus, TaskPlan, WorkflowStep,
    },
    tree::{format_size, TreeReport},
};

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for InstructionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {} ({})", self.title, self.id)?;
        writeln!(f)?;
        writeln!(f, "- Status: {}", self.status)?;
        writeln!(f, "- Phase: {}", self.workflow_step)?;
        writeln!(f, "- Priority: {}", self.priority)?;
        writeln!(f, "- Created: {}", LocalDateTime(self.created_at))?;

        if !self.description.is_empty() {
            writeln!(f)?;
            writeln!(f, "{}", self.description)?;
        }
        if !self.goal.is_empty() {
            writeln!(f)?;
            writeln!(f, "**Goal**: {}", self.goal)?;
        }

        if let Some(plan) = &self.task_plan {
            write!(f, "{plan}")?;
        }
        if let Some(info) = &self.gathered_information {
            write!(f, "{info}")?;
        }
        if let Some(plan) = &self.execution_plan {
            write!(f, "{plan}")?;
        }
        if let Some(report) = &self.final_report {
            writeln!(f)?;
            writeln!(
                f,
                "Final report generated {}.",
                LocalDateTime(report.completed_at)
            )?;
        }

        Ok(())
    }
}

impl fmt::Display for TaskPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n## Task Plan")?;
        writeln!(f)?;
        for subtask in &self.subtasks {
            write!(f, "- **{}** {}", subtask.id, subtask.title)?;
            write!(f, " (complexity {})", subtask.complexity)?;
            if let Some(deps) = subtask.dependencies.as_ref().filter(|d| !d.is_empty()) {
                write!(f, ", depends on {}", deps.join(", "))?;
            }
            writeln!(f)?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "Estimated complexity: {:.2} across {} subtasks",
            self.estimated_complexity, self.total_subtasks
        )
    }
}

impl fmt::Display for GatheredInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n## Gathered Information")?;
        writeln!(f)?;
        for source in &self.sources {
            let kind = source.source_type.as_deref().unwrap_or("unknown");
            let target = if source.source_path.is_empty() {
                &source.source_query
            } else {
                &source.source_path
            };
            if source.success {
                let detail = match &source.content {
                    Some(SourceContent::Text(text)) => format!("{} lines", text.lines().count()),
                    Some(SourceContent::Entries(entries)) => format!("{} entries", entries.len()),
                    Some(SourceContent::Matches(matches)) => format!("{} matches", matches.len()),
                    None => String::new(),
                };
                writeln!(f, "- {kind} `{target}`: {detail}")?;
            } else {
                let error = source.error.as_deref().unwrap_or("failed");
                writeln!(f, "- {kind} `{target}`: {error}")?;
            }
        }
        writeln!(f)?;
        writeln!(
            f,
            "{}/{} sources succeeded",
            self.summary.successful_sources, self.summary.total_sources
        )?;
        if self.summary.skipped_files > 0 {
            writeln!(f, "{} unreadable files skipped", self.summary.skipped_files)?;
        }
        Ok(())
    }
}

impl fmt::Display for ExecutionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let completed = self
            .steps
            .iter()
            .filter(|step| step.status == StepStatus::Completed)
            .count();
        writeln!(
            f,
            "\n## Execution Plan ({completed}/{} completed)",
            self.total_steps
        )?;

        for step in &self.steps {
            writeln!(f)?;
            writeln!(
                f,
                "### {}. {} ({})",
                step.id,
                step.title,
                step.status.with_icon()
            )?;
            writeln!(f)?;
            writeln!(f, "- Type: {}", step.step_type)?;
            if let Some(result) = &step.result {
                let message = result.message();
                if !message.trim().is_empty() {
                    writeln!(f, "- Result: {}", message.trim())?;
                }
                for artifact in &result.artifacts {
                    writeln!(f, "- Artifact: `{}`", artifact.path)?;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for InstructionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let progress = if self.total_steps > 0 {
            format!(" ({}/{})", self.completed_steps, self.total_steps)
        } else {
            String::new()
        };

        writeln!(f, "## {} (ID: {}){progress}", self.title, self.id)?;
        writeln!(f)?;
        writeln!(f, "- **Status**: {}", self.status)?;
        writeln!(f, "- **Phase**: {}", self.workflow_step)?;
        writeln!(f, "- **Priority**: {}", self.priority)?;
        writeln!(f, "- **Created**: {}", LocalDateTime(self.created_at))?;
        writeln!(f)
    }
}

impl fmt::Display for FinalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Final Report: {} ({})", self.title, self.instruction_id)?;
        writeln!(f)?;
        writeln!(f, "- Status: {}", self.status)?;
        writeln!(f, "- Created: {}", LocalDateTime(self.created_at))?;
        writeln!(f, "- Completed: {}", LocalDateTime(self.completed_at))?;
        let phases: Vec<&str> = self
            .workflow_steps_completed
            .iter()
            .map(WorkflowStep::as_str)
            .collect();
        writeln!(f, "- Phases: {}", phases.join(" → "))?;

        writeln!(f, "\n## Summary")?;
        writeln!(f)?;
        writeln!(f, "- Planned subtasks: {}", self.summary.planned_subtasks)?;
        writeln!(f, "- Executed steps: {}", self.summary.executed_steps)?;
        writeln!(f, "- Successful steps: {}", self.summary.successful_steps)?;

        if !self.summary.artifacts.is_empty() {
            writeln!(f, "\n## Artifacts")?;
            writeln!(f)?;
            for artifact in &self.summary.artifacts {
                let action = match artifact.action {
                    ArtifactAction::Created => "created",
                    ArtifactAction::Modified => "modified",
                };
                writeln!(f, "- `{}` ({action})", artifact.path)?;
            }
        }

        if let Some(details) = &self.details {
            let steps = &details.result_synthesis.executed_steps;
            if !steps.is_empty() {
                writeln!(f, "\n## Executed Steps")?;
                writeln!(f)?;
                for step in steps {
                    writeln!(
                        f,
                        "- **{}** {} ({})",
                        step.id,
                        step.title,
                        step.status.with_icon()
                    )?;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for TreeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "```text")?;
        writeln!(f, "{}", self.tree)?;
        writeln!(f, "```")?;
        writeln!(f)?;
        writeln!(
            f,
            "{} directories, {} files, {} total, {} excluded",
            self.stats.directories,
            self.stats.files,
            format_size(self.stats.total_size),
            self.stats.excluded_items
        )
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# On branch {}", self.branch)?;
        writeln!(f)?;
        if self.is_clean {
            return writeln!(f, "Working tree clean.");
        }

        match &self.changes {
            Some(changes) => {
                if !changes.staged.is_empty() {
                    writeln!(f, "## Staged")?;
                    writeln!(f)?;
                    for change in &changes.staged {
                        writeln!(f, "- {} `{}`", change.status, change.file)?;
                    }
                    writeln!(f)?;
                }
                if !changes.not_staged.is_empty() {
                    writeln!(f, "## Not staged")?;
                    writeln!(f)?;
                    for change in &changes.not_staged {
                        writeln!(f, "- {} `{}`", change.status, change.file)?;
                    }
                    writeln!(f)?;
                }
                if !changes.untracked.is_empty() {
                    writeln!(f, "## Untracked")?;
                    writeln!(f)?;
                    for file in &changes.untracked {
                        writeln!(f, "- `{}`", file.file)?;
                    }
                }
                Ok(())
            }
            None => {
                writeln!(f, "- Staged: {}", self.counts.staged)?;
                writeln!(f, "- Not staged: {}", self.counts.not_staged)?;
                writeln!(f, "- Untracked: {}", self.counts.untracked)
            }
        }
    }
}

impl fmt::Display for BranchList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for branch in &self.branches {
            let marker = if branch.is_current { "* " } else { "" };
            let kind = match branch.kind {
                BranchKind::Local => "",
                BranchKind::Remote => " (remote)",
            };
            writeln!(f, "- {marker}{}{kind}", branch.name)?;
        }
        if self.branches.is_empty() {
            writeln!(f, "No branches found.")?;
        }
        Ok(())
    }
}

impl fmt::Display for DiffReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.files_changed.is_empty() {
            return writeln!(f, "No changes.");
        }
        for file in &self.files_changed {
            writeln!(
                f,
                "## {} (+{} -{})",
                file.new_file, file.changes.insertions, file.changes.deletions
            )?;
            writeln!(f)?;
            writeln!(f, "```diff")?;
            for hunk in &file.hunks {
                writeln!(f, "{}", hunk.header)?;
                for line in &hunk.lines {
                    writeln!(f, "{line}")?;
                }
            }
            writeln!(f, "```")?;
            writeln!(f)?;
        }
        Ok(())
    }
}
