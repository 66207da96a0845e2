//! Execution steps: resolving a step into an action and performing it.
//!
//! The stored step `type` together with the caller's
//! [`ExecutionDetails`] resolve into a [`StepAction`]. Validation problems
//! resolve into [`StepAction::Reject`] so that every outcome, including bad
//! input, is recorded on the step like any other failure.

use std::fs;
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::{resolve_against, Workflow};
use crate::{
    error::{Result, WorkflowError},
    models::{
        Artifact, ArtifactAction, Instruction, InstructionStatus, StepResult, StepStatus,
        WorkflowStep,
    },
    params::{ExecuteStep, ExecutionDetails, Patch},
    runner::CommandRunner,
};

/// Supported package managers for dependency installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Npm,
    Pip,
}

impl PackageManager {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "npm" => Some(PackageManager::Npm),
            "pip" => Some(PackageManager::Pip),
            _ => None,
        }
    }

    /// Install command line for the given packages.
    pub fn install_command(&self, packages: &[String]) -> Vec<String> {
        let prefix: &[&str] = match self {
            PackageManager::Npm => &["npm", "install", "--save"],
            PackageManager::Pip => &["pip", "install"],
        };
        prefix
            .iter()
            .map(|s| s.to_string())
            .chain(packages.iter().cloned())
            .collect()
    }
}

/// How a file modification changes its target.
#[derive(Debug, Clone, PartialEq)]
pub enum FileEdit {
    /// Replace the whole file
    Overwrite(String),
    /// Apply patches in order to the current content
    Patches(Vec<Patch>),
}

/// A fully validated unit of work for one execution step.
#[derive(Debug, Clone, PartialEq)]
pub enum StepAction {
    CreateFile { path: String, content: String },
    ModifyFile { path: String, edit: FileEdit },
    RunCommand { argv: Vec<String> },
    InstallPackages { manager: PackageManager, packages: Vec<String> },
    /// Input that cannot be executed; carries the failure message
    Reject { error: String },
}

impl StepAction {
    /// Resolves a step type and its details into an action.
    pub fn parse(step_type: &str, details: &ExecutionDetails) -> Self {
        let file_path = details.file_path.clone().filter(|p| !p.is_empty());
        let content = details.content.clone().filter(|c| !c.is_empty());

        match step_type {
            "file_creation" => match (file_path, content) {
                (Some(path), Some(content)) => StepAction::CreateFile { path, content },
                _ => StepAction::reject("Missing file_path or content"),
            },
            "file_modification" => match file_path {
                Some(path) => {
                    let edit = match content {
                        Some(content) => FileEdit::Overwrite(content),
                        None => FileEdit::Patches(details.patches.clone()),
                    };
                    StepAction::ModifyFile { path, edit }
                }
                None => StepAction::reject("Missing file_path"),
            },
            "command_execution" => {
                let argv = details
                    .command
                    .as_ref()
                    .map(|command| command.argv())
                    .unwrap_or_default();
                if argv.is_empty() {
                    StepAction::reject("Missing command")
                } else {
                    StepAction::RunCommand { argv }
                }
            }
            "dependency_installation" => {
                if details.packages.is_empty() {
                    return StepAction::reject("No packages specified");
                }
                let name = details.package_manager.as_deref().unwrap_or("npm");
                match PackageManager::parse(name) {
                    Some(manager) => StepAction::InstallPackages {
                        manager,
                        packages: details.packages.clone(),
                    },
                    None => StepAction::reject(format!("Unsupported package manager: {name}")),
                }
            }
            other => StepAction::reject(format!("Unsupported step type: {other}")),
        }
    }

    fn reject(error: impl Into<String>) -> Self {
        StepAction::Reject {
            error: error.into(),
        }
    }

    /// Performs the action and completes `result` with its outcome.
    pub fn execute(
        &self,
        root: &Path,
        runner: &dyn CommandRunner,
        result: StepResult,
    ) -> StepResult {
        match self {
            StepAction::CreateFile { path, content } => {
                let target = resolve_against(root, path);
                let written = target
                    .parent()
                    .map_or(Ok(()), fs::create_dir_all)
                    .and_then(|()| fs::write(&target, content));
                match written {
                    Ok(()) => result
                        .succeeded(format!("File created: {path}"))
                        .with_artifact(Artifact::file(path, ArtifactAction::Created)),
                    Err(e) => result.failed(format!("Failed to create file: {path}: {e}")),
                }
            }
            StepAction::ModifyFile { path, edit } => {
                let target = resolve_against(root, path);
                if !target.is_file() {
                    return result.failed(format!("File not found: {path}"));
                }
                let updated = match edit {
                    FileEdit::Overwrite(content) => Ok(content.clone()),
                    FileEdit::Patches(patches) => {
                        fs::read_to_string(&target).map(|original| apply_patches(original, patches))
                    }
                };
                match updated.and_then(|content| fs::write(&target, content)) {
                    Ok(()) => result
                        .succeeded(format!("File modified: {path}"))
                        .with_artifact(Artifact::file(path, ArtifactAction::Modified)),
                    Err(e) => result.failed(format!("Failed to modify file: {path}: {e}")),
                }
            }
            StepAction::RunCommand { argv } => run_into(runner, argv, root, result),
            StepAction::InstallPackages { manager, packages } => {
                run_into(runner, &manager.install_command(packages), root, result)
            }
            StepAction::Reject { error } => result.failed(error.clone()),
        }
    }
}

fn run_into(
    runner: &dyn CommandRunner,
    argv: &[String],
    cwd: &Path,
    mut result: StepResult,
) -> StepResult {
    let output = runner.run(argv, cwd);
    result.success = output.success;
    result.output = Some(output.stdout);
    if !output.success {
        result.error = Some(output.stderr);
    }
    result
}

/// Applies patches in order; each patch sees the previous one's result.
///
/// Offsets are character offsets clamped to the current content length.
/// Replacements and insertions with empty text are skipped.
pub fn apply_patches(mut content: String, patches: &[Patch]) -> String {
    for patch in patches {
        match patch {
            Patch::Replace { old_text, new_text } => {
                if !old_text.is_empty() && !new_text.is_empty() {
                    content = content.replace(old_text.as_str(), new_text);
                }
            }
            Patch::Insert { position, text } => {
                if !text.is_empty() {
                    let at = byte_offset(&content, *position);
                    content.insert_str(at, text);
                }
            }
            Patch::Delete { start, end } => {
                let from = byte_offset(&content, *start);
                let to = byte_offset(&content, *end).max(from);
                content.replace_range(from..to, "");
            }
        }
    }
    content
}

fn byte_offset(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map_or(text.len(), |(index, _)| index)
}

/// Outcome of [`Workflow::execute_step`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepExecution {
    pub instruction: Instruction,
    pub result: StepResult,
}

impl Workflow {
    /// Executes one step of the execution plan and records its result.
    ///
    /// Step failures are reported through [`StepResult::success`], not as
    /// errors; the failed result is still persisted on the step.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::PreconditionFailed` if there is no execution plan
    /// Returns `WorkflowError::NotFound` if the step id is not in the plan
    pub async fn execute_step(&self, params: &ExecuteStep) -> Result<StepExecution> {
        let params = params.clone();
        self.blocking(move |this| this.execute_step_blocking(params))
            .await
    }

    fn execute_step_blocking(&self, params: ExecuteStep) -> Result<StepExecution> {
        let mut instruction = self.store.load(&params.instruction_id)?;
        let Some(plan) = instruction.execution_plan.as_mut() else {
            return Err(WorkflowError::precondition(
                "No execution plan found. Complete analysis and orchestration first.",
            ));
        };
        let index = plan
            .position(&params.step_id)
            .ok_or_else(|| WorkflowError::step_not_found(&params.step_id))?;

        let step = &mut plan.steps[index];
        let action = StepAction::parse(&step.step_type, &params.execution_details);
        let result = action.execute(
            &self.root,
            self.runner.as_ref(),
            StepResult::new(&step.id, &step.step_type),
        );

        if result.success {
            info!("Step {} of instruction {} completed", step.id, instruction.id);
        } else {
            warn!(
                "Step {} of instruction {} failed: {}",
                step.id,
                instruction.id,
                result.message()
            );
        }
        step.status = if result.success {
            StepStatus::Completed
        } else {
            StepStatus::Failed
        };
        step.result = Some(result.clone());

        if result.success && plan.current_step == index {
            plan.current_step += 1;
        }
        if plan.all_completed() {
            instruction.status = InstructionStatus::Completed;
        }
        instruction.workflow_step = WorkflowStep::ResultSynthesis;

        self.store.commit(&mut instruction)?;
        Ok(StepExecution {
            instruction,
            result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::CommandSpec;

    fn details() -> ExecutionDetails {
        ExecutionDetails::default()
    }

    #[test]
    fn test_replace_patch_hits_every_occurrence() {
        let patched = apply_patches(
            "foo bar foo".to_string(),
            &[Patch::Replace {
                old_text: "foo".to_string(),
                new_text: "baz".to_string(),
            }],
        );
        assert_eq!(patched, "baz bar baz");
    }

    #[test]
    fn test_patches_apply_sequentially() {
        let patched = apply_patches(
            "hello world".to_string(),
            &[
                Patch::Insert {
                    position: 5,
                    text: ",".to_string(),
                },
                Patch::Delete { start: 0, end: 1 },
                Patch::Insert {
                    position: 0,
                    text: "J".to_string(),
                },
            ],
        );
        assert_eq!(patched, "Jello, world");
    }

    #[test]
    fn test_patch_offsets_are_characters_and_clamped() {
        let patched = apply_patches(
            "héllo".to_string(),
            &[
                Patch::Delete { start: 1, end: 2 },
                Patch::Insert {
                    position: 99,
                    text: "!".to_string(),
                },
                Patch::Delete { start: 3, end: 1 },
            ],
        );
        assert_eq!(patched, "hllo!");
    }

    #[test]
    fn test_empty_texts_are_skipped() {
        let patched = apply_patches(
            "abc".to_string(),
            &[
                Patch::Replace {
                    old_text: "a".to_string(),
                    new_text: String::new(),
                },
                Patch::Insert {
                    position: 0,
                    text: String::new(),
                },
            ],
        );
        assert_eq!(patched, "abc");
    }

    #[test]
    fn test_parse_validates_required_fields() {
        assert_eq!(
            StepAction::parse("file_creation", &details()),
            StepAction::Reject {
                error: "Missing file_path or content".to_string()
            }
        );
        assert_eq!(
            StepAction::parse("command_execution", &details()),
            StepAction::Reject {
                error: "Missing command".to_string()
            }
        );
        assert_eq!(
            StepAction::parse("dependency_installation", &details()),
            StepAction::Reject {
                error: "No packages specified".to_string()
            }
        );
        assert_eq!(
            StepAction::parse("deploy", &details()),
            StepAction::Reject {
                error: "Unsupported step type: deploy".to_string()
            }
        );
    }

    #[test]
    fn test_parse_package_managers() {
        let mut install = details();
        install.packages = vec!["requests".to_string()];
        install.package_manager = Some("pip".to_string());
        match StepAction::parse("dependency_installation", &install) {
            StepAction::InstallPackages { manager, packages } => {
                assert_eq!(
                    manager.install_command(&packages),
                    vec!["pip", "install", "requests"]
                );
            }
            other => panic!("unexpected action: {other:?}"),
        }

        install.package_manager = None;
        match StepAction::parse("dependency_installation", &install) {
            StepAction::InstallPackages { manager, packages } => {
                assert_eq!(
                    manager.install_command(&packages),
                    vec!["npm", "install", "--save", "requests"]
                );
            }
            other => panic!("unexpected action: {other:?}"),
        }

        install.package_manager = Some("cargo".to_string());
        assert_eq!(
            StepAction::parse("dependency_installation", &install),
            StepAction::Reject {
                error: "Unsupported package manager: cargo".to_string()
            }
        );
    }

    #[test]
    fn test_parse_command_line_is_split() {
        let mut run = details();
        run.command = Some(CommandSpec::Line("cargo  test --all".to_string()));
        assert_eq!(
            StepAction::parse("command_execution", &run),
            StepAction::RunCommand {
                argv: vec!["cargo".to_string(), "test".to_string(), "--all".to_string()]
            }
        );
    }

    #[test]
    fn test_modification_prefers_full_content() {
        let mut modify = details();
        modify.file_path = Some("a.txt".to_string());
        modify.content = Some("new".to_string());
        modify.patches = vec![Patch::Delete { start: 0, end: 1 }];
        assert_eq!(
            StepAction::parse("file_modification", &modify),
            StepAction::ModifyFile {
                path: "a.txt".to_string(),
                edit: FileEdit::Overwrite("new".to_string())
            }
        );
    }
}
