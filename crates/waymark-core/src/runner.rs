//! External process execution.
//!
//! Workflow steps, command sources and git wrappers all go through the
//! [`CommandRunner`] trait, so tests can substitute a scripted runner for
//! real child processes.

use std::path::Path;
use std::process::{Command, Stdio};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Captured result of running one command.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    /// Process exit code, `-1` when the process never ran or was killed
    pub exit_code: i32,
}

impl CommandOutput {
    /// Output for a command that could not be started.
    pub fn spawn_failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: message.into(),
            exit_code: -1,
        }
    }
}

/// Runs an argument vector and reports what happened.
///
/// Implementations never fail: spawn errors are folded into the returned
/// [`CommandOutput`].
pub trait CommandRunner: Send + Sync {
    fn run(&self, argv: &[String], cwd: &Path) -> CommandOutput;
}

/// Runner backed by real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, argv: &[String], cwd: &Path) -> CommandOutput {
        let Some((program, args)) = argv.split_first() else {
            return CommandOutput::spawn_failure("Empty command");
        };

        debug!("Running {} in {}", argv.join(" "), cwd.display());
        let output = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .output();

        match output {
            Ok(output) => {
                let exit_code = output.status.code().unwrap_or(-1);
                debug!("{program} exited with code {exit_code}");
                CommandOutput {
                    success: output.status.success(),
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                    exit_code,
                }
            }
            Err(e) => {
                warn!("Failed to spawn {program}: {e}");
                CommandOutput::spawn_failure(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_command_never_runs() {
        let temp_dir = TempDir::new().unwrap();
        let output = SystemRunner.run(&[], temp_dir.path());
        assert!(!output.success);
        assert_eq!(output.exit_code, -1);
        assert_eq!(output.stderr, "Empty command");
    }

    #[test]
    fn test_missing_program_is_spawn_failure() {
        let temp_dir = TempDir::new().unwrap();
        let output = SystemRunner.run(
            &argv(&["waymark-definitely-not-a-program"]),
            temp_dir.path(),
        );
        assert!(!output.success);
        assert_eq!(output.exit_code, -1);
        assert!(!output.stderr.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_captures_stdout_and_exit_code() {
        let temp_dir = TempDir::new().unwrap();
        let output = SystemRunner.run(&argv(&["echo", "hello"]), temp_dir.path());
        assert!(output.success);
        assert_eq!(output.exit_code, 0);
        assert_eq!(output.stdout.trim(), "hello");

        let output = SystemRunner.run(&argv(&["false"]), temp_dir.path());
        assert!(!output.success);
        assert_eq!(output.exit_code, 1);
    }
}
