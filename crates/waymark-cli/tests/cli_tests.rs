use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper function to create a temporary project directory for CLI tests
fn create_cli_test_environment() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Helper function to create a Command rooted at `project` without colors
fn waymark_cmd(project: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("waymark").expect("Failed to find waymark binary");
    cmd.arg("--no-color")
        .arg("--project-root")
        .arg(project.path())
        .env_remove("WAYMARK_PROJECT_ROOT");
    cmd
}

fn extract_id_from_output(output: &str) -> String {
    output
        .lines()
        .find_map(|line| line.strip_prefix("Created instruction with ID: "))
        .expect("No instruction ID in output")
        .trim()
        .to_string()
}

fn create_instruction(project: &TempDir, title: &str) -> String {
    let output = waymark_cmd(project)
        .args(["instruction", "create", title, "--goal", "Ship it"])
        .output()
        .expect("Failed to run waymark");
    assert!(output.status.success());
    extract_id_from_output(&String::from_utf8_lossy(&output.stdout))
}

#[test]
fn test_cli_help_output() {
    let project = create_cli_test_environment();
    waymark_cmd(&project)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("instruction"))
        .stdout(predicate::str::contains("tree"))
        .stdout(predicate::str::contains("git"))
        .stdout(predicate::str::contains("serve"));
}

#[test]
fn test_cli_version_output() {
    let project = create_cli_test_environment();
    waymark_cmd(&project)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("waymark"));
}

#[test]
fn test_cli_list_empty_instructions() {
    let project = create_cli_test_environment();
    waymark_cmd(&project)
        .args(["instruction", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No instructions found."));
}

#[test]
fn test_cli_no_command_lists_instructions() {
    let project = create_cli_test_environment();
    create_instruction(&project, "Default listing");

    waymark_cmd(&project)
        .assert()
        .success()
        .stdout(predicate::str::contains("# Instructions"))
        .stdout(predicate::str::contains("Default listing"));
}

#[test]
fn test_cli_create_instruction() {
    let project = create_cli_test_environment();
    waymark_cmd(&project)
        .args([
            "instruction",
            "create",
            "Add dark mode",
            "--description",
            "Theme toggle in the header",
            "--priority",
            "high",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created instruction with ID:"))
        .stdout(predicate::str::contains("# Add dark mode"))
        .stdout(predicate::str::contains("- Priority: high"))
        .stdout(predicate::str::contains("- Status: created"))
        .stdout(predicate::str::contains("Theme toggle in the header"));

    assert!(project.path().join(".state/instructions").is_dir());
}

#[test]
fn test_cli_rejects_unknown_priority() {
    let project = create_cli_test_environment();
    waymark_cmd(&project)
        .args(["instruction", "create", "Title", "--priority", "urgent"])
        .assert()
        .failure();
}

#[test]
fn test_cli_show_instruction() {
    let project = create_cli_test_environment();
    let id = create_instruction(&project, "Show me");

    waymark_cmd(&project)
        .args(["instruction", "show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("# Show me ({id})")))
        .stdout(predicate::str::contains("**Goal**: Ship it"));
}

#[test]
fn test_cli_invalid_instruction_id() {
    let project = create_cli_test_environment();
    waymark_cmd(&project)
        .args(["instruction", "show", "ffffffff"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Instruction ffffffff not found"));
}

#[test]
fn test_cli_report_completes_instruction() {
    let project = create_cli_test_environment();
    let id = create_instruction(&project, "Report me");

    waymark_cmd(&project)
        .args(["instruction", "report", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Final Report: Report me"))
        .stdout(predicate::str::contains("- Status: completed"))
        .stdout(predicate::str::contains("- Executed steps: 0"));

    waymark_cmd(&project)
        .args(["instruction", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- **Status**: completed"));
}

#[test]
fn test_cli_tree_output() {
    let project = create_cli_test_environment();
    fs::create_dir_all(project.path().join("src")).unwrap();
    fs::write(project.path().join("src/main.rs"), "fn main() {}\n").unwrap();
    fs::create_dir_all(project.path().join("node_modules/left-pad")).unwrap();

    waymark_cmd(&project)
        .arg("tree")
        .assert()
        .success()
        .stdout(predicate::str::contains("└── src/"))
        .stdout(predicate::str::contains("main.rs (13 B)"))
        .stdout(predicate::str::contains("node_modules").not())
        .stdout(predicate::str::contains("1 directories, 1 files"));
}

#[test]
fn test_cli_tree_include_all_and_no_files() {
    let project = create_cli_test_environment();
    fs::create_dir_all(project.path().join("node_modules/left-pad")).unwrap();
    fs::write(project.path().join("README.md"), "# Demo\n").unwrap();

    waymark_cmd(&project)
        .args(["tree", "--include-all", "--no-files"])
        .assert()
        .success()
        .stdout(predicate::str::contains("node_modules/"))
        .stdout(predicate::str::contains("README.md").not());
}

#[test]
fn test_cli_tree_missing_directory() {
    let project = create_cli_test_environment();
    waymark_cmd(&project)
        .args(["tree", "does-not-exist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_cli_project_root_from_env() {
    let project = create_cli_test_environment();
    fs::create_dir(project.path().join("docs")).unwrap();

    Command::cargo_bin("waymark")
        .expect("Failed to find waymark binary")
        .args(["--no-color", "tree", "--no-files"])
        .env("WAYMARK_PROJECT_ROOT", project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("docs/"));
}
