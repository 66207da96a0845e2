//! Integration tests comparing CLI output with the core Display
//! implementations the MCP layer and CLI share.

use std::process::Command;

use tempfile::TempDir;
use waymark_core::{
    params::{CreateInstruction, GenerateReport, InstructionId, TreeDirectory},
    InstructionSummaries, Workflow, WorkflowBuilder,
};

async fn create_test_workflow() -> (Workflow, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let workflow = WorkflowBuilder::new()
        .with_project_root(Some(temp_dir.path()))
        .build()
        .await
        .expect("Failed to create workflow");
    (workflow, temp_dir)
}

/// Run a CLI command and capture its output
fn run_cli_command(project: &TempDir, args: &[&str]) -> String {
    let output = Command::new(env!("CARGO_BIN_EXE_waymark"))
        .arg("--no-color")
        .arg("--project-root")
        .arg(project.path())
        .args(args)
        .env_remove("WAYMARK_PROJECT_ROOT")
        .output()
        .expect("Failed to run CLI command");
    assert!(output.status.success(), "CLI failed: {output:?}");
    String::from_utf8(output.stdout).expect("Invalid UTF-8 in CLI output")
}

#[tokio::test]
async fn test_show_instruction_consistency() {
    let (workflow, temp_dir) = create_test_workflow().await;
    let instruction = workflow
        .create_instruction(&CreateInstruction {
            title: "Consistent display".to_string(),
            description: "Shown by both front ends".to_string(),
            goal: "Identical markdown".to_string(),
            ..Default::default()
        })
        .await
        .expect("Failed to create instruction");

    let cli_output = run_cli_command(&temp_dir, &["instruction", "show", &instruction.id]);
    let loaded = workflow
        .get_instruction(&InstructionId {
            instruction_id: instruction.id,
        })
        .await
        .unwrap();

    assert_eq!(cli_output, loaded.to_string());
}

#[tokio::test]
async fn test_list_instructions_consistency() {
    let (workflow, temp_dir) = create_test_workflow().await;
    for title in ["First", "Second"] {
        workflow
            .create_instruction(&CreateInstruction {
                title: title.to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
    }

    let cli_output = run_cli_command(&temp_dir, &["instruction", "list"]);
    let summaries = InstructionSummaries(workflow.list_summaries().await.unwrap());

    assert_eq!(cli_output, format!("# Instructions\n\n{summaries}"));
    assert!(cli_output.contains("## First"));
    assert!(cli_output.contains("## Second"));
}

#[tokio::test]
async fn test_report_consistency() {
    let (workflow, temp_dir) = create_test_workflow().await;
    let instruction = workflow
        .create_instruction(&CreateInstruction {
            title: "Reported".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    let cli_output = run_cli_command(&temp_dir, &["instruction", "report", &instruction.id]);
    let stored = workflow.store().load(&instruction.id).unwrap();
    let report = stored.final_report.expect("CLI should persist the report");

    assert_eq!(cli_output, report.to_string());

    // Regenerating bumps completed_at at most; the structure stays the same.
    let again = workflow
        .generate_final_report(&GenerateReport {
            instruction_id: instruction.id,
            include_details: true,
        })
        .await
        .unwrap();
    assert_eq!(again.summary, report.summary);
}

#[tokio::test]
async fn test_tree_consistency() {
    let (workflow, temp_dir) = create_test_workflow().await;
    std::fs::create_dir(temp_dir.path().join("src")).unwrap();
    std::fs::write(temp_dir.path().join("src/lib.rs"), "").unwrap();

    let cli_output = run_cli_command(&temp_dir, &["tree"]);
    let report = workflow
        .tree_directory(&TreeDirectory::default())
        .await
        .unwrap();

    assert_eq!(cli_output, report.to_string());
}
