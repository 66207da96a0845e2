mod common;

use std::fs;

use common::create_test_workflow;
use serde_json::json;
use waymark_core::{
    models::{ArtifactAction, StepStatus},
    params::{
        AnalysisInput, AnalyzeAndOrchestrate, CreateInstruction, CreateTaskPlan, ExecuteStep,
        ExecutionDetails, ExecutionStepSpec, GatherInformation, GenerateReport, InstructionId,
        Patch, SourceSpec, SubtaskSpec,
    },
    InstructionStatus, Priority, ToolResponse, WorkflowBuilder, WorkflowError, WorkflowStep,
};

fn dark_mode() -> CreateInstruction {
    CreateInstruction {
        title: "Add dark mode".to_string(),
        description: "Theme toggle in the header".to_string(),
        goal: "Users can switch themes".to_string(),
        priority: Priority::High,
    }
}

fn step(title: &str, step_type: &str) -> ExecutionStepSpec {
    ExecutionStepSpec {
        title: title.to_string(),
        step_type: Some(step_type.to_string()),
        ..Default::default()
    }
}

#[tokio::test]
#[allow(clippy::too_many_lines)]
async fn test_complete_instruction_workflow() {
    let (temp_dir, workflow) = create_test_workflow().await;
    fs::write(
        temp_dir.path().join("styles.css"),
        "body { background: white; }\n",
    )
    .unwrap();

    // Step 1: instruction
    let instruction = workflow
        .create_instruction(&dark_mode())
        .await
        .expect("Failed to create instruction");
    let id = instruction.id.clone();

    // Step 2: task plan
    workflow
        .create_task_plan(&CreateTaskPlan {
            instruction_id: id.clone(),
            subtasks: vec![
                SubtaskSpec {
                    title: "Theme tokens".to_string(),
                    complexity: Some(2.0),
                    ..Default::default()
                },
                SubtaskSpec {
                    title: "Toggle".to_string(),
                    complexity: Some(3.0),
                    dependencies: Some(vec!["st-1".to_string()]),
                    ..Default::default()
                },
            ],
        })
        .await
        .expect("Failed to create task plan");

    // Step 3: information gathering
    let gathered = workflow
        .gather_information(&GatherInformation {
            instruction_id: id.clone(),
            sources: vec![
                SourceSpec {
                    source_type: Some("file".to_string()),
                    path: Some("styles.css".to_string()),
                    query: None,
                },
                SourceSpec {
                    source_type: Some("search".to_string()),
                    path: None,
                    query: Some("background".to_string()),
                },
            ],
        })
        .await
        .expect("Failed to gather information");
    assert_eq!(
        gathered
            .gathered_information
            .as_ref()
            .unwrap()
            .summary
            .successful_sources,
        2
    );

    // Step 4: analysis and orchestration
    workflow
        .analyze_and_orchestrate(&AnalyzeAndOrchestrate {
            instruction_id: id.clone(),
            analysis: AnalysisInput {
                findings: vec![json!("styles.css hardcodes a white background")],
                recommendations: vec![json!("introduce a dark palette")],
                ..Default::default()
            },
            execution_plan: vec![
                step("Create dark palette", "file_creation"),
                step("Use palette", "file_modification"),
            ],
        })
        .await
        .expect("Failed to orchestrate");

    // Step 5: execution
    let created = workflow
        .execute_step(&ExecuteStep {
            instruction_id: id.clone(),
            step_id: "step-1".to_string(),
            execution_details: ExecutionDetails {
                file_path: Some("theme/dark.css".to_string()),
                content: Some(":root { --bg: black; }\n".to_string()),
                ..Default::default()
            },
        })
        .await
        .expect("Failed to execute step-1");
    assert!(created.result.success);

    let modified = workflow
        .execute_step(&ExecuteStep {
            instruction_id: id.clone(),
            step_id: "step-2".to_string(),
            execution_details: ExecutionDetails {
                file_path: Some("styles.css".to_string()),
                patches: vec![Patch::Replace {
                    old_text: "white".to_string(),
                    new_text: "var(--bg)".to_string(),
                }],
                ..Default::default()
            },
        })
        .await
        .expect("Failed to execute step-2");
    assert!(modified.result.success);
    assert_eq!(modified.instruction.status, InstructionStatus::Completed);
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("styles.css")).unwrap(),
        "body { background: var(--bg); }\n"
    );
    assert!(temp_dir.path().join("theme/dark.css").is_file());

    // Final report
    let report = workflow
        .generate_final_report(&GenerateReport {
            instruction_id: id.clone(),
            include_details: true,
        })
        .await
        .expect("Failed to generate report");
    assert_eq!(report.status, InstructionStatus::Completed);
    assert_eq!(report.summary.planned_subtasks, 2);
    assert_eq!(report.summary.executed_steps, 2);
    assert_eq!(report.summary.successful_steps, 2);
    let actions: Vec<_> = report
        .summary
        .artifacts
        .iter()
        .map(|artifact| (artifact.path.as_str(), artifact.action))
        .collect();
    assert_eq!(
        actions,
        vec![
            ("theme/dark.css", ArtifactAction::Created),
            ("styles.css", ArtifactAction::Modified),
        ]
    );
    assert_eq!(report.workflow_steps_completed.len(), 5);
    assert!(report.to_string().contains("# Final Report: Add dark mode"));

    let summaries = workflow.list_summaries().await.unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].completed_steps, 2);
    assert_eq!(summaries[0].workflow_step, WorkflowStep::ResultSynthesis);
}

#[tokio::test]
async fn test_state_persists_across_workflows() {
    let (temp_dir, workflow) = create_test_workflow().await;
    let instruction = workflow.create_instruction(&dark_mode()).await.unwrap();
    drop(workflow);

    let reopened = WorkflowBuilder::new()
        .with_project_root(Some(temp_dir.path()))
        .build()
        .await
        .expect("Failed to reopen workflow");
    let loaded = reopened
        .get_instruction(&InstructionId {
            instruction_id: instruction.id.clone(),
        })
        .await
        .expect("Instruction should survive a restart");
    assert_eq!(loaded, instruction);
    assert!(temp_dir
        .path()
        .join(".state/instructions")
        .join(format!("{}.json", instruction.id))
        .is_file());
}

#[tokio::test]
async fn test_custom_state_dir() {
    let (temp_dir, _) = create_test_workflow().await;
    let workflow = WorkflowBuilder::new()
        .with_project_root(Some(temp_dir.path()))
        .with_state_dir(Some("var/waymark"))
        .build()
        .await
        .unwrap();

    let instruction = workflow.create_instruction(&dark_mode()).await.unwrap();
    assert!(temp_dir
        .path()
        .join("var/waymark")
        .join(format!("{}.json", instruction.id))
        .is_file());
}

#[tokio::test]
async fn test_stale_writer_gets_conflict() {
    let (_temp_dir, workflow) = create_test_workflow().await;
    let instruction = workflow.create_instruction(&dark_mode()).await.unwrap();
    let mut stale = workflow.store().load(&instruction.id).unwrap();

    workflow
        .create_task_plan(&CreateTaskPlan {
            instruction_id: instruction.id.clone(),
            subtasks: vec![SubtaskSpec::default()],
        })
        .await
        .unwrap();

    stale.title = "Lost update".to_string();
    let err = workflow.store().commit(&mut stale).unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::Conflict {
            expected: 0,
            found: 1,
            ..
        }
    ));
    let stored = workflow.store().load(&instruction.id).unwrap();
    assert_eq!(stored.title, "Add dark mode");
    assert!(stored.task_plan.is_some());
}

#[tokio::test]
async fn test_error_handling_invalid_operations() {
    let (_temp_dir, workflow) = create_test_workflow().await;

    let err = workflow
        .get_instruction(&InstructionId {
            instruction_id: "ffffffff".to_string(),
        })
        .await
        .unwrap_err();
    let response = ToolResponse::failure(&err);
    assert!(!response.success);
    assert_eq!(response.message, "Instruction ffffffff not found");

    let instruction = workflow.create_instruction(&dark_mode()).await.unwrap();
    let err = workflow
        .analyze_and_orchestrate(&AnalyzeAndOrchestrate {
            instruction_id: instruction.id.clone(),
            analysis: AnalysisInput::default(),
            execution_plan: vec![step("Build", "command_execution")],
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "precondition_failed");

    let err = workflow
        .execute_step(&ExecuteStep {
            instruction_id: instruction.id.clone(),
            step_id: "step-1".to_string(),
            execution_details: ExecutionDetails::default(),
        })
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "No execution plan found. Complete analysis and orchestration first."
    );

    let stored = workflow.store().load(&instruction.id).unwrap();
    assert_eq!(stored.revision, 0);
    assert_eq!(stored.status, InstructionStatus::Created);
}

#[cfg(unix)]
#[tokio::test]
async fn test_command_steps_run_in_project_root() {
    let (temp_dir, workflow) = create_test_workflow().await;
    let instruction = workflow.create_instruction(&dark_mode()).await.unwrap();
    workflow
        .gather_information(&GatherInformation {
            instruction_id: instruction.id.clone(),
            sources: vec![SourceSpec {
                source_type: Some("command".to_string()),
                path: None,
                query: Some("pwd".to_string()),
            }],
        })
        .await
        .unwrap();
    workflow
        .analyze_and_orchestrate(&AnalyzeAndOrchestrate {
            instruction_id: instruction.id.clone(),
            analysis: AnalysisInput::default(),
            execution_plan: vec![step("Touch", "command_execution")],
        })
        .await
        .unwrap();

    let execution = workflow
        .execute_step(&ExecuteStep {
            instruction_id: instruction.id,
            step_id: "step-1".to_string(),
            execution_details: ExecutionDetails {
                command: Some(waymark_core::params::CommandSpec::Line(
                    "touch marker.txt".to_string(),
                )),
                ..Default::default()
            },
        })
        .await
        .unwrap();

    assert!(execution.result.success);
    assert!(temp_dir.path().join("marker.txt").is_file());
    let plan = execution.instruction.execution_plan.unwrap();
    assert_eq!(plan.steps[0].status, StepStatus::Completed);
}
