use tempfile::TempDir;
use waymark_core::{Workflow, WorkflowBuilder};

/// Helper function to create a workflow rooted in a fresh project directory
pub async fn create_test_workflow() -> (TempDir, Workflow) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let workflow = WorkflowBuilder::new()
        .with_project_root(Some(temp_dir.path()))
        .build()
        .await
        .expect("Failed to create workflow");
    (temp_dir, workflow)
}
