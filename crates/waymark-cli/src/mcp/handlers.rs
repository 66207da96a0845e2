//! MCP tool, prompt and resource handlers
//!
//! Every tool answers with a JSON [`ToolResponse`] in a single text content
//! block. Workflow errors never surface as protocol errors: they become
//! `{"success": false, ...}` results with the MCP error flag set.

use std::sync::Arc;

use log::debug;
use rmcp::{
    handler::server::tool::Parameters,
    model::{
        AnnotateAble, CallToolResult, Content, GetPromptRequestParam, GetPromptResult,
        ListPromptsResult, ListResourcesResult, PaginatedRequestParam, Prompt, PromptArgument,
        PromptMessage, PromptMessageContent, PromptMessageRole, RawResource,
        ReadResourceRequestParam, ReadResourceResult, ResourceContents,
    },
    service::RequestContext,
    ErrorData as McpError, RoleServer,
};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Mutex;
use waymark_core::{params as core, Result as WorkflowResult, ToolResponse, Workflow};

use super::{
    errors::{to_mcp_error, to_resource_error},
    prompts::get_prompt_templates,
};

pub const INSTRUCTIONS_URI: &str = "instructions://list";
pub const STRUCTURE_URI: &str = "project://structure";
pub const FILE_SCHEME: &str = "file://";

// ============================================================================
// Generic Parameter Wrapper
// ============================================================================
//
// Core parameter types stay free of rmcp; this transparent wrapper adds the
// schema and deserialization the tool router needs.

/// Generic MCP wrapper for core parameter types
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct McpParams<T>(T)
where
    T: JsonSchema;

impl<T> JsonSchema for McpParams<T>
where
    T: JsonSchema,
{
    fn schema_name() -> std::borrow::Cow<'static, str> {
        T::schema_name()
    }

    fn json_schema(g: &mut schemars::SchemaGenerator) -> schemars::Schema {
        T::json_schema(g)
    }
}

impl<T> AsRef<T> for McpParams<T>
where
    T: JsonSchema,
{
    fn as_ref(&self) -> &T {
        &self.0
    }
}

pub type InstructionId = McpParams<core::InstructionId>;
pub type CreateInstruction = McpParams<core::CreateInstruction>;
pub type CreateTaskPlan = McpParams<core::CreateTaskPlan>;
pub type GatherInformation = McpParams<core::GatherInformation>;
pub type AnalyzeAndOrchestrate = McpParams<core::AnalyzeAndOrchestrate>;
pub type ExecuteStep = McpParams<core::ExecuteStep>;
pub type GenerateReport = McpParams<core::GenerateReport>;
pub type TreeDirectory = McpParams<core::TreeDirectory>;
pub type GitStatus = McpParams<core::GitStatus>;
pub type GitLog = McpParams<core::GitLog>;
pub type GitBranch = McpParams<core::GitBranch>;
pub type GitDiff = McpParams<core::GitDiff>;

pub type McpResult = Result<CallToolResult, McpError>;

/// Serializes a response into a tool result, flagging failures.
pub fn respond(result: WorkflowResult<ToolResponse>) -> McpResult {
    let response = ToolResponse::from_result(result);
    let text = response
        .to_json()
        .map_err(|e| to_mcp_error("Failed to encode response", &e))?;
    let content = vec![Content::text(text)];
    Ok(if response.success {
        CallToolResult::success(content)
    } else {
        CallToolResult::error(content)
    })
}

/// Handler implementations for the MCP server
pub struct McpHandlers {
    workflow: Arc<Mutex<Workflow>>,
}

impl McpHandlers {
    pub fn new(workflow: Arc<Mutex<Workflow>>) -> Self {
        Self { workflow }
    }

    // ------------------------------------------------------------------------
    // Workflow tools
    // ------------------------------------------------------------------------

    pub async fn create_instruction(
        &self,
        Parameters(params): Parameters<CreateInstruction>,
    ) -> McpResult {
        debug!("create_instruction: {params:?}");

        let workflow = self.workflow.lock().await;
        let result = workflow
            .create_instruction(params.as_ref())
            .await
            .and_then(|instruction| {
                ToolResponse::ok(format!(
                    "Instruction {} created successfully",
                    instruction.id
                ))
                .with("instruction_id", &instruction.id)?
                .with("instruction", &instruction)
            });
        respond(result)
    }

    pub async fn get_instruction(&self, Parameters(params): Parameters<InstructionId>) -> McpResult {
        debug!("get_instruction: {params:?}");

        let workflow = self.workflow.lock().await;
        let result = workflow
            .get_instruction(params.as_ref())
            .await
            .and_then(|instruction| {
                ToolResponse::ok(format!("Retrieved instruction {}", instruction.id))
                    .with("instruction", &instruction)
            });
        respond(result)
    }

    pub async fn list_instructions(&self) -> McpResult {
        debug!("list_instructions");

        let workflow = self.workflow.lock().await;
        let result = workflow
            .list_instructions()
            .await
            .and_then(|instructions| {
                ToolResponse::ok(format!("Found {} instructions", instructions.len()))
                    .with("instructions", &instructions)
            });
        respond(result)
    }

    pub async fn create_task_plan(
        &self,
        Parameters(params): Parameters<CreateTaskPlan>,
    ) -> McpResult {
        debug!("create_task_plan: {params:?}");

        let workflow = self.workflow.lock().await;
        let result = workflow
            .create_task_plan(params.as_ref())
            .await
            .and_then(|instruction| {
                ToolResponse::ok(format!(
                    "Task plan created for instruction {}",
                    instruction.id
                ))
                .with("instruction", &instruction)
            });
        respond(result)
    }

    pub async fn gather_information(
        &self,
        Parameters(params): Parameters<GatherInformation>,
    ) -> McpResult {
        debug!("gather_information: {params:?}");

        let workflow = self.workflow.lock().await;
        let result = workflow
            .gather_information(params.as_ref())
            .await
            .and_then(|instruction| {
                let response = ToolResponse::ok(format!(
                    "Gathered information from {} sources for instruction {}",
                    params.as_ref().sources.len(),
                    instruction.id
                ))
                .with("instruction", &instruction)?;
                match &instruction.gathered_information {
                    Some(info) => response.with("summary", &info.summary),
                    None => Ok(response),
                }
            });
        respond(result)
    }

    pub async fn analyze_and_orchestrate(
        &self,
        Parameters(params): Parameters<AnalyzeAndOrchestrate>,
    ) -> McpResult {
        debug!("analyze_and_orchestrate: {params:?}");

        let workflow = self.workflow.lock().await;
        let result = workflow
            .analyze_and_orchestrate(params.as_ref())
            .await
            .and_then(|instruction| {
                ToolResponse::ok(format!(
                    "Analysis completed and execution plan created with {} steps for instruction {}",
                    params.as_ref().execution_plan.len(),
                    instruction.id
                ))
                .with("instruction", &instruction)
            });
        respond(result)
    }

    pub async fn execute_step(&self, Parameters(params): Parameters<ExecuteStep>) -> McpResult {
        debug!("execute_step: {params:?}");

        let workflow = self.workflow.lock().await;
        let result = workflow
            .execute_step(params.as_ref())
            .await
            .and_then(|execution| {
                ToolResponse::outcome(execution.result.success, execution.result.message())
                    .with("instruction", &execution.instruction)?
                    .with("result", &execution.result)
            });
        respond(result)
    }

    pub async fn generate_final_report(
        &self,
        Parameters(params): Parameters<GenerateReport>,
    ) -> McpResult {
        debug!("generate_final_report: {params:?}");

        let workflow = self.workflow.lock().await;
        let id = &params.as_ref().instruction_id;
        let result = match workflow.generate_final_report(params.as_ref()).await {
            Ok(report) => workflow
                .get_instruction(&core::InstructionId {
                    instruction_id: id.clone(),
                })
                .await
                .and_then(|instruction| {
                    ToolResponse::ok(format!("Generated final report for instruction {id}"))
                        .with("instruction", &instruction)?
                        .with("report", &report)
                }),
            Err(e) => Err(e),
        };
        respond(result)
    }

    pub async fn build_feature(
        &self,
        Parameters(params): Parameters<CreateInstruction>,
    ) -> McpResult {
        debug!("build_feature: {params:?}");

        let workflow = self.workflow.lock().await;
        let result = workflow
            .build_feature(params.as_ref())
            .await
            .and_then(|kickoff| {
                ToolResponse::ok(format!(
                    "Feature '{}' has been initialized with instruction ID: {}",
                    kickoff.instruction.title, kickoff.instruction.id
                ))
                .with("instruction_id", &kickoff.instruction.id)?
                .with("next_steps", &kickoff.next_steps)?
                .with("instruction", &kickoff.instruction)
            });
        respond(result)
    }

    // ------------------------------------------------------------------------
    // Project inspection tools
    // ------------------------------------------------------------------------

    pub async fn tree_directory(&self, Parameters(params): Parameters<TreeDirectory>) -> McpResult {
        debug!("tree_directory: {params:?}");

        let workflow = self.workflow.lock().await;
        let result = workflow
            .tree_directory(params.as_ref())
            .await
            .and_then(|report| {
                ToolResponse::ok(format!("Generated directory tree for {}", report.path))
                    .with_fields(&report)
            });
        respond(result)
    }

    pub async fn git_status(&self, Parameters(params): Parameters<GitStatus>) -> McpResult {
        debug!("git_status: {params:?}");

        let workflow = self.workflow.lock().await;
        let result = workflow
            .git_status(params.as_ref())
            .await
            .and_then(|status| {
                ToolResponse::ok(format!("Retrieved git status on branch {}", status.branch))
                    .with("status", &status)
            });
        respond(result)
    }

    pub async fn git_log(&self, Parameters(params): Parameters<GitLog>) -> McpResult {
        debug!("git_log: {params:?}");

        let workflow = self.workflow.lock().await;
        let result = workflow.git_log(params.as_ref()).await.and_then(|commits| {
            ToolResponse::ok(format!("Retrieved {} commits", commits.len()))
                .with("commits", &commits)
        });
        respond(result)
    }

    pub async fn git_branch(&self, Parameters(params): Parameters<GitBranch>) -> McpResult {
        debug!("git_branch: {params:?}");

        let workflow = self.workflow.lock().await;
        let result = workflow
            .git_branch(params.as_ref())
            .await
            .and_then(|branches| {
                ToolResponse::ok(format!("Found {} branches", branches.branches.len()))
                    .with_fields(&branches)
            });
        respond(result)
    }

    pub async fn git_diff(&self, Parameters(params): Parameters<GitDiff>) -> McpResult {
        debug!("git_diff: {params:?}");

        let workflow = self.workflow.lock().await;
        let result = workflow.git_diff(params.as_ref()).await.and_then(|diff| {
            ToolResponse::ok(format!("{} files changed", diff.files_changed.len()))
                .with_fields(&diff)
        });
        respond(result)
    }

    // ------------------------------------------------------------------------
    // Prompts
    // ------------------------------------------------------------------------

    /// List all available prompts
    pub async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        debug!("list_prompts");

        let prompts = get_prompt_templates()
            .iter()
            .map(|template| {
                Prompt::new(
                    &template.name,
                    Some(&template.description),
                    Some(
                        template
                            .arguments
                            .iter()
                            .map(|arg| PromptArgument {
                                name: arg.name.clone(),
                                description: Some(arg.description.clone()),
                                required: Some(arg.required),
                            })
                            .collect(),
                    ),
                )
            })
            .collect();

        Ok(ListPromptsResult {
            next_cursor: None,
            prompts,
        })
    }

    /// Get a specific prompt by name and apply arguments
    pub async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        debug!("get_prompt: {}", request.name);

        let template = get_prompt_templates()
            .into_iter()
            .find(|t| t.name == request.name)
            .ok_or_else(|| McpError::invalid_params("Prompt not found", None))?;

        let arguments = request.arguments.as_ref();
        let text = template
            .render(|name| arguments.and_then(|args| args.get(name)).and_then(Value::as_str))
            .map_err(|message| McpError::invalid_params(message, None))?;

        Ok(GetPromptResult {
            description: Some(template.description),
            messages: vec![PromptMessage {
                role: PromptMessageRole::User,
                content: PromptMessageContent::text(text),
            }],
        })
    }

    // ------------------------------------------------------------------------
    // Resources
    // ------------------------------------------------------------------------

    pub async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        debug!("list_resources");

        Ok(ListResourcesResult {
            next_cursor: None,
            resources: vec![
                RawResource::new(INSTRUCTIONS_URI, "instructions").no_annotation(),
                RawResource::new(STRUCTURE_URI, "project structure").no_annotation(),
            ],
        })
    }

    pub async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        debug!("read_resource: {}", request.uri);

        let uri = request.uri.as_str();
        let text = self
            .resource_text(uri)
            .await
            .map_err(|e| to_resource_error(uri, &e))?
            .ok_or_else(|| McpError::resource_not_found(format!("Unknown resource: {uri}"), None))?;

        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(text, uri)],
        })
    }

    /// Resource body for a URI, or `None` when no resource matches.
    async fn resource_text(&self, uri: &str) -> WorkflowResult<Option<String>> {
        let workflow = self.workflow.lock().await;
        if uri == INSTRUCTIONS_URI {
            let instructions = workflow.list_instructions().await?;
            return Ok(Some(serde_json::to_string_pretty(&instructions)?));
        }
        if uri == STRUCTURE_URI {
            let report = workflow
                .tree_directory(&core::TreeDirectory::default())
                .await?;
            return Ok(Some(serde_json::to_string_pretty(&report)?));
        }
        match uri.strip_prefix(FILE_SCHEME) {
            Some(path) => workflow.read_project_file(path).await.map(Some),
            None => Ok(None),
        }
    }
}
