//! MCP server implementation for Waymark
//!
//! Exposes the workflow, directory tree and git operations as Model Context
//! Protocol tools, plus a `build_feature` prompt and read-only resources.
//! Served over stdio by default or streamable HTTP at `/mcp`.

use std::{future::Future, sync::Arc};

use anyhow::Result;
use axum::{routing::get, Router};
use log::{debug, error, info};
use rmcp::{
    handler::server::{router::tool::ToolRouter, tool::Parameters},
    model::{
        GetPromptRequestParam, GetPromptResult, Implementation, ListPromptsResult,
        ListResourcesResult, PaginatedRequestParam, ProtocolVersion, ReadResourceRequestParam,
        ReadResourceResult, ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    tool, tool_handler, tool_router, ErrorData as McpError, RoleServer, ServerHandler,
};
use tokio::{
    signal::unix::{signal, SignalKind},
    sync::Mutex,
};
use waymark_core::Workflow;

pub mod errors;
pub mod handlers;
pub mod prompts;

pub use handlers::{
    AnalyzeAndOrchestrate, CreateInstruction, CreateTaskPlan, ExecuteStep, GatherInformation,
    GenerateReport, GitBranch, GitDiff, GitLog, GitStatus, InstructionId, McpResult,
    TreeDirectory,
};

/// MCP server for Waymark
#[derive(Clone)]
pub struct WaymarkMcpServer {
    workflow: Arc<Mutex<Workflow>>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl WaymarkMcpServer {
    pub fn new(workflow: Workflow) -> Self {
        Self {
            workflow: Arc::new(Mutex::new(workflow)),
            tool_router: Self::tool_router(),
        }
    }

    fn handlers(&self) -> handlers::McpHandlers {
        handlers::McpHandlers::new(self.workflow.clone())
    }

    #[tool(
        name = "create_instruction",
        description = "Create a new development instruction (step 1 of the workflow). Provide a brief title, a detailed description of what needs to be done, the specific goal, and an optional priority (low, medium, high). Returns the instruction_id used by every later step."
    )]
    async fn create_instruction(&self, params: Parameters<CreateInstruction>) -> McpResult {
        self.handlers().create_instruction(params).await
    }

    #[tool(
        name = "get_instruction",
        description = "Retrieve an existing instruction by ID, including its task plan, gathered information, analysis, execution plan with step results, and final report when present."
    )]
    async fn get_instruction(&self, params: Parameters<InstructionId>) -> McpResult {
        self.handlers().get_instruction(params).await
    }

    #[tool(
        name = "list_instructions",
        description = "List every instruction recorded for this project, oldest first."
    )]
    async fn list_instructions(&self) -> McpResult {
        self.handlers().list_instructions().await
    }

    #[tool(
        name = "create_task_plan",
        description = "Break an instruction down into subtasks (step 2). Each subtask takes a title, description, numeric complexity (default 1) and optional dependencies on other subtask ids. At least one subtask is required. Replaces any previous task plan."
    )]
    async fn create_task_plan(&self, params: Parameters<CreateTaskPlan>) -> McpResult {
        self.handlers().create_task_plan(params).await
    }

    #[tool(
        name = "gather_information",
        description = "Gather information for an instruction (step 3). Sources are typed: {type: file, path}, {type: directory, path}, {type: command, query} or {type: search, query}. Paths resolve against the project root. Individual source failures are recorded, not raised."
    )]
    async fn gather_information(&self, params: Parameters<GatherInformation>) -> McpResult {
        self.handlers().gather_information(params).await
    }

    #[tool(
        name = "analyze_and_orchestrate",
        description = "Record an analysis of the gathered information and create the execution plan (step 4). Requires gather_information first. Each step needs a title and a type: file_creation, file_modification, command_execution or dependency_installation."
    )]
    async fn analyze_and_orchestrate(
        &self,
        params: Parameters<AnalyzeAndOrchestrate>,
    ) -> McpResult {
        self.handlers().analyze_and_orchestrate(params).await
    }

    #[tool(
        name = "execute_step",
        description = "Execute one step of the execution plan (step 5). execution_details depend on the step type: file_creation takes file_path and content; file_modification takes file_path and either content or patches (replace, insert, delete); command_execution takes command; dependency_installation takes packages and an optional package_manager (npm or pip). Failed steps are recorded and may be executed again."
    )]
    async fn execute_step(&self, params: Parameters<ExecuteStep>) -> McpResult {
        self.handlers().execute_step(params).await
    }

    #[tool(
        name = "generate_final_report",
        description = "Generate the final report for an instruction: artifacts produced, step counts and, with include_details (default true), an echo of every phase. Marks the instruction completed unless it has failed."
    )]
    async fn generate_final_report(&self, params: Parameters<GenerateReport>) -> McpResult {
        self.handlers().generate_final_report(params).await
    }

    #[tool(
        name = "build_feature",
        description = "Start building a complete feature: creates the instruction and returns the ordered next steps through the five-step workflow."
    )]
    async fn build_feature(&self, params: Parameters<CreateInstruction>) -> McpResult {
        self.handlers().build_feature(params).await
    }

    #[tool(
        name = "tree_directory",
        description = "Render a directory tree relative to the project root. Options: max_depth (default 3), show_files, show_hidden, pattern (glob for file names), exclude_common (skip VCS, dependency and build directories; default true) and custom_excludes."
    )]
    async fn tree_directory(&self, params: Parameters<TreeDirectory>) -> McpResult {
        self.handlers().tree_directory(params).await
    }

    #[tool(
        name = "git_status",
        description = "Show the current branch and working tree state. With detailed=true, lists staged, not staged and untracked files; otherwise returns counts."
    )]
    async fn git_status(&self, params: Parameters<GitStatus>) -> McpResult {
        self.handlers().git_status(params).await
    }

    #[tool(
        name = "git_log",
        description = "Show recent commits (count, default 10) with hash, author, date and message. show_stats adds per-file change statistics."
    )]
    async fn git_log(&self, params: Parameters<GitLog>) -> McpResult {
        self.handlers().git_log(params).await
    }

    #[tool(
        name = "git_branch",
        description = "List local branches and the current branch. remote=true includes remote-tracking branches."
    )]
    async fn git_branch(&self, params: Parameters<GitBranch>) -> McpResult {
        self.handlers().git_branch(params).await
    }

    #[tool(
        name = "git_diff",
        description = "Show the working tree diff, or the staged diff with staged=true, optionally restricted to file_path. Returns per-file insertion and deletion counts with hunks."
    )]
    async fn git_diff(&self, params: Parameters<GitDiff>) -> McpResult {
        self.handlers().git_diff(params).await
    }

    async fn list_prompts(
        &self,
        request: Option<PaginatedRequestParam>,
        context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        self.handlers().list_prompts(request, context).await
    }

    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        self.handlers().get_prompt(request, context).await
    }

    async fn list_resources(
        &self,
        request: Option<PaginatedRequestParam>,
        context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        self.handlers().list_resources(request, context).await
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        self.handlers().read_resource(request, context).await
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for WaymarkMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_prompts()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: "waymark".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            instructions: Some(r#"Waymark records a development task as one instruction document that moves through five phases.

## Workflow
1. **User instruction**: `create_instruction` (or `build_feature`) with title, description and goal
2. **Task planning**: `create_task_plan` with subtasks and their complexity
3. **Information gathering**: `gather_information` from file, directory, command and search sources
4. **Analysis and orchestration**: `analyze_and_orchestrate` with findings and an execution plan
5. **Result synthesis**: `execute_step` for each step, then `generate_final_report`

Analysis requires gathered information, and execution requires an execution plan. Failed steps are recorded and can be executed again.

## Project inspection
- `tree_directory` renders the project layout
- `git_status`, `git_log`, `git_branch` and `git_diff` are read-only git queries

## Resources
- `instructions://list`: every instruction document
- `project://structure`: directory tree of the project root
- `file://{path}`: contents of a file inside the project

Every tool returns JSON with `success` and `message`; failures carry `error_kind`."#.to_string()),
        }
    }

    async fn list_prompts(
        &self,
        request: Option<PaginatedRequestParam>,
        context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        self.list_prompts(request, context).await
    }

    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        self.get_prompt(request, context).await
    }

    async fn list_resources(
        &self,
        request: Option<PaginatedRequestParam>,
        context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        self.list_resources(request, context).await
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        self.read_resource(request, context).await
    }
}

pub async fn run_stdio_server(server: WaymarkMcpServer) -> Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    info!("Starting Waymark MCP server on stdio");
    debug!(
        "Server created with {} tools",
        server.tool_router.list_all().len()
    );

    let service = server.serve(stdio()).await.inspect_err(|e| {
        error!("serving error: {e:?}");
    })?;

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        result = service.waiting() => {
            match result {
                Ok(_) => info!("MCP server stopped normally"),
                Err(e) => error!("MCP server error: {e:?}"),
            }
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }

    info!("MCP server shutdown complete");
    Ok(())
}

pub async fn run_http_server(server: WaymarkMcpServer, host: &str, port: u16) -> Result<()> {
    use rmcp::transport::streamable_http_server::{
        session::local::LocalSessionManager, StreamableHttpService,
    };

    debug!(
        "Server created with {} tools",
        server.tool_router.list_all().len()
    );

    let service = StreamableHttpService::new(
        move || Ok(server.clone()),
        LocalSessionManager::default().into(),
        Default::default(),
    );
    let app = Router::new()
        .nest_service("/mcp", service)
        .route("/health", get(health_check));

    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    info!("MCP endpoint: http://{}/mcp", listener.local_addr()?);

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = sigint.recv() => info!("Received SIGINT, shutting down gracefully..."),
                _ = sigterm.recv() => info!("Received SIGTERM, shutting down gracefully..."),
            }
        })
        .await?;

    info!("MCP server shutdown complete");
    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
