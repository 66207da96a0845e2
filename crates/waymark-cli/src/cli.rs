//! Command-line interface definitions and handlers
//!
//! Subcommand arguments are clap wrappers around the core parameter types:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Workflow
//! ```
//!
//! Each wrapper converts into its core counterpart with `From`, so clap
//! attributes never leak into `waymark_core::params`. Handlers render the
//! core `Display` output through the [`TerminalRenderer`].

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use log::debug;
use waymark_core::{
    params::*, Commits, CreateResult, InstructionSummaries, Priority, Workflow,
};

use crate::renderer::TerminalRenderer;

// ============================================================================
// Instruction arguments
// ============================================================================

/// Create a new instruction
#[derive(Args)]
pub struct CreateInstructionArgs {
    /// Brief title for the instruction
    pub title: String,
    #[arg(
        short,
        long,
        default_value = "",
        help = "Detailed description of what needs to be done"
    )]
    pub description: String,
    #[arg(
        short,
        long,
        default_value = "",
        help = "The specific goal or outcome to achieve"
    )]
    pub goal: String,
    #[arg(
        short,
        long,
        default_value = "medium",
        help = "Priority level: low, medium or high"
    )]
    pub priority: Priority,
}

impl From<CreateInstructionArgs> for CreateInstruction {
    fn from(val: CreateInstructionArgs) -> Self {
        CreateInstruction {
            title: val.title,
            description: val.description,
            goal: val.goal,
            priority: val.priority,
        }
    }
}

#[derive(Args)]
pub struct ShowInstructionArgs {
    #[arg(help = "Identifier of the instruction to show")]
    pub id: String,
}

impl From<ShowInstructionArgs> for InstructionId {
    fn from(val: ShowInstructionArgs) -> Self {
        InstructionId {
            instruction_id: val.id,
        }
    }
}

#[derive(Args)]
pub struct ReportArgs {
    #[arg(help = "Identifier of the instruction to report on")]
    pub id: String,
    #[arg(long, help = "Leave out the per-phase details")]
    pub brief: bool,
}

impl From<ReportArgs> for GenerateReport {
    fn from(val: ReportArgs) -> Self {
        GenerateReport {
            instruction_id: val.id,
            include_details: !val.brief,
        }
    }
}

#[derive(Subcommand)]
pub enum InstructionCommands {
    #[command(alias = "c")]
    Create(CreateInstructionArgs),
    #[command(aliases = ["l", "ls"])]
    List,
    #[command(alias = "s")]
    Show(ShowInstructionArgs),
    /// Generate (or regenerate) the final report
    #[command(alias = "r")]
    Report(ReportArgs),
}

// ============================================================================
// Tree arguments
// ============================================================================

#[derive(Args)]
pub struct TreeArgs {
    #[arg(default_value = "", help = "Directory relative to the project root")]
    pub directory: String,
    #[arg(short, long, default_value_t = 3, help = "Maximum depth to descend")]
    pub depth: usize,
    #[arg(long, help = "Show directories only")]
    pub no_files: bool,
    #[arg(long, help = "Show entries whose name starts with a dot")]
    pub hidden: bool,
    #[arg(short, long, help = "Glob that file names must match")]
    pub pattern: Option<String>,
    #[arg(long, help = "Do not skip VCS, dependency and build directories")]
    pub include_all: bool,
    #[arg(
        short,
        long,
        value_delimiter = ',',
        help = "Additional glob patterns to exclude, comma-separated"
    )]
    pub exclude: Vec<String>,
}

impl From<TreeArgs> for TreeDirectory {
    fn from(val: TreeArgs) -> Self {
        TreeDirectory {
            directory_path: val.directory,
            max_depth: val.depth,
            show_files: !val.no_files,
            show_hidden: val.hidden,
            pattern: val.pattern,
            exclude_common: !val.include_all,
            custom_excludes: val.exclude,
        }
    }
}

// ============================================================================
// Git arguments
// ============================================================================

#[derive(Args)]
pub struct GitStatusArgs {
    #[arg(long, help = "List changed files instead of counts")]
    pub detailed: bool,
}

impl From<GitStatusArgs> for GitStatus {
    fn from(val: GitStatusArgs) -> Self {
        GitStatus {
            detailed: val.detailed,
        }
    }
}

#[derive(Args)]
pub struct GitLogArgs {
    #[arg(short = 'n', long, default_value_t = 10, help = "Number of commits")]
    pub count: usize,
    #[arg(long, help = "Include per-commit file statistics")]
    pub stats: bool,
}

impl From<GitLogArgs> for GitLog {
    fn from(val: GitLogArgs) -> Self {
        GitLog {
            count: val.count,
            show_stats: val.stats,
        }
    }
}

#[derive(Args)]
pub struct GitBranchArgs {
    #[arg(short, long, help = "Include remote-tracking branches")]
    pub remote: bool,
}

impl From<GitBranchArgs> for GitBranch {
    fn from(val: GitBranchArgs) -> Self {
        GitBranch { remote: val.remote }
    }
}

#[derive(Args)]
pub struct GitDiffArgs {
    #[arg(help = "Restrict the diff to one path")]
    pub file: Option<String>,
    #[arg(long, help = "Diff the index instead of the working tree")]
    pub staged: bool,
}

impl From<GitDiffArgs> for GitDiff {
    fn from(val: GitDiffArgs) -> Self {
        GitDiff {
            file_path: val.file,
            staged: val.staged,
        }
    }
}

#[derive(Subcommand)]
pub enum GitCommands {
    #[command(alias = "st")]
    Status(GitStatusArgs),
    Log(GitLogArgs),
    #[command(alias = "br")]
    Branch(GitBranchArgs),
    Diff(GitDiffArgs),
}

// ============================================================================
// Server arguments
// ============================================================================

#[derive(Args)]
pub struct ServeArgs {
    #[arg(long, help = "Serve streamable HTTP instead of stdio")]
    pub http: bool,
    #[arg(long, default_value = "0.0.0.0", help = "HTTP bind address")]
    pub host: String,
    #[arg(long, default_value_t = 8090, help = "HTTP port")]
    pub port: u16,
}

// ============================================================================
// Handlers
// ============================================================================

/// Runs CLI commands against a workflow and renders the results.
pub struct Cli {
    workflow: Workflow,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(workflow: Workflow, renderer: TerminalRenderer) -> Self {
        Self { workflow, renderer }
    }

    pub async fn handle_instruction_command(&self, command: InstructionCommands) -> Result<()> {
        match command {
            InstructionCommands::Create(args) => self.create_instruction(&args.into()).await,
            InstructionCommands::List => self.list_instructions().await,
            InstructionCommands::Show(args) => self.show_instruction(&args.into()).await,
            InstructionCommands::Report(args) => self.generate_report(&args.into()).await,
        }
    }

    pub async fn handle_git_command(&self, command: GitCommands) -> Result<()> {
        match command {
            GitCommands::Status(args) => {
                let report = self
                    .workflow
                    .git_status(&args.into())
                    .await
                    .context("Failed to read git status")?;
                self.renderer.render(&report.to_string())
            }
            GitCommands::Log(args) => {
                let commits = self
                    .workflow
                    .git_log(&args.into())
                    .await
                    .context("Failed to read git log")?;
                self.renderer.render(&Commits(commits).to_string())
            }
            GitCommands::Branch(args) => {
                let branches = self
                    .workflow
                    .git_branch(&args.into())
                    .await
                    .context("Failed to list branches")?;
                self.renderer.render(&branches.to_string())
            }
            GitCommands::Diff(args) => {
                let diff = self
                    .workflow
                    .git_diff(&args.into())
                    .await
                    .context("Failed to read git diff")?;
                self.renderer.render(&diff.to_string())
            }
        }
    }

    async fn create_instruction(&self, params: &CreateInstruction) -> Result<()> {
        debug!("Creating instruction: {}", params.title);
        let instruction = self
            .workflow
            .create_instruction(params)
            .await
            .context("Failed to create instruction")?;
        self.renderer
            .render(&CreateResult::new(instruction).to_string())
    }

    pub async fn list_instructions(&self) -> Result<()> {
        let summaries = self
            .workflow
            .list_summaries()
            .await
            .context("Failed to list instructions")?;
        let summaries = InstructionSummaries(summaries);

        if summaries.is_empty() {
            self.renderer.render(&summaries.to_string())
        } else {
            self.renderer
                .render(&format!("# Instructions\n\n{summaries}"))
        }
    }

    async fn show_instruction(&self, params: &InstructionId) -> Result<()> {
        let instruction = self
            .workflow
            .get_instruction(params)
            .await
            .context("Failed to load instruction")?;
        self.renderer.render(&instruction.to_string())
    }

    async fn generate_report(&self, params: &GenerateReport) -> Result<()> {
        let report = self
            .workflow
            .generate_final_report(params)
            .await
            .context("Failed to generate report")?;
        self.renderer.render(&report.to_string())
    }

    pub async fn tree(&self, params: &TreeDirectory) -> Result<()> {
        let report = self
            .workflow
            .tree_directory(params)
            .await
            .context("Failed to render directory tree")?;
        self.renderer.render(&report.to_string())
    }
}
