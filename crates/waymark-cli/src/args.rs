use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{GitCommands, InstructionCommands, ServeArgs, TreeArgs};

/// Command-line interface for the Waymark development workflow
///
/// Waymark walks a development task through five recorded phases (user
/// instruction, task planning, information gathering, analysis and
/// orchestration, result synthesis). The same operations are exposed to AI
/// assistants over MCP with `waymark serve`.
#[derive(Parser)]
#[command(version, about, name = "waymark")]
pub struct Args {
    /// Project directory that file paths, commands and instruction state are
    /// rooted at. Defaults to the current directory
    #[arg(long, global = true, env = "WAYMARK_PROJECT_ROOT")]
    pub project_root: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Append log output to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the Waymark CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Create and inspect instructions
    #[command(alias = "i")]
    Instruction {
        #[command(subcommand)]
        command: InstructionCommands,
    },
    /// Render the project directory tree
    #[command(alias = "t")]
    Tree(TreeArgs),
    /// Read-only git queries against the project
    #[command(alias = "g")]
    Git {
        #[command(subcommand)]
        command: GitCommands,
    },
    /// Start the MCP server
    Serve(ServeArgs),
}
