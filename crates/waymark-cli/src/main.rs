//! Waymark CLI Application
//!
//! Command-line and MCP front end for the Waymark development workflow.

mod args;
mod cli;
mod mcp;
mod renderer;

use std::{fs::OpenOptions, path::Path};

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use env_logger::{Env, Target};
use log::{debug, info};
use mcp::{run_http_server, run_stdio_server, WaymarkMcpServer};
use renderer::TerminalRenderer;
use waymark_core::WorkflowBuilder;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    let Args {
        project_root,
        no_color,
        log_file,
        command,
    } = Args::parse();

    init_logging(log_file.as_deref())?;

    let workflow = WorkflowBuilder::new()
        .with_project_root(project_root)
        .build()
        .await
        .context("Failed to initialize workflow")?;

    let renderer = TerminalRenderer::new(!no_color);

    debug!(
        "Waymark started in {}",
        workflow.project_root().display()
    );

    match command {
        Some(Instruction { command }) => {
            Cli::new(workflow, renderer)
                .handle_instruction_command(command)
                .await
        }
        Some(Tree(args)) => Cli::new(workflow, renderer).tree(&args.into()).await,
        Some(Git { command }) => {
            Cli::new(workflow, renderer)
                .handle_git_command(command)
                .await
        }
        Some(Serve(args)) => {
            let server = WaymarkMcpServer::new(workflow);
            if args.http {
                info!("Starting Waymark MCP server on {}:{}", args.host, args.port);
                run_http_server(server, &args.host, args.port)
                    .await
                    .context("MCP server failed")
            } else {
                info!("Starting Waymark MCP server");
                run_stdio_server(server).await.context("MCP server failed")
            }
        }
        None => Cli::new(workflow, renderer).list_instructions().await,
    }
}

/// Logs go to stderr unless a file is given; stdout carries the stdio
/// transport.
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let default_level = if std::env::var("MCP_DEBUG").is_ok_and(|value| value == "true") {
        "debug"
    } else {
        "info"
    };
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or(default_level));

    if let Some(path) = log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        builder.target(Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}
