//! CLI command definitions and dispatch.

pub mod resolve;
pub mod revert;
pub mod run;

use clap::{Parser, Subcommand};

/// faultline — single-target network fault injection agent.
#[derive(Parser, Debug)]
#[command(name = "fln", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one chaos experiment: inject, hold for the duration, remove.
    Run(run::RunArgs),
    /// Resolve and print the init PID of a target container.
    Resolve(resolve::ResolveArgs),
    /// Best-effort removal of a previously installed discipline.
    Revert(revert::RevertArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub async fn execute(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Run(args) => run::execute(args).await,
        Command::Resolve(args) => resolve::execute(args),
        Command::Revert(args) => revert::execute(args),
    }
}
