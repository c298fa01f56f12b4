//! CLI entry point: defines the `kiln` subcommands and dispatches each to
//! its handler in [`crate::command`]. Parsing is synchronous — the whole
//! engine is single-threaded, cooperatively sequential (§5) — unlike the
//! teacher's `tokio`-driven dispatcher.

use clap::{Parser, Subcommand};

use crate::command;
use crate::errors::Result;

#[derive(Parser, Debug)]
#[command(
    name = "kiln",
    about = "A local, Git-compatible-in-spirit version control engine",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Create an empty repository in the current directory")]
    Init(command::init::InitArgs),
    #[command(about = "Add file contents to the index")]
    Add(command::add::AddArgs),
    #[command(about = "Record staged changes as a new commit")]
    Commit(command::commit::CommitArgs),
    #[command(about = "Show the working tree status")]
    Status(command::status::StatusArgs),
    #[command(about = "Show commit logs reachable from HEAD")]
    Log(command::log::LogArgs),
    #[command(about = "Show changes between the working tree and HEAD")]
    Diff(command::diff::DiffArgs),
    #[command(about = "Switch branches or restore a tracked file")]
    Checkout(command::checkout::CheckoutArgs),
    #[command(about = "List or create branches")]
    Branch(command::branch::BranchArgs),
    #[command(about = "Merge a branch into the current branch")]
    Merge(command::merge::MergeArgs),
    #[command(about = "Get or set repository configuration values")]
    Config(command::config::ConfigArgs),
}

/// Parses `args` (or `std::env::args` when `None`) and dispatches to the
/// matching command handler.
pub fn run(args: Option<&[&str]>) -> Result<()> {
    let cli = match args {
        Some(args) => Cli::try_parse_from(args)
            .map_err(|e| crate::errors::KilnError::InvalidArgument(e.to_string()))?,
        None => Cli::parse(),
    };

    match cli.command {
        Commands::Init(args) => command::init::execute(args),
        Commands::Add(args) => command::add::execute(args),
        Commands::Commit(args) => command::commit::execute(args),
        Commands::Status(args) => command::status::execute(args),
        Commands::Log(args) => command::log::execute(args),
        Commands::Diff(args) => command::diff::execute(args),
        Commands::Checkout(args) => command::checkout::execute(args),
        Commands::Branch(args) => command::branch::execute(args),
        Commands::Merge(args) => command::merge::execute(args),
        Commands::Config(args) => command::config::execute(args),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        super::Cli::command().debug_assert()
    }
}
