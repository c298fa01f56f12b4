//! `status`: renders the classifier's output (§4.4) grouped by file state.

use clap::Parser;
use colored::Colorize;

use crate::errors::Result;
use crate::internal::classifier::FileState;
use crate::internal::validator;
use crate::repository::Repository;

#[derive(Debug, Parser)]
pub struct StatusArgs {}

pub fn execute(_args: StatusArgs) -> Result<()> {
    let repo = Repository::discover()?;
    validator::validate_file_operations(&repo.workdir)?;

    let branch = repo
        .current_branch_name()?
        .unwrap_or_else(|| "HEAD (detached)".to_string());
    println!("On branch {}", branch.green());

    let status = repo.status()?;
    print_group(&status, FileState::Staged, "Changes to be committed:");
    print_group(&status, FileState::Deleted, "Deleted:");
    print_group(&status, FileState::Modified, "Changes not staged for commit:");
    print_group(&status, FileState::Conflicted, "Unmerged paths:");
    print_group(&status, FileState::Untracked, "Untracked files:");

    if status.is_clean() {
        println!("nothing to commit, working tree clean");
    }
    Ok(())
}

fn print_group(status: &crate::internal::classifier::Status, state: FileState, header: &str) {
    let paths = status.paths_with(state);
    if paths.is_empty() {
        return;
    }
    println!("{}", header.bold());
    for path in paths {
        println!("\t{path}");
    }
}
