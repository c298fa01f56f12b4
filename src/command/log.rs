//! `log`: walks commit history from HEAD and renders each commit (§9
//! open question 4 — ref-walk, not a full object-directory scan; see
//! DESIGN.md).

use clap::Parser;

use crate::errors::{KilnError, Result};
use crate::internal::log as commit_log;
use crate::internal::validator;
use crate::repository::Repository;

#[derive(Debug, Parser)]
pub struct LogArgs {}

pub fn execute(_args: LogArgs) -> Result<()> {
    let repo = Repository::discover()?;
    validator::validate_file_operations(&repo.workdir)?;

    let head = repo
        .head_commit()?
        .ok_or_else(|| KilnError::MissingRef("HEAD".to_string()))?;
    let store = repo.store();
    for entry in commit_log::history(&store, &head)? {
        print!("{}", commit_log::format_entry(&entry));
    }
    Ok(())
}
