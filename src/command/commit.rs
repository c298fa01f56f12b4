//! `commit`: the snapshot builder's CLI surface (§4.5). Runs the
//! pre-commit hook (§4.10) before any mutation, then merges the index
//! into HEAD's tree, writes the commit object, and advances the current
//! ref.

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
#[cfg(unix)]
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;

use crate::errors::{KilnError, Result};
use crate::internal::classifier::FileState;
use crate::internal::config;
use crate::internal::snapshot::{self, CommitRequest};
use crate::internal::validator;
use crate::repository::Repository;

#[derive(Debug, Parser)]
pub struct CommitArgs {
    /// Commit message
    #[arg(short = 'm', long = "message")]
    pub message: String,
}

pub fn execute(args: CommitArgs) -> Result<()> {
    let repo = Repository::discover()?;
    validator::validate_file_operations(&repo.workdir)?;

    let mut index = repo.index()?;
    let merge_target = crate::internal::merge::merge_head(&repo.meta)?;
    if merge_target.is_none() {
        validator::validate_commit(&index)?;
    } else {
        let status = repo.status()?;
        if !status.paths_with(FileState::Conflicted).is_empty() {
            return Err(KilnError::ConflictsRemain);
        }
    }
    run_pre_commit_hook(&repo.meta, &repo.workdir)?;

    let head_tree = repo.head_tree()?;
    let head_commit = repo.head_commit()?;
    let repo_config = repo.config();
    let author = config::default_author(&repo_config);
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64;

    let extra_parents = match &merge_target {
        Some(target) => vec![target.clone()],
        None => vec![],
    };
    let message = if extra_parents.is_empty() {
        args.message.clone()
    } else {
        crate::internal::merge::merge_message(&repo.meta).unwrap_or_else(|_| args.message.clone())
    };

    let hash = snapshot::commit(
        &repo.store(),
        &repo.refs(),
        &mut index,
        &head_tree,
        head_commit.as_deref(),
        CommitRequest {
            author: &author,
            message: &message,
            timestamp,
            extra_parents,
        },
    )?;

    if merge_target.is_some() {
        crate::internal::merge::abort_merge(&repo.meta)?;
    }

    println!(
        "[{}] {}",
        &hash[..7.min(hash.len())],
        message.lines().next().unwrap_or("")
    );
    Ok(())
}

/// Shells out to `<meta>/hooks/pre-commit` if present and executable
/// (§4.10). A non-zero exit aborts the commit before any mutation.
#[cfg(unix)]
fn run_pre_commit_hook(meta: &Path, workdir: &Path) -> Result<()> {
    let hook = meta.join("hooks").join("pre-commit");
    if !hook.is_file() {
        return Ok(());
    }
    let is_executable = hook
        .metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false);
    if !is_executable {
        return Ok(());
    }
    let status = Command::new(&hook).current_dir(workdir).status()?;
    if !status.success() {
        return Err(KilnError::HookRejected(status.code().unwrap_or(-1)));
    }
    Ok(())
}

#[cfg(not(unix))]
fn run_pre_commit_hook(_meta: &Path, _workdir: &Path) -> Result<()> {
    Ok(())
}
