//! `checkout`: switches HEAD and restores the working tree (§4.6), or
//! (with a file argument) restores a single tracked path from HEAD
//! without moving HEAD.

use clap::Parser;

use crate::errors::{KilnError, Result};
use crate::internal::checkout;
use crate::internal::validator;
use crate::repository::Repository;

#[derive(Debug, Parser)]
pub struct CheckoutArgs {
    /// `HEAD`, a branch name, or a full/short commit hash to switch to
    pub target: Option<String>,

    /// Restore this single path from HEAD instead of switching HEAD
    /// (`checkout -- <file>`)
    #[arg(last = true)]
    pub file: Option<String>,
}

pub fn execute(args: CheckoutArgs) -> Result<()> {
    let repo = Repository::discover()?;
    validator::validate_file_operations(&repo.workdir)?;

    if let Some(file) = args.file {
        let head_tree = repo.head_tree()?;
        checkout::checkout_file(&repo.workdir, &repo.store(), head_tree.get(&file).map(|s| s.as_str()), &file)?;
        println!("Updated 1 path from HEAD");
        return Ok(());
    }

    let target = args
        .target
        .ok_or_else(|| KilnError::InvalidArgument("checkout requires a target".to_string()))?;

    let store = repo.store();
    let refs = repo.refs();
    let (commit_hash, branch_ref) = checkout::resolve_target(&store, &refs, &target)?;
    let current_head = refs.resolve_head()?.unwrap_or_default();

    if commit_hash == current_head {
        println!("Already on '{target}'");
        return Ok(());
    }

    let status = repo.status()?;
    validator::validate_checkout(&status, &current_head, &commit_hash)?;
    checkout::checkout(
        &repo.workdir,
        &repo.meta,
        &store,
        &refs,
        &commit_hash,
        branch_ref.as_deref(),
    )?;

    match branch_ref {
        Some(refpath) => println!(
            "Switched to branch '{}'",
            refpath.trim_start_matches("refs/heads/")
        ),
        None => println!("HEAD is now at {}", &commit_hash[..7.min(commit_hash.len())]),
    }
    Ok(())
}
