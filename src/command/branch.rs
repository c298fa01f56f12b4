//! `branch`: lists local branches, creates one at the current HEAD
//! commit (§4.8 `validateBranchCreation`), or deletes one with
//! `--delete`.

use clap::Parser;
use colored::Colorize;

use crate::errors::{KilnError, Result};
use crate::internal::validator;
use crate::repository::Repository;

#[derive(Debug, Parser)]
pub struct BranchArgs {
    /// Name of the branch to create at the current HEAD commit. Omit to
    /// list existing branches.
    pub name: Option<String>,

    /// Delete the named branch instead of creating one
    #[arg(short = 'd', long = "delete")]
    pub delete: Option<String>,
}

pub fn execute(args: BranchArgs) -> Result<()> {
    let repo = Repository::discover()?;
    validator::validate_file_operations(&repo.workdir)?;
    let refs = repo.refs();

    if let Some(name) = args.delete {
        let branch_ref = crate::internal::refs::branch_ref_path(&name);
        if !refs.ref_exists(&branch_ref) {
            return Err(KilnError::MissingRef(branch_ref));
        }
        if repo.current_branch_name()?.as_deref() == Some(name.as_str()) {
            return Err(KilnError::InvalidArgument(format!(
                "cannot delete branch '{name}': currently checked out"
            )));
        }
        refs.delete_ref(&branch_ref)?;
        println!("Deleted branch '{name}'");
        return Ok(());
    }

    match args.name {
        None => {
            let current = repo.current_branch_name()?;
            for name in refs.list_branches()? {
                if Some(&name) == current.as_ref() {
                    println!("* {}", name.green());
                } else {
                    println!("  {name}");
                }
            }
        }
        Some(name) => {
            validator::validate_branch_creation(&refs, &name)?;
            let head = repo
                .head_commit()?
                .ok_or_else(|| KilnError::MissingRef("HEAD".to_string()))?;
            refs.update_ref(&crate::internal::refs::branch_ref_path(&name), &head)?;
            println!("Created branch '{name}' at {}", &head[..7.min(head.len())]);
        }
    }
    Ok(())
}
