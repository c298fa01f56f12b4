//! `add`: stages file contents (or staged deletions) into the index
//! (§4.3, §4.8 `validateFileAdd`). `add .` stages every trackable change
//! under the working tree, including deletions of tracked files.

use std::collections::BTreeSet;
use std::env;
use std::fs;

use clap::Parser;

use crate::errors::Result;
use crate::internal::object::Object;
use crate::internal::validator;
use crate::internal::workdir;
use crate::repository::Repository;
use crate::utils::path;

#[derive(Debug, Parser)]
pub struct AddArgs {
    /// Paths to stage, or `.` to stage every trackable change
    #[arg(required = true)]
    pub paths: Vec<String>,
}

pub fn execute(args: AddArgs) -> Result<()> {
    let repo = Repository::discover()?;
    validator::validate_file_operations(&repo.workdir)?;

    let mut index = repo.index()?;
    let head_tree = repo.head_tree()?;
    let store = repo.store();

    let targets = resolve_targets(&repo, &args.paths, &head_tree)?;

    for rel in &targets {
        let abs = repo.workdir.join(rel);
        validator::validate_file_add(&repo.workdir, &index, head_tree.contains_key(rel), rel)?;
        if abs.exists() {
            let bytes = fs::read(&abs)?;
            let hash = store.write(&Object::Blob { content: bytes })?;
            index.set(rel, &hash);
        } else {
            // Tracked in HEAD or already staged, but missing on disk: a
            // staged deletion (§4.3).
            index.set(rel, "");
        }
    }
    index.save()?;
    Ok(())
}

/// Expands `.` into every path that differs from HEAD: trackable working
/// tree files plus any HEAD-tracked path no longer present on disk.
/// Any other argument is normalized to a single repo-relative path.
fn resolve_targets(
    repo: &Repository,
    paths: &[String],
    head_tree: &std::collections::BTreeMap<String, String>,
) -> Result<Vec<String>> {
    if paths.iter().any(|p| p == ".") {
        let ignores = repo.ignores();
        let mut set: BTreeSet<String> =
            workdir::walk_trackable(&repo.workdir, &ignores)?.into_iter().collect();
        for tracked in head_tree.keys() {
            if !repo.workdir.join(tracked).exists() {
                set.insert(tracked.clone());
            }
        }
        return Ok(set.into_iter().collect());
    }

    let cwd = env::current_dir()?;
    paths
        .iter()
        .map(|p| {
            let abs = cwd.join(p);
            path::normalize(&repo.workdir, &abs).ok_or_else(|| {
                crate::errors::KilnError::PathNotFound(p.clone())
            })
        })
        .collect()
}
