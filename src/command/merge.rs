//! `merge`: fast-forward detection, three-way conflict classification,
//! and merge-state persistence (§4.7). `merge --abort` deletes
//! `MERGE_HEAD`/`MERGE_MSG` without touching the working tree.

use std::fs;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;

use crate::errors::{KilnError, Result};
use crate::internal::checkout;
use crate::internal::config;
use crate::internal::merge::{self, PathOutcome};
use crate::internal::object::Object;
use crate::internal::object_store::ObjectStore;
use crate::internal::refs::branch_ref_path;
use crate::internal::tree;
use crate::internal::validator;
use crate::repository::Repository;

#[derive(Debug, Parser)]
pub struct MergeArgs {
    /// Branch to merge into the current branch
    pub branch: Option<String>,

    /// Abort an in-progress merge
    #[arg(long)]
    pub abort: bool,
}

pub fn execute(args: MergeArgs) -> Result<()> {
    let repo = Repository::discover()?;
    validator::validate_file_operations(&repo.workdir)?;

    if args.abort {
        merge::abort_merge(&repo.meta)?;
        println!("Merge aborted");
        return Ok(());
    }

    let branch = args
        .branch
        .ok_or_else(|| KilnError::InvalidArgument("merge requires a branch name".to_string()))?;
    let refs = repo.refs();
    let store = repo.store();
    let status = repo.status()?;
    let current_branch = repo.current_branch_name()?.unwrap_or_default();
    validator::validate_merge(&repo.meta, &refs, &status, &branch, &current_branch)?;

    let current_head = repo
        .head_commit()?
        .ok_or_else(|| KilnError::MissingRef("HEAD".to_string()))?;
    let target_ref = branch_ref_path(&branch);
    let target_commit = refs
        .read_ref(&target_ref)?
        .ok_or_else(|| KilnError::MissingRef(target_ref))?;

    if merge::is_fast_forward(&store, &current_head, &target_commit)? {
        refs.advance_head(&target_commit)?;
        checkout::checkout(
            &repo.workdir,
            &repo.meta,
            &store,
            &refs,
            &target_commit,
            refs.current_branch_ref()?.as_deref(),
        )?;
        println!("Fast-forward");
        return Ok(());
    }

    let ancestor_hash = merge::common_ancestor(&store, &current_head, &target_commit)?;
    let ours_tree = commit_tree(&store, &current_head)?;
    let theirs_tree = commit_tree(&store, &target_commit)?;
    let ancestor_tree = match &ancestor_hash {
        Some(h) => commit_tree(&store, h)?,
        None => std::collections::BTreeMap::new(),
    };

    let outcomes = merge::classify_paths(&ancestor_tree, &ours_tree, &theirs_tree);
    let mut resolved = std::collections::BTreeMap::new();
    let mut conflicts = Vec::new();
    for (path, outcome) in &outcomes {
        match outcome {
            PathOutcome::TakeTheirs(hash) | PathOutcome::KeepOurs(Some(hash)) | PathOutcome::NoChange(Some(hash)) => {
                resolved.insert(path.clone(), hash.clone());
            }
            PathOutcome::KeepOurs(None) | PathOutcome::NoChange(None) | PathOutcome::DeletionAccepted => {}
            PathOutcome::Conflict { .. } => conflicts.push(path.clone()),
        }
    }

    if conflicts.is_empty() {
        let root_tree = tree::build(&store, &resolved)?;
        let repo_config = repo.config();
        let author = config::default_author(&repo_config);
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64;
        let commit_obj = Object::Commit {
            tree: root_tree,
            parents: vec![current_head.clone(), target_commit.clone()],
            author,
            timestamp,
            message: format!("Merge branch '{branch}'\n"),
        };
        let hash = store.write(&commit_obj)?;
        refs.advance_head(&hash)?;
        checkout::checkout(
            &repo.workdir,
            &repo.meta,
            &store,
            &refs,
            &hash,
            refs.current_branch_ref()?.as_deref(),
        )?;
        println!("Merge made by the three-way merge strategy.");
    } else {
        merge::start_merge(&repo.meta, &target_commit)?;
        for path in &conflicts {
            if let Some(PathOutcome::Conflict { ours, theirs, .. }) = outcomes.get(path) {
                let ours_content = blob_content_or_empty(&store, ours.as_deref())?;
                let theirs_content = blob_content_or_empty(&store, theirs.as_deref())?;
                let marker = merge::conflict_marker(path, &ours_content, &theirs_content);
                fs::write(repo.workdir.join(path), marker)?;
            }
        }
        println!("Automatic merge failed; fix conflicts and then commit the result.");
    }
    Ok(())
}

fn commit_tree(store: &ObjectStore, commit_hash: &str) -> Result<std::collections::BTreeMap<String, String>> {
    let Object::Commit { tree: tree_hash, .. } = store.read(commit_hash)? else {
        return Err(KilnError::NotACommit {
            target: commit_hash.to_string(),
        });
    };
    tree::flatten(store, &tree_hash)
}

fn blob_content_or_empty(store: &ObjectStore, hash: Option<&str>) -> Result<String> {
    match hash {
        None => Ok(String::new()),
        Some(hash) => match store.read(hash)? {
            Object::Blob { content } => Ok(String::from_utf8_lossy(&content).into_owned()),
            _ => Ok(String::new()),
        },
    }
}
