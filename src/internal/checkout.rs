//! Checkout engine (§4.6): switches HEAD to a commit and restores the
//! working tree to match, refusing to clobber paths the caller hasn't
//! staged or committed.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::errors::{KilnError, Result};
use crate::internal::ignore::IgnoreSet;
use crate::internal::object::Object;
use crate::internal::object_store::ObjectStore;
use crate::internal::refs::{branch_ref_path, RefStore};
use crate::internal::tree;
use crate::internal::workdir;
use crate::utils::path;

/// Resolves `target` (`HEAD`, a branch name, or a full/short commit hash)
/// to a commit hash and, if it names a branch, that branch's ref path.
pub fn resolve_target(
    store: &ObjectStore,
    refs: &RefStore,
    target: &str,
) -> Result<(String, Option<String>)> {
    if target == "HEAD" {
        let hash = refs
            .resolve_head()?
            .ok_or_else(|| KilnError::MissingRef("HEAD".to_string()))?;
        return Ok((hash, refs.current_branch_ref()?));
    }
    let branch_ref = branch_ref_path(target);
    if refs.ref_exists(&branch_ref) {
        let hash = refs
            .read_ref(&branch_ref)?
            .ok_or_else(|| KilnError::MissingRef(branch_ref.clone()))?;
        return Ok((hash, Some(branch_ref)));
    }
    let hash = store.resolve(target)?;
    require_commit(store, &hash)?;
    Ok((hash, None))
}

fn require_commit(store: &ObjectStore, hash: &str) -> Result<()> {
    match store.read(hash)? {
        Object::Commit { .. } => Ok(()),
        _ => Err(KilnError::NotACommit {
            target: hash.to_string(),
        }),
    }
}

/// Restores the working tree to `target_tree` (a flattened path->blob
/// map) and updates HEAD. `branch_ref`, if `Some`, makes HEAD symbolic to
/// that ref; otherwise HEAD becomes detached at `commit_hash`.
pub fn checkout(
    workdir_root: &Path,
    meta: &Path,
    store: &ObjectStore,
    refs: &RefStore,
    commit_hash: &str,
    branch_ref: Option<&str>,
) -> Result<()> {
    let target_obj = store.read(commit_hash)?;
    let Object::Commit { tree: tree_hash, .. } = target_obj else {
        return Err(KilnError::NotACommit {
            target: commit_hash.to_string(),
        });
    };
    let target_tree = tree::flatten(store, &tree_hash)?;
    let current_paths = workdir::walk_all(workdir_root)?;
    let ignores = IgnoreSet::load(workdir_root);

    for existing in &current_paths {
        if target_tree.contains_key(existing) {
            continue;
        }
        if is_important_path(existing, &ignores) {
            continue;
        }
        let abs = workdir_root.join(existing);
        if abs.exists() {
            fs::remove_file(&abs)?;
        }
    }

    for (rel_path, blob_hash) in &target_tree {
        let Object::Blob { content } = store.read(blob_hash)? else {
            return Err(KilnError::CorruptObject {
                hash: blob_hash.clone(),
                reason: "tree entry does not point at a blob".to_string(),
            });
        };
        let abs = workdir_root.join(rel_path);
        if let Some(parent) = abs.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&abs, content)?;
    }

    match branch_ref {
        Some(refpath) => refs.set_head_to_ref(refpath)?,
        None => refs.set_head_detached(commit_hash)?,
    }
    let _ = meta;
    info!(%commit_hash, branch = ?branch_ref, "checked out");
    Ok(())
}

/// Restores a single tracked path from HEAD without moving HEAD.
pub fn checkout_file(workdir_root: &Path, store: &ObjectStore, head_tree_entry: Option<&str>, rel_path: &str) -> Result<()> {
    let blob_hash = head_tree_entry.ok_or_else(|| KilnError::PathNotFound(rel_path.to_string()))?;
    let Object::Blob { content } = store.read(blob_hash)? else {
        return Err(KilnError::CorruptObject {
            hash: blob_hash.to_string(),
            reason: "path does not point at a blob".to_string(),
        });
    };
    let abs = workdir_root.join(rel_path);
    if let Some(parent) = abs.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&abs, content)?;
    Ok(())
}

/// A path is "important" (never silently deleted by checkout) if it is
/// matched by ignore rules or under the metadata directory (§4.6 step 4).
fn is_important_path(rel: &str, ignores: &IgnoreSet) -> bool {
    rel.starts_with(&format!("{}/", path::META_DIR)) || ignores.is_ignored(rel)
}
