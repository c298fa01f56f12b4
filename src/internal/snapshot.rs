//! Snapshot builder (§4.5): turns the current index plus HEAD's tree into
//! a new commit object, advances the current ref, and clears the index.

use std::collections::BTreeMap;

use tracing::info;

use crate::errors::{KilnError, Result};
use crate::internal::index::Index;
use crate::internal::object::Object;
use crate::internal::object_store::ObjectStore;
use crate::internal::refs::RefStore;
use crate::internal::tree;

pub struct CommitRequest<'a> {
    pub author: &'a str,
    pub message: &'a str,
    pub timestamp: i64,
    /// Extra parents beyond HEAD's current commit (merge commits pass the
    /// other side here).
    pub extra_parents: Vec<String>,
}

/// Applies §4.5 steps 1-5. Returns the new commit's hash.
///
/// `head_tree` is HEAD's flattened path->blob map (empty for an unborn
/// branch); `head_commit` is HEAD's current commit hash, if any.
pub fn commit(
    store: &ObjectStore,
    refs: &RefStore,
    index: &mut Index,
    head_tree: &BTreeMap<String, String>,
    head_commit: Option<&str>,
    req: CommitRequest,
) -> Result<String> {
    if index.is_empty() && req.extra_parents.is_empty() {
        return Err(KilnError::NothingToCommit);
    }

    // Step 1: merge index into HEAD's flattened map.
    let mut effective = head_tree.clone();
    for (path, hash) in index.iter() {
        if hash.is_empty() {
            effective.remove(path);
        } else {
            effective.insert(path.to_string(), hash.to_string());
        }
    }

    // Steps 2-3: group by directory and emit trees bottom-up.
    let root_tree = tree::build(store, &effective)?;

    // Step 4: build the commit object.
    let mut parents = Vec::new();
    if let Some(h) = head_commit {
        parents.push(h.to_string());
    }
    parents.extend(req.extra_parents);

    let commit_obj = Object::Commit {
        tree: root_tree,
        parents,
        author: req.author.to_string(),
        timestamp: req.timestamp,
        message: req.message.to_string(),
    };

    // Step 5: write commit, advance ref, clear index.
    let commit_hash = store.write(&commit_obj)?;
    refs.advance_head(&commit_hash)?;
    index.clear();
    index.save()?;
    info!(hash = %commit_hash, "created commit");
    Ok(commit_hash)
}
