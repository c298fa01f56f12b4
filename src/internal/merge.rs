//! Ancestry and three-way merge (§4.7): BFS ancestor enumeration, a
//! first-hit common ancestor (not guaranteed lowest, per §9 open question
//! 1 — see DESIGN.md), fast-forward detection, conflict classification,
//! and merge-state persistence (`MERGE_HEAD`/`MERGE_MSG`).

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fs;
use std::path::Path;

use crate::errors::{KilnError, Result};
use crate::internal::object::Object;
use crate::internal::object_store::ObjectStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    AddedModified,
    BothModified,
    DeletedModified,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathOutcome {
    TakeTheirs(String),
    KeepOurs(Option<String>),
    NoChange(Option<String>),
    DeletionAccepted,
    Conflict {
        kind: ConflictKind,
        ours: Option<String>,
        theirs: Option<String>,
    },
}

/// BFS over parent edges starting at `start`, inclusive. Guards against
/// diamond-shaped history with a seen set (§9).
pub fn ancestors(store: &ObjectStore, start: &str) -> Result<Vec<String>> {
    let mut seen = BTreeSet::new();
    let mut order = Vec::new();
    let mut queue = VecDeque::new();
    queue.push_back(start.to_string());
    seen.insert(start.to_string());
    while let Some(hash) = queue.pop_front() {
        order.push(hash.clone());
        if let Object::Commit { parents, .. } = store.read(&hash)? {
            for parent in parents {
                if seen.insert(parent.clone()) {
                    queue.push_back(parent);
                }
            }
        }
    }
    Ok(order)
}

/// Returns the first commit in `ancestors(a)`'s BFS order that also
/// appears in `ancestors(b)`, per §4.7/§9's documented (non-LCA-guaranteed)
/// behavior.
pub fn common_ancestor(store: &ObjectStore, a: &str, b: &str) -> Result<Option<String>> {
    let a_ancestors = ancestors(store, a)?;
    let b_ancestors: BTreeSet<String> = ancestors(store, b)?.into_iter().collect();
    Ok(a_ancestors.into_iter().find(|h| b_ancestors.contains(h)))
}

/// `current` is an ancestor of `target` — fast-forward is possible.
pub fn is_fast_forward(store: &ObjectStore, current: &str, target: &str) -> Result<bool> {
    Ok(ancestors(store, target)?.iter().any(|h| h == current))
}

/// Classifies every path present in any of the three trees per §4.7's
/// table. Absent entries are represented as `None`.
pub fn classify_paths(
    ancestor_tree: &BTreeMap<String, String>,
    ours_tree: &BTreeMap<String, String>,
    theirs_tree: &BTreeMap<String, String>,
) -> BTreeMap<String, PathOutcome> {
    let mut paths: BTreeSet<&str> = BTreeSet::new();
    paths.extend(ancestor_tree.keys().map(|s| s.as_str()));
    paths.extend(ours_tree.keys().map(|s| s.as_str()));
    paths.extend(theirs_tree.keys().map(|s| s.as_str()));

    let mut out = BTreeMap::new();
    for path in paths {
        let ancestor = ancestor_tree.get(path);
        let ours = ours_tree.get(path);
        let theirs = theirs_tree.get(path);
        out.insert(path.to_string(), classify_path(ancestor, ours, theirs));
    }
    out
}

fn classify_path(
    ancestor: Option<&String>,
    ours: Option<&String>,
    theirs: Option<&String>,
) -> PathOutcome {
    match (ancestor, ours, theirs) {
        (None, None, Some(t)) => PathOutcome::TakeTheirs(t.clone()),
        (None, Some(o), None) => PathOutcome::KeepOurs(Some(o.clone())),
        (None, Some(o), Some(t)) if o == t => PathOutcome::NoChange(Some(o.clone())),
        (None, Some(o), Some(t)) => PathOutcome::Conflict {
            kind: ConflictKind::AddedModified,
            ours: Some(o.clone()),
            theirs: Some(t.clone()),
        },
        (Some(a), Some(o), Some(t)) if o == a && t == a => PathOutcome::NoChange(Some(a.clone())),
        (Some(a), Some(o), Some(t)) if o == a && t != a => PathOutcome::TakeTheirs(t.clone()),
        (Some(a), Some(o), Some(t)) if o != a && t == a => PathOutcome::KeepOurs(Some(o.clone())),
        (Some(a), Some(o), Some(t)) => {
            if o == t {
                PathOutcome::NoChange(Some(o.clone()))
            } else {
                let _ = a;
                PathOutcome::Conflict {
                    kind: ConflictKind::BothModified,
                    ours: Some(o.clone()),
                    theirs: Some(t.clone()),
                }
            }
        }
        (Some(a), None, Some(t)) if t == a => PathOutcome::DeletionAccepted,
        (Some(a), Some(o), None) if o == a => PathOutcome::DeletionAccepted,
        (Some(a), None, Some(t)) => {
            let _ = a;
            PathOutcome::Conflict {
                kind: ConflictKind::DeletedModified,
                ours: None,
                theirs: Some(t.clone()),
            }
        }
        (Some(a), Some(o), None) => {
            let _ = a;
            PathOutcome::Conflict {
                kind: ConflictKind::DeletedModified,
                ours: Some(o.clone()),
                theirs: None,
            }
        }
        (Some(_), None, None) => PathOutcome::DeletionAccepted,
        (None, None, None) => PathOutcome::NoChange(None),
    }
}

const DEFAULT_MERGE_MESSAGE: &str = "Merge commit\n";

pub fn start_merge(meta: &Path, target_commit: &str) -> Result<()> {
    fs::write(meta.join("MERGE_HEAD"), format!("{target_commit}\n"))?;
    fs::write(meta.join("MERGE_MSG"), DEFAULT_MERGE_MESSAGE)?;
    Ok(())
}

pub fn merge_head(meta: &Path) -> Result<Option<String>> {
    match fs::read_to_string(meta.join("MERGE_HEAD")) {
        Ok(s) => Ok(Some(s.trim().to_string())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn merge_message(meta: &Path) -> Result<String> {
    fs::read_to_string(meta.join("MERGE_MSG")).map_err(|_| KilnError::NoMergeInProgress)
}

/// Deletes `MERGE_HEAD`/`MERGE_MSG`. Does not restore working-tree content.
pub fn abort_merge(meta: &Path) -> Result<()> {
    for name in ["MERGE_HEAD", "MERGE_MSG"] {
        let p = meta.join(name);
        if p.exists() {
            fs::remove_file(p)?;
        }
    }
    Ok(())
}

const CONFLICT_START: &str = "<<<<<<< HEAD";
const CONFLICT_MID: &str = "=======";
const CONFLICT_END: &str = ">>>>>>>";

/// Writes the standard conflict marker block for `path` (§6).
pub fn conflict_marker(path: &str, ours: &str, theirs: &str) -> String {
    format!("{CONFLICT_START}\n{ours}{CONFLICT_MID}\n{theirs}{CONFLICT_END} {path}\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::internal::object::{ObjectKind, TreeEntry};

    fn write_commit(store: &ObjectStore, parents: Vec<String>) -> String {
        let tree = store.write(&Object::Tree { entries: vec![] }).unwrap();
        store
            .write(&Object::Commit {
                tree,
                parents,
                author: "Ada <ada@example.com>".to_string(),
                timestamp: 0,
                message: "c".to_string(),
            })
            .unwrap()
    }

    #[test]
    fn ancestors_includes_start_and_follows_parents() {
        let dir = tempfile::tempdir().unwrap();
        let store = ObjectStore::new(dir.path().to_path_buf());
        let root = write_commit(&store, vec![]);
        let child = write_commit(&store, vec![root.clone()]);
        let set = ancestors(&store, &child).unwrap();
        assert_eq!(set, vec![child.clone(), root.clone()]);
    }

    #[test]
    fn fast_forward_detected_when_current_is_ancestor() {
        let dir = tempfile::tempdir().unwrap();
        let store = ObjectStore::new(dir.path().to_path_buf());
        let root = write_commit(&store, vec![]);
        let child = write_commit(&store, vec![root.clone()]);
        assert!(is_fast_forward(&store, &root, &child).unwrap());
        assert!(!is_fast_forward(&store, &child, &root).unwrap());
    }

    #[test]
    fn common_ancestor_finds_single_merge_base() {
        let dir = tempfile::tempdir().unwrap();
        let store = ObjectStore::new(dir.path().to_path_buf());
        let root = write_commit(&store, vec![]);
        let a = write_commit(&store, vec![root.clone()]);
        let b = write_commit(&store, vec![root.clone()]);
        assert_eq!(common_ancestor(&store, &a, &b).unwrap(), Some(root));
    }

    #[test]
    fn both_modified_conflict_when_neither_side_matches_ancestor() {
        let mut ancestor = BTreeMap::new();
        ancestor.insert("a.txt".to_string(), "A".repeat(40));
        let mut ours = BTreeMap::new();
        ours.insert("a.txt".to_string(), "B".repeat(40));
        let mut theirs = BTreeMap::new();
        theirs.insert("a.txt".to_string(), "C".repeat(40));

        let outcomes = classify_paths(&ancestor, &ours, &theirs);
        assert!(matches!(
            outcomes.get("a.txt"),
            Some(PathOutcome::Conflict {
                kind: ConflictKind::BothModified,
                ..
            })
        ));
    }

    #[test]
    fn added_in_both_with_different_content_conflicts() {
        let ancestor = BTreeMap::new();
        let mut ours = BTreeMap::new();
        ours.insert("new.txt".to_string(), "B".repeat(40));
        let mut theirs = BTreeMap::new();
        theirs.insert("new.txt".to_string(), "C".repeat(40));

        let outcomes = classify_paths(&ancestor, &ours, &theirs);
        assert!(matches!(
            outcomes.get("new.txt"),
            Some(PathOutcome::Conflict {
                kind: ConflictKind::AddedModified,
                ..
            })
        ));
    }

    #[test]
    fn delete_vs_modify_conflicts() {
        let mut ancestor = BTreeMap::new();
        ancestor.insert("a.txt".to_string(), "A".repeat(40));
        let ours = BTreeMap::new();
        let mut theirs = BTreeMap::new();
        theirs.insert("a.txt".to_string(), "B".repeat(40));

        let outcomes = classify_paths(&ancestor, &ours, &theirs);
        assert!(matches!(
            outcomes.get("a.txt"),
            Some(PathOutcome::Conflict {
                kind: ConflictKind::DeletedModified,
                ..
            })
        ));
    }
}
