//! State classifier (§4.4): a pure function joining HEAD tree × index ×
//! working tree into a per-path [`FileState`]. Read-only and deterministic
//! — the source of truth for `status` and for every precondition check
//! the validator performs ("working tree clean", "nothing to commit").

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use crate::errors::Result;
use crate::internal::hash::hash_bytes;
use crate::internal::index::Index;
use crate::internal::object::Object;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FileState {
    Unmodified,
    Modified,
    Staged,
    Untracked,
    Deleted,
    Conflicted,
}

#[derive(Debug, Default)]
pub struct Status {
    pub states: BTreeMap<String, FileState>,
}

impl Status {
    pub fn paths_with(&self, state: FileState) -> Vec<&str> {
        self.states
            .iter()
            .filter(|(_, s)| **s == state)
            .map(|(p, _)| p.as_str())
            .collect()
    }

    pub fn is_clean(&self) -> bool {
        self.states
            .values()
            .all(|s| matches!(s, FileState::Unmodified))
    }

    /// True if nothing would be silently clobbered by checkout/merge:
    /// no staged changes and no modified/deleted/conflicted tracked
    /// files. Untracked files never block (§4.6, §4.8).
    pub fn has_no_blocking_changes(&self) -> bool {
        self.states.values().all(|s| {
            matches!(
                s,
                FileState::Unmodified | FileState::Untracked
            )
        })
    }
}

/// Classifies every path appearing in `head_tree`, the index, or the
/// working tree. `head_tree` is the flattened HEAD path->blob-hash map
/// (empty for an unborn branch). `workdir_paths` is the ignore-filtered
/// set of trackable paths under the working tree.
pub fn classify(
    workdir: &Path,
    head_tree: &BTreeMap<String, String>,
    index: &Index,
    workdir_paths: &[String],
) -> Result<Status> {
    let workdir_set: BTreeSet<&str> = workdir_paths.iter().map(|s| s.as_str()).collect();

    let mut all_paths: BTreeSet<&str> = BTreeSet::new();
    all_paths.extend(head_tree.keys().map(|s| s.as_str()));
    all_paths.extend(index.iter().map(|(p, _)| p));
    all_paths.extend(workdir_set.iter().copied());

    let mut states = BTreeMap::new();
    for path in all_paths {
        let head_hash = head_tree.get(path);
        let staged = index.get(path);
        let in_workdir = workdir_set.contains(path);

        let wd_hash = if in_workdir {
            Some(hash_working_file(workdir, path)?)
        } else {
            None
        };

        let state = classify_one(head_hash, staged, wd_hash.as_deref());
        states.insert(path.to_string(), state);

        // Conflict markers override any other classification for a path
        // present in the working tree.
        if in_workdir && is_conflicted(workdir, path)? {
            states.insert(path.to_string(), FileState::Conflicted);
        }
    }
    Ok(Status { states })
}

fn classify_one(
    head_hash: Option<&String>,
    staged: Option<&str>,
    wd_hash: Option<&str>,
) -> FileState {
    match (head_hash, staged, wd_hash) {
        // Staged deletion, regardless of HEAD state.
        (_, Some(""), _) => FileState::Deleted,
        // Freshly re-added identical to HEAD: staged, working tree, and
        // HEAD all agree, so there is nothing pending to commit.
        (Some(head), Some(staged_hash), Some(wd))
            if !staged_hash.is_empty() && staged_hash == head && wd == staged_hash =>
        {
            FileState::Unmodified
        }
        // Explicitly staged content (non-empty hash).
        (head, Some(staged_hash), wd) if !staged_hash.is_empty() => {
            // §9 open question 2: a path that is staged and then modified
            // again in the working tree is classified canonically as
            // STAGED (not also MODIFIED) — see DESIGN.md.
            let _ = head;
            match wd {
                Some(w) if w == staged_hash => FileState::Staged,
                Some(_) => FileState::Staged,
                None => FileState::Staged,
            }
        }
        // Not staged: compare HEAD to working tree.
        (Some(head), None, Some(wd)) if head == wd => FileState::Unmodified,
        (Some(_), None, Some(_)) => FileState::Modified,
        (Some(_), None, None) => FileState::Deleted,
        (None, None, Some(_)) => FileState::Untracked,
        (None, None, None) => FileState::Untracked,
    }
}

fn hash_working_file(workdir: &Path, rel: &str) -> Result<String> {
    let bytes = fs::read(workdir.join(rel))?;
    let obj = Object::Blob { content: bytes };
    Ok(hash_bytes(&obj.to_canonical_bytes()?))
}

const CONFLICT_START: &str = "<<<<<<< HEAD";
const CONFLICT_MID: &str = "=======";
const CONFLICT_END: &str = ">>>>>>>";

fn is_conflicted(workdir: &Path, rel: &str) -> Result<bool> {
    let text = match fs::read_to_string(workdir.join(rel)) {
        Ok(t) => t,
        Err(_) => return Ok(false),
    };
    let Some(start) = text.find(CONFLICT_START) else {
        return Ok(false);
    };
    let Some(mid) = text[start..].find(CONFLICT_MID) else {
        return Ok(false);
    };
    let mid = start + mid;
    Ok(text[mid..].contains(CONFLICT_END))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmodified_when_wd_matches_head() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "hello\n").unwrap();
        let blob_hash = hash_bytes(
            &Object::Blob {
                content: b"hello\n".to_vec(),
            }
            .to_canonical_bytes()
            .unwrap(),
        );
        let mut head = BTreeMap::new();
        head.insert("a.txt".to_string(), blob_hash);
        let index = Index::load(dir.path().join("index")).unwrap();
        let status = classify(dir.path(), &head, &index, &["a.txt".to_string()]).unwrap();
        assert_eq!(status.states.get("a.txt"), Some(&FileState::Unmodified));
    }

    #[test]
    fn untracked_file_not_in_head_or_index() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("new.txt"), "x").unwrap();
        let head = BTreeMap::new();
        let index = Index::load(dir.path().join("index")).unwrap();
        let status = classify(dir.path(), &head, &index, &["new.txt".to_string()]).unwrap();
        assert_eq!(status.states.get("new.txt"), Some(&FileState::Untracked));
    }

    #[test]
    fn deleted_unstaged_when_head_has_path_but_workdir_does_not() {
        let dir = tempfile::tempdir().unwrap();
        let mut head = BTreeMap::new();
        head.insert("gone.txt".to_string(), "a".repeat(40));
        let index = Index::load(dir.path().join("index")).unwrap();
        let status = classify(dir.path(), &head, &index, &[]).unwrap();
        assert_eq!(status.states.get("gone.txt"), Some(&FileState::Deleted));
    }

    #[test]
    fn staged_deletion_reports_deleted() {
        let dir = tempfile::tempdir().unwrap();
        let mut head = BTreeMap::new();
        head.insert("a.txt".to_string(), "a".repeat(40));
        let mut index = Index::load(dir.path().join("index")).unwrap();
        index.set("a.txt", "");
        let status = classify(dir.path(), &head, &index, &[]).unwrap();
        assert_eq!(status.states.get("a.txt"), Some(&FileState::Deleted));
    }

    #[test]
    fn re_added_file_identical_to_head_is_unmodified() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "hello\n").unwrap();
        let blob_hash = hash_bytes(
            &Object::Blob {
                content: b"hello\n".to_vec(),
            }
            .to_canonical_bytes()
            .unwrap(),
        );
        let mut head = BTreeMap::new();
        head.insert("a.txt".to_string(), blob_hash.clone());
        let mut index = Index::load(dir.path().join("index")).unwrap();
        index.set("a.txt", &blob_hash);
        let status = classify(dir.path(), &head, &index, &["a.txt".to_string()]).unwrap();
        assert_eq!(status.states.get("a.txt"), Some(&FileState::Unmodified));
    }

    #[test]
    fn conflict_markers_are_detected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("a.txt"),
            "<<<<<<< HEAD\nB\n=======\nA\n>>>>>>> a.txt\n",
        )
        .unwrap();
        let mut head = BTreeMap::new();
        head.insert("a.txt".to_string(), "a".repeat(40));
        let index = Index::load(dir.path().join("index")).unwrap();
        let status = classify(dir.path(), &head, &index, &["a.txt".to_string()]).unwrap();
        assert_eq!(status.states.get("a.txt"), Some(&FileState::Conflicted));
    }

    #[test]
    fn classifier_is_deterministic_across_repeated_calls() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "hello\n").unwrap();
        let head = BTreeMap::new();
        let index = Index::load(dir.path().join("index")).unwrap();
        let paths = vec!["a.txt".to_string()];
        let s1 = classify(dir.path(), &head, &index, &paths).unwrap();
        let s2 = classify(dir.path(), &head, &index, &paths).unwrap();
        assert_eq!(s1.states, s2.states);
    }
}
