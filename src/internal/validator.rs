//! Validator (§4.8): declarative preconditions shared across commands,
//! raised before any mutation. Every check here returns a typed
//! [`KilnError`] rather than a bare bool so the CLI layer can format the
//! phrasing §7 specifies without re-deriving the reason.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{KilnError, Result};
use crate::internal::classifier::Status;
use crate::internal::index::Index;
use crate::internal::refs::RefStore;
use crate::utils::path as repo_path;

static INVALID_NAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[~^:?*\[\]\\]|@\{").unwrap());

pub fn validate_checkout(status: &Status, current_head: &str, target: &str) -> Result<()> {
    if current_head == target {
        return Err(KilnError::NotACommit {
            target: format!("already on '{target}'"),
        });
    }
    if !status.has_no_blocking_changes() {
        return Err(KilnError::WouldOverwriteChanges { op: "checkout" });
    }
    Ok(())
}

pub fn validate_merge(
    meta: &Path,
    refs: &RefStore,
    status: &Status,
    branch: &str,
    current_branch_name: &str,
) -> Result<()> {
    if crate::internal::merge::merge_head(meta)?.is_some() {
        return Err(KilnError::MergeInProgress);
    }
    let branch_ref = crate::internal::refs::branch_ref_path(branch);
    if !refs.ref_exists(&branch_ref) {
        return Err(KilnError::MissingRef(branch_ref));
    }
    if branch == current_branch_name {
        return Err(KilnError::InvalidName {
            name: branch.to_string(),
            reason: "cannot merge a branch into itself",
        });
    }
    if !status.has_no_blocking_changes() {
        return Err(KilnError::WouldOverwriteChanges { op: "merge" });
    }
    Ok(())
}

pub fn validate_commit(index: &Index) -> Result<()> {
    if index.is_empty() {
        return Err(KilnError::NothingToCommit);
    }
    Ok(())
}

/// Branch name rules (§4.8): no `..`, `~`, `^`, `:`, `?`, `*`, `[`, `]`,
/// `@{`, `\`; no leading `-`; no trailing `.` or `.lock`.
pub fn validate_branch_creation(refs: &RefStore, name: &str) -> Result<()> {
    let reason = if name.is_empty() {
        Some("branch name must not be empty")
    } else if name.contains("..") {
        Some("must not contain '..'")
    } else if INVALID_NAME_CHARS.is_match(name) {
        Some("must not contain '~', '^', ':', '?', '*', '[', ']', '\\', or '@{'")
    } else if name.starts_with('-') {
        Some("must not start with '-'")
    } else if name.ends_with('.') || name.ends_with(".lock") {
        Some("must not end with '.' or '.lock'")
    } else {
        None
    };
    if let Some(reason) = reason {
        return Err(KilnError::InvalidName {
            name: name.to_string(),
            reason,
        });
    }
    let refpath = crate::internal::refs::branch_ref_path(name);
    if refs.ref_exists(&refpath) {
        return Err(KilnError::AlreadyExists {
            what: "branch",
            path: refs.ref_path(&refpath),
        });
    }
    Ok(())
}

pub fn validate_file_add(workdir: &Path, index: &Index, head_has_path: bool, rel_path: &str) -> Result<()> {
    let exists_on_disk = workdir.join(rel_path).exists();
    if exists_on_disk || head_has_path || index.contains(rel_path) {
        return Ok(());
    }
    Err(KilnError::PathNotFound(rel_path.to_string()))
}

pub fn validate_file_operations(workdir: &Path) -> Result<()> {
    let meta = workdir.join(repo_path::META_DIR);
    if !meta.is_dir() {
        return Err(KilnError::NotARepo);
    }
    Ok(())
}
