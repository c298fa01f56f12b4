//! The single error type returned by every `kiln` operation, covering the
//! failure taxonomy that the validator, object store, and merge engine raise
//! before (or in place of) mutating repository state.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by repository operations. Each variant carries enough
/// context to format a useful message without the caller re-deriving it.
#[derive(Debug, Error)]
pub enum KilnError {
    #[error("not a kiln repository (or any parent up to /)")]
    NotARepo,

    #[error("{what} already exists at {path}")]
    AlreadyExists { what: &'static str, path: PathBuf },

    #[error("invalid branch name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("reference '{0}' not found")]
    MissingRef(String),

    #[error("object {0} not found")]
    MissingObject(String),

    #[error("short hash '{0}' is ambiguous")]
    AmbiguousShortHash(String),

    #[error("object {hash} is corrupt: {reason}")]
    CorruptObject { hash: String, reason: String },

    #[error("'{target}' is not a commit")]
    NotACommit { target: String },

    #[error("Your local changes would be overwritten by {op}.\nPlease commit your changes or stash them before you {op}.")]
    WouldOverwriteChanges { op: &'static str },

    #[error("nothing to commit, working tree clean")]
    NothingToCommit,

    #[error("merge in progress; resolve conflicts and commit, or run merge --abort")]
    MergeInProgress,

    #[error("no merge in progress")]
    NoMergeInProgress,

    #[error("fix conflicts and then commit the result")]
    ConflictsRemain,

    #[error("pathspec '{0}' did not match any tracked or working tree files")]
    PathNotFound(String),

    #[error("pre-commit hook rejected the commit (exit code {0})")]
    HookRejected(i32),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("invalid UTF-8 content in {0}")]
    Utf8Error(PathBuf),

    #[error("{0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, KilnError>;
