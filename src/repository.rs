//! The repository handle: a single value naming a working tree and its
//! metadata directory, exposing file-scoped operations over the engine
//! components in [`crate::internal`]. Per §9's design note, no service
//! holds shared mutable state — every accessor below hands back a fresh,
//! independently-constructed value; all in-memory state lives in the
//! calling command's stack frame.

use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

use crate::errors::{KilnError, Result};
use crate::internal::classifier::{self, Status};
use crate::internal::config::Config;
use crate::internal::ignore::IgnoreSet;
use crate::internal::index::Index;
use crate::internal::object::Object;
use crate::internal::object_store::ObjectStore;
use crate::internal::refs::RefStore;
use crate::internal::{tree, workdir};
use crate::utils::path;

pub const DEFAULT_BRANCH: &str = "master";

pub struct Repository {
    pub workdir: PathBuf,
    pub meta: PathBuf,
}

impl Repository {
    /// Walks up from `start` looking for a `.kiln` metadata directory,
    /// the same way a shell-level `cd`-agnostic command would locate its
    /// repository root.
    pub fn discover_from(start: &Path) -> Result<Repository> {
        let mut dir = start.to_path_buf();
        loop {
            let candidate = dir.join(path::META_DIR);
            if candidate.is_dir() {
                return Ok(Repository {
                    workdir: dir,
                    meta: candidate,
                });
            }
            if !dir.pop() {
                return Err(KilnError::NotARepo);
            }
        }
    }

    pub fn discover() -> Result<Repository> {
        Repository::discover_from(&env::current_dir()?)
    }

    /// Initializes a new repository at `workdir`, failing if `.kiln`
    /// already exists (§6: "`init` fails if the metadata directory
    /// already exists").
    pub fn init(workdir: &Path, initial_branch: &str) -> Result<Repository> {
        let meta = workdir.join(path::META_DIR);
        if meta.exists() {
            return Err(KilnError::AlreadyExists {
                what: "repository",
                path: meta,
            });
        }
        std::fs::create_dir_all(&meta)?;
        std::fs::create_dir_all(path::objects(&meta))?;
        std::fs::create_dir_all(meta.join("refs").join("heads"))?;
        std::fs::create_dir_all(path::hooks(&meta))?;

        let repo = Repository {
            workdir: workdir.to_path_buf(),
            meta,
        };
        repo.refs()
            .set_head_to_ref(&crate::internal::refs::branch_ref_path(initial_branch))?;
        Index::load(path::index(&repo.meta))?.save()?;
        Ok(repo)
    }

    pub fn store(&self) -> ObjectStore {
        ObjectStore::new(path::objects(&self.meta))
    }

    pub fn refs(&self) -> RefStore {
        RefStore::new(self.meta.clone())
    }

    pub fn index(&self) -> Result<Index> {
        Index::load(path::index(&self.meta))
    }

    pub fn config(&self) -> Config {
        Config::load(path::config(&self.meta))
    }

    pub fn ignores(&self) -> IgnoreSet {
        IgnoreSet::load(&self.workdir)
    }

    /// The commit HEAD currently resolves to, or `None` for an unborn
    /// branch / empty detached state.
    pub fn head_commit(&self) -> Result<Option<String>> {
        self.refs().resolve_head()
    }

    /// HEAD's tree flattened to a path->blob-hash map; empty for an
    /// unborn branch.
    pub fn head_tree(&self) -> Result<BTreeMap<String, String>> {
        match self.head_commit()? {
            None => Ok(BTreeMap::new()),
            Some(commit_hash) => {
                let store = self.store();
                let Object::Commit { tree: tree_hash, .. } = store.read(&commit_hash)? else {
                    return Err(KilnError::NotACommit {
                        target: commit_hash,
                    });
                };
                tree::flatten(&store, &tree_hash)
            }
        }
    }

    /// The current branch's short name, if HEAD is symbolic.
    pub fn current_branch_name(&self) -> Result<Option<String>> {
        Ok(self
            .refs()
            .current_branch_ref()?
            .and_then(|r| r.strip_prefix("refs/heads/").map(|s| s.to_string())))
    }

    /// Runs the state classifier (§4.4) over the current working tree,
    /// index, and HEAD.
    pub fn status(&self) -> Result<Status> {
        let head_tree = self.head_tree()?;
        let index = self.index()?;
        let ignores = self.ignores();
        let trackable = workdir::walk_trackable(&self.workdir, &ignores)?;
        classifier::classify(&self.workdir, &head_tree, &index, &trackable)
    }
}
