//! Shared integration-test harness: a cwd guard (commands resolve the
//! repository root from the process's current directory, per
//! [`kiln::Repository::discover`]) plus small file/run helpers, in the
//! style of the teacher's `utils::test` + `ChangeDirGuard` pattern.
#![allow(dead_code)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use kiln::Repository;

pub struct ChangeDirGuard {
    original: PathBuf,
}

impl ChangeDirGuard {
    pub fn new(dir: &Path) -> Self {
        let original = env::current_dir().unwrap();
        env::set_current_dir(dir).unwrap();
        ChangeDirGuard { original }
    }
}

impl Drop for ChangeDirGuard {
    fn drop(&mut self) {
        let _ = env::set_current_dir(&self.original);
    }
}

/// Initializes a fresh repository rooted at `dir`.
pub fn init_repo(dir: &Path) -> Repository {
    Repository::init(dir, "master").unwrap()
}

/// Runs `kiln <args>` against the repository rooted at the current
/// working directory (set by a live [`ChangeDirGuard`]).
pub fn run(args: &[&str]) -> kiln::Result<()> {
    let mut full = vec!["kiln"];
    full.extend_from_slice(args);
    kiln::cli::run(Some(&full))
}

pub fn write_file(repo: &Repository, rel: &str, content: &str) {
    let path = repo.workdir.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

pub fn read_file(repo: &Repository, rel: &str) -> String {
    fs::read_to_string(repo.workdir.join(rel)).unwrap()
}

pub fn remove_file(repo: &Repository, rel: &str) {
    fs::remove_file(repo.workdir.join(rel)).unwrap();
}
