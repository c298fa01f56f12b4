//! Working-tree walker: enumerates trackable paths under the working
//! directory, honoring ignore rules (§2, §4.6 step 3). Walks the
//! filesystem directly (no external `ignore`/`walkdir` crate dependency
//! is pulled in since the matching semantics are already owned by
//! [`crate::internal::ignore`]).

use std::path::Path;

use crate::errors::Result;
use crate::internal::ignore::IgnoreSet;
use crate::utils::path;

/// Returns every regular file under `workdir`, excluding the metadata
/// directory and anything matched by `ignores`, as repo-relative
/// forward-slash paths.
pub fn walk_trackable(workdir: &Path, ignores: &IgnoreSet) -> Result<Vec<String>> {
    let mut out = Vec::new();
    walk_dir(workdir, workdir, ignores, &mut out)?;
    out.sort();
    Ok(out)
}

fn walk_dir(
    workdir: &Path,
    dir: &Path,
    ignores: &IgnoreSet,
    out: &mut Vec<String>,
) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let entry_path = entry.path();
        let file_type = entry.file_type()?;
        let rel = match path::normalize(workdir, &entry_path) {
            Some(r) => r,
            None => continue,
        };
        if file_type.is_dir() {
            if ignores.is_ignored(&rel) {
                continue;
            }
            walk_dir(workdir, &entry_path, ignores, out)?;
        } else if file_type.is_file() {
            if ignores.is_ignored(&rel) {
                continue;
            }
            out.push(rel);
        }
    }
    Ok(())
}

/// Enumerates every path under `workdir` (excluding the metadata
/// directory only), regardless of ignore rules. Used by the checkout
/// engine, which needs to know about every file that currently exists
/// so it can decide what to delete (§4.6 step 3).
pub fn walk_all(workdir: &Path) -> Result<Vec<String>> {
    let mut out = Vec::new();
    walk_all_dir(workdir, workdir, &mut out)?;
    out.sort();
    Ok(out)
}

fn walk_all_dir(workdir: &Path, dir: &Path, out: &mut Vec<String>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let entry_path = entry.path();
        if entry_path
            .file_name()
            .map(|n| n == path::META_DIR)
            .unwrap_or(false)
        {
            continue;
        }
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            walk_all_dir(workdir, &entry_path, out)?;
        } else if file_type.is_file() {
            if let Some(rel) = path::normalize(workdir, &entry_path) {
                out.push(rel);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_nested_files_excluding_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("src")).unwrap();
        std::fs::write(dir.path().join("src/main.rs"), "fn main() {}").unwrap();
        std::fs::write(dir.path().join(".kilnignore"), "target/\n").unwrap();
        std::fs::create_dir_all(dir.path().join("target")).unwrap();
        std::fs::write(dir.path().join("target/out"), "x").unwrap();

        let ignores = IgnoreSet::load(dir.path());
        let files = walk_trackable(dir.path(), &ignores).unwrap();
        assert_eq!(files, vec!["src/main.rs".to_string()]);
    }
}
