//! The staging index: a flat text file of `path=hash` lines persisting the
//! pending path→hash map (§3, §4.3). An empty hash means "staged
//! deletion". Insertion order is preserved on rewrite so two back-to-back
//! reads of an unchanged index are byte-identical (§4.4's determinism
//! requirement extends to the index file itself).

use std::fs;
use std::path::PathBuf;

use indexmap::IndexMap;
use tempfile::NamedTempFile;

use crate::errors::Result;

#[derive(Debug, Default, Clone)]
pub struct Index {
    entries: IndexMap<String, String>,
    path: PathBuf,
}

impl Index {
    pub fn load(path: PathBuf) -> Result<Index> {
        let mut entries = IndexMap::new();
        if let Ok(text) = fs::read_to_string(&path) {
            for line in text.lines() {
                if line.is_empty() {
                    continue;
                }
                if let Some((p, h)) = line.split_once('=') {
                    entries.insert(p.to_string(), h.to_string());
                }
            }
        }
        Ok(Index { entries, path })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(|s| s.as_str())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Stages `path` to `hash` (empty string means staged deletion).
    pub fn set(&mut self, path: &str, hash: &str) {
        self.entries.insert(path.to_string(), hash.to_string());
    }

    pub fn remove(&mut self, path: &str) {
        self.entries.shift_remove(path);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, h)| (p.as_str(), h.as_str()))
    }

    pub fn save(&self) -> Result<()> {
        let dir = self.path.parent().unwrap();
        fs::create_dir_all(dir)?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        use std::io::Write;
        for (path, hash) in &self.entries {
            writeln!(tmp, "{path}={hash}")?;
        }
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index");
        let mut idx = Index::load(path.clone()).unwrap();
        idx.set("a.txt", &"a".repeat(40));
        idx.set("b.txt", "");
        idx.save().unwrap();

        let reloaded = Index::load(path).unwrap();
        assert_eq!(reloaded.get("a.txt"), Some("a".repeat(40)).as_deref());
        assert_eq!(reloaded.get("b.txt"), Some(""));
        assert_eq!(reloaded.len(), 2);
    }

    #[test]
    fn idempotent_restage_of_unchanged_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index");
        let mut idx = Index::load(path.clone()).unwrap();
        idx.set("a.txt", &"a".repeat(40));
        idx.save().unwrap();
        let before = fs::read_to_string(&path).unwrap();

        let mut idx2 = Index::load(path.clone()).unwrap();
        idx2.set("a.txt", &"a".repeat(40));
        idx2.save().unwrap();
        let after = fs::read_to_string(&path).unwrap();

        assert_eq!(before, after);
    }
}
