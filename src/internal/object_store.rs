//! Loose object store: read/write objects under a sharded `objects/<aa>/<38hex>`
//! layout, with short-hash prefix lookup. Modeled on the teacher's
//! `LocalStorage` (utils/storage/local.rs) sharded-path scheme, minus
//! zlib compression and packfiles — this store is uncompressed loose
//! objects only, per the spec's non-goals.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::errors::{KilnError, Result};
use crate::internal::hash::{hash_bytes, is_full_hash, is_short_hash};
use crate::internal::object::Object;

pub struct ObjectStore {
    root: PathBuf,
}

impl ObjectStore {
    pub fn new(root: PathBuf) -> Self {
        ObjectStore { root }
    }

    fn shard_path(&self, hash: &str) -> PathBuf {
        self.root.join(&hash[0..2]).join(&hash[2..])
    }

    /// Writes `obj`, returning its hash. Idempotent: writing identical
    /// content twice yields the same hash and leaves the file untouched.
    pub fn write(&self, obj: &Object) -> Result<String> {
        let bytes = obj.to_canonical_bytes()?;
        let hash = hash_bytes(&bytes);
        let path = self.shard_path(&hash);
        if path.exists() {
            return Ok(hash);
        }
        let dir = path.parent().unwrap();
        fs::create_dir_all(dir)?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        use std::io::Write;
        tmp.write_all(&bytes)?;
        tmp.persist(&path).map_err(|e| e.error)?;
        debug!(%hash, kind = %obj.kind(), "wrote object");
        Ok(hash)
    }

    /// Reads the full canonical bytes (header + content) for `hash`.
    pub fn read_raw(&self, hash: &str) -> Result<Vec<u8>> {
        let path = self.shard_path(hash);
        fs::read(&path).map_err(|_| KilnError::MissingObject(hash.to_string()))
    }

    /// Reads and decodes the object at `hash`.
    pub fn read(&self, hash: &str) -> Result<Object> {
        let bytes = self.read_raw(hash)?;
        Object::from_canonical_bytes(&bytes).map_err(|e| match e {
            KilnError::CorruptObject { reason, .. } => KilnError::CorruptObject {
                hash: hash.to_string(),
                reason,
            },
            other => other,
        })
    }

    pub fn exists(&self, hash: &str) -> bool {
        self.shard_path(hash).exists()
    }

    /// Resolves `spec` (a full hash, or a short hash of ≥6 hex chars) to the
    /// unique full hash present in the store.
    pub fn resolve(&self, spec: &str) -> Result<String> {
        if is_full_hash(spec) {
            if self.exists(spec) {
                return Ok(spec.to_string());
            }
            return Err(KilnError::MissingObject(spec.to_string()));
        }
        if !is_short_hash(spec) {
            return Err(KilnError::MissingObject(spec.to_string()));
        }
        let matches = self.find_prefix(spec)?;
        match matches.len() {
            0 => Err(KilnError::MissingObject(spec.to_string())),
            1 => Ok(matches.into_iter().next().unwrap()),
            _ => Err(KilnError::AmbiguousShortHash(spec.to_string())),
        }
    }

    fn find_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        let mut out = Vec::new();
        if !self.root.exists() {
            return Ok(out);
        }
        for shard_entry in fs::read_dir(&self.root)? {
            let shard_entry = shard_entry?;
            let shard_name = shard_entry.file_name().to_string_lossy().to_string();
            if shard_name.len() != 2 {
                continue;
            }
            if prefix.len() >= 2 && !prefix.starts_with(&shard_name) {
                continue;
            }
            if prefix.len() < 2 && !shard_name.starts_with(prefix) {
                continue;
            }
            for file_entry in fs::read_dir(shard_entry.path())? {
                let file_entry = file_entry?;
                let full = format!(
                    "{}{}",
                    shard_name,
                    file_entry.file_name().to_string_lossy()
                );
                if full.starts_with(prefix) {
                    out.push(full);
                }
            }
        }
        Ok(out)
    }
}

pub fn path_is_object_dir(p: &Path) -> bool {
    p.file_name()
        .map(|n| n.to_string_lossy().len() == 2)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::internal::object::Object;

    #[test]
    fn write_is_idempotent_and_content_addressed() {
        let dir = tempfile::tempdir().unwrap();
        let store = ObjectStore::new(dir.path().to_path_buf());
        let obj = Object::Blob {
            content: b"hello\n".to_vec(),
        };
        let h1 = store.write(&obj).unwrap();
        let h2 = store.write(&obj).unwrap();
        assert_eq!(h1, h2);
        assert_eq!(store.read(&h1).unwrap(), obj);
    }

    #[test]
    fn short_hash_resolves_uniquely() {
        let dir = tempfile::tempdir().unwrap();
        let store = ObjectStore::new(dir.path().to_path_buf());
        let obj = Object::Blob {
            content: b"unique content".to_vec(),
        };
        let full = store.write(&obj).unwrap();
        let short = &full[0..8];
        assert_eq!(store.resolve(short).unwrap(), full);
    }

    #[test]
    fn missing_object_errors() {
        let dir = tempfile::tempdir().unwrap();
        let store = ObjectStore::new(dir.path().to_path_buf());
        assert!(matches!(
            store.read(&"a".repeat(40)),
            Err(KilnError::MissingObject(_))
        ));
    }
}
