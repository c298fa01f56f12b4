//! Reference store: `HEAD`, branch refs, and the symbolic/detached
//! distinction (§3, §4.2). Ref and HEAD writes go through write-temp-then-
//! rename so a crash mid-write cannot leave a half-written file (§5, §9).

use std::fs;
use std::path::PathBuf;

use tempfile::NamedTempFile;

use crate::errors::Result;

pub struct RefStore {
    meta: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Head {
    /// Symbolic HEAD, pointing at a ref path such as `refs/heads/master`.
    /// The target ref may not yet exist (unborn branch).
    Symbolic(String),
    Detached(String),
}

impl RefStore {
    pub fn new(meta: PathBuf) -> Self {
        RefStore { meta }
    }

    fn write_atomic(&self, path: &std::path::Path, contents: &str) -> Result<()> {
        let dir = path.parent().unwrap();
        fs::create_dir_all(dir)?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        use std::io::Write;
        tmp.write_all(contents.as_bytes())?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    fn head_path(&self) -> PathBuf {
        self.meta.join("HEAD")
    }

    pub fn ref_path(&self, refpath: &str) -> PathBuf {
        self.meta.join(refpath)
    }

    /// Reads the raw contents of `refpath` (e.g. `refs/heads/master`),
    /// trimmed, or `None` if the ref file does not exist.
    pub fn read_ref(&self, refpath: &str) -> Result<Option<String>> {
        let path = self.ref_path(refpath);
        match fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s.trim().to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes `refpath` to point at `hash`.
    pub fn update_ref(&self, refpath: &str, hash: &str) -> Result<()> {
        self.write_atomic(&self.ref_path(refpath), &format!("{hash}\n"))
    }

    pub fn delete_ref(&self, refpath: &str) -> Result<()> {
        let path = self.ref_path(refpath);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    pub fn ref_exists(&self, refpath: &str) -> bool {
        self.ref_path(refpath).exists()
    }

    /// Reads raw `HEAD` contents and classifies it as symbolic or detached.
    pub fn read_head(&self) -> Result<Head> {
        let contents = fs::read_to_string(self.head_path())?;
        let contents = contents.trim();
        if let Some(refpath) = contents.strip_prefix("ref: ") {
            Ok(Head::Symbolic(refpath.trim().to_string()))
        } else {
            Ok(Head::Detached(contents.to_string()))
        }
    }

    /// Resolves `HEAD` to the commit hash it (transitively, one symbolic
    /// level) points at, or `None` for an unborn branch.
    pub fn resolve_head(&self) -> Result<Option<String>> {
        match self.read_head()? {
            Head::Detached(hash) => Ok(Some(hash)),
            Head::Symbolic(refpath) => self.read_ref(&refpath),
        }
    }

    /// The ref path HEAD currently points to, if symbolic.
    pub fn current_branch_ref(&self) -> Result<Option<String>> {
        match self.read_head()? {
            Head::Symbolic(refpath) => Ok(Some(refpath)),
            Head::Detached(_) => Ok(None),
        }
    }

    pub fn set_head_to_ref(&self, refpath: &str) -> Result<()> {
        self.write_atomic(&self.head_path(), &format!("ref: {refpath}\n"))
    }

    pub fn set_head_detached(&self, hash: &str) -> Result<()> {
        self.write_atomic(&self.head_path(), &format!("{hash}\n"))
    }

    /// Advances whatever HEAD currently points at (the current branch ref,
    /// or HEAD itself if detached) to `hash`.
    pub fn advance_head(&self, hash: &str) -> Result<()> {
        match self.current_branch_ref()? {
            Some(refpath) => self.update_ref(&refpath, hash),
            None => self.set_head_detached(hash),
        }
    }

    pub fn list_branches(&self) -> Result<Vec<String>> {
        let dir = self.meta.join("refs").join("heads");
        let mut names = Vec::new();
        if dir.exists() {
            for entry in fs::read_dir(&dir)? {
                let entry = entry?;
                if entry.path().is_file() {
                    names.push(entry.file_name().to_string_lossy().to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

pub fn branch_ref_path(name: &str) -> String {
    format!("refs/heads/{name}")
}
