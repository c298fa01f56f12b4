//! Encode/decode blob, tree, and commit objects to/from the canonical byte
//! layout `<kind> <content_length>\0<content>` (§3, §4.1). A single tagged
//! enum models the three object kinds rather than a trait hierarchy, per
//! the "polymorphism over object kinds" design note.

use std::fmt;

use crate::errors::{KilnError, Result};
use crate::internal::hash::hash_bytes;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Blob,
    Tree,
    Commit,
}

impl ObjectKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectKind::Blob => "blob",
            ObjectKind::Tree => "tree",
            ObjectKind::Commit => "commit",
        }
    }

    fn from_str(s: &str) -> Option<Self> {
        match s {
            "blob" => Some(ObjectKind::Blob),
            "tree" => Some(ObjectKind::Tree),
            "commit" => Some(ObjectKind::Commit),
            _ => None,
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single tree entry: `"<kind> <hash> <name>\n"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub kind: ObjectKind,
    pub hash: String,
    pub name: String,
}

/// One arm per object kind, carrying its own fields (§9 design note).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Object {
    Blob { content: Vec<u8> },
    Tree { entries: Vec<TreeEntry> },
    Commit {
        tree: String,
        parents: Vec<String>,
        author: String,
        timestamp: i64,
        message: String,
    },
}

impl Object {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Object::Blob { .. } => ObjectKind::Blob,
            Object::Tree { .. } => ObjectKind::Tree,
            Object::Commit { .. } => ObjectKind::Commit,
        }
    }

    /// Serializes just the content (no header) per kind's layout.
    fn content_bytes(&self) -> Result<Vec<u8>> {
        match self {
            Object::Blob { content } => Ok(content.clone()),
            Object::Tree { entries } => {
                let mut sorted = entries.clone();
                sorted.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));
                let mut seen = std::collections::HashSet::new();
                let mut out = Vec::new();
                for e in &sorted {
                    if e.name.contains('/') || e.name.contains('\0') {
                        return Err(KilnError::CorruptObject {
                            hash: String::new(),
                            reason: format!("tree entry name '{}' contains '/' or NUL", e.name),
                        });
                    }
                    if !seen.insert(e.name.clone()) {
                        return Err(KilnError::CorruptObject {
                            hash: String::new(),
                            reason: format!("duplicate tree entry name '{}'", e.name),
                        });
                    }
                    out.extend_from_slice(
                        format!("{} {} {}\n", e.kind.as_str(), e.hash, e.name).as_bytes(),
                    );
                }
                Ok(out)
            }
            Object::Commit {
                tree,
                parents,
                author,
                timestamp,
                message,
            } => {
                if parents.len() > 2 {
                    return Err(KilnError::CorruptObject {
                        hash: String::new(),
                        reason: format!("commit has {} parents, max 2", parents.len()),
                    });
                }
                let mut out = format!("tree {tree}\n");
                for p in parents {
                    out.push_str(&format!("parent {p}\n"));
                }
                out.push_str(&format!("author {author} {timestamp}\n"));
                out.push('\n');
                out.push_str(message);
                if !message.ends_with('\n') {
                    out.push('\n');
                }
                Ok(out.into_bytes())
            }
        }
    }

    /// Encodes the full canonical byte stream (header + content) per §3/§4.1.
    pub fn to_canonical_bytes(&self) -> Result<Vec<u8>> {
        let content = self.content_bytes()?;
        let mut out = format!("{} {}\0", self.kind().as_str(), content.len()).into_bytes();
        out.extend_from_slice(&content);
        Ok(out)
    }

    /// Computes the object's hash by encoding and hashing its canonical bytes.
    pub fn hash(&self) -> Result<String> {
        Ok(hash_bytes(&self.to_canonical_bytes()?))
    }

    /// Decodes the full canonical byte stream (as read from the object
    /// store) back into a typed [`Object`].
    pub fn from_canonical_bytes(bytes: &[u8]) -> Result<Object> {
        let nul = bytes.iter().position(|&b| b == 0).ok_or_else(|| {
            KilnError::CorruptObject {
                hash: String::new(),
                reason: "missing NUL header terminator".into(),
            }
        })?;
        let header = std::str::from_utf8(&bytes[..nul]).map_err(|_| KilnError::CorruptObject {
            hash: String::new(),
            reason: "header is not valid UTF-8".into(),
        })?;
        let mut parts = header.splitn(2, ' ');
        let kind_str = parts.next().unwrap_or_default();
        let len_str = parts.next().ok_or_else(|| KilnError::CorruptObject {
            hash: String::new(),
            reason: format!("malformed header '{header}'"),
        })?;
        let kind = ObjectKind::from_str(kind_str).ok_or_else(|| KilnError::CorruptObject {
            hash: String::new(),
            reason: format!("unknown object kind '{kind_str}'"),
        })?;
        let declared_len: usize = len_str.parse().map_err(|_| KilnError::CorruptObject {
            hash: String::new(),
            reason: format!("non-numeric length '{len_str}'"),
        })?;
        let content = &bytes[nul + 1..];
        if content.len() != declared_len {
            return Err(KilnError::CorruptObject {
                hash: String::new(),
                reason: format!(
                    "declared length {declared_len} disagrees with actual content length {}",
                    content.len()
                ),
            });
        }
        match kind {
            ObjectKind::Blob => Ok(Object::Blob {
                content: content.to_vec(),
            }),
            ObjectKind::Tree => Ok(Object::Tree {
                entries: parse_tree_entries(content)?,
            }),
            ObjectKind::Commit => parse_commit(content),
        }
    }
}

fn parse_tree_entries(content: &[u8]) -> Result<Vec<TreeEntry>> {
    let text = std::str::from_utf8(content).map_err(|_| KilnError::CorruptObject {
        hash: String::new(),
        reason: "tree content is not valid UTF-8".into(),
    })?;
    let mut entries = Vec::new();
    for line in text.lines() {
        if line.is_empty() {
            continue;
        }
        let mut parts = line.splitn(3, ' ');
        let kind_str = parts.next().unwrap_or_default();
        let hash = parts.next().unwrap_or_default();
        let name = parts.next().unwrap_or_default();
        let kind = ObjectKind::from_str(kind_str).ok_or_else(|| KilnError::CorruptObject {
            hash: String::new(),
            reason: format!("tree entry has unknown kind '{kind_str}'"),
        })?;
        entries.push(TreeEntry {
            kind,
            hash: hash.to_string(),
            name: name.to_string(),
        });
    }
    Ok(entries)
}

fn parse_commit(content: &[u8]) -> Result<Object> {
    let text = std::str::from_utf8(content).map_err(|_| KilnError::CorruptObject {
        hash: String::new(),
        reason: "commit content is not valid UTF-8".into(),
    })?;
    let mut lines = text.lines();
    let mut tree = None;
    let mut parents = Vec::new();
    let mut author = None;
    let mut timestamp = None;
    for line in lines.by_ref() {
        if line.is_empty() {
            break;
        }
        if let Some(rest) = line.strip_prefix("tree ") {
            tree = Some(rest.to_string());
        } else if let Some(rest) = line.strip_prefix("parent ") {
            parents.push(rest.to_string());
        } else if let Some(rest) = line.strip_prefix("author ") {
            let (name, epoch) = rest.rsplit_once(' ').ok_or_else(|| KilnError::CorruptObject {
                hash: String::new(),
                reason: "malformed author line".into(),
            })?;
            author = Some(name.to_string());
            timestamp = Some(epoch.parse::<i64>().map_err(|_| KilnError::CorruptObject {
                hash: String::new(),
                reason: "non-numeric author timestamp".into(),
            })?);
        }
    }
    let message = lines.collect::<Vec<_>>().join("\n");
    Ok(Object::Commit {
        tree: tree.ok_or_else(|| KilnError::CorruptObject {
            hash: String::new(),
            reason: "commit missing tree line".into(),
        })?,
        parents,
        author: author.ok_or_else(|| KilnError::CorruptObject {
            hash: String::new(),
            reason: "commit missing author line".into(),
        })?,
        timestamp: timestamp.unwrap_or(0),
        message,
    })
}
