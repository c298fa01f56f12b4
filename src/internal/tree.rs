//! Flattening and rebuilding tree objects (§4.1, §4.5 step 1-2): the
//! classifier, snapshot builder, checkout engine, and merge all need to
//! move between a `Tree` object graph rooted at a commit and a flat
//! `path -> blob hash` map keyed by repo-relative forward-slash paths.

use std::collections::BTreeMap;

use crate::errors::Result;
use crate::internal::object::{Object, ObjectKind, TreeEntry};
use crate::internal::object_store::ObjectStore;

/// Recursively expands the tree at `root_hash` into a flat path->blob hash
/// map. Directories never appear as entries; only blobs do.
pub fn flatten(store: &ObjectStore, root_hash: &str) -> Result<BTreeMap<String, String>> {
    let mut out = BTreeMap::new();
    flatten_into(store, root_hash, "", &mut out)?;
    Ok(out)
}

fn flatten_into(
    store: &ObjectStore,
    hash: &str,
    prefix: &str,
    out: &mut BTreeMap<String, String>,
) -> Result<()> {
    let Object::Tree { entries } = store.read(hash)? else {
        return Ok(());
    };
    for entry in entries {
        let path = if prefix.is_empty() {
            entry.name.clone()
        } else {
            format!("{prefix}/{}", entry.name)
        };
        match entry.kind {
            ObjectKind::Blob => {
                out.insert(path, entry.hash);
            }
            ObjectKind::Tree => {
                flatten_into(store, &entry.hash, &path, out)?;
            }
            ObjectKind::Commit => {}
        }
    }
    Ok(())
}

/// Builds a tree object graph bottom-up from a flat path->blob hash map,
/// writing every intermediate tree to `store`, and returns the root tree's
/// hash. An empty map yields the hash of an empty tree.
pub fn build(store: &ObjectStore, flat: &BTreeMap<String, String>) -> Result<String> {
    let root = group(flat);
    write_node(store, &root)
}

/// A directory node built from grouping flat paths by their first
/// component: either a blob hash (leaf) or a nested map of children.
enum Node {
    Blob(String),
    Dir(BTreeMap<String, Node>),
}

fn group(flat: &BTreeMap<String, String>) -> BTreeMap<String, Node> {
    let mut root: BTreeMap<String, Node> = BTreeMap::new();
    for (path, hash) in flat {
        insert(&mut root, path, hash);
    }
    root
}

fn insert(dir: &mut BTreeMap<String, Node>, path: &str, hash: &str) {
    match path.split_once('/') {
        None => {
            dir.insert(path.to_string(), Node::Blob(hash.to_string()));
        }
        Some((head, rest)) => {
            let entry = dir
                .entry(head.to_string())
                .or_insert_with(|| Node::Dir(BTreeMap::new()));
            if let Node::Dir(children) = entry {
                insert(children, rest, hash);
            }
        }
    }
}

fn write_node(store: &ObjectStore, dir: &BTreeMap<String, Node>) -> Result<String> {
    let mut entries = Vec::with_capacity(dir.len());
    for (name, node) in dir {
        let (kind, hash) = match node {
            Node::Blob(hash) => (ObjectKind::Blob, hash.clone()),
            Node::Dir(children) => (ObjectKind::Tree, write_node(store, children)?),
        };
        entries.push(TreeEntry {
            kind,
            hash,
            name: name.clone(),
        });
    }
    store.write(&Object::Tree { entries })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_nested_paths() {
        let dir = tempfile::tempdir().unwrap();
        let store = ObjectStore::new(dir.path().to_path_buf());
        let blob_a = store
            .write(&Object::Blob {
                content: b"a".to_vec(),
            })
            .unwrap();
        let blob_b = store
            .write(&Object::Blob {
                content: b"b".to_vec(),
            })
            .unwrap();

        let mut flat = BTreeMap::new();
        flat.insert("src/main.rs".to_string(), blob_a.clone());
        flat.insert("README.md".to_string(), blob_b.clone());

        let root = build(&store, &flat).unwrap();
        let back = flatten(&store, &root).unwrap();
        assert_eq!(back, flat);
    }

    #[test]
    fn empty_map_builds_empty_tree() {
        let dir = tempfile::tempdir().unwrap();
        let store = ObjectStore::new(dir.path().to_path_buf());
        let root = build(&store, &BTreeMap::new()).unwrap();
        let back = flatten(&store, &root).unwrap();
        assert!(back.is_empty());
    }
}
