//! Integration test: staging an empty file succeeds and records a blob
//! hash for zero-length content.

mod common;

use serial_test::serial;
use tempfile::tempdir;

#[test]
#[serial]
fn test_add_empty_file() {
    let dir = tempdir().unwrap();
    let repo = common::init_repo(dir.path());
    let _guard = common::ChangeDirGuard::new(dir.path());

    common::write_file(&repo, "empty.txt", "");
    common::run(&["add", "empty.txt"]).unwrap();

    let index = repo.index().unwrap();
    let hash = index.get("empty.txt").expect("staged");
    assert_eq!(hash.len(), 40);
    assert!(repo.store().exists(hash));
}
