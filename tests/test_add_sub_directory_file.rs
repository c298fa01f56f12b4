//! Integration test: staging a file nested several directories deep
//! records it in the index under its full relative path.

mod common;

use serial_test::serial;
use tempfile::tempdir;

#[test]
#[serial]
fn test_add_sub_directory_file() {
    let dir = tempdir().unwrap();
    let repo = common::init_repo(dir.path());
    let _guard = common::ChangeDirGuard::new(dir.path());

    common::write_file(&repo, "a/b/c/deep.txt", "hello deep");
    common::run(&["add", "a/b/c/deep.txt"]).unwrap();

    let index = repo.index().unwrap();
    let hash = index.get("a/b/c/deep.txt").expect("staged");
    assert!(repo.store().exists(hash));
}
