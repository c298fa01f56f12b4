//! Integration test: `branch` creates a ref at the current HEAD commit
//! without moving it, and duplicate names are rejected.

mod common;

use serial_test::serial;
use tempfile::tempdir;

#[test]
#[serial]
fn test_branch_create_and_reject_duplicate() {
    let dir = tempdir().unwrap();
    let repo = common::init_repo(dir.path());
    let _guard = common::ChangeDirGuard::new(dir.path());

    common::write_file(&repo, "a.txt", "hello\n");
    common::run(&["add", "a.txt"]).unwrap();
    common::run(&["commit", "-m", "c1"]).unwrap();
    let head = repo.head_commit().unwrap().unwrap();

    common::run(&["branch", "feature"]).unwrap();

    let refs = repo.refs();
    let branch_commit = refs
        .read_ref(&kiln::internal::refs::branch_ref_path("feature"))
        .unwrap()
        .unwrap();
    assert_eq!(branch_commit, head);
    assert_eq!(repo.current_branch_name().unwrap().as_deref(), Some("master"));

    let result = common::run(&["branch", "feature"]);
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_branch_delete_removes_ref_but_not_current() {
    let dir = tempdir().unwrap();
    let repo = common::init_repo(dir.path());
    let _guard = common::ChangeDirGuard::new(dir.path());

    common::write_file(&repo, "a.txt", "hello\n");
    common::run(&["add", "a.txt"]).unwrap();
    common::run(&["commit", "-m", "c1"]).unwrap();
    common::run(&["branch", "feature"]).unwrap();

    let refs = repo.refs();
    let branch_ref = kiln::internal::refs::branch_ref_path("feature");
    assert!(refs.ref_exists(&branch_ref));

    common::run(&["branch", "--delete", "feature"]).unwrap();
    assert!(!refs.ref_exists(&branch_ref));

    let result = common::run(&["branch", "--delete", "master"]);
    assert!(result.is_err());
}
