//! S3 — branch and switch: creating a branch at HEAD, committing further
//! changes on the original branch, then switching back to the branch
//! restores its pre-change content and moves HEAD symbolically.

mod common;

use serial_test::serial;
use tempfile::tempdir;

#[test]
#[serial]
fn test_branch_and_switch() {
    let dir = tempdir().unwrap();
    let repo = common::init_repo(dir.path());
    let _guard = common::ChangeDirGuard::new(dir.path());

    common::write_file(&repo, "a.txt", "hello\n");
    common::run(&["add", "a.txt"]).unwrap();
    common::run(&["commit", "-m", "c1"]).unwrap();

    common::run(&["branch", "feature"]).unwrap();

    common::write_file(&repo, "a.txt", "hi\n");
    common::run(&["add", "a.txt"]).unwrap();
    common::run(&["commit", "-m", "c3"]).unwrap();

    common::run(&["checkout", "feature"]).unwrap();

    assert_eq!(common::read_file(&repo, "a.txt"), "hello\n");
    assert_eq!(
        repo.current_branch_name().unwrap().as_deref(),
        Some("feature")
    );
}
