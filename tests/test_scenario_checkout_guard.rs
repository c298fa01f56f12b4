//! S6 — checkout guard: an unstaged modification to a tracked file blocks
//! checkout to another commit, leaving both the working tree and HEAD
//! untouched.

mod common;

use serial_test::serial;
use tempfile::tempdir;

#[test]
#[serial]
fn test_checkout_guard() {
    let dir = tempdir().unwrap();
    let repo = common::init_repo(dir.path());
    let _guard = common::ChangeDirGuard::new(dir.path());

    common::write_file(&repo, "a.txt", "hello\n");
    common::run(&["add", "a.txt"]).unwrap();
    common::run(&["commit", "-m", "c1"]).unwrap();
    let first = repo.head_commit().unwrap().unwrap();

    common::write_file(&repo, "b.txt", "other\n");
    common::run(&["add", "b.txt"]).unwrap();
    common::run(&["commit", "-m", "c2"]).unwrap();
    let second = repo.head_commit().unwrap().unwrap();

    common::write_file(&repo, "a.txt", "modified without staging\n");

    let result = common::run(&["checkout", &first]);
    assert!(matches!(
        result,
        Err(kiln::KilnError::WouldOverwriteChanges { .. })
    ));

    assert_eq!(
        common::read_file(&repo, "a.txt"),
        "modified without staging\n"
    );
    assert_eq!(repo.head_commit().unwrap().unwrap(), second);
}
