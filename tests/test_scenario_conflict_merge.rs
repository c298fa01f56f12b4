//! S5 — conflict: diverging edits to the same file on two branches leave
//! `MERGE_HEAD` set, conflict markers in the working tree, and the
//! classifier reporting the path as conflicted.

mod common;

use kiln::internal::classifier::FileState;
use serial_test::serial;
use tempfile::tempdir;

#[test]
#[serial]
fn test_conflict_merge() {
    let dir = tempdir().unwrap();
    let repo = common::init_repo(dir.path());
    let _guard = common::ChangeDirGuard::new(dir.path());

    common::write_file(&repo, "a.txt", "hello\n");
    common::run(&["add", "a.txt"]).unwrap();
    common::run(&["commit", "-m", "c1"]).unwrap();

    common::run(&["branch", "feature"]).unwrap();

    common::write_file(&repo, "a.txt", "A\n");
    common::run(&["add", "a.txt"]).unwrap();
    common::run(&["commit", "-m", "master edit"]).unwrap();

    common::run(&["checkout", "feature"]).unwrap();
    common::write_file(&repo, "a.txt", "B\n");
    common::run(&["add", "a.txt"]).unwrap();
    common::run(&["commit", "-m", "feature edit"]).unwrap();

    common::run(&["merge", "master"]).unwrap();

    assert!(repo.meta.join("MERGE_HEAD").is_file());
    let content = common::read_file(&repo, "a.txt");
    assert!(content.contains("<<<<<<< HEAD"));
    assert!(content.contains("B"));
    assert!(content.contains("======="));
    assert!(content.contains("A"));
    assert!(content.contains(">>>>>>>"));

    let status = repo.status().unwrap();
    assert_eq!(status.states.get("a.txt"), Some(&FileState::Conflicted));

    let commit_result = common::run(&["commit", "-m", "resolve"]);
    assert!(commit_result.is_err());
}
