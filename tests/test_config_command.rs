//! Integration test: `config` sets a value in the repository-local
//! config file and reads it back.

mod common;

use serial_test::serial;
use tempfile::tempdir;

#[test]
#[serial]
fn test_config_set_then_get() {
    let dir = tempdir().unwrap();
    let _repo = common::init_repo(dir.path());
    let _guard = common::ChangeDirGuard::new(dir.path());

    common::run(&["config", "user.name", "Ada Lovelace"]).unwrap();

    assert!(dir.path().join(".kiln/config").is_file());
    common::run(&["config", "user.name"]).unwrap();
}

#[test]
#[serial]
fn test_config_missing_key_errors() {
    let dir = tempdir().unwrap();
    let _repo = common::init_repo(dir.path());
    let _guard = common::ChangeDirGuard::new(dir.path());

    let result = common::run(&["config", "user.name"]);
    assert!(result.is_err());
}
