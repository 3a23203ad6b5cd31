use std::fs;

use bookmark_engine::{ensure_parent_dir, write_atomically};
use tempfile::TempDir;

#[test]
fn creates_missing_parent_dir() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("profile").join("Bookmarks");
    assert!(!target.parent().unwrap().exists());
    let dir = ensure_parent_dir(&target).unwrap();
    assert!(dir.is_dir());
}

#[test]
fn atomic_write_replaces_existing_content() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("settings.json");

    write_atomically(&target, b"first").unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), "first");

    write_atomically(&target, b"second").unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), "second");
    // Only the target remains; the temp file was renamed over it.
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
}

#[test]
fn parent_that_is_a_file_is_rejected() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("not_a_dir");
    fs::write(&blocker, "x").unwrap();

    let result = write_atomically(&blocker.join("Bookmarks"), b"data");
    assert!(result.is_err());
    assert_eq!(fs::read_to_string(&blocker).unwrap(), "x");
}
