use std::io::Write;

use tempfile::NamedTempFile;

use crate::file_io;
use crate::file_io::create_parent_dir_if_not_exist;
use crate::file_io::is_regular_file;
use crate::file_io::read_to_string;
use crate::file_io::temp_sibling;
use crate::file_io::write_atomic;
use crate::Error;
use crate::StorageError;

/// Passed: "/tmp/files/data.txt"
/// Expected: "/tmp/files" created
#[tokio::test]
async fn test_create_parent_dir_for_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let temp_path = temp_dir.path().join("test_create_parent_dir_for_file");

    // File path: create parent directory
    let file_path = temp_path.join("files").join("data.txt");
    create_parent_dir_if_not_exist(&file_path).unwrap();

    // Verify parent directory exists
    let parent_dir = file_path.parent().unwrap();
    assert!(parent_dir.is_dir());
    // File itself should NOT be created
    assert!(!file_path.exists());
}

#[test]
fn test_open_file_for_append_creates_missing_dirs() {
    let temp_dir = tempfile::tempdir().unwrap();
    let log_path = temp_dir.path().join("logs").join("notebuf.log");

    let mut file = file_io::open_file_for_append(log_path.clone()).unwrap();
    writeln!(file, "line").unwrap();

    assert!(is_regular_file(&log_path));
}

#[test]
fn test_is_regular_file() {
    let file = NamedTempFile::new().unwrap();
    assert!(is_regular_file(file.path()));

    let dir = tempfile::tempdir().unwrap();
    assert!(!is_regular_file(dir.path()));
    assert!(!is_regular_file(&dir.path().join("absent.txt")));
}

#[tokio::test]
async fn test_read_missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.txt");

    let e = read_to_string(&path).await.unwrap_err();
    assert!(e.is_not_found());
    match e {
        Error::Storage(StorageError::PathError { path: p, .. }) => assert_eq!(p, path),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_write_atomic_replaces_content() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("buffer-0.txt");
    std::fs::write(&path, "old content that is longer").unwrap();

    let written = write_atomic(&path, "new".as_bytes(), 0o600).await.unwrap();

    assert_eq!(written, 3);
    assert_eq!(read_to_string(&path).await.unwrap(), "new");
}

#[tokio::test]
async fn test_write_atomic_creates_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("deeper").join("buffer-0.txt");

    write_atomic(&path, b"hello", 0o600).await.unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello");
}

#[tokio::test]
async fn test_write_atomic_leaves_no_staging_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("buffer-0.txt");

    for i in 0..5 {
        write_atomic(&path, format!("rev {i}").as_bytes(), 0o600).await.unwrap();
    }

    let entries: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("buffer-0.txt")]);
}

#[cfg(unix)]
#[tokio::test]
async fn test_write_atomic_sets_owner_only_mode() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("buffer-0.txt");
    std::fs::write(&path, "world readable").unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

    write_atomic(&path, b"private", 0o600).await.unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[tokio::test]
async fn test_write_atomic_into_directory_target_fails_and_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("occupied");
    std::fs::create_dir(&target).unwrap();
    std::fs::write(target.join("keep.txt"), "x").unwrap();

    let e = write_atomic(&target, b"data", 0o600).await.unwrap_err();
    assert!(matches!(e, Error::Storage(StorageError::PathError { .. })));

    // only the pre-existing directory remains
    let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn test_temp_sibling_is_hidden_and_unique() {
    let path = std::path::Path::new("/data/buffer-0.txt");
    let a = temp_sibling(path);
    let b = temp_sibling(path);

    assert_eq!(a.parent(), path.parent());
    let name = a.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with(".buffer-0.txt."));
    assert!(name.ends_with(".tmp"));
    assert_ne!(a, b);
}
