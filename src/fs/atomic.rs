//! Atomic filesystem operations for the file-backed lock store.
//!
//! Two primitives are provided:
//!
//! - [`atomic_write`] replaces a file so readers see either the old or the new
//!   content, never a partial write.
//! - [`create_exclusive`] creates a file with its full content in one step and
//!   fails with [`io::ErrorKind::AlreadyExists`] if the target exists. This is
//!   the compare-and-insert the lock store builds uniqueness on.
//!
//! # Implementation Strategy
//!
//! Both write the content to a temporary file in the target directory and
//! sync it first. `atomic_write` then `rename`s it over the target;
//! `create_exclusive` hard-links it to the target, which the OS refuses when
//! the target already exists. A reader that wins the race against a
//! concurrent creator therefore never observes an empty file.
//!
//! # Important Notes
//!
//! - Temporary files are named `.{filename}.{pid}.{seq}.tmp` so concurrent
//!   writers in one or several processes never share a temp file
//! - On crash, a temporary file may remain next to the target

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Atomically write bytes to a file, replacing any previous content.
///
/// Parent directories are created as needed.
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &[u8]) -> io::Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;

    let temp_path = generate_temp_path(path)?;
    write_and_sync(&temp_path, content)?;

    fs::rename(&temp_path, path).inspect_err(|_| {
        let _ = fs::remove_file(&temp_path);
    })?;

    sync_parent(path);
    Ok(())
}

/// Atomically write a string to a file.
///
/// Convenience wrapper around `atomic_write` for string content.
pub fn atomic_write_file<P: AsRef<Path>>(path: P, content: &str) -> io::Result<()> {
    atomic_write(path, content.as_bytes())
}

/// Create `path` with `content`, failing if it already exists.
///
/// The file appears fully written or not at all. On conflict the returned
/// error has kind [`io::ErrorKind::AlreadyExists`].
pub fn create_exclusive<P: AsRef<Path>>(path: P, content: &[u8]) -> io::Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;

    let temp_path = generate_temp_path(path)?;
    write_and_sync(&temp_path, content)?;

    let linked = fs::hard_link(&temp_path, path);
    let _ = fs::remove_file(&temp_path);
    linked?;

    sync_parent(path);
    Ok(())
}

fn ensure_parent(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Generate a unique temporary file path in the same directory as the target.
fn generate_temp_path(target: &Path) -> io::Result<PathBuf> {
    let parent = target.parent().unwrap_or(Path::new("."));
    let filename = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "invalid file path"))?;

    let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
    let temp_name = format!(".{}.{}.{}.tmp", filename, std::process::id(), seq);
    Ok(parent.join(temp_name))
}

/// Write content to a file and sync to disk.
fn write_and_sync(path: &Path, content: &[u8]) -> io::Result<()> {
    let result = File::create(path).and_then(|mut file| {
        file.write_all(content)?;
        file.sync_all()
    });

    if result.is_err() {
        let _ = fs::remove_file(path);
    }
    result
}

/// Sync the parent directory so the new directory entry is persisted.
fn sync_parent(path: &Path) {
    #[cfg(unix)]
    if let Some(parent) = path.parent()
        && let Ok(dir) = File::open(parent)
    {
        let _ = dir.sync_all();
    }
    #[cfg(not(unix))]
    let _ = path;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn leftover_temp_files(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .filter(|name| name.ends_with(".tmp"))
            .collect()
    }

    #[test]
    fn test_atomic_write_new_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test.txt");

        atomic_write(&file_path, b"hello world").unwrap();

        let content = fs::read_to_string(&file_path).unwrap();
        assert_eq!(content, "hello world");
    }

    #[test]
    fn test_atomic_write_replace_existing() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test.txt");

        fs::write(&file_path, "original content").unwrap();
        atomic_write(&file_path, b"new content").unwrap();

        let content = fs::read_to_string(&file_path).unwrap();
        assert_eq!(content, "new content");
    }

    #[test]
    fn test_atomic_write_file_string() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test.txt");

        atomic_write_file(&file_path, "string content\nwith newlines").unwrap();

        let content = fs::read_to_string(&file_path).unwrap();
        assert_eq!(content, "string content\nwith newlines");
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("nested").join("dirs").join("test.txt");

        atomic_write(&file_path, b"nested content").unwrap();

        let content = fs::read_to_string(&file_path).unwrap();
        assert_eq!(content, "nested content");
    }

    #[test]
    fn test_atomic_write_temp_file_cleanup() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test.txt");

        atomic_write(&file_path, b"content").unwrap();

        assert!(leftover_temp_files(temp_dir.path()).is_empty());
    }

    #[test]
    fn test_generate_temp_path_is_unique_and_hidden() {
        let target = Path::new("/some/path/file.txt");
        let first = generate_temp_path(target).unwrap();
        let second = generate_temp_path(target).unwrap();

        assert_ne!(first, second);
        assert_eq!(first.parent().unwrap(), Path::new("/some/path"));
        let name = first.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with(".file.txt."));
        assert!(name.ends_with(".tmp"));
    }

    #[test]
    fn test_create_exclusive_writes_content() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("claims").join("a.lock");

        create_exclusive(&file_path, b"12").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "12");
        assert!(leftover_temp_files(file_path.parent().unwrap()).is_empty());
    }

    #[test]
    fn test_create_exclusive_refuses_existing_target() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("a.lock");

        create_exclusive(&file_path, b"first").unwrap();
        let err = create_exclusive(&file_path, b"second").unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "first");
        assert!(leftover_temp_files(temp_dir.path()).is_empty());
    }

    #[test]
    fn test_create_exclusive_single_winner_under_contention() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("contended.lock");

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let path = file_path.clone();
                std::thread::spawn(move || create_exclusive(&path, format!("{}", i).as_bytes()))
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|r| r.is_ok())
            .count();

        assert_eq!(winners, 1);
        let content = fs::read_to_string(&file_path).unwrap();
        assert!(content.parse::<u32>().unwrap() < 8);
    }

    #[test]
    fn test_atomic_write_concurrent_safe() {
        let temp_dir = TempDir::new().unwrap();

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let path = temp_dir.path().join(format!("file_{}.txt", i));
                let content = format!("content {}", i);
                std::thread::spawn(move || {
                    atomic_write_file(&path, &content).unwrap();
                    (path, content)
                })
            })
            .collect();

        for handle in handles {
            let (path, expected_content) = handle.join().unwrap();
            let actual_content = fs::read_to_string(&path).unwrap();
            assert_eq!(actual_content, expected_content);
        }
    }
}
