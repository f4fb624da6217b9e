//! Atomic file writes for pattern and CSV output
//!
//! Content is written to a temporary file in the target directory, fsynced,
//! then renamed over the target. A pattern file on disk is therefore either the
//! previous version or the complete new one, never a partial record stream.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::warn;

/// What [`write_bytes_atomic`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOutcome {
    pub bytes_written: usize,
    /// The rename crossed filesystems and the target was written in place,
    /// without the atomicity guarantee.
    pub copied_across_filesystems: bool,
}

/// Replace `path` with `content` in one step, creating parent directories.
pub fn write_bytes_atomic(path: &Path, content: &[u8]) -> io::Result<WriteOutcome> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    fs::create_dir_all(dir)?;

    let mut outcome = WriteOutcome {
        bytes_written: content.len(),
        copied_across_filesystems: false,
    };

    match synced_temp_file(dir, content)?.persist(path) {
        Ok(_) => {}
        Err(err) if crosses_filesystems(&err.error) => {
            warn!(path = %path.display(), "rename crossed filesystems, writing target in place");
            drop(err.file);
            fs::write(path, content)?;
            outcome.copied_across_filesystems = true;
        }
        Err(err) => return Err(err.error),
    }

    Ok(outcome)
}

/// [`write_bytes_atomic`] for text, with every line ending converted to LF.
pub fn write_text_atomic(path: &Path, content: &str) -> io::Result<WriteOutcome> {
    let text = content.replace("\r\n", "\n").replace('\r', "\n");
    write_bytes_atomic(path, text.as_bytes())
}

fn synced_temp_file(dir: &Path, content: &[u8]) -> io::Result<NamedTempFile> {
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(content)?;
    file.as_file().sync_all()?;
    Ok(file)
}

#[cfg(unix)]
fn crosses_filesystems(err: &io::Error) -> bool {
    // EXDEV
    err.raw_os_error() == Some(18)
}

#[cfg(not(unix))]
fn crosses_filesystems(_err: &io::Error) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_bytes_atomic_basic() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("pattern.001");

        let bytes = [0x61, 0x00, 0x0a, 0x00, 0x1f, 0x00, 0x00, 0x00];
        let result = write_bytes_atomic(&path, &bytes).unwrap();

        assert_eq!(result.bytes_written, 8);
        assert!(!result.copied_across_filesystems);
        assert_eq!(fs::read(&path).unwrap(), bytes);
    }

    #[test]
    fn test_write_bytes_atomic_creates_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("dir").join("p.100");

        write_bytes_atomic(&path, &[0x1f, 0x00, 0x00, 0x00]).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_write_bytes_atomic_overwrites_existing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("p.002");

        fs::write(&path, b"old content that is longer").unwrap();
        write_bytes_atomic(&path, &[0x01, 0x00, 0x05, 0x85]).unwrap();

        assert_eq!(fs::read(&path).unwrap(), vec![0x01, 0x00, 0x05, 0x85]);
    }

    #[test]
    fn test_write_bytes_atomic_empty_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.001");

        let result = write_bytes_atomic(&path, &[]).unwrap();
        assert_eq!(result.bytes_written, 0);
        assert_eq!(fs::metadata(&path).unwrap().len(), 0);
    }

    #[test]
    fn test_write_text_atomic_normalizes_line_endings() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.csv");

        write_text_atomic(&path, "Index,Command\r\n0,STITCH\r1,END\n").unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Index,Command\n0,STITCH\n1,END\n"
        );
    }

    #[test]
    fn test_write_into_missing_readonly_root_fails() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("file");
        fs::write(&blocker, b"x").unwrap();

        // A regular file cannot act as a parent directory.
        let err = write_bytes_atomic(&blocker.join("child.001"), &[0]).unwrap_err();
        assert_ne!(err.kind(), io::ErrorKind::Interrupted);
    }
}
