//! Whole-file reads and writes for pattern files.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use stitchpat_utils::atomic_write::write_bytes_atomic;
use stitchpat_utils::error::{FileOperation, StitchError};
use tracing::info;

use crate::command::{RecordCommand, StitchCommand};
use crate::format_a::{self, EncodeOptions, EncodeReport};
use crate::format_b;

/// Read a file fully into memory.
pub fn read_bytes(path: &Path) -> Result<Vec<u8>, StitchError> {
    let mut file =
        File::open(path).map_err(|e| StitchError::file_io(FileOperation::Open, path, e))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| StitchError::file_io(FileOperation::Read, path, e))?;
    Ok(bytes)
}

/// Read and decode a Format A pattern file.
pub fn read_pattern_file(path: &Path) -> Result<Vec<StitchCommand>, StitchError> {
    let bytes = read_bytes(path)?;
    let commands = format_a::parse(&bytes);
    info!(path = %path.display(), bytes = bytes.len(), commands = commands.len(), "loaded pattern");
    Ok(commands)
}

/// Read and decode a Format B pattern file.
pub fn read_record_file(path: &Path) -> Result<Vec<RecordCommand>, StitchError> {
    let bytes = read_bytes(path)?;
    let records = format_b::parse_records(&bytes);
    info!(
        path = %path.display(),
        bytes = bytes.len(),
        records = records.len(),
        "loaded Format B pattern"
    );
    Ok(records)
}

/// Encode `commands` and write them atomically to `path`.
pub fn write_pattern_file(
    path: &Path,
    commands: &[StitchCommand],
    options: EncodeOptions,
) -> Result<EncodeReport, StitchError> {
    let report = format_a::encode_with_report(commands, options);
    write_bytes_atomic(path, &report.bytes)
        .map_err(|e| StitchError::file_io(FileOperation::Write, path, e))?;
    info!(
        path = %path.display(),
        bytes = report.bytes.len(),
        clamped = report.clamped.len(),
        "saved pattern"
    );
    Ok(report)
}

/// Whether `path` uses the numeric pattern extension convention (`.001` to `.300`).
#[must_use]
pub fn is_pattern_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| ext.len() == 3 && ext.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|ext| ext.parse::<u16>().ok())
        .is_some_and(|n| (1..=300).contains(&n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::StitchKind;
    use tempfile::TempDir;

    #[test]
    fn test_pattern_extensions() {
        assert!(is_pattern_extension(Path::new("a.001")));
        assert!(is_pattern_extension(Path::new("a.100")));
        assert!(is_pattern_extension(Path::new("dir/b.300")));
        assert!(!is_pattern_extension(Path::new("a.000")));
        assert!(!is_pattern_extension(Path::new("a.301")));
        assert!(!is_pattern_extension(Path::new("a.1")));
        assert!(!is_pattern_extension(Path::new("a.csv")));
        assert!(!is_pattern_extension(Path::new("noext")));
    }

    #[test]
    fn test_write_then_read_pattern() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("square.001");
        let commands = vec![
            StitchCommand::new(StitchKind::Move, -10, -10),
            StitchCommand::new(StitchKind::Stitch, 10, -10),
            StitchCommand::new(StitchKind::Stitch, 10, 10),
            StitchCommand::new(StitchKind::PatternEnd, 10, 10),
        ];

        let report = write_pattern_file(&path, &commands, EncodeOptions::default()).unwrap();
        assert!(report.is_lossless());
        assert_eq!(report.bytes.len(), 16);

        let decoded = read_pattern_file(&path).unwrap();
        let positions: Vec<_> = decoded.iter().map(StitchCommand::position).collect();
        assert_eq!(positions, vec![(-10, -10), (10, -10), (10, 10), (10, 10), (0, 0)]);
    }

    #[test]
    fn test_missing_file_is_open_failure() {
        let dir = TempDir::new().unwrap();
        let err = read_pattern_file(&dir.path().join("missing.001")).unwrap_err();
        assert!(matches!(
            err,
            StitchError::FileIo {
                operation: FileOperation::Open,
                ..
            }
        ));
    }

    #[test]
    fn test_read_record_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("b.100");
        std::fs::write(&path, [0x61u8, 0x01, 0x02, 0x00]).unwrap();

        let records = read_record_file(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].position(), (1, 2));
    }
}
