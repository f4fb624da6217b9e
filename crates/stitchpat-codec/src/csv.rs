//! CSV export for both command vocabularies.

use std::path::Path;

use stitchpat_utils::atomic_write::write_text_atomic;
use stitchpat_utils::error::{FileOperation, StitchError};

use crate::command::{CommandKind, RecordCommand, StitchCommand};

/// A command type that can be rendered as one CSV row.
pub trait CsvRow {
    const HEADER: &'static str;

    fn write_row(&self, index: usize, out: &mut String);
}

impl CsvRow for StitchCommand {
    const HEADER: &'static str = "Index,Command,X,Y,RawBytes";

    fn write_row(&self, index: usize, out: &mut String) {
        out.push_str(&format!(
            "{index},{},{},{},{}\n",
            self.kind().as_str(),
            self.x(),
            self.y(),
            self.raw_hex()
        ));
    }
}

impl CsvRow for RecordCommand {
    const HEADER: &'static str = "Command,Type,X,Y,Parameters,Raw_Hex";

    fn write_row(&self, index: usize, out: &mut String) {
        let params = self
            .parameters()
            .iter()
            .map(u8::to_string)
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&format!(
            "{},{},{},{},\"{params}\",{}\n",
            index + 1,
            self.kind().as_str(),
            self.x(),
            self.y(),
            self.raw_hex()
        ));
    }
}

/// Render commands as CSV text, header included.
#[must_use]
pub fn to_csv<C: CsvRow>(commands: &[C]) -> String {
    let mut out = String::with_capacity(C::HEADER.len() + 1 + commands.len() * 24);
    out.push_str(C::HEADER);
    out.push('\n');
    for (index, cmd) in commands.iter().enumerate() {
        cmd.write_row(index, &mut out);
    }
    out
}

#[must_use]
pub fn format_a_csv(commands: &[StitchCommand]) -> String {
    to_csv(commands)
}

#[must_use]
pub fn format_b_csv(records: &[RecordCommand]) -> String {
    to_csv(records)
}

/// Write commands as CSV to `path`.
pub fn export_to_csv<C: CsvRow>(commands: &[C], path: &Path) -> Result<(), StitchError> {
    write_text_atomic(path, &to_csv(commands))
        .map_err(|e| StitchError::file_io(FileOperation::Write, path, e))?;
    tracing::debug!(rows = commands.len(), path = %path.display(), "exported CSV");
    Ok(())
}
