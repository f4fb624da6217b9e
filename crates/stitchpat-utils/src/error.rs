use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures that reach the command line.
///
/// Decoding never fails: truncated records and unknown opcodes degrade to a
/// shorter command list. What remains surfaced here are configuration problems,
/// file I/O failures and rejected QR requests.
///
/// # Exit Code Mapping
///
/// | Code | Variant |
/// |------|---------|
/// | 2 | `Config` |
/// | 3 | `QrRejected` |
/// | 74 | `FileIo`, `Io` |
///
/// Errors that never become a `StitchError` exit with 1.
///
/// # Example
///
/// ```rust
/// use stitchpat_utils::error::{StitchError, UserFriendlyError};
///
/// fn handle_error(err: StitchError) {
///     eprintln!("{}", err.report());
///     std::process::exit(err.to_exit_code().as_i32());
/// }
/// ```
#[derive(Error, Debug)]
pub enum StitchError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to {operation} {}: {source}", .path.display())]
    FileIo {
        operation: FileOperation,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("QR generation rejected: {reason}")]
    QrRejected { reason: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// The file operation that failed, carried by [`StitchError::FileIo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    Open,
    Read,
    Write,
}

impl FileOperation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Read => "read",
            Self::Write => "write",
        }
    }
}

impl fmt::Display for FileOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error that can explain itself to someone at a terminal.
pub trait UserFriendlyError {
    /// One-line description without Rust type names.
    fn user_message(&self) -> String;

    /// Background on the failing subsystem, when there is any worth printing.
    fn context(&self) -> Option<String>;

    /// Things to try next.
    fn suggestions(&self) -> Vec<String>;

    fn category(&self) -> ErrorCategory;

    /// Multi-line stderr report: headline, optional context, then suggestions.
    fn report(&self) -> String {
        let mut lines = vec![format!("Error [{}]: {}", self.category(), self.user_message())];
        if let Some(ctx) = self.context() {
            lines.push(String::new());
            lines.push(format!("Context: {ctx}"));
        }
        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            lines.push(String::new());
            lines.push("Suggestions:".to_string());
            lines.extend(suggestions.iter().map(|s| format!("  • {s}")));
        }
        lines.join("\n")
    }
}

/// Heading shown in brackets on the first report line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    FileSystem,
    Capacity,
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "Configuration"),
            Self::FileSystem => write!(f, "File System"),
            Self::Capacity => write!(f, "Stitch Area Capacity"),
            Self::Internal => write!(f, "Internal"),
        }
    }
}

/// Problems found while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file could not be parsed: {0}")]
    InvalidFile(String),

    #[error("{key} = {value} is not allowed")]
    InvalidValue { key: String, value: String },

    #[error("No config file at {path}")]
    NotFound { path: String },

    #[error("Unknown machine model '{model}'")]
    UnknownMachine { model: String },
}

impl UserFriendlyError for ConfigError {
    fn user_message(&self) -> String {
        match self {
            Self::InvalidFile(msg) => format!("Configuration file is invalid: {msg}"),
            Self::InvalidValue { key, value } => {
                format!("Configuration value '{key}' is invalid: {value}")
            }
            Self::NotFound { path } => format!("Configuration file not found: {path}"),
            Self::UnknownMachine { model } => format!("Machine model '{model}' is not known"),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::InvalidFile(_) => Some(
                "stitchpat reads TOML from .stitchpat/config.toml, found by searching upward \
                 from the working directory."
                    .to_string(),
            ),
            Self::InvalidValue { .. } => Some(
                "Values are validated once CLI flags, the config file and defaults are merged."
                    .to_string(),
            ),
            Self::NotFound { .. } => {
                Some("An explicit --config path must point at an existing file.".to_string())
            }
            Self::UnknownMachine { .. } => Some(
                "The machine model selects the stitch area that patterns must fit inside."
                    .to_string(),
            ),
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidFile(_) => vec![
                "Check the file for TOML syntax errors".to_string(),
                "Valid sections are [machine], [builder], [qr] and [encoding]".to_string(),
            ],
            Self::InvalidValue { key, .. } => vec![
                format!("Correct '{key}' in the config file or on the command line"),
                "Run 'stitchpat config' to see the effective values and their sources".to_string(),
            ],
            Self::NotFound { path } => vec![
                format!("Create the file at {path}, or drop the --config flag"),
                "Without --config, stitchpat falls back to built-in defaults".to_string(),
            ],
            Self::UnknownMachine { .. } => {
                vec!["Known models: PLK-A0804, PLK-A0408, PLK-A0204".to_string()]
            }
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Configuration
    }
}

impl StitchError {
    /// Build a [`StitchError::FileIo`] for `path`.
    pub fn file_io(operation: FileOperation, path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::FileIo {
            operation,
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Process exit status for this failure.
    #[must_use]
    pub fn to_exit_code(&self) -> crate::exit_codes::ExitCode {
        use crate::exit_codes::ExitCode;

        match self {
            StitchError::Config(_) => ExitCode::CLI_ARGS,
            StitchError::QrRejected { .. } => ExitCode::QR_REJECTED,
            StitchError::FileIo { .. } | StitchError::Io(_) => ExitCode::IO_FAILURE,
        }
    }
}

impl UserFriendlyError for StitchError {
    fn user_message(&self) -> String {
        match self {
            Self::Config(err) => err.user_message(),
            Self::FileIo {
                operation, path, ..
            } => format!("Could not {operation} '{}'", path.display()),
            Self::QrRejected { reason } => format!("QR pattern was not generated: {reason}"),
            Self::Io(err) => format!("I/O error: {err}"),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::Config(err) => err.context(),
            Self::FileIo { source, .. } => Some(format!("Underlying error: {source}")),
            Self::QrRejected { .. } => Some(
                "QR modules are stitched as small rectangles and the whole code, quiet zone \
                 included, must stay inside the stitch area."
                    .to_string(),
            ),
            Self::Io(_) => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Config(err) => err.suggestions(),
            Self::FileIo { operation, .. } => match operation {
                FileOperation::Open | FileOperation::Read => vec![
                    "Check that the path exists and is readable".to_string(),
                    "Pattern files normally use a numeric extension such as .001 or .100"
                        .to_string(),
                ],
                FileOperation::Write => vec![
                    "Check that the target directory is writable".to_string(),
                    "Make sure the disk is not full".to_string(),
                ],
            },
            Self::QrRejected { .. } => vec![
                "Use a smaller --module-size".to_string(),
                "Move --center closer to the origin".to_string(),
                "Shorten the text or pick a lower --ec level".to_string(),
                "Use --hash for a fixed-size decorative grid".to_string(),
            ],
            Self::Io(_) => vec![],
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(_) => ErrorCategory::Configuration,
            Self::FileIo { .. } => ErrorCategory::FileSystem,
            Self::QrRejected { .. } => ErrorCategory::Capacity,
            Self::Io(_) => ErrorCategory::Internal,
        }
    }
}
