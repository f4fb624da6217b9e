//! Process exit statuses of the `stitchpat` binary.
//!
//! | Status | Name | When |
//! |--------|------|------|
//! | 0 | `SUCCESS` | command finished |
//! | 1 | `INTERNAL` | anything not covered below |
//! | 2 | `CLI_ARGS` | bad flags, bad config values, unreadable config file |
//! | 3 | `QR_REJECTED` | the QR code did not fit the stitch area |
//! | 74 | `IO_FAILURE` | a pattern or CSV file could not be opened, read or written |
//!
//! ```rust
//! use stitchpat_utils::exit_codes::ExitCode;
//!
//! assert_eq!(ExitCode::QR_REJECTED.as_i32(), 3);
//! assert_eq!(ExitCode::from(74), ExitCode::IO_FAILURE);
//! ```

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExitCode(i32);

impl ExitCode {
    pub const SUCCESS: Self = Self(0);
    pub const INTERNAL: Self = Self(1);
    pub const CLI_ARGS: Self = Self(2);
    pub const QR_REJECTED: Self = Self(3);
    /// sysexits `EX_IOERR`
    pub const IO_FAILURE: Self = Self(74);

    /// Status to hand to `std::process::exit`.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    #[must_use]
    pub const fn is_success(self) -> bool {
        self.0 == 0
    }
}

impl From<i32> for ExitCode {
    fn from(status: i32) -> Self {
        Self(status)
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
