//! Small value types shared by the stitchpat crates.

use serde::{Deserialize, Serialize};

/// Layer a configuration value was taken from.
///
/// Ordered from strongest to weakest: a `--flag` beats `.stitchpat/config.toml`,
/// which beats the built-in default. Values set through `Config::builder()`
/// are `Programmatic` and never mix with the other layers.
///
/// ```rust
/// use stitchpat_utils::types::ConfigSource;
///
/// assert_eq!(ConfigSource::Config.as_str(), "config");
/// assert_eq!(serde_json::to_string(&ConfigSource::Cli).unwrap(), "\"cli\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Cli,
    Config,
    Programmatic,
    Default,
}

impl ConfigSource {
    /// Label printed by `stitchpat config`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cli => "cli",
            Self::Config => "config",
            Self::Programmatic => "programmatic",
            Self::Default => "default",
        }
    }
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
