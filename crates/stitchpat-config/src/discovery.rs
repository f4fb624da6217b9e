use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::Deserialize;
use stitchpat_builder::{EcLevel, MachineModel};
use stitchpat_codec::DeltaPolicy;
use stitchpat_utils::error::ConfigError;
use tracing::debug;

use crate::{CliArgs, Config, ConfigSource};

/// Directory holding the config file, both in a project and under `STITCHPAT_HOME`.
pub const CONFIG_DIR_NAME: &str = ".stitchpat";
pub const CONFIG_FILE_NAME: &str = "config.toml";
/// Environment variable naming an explicit config directory.
pub const HOME_ENV: &str = "STITCHPAT_HOME";

/// TOML configuration file structure
#[derive(Debug, Default, Deserialize)]
pub(crate) struct TomlConfig {
    machine: Option<MachineToml>,
    builder: Option<BuilderToml>,
    qr: Option<QrToml>,
    encoding: Option<EncodingToml>,
}

#[derive(Debug, Default, Deserialize)]
struct MachineToml {
    model: Option<String>,
    units_per_mm: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
struct BuilderToml {
    stitch_spacing: Option<f64>,
    backtack_length: Option<usize>,
    backtack_steps: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct QrToml {
    module_size: Option<i32>,
    stitch_spacing: Option<f64>,
    error_correction: Option<String>,
    margin: Option<i32>,
    quiet_zone: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
struct EncodingToml {
    oversized_delta: Option<String>,
}

/// Stores `value` into `slot` and attributes `key` to `source` when present.
fn apply<T>(
    config: &mut Config,
    key: &str,
    source: ConfigSource,
    value: Option<T>,
    slot: fn(&mut Config) -> &mut T,
) {
    if let Some(value) = value {
        *slot(config) = value;
        config.source_attribution.insert(key.to_string(), source);
    }
}

fn parse_machine(model: &str) -> Result<MachineModel, ConfigError> {
    MachineModel::from_str(model).map_err(|_| ConfigError::UnknownMachine {
        model: model.to_string(),
    })
}

fn parse_value<T: FromStr<Err = String>>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.parse().map_err(|reason: String| ConfigError::InvalidValue {
        key: key.to_string(),
        value: reason,
    })
}

impl Config {
    /// Discover and load configuration with precedence: CLI > file > defaults
    ///
    /// An explicit `--config` path wins. Otherwise `STITCHPAT_HOME`, when
    /// set, names the only directory consulted. Otherwise the file is
    /// searched upward from the current directory.
    pub fn discover(cli_args: &CliArgs) -> Result<Self> {
        if cli_args.config_path.is_none()
            && let Some(home) = env::var_os(HOME_ENV).filter(|v| !v.is_empty())
        {
            return Self::discover_in_home(Path::new(&home), cli_args);
        }
        let start_dir = env::current_dir().context("Failed to get current directory")?;
        Self::discover_from(&start_dir, cli_args)
    }

    /// Discover configuration starting from a specific directory.
    ///
    /// Path-driven variant of [`Config::discover`] that ignores the
    /// environment, used by tests.
    pub fn discover_from(start_dir: &Path, cli_args: &CliArgs) -> Result<Self> {
        let config_path = match &cli_args.config_path {
            Some(explicit) => Some(explicit.clone()),
            None => Self::discover_config_file_from(start_dir),
        };
        Self::resolve(config_path.as_deref(), cli_args)
    }

    /// Load `<home>/config.toml` if it exists, without an upward search.
    pub fn discover_in_home(home: &Path, cli_args: &CliArgs) -> Result<Self> {
        let config_path = match &cli_args.config_path {
            Some(explicit) => Some(explicit.clone()),
            None => Some(home.join(CONFIG_FILE_NAME)).filter(|p| p.is_file()),
        };
        Self::resolve(config_path.as_deref(), cli_args)
    }

    /// Search upward from `start_dir` for `.stitchpat/config.toml`.
    ///
    /// Stops at repository root markers (.git, .hg, .svn) or the
    /// filesystem root.
    #[must_use]
    pub fn discover_config_file_from(start_dir: &Path) -> Option<PathBuf> {
        let mut current = Some(start_dir);

        while let Some(dir) = current {
            let config_path = dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME);
            if config_path.is_file() {
                return Some(config_path);
            }

            if [".git", ".hg", ".svn"].iter().any(|m| dir.join(m).exists()) {
                break;
            }
            current = dir.parent();
        }

        None
    }

    /// Load configuration from a TOML file.
    pub(crate) fn load_config_file(path: &Path) -> Result<TomlConfig> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::NotFound {
                    path: path.display().to_string(),
                }
                .into());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read config file: {}", path.display()));
            }
        };

        let config = toml::from_str(&content)
            .map_err(|e| ConfigError::InvalidFile(format!("{}: {e}", path.display())))?;
        debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    fn resolve(config_path: Option<&Path>, cli_args: &CliArgs) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path {
            let file = Self::load_config_file(path)
                .with_context(|| format!("Failed to load config file: {}", path.display()))?;
            config.apply_file(file)?;
        }

        config.apply_cli(cli_args)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_file(&mut self, file: TomlConfig) -> Result<(), ConfigError> {
        let src = ConfigSource::Config;

        if let Some(machine) = file.machine {
            let model = machine.model.as_deref().map(parse_machine).transpose()?;
            apply(self, "machine.model", src, model, |c| &mut c.machine.model);
            apply(self, "machine.units_per_mm", src, machine.units_per_mm, |c| {
                &mut c.machine.units_per_mm
            });
        }

        if let Some(builder) = file.builder {
            apply(self, "builder.stitch_spacing", src, builder.stitch_spacing, |c| {
                &mut c.builder.stitch_spacing
            });
            apply(self, "builder.backtack_length", src, builder.backtack_length, |c| {
                &mut c.builder.backtack_length
            });
            apply(self, "builder.backtack_steps", src, builder.backtack_steps, |c| {
                &mut c.builder.backtack_steps
            });
        }

        if let Some(qr) = file.qr {
            let ec = qr
                .error_correction
                .as_deref()
                .map(|raw| parse_value::<EcLevel>("qr.error_correction", raw))
                .transpose()?;
            apply(self, "qr.module_size", src, qr.module_size, |c| &mut c.qr.module_size);
            apply(self, "qr.stitch_spacing", src, qr.stitch_spacing, |c| &mut c.qr.stitch_spacing);
            apply(self, "qr.error_correction", src, ec, |c| &mut c.qr.error_correction);
            apply(self, "qr.margin", src, qr.margin, |c| &mut c.qr.margin);
            apply(self, "qr.quiet_zone", src, qr.quiet_zone, |c| &mut c.qr.quiet_zone);
        }

        if let Some(encoding) = file.encoding {
            let policy = encoding
                .oversized_delta
                .as_deref()
                .map(|raw| parse_value::<DeltaPolicy>("encoding.oversized_delta", raw))
                .transpose()?;
            apply(self, "encoding.oversized_delta", src, policy, |c| {
                &mut c.encoding.oversized_delta
            });
        }

        Ok(())
    }

    fn apply_cli(&mut self, cli: &CliArgs) -> Result<(), ConfigError> {
        let src = ConfigSource::Cli;

        let model = cli.machine.as_deref().map(parse_machine).transpose()?;
        let ec = cli
            .error_correction
            .as_deref()
            .map(|raw| parse_value::<EcLevel>("qr.error_correction", raw))
            .transpose()?;
        let policy = cli
            .oversized_delta
            .as_deref()
            .map(|raw| parse_value::<DeltaPolicy>("encoding.oversized_delta", raw))
            .transpose()?;

        apply(self, "machine.model", src, model, |c| &mut c.machine.model);
        apply(self, "builder.stitch_spacing", src, cli.stitch_spacing, |c| {
            &mut c.builder.stitch_spacing
        });
        apply(self, "builder.backtack_length", src, cli.backtack_length, |c| {
            &mut c.builder.backtack_length
        });
        apply(self, "qr.module_size", src, cli.module_size, |c| &mut c.qr.module_size);
        apply(self, "qr.stitch_spacing", src, cli.qr_stitch_spacing, |c| &mut c.qr.stitch_spacing);
        apply(self, "qr.error_correction", src, ec, |c| &mut c.qr.error_correction);
        apply(self, "encoding.oversized_delta", src, policy, |c| &mut c.encoding.oversized_delta);

        Ok(())
    }
}
