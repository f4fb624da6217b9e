use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use stitchpat_builder::{EcLevel, MachineModel, QrSettings, StitchArea, UNITS_PER_MM};
use stitchpat_codec::{DeltaPolicy, EncodeOptions};

use crate::ConfigSource;

/// Effective configuration for stitchpat.
///
/// Values are layered with precedence CLI > config file > built-in defaults.
///
/// # Discovery
///
/// [`Config::discover()`] searches for `.stitchpat/config.toml` upward from
/// the current directory, stopping at repository markers, and honours
/// `STITCHPAT_HOME`. [`Config::builder()`] skips discovery entirely.
///
/// # Source Attribution
///
/// Each key records where its value came from (`cli`, `config`,
/// `programmatic` or `default`); see [`Config::effective_config()`].
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub machine: MachineConfig,
    pub builder: BuilderConfig,
    pub qr: QrConfig,
    pub encoding: EncodingConfig,
    /// Source of each dotted key, e.g. `qr.module_size`.
    pub source_attribution: HashMap<String, ConfigSource>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineConfig {
    pub model: MachineModel,
    pub units_per_mm: i32,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            model: MachineModel::default(),
            units_per_mm: UNITS_PER_MM,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuilderConfig {
    /// Distance between stitches along lines and outlines, in machine units.
    pub stitch_spacing: f64,
    pub backtack_length: usize,
    /// Recent stitches sampled to orient the backtack.
    pub backtack_steps: usize,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            stitch_spacing: 20.0,
            backtack_length: 6,
            backtack_steps: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QrConfig {
    pub module_size: i32,
    pub stitch_spacing: f64,
    pub error_correction: EcLevel,
    pub margin: i32,
    pub quiet_zone: i32,
}

impl Default for QrConfig {
    fn default() -> Self {
        let settings = QrSettings::default();
        Self {
            module_size: settings.module_size,
            stitch_spacing: settings.stitch_spacing,
            error_correction: settings.ec_level,
            margin: settings.margin,
            quiet_zone: settings.quiet_zone,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodingConfig {
    pub oversized_delta: DeltaPolicy,
}

/// Every key reported by [`Config::effective_config()`].
pub const CONFIG_KEYS: [&str; 11] = [
    "machine.model",
    "machine.units_per_mm",
    "builder.stitch_spacing",
    "builder.backtack_length",
    "builder.backtack_steps",
    "qr.module_size",
    "qr.stitch_spacing",
    "qr.error_correction",
    "qr.margin",
    "qr.quiet_zone",
    "encoding.oversized_delta",
];

impl Default for Config {
    fn default() -> Self {
        Self {
            machine: MachineConfig::default(),
            builder: BuilderConfig::default(),
            qr: QrConfig::default(),
            encoding: EncodingConfig::default(),
            source_attribution: CONFIG_KEYS
                .iter()
                .map(|k| ((*k).to_string(), ConfigSource::Default))
                .collect(),
        }
    }
}

impl Config {
    #[must_use]
    pub fn stitch_area(&self) -> StitchArea {
        self.machine.model.stitch_area(self.machine.units_per_mm)
    }

    #[must_use]
    pub fn qr_settings(&self) -> QrSettings {
        QrSettings {
            module_size: self.qr.module_size,
            stitch_spacing: self.qr.stitch_spacing,
            ec_level: self.qr.error_correction,
            margin: self.qr.margin,
            quiet_zone: self.qr.quiet_zone,
        }
    }

    #[must_use]
    pub fn encode_options(&self) -> EncodeOptions {
        EncodeOptions {
            oversized_delta: self.encoding.oversized_delta,
        }
    }

    /// Source of `key`, `default` when unattributed.
    #[must_use]
    pub fn source_of(&self, key: &str) -> ConfigSource {
        self.source_attribution
            .get(key)
            .copied()
            .unwrap_or(ConfigSource::Default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.machine.model, MachineModel::PlkA0804);
        assert_eq!(config.machine.units_per_mm, 10);
        assert!((config.builder.stitch_spacing - 20.0).abs() < f64::EPSILON);
        assert_eq!(config.builder.backtack_length, 6);
        assert_eq!(config.builder.backtack_steps, 3);
        assert_eq!(config.qr.module_size, 8);
        assert_eq!(config.qr.error_correction, EcLevel::M);
        assert_eq!(config.qr.margin, 20);
        assert_eq!(config.qr.quiet_zone, 4);
        assert_eq!(config.encoding.oversized_delta, DeltaPolicy::Clamp);
    }

    #[test]
    fn test_every_key_defaults_to_default_source() {
        let config = Config::default();
        for key in CONFIG_KEYS {
            assert_eq!(config.source_of(key), ConfigSource::Default, "{key}");
        }
    }

    #[test]
    fn test_derived_settings() {
        let config = Config::default();
        let area = config.stitch_area();
        assert_eq!((area.width, area.height), (200, 200));
        assert_eq!(config.qr_settings(), QrSettings::default());
        assert_eq!(config.encode_options(), EncodeOptions::default());
    }
}
