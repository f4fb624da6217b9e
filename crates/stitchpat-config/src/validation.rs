use stitchpat_codec::coords::MAX_DELTA;
use stitchpat_utils::error::ConfigError;

use crate::Config;

fn invalid(key: &str, value: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.into(),
    }
}

impl Config {
    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.machine.units_per_mm <= 0 {
            return Err(invalid("machine.units_per_mm", "must be greater than 0"));
        }

        let spacing = self.builder.stitch_spacing;
        if spacing.is_nan() || spacing <= 0.0 {
            return Err(invalid("builder.stitch_spacing", "must be greater than 0"));
        }
        if spacing > f64::from(MAX_DELTA) {
            return Err(invalid(
                "builder.stitch_spacing",
                format!("{spacing} exceeds the {MAX_DELTA}-unit record limit"),
            ));
        }

        if !(1..=50).contains(&self.builder.backtack_length) {
            return Err(invalid(
                "builder.backtack_length",
                format!("{} is outside 1..=50", self.builder.backtack_length),
            ));
        }

        if self.builder.backtack_steps < 2 {
            return Err(invalid("builder.backtack_steps", "must be at least 2"));
        }

        if !(4..=60).contains(&self.qr.module_size) {
            return Err(invalid(
                "qr.module_size",
                format!("{} is outside 4..=60", self.qr.module_size),
            ));
        }

        if self.qr.stitch_spacing.is_nan() || self.qr.stitch_spacing <= 0.0 {
            return Err(invalid("qr.stitch_spacing", "must be greater than 0"));
        }

        if !(0..=8).contains(&self.qr.quiet_zone) {
            return Err(invalid(
                "qr.quiet_zone",
                format!("{} is outside 0..=8", self.qr.quiet_zone),
            ));
        }

        Ok(())
    }
}
