use stitchpat_builder::{EcLevel, MachineModel};
use stitchpat_codec::DeltaPolicy;
use stitchpat_utils::error::ConfigError;

use crate::{Config, ConfigSource};

impl Config {
    /// Create a builder for programmatic configuration.
    ///
    /// No file or environment is consulted.
    ///
    /// # Example
    ///
    /// ```rust
    /// use stitchpat_config::Config;
    /// use stitchpat_builder::MachineModel;
    ///
    /// let config = Config::builder()
    ///     .machine(MachineModel::PlkA0408)
    ///     .module_size(4)
    ///     .build()
    ///     .expect("valid config");
    /// assert_eq!(config.stitch_area().width, 400);
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Fluent construction of a [`Config`] for embedding and tests.
///
/// Every value set here is attributed to `ConfigSource::Programmatic`.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    machine: Option<MachineModel>,
    units_per_mm: Option<i32>,
    stitch_spacing: Option<f64>,
    backtack_length: Option<usize>,
    backtack_steps: Option<usize>,
    module_size: Option<i32>,
    qr_stitch_spacing: Option<f64>,
    error_correction: Option<EcLevel>,
    margin: Option<i32>,
    quiet_zone: Option<i32>,
    oversized_delta: Option<DeltaPolicy>,
}

impl ConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn machine(mut self, model: MachineModel) -> Self {
        self.machine = Some(model);
        self
    }

    #[must_use]
    pub fn units_per_mm(mut self, units: i32) -> Self {
        self.units_per_mm = Some(units);
        self
    }

    /// Spacing for lines and outlines (must be > 0 and <= 127).
    #[must_use]
    pub fn stitch_spacing(mut self, spacing: f64) -> Self {
        self.stitch_spacing = Some(spacing);
        self
    }

    #[must_use]
    pub fn backtack_length(mut self, length: usize) -> Self {
        self.backtack_length = Some(length);
        self
    }

    #[must_use]
    pub fn backtack_steps(mut self, steps: usize) -> Self {
        self.backtack_steps = Some(steps);
        self
    }

    /// QR module side in machine units (4..=60).
    #[must_use]
    pub fn module_size(mut self, size: i32) -> Self {
        self.module_size = Some(size);
        self
    }

    #[must_use]
    pub fn qr_stitch_spacing(mut self, spacing: f64) -> Self {
        self.qr_stitch_spacing = Some(spacing);
        self
    }

    #[must_use]
    pub fn error_correction(mut self, level: EcLevel) -> Self {
        self.error_correction = Some(level);
        self
    }

    #[must_use]
    pub fn margin(mut self, margin: i32) -> Self {
        self.margin = Some(margin);
        self
    }

    #[must_use]
    pub fn quiet_zone(mut self, modules: i32) -> Self {
        self.quiet_zone = Some(modules);
        self
    }

    #[must_use]
    pub fn oversized_delta(mut self, policy: DeltaPolicy) -> Self {
        self.oversized_delta = Some(policy);
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<Config, ConfigError> {
        let mut config = Config::default();
        let mut mark = |key: &str, set: bool| {
            if set {
                config
                    .source_attribution
                    .insert(key.to_string(), ConfigSource::Programmatic);
            }
        };
        mark("machine.model", self.machine.is_some());
        mark("machine.units_per_mm", self.units_per_mm.is_some());
        mark("builder.stitch_spacing", self.stitch_spacing.is_some());
        mark("builder.backtack_length", self.backtack_length.is_some());
        mark("builder.backtack_steps", self.backtack_steps.is_some());
        mark("qr.module_size", self.module_size.is_some());
        mark("qr.stitch_spacing", self.qr_stitch_spacing.is_some());
        mark("qr.error_correction", self.error_correction.is_some());
        mark("qr.margin", self.margin.is_some());
        mark("qr.quiet_zone", self.quiet_zone.is_some());
        mark("encoding.oversized_delta", self.oversized_delta.is_some());

        let machine = &mut config.machine;
        machine.model = self.machine.unwrap_or(machine.model);
        machine.units_per_mm = self.units_per_mm.unwrap_or(machine.units_per_mm);

        let builder = &mut config.builder;
        builder.stitch_spacing = self.stitch_spacing.unwrap_or(builder.stitch_spacing);
        builder.backtack_length = self.backtack_length.unwrap_or(builder.backtack_length);
        builder.backtack_steps = self.backtack_steps.unwrap_or(builder.backtack_steps);

        let qr = &mut config.qr;
        qr.module_size = self.module_size.unwrap_or(qr.module_size);
        qr.stitch_spacing = self.qr_stitch_spacing.unwrap_or(qr.stitch_spacing);
        qr.error_correction = self.error_correction.unwrap_or(qr.error_correction);
        qr.margin = self.margin.unwrap_or(qr.margin);
        qr.quiet_zone = self.quiet_zone.unwrap_or(qr.quiet_zone);

        if let Some(policy) = self.oversized_delta {
            config.encoding.oversized_delta = policy;
        }

        config.validate()?;
        Ok(config)
    }
}
