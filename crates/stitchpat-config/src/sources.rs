use std::collections::HashMap;

use crate::{CONFIG_KEYS, Config};

impl Config {
    /// Rendered value of a dotted key, `None` for unknown keys.
    #[must_use]
    pub fn value_of(&self, key: &str) -> Option<String> {
        let value = match key {
            "machine.model" => self.machine.model.to_string(),
            "machine.units_per_mm" => self.machine.units_per_mm.to_string(),
            "builder.stitch_spacing" => self.builder.stitch_spacing.to_string(),
            "builder.backtack_length" => self.builder.backtack_length.to_string(),
            "builder.backtack_steps" => self.builder.backtack_steps.to_string(),
            "qr.module_size" => self.qr.module_size.to_string(),
            "qr.stitch_spacing" => self.qr.stitch_spacing.to_string(),
            "qr.error_correction" => self.qr.error_correction.to_string(),
            "qr.margin" => self.qr.margin.to_string(),
            "qr.quiet_zone" => self.qr.quiet_zone.to_string(),
            "encoding.oversized_delta" => self.encoding.oversized_delta.to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// Get effective configuration as key-value pairs with source attribution
    #[must_use]
    pub fn effective_config(&self) -> HashMap<String, (String, String)> {
        CONFIG_KEYS
            .iter()
            .filter_map(|key| {
                let value = self.value_of(key)?;
                let source = self.source_of(key).as_str().to_string();
                Some(((*key).to_string(), (value, source)))
            })
            .collect()
    }
}
