//! Config command implementation
//!
//! Prints every effective configuration key with its value and source.

use anyhow::Result;
use serde::Serialize;
use stitchpat_config::CONFIG_KEYS;

use super::common::to_json;
use crate::Config;

#[derive(Serialize)]
struct ConfigEntry<'a> {
    key: &'a str,
    value: &'a str,
    source: &'a str,
}

/// Execute the config command
pub fn execute_config_command(json: bool, config: &Config) -> Result<()> {
    let effective = config.effective_config();
    let entries: Vec<ConfigEntry<'_>> = CONFIG_KEYS
        .iter()
        .filter_map(|key| {
            effective.get(*key).map(|(value, source)| ConfigEntry {
                key: *key,
                value,
                source,
            })
        })
        .collect();

    if json {
        println!("{}", to_json(&entries)?);
        return Ok(());
    }

    println!("Effective configuration:");
    for entry in &entries {
        println!("  {:<26} = {:<12} [{}]", entry.key, entry.value, entry.source);
    }
    Ok(())
}
