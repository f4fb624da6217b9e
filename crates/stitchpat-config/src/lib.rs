//! Configuration management for stitchpat
//!
//! Hierarchical configuration with discovery and precedence:
//! CLI > file > defaults. The TOML file at `.stitchpat/config.toml` supports
//! `[machine]`, `[builder]`, `[qr]` and `[encoding]` sections.

mod builder;
mod cli_args;
mod discovery;
mod model;
mod sources;
mod validation;

pub use builder::ConfigBuilder;
pub use cli_args::CliArgs;
pub use discovery::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, HOME_ENV};
pub use model::*;
pub use stitchpat_utils::types::ConfigSource;
