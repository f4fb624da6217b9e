use std::path::PathBuf;

/// CLI overrides fed into [`crate::Config::discover`].
///
/// Every `Some` field wins over the config file and is attributed to `cli`.
/// String-typed fields are parsed and validated during discovery.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config_path: Option<PathBuf>,
    pub machine: Option<String>,
    pub stitch_spacing: Option<f64>,
    pub backtack_length: Option<usize>,
    pub module_size: Option<i32>,
    pub qr_stitch_spacing: Option<f64>,
    pub error_correction: Option<String>,
    pub oversized_delta: Option<String>,
}
