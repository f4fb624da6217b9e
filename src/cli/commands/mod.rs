//! Command handlers, one module per subcommand.

mod common;
mod config;
mod csv;
mod info;
mod line;
mod qr;
mod rect;
mod resave;

pub use config::execute_config_command;
pub use csv::execute_csv_command;
pub use info::execute_info_command;
pub use line::execute_line_command;
pub use qr::execute_qr_command;
pub use rect::execute_rect_command;
pub use resave::execute_resave_command;
