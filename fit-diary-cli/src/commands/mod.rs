use clap::ValueEnum;

mod config_cmd;
mod log;
mod units;

pub use config_cmd::ConfigCommand;
pub use log::LogCommand;
pub use units::UnitsCommand;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
