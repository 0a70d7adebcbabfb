pub mod assessment;
pub mod backup;
mod cli;
pub mod db;
pub mod settings;
pub mod time;
pub mod utils;

use clap::Parser;
use log::LevelFilter;

const ENABLE_LOGS: bool = true;

pub fn run() {
    env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = cli::Cli::parse();

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(err) => {
            log_error!("Failed to start async runtime: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = runtime.block_on(cli.dispatch()) {
        log_error!("{err:#}");
        std::process::exit(1);
    }
}
