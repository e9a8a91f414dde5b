mod app;
mod cli;
mod config;
mod consts;
mod error;
mod logging;
mod output;
mod server;
#[cfg(test)]
mod test_support;
mod tracking;
mod utils;
mod wms;

use std::process::ExitCode;

use clap::Parser;

use cli::Cli;
use config::Config;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_tracing(cli.debug);

    let config = Config::load();
    let cli = cli.with_config(&config);

    match app::run(cli, &config) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
