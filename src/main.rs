mod auth;
mod cli;
mod config;
mod error;
mod output;
mod providers;

use clap::Parser;
use cli::Cli;
use log::info;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse_from(cli::normalize_args(std::env::args()));
    info!("Starting wakka {}", env!("CARGO_PKG_VERSION"));

    match cli.execute().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::print_error(&err);
            ExitCode::from(err.exit_code())
        }
    }
}
