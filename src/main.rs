use clap::Parser;
use colored::Colorize;
use env_logger::Env;
use log::error;
use std::process::ExitCode;

use libayur::config::Args;
use libayur::server::start_server;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level.clone())).init();

    match start_server(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("[Setup] {}", err);
            eprintln!("{}", format!("Cannot start server: {}", err).bright_red());
            ExitCode::FAILURE
        }
    }
}
