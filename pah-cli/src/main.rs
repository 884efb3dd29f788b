//! PAH CLI - Command line tool for retrieving PurpleAir sensor history.

use clap::Parser;
use env_logger::{Env, Target};
use log::error;

#[derive(Parser)]
#[command(
    name = "pah-cli",
    version,
    about = "PurpleAir sensor history toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: pah_cmd::Command,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Stdout)
        .init();
    let cli = Cli::parse();
    if let Err(e) = pah_cmd::run(cli.command).await {
        error!("Error: {:#}", e);
        std::process::exit(1);
    }
}
