mod cli;
mod commands;
mod error;
mod logging;

use crate::cli::{Cli, Commands};
use crate::error::Result;
use clap::Parser;
use tracing::{debug, info};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.clone())?;

    info!("mdpost v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    match cli.command {
        Commands::Convergence(args) => {
            info!("Dispatching to 'convergence' command.");
            commands::convergence::run(args)
        }
        Commands::Profiles(args) => {
            info!("Dispatching to 'profiles' command.");
            commands::profiles::run(args)
        }
        Commands::Track(args) => {
            info!("Dispatching to 'track' command.");
            commands::track::run(args, cli.tracking_dir)
        }
    }
}
