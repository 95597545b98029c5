mod cli;
mod commands;
mod display;
mod error;
mod logger;
mod scsi;

use crate::cli::{Cli, Commands};
use crate::error::Result;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse_args();

    // Initialize logging system
    logger::init(args.verbose)?;

    debug!("rust-sedio CLI starting");

    match run(args).await {
        Ok(_) => {
            info!("Operation completed successfully");
            Ok(())
        }
        Err(e) => {
            error!("Operation failed: {}", e);
            std::process::exit(1);
        }
    }
}

async fn run(args: Cli) -> Result<()> {
    match args.command {
        Commands::Identify { device, json } => commands::identify::execute(device, json).await,

        Commands::Recv {
            device,
            protocol,
            comid,
            length,
            output,
        } => commands::security::receive(device, protocol, comid, length, output).await,

        Commands::Send {
            device,
            protocol,
            comid,
            input,
        } => commands::security::send(device, protocol, comid, input).await,
    }
}
