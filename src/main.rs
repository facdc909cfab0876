use clap::{Parser, Subcommand};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

use infoscreen::core::config;
use infoscreen::daemon;

#[derive(Parser)]
#[command(name = "infoscreen", about = "Home-automation media suite for the infoscreen")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Radio daemon: plays stations, controlled via UNIX socket and signals
    Radio,
    /// Selector daemon: module menu driven by navigation commands
    Selector,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let log_name = match args.command {
        Command::Radio => "infoscreen-radio.log",
        Command::Selector => "infoscreen-selector.log",
    };

    // Initialize file logger - writes next to the working directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create(log_name) {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let loaded = match config::load_config() {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("{e}");
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()));
        }
    };
    let resolved = match config::resolve(&loaded) {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("{e}");
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()));
        }
    };

    log::info!("Infoscreen starting up, notify target {}", resolved.notify_addr);

    match args.command {
        Command::Radio => daemon::radio::run(resolved).await,
        Command::Selector => daemon::selector::run(resolved).await,
    }
}
