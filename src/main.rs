//! CLI for stream-connector
//!
//! Subcommands:
//! - `status`: check whether the coordinator is alive
//! - `send`: route one payload (a file or stdin) through the coordinator
//! - `queue`: print the messaging system's queue lengths

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use stream_connector::utils::logging;
use stream_connector::{Settings, StreamConnector, load_config};
use tokio::io::AsyncReadExt;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "stream-connector")]
struct Cli {
    /// Coordinator IP address (overrides configuration)
    #[arg(long, env = "STREAM_CONNECTOR_ADDRESS")]
    address: Option<String>,

    /// Coordinator port (overrides configuration)
    #[arg(long, env = "STREAM_CONNECTOR_PORT")]
    port: Option<u16>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check whether the coordinator answers its status route
    Status,
    /// Send one payload to wherever the coordinator routes it
    Send {
        /// Unit-of-work (container image) name
        #[arg(long)]
        name: String,
        /// OS/platform tag
        #[arg(long, default_value = "linux")]
        os: String,
        #[arg(long)]
        priority: Option<u32>,
        /// Payload file; stdin when omitted
        file: Option<PathBuf>,
    },
    /// Print queued item counts per unit-of-work name
    Queue,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let settings = match load_config() {
        Ok(settings) => settings,
        Err(e) => {
            logging::init("info");
            error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    logging::init(&settings.log_level);

    match run(cli, settings).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, mut settings: Settings) -> Result<bool, Box<dyn std::error::Error>> {
    if let Some(address) = cli.address {
        settings.coordinator.address = address;
    }
    if let Some(port) = cli.port {
        settings.coordinator.port = port;
    }

    let connector = StreamConnector::from_settings(&settings)?;

    match cli.command {
        Command::Status => {
            let alive = connector.is_master_alive().await;
            info!(coordinator = connector.coordinator().base_url(), alive, "status");
            println!("{}", if alive { "alive" } else { "down" });
            Ok(alive)
        }
        Command::Send {
            name,
            os,
            priority,
            file,
        } => {
            let payload = match file {
                Some(path) => tokio::fs::read(path).await?,
                None => {
                    let mut buf = Vec::new();
                    tokio::io::stdin().read_to_end(&mut buf).await?;
                    buf
                }
            };

            let delivery = connector.send_data(&name, &os, &payload, priority).await?;
            println!("{}", serde_json::to_string(&delivery)?);
            Ok(true)
        }
        Command::Queue => {
            let lengths = connector.coordinator().queue_lengths().await?;
            println!("{}", serde_json::to_string_pretty(&lengths)?);
            Ok(true)
        }
    }
}
