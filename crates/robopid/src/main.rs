//! RoboPi - robot arm dance bot
//!
//! Connects to an IRC server and takes commands from the channel and stdin.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::{error, info};

use robopi_common::Config;
use robopid::interpreter::CommandInterpreter;
use robopid::listeners::console;
use robopid::sequencer::MoveSequencer;
use robopid::{actuator, bot, irc};

#[derive(Parser)]
#[command(name = "robopi")]
#[command(about = "Teach a USB robot arm to dance over IRC", long_about = None)]
#[command(version)]
struct Cli {
    /// IRC server, as host or host:port
    server: String,

    /// Connect with TLS
    #[arg(long)]
    secure: bool,

    /// Config file (default: /etc/robopi/config.toml, then the user config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use the simulated arm even if the USB arm is present
    #[arg(long)]
    simulate: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    info!("RoboPi v{} starting", env!("CARGO_PKG_VERSION"));

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    let arm = actuator::open(&config.arm, cli.simulate);
    let sequencer = MoveSequencer::new(arm);

    let server = irc::with_default_port(&cli.server, config.irc.default_port);
    info!("Joining {}", server);

    let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
    let connection = irc::connect(&config.irc, &server, cli.secure, inbound_tx.clone())
        .await
        .with_context(|| format!("Failed to connect to {}", server))?;
    let handle = connection.handle();

    if config.console.enabled {
        console::spawn_listener(inbound_tx.clone()).context("Failed to start console listener")?;
    }
    drop(inbound_tx);

    let interpreter = CommandInterpreter::new(sequencer, Box::new(handle.clone()));

    let shutdown = async move {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    error!("Failed to listen for Ctrl-C: {}", e);
                }
            }
            _ = connection.closed() => {
                error!("Lost connection to {}", server);
            }
        }
    };

    bot::run(interpreter, inbound_rx, handle, shutdown).await;
    info!("RoboPi stopped");

    Ok(())
}
