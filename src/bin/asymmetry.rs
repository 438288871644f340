use anyhow::{Context, Result};
use asymmetry::clock::SystemClock;
use asymmetry::config::{Config, Mode};
use asymmetry::initiator::{Initiator, InitiatorSocket, Reporter};
use asymmetry::logging::init_logging_with_config;
use asymmetry::responder::Responder;
use clap::Parser;
use tracing::{error, info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse CLI arguments
    let config = Config::parse();

    init_logging_with_config(&config.log_level, config.is_json_format());

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    }

    let result = match config.mode() {
        Mode::Responder => respond(&config).await,
        Mode::Initiator(host) => initiate(&config, &host).await,
    };

    if let Err(e) = result {
        error!(error = %e, "Run failed");
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Resolves on Ctrl+C; never resolves if the handler cannot be installed.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}

async fn respond(config: &Config) -> Result<()> {
    println!("No host provided, starting in server mode...");

    let addr = config.responder_address();
    let mut responder = Responder::bind(&addr, SystemClock)
        .await
        .with_context(|| format!("Failed to start responder on {}", addr))?;

    println!("Responding to exchange requests. Press Ctrl+C to stop.");
    responder.run(interrupted()).await?;
    println!("\nStopped responding to exchange requests.");
    Ok(())
}

async fn initiate(config: &Config, host: &str) -> Result<()> {
    println!("Initiating exchange with {}...", host);

    let remote = config.initiator_address(host);
    let socket = InitiatorSocket::connect(&remote)
        .await
        .with_context(|| format!("Failed to reach {}", remote))?;

    info!(
        peer = %socket.peer(),
        exchanges = config.exchanges,
        timeout_ms = config.timeout_ms,
        "Initiator ready"
    );

    println!("Sending exchange requests. Press Ctrl+C to stop.");
    let mut initiator = Initiator::new(socket, SystemClock, config.exchanges, config.timeout());
    let outcome = initiator.run(interrupted()).await?;
    Reporter::print_summary(&outcome);
    Ok(())
}
