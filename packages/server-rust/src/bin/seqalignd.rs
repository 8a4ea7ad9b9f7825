//! `seqalignd` — pairwise sequence alignment service.
//!
//! `serve` (the default) runs the HTTP service until SIGTERM or Ctrl-C.
//! `manifest` prints the service descriptor consumed by the deployment
//! platform and exits.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use seqalign_core::align::PairwiseAligner;
use seqalign_core::manifest::{RestControllerDescriptor, ServiceDescriptor};
use seqalign_core::models::{AlignmentRequest, AlignmentResponse};
use seqalign_server::{ServiceConfig, ServiceModule};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SERVICE_TITLE: &str = "Pairwise sequence alignment";

const SERVICE_DESCRIPTION: &str = "\
Aligns a query sequence to a target sequence by optimizing the similarity \
score between them. Supports global and local alignment with configurable \
match and mismatch scores, and exposes immediate, artificially slow, and \
deferred (submit-then-poll) invocation styles.";

/// Readiness probe path advertised to the deployment platform.
const READY_PATH: &str = "/_healtz";

#[derive(Parser)]
#[command(name = "seqalignd", version, about = SERVICE_TITLE)]
struct Cli {
    /// Host address to bind.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port number to listen on.
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,

    /// Artificial processing delay in seconds for the slow and deferred paths.
    #[arg(long, env = "DELAY", default_value_t = 5)]
    delay: u64,

    /// Version string reported by the readiness endpoint.
    #[arg(long = "service-version", env = "VERSION", default_value = "???")]
    service_version: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP service (default).
    Serve,
    /// Print the service descriptor JSON and exit.
    Manifest,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut cli = Cli::parse();

    match cli.command.take().unwrap_or(Command::Serve) {
        Command::Manifest => print_manifest(&cli),
        Command::Serve => serve(cli).await,
    }
}

/// Composes and prints the deployment manifest for this service.
fn print_manifest(cli: &Cli) -> anyhow::Result<()> {
    let controller = RestControllerDescriptor::for_models::<AlignmentRequest, AlignmentResponse>(
        vec!["/app/seqalignd".to_owned(), "serve".to_owned()],
        cli.port,
        READY_PATH,
    )?;
    let descriptor = ServiceDescriptor::compose(SERVICE_TITLE, SERVICE_DESCRIPTION, controller);
    println!("{}", descriptor.to_json_pretty()?);
    Ok(())
}

async fn serve(cli: Cli) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seqalign_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServiceConfig {
        host: cli.host,
        port: cli.port,
        delay_seconds: cli.delay,
        version: cli.service_version,
        ..ServiceConfig::default()
    };

    tracing::info!("{} - {}", SERVICE_TITLE, config.version);
    if config.delay_seconds > 0 {
        tracing::info!(
            "Operating with artificial delay of {} sec",
            config.delay_seconds
        );
    }

    let mut module = ServiceModule::new(config, Arc::new(PairwiseAligner::new()));
    module.start().await?;
    module.serve(shutdown_signal()).await
}

/// Resolves when SIGTERM (container stop) or Ctrl-C is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("Shutdown signal received");
}
