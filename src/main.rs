//! Pipeline service binary.
//!
//! ```text
//!   Client ──POST /cep──▶ gateway ──GET /temperatura/{cep}──▶ resolver
//!                                                               │
//!                                      postal directory ◀───────┤
//!                                      weather API      ◀───────┘
//! ```
//!
//! One binary, two roles; pick one with the subcommand.

use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use cep_temperature::config::{load_for_role, Role};
use cep_temperature::http::{build_resolver, HttpServer};
use cep_temperature::lifecycle::Shutdown;
use cep_temperature::observability::{logging, metrics, Telemetry};

#[derive(Parser)]
#[command(name = "cep-temperature")]
#[command(about = "Postal code to temperature gateway and resolver", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults plus CEP_* variables when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the front gateway (POST /cep)
    Gateway,
    /// Run the back resolver (GET /temperatura/{cep})
    Resolver,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let role = match cli.command {
        Commands::Gateway => Role::Gateway,
        Commands::Resolver => Role::Resolver,
    };

    let config = load_for_role(cli.config.as_deref(), role)?;
    logging::init_logging(&config.observability);

    tracing::info!(role = %role, version = env!("CARGO_PKG_VERSION"), "cep-temperature starting");

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        if let Err(e) = metrics::init_metrics(addr) {
            tracing::error!(error = %e, "Failed to start metrics endpoint");
        }
    }

    let telemetry = Arc::new(Telemetry::from_config(&config.telemetry, role.service_name())?);

    let (server, bind_address) = match role {
        Role::Gateway => (
            HttpServer::gateway(&config, telemetry)?,
            config.gateway.bind_address.clone(),
        ),
        Role::Resolver => (
            HttpServer::resolver(&config, build_resolver(&config)?, telemetry),
            config.resolver.bind_address.clone(),
        ),
    };

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
