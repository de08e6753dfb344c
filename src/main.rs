//! Iris prediction service.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────────┐
//!                        │                 PREDICTION SERVICE               │
//!                        │                                                  │
//!   Client Request       │  ┌─────────┐   ┌────────────┐   ┌─────────────┐  │
//!   ─────────────────────┼─▶│  http   │──▶│ rate limit │──▶│  handlers   │  │
//!                        │  │ server  │   │ per client │   └──────┬──────┘  │
//!                        │  └─────────┘   └────────────┘          │         │
//!                        │                                        ▼         │
//!                        │                               ┌────────────────┐ │
//!                        │                               │ resilience     │ │
//!                        │                               │ guard          │ │
//!                        │                               │ breaker+drift  │ │
//!                        │                               └───────┬────────┘ │
//!                        │                                       ▼          │
//!   Client Response      │                               ┌────────────────┐ │
//!   ◀────────────────────┼───────────────────────────────│   predictor    │ │
//!                        │                               └────────────────┘ │
//!                        │                                                  │
//!                        │   config · observability · lifecycle             │
//!                        └──────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use iris_serving::config::{load_config, ServiceConfig};
use iris_serving::lifecycle::signals::wait_for_signal;
use iris_serving::observability::{logging, metrics};
use iris_serving::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "iris-serving")]
#[command(about = "Iris species prediction service", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };

    logging::init_logging(&config.observability.log_level);
    tracing::info!("iris-serving v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        model = %config.model.name,
        model_version = %config.model.version,
        config_file = ?args.config,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => {
                tracing::error!(
                    metrics_address = %config.observability.metrics_address,
                    "Failed to parse metrics address"
                );
            }
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    let mut server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    tokio::select! {
        _ = wait_for_signal() => {
            shutdown.trigger();
            server_task.await??;
        }
        result = &mut server_task => {
            result??;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
