use clap::Parser;
use forwardflow_core::{config, EmbeddingTable, SharedTable};
use forwardflow_server::api::create_router;
use forwardflow_server::api::handlers::AppState;
use forwardflow_server::api::metrics;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "forwardflow", about = "Forward-flow scoring service")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = config::DEFAULT_PORT)]
    port: u16,

    /// Embedding table in word-vector text format
    #[arg(short, long, default_value = config::DEFAULT_TABLE_PATH)]
    table: PathBuf,

    /// Defer loading the table until the first request that needs it
    #[arg(long, default_value_t = false)]
    lazy: bool,

    /// Maximum length of free-text input in characters
    #[arg(long, default_value_t = config::MAX_TEXT_CHARS)]
    max_text_chars: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("forwardflow_server=info".parse()?)
                .add_directive("forwardflow_core=info".parse()?),
        )
        .init();

    let args = Args::parse();

    if args.port == 0 {
        eprintln!("Error: port must be > 0");
        std::process::exit(1);
    }
    if args.max_text_chars == 0 {
        eprintln!("Error: max-text-chars must be > 0");
        std::process::exit(1);
    }

    let prometheus_handle =
        metrics_exporter_prometheus::PrometheusBuilder::new().install_recorder()?;

    let table = if args.lazy {
        tracing::info!("Lazy table loading enabled ({:?})", args.table);
        SharedTable::lazy(args.table.clone())
    } else {
        let path = args.table.clone();
        let loaded = tokio::task::spawn_blocking(move || EmbeddingTable::load(path)).await?;
        match loaded {
            Ok(table) => {
                metrics::update_table_metrics(&table);
                SharedTable::preloaded(table)
            }
            Err(e) => {
                eprintln!(
                    "Error: failed to load embedding table '{}': {}",
                    args.table.display(),
                    e
                );
                std::process::exit(1);
            }
        }
    };

    let state = AppState {
        table: Arc::new(table),
        prometheus_handle,
        start_time: Instant::now(),
        max_text_chars: args.max_text_chars,
    };

    let app = create_router(state);
    let addr = format!("0.0.0.0:{}", args.port);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        port = args.port,
        table = %args.table.display(),
        lazy = args.lazy,
        "forwardflow ready"
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT"),
        _ = terminate => tracing::info!("Received SIGTERM"),
    }

    tracing::info!("Shutting down gracefully, draining in-flight requests...");
}
