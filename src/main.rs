//! Task tracker server.
//!
//! Serves `/api/tasks` over the storage backend selected at start-up.
//!
//! # Environment Variables
//!
//! - `STORAGE_MODE`: `in_memory` (default) | `postgres` | `postgrest`
//! - `DATABASE_URL`: `PostgreSQL` connection URL (required when `STORAGE_MODE=postgres`)
//! - `POSTGREST_URL`: managed storage endpoint (required when `STORAGE_MODE=postgrest`)
//! - `POSTGREST_API_KEY`: managed storage API key (required when `STORAGE_MODE=postgrest`)
//! - `RUST_LOG`: Logging filter (default: `task_tracker=debug,tower_http=debug`)
//! - `LOG_FORMAT`: `text` (default) | `json`
//! - `HOST`: Server host address (default: `0.0.0.0`)
//! - `PORT`: Server port (default: `3000`)
//! - `WORKER_THREADS`: Number of tokio worker threads (default: logical CPU count)

use std::env;
use std::net::{AddrParseError, SocketAddr};

use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use task_tracker::api::{AppState, build_router};
use task_tracker::infrastructure::{RepositoryConfig, RepositoryFactory};

fn parse_worker_threads() -> Option<usize> {
    parse_worker_threads_from(env::var("WORKER_THREADS").ok())
}

fn parse_worker_threads_from(value: Option<String>) -> Option<usize> {
    let value = value?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    match trimmed.parse::<usize>() {
        Ok(0) => {
            eprintln!("Warning: WORKER_THREADS=0 is invalid (must be > 0), using default");
            None
        }
        Ok(threads) => Some(threads),
        Err(error) => {
            eprintln!(
                "Warning: WORKER_THREADS='{trimmed}' is not a valid number ({error}), using default"
            );
            None
        }
    }
}

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

/// Resolves the bind address from `HOST` and `PORT`.
///
/// Empty or whitespace-only values fall back to the defaults, as does a
/// `PORT` that is not a valid port number.
fn server_address(lookup: impl Fn(&str) -> Option<String>) -> Result<SocketAddr, AddrParseError> {
    let non_empty = |name: &str| {
        lookup(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    };

    let host = non_empty("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = non_empty("PORT")
        .and_then(|port| port.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);

    format!("{host}:{port}").parse()
}

fn main() {
    dotenvy::dotenv().ok();

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(threads) = parse_worker_threads() {
        builder.worker_threads(threads);
    }

    let runtime = match builder.build() {
        Ok(runtime) => runtime,
        Err(error) => {
            eprintln!("Failed to create tokio runtime: {error}");
            std::process::exit(1);
        }
    };
    runtime.block_on(async_main());
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "task_tracker=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    if env::var("LOG_FORMAT").is_ok_and(|format| format.trim().eq_ignore_ascii_case("json")) {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn async_main() {
    init_tracing();

    tracing::info!("Starting task tracker");

    let config = match RepositoryConfig::from_env() {
        Ok(config) => config,
        Err(error) => {
            tracing::error!("Configuration error: {}", error);
            std::process::exit(1);
        }
    };

    tracing::info!(storage_mode = ?config.storage_mode, "Repository configuration loaded");

    let factory = RepositoryFactory::new(config);
    let task_repository = match factory.create().await {
        Ok(repository) => {
            tracing::info!("Repository initialized successfully");
            repository
        }
        Err(error) => {
            tracing::error!("Failed to initialize repository: {}", error);
            std::process::exit(1);
        }
    };

    let application = build_router(AppState::new(task_repository));

    let address = match server_address(|name| env::var(name).ok()) {
        Ok(address) => address,
        Err(error) => {
            tracing::error!(%error, "Invalid server address");
            std::process::exit(1);
        }
    };

    let listener = match TcpListener::bind(address).await {
        Ok(listener) => listener,
        Err(error) => {
            tracing::error!(%error, "Failed to bind to address {}", address);
            std::process::exit(1);
        }
    };

    match listener.local_addr() {
        Ok(address) => tracing::info!("Listening on {}", address),
        Err(error) => tracing::warn!(%error, "Could not determine local address"),
    }

    if let Err(error) = axum::serve(listener, application)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(%error, "Server error");
        std::process::exit(1);
    }

    tracing::info!("Server shutdown complete");
}

/// Completes on Ctrl+C, or on SIGTERM where available.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::warn!(%error, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::warn!(%error, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn lookup_from(host: Option<&str>, port: Option<&str>) -> impl Fn(&str) -> Option<String> {
        let host = host.map(str::to_string);
        let port = port.map(str::to_string);
        move |name| match name {
            "HOST" => host.clone(),
            "PORT" => port.clone(),
            _ => None,
        }
    }

    #[rstest]
    #[case(None, None, "0.0.0.0:3000")]
    #[case(Some(""), None, "0.0.0.0:3000")]
    #[case(Some("   "), Some("39123"), "0.0.0.0:39123")]
    #[case(Some(" 127.0.0.1 "), Some(" 8080 "), "127.0.0.1:8080")]
    #[case(Some("127.0.0.1"), Some(""), "127.0.0.1:3000")]
    #[case(Some("127.0.0.1"), Some("not-a-port"), "127.0.0.1:3000")]
    #[case(Some("127.0.0.1"), Some("70000"), "127.0.0.1:3000")]
    fn test_server_address(
        #[case] host: Option<&str>,
        #[case] port: Option<&str>,
        #[case] expected: &str,
    ) {
        let address = server_address(lookup_from(host, port)).unwrap();
        assert_eq!(address, expected.parse::<SocketAddr>().unwrap());
    }

    #[rstest]
    fn test_server_address_rejects_unparseable_host() {
        assert!(server_address(lookup_from(Some("not a host"), None)).is_err());
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some(""), None)]
    #[case(Some("0"), None)]
    #[case(Some("four"), None)]
    #[case(Some(" 4 "), Some(4))]
    fn test_parse_worker_threads(#[case] value: Option<&str>, #[case] expected: Option<usize>) {
        assert_eq!(
            parse_worker_threads_from(value.map(str::to_string)),
            expected
        );
    }
}
