pub mod api;
pub mod auth;
pub mod catalog;
pub mod clients;
pub mod config;
pub mod constants;
pub mod db;
pub mod entities;

pub use config::Config;

use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<()> {
    let config = Config::load()?;
    config.validate()?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(String::as_str) {
        None | Some("serve") => serve(config).await,

        Some("init") => {
            let created = Config::create_default_if_missing()?;
            if created {
                println!("Wrote default config.toml");
            } else {
                println!("config.toml already exists, leaving it alone");
            }
            Ok(())
        }

        Some(other) => {
            print_help();
            anyhow::bail!("Unknown command: {other}")
        }
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    info!("BioLens v{} starting...", env!("CARGO_PKG_VERSION"));

    let port = config.server.port;
    let state = api::create_app_state(config).await?;
    let app = api::router(state);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("API server running at http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

fn print_help() {
    println!("BioLens backend v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: biolens [command]");
    println!();
    println!("Commands:");
    println!("  serve    Start the API server (default)");
    println!("  init     Write a default config.toml next to the binary");
}
