/*****************************************************************************************
 *
 *  notekeeper – per-user note store over HTTP
 *  ------------------------------------------
 *
 *  In-memory only: notes live until deleted, until their lifetime runs out,
 *  or until the process stops.
 *
 *****************************************************************************************/

use std::process::ExitCode;
use std::sync::Arc;

use axum::serve;
use tokio::net::TcpListener;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::FmtSubscriber;

use notekeeper::app;
use notekeeper::config::{locate_config, AppConfig};
use notekeeper::NoteStore;

#[tokio::main]
async fn main() -> ExitCode {
    //
    // ────────────────────────────────────────────────────────
    //  Locate and load config.json
    // ────────────────────────────────────────────────────────
    //
    let cfg = match locate_config().and_then(|path| AppConfig::load_from_file(&path)) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("notekeeper: {e}");
            return ExitCode::FAILURE;
        }
    };

    //
    // ────────────────────────────────────────────────────────
    //  Configure logging
    // ────────────────────────────────────────────────────────
    //
    let level = match cfg.log_level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info"  => LevelFilter::INFO,
        "warn"  => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => LevelFilter::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("notekeeper: failed to set tracing subscriber: {e}");
        return ExitCode::FAILURE;
    }

    tracing::info!("Starting notekeeper…");
    tracing::info!("Loaded configuration: {:?}", cfg);

    //
    // ────────────────────────────────────────────────────────
    //  Create the store and build the Axum app
    // ────────────────────────────────────────────────────────
    //
    // Expiry is swept lazily on access; there is no background cleanup task.
    let store = Arc::new(NoteStore::new());
    let app = app::build_app(store.clone(), cfg.clone());

    //
    // ────────────────────────────────────────────────────────
    //  Bind server and start listening
    // ────────────────────────────────────────────────────────
    //
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], cfg.port));
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {addr}: {e}");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!("Listening on http://{}", addr);

    if let Err(e) = serve(listener, app).with_graceful_shutdown(shutdown()).await {
        tracing::error!("Server error: {e}");
        return ExitCode::FAILURE;
    }

    tracing::info!("Stopped with {} registered users. Goodbye.", store.user_count());
    ExitCode::SUCCESS
}

//
// ─────────────────────────────────────────────────────────────
//  Graceful shutdown handler
// ─────────────────────────────────────────────────────────────
//
async fn shutdown() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }

    tracing::warn!("CTRL+C received, shutting down…");
}
