//! Innkeep - hotel operations backend
//!
//! Serves the operations API and runs the nightly audit scheduler over a
//! shared SQLite database.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use innkeep_api::ApiState;
use innkeep_core::Database;

mod config;
mod scheduler;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting Innkeep");

    let config = config::AppConfig::load_default();

    let db_path = match config.resolve_database_path() {
        Ok(path) => path,
        Err(e) => {
            tracing::error!("Failed to resolve database path: {}", e);
            std::process::exit(1);
        }
    };

    let db = match Database::open(&db_path) {
        Ok(db) => Arc::new(Mutex::new(db)),
        Err(e) => {
            tracing::error!("Failed to open database: {}", e);
            std::process::exit(1);
        }
    };

    // Night audit runs alongside the API on the shared handle
    let audit = scheduler::NightAuditScheduler::new(db.clone(), &config.night_audit);
    tokio::spawn(audit.run());

    let state = ApiState::new(db);
    if let Err(e) = innkeep_api::serve(config.listen_addr, state).await {
        tracing::error!("API server failed: {}", e);
        std::process::exit(1);
    }
}
