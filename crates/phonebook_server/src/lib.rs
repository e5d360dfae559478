//! HTTP surface of the phonebook service.
//!
//! # Responsibility
//! - Route `/api/persons` and `/info` requests to `PersonService`.
//! - Own the store lifecycle: open at startup, close after shutdown.

pub mod config;
pub mod error;
pub mod handlers;
mod shutdown;

pub use config::{CliArgs, DatabaseTarget, ServerConfig};
pub use error::{ApiError, ErrorBody};
pub use handlers::AppState;

use anyhow::{Context, Result};
use axum::routing::get;
use axum::Router;
use log::{info, warn};
use phonebook_core::db::{open_db, open_db_in_memory};
use phonebook_core::{PersonService, PersonStore, SqlitePersonStore};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builds the router for a given store.
///
/// Unknown paths and unsupported methods on known paths both answer
/// `404 {"error": "Unknown endpoint"}`.
pub fn app<S: PersonStore + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route(
            "/api/persons",
            get(handlers::list_persons::<S>).post(handlers::create_person::<S>),
        )
        .route(
            "/api/persons/{id}",
            get(handlers::get_person::<S>)
                .put(handlers::update_person::<S>)
                .delete(handlers::delete_person::<S>),
        )
        .route("/info", get(handlers::info::<S>))
        .fallback(handlers::unknown_endpoint)
        .method_not_allowed_fallback(handlers::unknown_endpoint)
        .with_state(state)
}

/// Opens the configured store.
pub fn open_store(config: &ServerConfig) -> Result<SqlitePersonStore> {
    let conn = match &config.database {
        DatabaseTarget::Memory => {
            open_db_in_memory().context("failed to open in-memory database")?
        }
        DatabaseTarget::File(path) => open_db(path)
            .with_context(|| format!("failed to open database `{}`", path.display()))?,
    };
    Ok(SqlitePersonStore::new(conn))
}

/// Serves until a shutdown signal arrives, then closes the store.
pub async fn run_server(config: ServerConfig) -> Result<()> {
    let store = open_store(&config)?;
    let service = Arc::new(PersonService::new(store));
    let router = app(service.clone());

    let listener = TcpListener::bind(config.bind_address)
        .await
        .with_context(|| format!("failed to bind `{}`", config.bind_address))?;
    let actual_addr = listener.local_addr()?;
    info!(
        "event=server_listen module=http status=ok bind={actual_addr} core_version={}",
        phonebook_core::core_version()
    );

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown::signal())
        .await;
    info!("event=server_stop module=http status=ok");

    match Arc::into_inner(service) {
        Some(service) => service
            .into_store()
            .close()
            .context("failed to close database")?,
        None => warn!("event=db_close module=db status=skipped reason=shared_handle"),
    }

    served.context("server terminated with an error")
}
