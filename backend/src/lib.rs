//! # Account Service Backend
//!
//! A small CRUD service for account documents, layered as:
//! ```text
//! HTTP transport (io::rest)
//!     ↓
//! Endpoints (io::endpoints)
//!     ↓
//! Service (domain)
//!     ↓
//! Document store (storage)
//! ```
//! Requests travel down the stack and results come back up through the same
//! layers. The binary in `main.rs` only wires configuration, logging and
//! shutdown around [`initialize_backend`] and [`create_router`].

pub mod config;
pub mod domain;
pub mod io;
pub mod shutdown;
pub mod storage;

use std::sync::Arc;

use anyhow::Result;
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::AppConfig;
use crate::domain::AccountService;
use crate::io::AccountEndpoints;
use crate::storage::{AccountRepository, DbConnection};

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub account_endpoints: AccountEndpoints,
}

impl AppState {
    /// Wire repository, service and endpoints on top of an open store
    pub fn new(db: DbConnection) -> Self {
        let repository = AccountRepository::new(db);
        let account_service = AccountService::new(Arc::new(repository));

        Self {
            account_endpoints: AccountEndpoints::new(account_service),
        }
    }
}

/// Connect to the account store and build the application state.
///
/// Fails if the store is unreachable or its index cannot be created.
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Connecting to account store");
    let db = DbConnection::new(&config.store_url).await?;

    info!("Setting up application state");
    Ok(AppState::new(db))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .merge(io::rest::account_apis::router())
        .route("/healthz", get(io::rest::health_apis::healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
