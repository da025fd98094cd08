use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: obralink_db::DbPool,
    /// Server configuration (JWT, dispatch URLs, country code).
    pub config: Arc<ServerConfig>,
}
