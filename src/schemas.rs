use std::{path::PathBuf, sync::Arc};

use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};

use crate::session::SessionStore;
use crate::views::Views;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Server-side session data
    pub sessions: SessionStore,
    /// Compiled page templates
    pub views: Arc<Views>,
    /// Where uploaded documents are written
    pub upload_dir: Arc<PathBuf>,
    /// Request body ceiling, enforced by the router
    pub max_upload_bytes: usize,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}
