//! Shared application state handed to every handler.

use std::sync::Arc;

use folio_db::Database;

use crate::config::FolioConfig;

/// Cloned per request; both fields are cheap handles.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<FolioConfig>,
}

impl AppState {
    pub fn new(db: Database, config: FolioConfig) -> Self {
        AppState {
            db,
            config: Arc::new(config),
        }
    }
}
