//! Shared state handed to every request handler.

use std::path::PathBuf;
use std::sync::Arc;

use crate::common::config::AppConfig;
use crate::share::OfferRegistry;

/// One registry instance is built at startup and cloned into both the
/// upload and download paths; handlers never reach for globals.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<OfferRegistry>,
    pub upload_dir: PathBuf,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            registry: Arc::new(OfferRegistry::new()),
            upload_dir: config.upload_dir(),
        }
    }
}
