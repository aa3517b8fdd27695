use std::sync::Arc;

use crate::config::Config;
use crate::extract::{CliEngine, Extractor};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// The configured relay engine, shared by all `/api/ocr` requests.
    pub extractor: Arc<Extractor>,
    /// Engine-surface backend for `POST /ocr`; always the local cli engine,
    /// regardless of which engine the relay itself is configured with.
    pub cli: CliEngine,
}

impl AppState {
    pub fn new(config: Config, extractor: Extractor) -> Self {
        let cli = CliEngine::new(&config.ocr);

        Self {
            config: Arc::new(config),
            extractor: Arc::new(extractor),
            cli,
        }
    }
}
