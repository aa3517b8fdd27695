use std::time::Duration;

use crate::config::{EngineKind, OcrConfig};
use crate::error::{RelayError, Result};

use super::{CliEngine, ContainerEngine, ServiceEngine};

enum EngineBackend {
    Container(ContainerEngine),
    Service(ServiceEngine),
    Cli(CliEngine),
}

/// The relay's single extraction capability: `extract(bytes) -> text`.
///
/// Built once at startup from `OcrConfig`; every request goes through the
/// same backend. All backends share the configured timeout, so a wedged
/// engine turns into a bounded error instead of a hung request.
pub struct Extractor {
    backend: EngineBackend,
    timeout_secs: u64,
}

impl Extractor {
    pub fn new(config: &OcrConfig) -> Result<Self> {
        let backend = match config.engine {
            EngineKind::Container => {
                tracing::info!(
                    runtime = %config.container_runtime,
                    image = %config.container_image,
                    "container OCR engine selected"
                );
                EngineBackend::Container(ContainerEngine::new(config))
            }
            EngineKind::Service => {
                tracing::info!(url = %config.service_url, "downstream OCR service selected");
                EngineBackend::Service(ServiceEngine::new(config)?)
            }
            EngineKind::Cli => {
                tracing::info!(command = %config.command, "local cli OCR engine selected");
                EngineBackend::Cli(CliEngine::new(config))
            }
        };

        Ok(Self {
            backend,
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn kind(&self) -> EngineKind {
        match self.backend {
            EngineBackend::Container(_) => EngineKind::Container,
            EngineBackend::Service(_) => EngineKind::Service,
            EngineBackend::Cli(_) => EngineKind::Cli,
        }
    }

    pub async fn extract(&self, image_bytes: &[u8]) -> Result<String> {
        let budget = Duration::from_secs(self.timeout_secs);

        match tokio::time::timeout(budget, self.extract_inner(image_bytes)).await {
            Ok(result) => result,
            Err(_) => Err(RelayError::Timeout(self.timeout_secs)),
        }
    }

    async fn extract_inner(&self, image_bytes: &[u8]) -> Result<String> {
        match &self.backend {
            EngineBackend::Container(engine) => engine.extract(image_bytes).await,
            EngineBackend::Service(engine) => engine.extract(image_bytes).await,
            EngineBackend::Cli(engine) => engine.extract(image_bytes).await,
        }
    }
}
