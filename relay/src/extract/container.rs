use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::config::OcrConfig;
use crate::error::{RelayError, Result};

use super::{find_on_path, map_engine_output, missing_dependency};

/// Strategy (a): one isolated container run per request.
///
/// The engine image's entrypoint is expected to read a single image from
/// stdin and write the recognized text to stdout, then exit. With the
/// default `jitesoft/tesseract-ocr` image that is `tesseract - -`.
#[derive(Debug, Clone)]
pub struct ContainerEngine {
    runtime: String,
    image: String,
}

impl ContainerEngine {
    pub fn new(config: &OcrConfig) -> Self {
        Self {
            runtime: config.container_runtime.clone(),
            image: config.container_image.clone(),
        }
    }

    pub async fn extract(&self, image_bytes: &[u8]) -> Result<String> {
        if find_on_path(&self.runtime).is_none() {
            return Err(missing_dependency(&self.runtime));
        }

        tracing::debug!(runtime = %self.runtime, image = %self.image, "spawning container engine");

        let mut child = Command::new(&self.runtime)
            .arg("run")
            .arg("--rm")
            // Interactive mode so the container reads the image from stdin.
            .arg("-i")
            .arg(&self.image)
            .arg("-")
            .arg("-")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => missing_dependency(&self.runtime),
                _ => RelayError::Io(e),
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| RelayError::Internal("failed to open engine stdin".to_string()))?;
        stdin.write_all(image_bytes).await?;
        // Close stdin so the engine sees EOF and starts processing.
        drop(stdin);

        let output = child.wait_with_output().await?;
        map_engine_output(output, &self.runtime)
    }
}
