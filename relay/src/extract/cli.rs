use std::path::PathBuf;

use tokio::process::Command;

use crate::config::OcrConfig;
use crate::error::{RelayError, Result};

use super::{find_on_path, map_engine_output, missing_dependency};

/// Strategy (c): run a local OCR executable against a temp file.
///
/// The upload is persisted to a uniquely named temp file for the duration of
/// the engine run. The `NamedTempFile` guard removes it on drop, so the file
/// is gone after every exit path, success or failure, including a timeout
/// that cancels the future mid-run.
#[derive(Debug, Clone)]
pub struct CliEngine {
    command: String,
    tmp_dir: Option<PathBuf>,
}

impl CliEngine {
    pub fn new(config: &OcrConfig) -> Self {
        Self {
            command: config.command.clone(),
            tmp_dir: config.tmp_dir.as_ref().map(PathBuf::from),
        }
    }

    pub async fn extract(&self, image_bytes: &[u8]) -> Result<String> {
        if find_on_path(&self.command).is_none() {
            return Err(missing_dependency(&self.command));
        }

        let mut builder = tempfile::Builder::new();
        builder.prefix("ocr-relay-").suffix(".png");
        let tmp = match &self.tmp_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }?;

        tokio::fs::write(tmp.path(), image_bytes).await?;

        tracing::debug!(command = %self.command, path = %tmp.path().display(), "running cli engine");

        // `stdout` directs the engine to print text instead of writing a file.
        let output = Command::new(&self.command)
            .arg(tmp.path())
            .arg("stdout")
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => missing_dependency(&self.command),
                _ => RelayError::Io(e),
            })?;

        map_engine_output(output, &self.command)
    }
}
