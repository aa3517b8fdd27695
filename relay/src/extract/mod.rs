//! Text extraction engines.
//!
//! The relay never performs OCR itself; it delegates to an external engine
//! through one of three interchangeable backends, selected once at startup
//! by `OcrConfig::engine`:
//!
//! - [`ContainerEngine`] runs one isolated container per request and feeds
//!   the image bytes on stdin (`podman run --rm -i <image> - -`).
//! - [`ServiceEngine`] re-issues the upload as a multipart POST to a
//!   downstream OCR microservice and reads the `text` field of its reply.
//! - [`CliEngine`] persists the bytes to a uniquely named temp file and runs
//!   a local executable against it (`tesseract <path> stdout`).
//!
//! [`Extractor`] wraps the selected backend with a shared timeout, following
//! the provider pattern used elsewhere in this codebase: one public type, one
//! operation (`extract(bytes) -> text`), backend chosen by configuration.

mod cli;
mod container;
mod engine;
mod service;

pub use cli::CliEngine;
pub use container::ContainerEngine;
pub use engine::Extractor;
pub use service::ServiceEngine;

use std::env;
use std::path::{Path, PathBuf};
use std::process::Output;

use crate::error::RelayError;

/// Locate an executable the way a shell would. Commands carrying a path
/// separator are checked directly instead of searched on `PATH`.
pub(crate) fn find_on_path(command: &str) -> Option<PathBuf> {
    let candidate = Path::new(command);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }

    let paths = env::var_os("PATH")?;
    env::split_paths(&paths)
        .map(|dir| dir.join(command))
        .find(|p| p.is_file())
}

/// Phrases in engine stderr that indicate a host-side permission or
/// connectivity problem rather than a bad image.
const EXECUTION_FAILURE_PHRASES: &[&str] = &["permission denied", "cannot connect"];

/// Map a finished engine process to a result.
///
/// Zero exit: stdout decoded lossily and trimmed (empty text is success).
/// Non-zero exit: stderr is inspected for known permission/connectivity
/// phrases and replaced with a pointed message naming `tool`; otherwise the
/// raw diagnostic (or "Unknown error") is surfaced.
pub(crate) fn map_engine_output(output: Output, tool: &str) -> crate::error::Result<String> {
    if output.status.success() {
        let text = String::from_utf8_lossy(&output.stdout);
        return Ok(text.trim().to_string());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let diagnostic = stderr.trim();

    let lowered = diagnostic.to_lowercase();
    if EXECUTION_FAILURE_PHRASES.iter().any(|p| lowered.contains(p)) {
        return Err(RelayError::Engine(format!(
            "Backend cannot execute {tool} command. Check permissions."
        )));
    }

    let message = if diagnostic.is_empty() {
        "Unknown error"
    } else {
        diagnostic
    };
    Err(RelayError::Engine(format!("OCR Error: {message}")))
}

/// Error for a tool that could not be found on `PATH`.
pub(crate) fn missing_dependency(tool: &str) -> RelayError {
    RelayError::DependencyMissing(format!(
        "{tool} is not installed or not in PATH. Required for OCR."
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::process::ExitStatusExt;
    use std::process::ExitStatus;

    fn output(code: i32, stdout: &str, stderr: &str) -> Output {
        Output {
            status: ExitStatus::from_raw(code << 8),
            stdout: stdout.as_bytes().to_vec(),
            stderr: stderr.as_bytes().to_vec(),
        }
    }

    #[test]
    fn success_trims_outer_whitespace_only() {
        let text = map_engine_output(output(0, "  Hello  World\n\n", ""), "podman").unwrap();
        assert_eq!(text, "Hello  World");
    }

    #[test]
    fn empty_stdout_is_success() {
        let text = map_engine_output(output(0, "", "some warning"), "podman").unwrap();
        assert_eq!(text, "");
    }

    #[test]
    fn permission_denied_gets_pointed_message() {
        let err = map_engine_output(
            output(1, "", "Error: permission denied while opening socket"),
            "podman",
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Backend cannot execute podman command. Check permissions."
        );
    }

    #[test]
    fn cannot_connect_gets_pointed_message() {
        let err =
            map_engine_output(output(125, "", "cannot connect to Podman socket"), "podman")
                .unwrap_err();
        assert!(err.to_string().contains("Check permissions."));
    }

    #[test]
    fn other_stderr_is_surfaced_raw() {
        let err = map_engine_output(output(1, "", "read_params_file: boom\n"), "tesseract")
            .unwrap_err();
        assert_eq!(err.to_string(), "OCR Error: read_params_file: boom");
    }

    #[test]
    fn empty_stderr_becomes_unknown_error() {
        let err = map_engine_output(output(1, "", ""), "tesseract").unwrap_err();
        assert_eq!(err.to_string(), "OCR Error: Unknown error");
    }

    #[test]
    fn missing_dependency_names_the_tool() {
        let err = missing_dependency("podman");
        assert_eq!(
            err.to_string(),
            "podman is not installed or not in PATH. Required for OCR."
        );
    }

    #[test]
    fn find_on_path_resolves_common_binary() {
        // `sh` is present on any unix host this runs on.
        assert!(find_on_path("sh").is_some());
        assert!(find_on_path("definitely-not-a-real-binary-xyz").is_none());
    }

    #[test]
    fn find_on_path_checks_explicit_paths_directly() {
        assert!(find_on_path("/bin/sh").is_some());
        assert!(find_on_path("/bin/definitely-not-a-real-binary-xyz").is_none());
    }
}
