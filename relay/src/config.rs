use serde::Deserialize;
use std::env;
use std::str::FromStr;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub ocr: OcrConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

/// Which delegation strategy the relay uses for text extraction.
/// Chosen once at startup, never per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// One isolated container run per request, image bytes on stdin.
    Container,
    /// Forward the upload to a downstream OCR microservice.
    Service,
    /// Run a local OCR executable against a temp file.
    Cli,
}

impl FromStr for EngineKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "container" | "podman" => Ok(EngineKind::Container),
            "service" | "http" => Ok(EngineKind::Service),
            "cli" | "tesseract" => Ok(EngineKind::Cli),
            other => Err(format!(
                "unknown engine '{other}' (expected container, service, or cli)"
            )),
        }
    }
}

impl std::fmt::Display for EngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineKind::Container => write!(f, "container"),
            EngineKind::Service => write!(f, "service"),
            EngineKind::Cli => write!(f, "cli"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    pub engine: EngineKind,
    /// Base URL of the downstream OCR microservice (service engine).
    pub service_url: String,
    /// Container runtime executable (container engine).
    pub container_runtime: String,
    /// Image whose entrypoint reads one image from stdin and writes text to stdout.
    pub container_image: String,
    /// Local OCR executable (cli engine).
    pub command: String,
    /// Where the cli engine places its per-request temp files. `None` = system temp.
    pub tmp_dir: Option<String>,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("RELAY_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("RELAY_PORT", 8000),
                max_upload_bytes: parse_env_or("RELAY_MAX_UPLOAD_BYTES", 10 * 1024 * 1024),
            },
            ocr: OcrConfig {
                engine: parse_env_or("OCR_ENGINE", EngineKind::Container),
                service_url: env::var("OCR_SERVICE_URL")
                    .unwrap_or_else(|_| "http://127.0.0.1:5000".to_string()),
                container_runtime: env::var("OCR_CONTAINER_RUNTIME")
                    .unwrap_or_else(|_| "podman".to_string()),
                container_image: env::var("OCR_CONTAINER_IMAGE")
                    .unwrap_or_else(|_| "jitesoft/tesseract-ocr".to_string()),
                command: env::var("OCR_COMMAND").unwrap_or_else(|_| "tesseract".to_string()),
                tmp_dir: env::var("OCR_TMP_DIR").ok(),
                timeout_secs: parse_env_or("OCR_TIMEOUT", 30),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_config_defaults() {
        std::env::remove_var("OCR_ENGINE");
        std::env::remove_var("OCR_SERVICE_URL");
        std::env::remove_var("RELAY_PORT");

        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.ocr.engine, EngineKind::Container);
        assert_eq!(config.ocr.service_url, "http://127.0.0.1:5000");
        assert_eq!(config.ocr.container_runtime, "podman");
        assert_eq!(config.ocr.container_image, "jitesoft/tesseract-ocr");
        assert_eq!(config.ocr.command, "tesseract");
        assert!(config.ocr.tmp_dir.is_none());
        assert_eq!(config.ocr.timeout_secs, 30);
    }

    #[test]
    #[serial]
    fn test_engine_from_env() {
        std::env::set_var("OCR_ENGINE", "service");
        std::env::set_var("OCR_SERVICE_URL", "http://ocr.internal:5000");
        let config = Config::default();
        assert_eq!(config.ocr.engine, EngineKind::Service);
        assert_eq!(config.ocr.service_url, "http://ocr.internal:5000");

        std::env::remove_var("OCR_ENGINE");
        std::env::remove_var("OCR_SERVICE_URL");
    }

    #[test]
    #[serial]
    fn test_invalid_engine_falls_back_to_default() {
        std::env::set_var("OCR_ENGINE", "carrier-pigeon");
        let config = Config::default();
        assert_eq!(config.ocr.engine, EngineKind::Container);

        std::env::remove_var("OCR_ENGINE");
    }

    #[test]
    fn test_engine_kind_aliases() {
        assert_eq!("podman".parse::<EngineKind>(), Ok(EngineKind::Container));
        assert_eq!("http".parse::<EngineKind>(), Ok(EngineKind::Service));
        assert_eq!("tesseract".parse::<EngineKind>(), Ok(EngineKind::Cli));
        assert_eq!("CLI".parse::<EngineKind>(), Ok(EngineKind::Cli));
        assert!("carrier-pigeon".parse::<EngineKind>().is_err());
    }

    #[test]
    fn test_engine_kind_display_round_trips() {
        for kind in [EngineKind::Container, EngineKind::Service, EngineKind::Cli] {
            assert_eq!(kind.to_string().parse::<EngineKind>(), Ok(kind));
        }
    }
}
