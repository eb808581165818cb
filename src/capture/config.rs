//! Capture and application configuration.
//!
//! Every section of the configuration file is optional; missing fields
//! fall back to defaults that match the exam pages (640x480 video,
//! one verification per second, `/check_person` and `/save_capture`).

use crate::proctor::ResponseOrdering;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Default JPEG quality, matching the browser default for `image/jpeg`.
pub const DEFAULT_JPEG_QUALITY: u8 = 92;

/// Configuration for camera capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Camera device index.
    pub device_id: u32,
    /// Requested frame width in pixels.
    pub width: u32,
    /// Requested frame height in pixels.
    pub height: u32,
    /// Requested frames per second.
    pub fps: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            device_id: 0,
            width: 640,
            height: 480,
            fps: 30,
        }
    }
}

impl CaptureConfig {
    /// Creates a new configuration with the specified dimensions.
    pub fn with_dimensions(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if self.fps == 0 || self.fps > 120 {
            return Err(ConfigError::InvalidFrameRate);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid frame dimensions")]
    InvalidDimensions,
    #[error("invalid frame rate (must be 1-120 fps)")]
    InvalidFrameRate,
    #[error("invalid verification interval (must be at least 1 ms)")]
    InvalidInterval,
    #[error("invalid JPEG quality {0} (must be 1-100)")]
    InvalidQuality(u8),
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub proctor: ProctorConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub snapshot: SnapshotConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Location of the exam server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL that endpoint paths are joined onto.
    pub base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
        }
    }
}

/// Proctoring loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProctorConfig {
    /// Path of the verification endpoint.
    pub verify_path: String,
    /// Period between captures in milliseconds.
    pub interval_ms: u64,
    /// Per-request timeout in milliseconds. Unset means no timeout.
    pub request_timeout_ms: Option<u64>,
    /// JPEG quality for submitted frames (1-100).
    pub jpeg_quality: u8,
    /// How responses that complete out of order are applied.
    pub ordering: ResponseOrdering,
    /// Where to write a PNG of the video with its overlay after each update.
    pub preview_path: Option<PathBuf>,
}

impl Default for ProctorConfig {
    fn default() -> Self {
        Self {
            verify_path: "/check_person".to_string(),
            interval_ms: 1000,
            request_timeout_ms: None,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            ordering: ResponseOrdering::default(),
            preview_path: None,
        }
    }
}

impl ProctorConfig {
    /// Returns the capture period.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Returns the per-request timeout, if any.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

/// Geometry of the displayed video element.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Left offset of the video within its container.
    pub left: i32,
    /// Top offset of the video within its container.
    pub top: i32,
    /// Rendered width.
    pub width: u32,
    /// Rendered height.
    pub height: u32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            left: 0,
            top: 0,
            width: 640,
            height: 480,
        }
    }
}

/// Reference snapshot form settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Path (or absolute URL) the form posts to.
    pub form_action: String,
    /// Name of the file input field.
    pub file_field: String,
    /// Width of the fixed-size capture surface.
    pub width: u32,
    /// Height of the fixed-size capture surface.
    pub height: u32,
    /// JPEG quality for the snapshot (1-100).
    pub jpeg_quality: u8,
    /// Additional static form fields submitted with the file.
    pub fields: BTreeMap<String, String>,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            form_action: "/save_capture".to_string(),
            file_field: "webcam".to_string(),
            width: 640,
            height: 480,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            fields: BTreeMap::new(),
        }
    }
}

/// Metrics exporter settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Metrics server port (0 to disable).
    pub port: u16,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { port: 9090 }
    }
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        let config: FileConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.capture.validate()?;
        if self.view.width == 0 || self.view.height == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if self.snapshot.width == 0 || self.snapshot.height == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if self.proctor.interval_ms == 0 {
            return Err(ConfigError::InvalidInterval);
        }
        for quality in [self.proctor.jpeg_quality, self.snapshot.jpeg_quality] {
            if quality == 0 || quality > 100 {
                return Err(ConfigError::InvalidQuality(quality));
            }
        }
        self.verify_url()?;
        self.form_action_url()?;
        Ok(())
    }

    /// Full URL of the verification endpoint.
    pub fn verify_url(&self) -> Result<Url, ConfigError> {
        self.join(&self.proctor.verify_path)
    }

    /// Full URL of the snapshot form's action.
    pub fn form_action_url(&self) -> Result<Url, ConfigError> {
        self.join(&self.snapshot.form_action)
    }

    fn join(&self, path: &str) -> Result<Url, ConfigError> {
        let base = Url::parse(&self.server.base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", self.server.base_url, e)))?;
        base.join(path)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", path, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = FileConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_dimensions_invalid() {
        let mut config = CaptureConfig::default();
        config.width = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDimensions)
        ));
    }

    #[test]
    fn test_default_endpoints() {
        let config = FileConfig::default();
        assert_eq!(
            config.verify_url().unwrap().as_str(),
            "http://127.0.0.1:5000/check_person"
        );
        assert_eq!(
            config.form_action_url().unwrap().as_str(),
            "http://127.0.0.1:5000/save_capture"
        );
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: FileConfig = toml::from_str(
            r#"
            [server]
            base_url = "https://exam.example.org"

            [proctor]
            interval_ms = 250
            ordering = "latest-wins"

            [snapshot.fields]
            student_id = "s-42"
            "#,
        )
        .unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.proctor.interval(), Duration::from_millis(250));
        assert_eq!(config.proctor.ordering, ResponseOrdering::LatestWins);
        assert_eq!(config.proctor.verify_path, "/check_person");
        assert_eq!(config.view.width, 640);
        assert_eq!(config.snapshot.fields.get("student_id").unwrap(), "s-42");
        assert_eq!(
            config.verify_url().unwrap().as_str(),
            "https://exam.example.org/check_person"
        );
    }

    #[test]
    fn test_invalid_quality_rejected() {
        let mut config = FileConfig::default();
        config.proctor.jpeg_quality = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidQuality(0))
        ));
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let mut config = FileConfig::default();
        config.server.base_url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidUrl(_))));
    }
}
