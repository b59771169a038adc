//! Pipeline configuration
//!
//! JSON form, every field optional:
//!
//! ```json
//! {
//!   "window_span": "1s",
//!   "mostly_empty_ratio": 0.7,
//!   "num_frames": 15,
//!   "threshold": 0.9,
//!   "min_unchanged": "600ms",
//!   "use_hw_acceleration": true
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use signa_classify::StabilizerConfig;
use signa_core::{SignaError, SignaResult};
use signa_window::{WindowConfig, NUM_FRAMES};

/// Full pipeline configuration
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineConfig {
    pub window: WindowConfig,
    /// Rows fed to the classifier per evaluation
    pub num_frames: usize,
    pub stabilizer: StabilizerConfig,
    /// Try the accelerated delegate before CPU
    pub use_hw_acceleration: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            window: WindowConfig::default(),
            num_frames: NUM_FRAMES,
            stabilizer: StabilizerConfig::default(),
            use_hw_acceleration: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    window_span: Option<String>,
    mostly_empty_ratio: Option<f32>,
    num_frames: Option<usize>,
    threshold: Option<f32>,
    min_unchanged: Option<String>,
    use_hw_acceleration: Option<bool>,
}

fn parse_duration(field: &str, value: &str) -> SignaResult<Duration> {
    humantime::parse_duration(value)
        .map_err(|e| SignaError::Config(format!("{field}: invalid duration {value:?}: {e}")))
}

impl PipelineConfig {
    /// Configuration for CPU-only devices
    pub fn cpu_only() -> Self {
        PipelineConfig {
            use_hw_acceleration: false,
            ..Default::default()
        }
    }

    /// Parse a JSON document over the defaults
    pub fn from_json_str(json: &str) -> SignaResult<Self> {
        let file: ConfigFile =
            serde_json::from_str(json).map_err(|e| SignaError::Config(e.to_string()))?;

        let mut config = PipelineConfig::default();
        if let Some(span) = file.window_span.as_deref() {
            config.window.span = parse_duration("window_span", span)?;
        }
        if let Some(ratio) = file.mostly_empty_ratio {
            config.window.mostly_empty_ratio = ratio;
        }
        if let Some(num_frames) = file.num_frames {
            config.num_frames = num_frames;
        }
        if let Some(threshold) = file.threshold {
            config.stabilizer.threshold = threshold;
        }
        if let Some(hold) = file.min_unchanged.as_deref() {
            config.stabilizer.min_unchanged = parse_duration("min_unchanged", hold)?;
        }
        if let Some(use_hw) = file.use_hw_acceleration {
            config.use_hw_acceleration = use_hw;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> SignaResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| SignaError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> SignaResult<()> {
        let threshold = self.stabilizer.threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(SignaError::Config(format!(
                "threshold must be in (0, 1], got {threshold}"
            )));
        }
        let ratio = self.window.mostly_empty_ratio;
        if !(0.0..=1.0).contains(&ratio) {
            return Err(SignaError::Config(format!(
                "mostly_empty_ratio must be in [0, 1], got {ratio}"
            )));
        }
        if self.num_frames == 0 {
            return Err(SignaError::Config("num_frames must be positive".into()));
        }
        if self.window.span.is_zero() {
            return Err(SignaError::Config("window_span must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.window.span, Duration::from_millis(1000));
        assert_eq!(config.window.mostly_empty_ratio, 0.7);
        assert_eq!(config.num_frames, 15);
        assert_eq!(config.stabilizer.threshold, 0.9);
        assert_eq!(config.stabilizer.min_unchanged, Duration::from_millis(600));
        assert!(config.use_hw_acceleration);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(PipelineConfig::from_json_str("{}").unwrap(), PipelineConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = PipelineConfig::from_json_str(
            r#"{"window_span": "1500ms", "min_unchanged": "1s", "threshold": 0.8,
                "num_frames": 20, "use_hw_acceleration": false}"#,
        )
        .unwrap();

        assert_eq!(config.window.span, Duration::from_millis(1500));
        assert_eq!(config.stabilizer.min_unchanged, Duration::from_secs(1));
        assert_eq!(config.stabilizer.threshold, 0.8);
        assert_eq!(config.num_frames, 20);
        assert!(!config.use_hw_acceleration);
    }

    #[test]
    fn test_invalid_values_rejected() {
        for json in [
            r#"{"threshold": 0.0}"#,
            r#"{"threshold": 1.5}"#,
            r#"{"mostly_empty_ratio": -0.1}"#,
            r#"{"num_frames": 0}"#,
            r#"{"window_span": "0s"}"#,
            r#"{"min_unchanged": "soon"}"#,
            r#"{"unknown_field": 1}"#,
        ] {
            let err = PipelineConfig::from_json_str(json).unwrap_err();
            assert!(matches!(err, SignaError::Config(_)), "{json}");
        }
    }

    #[test]
    fn test_cpu_only() {
        assert!(!PipelineConfig::cpu_only().use_hw_acceleration);
    }
}
