//! Label manifest
//!
//! The manifest is a JSON array of label names whose order matches the
//! model's output scores, e.g. `["hello", "thanks", "you"]`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use signa_core::{SignaError, SignaResult};

/// Ordered gesture labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelManifest {
    labels: Vec<String>,
}

impl LabelManifest {
    pub fn new(labels: Vec<String>) -> SignaResult<Self> {
        if labels.is_empty() {
            return Err(SignaError::Manifest("label list is empty".into()));
        }
        Ok(Self { labels })
    }

    pub fn from_json_str(json: &str) -> SignaResult<Self> {
        let labels: Vec<String> =
            serde_json::from_str(json).map_err(|e| SignaError::Manifest(e.to_string()))?;
        Self::new(labels)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> SignaResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| SignaError::Manifest(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_manifest() {
        let manifest = LabelManifest::from_json_str(r#"["hello", "thanks", "you"]"#).unwrap();
        assert_eq!(manifest.len(), 3);
        assert_eq!(manifest.get(1), Some("thanks"));
        assert_eq!(manifest.get(3), None);
    }

    #[test]
    fn test_empty_manifest_rejected() {
        let err = LabelManifest::from_json_str("[]").unwrap_err();
        assert!(matches!(err, SignaError::Manifest(_)));
    }

    #[test]
    fn test_malformed_manifest_rejected() {
        assert!(LabelManifest::from_json_str(r#"{"labels": 3}"#).is_err());
        assert!(LabelManifest::from_json_str("[1, 2]").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = LabelManifest::from_json_file("/nonexistent/gestures.json").unwrap_err();
        match err {
            SignaError::Manifest(msg) => assert!(msg.contains("gestures.json")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
