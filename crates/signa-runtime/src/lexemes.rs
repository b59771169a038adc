//! Lexeme collection on the consumer side
//!
//! The stabilizer re-emits a held label on every qualifying cycle. The
//! collector keeps a recognition only when its label differs from the last
//! one kept, and hands the collected lexemes over in order.

use crate::{PipelineEvent, Recognition};

#[derive(Debug, Default)]
pub struct LexemeCollector {
    recognitions: Vec<Recognition>,
    fps: Option<u32>,
}

impl LexemeCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a recognition; returns true if it was kept
    pub fn push(&mut self, recognition: Recognition) -> bool {
        if self
            .recognitions
            .last()
            .is_some_and(|last| last.label == recognition.label)
        {
            return false;
        }

        let end_to_end = recognition.end_to_end().as_millis();
        self.fps = (end_to_end > 0).then(|| (1000.0 / end_to_end as f32).round() as u32);
        tracing::info!(label = %recognition.label, score = recognition.score, "lexeme");
        self.recognitions.push(recognition);
        true
    }

    /// Offer any pipeline event; only recognitions are collected
    pub fn accept(&mut self, event: &PipelineEvent) -> bool {
        match event {
            PipelineEvent::Recognized(recognition) => self.push(recognition.clone()),
            PipelineEvent::Error { .. } => false,
        }
    }

    pub fn lexemes(&self) -> impl Iterator<Item = &str> {
        self.recognitions.iter().map(|r| r.label.as_str())
    }

    pub fn recognitions(&self) -> &[Recognition] {
        &self.recognitions
    }

    /// Frame rate implied by the last kept recognition's end-to-end time
    pub fn fps(&self) -> Option<u32> {
        self.fps
    }

    /// Take the collected non-empty lexemes, leaving the collector empty
    pub fn drain(&mut self) -> Vec<String> {
        self.recognitions
            .drain(..)
            .map(|r| r.label)
            .filter(|label| !label.is_empty())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.recognitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recognitions.is_empty()
    }

    pub fn clear(&mut self) {
        self.recognitions.clear();
        self.fps = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signa_core::FrameTime;
    use std::time::Duration;

    fn recognition(label: &str, frame_ms: i64) -> Recognition {
        Recognition {
            label: label.into(),
            score: 0.95,
            frame_timestamp: FrameTime::from_millis(frame_ms),
            candidate_since: FrameTime::from_millis(frame_ms - 600),
            started_at: FrameTime::from_millis(frame_ms + 30),
            latency: Duration::from_millis(20),
        }
    }

    #[test]
    fn test_consecutive_duplicates_collapse() {
        let mut collector = LexemeCollector::new();
        assert!(collector.push(recognition("hello", 1000)));
        assert!(!collector.push(recognition("hello", 1033)));
        assert!(collector.push(recognition("you", 2000)));
        assert!(collector.push(recognition("hello", 3000)));

        assert_eq!(collector.lexemes().collect::<Vec<_>>(), vec!["hello", "you", "hello"]);
    }

    #[test]
    fn test_fps_from_end_to_end_time() {
        let mut collector = LexemeCollector::new();
        assert_eq!(collector.fps(), None);
        collector.push(recognition("hello", 1000));
        // 30ms queueing + 20ms cycle
        assert_eq!(collector.fps(), Some(20));
    }

    #[test]
    fn test_drain_skips_empty_labels() {
        let mut collector = LexemeCollector::new();
        collector.push(recognition("hello", 0));
        collector.push(recognition("", 700));
        collector.push(recognition("thanks", 1400));

        assert_eq!(collector.drain(), vec!["hello".to_string(), "thanks".to_string()]);
        assert!(collector.is_empty());
    }

    #[test]
    fn test_errors_are_ignored() {
        let mut collector = LexemeCollector::new();
        assert!(!collector.accept(&PipelineEvent::error("boom")));
        assert!(collector.accept(&PipelineEvent::Recognized(recognition("a", 0))));
        assert_eq!(collector.len(), 1);
    }
}
