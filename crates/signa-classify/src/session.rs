//! Classifier session - a loaded model and its label list

use signa_core::{InputTensor, SignaError, SignaResult};

use crate::{load_with_fallback, Delegate, GestureModel, LabelManifest, ModelLoader};

/// Expected classifier input shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputShape {
    pub frames: usize,
    pub width: usize,
}

impl InputShape {
    pub fn new(frames: usize, width: usize) -> Self {
        Self { frames, width }
    }
}

/// Best label for one input
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: String,
    pub index: usize,
    pub score: f32,
}

/// Loaded model plus ordered labels
///
/// Every call must be serialized by the owner.
pub struct ClassifierSession {
    model: Box<dyn GestureModel>,
    labels: LabelManifest,
    shape: InputShape,
    delegate: Delegate,
    fallback: Option<SignaError>,
}

impl ClassifierSession {
    /// Load the model, falling back to CPU if the accelerated delegate fails
    pub fn open(
        loader: &dyn ModelLoader,
        labels: LabelManifest,
        shape: InputShape,
        use_acceleration: bool,
    ) -> SignaResult<Self> {
        let loaded = load_with_fallback("classifier", use_acceleration, |delegate| {
            loader.load(delegate)
        })?;
        Ok(Self::with_model(
            loaded.value,
            labels,
            shape,
            loaded.delegate,
            loaded.fallback,
        ))
    }

    fn with_model(
        model: Box<dyn GestureModel>,
        labels: LabelManifest,
        shape: InputShape,
        delegate: Delegate,
        fallback: Option<SignaError>,
    ) -> Self {
        tracing::info!(
            %delegate,
            labels = labels.len(),
            frames = shape.frames,
            width = shape.width,
            "classifier session opened"
        );
        Self {
            model,
            labels,
            shape,
            delegate,
            fallback,
        }
    }

    pub fn delegate(&self) -> Delegate {
        self.delegate
    }

    /// Why the accelerated delegate was skipped, if it was
    pub fn fallback(&self) -> Option<&SignaError> {
        self.fallback.as_ref()
    }

    pub fn labels(&self) -> &LabelManifest {
        &self.labels
    }

    pub fn shape(&self) -> InputShape {
        self.shape
    }

    /// Run the model and pick the highest-scoring label
    ///
    /// Ties resolve to the lowest index.
    pub fn classify(&mut self, input: &InputTensor) -> SignaResult<Classification> {
        if input.frames() != self.shape.frames || input.width() != self.shape.width {
            return Err(SignaError::TensorShape {
                expected_frames: self.shape.frames,
                expected_width: self.shape.width,
                frames: input.frames(),
                width: input.width(),
            });
        }

        let scores = self.model.predict(input)?;
        if scores.len() != self.labels.len() {
            return Err(SignaError::ScoreCount {
                expected: self.labels.len(),
                actual: scores.len(),
            });
        }
        if let Some(index) = scores.iter().position(|score| !score.is_finite()) {
            return Err(SignaError::Inference(format!(
                "non-finite score {} at index {index}",
                scores[index]
            )));
        }

        let best = argmax(&scores).and_then(|(index, score)| {
            self.labels.get(index).map(|label| (index, score, label.to_string()))
        });
        let Some((index, score, label)) = best else {
            return Err(SignaError::ScoreCount {
                expected: self.labels.len(),
                actual: scores.len(),
            });
        };

        tracing::debug!(%label, score, "classified");
        Ok(Classification { label, index, score })
    }

    /// Release the model
    pub fn close(mut self) {
        self.model.close();
        tracing::info!(delegate = %self.delegate, "classifier session closed");
    }
}

impl std::fmt::Debug for ClassifierSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierSession")
            .field("labels", &self.labels.len())
            .field("shape", &self.shape)
            .field("delegate", &self.delegate)
            .finish_non_exhaustive()
    }
}

fn argmax(scores: &[f32]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &score) in scores.iter().enumerate() {
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((i, score)),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FixedModel {
        scores: Vec<f32>,
        closed: Arc<AtomicUsize>,
    }

    impl GestureModel for FixedModel {
        fn predict(&mut self, _input: &InputTensor) -> SignaResult<Vec<f32>> {
            Ok(self.scores.clone())
        }

        fn close(&mut self) {
            self.closed.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct FixedLoader {
        scores: Vec<f32>,
        accelerated_ok: bool,
        closed: Arc<AtomicUsize>,
    }

    impl FixedLoader {
        fn new(scores: Vec<f32>, accelerated_ok: bool) -> Self {
            Self {
                scores,
                accelerated_ok,
                closed: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl ModelLoader for FixedLoader {
        fn load(&self, delegate: Delegate) -> SignaResult<Box<dyn GestureModel>> {
            if delegate == Delegate::Accelerated && !self.accelerated_ok {
                return Err(SignaError::ModelLoad("no gpu".into()));
            }
            Ok(Box::new(FixedModel {
                scores: self.scores.clone(),
                closed: Arc::clone(&self.closed),
            }))
        }
    }

    fn labels() -> LabelManifest {
        LabelManifest::new(vec!["a".into(), "b".into(), "c".into()]).unwrap()
    }

    fn open(loader: &FixedLoader, use_acceleration: bool) -> ClassifierSession {
        ClassifierSession::open(loader, labels(), InputShape::new(15, 4), use_acceleration).unwrap()
    }

    fn tensor(frames: usize, width: usize) -> InputTensor {
        let row = vec![0.5; width];
        InputTensor::from_rows((0..frames).map(|_| row.as_slice()), width).unwrap()
    }

    #[test]
    fn test_accelerated_by_default() {
        let loader = FixedLoader::new(vec![0.1, 0.2, 0.7], true);
        let session = open(&loader, true);
        assert_eq!(session.delegate(), Delegate::Accelerated);
        assert!(session.fallback().is_none());
    }

    #[test]
    fn test_cpu_fallback() {
        let loader = FixedLoader::new(vec![0.1, 0.2, 0.7], false);
        let session = open(&loader, true);
        assert_eq!(session.delegate(), Delegate::Cpu);
        assert!(matches!(
            session.fallback(),
            Some(SignaError::DelegateUnavailable(_))
        ));
    }

    #[test]
    fn test_cpu_only_when_acceleration_disabled() {
        let loader = FixedLoader::new(vec![0.1, 0.2, 0.7], true);
        let session = open(&loader, false);
        assert_eq!(session.delegate(), Delegate::Cpu);
        assert!(session.fallback().is_none());
    }

    #[test]
    fn test_classify_argmax() {
        let loader = FixedLoader::new(vec![0.05, 0.93, 0.02], true);
        let mut session = open(&loader, true);

        let result = session.classify(&tensor(15, 4)).unwrap();
        assert_eq!(result.label, "b");
        assert_eq!(result.index, 1);
        assert!((result.score - 0.93).abs() < 1e-6);
    }

    #[test]
    fn test_argmax_tie_takes_first() {
        assert_eq!(argmax(&[0.4, 0.4, 0.2]), Some((0, 0.4)));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let loader = FixedLoader::new(vec![0.1, 0.2, 0.7], true);
        let mut session = open(&loader, true);

        let err = session.classify(&tensor(15, 5)).unwrap_err();
        assert!(matches!(err, SignaError::TensorShape { width: 5, .. }));
        let err = session.classify(&tensor(14, 4)).unwrap_err();
        assert!(matches!(err, SignaError::TensorShape { frames: 14, .. }));
    }

    #[test]
    fn test_score_count_mismatch_rejected() {
        let loader = FixedLoader::new(vec![0.1, 0.9], true);
        let mut session = open(&loader, true);

        let err = session.classify(&tensor(15, 4)).unwrap_err();
        assert_eq!(err, SignaError::ScoreCount { expected: 3, actual: 2 });
    }

    #[test]
    fn test_non_finite_scores_rejected() {
        for scores in [vec![0.1, 0.2, f32::NAN], vec![f32::INFINITY, 0.0, 0.0]] {
            let loader = FixedLoader::new(scores, true);
            let mut session = open(&loader, true);

            let err = session.classify(&tensor(15, 4)).unwrap_err();
            assert!(matches!(err, SignaError::Inference(_)));
        }
    }

    #[test]
    fn test_close_releases_model() {
        let loader = FixedLoader::new(vec![0.1, 0.2, 0.7], true);
        let session = open(&loader, true);
        session.close();
        assert_eq!(loader.closed.load(Ordering::SeqCst), 1);
    }
}
