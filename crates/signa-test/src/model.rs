//! Scripted gesture models

use std::sync::Arc;

use parking_lot::Mutex;
use signa_classify::{Delegate, GestureModel, ModelLoader};
use signa_core::{InputTensor, SignaError, SignaResult};

/// Produces scores for the n-th prediction of a model
pub type ScoreScript = Arc<dyn Fn(&InputTensor, usize) -> SignaResult<Vec<f32>> + Send + Sync>;

/// Load, predict and close counts across every model a loader created
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelLog {
    pub load_attempts: Vec<Delegate>,
    pub loaded: Vec<Delegate>,
    pub predictions: usize,
    pub closes: usize,
    pub last_input_shape: Option<(usize, usize)>,
}

pub struct ScriptedModel {
    script: ScoreScript,
    calls: usize,
    log: Arc<Mutex<ModelLog>>,
}

impl GestureModel for ScriptedModel {
    fn predict(&mut self, input: &InputTensor) -> SignaResult<Vec<f32>> {
        let call = self.calls;
        self.calls += 1;
        {
            let mut log = self.log.lock();
            log.predictions += 1;
            log.last_input_shape = Some((input.frames(), input.width()));
        }
        (self.script)(input, call)
    }

    fn close(&mut self) {
        self.log.lock().closes += 1;
    }
}

/// Loader handing out `ScriptedModel`s
#[derive(Clone)]
pub struct ScriptedLoader {
    script: ScoreScript,
    fail_accelerated: bool,
    fail_cpu: bool,
    log: Arc<Mutex<ModelLog>>,
}

impl ScriptedLoader {
    pub fn from_fn<F>(script: F) -> Self
    where
        F: Fn(&InputTensor, usize) -> SignaResult<Vec<f32>> + Send + Sync + 'static,
    {
        Self {
            script: Arc::new(script),
            fail_accelerated: false,
            fail_cpu: false,
            log: Arc::new(Mutex::new(ModelLog::default())),
        }
    }

    /// Same scores for every prediction
    pub fn constant(scores: Vec<f32>) -> Self {
        Self::from_fn(move |_, _| Ok(scores.clone()))
    }

    /// One score vector per prediction, repeating the last
    pub fn sequence(steps: Vec<Vec<f32>>) -> Self {
        Self::from_fn(move |_, call| {
            steps
                .get(call)
                .or_else(|| steps.last())
                .cloned()
                .ok_or_else(|| SignaError::Inference("empty score script".into()))
        })
    }

    /// Accelerated delegate fails to load
    pub fn without_acceleration(mut self) -> Self {
        self.fail_accelerated = true;
        self
    }

    /// Every delegate fails to load
    pub fn failing(mut self) -> Self {
        self.fail_accelerated = true;
        self.fail_cpu = true;
        self
    }

    /// Let loading succeed again
    pub fn repaired(mut self) -> Self {
        self.fail_accelerated = false;
        self.fail_cpu = false;
        self
    }

    pub fn log(&self) -> ModelLog {
        self.log.lock().clone()
    }
}

impl ModelLoader for ScriptedLoader {
    fn load(&self, delegate: Delegate) -> SignaResult<Box<dyn GestureModel>> {
        self.log.lock().load_attempts.push(delegate);

        let fails = match delegate {
            Delegate::Accelerated => self.fail_accelerated,
            Delegate::Cpu => self.fail_cpu,
        };
        if fails {
            return Err(SignaError::ModelLoad(format!("{delegate} delegate unavailable")));
        }

        self.log.lock().loaded.push(delegate);
        Ok(Box::new(ScriptedModel {
            script: Arc::clone(&self.script),
            calls: 0,
            log: Arc::clone(&self.log),
        }))
    }
}

/// Scores with `score` at `index` and the remainder spread over the others
pub fn scores_for(num_labels: usize, index: usize, score: f32) -> Vec<f32> {
    let rest = if num_labels > 1 {
        (1.0 - score) / (num_labels - 1) as f32
    } else {
        0.0
    };
    (0..num_labels)
        .map(|i| if i == index { score } else { rest })
        .collect()
}
