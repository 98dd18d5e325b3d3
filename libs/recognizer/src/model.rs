//! Model lifecycle around an external inference engine
//!
//! The engine itself is opaque. What matters here is ordering: a forward pass
//! is only ever issued against a session that finished loading, and that is
//! checked explicitly through `ModelState` rather than left to timing.

use std::path::Path;

use crate::prediction::ScoreVector;
use crate::preprocess::InputTensor;
use crate::RecognizerError;

/// Where the model is in its lifecycle
#[derive(Debug, Clone)]
pub enum ModelState<S> {
    Uninitialized,
    Loading,
    Ready(S),
    /// Load failed; stays unusable until the next load attempt
    Failed(String),
}

impl<S> Default for ModelState<S> {
    fn default() -> Self {
        ModelState::Uninitialized
    }
}

impl<S> ModelState<S> {
    /// Mark a load as started. Only one load may be in flight.
    pub fn begin_load(&mut self) -> Result<(), RecognizerError> {
        if matches!(self, ModelState::Loading) {
            return Err(RecognizerError::ModelLoading);
        }
        *self = ModelState::Loading;
        Ok(())
    }

    /// Record the outcome of a load started with `begin_load`
    pub fn finish_load<E: std::fmt::Display>(
        &mut self,
        result: Result<S, E>,
    ) -> Result<(), RecognizerError> {
        match result {
            Ok(session) => {
                *self = ModelState::Ready(session);
                Ok(())
            }
            Err(e) => {
                let message = e.to_string();
                *self = ModelState::Failed(message.clone());
                Err(RecognizerError::ModelLoad(message))
            }
        }
    }

    /// The loaded session, or the usage error explaining why there is none
    pub fn session(&self) -> Result<&S, RecognizerError> {
        match self {
            ModelState::Ready(session) => Ok(session),
            ModelState::Uninitialized => Err(RecognizerError::ModelNotLoaded),
            ModelState::Loading => Err(RecognizerError::ModelLoading),
            ModelState::Failed(e) => Err(RecognizerError::ModelUnavailable(e.clone())),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ModelState::Ready(_))
    }

    pub fn status(&self) -> &'static str {
        match self {
            ModelState::Uninitialized => "not loaded",
            ModelState::Loading => "loading",
            ModelState::Ready(_) => "ready",
            ModelState::Failed(_) => "failed",
        }
    }
}

/// A blocking inference engine, e.g. a native ONNX runtime
pub trait InferenceEngine {
    type Session;
    type Error: std::fmt::Display;

    fn load(&self, model_path: &Path) -> Result<Self::Session, Self::Error>;

    /// One forward pass; returns the flattened first output
    fn run(&self, session: &Self::Session, input: &InputTensor) -> Result<Vec<f32>, Self::Error>;
}

/// Load-once, run-many wrapper that enforces the model lifecycle
pub struct InferenceAdapter<E: InferenceEngine> {
    engine: E,
    state: ModelState<E::Session>,
}

impl<E: InferenceEngine> InferenceAdapter<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            state: ModelState::Uninitialized,
        }
    }

    pub fn load<P: AsRef<Path>>(&mut self, model_path: P) -> Result<(), RecognizerError> {
        self.state.begin_load()?;
        let result = self.engine.load(model_path.as_ref());
        self.state.finish_load(result)
    }

    /// Run failures are reported per call and leave the session loaded
    pub fn run(&self, input: &InputTensor) -> Result<ScoreVector, RecognizerError> {
        let session = self.state.session()?;
        self.engine
            .run(session, input)
            .map(ScoreVector::new)
            .map_err(|e| RecognizerError::Inference(e.to_string()))
    }

    pub fn state(&self) -> &ModelState<E::Session> {
        &self.state
    }
}
