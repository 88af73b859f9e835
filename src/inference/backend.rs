use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use ndarray::ArrayViewD;
use ort::session::{Session, SessionOutputs};
use ort::value::{TensorRef, ValueType};

use crate::errors::PipelineError;

/// Runs a loaded model graph on one input tensor and returns the output
/// token indices, flattened.
pub trait TensorBackend: Send + Sync {
    fn name(&self) -> &str;

    /// Declared shape of the model's primary input, `-1` for dynamic axes.
    fn input_shape(&self) -> Option<Vec<i64>>;

    fn run_image(&self, image: ArrayViewD<'_, f32>) -> Result<Vec<i64>, PipelineError>;

    fn run_tokens(&self, tokens: &[i64]) -> Result<Vec<i64>, PipelineError>;
}

/// ONNX Runtime backend holding a pool of sessions over the same graph.
///
/// Each session is only ever driven by one caller at a time; calls are
/// spread over the pool round-robin.
pub struct OrtBackend {
    name: String,
    model_path: PathBuf,
    sessions: Vec<Mutex<Session>>,
    next_idx: AtomicUsize,
    input_name: String,
    output_name: String,
    input_shape: Option<Vec<i64>>,
}

impl std::fmt::Debug for OrtBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrtBackend")
            .field("name", &self.name)
            .field("model_path", &self.model_path)
            .field("sessions", &self.sessions.len())
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .field("input_shape", &self.input_shape)
            .finish()
    }
}

impl OrtBackend {
    pub fn from_file(
        name: &str,
        model_path: impl AsRef<Path>,
        pool_size: usize,
        input_name: Option<&str>,
        output_name: Option<&str>,
    ) -> Result<Self, PipelineError> {
        let model_path = model_path.as_ref();
        if !model_path.exists() {
            return Err(PipelineError::model_unavailable(
                name,
                format!("model file {} does not exist", model_path.display()),
            ));
        }

        let mut sessions = Vec::with_capacity(pool_size.max(1));
        for _ in 0..pool_size.max(1) {
            let session = Session::builder()
                .and_then(|builder| builder.commit_from_file(model_path))
                .map_err(|e| PipelineError::model_unavailable(name, e))?;
            sessions.push(Mutex::new(session));
        }

        let (input_name, output_name, input_shape) = {
            let first = sessions[0]
                .lock()
                .map_err(|_| PipelineError::model_unavailable(name, "session lock poisoned"))?;
            let input_name = match input_name {
                Some(input_name) => input_name.to_string(),
                None => first
                    .inputs
                    .first()
                    .map(|input| input.name.clone())
                    .ok_or_else(|| PipelineError::model_unavailable(name, "model has no inputs"))?,
            };
            let output_name = match output_name {
                Some(output_name) => output_name.to_string(),
                None => first
                    .outputs
                    .first()
                    .map(|output| output.name.clone())
                    .ok_or_else(|| PipelineError::model_unavailable(name, "model has no outputs"))?,
            };
            let input_shape = first
                .inputs
                .iter()
                .find(|input| input.name == input_name)
                .and_then(|input| match &input.input_type {
                    ValueType::Tensor { shape, .. } => Some(shape.iter().copied().collect()),
                    _ => None,
                });
            (input_name, output_name, input_shape)
        };

        log::info!(
            "loaded model {} from {} ({} sessions, input {:?} {:?}, output {:?})",
            name,
            model_path.display(),
            sessions.len(),
            input_name,
            input_shape,
            output_name
        );

        Ok(Self {
            name: name.to_string(),
            model_path: model_path.to_path_buf(),
            sessions,
            next_idx: AtomicUsize::new(0),
            input_name,
            output_name,
            input_shape,
        })
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    fn inference_error(&self, source: ort::Error) -> PipelineError {
        PipelineError::Inference {
            model: self.name.clone(),
            source,
        }
    }

    fn session(&self) -> Result<MutexGuard<'_, Session>, PipelineError> {
        let idx = self.next_idx.fetch_add(1, Ordering::Relaxed) % self.sessions.len();
        self.sessions[idx].lock().map_err(|_| {
            PipelineError::ExternalService(format!(
                "session {}/{} of model {} is poisoned",
                idx,
                self.sessions.len(),
                self.name
            ))
        })
    }

    fn extract_tokens(&self, outputs: &SessionOutputs) -> Result<Vec<i64>, PipelineError> {
        let output = outputs.get(self.output_name.as_str()).ok_or_else(|| {
            PipelineError::ExternalService(format!(
                "model {} produced no output named {:?}",
                self.name, self.output_name
            ))
        })?;

        if let Ok((_, data)) = output.try_extract_tensor::<i64>() {
            return Ok(data.to_vec());
        }
        if let Ok((_, data)) = output.try_extract_tensor::<i32>() {
            return Ok(data.iter().map(|v| *v as i64).collect());
        }
        let (_, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| self.inference_error(e))?;
        Ok(data.iter().map(|v| v.round() as i64).collect())
    }
}

impl TensorBackend for OrtBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn input_shape(&self) -> Option<Vec<i64>> {
        self.input_shape.clone()
    }

    fn run_image(&self, image: ArrayViewD<'_, f32>) -> Result<Vec<i64>, PipelineError> {
        let tensor = TensorRef::from_array_view(image).map_err(|e| self.inference_error(e))?;
        let mut session = self.session()?;
        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => tensor])
            .map_err(|e| self.inference_error(e))?;
        self.extract_tokens(&outputs)
    }

    fn run_tokens(&self, tokens: &[i64]) -> Result<Vec<i64>, PipelineError> {
        let tensor = TensorRef::from_array_view(([1usize, tokens.len()], tokens))
            .map_err(|e| self.inference_error(e))?;
        let mut session = self.session()?;
        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => tensor])
            .map_err(|e| self.inference_error(e))?;
        self.extract_tokens(&outputs)
    }
}

/// Accepts a declared shape when every fixed axis matches `actual`.
pub(crate) fn shape_matches(declared: &[i64], actual: &[i64]) -> bool {
    declared.len() == actual.len()
        && declared
            .iter()
            .zip(actual)
            .all(|(d, a)| *d < 0 || d == a)
}
