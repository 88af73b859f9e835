use thiserror::Error;

/// Failures raised anywhere in the translation pipeline.
///
/// `Parse` is recoverable during round-trip verification and never reaches
/// a batch caller. `ModelUnavailable` is only produced while loading and
/// aborts startup.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("could not decode input: {0}")]
    Decode(String),
    #[error("token {token:?} is not part of the {vocabulary} vocabulary")]
    Vocabulary { token: String, vocabulary: String },
    #[error("tensor shape mismatch for {context}: expected {expected:?}, got {actual:?}")]
    Shape {
        context: String,
        expected: Vec<i64>,
        actual: Vec<i64>,
    },
    #[error("model {name} is unavailable: {reason}")]
    ModelUnavailable { name: String, reason: String },
    #[error("could not parse {name:?}: {message}")]
    Parse { name: String, message: String },
    #[error("external service error: {0}")]
    ExternalService(String),
    #[error("inference failed for model {model}: {source}")]
    Inference {
        model: String,
        #[source]
        source: ort::Error,
    },
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn shape(context: impl Into<String>, expected: &[i64], actual: &[i64]) -> Self {
        PipelineError::Shape {
            context: context.into(),
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }

    pub fn model_unavailable(name: impl Into<String>, reason: impl ToString) -> Self {
        PipelineError::ModelUnavailable {
            name: name.into(),
            reason: reason.to_string(),
        }
    }
}
