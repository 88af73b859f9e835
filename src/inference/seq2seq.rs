use crate::codec::SequenceCodec;
use crate::errors::PipelineError;
use crate::inference::backend::{shape_matches, TensorBackend};
use crate::inference::{ModelInput, Predictor};

/// Sequence-to-sequence text model. The whole padded input goes in and the
/// full output sequence comes back from one call.
pub struct SequenceModel {
    backend: Box<dyn TensorBackend>,
    codec: SequenceCodec,
}

impl SequenceModel {
    pub fn new(backend: Box<dyn TensorBackend>, codec: SequenceCodec) -> Self {
        Self { backend, codec }
    }
}

impl Predictor for SequenceModel {
    fn name(&self) -> &str {
        self.backend.name()
    }

    fn codec(&self) -> Option<&SequenceCodec> {
        Some(&self.codec)
    }

    fn predict(&self, input: ModelInput<'_>) -> Result<String, PipelineError> {
        let expected = [1, self.codec.max_length() as i64];

        let tokens = match input {
            ModelInput::Tokens(tokens) => tokens,
            ModelInput::Image(image) => {
                let actual = image.shape().iter().map(|d| *d as i64).collect::<Vec<_>>();
                return Err(PipelineError::shape(
                    format!("{} token input", self.name()),
                    &expected,
                    &actual,
                ));
            }
        };

        let actual = [1, tokens.len() as i64];
        if actual != expected {
            return Err(PipelineError::shape(
                format!("{} token input", self.name()),
                &expected,
                &actual,
            ));
        }

        if let Some(declared) = self.backend.input_shape() {
            if !shape_matches(&declared, &actual) {
                return Err(PipelineError::shape(
                    format!("{} declared input", self.name()),
                    &declared,
                    &actual,
                ));
            }
        }

        let indices = self.backend.run_tokens(tokens.as_slice())?;
        log::debug!("{} produced {} output tokens", self.name(), indices.len());

        Ok(self.codec.decode(&indices))
    }
}
