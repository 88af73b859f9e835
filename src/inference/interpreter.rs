use std::sync::Arc;

use ndarray::Axis;

use crate::codec::{decode_indices, SequenceCodec, Vocabulary};
use crate::errors::PipelineError;
use crate::imaging::TARGET_SIZE;
use crate::inference::backend::{shape_matches, TensorBackend};
use crate::inference::{ModelInput, Predictor};

/// Single-invocation image model: a normalized image in, one token
/// sequence out.
pub struct InterpreterModel {
    backend: Box<dyn TensorBackend>,
    vocabulary: Arc<Vocabulary>,
}

impl InterpreterModel {
    pub fn new(backend: Box<dyn TensorBackend>, vocabulary: Arc<Vocabulary>) -> Self {
        Self {
            backend,
            vocabulary,
        }
    }
}

impl Predictor for InterpreterModel {
    fn name(&self) -> &str {
        self.backend.name()
    }

    fn codec(&self) -> Option<&SequenceCodec> {
        None
    }

    fn predict(&self, input: ModelInput<'_>) -> Result<String, PipelineError> {
        let side = TARGET_SIZE as i64;
        let expected = [side, side, 3];

        let image = match input {
            ModelInput::Image(image) => image,
            ModelInput::Tokens(tokens) => {
                return Err(PipelineError::shape(
                    format!("{} image input", self.name()),
                    &expected,
                    &[1, tokens.len() as i64],
                ))
            }
        };

        let actual = image.shape().iter().map(|d| *d as i64).collect::<Vec<_>>();
        if actual != expected {
            return Err(PipelineError::shape(
                format!("{} image input", self.name()),
                &expected,
                &actual,
            ));
        }

        let indices = match self.backend.input_shape() {
            Some(declared) if declared.len() == 4 => {
                let batched = [1, side, side, 3];
                if !shape_matches(&declared, &batched) {
                    return Err(PipelineError::shape(
                        format!("{} declared input", self.name()),
                        &declared,
                        &batched,
                    ));
                }
                self.backend
                    .run_image(image.view().insert_axis(Axis(0)).into_dyn())?
            }
            Some(declared) if !shape_matches(&declared, &expected) => {
                return Err(PipelineError::shape(
                    format!("{} declared input", self.name()),
                    &declared,
                    &expected,
                ))
            }
            _ => self.backend.run_image(image.view().into_dyn())?,
        };

        Ok(decode_indices(&self.vocabulary, &indices))
    }
}
