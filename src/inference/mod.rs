//! Model invocation: one [`Predictor`] trait, an image variant and a text
//! variant, both driven through a [`TensorBackend`].

pub mod backend;
pub mod interpreter;
pub mod manifest;
pub mod seq2seq;

use ndarray::Array3;

use crate::codec::{SequenceCodec, TokenSequence};
use crate::errors::PipelineError;

pub use backend::{OrtBackend, TensorBackend};
pub use interpreter::InterpreterModel;
pub use manifest::{load_model, ModelKind, ModelManifest};
pub use seq2seq::SequenceModel;

/// Already normalized model input.
#[derive(Debug, Clone, Copy)]
pub enum ModelInput<'a> {
    Image(&'a Array3<f32>),
    Tokens(&'a TokenSequence),
}

pub trait Predictor: Send + Sync {
    fn name(&self) -> &str;

    /// The codec used to prepare text input, `None` for image models.
    fn codec(&self) -> Option<&SequenceCodec>;

    /// Runs the model and decodes its output. Deterministic for a fixed
    /// artifact and input.
    fn predict(&self, input: ModelInput<'_>) -> Result<String, PipelineError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use ndarray::ArrayViewD;

    use super::TensorBackend;
    use crate::errors::PipelineError;

    /// Backend returning a canned output, whatever the input.
    pub struct FixedBackend {
        declared: Option<Vec<i64>>,
        output: Vec<i64>,
    }

    impl FixedBackend {
        pub fn new(declared: Option<Vec<i64>>, output: Vec<i64>) -> Self {
            Self { declared, output }
        }
    }

    impl TensorBackend for FixedBackend {
        fn name(&self) -> &str {
            "fixed"
        }

        fn input_shape(&self) -> Option<Vec<i64>> {
            self.declared.clone()
        }

        fn run_image(&self, _image: ArrayViewD<'_, f32>) -> Result<Vec<i64>, PipelineError> {
            Ok(self.output.clone())
        }

        fn run_tokens(&self, _tokens: &[i64]) -> Result<Vec<i64>, PipelineError> {
            Ok(self.output.clone())
        }
    }
}
