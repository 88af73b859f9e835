use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::codec::{SequenceCodec, SplitPolicy, Vocabulary, DEFAULT_PAD_INDEX};
use crate::errors::PipelineError;
use crate::inference::backend::OrtBackend;
use crate::inference::interpreter::InterpreterModel;
use crate::inference::seq2seq::SequenceModel;
use crate::inference::Predictor;

pub const FORWARD_MAX_LENGTH: usize = 602;
pub const REVERSE_MAX_LENGTH: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Interpreter,
    Seq2seq,
}

/// Describes one model artifact and its vocabularies. Relative paths are
/// resolved against the asset root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelManifest {
    pub name: String,
    pub kind: ModelKind,
    pub model_file: PathBuf,
    #[serde(default)]
    pub input_name: Option<String>,
    #[serde(default)]
    pub output_name: Option<String>,
    #[serde(default)]
    pub max_length: Option<usize>,
    #[serde(default)]
    pub source_vocabulary: Option<PathBuf>,
    pub target_vocabulary: PathBuf,
    #[serde(default)]
    pub split: Option<SplitPolicy>,
    #[serde(default = "default_pad_index")]
    pub pad_index: i64,
    #[serde(default = "default_session_pool_size")]
    pub session_pool_size: usize,
}

fn default_pad_index() -> i64 {
    DEFAULT_PAD_INDEX
}

fn default_session_pool_size() -> usize {
    1
}

impl ModelManifest {
    /// SMILES to IUPAC name.
    pub fn forward() -> Self {
        Self {
            name: "smiles_to_iupac".to_string(),
            kind: ModelKind::Seq2seq,
            model_file: PathBuf::from("models/translator_forward/model.onnx"),
            input_name: None,
            output_name: None,
            max_length: Some(FORWARD_MAX_LENGTH),
            source_vocabulary: Some(PathBuf::from("models/assets/tokenizer_input.json")),
            target_vocabulary: PathBuf::from("models/assets/tokenizer_target.json"),
            split: Some(SplitPolicy::Smiles),
            pad_index: DEFAULT_PAD_INDEX,
            session_pool_size: 1,
        }
    }

    /// IUPAC name to SMILES. Uses the forward vocabularies the other way round.
    pub fn reverse() -> Self {
        Self {
            name: "iupac_to_smiles".to_string(),
            kind: ModelKind::Seq2seq,
            model_file: PathBuf::from("models/translator_reverse/model.onnx"),
            input_name: None,
            output_name: None,
            max_length: Some(REVERSE_MAX_LENGTH),
            source_vocabulary: Some(PathBuf::from("models/assets/tokenizer_target.json")),
            target_vocabulary: PathBuf::from("models/assets/tokenizer_input.json"),
            split: Some(SplitPolicy::Name),
            pad_index: DEFAULT_PAD_INDEX,
            session_pool_size: 1,
        }
    }

    /// Structure image to SMILES.
    pub fn vision() -> Self {
        Self {
            name: "image_to_smiles".to_string(),
            kind: ModelKind::Interpreter,
            model_file: PathBuf::from("decimer/model.onnx"),
            input_name: None,
            output_name: None,
            max_length: None,
            source_vocabulary: None,
            target_vocabulary: PathBuf::from("decimer/tokenizer.json"),
            split: None,
            pad_index: DEFAULT_PAD_INDEX,
            session_pool_size: 1,
        }
    }
}

fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Loads the artifact and vocabularies a manifest points at and wraps them
/// in the predictor matching its kind.
pub fn load_model(
    manifest: &ModelManifest,
    root: &Path,
) -> Result<Arc<dyn Predictor>, PipelineError> {
    let name = manifest.name.as_str();
    let target = Arc::new(Vocabulary::from_json_file(
        &format!("{name} target"),
        &resolve(root, &manifest.target_vocabulary),
    )?);

    let backend = Box::new(OrtBackend::from_file(
        name,
        resolve(root, &manifest.model_file),
        manifest.session_pool_size,
        manifest.input_name.as_deref(),
        manifest.output_name.as_deref(),
    )?);

    match manifest.kind {
        ModelKind::Interpreter => Ok(Arc::new(InterpreterModel::new(backend, target))),
        ModelKind::Seq2seq => {
            let source_path = manifest.source_vocabulary.as_ref().ok_or_else(|| {
                PipelineError::model_unavailable(name, "seq2seq model needs a source vocabulary")
            })?;
            let max_length = manifest.max_length.ok_or_else(|| {
                PipelineError::model_unavailable(name, "seq2seq model needs a max_length")
            })?;
            let source = Arc::new(Vocabulary::from_json_file(
                &format!("{name} source"),
                &resolve(root, source_path),
            )?);

            let codec = SequenceCodec::new(
                source,
                target,
                max_length,
                manifest.pad_index,
                manifest.split.unwrap_or(SplitPolicy::Smiles),
            );
            Ok(Arc::new(SequenceModel::new(backend, codec)))
        }
    }
}
