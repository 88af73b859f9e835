use std::sync::Arc;

use poem_openapi::Enum;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::chemistry::{depict, RdkitToolkit, StructureToolkit, Visualization};
use crate::config::ServiceConfig;
use crate::errors::PipelineError;
use crate::imaging::normalize_image;
use crate::inference::{load_model, ModelInput, Predictor};
use crate::opsin::{NameParser, OpsinBridge};
use crate::verification::{verify, PredictionResult};

/// Which engine turns a name into a structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Enum, Serialize, Deserialize)]
#[oai(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Converter {
    #[default]
    Opsin,
    Stout,
}

impl std::str::FromStr for Converter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "opsin" => Ok(Converter::Opsin),
            "stout" => Ok(Converter::Stout),
            other => Err(format!("unknown converter {other:?}, expected opsin or stout")),
        }
    }
}

/// Process-wide translation state: the three models plus the toolkit and
/// name parser they are verified with. Built once, shared read-only.
pub struct Translator {
    forward: Arc<dyn Predictor>,
    reverse: Arc<dyn Predictor>,
    vision: Arc<dyn Predictor>,
    toolkit: Arc<dyn StructureToolkit>,
    name_parser: Arc<dyn NameParser>,
}

impl Translator {
    pub fn new(
        forward: Arc<dyn Predictor>,
        reverse: Arc<dyn Predictor>,
        vision: Arc<dyn Predictor>,
        toolkit: Arc<dyn StructureToolkit>,
        name_parser: Arc<dyn NameParser>,
    ) -> Self {
        Self {
            forward,
            reverse,
            vision,
            toolkit,
            name_parser,
        }
    }

    /// Loads every model named in `config`. Any missing artifact or
    /// vocabulary is fatal.
    pub fn load(config: &ServiceConfig) -> Result<Self, PipelineError> {
        let root = config.asset_root.as_path();
        let forward = load_model(&config.forward, root)?;
        let reverse = load_model(&config.reverse, root)?;
        let vision = load_model(&config.vision, root)?;

        Ok(Self::new(
            forward,
            reverse,
            vision,
            Arc::new(RdkitToolkit),
            Arc::new(OpsinBridge::new(config.opsin_config())),
        ))
    }

    pub fn toolkit(&self) -> &dyn StructureToolkit {
        self.toolkit.as_ref()
    }

    pub fn smiles_to_iupac(&self, smiles: &str) -> Result<String, PipelineError> {
        let smiles = smiles.trim();
        self.toolkit.identity_key(smiles)?;
        let canonical = self.toolkit.canonical_smiles(smiles)?;
        translate_text(self.forward.as_ref(), &canonical)
    }

    pub fn iupac_to_smiles(&self, name: &str, converter: Converter) -> Result<String, PipelineError> {
        let name = name.trim();
        match converter {
            Converter::Opsin => self.name_parser.parse(name),
            Converter::Stout => translate_text(self.reverse.as_ref(), name),
        }
    }

    pub fn image_to_smiles(&self, image: &[u8]) -> Result<String, PipelineError> {
        let tensor = normalize_image(image)?;
        self.vision.predict(ModelInput::Image(&tensor))
    }

    /// Translates every SMILES independently. Output order matches input
    /// order and a failing row never affects the others.
    pub fn translate_batch(&self, smiles: &[String], retranslate: bool) -> Vec<PredictionResult> {
        smiles
            .par_iter()
            .map(|smiles| match self.smiles_to_iupac(smiles) {
                Ok(name) => {
                    let result = PredictionResult::predicted(smiles, name);
                    if retranslate {
                        let (round_trip, status) = verify(
                            smiles,
                            &result.predicted,
                            self.name_parser.as_ref(),
                            self.toolkit.as_ref(),
                        );
                        result.with_verification(round_trip, status)
                    } else {
                        result
                    }
                }
                Err(e) => {
                    log::warn!("could not translate {smiles:?}: {e}");
                    PredictionResult::failed(smiles, e)
                }
            })
            .collect()
    }

    pub fn depict(&self, smiles: &str, visualization: Visualization) -> String {
        depict(self.toolkit.as_ref(), smiles, visualization)
    }
}

fn translate_text(model: &dyn Predictor, text: &str) -> Result<String, PipelineError> {
    let codec = model.codec().ok_or_else(|| {
        PipelineError::model_unavailable(model.name(), "model does not accept text input")
    })?;
    let tokens = codec.encode(text)?;
    model.predict(ModelInput::Tokens(&tokens))
}

/// Splits a newline separated request body into SMILES, dropping blank lines.
pub fn split_batch(body: &str) -> Vec<String> {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
