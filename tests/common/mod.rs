#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use ndarray::ArrayViewD;

use stout::chemistry::{RdkitToolkit, StructureToolkit};
use stout::codec::{
    decode_indices, SequenceCodec, SplitPolicy, Vocabulary, DEFAULT_PAD_INDEX, END_TOKEN,
    START_TOKEN,
};
use stout::errors::PipelineError;
use stout::inference::{InterpreterModel, SequenceModel, TensorBackend};
use stout::opsin::NameParser;
use stout::translation::Translator;

pub const FORWARD_LENGTH: usize = 64;
pub const REVERSE_LENGTH: usize = 128;

/// Forward model answers, keyed by any SMILES of the structure.
pub const NAMES: &[(&str, &str)] = &[
    ("Oc1ccccc1", "phenol"),
    ("CCO", "ethanol"),
    ("CC(=O)O", "acetic acid"),
    ("CCN", "ethanamine"),
    ("CC(C)O", "propan-1-ol"),
    ("C1CCCCC1", "cyclohexyne"),
];

/// Structures the fake name parser knows.
pub const STRUCTURES: &[(&str, &str)] = &[
    ("ethanol", "OCC"),
    ("acetic acid", "CC(O)=O"),
    ("ethanamine", "NCC"),
    ("propan-1-ol", "CCCO"),
];

/// What the fake vision model reads from every image.
pub const RECOGNIZED_SMILES: &str = "CCO";

fn vocabulary(name: &str, tokens: &[String]) -> Arc<Vocabulary> {
    let pairs = tokens
        .iter()
        .enumerate()
        .map(|(i, token)| (token.clone(), i as i64 + 1));
    Arc::new(Vocabulary::from_pairs(name, pairs).expect("test vocabulary"))
}

pub fn smiles_vocabulary() -> Arc<Vocabulary> {
    let mut tokens = vec![START_TOKEN.to_string(), END_TOKEN.to_string()];
    tokens.extend(
        ["C", "O", "N", "Cl", "(", ")", "=", "1", "2"]
            .iter()
            .map(|t| t.to_string()),
    );
    vocabulary("smiles", &tokens)
}

pub fn name_vocabulary() -> Arc<Vocabulary> {
    let mut tokens = vec![START_TOKEN.to_string(), END_TOKEN.to_string()];
    tokens.extend(('a'..='z').map(String::from));
    tokens.extend(('0'..='9').map(String::from));
    tokens.extend(["§", "-", ",", "(", ")", "[", "]"].iter().map(|t| t.to_string()));
    vocabulary("iupac", &tokens)
}

/// Sequence backend that reads its input back into text and answers from a
/// lookup table. Unknown inputs produce an empty output.
pub struct TableBackend {
    source: Arc<Vocabulary>,
    target: Arc<Vocabulary>,
    output_policy: SplitPolicy,
    table: HashMap<String, String>,
    declared: Option<Vec<i64>>,
}

impl TableBackend {
    pub fn new(
        source: Arc<Vocabulary>,
        target: Arc<Vocabulary>,
        output_policy: SplitPolicy,
        table: &[(&str, &str)],
    ) -> Self {
        Self {
            source,
            target,
            output_policy,
            table: table
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            declared: None,
        }
    }
}

impl TensorBackend for TableBackend {
    fn name(&self) -> &str {
        "table"
    }

    fn input_shape(&self) -> Option<Vec<i64>> {
        self.declared.clone()
    }

    fn run_image(&self, _image: ArrayViewD<'_, f32>) -> Result<Vec<i64>, PipelineError> {
        Err(PipelineError::ExternalService("table backend takes tokens".to_string()))
    }

    fn run_tokens(&self, tokens: &[i64]) -> Result<Vec<i64>, PipelineError> {
        let input = decode_indices(&self.source, tokens);
        let Some(output) = self.table.get(&input) else {
            return Ok(vec![]);
        };

        let mut units = vec![START_TOKEN.to_string()];
        units.extend(self.output_policy.split(output));
        units.push(END_TOKEN.to_string());

        Ok(units
            .iter()
            .filter_map(|unit| self.target.index_of(unit))
            .collect())
    }
}

/// Image backend that always "sees" the same structure.
pub struct ConstantBackend {
    output: Vec<i64>,
}

impl TensorBackend for ConstantBackend {
    fn name(&self) -> &str {
        "constant"
    }

    fn input_shape(&self) -> Option<Vec<i64>> {
        Some(vec![-1, 512, 512, 3])
    }

    fn run_image(&self, image: ArrayViewD<'_, f32>) -> Result<Vec<i64>, PipelineError> {
        assert_eq!(image.shape(), &[1, 512, 512, 3]);
        Ok(self.output.clone())
    }

    fn run_tokens(&self, _tokens: &[i64]) -> Result<Vec<i64>, PipelineError> {
        Err(PipelineError::ExternalService("constant backend takes images".to_string()))
    }
}

pub struct LookupParser(HashMap<String, String>);

impl LookupParser {
    pub fn new(structures: &[(&str, &str)]) -> Self {
        Self(
            structures
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

impl NameParser for LookupParser {
    fn parse(&self, name: &str) -> Result<String, PipelineError> {
        self.0
            .get(name)
            .cloned()
            .ok_or_else(|| PipelineError::Parse {
                name: name.to_string(),
                message: "could not be interpreted".to_string(),
            })
    }
}

/// A translator wired to table-driven fake models, the fake name parser and
/// the real RDKit toolkit.
pub fn build_translator() -> Arc<Translator> {
    let smiles = smiles_vocabulary();
    let names = name_vocabulary();

    // the forward model sees the toolkit's canonical spelling
    let canonical_names = NAMES
        .iter()
        .map(|(smiles, name)| {
            let canonical = RdkitToolkit
                .canonical_smiles(smiles)
                .expect("canonical test SMILES");
            (canonical, name.to_string())
        })
        .collect::<Vec<_>>();
    let canonical_names = canonical_names
        .iter()
        .map(|(smiles, name)| (smiles.as_str(), name.as_str()))
        .collect::<Vec<_>>();

    let forward = SequenceModel::new(
        Box::new(TableBackend::new(
            smiles.clone(),
            names.clone(),
            SplitPolicy::Name,
            &canonical_names,
        )),
        SequenceCodec::new(
            smiles.clone(),
            names.clone(),
            FORWARD_LENGTH,
            DEFAULT_PAD_INDEX,
            SplitPolicy::Smiles,
        ),
    );

    let reversed = STRUCTURES
        .iter()
        .map(|(name, smiles)| (*name, *smiles))
        .collect::<Vec<_>>();
    let reverse = SequenceModel::new(
        Box::new(TableBackend::new(
            names.clone(),
            smiles.clone(),
            SplitPolicy::Smiles,
            &reversed,
        )),
        SequenceCodec::new(
            names,
            smiles.clone(),
            REVERSE_LENGTH,
            DEFAULT_PAD_INDEX,
            SplitPolicy::Name,
        ),
    );

    let recognized = SplitPolicy::Smiles
        .split(RECOGNIZED_SMILES)
        .iter()
        .filter_map(|unit| smiles.index_of(unit))
        .collect();
    let vision = InterpreterModel::new(Box::new(ConstantBackend { output: recognized }), smiles);

    Arc::new(Translator::new(
        Arc::new(forward),
        Arc::new(reverse),
        Arc::new(vision),
        Arc::new(RdkitToolkit),
        Arc::new(LookupParser::new(STRUCTURES)),
    ))
}

/// A small PNG with a black bar on white, encoded in memory.
pub fn sample_png(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbImage::from_fn(width, height, |x, y| {
        if y > height / 3 && y < 2 * height / 3 && x > width / 4 {
            image::Rgb([0, 0, 0])
        } else {
            image::Rgb([255, 255, 255])
        }
    });

    let mut bytes = std::io::Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, image::ImageFormat::Png)
        .expect("encode png");
    bytes.into_inner()
}
