use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::codec::vocabulary::Vocabulary;
use crate::errors::PipelineError;

pub const START_TOKEN: &str = "<start>";
pub const END_TOKEN: &str = "<end>";
/// Stands in for a space inside IUPAC names so every unit is one character.
pub const SPACE_PLACEHOLDER: char = '§';
pub const DEFAULT_PAD_INDEX: i64 = 0;

lazy_static::lazy_static! {
    static ref LOWERCASE_CONTINUATION_RE: Regex = Regex::new(r"\s+([a-z])").unwrap();
}

/// How an input string is cut into vocabulary units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitPolicy {
    /// One unit per character, except that a lowercase letter is merged into
    /// the unit before it (`Cl`, `Br`).
    Smiles,
    /// One unit per character, spaces replaced by [`SPACE_PLACEHOLDER`].
    Name,
}

impl SplitPolicy {
    pub fn split(&self, text: &str) -> Vec<String> {
        match self {
            SplitPolicy::Smiles => {
                let spaced = text
                    .chars()
                    .map(String::from)
                    .collect::<Vec<_>>()
                    .join(" ");
                LOWERCASE_CONTINUATION_RE
                    .replace_all(&spaced, "$1")
                    .split(' ')
                    .filter(|unit| !unit.is_empty())
                    .map(str::to_string)
                    .collect()
            }
            SplitPolicy::Name => text
                .chars()
                .map(|c| {
                    if c == ' ' {
                        SPACE_PLACEHOLDER.to_string()
                    } else {
                        c.to_string()
                    }
                })
                .collect(),
        }
    }
}

/// Fixed-length, sentinel-framed sequence of vocabulary indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSequence(Vec<i64>);

impl TokenSequence {
    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<i64> {
        self.0
    }
}

impl From<Vec<i64>> for TokenSequence {
    fn from(indices: Vec<i64>) -> Self {
        TokenSequence(indices)
    }
}

/// Encodes notation strings for one model direction and decodes its output.
#[derive(Debug, Clone)]
pub struct SequenceCodec {
    source: Arc<Vocabulary>,
    target: Arc<Vocabulary>,
    max_length: usize,
    pad_index: i64,
    policy: SplitPolicy,
}

impl SequenceCodec {
    pub fn new(
        source: Arc<Vocabulary>,
        target: Arc<Vocabulary>,
        max_length: usize,
        pad_index: i64,
        policy: SplitPolicy,
    ) -> Self {
        Self {
            source,
            target,
            max_length,
            pad_index,
            policy,
        }
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn policy(&self) -> SplitPolicy {
        self.policy
    }

    pub fn target(&self) -> &Vocabulary {
        &self.target
    }

    /// Splits, frames and indexes `text`, then right-pads it to `max_length`.
    ///
    /// The caller is responsible for canonicalizing SMILES input first.
    pub fn encode(&self, text: &str) -> Result<TokenSequence, PipelineError> {
        let mut units = Vec::with_capacity(self.max_length);
        units.push(START_TOKEN.to_string());
        units.extend(self.policy.split(text));
        units.push(END_TOKEN.to_string());

        if units.len() > self.max_length {
            return Err(PipelineError::shape(
                format!("{} input sequence", self.source.name()),
                &[self.max_length as i64],
                &[units.len() as i64],
            ));
        }

        let mut indices = units
            .iter()
            .map(|unit| {
                self.source
                    .index_of(unit)
                    .ok_or_else(|| PipelineError::Vocabulary {
                        token: unit.clone(),
                        vocabulary: self.source.name().to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        indices.resize(self.max_length, self.pad_index);

        Ok(TokenSequence(indices))
    }

    pub fn decode(&self, indices: &[i64]) -> String {
        decode_indices(&self.target, indices)
    }
}

/// Maps indices back to text. Indices with no entry contribute nothing.
pub fn decode_indices(vocabulary: &Vocabulary, indices: &[i64]) -> String {
    indices
        .iter()
        .map(|index| vocabulary.token_of(*index).unwrap_or(""))
        .collect::<String>()
        .replace(START_TOKEN, "")
        .replace(END_TOKEN, "")
        .replace(SPACE_PLACEHOLDER, " ")
}
