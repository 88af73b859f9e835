use std::collections::HashMap;
use std::path::Path;

use crate::errors::PipelineError;

/// Bidirectional token <-> index mapping, immutable once built.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    name: String,
    index_by_token: HashMap<String, i64>,
    token_by_index: HashMap<i64, String>,
}

impl Vocabulary {
    /// Builds a vocabulary from `(token, index)` pairs. Tokens and indices must
    /// both be unique and indices non-negative.
    pub fn from_pairs<I, S>(name: &str, pairs: I) -> Result<Self, PipelineError>
    where
        I: IntoIterator<Item = (S, i64)>,
        S: Into<String>,
    {
        let mut index_by_token = HashMap::new();
        let mut token_by_index = HashMap::new();

        for (token, index) in pairs {
            let token = token.into();
            if index < 0 {
                return Err(PipelineError::model_unavailable(
                    name,
                    format!("token {token:?} has negative index {index}"),
                ));
            }
            if let Some(existing) = token_by_index.insert(index, token.clone()) {
                return Err(PipelineError::model_unavailable(
                    name,
                    format!("index {index} assigned to both {existing:?} and {token:?}"),
                ));
            }
            if index_by_token.insert(token.clone(), index).is_some() {
                return Err(PipelineError::model_unavailable(
                    name,
                    format!("token {token:?} appears twice"),
                ));
            }
        }

        Ok(Self {
            name: name.to_string(),
            index_by_token,
            token_by_index,
        })
    }

    /// Parses a persisted word index of the form `{"<start>": 1, "C": 2, ...}`.
    pub fn from_json_str(name: &str, json: &str) -> Result<Self, PipelineError> {
        let word_index: HashMap<String, i64> = serde_json::from_str(json)
            .map_err(|e| PipelineError::model_unavailable(name, e))?;
        Self::from_pairs(name, word_index)
    }

    pub fn from_json_file(name: &str, path: &Path) -> Result<Self, PipelineError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::model_unavailable(
                name,
                format!("could not read vocabulary {}: {e}", path.display()),
            )
        })?;
        let vocabulary = Self::from_json_str(name, &json)?;
        log::info!(
            "loaded {} vocabulary with {} tokens from {}",
            name,
            vocabulary.len(),
            path.display()
        );
        Ok(vocabulary)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index_of(&self, token: &str) -> Option<i64> {
        self.index_by_token.get(token).copied()
    }

    pub fn token_of(&self, index: i64) -> Option<&str> {
        self.token_by_index.get(&index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.index_by_token.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index_by_token.is_empty()
    }
}
