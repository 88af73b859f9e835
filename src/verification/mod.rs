//! Round-trip verification of predicted names.

pub mod table;

use poem_openapi::{Enum, Object};
use serde::{Deserialize, Serialize};

use crate::chemistry::StructureToolkit;
use crate::opsin::NameParser;

pub use table::{ResultTable, TableData, TableOptions};

pub const FAILED_TO_RETRANSLATE: &str = "failed to retranslate";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum, Serialize, Deserialize)]
#[oai(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    VerifiedSame,
    VerifiedDifferent,
    Unverifiable,
}

impl VerificationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            VerificationStatus::VerifiedSame => "same as input",
            VerificationStatus::VerifiedDifferent => "not same as input",
            VerificationStatus::Unverifiable => "unable to assess",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Object, Serialize, Deserialize)]
pub struct PredictionResult {
    pub input: String,
    pub predicted: String,
    #[oai(skip_serializing_if_is_none)]
    pub round_trip: Option<String>,
    #[oai(skip_serializing_if_is_none)]
    pub status: Option<VerificationStatus>,
    #[oai(skip_serializing_if_is_none)]
    pub error: Option<String>,
}

impl PredictionResult {
    pub fn predicted(input: &str, predicted: String) -> Self {
        Self {
            input: input.to_string(),
            predicted,
            round_trip: None,
            status: None,
            error: None,
        }
    }

    pub fn failed(input: &str, error: impl ToString) -> Self {
        Self {
            input: input.to_string(),
            predicted: String::new(),
            round_trip: None,
            status: None,
            error: Some(error.to_string()),
        }
    }

    pub fn with_verification(mut self, round_trip: String, status: VerificationStatus) -> Self {
        self.round_trip = Some(round_trip);
        self.status = Some(status);
        self
    }
}

/// Parses `predicted_name` back into a structure and compares it with
/// `original`. Returns the round-trip SMILES (or [`FAILED_TO_RETRANSLATE`])
/// and the verdict. Never fails: anything that prevents a comparison makes
/// the result unverifiable.
pub fn verify(
    original: &str,
    predicted_name: &str,
    parser: &dyn NameParser,
    toolkit: &dyn StructureToolkit,
) -> (String, VerificationStatus) {
    let name = predicted_name.replace(';', " ");

    let round_trip = match parser.parse(&name) {
        Ok(smiles) => smiles,
        Err(e) => {
            log::debug!("could not retranslate {name:?}: {e}");
            return (
                FAILED_TO_RETRANSLATE.to_string(),
                VerificationStatus::Unverifiable,
            );
        }
    };

    let keys = toolkit
        .identity_key(original)
        .and_then(|original_key| Ok((original_key, toolkit.identity_key(&round_trip)?)));

    let status = match keys {
        Ok((original_key, round_trip_key)) if original_key == round_trip_key => {
            VerificationStatus::VerifiedSame
        }
        Ok(_) => VerificationStatus::VerifiedDifferent,
        Err(e) => {
            log::debug!("could not compare {original:?} with {round_trip:?}: {e}");
            VerificationStatus::Unverifiable
        }
    };

    (round_trip, status)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::chemistry::RdkitToolkit;
    use crate::errors::PipelineError;

    struct Lookup(HashMap<&'static str, &'static str>);

    impl NameParser for Lookup {
        fn parse(&self, name: &str) -> Result<String, PipelineError> {
            self.0
                .get(name)
                .map(|s| s.to_string())
                .ok_or_else(|| PipelineError::Parse {
                    name: name.to_string(),
                    message: "unknown".to_string(),
                })
        }
    }

    fn parser() -> Lookup {
        Lookup(HashMap::from([
            ("ethanol", "OCC"),
            ("methoxymethane", "COC"),
            ("ethyl acetate", "CCOC(C)=O"),
            ("nonsense", "C1CC"),
        ]))
    }

    #[test]
    fn same_structure_is_verified() {
        let (round_trip, status) = verify("CCO", "ethanol", &parser(), &RdkitToolkit);
        assert_eq!(round_trip, "OCC");
        assert_eq!(status, VerificationStatus::VerifiedSame);
    }

    #[test]
    fn different_structure_is_flagged() {
        let (_, status) = verify("CCO", "methoxymethane", &parser(), &RdkitToolkit);
        assert_eq!(status, VerificationStatus::VerifiedDifferent);
    }

    #[test]
    fn unparseable_name_is_unverifiable() {
        let (round_trip, status) = verify("CCO", "unknownium", &parser(), &RdkitToolkit);
        assert_eq!(round_trip, FAILED_TO_RETRANSLATE);
        assert_eq!(status, VerificationStatus::Unverifiable);
        assert_eq!(status.label(), "unable to assess");
    }

    #[test]
    fn semicolons_are_read_as_spaces() {
        let (_, status) = verify("CC(=O)OCC", "ethyl;acetate", &parser(), &RdkitToolkit);
        assert_eq!(status, VerificationStatus::VerifiedSame);
    }

    #[test]
    fn invalid_round_trip_is_unverifiable() {
        let (round_trip, status) = verify("CCO", "nonsense", &parser(), &RdkitToolkit);
        assert_eq!(round_trip, "C1CC");
        assert_eq!(status, VerificationStatus::Unverifiable);
    }
}
