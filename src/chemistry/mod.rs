//! Structure handling on top of RDKit.

pub mod depiction;

use rdkit::{ROMol, RWMol, SmilesParserParams, TautomerEnumerator};

use crate::errors::PipelineError;

pub use depiction::{depict, Visualization, INVALID_SMILES_MESSAGE};

/// The chemistry operations the pipeline needs from a toolkit.
pub trait StructureToolkit: Send + Sync {
    /// Re-serializes `smiles` in kekulé form, so that the encoder sees one
    /// canonical spelling of the structure with no aromatic lowercase atoms.
    fn canonical_smiles(&self, smiles: &str) -> Result<String, PipelineError>;

    /// Key under which two notations of the same compound compare equal,
    /// including mobile-H tautomers.
    fn identity_key(&self, smiles: &str) -> Result<String, PipelineError>;

    fn mol_block(&self, smiles: &str) -> Result<String, PipelineError>;

    fn is_valid(&self, smiles: &str) -> bool {
        self.identity_key(smiles).is_ok()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RdkitToolkit;

/// Some clients escape forward slashes in bond stereo.
pub fn unescape_smiles(smiles: &str) -> String {
    smiles.trim().replace("\\/", "/")
}

fn parse_error(smiles: &str, message: impl ToString) -> PipelineError {
    PipelineError::Parse {
        name: smiles.to_string(),
        message: message.to_string(),
    }
}

impl RdkitToolkit {
    fn sanitized(&self, smiles: &str) -> Result<ROMol, PipelineError> {
        let smiles = unescape_smiles(smiles);
        if smiles.is_empty() {
            return Err(parse_error(&smiles, "empty SMILES"));
        }
        ROMol::from_smiles(&smiles).map_err(|e| parse_error(&smiles, e))
    }

    /// The MolBlock writer kekulizes; reading it back unsanitized keeps the
    /// explicit single and double bonds.
    fn kekule_smiles(&self, romol: &ROMol) -> Option<String> {
        RWMol::from_mol_block(&romol.to_molblock(), false, false, false)
            .map(|rwmol| rwmol.as_smiles())
    }

    fn unsanitized_smiles(&self, smiles: &str) -> Result<String, PipelineError> {
        let mut parser_params = SmilesParserParams::default();
        parser_params.set_sanitize(false);
        let romol = ROMol::from_smiles_with_params(smiles, &parser_params)
            .map_err(|e| parse_error(smiles, e))?;
        Ok(romol.as_smiles())
    }
}

impl StructureToolkit for RdkitToolkit {
    fn canonical_smiles(&self, smiles: &str) -> Result<String, PipelineError> {
        let smiles = unescape_smiles(smiles);
        if smiles.is_empty() {
            return Err(parse_error(&smiles, "empty SMILES"));
        }

        let kekule = match self.sanitized(&smiles) {
            Ok(romol) => self.kekule_smiles(&romol),
            Err(e) => {
                log::debug!("sanitization failed, encoding {smiles:?} as written: {e}");
                None
            }
        };

        match kekule {
            Some(kekule) => Ok(kekule),
            None => self.unsanitized_smiles(&smiles),
        }
    }

    fn identity_key(&self, smiles: &str) -> Result<String, PipelineError> {
        let romol = self.sanitized(smiles)?;
        let canon_taut = TautomerEnumerator::new().canonicalize(&romol);
        Ok(canon_taut.as_smiles())
    }

    fn mol_block(&self, smiles: &str) -> Result<String, PipelineError> {
        Ok(self.sanitized(smiles)?.to_molblock())
    }
}
