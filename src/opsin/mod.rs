//! Name-to-structure parsing.

pub mod bridge;

use crate::errors::PipelineError;

pub use bridge::{OpsinBridge, OpsinConfig, DEFAULT_TIMEOUT_SECS, OPSIN_JAR_NAME, OPSIN_JAR_URL};

pub trait NameParser: Send + Sync {
    /// Parses a chemical name into SMILES. An unparseable name is a
    /// [`PipelineError::Parse`].
    fn parse(&self, name: &str) -> Result<String, PipelineError>;
}
