use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::inference::ModelManifest;
use crate::opsin::{OpsinConfig, OPSIN_JAR_NAME, OPSIN_JAR_URL};

/// Everything needed to build a [`crate::translation::Translator`]. Missing
/// keys in a config file fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub asset_root: PathBuf,
    pub forward: ModelManifest,
    pub reverse: ModelManifest,
    pub vision: ModelManifest,
    /// Overrides the default `java -jar` launch of the cached jar.
    pub opsin: Option<OpsinConfig>,
    pub opsin_jar_url: String,
    /// Zip archive unpacked into the asset root when a model file is missing.
    pub models_archive_url: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("stout-assets"),
            forward: ModelManifest::forward(),
            reverse: ModelManifest::reverse(),
            vision: ModelManifest::vision(),
            opsin: None,
            opsin_jar_url: OPSIN_JAR_URL.to_string(),
            models_archive_url: None,
        }
    }
}

impl ServiceConfig {
    pub fn with_asset_root(asset_root: impl Into<PathBuf>) -> Self {
        Self {
            asset_root: asset_root.into(),
            ..Self::default()
        }
    }

    pub fn from_json_file(path: &Path) -> eyre::Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| eyre::eyre!("could not read config {}: {e}", path.display()))?;
        let config = serde_json::from_str(&json)?;
        log::info!("loaded service config from {}", path.display());
        Ok(config)
    }

    pub fn opsin_jar_path(&self) -> PathBuf {
        self.asset_root.join(OPSIN_JAR_NAME)
    }

    pub fn opsin_config(&self) -> OpsinConfig {
        self.opsin
            .clone()
            .unwrap_or_else(|| OpsinConfig::for_jar(&self.opsin_jar_path()))
    }
}
