/// Realiser configuration, loadable from RON.
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::core::registry::{FeatureRegistry, RegistryError};
use crate::core::store::OwnerPolicy;
use crate::schema::feature::FeatureKey;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Policy switches for the feature stores of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RealiserConfig {
    /// How stores react to a feature set on a kind it does not apply to.
    pub owner_policy: OwnerPolicy,
    /// Emit debug events when a stage writes a feature it does not
    /// produce, or reads one whose producer has not run yet.
    pub audit_stage_contract: bool,
    /// Features this realiser profile does not recognise.
    pub disabled_features: Vec<FeatureKey>,
}

impl Default for RealiserConfig {
    fn default() -> Self {
        Self {
            owner_policy: OwnerPolicy::Warn,
            audit_stage_contract: true,
            disabled_features: Vec::new(),
        }
    }
}

impl RealiserConfig {
    /// Load a configuration from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<RealiserConfig, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse a configuration from a RON string. Missing fields take their
    /// default values.
    pub fn parse_ron(input: &str) -> Result<RealiserConfig, ConfigError> {
        Ok(ron::from_str(input)?)
    }

    /// The registry implied by `disabled_features`: the shared standard
    /// registry when nothing is disabled.
    pub fn registry(&self) -> Result<Arc<FeatureRegistry>, RegistryError> {
        if self.disabled_features.is_empty() {
            return Ok(FeatureRegistry::standard());
        }
        let enabled = FeatureKey::ALL
            .into_iter()
            .filter(|key| !self.disabled_features.contains(key));
        Ok(Arc::new(FeatureRegistry::with_keys(enabled)?))
    }
}
