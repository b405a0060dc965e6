/// Feature registry: the immutable name/key table consulted by every store.
use once_cell::sync::Lazy;
use rustc_hash::{FxHashMap, FxHashSet};
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

use crate::schema::feature::{FeatureDef, FeatureKey};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("unknown feature key: '{0}'")]
    UnknownFeatureKey(String),
    #[error("feature name '{name}' is used by both {first:?} and {second:?}")]
    DuplicateFeatureName {
        name: &'static str,
        first: FeatureKey,
        second: FeatureKey,
    },
    #[error("feature {0:?} is listed more than once")]
    DuplicateFeatureKey(FeatureKey),
}

static STANDARD: Lazy<Arc<FeatureRegistry>> = Lazy::new(|| {
    let registry = FeatureRegistry::with_keys(FeatureKey::ALL)
        .unwrap_or_else(|e| panic!("built-in feature catalogue is not a bijection: {e}"));
    Arc::new(registry)
});

/// The set of feature keys a realiser recognises, with a bidirectional
/// key/name table. Immutable after construction and shared across
/// documents.
#[derive(Debug)]
pub struct FeatureRegistry {
    /// Recognised keys in catalogue order.
    keys: Vec<FeatureKey>,
    members: FxHashSet<FeatureKey>,
    by_name: FxHashMap<&'static str, FeatureKey>,
}

impl FeatureRegistry {
    /// The process-wide registry of every catalogued feature.
    pub fn standard() -> Arc<FeatureRegistry> {
        Arc::clone(&STANDARD)
    }

    /// Build a registry recognising only `keys`. Keys are kept in
    /// catalogue order regardless of the order given.
    pub fn with_keys(
        keys: impl IntoIterator<Item = FeatureKey>,
    ) -> Result<FeatureRegistry, RegistryError> {
        let mut members = FxHashSet::default();
        let mut by_name: FxHashMap<&'static str, FeatureKey> = FxHashMap::default();

        for key in keys {
            if !members.insert(key) {
                return Err(RegistryError::DuplicateFeatureKey(key));
            }
            let name = key.def().name;
            if let Some(first) = by_name.insert(name, key) {
                return Err(RegistryError::DuplicateFeatureName {
                    name,
                    first,
                    second: key,
                });
            }
        }

        let mut keys: Vec<FeatureKey> = members.iter().copied().collect();
        keys.sort();

        Ok(FeatureRegistry {
            keys,
            members,
            by_name,
        })
    }

    /// Resolve a canonical name to its key.
    pub fn lookup(&self, name: &str) -> Result<FeatureKey, RegistryError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| RegistryError::UnknownFeatureKey(name.to_string()))
    }

    /// Static metadata of a key. Defined for every key, recognised or not.
    pub fn metadata_of(&self, key: FeatureKey) -> &'static FeatureDef {
        key.def()
    }

    /// Recognised keys in catalogue order. Each call starts afresh.
    pub fn enumerate_all(&self) -> impl Iterator<Item = FeatureKey> + '_ {
        self.keys.iter().copied()
    }

    /// The canonical name of a key.
    pub fn as_str(&self, key: FeatureKey) -> &'static str {
        key.name()
    }

    pub fn contains(&self, key: FeatureKey) -> bool {
        self.members.contains(&key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl FromStr for FeatureKey {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        STANDARD.lookup(s)
    }
}
