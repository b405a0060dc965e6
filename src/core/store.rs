/// Per-element attribute store with shape checking and default fallback.
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::core::registry::FeatureRegistry;
use crate::schema::element::ElementKind;
use crate::schema::feature::{FeatureDef, FeatureKey};
use crate::schema::value::{AttributeValue, ValueShape};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    #[error("feature '{0}' is not recognised by this store's registry")]
    InvalidFeatureKey(FeatureKey),
    #[error("feature '{key}' expects a {expected} value, got {found}")]
    TypeMismatch {
        key: FeatureKey,
        expected: ValueShape,
        found: &'static str,
    },
    #[error("feature '{key}' does not apply to {owner} elements")]
    OwnerMismatch { key: FeatureKey, owner: ElementKind },
}

/// What a store does when a feature is set on an element kind it does not
/// apply to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnerPolicy {
    /// Log a warning and store the value anyway.
    #[default]
    Warn,
    /// Reject with `StoreError::OwnerMismatch`.
    Strict,
}

/// The features of one element. Holds only explicitly set values; reads of
/// anything else fall back to the key's declared default.
#[derive(Debug, Clone)]
pub struct AttributeStore {
    owner: ElementKind,
    policy: OwnerPolicy,
    registry: Arc<FeatureRegistry>,
    values: FxHashMap<FeatureKey, AttributeValue>,
}

impl AttributeStore {
    pub fn new(owner: ElementKind, registry: Arc<FeatureRegistry>, policy: OwnerPolicy) -> Self {
        Self {
            owner,
            policy,
            registry,
            values: FxHashMap::default(),
        }
    }

    /// The kind of the element owning this store.
    pub fn owner(&self) -> ElementKind {
        self.owner
    }

    pub fn registry(&self) -> &FeatureRegistry {
        &self.registry
    }

    fn recognised(&self, key: FeatureKey) -> Result<&'static FeatureDef, StoreError> {
        if self.registry.contains(key) {
            Ok(key.def())
        } else {
            Err(StoreError::InvalidFeatureKey(key))
        }
    }

    /// The explicitly stored value, or the key's default.
    pub fn get(&self, key: FeatureKey) -> Result<&AttributeValue, StoreError> {
        let def = self.recognised(key)?;
        Ok(self.values.get(&key).unwrap_or(&def.default))
    }

    /// Store `value` under `key`. On error the store is left untouched.
    pub fn set(
        &mut self,
        key: FeatureKey,
        value: impl Into<AttributeValue>,
    ) -> Result<(), StoreError> {
        let def = self.recognised(key)?;
        let value = value.into();
        let found = value.describe();
        let value = def.shape.coerce(value).ok_or(StoreError::TypeMismatch {
            key,
            expected: def.shape,
            found,
        })?;

        if !def.applies_to(self.owner) {
            match self.policy {
                OwnerPolicy::Strict => {
                    return Err(StoreError::OwnerMismatch {
                        key,
                        owner: self.owner,
                    });
                }
                OwnerPolicy::Warn => {
                    tracing::warn!(
                        feature = %key,
                        owner = %self.owner,
                        "Feature set on an element kind it does not apply to"
                    );
                }
            }
        }

        self.values.insert(key, value);
        Ok(())
    }

    /// True if a value was set explicitly, as opposed to falling back to
    /// the default.
    pub fn has(&self, key: FeatureKey) -> bool {
        self.values.contains_key(&key)
    }

    /// Clear an explicit value. Removing an absent key is a no-op.
    pub fn remove(&mut self, key: FeatureKey) -> Option<AttributeValue> {
        self.values.remove(&key)
    }

    pub fn as_str(&self, key: FeatureKey) -> &'static str {
        key.name()
    }

    /// Explicit entries in catalogue order.
    pub fn iter(&self) -> impl Iterator<Item = (FeatureKey, &AttributeValue)> {
        let mut entries: Vec<_> = self.values.iter().map(|(k, v)| (*k, v)).collect();
        entries.sort_by_key(|(k, _)| *k);
        entries.into_iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
