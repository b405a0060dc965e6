/// Document tree: an arena of syntax-tree elements, each owning one
/// attribute store.
use std::sync::Arc;
use thiserror::Error;

use crate::core::config::RealiserConfig;
use crate::core::registry::{FeatureRegistry, RegistryError};
use crate::core::store::{AttributeStore, StoreError};
use crate::schema::element::{ElementId, ElementKind};
use crate::schema::feature::{FeatureKey, Stage};
use crate::schema::value::AttributeValue;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TreeError {
    #[error("element not found: {0}")]
    UnknownElement(ElementId),
    #[error("element {child} already belongs to {parent}")]
    AlreadyAttached { child: ElementId, parent: ElementId },
    #[error("attaching {child} under {parent} would create a cycle")]
    WouldCycle { parent: ElementId, child: ElementId },
    #[error("feature '{key}' on {element} refers to missing element {target}")]
    DanglingReference {
        element: ElementId,
        key: FeatureKey,
        target: ElementId,
    },
    #[error("document is full: element handles are limited to {} entries", u32::MAX)]
    CapacityExceeded,
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// A node of the syntax tree.
///
/// Owns its syntactic children (by handle, through the document) and its
/// feature store. Element references held in feature values do not own
/// anything.
#[derive(Debug, Clone)]
pub struct Element {
    id: ElementId,
    kind: ElementKind,
    lexeme: Option<String>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    features: AttributeStore,
}

impl Element {
    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Base form for words, literal text for canned text.
    pub fn lexeme(&self) -> Option<&str> {
        self.lexeme.as_deref()
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    pub fn features(&self) -> &AttributeStore {
        &self.features
    }

    pub fn features_mut(&mut self) -> &mut AttributeStore {
        &mut self.features
    }
}

/// One document being realised: the element arena, its root, and the
/// stage currently running over it.
#[derive(Debug)]
pub struct Document {
    registry: Arc<FeatureRegistry>,
    config: RealiserConfig,
    elements: Vec<Element>,
    root: Option<ElementId>,
    stage: Stage,
}

/// Builder for constructing a `Document`.
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    config: Option<RealiserConfig>,
    registry: Option<Arc<FeatureRegistry>>,
}

impl DocumentBuilder {
    pub fn config(mut self, config: RealiserConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use this registry instead of the one implied by the configuration.
    pub fn registry(mut self, registry: Arc<FeatureRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn build(self) -> Result<Document, RegistryError> {
        let config = self.config.unwrap_or_default();
        let registry = match self.registry {
            Some(registry) => registry,
            None => config.registry()?,
        };
        Ok(Document {
            registry,
            config,
            elements: Vec::new(),
            root: None,
            stage: Stage::Construction,
        })
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document over the standard registry with default policy.
    pub fn new() -> Self {
        Document {
            registry: FeatureRegistry::standard(),
            config: RealiserConfig::default(),
            elements: Vec::new(),
            root: None,
            stage: Stage::Construction,
        }
    }

    pub fn builder() -> DocumentBuilder {
        DocumentBuilder::default()
    }

    pub fn registry(&self) -> &Arc<FeatureRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &RealiserConfig {
        &self.config
    }

    /// Create a detached element with an empty feature store.
    ///
    /// # Panics
    ///
    /// Panics once the document holds `u32::MAX` elements; use
    /// [`Document::try_create`] to get an error instead.
    pub fn create(&mut self, kind: ElementKind) -> ElementId {
        match self.try_create(kind) {
            Ok(id) => id,
            Err(e) => panic!("{}", e),
        }
    }

    /// Create a detached lexical element. Panics like [`Document::create`].
    pub fn create_word(&mut self, kind: ElementKind, lexeme: impl Into<String>) -> ElementId {
        match self.try_create_word(kind, lexeme) {
            Ok(id) => id,
            Err(e) => panic!("{}", e),
        }
    }

    pub fn try_create(&mut self, kind: ElementKind) -> Result<ElementId, TreeError> {
        self.push(kind, None)
    }

    pub fn try_create_word(
        &mut self,
        kind: ElementKind,
        lexeme: impl Into<String>,
    ) -> Result<ElementId, TreeError> {
        self.push(kind, Some(lexeme.into()))
    }

    fn push(&mut self, kind: ElementKind, lexeme: Option<String>) -> Result<ElementId, TreeError> {
        let id = next_id(self.elements.len())?;
        let features =
            AttributeStore::new(kind, Arc::clone(&self.registry), self.config.owner_policy);
        self.elements.push(Element {
            id,
            kind,
            lexeme,
            parent: None,
            children: Vec::new(),
            features,
        });
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.index())
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id.index())
    }

    pub fn element(&self, id: ElementId) -> Result<&Element, TreeError> {
        self.get(id).ok_or(TreeError::UnknownElement(id))
    }

    pub fn element_mut(&mut self, id: ElementId) -> Result<&mut Element, TreeError> {
        self.get_mut(id).ok_or(TreeError::UnknownElement(id))
    }

    /// Make `child` a syntactic child of `parent`. A child has at most one
    /// parent and the tree stays acyclic.
    pub fn attach(&mut self, parent: ElementId, child: ElementId) -> Result<(), TreeError> {
        self.element(parent)?;
        if let Some(existing) = self.element(child)?.parent {
            return Err(TreeError::AlreadyAttached {
                child,
                parent: existing,
            });
        }

        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            if id == child {
                return Err(TreeError::WouldCycle { parent, child });
            }
            cursor = self.element(id)?.parent;
        }

        self.element_mut(child)?.parent = Some(parent);
        self.element_mut(parent)?.children.push(child);
        Ok(())
    }

    /// Detach `child` from its parent, if it has one.
    pub fn detach(&mut self, child: ElementId) -> Result<(), TreeError> {
        let Some(parent) = self.element(child)?.parent else {
            return Ok(());
        };
        self.element_mut(parent)?.children.retain(|id| *id != child);
        self.element_mut(child)?.parent = None;
        Ok(())
    }

    pub fn set_root(&mut self, id: ElementId) -> Result<(), TreeError> {
        self.element(id)?;
        self.root = Some(id);
        Ok(())
    }

    pub fn root(&self) -> Option<ElementId> {
        self.root
    }

    /// Pre-order traversal of the subtree under `from`, children in
    /// insertion order.
    pub fn walk(&self, from: ElementId) -> Vec<ElementId> {
        let mut order = Vec::new();
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            let Some(element) = self.get(id) else {
                continue;
            };
            order.push(id);
            stack.extend(element.children.iter().rev());
        }
        order
    }

    /// The stage currently running over this document.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn enter_stage(&mut self, stage: Stage) {
        tracing::debug!(from = %self.stage, to = %stage, "Entering stage");
        self.stage = stage;
    }

    /// Read a feature of an element.
    pub fn feature(&self, id: ElementId, key: FeatureKey) -> Result<&AttributeValue, TreeError> {
        let value = self.element(id)?.features.get(key)?;
        if self.config.audit_stage_contract && self.stage < key.def().producer {
            tracing::debug!(
                element = %id,
                feature = %key,
                stage = %self.stage,
                producer = %key.def().producer,
                "Feature read before its producing stage ran"
            );
        }
        Ok(value)
    }

    /// Set a feature of an element. Every element the value refers to must
    /// exist in this document.
    pub fn set_feature(
        &mut self,
        id: ElementId,
        key: FeatureKey,
        value: impl Into<AttributeValue>,
    ) -> Result<(), TreeError> {
        let value = value.into();
        self.element(id)?;
        if let Some(target) = value
            .references()
            .iter()
            .copied()
            .find(|target| self.get(*target).is_none())
        {
            return Err(TreeError::DanglingReference {
                element: id,
                key,
                target,
            });
        }

        self.element_mut(id)?.features.set(key, value)?;
        self.audit_write(id, key);
        Ok(())
    }

    /// Run façade writes against one element with the checks of
    /// [`Document::set_feature`]: every reference must resolve, and writes
    /// are audited against the stage contract. If `edit` fails or leaves a
    /// dangling reference, the element's features are restored.
    pub fn update<R>(
        &mut self,
        id: ElementId,
        edit: impl FnOnce(&mut Element) -> Result<R, StoreError>,
    ) -> Result<R, TreeError> {
        let before = self.element(id)?.features.clone();
        let result = match edit(self.element_mut(id)?) {
            Ok(result) => result,
            Err(e) => {
                self.element_mut(id)?.features = before;
                return Err(e.into());
            }
        };

        let written: Vec<(FeatureKey, Vec<ElementId>)> = self
            .element(id)?
            .features
            .iter()
            .filter(|(key, value)| !before.has(*key) || before.get(*key).ok() != Some(*value))
            .map(|(key, value)| (key, value.references().to_vec()))
            .collect();

        for (key, targets) in &written {
            if let Some(target) = targets.iter().copied().find(|t| self.get(*t).is_none()) {
                self.element_mut(id)?.features = before;
                return Err(TreeError::DanglingReference {
                    element: id,
                    key: *key,
                    target,
                });
            }
        }
        for (key, _) in written {
            self.audit_write(id, key);
        }
        Ok(result)
    }

    pub fn remove_feature(
        &mut self,
        id: ElementId,
        key: FeatureKey,
    ) -> Result<Option<AttributeValue>, TreeError> {
        Ok(self.element_mut(id)?.features.remove(key))
    }

    /// The elements a reference-valued feature points at, in order.
    pub fn resolve(&self, id: ElementId, key: FeatureKey) -> Result<Vec<&Element>, TreeError> {
        self.feature(id, key)?
            .references()
            .iter()
            .map(|target| {
                self.get(*target).ok_or(TreeError::DanglingReference {
                    element: id,
                    key,
                    target: *target,
                })
            })
            .collect()
    }

    /// Every feature reference to an element this document does not hold,
    /// as (element, key, target).
    pub fn dangling_references(&self) -> Vec<(ElementId, FeatureKey, ElementId)> {
        let mut dangling = Vec::new();
        for element in &self.elements {
            for (key, value) in element.features.iter() {
                for target in value.references() {
                    if self.get(*target).is_none() {
                        dangling.push((element.id, key, *target));
                    }
                }
            }
        }
        dangling
    }

    // Construction writes anything; the contract binds the later stages.
    fn audit_write(&self, id: ElementId, key: FeatureKey) {
        let producer = key.def().producer;
        if self.config.audit_stage_contract
            && self.stage != Stage::Construction
            && self.stage != producer
        {
            tracing::debug!(
                element = %id,
                feature = %key,
                stage = %self.stage,
                producer = %producer,
                "Feature written outside its producing stage"
            );
        }
    }
}

fn next_id(len: usize) -> Result<ElementId, TreeError> {
    u32::try_from(len)
        .map(ElementId)
        .map_err(|_| TreeError::CapacityExceeded)
}
