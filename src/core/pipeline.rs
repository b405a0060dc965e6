/// The realisation pipeline: stage ordering, traversal, and recovery from
/// malformed subtrees.
///
/// Stages run one after another over the whole document. Within a stage,
/// elements are visited in pre-order; an element whose stage work fails is
/// logged and its subtree skipped for that stage, and the rest of the
/// document carries on.
use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::core::store::StoreError;
use crate::core::tree::{Document, TreeError};
use crate::schema::element::ElementId;
use crate::schema::feature::{FeatureKey, Stage};
use crate::schema::value::AttributeValue;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PipelineError {
    #[error("{stage} stage requires feature '{key}' on {element}")]
    StructuralRequirementUnmet {
        stage: Stage,
        element: ElementId,
        key: FeatureKey,
    },
    #[error("tree error: {0}")]
    Tree(#[from] TreeError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("document has no root element")]
    MissingRoot,
}

/// One transformation pass over a document.
pub trait RealisationStage {
    /// Where this pass sits in the stage order.
    fn stage(&self) -> Stage;

    fn name(&self) -> &str {
        self.stage().name()
    }

    /// Process one element. Called for every element of the tree in
    /// pre-order, except those under an element that already failed.
    fn apply(&mut self, doc: &mut Document, element: ElementId) -> Result<(), PipelineError>;
}

/// An element whose subtree a stage gave up on.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedSubtree {
    pub stage: Stage,
    pub stage_name: String,
    pub element: ElementId,
    pub error: PipelineError,
}

/// Summary of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineReport {
    /// Stage names in the order they ran.
    pub stages_run: Vec<String>,
    /// Number of successful `apply` calls across all stages.
    pub applied: usize,
    pub skipped: Vec<SkippedSubtree>,
}

impl PipelineReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Ordered collection of stages.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn RealisationStage>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    pub fn with_stage(mut self, stage: impl RealisationStage + 'static) -> Self {
        self.push(stage);
        self
    }

    pub fn push(&mut self, stage: impl RealisationStage + 'static) {
        self.stages.push(Box::new(stage));
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run every stage over `doc`, in stage order. Stages sharing a stage
    /// keep the order they were added in.
    pub fn run(&mut self, doc: &mut Document) -> Result<PipelineReport, PipelineError> {
        let root = doc.root().ok_or(PipelineError::MissingRoot)?;
        self.stages.sort_by_key(|stage| stage.stage());

        let mut report = PipelineReport::default();
        for stage in self.stages.iter_mut() {
            doc.enter_stage(stage.stage());
            tracing::info!(stage = %stage.stage(), name = stage.name(), "Running stage");

            // Recomputed per stage: earlier stages may have restructured
            // the tree.
            let order = doc.walk(root);
            let mut failed: FxHashSet<ElementId> = FxHashSet::default();

            for id in order {
                if has_failed_ancestor(doc, id, &failed) {
                    continue;
                }
                match stage.apply(doc, id) {
                    Ok(()) => report.applied += 1,
                    Err(error) => {
                        tracing::warn!(
                            stage = %stage.stage(),
                            name = stage.name(),
                            element = %id,
                            error = %error,
                            "Skipping malformed subtree"
                        );
                        failed.insert(id);
                        report.skipped.push(SkippedSubtree {
                            stage: stage.stage(),
                            stage_name: stage.name().to_string(),
                            element: id,
                            error,
                        });
                    }
                }
            }
            report.stages_run.push(stage.name().to_string());
        }

        Ok(report)
    }
}

fn has_failed_ancestor(doc: &Document, id: ElementId, failed: &FxHashSet<ElementId>) -> bool {
    let mut cursor = doc.get(id).and_then(|element| element.parent());
    while let Some(ancestor) = cursor {
        if failed.contains(&ancestor) {
            return true;
        }
        cursor = doc.get(ancestor).and_then(|element| element.parent());
    }
    false
}

impl Document {
    /// Read a structural feature the current stage cannot do without.
    /// Fails with `StructuralRequirementUnmet` if it was never set.
    pub fn require(&self, id: ElementId, key: FeatureKey) -> Result<&AttributeValue, PipelineError> {
        let element = self.element(id)?;
        if !element.features().has(key) {
            return Err(PipelineError::StructuralRequirementUnmet {
                stage: self.stage(),
                element: id,
                key,
            });
        }
        Ok(self.feature(id, key)?)
    }
}
