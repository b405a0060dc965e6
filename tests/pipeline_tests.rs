/// Pipeline integration tests: a small syntax → morphology → orthography
/// run over a hand-built tree, exercising the feature contract between
/// stages.

use nlg_features::core::config::RealiserConfig;
use nlg_features::core::facade::{ClauseFeatures, PhraseFeatures, WordFeatures};
use nlg_features::core::pipeline::{Pipeline, PipelineError, RealisationStage};
use nlg_features::core::store::OwnerPolicy;
use nlg_features::core::tree::Document;
use nlg_features::schema::element::{ElementId, ElementKind};
use nlg_features::schema::feature::{FeatureKey, Stage};
use nlg_features::schema::value::DiscourseFunction;
use std::cell::RefCell;
use std::rc::Rc;

/// Marks subjects, verb phrases and complements with their discourse
/// function, and flags the clause as a question when asked to.
struct SyntaxStage {
    questions: bool,
}

impl RealisationStage for SyntaxStage {
    fn stage(&self) -> Stage {
        Stage::Syntax
    }

    fn apply(&mut self, doc: &mut Document, element: ElementId) -> Result<(), PipelineError> {
        let node = doc.element(element)?;
        match node.kind() {
            ElementKind::Clause => {
                let vp = doc
                    .require(element, FeatureKey::VerbPhrase)?
                    .as_element()
                    .ok_or(PipelineError::StructuralRequirementUnmet {
                        stage: Stage::Syntax,
                        element,
                        key: FeatureKey::VerbPhrase,
                    })?;
                let subjects = node.subjects().to_vec();
                for subject in subjects {
                    doc.set_feature(
                        subject,
                        FeatureKey::DiscourseFunction,
                        DiscourseFunction::Subject,
                    )?;
                }
                doc.set_feature(vp, FeatureKey::DiscourseFunction, DiscourseFunction::VerbPhrase)?;
                if self.questions {
                    doc.update(element, |clause| clause.set_interrogative(true))?;
                }
            }
            ElementKind::VerbPhrase => {
                let complements = node.complements().to_vec();
                for complement in complements {
                    doc.set_feature(
                        complement,
                        FeatureKey::DiscourseFunction,
                        DiscourseFunction::Object,
                    )?;
                }
            }
            _ => {}
        }
        Ok(())
    }
}

/// Records the discourse function seen on every word.
struct MorphologyStage {
    seen: Rc<RefCell<Vec<(String, Option<DiscourseFunction>)>>>,
}

impl RealisationStage for MorphologyStage {
    fn stage(&self) -> Stage {
        Stage::Morphology
    }

    fn apply(&mut self, doc: &mut Document, element: ElementId) -> Result<(), PipelineError> {
        let node = doc.element(element)?;
        if node.kind() == ElementKind::Word {
            let parent_function = node
                .parent()
                .and_then(|parent| doc.get(parent))
                .and_then(|parent| parent.discourse_function());
            self.seen.borrow_mut().push((
                node.lexeme().unwrap_or_default().to_string(),
                node.discourse_function().or(parent_function),
            ));
        }
        Ok(())
    }
}

/// Joins the words of the root clause and picks the final punctuation.
struct OrthographyStage {
    output: Rc<RefCell<String>>,
}

impl RealisationStage for OrthographyStage {
    fn stage(&self) -> Stage {
        Stage::Orthography
    }

    fn apply(&mut self, doc: &mut Document, element: ElementId) -> Result<(), PipelineError> {
        if doc.root() != Some(element) {
            return Ok(());
        }
        let words: Vec<&str> = doc
            .walk(element)
            .into_iter()
            .filter_map(|id| doc.get(id).and_then(|e| e.lexeme()))
            .collect();
        let mut sentence = words.join(" ");
        if let Some(first) = sentence.get(0..1) {
            let upper = first.to_uppercase();
            sentence.replace_range(0..1, &upper);
        }
        let question = doc.element(element)?.is_interrogative();
        sentence.push(if question { '?' } else { '.' });
        *self.output.borrow_mut() = sentence;
        Ok(())
    }
}

/// Builds "john plays football" as clause(np(john), vp(plays, np(football))).
fn build_sentence(doc: &mut Document) -> (ElementId, ElementId, ElementId, ElementId) {
    let clause = doc.create(ElementKind::Clause);
    let subject = doc.create(ElementKind::NounPhrase);
    let john = doc.create_word(ElementKind::Word, "john");
    let vp = doc.create(ElementKind::VerbPhrase);
    let verb = doc.create_word(ElementKind::Word, "plays");
    let object = doc.create(ElementKind::NounPhrase);
    let football = doc.create_word(ElementKind::Word, "football");

    doc.attach(clause, subject).unwrap();
    doc.attach(subject, john).unwrap();
    doc.attach(clause, vp).unwrap();
    doc.attach(vp, verb).unwrap();
    doc.attach(vp, object).unwrap();
    doc.attach(object, football).unwrap();

    {
        let node = doc.get_mut(clause).unwrap();
        node.set_subjects(vec![subject]).unwrap();
        node.set_verb_phrase(vp).unwrap();
    }
    doc.get_mut(subject).unwrap().set_head(john).unwrap();
    {
        let node = doc.get_mut(vp).unwrap();
        node.set_head(verb).unwrap();
        node.add_complement(object).unwrap();
    }
    doc.get_mut(object).unwrap().set_head(football).unwrap();
    doc.set_root(clause).unwrap();

    (clause, subject, vp, object)
}

fn run(doc: &mut Document, questions: bool) -> (String, Vec<(String, Option<DiscourseFunction>)>) {
    let output = Rc::new(RefCell::new(String::new()));
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut pipeline = Pipeline::new()
        .with_stage(OrthographyStage {
            output: Rc::clone(&output),
        })
        .with_stage(MorphologyStage {
            seen: Rc::clone(&seen),
        })
        .with_stage(SyntaxStage { questions });

    let report = pipeline.run(doc).unwrap();
    assert!(report.is_clean(), "unexpected skips: {:?}", report.skipped);
    assert_eq!(report.stages_run, vec!["syntax", "morphology", "orthography"]);

    let text = output.borrow().clone();
    let words = seen.borrow().clone();
    (text, words)
}

#[test]
fn declarative_sentence_end_to_end() {
    let mut doc = Document::new();
    let (clause, subject, vp, object) = build_sentence(&mut doc);

    let (text, words) = run(&mut doc, false);
    assert_eq!(text, "John plays football.");
    assert_eq!(
        words,
        vec![
            ("john".to_string(), Some(DiscourseFunction::Subject)),
            ("plays".to_string(), Some(DiscourseFunction::VerbPhrase)),
            ("football".to_string(), Some(DiscourseFunction::Object)),
        ]
    );

    assert!(!doc.element(clause).unwrap().is_interrogative());
    assert_eq!(
        doc.element(subject).unwrap().discourse_function(),
        Some(DiscourseFunction::Subject)
    );
    assert_eq!(
        doc.element(vp).unwrap().discourse_function(),
        Some(DiscourseFunction::VerbPhrase)
    );
    assert_eq!(
        doc.element(object).unwrap().discourse_function(),
        Some(DiscourseFunction::Object)
    );
}

#[test]
fn interrogative_flag_reaches_orthography() {
    let mut doc = Document::new();
    build_sentence(&mut doc);
    let (text, _) = run(&mut doc, true);
    assert_eq!(text, "John plays football?");
}

#[test]
fn clause_without_verb_phrase_is_skipped_not_fatal() {
    let mut doc = Document::new();
    let root = doc.create(ElementKind::List);
    let (good, ..) = build_sentence(&mut doc);
    let broken = doc.create(ElementKind::Clause);
    let stray = doc.create_word(ElementKind::Word, "stray");
    doc.attach(broken, stray).unwrap();
    doc.attach(root, good).unwrap();
    doc.attach(root, broken).unwrap();
    doc.set_root(root).unwrap();

    let mut pipeline = Pipeline::new().with_stage(SyntaxStage { questions: false });
    let report = pipeline.run(&mut doc).unwrap();

    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].element, broken);
    assert!(matches!(
        report.skipped[0].error,
        PipelineError::StructuralRequirementUnmet {
            key: FeatureKey::VerbPhrase,
            ..
        }
    ));
    // The well-formed clause was still processed.
    let subject = doc.element(good).unwrap().subjects()[0];
    assert_eq!(
        doc.element(subject).unwrap().discourse_function(),
        Some(DiscourseFunction::Subject)
    );
}

#[test]
fn strict_profile_turns_owner_mismatch_into_skip() {
    let config = RealiserConfig::load_from_ron(std::path::Path::new(
        "tests/fixtures/strict_config.ron",
    ))
    .unwrap();
    assert_eq!(config.owner_policy, OwnerPolicy::Strict);

    let mut doc = Document::builder().config(config).build().unwrap();
    let (clause, ..) = build_sentence(&mut doc);

    /// Wrongly tries to flag the clause as raised.
    struct RaiseClause;

    impl RealisationStage for RaiseClause {
        fn stage(&self) -> Stage {
            Stage::Syntax
        }

        fn apply(&mut self, doc: &mut Document, element: ElementId) -> Result<(), PipelineError> {
            if doc.element(element)?.kind() == ElementKind::Clause {
                doc.set_feature(element, FeatureKey::Raised, true)?;
            }
            Ok(())
        }
    }

    let mut pipeline = Pipeline::new().with_stage(RaiseClause);
    let report = pipeline.run(&mut doc).unwrap();
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].element, clause);
    assert!(!doc
        .element(clause)
        .unwrap()
        .features()
        .has(FeatureKey::Raised));
}

#[test]
fn disabled_feature_is_invalid_for_stores() {
    let config = RealiserConfig::parse_ron("(disabled_features: [interrogative])").unwrap();
    let mut doc = Document::builder().config(config).build().unwrap();
    let clause = doc.create(ElementKind::Clause);

    assert!(doc
        .set_feature(clause, FeatureKey::Interrogative, true)
        .is_err());
    // Façade reads fall back to the default.
    assert!(!doc.element(clause).unwrap().is_interrogative());
}
