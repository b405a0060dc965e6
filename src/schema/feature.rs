/// The feature catalogue: every attribute a realisation stage may read or
/// write on a syntax-tree node, with its static contract.
use serde::{Deserialize, Serialize};
use std::fmt;

use super::element::ElementKind;
use super::value::{AttributeValue, ClauseStatus, EnumDomain, ValueShape};

/// A realisation stage. Stages run in declaration order, each over the
/// whole tree, each finishing before the next begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Tree construction: the phrase factory or the caller.
    Construction,
    Syntax,
    Morphology,
    Orthography,
    Formatting,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Self::Construction,
        Self::Syntax,
        Self::Morphology,
        Self::Orthography,
        Self::Formatting,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Construction => "construction",
            Self::Syntax => "syntax",
            Self::Morphology => "morphology",
            Self::Orthography => "orthography",
            Self::Formatting => "formatting",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Symbolic identifier of one feature. Serializes as its canonical name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum FeatureKey {
    Acronym,
    BaseWord,
    ClauseStatus,
    Complements,
    Components,
    Coordinates,
    DiscourseFunction,
    NonMorph,
    FrontModifiers,
    Head,
    IgnoreModal,
    Interrogative,
    Postmodifiers,
    Premodifiers,
    Raised,
    RealiseAuxiliary,
    Specifier,
    Subjects,
    VerbPhrase,
}

impl FeatureKey {
    pub const COUNT: usize = 19;

    /// Every key, in catalogue order.
    pub const ALL: [FeatureKey; Self::COUNT] = [
        Self::Acronym,
        Self::BaseWord,
        Self::ClauseStatus,
        Self::Complements,
        Self::Components,
        Self::Coordinates,
        Self::DiscourseFunction,
        Self::NonMorph,
        Self::FrontModifiers,
        Self::Head,
        Self::IgnoreModal,
        Self::Interrogative,
        Self::Postmodifiers,
        Self::Premodifiers,
        Self::Raised,
        Self::RealiseAuxiliary,
        Self::Specifier,
        Self::Subjects,
        Self::VerbPhrase,
    ];

    /// The static definition of this key.
    pub fn def(self) -> &'static FeatureDef {
        &DEFINITIONS[self as usize]
    }

    /// The canonical name, e.g. "clause_status".
    pub fn name(self) -> &'static str {
        self.def().name
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The static contract of a feature.
#[derive(Debug, Serialize)]
pub struct FeatureDef {
    pub key: FeatureKey,
    pub name: &'static str,
    pub shape: ValueShape,
    /// Value seen by readers when nothing was set explicitly.
    pub default: AttributeValue,
    pub applies_to: &'static [ElementKind],
    pub producer: Stage,
    pub consumers: &'static [Stage],
    pub description: &'static str,
}

impl FeatureDef {
    pub fn applies_to(&self, kind: ElementKind) -> bool {
        self.applies_to.contains(&kind)
    }

    pub fn is_consumed_by(&self, stage: Stage) -> bool {
        self.consumers.contains(&stage)
    }
}

use super::element::ElementKind as K;
use self::Stage as S;

const ANY_ELEMENT: &[ElementKind] = &ElementKind::ALL;
const PHRASES: &[ElementKind] = &ElementKind::PHRASES;
const MODIFIABLE: &[ElementKind] = &[
    K::NounPhrase,
    K::VerbPhrase,
    K::AdjectivePhrase,
    K::AdverbPhrase,
    K::PrepositionalPhrase,
    K::Clause,
    K::CoordinatedPhrase,
];
const WORDS: &[ElementKind] = &[K::Word, K::InflectedWord];

// Indexed by `FeatureKey as usize`; `definitions_follow_key_order` keeps
// the two in step.
static DEFINITIONS: [FeatureDef; FeatureKey::COUNT] = [
    FeatureDef {
        key: FeatureKey::Acronym,
        name: "acronym",
        shape: ValueShape::Boolean,
        default: AttributeValue::Bool(false),
        applies_to: &[K::Word, K::InflectedWord, K::NounPhrase],
        producer: S::Construction,
        consumers: &[S::Orthography],
        description: "whether the element is an acronym",
    },
    FeatureDef {
        key: FeatureKey::BaseWord,
        name: "base_word",
        shape: ValueShape::ElementRef,
        default: AttributeValue::Null,
        applies_to: &[K::InflectedWord],
        producer: S::Syntax,
        consumers: &[S::Syntax, S::Morphology],
        description: "the lexicon word an inflected word is built from",
    },
    FeatureDef {
        key: FeatureKey::ClauseStatus,
        name: "clause_status",
        shape: ValueShape::EnumOrString(EnumDomain::ClauseStatus),
        default: AttributeValue::ClauseStatus(ClauseStatus::Matrix),
        applies_to: &[K::Clause],
        producer: S::Construction,
        consumers: &[S::Syntax],
        description: "matrix or subordinate; decides the complementiser",
    },
    FeatureDef {
        key: FeatureKey::Complements,
        name: "complements",
        shape: ValueShape::ElementRefList,
        default: AttributeValue::Elements(Vec::new()),
        applies_to: PHRASES,
        producer: S::Construction,
        consumers: &[S::Syntax],
        description: "complements of the phrase, in order",
    },
    FeatureDef {
        key: FeatureKey::Components,
        name: "components",
        shape: ValueShape::ElementRefList,
        default: AttributeValue::Elements(Vec::new()),
        applies_to: &[K::List],
        producer: S::Syntax,
        consumers: &[S::Syntax, S::Morphology],
        description: "members of a list element",
    },
    FeatureDef {
        key: FeatureKey::Coordinates,
        name: "coordinates",
        shape: ValueShape::ElementRefList,
        default: AttributeValue::Elements(Vec::new()),
        applies_to: &[K::CoordinatedPhrase],
        producer: S::Construction,
        consumers: &[S::Syntax],
        description: "the conjoined phrases of a coordinated phrase",
    },
    FeatureDef {
        key: FeatureKey::DiscourseFunction,
        name: "discourse_function",
        shape: ValueShape::EnumOrString(EnumDomain::DiscourseFunction),
        default: AttributeValue::Null,
        applies_to: ANY_ELEMENT,
        producer: S::Syntax,
        consumers: &[S::Morphology],
        description: "role the element plays within its parent",
    },
    FeatureDef {
        key: FeatureKey::NonMorph,
        name: "non_morph",
        shape: ValueShape::Boolean,
        default: AttributeValue::Bool(false),
        applies_to: WORDS,
        producer: S::Construction,
        consumers: &[S::Morphology],
        description: "skip morphological inflection for this word",
    },
    FeatureDef {
        key: FeatureKey::FrontModifiers,
        name: "front_modifiers",
        shape: ValueShape::ElementRefList,
        default: AttributeValue::Elements(Vec::new()),
        applies_to: &[K::Clause],
        producer: S::Construction,
        consumers: &[S::Syntax],
        description: "modifiers placed after the cue phrase, before the subject",
    },
    FeatureDef {
        key: FeatureKey::Head,
        name: "head",
        shape: ValueShape::ElementRef,
        default: AttributeValue::Null,
        applies_to: PHRASES,
        producer: S::Construction,
        consumers: &[S::Syntax],
        description: "head element of the phrase",
    },
    FeatureDef {
        key: FeatureKey::IgnoreModal,
        name: "ignore_modal",
        shape: ValueShape::Boolean,
        default: AttributeValue::Bool(false),
        applies_to: &[K::CoordinatedPhrase, K::VerbPhrase],
        producer: S::Syntax,
        consumers: &[S::Syntax],
        description: "leave the modal out of the verb group",
    },
    FeatureDef {
        key: FeatureKey::Interrogative,
        name: "interrogative",
        shape: ValueShape::Boolean,
        default: AttributeValue::Bool(false),
        applies_to: &[K::Clause],
        producer: S::Syntax,
        consumers: &[S::Orthography],
        description: "sentence is a question; ends with a question mark",
    },
    FeatureDef {
        key: FeatureKey::Postmodifiers,
        name: "postmodifiers",
        shape: ValueShape::ElementRefList,
        default: AttributeValue::Elements(Vec::new()),
        applies_to: MODIFIABLE,
        producer: S::Construction,
        consumers: &[S::Syntax],
        description: "modifiers placed after the head or the coordinates",
    },
    FeatureDef {
        key: FeatureKey::Premodifiers,
        name: "premodifiers",
        shape: ValueShape::ElementRefList,
        default: AttributeValue::Elements(Vec::new()),
        applies_to: MODIFIABLE,
        producer: S::Construction,
        consumers: &[S::Syntax],
        description: "modifiers placed before the head or the coordinates",
    },
    FeatureDef {
        key: FeatureKey::Raised,
        name: "raised",
        shape: ValueShape::Boolean,
        default: AttributeValue::Bool(false),
        applies_to: &[K::NounPhrase],
        producer: S::Syntax,
        consumers: &[S::Syntax],
        description: "the noun phrase's specifier was raised to its coordination",
    },
    FeatureDef {
        key: FeatureKey::RealiseAuxiliary,
        name: "realise_auxiliary",
        shape: ValueShape::Boolean,
        default: AttributeValue::Bool(false),
        applies_to: &[K::VerbPhrase],
        producer: S::Syntax,
        consumers: &[S::Syntax],
        description: "realise auxiliaries inside a coordinated verb phrase",
    },
    FeatureDef {
        key: FeatureKey::Specifier,
        name: "specifier",
        shape: ValueShape::ElementRef,
        default: AttributeValue::Null,
        applies_to: &[K::NounPhrase],
        producer: S::Construction,
        consumers: &[S::Syntax],
        description: "determiner or possessive of a noun phrase",
    },
    FeatureDef {
        key: FeatureKey::Subjects,
        name: "subjects",
        shape: ValueShape::ElementRefList,
        default: AttributeValue::Elements(Vec::new()),
        applies_to: &[K::Clause],
        producer: S::Construction,
        consumers: &[S::Syntax],
        description: "subjects of the clause, in order",
    },
    FeatureDef {
        key: FeatureKey::VerbPhrase,
        name: "verb_phrase",
        shape: ValueShape::ElementRef,
        default: AttributeValue::Null,
        applies_to: &[K::Clause],
        producer: S::Construction,
        consumers: &[S::Syntax],
        description: "verb phrase of the clause",
    },
];
