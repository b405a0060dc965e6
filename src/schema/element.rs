use serde::{Deserialize, Serialize};
use std::fmt;

/// Newtype wrapper for element handles. Indexes the owning document's
/// element arena; never owns the element it names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u32);

impl ElementId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The kind of a syntax-tree node. Features declare which kinds they
/// apply to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// A lexical word as it comes from the lexicon.
    Word,
    /// A word awaiting or carrying inflection.
    InflectedWord,
    NounPhrase,
    VerbPhrase,
    AdjectivePhrase,
    AdverbPhrase,
    PrepositionalPhrase,
    Clause,
    CoordinatedPhrase,
    /// An ordered run of elements produced while realising phrases.
    List,
    /// Literal text that bypasses syntax and morphology.
    CannedText,
}

impl ElementKind {
    pub const ALL: [ElementKind; 11] = [
        Self::Word,
        Self::InflectedWord,
        Self::NounPhrase,
        Self::VerbPhrase,
        Self::AdjectivePhrase,
        Self::AdverbPhrase,
        Self::PrepositionalPhrase,
        Self::Clause,
        Self::CoordinatedPhrase,
        Self::List,
        Self::CannedText,
    ];

    /// Phrase kinds with a head, including clauses.
    pub const PHRASES: [ElementKind; 6] = [
        Self::NounPhrase,
        Self::VerbPhrase,
        Self::AdjectivePhrase,
        Self::AdverbPhrase,
        Self::PrepositionalPhrase,
        Self::Clause,
    ];

    /// Returns the tag string for this kind (e.g., "noun_phrase").
    pub fn name(&self) -> &'static str {
        match self {
            Self::Word => "word",
            Self::InflectedWord => "inflected_word",
            Self::NounPhrase => "noun_phrase",
            Self::VerbPhrase => "verb_phrase",
            Self::AdjectivePhrase => "adjective_phrase",
            Self::AdverbPhrase => "adverb_phrase",
            Self::PrepositionalPhrase => "prepositional_phrase",
            Self::Clause => "clause",
            Self::CoordinatedPhrase => "coordinated_phrase",
            Self::List => "list",
            Self::CannedText => "canned_text",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
