/// Typed accessors over an element's feature store.
///
/// Every accessor reads and writes through `AttributeStore::get` and
/// `AttributeStore::set`; there is no second copy of any value, so two
/// views of the same element always agree. Reads of a key the store's
/// registry does not recognise see the key's default.
use crate::core::store::{AttributeStore, StoreError};
use crate::core::tree::Element;
use crate::schema::element::ElementId;
use crate::schema::feature::FeatureKey;
use crate::schema::value::{AttributeValue, ClauseStatus, DiscourseFunction};

/// Anything that owns a feature store.
///
/// Setters write straight to the store. They check shape and owner but
/// not that referenced elements exist, and they are not audited against
/// the stage contract; stages should wrap them in `Document::update`.
pub trait HasFeatures {
    fn features(&self) -> &AttributeStore;
    fn features_mut(&mut self) -> &mut AttributeStore;
}

impl HasFeatures for Element {
    fn features(&self) -> &AttributeStore {
        Element::features(self)
    }

    fn features_mut(&mut self) -> &mut AttributeStore {
        Element::features_mut(self)
    }
}

fn read(store: &AttributeStore, key: FeatureKey) -> &AttributeValue {
    store.get(key).unwrap_or(&key.def().default)
}

fn flag(store: &AttributeStore, key: FeatureKey) -> bool {
    read(store, key).as_bool().unwrap_or(false)
}

fn append(store: &mut AttributeStore, key: FeatureKey, id: ElementId) -> Result<(), StoreError> {
    let mut ids = read(store, key).as_elements().to_vec();
    ids.push(id);
    store.set(key, ids)
}

/// Features shared by every phrase kind: head, complements and modifiers.
pub trait PhraseFeatures: HasFeatures {
    fn head(&self) -> Option<ElementId> {
        read(self.features(), FeatureKey::Head).as_element()
    }

    fn set_head(&mut self, head: ElementId) -> Result<(), StoreError> {
        self.features_mut().set(FeatureKey::Head, head)
    }

    fn complements(&self) -> &[ElementId] {
        read(self.features(), FeatureKey::Complements).as_elements()
    }

    fn set_complements(&mut self, complements: Vec<ElementId>) -> Result<(), StoreError> {
        self.features_mut().set(FeatureKey::Complements, complements)
    }

    fn add_complement(&mut self, complement: ElementId) -> Result<(), StoreError> {
        append(self.features_mut(), FeatureKey::Complements, complement)
    }

    fn premodifiers(&self) -> &[ElementId] {
        read(self.features(), FeatureKey::Premodifiers).as_elements()
    }

    fn add_premodifier(&mut self, modifier: ElementId) -> Result<(), StoreError> {
        append(self.features_mut(), FeatureKey::Premodifiers, modifier)
    }

    fn postmodifiers(&self) -> &[ElementId] {
        read(self.features(), FeatureKey::Postmodifiers).as_elements()
    }

    fn add_postmodifier(&mut self, modifier: ElementId) -> Result<(), StoreError> {
        append(self.features_mut(), FeatureKey::Postmodifiers, modifier)
    }
}

/// Clause-level features.
pub trait ClauseFeatures: PhraseFeatures {
    fn subjects(&self) -> &[ElementId] {
        read(self.features(), FeatureKey::Subjects).as_elements()
    }

    fn set_subjects(&mut self, subjects: Vec<ElementId>) -> Result<(), StoreError> {
        self.features_mut().set(FeatureKey::Subjects, subjects)
    }

    fn add_subject(&mut self, subject: ElementId) -> Result<(), StoreError> {
        append(self.features_mut(), FeatureKey::Subjects, subject)
    }

    fn verb_phrase(&self) -> Option<ElementId> {
        read(self.features(), FeatureKey::VerbPhrase).as_element()
    }

    fn set_verb_phrase(&mut self, verb_phrase: ElementId) -> Result<(), StoreError> {
        self.features_mut().set(FeatureKey::VerbPhrase, verb_phrase)
    }

    fn clause_status(&self) -> ClauseStatus {
        read(self.features(), FeatureKey::ClauseStatus)
            .as_clause_status()
            .unwrap_or_default()
    }

    fn set_clause_status(&mut self, status: ClauseStatus) -> Result<(), StoreError> {
        self.features_mut().set(FeatureKey::ClauseStatus, status)
    }

    fn is_interrogative(&self) -> bool {
        flag(self.features(), FeatureKey::Interrogative)
    }

    fn set_interrogative(&mut self, interrogative: bool) -> Result<(), StoreError> {
        self.features_mut()
            .set(FeatureKey::Interrogative, interrogative)
    }

    fn front_modifiers(&self) -> &[ElementId] {
        read(self.features(), FeatureKey::FrontModifiers).as_elements()
    }

    fn add_front_modifier(&mut self, modifier: ElementId) -> Result<(), StoreError> {
        append(self.features_mut(), FeatureKey::FrontModifiers, modifier)
    }
}

pub trait NounPhraseFeatures: PhraseFeatures {
    fn specifier(&self) -> Option<ElementId> {
        read(self.features(), FeatureKey::Specifier).as_element()
    }

    fn set_specifier(&mut self, specifier: ElementId) -> Result<(), StoreError> {
        self.features_mut().set(FeatureKey::Specifier, specifier)
    }

    fn is_raised(&self) -> bool {
        flag(self.features(), FeatureKey::Raised)
    }

    fn set_raised(&mut self, raised: bool) -> Result<(), StoreError> {
        self.features_mut().set(FeatureKey::Raised, raised)
    }
}

pub trait VerbPhraseFeatures: PhraseFeatures {
    fn realise_auxiliary(&self) -> bool {
        flag(self.features(), FeatureKey::RealiseAuxiliary)
    }

    fn set_realise_auxiliary(&mut self, realise: bool) -> Result<(), StoreError> {
        self.features_mut()
            .set(FeatureKey::RealiseAuxiliary, realise)
    }

    fn ignore_modal(&self) -> bool {
        flag(self.features(), FeatureKey::IgnoreModal)
    }

    fn set_ignore_modal(&mut self, ignore: bool) -> Result<(), StoreError> {
        self.features_mut().set(FeatureKey::IgnoreModal, ignore)
    }
}

/// Coordinated phrases. Their modifiers and modal flag are read through
/// the phrase and verb phrase views.
pub trait CoordinationFeatures: HasFeatures {
    fn coordinates(&self) -> &[ElementId] {
        read(self.features(), FeatureKey::Coordinates).as_elements()
    }

    fn add_coordinate(&mut self, coordinate: ElementId) -> Result<(), StoreError> {
        append(self.features_mut(), FeatureKey::Coordinates, coordinate)
    }
}

pub trait ListFeatures: HasFeatures {
    fn components(&self) -> &[ElementId] {
        read(self.features(), FeatureKey::Components).as_elements()
    }

    fn set_components(&mut self, components: Vec<ElementId>) -> Result<(), StoreError> {
        self.features_mut().set(FeatureKey::Components, components)
    }

    fn add_component(&mut self, component: ElementId) -> Result<(), StoreError> {
        append(self.features_mut(), FeatureKey::Components, component)
    }
}

/// Word-level features. Discourse function applies to any element but is
/// mostly read off words by the morphology stage.
pub trait WordFeatures: HasFeatures {
    fn base_word(&self) -> Option<ElementId> {
        read(self.features(), FeatureKey::BaseWord).as_element()
    }

    fn set_base_word(&mut self, base: ElementId) -> Result<(), StoreError> {
        self.features_mut().set(FeatureKey::BaseWord, base)
    }

    fn is_acronym(&self) -> bool {
        flag(self.features(), FeatureKey::Acronym)
    }

    fn set_acronym(&mut self, acronym: bool) -> Result<(), StoreError> {
        self.features_mut().set(FeatureKey::Acronym, acronym)
    }

    fn is_non_morph(&self) -> bool {
        flag(self.features(), FeatureKey::NonMorph)
    }

    fn set_non_morph(&mut self, non_morph: bool) -> Result<(), StoreError> {
        self.features_mut().set(FeatureKey::NonMorph, non_morph)
    }

    fn discourse_function(&self) -> Option<DiscourseFunction> {
        read(self.features(), FeatureKey::DiscourseFunction).as_discourse_function()
    }

    fn set_discourse_function(&mut self, function: DiscourseFunction) -> Result<(), StoreError> {
        self.features_mut()
            .set(FeatureKey::DiscourseFunction, function)
    }
}

impl<T: HasFeatures + ?Sized> PhraseFeatures for T {}
impl<T: HasFeatures + ?Sized> ClauseFeatures for T {}
impl<T: HasFeatures + ?Sized> NounPhraseFeatures for T {}
impl<T: HasFeatures + ?Sized> VerbPhraseFeatures for T {}
impl<T: HasFeatures + ?Sized> CoordinationFeatures for T {}
impl<T: HasFeatures + ?Sized> ListFeatures for T {}
impl<T: HasFeatures + ?Sized> WordFeatures for T {}
