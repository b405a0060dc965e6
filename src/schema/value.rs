use serde::{Deserialize, Serialize};
use std::fmt;

use super::element::ElementId;

/// The status of a clause within its sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClauseStatus {
    /// Main (root) clause of a sentence.
    #[default]
    Matrix,
    /// Embedded clause; the syntax stage adds its complementiser.
    Subordinate,
}

impl ClauseStatus {
    pub const ALL: [ClauseStatus; 2] = [Self::Matrix, Self::Subordinate];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Matrix => "matrix",
            Self::Subordinate => "subordinate",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.name() == name)
    }
}

/// The role an element plays in the structure of its parent, e.g. in
/// "John played football": subject, verb phrase, object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscourseFunction {
    Auxiliary,
    Complement,
    Conjunction,
    CuePhrase,
    FrontModifier,
    Head,
    IndirectObject,
    Object,
    PreModifier,
    PostModifier,
    Specifier,
    Subject,
    VerbPhrase,
}

impl DiscourseFunction {
    pub const ALL: [DiscourseFunction; 13] = [
        Self::Auxiliary,
        Self::Complement,
        Self::Conjunction,
        Self::CuePhrase,
        Self::FrontModifier,
        Self::Head,
        Self::IndirectObject,
        Self::Object,
        Self::PreModifier,
        Self::PostModifier,
        Self::Specifier,
        Self::Subject,
        Self::VerbPhrase,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Auxiliary => "auxiliary",
            Self::Complement => "complement",
            Self::Conjunction => "conjunction",
            Self::CuePhrase => "cue_phrase",
            Self::FrontModifier => "front_modifier",
            Self::Head => "head",
            Self::IndirectObject => "indirect_object",
            Self::Object => "object",
            Self::PreModifier => "pre_modifier",
            Self::PostModifier => "post_modifier",
            Self::Specifier => "specifier",
            Self::Subject => "subject",
            Self::VerbPhrase => "verb_phrase",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|function| function.name() == name)
    }
}

/// The enumeration an enum-shaped feature draws its values from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumDomain {
    ClauseStatus,
    DiscourseFunction,
}

impl EnumDomain {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ClauseStatus => "clause status",
            Self::DiscourseFunction => "discourse function",
        }
    }

    /// The member called `name`, as a stored value.
    pub fn member(&self, name: &str) -> Option<AttributeValue> {
        match self {
            Self::ClauseStatus => ClauseStatus::from_name(name).map(AttributeValue::ClauseStatus),
            Self::DiscourseFunction => {
                DiscourseFunction::from_name(name).map(AttributeValue::DiscourseFunction)
            }
        }
    }

    fn admits(&self, value: &AttributeValue) -> bool {
        match (self, value) {
            (Self::ClauseStatus, AttributeValue::ClauseStatus(_))
            | (Self::DiscourseFunction, AttributeValue::DiscourseFunction(_)) => true,
            (_, AttributeValue::Text(name)) => self.member(name).is_some(),
            _ => false,
        }
    }
}

/// The declared shape of a feature's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueShape {
    Boolean,
    ElementRef,
    ElementRefList,
    /// A member of the domain, given directly or by its name.
    EnumOrString(EnumDomain),
}

impl ValueShape {
    /// Returns true if `value` may be stored under a key of this shape.
    /// Text is admitted only when it names a member of the key's domain.
    pub fn admits(&self, value: &AttributeValue) -> bool {
        match (self, value) {
            (Self::Boolean, AttributeValue::Bool(_))
            | (Self::ElementRef, AttributeValue::Element(_))
            | (Self::ElementRefList, AttributeValue::Elements(_)) => true,
            (Self::EnumOrString(domain), value) => domain.admits(value),
            _ => false,
        }
    }

    /// The form `value` is stored in, or `None` if the shape rejects it.
    /// Member names become the member itself, so readers only ever see
    /// the enumeration.
    pub fn coerce(&self, value: AttributeValue) -> Option<AttributeValue> {
        if !self.admits(&value) {
            return None;
        }
        match (self, value) {
            (Self::EnumOrString(domain), AttributeValue::Text(name)) => domain.member(&name),
            (_, value) => Some(value),
        }
    }
}

impl fmt::Display for ValueShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => f.write_str("boolean"),
            Self::ElementRef => f.write_str("element reference"),
            Self::ElementRefList => f.write_str("element reference list"),
            Self::EnumOrString(domain) => write!(f, "{} (or its name)", domain.name()),
        }
    }
}

/// A value stored under a feature key.
///
/// Element references are handles into the document arena and never own
/// the element they point at. `Null` stands for "no value": it is the
/// default of reference-shaped keys and is never stored explicitly.
/// `Text` is accepted on input for enum-shaped keys and stored as the
/// member it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Element(ElementId),
    Elements(Vec<ElementId>),
    ClauseStatus(ClauseStatus),
    DiscourseFunction(DiscourseFunction),
    Text(String),
}

impl AttributeValue {
    /// Short description used in error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Element(_) => "element reference",
            Self::Elements(_) => "element reference list",
            Self::ClauseStatus(_) => "clause status",
            Self::DiscourseFunction(_) => "discourse function",
            Self::Text(_) => "string",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_element(&self) -> Option<ElementId> {
        match self {
            Self::Element(id) => Some(*id),
            _ => None,
        }
    }

    /// The referenced elements of a list value; empty for any other value.
    pub fn as_elements(&self) -> &[ElementId] {
        match self {
            Self::Elements(ids) => ids,
            _ => &[],
        }
    }

    pub fn as_clause_status(&self) -> Option<ClauseStatus> {
        match self {
            Self::ClauseStatus(status) => Some(*status),
            _ => None,
        }
    }

    pub fn as_discourse_function(&self) -> Option<DiscourseFunction> {
        match self {
            Self::DiscourseFunction(function) => Some(*function),
            _ => None,
        }
    }

    /// Every element this value refers to, in order.
    pub fn references(&self) -> &[ElementId] {
        match self {
            Self::Element(id) => std::slice::from_ref(id),
            Self::Elements(ids) => ids,
            _ => &[],
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<ElementId> for AttributeValue {
    fn from(id: ElementId) -> Self {
        Self::Element(id)
    }
}

impl From<Vec<ElementId>> for AttributeValue {
    fn from(ids: Vec<ElementId>) -> Self {
        Self::Elements(ids)
    }
}

impl From<ClauseStatus> for AttributeValue {
    fn from(status: ClauseStatus) -> Self {
        Self::ClauseStatus(status)
    }
}

impl From<DiscourseFunction> for AttributeValue {
    fn from(function: DiscourseFunction) -> Self {
        Self::DiscourseFunction(function)
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLAUSE_STATUS: ValueShape = ValueShape::EnumOrString(EnumDomain::ClauseStatus);
    const DISCOURSE_FUNCTION: ValueShape = ValueShape::EnumOrString(EnumDomain::DiscourseFunction);

    #[test]
    fn shapes_admit_their_own_values() {
        assert!(ValueShape::Boolean.admits(&AttributeValue::Bool(true)));
        assert!(ValueShape::ElementRef.admits(&AttributeValue::Element(ElementId(1))));
        assert!(ValueShape::ElementRefList.admits(&AttributeValue::Elements(vec![])));
        assert!(CLAUSE_STATUS.admits(&AttributeValue::ClauseStatus(ClauseStatus::Subordinate)));
        assert!(DISCOURSE_FUNCTION.admits(&AttributeValue::DiscourseFunction(
            DiscourseFunction::Object
        )));
        assert!(!ValueShape::ElementRef.admits(&AttributeValue::Elements(vec![])));
    }

    #[test]
    fn enum_domains_do_not_mix() {
        assert!(!CLAUSE_STATUS.admits(&AttributeValue::DiscourseFunction(
            DiscourseFunction::Subject
        )));
        assert!(!DISCOURSE_FUNCTION.admits(&AttributeValue::ClauseStatus(ClauseStatus::Matrix)));
        assert!(!CLAUSE_STATUS.admits(&AttributeValue::from("subject")));
        assert!(!DISCOURSE_FUNCTION.admits(&AttributeValue::from("subordinate")));
    }

    #[test]
    fn member_names_coerce_to_members() {
        assert_eq!(
            DISCOURSE_FUNCTION.coerce(AttributeValue::from("indirect_object")),
            Some(AttributeValue::DiscourseFunction(DiscourseFunction::IndirectObject))
        );
        assert_eq!(
            CLAUSE_STATUS.coerce(AttributeValue::from("subordinate")),
            Some(AttributeValue::ClauseStatus(ClauseStatus::Subordinate))
        );
        assert_eq!(CLAUSE_STATUS.coerce(AttributeValue::from("embedded")), None);
        assert_eq!(
            ValueShape::Boolean.coerce(AttributeValue::Bool(false)),
            Some(AttributeValue::Bool(false))
        );
    }

    #[test]
    fn names_match_serde_names() {
        for function in DiscourseFunction::ALL {
            assert_eq!(ron::to_string(&function).unwrap(), function.name());
        }
        for status in ClauseStatus::ALL {
            assert_eq!(ron::to_string(&status).unwrap(), status.name());
        }
    }

    #[test]
    fn null_is_admitted_by_no_shape() {
        for shape in [
            ValueShape::Boolean,
            ValueShape::ElementRef,
            ValueShape::ElementRefList,
            CLAUSE_STATUS,
            DISCOURSE_FUNCTION,
        ] {
            assert!(!shape.admits(&AttributeValue::Null));
        }
    }

    #[test]
    fn accessors() {
        assert_eq!(AttributeValue::Bool(true).as_bool(), Some(true));
        assert_eq!(AttributeValue::Element(ElementId(3)).as_bool(), None);
        assert_eq!(
            AttributeValue::Element(ElementId(3)).as_element(),
            Some(ElementId(3))
        );
        assert!(AttributeValue::Null.as_elements().is_empty());
        assert_eq!(
            AttributeValue::from("my"),
            AttributeValue::Text("my".to_string())
        );
        assert_eq!(
            AttributeValue::from(DiscourseFunction::Subject).as_discourse_function(),
            Some(DiscourseFunction::Subject)
        );
    }

    #[test]
    fn references_cover_single_and_list() {
        assert_eq!(
            AttributeValue::Element(ElementId(2)).references(),
            &[ElementId(2)]
        );
        assert_eq!(
            AttributeValue::Elements(vec![ElementId(4), ElementId(5)]).references(),
            &[ElementId(4), ElementId(5)]
        );
        assert!(AttributeValue::Bool(false).references().is_empty());
    }

    #[test]
    fn clause_status_defaults_to_matrix() {
        assert_eq!(ClauseStatus::default(), ClauseStatus::Matrix);
    }
}
