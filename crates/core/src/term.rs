//! Index term model
//!
//! This module defines the vocabulary used to talk to the source index:
//! - TermKey: stable identifier for a term kind ("packageName", "ref", ...)
//! - ResourceKind / PartKind: discriminators that narrow a term kind
//! - ValueTerm: a runtime (key, value, discriminator) triple carried by a
//!   page request
//!
//! A query declares its contract in terms of term kinds; a request supplies
//! concrete `ValueTerm`s. Both sides of that handshake live here so the
//! validator and the index boundary agree on one spelling of every term.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;

// ============================================================================
// TermKey
// ============================================================================

/// Stable identifier for an index term kind.
///
/// A term key names one kind of indexed fact ("packageName",
/// "projectRootPath", ...). Keys for the standard schema are declared once in
/// [`keys`]; custom schemas can mint their own with [`TermKey::new`].
///
/// Keys are compared, hashed, and ordered by their string form, so a key
/// built at runtime is interchangeable with a `const` one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TermKey(Cow<'static, str>);

impl TermKey {
    /// Declare a term key from a static string (usable in `const` context).
    pub const fn from_static(key: &'static str) -> Self {
        TermKey(Cow::Borrowed(key))
    }

    /// Create a term key from a runtime string.
    pub fn new(key: impl Into<String>) -> Self {
        TermKey(Cow::Owned(key.into()))
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TermKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for TermKey {
    fn from(key: &'static str) -> Self {
        TermKey::from_static(key)
    }
}

/// Term keys of the standard index schema.
///
/// These are the kinds the standard query suite is declared against. The
/// discriminated kinds (`REFERENCE`, `SHARED_PART`) never appear bare in the
/// index; their field names carry the discriminator (see
/// [`ValueTerm::label`]).
pub mod keys {
    use super::TermKey;

    /// Package a rule or artifact belongs to.
    pub const PACKAGE_NAME: TermKey = TermKey::from_static("packageName");

    /// Root path of the containing project.
    pub const PROJECT_ROOT_PATH: TermKey = TermKey::from_static("projectRootPath");

    /// Reference to a named resource, discriminated by [`super::ResourceKind`].
    pub const REFERENCE: TermKey = TermKey::from_static("ref");

    /// Reference to a shared part, discriminated by [`super::PartKind`].
    pub const SHARED_PART: TermKey = TermKey::from_static("sharedref");
}

// ============================================================================
// ResourceKind
// ============================================================================

/// Resource discriminator for reference terms.
///
/// A reference term (`ref`) always names a resource of one of these kinds;
/// the kind is part of the term's identity, so `ref:java` and `ref:rule` are
/// different index fields and different compatibility keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Java class or type.
    Java,
    /// Rule definition.
    Rule,
    /// BPMN2 process definition.
    Bpmn2,
    /// Function definition.
    Function,
    /// Data model definition.
    Model,
    /// Form definition.
    Form,
}

impl ResourceKind {
    /// All resource kinds (for iteration).
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::Java,
        ResourceKind::Rule,
        ResourceKind::Bpmn2,
        ResourceKind::Function,
        ResourceKind::Model,
        ResourceKind::Form,
    ];

    /// Short identifier, as rendered into term labels and index fields.
    pub const fn id(&self) -> &'static str {
        match self {
            ResourceKind::Java => "java",
            ResourceKind::Rule => "rule",
            ResourceKind::Bpmn2 => "bpmn2",
            ResourceKind::Function => "function",
            ResourceKind::Model => "model",
            ResourceKind::Form => "form",
        }
    }

    /// Parse from the short identifier.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "java" => Some(ResourceKind::Java),
            "rule" => Some(ResourceKind::Rule),
            "bpmn2" => Some(ResourceKind::Bpmn2),
            "function" => Some(ResourceKind::Function),
            "model" => Some(ResourceKind::Model),
            "form" => Some(ResourceKind::Form),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

// ============================================================================
// PartKind
// ============================================================================

/// Part discriminator for shared-part terms.
///
/// Shared parts are named fragments (groups, globals, entry points) that
/// several artifacts can reference; `sharedref:<part>` terms find them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PartKind {
    /// Declared field.
    Field,
    /// Declared method.
    Method,
    /// Global definition.
    Global,
    /// Ruleflow group.
    RuleflowGroup,
    /// Agenda group.
    AgendaGroup,
    /// Activation group.
    ActivationGroup,
    /// Entry point.
    EntryPoint,
}

impl PartKind {
    /// All part kinds (for iteration).
    pub const ALL: [PartKind; 7] = [
        PartKind::Field,
        PartKind::Method,
        PartKind::Global,
        PartKind::RuleflowGroup,
        PartKind::AgendaGroup,
        PartKind::ActivationGroup,
        PartKind::EntryPoint,
    ];

    /// Short identifier, as rendered into term labels and index fields.
    pub const fn id(&self) -> &'static str {
        match self {
            PartKind::Field => "field",
            PartKind::Method => "method",
            PartKind::Global => "global",
            PartKind::RuleflowGroup => "ruleflow_group",
            PartKind::AgendaGroup => "agenda_group",
            PartKind::ActivationGroup => "activation_group",
            PartKind::EntryPoint => "entry_point",
        }
    }

    /// Parse from the short identifier.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "field" => Some(PartKind::Field),
            "method" => Some(PartKind::Method),
            "global" => Some(PartKind::Global),
            "ruleflow_group" => Some(PartKind::RuleflowGroup),
            "agenda_group" => Some(PartKind::AgendaGroup),
            "activation_group" => Some(PartKind::ActivationGroup),
            "entry_point" => Some(PartKind::EntryPoint),
            _ => None,
        }
    }
}

impl fmt::Display for PartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

// ============================================================================
// Discriminator
// ============================================================================

/// Secondary tag narrowing a term kind beyond its base key.
///
/// Two discriminator families exist: resource kinds (for `ref` terms) and
/// part kinds (for `sharedref` terms). The discriminator participates in
/// term equality, ordering, and compatibility checking; it is never an
/// afterthought check layered on top of the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Discriminator {
    /// Resource-kind discriminator (reference terms).
    Resource(ResourceKind),
    /// Part-kind discriminator (shared-part terms).
    Part(PartKind),
}

impl Discriminator {
    /// Short identifier, as rendered into term labels.
    pub const fn id(&self) -> &'static str {
        match self {
            Discriminator::Resource(kind) => kind.id(),
            Discriminator::Part(kind) => kind.id(),
        }
    }
}

impl fmt::Display for Discriminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl From<ResourceKind> for Discriminator {
    fn from(kind: ResourceKind) -> Self {
        Discriminator::Resource(kind)
    }
}

impl From<PartKind> for Discriminator {
    fn from(kind: PartKind) -> Self {
        Discriminator::Part(kind)
    }
}

// ============================================================================
// ValueTerm
// ============================================================================

/// A concrete index term supplied with a page request.
///
/// A value term pairs a term kind with the value to match, plus the
/// discriminator where the kind requires one. Identity is the full
/// (key, value, discriminator) triple.
///
/// Requests carry terms as a `BTreeSet<ValueTerm>`: the derived ordering
/// (key, then value, then discriminator) is the canonical order every
/// downstream consumer iterates in, so the order terms were supplied in can
/// never change an outcome.
///
/// # Examples
///
/// ```
/// use refquery_core::term::{ResourceKind, ValueTerm};
///
/// let by_package = ValueTerm::package_name("org.acme.shipping");
/// let by_ref = ValueTerm::reference("Applicant", ResourceKind::Java);
///
/// assert_eq!(by_package.label(), "packageName");
/// assert_eq!(by_ref.label(), "ref:java");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ValueTerm {
    key: TermKey,
    value: String,
    discriminator: Option<Discriminator>,
}

impl ValueTerm {
    /// Create an undiscriminated term.
    pub fn new(key: TermKey, value: impl Into<String>) -> Self {
        ValueTerm {
            key,
            value: value.into(),
            discriminator: None,
        }
    }

    /// Create a discriminated term.
    pub fn discriminated(
        key: TermKey,
        value: impl Into<String>,
        discriminator: impl Into<Discriminator>,
    ) -> Self {
        ValueTerm {
            key,
            value: value.into(),
            discriminator: Some(discriminator.into()),
        }
    }

    /// Standard-schema term: artifact in the given package.
    pub fn package_name(package: impl Into<String>) -> Self {
        ValueTerm::new(keys::PACKAGE_NAME, package)
    }

    /// Standard-schema term: artifact under the given project root.
    pub fn project_root_path(path: impl Into<String>) -> Self {
        ValueTerm::new(keys::PROJECT_ROOT_PATH, path)
    }

    /// Standard-schema term: artifact referencing the named resource.
    pub fn reference(name: impl Into<String>, kind: ResourceKind) -> Self {
        ValueTerm::discriminated(keys::REFERENCE, name, kind)
    }

    /// Standard-schema term: artifact referencing the named shared part.
    pub fn shared_part(name: impl Into<String>, kind: PartKind) -> Self {
        ValueTerm::discriminated(keys::SHARED_PART, name, kind)
    }

    /// The term kind.
    pub fn key(&self) -> &TermKey {
        &self.key
    }

    /// The value to match.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The discriminator, if the kind carries one.
    pub fn discriminator(&self) -> Option<Discriminator> {
        self.discriminator
    }

    /// Rendered label: the key, with the discriminator appended when present.
    ///
    /// The label is both the index field this term filters on and the
    /// spelling used when the term is reported in a validation error
    /// (`"packageName"`, `"ref:java"`, `"sharedref:global"`).
    pub fn label(&self) -> String {
        match self.discriminator {
            Some(disc) => format!("{}:{}", self.key, disc),
            None => self.key.to_string(),
        }
    }
}

impl fmt::Display for ValueTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.label(), self.value)
    }
}

/// Collect terms into the canonical set form used by page requests.
pub fn term_set<I>(terms: I) -> BTreeSet<ValueTerm>
where
    I: IntoIterator<Item = ValueTerm>,
{
    terms.into_iter().collect()
}

// ============================================================================
// Tests
// ============================================================================
