//! Annotation-aware symbol model for assisted-injection analysis.
//!
//! The validation pipeline never talks to a compiler frontend directly; it
//! queries a [`SymbolModel`], a narrow read-only view of the declared types in
//! a processing round. Hosts adapt their own symbol tables behind the trait;
//! [`MemoryModel`] is the in-memory implementation used by unit tests and
//! small embedders.

use serde::{Deserialize, Serialize};

use rivet_types::{Span, TypeId};

mod memory;

pub use memory::MemoryModel;

/// An erased reference to a declared type, by name.
///
/// The model does not resolve names; two `TypeRef`s are the same type iff
/// their text is equal. Universes are expected to use one spelling
/// consistently.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeRef(String);

impl TypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TypeRef({})", self.0)
    }
}

impl From<&str> for TypeRef {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TypeRef {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// A declared annotation usage, e.g. `@Named("side")`.
///
/// `value` carries the annotation's argument text verbatim (without the
/// surrounding parentheses), when one is present.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Annotation {
    pub name: String,
    pub value: Option<String>,
}

impl Annotation {
    pub fn new(name: impl Into<String>) -> Self {
        let mut name = name.into();
        if let Some(stripped) = name.strip_prefix('@') {
            name = stripped.to_string();
        }
        Self { name, value: None }
    }

    pub fn with_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        let mut ann = Self::new(name);
        ann.value = Some(value.into());
        ann
    }

    /// Matches by simple or fully-qualified name, so a universe loaded with
    /// `javax.inject.Named` still answers queries for `Named`.
    pub fn matches(&self, query: &str) -> bool {
        annotation_matches(&self.name, query)
    }

    /// The annotation's simple (unqualified) name.
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

fn annotation_matches(annotation: &str, query: &str) -> bool {
    if annotation == query {
        return true;
    }
    let annotation_simple = annotation.rsplit('.').next().unwrap_or(annotation);
    let query_simple = query.rsplit('.').next().unwrap_or(query);
    annotation_simple == query_simple
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Visibility {
    Public,
    Protected,
    #[default]
    Package,
    Private,
}

/// Declaration-level modifiers the pipeline cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_abstract: bool,
}

impl Modifiers {
    pub fn is_private(&self) -> bool {
        self.visibility == Visibility::Private
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Record,
}

impl TypeKind {
    /// Whether a type of this kind can own an assisted constructor (and so
    /// legitimately enclose a factory interface).
    pub fn is_class_like(self) -> bool {
        matches!(self, TypeKind::Class | TypeKind::Enum | TypeKind::Record)
    }
}

/// A formal parameter of a constructor or method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterData {
    pub name: String,
    pub ty: TypeRef,
    pub annotations: Vec<Annotation>,
    pub span: Option<Span>,
}

impl ParameterData {
    pub fn new(name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            annotations: Vec::new(),
            span: None,
        }
    }

    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotations.iter().any(|a| a.matches(name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructorData {
    pub visibility: Visibility,
    pub annotations: Vec<Annotation>,
    pub params: Vec<ParameterData>,
    pub span: Option<Span>,
}

impl ConstructorData {
    pub fn new(params: Vec<ParameterData>) -> Self {
        Self {
            visibility: Visibility::default(),
            annotations: Vec::new(),
            params,
            span: None,
        }
    }

    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotations.iter().any(|a| a.matches(name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodData {
    pub name: String,
    pub return_type: TypeRef,
    pub params: Vec<ParameterData>,
    pub visibility: Visibility,
    pub is_static: bool,
    /// `default` interface method (carries a body).
    pub is_default: bool,
    pub span: Option<Span>,
}

impl MethodData {
    pub fn new(name: impl Into<String>, return_type: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            return_type: return_type.into(),
            params: Vec::new(),
            visibility: Visibility::Public,
            is_static: false,
            is_default: false,
            span: None,
        }
    }

    pub fn with_params(mut self, params: Vec<ParameterData>) -> Self {
        self.params = params;
        self
    }

    /// Abstract in the interface sense: no body of any flavor.
    pub fn is_abstract(&self) -> bool {
        !self.is_static && !self.is_default && self.visibility != Visibility::Private
    }
}

/// A type declaration, as the pipeline sees it.
///
/// Enclosing linkage lives on the model (`SymbolModel::enclosing_type`);
/// `nested` holds the ids of directly enclosed types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeData {
    pub name: String,
    pub kind: TypeKind,
    pub modifiers: Modifiers,
    pub annotations: Vec<Annotation>,
    pub constructors: Vec<ConstructorData>,
    pub methods: Vec<MethodData>,
    pub nested: Vec<TypeId>,
    /// Declaring file, when the universe knows one.
    pub file: Option<String>,
    pub span: Option<Span>,
}

impl TypeData {
    fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            modifiers: Modifiers::default(),
            annotations: Vec::new(),
            constructors: Vec::new(),
            methods: Vec::new(),
            nested: Vec::new(),
            file: None,
            span: None,
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Class)
    }

    pub fn interface(name: impl Into<String>) -> Self {
        let mut data = Self::new(name, TypeKind::Interface);
        data.modifiers.is_abstract = true;
        data
    }

    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotations.iter().any(|a| a.matches(name))
    }
}

/// Read-only queries the validation pipeline issues against a symbol
/// universe.
///
/// Implementations answer marker-membership lookups and structural
/// navigation; they never observe writes. Ids passed back in must have been
/// produced by the same model.
pub trait SymbolModel {
    /// Ids of every type declaration carrying `marker`.
    fn types_with_annotation(&self, marker: &str) -> Vec<TypeId>;

    /// Ids of every type declaring at least one constructor carrying
    /// `marker`.
    fn types_with_constructor_annotation(&self, marker: &str) -> Vec<TypeId>;

    fn type_data(&self, id: TypeId) -> &TypeData;

    /// The directly enclosing type declaration, or `None` for top-level
    /// types.
    fn enclosing_type(&self, id: TypeId) -> Option<TypeId>;
}
