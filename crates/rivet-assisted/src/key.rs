use std::fmt;

use rivet_model::{Annotation, TypeRef};

/// Identity-bearing qualifier attached to a parameter, e.g. `@Named("side")`.
///
/// Names are normalized to their simple form so `javax.inject.Named` and
/// `Named` produce equal keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifierRef {
    pub name: String,
    pub value: Option<String>,
}

impl QualifierRef {
    pub fn from_annotation(annotation: &Annotation) -> Self {
        Self {
            name: annotation.simple_name().to_string(),
            value: annotation.value.clone(),
        }
    }
}

impl fmt::Display for QualifierRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "@{}({})", self.name, value),
            None => write!(f, "@{}", self.name),
        }
    }
}

/// The (type, qualifier) identity used to match parameters between the
/// constructor and the factory method.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    pub ty: TypeRef,
    pub qualifier: Option<QualifierRef>,
}

impl Key {
    pub fn new(ty: impl Into<TypeRef>) -> Self {
        Self {
            ty: ty.into(),
            qualifier: None,
        }
    }

    pub fn qualified(ty: impl Into<TypeRef>, qualifier: QualifierRef) -> Self {
        Self {
            ty: ty.into(),
            qualifier: Some(qualifier),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(qualifier) => write!(f, "{} {}", self.ty, qualifier),
            None => write!(f, "{}", self.ty),
        }
    }
}
