use std::fmt;

use thiserror::Error;

use rivet_model::{TypeData, TypeRef};
use rivet_types::{Diagnostic, FileDiagnostic, Span};

use crate::key::Key;

pub const ASSISTED_FACTORY_NOT_NESTED: &str = "ASSISTED_FACTORY_NOT_NESTED";
pub const ASSISTED_TYPE_PRIVATE: &str = "ASSISTED_TYPE_PRIVATE";
pub const ASSISTED_TYPE_NOT_STATIC: &str = "ASSISTED_TYPE_NOT_STATIC";
pub const ASSISTED_NO_CONSTRUCTOR: &str = "ASSISTED_NO_CONSTRUCTOR";
pub const ASSISTED_AMBIGUOUS_CONSTRUCTOR: &str = "ASSISTED_AMBIGUOUS_CONSTRUCTOR";
pub const ASSISTED_CONSTRUCTOR_PRIVATE: &str = "ASSISTED_CONSTRUCTOR_PRIVATE";
pub const ASSISTED_NO_FACTORY: &str = "ASSISTED_NO_FACTORY";
pub const ASSISTED_AMBIGUOUS_FACTORY: &str = "ASSISTED_AMBIGUOUS_FACTORY";
pub const ASSISTED_FACTORY_NOT_INTERFACE: &str = "ASSISTED_FACTORY_NOT_INTERFACE";
pub const ASSISTED_FACTORY_PRIVATE: &str = "ASSISTED_FACTORY_PRIVATE";
pub const ASSISTED_NO_FACTORY_METHOD: &str = "ASSISTED_NO_FACTORY_METHOD";
pub const ASSISTED_AMBIGUOUS_FACTORY_METHOD: &str = "ASSISTED_AMBIGUOUS_FACTORY_METHOD";
pub const ASSISTED_NO_ASSISTED_PARAMS: &str = "ASSISTED_NO_ASSISTED_PARAMS";
pub const ASSISTED_NO_PROVIDED_PARAMS: &str = "ASSISTED_NO_PROVIDED_PARAMS";
pub const ASSISTED_DUPLICATE_KEYS: &str = "ASSISTED_DUPLICATE_KEYS";
pub const ASSISTED_KEY_MISMATCH: &str = "ASSISTED_KEY_MISMATCH";
pub const ASSISTED_FACTORY_RETURN_TYPE: &str = "ASSISTED_FACTORY_RETURN_TYPE";
pub const ASSISTED_INTERNAL: &str = "ASSISTED_INTERNAL";

/// Where a diagnostic should point: the declaring file plus the most specific
/// span known for the offending declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub file: String,
    pub span: Option<Span>,
}

impl Location {
    pub fn new(file: impl Into<String>, span: Option<Span>) -> Self {
        Self {
            file: file.into(),
            span,
        }
    }

    pub(crate) fn of_type(data: &TypeData) -> Self {
        Self::of_member(data, None)
    }

    /// Points at a member of `data` when its span is known, falling back to
    /// the declaring type.
    pub(crate) fn of_member(data: &TypeData, span: Option<Span>) -> Self {
        Self {
            file: data
                .file
                .clone()
                .unwrap_or_else(|| "<memory>".to_string()),
            span: span.or(data.span),
        }
    }
}

/// Which of the two constructor parameter pools a duplication was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterPool {
    Assisted,
    Provided,
}

impl fmt::Display for ParameterPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterPool::Assisted => f.write_str("assisted"),
            ParameterPool::Provided => f.write_str("provided"),
        }
    }
}

fn join_keys(keys: &[Key]) -> String {
    keys.iter()
        .map(Key::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A terminal, per-candidate rule violation.
///
/// Every variant maps to one stable diagnostic code and carries the location
/// the diagnostic should be reported against. One candidate produces at most
/// one of these per round.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("assisted factory `{factory}` must be nested inside the class it creates")]
    FactoryNotEnclosed { factory: String, location: Location },

    #[error("type `{ty}` takes part in assisted injection and must not be private")]
    PrivateType { ty: String, location: Location },

    #[error("nested type `{ty}` must be static to take part in assisted injection")]
    NestedTypeNotStatic { ty: String, location: Location },

    #[error("type `{ty}` has no constructor annotated with @{marker}")]
    NoMarkedConstructor {
        ty: String,
        marker: String,
        location: Location,
    },

    #[error("type `{ty}` has {count} constructors annotated with @{marker}; exactly one is allowed")]
    AmbiguousConstructor {
        ty: String,
        marker: String,
        count: usize,
        location: Location,
    },

    #[error("the @{marker} constructor of `{ty}` must not be private")]
    PrivateConstructor {
        ty: String,
        marker: String,
        location: Location,
    },

    #[error("type `{ty}` declares no nested type annotated with @{marker}")]
    NoFactoryInterface {
        ty: String,
        marker: String,
        location: Location,
    },

    #[error("type `{ty}` declares {count} nested types annotated with @{marker}; exactly one is allowed")]
    AmbiguousFactoryInterface {
        ty: String,
        marker: String,
        count: usize,
        location: Location,
    },

    #[error("assisted factory `{factory}` must be an interface")]
    FactoryNotInterface { factory: String, location: Location },

    #[error("assisted factory `{factory}` must not be private")]
    PrivateFactory { factory: String, location: Location },

    #[error("factory interface `{factory}` declares no abstract factory method")]
    NoFactoryMethod { factory: String, location: Location },

    #[error("factory interface `{factory}` declares {count} abstract methods; exactly one factory method is allowed")]
    AmbiguousFactoryMethod {
        factory: String,
        count: usize,
        location: Location,
    },

    #[error("the constructor of `{ty}` requires at least one @{marker} parameter")]
    NoAssistedParameters {
        ty: String,
        marker: String,
        location: Location,
    },

    #[error("the constructor of `{ty}` requires at least one provided (non-@{marker}) parameter")]
    NoProvidedParameters {
        ty: String,
        marker: String,
        location: Location,
    },

    #[error("{pool} parameters of `{ty}` share a key; add qualifiers to tell them apart: {}", join_keys(.keys))]
    DuplicateKeys {
        ty: String,
        pool: ParameterPool,
        keys: Vec<Key>,
        location: Location,
    },

    #[error("factory method `{method}` does not match the assisted parameters of `{ty}`: missing [{}], unknown [{}]", join_keys(.missing), join_keys(.unknown))]
    KeyMismatch {
        ty: String,
        method: String,
        missing: Vec<Key>,
        unknown: Vec<Key>,
        location: Location,
    },

    #[error("factory method `{method}` must return `{expected}`, found `{found}`")]
    FactoryReturnType {
        method: String,
        expected: TypeRef,
        found: TypeRef,
        location: Location,
    },
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::FactoryNotEnclosed { .. } => ASSISTED_FACTORY_NOT_NESTED,
            Self::PrivateType { .. } => ASSISTED_TYPE_PRIVATE,
            Self::NestedTypeNotStatic { .. } => ASSISTED_TYPE_NOT_STATIC,
            Self::NoMarkedConstructor { .. } => ASSISTED_NO_CONSTRUCTOR,
            Self::AmbiguousConstructor { .. } => ASSISTED_AMBIGUOUS_CONSTRUCTOR,
            Self::PrivateConstructor { .. } => ASSISTED_CONSTRUCTOR_PRIVATE,
            Self::NoFactoryInterface { .. } => ASSISTED_NO_FACTORY,
            Self::AmbiguousFactoryInterface { .. } => ASSISTED_AMBIGUOUS_FACTORY,
            Self::FactoryNotInterface { .. } => ASSISTED_FACTORY_NOT_INTERFACE,
            Self::PrivateFactory { .. } => ASSISTED_FACTORY_PRIVATE,
            Self::NoFactoryMethod { .. } => ASSISTED_NO_FACTORY_METHOD,
            Self::AmbiguousFactoryMethod { .. } => ASSISTED_AMBIGUOUS_FACTORY_METHOD,
            Self::NoAssistedParameters { .. } => ASSISTED_NO_ASSISTED_PARAMS,
            Self::NoProvidedParameters { .. } => ASSISTED_NO_PROVIDED_PARAMS,
            Self::DuplicateKeys { .. } => ASSISTED_DUPLICATE_KEYS,
            Self::KeyMismatch { .. } => ASSISTED_KEY_MISMATCH,
            Self::FactoryReturnType { .. } => ASSISTED_FACTORY_RETURN_TYPE,
        }
    }

    pub fn location(&self) -> &Location {
        match self {
            Self::FactoryNotEnclosed { location, .. }
            | Self::PrivateType { location, .. }
            | Self::NestedTypeNotStatic { location, .. }
            | Self::NoMarkedConstructor { location, .. }
            | Self::AmbiguousConstructor { location, .. }
            | Self::PrivateConstructor { location, .. }
            | Self::NoFactoryInterface { location, .. }
            | Self::AmbiguousFactoryInterface { location, .. }
            | Self::FactoryNotInterface { location, .. }
            | Self::PrivateFactory { location, .. }
            | Self::NoFactoryMethod { location, .. }
            | Self::AmbiguousFactoryMethod { location, .. }
            | Self::NoAssistedParameters { location, .. }
            | Self::NoProvidedParameters { location, .. }
            | Self::DuplicateKeys { location, .. }
            | Self::KeyMismatch { location, .. }
            | Self::FactoryReturnType { location, .. } => location,
        }
    }

    pub fn to_diagnostic(&self) -> FileDiagnostic {
        let location = self.location();
        FileDiagnostic::new(
            location.file.clone(),
            Diagnostic::error(self.code(), self.to_string(), location.span),
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn mismatch_message_renders_both_lists_even_when_one_is_empty() {
        let err = ValidationError::KeyMismatch {
            ty: "Widget".into(),
            method: "create".into(),
            missing: vec![Key::new("int")],
            unknown: Vec::new(),
            location: Location::new("Widget.java", None),
        };
        assert_eq!(
            err.to_string(),
            "factory method `create` does not match the assisted parameters of `Widget`: missing [int], unknown []"
        );
        assert_eq!(err.code(), ASSISTED_KEY_MISMATCH);
    }

    #[test]
    fn duplicate_message_lists_every_offending_key() {
        let err = ValidationError::DuplicateKeys {
            ty: "Widget".into(),
            pool: ParameterPool::Provided,
            keys: vec![Key::new("Logger"), Key::new("int")],
            location: Location::new("Widget.java", None),
        };
        let message = err.to_string();
        assert!(message.contains("provided parameters"), "{message}");
        assert!(message.contains("Logger, int"), "{message}");
    }

    #[test]
    fn diagnostics_carry_code_and_location() {
        let err = ValidationError::PrivateType {
            ty: "Widget".into(),
            location: Location::new("Widget.java", Some(rivet_types::Span::new(3, 9))),
        };
        let diag = err.to_diagnostic();
        assert_eq!(diag.file, "Widget.java");
        assert_eq!(diag.diagnostic.code, ASSISTED_TYPE_PRIVATE);
        assert_eq!(diag.diagnostic.span, Some(rivet_types::Span::new(3, 9)));
    }
}
