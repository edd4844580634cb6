use rivet_model::{ParameterData, TypeRef};
use rivet_types::Span;

use crate::key::{Key, QualifierRef};

/// A classified formal parameter: assisted or provided, with its matching
/// [`Key`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub key: Key,
    pub assisted: bool,
    pub span: Option<Span>,
}

impl Parameter {
    pub fn ty(&self) -> &TypeRef {
        &self.key.ty
    }

    pub fn qualifier(&self) -> Option<&QualifierRef> {
        self.key.qualifier.as_ref()
    }
}

/// Classifies a single formal parameter.
///
/// A parameter is assisted iff it carries `assisted_marker`. Its qualifier is
/// the first annotation that is not the marker; further annotations are
/// ignored (at most one qualifier per parameter is assumed upstream).
pub fn classify(param: &ParameterData, assisted_marker: &str) -> Parameter {
    let assisted = param.has_annotation(assisted_marker);
    let qualifier = param
        .annotations
        .iter()
        .find(|a| !a.matches(assisted_marker))
        .map(QualifierRef::from_annotation);

    Parameter {
        name: param.name.clone(),
        key: Key {
            ty: param.ty.clone(),
            qualifier,
        },
        assisted,
        span: param.span,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rivet_model::Annotation;

    use super::*;

    const MARKER: &str = "Assisted";

    #[test]
    fn unannotated_parameter_is_provided() {
        let param = classify(&ParameterData::new("logger", "Logger"), MARKER);
        assert!(!param.assisted);
        assert_eq!(param.key, Key::new("Logger"));
        assert_eq!(param.name, "logger");
    }

    #[test]
    fn marker_makes_parameter_assisted_without_becoming_a_qualifier() {
        let param = classify(
            &ParameterData::new("id", "int").annotated(Annotation::new(MARKER)),
            MARKER,
        );
        assert!(param.assisted);
        assert_eq!(param.qualifier(), None);
    }

    #[test]
    fn first_non_marker_annotation_is_the_qualifier() {
        let param = classify(
            &ParameterData::new("side", "Logger")
                .annotated(Annotation::with_value("Named", "\"side\""))
                .annotated(Annotation::new("Nullable")),
            MARKER,
        );
        let qualifier = param.qualifier().expect("qualifier");
        assert_eq!(qualifier.name, "Named");
        assert_eq!(qualifier.value.as_deref(), Some("\"side\""));
    }

    #[test]
    fn marker_and_qualifier_combine_on_assisted_parameters() {
        let param = classify(
            &ParameterData::new("label", "String")
                .annotated(Annotation::new(MARKER))
                .annotated(Annotation::with_value("Named", "\"label\"")),
            MARKER,
        );
        assert!(param.assisted);
        assert!(param.qualifier().is_some());
    }
}
