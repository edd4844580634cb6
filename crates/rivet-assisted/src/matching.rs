use std::collections::{HashMap, HashSet};

use crate::config::MarkerSet;
use crate::error::{Location, ParameterPool, ValidationError};
use crate::key::Key;
use crate::param::Parameter;

/// Validates the two parameter pools and the factory-method/constructor key
/// bijection.
///
/// Checks run in a fixed order and the first failure wins; within a single
/// check every offending key is collected before reporting. Key comparison is
/// set-based, so ordering differences between the factory method and the
/// constructor never matter.
pub(crate) fn match_keys(
    ty: &str,
    markers: &MarkerSet,
    ctor_params: &[Parameter],
    method_name: &str,
    method_params: &[Parameter],
    ctor_location: Location,
    method_location: Location,
) -> Result<(), ValidationError> {
    let assisted: Vec<&Parameter> = ctor_params.iter().filter(|p| p.assisted).collect();
    let provided: Vec<&Parameter> = ctor_params.iter().filter(|p| !p.assisted).collect();

    if assisted.is_empty() {
        return Err(ValidationError::NoAssistedParameters {
            ty: ty.to_string(),
            marker: markers.assisted.clone(),
            location: ctor_location,
        });
    }

    if provided.is_empty() {
        return Err(ValidationError::NoProvidedParameters {
            ty: ty.to_string(),
            marker: markers.assisted.clone(),
            location: ctor_location,
        });
    }

    let duplicated = duplicate_keys(&assisted);
    if !duplicated.is_empty() {
        return Err(ValidationError::DuplicateKeys {
            ty: ty.to_string(),
            pool: ParameterPool::Assisted,
            keys: duplicated,
            location: ctor_location,
        });
    }

    let duplicated = duplicate_keys(&provided);
    if !duplicated.is_empty() {
        return Err(ValidationError::DuplicateKeys {
            ty: ty.to_string(),
            pool: ParameterPool::Provided,
            keys: duplicated,
            location: ctor_location,
        });
    }

    let assisted_keys: HashSet<&Key> = assisted.iter().map(|p| &p.key).collect();
    let method_keys: HashSet<&Key> = method_params.iter().map(|p| &p.key).collect();

    // The assisted pool is duplicate-free at this point, so declaration order
    // enumerates each missing key exactly once.
    let missing: Vec<Key> = assisted
        .iter()
        .map(|p| &p.key)
        .filter(|key| !method_keys.contains(*key))
        .map(|key| (*key).clone())
        .collect();

    let mut unknown = Vec::new();
    let mut seen = HashSet::new();
    for param in method_params {
        if !assisted_keys.contains(&param.key) && seen.insert(&param.key) {
            unknown.push(param.key.clone());
        }
    }

    if !missing.is_empty() || !unknown.is_empty() {
        return Err(ValidationError::KeyMismatch {
            ty: ty.to_string(),
            method: method_name.to_string(),
            missing,
            unknown,
            location: method_location,
        });
    }

    Ok(())
}

/// Keys appearing more than once, each listed once, in first-appearance
/// order.
fn duplicate_keys(params: &[&Parameter]) -> Vec<Key> {
    let mut counts: HashMap<&Key, usize> = HashMap::new();
    for param in params {
        *counts.entry(&param.key).or_default() += 1;
    }

    let mut out = Vec::new();
    let mut emitted = HashSet::new();
    for param in params {
        if counts[&param.key] > 1 && emitted.insert(&param.key) {
            out.push(param.key.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::error::{
        ASSISTED_DUPLICATE_KEYS, ASSISTED_KEY_MISMATCH, ASSISTED_NO_ASSISTED_PARAMS,
        ASSISTED_NO_PROVIDED_PARAMS,
    };
    use crate::key::QualifierRef;

    use super::*;

    fn param(name: &str, ty: &str, assisted: bool) -> Parameter {
        Parameter {
            name: name.to_string(),
            key: Key::new(ty),
            assisted,
            span: None,
        }
    }

    fn qualified(name: &str, ty: &str, qualifier: &str, assisted: bool) -> Parameter {
        Parameter {
            name: name.to_string(),
            key: Key::qualified(
                ty,
                QualifierRef {
                    name: "Named".into(),
                    value: Some(qualifier.to_string()),
                },
            ),
            assisted,
            span: None,
        }
    }

    fn run(ctor: &[Parameter], method: &[Parameter]) -> Result<(), ValidationError> {
        match_keys(
            "Widget",
            &MarkerSet::default(),
            ctor,
            "create",
            method,
            Location::new("Widget.java", None),
            Location::new("Widget.java", None),
        )
    }

    #[test]
    fn empty_pools_fail_in_order() {
        let err = run(&[param("logger", "Logger", false)], &[]).unwrap_err();
        assert_eq!(err.code(), ASSISTED_NO_ASSISTED_PARAMS);

        let err = run(&[param("id", "int", true)], &[param("id", "int", false)]).unwrap_err();
        assert_eq!(err.code(), ASSISTED_NO_PROVIDED_PARAMS);
    }

    #[test]
    fn matching_is_order_independent() {
        let ctor = [
            param("id", "int", true),
            param("label", "String", true),
            param("logger", "Logger", false),
        ];
        let method = [param("label", "String", false), param("id", "int", false)];
        assert!(run(&ctor, &method).is_ok());
    }

    #[test]
    fn duplicate_provided_keys_are_reported_and_qualifiers_resolve_them() {
        let ctor = [
            param("id", "int", true),
            param("left", "Logger", false),
            param("right", "Logger", false),
        ];
        let err = run(&ctor, &[param("id", "int", false)]).unwrap_err();
        assert_eq!(err.code(), ASSISTED_DUPLICATE_KEYS);
        match &err {
            ValidationError::DuplicateKeys { pool, keys, .. } => {
                assert_eq!(*pool, ParameterPool::Provided);
                assert_eq!(keys, &vec![Key::new("Logger")]);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let ctor = [
            param("id", "int", true),
            qualified("left", "Logger", "\"left\"", false),
            param("right", "Logger", false),
        ];
        assert!(run(&ctor, &[param("id", "int", false)]).is_ok());
    }

    #[test]
    fn duplicate_assisted_keys_take_precedence_over_provided() {
        let ctor = [
            param("a", "int", true),
            param("b", "int", true),
            param("left", "Logger", false),
            param("right", "Logger", false),
        ];
        let err = run(&ctor, &[param("x", "int", false)]).unwrap_err();
        match err {
            ValidationError::DuplicateKeys { pool, .. } => {
                assert_eq!(pool, ParameterPool::Assisted);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn mismatch_reports_missing_and_unknown_together() {
        let ctor = [
            param("a", "int", true),
            param("b", "String", true),
            param("logger", "Logger", false),
        ];
        let method = [param("a", "int", false), param("c", "long", false)];
        let err = run(&ctor, &method).unwrap_err();
        assert_eq!(err.code(), ASSISTED_KEY_MISMATCH);
        match err {
            ValidationError::KeyMismatch {
                missing, unknown, ..
            } => {
                assert_eq!(missing, vec![Key::new("String")]);
                assert_eq!(unknown, vec![Key::new("long")]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn same_key_in_both_pools_is_legal() {
        let ctor = [param("id", "int", true), param("count", "int", false)];
        assert!(run(&ctor, &[param("id", "int", false)]).is_ok());
    }
}
