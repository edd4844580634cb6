use std::collections::BTreeSet;

use rivet_model::SymbolModel;
use rivet_types::TypeId;

use crate::config::MarkerSet;
use crate::error::{Location, ValidationError};

/// Scans the universe for the candidate set of one processing round.
///
/// Factory-marker sites contribute their enclosing class-like type; sites
/// with no class-like encloser produce a per-site error without stopping
/// collection. Constructor-marker sites contribute their declaring type
/// directly. The union is deduplicated by type identity and returned in id
/// order so rounds are deterministic.
pub(crate) fn collect_candidates(
    model: &dyn SymbolModel,
    markers: &MarkerSet,
) -> (Vec<TypeId>, Vec<ValidationError>) {
    let mut candidates = BTreeSet::new();
    let mut errors = Vec::new();

    for site in model.types_with_annotation(&markers.factory) {
        let encloser = model.enclosing_type(site);
        match encloser {
            Some(parent) if model.type_data(parent).kind.is_class_like() => {
                candidates.insert(parent);
            }
            _ => {
                let data = model.type_data(site);
                errors.push(ValidationError::FactoryNotEnclosed {
                    factory: data.name.clone(),
                    location: Location::of_type(data),
                });
            }
        }
    }

    for ty in model.types_with_constructor_annotation(&markers.constructor) {
        candidates.insert(ty);
    }

    (candidates.into_iter().collect(), errors)
}
