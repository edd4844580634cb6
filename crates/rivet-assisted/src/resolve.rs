use rivet_model::{ConstructorData, MethodData, SymbolModel, TypeKind, Visibility};
use rivet_types::TypeId;

use crate::config::MarkerSet;
use crate::error::{Location, ValidationError};

/// Finds the single eligible constructor of `candidate`.
///
/// Checks, in order: the candidate is not private; a nested candidate is
/// static; exactly one constructor carries the constructor marker; that
/// constructor is not private.
pub(crate) fn resolve_constructor<'m>(
    model: &'m dyn SymbolModel,
    candidate: TypeId,
    markers: &MarkerSet,
) -> Result<&'m ConstructorData, ValidationError> {
    let data = model.type_data(candidate);

    if data.modifiers.is_private() {
        return Err(ValidationError::PrivateType {
            ty: data.name.clone(),
            location: Location::of_type(data),
        });
    }

    if model.enclosing_type(candidate).is_some() && !data.modifiers.is_static {
        return Err(ValidationError::NestedTypeNotStatic {
            ty: data.name.clone(),
            location: Location::of_type(data),
        });
    }

    let marked: Vec<&ConstructorData> = data
        .constructors
        .iter()
        .filter(|c| c.has_annotation(&markers.constructor))
        .collect();

    let ctor = match marked.as_slice() {
        [] => {
            return Err(ValidationError::NoMarkedConstructor {
                ty: data.name.clone(),
                marker: markers.constructor.clone(),
                location: Location::of_type(data),
            })
        }
        [single] => *single,
        _ => {
            return Err(ValidationError::AmbiguousConstructor {
                ty: data.name.clone(),
                marker: markers.constructor.clone(),
                count: marked.len(),
                location: Location::of_type(data),
            })
        }
    };

    if ctor.visibility == Visibility::Private {
        return Err(ValidationError::PrivateConstructor {
            ty: data.name.clone(),
            marker: markers.constructor.clone(),
            location: Location::of_member(data, ctor.span),
        });
    }

    Ok(ctor)
}

/// Finds the single eligible factory interface nested in `candidate` and its
/// single abstract method.
///
/// `default`, `static`, and `private` interface methods are implementation
/// details, never factory methods. Return-type compatibility is not checked
/// here; see `ProcessorConfig::check_factory_return_type`.
pub(crate) fn resolve_factory<'m>(
    model: &'m dyn SymbolModel,
    candidate: TypeId,
    markers: &MarkerSet,
) -> Result<(TypeId, &'m MethodData), ValidationError> {
    let data = model.type_data(candidate);

    let factories: Vec<TypeId> = data
        .nested
        .iter()
        .copied()
        .filter(|id| model.type_data(*id).has_annotation(&markers.factory))
        .collect();

    let factory_id = match factories.as_slice() {
        [] => {
            return Err(ValidationError::NoFactoryInterface {
                ty: data.name.clone(),
                marker: markers.factory.clone(),
                location: Location::of_type(data),
            })
        }
        [single] => *single,
        _ => {
            return Err(ValidationError::AmbiguousFactoryInterface {
                ty: data.name.clone(),
                marker: markers.factory.clone(),
                count: factories.len(),
                location: Location::of_type(data),
            })
        }
    };

    let factory = model.type_data(factory_id);

    if factory.kind != TypeKind::Interface {
        return Err(ValidationError::FactoryNotInterface {
            factory: factory.name.clone(),
            location: Location::of_type(factory),
        });
    }

    if factory.modifiers.is_private() {
        return Err(ValidationError::PrivateFactory {
            factory: factory.name.clone(),
            location: Location::of_type(factory),
        });
    }

    let abstracts: Vec<&MethodData> = factory.methods.iter().filter(|m| m.is_abstract()).collect();

    match abstracts.as_slice() {
        [] => Err(ValidationError::NoFactoryMethod {
            factory: factory.name.clone(),
            location: Location::of_type(factory),
        }),
        [method] => Ok((factory_id, *method)),
        _ => Err(ValidationError::AmbiguousFactoryMethod {
            factory: factory.name.clone(),
            count: abstracts.len(),
            location: Location::of_type(factory),
        }),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rivet_model::{
        Annotation, ConstructorData, MemoryModel, MethodData, ParameterData, TypeData, Visibility,
    };

    use crate::error::{
        ASSISTED_AMBIGUOUS_CONSTRUCTOR, ASSISTED_AMBIGUOUS_FACTORY_METHOD,
        ASSISTED_CONSTRUCTOR_PRIVATE, ASSISTED_FACTORY_NOT_INTERFACE, ASSISTED_NO_CONSTRUCTOR,
        ASSISTED_NO_FACTORY, ASSISTED_NO_FACTORY_METHOD, ASSISTED_TYPE_NOT_STATIC,
        ASSISTED_TYPE_PRIVATE,
    };

    use super::*;

    fn markers() -> MarkerSet {
        MarkerSet::default()
    }

    fn marked_ctor(params: Vec<ParameterData>) -> ConstructorData {
        ConstructorData::new(params).annotated(Annotation::new("AssistedInject"))
    }

    #[test]
    fn private_candidate_is_rejected_before_constructor_lookup() {
        let mut model = MemoryModel::new();
        let id = {
            let mut data = TypeData::class("Hidden");
            data.modifiers.visibility = Visibility::Private;
            data.constructors.push(marked_ctor(Vec::new()));
            model.add_type(data)
        };

        let err = resolve_constructor(&model, id, &markers()).unwrap_err();
        assert_eq!(err.code(), ASSISTED_TYPE_PRIVATE);
    }

    #[test]
    fn non_static_nested_candidate_is_rejected() {
        let mut model = MemoryModel::new();
        let outer = model.add_type(TypeData::class("Outer"));
        let inner = {
            let mut data = TypeData::class("Inner");
            data.constructors.push(marked_ctor(Vec::new()));
            model.add_nested_type(outer, data)
        };

        let err = resolve_constructor(&model, inner, &markers()).unwrap_err();
        assert_eq!(err.code(), ASSISTED_TYPE_NOT_STATIC);
    }

    #[test]
    fn static_nested_candidate_resolves() {
        let mut model = MemoryModel::new();
        let outer = model.add_type(TypeData::class("Outer"));
        let inner = {
            let mut data = TypeData::class("Inner");
            data.modifiers.is_static = true;
            data.constructors.push(marked_ctor(Vec::new()));
            model.add_nested_type(outer, data)
        };

        assert!(resolve_constructor(&model, inner, &markers()).is_ok());
    }

    #[test]
    fn constructor_cardinality_errors() {
        let mut model = MemoryModel::new();
        let none = model.add_type(TypeData::class("NoCtor"));
        let two = {
            let mut data = TypeData::class("TwoCtors");
            data.constructors.push(marked_ctor(Vec::new()));
            data.constructors
                .push(marked_ctor(vec![ParameterData::new("id", "int")]));
            model.add_type(data)
        };

        assert_eq!(
            resolve_constructor(&model, none, &markers()).unwrap_err().code(),
            ASSISTED_NO_CONSTRUCTOR
        );
        assert_eq!(
            resolve_constructor(&model, two, &markers()).unwrap_err().code(),
            ASSISTED_AMBIGUOUS_CONSTRUCTOR
        );
    }

    #[test]
    fn unmarked_constructors_do_not_disambiguate() {
        let mut model = MemoryModel::new();
        let id = {
            let mut data = TypeData::class("Widget");
            data.constructors.push(ConstructorData::new(Vec::new()));
            data.constructors
                .push(marked_ctor(vec![ParameterData::new("id", "int")]));
            model.add_type(data)
        };

        let ctor = resolve_constructor(&model, id, &markers()).expect("single marked constructor");
        assert_eq!(ctor.params.len(), 1);
    }

    #[test]
    fn private_marked_constructor_is_rejected() {
        let mut model = MemoryModel::new();
        let id = {
            let mut data = TypeData::class("Widget");
            let mut ctor = marked_ctor(Vec::new());
            ctor.visibility = Visibility::Private;
            data.constructors.push(ctor);
            model.add_type(data)
        };

        let err = resolve_constructor(&model, id, &markers()).unwrap_err();
        assert_eq!(err.code(), ASSISTED_CONSTRUCTOR_PRIVATE);
    }

    #[test]
    fn factory_must_exist_and_be_an_interface() {
        let mut model = MemoryModel::new();
        let bare = model.add_type(TypeData::class("Bare"));
        assert_eq!(
            resolve_factory(&model, bare, &markers()).unwrap_err().code(),
            ASSISTED_NO_FACTORY
        );

        let with_class_factory = model.add_type(TypeData::class("Widget"));
        model.add_nested_type(
            with_class_factory,
            TypeData::class("Factory").annotated(Annotation::new("AssistedFactory")),
        );
        assert_eq!(
            resolve_factory(&model, with_class_factory, &markers())
                .unwrap_err()
                .code(),
            ASSISTED_FACTORY_NOT_INTERFACE
        );
    }

    #[test]
    fn default_static_and_private_methods_are_not_factory_methods() {
        let mut model = MemoryModel::new();
        let widget = model.add_type(TypeData::class("Widget"));
        let factory = {
            let mut data = TypeData::interface("Factory").annotated(Annotation::new("AssistedFactory"));
            let mut defaulted = MethodData::new("createDefault", "Widget");
            defaulted.is_default = true;
            let mut statics = MethodData::new("of", "Widget");
            statics.is_static = true;
            let mut helper = MethodData::new("validate", "void");
            helper.visibility = Visibility::Private;
            data.methods.extend([defaulted, statics, helper]);
            data
        };
        model.add_nested_type(widget, factory);

        let err = resolve_factory(&model, widget, &markers()).unwrap_err();
        assert_eq!(err.code(), ASSISTED_NO_FACTORY_METHOD);
    }

    #[test]
    fn two_abstract_methods_are_ambiguous() {
        let mut model = MemoryModel::new();
        let widget = model.add_type(TypeData::class("Widget"));
        let factory = {
            let mut data = TypeData::interface("Factory").annotated(Annotation::new("AssistedFactory"));
            data.methods.push(MethodData::new("create", "Widget"));
            data.methods.push(MethodData::new("createOther", "Widget"));
            data
        };
        model.add_nested_type(widget, factory);

        let err = resolve_factory(&model, widget, &markers()).unwrap_err();
        assert_eq!(err.code(), ASSISTED_AMBIGUOUS_FACTORY_METHOD);
    }
}
