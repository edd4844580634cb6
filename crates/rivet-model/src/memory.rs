//! Simple in-memory symbol model for unit tests and embedders.

use std::collections::HashMap;

use rivet_types::TypeId;

use crate::{SymbolModel, TypeData};

#[derive(Debug, Default)]
pub struct MemoryModel {
    types: Vec<TypeData>,
    enclosing: HashMap<TypeId, TypeId>,
}

impl MemoryModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a top-level type declaration.
    pub fn add_type(&mut self, data: TypeData) -> TypeId {
        let id = TypeId::from_raw(self.types.len() as u32);
        self.types.push(data);
        id
    }

    /// Registers `data` as a type nested directly inside `parent`, wiring the
    /// enclosing/enclosed linkage both ways.
    pub fn add_nested_type(&mut self, parent: TypeId, data: TypeData) -> TypeId {
        let id = self.add_type(data);
        self.enclosing.insert(id, parent);
        self.types[parent.to_raw() as usize].nested.push(id);
        id
    }
}

impl SymbolModel for MemoryModel {
    fn types_with_annotation(&self, marker: &str) -> Vec<TypeId> {
        self.types
            .iter()
            .enumerate()
            .filter(|(_, data)| data.has_annotation(marker))
            .map(|(idx, _)| TypeId::from_raw(idx as u32))
            .collect()
    }

    fn types_with_constructor_annotation(&self, marker: &str) -> Vec<TypeId> {
        self.types
            .iter()
            .enumerate()
            .filter(|(_, data)| data.constructors.iter().any(|c| c.has_annotation(marker)))
            .map(|(idx, _)| TypeId::from_raw(idx as u32))
            .collect()
    }

    fn type_data(&self, id: TypeId) -> &TypeData {
        self.types
            .get(id.to_raw() as usize)
            .expect("unknown TypeId passed to model.type_data()")
    }

    fn enclosing_type(&self, id: TypeId) -> Option<TypeId> {
        self.enclosing.get(&id).copied()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{Annotation, ConstructorData, ParameterData, TypeData};

    use super::*;

    #[test]
    fn nesting_links_both_directions() {
        let mut model = MemoryModel::new();
        let outer = model.add_type(TypeData::class("Outer"));
        let inner = model.add_nested_type(outer, TypeData::interface("Inner"));

        assert_eq!(model.enclosing_type(inner), Some(outer));
        assert_eq!(model.enclosing_type(outer), None);
        assert_eq!(model.type_data(outer).nested, vec![inner]);
    }

    #[test]
    fn marker_membership_queries() {
        let mut model = MemoryModel::new();
        let plain = model.add_type(TypeData::class("Plain"));
        let marked =
            model.add_type(TypeData::interface("Marked").annotated(Annotation::new("AssistedFactory")));
        let with_ctor = {
            let mut data = TypeData::class("WithCtor");
            data.constructors.push(
                ConstructorData::new(vec![ParameterData::new("id", "int")])
                    .annotated(Annotation::new("AssistedInject")),
            );
            model.add_type(data)
        };

        assert_eq!(model.types_with_annotation("AssistedFactory"), vec![marked]);
        assert_eq!(
            model.types_with_constructor_annotation("AssistedInject"),
            vec![with_ctor]
        );
        assert!(model
            .types_with_annotation("AssistedInject")
            .iter()
            .all(|id| *id != plain));
    }

    #[test]
    fn qualified_annotation_answers_simple_query() {
        let mut model = MemoryModel::new();
        let id = model.add_type(
            TypeData::interface("Factory").annotated(Annotation::new("dagger.assisted.AssistedFactory")),
        );
        assert_eq!(model.types_with_annotation("AssistedFactory"), vec![id]);
    }
}
