//! Name → schema table used to resolve `$ref`s.
//!
//! Registering a name twice overwrites the first entry. Aliasing relies on
//! this: `alias(from, to)` simply redefines `from` as a reference to `to`.

use std::rc::Rc;

use indexmap::IndexMap;

use crate::error::{Result, TypegenError};
use crate::schema::{DEFINITIONS_PREFIX, SchemaNode};

#[derive(Debug, Default, Clone)]
pub struct DefinitionRegistry {
    definitions: IndexMap<String, Rc<SchemaNode>>, // first-definition order
}

impl DefinitionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last write wins. The schema is not validated until it is resolved.
    pub fn define(&mut self, name: impl Into<String>, schema: SchemaNode) {
        self.definitions.insert(name.into(), Rc::new(schema));
    }

    /// Make `from` resolve exactly like `to`.
    pub fn alias(&mut self, from: impl Into<String>, to: &str) {
        self.define(from, SchemaNode::reference(to));
    }

    pub fn get(&self, name: &str) -> Option<Rc<SchemaNode>> {
        self.definitions.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Registered names, in the order they were first defined.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Look up the target of a local `#/definitions/<name>` pointer.
    pub fn resolve_ref(&self, reference: &str) -> Result<Rc<SchemaNode>> {
        let lookup = reference_path(reference)?;
        self.get(lookup)
            .ok_or_else(|| TypegenError::UnresolvedReference {
                reference: lookup.to_string(),
            })
    }
}

/// Strip the local reference prefix, rejecting anything non-local.
pub fn reference_path(reference: &str) -> Result<&str> {
    reference
        .strip_prefix(DEFINITIONS_PREFIX)
        .ok_or_else(|| TypegenError::InvalidReferenceFormat {
            reference: reference.to_string(),
        })
}
