//! Type resolution: schema node → type expression.
//!
//! Inline shapes (scalars, arrays, maps) come back as expressions. Structs,
//! enums and unions are queued with the scheduler and come back as their
//! type name. `$ref`s whose derived name is already queued or finalized
//! short-circuit to that name, which is what terminates reference cycles.

use crate::classify::{Shape, classify};
use crate::error::{Result, TypegenError};
use crate::generator::TypeGenerator;
use crate::naming::{definition_type_name, fqn_to_type_name, is_normalized, normalize_type_name};
use crate::registry::reference_path;
use crate::schema::{DEFINITIONS_PREFIX, Items, SchemaNode};

/// Escape type for shapes that cannot be mapped.
pub const ANY: &str = "any";
pub const DATE: &str = "Date";

impl TypeGenerator {
    /// Resolve a registered definition by its (normalized) type name.
    pub fn resolve(&mut self, type_name: &str) -> Result<String> {
        let schema = self
            .registry
            .get(type_name)
            .ok_or_else(|| TypegenError::UnknownType {
                type_name: type_name.to_string(),
            })?;
        self.resolve_schema(type_name, &schema, None)
    }

    /// Resolve `schema` under `type_name`. `fqn` defaults to the type name
    /// and is only used for exclusion checks, docs and nested naming.
    ///
    /// Returns the type expression, which is not always `type_name`.
    pub fn resolve_schema(
        &mut self,
        type_name: &str,
        schema: &SchemaNode,
        fqn: Option<&str>,
    ) -> Result<String> {
        // callers expect a type named `type_name`, so it can't be changed
        // here; just verify it
        if !is_normalized(type_name) {
            return Err(TypegenError::NameNotNormalized {
                type_name: type_name.to_string(),
                expected: normalize_type_name(type_name),
            });
        }
        // a pure alias takes the name derived from its target, which may be
        // `type_name` itself, so only anchor names that declare something
        if schema.ref_.is_some() {
            return self.resolve_node(type_name, schema, fqn.unwrap_or(type_name));
        }
        self.in_flight.push(type_name.to_string());
        let resolved = self.resolve_node(type_name, schema, fqn.unwrap_or(type_name));
        self.in_flight.pop();
        resolved
    }

    /// Resolve every registered definition in registration order, each under
    /// the same name a `$ref` to it would derive. Returns the resolved
    /// expressions.
    pub fn resolve_all(&mut self) -> Result<Vec<String>> {
        let names: Vec<String> = self.registry.names().map(str::to_string).collect();
        let mut out = Vec::with_capacity(names.len());
        for name in names {
            let Some(schema) = self.registry.get(&name) else { continue };
            out.push(self.resolve_schema(&definition_type_name(&name), &schema, Some(&name))?);
        }
        Ok(out)
    }

    pub(crate) fn resolve_node(
        &mut self,
        type_name: &str,
        schema: &SchemaNode,
        fqn: &str,
    ) -> Result<String> {
        let fqn = fqn.strip_prefix(DEFINITIONS_PREFIX).unwrap_or(fqn);
        if self.is_excluded(fqn) {
            return Err(TypegenError::TypeExcluded {
                fqn: fqn.to_string(),
            });
        }

        let shape = classify(schema);
        tracing::trace!(type_name, fqn, ?shape, "classified");

        match shape {
            Shape::Ref(reference) => self.type_for_ref(reference),
            Shape::Union(branches) => self.emit_union(type_name, schema, fqn, branches),
            Shape::Date => Ok(DATE.to_string()),
            Shape::Boolean => Ok("boolean".to_string()),
            Shape::Array(items) => {
                let item = self.type_for_array(type_name, fqn, items)?;
                Ok(format!("{item}[]"))
            }
            Shape::Any | Shape::Fallback => Ok(ANY.to_string()),
            Shape::Numeric => Ok("number".to_string()),
            Shape::EnumString => self.emit_enum(type_name, schema, fqn),
            Shape::PlainString => Ok("string".to_string()),
            Shape::Map(values) => {
                let value = self.type_for_property(type_name, fqn, values)?;
                Ok(format!("{{ [key: string]: {value} }}"))
            }
            Shape::Struct(properties) => self.emit_struct(type_name, schema, properties, fqn),
        }
    }

    /// Resolve a nested node. Its type name is synthesized from `name_seed`,
    /// a dotted path such as `Parent.child`.
    pub(crate) fn type_for_property(
        &mut self,
        name_seed: &str,
        fqn: &str,
        schema: &SchemaNode,
    ) -> Result<String> {
        let type_name = fqn_to_type_name(name_seed);
        self.resolve_node(&type_name, schema, fqn)
    }

    fn type_for_array(&mut self, type_name: &str, fqn: &str, items: Option<&Items>) -> Result<String> {
        match items {
            Some(Items::Single(item)) => self.type_for_property(type_name, fqn, item),
            Some(Items::Tuple(_)) => Err(TypegenError::unsupported_array(fqn, "tuple-typed items")),
            Some(Items::Bool(_)) => Err(TypegenError::unsupported_array(fqn, "boolean items")),
            None => Err(TypegenError::unsupported_array(fqn, "missing items")),
        }
    }

    fn type_for_ref(&mut self, reference: &str) -> Result<String> {
        let path = reference_path(reference)?;

        // references may cross exclusion boundaries; degrade instead of failing
        if self.is_excluded(path) || self.is_excluded(reference) {
            tracing::warn!(reference, "reference to excluded type, using `any`");
            return Ok(ANY.to_string());
        }

        let type_name = definition_type_name(path);

        if self.scheduler.is_known(&type_name) {
            tracing::trace!(reference, type_name, "reusing queued type");
            return Ok(type_name);
        }

        // a cycle through references alone (aliases, self-nesting arrays) has
        // no declaration to anchor it
        if self.in_flight.contains(&type_name) {
            tracing::warn!(reference, type_name, "recursive reference without a declaration, using `any`");
            return Ok(ANY.to_string());
        }

        let schema = self.registry.resolve_ref(reference)?;
        self.in_flight.push(type_name.clone());
        let resolved = self.resolve_node(&type_name, &schema, path);
        self.in_flight.pop();
        resolved
    }
}
