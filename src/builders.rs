//! Declaration builders for structs, enums and unions.
//!
//! Each builder reserves its name with the scheduler *before* resolving any
//! member types, then fills in the finished work item. If the name is
//! already reserved the existing declaration wins and the name is returned.
//! A failed build drops its reservation together with everything queued
//! while it ran.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::classify::Primitive;
use crate::decl::{Declaration, EnumDecl, EnumMember, FieldDecl, StructDecl, UnionDecl};
use crate::docs::build_doc;
use crate::error::{Result, TypegenError};
use crate::generator::TypeGenerator;
use crate::naming::{camel_case, enum_member_name};
use crate::schema::SchemaNode;

/// Properties with this prefix are vendor extensions and never emitted.
const EXTENSION_PREFIX: &str = "x-";

impl TypeGenerator {
    pub(crate) fn emit_struct(
        &mut self,
        type_name: &str,
        schema: &SchemaNode,
        properties: &IndexMap<String, SchemaNode>,
        fqn: &str,
    ) -> Result<String> {
        self.emit_declaration(type_name, |tg| {
            let mut fields = Vec::with_capacity(properties.len());
            for (raw_name, prop) in properties {
                if raw_name.starts_with(EXTENSION_PREFIX) {
                    continue;
                }
                let name = field_name(raw_name);
                let doc = build_doc(
                    &format!("{fqn}#{raw_name}"),
                    prop.description.as_deref(),
                    IndexMap::new(),
                );
                let nested = format!("{fqn}.{name}");
                let type_expr = tg.type_for_property(&nested, &nested, prop)?;
                fields.push(FieldDecl {
                    name,
                    type_expr,
                    optional: !schema.is_required(raw_name),
                    doc,
                });
            }
            Ok(Declaration::Struct(StructDecl {
                name: type_name.to_string(),
                doc: build_doc(fqn, schema.description.as_deref(), IndexMap::new()),
                fields,
            }))
        })
    }

    pub(crate) fn emit_enum(&mut self, type_name: &str, schema: &SchemaNode, fqn: &str) -> Result<String> {
        self.emit_declaration(type_name, |_| {
            let members = enum_members(type_name, schema)?;
            Ok(Declaration::Enum(EnumDecl {
                name: type_name.to_string(),
                doc: build_doc(fqn, schema.description.as_deref(), IndexMap::new()),
                members,
            }))
        })
    }

    pub(crate) fn emit_union(
        &mut self,
        type_name: &str,
        schema: &SchemaNode,
        fqn: &str,
        branches: Vec<Primitive>,
    ) -> Result<String> {
        self.emit_declaration(type_name, |_| {
            Ok(Declaration::Union(UnionDecl {
                name: type_name.to_string(),
                doc: build_doc(fqn, schema.description.as_deref(), IndexMap::new()),
                branches,
            }))
        })
    }

    fn emit_declaration(
        &mut self,
        type_name: &str,
        build: impl FnOnce(&mut Self) -> Result<Declaration>,
    ) -> Result<String> {
        let checkpoint = self.scheduler.checkpoint();
        if !self.scheduler.reserve(type_name) {
            tracing::trace!(type_name, "declaration already queued");
            return Ok(type_name.to_string());
        }
        match build(self) {
            Ok(decl) => {
                tracing::debug!(type_name, "queued declaration");
                self.scheduler.fill(type_name, decl);
                Ok(type_name.to_string())
            }
            Err(err) => {
                // nested declarations may point back at `type_name`
                let dropped = self.scheduler.rollback(checkpoint);
                tracing::debug!(type_name, dropped, "dropped declarations of a failed build");
                Err(err)
            }
        }
    }
}

/// Emitted field identifier. Capitalized names are camel-cased and a
/// leading `$` is dropped; anything else passes through untouched.
fn field_name(raw: &str) -> String {
    let name = if raw.starts_with(|c: char| c.is_uppercase()) {
        camel_case(raw)
    } else {
        raw.to_string()
    };
    match name.strip_prefix('$') {
        Some(stripped) => stripped.to_string(),
        None => name,
    }
}

fn enum_members(type_name: &str, schema: &SchemaNode) -> Result<Vec<EnumMember>> {
    let values = match schema.enum_.as_deref() {
        Some(values) if !values.is_empty() => values,
        _ => {
            return Err(TypegenError::InvalidEnumSchema {
                type_name: type_name.to_string(),
                reason: "missing or empty `enum`".to_string(),
            });
        }
    };
    if schema.single_type() != Some("string") {
        return Err(TypegenError::InvalidEnumSchema {
            type_name: type_name.to_string(),
            reason: "can only generate string enums".to_string(),
        });
    }

    let mut members: Vec<EnumMember> = Vec::with_capacity(values.len());
    let mut taken: HashSet<String> = HashSet::new();
    for value in values {
        let Some(literal) = value.as_str() else {
            return Err(TypegenError::NonStringEnumValue {
                type_name: type_name.to_string(),
                value: value.to_string(),
            });
        };
        if members.iter().any(|m| m.value == literal) {
            continue;
        }
        let base = enum_member_name(literal);
        let mut name = base.clone();
        let mut suffix = 2;
        while taken.contains(&name) {
            name = format!("{base}_{suffix}");
            suffix += 1;
        }
        if name != base {
            tracing::warn!(type_name, literal, member = %name, "enum member name collision, renamed");
        }
        taken.insert(name.clone());
        members.push(EnumMember {
            name,
            value: literal.to_string(),
        });
    }
    Ok(members)
}
