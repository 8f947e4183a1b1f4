//! Dispatch classification.
//!
//! [`classify`] maps a schema node to exactly one [`Shape`]. Rules are tried
//! in this order, first match wins:
//!
//! 1. `$ref`
//! 2. `oneOf`/`anyOf` whose branches are all primitive
//! 3. `string` + `format: date-time`
//! 4. `boolean`
//! 5. `array`
//! 6. `any` / `null`
//! 7. `number` / `integer`
//! 8. `string` (enum when every member is a string)
//! 9. no `properties` + schema-valued `additionalProperties` (map)
//! 10. `properties` (struct)
//! 11. anything else
//!
//! Structural rules outrank a missing `type`: an untyped node with
//! `properties` is still a struct.

use indexmap::IndexMap;

use crate::schema::{AdditionalProperties, Items, SchemaNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    String,
    Number, // `integer` folds in here
    Boolean,
}

impl Primitive {
    pub fn from_type(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "number" | "integer" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            _ => None,
        }
    }

    pub fn type_expr(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }

    pub fn factory_name(self) -> &'static str {
        match self {
            Self::String => "fromString",
            Self::Number => "fromNumber",
            Self::Boolean => "fromBoolean",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape<'a> {
    Ref(&'a str),
    Union(Vec<Primitive>),
    Date,
    Boolean,
    Array(Option<&'a Items>),
    Any,
    Numeric,
    EnumString,
    PlainString,
    Map(&'a SchemaNode),
    Struct(&'a IndexMap<String, SchemaNode>),
    Fallback,
}

pub fn classify(schema: &SchemaNode) -> Shape<'_> {
    if let Some(reference) = &schema.ref_ {
        return Shape::Ref(reference);
    }

    // a union hint we cannot represent is ignored, not fatal
    if let Some(branches) = union_primitives(schema) {
        return Shape::Union(branches);
    }

    let ty = schema.single_type();
    if ty == Some("string") && schema.format.as_deref() == Some("date-time") {
        return Shape::Date;
    }

    match ty {
        Some("boolean") => return Shape::Boolean,
        Some("array") => return Shape::Array(schema.items.as_ref()),
        Some("any") | Some("null") => return Shape::Any,
        Some("number") | Some("integer") => return Shape::Numeric,
        Some("string") => {
            return if is_string_enum(schema) {
                Shape::EnumString
            } else {
                Shape::PlainString
            };
        }
        _ => {}
    }

    if schema.properties.is_none() {
        if let Some(AdditionalProperties::Schema(values)) = &schema.additional_properties {
            return Shape::Map(values);
        }
    }

    match &schema.properties {
        Some(props) => Shape::Struct(props),
        None => Shape::Fallback,
    }
}

/// Distinct primitive branches, or `None` if any branch is not primitive.
fn union_primitives(schema: &SchemaNode) -> Option<Vec<Primitive>> {
    let branches = schema.union_branches()?;
    if branches.is_empty() {
        return None;
    }
    let mut out = Vec::new();
    for branch in branches {
        let primitive = branch.single_type().and_then(Primitive::from_type)?;
        if !out.contains(&primitive) {
            out.push(primitive);
        }
    }
    Some(out)
}

fn is_string_enum(schema: &SchemaNode) -> bool {
    schema
        .enum_
        .as_ref()
        .is_some_and(|values| !values.is_empty() && values.iter().all(|v| v.is_string()))
}
