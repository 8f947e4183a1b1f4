// Schema IR as read from a JSON Schema document. Only the keywords that
// influence typing are modeled; everything else is ignored on load.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Prefix every supported `$ref` must carry.
pub const DEFINITIONS_PREFIX: &str = "#/definitions/";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaNode {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<SchemaType>,
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub ref_: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, SchemaNode>>, // insertion order == field order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Items>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<AdditionalProperties>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<SchemaNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Vec<SchemaNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// `type` is either a single kind or a list of kinds. Lists never match a
/// scalar rule, so such schemas are typed by their structure alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
    Single(String),
    Multiple(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Items {
    Tuple(Vec<SchemaNode>), // tried first: a struct would also accept a sequence
    Single(Box<SchemaNode>),
    Bool(bool),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<SchemaNode>),
}

/// A loaded schema document. Only the `definitions` table matters here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaDocument {
    #[serde(default)]
    pub definitions: IndexMap<String, SchemaNode>,
}

impl SchemaNode {
    /// Pure alias: `{ "$ref": "#/definitions/<target>" }`.
    pub fn reference(target: &str) -> Self {
        Self {
            ref_: Some(format!("{DEFINITIONS_PREFIX}{target}")),
            ..Self::default()
        }
    }

    /// The `type` keyword when it names exactly one kind.
    pub fn single_type(&self) -> Option<&str> {
        match &self.type_ {
            Some(SchemaType::Single(t)) => Some(t.as_str()),
            _ => None,
        }
    }

    pub fn is_required(&self, property: &str) -> bool {
        self.required
            .as_ref()
            .is_some_and(|req| req.iter().any(|r| r == property))
    }

    /// Branches of a union hint, `oneOf` winning over `anyOf`.
    pub fn union_branches(&self) -> Option<&[SchemaNode]> {
        self.one_of.as_deref().or(self.any_of.as_deref())
    }
}
