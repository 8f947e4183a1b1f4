//! Failures raised while mapping schemas to declarations.
//!
//! Every variant is fatal to the operation that raised it. The only soft
//! fallbacks (excluded `$ref` targets, unmappable shapes) never surface here;
//! they degrade to the `any` escape type inside the resolver.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TypegenError>;

#[derive(Debug, Error)]
pub enum TypegenError {
    /// No schema was supplied and none is registered under this name.
    #[error("unable to find schema definition for {type_name}")]
    UnknownType { type_name: String },

    /// Public entry point called with a name the normalizer would rewrite.
    #[error("{type_name} must be normalized before resolving it (expected {expected})")]
    NameNotNormalized { type_name: String, expected: String },

    #[error("type {fqn} cannot be added since it matches one of the exclusion patterns")]
    TypeExcluded { fqn: String },

    #[error("unable to find a definition for the $ref \"{reference}\"")]
    UnresolvedReference { reference: String },

    /// Arrays need exactly one item schema; tuple and boolean forms are rejected.
    #[error("unsupported array type at {fqn}: {reason}")]
    UnsupportedArrayShape { fqn: String, reason: String },

    #[error("definition of {type_name} is not an enum: {reason}")]
    InvalidEnumSchema { type_name: String, reason: String },

    #[error("can only generate enums for string values ({type_name} has {value})")]
    NonStringEnumValue { type_name: String, value: String },

    /// Only same-document `#/definitions/...` pointers are supported.
    #[error("invalid $ref {reference}: expecting a local reference")]
    InvalidReferenceFormat { reference: String },

    #[error("invalid exclusion pattern {pattern:?}")]
    InvalidExcludePattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl TypegenError {
    pub(crate) fn unsupported_array(fqn: &str, reason: impl Into<String>) -> Self {
        Self::UnsupportedArrayShape {
            fqn: fqn.to_string(),
            reason: reason.into(),
        }
    }
}
