//! JSON Schema definitions → TypeScript type declarations.
//!
//! The [`TypeGenerator`] walks a graph of schema definitions, decides for
//! each node whether it is an inline type (scalar, array, map) or a named
//! declaration (interface, enum, union class), and emits every named
//! declaration exactly once, even across `$ref` cycles.
pub mod builders;
pub mod classify;
pub mod cli;
pub mod code;
pub mod decl;
pub mod docs;
pub mod error;
pub mod generator;
pub mod naming;
pub mod path_de;
pub mod registry;
pub mod resolver;
pub mod scheduler;
pub mod schema;

pub use code::{Code, CodeBuffer, CodeScript};
pub use error::{Result, TypegenError};
pub use generator::{TypeGenerator, TypeGeneratorOptions};
pub use naming::normalize_type_name;
pub use schema::{SchemaDocument, SchemaNode};
