use std::path::Path;

use anyhow::{Context, anyhow};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;

use crate::schema::{SchemaDocument, SchemaNode};

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, String> {
    let de = &mut serde_json::Deserializer::from_str(src);
    match serde_path_to_error::deserialize::<_, T>(de) {
        Ok(v) => Ok(v),
        Err(err) => {
            let path = err.path().to_string();
            Err(format!("at JSON path {path} → {}", err.into_inner()))
        }
    }
}

/// Read one schema document from disk.
pub fn read_schema_document(path: &Path) -> anyhow::Result<SchemaDocument> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read schema file {}", path.display()))?;
    from_str_with_path::<SchemaDocument>(&source)
        .map_err(|error| anyhow!("failed to parse schema file {}: {error}", path.display()))
}

/// Merge the `definitions` of several documents; later files win.
pub fn read_definitions<P: AsRef<Path>>(paths: &[P]) -> anyhow::Result<IndexMap<String, SchemaNode>> {
    let mut definitions = IndexMap::new();
    for path in paths {
        let document = read_schema_document(path.as_ref())?;
        if document.definitions.is_empty() {
            tracing::warn!(path = %path.as_ref().display(), "schema document has no definitions");
        }
        definitions.extend(document.definitions);
    }
    Ok(definitions)
}
