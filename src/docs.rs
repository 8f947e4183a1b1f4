//! Doc comment blocks attached to declarations and fields.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::code::CodeBuffer;

/// "Defaults to X", "Default is X", ...
static DEFAULT_HINT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Defaults?\W+(to|is)\W+(.+)").expect("default pattern is valid"));

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocBlock {
    pub description: Option<String>,
    /// Rendered as `@key value`, in insertion order.
    pub annotations: IndexMap<String, String>,
}

/// Build the doc block for a schema location. A `default` annotation is
/// lifted out of the description when it reads like one; `schema` always
/// carries the FQN.
pub fn build_doc(
    fqn: &str,
    description: Option<&str>,
    mut annotations: IndexMap<String, String>,
) -> DocBlock {
    let description = description
        .filter(|d| !d.trim().is_empty())
        .map(escape_comment);

    if let Some(desc) = &description {
        if let Some(default) = DEFAULT_HINT.captures(desc).and_then(|c| c.get(2)) {
            annotations.insert("default".to_string(), default.as_str().trim().to_string());
        }
    }
    annotations.insert("schema".to_string(), escape_comment(fqn));

    DocBlock {
        description,
        annotations,
    }
}

/// Neutralize sequences that would close the comment early.
pub fn escape_comment(text: &str) -> String {
    text.replace("*/", "_/")
}

impl DocBlock {
    pub fn write_to(&self, code: &mut dyn CodeBuffer) {
        code.line("/**");
        if let Some(desc) = &self.description {
            for line in desc.lines() {
                code.line(format!(" * {line}").trim_end());
            }
            code.line(" *");
        }
        for (key, value) in &self.annotations {
            code.line(&format!(" * @{key} {value}"));
        }
        code.line(" */");
    }
}
