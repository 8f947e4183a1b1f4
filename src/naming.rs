//! Identifier synthesis.
//!
//! - [`normalize_type_name`] rewrites all-caps acronym runs (`VPC` → `Vpc`)
//!   and upper-cases the first character. It is pure, total and idempotent.
//! - [`definition_type_name`] names a definition key or `$ref` path.
//! - [`fqn_to_type_name`] turns a dotted schema path into one type name.
//! - the case helpers feed field and enum member names.

use once_cell::sync::Lazy;
use regex::Regex;

/// An upper-case run followed by a non-lowercase character (or the end).
/// The trailing character is consumed, so scanning resumes after it.
static ACRONYM_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z]+)(?:[^a-z]|$)").expect("acronym pattern is valid"));

/// Convert all-caps acronyms (e.g. "VPC", "FooBARZooFIGoo") to pascal case
/// (e.g. "Vpc", "FooBarZooFiGoo").
pub fn normalize_type_name(raw: &str) -> String {
    // upper-casing first means the scan below sees the final leading char,
    // which is what makes a second pass a no-op
    let seeded = upper_first(raw);

    let mut out = String::with_capacity(seeded.len());
    let mut last = 0;
    for caps in ACRONYM_RUN.captures_iter(&seeded) {
        let Some(run) = caps.get(1) else { continue };
        // keep the run's first letter, lowercase the rest (ASCII only, so byte
        // offsets stay valid)
        out.push_str(&seeded[last..run.start() + 1]);
        out.push_str(&seeded[run.start() + 1..run.end()].to_ascii_lowercase());
        last = run.end();
    }
    out.push_str(&seeded[last..]);
    out
}

pub fn is_normalized(name: &str) -> bool {
    normalize_type_name(name) == name
}

/// Type name for a definition key or `$ref` path: the last `.` segment,
/// normalized. `io.k8s.api.core.v1.Pod` → `Pod`.
pub fn definition_type_name(key: &str) -> String {
    let last = key.rsplit('.').next().unwrap_or(key);
    normalize_type_name(last)
}

/// `Parent.child.grand_child` → `ParentChildGrandChild`.
pub fn fqn_to_type_name(fqn: &str) -> String {
    let joined: String = fqn.split('.').map(pascal_case).collect();
    normalize_type_name(&joined)
}

pub fn pascal_case(raw: &str) -> String {
    split_words(raw, true).iter().map(|w| capitalize(w)).collect()
}

pub fn camel_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for (i, word) in split_words(raw, true).iter().enumerate() {
        if i == 0 {
            out.push_str(&word.to_lowercase());
        } else {
            out.push_str(&capitalize(word));
        }
    }
    out
}

/// Slugify to `UPPER_SNAKE_CASE`. Anything outside `[A-Za-z0-9]` is a
/// separator; empty segments collapse.
pub fn upper_snake_case(raw: &str) -> String {
    let slug: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    split_words(&slug, false)
        .iter()
        .map(|w| w.to_ascii_uppercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Member identifier for a string enum literal.
pub fn enum_member_name(literal: &str) -> String {
    let name = upper_snake_case(literal);
    match name.chars().next() {
        None => "EMPTY".to_string(),
        Some(c) if c.is_ascii_digit() => format!("VALUE_{name}"),
        Some(_) => name,
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
    }
}

/// Split on non-alphanumerics and on case boundaries:
/// `fooBar` → foo|Bar, `HTTPServer` → HTTP|Server, `v1Beta` → v1|Beta.
/// With `break_after_digit`, a letter following a digit also starts a word.
fn split_words(raw: &str, break_after_digit: bool) -> Vec<String> {
    let chars: Vec<char> = raw.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if let Some(prev) = current.chars().last() {
            let next = chars.get(i + 1).copied();
            let boundary = ((prev.is_lowercase() || prev.is_numeric()) && c.is_uppercase())
                || (prev.is_uppercase()
                    && c.is_uppercase()
                    && next.is_some_and(char::is_lowercase))
                || (break_after_digit && prev.is_numeric() && c.is_alphabetic());
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}
