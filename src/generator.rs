//! The engine: registry, scheduler and exclusion rules behind one handle.
//!
//! ```
//! use json_typegen::{TypeGenerator, TypeGeneratorOptions};
//!
//! let options: TypeGeneratorOptions = serde_json::from_value(serde_json::json!({
//!     "definitions": {
//!         "Pet": {
//!             "properties": { "name": { "type": "string" } },
//!             "required": ["name"]
//!         }
//!     }
//! })).unwrap();
//!
//! let mut tg = TypeGenerator::new(options).unwrap();
//! assert_eq!(tg.resolve("Pet").unwrap(), "Pet");
//! assert!(tg.render().contains("readonly name: string;"));
//! ```

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::code::{Code, CodeBuffer, CodeScript};
use crate::decl::Declaration;
use crate::error::{Result, TypegenError};
use crate::registry::DefinitionRegistry;
use crate::scheduler::EmissionScheduler;
use crate::schema::SchemaNode;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeGeneratorOptions {
    /// Regular expressions matched against type FQNs and `$ref` paths.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Schema definitions used to resolve `$ref`s.
    #[serde(default)]
    pub definitions: IndexMap<String, SchemaNode>,
}

#[derive(Debug)]
pub struct TypeGenerator {
    pub(crate) registry: DefinitionRegistry,
    pub(crate) scheduler: EmissionScheduler,
    exclude: Vec<Regex>,
    /// Names currently being resolved, innermost last.
    pub(crate) in_flight: Vec<String>,
}

impl TypeGenerator {
    /// Exclusion patterns are compiled here, so a bad pattern fails early.
    pub fn new(options: TypeGeneratorOptions) -> Result<Self> {
        let exclude = options
            .exclude
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| TypegenError::InvalidExcludePattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut registry = DefinitionRegistry::new();
        for (name, schema) in options.definitions {
            registry.define(name, schema);
        }

        Ok(Self {
            registry,
            scheduler: EmissionScheduler::new(),
            exclude,
            in_flight: Vec::new(),
        })
    }

    /// Register a schema under `type_name`. It is only emitted once resolved
    /// (directly or through a `$ref`).
    pub fn define(&mut self, type_name: impl Into<String>, schema: SchemaNode) {
        self.registry.define(type_name, schema);
    }

    /// Make references to `from` resolve as `to`. `to` must be defined or
    /// emitted as a custom type.
    pub fn alias(&mut self, from: impl Into<String>, to: &str) {
        self.registry.alias(from, to);
    }

    /// Queue hand-written code under `type_name`, bypassing schema
    /// resolution. Replaces a queued declaration of the same name; a no-op
    /// once that name has been rendered.
    pub fn emit_custom_type(&mut self, type_name: &str, write: impl FnOnce(&mut CodeScript)) {
        if self.scheduler.is_finalized(type_name) {
            return;
        }
        let mut script = CodeScript::new();
        write(&mut script);
        self.scheduler.replace(type_name, Declaration::Custom(script));
    }

    pub fn registry(&self) -> &DefinitionRegistry {
        &self.registry
    }

    pub fn scheduler(&self) -> &EmissionScheduler {
        &self.scheduler
    }

    pub fn is_excluded(&self, fqn: &str) -> bool {
        self.exclude.iter().any(|re| re.is_match(fqn))
    }

    /// Render all queued types to a string.
    pub fn render(&mut self) -> String {
        let mut code = Code::new();
        self.render_to_code(&mut code);
        code.render()
    }

    /// Write all queued types into an existing buffer, e.g. one shared with
    /// other generators.
    pub fn render_to_code(&mut self, code: &mut dyn CodeBuffer) {
        let written = self.scheduler.drain_into(code);
        tracing::debug!(written, "rendered declarations");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn generator(definitions: serde_json::Value) -> TypeGenerator {
        generator_excluding(definitions, &[])
    }

    fn generator_excluding(definitions: serde_json::Value, exclude: &[&str]) -> TypeGenerator {
        let options: TypeGeneratorOptions =
            serde_json::from_value(json!({ "definitions": definitions, "exclude": exclude })).unwrap();
        TypeGenerator::new(options).unwrap()
    }

    fn node(value: serde_json::Value) -> SchemaNode {
        serde_json::from_value(value).unwrap()
    }

    fn count(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    #[test]
    fn reference_cycle_terminates_and_emits_once() {
        let mut tg = generator(json!({
            "A": { "properties": { "b": { "$ref": "#/definitions/B" } } },
            "B": { "properties": { "a": { "$ref": "#/definitions/A" } } }
        }));
        assert_eq!(tg.resolve("A").unwrap(), "A");
        assert_eq!(tg.resolve("B").unwrap(), "B");

        let out = tg.render();
        assert_eq!(count(&out, "export interface A {"), 1);
        assert_eq!(count(&out, "export interface B {"), 1);
        assert!(out.contains("readonly b?: B;"));
        assert!(out.contains("readonly a?: A;"));
    }

    #[test]
    fn same_type_requested_twice_is_emitted_once() {
        let mut tg = generator(json!({
            "Shared": { "properties": { "x": { "type": "string" } } },
            "Holder": {
                "properties": {
                    "first": { "$ref": "#/definitions/Shared" },
                    "second": { "$ref": "#/definitions/Shared" }
                }
            }
        }));
        tg.resolve("Shared").unwrap();
        tg.resolve("Shared").unwrap();
        tg.resolve("Holder").unwrap();
        let out = tg.render();
        assert_eq!(count(&out, "export interface Shared {"), 1);

        // resolving again after rendering reuses the finalized name
        assert_eq!(tg.resolve("Holder").unwrap(), "Holder");
        assert_eq!(tg.render(), "");
    }

    #[test]
    fn required_vs_optional() {
        let mut tg = generator(json!({
            "Pair": {
                "properties": { "a": { "type": "string" }, "b": { "type": "string" } },
                "required": ["a"]
            }
        }));
        tg.resolve("Pair").unwrap();
        let out = tg.render();
        assert!(out.contains("  readonly a: string;"));
        assert!(out.contains("  readonly b?: string;"));
    }

    #[test]
    fn map_of_strings() {
        let mut tg = generator(json!({}));
        let schema = node(json!({ "additionalProperties": { "type": "string" } }));
        assert_eq!(
            tg.resolve_schema("Labels", &schema, None).unwrap(),
            "{ [key: string]: string }"
        );
    }

    #[test]
    fn enum_round_trip() {
        let mut tg = generator(json!({
            "Status": { "type": "string", "enum": ["OK", "not-ok"] }
        }));
        assert_eq!(tg.resolve("Status").unwrap(), "Status");
        let out = tg.render();
        assert!(out.contains("export enum Status {"));
        assert!(out.contains("  /** OK */\n  OK = \"OK\","));
        assert!(out.contains("  /** not-ok */\n  NOT_OK = \"not-ok\","));
    }

    #[test]
    fn exclusion_fails_direct_and_degrades_refs() {
        let mut tg = generator_excluding(
            json!({
                "SecretThing": { "properties": { "key": { "type": "string" } } },
                "Consumer": { "properties": { "secret": { "$ref": "#/definitions/SecretThing" } } }
            }),
            &["^Secret"],
        );
        assert!(matches!(
            tg.resolve("SecretThing"),
            Err(TypegenError::TypeExcluded { ref fqn }) if fqn == "SecretThing"
        ));
        assert_eq!(tg.resolve("Consumer").unwrap(), "Consumer");
        let out = tg.render();
        assert!(out.contains("readonly secret?: any;"));
        assert!(!out.contains("SecretThing {"));
    }

    #[test]
    fn invalid_exclusion_pattern_fails_construction() {
        let options = TypeGeneratorOptions {
            exclude: vec!["(unclosed".into()],
            ..TypeGeneratorOptions::default()
        };
        assert!(matches!(
            TypeGenerator::new(options),
            Err(TypegenError::InvalidExcludePattern { .. })
        ));
    }

    #[test]
    fn primitive_union_emits_factories() {
        let mut tg = generator(json!({
            "IntOrString": { "oneOf": [{ "type": "string" }, { "type": "integer" }] }
        }));
        assert_eq!(tg.resolve("IntOrString").unwrap(), "IntOrString");
        let out = tg.render();
        assert!(out.contains("export class IntOrString {"));
        assert_eq!(count(&out, "public static from"), 2);
        assert!(out.contains("public static fromString(value: string): IntOrString {"));
        assert!(out.contains("public static fromNumber(value: number): IntOrString {"));
    }

    #[test]
    fn non_primitive_union_is_not_a_union() {
        let mut tg = generator(json!({
            "Other": { "properties": { "x": { "type": "string" } } },
            "Mixed": {
                "oneOf": [{ "type": "string" }, { "$ref": "#/definitions/Other" }],
                "properties": { "y": { "type": "number" } }
            }
        }));
        assert_eq!(tg.resolve("Mixed").unwrap(), "Mixed");
        let out = tg.render();
        assert!(out.contains("export interface Mixed {"));
        assert!(!out.contains("export class Mixed"));
    }

    #[test]
    fn date_time_is_native_date() {
        let mut tg = generator(json!({}));
        let schema = node(json!({ "type": "string", "format": "date-time" }));
        assert_eq!(tg.resolve_schema("Timestamp", &schema, None).unwrap(), "Date");
    }

    #[test]
    fn nested_structs_are_named_from_their_path() {
        let mut tg = generator(json!({
            "Cluster": {
                "description": "A cluster.",
                "properties": {
                    "spec": {
                        "properties": {
                            "nodeCount": { "type": "integer", "description": "Defaults to 3" }
                        }
                    },
                    "x-vendor": { "type": "string" },
                    "$schema": { "type": "string" },
                    "Tags": { "type": "array", "items": { "type": "string" } }
                }
            }
        }));
        tg.resolve("Cluster").unwrap();
        let out = tg.render();
        assert!(out.contains("readonly spec?: ClusterSpec;"));
        assert!(out.contains("export interface ClusterSpec {"));
        assert!(out.contains("readonly schema?: string;"));
        assert!(out.contains("readonly tags?: string[];"));
        assert!(!out.contains("vendor"));
        assert!(out.contains("   * @default 3\n   * @schema Cluster.spec#nodeCount\n"));
        assert!(out.contains("/**\n * A cluster.\n *\n * @schema Cluster\n */\nexport interface Cluster {"));
        // outer struct reserved first, so it renders first
        assert!(out.find("interface Cluster {") < out.find("interface ClusterSpec {"));
    }

    #[test]
    fn aliases_resolve_to_the_target() {
        let mut tg = generator(json!({
            "Real": { "properties": { "v": { "type": "boolean" } } },
            "Holder": { "properties": { "thing": { "$ref": "#/definitions/Legacy" } } }
        }));
        tg.alias("Legacy", "Real");
        tg.resolve("Holder").unwrap();
        let out = tg.render();
        assert!(out.contains("readonly thing?: Real;"));
        assert!(out.contains("export interface Real {"));
    }

    #[test]
    fn custom_types_bypass_resolution() {
        let mut tg = generator(json!({
            "Holder": { "properties": { "q": { "$ref": "#/definitions/Quantity" } } }
        }));
        tg.emit_custom_type("Quantity", |code| {
            code.open_block("export class Quantity");
            code.line("private constructor(public readonly value: string) {}");
            code.close_block();
        });
        tg.resolve("Holder").unwrap();
        let out = tg.render();
        assert!(out.starts_with("export class Quantity {\n  private constructor"));
        assert!(out.contains("readonly q?: Quantity;"));

        // finalized: a second registration is ignored
        tg.emit_custom_type("Quantity", |code| code.line("// replaced"));
        assert_eq!(tg.render(), "");
    }

    #[test]
    fn failed_build_releases_its_name() {
        let mut tg = generator(json!({
            "Broken": { "properties": { "list": { "type": "array" } } }
        }));
        assert!(tg.resolve("Broken").is_err());
        assert!(!tg.scheduler().is_known("Broken"));
    }

    #[test]
    fn failed_build_drops_nested_declarations() {
        let mut tg = generator(json!({
            "A": {
                "properties": {
                    "b": { "$ref": "#/definitions/B" },
                    "list": { "type": "array" }
                }
            },
            "B": { "properties": { "a": { "$ref": "#/definitions/A" } } },
            "C": { "properties": { "x": { "type": "string" } } }
        }));
        tg.resolve("C").unwrap();
        assert!(tg.resolve("A").is_err());
        assert!(!tg.scheduler().is_known("A"));
        assert!(!tg.scheduler().is_known("B"));
        let out = tg.render();
        assert!(out.contains("export interface C {"));
        assert!(!out.contains("interface B"));
    }

    #[test]
    fn resolve_all_names_dotted_keys_like_references() {
        let mut tg = generator(json!({
            "io.k8s.apimachinery.pkg.apis.meta.v1.ObjectMeta": {
                "properties": { "name": { "type": "string" } }
            },
            "io.k8s.api.core.v1.ConfigMap": {
                "properties": {
                    "metadata": { "$ref": "#/definitions/io.k8s.apimachinery.pkg.apis.meta.v1.ObjectMeta" }
                }
            }
        }));
        assert_eq!(tg.resolve_all().unwrap(), ["ObjectMeta", "ConfigMap"]);
        let out = tg.render();
        assert_eq!(count(&out, "export interface ObjectMeta {"), 1);
        assert!(out.contains("export interface ConfigMap {"));
        assert!(out.contains("readonly metadata?: ObjectMeta;"));
        assert!(!out.contains("Io.k8s"));
        assert!(out.contains("@schema io.k8s.api.core.v1.ConfigMap"));
    }

    #[test]
    fn resolve_all_normalizes_definition_keys() {
        let mut tg = generator(json!({
            "VPCConfig": { "properties": { "id": { "type": "string" } } },
            "Count": { "type": "integer" }
        }));
        assert_eq!(tg.resolve_all().unwrap(), ["VpcConfig", "number"]);
        assert!(tg.render().contains("export interface VpcConfig {"));
    }

    #[test]
    fn render_into_shared_buffer() {
        let mut first = generator(json!({ "A": { "properties": { "x": { "type": "string" } } } }));
        let mut second = generator(json!({ "B": { "properties": { "y": { "type": "string" } } } }));
        first.resolve("A").unwrap();
        second.resolve("B").unwrap();

        let mut code = Code::new();
        code.line("// header");
        first.render_to_code(&mut code);
        second.render_to_code(&mut code);
        let out = code.render();
        assert!(out.starts_with("// header\n"));
        assert!(out.find("interface A {") < out.find("interface B {"));
    }
}
