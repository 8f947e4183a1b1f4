//! Minimal CLI: schema definitions → TypeScript declarations
use std::path::PathBuf;
use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand, Args};

use crate::generator::{TypeGenerator, TypeGeneratorOptions};
use crate::naming::definition_type_name;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate TypeScript declarations from the `definitions` of JSON Schema documents
#[derive(Parser, Debug)]
#[command(name = "json-typegen", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// resolve schema definitions and print the generated declarations
    Types(TypesOut),
    /// print the type name each definition key or `$ref` path is emitted under
    Names(NamesOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// One or more schema documents. May be literal paths or quoted glob patterns.
    /// Definitions from later files replace earlier ones with the same name.
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct TypesOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// regex over type FQNs; matching types are refused, references to them become `any`
    #[arg(long)]
    exclude: Vec<String>,

    /// only emit these definitions (and whatever they reference); defaults to all
    #[arg(long = "type")]
    types: Vec<String>,

    /// make references to FROM resolve as TO
    #[arg(long, value_name = "FROM=TO", value_parser = parse_alias)]
    alias: Vec<(String, String)>,

    /// output .ts file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct NamesOut {
    /// raw names, e.g. `VPCConfig` or `io.k8s.api.core.v1.Pod`
    #[arg(required = true)]
    raw: Vec<String>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_options(&self, exclude: &[String]) -> anyhow::Result<TypeGeneratorOptions> {
        let source_paths = resolve_file_path_patterns(&self.input)
            .context("failed to resolve input file paths")?;
        tracing::debug!(files = source_paths.len(), "loading schema documents");
        let definitions = crate::path_de::read_definitions(&source_paths)?;
        Ok(TypeGeneratorOptions {
            exclude: exclude.to_vec(),
            definitions,
        })
    }
}

impl TypesOut {
    fn generate(&self) -> anyhow::Result<String> {
        let options = self.input_settings.load_options(&self.exclude)?;
        let mut tg = TypeGenerator::new(options)?;
        for (from, to) in &self.alias {
            tg.alias(from.clone(), to);
        }

        if self.types.is_empty() {
            tg.resolve_all()?;
        } else {
            for raw in &self.types {
                let schema = tg
                    .registry()
                    .get(raw)
                    .ok_or_else(|| anyhow!("no definition named {raw}"))?;
                tg.resolve_schema(&definition_type_name(raw), &schema, Some(raw))
                    .with_context(|| format!("failed to generate {raw}"))?;
            }
        }
        Ok(tg.render())
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::Types(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(())
                }
                let ts_src = target.generate()?;
                if let Some(out) = target.out.as_ref() {
                    if let Some(parent) = out.parent() {
                        std::fs::create_dir_all(parent)
                            .with_context(|| format!("failed to create {}", parent.display()))?;
                    }
                    std::fs::write(out, &ts_src)
                        .with_context(|| format!("failed to write {}", out.display()))?;
                } else {
                    print!("{ts_src}");
                }
            }
            Command::Names(target) => {
                for raw in &target.raw {
                    println!("{}", definition_type_name(raw));
                }
            }
        }
        Ok(())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn parse_alias(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((from, to)) if !from.is_empty() && !to.is_empty() => {
            Ok((from.to_string(), to.to_string()))
        }
        _ => Err(format!("expected FROM=TO, got {raw:?}")),
    }
}

fn resolve_file_path_patterns<I>(patterns: I) -> anyhow::Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();
        if !has_glob_chars(pattern) {
            out.push(PathBuf::from(pattern));
            continue;
        }
        let mut matched = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {pattern}"))?
            .collect::<Result<Vec<_>, _>>()?;
        if matched.is_empty() {
            // an explicit glob that matched nothing is almost certainly a typo
            return Err(anyhow!("glob pattern matched no files: {pattern}"));
        }
        // glob yields alphabetical order already; keep it explicit for stable output
        matched.sort();
        out.extend(matched);
    }

    Ok(out)
}
