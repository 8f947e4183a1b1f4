//! Renders every schema under `fixtures/` and reports what each one produced.
use anyhow::Context;
use json_typegen::{TypeGenerator, TypeGeneratorOptions};
use once_cell::sync::Lazy;
use regex::Regex;

static DECLARATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^export (interface|enum|class) ").expect("static regex"));

fn render_fixture(path: &std::path::Path) -> anyhow::Result<String> {
    let definitions = json_typegen::path_de::read_definitions(&[path])?;
    let mut tg = TypeGenerator::new(TypeGeneratorOptions {
        exclude: Vec::new(),
        definitions,
    })?;
    tg.resolve_all()?;
    Ok(tg.render())
}

fn main() -> anyhow::Result<()> {
    let root = std::env::args().nth(1).unwrap_or_else(|| "fixtures".to_string());
    let pattern = format!("{root}/*.json");
    let mut failures = 0usize;
    for entry in glob::glob(&pattern).context("invalid fixture pattern")? {
        let path = entry?;
        match render_fixture(&path) {
            Ok(ts_src) => {
                let count = DECLARATION.find_iter(&ts_src).count();
                println!("ok   {} ({count} declarations)", path.display());
            }
            Err(error) => {
                failures += 1;
                println!("FAIL {}: {error:#}", path.display());
            }
        }
    }
    if failures > 0 {
        anyhow::bail!("{failures} fixture(s) failed");
    }
    Ok(())
}
