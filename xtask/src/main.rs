use std::env;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use jsonschema::JSONSchema;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use story_core::{
    export_scenes, persona_fixture_schema, write_svg_bundle, PersonaFixture, RenderConfig,
};

const SCHEMA_PATH: &str = "story_core/schema/persona_fixture.schema.json";
const DEFAULT_FIXTURE_GLOBS: [&str; 2] = [
    "story_core/src/data/personas.json",
    "integration_tests/tests/fixtures/valid/*.json",
];
const DEFAULT_EXPORT_DIR: &str = "target/story-svg";

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = env::args().skip(1);
    match args.next().as_deref() {
        Some("fixture-schema") => fixture_schema(args.next().map(PathBuf::from)),
        Some("check-fixtures") => check_fixtures(args.collect()),
        Some("export-svg") => export_svg(args.next().map(PathBuf::from), args.next()),
        Some("help") | None => {
            print_usage();
            Ok(())
        }
        Some(cmd) => {
            eprintln!("Unknown xtask '{cmd}'.");
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!("Usage: cargo xtask fixture-schema [OUT]");
    eprintln!("       cargo xtask check-fixtures [GLOB...]");
    eprintln!("       cargo xtask export-svg [DIR] [SEED]");
    eprintln!("       cargo xtask help");
}

fn fixture_schema(out: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    let out = out.unwrap_or_else(|| PathBuf::from(SCHEMA_PATH));
    if let Some(parent) = out.parent() {
        fs::create_dir_all(parent)?;
    }
    let schema = serde_json::to_string_pretty(&persona_fixture_schema())?;
    fs::write(&out, schema + "\n")?;
    println!("Wrote persona fixture schema to {}", out.display());
    Ok(())
}

/// Validate fixtures against the generated schema, then against the
/// loader's own rules.
fn check_fixtures(patterns: Vec<String>) -> Result<(), Box<dyn Error>> {
    let patterns = if patterns.is_empty() {
        DEFAULT_FIXTURE_GLOBS.iter().map(|p| p.to_string()).collect()
    } else {
        patterns
    };

    let schema_value = serde_json::to_value(persona_fixture_schema())?;
    let schema = JSONSchema::compile(&schema_value)
        .map_err(|err| format!("persona fixture schema does not compile: {err}"))?;

    let mut checked = 0usize;
    let mut failures = Vec::new();
    for pattern in &patterns {
        for entry in glob::glob(pattern)? {
            let path = entry?;
            checked += 1;
            if let Err(problems) = check_fixture(&schema, &path) {
                for problem in problems {
                    failures.push(format!("{}: {problem}", path.display()));
                }
            }
        }
    }

    if checked == 0 {
        return Err(format!("no fixtures matched {}", patterns.join(", ")).into());
    }
    if !failures.is_empty() {
        for failure in &failures {
            eprintln!("{failure}");
        }
        return Err(format!("{} of {checked} fixture checks failed", failures.len()).into());
    }
    println!("Checked {checked} fixture(s)");
    Ok(())
}

fn check_fixture(schema: &JSONSchema, path: &Path) -> Result<(), Vec<String>> {
    let text = fs::read_to_string(path).map_err(|err| vec![err.to_string()])?;
    let instance: serde_json::Value =
        serde_json::from_str(&text).map_err(|err| vec![err.to_string()])?;
    if let Err(errors) = schema.validate(&instance) {
        return Err(errors
            .map(|err| format!("{} at {}", err, err.instance_path))
            .collect());
    }
    PersonaFixture::from_json_str(&text).map_err(|err| vec![err.to_string()])?;
    Ok(())
}

fn export_svg(dir: Option<PathBuf>, seed: Option<String>) -> Result<(), Box<dyn Error>> {
    let dir = dir.unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_DIR));
    let seed = match seed {
        Some(raw) => raw.parse::<u64>()?,
        None => 0,
    };
    let fixture = PersonaFixture::builtin();
    let config = RenderConfig::builtin();
    let mut rng = SmallRng::seed_from_u64(seed);
    let scenes = export_scenes(&fixture, &config, &mut rng);
    let written = write_svg_bundle(&dir, &scenes)?;
    println!("Wrote {} SVG files to {}", written.len(), dir.display());
    Ok(())
}
