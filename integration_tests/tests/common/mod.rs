#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use story_core::{PersonaFixture, RenderConfig, Shell};

pub fn fixture_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(relative)
}

pub fn load_fixture(relative: &str) -> anyhow::Result<PersonaFixture> {
    let path = fixture_path(relative);
    PersonaFixture::from_file(&path).with_context(|| format!("loading {}", path.display()))
}

pub fn seeded_shell(fixture: Arc<PersonaFixture>, seed: u64) -> Shell {
    Shell::with_rng(fixture, RenderConfig::builtin(), SmallRng::seed_from_u64(seed))
}

static FIXTURE_ENV: std::sync::Once = std::sync::Once::new();

/// Point `PERSONA_FIXTURE_PATH` at the three-persona fixture for this test binary.
pub fn ensure_fixture_env() {
    FIXTURE_ENV.call_once(|| {
        let path = fixture_path("valid/three_personas.json");
        debug_assert!(path.exists(), "missing fixture at {}", path.display());
        std::env::set_var("PERSONA_FIXTURE_PATH", &path);
    });
}
