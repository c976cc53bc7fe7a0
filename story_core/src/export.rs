use std::{
    collections::HashSet,
    fs, io,
    path::{Path, PathBuf},
};

use rand::Rng;

use crate::decision_path::DecisionPath;
use crate::fixture::PersonaFixture;
use crate::guided::StepId;
use crate::render_config::RenderConfig;
use crate::scatter::{sample_population, ScatterPlot};
use crate::scene::Scene;

/// Scene set written by `--export-svg`: one decision path per persona, the
/// identity-space plot and the zoom-out plot with a population sample.
pub fn export_scenes<R: Rng>(
    fixture: &PersonaFixture,
    config: &RenderConfig,
    rng: &mut R,
) -> Vec<(String, Scene)> {
    let mut taken = HashSet::new();
    let mut scenes: Vec<(String, Scene)> = fixture
        .personas()
        .iter()
        .map(|persona| {
            let scene = DecisionPath::new(&persona.decisions, config.decision_path())
                .with_label(persona.display_name())
                .render();
            (path_file_name(&persona.id, &mut taken), scene)
        })
        .collect();

    scenes.push((
        format!("{}.svg", StepId::IdentitySpace),
        ScatterPlot::new(fixture.personas(), config.scatter()).render(),
    ));

    let population = sample_population(rng, config.scatter().population_size);
    scenes.push((
        format!("{}.svg", StepId::ZoomOut),
        ScatterPlot::new(fixture.personas(), config.scatter())
            .with_population(&population)
            .render(),
    ));
    scenes
}

/// Write every scene as `<dir>/<name>`, creating `dir` if needed.
pub fn write_svg_bundle(dir: &Path, scenes: &[(String, Scene)]) -> io::Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(scenes.len());
    for (name, scene) in scenes {
        let path = dir.join(name);
        fs::write(&path, scene.to_svg())?;
        tracing::info!(target: "black_box::export", path = %path.display(), "svg.written");
        written.push(path);
    }
    Ok(written)
}

/// `path-<stem>.svg`, suffixed `-2`, `-3`, ... when another id already
/// produced the same stem.
fn path_file_name(id: &str, taken: &mut HashSet<String>) -> String {
    let stem = file_stem(id);
    let mut name = format!("path-{stem}.svg");
    let mut suffix = 2;
    while !taken.insert(name.clone()) {
        name = format!("path-{stem}-{suffix}.svg");
        suffix += 1;
    }
    name
}

/// Persona ids are free-form; keep file names portable.
fn file_stem(id: &str) -> String {
    id.chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
                ch.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}
