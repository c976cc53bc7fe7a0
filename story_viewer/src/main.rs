use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};

use clap::{Parser, ValueEnum};
use color_eyre::Result;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use story_core::{
    export_scenes, load_persona_fixture_from_env, load_render_config_from_env, write_svg_bundle,
    Mode, Shell,
};
use tracing::info;

mod app;
mod ui;

use app::StoryApp;

#[derive(Clone)]
struct ChannelWriter {
    sender: Sender<String>,
}

impl std::io::Write for ChannelWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if let Ok(text) = String::from_utf8(buf.to_vec()) {
            let _ = self.sender.send(text);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StartMode {
    Landing,
    Guided,
    Free,
}

impl From<StartMode> for Mode {
    fn from(mode: StartMode) -> Self {
        match mode {
            StartMode::Landing => Mode::Landing,
            StartMode::Guided => Mode::Guided,
            StartMode::Free => Mode::Free,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Black Box Democracy story viewer", long_about = None)]
struct Cli {
    /// Persona fixture JSON. Defaults to PERSONA_FIXTURE_PATH, then the builtin personas.
    #[arg(long)]
    fixture: Option<PathBuf>,
    /// Render geometry JSON. Defaults to RENDER_CONFIG_PATH, then builtin values.
    #[arg(long)]
    render_config: Option<PathBuf>,
    /// Screen to open on.
    #[arg(long, value_enum, default_value_t = StartMode::Landing)]
    mode: StartMode,
    /// Write the SVG scene bundle into this directory and exit.
    #[arg(long, value_name = "DIR")]
    export_svg: Option<PathBuf>,
    /// Seed for the population overlay sample.
    #[arg(long)]
    seed: Option<u64>,
}

fn seeded_rng(seed: Option<u64>) -> SmallRng {
    seed.map(SmallRng::seed_from_u64)
        .unwrap_or_else(SmallRng::from_entropy)
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    if let Some(dir) = cli.export_svg.as_deref() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
        let (fixture, _) = load_persona_fixture_from_env(cli.fixture.as_deref());
        let config = load_render_config_from_env(cli.render_config.as_deref());
        let mut rng = seeded_rng(cli.seed);
        let scenes = export_scenes(&fixture, &config, &mut rng);
        let written = write_svg_bundle(dir, &scenes)?;
        println!("Wrote {} SVG files to {}", written.len(), dir.display());
        return Ok(());
    }

    let (log_tx, log_rx) = mpsc::channel::<String>();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .with_ansi(false)
        .with_writer(move || ChannelWriter {
            sender: log_tx.clone(),
        })
        .init();

    let (fixture, metadata) = load_persona_fixture_from_env(cli.fixture.as_deref());
    let config = load_render_config_from_env(cli.render_config.as_deref());
    match metadata.path() {
        Some(path) => info!("Loaded {} personas from {}", fixture.len(), path.display()),
        None => info!("Loaded {} builtin personas", fixture.len()),
    }

    let mut shell = Shell::with_rng(fixture, config, seeded_rng(cli.seed));
    shell.select_mode(cli.mode.into());

    let app = StoryApp::new(shell, log_rx)?;
    app.run()
}
