use std::{
    env, fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::Deserialize;
use thiserror::Error;

use crate::coords::{Padding, PlotArea};
use crate::scatter::POPULATION_SIZE;
use crate::text::{EVENT_TRUNCATE, INTERVENTION_TRUNCATE};

pub const BUILTIN_RENDER_CONFIG: &str = include_str!("data/render_config.json");

/// Geometry and text limits for both chart renderers.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    decision_path: DecisionPathConfig,
    scatter: ScatterConfig,
}

impl RenderConfig {
    pub fn builtin() -> Arc<Self> {
        Arc::new(
            serde_json::from_str(BUILTIN_RENDER_CONFIG)
                .expect("builtin render config should parse"),
        )
    }

    pub fn from_json_str(json: &str) -> Result<Self, RenderConfigError> {
        let config: RenderConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, RenderConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| RenderConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn decision_path(&self) -> &DecisionPathConfig {
        &self.decision_path
    }

    pub fn scatter(&self) -> &ScatterConfig {
        &self.scatter
    }

    fn validate(&self) -> Result<(), RenderConfigError> {
        let path = &self.decision_path;
        if path.width <= 2.0 * path.padding || path.height <= 0.0 {
            return Err(RenderConfigError::Degenerate {
                chart: "decision_path",
            });
        }
        let area = self.scatter.plot_area();
        if area.inner_width() <= 0.0 || area.inner_height() <= 0.0 {
            return Err(RenderConfigError::Degenerate { chart: "scatter" });
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum RenderConfigError {
    #[error("failed to parse render config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read render config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{chart} drawing area has no room inside its padding")]
    Degenerate { chart: &'static str },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DecisionPathConfig {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    /// Baseline the markers sit on.
    pub line_y: f64,
    /// First text row under the markers.
    pub label_y: f64,
    pub event_max_chars: usize,
    pub intervention_max_chars: usize,
}

impl Default for DecisionPathConfig {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 150.0,
            padding: 32.0,
            line_y: 68.0,
            label_y: 105.0,
            event_max_chars: EVENT_TRUNCATE,
            intervention_max_chars: INTERVENTION_TRUNCATE,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScatterConfig {
    pub width: f64,
    pub height: f64,
    pub padding: Padding,
    pub population_size: usize,
}

impl ScatterConfig {
    pub fn plot_area(&self) -> PlotArea {
        PlotArea::new(self.width, self.height, self.padding)
    }
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 350.0,
            padding: Padding {
                left: 60.0,
                right: 24.0,
                top: 24.0,
                bottom: 48.0,
            },
            population_size: POPULATION_SIZE,
        }
    }
}

/// Load render configuration from `override_path`, then `RENDER_CONFIG_PATH`,
/// falling back to the builtin values.
pub fn load_render_config_from_env(override_path: Option<&Path>) -> Arc<RenderConfig> {
    let candidate = override_path
        .map(Path::to_path_buf)
        .or_else(|| env::var("RENDER_CONFIG_PATH").ok().map(PathBuf::from));

    if let Some(path) = candidate {
        match RenderConfig::from_file(&path) {
            Ok(config) => {
                tracing::info!(
                    target: "black_box::config",
                    path = %path.display(),
                    "render_config.loaded=file"
                );
                return Arc::new(config);
            }
            Err(err) => {
                tracing::warn!(
                    target: "black_box::config",
                    path = %path.display(),
                    error = %err,
                    "render_config.load_failed"
                );
            }
        }
    }

    tracing::info!(target: "black_box::config", "render_config.loaded=builtin");
    RenderConfig::builtin()
}
