//! Core crate for the Black Box Democracy story viewer.
//!
//! Holds the persona fixture, the pure layout functions behind the decision
//! path and scatter plot, the guided walk-through state and the mode shell.
//! Layouts produce a [`Scene`] that front-ends paint or export as SVG.

pub mod coords;
pub mod decision_path;
pub mod export;
pub mod fixture;
pub mod guided;
pub mod render_config;
pub mod scatter;
pub mod scene;
pub mod shell;
pub mod text;

pub use coords::{lerp, Padding, PlotArea};
pub use decision_path::{node_positions, node_style, DecisionPath, NodeStyle, PlacedNode};
pub use export::{export_scenes, write_svg_bundle};
pub use fixture::{
    load_persona_fixture_from_env, persona_fixture_schema, DecisionCategory, DecisionNode,
    FixtureMetadata, PersonaFixture, PersonaFixtureDocument, PersonaFixtureError, PersonaProfile,
    ProgressLevel,
};
pub use guided::{
    GuidedStepController, PathExcerpt, PrimaryAction, RosterStyle, ScatterMode, StepId, StepPlan,
    StepView, STEP_PLANS,
};
pub use render_config::{
    load_render_config_from_env, DecisionPathConfig, RenderConfig, RenderConfigError,
    ScatterConfig,
};
pub use scatter::{
    sample_population, PersonaPoint, PopulationOverlay, PopulationPoint, ScatterPlot, AXIS_TICKS,
    POPULATION_SIZE,
};
pub use scene::{Element, Role, Scene, Shape, TextAnchor};
pub use shell::{FreeSession, GuidedSession, Mode, Shell, ViewState};
pub use text::{format_coordinate, format_delta, format_percent, truncate, DEFAULT_TRUNCATE};
