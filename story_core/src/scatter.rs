//! Utility × malleability scatter plot.

use rand::Rng;

use crate::coords::PlotArea;
use crate::fixture::PersonaProfile;
use crate::render_config::ScatterConfig;
use crate::scene::{Role, Scene, Shape, TextAnchor};

pub const AXIS_TICKS: [f64; 3] = [0.0, 0.5, 1.0];
pub const POPULATION_SIZE: usize = 220;
pub const UTILITY_TITLE: &str = "Utility";
pub const MALLEABILITY_TITLE: &str = "Malleability";

const AXIS_COLOR: &str = "#64748b";
const TICK_COLOR: &str = "#94a3b8";
const TICK_LABEL_COLOR: &str = "#cbd5e1";
const TITLE_COLOR: &str = "#e2e8f0";
const POPULATION_COLOR: &str = "#7dd3fc";
const POPULATION_OPACITY: f64 = 0.18;
const PERSONA_FILL: &str = "#22d3ee";
const PERSONA_STROKE: &str = "#0ea5e9";
const PERSONA_RADIUS: f64 = 8.0;
const PERSONA_LABEL_OFFSET: f64 = 10.0;

/// Background texture point in domain space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopulationPoint {
    pub x: f64,
    pub y: f64,
}

/// Mean of two uniform draws: triangular on `[0, 1]`, peaking at 0.5.
fn centered_draw<R: Rng>(rng: &mut R) -> f64 {
    let u: f64 = rng.gen();
    let v: f64 = rng.gen();
    (u + v) / 2.0
}

pub fn sample_population<R: Rng>(rng: &mut R, count: usize) -> Vec<PopulationPoint> {
    (0..count)
        .map(|_| PopulationPoint {
            x: centered_draw(rng),
            y: centered_draw(rng),
        })
        .collect()
}

/// Illustrative noise behind the persona markers.
///
/// Points are drawn fresh every time the overlay switches on and dropped
/// when it switches off; they are never compared or persisted.
#[derive(Debug, Clone)]
pub struct PopulationOverlay {
    size: usize,
    enabled: bool,
    points: Vec<PopulationPoint>,
}

impl PopulationOverlay {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            enabled: false,
            points: Vec::new(),
        }
    }

    /// Returns `true` when a fresh sample was drawn.
    pub fn set_enabled<R: Rng>(&mut self, enabled: bool, rng: &mut R) -> bool {
        match (self.enabled, enabled) {
            (false, true) => {
                self.points = sample_population(rng, self.size);
                self.enabled = true;
                tracing::debug!(
                    target: "black_box::render",
                    points = self.points.len(),
                    "population.regenerated"
                );
                true
            }
            (true, false) => {
                self.points.clear();
                self.enabled = false;
                false
            }
            _ => false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn points(&self) -> &[PopulationPoint] {
        &self.points
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PersonaPoint<'a> {
    pub id: &'a str,
    pub x: f64,
    pub y: f64,
}

pub struct ScatterPlot<'a> {
    personas: Vec<&'a PersonaProfile>,
    area: PlotArea,
    population: &'a [PopulationPoint],
}

impl<'a> ScatterPlot<'a> {
    pub fn new(
        personas: impl IntoIterator<Item = &'a PersonaProfile>,
        config: &ScatterConfig,
    ) -> Self {
        Self {
            personas: personas.into_iter().collect(),
            area: config.plot_area(),
            population: &[],
        }
    }

    pub fn with_population(mut self, population: &'a [PopulationPoint]) -> Self {
        self.population = population;
        self
    }

    /// Pixel position of every persona, one per persona, overlaps included.
    pub fn persona_points(&self) -> Vec<PersonaPoint<'a>> {
        self.personas
            .iter()
            .map(|persona| PersonaPoint {
                id: persona.id.as_str(),
                x: self.area.map_x(persona.utility),
                y: self.area.map_y(persona.malleability),
            })
            .collect()
    }

    pub fn render(&self) -> Scene {
        let area = &self.area;
        let mut scene = Scene::new(area.width, area.height);

        scene.line(
            Role::Axis,
            (area.left(), area.bottom()),
            (area.right(), area.bottom()),
            AXIS_COLOR,
            1.0,
        );
        scene.line(
            Role::Axis,
            (area.left(), area.top()),
            (area.left(), area.bottom()),
            AXIS_COLOR,
            1.0,
        );

        for tick in AXIS_TICKS {
            let x = area.map_x(tick);
            scene.line(
                Role::Tick,
                (x, area.bottom()),
                (x, area.bottom() + 6.0),
                TICK_COLOR,
                1.0,
            );
            scene.text(
                Role::TickLabel,
                (x, area.bottom() + 18.0),
                tick_label(tick),
                TextAnchor::Middle,
                11.0,
                TICK_LABEL_COLOR,
            );
        }
        for tick in AXIS_TICKS {
            let y = area.map_y(tick);
            scene.line(
                Role::Tick,
                (area.left() - 6.0, y),
                (area.left(), y),
                TICK_COLOR,
                1.0,
            );
            scene.text(
                Role::TickLabel,
                (area.left() - 10.0, y + 4.0),
                tick_label(tick),
                TextAnchor::End,
                11.0,
                TICK_LABEL_COLOR,
            );
        }

        scene.text(
            Role::AxisTitle,
            (area.left() + area.inner_width() / 2.0, area.bottom() + 36.0),
            UTILITY_TITLE,
            TextAnchor::Middle,
            12.0,
            TITLE_COLOR,
        );
        scene.push(
            Role::AxisTitle,
            Shape::Text {
                x: area.left() - 44.0,
                y: area.top() + area.inner_height() / 2.0,
                content: MALLEABILITY_TITLE.to_string(),
                anchor: TextAnchor::Middle,
                font_size: 12.0,
                fill: TITLE_COLOR,
                rotate: Some(-90.0),
            },
        );

        for point in self.population {
            scene.push(
                Role::Population,
                Shape::Circle {
                    cx: area.map_x(point.x),
                    cy: area.map_y(point.y),
                    r: 2.0,
                    fill: POPULATION_COLOR,
                    stroke: None,
                    stroke_width: 0.0,
                    opacity: POPULATION_OPACITY,
                },
            );
        }

        for point in self.persona_points() {
            scene.push(
                Role::Marker,
                Shape::Circle {
                    cx: point.x,
                    cy: point.y,
                    r: PERSONA_RADIUS,
                    fill: PERSONA_FILL,
                    stroke: Some(PERSONA_STROKE),
                    stroke_width: 1.5,
                    opacity: 1.0,
                },
            );
            scene.text(
                Role::MarkerLabel,
                (
                    point.x + PERSONA_LABEL_OFFSET,
                    point.y - PERSONA_LABEL_OFFSET,
                ),
                point.id,
                TextAnchor::Start,
                11.0,
                TITLE_COLOR,
            );
        }

        scene
    }
}

fn tick_label(tick: f64) -> String {
    if tick.fract() == 0.0 {
        format!("{}", tick as i64)
    } else {
        format!("{tick}")
    }
}
