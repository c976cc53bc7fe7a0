use std::{
    collections::HashSet,
    env, fmt, fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const BUILTIN_PERSONA_FIXTURE: &str = include_str!("data/personas.json");

const DEFAULT_GOAL_LABEL: &str = "Goal reached";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DecisionCategory {
    Micro,
    Medium,
    Critical,
}

impl DecisionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionCategory::Micro => "micro",
            DecisionCategory::Medium => "medium",
            DecisionCategory::Critical => "critical",
        }
    }
}

impl fmt::Display for DecisionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How close a decision brings the persona to the shared outcome.
///
/// Ordered: `Low < Medium < High < VeryHigh < Goal`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum ProgressLevel {
    Low,
    Medium,
    High,
    VeryHigh,
    Goal,
}

impl ProgressLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressLevel::Low => "low",
            ProgressLevel::Medium => "medium",
            ProgressLevel::High => "high",
            ProgressLevel::VeryHigh => "very-high",
            ProgressLevel::Goal => "goal",
        }
    }
}

impl fmt::Display for ProgressLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DecisionNode {
    pub id: String,
    pub category: DecisionCategory,
    pub event: String,
    pub user_action: String,
    pub ai_intervention: String,
    /// Display-only; never accumulated into the persona's coordinates.
    pub delta_utility: f64,
    pub delta_malleability: f64,
    pub progress: ProgressLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PersonaProfile {
    pub id: String,
    pub name: String,
    pub label: String,
    pub description: String,
    pub utility: f64,
    pub malleability: f64,
    /// Chronological, rendered left to right.
    pub decisions: Vec<DecisionNode>,
}

impl PersonaProfile {
    /// `"Person A — The Planner"`
    pub fn display_name(&self) -> String {
        format!("{} — {}", self.name, self.label)
    }

    pub fn decision_count(&self) -> usize {
        self.decisions.len()
    }
}

/// On-disk shape of a persona fixture document.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PersonaFixtureDocument {
    #[serde(default)]
    pub version: u32,
    /// Label of the outcome every persona converges on.
    #[serde(default)]
    pub goal: Option<String>,
    pub personas: Vec<PersonaProfile>,
}

/// Validated, read-only persona collection.
///
/// Always holds at least one persona; every persona holds at least one
/// decision and ends on [`ProgressLevel::Goal`].
#[derive(Debug, Clone)]
pub struct PersonaFixture {
    goal: String,
    personas: Vec<PersonaProfile>,
}

impl PersonaFixture {
    pub fn builtin() -> Arc<Self> {
        Arc::new(
            Self::from_json_str(BUILTIN_PERSONA_FIXTURE)
                .expect("builtin persona fixture should validate"),
        )
    }

    pub fn new(personas: Vec<PersonaProfile>) -> Result<Self, PersonaFixtureError> {
        validate_personas(&personas)?;
        Ok(Self {
            goal: DEFAULT_GOAL_LABEL.to_string(),
            personas,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, PersonaFixtureError> {
        let document: PersonaFixtureDocument = serde_json::from_str(json)?;
        validate_personas(&document.personas)?;
        Ok(Self {
            goal: document
                .goal
                .unwrap_or_else(|| DEFAULT_GOAL_LABEL.to_string()),
            personas: document.personas,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, PersonaFixtureError> {
        let contents =
            fs::read_to_string(path).map_err(|source| PersonaFixtureError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_json_str(&contents)
    }

    pub fn personas(&self) -> &[PersonaProfile] {
        &self.personas
    }

    pub fn persona(&self, id: &str) -> Option<&PersonaProfile> {
        self.personas.iter().find(|persona| persona.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.personas.iter().position(|persona| persona.id == id)
    }

    pub fn first(&self) -> &PersonaProfile {
        // Non-empty after validation.
        &self.personas[0]
    }

    pub fn len(&self) -> usize {
        self.personas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }

    pub fn goal(&self) -> &str {
        &self.goal
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Utility,
    Malleability,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Utility => f.write_str("utility"),
            Axis::Malleability => f.write_str("malleability"),
        }
    }
}

#[derive(Debug, Error)]
pub enum PersonaFixtureError {
    #[error("failed to parse persona fixture: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read persona fixture from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("persona fixture contains no personas")]
    Empty,
    #[error("duplicate persona id {id}")]
    DuplicatePersona { id: String },
    #[error("persona {persona} has no decisions")]
    EmptyDecisions { persona: String },
    #[error("persona {persona} repeats decision id {id}")]
    DuplicateDecision { persona: String, id: String },
    #[error("persona {persona} has {axis} {value} outside [0, 1]")]
    CoordinateOutOfRange {
        persona: String,
        axis: Axis,
        value: f64,
    },
    #[error("persona {persona} ends on {last} instead of goal")]
    MissingGoal {
        persona: String,
        last: ProgressLevel,
    },
}

fn validate_personas(personas: &[PersonaProfile]) -> Result<(), PersonaFixtureError> {
    if personas.is_empty() {
        return Err(PersonaFixtureError::Empty);
    }

    let mut seen = HashSet::new();
    for persona in personas {
        if !seen.insert(persona.id.as_str()) {
            return Err(PersonaFixtureError::DuplicatePersona {
                id: persona.id.clone(),
            });
        }

        for (axis, value) in [
            (Axis::Utility, persona.utility),
            (Axis::Malleability, persona.malleability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(PersonaFixtureError::CoordinateOutOfRange {
                    persona: persona.id.clone(),
                    axis,
                    value,
                });
            }
        }

        let Some(last) = persona.decisions.last() else {
            return Err(PersonaFixtureError::EmptyDecisions {
                persona: persona.id.clone(),
            });
        };
        if last.progress != ProgressLevel::Goal {
            return Err(PersonaFixtureError::MissingGoal {
                persona: persona.id.clone(),
                last: last.progress,
            });
        }

        let mut decision_ids = HashSet::new();
        for decision in &persona.decisions {
            if !decision_ids.insert(decision.id.as_str()) {
                return Err(PersonaFixtureError::DuplicateDecision {
                    persona: persona.id.clone(),
                    id: decision.id.clone(),
                });
            }
        }

        for pair in persona.decisions.windows(2) {
            if pair[1].progress < pair[0].progress {
                tracing::warn!(
                    target: "black_box::fixture",
                    persona = %persona.id,
                    decision = %pair[1].id,
                    from = %pair[0].progress,
                    to = %pair[1].progress,
                    "fixture.progress_regressed"
                );
            }
        }
    }
    Ok(())
}

/// JSON Schema describing [`PersonaFixtureDocument`].
pub fn persona_fixture_schema() -> schemars::schema::RootSchema {
    schemars::schema_for!(PersonaFixtureDocument)
}

/// Where the active fixture came from.
#[derive(Debug, Clone, Default)]
pub struct FixtureMetadata {
    path: Option<PathBuf>,
}

impl FixtureMetadata {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    pub fn is_builtin(&self) -> bool {
        self.path.is_none()
    }
}

/// Load the persona fixture from `override_path`, then `PERSONA_FIXTURE_PATH`,
/// falling back to the builtin fixture when neither loads.
pub fn load_persona_fixture_from_env(
    override_path: Option<&Path>,
) -> (Arc<PersonaFixture>, FixtureMetadata) {
    let candidate = override_path
        .map(Path::to_path_buf)
        .or_else(|| env::var("PERSONA_FIXTURE_PATH").ok().map(PathBuf::from));

    if let Some(path) = candidate {
        match PersonaFixture::from_file(&path) {
            Ok(fixture) => {
                tracing::info!(
                    target: "black_box::fixture",
                    path = %path.display(),
                    personas = fixture.len(),
                    "fixture.loaded=file"
                );
                return (Arc::new(fixture), FixtureMetadata::new(Some(path)));
            }
            Err(err) => {
                tracing::warn!(
                    target: "black_box::fixture",
                    path = %path.display(),
                    error = %err,
                    "fixture.load_failed"
                );
            }
        }
    }

    let fixture = PersonaFixture::builtin();
    tracing::info!(
        target: "black_box::fixture",
        personas = fixture.len(),
        "fixture.loaded=builtin"
    );
    (fixture, FixtureMetadata::new(None))
}
