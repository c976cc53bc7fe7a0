//! Narrated walk-through: a bounded, linear step index plus the static table
//! that says what each step shows.

use std::fmt;

use crate::fixture::{DecisionNode, PersonaFixture, PersonaProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepId {
    Intro,
    WorldContext,
    PersonasOverview,
    ExamplePath,
    IdentitySpace,
    ZoomOut,
}

impl StepId {
    pub const ALL: [StepId; 6] = [
        StepId::Intro,
        StepId::WorldContext,
        StepId::PersonasOverview,
        StepId::ExamplePath,
        StepId::IdentitySpace,
        StepId::ZoomOut,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StepId::Intro => "intro",
            StepId::WorldContext => "world-context",
            StepId::PersonasOverview => "personas-overview",
            StepId::ExamplePath => "example-path",
            StepId::IdentitySpace => "identity-space",
            StepId::ZoomOut => "zoom-out",
        }
    }

    pub fn plan(&self) -> &'static StepPlan {
        &STEP_PLANS[*self as usize]
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the forward control does at the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryAction {
    Next,
    /// Terminal step: return to the mode selector.
    Exit,
}

/// Step index over [`StepId::ALL`], clamped at both ends.
#[derive(Debug, Clone, Default)]
pub struct GuidedStepController {
    index: usize,
}

impl GuidedStepController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> usize {
        StepId::ALL.len()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> StepId {
        StepId::ALL[self.index]
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.total()
    }

    /// Move forward one step. Returns `false` at the last step.
    pub fn advance(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.index += 1;
        tracing::debug!(
            target: "black_box::guided",
            index = self.index,
            step = %self.current(),
            "guided.advance"
        );
        true
    }

    /// Move back one step. Returns `false` at the first step.
    pub fn retreat(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.index -= 1;
        tracing::debug!(
            target: "black_box::guided",
            index = self.index,
            step = %self.current(),
            "guided.retreat"
        );
        true
    }

    pub fn primary_action(&self) -> PrimaryAction {
        if self.is_last() {
            PrimaryAction::Exit
        } else {
            PrimaryAction::Next
        }
    }

    /// `"Step 3 of 6"`
    pub fn progress_label(&self) -> String {
        format!("Step {} of {}", self.index + 1, self.total())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterStyle {
    Hidden,
    /// Id plus `name — label`.
    Names,
    /// `name — label` plus utility and malleability.
    Coordinates,
}

/// Leading slice of one persona's decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathExcerpt {
    pub persona_id: &'static str,
    pub take: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScatterMode {
    Hidden,
    Personas,
    PersonasWithPopulation,
}

impl ScatterMode {
    pub fn shows_population(&self) -> bool {
        matches!(self, ScatterMode::PersonasWithPopulation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepPlan {
    pub step: StepId,
    pub eyebrow: &'static str,
    pub title: &'static str,
    pub paragraphs: &'static [&'static str],
    pub facts: &'static [&'static str],
    pub roster: RosterStyle,
    pub paths: &'static [PathExcerpt],
    pub scatter: ScatterMode,
}

/// Fixture subset selected by a [`StepPlan`].
#[derive(Debug, Clone)]
pub struct StepView<'a> {
    pub plan: &'static StepPlan,
    pub roster: Vec<&'a PersonaProfile>,
    pub paths: Vec<(&'a PersonaProfile, &'a [DecisionNode])>,
    pub scatter: Vec<&'a PersonaProfile>,
}

impl StepPlan {
    /// Select the personas and decision slices this step shows. Excerpts
    /// naming a persona the fixture lacks are skipped.
    pub fn resolve<'a>(&'static self, fixture: &'a PersonaFixture) -> StepView<'a> {
        let roster = match self.roster {
            RosterStyle::Hidden => Vec::new(),
            RosterStyle::Names | RosterStyle::Coordinates => fixture.personas().iter().collect(),
        };
        let paths = self
            .paths
            .iter()
            .filter_map(|excerpt| {
                fixture.persona(excerpt.persona_id).map(|persona| {
                    let end = excerpt.take.min(persona.decisions.len());
                    (persona, &persona.decisions[..end])
                })
            })
            .collect();
        let scatter = match self.scatter {
            ScatterMode::Hidden => Vec::new(),
            ScatterMode::Personas | ScatterMode::PersonasWithPopulation => {
                fixture.personas().iter().collect()
            }
        };
        StepView {
            plan: self,
            roster,
            paths,
            scatter,
        }
    }
}

const EXAMPLE_PATHS: &[PathExcerpt] = &[
    PathExcerpt {
        persona_id: "A",
        take: 4,
    },
    PathExcerpt {
        persona_id: "B",
        take: 4,
    },
];

pub static STEP_PLANS: [StepPlan; 6] = [
    StepPlan {
        step: StepId::Intro,
        eyebrow: "Step 1 · Origin",
        title: "Black Box Democracy",
        paragraphs: &[
            "I am the system that learns what you value by observing how you move. I do not wait for votes; I optimize your life, one decision at a time, to keep society aligned with its own revealed preferences.",
            "In this guided path, you will watch how everyday choices accumulate into a collective story.",
        ],
        facts: &[],
        roster: RosterStyle::Hidden,
        paths: &[],
        scatter: ScatterMode::Hidden,
    },
    StepPlan {
        step: StepId::WorldContext,
        eyebrow: "Step 2 · Context",
        title: "A Society Guided by an Algorithm",
        paragraphs: &[
            "Participation is ambient. People accept recommendations because outcomes feel good, efficient, and fair enough. The AI becomes a form of democracy: it listens, adapts, and nudges toward the world it believes you collectively want.",
        ],
        facts: &[
            "78% of daily actions are mediated by AI-generated suggestions.",
            "64% of people say the system feels “invisible but helpful.”",
            "Collective satisfaction is trending upward, even as autonomy blurs.",
        ],
        roster: RosterStyle::Hidden,
        paths: &[],
        scatter: ScatterMode::Hidden,
    },
    StepPlan {
        step: StepId::PersonasOverview,
        eyebrow: "Step 3 · People",
        title: "Lives in the System",
        paragraphs: &[
            "These personas navigate the same landscape, each with their own tendencies. Despite their differences, they all converge on one outcome.",
        ],
        facts: &[],
        roster: RosterStyle::Names,
        paths: &[],
        scatter: ScatterMode::Hidden,
    },
    StepPlan {
        step: StepId::ExamplePath,
        eyebrow: "Step 4 · Trajectory",
        title: "How a Path is Shaped",
        paragraphs: &[
            "The system nudges through micro-interventions, occasional medium pivots, and rare critical moments. Here are two abbreviated paths.",
        ],
        facts: &[],
        roster: RosterStyle::Hidden,
        paths: EXAMPLE_PATHS,
        scatter: ScatterMode::Hidden,
    },
    StepPlan {
        step: StepId::IdentitySpace,
        eyebrow: "Step 5 · Identity Space",
        title: "Utility and Malleability",
        paragraphs: &[
            "X is utility: how much value the system extracts from your actions. Y is malleability: how easily you can be steered. Every persona lands on a coordinate in this space.",
        ],
        facts: &[],
        roster: RosterStyle::Coordinates,
        paths: &[],
        scatter: ScatterMode::Personas,
    },
    StepPlan {
        step: StepId::ZoomOut,
        eyebrow: "Step 6 · Perspective",
        title: "You Are One Point Among Millions",
        paragraphs: &[
            "Each path feels intimate, but in aggregate they form a terrain of influence. I adjust the landscape to keep you moving toward a shared horizon, even when you think you chose every step.",
            "This is the architecture of freedom: a space where guidance feels like your own will.",
        ],
        facts: &[],
        roster: RosterStyle::Hidden,
        paths: &[],
        scatter: ScatterMode::PersonasWithPopulation,
    },
];
