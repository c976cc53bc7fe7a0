//! Top-level mode selection and the per-mode session state.
//!
//! Exactly one mode is active. Leaving a mode drops its session, so
//! re-entering always starts fresh.

use std::fmt;
use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::decision_path::DecisionPath;
use crate::fixture::{PersonaFixture, PersonaProfile};
use crate::guided::{GuidedStepController, PrimaryAction, StepPlan, StepView};
use crate::render_config::{DecisionPathConfig, RenderConfig};
use crate::scatter::{PopulationOverlay, PopulationPoint, ScatterPlot};
use crate::scene::Scene;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Landing,
    Guided,
    Free,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Landing => f.write_str("landing"),
            Mode::Guided => f.write_str("guided"),
            Mode::Free => f.write_str("free"),
        }
    }
}

pub struct GuidedSession {
    controller: GuidedStepController,
    overlay: PopulationOverlay,
    rng: SmallRng,
}

impl GuidedSession {
    pub fn new(population_size: usize, rng: SmallRng) -> Self {
        let mut session = Self {
            controller: GuidedStepController::new(),
            overlay: PopulationOverlay::new(population_size),
            rng,
        };
        session.sync_overlay();
        session
    }

    pub fn controller(&self) -> &GuidedStepController {
        &self.controller
    }

    pub fn plan(&self) -> &'static StepPlan {
        self.controller.current().plan()
    }

    pub fn view<'a>(&self, fixture: &'a PersonaFixture) -> StepView<'a> {
        self.plan().resolve(fixture)
    }

    pub fn population(&self) -> &[PopulationPoint] {
        self.overlay.points()
    }

    pub fn advance(&mut self) -> bool {
        let moved = self.controller.advance();
        self.sync_overlay();
        moved
    }

    pub fn retreat(&mut self) -> bool {
        let moved = self.controller.retreat();
        self.sync_overlay();
        moved
    }

    pub fn primary_action(&self) -> PrimaryAction {
        self.controller.primary_action()
    }

    /// Decision-path scenes for the current step, in table order.
    pub fn path_scenes(
        &self,
        fixture: &PersonaFixture,
        config: &DecisionPathConfig,
    ) -> Vec<Scene> {
        self.view(fixture)
            .paths
            .into_iter()
            .map(|(persona, decisions)| {
                DecisionPath::new(decisions, config)
                    .with_label(persona.display_name())
                    .render()
            })
            .collect()
    }

    /// Scatter scene for the current step, if it shows one.
    pub fn scatter_scene(
        &self,
        fixture: &PersonaFixture,
        config: &RenderConfig,
    ) -> Option<Scene> {
        let view = self.view(fixture);
        if view.scatter.is_empty() {
            return None;
        }
        Some(
            ScatterPlot::new(view.scatter, config.scatter())
                .with_population(self.overlay.points())
                .render(),
        )
    }

    fn sync_overlay(&mut self) {
        let wants_population = self.plan().scatter.shows_population();
        self.overlay.set_enabled(wants_population, &mut self.rng);
    }
}

#[derive(Debug, Clone)]
pub struct FreeSession {
    selected_id: String,
}

impl FreeSession {
    pub fn new(fixture: &PersonaFixture) -> Self {
        Self {
            selected_id: fixture.first().id.clone(),
        }
    }

    pub fn selected_id(&self) -> &str {
        &self.selected_id
    }

    /// Selected persona, or the first persona if the id is unknown.
    pub fn selected<'a>(&self, fixture: &'a PersonaFixture) -> &'a PersonaProfile {
        fixture
            .persona(&self.selected_id)
            .unwrap_or_else(|| fixture.first())
    }

    /// Returns `false` and keeps the current selection for unknown ids.
    pub fn select(&mut self, fixture: &PersonaFixture, id: &str) -> bool {
        if fixture.persona(id).is_none() {
            tracing::warn!(target: "black_box::free", id, "free.select_unknown");
            return false;
        }
        self.selected_id = id.to_string();
        tracing::debug!(target: "black_box::free", id, "free.selected");
        true
    }

    pub fn select_next(&mut self, fixture: &PersonaFixture) {
        self.step_selection(fixture, 1);
    }

    pub fn select_previous(&mut self, fixture: &PersonaFixture) {
        self.step_selection(fixture, fixture.len() - 1);
    }

    fn step_selection(&mut self, fixture: &PersonaFixture, offset: usize) {
        let current = fixture.position(&self.selected_id).unwrap_or(0);
        let next = (current + offset) % fixture.len();
        let id = fixture.personas()[next].id.clone();
        self.select(fixture, &id);
    }

    pub fn decision_path<'a>(
        &self,
        fixture: &'a PersonaFixture,
        config: &'a DecisionPathConfig,
    ) -> DecisionPath<'a> {
        let persona = self.selected(fixture);
        DecisionPath::new(&persona.decisions, config).with_label(persona.display_name())
    }
}

pub enum ViewState {
    Landing,
    Guided(GuidedSession),
    Free(FreeSession),
}

impl ViewState {
    pub fn mode(&self) -> Mode {
        match self {
            ViewState::Landing => Mode::Landing,
            ViewState::Guided(_) => Mode::Guided,
            ViewState::Free(_) => Mode::Free,
        }
    }
}

/// Owns the fixture, render config and whichever mode is on screen.
pub struct Shell {
    fixture: Arc<PersonaFixture>,
    config: Arc<RenderConfig>,
    view: ViewState,
    rng: SmallRng,
}

impl Shell {
    pub fn new(fixture: Arc<PersonaFixture>, config: Arc<RenderConfig>) -> Self {
        Self::with_rng(fixture, config, SmallRng::from_entropy())
    }

    /// Seeded variant; the seed only affects population overlays.
    pub fn with_rng(
        fixture: Arc<PersonaFixture>,
        config: Arc<RenderConfig>,
        rng: SmallRng,
    ) -> Self {
        Self {
            fixture,
            config,
            view: ViewState::Landing,
            rng,
        }
    }

    pub fn fixture(&self) -> &PersonaFixture {
        &self.fixture
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.view.mode()
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn select_mode(&mut self, mode: Mode) {
        if mode == self.mode() {
            return;
        }
        self.view = match mode {
            Mode::Landing => ViewState::Landing,
            Mode::Guided => {
                let rng = SmallRng::from_rng(&mut self.rng)
                    .unwrap_or_else(|_| SmallRng::from_entropy());
                ViewState::Guided(GuidedSession::new(
                    self.config.scatter().population_size,
                    rng,
                ))
            }
            Mode::Free => ViewState::Free(FreeSession::new(&self.fixture)),
        };
        tracing::info!(target: "black_box::shell", %mode, "shell.mode_selected");
    }

    pub fn back_to_landing(&mut self) {
        self.select_mode(Mode::Landing);
    }

    /// Forward control of the guided mode: next step, or back to landing
    /// from the terminal step. Ignored in other modes.
    pub fn activate_primary(&mut self) {
        let exit = match &mut self.view {
            ViewState::Guided(session) => match session.primary_action() {
                PrimaryAction::Next => {
                    session.advance();
                    false
                }
                PrimaryAction::Exit => true,
            },
            _ => false,
        };
        if exit {
            self.back_to_landing();
        }
    }

    pub fn retreat(&mut self) {
        if let ViewState::Guided(session) = &mut self.view {
            session.retreat();
        }
    }

    pub fn guided(&self) -> Option<&GuidedSession> {
        match &self.view {
            ViewState::Guided(session) => Some(session),
            _ => None,
        }
    }

    pub fn free(&self) -> Option<&FreeSession> {
        match &self.view {
            ViewState::Free(session) => Some(session),
            _ => None,
        }
    }

    pub fn select_persona(&mut self, id: &str) -> bool {
        match &mut self.view {
            ViewState::Free(session) => session.select(&self.fixture, id),
            _ => false,
        }
    }

    pub fn select_next_persona(&mut self) {
        if let ViewState::Free(session) = &mut self.view {
            session.select_next(&self.fixture);
        }
    }

    pub fn select_previous_persona(&mut self) {
        if let ViewState::Free(session) = &mut self.view {
            session.select_previous(&self.fixture);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guided::StepId;
    use crate::scene::Role;

    fn shell() -> Shell {
        Shell::with_rng(
            PersonaFixture::builtin(),
            RenderConfig::builtin(),
            SmallRng::seed_from_u64(42),
        )
    }

    #[test]
    fn starts_on_landing() {
        let shell = shell();
        assert_eq!(shell.mode(), Mode::Landing);
        assert!(shell.guided().is_none());
        assert!(shell.free().is_none());
    }

    #[test]
    fn guided_session_starts_at_first_step() {
        let mut shell = shell();
        shell.select_mode(Mode::Guided);
        let session = shell.guided().unwrap();
        assert_eq!(session.controller().current(), StepId::Intro);
        assert!(session.population().is_empty());
    }

    #[test]
    fn primary_at_last_step_returns_to_landing() {
        let mut shell = shell();
        shell.select_mode(Mode::Guided);
        for _ in 0..5 {
            shell.activate_primary();
        }
        assert_eq!(shell.guided().unwrap().controller().current(), StepId::ZoomOut);
        shell.activate_primary();
        assert_eq!(shell.mode(), Mode::Landing);
    }

    #[test]
    fn population_follows_zoom_out_step() {
        let mut shell = shell();
        shell.select_mode(Mode::Guided);
        for _ in 0..4 {
            shell.activate_primary();
        }
        assert_eq!(
            shell.guided().unwrap().controller().current(),
            StepId::IdentitySpace
        );
        assert!(shell.guided().unwrap().population().is_empty());

        shell.activate_primary();
        assert_eq!(shell.guided().unwrap().population().len(), 220);

        shell.retreat();
        assert!(shell.guided().unwrap().population().is_empty());
    }

    #[test]
    fn scatter_scene_only_where_planned() {
        let mut shell = shell();
        shell.select_mode(Mode::Guided);
        let fixture = PersonaFixture::builtin();
        let config = RenderConfig::builtin();
        assert!(shell
            .guided()
            .unwrap()
            .scatter_scene(&fixture, &config)
            .is_none());
        for _ in 0..5 {
            shell.activate_primary();
        }
        let scene = shell
            .guided()
            .unwrap()
            .scatter_scene(&fixture, &config)
            .unwrap();
        assert_eq!(scene.count(Role::Population), 220);
        assert_eq!(scene.count(Role::Marker), 6);
    }

    #[test]
    fn free_mode_defaults_to_first_persona() {
        let mut shell = shell();
        shell.select_mode(Mode::Free);
        let session = shell.free().unwrap();
        assert_eq!(session.selected_id(), "A");
    }

    #[test]
    fn unknown_selection_is_rejected() {
        let mut shell = shell();
        shell.select_mode(Mode::Free);
        assert!(!shell.select_persona("Z"));
        assert_eq!(shell.free().unwrap().selected_id(), "A");
    }

    #[test]
    fn selection_cycles_in_both_directions() {
        let mut shell = shell();
        shell.select_mode(Mode::Free);
        shell.select_previous_persona();
        assert_eq!(shell.free().unwrap().selected_id(), "F");
        shell.select_next_persona();
        shell.select_next_persona();
        assert_eq!(shell.free().unwrap().selected_id(), "B");
    }

    #[test]
    fn leaving_a_mode_drops_its_state() {
        let mut shell = shell();
        shell.select_mode(Mode::Free);
        shell.select_persona("C");
        shell.back_to_landing();
        shell.select_mode(Mode::Free);
        assert_eq!(shell.free().unwrap().selected_id(), "A");

        shell.back_to_landing();
        shell.select_mode(Mode::Guided);
        shell.activate_primary();
        shell.back_to_landing();
        shell.select_mode(Mode::Guided);
        assert_eq!(shell.guided().unwrap().controller().index(), 0);
    }

    #[test]
    fn primary_is_ignored_outside_guided() {
        let mut shell = shell();
        shell.activate_primary();
        shell.retreat();
        assert_eq!(shell.mode(), Mode::Landing);
    }
}
