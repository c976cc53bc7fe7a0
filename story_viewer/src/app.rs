use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use color_eyre::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use story_core::{Mode, Shell};
use tracing::info;

use crate::ui::{draw_ui, UiState};

pub struct StoryApp {
    terminal: Terminal<CrosstermBackend<std::io::Stdout>>,
    shell: Shell,
    ui_state: UiState,
    log_receiver: Receiver<String>,
}

impl StoryApp {
    pub fn new(shell: Shell, log_receiver: Receiver<String>) -> Result<Self> {
        let mut stdout = std::io::stdout();
        crossterm::execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        crossterm::terminal::enable_raw_mode()?;
        terminal.clear()?;
        terminal.hide_cursor()?;
        Ok(Self {
            terminal,
            shell,
            ui_state: UiState::default(),
            log_receiver,
        })
    }

    pub fn run(mut self) -> Result<()> {
        let mut last_draw: Option<Instant> = None;
        let mut dirty = true;

        loop {
            while let Ok(line) = self.log_receiver.try_recv() {
                self.ui_state.push_log(line);
                dirty = true;
            }

            let due = last_draw.map_or(true, |at| at.elapsed() >= Duration::from_millis(100));
            if dirty && due {
                self.terminal
                    .draw(|frame| draw_ui(frame, &self.shell, &self.ui_state))?;
                last_draw = Some(Instant::now());
                dirty = false;
            }

            if event::poll(Duration::from_millis(50))? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if apply_key(&mut self.shell, key.code) == KeyOutcome::Quit {
                            break;
                        }
                        dirty = true;
                    }
                    Event::Resize(_, _) => dirty = true,
                    _ => {}
                }
            }
        }

        info!("Viewer closed");
        self.terminal.show_cursor()?;
        crossterm::terminal::disable_raw_mode()?;
        crossterm::execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
}

/// Map one key press onto the shell for the active mode.
pub fn apply_key(shell: &mut Shell, code: KeyCode) -> KeyOutcome {
    match (shell.mode(), code) {
        (_, KeyCode::Char('q')) | (Mode::Landing, KeyCode::Esc) => return KeyOutcome::Quit,
        (Mode::Landing, KeyCode::Char('g') | KeyCode::Char('1')) => {
            shell.select_mode(Mode::Guided)
        }
        (Mode::Landing, KeyCode::Char('f') | KeyCode::Char('2')) => shell.select_mode(Mode::Free),
        (
            Mode::Guided,
            KeyCode::Right | KeyCode::Enter | KeyCode::Char('n') | KeyCode::Char(' '),
        ) => shell.activate_primary(),
        (Mode::Guided, KeyCode::Left | KeyCode::Char('p')) => shell.retreat(),
        (Mode::Free, KeyCode::Down | KeyCode::Char('j')) => shell.select_next_persona(),
        (Mode::Free, KeyCode::Up | KeyCode::Char('k')) => shell.select_previous_persona(),
        (Mode::Guided | Mode::Free, KeyCode::Esc | KeyCode::Char('b')) => shell.back_to_landing(),
        _ => {}
    }
    KeyOutcome::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use story_core::{PersonaFixture, RenderConfig, StepId};

    fn shell() -> Shell {
        Shell::with_rng(
            PersonaFixture::builtin(),
            RenderConfig::builtin(),
            SmallRng::seed_from_u64(9),
        )
    }

    #[test]
    fn landing_keys_pick_modes() {
        let mut shell = shell();
        assert_eq!(apply_key(&mut shell, KeyCode::Char('g')), KeyOutcome::Continue);
        assert_eq!(shell.mode(), Mode::Guided);
        apply_key(&mut shell, KeyCode::Esc);
        assert_eq!(shell.mode(), Mode::Landing);
        apply_key(&mut shell, KeyCode::Char('f'));
        assert_eq!(shell.mode(), Mode::Free);
    }

    #[test]
    fn escape_on_landing_quits() {
        let mut shell = shell();
        assert_eq!(apply_key(&mut shell, KeyCode::Esc), KeyOutcome::Quit);
        assert_eq!(apply_key(&mut shell, KeyCode::Char('q')), KeyOutcome::Quit);
    }

    #[test]
    fn guided_arrows_move_between_steps() {
        let mut shell = shell();
        apply_key(&mut shell, KeyCode::Char('g'));
        apply_key(&mut shell, KeyCode::Right);
        apply_key(&mut shell, KeyCode::Right);
        apply_key(&mut shell, KeyCode::Left);
        let step = shell.guided().map(|session| session.controller().current());
        assert_eq!(step, Some(StepId::WorldContext));
    }

    #[test]
    fn enter_on_last_step_returns_to_landing() {
        let mut shell = shell();
        apply_key(&mut shell, KeyCode::Char('g'));
        for _ in 0..5 {
            apply_key(&mut shell, KeyCode::Enter);
        }
        assert_eq!(shell.mode(), Mode::Guided);
        apply_key(&mut shell, KeyCode::Enter);
        assert_eq!(shell.mode(), Mode::Landing);
    }

    #[test]
    fn free_mode_arrows_change_selection() {
        let mut shell = shell();
        apply_key(&mut shell, KeyCode::Char('f'));
        apply_key(&mut shell, KeyCode::Down);
        assert_eq!(shell.free().map(|s| s.selected_id().to_string()), Some("B".into()));
        apply_key(&mut shell, KeyCode::Up);
        apply_key(&mut shell, KeyCode::Up);
        assert_eq!(shell.free().map(|s| s.selected_id().to_string()), Some("F".into()));
    }
}
