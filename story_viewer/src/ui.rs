use std::collections::VecDeque;

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin};
use ratatui::prelude::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Circle, Context, Line as CanvasLine, Points};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use story_core::{
    format_coordinate, format_delta, format_percent, truncate, FreeSession, GuidedSession, Mode,
    PersonaProfile, PrimaryAction, Role, RosterStyle, Scene, Shape, Shell, TextAnchor,
    ViewState, DEFAULT_TRUNCATE,
};

pub struct UiState {
    pub logs: VecDeque<String>,
    pub max_logs: usize,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            logs: VecDeque::new(),
            max_logs: 6,
        }
    }
}

impl UiState {
    pub fn push_log<S: Into<String>>(&mut self, line: S) {
        let mut text: String = line.into();
        while text.ends_with('\n') || text.ends_with('\r') {
            text.pop();
        }
        if text.is_empty() {
            return;
        }
        self.logs.push_front(text);
        while self.logs.len() > self.max_logs {
            self.logs.pop_back();
        }
    }
}

const ACCENT: Color = Color::Cyan;
const MUTED: Color = Color::DarkGray;

pub fn draw_ui(frame: &mut Frame, shell: &Shell, state: &UiState) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(3),
            Constraint::Length(state.max_logs as u16 + 2),
        ])
        .split(frame.size());

    draw_header(frame, layout[0], shell);
    match shell.view() {
        ViewState::Landing => draw_landing(frame, layout[1]),
        ViewState::Guided(session) => draw_guided(frame, layout[1], shell, session),
        ViewState::Free(session) => draw_free(frame, layout[1], shell, session),
    }
    draw_commands(frame, layout[2], shell);
    draw_logs(frame, layout[3], state);
}

fn draw_header(frame: &mut Frame, area: Rect, shell: &Shell) {
    let mut spans = vec![Span::styled(
        "Black Box Democracy",
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    )];
    match shell.mode() {
        Mode::Landing => {}
        Mode::Guided => {
            spans.push(Span::raw("  ·  Guided Mode"));
            if let Some(session) = shell.guided() {
                spans.push(Span::styled(
                    format!("  ·  {}", session.controller().progress_label()),
                    Style::default().fg(MUTED),
                ));
            }
        }
        Mode::Free => spans.push(Span::raw("  ·  Free Mode")),
    }
    let header = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title("Story"));
    frame.render_widget(header, area);
}

fn draw_landing(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Black Box Democracy",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from("A system that learns what you value by watching how you move."),
        Line::from(""),
        Line::from("Choose how to enter the story:"),
        Line::from(""),
        Line::from(vec![
            Span::styled("[g] ", Style::default().fg(Color::Yellow)),
            Span::raw("Guided Mode (Narrated)"),
            Span::raw("      "),
            Span::styled("[f] ", Style::default().fg(Color::Yellow)),
            Span::raw("Free Mode (Explore)"),
        ]),
    ];
    let landing = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(landing, area);
}

fn draw_guided(frame: &mut Frame, area: Rect, shell: &Shell, session: &GuidedSession) {
    let fixture = shell.fixture();
    let view = session.view(fixture);
    let path_scenes = session.path_scenes(fixture, shell.config().decision_path());
    let scatter_scene = session.scatter_scene(fixture, shell.config());
    let has_visual = !path_scenes.is_empty() || scatter_scene.is_some();

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(if has_visual {
            [Constraint::Percentage(40), Constraint::Percentage(60)]
        } else {
            [Constraint::Percentage(100), Constraint::Percentage(0)]
        })
        .split(area);

    let plan = view.plan;
    let mut lines = vec![
        Line::from(Span::styled(plan.eyebrow, Style::default().fg(MUTED))),
        Line::from(Span::styled(
            plan.title,
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for paragraph in plan.paragraphs {
        lines.push(Line::from(*paragraph));
        lines.push(Line::from(""));
    }
    for fact in plan.facts {
        lines.push(Line::from(format!("• {fact}")));
    }
    for persona in &view.roster {
        lines.push(Line::from(roster_line(plan.roster, persona)));
    }

    let narrative = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Narrative"));
    frame.render_widget(narrative, columns[0]);

    if !has_visual {
        return;
    }

    if let Some(scene) = scatter_scene {
        draw_scene(frame, columns[1], &scene, "Identity space");
        return;
    }

    let constraints: Vec<Constraint> = path_scenes
        .iter()
        .map(|_| Constraint::Ratio(1, path_scenes.len() as u32))
        .collect();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(columns[1]);
    for (scene, area) in path_scenes.iter().zip(rows.iter()) {
        let title = scene.label.clone().unwrap_or_default();
        draw_scene(frame, *area, scene, &title);
    }
}

fn roster_line(style: RosterStyle, persona: &PersonaProfile) -> String {
    match style {
        RosterStyle::Coordinates => format!(
            "{}  U {} · M {}",
            persona.display_name(),
            format_coordinate(persona.utility),
            format_coordinate(persona.malleability)
        ),
        _ => format!(
            "{}  {}: {}",
            persona.id,
            persona.display_name(),
            truncate(&persona.description, DEFAULT_TRUNCATE)
        ),
    }
}

fn draw_free(frame: &mut Frame, area: Rect, shell: &Shell, session: &FreeSession) {
    let fixture = shell.fixture();
    let selected = session.selected(fixture);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(24),
            Constraint::Percentage(52),
            Constraint::Percentage(24),
        ])
        .split(area);

    let roster: Vec<Line> = fixture
        .personas()
        .iter()
        .map(|persona| {
            let text = format!("{}  {}", persona.id, persona.display_name());
            if persona.id == selected.id {
                Line::from(Span::styled(
                    format!("▶ {text}"),
                    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(format!("  {text}"))
            }
        })
        .collect();
    let roster = Paragraph::new(roster)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Personas"));
    frame.render_widget(roster, columns[0]);

    let center = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(12), Constraint::Min(4)])
        .split(columns[1]);
    let path = session.decision_path(fixture, shell.config().decision_path());
    let scene = path.render();
    draw_scene(frame, center[0], &scene, &selected.display_name());

    let mut details = Vec::new();
    for decision in &selected.decisions {
        details.push(Line::from(vec![
            Span::styled(
                format!("{} ", decision.id),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("[{} · {}] ", decision.category, decision.progress.as_str()),
                Style::default().fg(MUTED),
            ),
            Span::raw(format!(
                "dU {}  dM {}",
                format_delta(decision.delta_utility),
                format_delta(decision.delta_malleability)
            )),
        ]));
        details.push(Line::from(format!("  {}", decision.event)));
        details.push(Line::from(format!("  You: {}", decision.user_action)));
        details.push(Line::from(Span::styled(
            format!("  AI: {}", decision.ai_intervention),
            Style::default().fg(Color::Green),
        )));
    }
    let details = Paragraph::new(details)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Decisions"));
    frame.render_widget(details, center[1]);

    let card = vec![
        Line::from(Span::styled(
            selected.display_name(),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(selected.description.as_str()),
        Line::from(""),
        Line::from(format!("Utility       {}", format_percent(selected.utility))),
        Line::from(format!(
            "Malleability  {}",
            format_percent(selected.malleability)
        )),
        Line::from(format!("Decisions     {}", selected.decision_count())),
        Line::from(""),
        Line::from(Span::styled(
            format!("Goal: {}", fixture.goal()),
            Style::default().fg(MUTED),
        )),
    ];
    let card = Paragraph::new(card)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Profile"));
    frame.render_widget(card, columns[2]);
}

fn draw_commands(frame: &mut Frame, area: Rect, shell: &Shell) {
    let text = match shell.mode() {
        Mode::Landing => "[g] guided  [f] free  [q] quit".to_string(),
        Mode::Guided => {
            let primary = match shell.guided().map(GuidedSession::primary_action) {
                Some(PrimaryAction::Exit) => "[enter] back to menu",
                _ => "[→/n] next",
            };
            let first = shell
                .guided()
                .map_or(true, |session| session.controller().is_first());
            if first {
                format!("{primary}  [esc] menu  [q] quit")
            } else {
                format!("[←/p] previous  {primary}  [esc] menu  [q] quit")
            }
        }
        Mode::Free => "[↑/↓] persona  [esc] menu  [q] quit".to_string(),
    };
    let commands = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Commands"));
    frame.render_widget(commands, area);
}

fn draw_logs(frame: &mut Frame, area: Rect, state: &UiState) {
    let lines: Vec<Line> = state
        .logs
        .iter()
        .map(|line| Line::from(line.as_str()))
        .collect();
    let logs = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Logs"));
    frame.render_widget(logs, area);
}

/// Paint a scene into a bordered canvas. Scene y grows downward, canvas y
/// grows upward.
fn draw_scene(frame: &mut Frame, area: Rect, scene: &Scene, title: &str) {
    let inner = area.inner(&Margin {
        vertical: 1,
        horizontal: 1,
    });
    let units_per_cell = scene.width / f64::from(inner.width.max(1));
    let canvas = Canvas::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title.to_string()),
        )
        .marker(Marker::Braille)
        .x_bounds([0.0, scene.width])
        .y_bounds([0.0, scene.height])
        .paint(move |ctx| paint_scene(ctx, scene, units_per_cell));
    frame.render_widget(canvas, area);
}

fn paint_scene(ctx: &mut Context, scene: &Scene, units_per_cell: f64) {
    let flip = |y: f64| scene.height - y;
    for element in &scene.elements {
        match &element.shape {
            Shape::Line {
                x1,
                y1,
                x2,
                y2,
                stroke,
                ..
            } => ctx.draw(&CanvasLine {
                x1: *x1,
                y1: flip(*y1),
                x2: *x2,
                y2: flip(*y2),
                color: hex_color(stroke),
            }),
            Shape::Circle {
                cx,
                cy,
                r,
                fill,
                opacity,
                ..
            } => {
                if *opacity < 1.0 {
                    ctx.draw(&Points {
                        coords: &[(*cx, flip(*cy))],
                        color: hex_color(fill),
                    });
                } else {
                    ctx.draw(&Circle {
                        x: *cx,
                        y: flip(*cy),
                        radius: *r,
                        color: hex_color(fill),
                    });
                }
            }
            Shape::Text {
                x,
                y,
                content,
                anchor,
                fill,
                ..
            } => {
                // Event and intervention copy is listed beside the chart.
                if matches!(element.role, Role::Event | Role::Intervention) {
                    continue;
                }
                let width = content.chars().count() as f64 * units_per_cell;
                let left = match anchor {
                    TextAnchor::Start => *x,
                    TextAnchor::Middle => *x - width / 2.0,
                    TextAnchor::End => *x - width,
                };
                ctx.print(
                    left.max(0.0),
                    flip(*y),
                    Span::styled(content.clone(), Style::default().fg(hex_color(fill))),
                );
            }
        }
    }
}

fn hex_color(hex: &str) -> Color {
    hex.parse().unwrap_or(Color::White)
}
