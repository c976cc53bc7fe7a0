//! Horizontal timeline of a persona's decisions.

use crate::fixture::{DecisionCategory, DecisionNode};
use crate::render_config::DecisionPathConfig;
use crate::scene::{Role, Scene, Shape, TextAnchor};
use crate::text::truncate;

const BASELINE_COLOR: &str = "#475569";
const CATEGORY_COLOR: &str = "#cbd5e1";
const EVENT_COLOR: &str = "#e2e8f0";
const INTERVENTION_COLOR: &str = "#94a3b8";
const CATEGORY_GAP: f64 = 10.0;
const INTERVENTION_ROW_OFFSET: f64 = 14.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeStyle {
    pub radius: f64,
    pub fill: &'static str,
    pub stroke: &'static str,
}

/// Marker tier for a category; severity grows with radius.
pub fn node_style(category: DecisionCategory) -> NodeStyle {
    match category {
        DecisionCategory::Micro => NodeStyle {
            radius: 6.0,
            fill: "#94a3b8",
            stroke: "#cbd5e1",
        },
        DecisionCategory::Medium => NodeStyle {
            radius: 8.0,
            fill: "#818cf8",
            stroke: "#a5b4fc",
        },
        DecisionCategory::Critical => NodeStyle {
            radius: 11.0,
            fill: "#22c55e",
            stroke: "#16a34a",
        },
    }
}

/// Evenly spaced x positions between `padding` and `width - padding`.
/// A single node sits at `padding`.
pub fn node_positions(count: usize, width: f64, padding: f64) -> Vec<f64> {
    let spacing = if count > 1 {
        (width - padding * 2.0) / (count - 1) as f64
    } else {
        0.0
    };
    (0..count).map(|idx| padding + spacing * idx as f64).collect()
}

#[derive(Debug, Clone)]
pub struct PlacedNode<'a> {
    pub decision: &'a DecisionNode,
    pub x: f64,
    pub y: f64,
    pub style: NodeStyle,
}

pub struct DecisionPath<'a> {
    decisions: &'a [DecisionNode],
    label: Option<String>,
    config: &'a DecisionPathConfig,
}

impl<'a> DecisionPath<'a> {
    pub fn new(decisions: &'a [DecisionNode], config: &'a DecisionPathConfig) -> Self {
        Self {
            decisions,
            label: None,
            config,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn place(&self) -> Vec<PlacedNode<'a>> {
        let positions = node_positions(
            self.decisions.len(),
            self.config.width,
            self.config.padding,
        );
        self.decisions
            .iter()
            .zip(positions)
            .map(|(decision, x)| PlacedNode {
                decision,
                x,
                y: self.config.line_y,
                style: node_style(decision.category),
            })
            .collect()
    }

    pub fn render(&self) -> Scene {
        let config = self.config;
        let mut scene = Scene::new(config.width, config.height);
        scene.label = self.label.clone();
        scene.line(
            Role::Baseline,
            (config.padding, config.line_y),
            (config.width - config.padding, config.line_y),
            BASELINE_COLOR,
            2.0,
        );

        for node in self.place() {
            let NodeStyle {
                radius,
                fill,
                stroke,
            } = node.style;
            scene.push(
                Role::Marker,
                Shape::Circle {
                    cx: node.x,
                    cy: node.y,
                    r: radius,
                    fill,
                    stroke: Some(stroke),
                    stroke_width: 1.5,
                    opacity: 1.0,
                },
            );
            scene.text(
                Role::Category,
                (node.x, node.y - radius - CATEGORY_GAP),
                node.decision.category.as_str().to_ascii_uppercase(),
                TextAnchor::Middle,
                10.0,
                CATEGORY_COLOR,
            );
            scene.text(
                Role::Event,
                (node.x, config.label_y),
                truncate(&node.decision.event, config.event_max_chars),
                TextAnchor::Middle,
                11.0,
                EVENT_COLOR,
            );
            scene.text(
                Role::Intervention,
                (node.x, config.label_y + INTERVENTION_ROW_OFFSET),
                format!(
                    "AI: {}",
                    truncate(&node.decision.ai_intervention, config.intervention_max_chars)
                ),
                TextAnchor::Middle,
                10.0,
                INTERVENTION_COLOR,
            );
        }

        tracing::trace!(
            target: "black_box::render",
            nodes = self.decisions.len(),
            "decision_path.rendered"
        );
        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{PersonaFixture, ProgressLevel};

    fn node(id: &str, category: DecisionCategory) -> DecisionNode {
        DecisionNode {
            id: id.to_string(),
            category,
            event: format!("{id} happens"),
            user_action: "acts".to_string(),
            ai_intervention: "nudges".to_string(),
            delta_utility: 0.0,
            delta_malleability: 0.0,
            progress: ProgressLevel::Goal,
        }
    }

    #[test]
    fn single_node_sits_at_padding() {
        assert_eq!(node_positions(1, 640.0, 32.0), vec![32.0]);
    }

    #[test]
    fn empty_sequence_has_no_positions() {
        assert!(node_positions(0, 640.0, 32.0).is_empty());
    }

    #[test]
    fn positions_span_padding_to_far_edge() {
        let positions = node_positions(5, 640.0, 32.0);
        assert_eq!(positions.first(), Some(&32.0));
        assert_eq!(positions.last(), Some(&608.0));
        for pair in positions.windows(2) {
            assert!((pair[1] - pair[0] - 144.0).abs() < 1e-9);
        }
    }

    #[test]
    fn styles_grow_with_severity() {
        let micro = node_style(DecisionCategory::Micro);
        let medium = node_style(DecisionCategory::Medium);
        let critical = node_style(DecisionCategory::Critical);
        assert!(micro.radius < medium.radius && medium.radius < critical.radius);
        assert_eq!(critical.fill, "#22c55e");
    }

    #[test]
    fn render_emits_one_marker_per_decision() {
        let fixture = PersonaFixture::builtin();
        let config = DecisionPathConfig::default();
        let drifter = fixture.persona("B").unwrap();
        let scene = DecisionPath::new(&drifter.decisions, &config).render();
        assert_eq!(scene.count(Role::Marker), 5);
        assert_eq!(scene.count(Role::Category), 5);
        assert_eq!(scene.count(Role::Event), 5);
        assert_eq!(scene.count(Role::Intervention), 5);
        assert_eq!(scene.count(Role::Baseline), 1);
    }

    #[test]
    fn empty_sequence_renders_baseline_only() {
        let config = DecisionPathConfig::default();
        let scene = DecisionPath::new(&[], &config).render();
        assert_eq!(scene.count(Role::Marker), 0);
        assert_eq!(scene.elements.len(), 1);
    }

    #[test]
    fn category_label_sits_above_marker() {
        let config = DecisionPathConfig::default();
        let decisions = vec![node("X-1", DecisionCategory::Critical)];
        let scene = DecisionPath::new(&decisions, &config).render();
        let label = scene.iter_role(Role::Category).next().unwrap();
        match &label.shape {
            Shape::Text { x, y, content, .. } => {
                assert_eq!(*x, 32.0);
                assert_eq!(*y, 68.0 - 11.0 - 10.0);
                assert_eq!(content, "CRITICAL");
            }
            other => panic!("unexpected shape {other:?}"),
        }
    }

    #[test]
    fn text_rows_are_truncated() {
        let fixture = PersonaFixture::builtin();
        let config = DecisionPathConfig::default();
        let drifter = fixture.persona("B").unwrap();
        let scene = DecisionPath::new(&drifter.decisions, &config).render();
        for event in scene.texts(Role::Event) {
            assert!(event.chars().count() <= 46);
        }
        for intervention in scene.texts(Role::Intervention) {
            assert!(intervention.starts_with("AI: "));
            assert!(intervention.chars().count() <= 48 + 4);
        }
        assert_eq!(
            scene.texts(Role::Event)[4],
            "Deadline to enroll in Future Escape hits with…"
        );
    }

    #[test]
    fn label_is_carried_into_scene() {
        let config = DecisionPathConfig::default();
        let decisions = vec![node("X-1", DecisionCategory::Micro)];
        let path = DecisionPath::new(&decisions, &config).with_label("Person X — The Test");
        assert_eq!(path.label(), Some("Person X — The Test"));
        assert_eq!(path.render().label.as_deref(), Some("Person X — The Test"));
    }

    #[test]
    fn render_does_not_touch_input() {
        let config = DecisionPathConfig::default();
        let decisions = vec![
            node("X-1", DecisionCategory::Micro),
            node("X-2", DecisionCategory::Medium),
        ];
        let before = decisions.clone();
        let _ = DecisionPath::new(&decisions, &config).render();
        assert_eq!(decisions, before);
    }
}
