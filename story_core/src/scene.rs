//! Renderer-neutral scene graph.
//!
//! Layout functions produce a [`Scene`]; front-ends either paint it onto a
//! terminal canvas or serialise it with [`Scene::to_svg`].

use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Axis,
    Tick,
    TickLabel,
    AxisTitle,
    Baseline,
    Population,
    Marker,
    MarkerLabel,
    Category,
    Event,
    Intervention,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    fn as_svg(&self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        stroke: &'static str,
        stroke_width: f64,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
        fill: &'static str,
        stroke: Option<&'static str>,
        stroke_width: f64,
        opacity: f64,
    },
    Text {
        x: f64,
        y: f64,
        content: String,
        anchor: TextAnchor,
        font_size: f64,
        fill: &'static str,
        /// Degrees, rotated around `(x, y)`.
        rotate: Option<f64>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub role: Role,
    pub shape: Shape,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub label: Option<String>,
    pub elements: Vec<Element>,
}

impl Scene {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            label: None,
            elements: Vec::new(),
        }
    }

    pub fn push(&mut self, role: Role, shape: Shape) {
        self.elements.push(Element { role, shape });
    }

    pub fn line(
        &mut self,
        role: Role,
        (x1, y1): (f64, f64),
        (x2, y2): (f64, f64),
        stroke: &'static str,
        stroke_width: f64,
    ) {
        self.push(
            role,
            Shape::Line {
                x1,
                y1,
                x2,
                y2,
                stroke,
                stroke_width,
            },
        );
    }

    pub fn text(
        &mut self,
        role: Role,
        (x, y): (f64, f64),
        content: impl Into<String>,
        anchor: TextAnchor,
        font_size: f64,
        fill: &'static str,
    ) {
        self.push(
            role,
            Shape::Text {
                x,
                y,
                content: content.into(),
                anchor,
                font_size,
                fill,
                rotate: None,
            },
        );
    }

    pub fn iter_role(&self, role: Role) -> impl Iterator<Item = &Element> + '_ {
        self.elements
            .iter()
            .filter(move |element| element.role == role)
    }

    pub fn count(&self, role: Role) -> usize {
        self.iter_role(role).count()
    }

    /// Text content of every element with `role`, in draw order.
    pub fn texts(&self, role: Role) -> Vec<&str> {
        self.iter_role(role)
            .filter_map(|element| match &element.shape {
                Shape::Text { content, .. } => Some(content.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        let width = fmt_num(self.width);
        let height = fmt_num(self.height);
        let _ = write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" role="presentation">"#
        );
        out.push('\n');
        if let Some(label) = &self.label {
            let _ = writeln!(out, "  <title>{}</title>", escape(label));
        }
        for element in &self.elements {
            out.push_str("  ");
            write_shape(&mut out, &element.shape);
            out.push('\n');
        }
        out.push_str("</svg>");
        out
    }
}

fn write_shape(out: &mut String, shape: &Shape) {
    match shape {
        Shape::Line {
            x1,
            y1,
            x2,
            y2,
            stroke,
            stroke_width,
        } => {
            let _ = write!(
                out,
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}"/>"#,
                fmt_num(*x1),
                fmt_num(*y1),
                fmt_num(*x2),
                fmt_num(*y2),
                stroke,
                fmt_num(*stroke_width)
            );
        }
        Shape::Circle {
            cx,
            cy,
            r,
            fill,
            stroke,
            stroke_width,
            opacity,
        } => {
            let _ = write!(
                out,
                r#"<circle cx="{}" cy="{}" r="{}" fill="{}""#,
                fmt_num(*cx),
                fmt_num(*cy),
                fmt_num(*r),
                fill
            );
            if let Some(stroke) = stroke {
                let _ = write!(
                    out,
                    r#" stroke="{}" stroke-width="{}""#,
                    stroke,
                    fmt_num(*stroke_width)
                );
            }
            if *opacity < 1.0 {
                let _ = write!(out, r#" opacity="{}""#, fmt_num(*opacity));
            }
            out.push_str("/>");
        }
        Shape::Text {
            x,
            y,
            content,
            anchor,
            font_size,
            fill,
            rotate,
        } => {
            let (x, y) = (fmt_num(*x), fmt_num(*y));
            let _ = write!(
                out,
                r#"<text x="{x}" y="{y}" text-anchor="{}" font-size="{}" fill="{}""#,
                anchor.as_svg(),
                fmt_num(*font_size),
                fill
            );
            if let Some(angle) = rotate {
                let _ = write!(out, r#" transform="rotate({} {x} {y})""#, fmt_num(*angle));
            }
            let _ = write!(out, ">{}</text>", escape(content));
        }
    }
}

/// Integers print bare, everything else with at most two decimals.
pub fn fmt_num(value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() < 1e-9 {
        return format!("{}", rounded as i64);
    }
    let text = format!("{value:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
