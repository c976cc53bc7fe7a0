//! Domain-to-pixel mapping shared by the chart renderers.
//!
//! Values are not clamped: an input outside `[0, 1]` lands outside the
//! drawing area. Range checks belong to fixture validation.

use serde::Deserialize;

/// Linear interpolation of `value` between `start` and `end`.
pub fn lerp(value: f64, start: f64, end: f64) -> f64 {
    start + value * (end - start)
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Padding {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

/// Rectangular drawing area with padding on every side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub width: f64,
    pub height: f64,
    pub padding: Padding,
}

impl PlotArea {
    pub fn new(width: f64, height: f64, padding: Padding) -> Self {
        Self {
            width,
            height,
            padding,
        }
    }

    pub fn inner_width(&self) -> f64 {
        self.width - self.padding.left - self.padding.right
    }

    pub fn inner_height(&self) -> f64 {
        self.height - self.padding.top - self.padding.bottom
    }

    pub fn left(&self) -> f64 {
        self.padding.left
    }

    pub fn right(&self) -> f64 {
        self.padding.left + self.inner_width()
    }

    pub fn top(&self) -> f64 {
        self.padding.top
    }

    pub fn bottom(&self) -> f64 {
        self.padding.top + self.inner_height()
    }

    /// Horizontal axis, direct: 0 is the left edge.
    pub fn map_x(&self, value: f64) -> f64 {
        lerp(value, self.left(), self.right())
    }

    /// Vertical axis, inverted: 1 is the top edge.
    pub fn map_y(&self, value: f64) -> f64 {
        lerp(value, self.bottom(), self.top())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> PlotArea {
        PlotArea::new(
            500.0,
            350.0,
            Padding {
                left: 60.0,
                right: 24.0,
                top: 24.0,
                bottom: 48.0,
            },
        )
    }

    #[test]
    fn inner_dimensions_subtract_padding() {
        let area = area();
        assert_eq!(area.inner_width(), 416.0);
        assert_eq!(area.inner_height(), 278.0);
    }

    #[test]
    fn map_x_spans_left_to_right() {
        let area = area();
        assert_eq!(area.map_x(0.0), 60.0);
        assert_eq!(area.map_x(1.0), 60.0 + area.inner_width());
        assert_eq!(area.map_x(0.5), 268.0);
    }

    #[test]
    fn map_y_is_inverted() {
        let area = area();
        assert_eq!(area.map_y(0.0), area.bottom());
        assert_eq!(area.map_y(1.0), 24.0);
        assert_eq!(area.bottom(), 302.0);
    }

    #[test]
    fn mapping_is_monotonic() {
        let area = area();
        let samples: Vec<f64> = (0..=20).map(|i| i as f64 / 20.0).collect();
        for pair in samples.windows(2) {
            assert!(area.map_x(pair[0]) <= area.map_x(pair[1]));
            assert!(area.map_y(pair[0]) >= area.map_y(pair[1]));
        }
    }

    #[test]
    fn out_of_range_values_are_not_clamped() {
        let area = area();
        assert!(area.map_x(1.5) > area.right());
        assert!(area.map_y(-0.5) > area.bottom());
    }

    #[test]
    fn lerp_endpoints() {
        assert_eq!(lerp(0.0, 32.0, 608.0), 32.0);
        assert_eq!(lerp(1.0, 32.0, 608.0), 608.0);
    }
}
