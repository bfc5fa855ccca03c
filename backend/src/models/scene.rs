//! Render-ready scene description for one shot group.

use serde::Serialize;

use super::shot::{FiringPosition, Point};

/// Inclusive axis window in millimetres.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Bounds {
    pub x: AxisRange,
    pub y: AxisRange,
}

/// A scoring ring drawn around the origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RingOverlay {
    pub label: String,
    pub radius: f64,
    /// Point the label is attached to; renderers draw the text just to its right
    pub label_anchor: Point,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct GridSpacing {
    pub major: f64,
    pub minor: f64,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerColor {
    Red,
    Blue,
    Orange,
    Purple,
    Grey,
}

/// One shot as drawn on the diagram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointMarker {
    pub position: Point,
    pub color: MarkerColor,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatOverlay {
    Centroid {
        position: Point,
        color: MarkerColor,
        label: String,
    },
    Median {
        position: Point,
        color: MarkerColor,
        label: String,
    },
    MaxDistance {
        from: Point,
        to: Point,
        color: MarkerColor,
        label: String,
    },
}

impl StatOverlay {
    pub fn label(&self) -> &str {
        match self {
            StatOverlay::Centroid { label, .. }
            | StatOverlay::Median { label, .. }
            | StatOverlay::MaxDistance { label, .. } => label,
        }
    }

    pub fn color(&self) -> MarkerColor {
        match self {
            StatOverlay::Centroid { color, .. }
            | StatOverlay::Median { color, .. }
            | StatOverlay::MaxDistance { color, .. } => *color,
        }
    }
}

/// Everything a renderer needs to draw one group's diagram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub position: FiringPosition,
    pub title: String,
    pub bounds: Bounds,
    pub rings: Vec<RingOverlay>,
    pub grid: GridSpacing,
    pub markers: Vec<PointMarker>,
    pub overlays: Vec<StatOverlay>,
}
