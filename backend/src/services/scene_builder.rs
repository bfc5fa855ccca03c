//! Lay out the diagram of one shot group.

use chrono::NaiveDate;
use serde::Serialize;

use super::statistics::GroupStatistics;
use crate::error::{AnalysisError, Result};
use crate::models::{
    AxisRange, Bounds, Distance, GridSpacing, MarkerColor, Point, PointMarker, RingOverlay,
    Scene, ShotGroup, StatOverlay, TargetProfile,
};

/// Half-width of the window always shown around the target centre.
pub const MIN_HALF_WINDOW_MM: f64 = 300.0;
/// Padding added beyond the outermost shot or the minimum window.
pub const WINDOW_PADDING_MM: f64 = 50.0;

pub const TITLE_DATE_FORMAT: &str = "%d-%b-%Y";

/// How one axis window is chosen.
///
/// Operators pass an offset per axis; zero means "fit to the shots" and any
/// other value pins the window to the fixed default. The offset's magnitude
/// is not used to pan the window.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundsPolicy {
    #[default]
    AutoFit,
    FixedWindow,
}

impl BoundsPolicy {
    pub fn from_offset(offset: i64) -> Self {
        if offset == 0 {
            BoundsPolicy::AutoFit
        } else {
            BoundsPolicy::FixedWindow
        }
    }

    fn range(&self, values: impl Iterator<Item = f64> + Clone) -> AxisRange {
        match self {
            BoundsPolicy::AutoFit => {
                let min = values.clone().fold(-MIN_HALF_WINDOW_MM, f64::min);
                let max = values.fold(MIN_HALF_WINDOW_MM, f64::max);
                AxisRange::new(min - WINDOW_PADDING_MM, max + WINDOW_PADDING_MM)
            }
            BoundsPolicy::FixedWindow => AxisRange::new(
                -MIN_HALF_WINDOW_MM - WINDOW_PADDING_MM,
                MIN_HALF_WINDOW_MM + WINDOW_PADDING_MM,
            ),
        }
    }
}

/// Per-diagram inputs besides the shots themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    pub distance: Distance,
    /// Name shown in the title (the output file stem)
    pub name: String,
    pub x_bounds: BoundsPolicy,
    pub y_bounds: BoundsPolicy,
    pub date: NaiveDate,
}

impl LayoutOptions {
    pub fn new(distance: Distance, name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            distance,
            name: name.into(),
            x_bounds: BoundsPolicy::AutoFit,
            y_bounds: BoundsPolicy::AutoFit,
            date,
        }
    }

    pub fn with_bounds(mut self, x_bounds: BoundsPolicy, y_bounds: BoundsPolicy) -> Self {
        self.x_bounds = x_bounds;
        self.y_bounds = y_bounds;
        self
    }
}

fn compute_bounds(group: &ShotGroup, options: &LayoutOptions) -> Bounds {
    Bounds {
        x: options.x_bounds.range(group.iter().map(|s| s.x)),
        y: options.y_bounds.range(group.iter().map(|s| s.y)),
    }
}

fn ring_overlays(profile: &TargetProfile) -> Vec<RingOverlay> {
    profile
        .rings
        .iter()
        .map(|ring| RingOverlay {
            label: ring.label.to_string(),
            radius: ring.radius_mm(),
            label_anchor: Point::new(ring.radius_mm(), 0.0),
        })
        .collect()
}

fn shot_markers(group: &ShotGroup) -> Vec<PointMarker> {
    group
        .iter()
        .map(|shot| PointMarker {
            position: shot.position(),
            color: if shot.is_sighter() {
                MarkerColor::Red
            } else {
                MarkerColor::Blue
            },
            label: format!("{}\n({})", shot.tag(), shot.score),
        })
        .collect()
}

fn stat_overlays(stats: &GroupStatistics) -> Vec<StatOverlay> {
    let mut overlays = vec![
        StatOverlay::Centroid {
            position: stats.centroid,
            color: MarkerColor::Orange,
            label: format!(
                "Centroid Center ({:.1}, {:.1})",
                stats.centroid.x, stats.centroid.y
            ),
        },
        StatOverlay::Median {
            position: stats.median,
            color: MarkerColor::Purple,
            label: format!(
                "Median Center ({:.1}, {:.1})",
                stats.median.x, stats.median.y
            ),
        },
    ];

    if let Some(pair) = &stats.furthest_pair {
        overlays.push(StatOverlay::MaxDistance {
            from: pair.first.position(),
            to: pair.second.position(),
            color: MarkerColor::Grey,
            label: format!("Max Distance ({:.1} mm)", pair.distance),
        });
    }

    overlays
}

/// Title block: distance and name, a blank line, the date, then `score.Xcount`.
pub fn scene_title(options: &LayoutOptions, stats: &GroupStatistics) -> String {
    format!(
        "{}m - {}\n\n{}\n{}",
        options.distance.meters(),
        options.name,
        options.date.format(TITLE_DATE_FORMAT),
        stats.score_line()
    )
}

/// Assemble the scene for one group from its statistics and target profile.
pub fn build_scene(
    group: &ShotGroup,
    stats: &GroupStatistics,
    profile: &TargetProfile,
    options: &LayoutOptions,
) -> Result<Scene> {
    if group.is_empty() {
        return Err(AnalysisError::EmptyGroup);
    }

    let grid_unit = profile.grid_unit();

    Ok(Scene {
        position: group.position,
        title: scene_title(options, stats),
        bounds: compute_bounds(group, options),
        rings: ring_overlays(profile),
        grid: GridSpacing {
            major: grid_unit,
            minor: grid_unit / 2.0,
        },
        markers: shot_markers(group),
        overlays: stat_overlays(stats),
    })
}
