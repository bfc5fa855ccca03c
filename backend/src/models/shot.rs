//! Shot records and per-position groups.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AnalysisError;

/// Marker character identifying a sighter (practice) shot.
pub const SIGHTER_MARKER: char = 'S';

/// Points awarded for an `X`, the maximum ring value.
pub const X_SCORE_POINTS: u32 = 6;

/// A point in target coordinates (millimetres, origin at the target centre).
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Firing position encoded by the first character of a shot identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FiringPosition {
    Left,
    Middle,
    Right,
}

impl FiringPosition {
    /// Resolve the position from an identifier prefix, if it has one.
    pub fn from_identifier(id: &str) -> Option<Self> {
        match id.chars().next()? {
            'L' => Some(FiringPosition::Left),
            'M' => Some(FiringPosition::Middle),
            'R' => Some(FiringPosition::Right),
            _ => None,
        }
    }

    /// Output file suffix (`l`, `m`, `r`).
    pub fn file_suffix(&self) -> &'static str {
        match self {
            FiringPosition::Left => "l",
            FiringPosition::Middle => "m",
            FiringPosition::Right => "r",
        }
    }
}

impl fmt::Display for FiringPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FiringPosition::Left => "left",
            FiringPosition::Middle => "middle",
            FiringPosition::Right => "right",
        };
        f.write_str(name)
    }
}

/// Parsed score of a single shot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Score {
    /// Inner ring hit, worth [`X_SCORE_POINTS`]
    X,
    Points(i64),
}

impl Score {
    pub fn points(&self) -> i64 {
        match self {
            Score::X => X_SCORE_POINTS as i64,
            Score::Points(p) => *p,
        }
    }

    pub fn is_x(&self) -> bool {
        matches!(self, Score::X)
    }
}

impl FromStr for Score {
    type Err = AnalysisError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed == "X" {
            return Ok(Score::X);
        }
        trimmed
            .parse::<i64>()
            .map(Score::Points)
            .map_err(|_| AnalysisError::InvalidScore {
                raw_value: raw.to_string(),
            })
    }
}

/// One row of the shot table.
///
/// The score is kept as the raw table value so that a malformed score fails
/// only the statistics of the group it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub score: String,
}

impl Shot {
    pub fn new(id: impl Into<String>, x: f64, y: f64, score: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            score: score.into(),
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn firing_position(&self) -> Option<FiringPosition> {
        FiringPosition::from_identifier(&self.id)
    }

    pub fn is_sighter(&self) -> bool {
        self.id.contains(SIGHTER_MARKER)
    }

    pub fn parsed_score(&self) -> Result<Score, AnalysisError> {
        self.score.parse()
    }

    /// Identifier with its firing-position prefix removed (`"L3"` → `"3"`).
    pub fn tag(&self) -> &str {
        match self.firing_position() {
            Some(_) => &self.id[1..],
            None => &self.id,
        }
    }
}

/// Ordered shots fired from one position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotGroup {
    pub position: FiringPosition,
    pub shots: Vec<Shot>,
}

impl ShotGroup {
    pub fn new(position: FiringPosition) -> Self {
        Self {
            position,
            shots: Vec::new(),
        }
    }

    pub fn with_shots(position: FiringPosition, shots: Vec<Shot>) -> Self {
        Self { position, shots }
    }

    pub fn len(&self) -> usize {
        self.shots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shots.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Shot> {
        self.shots.iter()
    }

    pub fn push(&mut self, shot: Shot) {
        self.shots.push(shot);
    }
}
