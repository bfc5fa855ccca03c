//! Target faces and angular grid units for each supported distance.
//!
//! Ring sizes follow the ICFRA F-Class faces and are stored as diameters,
//! exactly as printed on the published target face drawings.

use serde::Serialize;
use std::fmt;

use crate::error::{AnalysisError, Result};

/// Supported firing distances.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Distance {
    M300,
    M500,
    M600,
    M700,
    M800,
    M900,
}

impl Distance {
    pub const ALL: [Distance; 6] = [
        Distance::M300,
        Distance::M500,
        Distance::M600,
        Distance::M700,
        Distance::M800,
        Distance::M900,
    ];

    pub fn from_meters(meters: u32) -> Result<Self> {
        match meters {
            300 => Ok(Distance::M300),
            500 => Ok(Distance::M500),
            600 => Ok(Distance::M600),
            700 => Ok(Distance::M700),
            800 => Ok(Distance::M800),
            900 => Ok(Distance::M900),
            other => Err(AnalysisError::UnsupportedDistance { requested: other }),
        }
    }

    pub fn meters(&self) -> u32 {
        match self {
            Distance::M300 => 300,
            Distance::M500 => 500,
            Distance::M600 => 600,
            Distance::M700 => 700,
            Distance::M800 => 800,
            Distance::M900 => 900,
        }
    }

    /// Millimetres subtended by one minute of angle at this distance.
    pub fn moa_mm(&self) -> f64 {
        let one_minute = (1.0_f64 / 60.0).to_radians();
        self.meters() as f64 * 1000.0 * one_minute.tan()
    }

    pub fn profile(&self) -> &'static TargetProfile {
        &PROFILES[*self as usize]
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m", self.meters())
    }
}

/// A named scoring ring.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Ring {
    pub label: &'static str,
    pub diameter_mm: f64,
}

impl Ring {
    pub fn radius_mm(&self) -> f64 {
        self.diameter_mm / 2.0
    }
}

/// Rings and grid unit of the target face used at one distance.
#[derive(Debug, PartialEq, Serialize)]
pub struct TargetProfile {
    pub distance: Distance,
    /// Rings from the innermost (`X`) outwards
    pub rings: &'static [Ring],
}

impl TargetProfile {
    /// Grid spacing in millimetres (one MOA at the profile's distance).
    pub fn grid_unit(&self) -> f64 {
        self.distance.moa_mm()
    }
}

const fn ring(label: &'static str, diameter_mm: f64) -> Ring {
    Ring { label, diameter_mm }
}

const RINGS_300M: [Ring; 6] = [
    ring("(X)", 35.0),
    ring("(6)", 70.0),
    ring("(5)", 140.0),
    ring("(4)", 280.0),
    ring("(3)", 420.0),
    ring("(2)", 600.0),
];

const RINGS_500M: [Ring; 6] = [
    ring("(X)", 50.0),
    ring("(6)", 100.0),
    ring("(5)", 200.0),
    ring("(4)", 400.0),
    ring("(3)", 600.0),
    ring("(2)", 1000.0),
];

const RINGS_600M: [Ring; 6] = [
    ring("(X)", 60.0),
    ring("(6)", 120.0),
    ring("(5)", 240.0),
    ring("(4)", 480.0),
    ring("(3)", 720.0),
    ring("(2)", 1200.0),
];

const RINGS_700M: [Ring; 6] = [
    ring("(X)", 100.0),
    ring("(6)", 200.0),
    ring("(5)", 400.0),
    ring("(4)", 640.0),
    ring("(3)", 960.0),
    ring("(2)", 1440.0),
];

const RINGS_800M: [Ring; 6] = [
    ring("(X)", 100.0),
    ring("(6)", 200.0),
    ring("(5)", 400.0),
    ring("(4)", 640.0),
    ring("(3)", 960.0),
    ring("(2)", 1440.0),
];

const RINGS_900M: [Ring; 6] = [
    ring("(X)", 127.0),
    ring("(6)", 255.0),
    ring("(5)", 510.0),
    ring("(4)", 815.0),
    ring("(3)", 1120.0),
    ring("(2)", 1830.0),
];

// Indexed by `Distance as usize`.
static PROFILES: [TargetProfile; 6] = [
    TargetProfile {
        distance: Distance::M300,
        rings: &RINGS_300M,
    },
    TargetProfile {
        distance: Distance::M500,
        rings: &RINGS_500M,
    },
    TargetProfile {
        distance: Distance::M600,
        rings: &RINGS_600M,
    },
    TargetProfile {
        distance: Distance::M700,
        rings: &RINGS_700M,
    },
    TargetProfile {
        distance: Distance::M800,
        rings: &RINGS_800M,
    },
    TargetProfile {
        distance: Distance::M900,
        rings: &RINGS_900M,
    },
];

/// Look up the target profile for a distance in metres.
pub fn lookup(distance_m: u32) -> Result<&'static TargetProfile> {
    Distance::from_meters(distance_m).map(|d| d.profile())
}
