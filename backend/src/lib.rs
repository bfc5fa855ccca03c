//! # ShotMarker
//!
//! Shot-group analysis and target diagram layout.
//!
//! A table of shots (x/y offsets from the target centre in millimetres, a
//! firing-position identifier and a score) is split into left, middle and
//! right groups. Each group gets descriptive statistics (centroid, median
//! point, widest pair, total score) and a render-ready [`models::Scene`]
//! with the target rings and MOA grid of the chosen distance.
//!
//! ## Architecture
//!
//! - [`models`]: shots, target faces, scenes
//! - [`parsing`]: CSV ingest
//! - [`services`]: partitioning, statistics, layout, plot generation
//! - [`render`]: scene renderers (SVG)
//! - [`config`]: server settings
//! - [`http`]: axum upload form and REST API
//!
//! The analysis core performs no I/O; only [`services::plot_generator`] and
//! the HTTP layer write files.

pub mod config;
pub mod error;
pub mod models;
pub mod parsing;
pub mod render;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;

pub use error::{AnalysisError, Result};
