//! Service layer for shot-group analysis.
//!
//! `partition`, `statistics`, `scene_builder` and `analysis` are pure and do
//! no I/O. `plot_generator` drives a renderer and writes files, and
//! `plot_registry` tracks what the server has written.

pub mod analysis;
pub mod partition;
pub mod plot_generator;
pub mod plot_registry;
pub mod scene_builder;
pub mod statistics;


pub use analysis::{analyze_group, analyze_shots, AnalysisOptions, AnalysisReport, GroupAnalysis};
pub use partition::partition;
pub use plot_generator::{generate_plots, generate_plots_from_shots, PlotOutputs, PlotRequest};
pub use plot_registry::PlotRegistry;
pub use scene_builder::{build_scene, BoundsPolicy, LayoutOptions};
pub use statistics::{compute_statistics, FurthestPair, GroupStatistics, SighterPolicy};
