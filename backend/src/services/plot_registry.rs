//! Registry of diagrams generated by the server.
//!
//! Only files recorded here are served back to clients, so a request path can
//! never reach anything else in the output directory.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use super::plot_generator::PlotOutputs;

/// A generated file and when it was produced.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RegisteredPlot {
    pub file_name: String,
    pub path: PathBuf,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// In-memory plot registry.
#[derive(Clone, Default)]
pub struct PlotRegistry {
    plots: Arc<RwLock<HashMap<String, RegisteredPlot>>>,
}

impl PlotRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every file of a plot run.
    pub fn register_outputs(&self, outputs: &PlotOutputs) {
        let mut plots = self.plots.write();
        for file in &outputs.files {
            plots.insert(
                file.file_name.clone(),
                RegisteredPlot {
                    file_name: file.file_name.clone(),
                    path: file.path.clone(),
                    created_at: chrono::Utc::now(),
                },
            );
        }
    }

    pub fn get(&self, file_name: &str) -> Option<RegisteredPlot> {
        self.plots.read().get(file_name).cloned()
    }

    pub fn len(&self) -> usize {
        self.plots.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.plots.read().is_empty()
    }

    /// Forget (and delete) plots created before `cutoff`. Returns how many were removed.
    pub fn prune_before(&self, cutoff: chrono::DateTime<chrono::Utc>) -> usize {
        let mut plots = self.plots.write();
        let stale: Vec<String> = plots
            .values()
            .filter(|p| p.created_at < cutoff)
            .map(|p| p.file_name.clone())
            .collect();

        for name in &stale {
            if let Some(plot) = plots.remove(name) {
                if let Err(e) = std::fs::remove_file(&plot.path) {
                    log::warn!("Failed to remove {}: {}", plot.path.display(), e);
                }
            }
        }
        stale.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FiringPosition, Point};
    use crate::services::plot_generator::PlotFile;
    use crate::services::statistics::GroupStatistics;

    fn outputs(dir: &std::path::Path, names: &[&str]) -> PlotOutputs {
        let files = names
            .iter()
            .map(|name| {
                let path = dir.join(name);
                std::fs::write(&path, b"<svg/>").unwrap();
                PlotFile {
                    position: FiringPosition::Left,
                    name: name.trim_end_matches(".svg").to_string(),
                    file_name: name.to_string(),
                    path,
                    statistics: GroupStatistics {
                        shot_count: 1,
                        centroid: Point::default(),
                        median: Point::default(),
                        total_score: 5,
                        count_x: 0,
                        furthest_pair: None,
                    },
                }
            })
            .collect();
        PlotOutputs {
            files,
            failures: vec![],
        }
    }

    #[test]
    fn test_register_and_get() {
        let dir = tempfile::tempdir().unwrap();
        let registry = PlotRegistry::new();
        registry.register_outputs(&outputs(dir.path(), &["a_l.svg", "a_r.svg"]));

        assert_eq!(registry.len(), 2);
        assert!(registry.get("a_l.svg").is_some());
        assert!(registry.get("a_m.svg").is_none());
        assert!(registry.get("../a_l.svg").is_none());
    }

    #[test]
    fn test_prune_removes_files() {
        let dir = tempfile::tempdir().unwrap();
        let registry = PlotRegistry::new();
        registry.register_outputs(&outputs(dir.path(), &["b_l.svg"]));

        let removed = registry.prune_before(chrono::Utc::now() + chrono::Duration::seconds(1));
        assert_eq!(removed, 1);
        assert!(registry.is_empty());
        assert!(!dir.path().join("b_l.svg").exists());
    }

    #[test]
    fn test_prune_keeps_recent() {
        let dir = tempfile::tempdir().unwrap();
        let registry = PlotRegistry::new();
        registry.register_outputs(&outputs(dir.path(), &["c_l.svg"]));

        let removed = registry.prune_before(chrono::Utc::now() - chrono::Duration::hours(1));
        assert_eq!(removed, 0);
        assert_eq!(registry.len(), 1);
    }
}
