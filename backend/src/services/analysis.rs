//! Partition → statistics → layout for a whole shot table.

use chrono::NaiveDate;
use log::{debug, warn};
use serde::Serialize;

use super::partition::partition;
use super::scene_builder::{build_scene, BoundsPolicy, LayoutOptions};
use super::statistics::{compute_statistics, GroupStatistics, SighterPolicy};
use crate::error::{AnalysisError, Result};
use crate::models::{Distance, FiringPosition, Scene, Shot, ShotGroup, TargetProfile};

/// Request-level settings shared by every group.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOptions {
    pub distance: Distance,
    /// Output file prefix; each group is named `{prefix}_{l|m|r}`
    pub prefix: String,
    pub x_bounds: BoundsPolicy,
    pub y_bounds: BoundsPolicy,
    pub sighter_policy: SighterPolicy,
    pub date: NaiveDate,
}

impl AnalysisOptions {
    pub fn new(distance: Distance, prefix: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            distance,
            prefix: prefix.into(),
            x_bounds: BoundsPolicy::AutoFit,
            y_bounds: BoundsPolicy::AutoFit,
            sighter_policy: SighterPolicy::default(),
            date,
        }
    }

    /// Map operator offsets onto bounds policies (zero → fit, non-zero → fixed).
    pub fn with_offsets(mut self, x_offset: i64, y_offset: i64) -> Self {
        self.x_bounds = BoundsPolicy::from_offset(x_offset);
        self.y_bounds = BoundsPolicy::from_offset(y_offset);
        self
    }

    pub fn with_sighter_policy(mut self, policy: SighterPolicy) -> Self {
        self.sighter_policy = policy;
        self
    }

    pub fn group_name(&self, position: FiringPosition) -> String {
        format!("{}_{}", self.prefix, position.file_suffix())
    }
}

/// A group that was laid out successfully.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupAnalysis {
    pub name: String,
    pub statistics: GroupStatistics,
    pub scene: Scene,
}

/// A group whose data could not be analysed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupFailure {
    pub position: FiringPosition,
    pub name: String,
    pub code: String,
    pub message: String,
}

/// Outcome of analysing a full shot table.
///
/// Empty positions appear in neither list.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AnalysisReport {
    pub groups: Vec<GroupAnalysis>,
    pub failures: Vec<GroupFailure>,
}

impl AnalysisReport {
    pub fn group(&self, position: FiringPosition) -> Option<&GroupAnalysis> {
        self.groups.iter().find(|g| g.scene.position == position)
    }

    pub fn scenes(&self) -> impl Iterator<Item = &Scene> {
        self.groups.iter().map(|g| &g.scene)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.failures.is_empty()
    }
}

/// Analyse one non-empty group.
pub fn analyze_group(
    group: &ShotGroup,
    profile: &TargetProfile,
    options: &AnalysisOptions,
) -> Result<GroupAnalysis> {
    let name = options.group_name(group.position);
    let statistics = compute_statistics(group, options.sighter_policy)?;

    let layout = LayoutOptions::new(options.distance, name.clone(), options.date)
        .with_bounds(options.x_bounds, options.y_bounds);
    let scene = build_scene(group, &statistics, profile, &layout)?;

    Ok(GroupAnalysis {
        name,
        statistics,
        scene,
    })
}

/// Split the shots by position and analyse each non-empty group independently.
///
/// A data error in one group is recorded in [`AnalysisReport::failures`] and
/// does not stop the remaining groups.
pub fn analyze_shots(shots: Vec<Shot>, options: &AnalysisOptions) -> AnalysisReport {
    let profile = options.distance.profile();
    let (left, middle, right) = partition(shots);
    let mut report = AnalysisReport::default();

    for group in [left, middle, right] {
        if group.is_empty() {
            debug!("No shots for {} position, skipping", group.position);
            continue;
        }

        match analyze_group(&group, profile, options) {
            Ok(analysis) => {
                debug!(
                    "Analysed {} group: {} shots, score {}",
                    group.position,
                    group.len(),
                    analysis.statistics.score_line()
                );
                report.groups.push(analysis);
            }
            Err(AnalysisError::EmptyGroup) => {}
            Err(e) => {
                warn!("Failed to analyse {} group: {}", group.position, e);
                report.failures.push(GroupFailure {
                    position: group.position,
                    name: options.group_name(group.position),
                    code: e.code().to_string(),
                    message: e.to_string(),
                });
            }
        }
    }

    report
}
