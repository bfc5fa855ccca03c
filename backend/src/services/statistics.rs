//! Descriptive statistics for a single shot group.

use serde::Serialize;

use crate::error::{AnalysisError, Result};
use crate::models::{Point, Shot, ShotGroup};

/// How sighter shots affect the furthest-pair scan.
///
/// With `StopOnFirstSighter` the scan walks pairs in row order and ends for
/// the whole group as soon as a pair contains a sighter, keeping whatever
/// maximum was found so far. `ExcludeSighterPairs` skips such pairs and
/// keeps scanning.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SighterPolicy {
    #[default]
    StopOnFirstSighter,
    ExcludeSighterPairs,
}

/// The two shots furthest apart and their distance in millimetres.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FurthestPair {
    pub first: Shot,
    pub second: Shot,
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStatistics {
    pub shot_count: usize,
    pub centroid: Point,
    pub median: Point,
    pub total_score: i64,
    pub count_x: usize,
    pub furthest_pair: Option<FurthestPair>,
}

impl GroupStatistics {
    /// Score in the usual `total.X-count` notation, e.g. `"59.4"`.
    pub fn score_line(&self) -> String {
        format!("{}.{}", self.total_score, self.count_x)
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median of a non-empty slice; the mean of the two middle values for even counts.
fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let count = sorted.len();
    if count % 2 == 0 {
        (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
    } else {
        sorted[count / 2]
    }
}

/// Sum the group's scores, counting each `X` as 6 points.
///
/// A total that overflows is reported against the shot that pushed it over.
pub fn total_score(shots: &[Shot]) -> Result<(i64, usize)> {
    let mut total = 0i64;
    let mut count_x = 0usize;
    for shot in shots {
        let score = shot.parsed_score()?;
        if score.is_x() {
            count_x += 1;
        }
        total = total
            .checked_add(score.points())
            .ok_or_else(|| AnalysisError::InvalidScore {
                raw_value: shot.score.clone(),
            })?;
    }
    Ok((total, count_x))
}

/// Find the pair of shots with the greatest separation.
///
/// Pairs `(i, j)` with `i < j` are visited in row order. Only a strictly
/// greater distance replaces the current best, starting from zero, so
/// coincident shots never form a pair.
pub fn furthest_pair(shots: &[Shot], policy: SighterPolicy) -> Option<FurthestPair> {
    let mut best: Option<(usize, usize)> = None;
    let mut max_distance = 0.0_f64;

    'scan: for i in 0..shots.len() {
        for j in (i + 1)..shots.len() {
            let (a, b) = (&shots[i], &shots[j]);
            if a.is_sighter() || b.is_sighter() {
                match policy {
                    SighterPolicy::StopOnFirstSighter => break 'scan,
                    SighterPolicy::ExcludeSighterPairs => continue,
                }
            }

            let distance = a.position().distance_to(&b.position());
            if distance > max_distance {
                max_distance = distance;
                best = Some((i, j));
            }
        }
    }

    best.map(|(i, j)| FurthestPair {
        first: shots[i].clone(),
        second: shots[j].clone(),
        distance: max_distance,
    })
}

/// Compute centroid, median, score and furthest pair for one group.
pub fn compute_statistics(group: &ShotGroup, policy: SighterPolicy) -> Result<GroupStatistics> {
    if group.is_empty() {
        return Err(AnalysisError::EmptyGroup);
    }

    let xs: Vec<f64> = group.iter().map(|s| s.x).collect();
    let ys: Vec<f64> = group.iter().map(|s| s.y).collect();
    let (total_score, count_x) = total_score(&group.shots)?;

    Ok(GroupStatistics {
        shot_count: group.len(),
        centroid: Point::new(mean(&xs), mean(&ys)),
        median: Point::new(median(&xs), median(&ys)),
        total_score,
        count_x,
        furthest_pair: furthest_pair(&group.shots, policy),
    })
}
