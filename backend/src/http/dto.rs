//! Request and response bodies for the HTTP API.

use serde::{Deserialize, Serialize};

use crate::models::FiringPosition;
use crate::services::GroupStatistics;

pub const DEFAULT_DISTANCE_M: u32 = 600;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Query parameters for `POST /v1/analyze`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeQuery {
    pub distance: Option<u32>,
    pub x_offset: Option<i64>,
    pub y_offset: Option<i64>,
    /// Name used in titles; defaults to `analysis`
    pub name: Option<String>,
    /// Skip sighter pairs instead of stopping the spread scan at the first one
    pub exclude_sighters: Option<bool>,
}

/// Form fields of `POST /upload` other than the file itself.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadParams {
    pub distance: u32,
    pub x_offset: i64,
    pub y_offset: i64,
}

impl Default for UploadParams {
    fn default() -> Self {
        Self {
            distance: DEFAULT_DISTANCE_M,
            x_offset: 0,
            y_offset: 0,
        }
    }
}

/// A generated diagram as presented to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotLinkDto {
    pub position: FiringPosition,
    pub url: String,
    pub score: String,
    pub shot_count: usize,
}

impl PlotLinkDto {
    pub fn new(position: FiringPosition, file_name: &str, statistics: &GroupStatistics) -> Self {
        Self {
            position,
            url: format!("/output/{}", file_name),
            score: statistics.score_line(),
            shot_count: statistics.shot_count,
        }
    }
}
