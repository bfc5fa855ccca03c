//! Error types for shot-group analysis.
//!
//! Errors fall into three families:
//!
//! - configuration errors ([`AnalysisError::UnsupportedDistance`]) reject the whole request,
//! - data errors ([`AnalysisError::InvalidScore`], [`AnalysisError::InvalidShot`]) fail the
//!   group (or table) they were found in,
//! - precondition errors ([`AnalysisError::EmptyGroup`]) mean "nothing to render" and are
//!   skipped by the pipeline rather than reported.

use thiserror::Error;

/// Result type for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors that can occur while ingesting, analysing or rendering shots.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Distance is not one of the configured target faces
    #[error("Unsupported distance: {requested}")]
    UnsupportedDistance { requested: u32 },

    /// Score is neither an integer nor `X`
    #[error("Invalid score: '{raw_value}'")]
    InvalidScore { raw_value: String },

    /// Statistics or layout requested for a group with no shots
    #[error("Shot group is empty")]
    EmptyGroup,

    /// A row of the shot table could not be turned into a shot
    #[error("Invalid shot at row {row}: {reason}")]
    InvalidShot { row: usize, reason: String },

    /// Shot table header lacks a required column
    #[error("Missing column '{0}' in shot table")]
    MissingColumn(String),

    /// CSV reader error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Renderer failed to produce output
    #[error("Render error: {0}")]
    Render(String),
}

impl AnalysisError {
    /// Stable code for programmatic handling (used by the HTTP layer).
    pub fn code(&self) -> &'static str {
        match self {
            AnalysisError::UnsupportedDistance { .. } => "UNSUPPORTED_DISTANCE",
            AnalysisError::InvalidScore { .. } => "INVALID_SCORE",
            AnalysisError::EmptyGroup => "EMPTY_GROUP",
            AnalysisError::InvalidShot { .. } => "INVALID_SHOT",
            AnalysisError::MissingColumn(_) => "MISSING_COLUMN",
            AnalysisError::Csv(_) => "INVALID_CSV",
            AnalysisError::Io(_) => "IO_ERROR",
            AnalysisError::Render(_) => "RENDER_ERROR",
        }
    }

    /// Whether the error was caused by the caller's input rather than the environment.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            AnalysisError::UnsupportedDistance { .. }
                | AnalysisError::InvalidScore { .. }
                | AnalysisError::EmptyGroup
                | AnalysisError::InvalidShot { .. }
                | AnalysisError::MissingColumn(_)
                | AnalysisError::Csv(_)
        )
    }
}
