use log::debug;
use std::io::Read;
use std::path::Path;

use crate::error::{AnalysisError, Result};
use crate::models::Shot;

pub const COLUMN_ID: &str = "id";
pub const COLUMN_X: &str = "x mm";
pub const COLUMN_Y: &str = "y mm";
pub const COLUMN_SCORE: &str = "score";

/// Positions of the required columns within a header record.
struct ColumnIndex {
    id: usize,
    x: usize,
    y: usize,
    score: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| AnalysisError::MissingColumn(name.to_string()))
        };

        Ok(Self {
            id: find(COLUMN_ID)?,
            x: find(COLUMN_X)?,
            y: find(COLUMN_Y)?,
            score: find(COLUMN_SCORE)?,
        })
    }
}

fn parse_coordinate(raw: &str, column: &str, row: usize) -> Result<f64> {
    let value: f64 = raw.parse().map_err(|_| AnalysisError::InvalidShot {
        row,
        reason: format!("'{}' is not a number in column '{}'", raw, column),
    })?;

    if !value.is_finite() {
        return Err(AnalysisError::InvalidShot {
            row,
            reason: format!("'{}' is not a finite value in column '{}'", raw, column),
        });
    }

    Ok(value)
}

/// Read shots from any CSV source.
///
/// Column names are matched exactly; extra columns are ignored. Rows are
/// numbered from 1 (the first line after the header) in error messages.
/// Scores are kept verbatim and validated later, per group.
pub fn parse_shots_reader<R: Read>(source: R) -> Result<Vec<Shot>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let columns = ColumnIndex::from_headers(reader.headers()?)?;
    let mut shots = Vec::new();

    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let row = index + 1;

        let field = |idx: usize| record.get(idx).unwrap_or("");

        let id = field(columns.id);
        if id.is_empty() {
            return Err(AnalysisError::InvalidShot {
                row,
                reason: "empty identifier".to_string(),
            });
        }

        let x = parse_coordinate(field(columns.x), COLUMN_X, row)?;
        let y = parse_coordinate(field(columns.y), COLUMN_Y, row)?;

        shots.push(Shot::new(id, x, y, field(columns.score)));
    }

    debug!("Parsed {} shots from CSV", shots.len());
    Ok(shots)
}

/// Parse shots from CSV text (e.g. an uploaded file held in memory).
pub fn parse_shots_csv_str(content: &str) -> Result<Vec<Shot>> {
    parse_shots_reader(content.as_bytes())
}

/// Parse shots from a CSV file on disk.
pub fn parse_shots_csv(csv_path: &Path) -> Result<Vec<Shot>> {
    let file = std::fs::File::open(csv_path)?;
    parse_shots_reader(file)
}
