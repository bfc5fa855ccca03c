//! HTTP handlers for the upload form and REST API.
//!
//! Each handler validates its input and delegates to the service layer;
//! CPU-bound analysis and rendering run on the blocking thread pool.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::header,
    response::{Html, IntoResponse, Response},
    Json,
};
use tracing::{info, warn};

use super::dto::{AnalyzeQuery, HealthResponse, PlotLinkDto, UploadParams, DEFAULT_DISTANCE_M};
use super::error::AppError;
use super::pages;
use super::state::AppState;
use crate::models::Distance;
use crate::parsing::parse_shots_csv_str;
use crate::services::analysis::{analyze_shots, AnalysisOptions, AnalysisReport};
use crate::services::plot_generator::{generate_plots_from_shots, PlotRequest};
use crate::services::SighterPolicy;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

const ALLOWED_EXTENSION: &str = ".csv";

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check() -> HandlerResult<HealthResponse> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

// =============================================================================
// Upload Form
// =============================================================================

/// GET /
pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(pages::upload_form(
        state.config.max_upload_bytes,
        DEFAULT_DISTANCE_M,
    ))
}

/// An uploaded file held in memory.
struct UploadedFile {
    file_name: String,
    content: Vec<u8>,
}

fn parse_int_field<T: std::str::FromStr>(value: &str) -> Result<T, AppError> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid parameter values".to_string()))
}

fn has_allowed_extension(file_name: &str) -> bool {
    file_name.to_lowercase().ends_with(ALLOWED_EXTENSION)
}

/// Check the upload the way the form promises before any parsing happens.
fn validate_upload(file: Option<UploadedFile>, max_bytes: usize) -> Result<String, AppError> {
    let file = file.ok_or_else(|| AppError::BadRequest("No file uploaded".to_string()))?;

    if file.file_name.is_empty() {
        return Err(AppError::BadRequest("No file selected".to_string()));
    }
    if !has_allowed_extension(&file.file_name) {
        return Err(AppError::BadRequest(
            "Invalid file type. Please upload a CSV file.".to_string(),
        ));
    }
    if file.content.len() > max_bytes {
        return Err(AppError::PayloadTooLarge(format!(
            "File too large. Maximum size is {} KB.",
            max_bytes / 1024
        )));
    }
    if file.content.is_empty() {
        return Err(AppError::BadRequest("File is empty.".to_string()));
    }

    let content = String::from_utf8(file.content).map_err(|_| {
        AppError::BadRequest("Invalid file encoding. Please ensure the file is a text CSV.".to_string())
    })?;

    let first_line = content.lines().next().unwrap_or("");
    if !first_line.contains(',') {
        return Err(AppError::BadRequest(
            "Invalid CSV format. File must contain comma-separated values.".to_string(),
        ));
    }

    Ok(content)
}

/// Unique output prefix: local timestamp plus a short random id.
fn unique_prefix() -> String {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("{}_{}", timestamp, &id[..8])
}

/// POST /upload
///
/// Multipart form with `file`, `distance`, `x_offset` and `y_offset`. Renders
/// the diagrams and returns a results page linking to them.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Html<String>, AppError> {
    let mut file = None;
    let mut params = UploadParams::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content = field.bytes().await?.to_vec();
                file = Some(UploadedFile { file_name, content });
            }
            "distance" => params.distance = parse_int_field(&field.text().await?)?,
            "x_offset" => params.x_offset = parse_int_field(&field.text().await?)?,
            "y_offset" => params.y_offset = parse_int_field(&field.text().await?)?,
            _ => {}
        }
    }

    let content = validate_upload(file, state.config.max_upload_bytes)?;

    if Distance::from_meters(params.distance).is_err() {
        return Err(AppError::BadRequest(
            "Invalid distance. Must be one of: 300, 500, 600, 700, 800, 900".to_string(),
        ));
    }

    let request = PlotRequest::new(
        unique_prefix(),
        params.distance,
        chrono::Local::now().date_naive(),
    )
    .with_offsets(params.x_offset, params.y_offset);
    info!(
        "Processing upload: prefix={}, distance={}m",
        request.prefix, params.distance
    );

    let renderer = state.renderer.clone();
    let output_dir = state.config.output_dir.clone();
    let outputs = tokio::task::spawn_blocking(move || {
        let shots = parse_shots_csv_str(&content)?;
        generate_plots_from_shots(shots, &request, renderer.as_ref(), &output_dir)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??;

    if outputs.is_empty() {
        let message = match outputs.failures.first() {
            Some(failure) => format!("Error processing file: {}", failure.message),
            None => "No valid shooting data found in the CSV file.".to_string(),
        };
        warn!("Upload produced no plots: {}", message);
        return Err(AppError::BadRequest(message));
    }

    state.plots.register_outputs(&outputs);

    let links: Vec<PlotLinkDto> = outputs
        .files
        .iter()
        .map(|f| PlotLinkDto::new(f.position, &f.file_name, &f.statistics))
        .collect();
    let failures: Vec<String> = outputs
        .failures
        .iter()
        .map(|f| format!("{} group: {}", f.position, f.message))
        .collect();

    Ok(Html(pages::results_page(params.distance, &links, &failures)))
}

// =============================================================================
// REST API
// =============================================================================

/// POST /v1/analyze
///
/// Analyse CSV text sent as the request body and return scenes and statistics
/// as JSON. Nothing is written to disk.
pub async fn analyze(
    Query(query): Query<AnalyzeQuery>,
    body: String,
) -> HandlerResult<AnalysisReport> {
    let distance = Distance::from_meters(query.distance.unwrap_or(DEFAULT_DISTANCE_M))?;
    let policy = if query.exclude_sighters.unwrap_or(false) {
        SighterPolicy::ExcludeSighterPairs
    } else {
        SighterPolicy::StopOnFirstSighter
    };
    let options = AnalysisOptions::new(
        distance,
        query.name.unwrap_or_else(|| "analysis".to_string()),
        chrono::Local::now().date_naive(),
    )
    .with_offsets(query.x_offset.unwrap_or(0), query.y_offset.unwrap_or(0))
    .with_sighter_policy(policy);

    let report = tokio::task::spawn_blocking(move || {
        parse_shots_csv_str(&body).map(|shots| analyze_shots(shots, &options))
    })
    .await
    .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??;

    Ok(Json(report))
}

/// GET /output/{filename}
///
/// Serve a diagram generated by this server.
pub async fn serve_plot(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let plot = state
        .plots
        .get(&filename)
        .ok_or_else(|| AppError::NotFound(format!("Plot {} not found", filename)))?;

    let bytes = tokio::fs::read(&plot.path)
        .await
        .map_err(|_| AppError::NotFound(format!("Plot {} not found", filename)))?;

    Ok((
        [(header::CONTENT_TYPE, state.renderer.content_type())],
        bytes,
    )
        .into_response())
}
