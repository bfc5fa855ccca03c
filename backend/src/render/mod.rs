//! Turning scenes into image files.
//!
//! The analysis core only produces [`Scene`] values. A [`SceneRenderer`]
//! converts them into encoded images; writing the bytes somewhere is left to
//! the caller (see [`crate::services::plot_generator`]).

pub mod svg;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::Scene;

pub use svg::SvgRenderer;

/// Canvas settings handed to a renderer when it is constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderContext {
    /// Canvas width in pixels
    pub width: f64,
    /// Canvas height in pixels
    pub height: f64,
    /// Blank border around the plot area
    pub margin: f64,
    /// Space reserved above the plot area for the title block
    pub title_height: f64,
    pub font_family: String,
    pub font_size: f64,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 1100.0,
            margin: 60.0,
            title_height: 120.0,
            font_family: "sans-serif".to_string(),
            font_size: 12.0,
        }
    }
}

/// Encodes a scene as an image.
pub trait SceneRenderer: Send + Sync {
    /// File extension (without the dot) of the produced images.
    fn file_extension(&self) -> &'static str;

    /// MIME type of the produced images.
    fn content_type(&self) -> &'static str;

    fn render(&self, scene: &Scene) -> Result<Vec<u8>>;
}
