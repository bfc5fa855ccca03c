//! Application state for the HTTP server.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::render::{SceneRenderer, SvgRenderer};
use crate::services::PlotRegistry;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Server settings (output directory, upload limit)
    pub config: Arc<ServerConfig>,
    /// Renderer used for every generated diagram
    pub renderer: Arc<dyn SceneRenderer>,
    /// Diagrams this server has written and may serve
    pub plots: PlotRegistry,
}

impl AppState {
    /// Create state with an SVG renderer built from the configured canvas.
    pub fn new(config: ServerConfig) -> Self {
        let renderer = Arc::new(SvgRenderer::new(config.render.clone()));
        Self::with_renderer(config, renderer)
    }

    pub fn with_renderer(config: ServerConfig, renderer: Arc<dyn SceneRenderer>) -> Self {
        Self {
            config: Arc::new(config),
            renderer,
            plots: PlotRegistry::new(),
        }
    }
}
