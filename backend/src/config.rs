//! Server configuration from environment variables or a TOML file.

use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

use crate::render::RenderContext;

/// Largest accepted CSV upload (100 KiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 100 * 1024;
pub const DEFAULT_PORT: u16 = 8099;
pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_PLOT_RETENTION_SECS: u64 = 3600;
/// Longest accepted retention (100 years); keeps the value representable as a
/// signed duration.
pub const MAX_PLOT_RETENTION_SECS: u64 = 100 * 365 * 24 * 3600;

/// Settings for the HTTP server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Directory generated diagrams are written to and served from
    pub output_dir: PathBuf,
    /// Upper bound on the uploaded CSV size
    pub max_upload_bytes: usize,
    /// Generated diagrams older than this are deleted
    pub plot_retention_secs: u64,
    /// Canvas settings for rendered diagrams
    pub render: RenderContext,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            plot_retention_secs: DEFAULT_PLOT_RETENTION_SECS,
            render: RenderContext::default(),
        }
    }
}

impl ServerConfig {
    /// Build a configuration from environment variables, falling back to defaults.
    ///
    /// # Environment Variables
    /// - `HOST` (optional, default: 0.0.0.0)
    /// - `PORT` (optional, default: 8099)
    /// - `SHOTMARKER_OUTPUT_DIR` (optional, default: `output`)
    /// - `SHOTMARKER_MAX_UPLOAD_BYTES` (optional, default: 102400)
    /// - `SHOTMARKER_PLOT_RETENTION_SECS` (optional, default: 3600)
    ///
    /// # Errors
    /// Returns an error if a numeric variable cannot be parsed or the
    /// retention exceeds [`MAX_PLOT_RETENTION_SECS`].
    pub fn from_env() -> Result<Self, String> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Load a TOML file; environment variables still override its values.
    pub fn from_toml_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {}", path.display(), e))?;
        let mut config = Self::from_toml_str(&content)?;
        config.apply_env()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, String> {
        let config: Self =
            toml::from_str(content).map_err(|e| format!("Invalid config file: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Use `SHOTMARKER_CONFIG` when set, otherwise the environment alone.
    pub fn load() -> Result<Self, String> {
        match env::var("SHOTMARKER_CONFIG") {
            Ok(path) => Self::from_toml_file(Path::new(&path)),
            Err(_) => Self::from_env(),
        }
    }

    fn apply_env(&mut self) -> Result<(), String> {
        if let Ok(host) = env::var("HOST") {
            self.host = host;
        }
        if let Ok(port) = env::var("PORT") {
            self.port = port
                .parse()
                .map_err(|_| "PORT must be a valid port number".to_string())?;
        }
        if let Ok(dir) = env::var("SHOTMARKER_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Ok(max) = env::var("SHOTMARKER_MAX_UPLOAD_BYTES") {
            self.max_upload_bytes = max
                .parse()
                .map_err(|_| "SHOTMARKER_MAX_UPLOAD_BYTES must be a byte count".to_string())?;
        }
        if let Ok(secs) = env::var("SHOTMARKER_PLOT_RETENTION_SECS") {
            self.plot_retention_secs = secs
                .parse()
                .map_err(|_| "SHOTMARKER_PLOT_RETENTION_SECS must be a number of seconds".to_string())?;
        }
        self.validate()
    }

    fn validate(&self) -> Result<(), String> {
        if self.plot_retention_secs > MAX_PLOT_RETENTION_SECS {
            return Err(format!(
                "plot retention must be at most {} seconds, got {}",
                MAX_PLOT_RETENTION_SECS, self.plot_retention_secs
            ));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
