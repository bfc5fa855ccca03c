//! HTTP server module.
//!
//! An axum server exposing the upload form and a small REST API on top of
//! the same service layer the CLI uses.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Multipart upload validation                            │
//! │  - HTML pages, JSON serialization                         │
//! │  - CORS, compression, tracing, error mapping              │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Service Layer (services/)                                │
//! │  - Partition, statistics, scene layout                    │
//! │  - Plot generation and registry                           │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Renderer (render/)                                       │
//! │  - Scene → SVG                                            │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod pages;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
