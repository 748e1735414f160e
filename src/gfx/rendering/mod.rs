//! Core rendering functionality
//!
//! Render pipelines, the scene shader and per-frame viewport rendering.

pub mod pipeline_manager;
pub mod render_engine;
pub mod render_pass_ext;

// Re-export main types
pub use pipeline_manager::{DepthConfig, PipelineConfig, PipelineManager};
pub use render_engine::RenderEngine;
