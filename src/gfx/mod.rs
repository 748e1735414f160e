//! # Graphics Module
//!
//! Everything that touches the GPU or produces triangles for it.
//!
//! - **Geometry** ([`geometry`]) - procedural primitives plus STL/OBJ readers
//! - **Meshes** ([`mesh`]) - vertex format and GPU buffers
//! - **Camera System** ([`camera`]) - Z-up orbit cameras with trackball controls
//! - **Rendering Pipeline** ([`rendering`]) - multi-viewport scene rendering
//! - **Resource Management** ([`resources`]) - attachments and uniform bindings
//! - **Gizmos** ([`gizmos`]) - orientation axes in a viewport corner
//! - **Text Overlay** ([`ui`]) - viewport titles and axis letters
//!
//! The scene description itself lives in [`crate::scene`]; this module only
//! consumes it.

pub mod camera;
pub mod geometry;
pub mod gizmos;
pub mod mesh;
pub mod rendering;
pub mod resources;
pub mod ui;

// Re-export commonly used types
pub use camera::orbit_camera::OrbitCamera;
pub use rendering::render_engine::RenderEngine;
