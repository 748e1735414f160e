//! GPU resource management
//!
//! Render attachments and the bind groups the scene pipelines read.

pub mod object_bindings;
pub mod texture_resource;
pub mod view_bindings;

// Re-export main types
pub use object_bindings::{ObjectBindings, ObjectUBO, ObjectUniform};
pub use texture_resource::{FrameTargets, TextureResource};
pub use view_bindings::{ViewBindings, ViewUBO, ViewUBOContent};
