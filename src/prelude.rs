//! # Tableau Prelude
//!
//! Everything a typical scene script needs in one import:
//!
//! ```rust
//! use tableau::prelude::*;
//!
//! let mut scene = Scene::new();
//! let cube = scene.add_geometry(GeometryDescriptor::cube(1.0, 1.0, 1.0));
//! let mut viewport = Viewport::new().with_bounds(0.0, 0.0, 0.5, 1.0);
//! viewport.bind(cube, Appearance::new(Color::RED));
//! ```

// Scene assembly
pub use crate::scene::{
    three_point_rig, Appearance, Background, CameraPlacement, Color, GeometryDescriptor,
    GeometryId, GeometryKind, GeometryProvider, Light, LightKind, Scene, Viewport,
    ViewportBounds,
};

// Display
pub use crate::display::{
    DisplayDriver, DisplayState, DisplaySurface, Image, ImageFormat, InteractionStyle,
    RenderEngineKind, RenderSettings,
};

// Errors
pub use crate::error::{Result, SceneError};
