//! Tableau 3D scene display
//!
//! Assembles small 3D scenes from procedural primitives and imported meshes,
//! binds appearances to them inside one or more viewports and shows the
//! result in an interactive window or renders it to an image, on top of wgpu
//! and winit.
//!
//! ```no_run
//! use tableau::prelude::*;
//!
//! fn main() -> tableau::Result<()> {
//!     let mut scene = Scene::new();
//!     let sphere = scene.add_geometry(GeometryDescriptor::sphere(1.0));
//!
//!     let mut viewport = Viewport::new();
//!     viewport.bind(sphere, Appearance::new(Color::WHITE));
//!
//!     let mut driver = DisplayDriver::new(RenderSettings::default());
//!     driver.compose(scene, DisplaySurface::new(900, 700).with_viewport(viewport))?;
//!     driver.show()
//! }
//! ```

mod app;
pub mod display;
pub mod error;
pub mod gfx;
pub mod prelude;
pub mod scene;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use display::{DisplayDriver, DisplayState, DisplaySurface, RenderSettings};
pub use error::{Result, SceneError};
