//! # Scene Assembly
//!
//! The data model the display driver consumes: geometry descriptors owned
//! by a [`Scene`] and addressed through [`GeometryId`] handles, appearances
//! bound to those handles inside [`Viewport`]s, plus lights and cameras.
//!
//! ## Usage
//!
//! ```rust
//! use tableau::scene::{Appearance, Color, GeometryDescriptor, Scene, Viewport};
//!
//! let mut scene = Scene::new();
//! let sphere = scene.add_geometry(GeometryDescriptor::sphere(1.0).with_resolution(40, 40));
//!
//! let mut viewport = Viewport::new().with_background(Color::rgb(0.1, 0.1, 0.1));
//! viewport.bind(sphere, Appearance::rgb(1.0, 1.0, 1.0));
//! assert_eq!(viewport.bindings().len(), 1);
//! ```
//!
//! Descriptors cannot be changed once added. Viewports that show the same
//! geometry refer to the same descriptor but keep separate appearances.

pub mod appearance;
pub mod camera;
pub mod geometry;
pub mod light;
pub mod viewport;

pub use appearance::{Appearance, Color};
pub use camera::{CameraAim, CameraPlacement};
pub use geometry::{GeometryDescriptor, GeometryKind, GeometryProvider, GeometrySource, Shape};
pub use light::{three_point_rig, Light, LightKind};
pub use viewport::{Background, PixelRect, Viewport, ViewportBounds};

/// Handle to a descriptor stored in a [`Scene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryId(pub(crate) usize);

impl GeometryId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Owns every geometry descriptor of a composition
#[derive(Debug, Default)]
pub struct Scene {
    geometries: Vec<GeometryDescriptor>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_geometry(&mut self, descriptor: GeometryDescriptor) -> GeometryId {
        log::debug!("Adding geometry '{}' ({:?})", descriptor.name, descriptor.kind());
        self.geometries.push(descriptor);
        GeometryId(self.geometries.len() - 1)
    }

    pub fn geometry(&self, id: GeometryId) -> Option<&GeometryDescriptor> {
        self.geometries.get(id.0)
    }

    pub fn contains(&self, id: GeometryId) -> bool {
        id.0 < self.geometries.len()
    }

    pub fn len(&self) -> usize {
        self.geometries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GeometryId, &GeometryDescriptor)> {
        self.geometries
            .iter()
            .enumerate()
            .map(|(i, g)| (GeometryId(i), g))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_address_their_descriptor() {
        let mut scene = Scene::new();
        let cube = scene.add_geometry(GeometryDescriptor::cube_size(1.0));
        let cone = scene.add_geometry(GeometryDescriptor::cone(0.5, 1.0, 200).at(1.0, 1.0, 1.0));

        assert_ne!(cube, cone);
        assert_eq!(scene.geometry(cube).unwrap().kind(), GeometryKind::Cube);
        assert_eq!(scene.geometry(cone).unwrap().kind(), GeometryKind::Cone);
        assert!(!scene.contains(GeometryId(2)));
        assert_eq!(scene.iter().count(), 2);
    }
}
