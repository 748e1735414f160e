//! Geometry descriptors and the provider that creates them.
//!
//! A [`GeometryDescriptor`] records what a piece of geometry is (a primitive
//! with its parameters, or a mesh read from disk) and where it sits. It is
//! built with the `with_*` setters and becomes immutable once handed to
//! [`Scene::add_geometry`](super::Scene::add_geometry).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use cgmath::{Deg, Euler, InnerSpace, Matrix4, Quaternion, Rotation3, Vector3};

use crate::error::{Result, SceneError};
use crate::gfx::geometry::{
    self, obj::read_obj, stl::read_stl, GeometryData, Aabb,
};

/// Parameters of a procedural shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Sphere {
        radius: f32,
        theta_resolution: u32,
        phi_resolution: u32,
    },
    Cube {
        x_length: f32,
        y_length: f32,
        z_length: f32,
    },
    Cone {
        radius: f32,
        height: f32,
        resolution: u32,
    },
    Cylinder {
        radius: f32,
        height: f32,
        resolution: u32,
    },
    Plane {
        i_size: f32,
        j_size: f32,
    },
    Torus {
        major_radius: f32,
        minor_radius: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFormat {
    Stl,
    Obj,
}

impl MeshFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "stl" => Some(MeshFormat::Stl),
            "obj" => Some(MeshFormat::Obj),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum GeometrySource {
    Primitive(Shape),
    /// The procedural stand-in used when an imported mesh is missing
    Fallback(Shape),
    Imported {
        path: PathBuf,
        format: MeshFormat,
        mesh: Arc<GeometryData>,
    },
}

/// What a descriptor represents, independent of its parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Sphere,
    Cube,
    Cone,
    Cylinder,
    Plane,
    Torus,
    Imported,
    ProceduralDefault,
}

#[derive(Debug, Clone)]
pub struct GeometryDescriptor {
    pub name: String,
    pub source: GeometrySource,
    pub position: Vector3<f32>,
    /// XYZ Euler angles in degrees
    pub rotation: [f32; 3],
    pub scale: Vector3<f32>,
    /// Axis the shape's local +Z is turned onto (cone, cylinder, plane)
    pub direction: Vector3<f32>,
}

/// Edge length of the procedural default cube
pub const DEFAULT_CUBE_SIZE: f32 = 2.0;

impl GeometryDescriptor {
    fn primitive(name: &str, shape: Shape) -> Self {
        Self {
            name: name.to_string(),
            source: GeometrySource::Primitive(shape),
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: [0.0; 3],
            scale: Vector3::new(1.0, 1.0, 1.0),
            direction: Vector3::unit_z(),
        }
    }

    /// Sphere with the default 8x8 resolution
    pub fn sphere(radius: f32) -> Self {
        Self::primitive(
            "Sphere",
            Shape::Sphere {
                radius,
                theta_resolution: 8,
                phi_resolution: 8,
            },
        )
    }

    pub fn cube(x_length: f32, y_length: f32, z_length: f32) -> Self {
        Self::primitive(
            "Cube",
            Shape::Cube {
                x_length,
                y_length,
                z_length,
            },
        )
    }

    pub fn cube_size(size: f32) -> Self {
        Self::cube(size, size, size)
    }

    pub fn cone(radius: f32, height: f32, resolution: u32) -> Self {
        Self::primitive(
            "Cone",
            Shape::Cone {
                radius,
                height,
                resolution,
            },
        )
    }

    pub fn cylinder(radius: f32, height: f32, resolution: u32) -> Self {
        Self::primitive(
            "Cylinder",
            Shape::Cylinder {
                radius,
                height,
                resolution,
            },
        )
    }

    pub fn plane(i_size: f32, j_size: f32) -> Self {
        Self::primitive("Plane", Shape::Plane { i_size, j_size })
    }

    pub fn torus(major_radius: f32, minor_radius: f32) -> Self {
        Self::primitive(
            "Torus",
            Shape::Torus {
                major_radius,
                minor_radius,
            },
        )
    }

    /// The 2x2x2 cube substituted for a mesh file that does not exist
    pub fn procedural_default() -> Self {
        let mut desc = Self::cube_size(DEFAULT_CUBE_SIZE).named("Demo_Object");
        if let GeometrySource::Primitive(shape) = desc.source {
            desc.source = GeometrySource::Fallback(shape);
        }
        desc
    }

    /// Sets sphere resolution; ignored for other shapes
    pub fn with_resolution(mut self, theta: u32, phi: u32) -> Self {
        if let GeometrySource::Primitive(Shape::Sphere {
            theta_resolution,
            phi_resolution,
            ..
        }) = &mut self.source
        {
            *theta_resolution = theta;
            *phi_resolution = phi;
        }
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Vector3::new(x, y, z);
        self
    }

    pub fn with_rotation(mut self, x_deg: f32, y_deg: f32, z_deg: f32) -> Self {
        self.rotation = [x_deg, y_deg, z_deg];
        self
    }

    pub fn with_scale(mut self, x: f32, y: f32, z: f32) -> Self {
        self.scale = Vector3::new(x, y, z);
        self
    }

    pub fn with_uniform_scale(self, s: f32) -> Self {
        self.with_scale(s, s, s)
    }

    pub fn with_direction(mut self, x: f32, y: f32, z: f32) -> Self {
        self.direction = Vector3::new(x, y, z);
        self
    }

    pub fn kind(&self) -> GeometryKind {
        match &self.source {
            GeometrySource::Imported { .. } => GeometryKind::Imported,
            GeometrySource::Fallback(_) => GeometryKind::ProceduralDefault,
            GeometrySource::Primitive(shape) => match shape {
                Shape::Sphere { .. } => GeometryKind::Sphere,
                Shape::Cube { .. } => GeometryKind::Cube,
                Shape::Cone { .. } => GeometryKind::Cone,
                Shape::Cylinder { .. } => GeometryKind::Cylinder,
                Shape::Plane { .. } => GeometryKind::Plane,
                Shape::Torus { .. } => GeometryKind::Torus,
            },
        }
    }

    /// Model matrix: translate * rotate * orient-to-direction * scale
    pub fn transform(&self) -> Matrix4<f32> {
        let [rx, ry, rz] = self.rotation;
        let rotation = Quaternion::from(Euler::new(Deg(rx), Deg(ry), Deg(rz)));
        Matrix4::from_translation(self.position)
            * Matrix4::from(rotation)
            * Matrix4::from(orient_z_to(self.direction))
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    /// Tessellates the descriptor in its local frame
    pub fn mesh(&self) -> Arc<GeometryData> {
        match &self.source {
            GeometrySource::Imported { mesh, .. } => Arc::clone(mesh),
            GeometrySource::Primitive(shape) | GeometrySource::Fallback(shape) => {
                Arc::new(tessellate(shape))
            }
        }
    }

    /// World-space bounds, `None` for empty meshes
    pub fn bounds(&self) -> Option<Aabb> {
        self.mesh().bounds(&self.transform())
    }
}

fn tessellate(shape: &Shape) -> GeometryData {
    match *shape {
        Shape::Sphere {
            radius,
            theta_resolution,
            phi_resolution,
        } => geometry::generate_sphere(radius, theta_resolution, phi_resolution),
        Shape::Cube {
            x_length,
            y_length,
            z_length,
        } => geometry::generate_cube(x_length, y_length, z_length),
        Shape::Cone {
            radius,
            height,
            resolution,
        } => geometry::generate_cone(radius, height, resolution),
        Shape::Cylinder {
            radius,
            height,
            resolution,
        } => geometry::generate_cylinder(radius, height, resolution),
        Shape::Plane { i_size, j_size } => geometry::generate_plane(i_size, j_size, 10, 10),
        Shape::Torus {
            major_radius,
            minor_radius,
        } => geometry::generate_torus(major_radius, minor_radius, 48, 12),
    }
}

/// Rotation taking +Z onto `direction`
fn orient_z_to(direction: Vector3<f32>) -> Quaternion<f32> {
    if direction.magnitude2() <= f32::EPSILON {
        return Quaternion::new(1.0, 0.0, 0.0, 0.0);
    }
    let dir = direction.normalize();
    let z = Vector3::unit_z();
    if (dir - z).magnitude2() < 1e-12 {
        Quaternion::new(1.0, 0.0, 0.0, 0.0)
    } else if (dir + z).magnitude2() < 1e-12 {
        Quaternion::from_angle_x(Deg(180.0))
    } else {
        Quaternion::from_arc(z, dir, None)
    }
}

/// Creates descriptors from files; procedural shapes use the
/// [`GeometryDescriptor`] constructors directly.
pub struct GeometryProvider;

impl GeometryProvider {
    /// Reads a mesh file into an imported descriptor
    ///
    /// Fails with [`SceneError::NotFound`] when `path` does not exist.
    pub fn import(path: impl AsRef<Path>) -> Result<GeometryDescriptor> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SceneError::NotFound(path.to_path_buf()));
        }
        let format = MeshFormat::from_path(path)
            .ok_or_else(|| SceneError::UnsupportedFormat(path.to_path_buf()))?;

        let mesh = match format {
            MeshFormat::Stl => read_stl(path)?,
            MeshFormat::Obj => read_obj(path)?,
        };
        log::info!(
            "Imported {}: {} vertices, {} triangles",
            path.display(),
            mesh.vertex_count(),
            mesh.triangle_count()
        );

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Imported")
            .to_string();

        Ok(GeometryDescriptor {
            name,
            source: GeometrySource::Imported {
                path: path.to_path_buf(),
                format,
                mesh: Arc::new(mesh),
            },
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: [0.0; 3],
            scale: Vector3::new(1.0, 1.0, 1.0),
            direction: Vector3::unit_z(),
        })
    }

    /// Like [`import`](Self::import), but a missing file yields the procedural default cube
    pub fn import_or_default(path: impl AsRef<Path>) -> Result<GeometryDescriptor> {
        match Self::import(path.as_ref()) {
            Err(SceneError::NotFound(missing)) => {
                log::warn!(
                    "Mesh not found at {}, creating demo cube instead",
                    missing.display()
                );
                Ok(GeometryDescriptor::procedural_default())
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Point3, Transform};

    fn temp_stl(tag: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "tableau-{tag}-{}.stl",
            std::process::id()
        ));
        std::fs::write(
            &path,
            "solid t\nfacet normal 0 0 1\nouter loop\nvertex 0 0 0\nvertex 1 0 0\nvertex 0 1 0\nendloop\nendfacet\nendsolid t\n",
        )
        .unwrap();
        path
    }

    #[test]
    fn test_existing_path_is_imported() {
        let path = temp_stl("existing");
        let desc = GeometryProvider::import_or_default(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(desc.kind(), GeometryKind::Imported);
        assert_eq!(desc.mesh().triangle_count(), 1);
    }

    #[test]
    fn test_missing_path_falls_back_to_default_cube() {
        let missing = std::env::temp_dir().join("tableau-definitely-missing-teapot.stl");
        let desc = GeometryProvider::import_or_default(&missing).unwrap();

        assert_eq!(desc.kind(), GeometryKind::ProceduralDefault);
        assert_eq!(desc.mesh().triangle_count(), 12);
        let bounds = desc.bounds().unwrap();
        assert_eq!(bounds.max, Point3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_import_reports_not_found() {
        let missing = std::env::temp_dir().join("tableau-definitely-missing.stl");
        assert!(matches!(
            GeometryProvider::import(&missing),
            Err(SceneError::NotFound(p)) if p == missing
        ));
    }

    #[test]
    fn test_other_import_errors_are_not_masked() {
        let path = std::env::temp_dir().join(format!("tableau-bad-{}.stl", std::process::id()));
        std::fs::write(&path, "garbage").unwrap();
        let result = GeometryProvider::import_or_default(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(SceneError::MeshParse { .. })));
    }

    #[test]
    fn test_unknown_extension_is_unsupported() {
        let path = std::env::temp_dir().join(format!("tableau-mesh-{}.ply", std::process::id()));
        std::fs::write(&path, "ply").unwrap();
        let result = GeometryProvider::import(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(SceneError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_parameters_are_not_validated() {
        let desc = GeometryDescriptor::sphere(-1.0).with_resolution(0, 0);
        assert_eq!(desc.kind(), GeometryKind::Sphere);
        assert!(matches!(
            desc.source,
            GeometrySource::Primitive(Shape::Sphere {
                radius,
                theta_resolution: 0,
                phi_resolution: 0,
            }) if radius == -1.0
        ));
    }

    #[test]
    fn test_transform_places_direction_and_position() {
        let desc = GeometryDescriptor::cylinder(8.0, 20.0, 16)
            .with_direction(0.0, 1.0, 0.0)
            .at(0.0, 50.0, 0.0);
        let tip = desc.transform().transform_point(Point3::new(0.0, 0.0, 10.0));
        assert!((tip - Point3::new(0.0, 60.0, 0.0)).magnitude() < 1e-4);
    }
}
