//! # Procedural and Imported Geometry
//!
//! Tessellated triangle data shared by the procedural generators in
//! [`primitives`] and the mesh readers in [`stl`] and [`obj`].
//!
//! ## Supported Primitives
//!
//! - **Cube**: box with independent edge lengths
//! - **Sphere**: UV sphere with configurable theta/phi resolution
//! - **Cone** and **Cylinder**: along +Z with configurable resolution
//! - **Plane**: flat rectangle in the XY plane
//! - **Torus**: ring around the Z axis
//!
//! ## Usage
//!
//! ```rust
//! use tableau::gfx::geometry::{generate_cube, generate_sphere};
//!
//! let cube = generate_cube(1.0, 1.0, 1.0);
//! assert_eq!(cube.triangle_count(), 12);
//!
//! let sphere = generate_sphere(1.0, 40, 40);
//! assert!(sphere.vertex_count() > 0);
//! ```

pub mod obj;
pub mod primitives;
pub mod stl;

pub use primitives::*;

use cgmath::{InnerSpace, Matrix, Matrix3, Matrix4, Point3, SquareMatrix, Transform, Vector3};

use crate::gfx::mesh::Vertex3D;

/// Represents generated geometry data ready for GPU upload
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    pub fn center(&self) -> Point3<f32> {
        Point3::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
            (self.min.z + self.max.z) * 0.5,
        )
    }

    /// Radius of the sphere enclosing the box
    pub fn radius(&self) -> f32 {
        (self.max - self.min).magnitude() * 0.5
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: Point3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: Point3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }

    fn from_points(points: impl Iterator<Item = Point3<f32>>) -> Option<Aabb> {
        points.fold(None, |acc: Option<Aabb>, p| {
            let point_box = Aabb { min: p, max: p };
            Some(match acc {
                Some(b) => b.union(&point_box),
                None => point_box,
            })
        })
    }
}

impl GeometryData {
    /// Create a new empty geometry data structure
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            tex_coords: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Bounding box of the vertices after applying `transform`, `None` for empty geometry
    pub fn bounds(&self, transform: &Matrix4<f32>) -> Option<Aabb> {
        Aabb::from_points(
            self.vertices
                .iter()
                .map(|v| transform.transform_point(Point3::new(v[0], v[1], v[2]))),
        )
    }

    /// Applies an affine transform to positions and normals in place
    pub fn transform(&mut self, transform: &Matrix4<f32>) {
        let linear = Matrix3::from_cols(
            transform.x.truncate(),
            transform.y.truncate(),
            transform.z.truncate(),
        );
        let normal_matrix = linear.invert().map(|m| m.transpose()).unwrap_or(linear);

        for v in self.vertices.iter_mut() {
            let p = transform.transform_point(Point3::new(v[0], v[1], v[2]));
            *v = [p.x, p.y, p.z];
        }
        for n in self.normals.iter_mut() {
            let rotated = normal_matrix * Vector3::new(n[0], n[1], n[2]);
            if rotated.magnitude2() > 0.0 {
                *n = rotated.normalize().into();
            }
        }
    }

    /// Unique triangle edges as a line list, used for edge and wireframe display
    pub fn edge_indices(&self) -> Vec<u32> {
        let mut edges: Vec<(u32, u32)> = self
            .indices
            .chunks_exact(3)
            .flat_map(|tri| [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])])
            .map(|(a, b)| (a.min(b), a.max(b)))
            .collect();
        edges.sort_unstable();
        edges.dedup();
        edges.into_iter().flat_map(|(a, b)| [a, b]).collect()
    }

    /// Convert to the interleaved vertex format used by the renderer
    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, position)| Vertex3D {
                position: *position,
                normal: self.normals.get(i).copied().unwrap_or([0.0, 0.0, 1.0]),
            })
            .collect()
    }

    /// Area-weighted vertex normals, for meshes that arrive without them
    pub fn compute_vertex_normals(&mut self) {
        let mut accumulated = vec![Vector3::new(0.0f32, 0.0, 0.0); self.vertices.len()];
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let (Some(va), Some(vb), Some(vc)) = (
                self.vertices.get(a),
                self.vertices.get(b),
                self.vertices.get(c),
            ) else {
                continue;
            };
            let va = Vector3::from(*va);
            let face = (Vector3::from(*vb) - va).cross(Vector3::from(*vc) - va);
            for i in [a, b, c] {
                accumulated[i] += face;
            }
        }
        self.normals = accumulated
            .into_iter()
            .map(|n| {
                if n.magnitude2() > 0.0 {
                    n.normalize().into()
                } else {
                    [0.0, 0.0, 1.0]
                }
            })
            .collect();
    }

    /// Appends another mesh, offsetting its indices
    pub fn append(&mut self, other: GeometryData) {
        let offset = self.vertices.len() as u32;
        self.vertices.extend(other.vertices);
        self.normals.extend(other.normals);
        self.tex_coords.extend(other.tex_coords);
        self.indices.extend(other.indices.into_iter().map(|i| i + offset));
    }
}

impl Default for GeometryData {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_follow_transform() {
        let cube = generate_cube(2.0, 2.0, 2.0);
        let moved = Matrix4::from_translation(Vector3::new(10.0, 0.0, 0.0));
        let bounds = cube.bounds(&moved).unwrap();
        assert_eq!(bounds.min, Point3::new(9.0, -1.0, -1.0));
        assert_eq!(bounds.max, Point3::new(11.0, 1.0, 1.0));
        assert_eq!(bounds.center(), Point3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_empty_geometry_has_no_bounds() {
        assert!(GeometryData::new().bounds(&Matrix4::identity()).is_none());
    }

    #[test]
    fn test_cube_edges_are_unique() {
        let cube = generate_cube(1.0, 1.0, 1.0);
        // 6 faces, each a quad of 4 outer edges plus one diagonal
        assert_eq!(cube.edge_indices().len() / 2, 30);
    }

    #[test]
    fn test_computed_normals_face_outward_for_ccw_triangle() {
        let mut tri = GeometryData {
            vertices: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            tex_coords: Vec::new(),
            normals: Vec::new(),
            indices: vec![0, 1, 2],
        };
        tri.compute_vertex_normals();
        assert_eq!(tri.normals, vec![[0.0, 0.0, 1.0]; 3]);
    }

    #[test]
    fn test_append_offsets_indices() {
        let mut a = generate_cube(1.0, 1.0, 1.0);
        let b = generate_cube(1.0, 1.0, 1.0);
        a.append(b);
        assert_eq!(a.vertex_count(), 48);
        assert_eq!(*a.indices.iter().max().unwrap(), 47);
    }
}
