//! # Primitive Shape Generation
//!
//! This module contains functions to generate common 3D primitive shapes.
//! All shapes are centered at the origin in a Z-up frame and carry normals
//! and texture coordinates.

use super::GeometryData;
use std::f32::consts::PI;

/// Generate a box centered at the origin
///
/// Each face has its own four vertices so normals stay flat per face.
pub fn generate_cube(x_length: f32, y_length: f32, z_length: f32) -> GeometryData {
    let mut data = GeometryData::new();
    let (hx, hy, hz) = (x_length * 0.5, y_length * 0.5, z_length * 0.5);

    #[rustfmt::skip]
    let positions = [
        // +Z face
        [-hx, -hy,  hz], [ hx, -hy,  hz], [ hx,  hy,  hz], [-hx,  hy,  hz],
        // -Z face
        [-hx, -hy, -hz], [-hx,  hy, -hz], [ hx,  hy, -hz], [ hx, -hy, -hz],
        // -X face
        [-hx, -hy, -hz], [-hx, -hy,  hz], [-hx,  hy,  hz], [-hx,  hy, -hz],
        // +X face
        [ hx, -hy,  hz], [ hx, -hy, -hz], [ hx,  hy, -hz], [ hx,  hy,  hz],
        // +Y face
        [-hx,  hy,  hz], [ hx,  hy,  hz], [ hx,  hy, -hz], [-hx,  hy, -hz],
        // -Y face
        [-hx, -hy, -hz], [ hx, -hy, -hz], [ hx, -hy,  hz], [-hx, -hy,  hz],
    ];

    let face_normals = [
        [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0],
        [-1.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0],
    ];

    data.vertices = positions.to_vec();
    for normal in face_normals {
        data.normals.extend_from_slice(&[normal; 4]);
        data.tex_coords
            .extend_from_slice(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
    }

    // Two triangles per face
    for face in 0..6u32 {
        let base = face * 4;
        data.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    data
}

/// Generate a UV sphere
///
/// # Arguments
/// * `radius` - Sphere radius
/// * `theta_resolution` - Segments around the Z axis (longitude)
/// * `phi_resolution` - Segments from pole to pole (latitude)
pub fn generate_sphere(radius: f32, theta_resolution: u32, phi_resolution: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let long_segs = theta_resolution.max(3);
    let lat_segs = phi_resolution.max(2);

    for lat in 0..=lat_segs {
        let phi = lat as f32 * PI / lat_segs as f32; // 0 at +Z to PI at -Z
        let (sin_phi, cos_phi) = phi.sin_cos();

        for long in 0..=long_segs {
            let theta = long as f32 * 2.0 * PI / long_segs as f32;
            let (sin_theta, cos_theta) = theta.sin_cos();

            let normal = [sin_phi * cos_theta, sin_phi * sin_theta, cos_phi];
            data.vertices
                .push([normal[0] * radius, normal[1] * radius, normal[2] * radius]);
            data.normals.push(normal);
            data.tex_coords
                .push([long as f32 / long_segs as f32, lat as f32 / lat_segs as f32]);
        }
    }

    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;

            data.indices.extend_from_slice(&[first, second, first + 1]);
            data.indices.extend_from_slice(&[second, second + 1, first + 1]);
        }
    }

    data
}

/// Generate a plane in the XY plane with its normal along +Z
///
/// # Arguments
/// * `i_size` - Extent along X
/// * `j_size` - Extent along Y
/// * `i_segments` - Subdivisions along X
/// * `j_segments` - Subdivisions along Y
pub fn generate_plane(i_size: f32, j_size: f32, i_segments: u32, j_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let i_segs = i_segments.max(1);
    let j_segs = j_segments.max(1);

    for y in 0..=j_segs {
        let v = y as f32 / j_segs as f32;
        for x in 0..=i_segs {
            let u = x as f32 / i_segs as f32;
            data.vertices
                .push([(u - 0.5) * i_size, (v - 0.5) * j_size, 0.0]);
            data.normals.push([0.0, 0.0, 1.0]);
            data.tex_coords.push([u, v]);
        }
    }

    for y in 0..j_segs {
        for x in 0..i_segs {
            let i = y * (i_segs + 1) + x;
            let next_row = i + i_segs + 1;

            data.indices.extend_from_slice(&[i, i + 1, next_row]);
            data.indices.extend_from_slice(&[next_row, i + 1, next_row + 1]);
        }
    }

    data
}

/// Generate a capped cylinder along Z, extending from -height/2 to height/2
pub fn generate_cylinder(radius: f32, height: f32, segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let segs = segments.max(3);
    let half_height = height * 0.5;

    // Side ring: bottom/top pairs
    for i in 0..=segs {
        let angle = i as f32 * 2.0 * PI / segs as f32;
        let (sin_a, cos_a) = angle.sin_cos();
        let (x, y) = (radius * cos_a, radius * sin_a);
        let u = i as f32 / segs as f32;

        data.vertices.push([x, y, -half_height]);
        data.normals.push([cos_a, sin_a, 0.0]);
        data.tex_coords.push([u, 0.0]);

        data.vertices.push([x, y, half_height]);
        data.normals.push([cos_a, sin_a, 0.0]);
        data.tex_coords.push([u, 1.0]);
    }

    for i in 0..segs {
        let bottom_current = i * 2;
        let top_current = bottom_current + 1;
        let bottom_next = bottom_current + 2;
        let top_next = bottom_next + 1;

        data.indices
            .extend_from_slice(&[bottom_current, bottom_next, top_current]);
        data.indices
            .extend_from_slice(&[top_current, bottom_next, top_next]);
    }

    add_cap(&mut data, radius, -half_height, segs, false);
    add_cap(&mut data, radius, half_height, segs, true);

    data
}

/// Generate a cone along Z with its apex at +height/2 and a capped base at -height/2
pub fn generate_cone(radius: f32, height: f32, resolution: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let segs = resolution.max(3);
    let half_height = height * 0.5;
    // Side normals tilt up by the cone's half angle
    let slope = if height.abs() > f32::EPSILON {
        radius / height
    } else {
        0.0
    };
    let normal_z = slope / (1.0 + slope * slope).sqrt();
    let normal_r = 1.0 / (1.0 + slope * slope).sqrt();

    for i in 0..=segs {
        let angle = i as f32 * 2.0 * PI / segs as f32;
        let (sin_a, cos_a) = angle.sin_cos();
        let normal = [normal_r * cos_a, normal_r * sin_a, normal_z];
        let u = i as f32 / segs as f32;

        data.vertices
            .push([radius * cos_a, radius * sin_a, -half_height]);
        data.normals.push(normal);
        data.tex_coords.push([u, 0.0]);

        // One apex vertex per segment so each slice keeps its own normal
        data.vertices.push([0.0, 0.0, half_height]);
        data.normals.push(normal);
        data.tex_coords.push([u, 1.0]);
    }

    for i in 0..segs {
        let base_current = i * 2;
        let apex = base_current + 1;
        let base_next = base_current + 2;
        data.indices.extend_from_slice(&[base_current, base_next, apex]);
    }

    add_cap(&mut data, radius, -half_height, segs, false);

    data
}

/// Generate a torus around the Z axis
pub fn generate_torus(
    major_radius: f32,
    minor_radius: f32,
    major_segments: u32,
    minor_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let major_segs = major_segments.max(3);
    let minor_segs = minor_segments.max(3);

    for i in 0..=major_segs {
        let u = i as f32 / major_segs as f32;
        let (sin_u, cos_u) = (u * 2.0 * PI).sin_cos();

        for j in 0..=minor_segs {
            let v = j as f32 / minor_segs as f32;
            let (sin_v, cos_v) = (v * 2.0 * PI).sin_cos();

            let ring = major_radius + minor_radius * cos_v;
            data.vertices
                .push([ring * cos_u, ring * sin_u, minor_radius * sin_v]);
            data.normals.push([cos_v * cos_u, cos_v * sin_u, sin_v]);
            data.tex_coords.push([u, v]);
        }
    }

    for i in 0..major_segs {
        for j in 0..minor_segs {
            let a = i * (minor_segs + 1) + j;
            let b = a + minor_segs + 1;

            data.indices.extend_from_slice(&[a, b, a + 1]);
            data.indices.extend_from_slice(&[b, b + 1, a + 1]);
        }
    }

    data
}

/// Appends a flat disc at height `z`, facing +Z when `up` is set and -Z otherwise
fn add_cap(data: &mut GeometryData, radius: f32, z: f32, segments: u32, up: bool) {
    let normal = if up { [0.0, 0.0, 1.0] } else { [0.0, 0.0, -1.0] };

    let center = data.vertices.len() as u32;
    data.vertices.push([0.0, 0.0, z]);
    data.normals.push(normal);
    data.tex_coords.push([0.5, 0.5]);

    let ring_start = data.vertices.len() as u32;
    for i in 0..=segments {
        let angle = i as f32 * 2.0 * PI / segments as f32;
        let (sin_a, cos_a) = angle.sin_cos();
        data.vertices.push([radius * cos_a, radius * sin_a, z]);
        data.normals.push(normal);
        data.tex_coords.push([0.5 + 0.5 * cos_a, 0.5 + 0.5 * sin_a]);
    }

    for i in 0..segments {
        let current = ring_start + i;
        let next = current + 1;
        if up {
            data.indices.extend_from_slice(&[center, current, next]);
        } else {
            data.indices.extend_from_slice(&[center, next, current]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_generation() {
        let cube = generate_cube(1.0, 1.0, 1.0);
        assert_eq!(cube.vertices.len(), 24); // 6 faces * 4 vertices
        assert_eq!(cube.indices.len(), 36); // 6 faces * 2 triangles * 3 indices
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.triangle_count(), 12);
    }

    #[test]
    fn test_cube_respects_edge_lengths() {
        let cube = generate_cube(15.0, 15.0, 15.0);
        assert!(cube
            .vertices
            .iter()
            .all(|v| v.iter().all(|c| (c.abs() - 7.5).abs() < 1e-6)));
    }

    #[test]
    fn test_sphere_generation() {
        let sphere = generate_sphere(1.0, 40, 40);
        assert_eq!(sphere.vertices.len(), 41 * 41);
        assert_eq!(sphere.triangle_count(), 40 * 40 * 2);
        assert_eq!(sphere.vertices.len(), sphere.normals.len());
        assert_eq!(sphere.vertices.len(), sphere.tex_coords.len());
    }

    #[test]
    fn test_sphere_vertices_lie_on_radius() {
        let sphere = generate_sphere(10.0, 12, 8);
        for v in &sphere.vertices {
            let r = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
            assert!((r - 10.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_degenerate_resolution_is_raised_to_minimum() {
        let sphere = generate_sphere(1.0, 0, 0);
        assert_eq!(sphere.triangle_count(), 3 * 2 * 2);
    }

    #[test]
    fn test_plane_generation() {
        let plane = generate_plane(2.0, 2.0, 2, 2);
        assert_eq!(plane.vertices.len(), 9); // 3x3 grid
        assert_eq!(plane.indices.len(), 24); // 4 quads * 2 triangles * 3 indices
    }

    #[test]
    fn test_cylinder_generation() {
        let cylinder = generate_cylinder(0.8, 2.0, 16);
        // side + two caps
        assert_eq!(cylinder.triangle_count(), 16 * 2 + 16 * 2);
        assert!(cylinder
            .vertices
            .iter()
            .all(|v| v[2] >= -1.0 - 1e-6 && v[2] <= 1.0 + 1e-6));
    }

    #[test]
    fn test_cone_generation() {
        let cone = generate_cone(0.5, 1.0, 200);
        assert_eq!(cone.triangle_count(), 200 + 200);
        let top = cone.vertices.iter().map(|v| v[2]).fold(f32::MIN, f32::max);
        assert!((top - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_torus_generation() {
        let torus = generate_torus(1.5, 0.5, 48, 12);
        assert_eq!(torus.triangle_count(), 48 * 12 * 2);
        let outer = torus
            .vertices
            .iter()
            .map(|v| (v[0] * v[0] + v[1] * v[1]).sqrt())
            .fold(0.0f32, f32::max);
        assert!((outer - 2.0).abs() < 1e-4);
    }
}
