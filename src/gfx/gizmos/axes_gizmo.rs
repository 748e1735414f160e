//! # Orientation Axes
//!
//! A small X/Y/Z triad in the bottom-left corner of a viewport. It turns
//! with the viewport's camera but ignores its position and zoom, so the
//! axes always show how the world is oriented.
//!
//! ## Layout
//!
//! The triad owns a square sub-rectangle of the viewport (see
//! [`corner_rect`]) and is drawn there with its own orthographic
//! view-projection ([`axes_view_proj`]). Axis letters are placed just past
//! each tip by [`label_position`] and drawn by the text overlay.

use cgmath::{ortho, InnerSpace, Matrix4, Point3, SquareMatrix, Vector3};

use crate::gfx::camera::orbit_camera::OPENGL_TO_WGPU_MATRIX;
use crate::gfx::mesh::GpuMesh;
use crate::gfx::rendering::render_pass_ext::RenderPassExt;
use crate::gfx::resources::{ObjectBindings, ObjectUBO, ObjectUniform};
use crate::scene::{Appearance, Color, PixelRect};

/// Side of the triad square relative to the shorter viewport side
pub const AXES_FRACTION: f32 = 0.2;
/// Gap between the triad square and the viewport edges, in pixels
pub const AXES_MARGIN: u32 = 8;
/// Below this side length the triad is not drawn
pub const AXES_MIN_SIDE: u32 = 32;

/// Half extent of the orthographic box; leaves room for the letters
const AXES_EXTENT: f32 = 1.5;
const AXES_EYE_DISTANCE: f32 = 3.0;
/// Letters sit slightly beyond the unit-length tips
const LABEL_RADIUS: f32 = 1.25;

/// One of the three world axes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisDirection {
    X,
    Y,
    Z,
}

impl AxisDirection {
    pub const ALL: [AxisDirection; 3] = [AxisDirection::X, AxisDirection::Y, AxisDirection::Z];

    pub fn vector(self) -> Vector3<f32> {
        match self {
            AxisDirection::X => Vector3::unit_x(),
            AxisDirection::Y => Vector3::unit_y(),
            AxisDirection::Z => Vector3::unit_z(),
        }
    }

    pub fn color(self) -> Color {
        match self {
            AxisDirection::X => Color::rgb(1.0, 0.2, 0.2),
            AxisDirection::Y => Color::rgb(0.2, 1.0, 0.2),
            AxisDirection::Z => Color::rgb(0.2, 0.2, 1.0),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AxisDirection::X => "X",
            AxisDirection::Y => "Y",
            AxisDirection::Z => "Z",
        }
    }
}

/// Square in the bottom-left corner of `viewport` that holds the triad
///
/// Returns `None` when the viewport is too small for a readable triad.
pub fn corner_rect(viewport: PixelRect) -> Option<PixelRect> {
    let shorter = viewport.width.min(viewport.height);
    let side = (shorter as f32 * AXES_FRACTION).round() as u32;
    if side < AXES_MIN_SIDE || side + 2 * AXES_MARGIN > shorter {
        return None;
    }
    Some(PixelRect {
        x: viewport.x + AXES_MARGIN,
        y: viewport.y + viewport.height - side - AXES_MARGIN,
        width: side,
        height: side,
    })
}

/// Orthographic view-projection that keeps only the camera's rotation
///
/// `forward` is the camera's viewing direction and `up` its up vector;
/// neither needs to be normalized.
pub fn axes_view_proj(forward: Vector3<f32>, up: Vector3<f32>) -> Matrix4<f32> {
    let forward = if forward.magnitude2() > f32::EPSILON {
        forward.normalize()
    } else {
        -Vector3::unit_z()
    };
    // looking straight along `up` leaves the roll undefined
    let up = if forward.cross(up).magnitude2() < 1e-6 {
        Vector3::unit_y()
    } else {
        up
    };

    let eye = Point3::new(0.0, 0.0, 0.0) - forward * AXES_EYE_DISTANCE;
    let view = Matrix4::look_to_rh(eye, forward, up);
    let proj = ortho(
        -AXES_EXTENT,
        AXES_EXTENT,
        -AXES_EXTENT,
        AXES_EXTENT,
        0.1,
        2.0 * AXES_EYE_DISTANCE,
    );
    OPENGL_TO_WGPU_MATRIX * proj * view
}

/// Pixel position of an axis letter inside `rect`, top-left origin
pub fn label_position(view_proj: Matrix4<f32>, axis: AxisDirection, rect: PixelRect) -> [f32; 2] {
    let clip = view_proj * (axis.vector() * LABEL_RADIUS).extend(1.0);
    let (ndc_x, ndc_y) = (clip.x / clip.w, clip.y / clip.w);
    [
        rect.x as f32 + (ndc_x + 1.0) * 0.5 * rect.width as f32,
        rect.y as f32 + (1.0 - ndc_y) * 0.5 * rect.height as f32,
    ]
}

struct AxisLine {
    mesh: GpuMesh,
    _uniform: ObjectUBO,
    bind_group: wgpu::BindGroup,
}

/// GPU lines of the triad, shared by every viewport that shows axes
pub struct AxesGizmo {
    lines: Vec<AxisLine>,
}

impl AxesGizmo {
    pub fn new(device: &wgpu::Device, object_bindings: &ObjectBindings) -> Self {
        let lines = AxisDirection::ALL
            .iter()
            .map(|&axis| {
                let tip = axis.vector();
                let mesh = GpuMesh::lines(
                    device,
                    &[[0.0, 0.0, 0.0], [tip.x, tip.y, tip.z]],
                    &format!("{} axis", axis.label()),
                );
                let appearance = Appearance::new(axis.color()).with_edges(axis.color());
                let uniform = ObjectUBO::new_with_data(
                    device,
                    &ObjectUniform::new(Matrix4::identity(), &appearance),
                );
                let bind_group = object_bindings.create_bind_group(device, &uniform);
                AxisLine {
                    mesh,
                    _uniform: uniform,
                    bind_group,
                }
            })
            .collect();

        Self { lines }
    }

    /// Draws the three axis lines; the caller binds the axes view and pipeline
    pub fn draw<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        for line in &self.lines {
            render_pass.draw_mesh_edges(&line.mesh, &line.bind_group);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector4;

    fn ndc(view_proj: Matrix4<f32>, axis: AxisDirection) -> Vector4<f32> {
        let clip = view_proj * axis.vector().extend(1.0);
        clip / clip.w
    }

    #[test]
    fn triad_sits_in_the_bottom_left_corner() {
        let viewport = PixelRect {
            x: 0,
            y: 0,
            width: 800,
            height: 600,
        };
        let rect = corner_rect(viewport).unwrap();
        assert_eq!(rect.width, 120);
        assert_eq!(rect.height, 120);
        assert_eq!(rect.x, AXES_MARGIN);
        assert_eq!(rect.y + rect.height + AXES_MARGIN, 600);

        let right_half = PixelRect {
            x: 400,
            y: 0,
            width: 400,
            height: 600,
        };
        let rect = corner_rect(right_half).unwrap();
        assert_eq!(rect.x, 400 + AXES_MARGIN);
        assert_eq!(rect.width, 80);
    }

    #[test]
    fn tiny_viewports_get_no_triad() {
        let tiny = PixelRect {
            x: 10,
            y: 10,
            width: 100,
            height: 60,
        };
        assert_eq!(corner_rect(tiny), None);
    }

    #[test]
    fn looking_along_y_shows_x_right_and_z_up() {
        let view_proj = axes_view_proj(Vector3::unit_y(), Vector3::unit_z());

        let x = ndc(view_proj, AxisDirection::X);
        let y = ndc(view_proj, AxisDirection::Y);
        let z = ndc(view_proj, AxisDirection::Z);
        assert!(x.x > 0.5 && x.y.abs() < 1e-5);
        assert!(z.y > 0.5 && z.x.abs() < 1e-5);
        // pointing away from the viewer collapses onto the center
        assert!(y.x.abs() < 1e-5 && y.y.abs() < 1e-5);
    }

    #[test]
    fn looking_down_x_puts_y_to_the_right() {
        let view_proj = axes_view_proj(Vector3::new(-2.0, 0.0, 0.0), Vector3::unit_z());
        assert!(ndc(view_proj, AxisDirection::Y).x > 0.5);
    }

    #[test]
    fn only_the_direction_matters() {
        let near = axes_view_proj(Vector3::new(1.0, 1.0, -1.0), Vector3::unit_z());
        let far = axes_view_proj(Vector3::new(10.0, 10.0, -10.0), Vector3::unit_z());
        let near: [[f32; 4]; 4] = near.into();
        let far: [[f32; 4]; 4] = far.into();
        for (a, b) in near.iter().flatten().zip(far.iter().flatten()) {
            assert!((a - b).abs() < 1e-5);
        }
    }

    #[test]
    fn tips_stay_inside_the_depth_range() {
        let directions = [
            Vector3::new(1.0, 2.0, -0.5),
            Vector3::new(0.0, 0.0, -1.0),
            Vector3::new(0.0, 0.0, 0.0),
        ];
        for forward in directions {
            let view_proj = axes_view_proj(forward, Vector3::unit_z());
            for axis in AxisDirection::ALL {
                let p = ndc(view_proj, axis);
                assert!((0.0..=1.0).contains(&p.z), "{axis:?} depth {} for {forward:?}", p.z);
                assert!(p.x.abs() <= 1.0 && p.y.abs() <= 1.0);
            }
        }
    }

    #[test]
    fn letters_land_inside_the_triad_square() {
        let rect = PixelRect {
            x: 8,
            y: 472,
            width: 120,
            height: 120,
        };
        let view_proj = axes_view_proj(Vector3::new(-1.0, -1.0, -0.6), Vector3::unit_z());
        for axis in AxisDirection::ALL {
            let [x, y] = label_position(view_proj, axis, rect);
            assert!((8.0..=128.0).contains(&x), "{axis:?} at x {x}");
            assert!((472.0..=592.0).contains(&y), "{axis:?} at y {y}");
        }

        // Z points up the screen, so its letter is above the center
        let [_, z_y] = label_position(view_proj, AxisDirection::Z, rect);
        assert!(z_y < 472.0 + 60.0);
    }
}
