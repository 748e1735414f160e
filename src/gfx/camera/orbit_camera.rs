use super::camera_utils::{convert_matrix4_to_array, Camera};
use crate::gfx::geometry::Aabb;
use crate::scene::CameraPlacement;
use cgmath::*;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// View angle used when a viewport has no explicit camera
pub const DEFAULT_FOVY_DEGREES: f32 = 30.0;

/// Orbit parameters restored by [`OrbitCamera::reset_to_default`]
#[derive(Debug, Clone, Copy, PartialEq)]
struct OrbitHome {
    distance: f32,
    pitch: f32,
    yaw: f32,
    target: Vector3<f32>,
}

/// Z-up camera orbiting a focus point
///
/// `yaw` is measured in the XY plane from +X, `pitch` up from that plane.
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub bounds: OrbitCameraBounds,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    /// Focal length in mm; when set the field of view follows the aspect ratio
    pub lens: Option<f32>,
    /// Scene radius the clip planes are fitted to, for auto-framed cameras
    auto_clip: Option<f32>,
    home: OrbitHome,
}

impl Camera for OrbitCamera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::from_vec(self.eye);
        let target = Point3::from_vec(self.target);
        let view = Matrix4::look_at_rh(eye, target, self.up);
        let proj =
            OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar);
        proj * view
    }
}

impl OrbitCamera {
    pub fn new(distance: f32, pitch: f32, yaw: f32, target: Vector3<f32>, aspect: f32) -> Self {
        let mut camera = Self {
            distance,
            pitch,
            yaw,
            eye: Vector3::zero(), // Will be auto-calculted in `update()` nevertheless.
            target,
            up: Vector3::unit_z(),
            bounds: OrbitCameraBounds::default(),
            aspect,
            fovy: Deg(DEFAULT_FOVY_DEGREES).into(),
            znear: 0.1,
            zfar: 1000.0,
            lens: None,
            auto_clip: None,
            home: OrbitHome {
                distance,
                pitch,
                yaw,
                target,
            },
        };
        camera.update();
        camera
    }

    /// Camera matching an explicit placement
    ///
    /// Roll is not representable by an orbit camera and is dropped.
    pub fn from_placement(placement: &CameraPlacement, aspect: f32) -> Self {
        let target = placement.focus_point();
        let offset = placement.position - target;
        let distance = offset.magnitude().max(f32::EPSILON);
        let pitch = (offset.z / distance).clamp(-1.0, 1.0).asin();
        let yaw = offset.y.atan2(offset.x);

        let mut camera = Self::new(distance, pitch, yaw, target, aspect);
        camera.lens = Some(placement.lens);
        camera.fovy = placement.vertical_fov(aspect);
        camera.znear = placement.clip_start;
        camera.zfar = placement.clip_end;
        camera
    }

    /// Isometric view fitting the given bounds into the viewport
    pub fn framing(bounds: Option<Aabb>, aspect: f32) -> Self {
        let (center, radius) = match bounds {
            Some(b) if b.radius() > 0.0 => (b.center().to_vec(), b.radius()),
            Some(b) => (b.center().to_vec(), 1.0),
            None => (Vector3::zero(), 1.0),
        };

        let fovy: Rad<f32> = Deg(DEFAULT_FOVY_DEGREES).into();
        let fovx = 2.0 * ((fovy.0 * 0.5).tan() * aspect).atan();
        let half_angle = fovy.0.min(fovx) * 0.5;
        let distance = radius / half_angle.sin() * 1.05;

        let pitch = (1.0f32 / 2.0f32.sqrt()).atan();
        let yaw = -std::f32::consts::FRAC_PI_4;

        let mut camera = Self::new(distance, pitch, yaw, center, aspect);
        camera.bounds.max_distance = Some(distance * 20.0);
        camera.auto_clip = Some(radius);
        camera.update();
        camera
    }

    pub fn reset_to_default(&mut self) {
        self.distance = self.home.distance;
        self.pitch = self.home.pitch;
        self.yaw = self.home.yaw;
        self.target = self.home.target;

        self.update();
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance.clamp(
            self.bounds.min_distance.unwrap_or(f32::EPSILON),
            self.bounds.max_distance.unwrap_or(f32::MAX),
        );
        self.update();
    }

    /// Scales the distance to the target; factors below one move closer
    pub fn zoom(&mut self, factor: f32) {
        if factor.is_finite() && factor > 0.0 {
            self.set_distance(self.distance * factor);
        }
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(self.bounds.min_pitch, self.bounds.max_pitch);
        self.update();
    }

    pub fn add_pitch(&mut self, delta: f32) {
        self.set_pitch(self.pitch + delta);
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        let mut bounded_yaw = yaw;
        if let Some(min_yaw) = self.bounds.min_yaw {
            bounded_yaw = bounded_yaw.max(min_yaw);
        }
        if let Some(max_yaw) = self.bounds.max_yaw {
            bounded_yaw = bounded_yaw.min(max_yaw);
        }
        self.yaw = bounded_yaw;
        self.update();
    }

    pub fn add_yaw(&mut self, delta: f32) {
        self.set_yaw(self.yaw + delta);
    }

    /// Unit vectors pointing right and up on screen
    pub fn screen_axes(&self) -> (Vector3<f32>, Vector3<f32>) {
        let forward = (self.target - self.eye).normalize();
        let right = forward.cross(self.up).normalize();
        let up = right.cross(forward).normalize();
        (right, up)
    }

    /// Moves eye and target together in the view plane
    pub fn pan(&mut self, delta: (f32, f32)) {
        let (right, up) = self.screen_axes();

        // Scale by distance so panning feels the same at every zoom level
        let pan_scale = self.distance;
        let movement = right * delta.0 * pan_scale + up * delta.1 * pan_scale;

        self.eye += movement;
        self.target += movement;
    }

    /// Updates the camera after changing `distance`, `pitch` or `yaw`.
    fn update(&mut self) {
        self.eye =
            calculate_cartesian_eye_position(self.pitch, self.yaw, self.distance, self.target);
        if let Some(radius) = self.auto_clip {
            self.znear = (self.distance - radius * 2.0).max(self.distance * 0.01);
            self.zfar = self.distance + radius * 4.0;
        }
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
        if let Some(lens) = self.lens {
            let fov = CameraPlacement::from_euler([0.0; 3], [0.0; 3]).with_lens(lens);
            self.fovy = fov.vertical_fov(self.aspect);
        }
    }

    pub fn view_proj(&self) -> [[f32; 4]; 4] {
        convert_matrix4_to_array(self.build_view_projection_matrix())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OrbitCameraBounds {
    pub min_distance: Option<f32>,
    pub max_distance: Option<f32>,
    pub min_pitch: f32,
    pub max_pitch: f32,
    pub min_yaw: Option<f32>,
    pub max_yaw: Option<f32>,
}

impl Default for OrbitCameraBounds {
    fn default() -> Self {
        Self {
            min_distance: Some(1e-3),
            max_distance: None,
            min_pitch: -std::f32::consts::FRAC_PI_2 + 1e-3,
            max_pitch: std::f32::consts::FRAC_PI_2 - 1e-3,
            min_yaw: None,
            max_yaw: None,
        }
    }
}

fn calculate_cartesian_eye_position(
    pitch: f32,
    yaw: f32,
    distance: f32,
    target: Vector3<f32>,
) -> Vector3<f32> {
    Vector3::new(
        distance * pitch.cos() * yaw.cos(),
        distance * pitch.cos() * yaw.sin(),
        distance * pitch.sin(),
    ) + target
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vector3<f32>, b: Vector3<f32>) -> bool {
        (a - b).magnitude() < 1e-3
    }

    #[test]
    fn placement_round_trips_eye_position() {
        let placement = CameraPlacement::looking_at([4.0, -3.0, 2.0], [0.0, 0.0, 0.0]);
        let camera = OrbitCamera::from_placement(&placement, 1.5);
        assert!(close(camera.eye, placement.position));
        assert!(close(camera.target, Vector3::zero()));
        assert_eq!(camera.znear, placement.clip_start);
    }

    #[test]
    fn framing_keeps_bounds_in_front_of_the_camera() {
        let bounds = Aabb {
            min: Point3::new(-1.0, -1.0, -1.0),
            max: Point3::new(1.0, 1.0, 1.0),
        };
        let camera = OrbitCamera::framing(Some(bounds), 900.0 / 700.0);
        assert!(camera.distance > bounds.radius());
        assert!(camera.znear > 0.0 && camera.znear < camera.distance - bounds.radius());
        assert!(camera.zfar > camera.distance + bounds.radius());
        // isometric: looking down from above
        assert!(camera.eye.z > 0.0);
    }

    #[test]
    fn reset_restores_home_after_orbiting() {
        let mut camera = OrbitCamera::new(5.0, 0.3, 0.2, Vector3::zero(), 1.0);
        let home_eye = camera.eye;
        camera.add_yaw(1.0);
        camera.add_pitch(0.5);
        camera.zoom(0.5);
        camera.pan((0.1, 0.0));
        assert!(!close(camera.eye, home_eye));

        camera.reset_to_default();
        assert!(close(camera.eye, home_eye));
    }

    #[test]
    fn pitch_stays_off_the_poles() {
        let mut camera = OrbitCamera::new(5.0, 0.0, 0.0, Vector3::zero(), 1.0);
        camera.add_pitch(10.0);
        assert!(camera.pitch < std::f32::consts::FRAC_PI_2);
        camera.add_pitch(-20.0);
        assert!(camera.pitch > -std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn pan_preserves_view_direction() {
        let mut camera = OrbitCamera::new(5.0, 0.3, 0.2, Vector3::zero(), 1.0);
        let before = (camera.target - camera.eye).normalize();
        camera.pan((0.2, -0.1));
        let after = (camera.target - camera.eye).normalize();
        assert!(close(before, after));
    }
}
