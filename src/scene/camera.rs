//! Explicit camera placement for a viewport.
//!
//! Rotations use XYZ Euler angles applied about the world axes (X first,
//! then Y, then Z). An unrotated camera looks down -Z with +Y up.

use cgmath::{InnerSpace, Matrix3, Rad, Vector3};

/// Sensor width in millimetres used to turn a focal length into a field of view
pub const SENSOR_WIDTH_MM: f32 = 36.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraAim {
    /// XYZ Euler angles in radians
    Euler([f32; 3]),
    Target(Vector3<f32>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPlacement {
    pub position: Vector3<f32>,
    pub aim: CameraAim,
    /// Focal length in millimetres
    pub lens: f32,
    pub clip_start: f32,
    pub clip_end: f32,
}

impl CameraPlacement {
    pub fn from_euler(position: [f32; 3], rotation: [f32; 3]) -> Self {
        Self {
            position: position.into(),
            aim: CameraAim::Euler(rotation),
            lens: 50.0,
            clip_start: 0.1,
            clip_end: 1000.0,
        }
    }

    pub fn looking_at(position: [f32; 3], target: [f32; 3]) -> Self {
        Self {
            aim: CameraAim::Target(target.into()),
            ..Self::from_euler(position, [0.0; 3])
        }
    }

    pub fn with_lens(mut self, lens: f32) -> Self {
        self.lens = lens;
        self
    }

    pub fn with_clip(mut self, start: f32, end: f32) -> Self {
        self.clip_start = start;
        self.clip_end = end;
        self
    }

    /// Unit view direction
    pub fn forward(&self) -> Vector3<f32> {
        match self.aim {
            CameraAim::Euler(rotation) => euler_direction(rotation),
            CameraAim::Target(target) => {
                let d = target - self.position;
                if d.magnitude2() > 0.0 {
                    d.normalize()
                } else {
                    -Vector3::unit_z()
                }
            }
        }
    }

    /// Point the camera orbits around: the target, or the spot on the view
    /// ray closest to the world origin
    pub fn focus_point(&self) -> Vector3<f32> {
        match self.aim {
            CameraAim::Target(target) => target,
            CameraAim::Euler(_) => {
                let forward = self.forward();
                let along = (-self.position).dot(forward).max(1.0);
                self.position + forward * along
            }
        }
    }

    /// Vertical field of view for a viewport of the given aspect ratio,
    /// fitting the sensor to the wider side
    pub fn vertical_fov(&self, aspect: f32) -> Rad<f32> {
        let half = (SENSOR_WIDTH_MM * 0.5 / self.lens.max(f32::EPSILON)).atan();
        if aspect >= 1.0 {
            Rad(2.0 * (half.tan() / aspect).atan())
        } else {
            Rad(2.0 * half)
        }
    }
}

/// Rotation matrix for XYZ Euler angles (radians)
pub fn euler_matrix(rotation: [f32; 3]) -> Matrix3<f32> {
    Matrix3::from_angle_z(Rad(rotation[2]))
        * Matrix3::from_angle_y(Rad(rotation[1]))
        * Matrix3::from_angle_x(Rad(rotation[0]))
}

/// Local -Z after rotation
pub fn euler_direction(rotation: [f32; 3]) -> Vector3<f32> {
    euler_matrix(rotation) * -Vector3::unit_z()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn euler_camera_points_at_origin() {
        let cam = CameraPlacement::from_euler(
            [12.0, -12.0, 8.0],
            [60f32.to_radians(), 0.0, 45f32.to_radians()],
        );
        let to_origin = (-cam.position).normalize();
        assert!(cam.forward().dot(to_origin) > 0.99);
        // focus lands near the origin
        assert!(cam.focus_point().magnitude() < 2.0);
    }

    #[test]
    fn target_aim_uses_target_as_focus() {
        let cam = CameraPlacement::looking_at([0.0, -10.0, 0.0], [0.0, 0.0, 0.0]);
        assert_eq!(cam.focus_point(), Vector3::new(0.0, 0.0, 0.0));
        assert!((cam.forward() - Vector3::unit_y()).magnitude() < 1e-6);
    }

    #[test]
    fn longer_lens_narrows_the_view() {
        let wide = CameraPlacement::from_euler([0.0; 3], [0.0; 3]).with_lens(20.0);
        let tele = wide.with_lens(85.0);
        assert!(wide.vertical_fov(16.0 / 9.0).0 > tele.vertical_fov(16.0 / 9.0).0);
    }
}
