use cgmath::{Matrix4, One, Quaternion, Rad, Rotation3};
use winit::event::WindowEvent;

use super::camera_controller::{CameraController, Gesture, InteractionStyle};
use super::orbit_camera::OrbitCamera;
use crate::scene::PixelRect;

pub trait Camera: Sized {
    fn build_view_projection_matrix(&self) -> Matrix4<f32>;
}

/// Cameras and actor rotations of every viewport on a surface, steered by
/// one shared controller
pub struct CameraManager {
    pub cameras: Vec<OrbitCamera>,
    /// Extra rotation applied to all actors of a viewport, about each actor's center
    pub actor_rotations: Vec<Quaternion<f32>>,
    pub controller: CameraController,
    pub style: InteractionStyle,
    /// Viewport locked by the current drag
    active: Option<usize>,
}

impl CameraManager {
    pub fn new(cameras: Vec<OrbitCamera>, style: InteractionStyle) -> Self {
        let actor_rotations = vec![Quaternion::one(); cameras.len()];
        Self {
            cameras,
            actor_rotations,
            controller: CameraController::default(),
            style,
            active: None,
        }
    }

    /// Feeds a window event through the controller and applies camera
    /// gestures to the viewport under the cursor
    ///
    /// Gestures that concern the whole window (close, wireframe) are returned.
    pub fn process_event(&mut self, event: &WindowEvent, rects: &[PixelRect]) -> Option<Gesture> {
        let gesture = self.controller.process_event(event);

        if !self.controller.is_dragging() {
            self.active = None;
        } else if self.active.is_none() {
            self.active = self.viewport_under_cursor(rects);
        }

        match gesture? {
            g @ (Gesture::Close | Gesture::Wireframe(_)) => Some(g),
            Gesture::Reset => {
                match self.viewport_under_cursor(rects) {
                    Some(index) => self.apply(index, Gesture::Reset),
                    None => (0..self.cameras.len()).for_each(|i| self.apply(i, Gesture::Reset)),
                }
                None
            }
            g => {
                if let Some(index) = self.active.or_else(|| self.viewport_under_cursor(rects)) {
                    self.apply(index, g);
                }
                None
            }
        }
    }

    /// Topmost viewport containing the cursor; later viewports draw over earlier ones
    fn viewport_under_cursor(&self, rects: &[PixelRect]) -> Option<usize> {
        let (x, y) = self.controller.cursor()?;
        rects.iter().rposition(|rect| rect.contains(x, y))
    }

    pub fn apply(&mut self, index: usize, gesture: Gesture) {
        let Some(camera) = self.cameras.get_mut(index) else {
            return;
        };
        match (gesture, self.style) {
            (Gesture::Rotate { dx, dy }, InteractionStyle::TrackballCamera) => {
                camera.add_yaw(-dx);
                camera.add_pitch(dy);
            }
            (Gesture::Rotate { dx, dy }, InteractionStyle::TrackballActor) => {
                let (right, up) = camera.screen_axes();
                let spin = Quaternion::from_axis_angle(up, Rad(dx))
                    * Quaternion::from_axis_angle(right, Rad(dy));
                self.actor_rotations[index] = spin * self.actor_rotations[index];
            }
            (Gesture::Pan { dx, dy }, _) => camera.pan((dx, dy)),
            (Gesture::Zoom(factor), _) => camera.zoom(factor),
            (Gesture::Reset, _) => {
                camera.reset_to_default();
                self.actor_rotations[index] = Quaternion::one();
            }
            (Gesture::Wireframe(_) | Gesture::Close, _) => {}
        }
    }

    pub fn resize(&mut self, rects: &[PixelRect]) {
        for (camera, rect) in self.cameras.iter_mut().zip(rects) {
            camera.resize_projection(rect.width, rect.height);
        }
    }
}

pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    matrix4.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Vector3};

    fn two_cameras(style: InteractionStyle) -> CameraManager {
        let camera = OrbitCamera::new(5.0, 0.3, 0.0, Vector3::new(0.0, 0.0, 0.0), 1.0);
        CameraManager::new(vec![camera, camera], style)
    }

    #[test]
    fn camera_style_orbits_only_the_target_viewport() {
        let mut manager = two_cameras(InteractionStyle::TrackballCamera);
        let untouched = manager.cameras[0].eye;
        manager.apply(1, Gesture::Rotate { dx: 0.5, dy: 0.0 });

        assert_eq!(manager.cameras[0].eye, untouched);
        assert!((manager.cameras[1].eye - untouched).magnitude() > 0.1);
        assert_eq!(manager.actor_rotations[1], Quaternion::one());
    }

    #[test]
    fn actor_style_rotates_actors_not_camera() {
        let mut manager = two_cameras(InteractionStyle::TrackballActor);
        let eye = manager.cameras[0].eye;
        manager.apply(0, Gesture::Rotate { dx: 0.5, dy: 0.2 });

        assert_eq!(manager.cameras[0].eye, eye);
        assert_ne!(manager.actor_rotations[0], Quaternion::one());

        manager.apply(0, Gesture::Reset);
        assert_eq!(manager.actor_rotations[0], Quaternion::one());
    }

    #[test]
    fn out_of_range_viewport_is_ignored() {
        let mut manager = two_cameras(InteractionStyle::TrackballCamera);
        manager.apply(7, Gesture::Zoom(2.0));
        assert_eq!(manager.cameras.len(), 2);
    }
}
