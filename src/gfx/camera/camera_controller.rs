use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

/// What a mouse drag manipulates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionStyle {
    /// Drags orbit the camera around its focus point
    #[default]
    TrackballCamera,
    /// Drags rotate the viewport's actors about their own centers
    TrackballActor,
}

/// Input translated into an intent, independent of the viewport it targets
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// Rotation in radians around the screen up (`dx`) and right (`dy`) axes
    Rotate { dx: f32, dy: f32 },
    /// Translation as a fraction of the camera distance
    Pan { dx: f32, dy: f32 },
    /// Multiplier applied to the camera distance
    Zoom(f32),
    Reset,
    Wireframe(bool),
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Drag {
    Rotate,
    Pan,
    Zoom,
}

pub struct CameraController {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    is_shift_held: bool,
    /// Active drag and the button that started it
    drag: Option<(Drag, MouseButton)>,
    cursor: Option<PhysicalPosition<f64>>,
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(0.01, 0.1)
    }
}

impl CameraController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            pan_speed: 0.002,
            is_shift_held: false,
            drag: None,
            cursor: None,
        }
    }

    /// Last known cursor position in physical pixels
    pub fn cursor(&self) -> Option<(f64, f64)> {
        self.cursor.map(|p| (p.x, p.y))
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.drag, Some((Drag::Pan, _)))
    }

    pub fn is_rotating(&self) -> bool {
        matches!(self.drag, Some((Drag::Rotate, _)))
    }

    pub fn set_shift(&mut self, held: bool) {
        self.is_shift_held = held;
    }

    pub fn process_event(&mut self, event: &WindowEvent) -> Option<Gesture> {
        match event {
            WindowEvent::ModifiersChanged(modifiers) => {
                self.set_shift(modifiers.state().shift_key());
                None
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.process_button(*state, *button);
                None
            }
            WindowEvent::CursorMoved { position, .. } => self.process_cursor(*position),
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                self.drag = None;
                None
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, lines) => *lines,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => *y as f32 / 40.0,
                };
                Some(Gesture::Zoom((-scroll * self.zoom_speed).exp()))
            }
            WindowEvent::KeyboardInput { event, .. } => self.process_keyed_events(event),
            _ => None,
        }
    }

    pub fn process_button(&mut self, state: ElementState, button: MouseButton) {
        match state {
            ElementState::Released => {
                if matches!(self.drag, Some((_, started_by)) if started_by == button) {
                    self.drag = None;
                }
            }
            // a second button joining a drag does not change it
            ElementState::Pressed if self.drag.is_some() => {}
            ElementState::Pressed => {
                let drag = match button {
                    MouseButton::Left if self.is_shift_held => Drag::Pan,
                    MouseButton::Left => Drag::Rotate,
                    MouseButton::Middle => Drag::Pan,
                    MouseButton::Right => Drag::Zoom,
                    _ => return,
                };
                self.drag = Some((drag, button));
            }
        }
    }

    pub fn process_cursor(&mut self, position: PhysicalPosition<f64>) -> Option<Gesture> {
        let previous = self.cursor.replace(position)?;
        let (drag, _) = self.drag?;
        let dx = (position.x - previous.x) as f32;
        let dy = (position.y - previous.y) as f32;

        Some(match drag {
            Drag::Rotate => Gesture::Rotate {
                dx: dx * self.rotate_speed,
                dy: dy * self.rotate_speed,
            },
            Drag::Pan => Gesture::Pan {
                dx: -dx * self.pan_speed,
                dy: dy * self.pan_speed,
            },
            Drag::Zoom => Gesture::Zoom((dy * self.zoom_speed * 0.1).exp()),
        })
    }

    pub fn process_keyed_events(&mut self, event: &KeyEvent) -> Option<Gesture> {
        if event.state != ElementState::Pressed || event.repeat {
            return None;
        }
        match event.physical_key {
            PhysicalKey::Code(code) => gesture_for_key(code),
            PhysicalKey::Unidentified(_) => None,
        }
    }
}

/// Keyboard shortcuts shared by both interaction styles
pub fn gesture_for_key(code: KeyCode) -> Option<Gesture> {
    match code {
        KeyCode::KeyR => Some(Gesture::Reset),
        KeyCode::KeyW => Some(Gesture::Wireframe(true)),
        KeyCode::KeyS => Some(Gesture::Wireframe(false)),
        KeyCode::KeyQ | KeyCode::KeyE | KeyCode::Escape => Some(Gesture::Close),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: f64, y: f64) -> PhysicalPosition<f64> {
        PhysicalPosition::new(x, y)
    }

    #[test]
    fn left_drag_rotates() {
        let mut controller = CameraController::new(0.01, 0.1);
        assert_eq!(controller.process_cursor(at(10.0, 10.0)), None);

        controller.process_button(ElementState::Pressed, MouseButton::Left);
        assert!(controller.is_rotating());
        match controller.process_cursor(at(20.0, 10.0)) {
            Some(Gesture::Rotate { dx, dy }) => {
                assert!((dx - 0.1).abs() < 1e-6);
                assert_eq!(dy, 0.0);
            }
            other => panic!("expected rotation, got {other:?}"),
        }

        controller.process_button(ElementState::Released, MouseButton::Left);
        assert_eq!(controller.process_cursor(at(30.0, 10.0)), None);
    }

    #[test]
    fn shift_drag_pans() {
        let mut controller = CameraController::default();
        controller.set_shift(true);
        controller.process_cursor(at(0.0, 0.0));
        controller.process_button(ElementState::Pressed, MouseButton::Left);
        assert!(controller.is_panning());
        assert!(matches!(
            controller.process_cursor(at(5.0, 5.0)),
            Some(Gesture::Pan { .. })
        ));
    }

    #[test]
    fn only_the_starting_button_ends_a_drag() {
        let mut controller = CameraController::default();
        controller.process_cursor(at(0.0, 0.0));
        controller.process_button(ElementState::Pressed, MouseButton::Left);

        controller.process_button(ElementState::Pressed, MouseButton::Middle);
        controller.process_button(ElementState::Released, MouseButton::Middle);
        controller.process_button(ElementState::Released, MouseButton::Right);
        assert!(controller.is_rotating());
        assert!(matches!(
            controller.process_cursor(at(4.0, 0.0)),
            Some(Gesture::Rotate { .. })
        ));

        controller.process_button(ElementState::Released, MouseButton::Left);
        assert!(!controller.is_dragging());
    }

    #[test]
    fn right_drag_down_zooms_out() {
        let mut controller = CameraController::default();
        controller.process_cursor(at(0.0, 0.0));
        controller.process_button(ElementState::Pressed, MouseButton::Right);
        match controller.process_cursor(at(0.0, 50.0)) {
            Some(Gesture::Zoom(factor)) => assert!(factor > 1.0),
            other => panic!("expected zoom, got {other:?}"),
        }
    }

    #[test]
    fn keys_map_to_gestures() {
        assert_eq!(gesture_for_key(KeyCode::KeyR), Some(Gesture::Reset));
        assert_eq!(gesture_for_key(KeyCode::KeyW), Some(Gesture::Wireframe(true)));
        assert_eq!(gesture_for_key(KeyCode::KeyS), Some(Gesture::Wireframe(false)));
        for key in [KeyCode::KeyQ, KeyCode::KeyE, KeyCode::Escape] {
            assert_eq!(gesture_for_key(key), Some(Gesture::Close));
        }
        assert_eq!(gesture_for_key(KeyCode::KeyZ), None);
    }
}
