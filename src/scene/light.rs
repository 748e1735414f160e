//! Scene lights.
//!
//! Energies follow the point-light convention of radiant power spread over
//! a sphere: the renderer divides by `4 * PI * d^2`.

use cgmath::{Rad, Vector3};

use super::appearance::Color;
use super::camera::euler_direction;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    Point,
    /// Approximated as a point light at its center
    Area { size: f32 },
    /// `spot_size` is the full cone angle in radians
    Spot { spot_size: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub name: String,
    pub kind: LightKind,
    pub position: Vector3<f32>,
    /// XYZ Euler angles in radians; the light shines down its local -Z
    pub rotation: [f32; 3],
    pub energy: f32,
    pub color: Color,
}

impl Light {
    fn new(name: &str, kind: LightKind, position: [f32; 3], energy: f32) -> Self {
        Self {
            name: name.to_string(),
            kind,
            position: position.into(),
            rotation: [0.0; 3],
            energy,
            color: Color::WHITE,
        }
    }

    pub fn point(name: &str, position: [f32; 3], energy: f32) -> Self {
        Self::new(name, LightKind::Point, position, energy)
    }

    pub fn area(name: &str, position: [f32; 3], energy: f32, size: f32) -> Self {
        Self::new(name, LightKind::Area { size }, position, energy)
    }

    pub fn spot(name: &str, position: [f32; 3], energy: f32, spot_size: Rad<f32>) -> Self {
        Self::new(
            name,
            LightKind::Spot {
                spot_size: spot_size.0,
            },
            position,
            energy,
        )
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_rotation(mut self, rotation: [f32; 3]) -> Self {
        self.rotation = rotation;
        self
    }

    /// Unit vector the light points along
    pub fn direction(&self) -> Vector3<f32> {
        euler_direction(self.rotation)
    }
}

/// Key, fill and rim lights arranged around the origin
pub fn three_point_rig() -> Vec<Light> {
    vec![
        Light::area("Key_Light", [5.0, -5.0, 8.0], 500.0, 5.0).with_color(Color::rgb(1.0, 0.95, 0.9)),
        Light::area("Fill_Light", [-6.0, 4.0, 5.0], 200.0, 8.0)
            .with_color(Color::rgb(0.9, 0.95, 1.0)),
        Light::spot("Rim_Light", [0.0, 8.0, 6.0], 800.0, Rad(45f32.to_radians()))
            .with_rotation([60f32.to_radians(), 0.0, 180f32.to_radians()]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::InnerSpace;

    #[test]
    fn rig_has_three_lights() {
        let rig = three_point_rig();
        let names: Vec<_> = rig.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["Key_Light", "Fill_Light", "Rim_Light"]);
        assert!(matches!(rig[2].kind, LightKind::Spot { .. }));
    }

    #[test]
    fn rim_light_points_back_toward_the_scene() {
        let rim = &three_point_rig()[2];
        let to_origin = (-rim.position).normalize();
        // aimed down and toward -Y, roughly at the origin
        assert!(rim.direction().dot(to_origin) > 0.9);
    }
}
