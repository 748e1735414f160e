//! Per-viewport uniform bindings for camera and lights
//!
//! Every viewport owns one [`ViewUBO`] bound to slot 0 of the scene
//! pipelines. Scene lights are packed into a fixed array; a viewport
//! without lights gets a headlight shining along the view direction.

use cgmath::{InnerSpace, Vector3};

use crate::{
    scene::{Background, Light, LightKind},
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Lights beyond this count are ignored by the shader
pub const MAX_LIGHTS: usize = 4;

pub const LIGHT_KIND_HEADLIGHT: f32 = 0.0;
pub const LIGHT_KIND_POINT: f32 = 1.0;
pub const LIGHT_KIND_SPOT: f32 = 2.0;

/// One light as the shader sees it
///
/// `position.w` holds the kind, `direction.w` the cosine of the spot cutoff
/// and `color.w` the radiant power in watts (unused for the headlight).
/// MUST match `LightData` in scene.wgsl.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightData {
    pub position: [f32; 4],
    pub direction: [f32; 4],
    pub color: [f32; 4],
}

/// MUST match `View` in scene.wgsl.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ViewUBOContent {
    pub view_proj: [[f32; 4]; 4],
    pub eye: [f32; 4],
    pub lights: [LightData; MAX_LIGHTS],
    /// x: light count
    pub light_count: [u32; 4],
    pub background_bottom: [f32; 4],
    pub background_top: [f32; 4],
}

pub type ViewUBO = UniformBuffer<ViewUBOContent>;

impl LightData {
    pub fn headlight(forward: Vector3<f32>) -> Self {
        let d = forward.normalize();
        Self {
            position: [0.0, 0.0, 0.0, LIGHT_KIND_HEADLIGHT],
            direction: [d.x, d.y, d.z, -1.0],
            color: [1.0, 1.0, 1.0, 0.0],
        }
    }

    pub fn from_light(light: &Light) -> Self {
        let p = light.position;
        let d = light.direction();
        let (kind, cos_cutoff) = match light.kind {
            LightKind::Point | LightKind::Area { .. } => (LIGHT_KIND_POINT, -1.0),
            LightKind::Spot { spot_size } => (LIGHT_KIND_SPOT, (spot_size * 0.5).cos()),
        };
        let c = light.color;
        Self {
            position: [p.x, p.y, p.z, kind],
            direction: [d.x, d.y, d.z, cos_cutoff],
            color: [c.r, c.g, c.b, light.energy.max(0.0)],
        }
    }
}

/// Packs scene lights, or the headlight when there are none
pub fn pack_lights(lights: &[Light], forward: Vector3<f32>) -> ([LightData; MAX_LIGHTS], u32) {
    let mut packed = [LightData::default(); MAX_LIGHTS];
    if lights.is_empty() {
        packed[0] = LightData::headlight(forward);
        return (packed, 1);
    }

    if lights.len() > MAX_LIGHTS {
        log::warn!(
            "{} lights in one viewport, only the first {MAX_LIGHTS} are used",
            lights.len()
        );
    }
    let count = lights.len().min(MAX_LIGHTS);
    for (slot, light) in packed.iter_mut().zip(lights) {
        *slot = LightData::from_light(light);
    }
    (packed, count as u32)
}

impl ViewUBOContent {
    pub fn new(
        view_proj: [[f32; 4]; 4],
        eye: Vector3<f32>,
        forward: Vector3<f32>,
        lights: &[Light],
        background: &Background,
    ) -> Self {
        let (lights, count) = pack_lights(lights, forward);
        Self {
            view_proj,
            eye: [eye.x, eye.y, eye.z, 1.0],
            lights,
            light_count: [count, 0, 0, 0],
            background_bottom: background.bottom().with_alpha(1.0),
            background_top: background.top().with_alpha(1.0),
        }
    }
}

/// Bind group layout shared by every viewport's view uniform
pub struct ViewBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
}

impl ViewBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform_sized::<ViewUBOContent>())
            .create(device, "View Bind Group Layout");

        ViewBindings { bind_group_layout }
    }

    pub fn create_bind_group(&self, device: &wgpu::Device, ubo: &ViewUBO) -> wgpu::BindGroup {
        BindGroupBuilder::new(&self.bind_group_layout)
            .resource(ubo.binding_resource())
            .create(device, "View Bind Group")
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{three_point_rig, Color};

    #[test]
    fn uniform_layout_matches_shader_size() {
        // mat4 + vec4 + 4 * (3 * vec4) + uvec4 + 2 * vec4
        assert_eq!(std::mem::size_of::<ViewUBOContent>(), 64 + 16 + 4 * 48 + 16 + 32);
        assert_eq!(std::mem::size_of::<ViewUBOContent>() % 16, 0);
    }

    #[test]
    fn no_lights_means_headlight() {
        let (lights, count) = pack_lights(&[], -Vector3::unit_y());
        assert_eq!(count, 1);
        assert_eq!(lights[0].position[3], LIGHT_KIND_HEADLIGHT);
        assert_eq!(lights[0].direction[1], -1.0);
    }

    #[test]
    fn rig_lights_keep_their_kind_and_energy() {
        let rig = three_point_rig();
        let (lights, count) = pack_lights(&rig, Vector3::unit_x());
        assert_eq!(count, 3);
        assert_eq!(lights[0].position[3], LIGHT_KIND_POINT);
        assert_eq!(lights[0].color[3], 500.0);
        assert_eq!(lights[2].position[3], LIGHT_KIND_SPOT);
        let half_cone = (45f32.to_radians() * 0.5).cos();
        assert!((lights[2].direction[3] - half_cone).abs() < 1e-6);
    }

    #[test]
    fn extra_lights_are_dropped() {
        let many: Vec<_> = (0..6)
            .map(|i| Light::point(&format!("L{i}"), [i as f32, 0.0, 0.0], 10.0))
            .collect();
        let (_, count) = pack_lights(&many, Vector3::unit_x());
        assert_eq!(count as usize, MAX_LIGHTS);
    }

    #[test]
    fn gradient_background_fills_both_ends() {
        let background = Background::Gradient {
            bottom: Color::BLACK,
            top: Color::DARK_BLUE,
        };
        let content = ViewUBOContent::new(
            [[0.0; 4]; 4],
            Vector3::new(0.0, 0.0, 5.0),
            -Vector3::unit_z(),
            &[],
            &background,
        );
        assert_eq!(content.background_bottom, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(content.background_top, Color::DARK_BLUE.with_alpha(1.0));
    }
}
