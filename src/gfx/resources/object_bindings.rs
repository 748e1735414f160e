//! Per-binding uniforms: model transform plus the bound appearance
//!
//! Appearance values are clamped into shader-safe ranges here and nowhere
//! else.

use cgmath::{Matrix, Matrix4, SquareMatrix};

use crate::{
    scene::Appearance,
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Size in bytes of `Object` in scene.wgsl
pub const OBJECT_UNIFORM_SIZE: usize = 192;

/// MUST match `Object` in scene.wgsl.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
    /// rgb + opacity
    pub base_color: [f32; 4],
    /// metallic, roughness, specular intensity, specular power
    pub shading: [f32; 4],
    pub edge_color: [f32; 4],
    /// x: smooth shading
    pub flags: [u32; 4],
}

pub type ObjectUBO = UniformBuffer<ObjectUniform>;

impl ObjectUniform {
    pub fn new(model: Matrix4<f32>, appearance: &Appearance) -> Self {
        let normal = model
            .invert()
            .map(|m| m.transpose())
            .unwrap_or_else(Matrix4::identity);
        let c = appearance.color;

        Self {
            model: model.into(),
            normal: normal.into(),
            base_color: [
                c.r.clamp(0.0, 1.0),
                c.g.clamp(0.0, 1.0),
                c.b.clamp(0.0, 1.0),
                appearance.opacity.clamp(0.0, 1.0),
            ],
            shading: [
                appearance.metallic.clamp(0.0, 1.0),
                appearance.roughness.clamp(0.04, 1.0),
                appearance.specular.max(0.0),
                appearance.specular_power.max(1.0),
            ],
            edge_color: appearance.edge_color.with_alpha(1.0),
            flags: [appearance.smooth_shading as u32, 0, 0, 0],
        }
    }
}

pub struct ObjectBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
}

impl ObjectBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform_sized::<ObjectUniform>())
            .create(device, "Object Bind Group Layout");

        ObjectBindings { bind_group_layout }
    }

    pub fn create_bind_group(&self, device: &wgpu::Device, ubo: &ObjectUBO) -> wgpu::BindGroup {
        BindGroupBuilder::new(&self.bind_group_layout)
            .resource(ubo.binding_resource())
            .create(device, "Object Bind Group")
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }
}
