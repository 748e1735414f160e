//! Render pass helpers for drawing uploaded meshes

use wgpu::*;

use crate::gfx::mesh::GpuMesh;

/// Slot the per-object bind group occupies in every scene pipeline
pub const OBJECT_BIND_GROUP: u32 = 1;

pub trait RenderPassExt<'a> {
    /// Draws the triangles of `mesh` with the given object bindings
    fn draw_mesh(&mut self, mesh: &'a GpuMesh, object_bind_group: &'a BindGroup);

    /// Draws the edge lines of `mesh` with the given object bindings
    fn draw_mesh_edges(&mut self, mesh: &'a GpuMesh, object_bind_group: &'a BindGroup);
}

impl<'a> RenderPassExt<'a> for RenderPass<'a> {
    fn draw_mesh(&mut self, mesh: &'a GpuMesh, object_bind_group: &'a BindGroup) {
        self.set_bind_group(OBJECT_BIND_GROUP, object_bind_group, &[]);
        mesh.draw_triangles(self);
    }

    fn draw_mesh_edges(&mut self, mesh: &'a GpuMesh, object_bind_group: &'a BindGroup) {
        self.set_bind_group(OBJECT_BIND_GROUP, object_bind_group, &[]);
        mesh.draw_edges(self);
    }
}
