//! Multi-viewport scene renderer
//!
//! Renders composed viewports into any color target: a window surface
//! texture or an offscreen texture. Each viewport is drawn inside its own
//! pixel rectangle in one render pass:
//!
//! 1. background, which also resets depth inside the rectangle
//! 2. opaque surfaces
//! 3. edge overlays
//! 4. translucent surfaces, back to front
//!
//! In wireframe mode steps 2-4 are replaced by a line pass over every edge.
//! Viewports that show axes then get the orientation triad in their
//! bottom-left corner. Titles and axis letters are drawn last, by a text
//! overlay pass over the finished frame.

use std::{collections::HashMap, sync::Arc};

use cgmath::{EuclideanSpace, InnerSpace, Matrix4, One, Quaternion, SquareMatrix, Vector3};

use crate::error::{Result, SceneError};
use crate::gfx::{
    camera::OrbitCamera,
    gizmos::{
        axes_gizmo::{axes_view_proj, corner_rect, label_position},
        AxesGizmo, AxisDirection,
    },
    mesh::GpuMesh,
    resources::{
        FrameTargets, ObjectBindings, ObjectUBO, ObjectUniform, ViewBindings, ViewUBO,
        ViewUBOContent,
    },
    ui::{Anchor, Label, TextOverlay},
};
use crate::scene::{Appearance, Background, GeometryId, Light, PixelRect, Scene, Viewport, ViewportBounds};

use super::pipeline_manager::{DepthConfig, PipelineConfig, PipelineManager};
use super::render_pass_ext::RenderPassExt;

const BACKGROUND: &str = "Background";
const OPAQUE: &str = "Opaque";
const TRANSLUCENT: &str = "Translucent";
const EDGES: &str = "Edges";
const WIREFRAME: &str = "Wireframe";
const AXES: &str = "Axes";

/// GPU state of one (geometry, appearance) binding
struct PreparedObject {
    geometry: GeometryId,
    appearance: Appearance,
    base_model: Matrix4<f32>,
    /// World-space center, used for actor rotation and depth sorting
    center: Vector3<f32>,
    ubo: ObjectUBO,
    bind_group: wgpu::BindGroup,
}

/// Model matrix with an extra rotation about the object's world-space center
fn actor_model(
    base_model: Matrix4<f32>,
    center: Vector3<f32>,
    rotation: Quaternion<f32>,
) -> Matrix4<f32> {
    if rotation == Quaternion::one() {
        return base_model;
    }
    Matrix4::from_translation(center)
        * Matrix4::from(rotation)
        * Matrix4::from_translation(-center)
        * base_model
}

/// Camera-rotation-only view used to draw a viewport's axes
struct AxesView {
    view_proj: Matrix4<f32>,
    ubo: ViewUBO,
    bind_group: wgpu::BindGroup,
}

struct PreparedViewport {
    bounds: ViewportBounds,
    title: Option<String>,
    axes: Option<AxesView>,
    background: Background,
    lights: Vec<Light>,
    ubo: ViewUBO,
    bind_group: wgpu::BindGroup,
    objects: Vec<PreparedObject>,
    eye: Vector3<f32>,
}

pub struct RenderEngine {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    targets: FrameTargets,
    pipeline_manager: PipelineManager,
    meshes: HashMap<GeometryId, GpuMesh>,
    viewports: Vec<PreparedViewport>,
    axes_gizmo: AxesGizmo,
    /// Present when some viewport has a title or axes
    overlay: Option<TextOverlay>,
    wireframe: bool,
}

impl RenderEngine {
    /// Uploads every geometry the viewports reference and builds the pipelines
    ///
    /// Fails with [`SceneError::UnknownGeometry`] if a viewport binds a handle
    /// that is not in `scene`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
        format: wgpu::TextureFormat,
        sample_count: u32,
        width: u32,
        height: u32,
        scene: &Scene,
        viewports: &[Viewport],
    ) -> Result<Self> {
        let view_bindings = ViewBindings::new(&device);
        let object_bindings = ObjectBindings::new(&device);

        let mut meshes = HashMap::new();
        let mut prepared = Vec::with_capacity(viewports.len());

        for (index, viewport) in viewports.iter().enumerate() {
            let ubo = ViewUBO::new(&device);
            let bind_group = view_bindings.create_bind_group(&device, &ubo);

            let mut objects = Vec::with_capacity(viewport.bindings().len());
            for (geometry, appearance) in viewport.bindings() {
                let descriptor =
                    scene
                        .geometry(*geometry)
                        .ok_or(SceneError::UnknownGeometry {
                            viewport: index,
                            geometry: *geometry,
                        })?;

                if let std::collections::hash_map::Entry::Vacant(slot) = meshes.entry(*geometry) {
                    let data = descriptor.mesh();
                    log::debug!(
                        "Uploading '{}': {} vertices, {} triangles",
                        descriptor.name,
                        data.vertex_count(),
                        data.triangle_count()
                    );
                    slot.insert(GpuMesh::upload(&device, &data, &descriptor.name));
                }

                let base_model = descriptor.transform();
                let center = descriptor
                    .bounds()
                    .map(|b| b.center().to_vec())
                    .unwrap_or_else(|| base_model.w.truncate());
                let ubo = ObjectUBO::new_with_data(
                    &device,
                    &ObjectUniform::new(base_model, appearance),
                );
                let bind_group = object_bindings.create_bind_group(&device, &ubo);

                objects.push(PreparedObject {
                    geometry: *geometry,
                    appearance: appearance.clone(),
                    base_model,
                    center,
                    ubo,
                    bind_group,
                });
            }

            let axes = viewport.show_axes.then(|| {
                let ubo = ViewUBO::new(&device);
                let bind_group = view_bindings.create_bind_group(&device, &ubo);
                AxesView {
                    view_proj: Matrix4::identity(),
                    ubo,
                    bind_group,
                }
            });

            prepared.push(PreparedViewport {
                bounds: viewport.bounds,
                title: viewport.title.clone(),
                axes,
                background: viewport.background,
                lights: viewport.lights.clone(),
                ubo,
                bind_group,
                objects,
                eye: Vector3::new(0.0, 0.0, 0.0),
            });
        }

        let mut pipeline_manager = PipelineManager::new(device.clone());
        pipeline_manager.load_shader("scene", include_str!("shaders/scene.wgsl"));
        create_pipelines(
            &mut pipeline_manager,
            &view_bindings,
            &object_bindings,
            format,
            sample_count,
        )?;

        let targets = FrameTargets::new(&device, width, height, format, sample_count);
        let axes_gizmo = AxesGizmo::new(&device, &object_bindings);
        let overlay = viewports
            .iter()
            .any(|v| v.title.is_some() || v.show_axes)
            .then(|| TextOverlay::new(&device, &queue, format))
            .flatten();

        log::info!(
            "Render engine ready: {} viewport(s), {} mesh(es), {}x{} @ {} sample(s)",
            prepared.len(),
            meshes.len(),
            width,
            height,
            sample_count
        );

        Ok(Self {
            device,
            queue,
            targets,
            pipeline_manager,
            meshes,
            viewports: prepared,
            axes_gizmo,
            overlay,
            wireframe: false,
        })
    }

    /// Recreates the depth and MSAA buffers for a new target size
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.targets = FrameTargets::new(
            &self.device,
            width,
            height,
            self.targets.format,
            self.targets.sample_count,
        );
    }

    pub fn size(&self) -> (u32, u32) {
        (self.targets.width, self.targets.height)
    }

    pub fn sample_count(&self) -> u32 {
        self.targets.sample_count
    }

    pub fn set_wireframe(&mut self, wireframe: bool) {
        self.wireframe = wireframe;
    }

    pub fn wireframe(&self) -> bool {
        self.wireframe
    }

    /// Pixel rectangle of every viewport on the current target, clipped
    pub fn viewport_rects(&self) -> Vec<PixelRect> {
        self.viewports
            .iter()
            .map(|v| v.bounds.to_pixels(self.targets.width, self.targets.height))
            .collect()
    }

    /// Writes camera, light and per-object uniforms for the next frame
    ///
    /// `cameras` and `actor_rotations` are indexed like the viewports; a
    /// missing rotation means none.
    pub fn update(&mut self, cameras: &[OrbitCamera], actor_rotations: &[Quaternion<f32>]) {
        for (index, (viewport, camera)) in self.viewports.iter_mut().zip(cameras).enumerate() {
            let forward = (camera.target - camera.eye).normalize();
            viewport.eye = camera.eye;
            viewport.ubo.update_content(
                &self.queue,
                ViewUBOContent::new(
                    camera.view_proj(),
                    camera.eye,
                    forward,
                    &viewport.lights,
                    &viewport.background,
                ),
            );

            if let Some(axes) = &mut viewport.axes {
                axes.view_proj = axes_view_proj(forward, camera.up);
                axes.ubo.update_content(
                    &self.queue,
                    ViewUBOContent::new(
                        axes.view_proj.into(),
                        Vector3::new(0.0, 0.0, 0.0),
                        forward,
                        &[],
                        &viewport.background,
                    ),
                );
            }

            let rotation = actor_rotations
                .get(index)
                .copied()
                .unwrap_or_else(Quaternion::one);
            for object in &mut viewport.objects {
                let model = actor_model(object.base_model, object.center, rotation);
                object
                    .ubo
                    .update_content(&self.queue, ObjectUniform::new(model, &object.appearance));
            }
        }
    }

    /// Titles and axis letters of every visible viewport, in pixels
    pub fn labels(&self) -> Vec<Label> {
        let mut labels = Vec::new();
        for viewport in &self.viewports {
            let rect = viewport
                .bounds
                .to_pixels(self.targets.width, self.targets.height);
            if rect.is_empty() {
                continue;
            }
            if let Some(title) = &viewport.title {
                labels.push(Label::title(title, rect, viewport.background.top()));
            }
            let corner = viewport.axes.as_ref().zip(corner_rect(rect));
            if let Some((axes, corner)) = corner {
                labels.extend(AxisDirection::ALL.iter().map(|&axis| Label {
                    text: axis.label().to_owned(),
                    position: label_position(axes.view_proj, axis, corner),
                    anchor: Anchor::Center,
                    color: axis.color().with_alpha(1.0),
                }));
            }
        }
        labels
    }

    /// Encodes and submits one frame into `target`
    pub fn render(&mut self, target: &wgpu::TextureView) {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(
                    self.targets
                        .color_attachment(target, wgpu::LoadOp::Clear(wgpu::Color::BLACK)),
                )],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            for viewport in &self.viewports {
                let rect = viewport
                    .bounds
                    .to_pixels(self.targets.width, self.targets.height);
                if rect.is_empty() {
                    continue;
                }
                self.render_viewport(&mut render_pass, viewport, rect);
            }
        }

        if self.overlay.is_some() {
            let labels = self.labels();
            let size = self.size();
            if let Some(overlay) = &mut self.overlay {
                overlay.render(&self.device, &self.queue, &mut encoder, target, size, &labels);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
    }

    fn render_viewport<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        viewport: &'a PreparedViewport,
        rect: PixelRect,
    ) {
        render_pass.set_viewport(
            rect.x as f32,
            rect.y as f32,
            rect.width as f32,
            rect.height as f32,
            0.0,
            1.0,
        );
        render_pass.set_scissor_rect(rect.x, rect.y, rect.width, rect.height);
        render_pass.set_bind_group(0, &viewport.bind_group, &[]);

        if let Some(pipeline) = self.pipeline_manager.get_pipeline(BACKGROUND) {
            render_pass.set_pipeline(pipeline);
            render_pass.draw(0..3, 0..1);
        }

        let drawable = viewport
            .objects
            .iter()
            .filter_map(|o| self.meshes.get(&o.geometry).map(|m| (o, m)));

        if self.wireframe {
            if let Some(pipeline) = self.pipeline_manager.get_pipeline(WIREFRAME) {
                render_pass.set_pipeline(pipeline);
                for (object, mesh) in drawable {
                    render_pass.draw_mesh_edges(mesh, &object.bind_group);
                }
            }
        } else {
            self.render_surfaces(render_pass, viewport, drawable.collect());
        }

        if let Some(axes) = &viewport.axes {
            self.render_axes(render_pass, axes, rect);
        }
    }

    fn render_surfaces<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        viewport: &'a PreparedViewport,
        drawable: Vec<(&'a PreparedObject, &'a GpuMesh)>,
    ) {
        let (translucent, opaque): (Vec<_>, Vec<_>) =
            drawable.into_iter().partition(|(o, _)| o.appearance.is_translucent());

        if let Some(pipeline) = self.pipeline_manager.get_pipeline(OPAQUE) {
            render_pass.set_pipeline(pipeline);
            for &(object, mesh) in &opaque {
                render_pass.draw_mesh(mesh, &object.bind_group);
            }
        }

        if let Some(pipeline) = self.pipeline_manager.get_pipeline(EDGES) {
            render_pass.set_pipeline(pipeline);
            for &(object, mesh) in opaque.iter().chain(&translucent) {
                if object.appearance.show_edges {
                    render_pass.draw_mesh_edges(mesh, &object.bind_group);
                }
            }
        }

        if let Some(pipeline) = self.pipeline_manager.get_pipeline(TRANSLUCENT) {
            render_pass.set_pipeline(pipeline);
            for (object, mesh) in back_to_front(translucent, viewport.eye) {
                render_pass.draw_mesh(mesh, &object.bind_group);
            }
        }
    }

    fn render_axes<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        axes: &'a AxesView,
        viewport_rect: PixelRect,
    ) {
        let (Some(rect), Some(pipeline)) = (
            corner_rect(viewport_rect),
            self.pipeline_manager.get_pipeline(AXES),
        ) else {
            return;
        };
        render_pass.set_viewport(
            rect.x as f32,
            rect.y as f32,
            rect.width as f32,
            rect.height as f32,
            0.0,
            1.0,
        );
        render_pass.set_scissor_rect(rect.x, rect.y, rect.width, rect.height);
        render_pass.set_bind_group(0, &axes.bind_group, &[]);
        render_pass.set_pipeline(pipeline);
        self.axes_gizmo.draw(render_pass);
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.targets.format
    }
}

fn back_to_front<'a>(
    mut objects: Vec<(&'a PreparedObject, &'a GpuMesh)>,
    eye: Vector3<f32>,
) -> Vec<(&'a PreparedObject, &'a GpuMesh)> {
    objects.sort_by(|(a, _), (b, _)| {
        let da = (a.center - eye).magnitude2();
        let db = (b.center - eye).magnitude2();
        db.total_cmp(&da)
    });
    objects
}

fn create_pipelines(
    pipeline_manager: &mut PipelineManager,
    view_bindings: &ViewBindings,
    object_bindings: &ObjectBindings,
    format: wgpu::TextureFormat,
    sample_count: u32,
) -> Result<()> {
    let view_layout = view_bindings.bind_group_layout().clone();
    let scene_layouts = vec![
        view_layout.clone(),
        object_bindings.bind_group_layout().clone(),
    ];
    let base = PipelineConfig::for_target(format, sample_count).with_shader("scene");

    pipeline_manager.create_pipeline(
        BACKGROUND,
        &base
            .clone()
            .with_label("BACKGROUND")
            .with_entry_points("vs_background", "fs_background")
            .with_bind_group_layouts(vec![view_layout])
            .with_depth(Some(DepthConfig {
                write: true,
                compare: wgpu::CompareFunction::Always,
            }))
            .with_no_vertex_buffers(),
    )?;

    pipeline_manager.create_pipeline(
        OPAQUE,
        &base
            .clone()
            .with_label("OPAQUE")
            .with_bind_group_layouts(scene_layouts.clone()),
    )?;

    pipeline_manager.create_pipeline(
        TRANSLUCENT,
        &base
            .clone()
            .with_label("TRANSLUCENT")
            .with_bind_group_layouts(scene_layouts.clone())
            .with_depth(Some(DepthConfig::READ_ONLY))
            .with_blend(wgpu::BlendState::ALPHA_BLENDING),
    )?;

    let lines = base
        .with_bind_group_layouts(scene_layouts)
        .with_primitive_topology(wgpu::PrimitiveTopology::LineList)
        .with_depth(Some(DepthConfig {
            write: true,
            compare: wgpu::CompareFunction::LessEqual,
        }));

    pipeline_manager.create_pipeline(
        EDGES,
        &lines
            .clone()
            .with_label("EDGES")
            .with_entry_points("vs_edge", "fs_edge"),
    )?;

    pipeline_manager.create_pipeline(
        WIREFRAME,
        &lines
            .clone()
            .with_label("WIREFRAME")
            .with_entry_points("vs_edge", "fs_wire"),
    )?;

    // drawn over whatever the scene left in the corner
    pipeline_manager.create_pipeline(
        AXES,
        &lines
            .with_label("AXES")
            .with_entry_points("vs_edge", "fs_edge")
            .with_depth(Some(DepthConfig {
                write: false,
                compare: wgpu::CompareFunction::Always,
            })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Point3, Rad, Rotation3, SquareMatrix, Transform};

    #[test]
    fn actor_rotation_keeps_center_fixed() {
        let center = Vector3::new(1.0, 1.0, 1.0);
        let base = Matrix4::from_translation(center);
        let model = actor_model(base, center, Quaternion::from_angle_z(Rad(1.0)));

        let moved = model.transform_point(Point3::new(0.0, 0.0, 0.0));
        assert!((moved.to_vec() - center).magnitude() < 1e-5);
        let corner = model.transform_point(Point3::new(1.0, 0.0, 0.0));
        assert!((corner.to_vec() - Vector3::new(2.0, 1.0, 1.0)).magnitude() > 0.1);
    }

    #[test]
    fn identity_rotation_leaves_model_untouched() {
        let base = Matrix4::from_scale(2.0);
        let model = actor_model(base, Vector3::new(3.0, 0.0, 0.0), Quaternion::one());
        assert_eq!(model, base);
        assert_eq!(
            actor_model(Matrix4::identity(), Vector3::new(0.0, 0.0, 0.0), Quaternion::one()),
            Matrix4::identity()
        );
    }
}
