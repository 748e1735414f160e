//! Render pipeline management for wgpu
//!
//! Shaders are loaded once by name; pipelines are described by a
//! [`PipelineConfig`] and created eagerly so a render pass can borrow them
//! immutably.

use std::{collections::HashMap, sync::Arc};
use wgpu::*;

use crate::error::{Result, SceneError};
use crate::gfx::mesh::Vertex3D;

/// Depth test settings for a pipeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthConfig {
    pub write: bool,
    pub compare: CompareFunction,
}

impl DepthConfig {
    pub const OPAQUE: DepthConfig = DepthConfig {
        write: true,
        compare: CompareFunction::Less,
    };
    pub const READ_ONLY: DepthConfig = DepthConfig {
        write: false,
        compare: CompareFunction::Less,
    };
}

/// Configuration for creating a render pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub label: String,
    pub shader: String,
    pub vs_entry: &'static str,
    pub fs_entry: &'static str,
    pub bind_group_layouts: Vec<BindGroupLayout>,
    pub primitive_topology: PrimitiveTopology,
    pub cull_mode: Option<Face>,
    pub depth: Option<DepthConfig>,
    pub sample_count: u32,
    pub color_format: TextureFormat,
    pub blend: Option<BlendState>,
    /// For fullscreen passes that generate their vertices
    pub no_vertex_buffers: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            label: "Default Pipeline".to_string(),
            shader: "scene".to_string(),
            vs_entry: "vs_main",
            fs_entry: "fs_main",
            bind_group_layouts: Vec::new(),
            primitive_topology: PrimitiveTopology::TriangleList,
            cull_mode: None,
            depth: Some(DepthConfig::OPAQUE),
            sample_count: 1,
            color_format: TextureFormat::Rgba8UnormSrgb,
            blend: None,
            no_vertex_buffers: false,
        }
    }
}

impl PipelineConfig {
    /// Starts a config targeting `format` with the given MSAA sample count
    pub fn for_target(format: TextureFormat, sample_count: u32) -> Self {
        Self {
            color_format: format,
            sample_count,
            ..Default::default()
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_owned();
        self
    }

    pub fn with_shader(mut self, shader: &str) -> Self {
        self.shader = shader.to_string();
        self
    }

    pub fn with_entry_points(mut self, vs_entry: &'static str, fs_entry: &'static str) -> Self {
        self.vs_entry = vs_entry;
        self.fs_entry = fs_entry;
        self
    }

    pub fn with_bind_group_layouts(mut self, layouts: Vec<BindGroupLayout>) -> Self {
        self.bind_group_layouts = layouts;
        self
    }

    pub fn with_primitive_topology(mut self, topology: PrimitiveTopology) -> Self {
        self.primitive_topology = topology;
        self
    }

    pub fn with_depth(mut self, depth: Option<DepthConfig>) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_blend(mut self, blend: BlendState) -> Self {
        self.blend = Some(blend);
        self
    }

    pub fn with_no_vertex_buffers(mut self) -> Self {
        self.no_vertex_buffers = true;
        self
    }
}

/// Owns shader modules and the pipelines built from them
pub struct PipelineManager {
    device: Arc<Device>,
    pipelines: HashMap<String, RenderPipeline>,
    shader_modules: HashMap<String, ShaderModule>,
}

impl PipelineManager {
    pub fn new(device: Arc<Device>) -> Self {
        Self {
            device,
            pipelines: HashMap::new(),
            shader_modules: HashMap::new(),
        }
    }

    /// Compiles a WGSL module and stores it under `name`
    pub fn load_shader(&mut self, name: &str, source: &str) {
        let shader_module = self.device.create_shader_module(ShaderModuleDescriptor {
            label: Some(name),
            source: ShaderSource::Wgsl(source.into()),
        });
        self.shader_modules.insert(name.to_string(), shader_module);
    }

    /// Builds the pipeline described by `config` and stores it under `name`
    pub fn create_pipeline(&mut self, name: &str, config: &PipelineConfig) -> Result<()> {
        let shader = self
            .shader_modules
            .get(&config.shader)
            .ok_or_else(|| SceneError::Pipeline {
                name: name.to_string(),
                reason: format!("shader '{}' not loaded", config.shader),
            })?;

        let bind_group_layout_refs: Vec<&BindGroupLayout> =
            config.bind_group_layouts.iter().collect();
        let pipeline_layout = self
            .device
            .create_pipeline_layout(&PipelineLayoutDescriptor {
                label: Some(&format!("{} Layout", name)),
                bind_group_layouts: &bind_group_layout_refs,
                push_constant_ranges: &[],
            });

        let vertex_layouts = [Vertex3D::desc()];
        let vertex_buffers: &[VertexBufferLayout] = if config.no_vertex_buffers {
            &[]
        } else {
            &vertex_layouts
        };

        let depth_stencil = config.depth.map(|depth| DepthStencilState {
            format: crate::gfx::resources::TextureResource::DEPTH_FORMAT,
            depth_write_enabled: depth.write,
            depth_compare: depth.compare,
            stencil: StencilState::default(),
            bias: DepthBiasState::default(),
        });

        let targets = [Some(ColorTargetState {
            format: config.color_format,
            blend: config.blend,
            write_mask: ColorWrites::ALL,
        })];

        let pipeline = self
            .device
            .create_render_pipeline(&RenderPipelineDescriptor {
                label: Some(&config.label),
                layout: Some(&pipeline_layout),
                vertex: VertexState {
                    module: shader,
                    entry_point: Some(config.vs_entry),
                    buffers: vertex_buffers,
                    compilation_options: PipelineCompilationOptions::default(),
                },
                fragment: Some(FragmentState {
                    module: shader,
                    entry_point: Some(config.fs_entry),
                    targets: &targets,
                    compilation_options: PipelineCompilationOptions::default(),
                }),
                primitive: PrimitiveState {
                    topology: config.primitive_topology,
                    strip_index_format: None,
                    front_face: FrontFace::Ccw,
                    cull_mode: config.cull_mode,
                    polygon_mode: PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil,
                multisample: MultisampleState {
                    count: config.sample_count,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                multiview: None,
                cache: None,
            });

        log::debug!("Created pipeline '{name}' ({} samples)", config.sample_count);
        self.pipelines.insert(name.to_string(), pipeline);
        Ok(())
    }

    pub fn get_pipeline(&self, name: &str) -> Option<&RenderPipeline> {
        self.pipelines.get(name)
    }

    pub fn has_pipeline(&self, name: &str) -> bool {
        self.pipelines.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builders_override_defaults() {
        let config = PipelineConfig::for_target(TextureFormat::Bgra8UnormSrgb, 4)
            .with_label("Edges")
            .with_entry_points("vs_edge", "fs_edge")
            .with_primitive_topology(PrimitiveTopology::LineList)
            .with_depth(Some(DepthConfig::READ_ONLY));

        assert_eq!(config.sample_count, 4);
        assert_eq!(config.color_format, TextureFormat::Bgra8UnormSrgb);
        assert_eq!(config.vs_entry, "vs_edge");
        assert_eq!(config.primitive_topology, PrimitiveTopology::LineList);
        assert_eq!(config.depth, Some(DepthConfig::READ_ONLY));
        assert_eq!(config.cull_mode, None);
    }
}
