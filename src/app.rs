//! Interactive window session driven by winit.

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

use crate::display::engine::{self, AdapterProbe, RenderEngineKind};
use crate::display::{viewport_cameras, DisplayState, DisplaySurface, RenderSettings};
use crate::error::SceneError;
use crate::gfx::camera::{CameraManager, Gesture};
use crate::gfx::RenderEngine;
use crate::scene::Scene;

/// What an interactive session hands back to the driver once it closes
pub(crate) struct SessionOutcome {
    pub scene: Scene,
    pub surface: DisplaySurface,
    /// `Interactive` if the window came up, `Rendering` otherwise
    pub state: DisplayState,
    pub engine: Option<RenderEngineKind>,
    pub error: Option<SceneError>,
}

struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    renderer: RenderEngine,
    cameras: CameraManager,
}

struct Session {
    scene: Scene,
    surface: DisplaySurface,
    engine_order: Vec<RenderEngineKind>,
    samples: u32,
    instance: wgpu::Instance,
    gpu: Option<Gpu>,
    state: DisplayState,
    engine: Option<RenderEngineKind>,
    error: Option<SceneError>,
}

/// Blocks on the event loop until the window is closed
pub(crate) fn run_interactive(
    scene: Scene,
    surface: DisplaySurface,
    settings: &RenderSettings,
) -> SessionOutcome {
    let mut session = Session {
        scene,
        surface,
        engine_order: settings.engine_order.clone(),
        samples: settings.samples,
        instance: engine::create_instance(),
        gpu: None,
        state: DisplayState::Rendering,
        engine: None,
        error: None,
    };

    let result = EventLoop::new().and_then(|event_loop| {
        event_loop.set_control_flow(ControlFlow::Wait);
        event_loop.run_app(&mut session)
    });
    if let Err(err) = result {
        session.fail(SceneError::from(err));
    }

    // release GPU objects before the window goes away
    session.gpu = None;
    SessionOutcome {
        scene: session.scene,
        surface: session.surface,
        state: session.state,
        engine: session.engine,
        error: session.error,
    }
}

impl Session {
    fn fail(&mut self, err: SceneError) {
        log::error!("{err}");
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> crate::error::Result<Gpu> {
        let attributes = WindowAttributes::default()
            .with_title(self.surface.title.clone())
            .with_inner_size(LogicalSize::new(self.surface.width, self.surface.height));
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .map_err(|e| SceneError::Surface(e.to_string()))?,
        );

        let surface = self
            .instance
            .create_surface(window.clone())
            .map_err(|e| SceneError::Surface(e.to_string()))?;

        let selection =
            engine::select_engine(&AdapterProbe::new(&self.instance, Some(&surface)), &self.engine_order);
        let (kind, adapter) = selection?;
        self.engine = Some(kind);
        let (device, queue) = engine::request_device(&adapter)?;

        let capabilities = surface.get_capabilities(&adapter);
        let format = capabilities
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| capabilities.formats.first().copied())
            .ok_or_else(|| SceneError::Surface("adapter cannot present to this window".into()))?;

        let max = device.limits().max_texture_dimension_2d;
        let PhysicalSize { width, height } = window.inner_size();
        let (width, height) = (width.clamp(1, max), height.clamp(1, max));
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = RenderEngine::new(
            Arc::new(device),
            Arc::new(queue),
            format,
            kind.sample_count(self.samples),
            width,
            height,
            &self.scene,
            &self.surface.viewports,
        )?;
        let cameras = CameraManager::new(
            viewport_cameras(&self.scene, &self.surface.viewports, width, height),
            self.surface.interaction,
        );

        log::info!(
            "Window '{}' ready at {}x{} ({:?}, {:?})",
            self.surface.title,
            width,
            height,
            kind,
            format
        );
        Ok(Gpu {
            window,
            surface,
            config,
            renderer,
            cameras,
        })
    }
}

impl Gpu {
    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        // surfaces larger than the device limit cannot be configured
        let max = self.renderer.device().limits().max_texture_dimension_2d;
        let (width, height) = (width.min(max), height.min(max));
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(self.renderer.device(), &self.config);
        self.renderer.resize(width, height);
        self.cameras.resize(&self.renderer.viewport_rects());
    }

    fn redraw(&mut self) -> crate::error::Result<()> {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(self.renderer.device(), &self.config);
                self.window.request_redraw();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Timed out waiting for the next frame");
                return Ok(());
            }
            Err(e) => return Err(SceneError::Surface(e.to_string())),
        };

        self.renderer
            .update(&self.cameras.cameras, &self.cameras.actor_rotations);
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.renderer.render(&view);
        self.window.pre_present_notify();
        frame.present();
        Ok(())
    }
}

impl ApplicationHandler for Session {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() || self.error.is_some() {
            return;
        }

        match self.start(event_loop) {
            Ok(gpu) => {
                if let Err(err) = self.state.advance(DisplayState::Interactive) {
                    self.fail(err);
                    event_loop.exit();
                    return;
                }
                gpu.window.request_redraw();
                self.gpu = Some(gpu);
            }
            Err(err) => {
                self.fail(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        let rects = gpu.renderer.viewport_rects();
        match gpu.cameras.process_event(&event, &rects) {
            Some(Gesture::Close) => {
                event_loop.exit();
                return;
            }
            Some(Gesture::Wireframe(on)) => {
                gpu.renderer.set_wireframe(on);
                gpu.window.request_redraw();
            }
            _ => {}
        }

        match event {
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                gpu.resize(width, height);
                gpu.window.request_redraw();
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = gpu.redraw() {
                    self.fail(err);
                    event_loop.exit();
                }
            }
            WindowEvent::CursorMoved { .. }
            | WindowEvent::MouseInput { .. }
            | WindowEvent::MouseWheel { .. }
            | WindowEvent::KeyboardInput { .. } => {
                gpu.window.request_redraw();
            }
            _ => (),
        }
    }
}
