//! # Display Driver
//!
//! Takes a composed [`Scene`] and its viewports, wraps them in a
//! [`DisplaySurface`] and either runs a blocking interactive session or
//! renders a single image offscreen.
//!
//! The driver follows a one-way state machine:
//!
//! ```text
//! Uninitialized -> Composed -> Rendering -> Interactive -> Terminated
//!                                        \-------------> Terminated
//! ```
//!
//! A failed render-engine selection ends in `Terminated` with
//! [`SceneError::NoRenderEngine`].

pub mod engine;
pub mod offscreen;
pub mod settings;

use std::sync::Arc;

use crate::error::{Result, SceneError};
use crate::gfx::camera::OrbitCamera;
use crate::gfx::geometry::Aabb;
use crate::gfx::resources::TextureResource;
use crate::gfx::RenderEngine;
use crate::scene::{Scene, Viewport};

pub use crate::gfx::camera::InteractionStyle;
pub use engine::{EngineAvailability, EngineProbe, RenderEngineKind, DEFAULT_ENGINE_ORDER};
pub use offscreen::Image;
pub use settings::{ImageFormat, RenderSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState {
    Uninitialized,
    Composed,
    Rendering,
    Interactive,
    Terminated,
}

impl DisplayState {
    pub fn can_transition_to(self, next: DisplayState) -> bool {
        use DisplayState::*;
        matches!(
            (self, next),
            (Uninitialized, Composed)
                | (Composed, Rendering)
                | (Rendering, Interactive)
                | (Rendering, Terminated)
                | (Interactive, Terminated)
        )
    }

    /// Moves to `next`, or fails without changing state
    pub fn advance(&mut self, next: DisplayState) -> Result<()> {
        if !self.can_transition_to(next) {
            return Err(SceneError::InvalidTransition {
                from: *self,
                to: next,
            });
        }
        log::debug!("Display state {:?} -> {:?}", self, next);
        *self = next;
        Ok(())
    }
}

/// Window (or image) the viewports are drawn on
#[derive(Debug, Clone)]
pub struct DisplaySurface {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub viewports: Vec<Viewport>,
    pub interaction: InteractionStyle,
}

impl DisplaySurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            title: "tableau".to_string(),
            viewports: Vec::new(),
            interaction: InteractionStyle::default(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_interaction(mut self, interaction: InteractionStyle) -> Self {
        self.interaction = interaction;
        self
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewports.push(viewport);
        self
    }

    pub fn add_viewport(&mut self, viewport: Viewport) {
        self.viewports.push(viewport);
    }
}

/// Initial camera of every viewport for a `width` x `height` target
///
/// Explicit placements are honored; other viewports frame the union of
/// their bound geometry.
pub fn viewport_cameras(
    scene: &Scene,
    viewports: &[Viewport],
    width: u32,
    height: u32,
) -> Vec<OrbitCamera> {
    viewports
        .iter()
        .map(|viewport| {
            let aspect = viewport.bounds.to_pixels(width, height).aspect();
            match &viewport.camera {
                Some(placement) => OrbitCamera::from_placement(placement, aspect),
                None => {
                    let bounds = viewport
                        .bindings()
                        .iter()
                        .filter_map(|(id, _)| scene.geometry(*id)?.bounds())
                        .reduce(|a: Aabb, b| a.union(&b));
                    OrbitCamera::framing(bounds, aspect)
                }
            }
        })
        .collect()
}

pub struct DisplayDriver {
    settings: RenderSettings,
    state: DisplayState,
    scene: Option<Scene>,
    surface: Option<DisplaySurface>,
    engine: Option<RenderEngineKind>,
}

impl DisplayDriver {
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            state: DisplayState::Uninitialized,
            scene: None,
            surface: None,
            engine: None,
        }
    }

    pub fn state(&self) -> DisplayState {
        self.state
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn surface(&self) -> Option<&DisplaySurface> {
        self.surface.as_ref()
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    /// Engine picked by the last render, if any
    pub fn selected_engine(&self) -> Option<RenderEngineKind> {
        self.engine
    }

    /// Takes ownership of the scene and surface
    ///
    /// Every geometry handle bound in a viewport must exist in `scene`.
    pub fn compose(&mut self, scene: Scene, surface: DisplaySurface) -> Result<()> {
        if !self.state.can_transition_to(DisplayState::Composed) {
            return Err(SceneError::InvalidTransition {
                from: self.state,
                to: DisplayState::Composed,
            });
        }

        for (index, viewport) in surface.viewports.iter().enumerate() {
            if let Some((geometry, _)) = viewport
                .bindings()
                .iter()
                .find(|(id, _)| !scene.contains(*id))
            {
                return Err(SceneError::UnknownGeometry {
                    viewport: index,
                    geometry: *geometry,
                });
            }
        }

        log::info!(
            "Composed '{}' ({}x{}): {} geometries, {} viewport(s)",
            surface.title,
            surface.width,
            surface.height,
            scene.len(),
            surface.viewports.len()
        );
        self.scene = Some(scene);
        self.surface = Some(surface);
        self.state.advance(DisplayState::Composed)
    }

    fn composition(&self) -> Result<(&Scene, &DisplaySurface)> {
        match (&self.scene, &self.surface) {
            (Some(scene), Some(surface)) => Ok((scene, surface)),
            _ => Err(SceneError::InvalidTransition {
                from: self.state,
                to: DisplayState::Rendering,
            }),
        }
    }

    /// Runs engine selection against the configured order and records the winner
    ///
    /// Exhausting the order terminates the driver.
    fn choose_engine<P: engine::EngineProbe>(
        &mut self,
        probe: &P,
    ) -> Result<(RenderEngineKind, P::Handle)> {
        match engine::select_engine(probe, &self.settings.engine_order) {
            Ok((kind, handle)) => {
                self.engine = Some(kind);
                Ok((kind, handle))
            }
            Err(err) => {
                log::error!("{err}");
                self.state.advance(DisplayState::Terminated)?;
                Err(err)
            }
        }
    }

    /// Opens a window and blocks until it is closed
    pub fn show(&mut self) -> Result<()> {
        self.composition()?;
        self.state.advance(DisplayState::Rendering)?;

        let (Some(scene), Some(surface)) = (self.scene.take(), self.surface.take()) else {
            return Err(SceneError::InvalidTransition {
                from: self.state,
                to: DisplayState::Interactive,
            });
        };

        let outcome = crate::app::run_interactive(scene, surface, &self.settings);
        self.engine = outcome.engine.or(self.engine);
        self.scene = Some(outcome.scene);
        self.surface = Some(outcome.surface);

        if outcome.state == DisplayState::Interactive {
            self.state.advance(DisplayState::Interactive)?;
        }
        self.state.advance(DisplayState::Terminated)?;

        match outcome.error {
            Some(err) => Err(err),
            None => {
                log::info!("Interactive session closed");
                Ok(())
            }
        }
    }

    /// Renders the composition offscreen and writes it to the configured output
    pub fn render_to_file(&mut self) -> Result<Image> {
        self.composition()?;
        self.state.advance(DisplayState::Rendering)?;

        let instance = engine::create_instance();
        let (kind, adapter) = self.choose_engine(&engine::AdapterProbe::new(&instance, None))?;

        let result = self.render_with(kind, &adapter);
        self.state.advance(DisplayState::Terminated)?;
        result
    }

    fn render_with(&self, kind: RenderEngineKind, adapter: &wgpu::Adapter) -> Result<Image> {
        let (scene, surface) = self.composition()?;
        let (device, queue) = engine::request_device(adapter)?;
        let (width, height) = self.settings.output_size();
        offscreen::check_target_size(width, height, &device.limits())?;

        let mut renderer = RenderEngine::new(
            Arc::new(device),
            Arc::new(queue),
            TextureResource::OFFSCREEN_FORMAT,
            kind.sample_count(self.settings.samples),
            width,
            height,
            scene,
            &surface.viewports,
        )?;
        let cameras = viewport_cameras(scene, &surface.viewports, width, height);
        renderer.update(&cameras, &[]);

        let image = offscreen::render_image(&mut renderer)?;
        image.save(&self.settings.output_path, self.settings.format)?;
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Appearance, CameraPlacement, Color, GeometryDescriptor, GeometryId};

    fn sphere_scene() -> (Scene, DisplaySurface) {
        let mut scene = Scene::new();
        let sphere = scene.add_geometry(GeometryDescriptor::sphere(1.0).with_resolution(40, 40));

        let mut viewport = Viewport::new().with_background(Color::rgb(0.1, 0.1, 0.1));
        viewport.bind(sphere, Appearance::new(Color::WHITE));

        let surface = DisplaySurface::new(900, 700)
            .with_title("Sphere")
            .with_viewport(viewport);
        (scene, surface)
    }

    #[test]
    fn sphere_scenario_composes_one_viewport() {
        let (scene, surface) = sphere_scene();
        let mut driver = DisplayDriver::new(RenderSettings::default());
        assert_eq!(driver.state(), DisplayState::Uninitialized);

        driver.compose(scene, surface).unwrap();
        assert_eq!(driver.state(), DisplayState::Composed);

        let surface = driver.surface().unwrap();
        assert_eq!((surface.width, surface.height), (900, 700));
        assert_eq!(surface.viewports.len(), 1);
        assert_eq!(surface.viewports[0].bindings().len(), 1);
    }

    #[test]
    fn compose_twice_is_rejected() {
        let (scene, surface) = sphere_scene();
        let mut driver = DisplayDriver::new(RenderSettings::default());
        driver.compose(scene, surface).unwrap();

        let (scene, surface) = sphere_scene();
        let err = driver.compose(scene, surface).unwrap_err();
        assert!(matches!(
            err,
            SceneError::InvalidTransition {
                from: DisplayState::Composed,
                to: DisplayState::Composed
            }
        ));
    }

    #[test]
    fn unknown_geometry_fails_composition() {
        let scene = Scene::new();
        let mut viewport = Viewport::new();
        viewport.bind(GeometryId(3), Appearance::default());
        let surface = DisplaySurface::new(100, 100).with_viewport(viewport);

        let mut driver = DisplayDriver::new(RenderSettings::default());
        let err = driver.compose(scene, surface).unwrap_err();
        assert!(matches!(err, SceneError::UnknownGeometry { viewport: 0, .. }));
        assert_eq!(driver.state(), DisplayState::Uninitialized);
    }

    #[test]
    fn rendering_requires_composition() {
        let mut driver = DisplayDriver::new(RenderSettings::default());
        assert!(driver.render_to_file().is_err());
        assert_eq!(driver.state(), DisplayState::Uninitialized);
    }

    #[test]
    fn exhausted_engines_terminate_the_driver() {
        let (scene, surface) = sphere_scene();
        let mut driver = DisplayDriver::new(RenderSettings::default());
        driver.compose(scene, surface).unwrap();
        driver.state.advance(DisplayState::Rendering).unwrap();

        let none = EngineAvailability {
            high_performance: false,
            low_power: false,
            software: false,
        };
        let err = driver.choose_engine(&none).unwrap_err();
        assert!(matches!(err, SceneError::NoRenderEngine { .. }));
        assert_eq!(driver.state(), DisplayState::Terminated);
        assert_eq!(driver.selected_engine(), None);
    }

    #[test]
    fn fallback_engine_is_recorded() {
        let (scene, surface) = sphere_scene();
        let mut driver = DisplayDriver::new(RenderSettings::default());
        driver.compose(scene, surface).unwrap();
        driver.state.advance(DisplayState::Rendering).unwrap();

        let software_only = EngineAvailability {
            high_performance: false,
            low_power: false,
            software: true,
        };
        let (kind, ()) = driver.choose_engine(&software_only).unwrap();
        assert_eq!(kind, RenderEngineKind::Software);
        assert_eq!(driver.selected_engine(), Some(RenderEngineKind::Software));
        assert_eq!(driver.state(), DisplayState::Rendering);
    }

    fn temp_output(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("tableau-{}-{name}", std::process::id()))
    }

    #[test]
    fn oversized_render_fails_with_an_error() {
        let (scene, surface) = sphere_scene();
        let settings = RenderSettings::default()
            .with_resolution(100_000, 64)
            .with_output(temp_output("oversized.png"));
        let mut driver = DisplayDriver::new(settings);
        driver.compose(scene, surface).unwrap();

        match driver.render_to_file() {
            // machine without any adapter
            Err(SceneError::NoRenderEngine { .. }) => {}
            Err(SceneError::OutputTooLarge { width, max, .. }) => {
                assert_eq!(width, 100_000);
                assert!(max < width);
            }
            other => panic!("expected a size error, got {:?}", other.map(|i| (i.width, i.height))),
        }
        assert_eq!(driver.state(), DisplayState::Terminated);
    }

    #[test]
    fn translucent_surface_blends_over_background() {
        let mut scene = Scene::new();
        let plane = scene.add_geometry(GeometryDescriptor::plane(2.0, 2.0));

        let mut viewport = Viewport::new().with_background(Color::rgb(0.0, 0.0, 1.0));
        viewport.bind(plane, Appearance::new(Color::RED).with_opacity(0.5));
        let surface = DisplaySurface::new(64, 64).with_viewport(viewport);

        let path = temp_output("translucent.png");
        let settings = RenderSettings::default()
            .with_resolution(64, 64)
            .with_output(&path);
        let mut driver = DisplayDriver::new(settings);
        driver.compose(scene, surface).unwrap();

        let image = match driver.render_to_file() {
            Ok(image) => image,
            Err(SceneError::NoRenderEngine { .. }) => return,
            Err(err) => panic!("offscreen render failed: {err}"),
        };
        std::fs::remove_file(&path).ok();

        let corner = image.pixel(0, 0).unwrap();
        assert_eq!(&corner[..3], &[0, 0, 255]);

        let center = image.pixel(32, 32).unwrap();
        assert!(center[0] > 40, "surface color missing: {center:?}");
        assert!(
            (120..=230).contains(&center[2]),
            "background not blended through: {center:?}"
        );
        assert_eq!(driver.state(), DisplayState::Terminated);
    }

    #[test]
    fn axes_and_title_are_drawn_over_the_background() {
        let viewport = Viewport::new()
            .with_background(Color::BLACK)
            .with_title("Orientation")
            .with_axes(true);
        let surface = DisplaySurface::new(200, 200).with_viewport(viewport);

        let path = temp_output("axes.png");
        let settings = RenderSettings::default()
            .with_resolution(200, 200)
            .with_output(&path);
        let mut driver = DisplayDriver::new(settings);
        driver.compose(Scene::new(), surface).unwrap();

        let image = match driver.render_to_file() {
            Ok(image) => image,
            Err(SceneError::NoRenderEngine { .. }) => return,
            Err(err) => panic!("offscreen render failed: {err}"),
        };
        std::fs::remove_file(&path).ok();

        let lit = |xs: std::ops::Range<u32>, ys: std::ops::Range<u32>| {
            ys.flat_map(|y| xs.clone().map(move |x| (x, y)))
                .filter_map(|(x, y)| image.pixel(x, y))
                .any(|p| p[..3] != [0, 0, 0])
        };
        // the triad square is 40px wide, 8px in from the bottom-left corner
        assert!(lit(8..48, 152..192), "no axes in the corner");
        assert!(lit(60..140, 0..40), "no title along the top edge");
        assert!(!lit(150..200, 60..140), "stray pixels on the background");
    }

    #[test]
    fn state_machine_allows_only_forward_edges() {
        use DisplayState::*;
        let all = [Uninitialized, Composed, Rendering, Interactive, Terminated];
        let allowed = [
            (Uninitialized, Composed),
            (Composed, Rendering),
            (Rendering, Interactive),
            (Rendering, Terminated),
            (Interactive, Terminated),
        ];
        for from in all {
            for to in all {
                assert_eq!(
                    from.can_transition_to(to),
                    allowed.contains(&(from, to)),
                    "{from:?} -> {to:?}"
                );
            }
        }

        let mut state = Terminated;
        assert!(state.advance(Composed).is_err());
        assert_eq!(state, Terminated);
    }

    #[test]
    fn cameras_follow_placement_or_bounds() {
        let (scene, mut surface) = sphere_scene();
        surface.add_viewport(
            Viewport::new().with_camera(CameraPlacement::looking_at([0.0, -10.0, 0.0], [0.0; 3])),
        );

        let cameras = viewport_cameras(&scene, &surface.viewports, 900, 700);
        assert_eq!(cameras.len(), 2);
        // framed camera keeps the unit sphere fully in front
        assert!(cameras[0].distance > 1.0);
        assert!((cameras[1].distance - 10.0).abs() < 1e-4);
    }
}
