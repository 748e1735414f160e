//! Viewports: rectangular regions of a display surface with their own
//! bindings, background, lights and camera.

use super::appearance::{Appearance, Color};
use super::camera::CameraPlacement;
use super::light::Light;
use super::GeometryId;

/// Region of the surface in unit coordinates, origin at the bottom-left
///
/// Stored exactly as given; nothing is clamped or reordered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportBounds {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

/// Pixel rectangle with a top-left origin, as render passes expect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x as f64
            && y >= self.y as f64
            && x < (self.x + self.width) as f64
            && y < (self.y + self.height) as f64
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn aspect(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }
}

impl ViewportBounds {
    pub const FULL: ViewportBounds = ViewportBounds::new(0.0, 0.0, 1.0, 1.0);

    pub const fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Cell of a `rows` x `cols` grid; row 0 is the top row
    pub fn grid_cell(rows: u32, cols: u32, row: u32, col: u32) -> Self {
        let (rows, cols) = (rows.max(1) as f32, cols.max(1) as f32);
        let (row, col) = (row as f32, col as f32);
        Self::new(
            col / cols,
            1.0 - (row + 1.0) / rows,
            (col + 1.0) / cols,
            1.0 - row / rows,
        )
    }

    /// Pixel rectangle on a `width` x `height` target, clipped to the target
    pub fn to_pixels(&self, width: u32, height: u32) -> PixelRect {
        let (w, h) = (width as f32, height as f32);
        let clip_x = |v: f32| (v * w).round().clamp(0.0, w) as u32;
        let clip_y = |v: f32| (v * h).round().clamp(0.0, h) as u32;

        let (left, right) = (clip_x(self.x0.min(self.x1)), clip_x(self.x0.max(self.x1)));
        let (bottom, top) = (clip_y(self.y0.min(self.y1)), clip_y(self.y0.max(self.y1)));

        PixelRect {
            x: left,
            y: height - top,
            width: right - left,
            height: top - bottom,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background {
    Solid(Color),
    /// Vertical gradient from `bottom` to `top`
    Gradient { bottom: Color, top: Color },
}

impl Background {
    pub fn bottom(&self) -> Color {
        match *self {
            Background::Solid(c) => c,
            Background::Gradient { bottom, .. } => bottom,
        }
    }

    pub fn top(&self) -> Color {
        match *self {
            Background::Solid(c) => c,
            Background::Gradient { top, .. } => top,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Viewport {
    pub bounds: ViewportBounds,
    pub background: Background,
    bindings: Vec<(GeometryId, Appearance)>,
    pub lights: Vec<Light>,
    pub camera: Option<CameraPlacement>,
    /// Text drawn centered along the top edge
    pub title: Option<String>,
    /// Orientation axes in the bottom-left corner
    pub show_axes: bool,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewport {
    /// Full-surface viewport with a black background
    pub fn new() -> Self {
        Self {
            bounds: ViewportBounds::FULL,
            background: Background::Solid(Color::BLACK),
            bindings: Vec::new(),
            lights: Vec::new(),
            camera: None,
            title: None,
            show_axes: false,
        }
    }

    pub fn with_bounds(mut self, x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        self.bounds = ViewportBounds::new(x0, y0, x1, y1);
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Background::Solid(color);
        self
    }

    pub fn with_gradient_background(mut self, bottom: Color, top: Color) -> Self {
        self.background = Background::Gradient { bottom, top };
        self
    }

    pub fn with_camera(mut self, camera: CameraPlacement) -> Self {
        self.camera = Some(camera);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        let title = title.into();
        self.title = (!title.trim().is_empty()).then_some(title);
        self
    }

    pub fn with_axes(mut self, show: bool) -> Self {
        self.show_axes = show;
        self
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    /// Binds `appearance` to `geometry` in this viewport
    ///
    /// A geometry has at most one appearance per viewport: binding again
    /// replaces the earlier appearance, which is returned.
    pub fn bind(&mut self, geometry: GeometryId, appearance: Appearance) -> Option<Appearance> {
        match self.bindings.iter_mut().find(|(id, _)| *id == geometry) {
            Some((_, existing)) => Some(std::mem::replace(existing, appearance)),
            None => {
                self.bindings.push((geometry, appearance));
                None
            }
        }
    }

    pub fn appearance_for(&self, geometry: GeometryId) -> Option<&Appearance> {
        self.bindings
            .iter()
            .find(|(id, _)| *id == geometry)
            .map(|(_, appearance)| appearance)
    }

    /// Bindings in the order their geometry was first bound
    pub fn bindings(&self) -> &[(GeometryId, Appearance)] {
        &self.bindings
    }
}
