//! Text overlay for viewport titles and axis letters
//!
//! Text is laid out with imgui's foreground draw list and rendered by
//! `imgui-wgpu` in a pass that loads the finished scene. The overlay takes no
//! input, so no platform backend is attached; display size and time step
//! are fed in by hand every frame.

use std::time::Instant;

use imgui::{FontConfig, FontSource, SuspendedContext};
use imgui_wgpu::{Renderer, RendererConfig};

use crate::scene::{Color, PixelRect};

pub const FONT_SIZE: f32 = 20.0;
/// Gap between a title and the top edge of its viewport, in pixels
pub const TITLE_MARGIN: f32 = 6.0;

/// How a label's text box is placed relative to its position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Position is the middle of the top edge
    TopCenter,
    Center,
}

impl Anchor {
    /// Top-left corner of a text box of `size` anchored at `position`
    pub fn place(self, position: [f32; 2], size: [f32; 2]) -> [f32; 2] {
        match self {
            Anchor::TopCenter => [position[0] - size[0] * 0.5, position[1]],
            Anchor::Center => [position[0] - size[0] * 0.5, position[1] - size[1] * 0.5],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    /// Pixel position, top-left origin
    pub position: [f32; 2],
    pub anchor: Anchor,
    pub color: [f32; 4],
}

impl Label {
    /// Title centered along the top edge of `rect`, readable on `background`
    pub fn title(text: &str, rect: PixelRect, background: Color) -> Self {
        Self {
            text: text.to_owned(),
            position: [
                rect.x as f32 + rect.width as f32 * 0.5,
                rect.y as f32 + TITLE_MARGIN,
            ],
            anchor: Anchor::TopCenter,
            color: contrasting_text(background),
        }
    }
}

/// Black text on light backgrounds, white text on dark ones
pub fn contrasting_text(background: Color) -> [f32; 4] {
    let luminance = 0.2126 * background.r + 0.7152 * background.g + 0.0722 * background.b;
    if luminance > 0.5 {
        [0.0, 0.0, 0.0, 1.0]
    } else {
        [1.0, 1.0, 1.0, 1.0]
    }
}

pub struct TextOverlay {
    /// Dear ImGui allows one active context per process, so ours is only
    /// activated while a frame is being built
    context: Option<SuspendedContext>,
    renderer: Renderer,
    last_frame: Instant,
}

impl TextOverlay {
    /// Returns `None` when another imgui context is active in this process
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, format: wgpu::TextureFormat) -> Option<Self> {
        let mut context = match SuspendedContext::create().activate() {
            Ok(context) => context,
            Err(_) => {
                log::warn!("Another text overlay is active, titles and axis letters are disabled");
                return None;
            }
        };
        context.set_ini_filename(None);
        context.fonts().add_font(&[FontSource::DefaultFontData {
            config: Some(FontConfig {
                oversample_h: 1,
                pixel_snap_h: true,
                size_pixels: FONT_SIZE,
                ..Default::default()
            }),
        }]);

        // the shader writes linear color; sRGB targets encode it on store
        let base = if format.is_srgb() {
            RendererConfig::new()
        } else {
            RendererConfig::new_srgb()
        };
        let renderer = Renderer::new(
            &mut context,
            device,
            queue,
            RendererConfig {
                texture_format: format,
                ..base
            },
        );

        Some(Self {
            context: Some(context.suspend()),
            renderer,
            last_frame: Instant::now(),
        })
    }

    /// Draws `labels` over the contents of `target`
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        (width, height): (u32, u32),
        labels: &[Label],
    ) {
        if labels.is_empty() || width == 0 || height == 0 {
            return;
        }
        let Some(suspended) = self.context.take() else {
            return;
        };
        let mut context = match suspended.activate() {
            Ok(context) => context,
            Err(suspended) => {
                log::warn!("Another text overlay is drawing, skipping labels this frame");
                self.context = Some(suspended);
                return;
            }
        };

        let now = Instant::now();
        {
            let io = context.io_mut();
            io.display_size = [width as f32, height as f32];
            io.display_framebuffer_scale = [1.0, 1.0];
            io.delta_time = (now - self.last_frame).as_secs_f32().max(1e-4);
        }
        self.last_frame = now;

        let ui = context.new_frame();
        {
            let draw_list = ui.get_foreground_draw_list();
            for label in labels {
                let size = ui.calc_text_size(&label.text);
                draw_list.add_text(label.anchor.place(label.position, size), label.color, &label.text);
            }
        }
        let draw_data = context.render();

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Text Overlay Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Err(err) = self.renderer.render(draw_data, queue, device, &mut render_pass) {
                log::warn!("Failed to draw text overlay: {err:?}");
            }
        }

        self.context = Some(context.suspend());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_hang_from_the_top_center_of_their_viewport() {
        let rect = PixelRect {
            x: 400,
            y: 0,
            width: 400,
            height: 300,
        };
        let label = Label::title("Contours", rect, Color::BLACK);
        assert_eq!(label.position, [600.0, TITLE_MARGIN]);
        assert_eq!(label.anchor, Anchor::TopCenter);
        assert_eq!(label.color, [1.0, 1.0, 1.0, 1.0]);

        let placed = label.anchor.place(label.position, [80.0, 20.0]);
        assert_eq!(placed, [560.0, TITLE_MARGIN]);
    }

    #[test]
    fn centered_labels_straddle_their_position() {
        assert_eq!(Anchor::Center.place([50.0, 50.0], [10.0, 20.0]), [45.0, 40.0]);
    }

    #[test]
    fn text_contrasts_with_the_background() {
        assert_eq!(contrasting_text(Color::WHITE), [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(contrasting_text(Color::LIGHT_BLUE), [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(contrasting_text(Color::DARK_BLUE), [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(contrasting_text(Color::rgb(0.1, 0.1, 0.1)), [1.0, 1.0, 1.0, 1.0]);
    }
}
