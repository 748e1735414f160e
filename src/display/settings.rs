//! Output settings for offscreen renders.

use std::path::{Path, PathBuf};

use super::engine::{RenderEngineKind, DEFAULT_ENGINE_ORDER};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    #[default]
    Png,
    /// Binary PPM (P6)
    Ppm,
}

impl ImageFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(ImageFormat::Png),
            "ppm" => Some(ImageFormat::Ppm),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Ppm => "ppm",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub resolution_x: u32,
    pub resolution_y: u32,
    /// Scale applied to the resolution, in percent
    pub resolution_percentage: u32,
    pub output_path: PathBuf,
    pub format: ImageFormat,
    /// Requested MSAA samples; engines that cannot multisample render with one
    pub samples: u32,
    pub engine_order: Vec<RenderEngineKind>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            resolution_x: 1920,
            resolution_y: 1080,
            resolution_percentage: 100,
            output_path: PathBuf::from("render.png"),
            format: ImageFormat::Png,
            samples: 4,
            engine_order: DEFAULT_ENGINE_ORDER.to_vec(),
        }
    }
}

impl RenderSettings {
    pub fn with_resolution(mut self, x: u32, y: u32) -> Self {
        self.resolution_x = x;
        self.resolution_y = y;
        self
    }

    pub fn with_percentage(mut self, percentage: u32) -> Self {
        self.resolution_percentage = percentage;
        self
    }

    /// Sets the output path, taking the format from its extension when known
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        if let Some(format) = ImageFormat::from_path(&self.output_path) {
            self.format = format;
        }
        self
    }

    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_samples(mut self, samples: u32) -> Self {
        self.samples = samples;
        self
    }

    pub fn with_engine_order(mut self, order: Vec<RenderEngineKind>) -> Self {
        self.engine_order = order;
        self
    }

    /// Pixel size of the rendered image after scaling, never zero
    ///
    /// Sizes past `u32::MAX` saturate; the device limit check rejects them.
    pub fn output_size(&self) -> (u32, u32) {
        let scale = |v: u32| {
            let scaled = (v as u64 * self.resolution_percentage as u64 / 100).max(1);
            u32::try_from(scaled).unwrap_or(u32::MAX)
        };
        (scale(self.resolution_x), scale(self.resolution_y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_a_full_hd_png() {
        let settings = RenderSettings::default();
        assert_eq!(settings.output_size(), (1920, 1080));
        assert_eq!(settings.format, ImageFormat::Png);
        assert_eq!(settings.engine_order, DEFAULT_ENGINE_ORDER.to_vec());
    }

    #[test]
    fn percentage_scales_output() {
        let settings = RenderSettings::default().with_percentage(50);
        assert_eq!(settings.output_size(), (960, 540));

        let tiny = RenderSettings::default().with_resolution(1, 1).with_percentage(10);
        assert_eq!(tiny.output_size(), (1, 1));
    }

    #[test]
    fn output_size_saturates_instead_of_wrapping() {
        let huge = RenderSettings::default()
            .with_resolution(u32::MAX, 1080)
            .with_percentage(200);
        assert_eq!(huge.output_size(), (u32::MAX, 2160));

        let exact = RenderSettings::default()
            .with_resolution(u32::MAX, u32::MAX)
            .with_percentage(100);
        assert_eq!(exact.output_size(), (u32::MAX, u32::MAX));

        let ten_times = RenderSettings::default().with_percentage(1000);
        assert_eq!(ten_times.output_size(), (19200, 10800));

        let zero = RenderSettings::default().with_percentage(0);
        assert_eq!(zero.output_size(), (1, 1));
    }

    #[test]
    fn output_extension_picks_format() {
        let settings = RenderSettings::default().with_output("out/frame.PPM");
        assert_eq!(settings.format, ImageFormat::Ppm);

        let unknown = RenderSettings::default().with_output("frame.tiff");
        assert_eq!(unknown.format, ImageFormat::Png);
    }
}
