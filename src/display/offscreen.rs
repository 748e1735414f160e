//! Offscreen rendering: draw into a texture, read it back, write an image.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Result, SceneError};
use crate::gfx::resources::TextureResource;
use crate::gfx::RenderEngine;

use super::settings::ImageFormat;

/// Tightly packed RGBA8 pixels, top row first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Image {
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        let p = self.pixels.get(i..i + 4)?;
        Some([p[0], p[1], p[2], p[3]])
    }

    fn rgb_bytes(&self) -> Vec<u8> {
        self.pixels
            .chunks_exact(4)
            .flat_map(|p| [p[0], p[1], p[2]])
            .collect()
    }

    pub fn save(&self, path: &Path, format: ImageFormat) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| SceneError::io(parent, e))?;
        }
        let file = File::create(path).map_err(|e| SceneError::io(path, e))?;
        let writer = BufWriter::new(file);
        match format {
            ImageFormat::Png => self.write_png(writer, path),
            ImageFormat::Ppm => self.write_ppm(writer, path),
        }?;
        log::info!(
            "Saved {}x{} {:?} image to {}",
            self.width,
            self.height,
            format,
            path.display()
        );
        Ok(())
    }

    fn write_png(&self, writer: impl Write, path: &Path) -> Result<()> {
        let image_error = |e: png::EncodingError| SceneError::Image {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };

        let mut encoder = png::Encoder::new(writer, self.width, self.height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header().map_err(image_error)?;
        writer
            .write_image_data(&self.rgb_bytes())
            .map_err(image_error)?;
        writer.finish().map_err(image_error)
    }

    fn write_ppm(&self, mut writer: impl Write, path: &Path) -> Result<()> {
        write!(writer, "P6\n{} {}\n255\n", self.width, self.height)
            .and_then(|_| writer.write_all(&self.rgb_bytes()))
            .and_then(|_| writer.flush())
            .map_err(|e| SceneError::io(path, e))
    }
}

/// Align a row size to wgpu's copy row alignment, `None` on overflow
fn align_bytes_per_row(value: u32) -> Option<u32> {
    value.checked_next_multiple_of(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT)
}

/// Rejects render targets the device cannot allocate
pub fn check_target_size(width: u32, height: u32, limits: &wgpu::Limits) -> Result<()> {
    let max = limits.max_texture_dimension_2d;
    if width > max || height > max {
        return Err(SceneError::OutputTooLarge { width, height, max });
    }
    Ok(())
}

/// Copies an RGBA8 texture into CPU memory, dropping the row padding
pub fn read_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    texture: &wgpu::Texture,
    width: u32,
    height: u32,
) -> Result<Image> {
    let padded_bpr = width
        .checked_mul(4)
        .and_then(align_bytes_per_row)
        .ok_or_else(|| SceneError::Readback(format!("row of {width} pixels is too wide")))?;
    let tight_bpr = width * 4;

    let staging = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Readback Staging Buffer"),
        size: padded_bpr as u64 * height as u64,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("Readback Encoder"),
    });
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &staging,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(padded_bpr),
                rows_per_image: Some(height),
            },
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
    queue.submit(std::iter::once(encoder.finish()));

    let slice = staging.slice(..);
    let (tx, rx) = futures::channel::oneshot::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = tx.send(result);
    });
    device
        .poll(wgpu::PollType::Wait)
        .map_err(|e| SceneError::Readback(e.to_string()))?;

    match futures::executor::block_on(rx) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => return Err(SceneError::Readback(e.to_string())),
        Err(_) => {
            return Err(SceneError::Readback(
                "map_async callback was dropped".to_string(),
            ))
        }
    }

    let data = slice.get_mapped_range();
    let mut pixels = Vec::with_capacity(tight_bpr as usize * height as usize);
    for row in data.chunks_exact(padded_bpr as usize) {
        pixels.extend_from_slice(&row[..tight_bpr as usize]);
    }
    drop(data);
    staging.unmap();

    Ok(Image {
        width,
        height,
        pixels,
    })
}

/// Renders one frame of `engine` into a fresh texture and reads it back
pub fn render_image(engine: &mut RenderEngine) -> Result<Image> {
    let (width, height) = engine.size();
    let target =
        TextureResource::create_offscreen_target(engine.device(), width, height, "Offscreen Target");
    engine.render(&target.view);
    read_texture(engine.device(), engine.queue(), &target.texture, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> Image {
        Image {
            width: 2,
            height: 2,
            pixels: vec![
                255, 0, 0, 255, 0, 255, 0, 255, //
                0, 0, 255, 255, 255, 255, 255, 255,
            ],
        }
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("tableau-{}-{name}", std::process::id()))
    }

    #[test]
    fn pixel_lookup_is_row_major() {
        let image = checker();
        assert_eq!(image.pixel(1, 0), Some([0, 255, 0, 255]));
        assert_eq!(image.pixel(0, 1), Some([0, 0, 255, 255]));
        assert_eq!(image.pixel(2, 0), None);
    }

    #[test]
    fn rows_are_aligned_for_copies() {
        assert_eq!(align_bytes_per_row(4), Some(256));
        assert_eq!(align_bytes_per_row(256), Some(256));
        assert_eq!(align_bytes_per_row(900 * 4), Some(3840));
        // near the top of the range the padding itself would overflow
        assert_eq!(align_bytes_per_row(u32::MAX - 3), None);
        assert_eq!(align_bytes_per_row(u32::MAX - 255), Some(u32::MAX - 255));
    }

    #[test]
    fn oversized_targets_are_rejected() {
        let limits = wgpu::Limits {
            max_texture_dimension_2d: 16384,
            ..wgpu::Limits::downlevel_defaults()
        };
        assert!(check_target_size(16384, 16384, &limits).is_ok());
        assert!(matches!(
            check_target_size(19200, 10800, &limits),
            Err(SceneError::OutputTooLarge {
                width: 19200,
                height: 10800,
                max: 16384
            })
        ));
        assert!(check_target_size(64, u32::MAX, &limits).is_err());
    }

    #[test]
    fn ppm_has_header_and_rgb_payload() {
        let path = temp_path("checker.ppm");
        checker().save(&path, ImageFormat::Ppm).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let header = b"P6\n2 2\n255\n";
        assert!(bytes.starts_with(header));
        assert_eq!(bytes.len(), header.len() + 2 * 2 * 3);
        assert_eq!(&bytes[header.len()..header.len() + 3], &[255, 0, 0]);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn png_starts_with_signature() {
        let path = temp_path("checker.png");
        checker().save(&path, ImageFormat::Png).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
        std::fs::remove_file(path).ok();
    }
}
