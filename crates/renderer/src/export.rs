//! Still-frame export through the CPU reference path.
//!
//! Export does not need an adapter: the scene's CPU implementation shades
//! the full pixel grid and the result goes straight to disk. Because the
//! GPU path is generated from the same constants, the written frame matches
//! what the swapchain would have shown.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use glam::Vec2;

use crate::runtime::ExportFormat;

/// Rasterizes one frame at the given timestamp and writes it to `path`.
pub fn export_still(
    path: &Path,
    format: ExportFormat,
    width: u32,
    height: u32,
    time: f32,
    pointer: Vec2,
) -> Result<PathBuf> {
    let ExportFormat::Png = format;
    let data = blobfield::raster::render_frame(width, height, time, pointer);
    let image: image::RgbaImage = image::ImageBuffer::from_raw(width, height, data)
        .ok_or_else(|| anyhow!("rendered buffer did not match {width}x{height}"))?;
    image
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("failed to write still frame to {}", path.display()))?;
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;

    #[test]
    fn exported_frame_round_trips_through_png() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("frame.png");

        let written = export_still(&path, ExportFormat::Png, 64, 36, 0.0, vec2(1.0, 1.0))
            .expect("export still frame");
        assert_eq!(written, path);

        let decoded = image::open(&path).expect("decode exported frame").to_rgba8();
        assert_eq!(decoded.dimensions(), (64, 36));
        let expected = blobfield::raster::render_frame(64, 36, 0.0, vec2(1.0, 1.0));
        assert_eq!(decoded.into_raw(), expected);
    }
}
