//! Wall texture loading.
//!
//! Textures are numbered `wall1.png`, `wall2.png`, ... in the resource
//! directory and resampled once at load time to `RESOLUTION_Y` square, so the
//! wall drawer can index texels without scaling math on the hot path.

use std::path::Path;

use image::imageops::FilterType;
use image::RgbImage;
use tracing::debug;

use crate::core::error::{EngineError, Result};

/// The loaded wall texture images, indexed by wall cell code.
pub struct TextureSet {
    // images[0] holds texture id 1.
    images: Vec<RgbImage>,
    size: u32,
}

impl TextureSet {
    /// Loads `count` textures from `dir`, resampled to `resolution_y` square.
    pub fn load(dir: &Path, count: i32, resolution_y: i32) -> Result<TextureSet> {
        let size = resolution_y as u32;
        let mut images = Vec::with_capacity(count.max(0) as usize);
        for number in 1..=count {
            let path = dir.join(format!("wall{number}.png"));
            let image = image::open(&path).map_err(|err| EngineError::ResourceLoad {
                path: path.display().to_string(),
                reason: err.to_string(),
            })?;
            images.push(image::imageops::resize(
                &image.to_rgb8(),
                size,
                size,
                FilterType::Triangle,
            ));
            debug!(path = %path.display(), "loaded wall texture");
        }
        Ok(TextureSet { images, size })
    }

    /// A set with no textures at all; walls render as flat shaded fills.
    pub fn empty() -> TextureSet {
        TextureSet {
            images: Vec::new(),
            size: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Number of loaded textures; valid ids are `1..=count`.
    pub fn count(&self) -> i32 {
        self.images.len() as i32
    }

    /// Texture width in texels. All textures share it.
    pub fn width(&self) -> i32 {
        self.size as i32
    }

    /// Texel lookup by texture id (1-based), column and row.
    pub fn texel(&self, texture_id: i32, column: i32, row: i32) -> [u8; 3] {
        let image = &self.images[(texture_id - 1) as usize];
        image.get_pixel(column as u32, row as u32).0
    }
}
