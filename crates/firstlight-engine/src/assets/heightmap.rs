use std::path::Path;

use image::{DynamicImage, GrayImage};

/// Edge length of every heightmap, in pixels.
pub const HEIGHTMAP_SIZE: u32 = 128;

const CELLS: usize = (HEIGHTMAP_SIZE * HEIGHTMAP_SIZE) as usize;

/// Errors produced while loading a heightmap.
#[derive(Debug, thiserror::Error)]
pub enum HeightmapError {
    #[error("height map size mismatch: expected {expected}x{expected}, got {width}x{height}")]
    SizeMismatch {
        expected: u32,
        width: u32,
        height: u32,
    },

    #[error("failed to read height map {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode height map: {0}")]
    Decode(#[from] image::ImageError),
}

/// Fixed 128x128 grid of normalized heights in `[0, 1]`.
///
/// Immutable once loaded. Cell `(x, y)` comes from source pixel
/// `data[y * 128 + x]`, i.e. `x` runs along a row.
#[derive(Debug, Clone, PartialEq)]
pub struct Heightmap {
    cells: Box<[f32]>,
}

impl Heightmap {
    /// Reads and decodes the image at `path`.
    ///
    /// Color images are reduced to luma before normalization.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, HeightmapError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| HeightmapError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let image = image::load_from_memory(&bytes)?;
        let map = Self::from_image(image)?;

        log::debug!(
            "loaded {}x{} height map {} (range {:.3}..={:.3})",
            map.width(),
            map.height(),
            path.display(),
            map.min(),
            map.max()
        );
        Ok(map)
    }

    /// Builds a heightmap from an already decoded image of any color type.
    pub fn from_image(image: DynamicImage) -> Result<Self, HeightmapError> {
        Self::from_luma(image.into_luma8())
    }

    /// Builds a heightmap from an 8-bit grayscale image.
    ///
    /// Size is checked before any cell is produced, so a mismatch never yields
    /// a partial grid.
    pub fn from_luma(image: GrayImage) -> Result<Self, HeightmapError> {
        let (width, height) = image.dimensions();
        if width != HEIGHTMAP_SIZE || height != HEIGHTMAP_SIZE {
            return Err(HeightmapError::SizeMismatch {
                expected: HEIGHTMAP_SIZE,
                width,
                height,
            });
        }

        let cells: Box<[f32]> = image
            .as_raw()
            .iter()
            .map(|&v| v as f32 / 255.0)
            .collect();
        debug_assert_eq!(cells.len(), CELLS);

        Ok(Self { cells })
    }

    #[inline]
    pub const fn width(&self) -> u32 {
        HEIGHTMAP_SIZE
    }

    #[inline]
    pub const fn height(&self) -> u32 {
        HEIGHTMAP_SIZE
    }

    /// Height at column `x`, row `y`.
    ///
    /// Panics if either coordinate is outside `0..128`.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        let n = HEIGHTMAP_SIZE as usize;
        assert!(x < n && y < n, "height map index ({x}, {y}) out of range");
        self.cells[y * n + x]
    }

    /// Row-major cell values.
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.cells
    }

    pub fn min(&self) -> f32 {
        self.cells.iter().copied().fold(f32::INFINITY, f32::min)
    }

    pub fn max(&self) -> f32 {
        self.cells.iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }
}
