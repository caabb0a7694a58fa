use std::path::Path;

use crate::error::{RasterError, Result};
use crate::tables::RgbMap;

/// Largest supported texture side.
const MAX_TEXTURE_SIDE: u32 = 65536;

/// An 8-bit paletted texture with power-of-two sides.
///
/// Texels are palette indices in row-major order. Index 0 is the mask color
/// for the masked polygon types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Texture {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    u_mask: i64,
    v_mask: i64,
    v_shift: u32,
}

impl Texture {
    /// Wraps existing texel data.
    ///
    /// Both sides must be non-zero powers of two no larger than 65536 and
    /// `pixels.len()` must equal `width * height`.
    pub fn from_indices(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let valid = |side: u32| side.is_power_of_two() && side <= MAX_TEXTURE_SIDE;
        if !valid(width) || !valid(height) {
            return Err(RasterError::TextureSize { width, height });
        }

        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(RasterError::TextureLength {
                expected,
                actual: pixels.len(),
            });
        }

        let log2_width = width.trailing_zeros();
        Ok(Self {
            pixels,
            width,
            height,
            u_mask: width as i64 - 1,
            v_mask: (height as i64 - 1) << log2_width,
            v_shift: 16 - log2_width,
        })
    }

    /// Load a texture from an image file (PNG, JPG, etc.), mapping each pixel
    /// to the nearest palette index through `rgb_map`.
    pub fn from_file<P: AsRef<Path>>(path: P, rgb_map: &RgbMap) -> Result<Self> {
        let img = image::open(path)?.to_rgb8();
        let (width, height) = img.dimensions();

        let pixels = img
            .pixels()
            .map(|p| {
                let [r, g, b] = p.0;
                rgb_map.makecol(r as i32, g as i32, b as i32)
            })
            .collect();

        Self::from_indices(width, height, pixels)
    }

    /// Two-color checkerboard with `cell`-sized squares.
    pub fn checkerboard(size: u32, cell: u32, light: u8, dark: u8) -> Result<Self> {
        let cell = cell.max(1);
        let mut pixels = Vec::with_capacity(size as usize * size as usize);
        for y in 0..size {
            for x in 0..size {
                pixels.push(if ((x / cell) ^ (y / cell)) & 1 == 0 {
                    light
                } else {
                    dark
                });
            }
        }
        Self::from_indices(size, size, pixels)
    }

    /// Texel at integer coordinates, wrapping in both directions.
    #[inline]
    pub fn texel(&self, x: i32, y: i32) -> u8 {
        let x = x as i64 & self.u_mask;
        let y = y as i64 & (self.height as i64 - 1);
        self.pixels[(y * self.width as i64 + x) as usize]
    }

    /// Texel at 16.16 texture coordinates, wrapping in both directions.
    #[inline]
    pub(crate) fn sample(&self, u: i64, v: i64) -> u8 {
        let idx = ((v >> self.v_shift) & self.v_mask) + ((u >> 16) & self.u_mask);
        self.pixels[idx as usize]
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}
