//! 8-bit paletted destination bitmap.
//!
//! Owns a row-major buffer of palette indices plus the clip rectangle every
//! drawing routine honours. The rasterizer only ever touches the bitmap
//! through [`Bitmap::row_mut`], [`Bitmap::hline`] and the effective clip
//! bounds, so all writes stay inside the buffer.

use std::path::Path;

use crate::error::Result;
use crate::palette::Palette;
use crate::tables::ColorMap;

/// Clip bounds, inclusive on the left/top and exclusive on the right/bottom.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClipRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl ClipRect {
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }
}

pub struct Bitmap {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    clip: bool,
    clip_rect: ClipRect,
}

impl Bitmap {
    /// Creates a bitmap filled with index 0, clipping to its full area.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![0; width as usize * height as usize],
            width,
            height,
            clip: true,
            clip_rect: ClipRect {
                left: 0,
                top: 0,
                right: width as i32,
                bottom: height as i32,
            },
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Sets the clip rectangle from two inclusive corners, clamped to the
    /// bitmap.
    pub fn set_clip_rect(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        let w = self.width as i32;
        let h = self.height as i32;
        self.clip_rect = ClipRect {
            left: x1.min(w - 1).max(0),
            top: y1.min(h - 1).max(0),
            right: x2.saturating_add(1).min(w).max(0),
            bottom: y2.saturating_add(1).min(h).max(0),
        };
    }

    /// Stored clip rectangle, regardless of whether clipping is enabled.
    pub fn clip_rect(&self) -> ClipRect {
        self.clip_rect
    }

    pub fn set_clipping(&mut self, enabled: bool) {
        self.clip = enabled;
    }

    pub fn is_clipping(&self) -> bool {
        self.clip
    }

    /// Bounds drawing is actually limited to.
    ///
    /// With clipping disabled this is the whole bitmap: nothing is ever
    /// written outside the buffer.
    #[inline]
    pub(crate) fn clip_bounds(&self) -> ClipRect {
        if self.clip {
            self.clip_rect
        } else {
            ClipRect {
                left: 0,
                top: 0,
                right: self.width as i32,
                bottom: self.height as i32,
            }
        }
    }

    /// Pixels of row `y`. Panics if `y` is out of range.
    #[inline]
    pub fn row(&self, y: usize) -> &[u8] {
        let w = self.width as usize;
        &self.pixels[y * w..(y + 1) * w]
    }

    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let w = self.width as usize;
        &mut self.pixels[y * w..(y + 1) * w]
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn clear(&mut self, color: u8) {
        self.pixels.fill(color);
    }

    /// Clips `x1..=x2` on row `y`, returning the surviving range.
    #[inline]
    fn clip_span(&self, x1: i32, y: i32, x2: i32) -> Option<(usize, usize, usize)> {
        let clip = self.clip_bounds();
        if y < clip.top || y >= clip.bottom {
            return None;
        }
        let x1 = x1.max(clip.left);
        let x2 = x2.min(clip.right - 1);
        if x1 > x2 {
            return None;
        }
        Some((x1 as usize, y as usize, x2 as usize))
    }

    /// Fills `x1..=x2` on row `y` with `color`.
    pub fn hline(&mut self, x1: i32, y: i32, x2: i32, color: u8) {
        if let Some((x1, y, x2)) = self.clip_span(x1, y, x2) {
            self.row_mut(y)[x1..=x2].fill(color);
        }
    }

    /// Like [`hline`](Self::hline) but each pixel becomes `map[color][pixel]`.
    pub fn hline_trans(&mut self, x1: i32, y: i32, x2: i32, color: u8, map: &ColorMap) {
        if let Some((x1, y, x2)) = self.clip_span(x1, y, x2) {
            let blend = &map[color];
            for p in &mut self.row_mut(y)[x1..=x2] {
                *p = blend[*p as usize];
            }
        }
    }

    #[inline]
    pub fn putpixel(&mut self, x: i32, y: i32, color: u8) {
        if self.clip_bounds().contains(x, y) {
            let w = self.width as usize;
            self.pixels[y as usize * w + x as usize] = color;
        }
    }

    /// Get the index at (x, y), or None if out of bounds.
    #[inline]
    pub fn getpixel(&self, x: i32, y: i32) -> Option<u8> {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            Some(self.pixels[y as usize * self.width as usize + x as usize])
        } else {
            None
        }
    }

    /// Expands every index through `palette` into `0xAARRGGBB` pixels.
    pub fn to_argb(&self, palette: &Palette) -> Vec<u32> {
        self.pixels.iter().map(|&i| palette.to_argb(i)).collect()
    }

    /// Writes the bitmap as an RGB PNG (or any format `image` infers from
    /// the extension).
    pub fn save_png<P: AsRef<Path>>(&self, palette: &Palette, path: P) -> Result<()> {
        let img = image::RgbImage::from_fn(self.width, self.height, |x, y| {
            let c = palette[self.pixels[(y * self.width + x) as usize]];
            image::Rgb([c.r, c.g, c.b])
        });
        img.save(path)?;
        Ok(())
    }
}
