//! 256-entry palettes and the tables derived from them.
//!
//! A bitmap only stores indices; the palette gives them a color when the
//! frame is presented or exported, and is the source every [`RgbMap`] and
//! [`ColorMap`] is computed from.

use std::ops::{Index, IndexMut};

use crate::tables::{ColorMap, RgbMap};

/// 8-bit-per-channel color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Packed `0xAARRGGBB` with full alpha.
    #[inline]
    pub const fn to_argb(self) -> u32 {
        0xFF00_0000 | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette(pub [Rgb; 256]);

impl Default for Palette {
    fn default() -> Self {
        Palette([Rgb::default(); 256])
    }
}

impl Index<u8> for Palette {
    type Output = Rgb;
    fn index(&self, idx: u8) -> &Rgb {
        &self.0[idx as usize]
    }
}

impl IndexMut<u8> for Palette {
    fn index_mut(&mut self, idx: u8) -> &mut Rgb {
        &mut self.0[idx as usize]
    }
}

impl Palette {
    /// Evenly spread 3-3-2 palette: index bits are `rrrgggbb`.
    pub fn rgb332() -> Self {
        let mut pal = Palette::default();
        for (i, slot) in pal.0.iter_mut().enumerate() {
            let r = (i >> 5) & 7;
            let g = (i >> 2) & 7;
            let b = i & 3;
            *slot = Rgb::new(
                (r * 255 / 7) as u8,
                (g * 255 / 7) as u8,
                (b * 255 / 3) as u8,
            );
        }
        pal
    }

    /// Greyscale ramp, index `i` is `(i, i, i)`.
    pub fn grey() -> Self {
        let mut pal = Palette::default();
        for (i, slot) in pal.0.iter_mut().enumerate() {
            *slot = Rgb::new(i as u8, i as u8, i as u8);
        }
        pal
    }

    #[inline]
    pub fn to_argb(&self, index: u8) -> u32 {
        self[index].to_argb()
    }

    /// Closest entry to `(r, g, b)`, weighting channels by perceived
    /// brightness. Index 0 is the mask color and is never returned.
    pub fn bestfit(&self, r: u8, g: u8, b: u8) -> u8 {
        let mut best = 1u8;
        let mut lowest = u32::MAX;

        for (i, c) in self.0.iter().enumerate().skip(1) {
            let dr = (c.r as i32 - r as i32).unsigned_abs();
            let dg = (c.g as i32 - g as i32).unsigned_abs();
            let db = (c.b as i32 - b as i32).unsigned_abs();
            let diff = dg * dg * (59 * 59) + dr * dr * (30 * 30) + db * db * (11 * 11);
            if diff < lowest {
                best = i as u8;
                if diff == 0 {
                    break;
                }
                lowest = diff;
            }
        }
        best
    }

    /// RGB → index table for this palette.
    pub fn rgb_map(&self) -> RgbMap {
        let expand = |c: u8| (c << 3) | (c >> 2);
        RgbMap::from_fn(|r, g, b| self.bestfit(expand(r), expand(g), expand(b)))
    }

    /// Lighting table: row 255 is full brightness, row 0 is black.
    ///
    /// Index 0 maps to itself in every row so masked texels stay masked.
    pub fn lighting_map(&self, rgb_map: &RgbMap) -> ColorMap {
        ColorMap::from_fn(|light, col| {
            if col == 0 {
                return 0;
            }
            let c = self[col];
            let scale = |v: u8| v as i32 * light as i32 / 255;
            rgb_map.makecol(scale(c.r), scale(c.g), scale(c.b))
        })
    }

    /// Translucency table: `map[src][dst]` mixes `alpha/255` of the source
    /// over the destination.
    pub fn blend_map(&self, rgb_map: &RgbMap, alpha: u8) -> ColorMap {
        ColorMap::from_fn(|src, dst| {
            let (s, d) = (self[src], self[dst]);
            let mix = |s: u8, d: u8| d as i32 + (s as i32 - d as i32) * alpha as i32 / 255;
            rgb_map.makecol(mix(s.r, d.r), mix(s.g, d.g), mix(s.b, d.b))
        })
    }
}
