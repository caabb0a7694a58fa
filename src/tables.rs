//! Lookup tables consumed by the polygon fillers.
//!
//! * [`ColorMap`] is a 256×256 byte matrix. Lit polygon types read it as
//!   `map[light][texel]`, translucent ones as `map[source][destination]`.
//! * [`RgbMap`] turns a 15-bit RGB triple into a palette index and backs the
//!   three-channel gouraud filler.

use std::ops::{Index, IndexMut};

/// 256×256 palette translation table.
#[derive(Clone, PartialEq, Eq)]
pub struct ColorMap(Vec<[u8; 256]>);

impl ColorMap {
    /// Builds a table where `map[row][col] = f(row, col)`.
    pub fn from_fn(mut f: impl FnMut(u8, u8) -> u8) -> Self {
        let rows = (0..=255u8)
            .map(|row| {
                let mut out = [0u8; 256];
                for (col, slot) in out.iter_mut().enumerate() {
                    *slot = f(row, col as u8);
                }
                out
            })
            .collect();
        ColorMap(rows)
    }

    /// Table that maps every entry to its column, i.e. full light / opaque.
    pub fn identity() -> Self {
        Self::from_fn(|_, col| col)
    }

    #[inline]
    pub fn get(&self, row: u8, col: u8) -> u8 {
        self.0[row as usize][col as usize]
    }

    /// Row for a 16.16 light level, clamped to the table.
    #[inline]
    pub(crate) fn light_row(&self, light: i32) -> &[u8; 256] {
        &self.0[(light >> 16).clamp(0, 255) as usize]
    }
}

impl Default for ColorMap {
    fn default() -> Self {
        ColorMap(vec![[0u8; 256]; 256])
    }
}

impl Index<u8> for ColorMap {
    type Output = [u8; 256];
    fn index(&self, row: u8) -> &Self::Output {
        &self.0[row as usize]
    }
}

impl IndexMut<u8> for ColorMap {
    fn index_mut(&mut self, row: u8) -> &mut [u8; 256] {
        &mut self.0[row as usize]
    }
}

impl std::fmt::Debug for ColorMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColorMap").finish_non_exhaustive()
    }
}

/// 32×32×32 table from 5-bit-per-channel RGB to palette index.
#[derive(Clone, PartialEq, Eq)]
pub struct RgbMap(Vec<u8>);

impl RgbMap {
    /// Builds a table where `map[r][g][b] = f(r, g, b)`, each channel in `0..32`.
    pub fn from_fn(mut f: impl FnMut(u8, u8, u8) -> u8) -> Self {
        let mut data = Vec::with_capacity(32 * 32 * 32);
        for r in 0..32u8 {
            for g in 0..32u8 {
                for b in 0..32u8 {
                    data.push(f(r, g, b));
                }
            }
        }
        RgbMap(data)
    }

    /// Entry for 5-bit channels.
    #[inline]
    pub fn lookup(&self, r: u8, g: u8, b: u8) -> u8 {
        let idx = ((r as usize & 31) << 10) | ((g as usize & 31) << 5) | (b as usize & 31);
        self.0[idx]
    }

    /// Palette index for 8-bit channels. Out-of-range channels are clamped.
    #[inline]
    pub fn makecol(&self, r: i32, g: i32, b: i32) -> u8 {
        let q = |c: i32| (c.clamp(0, 255) >> 3) as u8;
        self.lookup(q(r), q(g), q(b))
    }
}

impl Default for RgbMap {
    fn default() -> Self {
        RgbMap(vec![0u8; 32 * 32 * 32])
    }
}

impl std::fmt::Debug for RgbMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RgbMap").finish_non_exhaustive()
    }
}
