//! Scanline walking between a pair of edges.

use super::edge::PolygonEdge;
use super::filler::ScanlineFiller;
use super::polytype::{InterpFlags, SpanSetup};
use super::segment::PolygonSegment;
use crate::math::fixed::fixceil;
use crate::render::bitmap::{Bitmap, ClipRect};
use crate::tables::ColorMap;

/// How flat spans are written: a plain fill, or through a color map in
/// translucent mode.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FlatFill<'a> {
    pub color: u8,
    pub map: Option<&'a ColorMap>,
}

impl FlatFill<'_> {
    #[inline]
    pub fn hline(&self, bitmap: &mut Bitmap, x1: i32, y: i32, x2: i32) {
        match self.map {
            Some(map) => bitmap.hline_trans(x1, y, x2, self.color, map),
            None => bitmap.hline(x1, y, x2, self.color),
        }
    }
}

/// Writes the spans of one draw call into a bitmap.
pub(crate) struct SpanWriter<'b, 'a> {
    bitmap: &'b mut Bitmap,
    setup: SpanSetup<'a>,
    flat: FlatFill<'a>,
    clip: ClipRect,
}

impl<'b, 'a> SpanWriter<'b, 'a> {
    pub fn new(bitmap: &'b mut Bitmap, setup: SpanSetup<'a>, flat: FlatFill<'a>) -> Self {
        let clip = bitmap.clip_bounds();
        Self {
            bitmap,
            setup,
            flat,
            clip,
        }
    }

    #[inline]
    pub fn flags(&self) -> InterpFlags {
        self.setup.flags
    }

    #[inline]
    pub fn clip(&self) -> ClipRect {
        self.clip
    }

    #[inline]
    pub fn is_flat(&self) -> bool {
        matches!(self.setup.filler, ScanlineFiller::Flat)
    }

    /// Orders two edges left to right; on a tie the one heading left first.
    fn order<'e>(
        e1: &'e mut PolygonEdge,
        e2: &'e mut PolygonEdge,
    ) -> (&'e mut PolygonEdge, &'e mut PolygonEdge) {
        if e2.x < e1.x || (e1.x == e2.x && e2.dx < e1.dx) {
            (e2, e1)
        } else {
            (e1, e2)
        }
    }

    /// Draws scanlines `ytop..=ybottom` between two polygon edges,
    /// interpolating each span from both edges' values.
    pub fn polygon_segment(
        &mut self,
        ytop: i32,
        ybottom: i32,
        e1: &mut PolygonEdge,
        e2: &mut PolygonEdge,
        info: &mut PolygonSegment,
    ) {
        let flags = self.setup.flags;
        let (e1, e2) = Self::order(e1, e2);

        for y in ytop..=ybottom {
            let x = fixceil(e1.x);
            let w = fixceil(e2.x) - x;

            if self.is_flat() {
                if w > 0 {
                    self.flat.hline(self.bitmap, x, y, x + w - 1);
                }
            } else {
                let width = e2.x.wrapping_sub(e1.x);
                if width != 0 {
                    let step = (x << 16).wrapping_sub(e1.x);
                    info.span_between(&e1.dat, &e2.dat, step, width, flags);
                }
                e1.dat.advance(flags);
                e2.dat.advance(flags);

                // zero width means both edges round to the same pixel
                if width != 0 {
                    self.emit(y, x, w, info);
                }
            }

            e1.x = e1.x.wrapping_add(e1.dx);
            e2.x = e2.x.wrapping_add(e2.dx);
        }
    }

    /// Draws scanlines `ytop..=ybottom` of a triangle. `info` already holds
    /// the triangle's constant span deltas; only the left edge's values are
    /// read.
    pub fn triangle_part(
        &mut self,
        ytop: i32,
        ybottom: i32,
        e1: &mut PolygonEdge,
        e2: &mut PolygonEdge,
        info: &mut PolygonSegment,
    ) {
        let flags = self.setup.flags;
        let (left, right) = Self::order(e1, e2);

        for y in ytop..=ybottom {
            let x = fixceil(left.x);
            let w = fixceil(right.x) - x;

            if self.is_flat() {
                if w > 0 {
                    self.flat.hline(self.bitmap, x, y, x + w - 1);
                }
            } else {
                let step = (x << 16).wrapping_sub(left.x);
                info.span_from(&left.dat, step, flags);
                left.dat.advance(flags);
                self.emit(y, x, w, info);
            }

            left.x = left.x.wrapping_add(left.dx);
            right.x = right.x.wrapping_add(right.dx);
        }
    }

    /// Clips one span horizontally and hands it to the filler.
    fn emit(&mut self, y: i32, mut x: i32, mut w: i32, info: &mut PolygonSegment) {
        let clip = self.clip;
        if y < clip.top || y >= clip.bottom {
            return;
        }

        if x < clip.left {
            let gap = clip.left - x;
            x = clip.left;
            w -= gap;
            info.skip(gap, self.setup.flags);
        }
        if x + w > clip.right {
            w = clip.right - x;
        }
        if w <= 0 {
            return;
        }

        let filler = match self.setup.alternative {
            Some(affine)
                if self.setup.flags.contains(InterpFlags::FLOAT_UV_TO_FIX) && info.dz == 0.0 =>
            {
                info.to_affine();
                affine
            }
            _ => self.setup.filler,
        };

        let row = self.bitmap.row_mut(y as usize);
        filler.fill(&mut row[x as usize..(x + w) as usize], info);
    }
}
