//! The scanline filler bank.
//!
//! A filler draws one already clipped horizontal span from the state held in
//! a [`PolygonSegment`]. Drivers pick a [`ScanlineFiller`] once per draw
//! call and hand it every span.
//!
//! Textured spans are split into a *walk* (how texture coordinates advance
//! across the span) and a [`TexelWriter`] (what a sampled texel turns into
//! at the destination):
//!
//! | walk | coordinates | cost |
//! |------|-------------|------|
//! | affine | fixed-point `u, v` stepped by `du, dv` | one add per pixel |
//! | perspective | float `u/z, v/z, 1/z` | one divide per four pixels |
//!
//! | writer | output |
//! |--------|--------|
//! | [`Opaque`] | `texel` |
//! | [`Lit`] | `map[c >> 16][texel]` |
//! | [`Trans`] | `map[texel][dst]` |
//! | [`Masked`] | as the wrapped writer, but texel 0 is skipped |
//!
//! Both walks are generic over the writer so every combination compiles to
//! its own tight loop.

use super::segment::PolygonSegment;
use crate::math::fixed::Fixed;
use crate::tables::{ColorMap, RgbMap};
use crate::texture::Texture;

/// Texel value masked polygon types never draw.
pub const MASK_COLOR: u8 = 0;

/// How a sampled texel is combined with the destination.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Blend<'a> {
    Opaque,
    Lit(&'a ColorMap),
    Trans(&'a ColorMap),
}

/// Resources of a textured filler.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TextureFill<'a> {
    pub texture: &'a Texture,
    pub masked: bool,
    pub blend: Blend<'a>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum ScanlineFiller<'a> {
    /// Solid span in `c`. Drivers normally route flat polygons to
    /// [`Bitmap::hline`](crate::render::bitmap::Bitmap::hline) instead.
    Flat,
    Gcol,
    Grgb(Option<&'a RgbMap>),
    Affine(TextureFill<'a>),
    Perspective(TextureFill<'a>),
}

impl<'a> ScanlineFiller<'a> {
    /// The affine filler with the same texel handling as a perspective one.
    pub fn affine_alternative(self) -> Option<ScanlineFiller<'a>> {
        match self {
            ScanlineFiller::Perspective(fill) => Some(ScanlineFiller::Affine(fill)),
            _ => None,
        }
    }

    /// Draws `span` (the destination pixels, already clipped) from `info`.
    pub fn fill(&self, span: &mut [u8], info: &PolygonSegment) {
        match *self {
            ScanlineFiller::Flat => span.fill(info.c as u8),
            ScanlineFiller::Gcol => gcol_span(span, info),
            ScanlineFiller::Grgb(rgb_map) => grgb_span(span, info, rgb_map),
            ScanlineFiller::Affine(fill) => fill.draw(Walk::Affine, span, info),
            ScanlineFiller::Perspective(fill) => fill.draw(Walk::Perspective, span, info),
        }
    }
}

#[derive(Clone, Copy)]
enum Walk {
    Affine,
    Perspective,
}

impl TextureFill<'_> {
    fn draw(&self, walk: Walk, span: &mut [u8], info: &PolygonSegment) {
        match (self.masked, self.blend) {
            (false, Blend::Opaque) => self.draw_with(walk, span, info, Opaque),
            (true, Blend::Opaque) => self.draw_with(walk, span, info, Masked(Opaque)),
            (false, Blend::Lit(map)) => self.draw_with(walk, span, info, Lit(map)),
            (true, Blend::Lit(map)) => self.draw_with(walk, span, info, Masked(Lit(map))),
            (false, Blend::Trans(map)) => self.draw_with(walk, span, info, Trans(map)),
            (true, Blend::Trans(map)) => self.draw_with(walk, span, info, Masked(Trans(map))),
        }
    }

    #[inline]
    fn draw_with<W: TexelWriter>(
        &self,
        walk: Walk,
        span: &mut [u8],
        info: &PolygonSegment,
        writer: W,
    ) {
        match walk {
            Walk::Affine => affine_span(span, info, self.texture, &writer),
            Walk::Perspective => perspective_span(span, info, self.texture, &writer),
        }
    }
}

/// Writes one sampled texel to the destination.
///
/// `light` is the 16.16 light level interpolated for lit types.
pub(crate) trait TexelWriter {
    fn write(&self, texel: u8, light: Fixed, dst: &mut u8);
}

pub(crate) struct Opaque;

impl TexelWriter for Opaque {
    #[inline]
    fn write(&self, texel: u8, _light: Fixed, dst: &mut u8) {
        *dst = texel;
    }
}

pub(crate) struct Lit<'a>(&'a ColorMap);

impl TexelWriter for Lit<'_> {
    #[inline]
    fn write(&self, texel: u8, light: Fixed, dst: &mut u8) {
        *dst = self.0.light_row(light)[texel as usize];
    }
}

pub(crate) struct Trans<'a>(&'a ColorMap);

impl TexelWriter for Trans<'_> {
    #[inline]
    fn write(&self, texel: u8, _light: Fixed, dst: &mut u8) {
        *dst = self.0[texel][*dst as usize];
    }
}

pub(crate) struct Masked<W>(W);

impl<W: TexelWriter> TexelWriter for Masked<W> {
    #[inline]
    fn write(&self, texel: u8, light: Fixed, dst: &mut u8) {
        if texel != MASK_COLOR {
            self.0.write(texel, light, dst);
        }
    }
}

fn gcol_span(span: &mut [u8], info: &PolygonSegment) {
    let mut c = info.c;
    for dst in span {
        *dst = (c >> 16) as u8;
        c = c.wrapping_add(info.dc);
    }
}

fn grgb_span(span: &mut [u8], info: &PolygonSegment, rgb_map: Option<&RgbMap>) {
    let Some(rgb_map) = rgb_map else {
        span.fill(0);
        return;
    };

    let (mut r, mut g, mut b) = (info.r, info.g, info.b);
    for dst in span {
        *dst = rgb_map.makecol(r >> 16, g >> 16, b >> 16);
        r = r.wrapping_add(info.dr);
        g = g.wrapping_add(info.dg);
        b = b.wrapping_add(info.db);
    }
}

fn affine_span<W: TexelWriter>(
    span: &mut [u8],
    info: &PolygonSegment,
    texture: &Texture,
    writer: &W,
) {
    let (mut u, mut v, mut c) = (info.u, info.v, info.c);
    for dst in span {
        writer.write(texture.sample(u as i64, v as i64), c, dst);
        u = u.wrapping_add(info.du);
        v = v.wrapping_add(info.dv);
        c = c.wrapping_add(info.dc);
    }
}

/// Perspective-correct span: `u, v` are recovered exactly every four pixels
/// and stepped linearly in between.
fn perspective_span<W: TexelWriter>(
    span: &mut [u8],
    info: &PolygonSegment,
    texture: &Texture,
    writer: &W,
) {
    let mut fu = info.fu as f64;
    let mut fv = info.fv as f64;
    let mut fz = info.z as f64;
    let dfu = info.dfu as f64 * 4.0;
    let dfv = info.dfv as f64 * 4.0;
    let dfz = info.dz as f64 * 4.0;
    let mut c = info.c;

    let mut z1 = 1.0 / fz;
    let mut u = (fu * z1) as i64;
    let mut v = (fv * z1) as i64;

    // depth at the end of the first run
    fz += dfz;
    z1 = 1.0 / fz;

    for run in span.chunks_mut(4) {
        fu += dfu;
        fv += dfv;
        fz += dfz;
        let next_u = (fu * z1) as i64;
        let next_v = (fv * z1) as i64;
        z1 = 1.0 / fz;
        let du = next_u.wrapping_sub(u) >> 2;
        let dv = next_v.wrapping_sub(v) >> 2;

        for dst in run {
            writer.write(texture.sample(u, v), c, dst);
            u = u.wrapping_add(du);
            v = v.wrapping_add(dv);
            c = c.wrapping_add(info.dc);
        }
    }
}
