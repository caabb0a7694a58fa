//! Interpolation state threaded through one polygon draw.

use super::polytype::InterpFlags;
use super::Vertex;
use crate::math::fixed::{fixdiv, fixmul, fixtof, ftofix, itofix, Fixed};

/// Per-edge or per-span interpolation values and their deltas.
///
/// Only the fields selected by the draw call's [`InterpFlags`] are
/// meaningful; the rest stay zero. Fixed-point accumulators wrap rather
/// than trap on overflow.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct PolygonSegment {
    /// Affine texture coordinates.
    pub u: Fixed,
    pub v: Fixed,
    pub du: Fixed,
    pub dv: Fixed,
    /// Single channel: gouraud index or light level.
    pub c: Fixed,
    pub dc: Fixed,
    /// Three channel gouraud.
    pub r: Fixed,
    pub g: Fixed,
    pub b: Fixed,
    pub dr: Fixed,
    pub dg: Fixed,
    pub db: Fixed,
    /// Inverse depth.
    pub z: f32,
    pub dz: f32,
    /// Texture coordinates divided by depth, scaled by 65536.
    pub fu: f32,
    pub fv: f32,
    pub dfu: f32,
    pub dfv: f32,
}

/// Splits a packed `0xRRGGBB` color into channels.
#[inline]
pub(crate) fn unpack_rgb(color: i32) -> [i32; 3] {
    [(color >> 16) & 0xFF, (color >> 8) & 0xFF, color & 0xFF]
}

impl PolygonSegment {
    /// Advances every active value by `gap` whole steps.
    pub fn skip(&mut self, gap: i32, flags: InterpFlags) {
        if flags.contains(InterpFlags::ONE_COLOR) {
            self.c = self.c.wrapping_add(self.dc.wrapping_mul(gap));
        }

        if flags.contains(InterpFlags::THREE_COLOR) {
            self.r = self.r.wrapping_add(self.dr.wrapping_mul(gap));
            self.g = self.g.wrapping_add(self.dg.wrapping_mul(gap));
            self.b = self.b.wrapping_add(self.db.wrapping_mul(gap));
        }

        if flags.contains(InterpFlags::FIX_UV) {
            self.u = self.u.wrapping_add(self.du.wrapping_mul(gap));
            self.v = self.v.wrapping_add(self.dv.wrapping_mul(gap));
        }

        if flags.contains(InterpFlags::Z) {
            let gap = gap as f32;
            self.z += self.dz * gap;

            if flags.contains(InterpFlags::FLOAT_UV) {
                self.fu += self.dfu * gap;
                self.fv += self.dfv * gap;
            }
        }
    }

    /// Advances every active value by a fractional 16.16 `gap`.
    pub fn skip_fixed(&mut self, gap: Fixed, flags: InterpFlags) {
        if flags.contains(InterpFlags::ONE_COLOR) {
            self.c = self.c.wrapping_add(fixmul(self.dc, gap));
        }

        if flags.contains(InterpFlags::THREE_COLOR) {
            self.r = self.r.wrapping_add(fixmul(self.dr, gap));
            self.g = self.g.wrapping_add(fixmul(self.dg, gap));
            self.b = self.b.wrapping_add(fixmul(self.db, gap));
        }

        if flags.contains(InterpFlags::FIX_UV) {
            self.u = self.u.wrapping_add(fixmul(self.du, gap));
            self.v = self.v.wrapping_add(fixmul(self.dv, gap));
        }

        if flags.contains(InterpFlags::Z) {
            let gap = fixtof(gap) as f32;
            self.z += self.dz * gap;

            if flags.contains(InterpFlags::FLOAT_UV) {
                self.fu += self.dfu * gap;
                self.fv += self.dfv * gap;
            }
        }
    }

    /// Steps an edge's values down one scanline.
    pub fn advance(&mut self, flags: InterpFlags) {
        self.skip(1, flags);
    }

    /// Sets the span deltas from the values at the left (`s1`) and right
    /// (`s2`) edges, `width` apart, and the span start `step` to the right
    /// of the left edge.
    pub fn span_between(
        &mut self,
        s1: &PolygonSegment,
        s2: &PolygonSegment,
        step: Fixed,
        width: Fixed,
        flags: InterpFlags,
    ) {
        if flags.contains(InterpFlags::ONE_COLOR) {
            self.dc = fixdiv(s2.c.wrapping_sub(s1.c), width);
            self.c = s1.c.wrapping_add(fixmul(step, self.dc));
        }

        if flags.contains(InterpFlags::THREE_COLOR) {
            self.dr = fixdiv(s2.r.wrapping_sub(s1.r), width);
            self.dg = fixdiv(s2.g.wrapping_sub(s1.g), width);
            self.db = fixdiv(s2.b.wrapping_sub(s1.b), width);
            self.r = s1.r.wrapping_add(fixmul(step, self.dr));
            self.g = s1.g.wrapping_add(fixmul(step, self.dg));
            self.b = s1.b.wrapping_add(fixmul(step, self.db));
        }

        if flags.contains(InterpFlags::FIX_UV) {
            self.du = fixdiv(s2.u.wrapping_sub(s1.u), width);
            self.dv = fixdiv(s2.v.wrapping_sub(s1.v), width);
            self.u = s1.u.wrapping_add(fixmul(step, self.du));
            self.v = s1.v.wrapping_add(fixmul(step, self.dv));
        }

        if flags.contains(InterpFlags::Z) {
            let step = fixtof(step) as f32;
            let w1 = (65536.0 / width as f64) as f32;

            self.dz = (s2.z - s1.z) * w1;
            self.z = s1.z + self.dz * step;

            if flags.contains(InterpFlags::FLOAT_UV) {
                self.dfu = (s2.fu - s1.fu) * w1;
                self.dfv = (s2.fv - s1.fv) * w1;
                self.fu = s1.fu + self.dfu * step;
                self.fv = s1.fv + self.dfv * step;
            }
        }
    }

    /// Span deltas for a whole triangle, from the long edge's values `self`
    /// taken at the middle vertex's scanline and the middle vertex itself,
    /// `width` apart. Only the delta fields of the result are set.
    pub fn triangle_deltas(
        &self,
        mid: &Vertex,
        width: Fixed,
        flags: InterpFlags,
    ) -> PolygonSegment {
        let mut deltas = PolygonSegment::default();

        if flags.contains(InterpFlags::ONE_COLOR) {
            deltas.dc = fixdiv(self.c.wrapping_sub(itofix(mid.color)), width);
        }

        if flags.contains(InterpFlags::THREE_COLOR) {
            let [r, g, b] = unpack_rgb(mid.color);
            deltas.dr = fixdiv(self.r.wrapping_sub(itofix(r)), width);
            deltas.dg = fixdiv(self.g.wrapping_sub(itofix(g)), width);
            deltas.db = fixdiv(self.b.wrapping_sub(itofix(b)), width);
        }

        if flags.contains(InterpFlags::FIX_UV) {
            deltas.du = fixdiv(self.u.wrapping_sub(ftofix(mid.uv.x as f64)), width);
            deltas.dv = fixdiv(self.v.wrapping_sub(ftofix(mid.uv.y as f64)), width);
        }

        if flags.contains(InterpFlags::Z) {
            let w1 = (65536.0 / width as f64) as f32;
            let z1 = (1.0 / mid.pos.z as f64) as f32;
            deltas.dz = (self.z - z1) * w1;

            if flags.contains(InterpFlags::FLOAT_UV) {
                let fu = mid.uv.x * z1 * 65536.0;
                let fv = mid.uv.y * z1 * 65536.0;
                deltas.dfu = (self.fu - fu) * w1;
                deltas.dfv = (self.fv - fv) * w1;
            }
        }

        deltas
    }

    /// Starts a span `step` right of the left edge's values `s1`, using the
    /// constant triangle deltas already stored in `self`.
    pub fn span_from(&mut self, s1: &PolygonSegment, step: Fixed, flags: InterpFlags) {
        if flags.contains(InterpFlags::ONE_COLOR) {
            self.c = s1.c.wrapping_add(fixmul(step, self.dc));
        }

        if flags.contains(InterpFlags::THREE_COLOR) {
            self.r = s1.r.wrapping_add(fixmul(step, self.dr));
            self.g = s1.g.wrapping_add(fixmul(step, self.dg));
            self.b = s1.b.wrapping_add(fixmul(step, self.db));
        }

        if flags.contains(InterpFlags::FIX_UV) {
            self.u = s1.u.wrapping_add(fixmul(step, self.du));
            self.v = s1.v.wrapping_add(fixmul(step, self.dv));
        }

        if flags.contains(InterpFlags::Z) {
            let step = fixtof(step) as f32;
            self.z = s1.z + self.dz * step;

            if flags.contains(InterpFlags::FLOAT_UV) {
                self.fu = s1.fu + self.dfu * step;
                self.fv = s1.fv + self.dfv * step;
            }
        }
    }

    /// Rewrites perspective values as affine fixed-point ones, valid when
    /// depth is constant across the span.
    pub fn to_affine(&mut self) {
        let z1 = (1.0 / self.z as f64) as f32;
        self.u = (self.fu * z1) as i32;
        self.v = (self.fv * z1) as i32;
        self.du = (self.dfu * z1) as i32;
        self.dv = (self.dfv * z1) as i32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn unpack_rgb_channels() {
        assert_eq!(unpack_rgb(0x12_34_56), [0x12, 0x34, 0x56]);
    }

    #[test]
    fn skip_advances_only_active_values() {
        let mut s = PolygonSegment {
            c: itofix(1),
            dc: itofix(2),
            u: itofix(3),
            du: itofix(1),
            z: 1.0,
            dz: 0.25,
            ..Default::default()
        };
        s.skip(3, InterpFlags::ONE_COLOR | InterpFlags::Z);
        assert_eq!(s.c, itofix(7));
        assert_eq!(s.u, itofix(3));
        assert_relative_eq!(s.z, 1.75);
    }

    #[test]
    fn skip_fixed_moves_fractionally() {
        let mut s = PolygonSegment {
            u: 0,
            du: itofix(4),
            fu: 0.0,
            dfu: 8.0,
            ..Default::default()
        };
        s.skip_fixed(
            itofix(1) / 2,
            InterpFlags::FIX_UV | InterpFlags::Z | InterpFlags::FLOAT_UV,
        );
        assert_eq!(s.u, itofix(2));
        assert_relative_eq!(s.fu, 4.0);
    }

    #[test]
    fn span_between_interpolates_across_width() {
        let s1 = PolygonSegment {
            c: itofix(10),
            ..Default::default()
        };
        let s2 = PolygonSegment {
            c: itofix(30),
            ..Default::default()
        };
        let mut info = PolygonSegment::default();
        info.span_between(&s1, &s2, itofix(1) / 2, itofix(4), InterpFlags::ONE_COLOR);
        assert_eq!(info.dc, itofix(5));
        assert_eq!(info.c, itofix(10) + itofix(5) / 2);
    }

    #[test]
    fn to_affine_divides_by_depth() {
        let mut s = PolygonSegment {
            z: 0.5,
            fu: 65536.0,
            dfu: 32768.0,
            fv: 0.0,
            dfv: 0.0,
            ..Default::default()
        };
        s.to_affine();
        assert_eq!(s.u, itofix(2));
        assert_eq!(s.du, itofix(1));
    }
}
