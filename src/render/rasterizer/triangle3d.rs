//! Triangle fast path.
//!
//! A triangle's span deltas are constant, so they are computed once at the
//! middle vertex's scanline and every span is started from the left edge
//! alone.

use log::trace;

use super::edge::PolygonEdge;
use super::segment::PolygonSegment;
use super::span::SpanWriter;
use super::Vertex;
use crate::math::fixed::{fixmul, ftofix};

pub(crate) fn triangle3d(out: &mut SpanWriter<'_, '_>, v1: &Vertex, v2: &Vertex, v3: &Vertex) {
    let flags = out.flags();
    let clip = out.clip();

    let (mut vt1, mut vt2) = if v1.pos.y > v2.pos.y {
        (v2, v1)
    } else {
        (v1, v2)
    };
    let mut vt3 = v3;
    if vt1.pos.y > vt3.pos.y {
        std::mem::swap(&mut vt1, &mut vt3);
    }
    if vt2.pos.y > vt3.pos.y {
        std::mem::swap(&mut vt2, &mut vt3);
    }

    // the long edge spans both halves
    let Some(mut long) = PolygonEdge::for_3d(vt1, vt3, flags, &clip) else {
        trace!("triangle covers no scanline");
        return;
    };

    let mut info = PolygonSegment::default();
    if !out.is_flat() {
        let mut at_mid = long.dat;
        let h = ftofix(vt2.pos.y as f64).wrapping_sub(long.top << 16);
        at_mid.skip_fixed(h, flags);

        let w = long
            .x
            .wrapping_add(fixmul(h, long.dx))
            .wrapping_sub(ftofix(vt2.pos.x as f64));
        if w != 0 {
            info = at_mid.triangle_deltas(vt2, w, flags);
        }
    }

    if let Some(mut upper) = PolygonEdge::for_3d(vt1, vt2, flags, &clip) {
        out.triangle_part(upper.top, upper.bottom, &mut long, &mut upper, &mut info);
    }

    if let Some(mut lower) = PolygonEdge::for_3d(vt2, vt3, flags, &clip) {
        out.triangle_part(lower.top, lower.bottom, &mut long, &mut lower, &mut info);
    }
}
