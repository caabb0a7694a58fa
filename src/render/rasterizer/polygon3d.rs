//! General convex polygon driver.
//!
//! Edges are linked into a ring in winding order. Starting from the topmost
//! edge, one cursor walks the ring backwards and the other forwards; each
//! step draws the scanlines both current edges share.

use log::{debug, trace};

use super::edge::{EdgeArena, PolygonEdge};
use super::segment::PolygonSegment;
use super::span::SpanWriter;
use super::Vertex;
use crate::error::Result;

pub(crate) fn polygon3d(out: &mut SpanWriter<'_, '_>, vertices: &[Vertex]) -> Result<()> {
    let flags = out.flags();
    let clip = out.clip();

    let mut arena = EdgeArena::try_with_capacity(vertices.len())?;
    let mut top = i32::MAX;
    let mut bottom = i32::MIN;
    let mut start = 0;

    let mut prev = match vertices.last() {
        Some(v) => v,
        None => return Ok(()),
    };
    for v in vertices {
        if let Some(edge) = PolygonEdge::for_3d(prev, v, flags, &clip) {
            if edge.top < top {
                top = edge.top;
                start = arena.len();
            }
            bottom = bottom.max(edge.bottom);
            arena.push(edge);
        }
        prev = v;
    }

    if arena.len() < 2 {
        trace!("polygon covers no scanline");
        return Ok(());
    }
    arena.close_ring();

    let mut left = start;
    let (before, after) = (arena.ring_prev(left), arena.ring_next(left));
    if before != after && arena[before].top == top {
        left = before;
    }
    let mut right = arena.ring_next(left);

    let mut ytop = top;
    let mut info = PolygonSegment::default();

    // a convex ring is exhausted after one lap per cursor
    for _ in 0..=2 * arena.len() {
        if left == right {
            break;
        }
        let ybottom = arena[left].bottom.min(arena[right].bottom);

        let (l, r) = arena.pair_mut(left, right);
        out.polygon_segment(ytop, ybottom, l, r, &mut info);

        if ybottom >= bottom {
            return Ok(());
        }
        if ybottom >= arena[left].bottom {
            left = arena.ring_prev(left);
        }
        if ybottom >= arena[right].bottom {
            right = arena.ring_next(right);
        }
        ytop = ybottom + 1;
    }

    debug!(
        "polygon walk over {} edges stopped before scanline {bottom}",
        arena.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec2::Vec2;
    use crate::math::vec3::Vec3;
    use crate::render::bitmap::Bitmap;
    use crate::render::rasterizer::polytype::SpanSetup;
    use crate::render::rasterizer::span::FlatFill;
    use crate::render::rasterizer::triangle3d::triangle3d;
    use crate::render::rasterizer::PolygonType;

    fn vtx(x: f32, y: f32, c: i32) -> Vertex {
        Vertex {
            pos: Vec3::new(x, y, 1.0),
            uv: Vec2::ZERO,
            color: c,
        }
    }

    fn writer<'b>(bmp: &'b mut Bitmap, ty: PolygonType, color: u8) -> SpanWriter<'b, 'static> {
        let setup = SpanSetup::new(ty, None, None, None).unwrap();
        SpanWriter::new(bmp, setup, FlatFill { color, map: None })
    }

    #[test]
    fn flat_triangle_matches_fast_path() {
        let v = [vtx(0.0, 0.0, 7), vtx(10.0, 0.0, 7), vtx(0.0, 10.0, 7)];
        let mut poly = Bitmap::new(20, 20);
        polygon3d(&mut writer(&mut poly, PolygonType::Flat, 7), &v).unwrap();
        let mut tri = Bitmap::new(20, 20);
        triangle3d(&mut writer(&mut tri, PolygonType::Flat, 7), &v[0], &v[1], &v[2]);

        assert_eq!(poly.pixels(), tri.pixels());
        assert_eq!(poly.pixels().iter().filter(|&&p| p == 7).count(), 55);
    }

    #[test]
    fn gouraud_triangle_matches_fast_path() {
        let v = [vtx(3.5, 1.2, 10), vtx(18.7, 6.4, 200), vtx(6.1, 19.3, 90)];
        let mut poly = Bitmap::new(24, 24);
        polygon3d(&mut writer(&mut poly, PolygonType::Gcol, 0), &v).unwrap();
        let mut tri = Bitmap::new(24, 24);
        triangle3d(&mut writer(&mut tri, PolygonType::Gcol, 0), &v[0], &v[1], &v[2]);

        let covered = |b: &Bitmap| -> Vec<bool> { b.pixels().iter().map(|&p| p != 0).collect() };
        assert_eq!(covered(&poly), covered(&tri));
    }

    #[test]
    fn axis_aligned_square() {
        let v = [
            vtx(2.0, 2.0, 5),
            vtx(6.0, 2.0, 5),
            vtx(6.0, 6.0, 5),
            vtx(2.0, 6.0, 5),
        ];
        let mut bmp = Bitmap::new(8, 8);
        polygon3d(&mut writer(&mut bmp, PolygonType::Flat, 5), &v).unwrap();
        for y in 0..8 {
            for x in 0..8 {
                let inside = (2..6).contains(&x) && (2..6).contains(&y);
                assert_eq!(bmp.getpixel(x, y), Some(if inside { 5 } else { 0 }));
            }
        }
    }

    #[test]
    fn winding_does_not_matter() {
        let cw = [
            vtx(4.0, 1.0, 3),
            vtx(11.0, 4.0, 3),
            vtx(9.0, 11.0, 3),
            vtx(2.0, 8.0, 3),
        ];
        let mut ccw = cw;
        ccw.reverse();
        let mut a = Bitmap::new(14, 14);
        polygon3d(&mut writer(&mut a, PolygonType::Flat, 3), &cw).unwrap();
        let mut b = Bitmap::new(14, 14);
        polygon3d(&mut writer(&mut b, PolygonType::Flat, 3), &ccw).unwrap();
        assert_eq!(a.pixels(), b.pixels());
        assert!(a.pixels().contains(&3));
    }

    #[test]
    fn flat_polygon_draws_nothing() {
        let v = [vtx(1.0, 4.0, 2), vtx(9.0, 4.0, 2), vtx(5.0, 4.0, 2)];
        let mut bmp = Bitmap::new(10, 10);
        polygon3d(&mut writer(&mut bmp, PolygonType::Flat, 2), &v).unwrap();
        assert!(bmp.pixels().iter().all(|&p| p == 0));
    }
}
