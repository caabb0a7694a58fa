//! Flat 2D polygon filler on integer points.
//!
//! A classic active edge table: edges wait in an inactive list sorted by top
//! scanline, join the x-sorted active list when the sweep reaches them and
//! retire after their bottom scanline. Each edge covers the pixels it
//! crosses on a scanline, so edges and thin slivers are always visible and
//! horizontal edges are drawn.

use log::trace;

use super::edge::{EdgeArena, PolygonEdge, SortBy, POLYGON_FIX_SHIFT};
use super::span::FlatFill;
use crate::error::Result;
use crate::render::bitmap::Bitmap;

pub(crate) fn polygon(
    bitmap: &mut Bitmap,
    points: &[(i32, i32)],
    flat: FlatFill<'_>,
) -> Result<()> {
    let mut arena = EdgeArena::try_with_capacity(points.len())?;
    let mut inactive = None;
    let mut active = None;

    let clip = bitmap.clip_bounds();
    let mut top = i32::MAX;
    let mut bottom = i32::MIN;

    let Some(&last) = points.last() else {
        return Ok(());
    };
    let mut prev = last;
    for &p in points {
        let edge = PolygonEdge::for_2d(prev, p);
        top = top.min(edge.top);
        bottom = bottom.max(edge.bottom);
        let idx = arena.push(edge);
        arena.insert_sorted(&mut inactive, idx, SortBy::Top);
        prev = p;
    }

    let bottom = bottom.min(clip.bottom - 1);
    trace!("polygon sweep over scanlines {top}..={bottom}");

    for c in top..=bottom {
        // activate edges starting on this scanline
        while let Some(i) = inactive.filter(|&i| arena[i].top == c) {
            arena.activate(&mut inactive, &mut active, i);
        }

        draw_scanline(bitmap, &arena, active, c, &flat);

        // step edges down, keeping the active list sorted
        let mut pos = active;
        while let Some(i) = pos {
            pos = arena[i].next;
            let edge = &mut arena[i];
            if c >= edge.bottom {
                arena.retire(&mut active, i);
            } else {
                edge.x = edge.x.wrapping_add(edge.dx);
                if edge.top == c && edge.dx > 0 {
                    edge.x = edge.x.wrapping_sub(edge.dx / 2);
                }
                if edge.bottom == c + 1 && edge.dx < 0 {
                    edge.x = edge.x.wrapping_sub(edge.dx / 2);
                }
                arena.bubble_back(&mut active, i);
            }
        }
    }

    Ok(())
}

/// Fills one scanline from the active list, covering both the pixels each
/// edge crosses and the interior between an up/down edge pair.
fn draw_scanline(
    bitmap: &mut Bitmap,
    arena: &EdgeArena,
    active: Option<usize>,
    c: i32,
    flat: &FlatFill<'_>,
) {
    let mut hid = 0;
    let mut b1 = 0;
    let mut up = 0;
    let mut draw = 0;

    let mut pos = active;
    while let Some(i) = pos {
        let edge = &arena[i];
        pos = edge.next;

        let mut e = edge.w;
        if edge.bottom != c {
            up = 1 - up;
        } else {
            e = edge.w >> 1;
        }
        if edge.top == c {
            e = edge.w >> 1;
        }

        let right = edge.x.wrapping_add(e) >> POLYGON_FIX_SHIFT;
        if draw < 1 && up >= 1 {
            b1 = right;
        } else if draw >= 1 {
            // interior between the previous edge and this one
            let e1 = edge.x >> POLYGON_FIX_SHIFT;
            hid = hid.max(b1 + 1);
            if hid <= e1 - 1 {
                flat.hline(bitmap, hid, c, e1 - 1);
            }
            b1 = right;
        }

        // pixels the edge itself crosses
        hid = hid.max(edge.x >> POLYGON_FIX_SHIFT);
        if hid <= right {
            flat.hline(bitmap, hid, c, right);
            hid = right + 1;
        }

        draw = up;
    }
}
