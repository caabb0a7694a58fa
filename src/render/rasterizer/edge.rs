//! Polygon edges and the per-call arena that links them.
//!
//! Edges live in a contiguous `Vec` sized to the vertex count and refer to
//! each other by index. The 3D driver closes them into a ring in winding
//! order; the 2D filler threads them through an inactive (by top) and an
//! active (by x) list.

use log::warn;

use super::polytype::InterpFlags;
use super::segment::{unpack_rgb, PolygonSegment};
use super::Vertex;
use crate::error::{RasterError, Result};
use crate::math::fixed::{fixceil, fixdiv, fixmul, fixtof, ftofix, itofix, Fixed};
use crate::render::bitmap::ClipRect;

/// Fractional bits of the 2D filler's edge positions.
pub(crate) const POLYGON_FIX_SHIFT: u32 = 18;

/// Lifecycle of an edge in the 2D sweep. Edges only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum EdgeStatus {
    #[default]
    Pending,
    Active,
    Retired,
}

/// One non-horizontal polygon edge.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct PolygonEdge {
    /// First and last scanline covered, inclusive.
    pub top: i32,
    pub bottom: i32,
    /// Position at the current scanline and its per-scanline step. 16.16 for
    /// 3D edges, [`POLYGON_FIX_SHIFT`] fraction bits for 2D ones.
    pub x: Fixed,
    pub dx: Fixed,
    /// Horizontal extent of a 2D edge within one scanline.
    pub w: Fixed,
    /// Interpolated values along a 3D edge.
    pub dat: PolygonSegment,
    pub prev: Option<usize>,
    pub next: Option<usize>,
    pub status: EdgeStatus,
}

impl PolygonEdge {
    /// Builds the edge between two 3D vertices, clipped vertically to
    /// `clip`. Returns `None` when it covers no scanline.
    pub fn for_3d(v1: &Vertex, v2: &Vertex, flags: InterpFlags, clip: &ClipRect) -> Option<Self> {
        let (v1, v2) = if v2.pos.y < v1.pos.y { (v2, v1) } else { (v1, v2) };

        let mut edge = PolygonEdge {
            top: fixceil(ftofix(v1.pos.y as f64)),
            bottom: fixceil(ftofix(v2.pos.y as f64)) - 1,
            ..Default::default()
        };
        if edge.bottom < edge.top {
            return None;
        }

        let h1 = (1.0 / (v2.pos.y - v1.pos.y) as f64) as f32;
        let h = ftofix((v2.pos.y - v1.pos.y) as f64);
        let step = (edge.top << 16).wrapping_sub(ftofix(v1.pos.y as f64));

        edge.dx = ftofix(((v2.pos.x - v1.pos.x) * h1) as f64);
        edge.x = ftofix(v1.pos.x as f64).wrapping_add(fixmul(step, edge.dx));

        if flags.contains(InterpFlags::FLAT) {
            if edge.top < clip.top {
                edge.x = edge
                    .x
                    .wrapping_add((clip.top - edge.top).wrapping_mul(edge.dx));
                edge.top = clip.top;
            }
            edge.bottom = edge.bottom.min(clip.bottom - 1);
            return (edge.bottom >= edge.top).then_some(edge);
        }

        let dat = &mut edge.dat;

        if flags.contains(InterpFlags::Z) {
            let step_f = fixtof(step) as f32;
            let z1 = (1.0 / v1.pos.z as f64) as f32;
            let z2 = (1.0 / v2.pos.z as f64) as f32;

            dat.dz = (z2 - z1) * h1;
            dat.z = z1 + dat.dz * step_f;

            if flags.contains(InterpFlags::FLOAT_UV) {
                let fu1 = v1.uv.x * z1 * 65536.0;
                let fv1 = v1.uv.y * z1 * 65536.0;
                let fu2 = v2.uv.x * z2 * 65536.0;
                let fv2 = v2.uv.y * z2 * 65536.0;

                dat.dfu = (fu2 - fu1) * h1;
                dat.dfv = (fv2 - fv1) * h1;
                dat.fu = fu1 + dat.dfu * step_f;
                dat.fv = fv1 + dat.dfv * step_f;
            }
        }

        if flags.contains(InterpFlags::ONE_COLOR) {
            dat.dc = fixdiv(itofix(v2.color.wrapping_sub(v1.color)), h);
            dat.c = itofix(v1.color).wrapping_add(fixmul(step, dat.dc));
        }

        if flags.contains(InterpFlags::THREE_COLOR) {
            let [r1, g1, b1] = unpack_rgb(v1.color);
            let [r2, g2, b2] = unpack_rgb(v2.color);

            dat.dr = fixdiv(itofix(r2 - r1), h);
            dat.dg = fixdiv(itofix(g2 - g1), h);
            dat.db = fixdiv(itofix(b2 - b1), h);
            dat.r = itofix(r1).wrapping_add(fixmul(step, dat.dr));
            dat.g = itofix(g1).wrapping_add(fixmul(step, dat.dg));
            dat.b = itofix(b1).wrapping_add(fixmul(step, dat.db));
        }

        if flags.contains(InterpFlags::FIX_UV) {
            dat.du = ftofix(((v2.uv.x - v1.uv.x) * h1) as f64);
            dat.dv = ftofix(((v2.uv.y - v1.uv.y) * h1) as f64);
            dat.u = ftofix(v1.uv.x as f64).wrapping_add(fixmul(step, dat.du));
            dat.v = ftofix(v1.uv.y as f64).wrapping_add(fixmul(step, dat.dv));
        }

        if edge.top < clip.top {
            let gap = clip.top - edge.top;
            edge.top = clip.top;
            edge.x = edge.x.wrapping_add(gap.wrapping_mul(edge.dx));
            edge.dat.skip(gap, flags);
        }
        edge.bottom = edge.bottom.min(clip.bottom - 1);

        (edge.bottom >= edge.top).then_some(edge)
    }

    /// Builds the 2D edge between two integer points.
    ///
    /// `x` starts at the pixel centre of the upper point; negative slopes
    /// start half a step early so `x..x + w` spans the pixels the edge
    /// crosses on that scanline.
    pub fn for_2d(p1: (i32, i32), p2: (i32, i32)) -> Self {
        let (p1, p2) = if p2.1 < p1.1 { (p2, p1) } else { (p1, p2) };

        let run = p2.0.wrapping_sub(p1.0) << POLYGON_FIX_SHIFT;
        let dx = if p2.1 != p1.1 {
            run.wrapping_div(p2.1.wrapping_sub(p1.1))
        } else {
            run << 1
        };

        let mut x = (p1.0 << POLYGON_FIX_SHIFT).wrapping_add(1 << (POLYGON_FIX_SHIFT - 1));
        if dx < 0 {
            x = x.wrapping_add(dx / 2);
        }

        PolygonEdge {
            top: p1.1,
            bottom: p2.1,
            x,
            dx,
            w: dx.wrapping_abs().wrapping_sub(1).max(0),
            ..Default::default()
        }
    }
}

/// Ordering used when inserting into a 2D edge list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SortBy {
    Top,
    X,
}

/// Contiguous edge storage for one draw call.
#[derive(Debug, Default)]
pub(crate) struct EdgeArena {
    edges: Vec<PolygonEdge>,
}

impl EdgeArena {
    /// Reserves room for `edges` edges up front; allocation failure aborts
    /// the draw call.
    pub fn try_with_capacity(edges: usize) -> Result<Self> {
        let mut storage = Vec::new();
        storage.try_reserve_exact(edges).map_err(|err| {
            warn!("edge table allocation for {edges} edges failed: {err}");
            RasterError::EdgeTableAlloc { edges }
        })?;
        Ok(Self { edges: storage })
    }

    pub fn push(&mut self, edge: PolygonEdge) -> usize {
        self.edges.push(edge);
        self.edges.len() - 1
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Links every edge to its neighbours in insertion order, wrapping
    /// around at the ends.
    pub fn close_ring(&mut self) {
        let n = self.edges.len();
        for (i, edge) in self.edges.iter_mut().enumerate() {
            edge.prev = Some((i + n - 1) % n);
            edge.next = Some((i + 1) % n);
        }
    }

    /// Ring neighbours; an unlinked edge is its own neighbour.
    #[inline]
    pub fn ring_prev(&self, i: usize) -> usize {
        self.edges[i].prev.unwrap_or(i)
    }

    #[inline]
    pub fn ring_next(&self, i: usize) -> usize {
        self.edges[i].next.unwrap_or(i)
    }

    /// Two distinct edges borrowed mutably at once.
    ///
    /// # Panics
    /// Panics if `a == b`.
    pub fn pair_mut(&mut self, a: usize, b: usize) -> (&mut PolygonEdge, &mut PolygonEdge) {
        assert_ne!(a, b, "edge pair must be distinct");
        if a < b {
            let (lo, hi) = self.edges.split_at_mut(b);
            (&mut lo[a], &mut hi[0])
        } else {
            let (lo, hi) = self.edges.split_at_mut(a);
            (&mut hi[0], &mut lo[b])
        }
    }

    /// Inserts `idx` into the list starting at `head`, before the first
    /// edge whose key is not smaller.
    pub fn insert_sorted(&mut self, head: &mut Option<usize>, idx: usize, by: SortBy) {
        let key = |e: &PolygonEdge| match by {
            SortBy::Top => e.top,
            SortBy::X => e.x,
        };
        let new_key = key(&self.edges[idx]);

        let mut prev = None;
        let mut pos = *head;
        while let Some(p) = pos {
            if key(&self.edges[p]) >= new_key {
                break;
            }
            prev = Some(p);
            pos = self.edges[p].next;
        }

        self.edges[idx].next = pos;
        self.edges[idx].prev = prev;
        if let Some(p) = pos {
            self.edges[p].prev = Some(idx);
        }
        match prev {
            Some(p) => self.edges[p].next = Some(idx),
            None => *head = Some(idx),
        }
    }

    /// Unlinks `idx` from the list starting at `head`.
    pub fn unlink(&mut self, head: &mut Option<usize>, idx: usize) {
        let PolygonEdge { prev, next, .. } = self.edges[idx];
        if let Some(n) = next {
            self.edges[n].prev = prev;
        }
        match prev {
            Some(p) => self.edges[p].next = next,
            None => *head = next,
        }
        self.edges[idx].prev = None;
        self.edges[idx].next = None;
    }

    /// Moves a pending edge from the `inactive` list into the x-sorted
    /// `active` list.
    pub fn activate(
        &mut self,
        inactive: &mut Option<usize>,
        active: &mut Option<usize>,
        idx: usize,
    ) {
        debug_assert_eq!(self.edges[idx].status, EdgeStatus::Pending, "edge {idx} activated twice");
        self.unlink(inactive, idx);
        self.edges[idx].status = EdgeStatus::Active;
        self.insert_sorted(active, idx, SortBy::X);
    }

    /// Drops an active edge from the `active` list for good.
    pub fn retire(&mut self, active: &mut Option<usize>, idx: usize) {
        debug_assert_eq!(self.edges[idx].status, EdgeStatus::Active, "edge {idx} is not active");
        self.unlink(active, idx);
        self.edges[idx].status = EdgeStatus::Retired;
    }

    /// Moves `idx` towards the head while it sorts before its predecessor.
    pub fn bubble_back(&mut self, head: &mut Option<usize>, idx: usize) {
        while let Some(p) = self.edges[idx].prev {
            if self.edges[idx].x >= self.edges[p].x {
                break;
            }
            let next = self.edges[idx].next;
            let before = self.edges[p].prev;

            if let Some(n) = next {
                self.edges[n].prev = Some(p);
            }
            self.edges[p].next = next;
            self.edges[p].prev = Some(idx);
            self.edges[idx].next = Some(p);
            self.edges[idx].prev = before;
            match before {
                Some(b) => self.edges[b].next = Some(idx),
                None => *head = Some(idx),
            }
        }
    }
}

impl std::ops::Index<usize> for EdgeArena {
    type Output = PolygonEdge;
    fn index(&self, idx: usize) -> &PolygonEdge {
        &self.edges[idx]
    }
}

impl std::ops::IndexMut<usize> for EdgeArena {
    fn index_mut(&mut self, idx: usize) -> &mut PolygonEdge {
        &mut self.edges[idx]
    }
}
