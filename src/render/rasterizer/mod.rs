//! Polygon rasterization into 8-bit paletted bitmaps.
//!
//! [`PolygonRasterizer`] is the entry point. It carries the lookup tables
//! and drawing mode a draw call may need and offers three 3D drivers that
//! share one scanline filler bank:
//!
//! - [`polygon3d`](PolygonRasterizer::polygon3d) walks an active edge ring
//!   and works for any convex polygon;
//! - [`quad3d`](PolygonRasterizer::quad3d) forwards four vertices to it;
//! - [`triangle3d`](PolygonRasterizer::triangle3d) computes span deltas once
//!   per triangle.
//!
//! [`polygon`](PolygonRasterizer::polygon) and
//! [`triangle`](PolygonRasterizer::triangle) fill flat 2D shapes on
//! integer points.

mod edge;
mod filler;
mod polygon2d;
mod polygon3d;
mod polytype;
mod segment;
mod span;
mod triangle3d;

pub use filler::MASK_COLOR;
pub use polytype::{InterpFlags, PolygonType};

use log::{debug, trace};

use self::polytype::SpanSetup;
use self::span::{FlatFill, SpanWriter};
use super::bitmap::Bitmap;
use crate::error::Result;
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;
use crate::tables::{ColorMap, RgbMap};
use crate::texture::Texture;

/// A polygon corner in screen space.
///
/// `color` is a palette index for flat and gouraud-index polygons, a packed
/// `0xRRGGBB` value for [`PolygonType::Grgb`] and a light level (0..=255,
/// selecting a color map row) for lit types.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vertex {
    pub pos: Vec3,
    pub uv: Vec2,
    pub color: i32,
}

impl Vertex {
    pub const fn new(x: f32, y: f32, z: f32, u: f32, v: f32, color: i32) -> Self {
        Self {
            pos: Vec3::new(x, y, z),
            uv: Vec2::new(u, v),
            color,
        }
    }
}

/// How flat spans are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawMode {
    #[default]
    Solid,
    /// Each pixel becomes `color_map[color][pixel]`.
    Trans,
}

/// Rasterizer configuration for a series of draw calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolygonRasterizer<'a> {
    color_map: Option<&'a ColorMap>,
    rgb_map: Option<&'a RgbMap>,
    mode: DrawMode,
}

impl<'a> PolygonRasterizer<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table read by lit and translucent types, and by flat spans in
    /// [`DrawMode::Trans`].
    pub fn with_color_map(mut self, map: &'a ColorMap) -> Self {
        self.color_map = Some(map);
        self
    }

    /// Table [`PolygonType::Grgb`] maps interpolated colors through.
    pub fn with_rgb_map(mut self, map: &'a RgbMap) -> Self {
        self.rgb_map = Some(map);
        self
    }

    pub fn with_drawing_mode(mut self, mode: DrawMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn drawing_mode(&self) -> DrawMode {
        self.mode
    }

    fn flat_fill(&self, color: i32) -> FlatFill<'a> {
        FlatFill {
            color: color as u8,
            map: match self.mode {
                DrawMode::Solid => None,
                DrawMode::Trans => self.color_map,
            },
        }
    }

    fn setup<'s>(
        &'s self,
        ty: PolygonType,
        texture: Option<&'s Texture>,
    ) -> Result<SpanSetup<'s>> {
        SpanSetup::new(ty, texture, self.color_map, self.rgb_map)
    }

    /// Draws a triangle. Flat triangles take their color from `v1`.
    pub fn triangle3d(
        &self,
        bitmap: &mut Bitmap,
        ty: PolygonType,
        texture: Option<&Texture>,
        v1: &Vertex,
        v2: &Vertex,
        v3: &Vertex,
    ) -> Result<()> {
        trace!("triangle3d {ty}");
        let setup = self.setup(ty, texture)?;
        let mut out = SpanWriter::new(bitmap, setup, self.flat_fill(v1.color));
        triangle3d::triangle3d(&mut out, v1, v2, v3);
        Ok(())
    }

    /// Draws a quad through the general polygon driver.
    #[allow(clippy::too_many_arguments)]
    pub fn quad3d(
        &self,
        bitmap: &mut Bitmap,
        ty: PolygonType,
        texture: Option<&Texture>,
        v1: &Vertex,
        v2: &Vertex,
        v3: &Vertex,
        v4: &Vertex,
    ) -> Result<()> {
        self.polygon3d(bitmap, ty, texture, &[*v1, *v2, *v3, *v4])
    }

    /// Draws a convex polygon with vertices in winding order. Flat polygons
    /// take their color from the first vertex.
    ///
    /// Fewer than three vertices draw nothing. Concave input terminates but
    /// may be drawn incompletely.
    pub fn polygon3d(
        &self,
        bitmap: &mut Bitmap,
        ty: PolygonType,
        texture: Option<&Texture>,
        vertices: &[Vertex],
    ) -> Result<()> {
        trace!("polygon3d {ty} with {} vertices", vertices.len());
        if vertices.len() < 3 {
            debug!("polygon3d needs 3 vertices, got {}", vertices.len());
            return Ok(());
        }
        let setup = self.setup(ty, texture)?;
        let mut out = SpanWriter::new(bitmap, setup, self.flat_fill(vertices[0].color));
        polygon3d::polygon3d(&mut out, vertices)
    }

    /// Fills a 2D polygon on integer points, including its outline.
    pub fn polygon(&self, bitmap: &mut Bitmap, points: &[(i32, i32)], color: u8) -> Result<()> {
        trace!("polygon with {} points", points.len());
        polygon2d::polygon(bitmap, points, self.flat_fill(color as i32))
    }

    /// Fills a 2D triangle.
    #[allow(clippy::too_many_arguments)]
    pub fn triangle(
        &self,
        bitmap: &mut Bitmap,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        x3: i32,
        y3: i32,
        color: u8,
    ) -> Result<()> {
        self.polygon(bitmap, &[(x1, y1), (x2, y2), (x3, y3)], color)
    }
}
