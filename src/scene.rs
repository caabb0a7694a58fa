//! Demo scene: one spinning tile per polygon type, a clipped viewport and a
//! strip of 2D shapes.

use std::path::Path;

use log::info;
use palette_raster::math::vec2::Vec2;
use palette_raster::math::vec3::Vec3;
use palette_raster::{
    Bitmap, ColorMap, DrawMode, Palette, PolygonRasterizer, PolygonType, Result, RgbMap, Texture,
    Vertex, MASK_COLOR,
};

const TILE_COLUMNS: usize = 5;
const TILE_ROWS: usize = 3;
/// Distance of the tiles from the eye, in tile half-widths.
const DEPTH: f32 = 3.0;

// RGB 3-3-2 palette indices
const BACKGROUND: u8 = 0x25;
const BACKDROP: u8 = 0x92;
const FRAME: u8 = 0xFF;
const CYAN: u8 = 0x1F;
const ORANGE: u8 = 0xF0;
const GREEN: u8 = 0x1C;

pub struct Scene {
    palette: Palette,
    rgb_map: RgbMap,
    lighting: ColorMap,
    blend: ColorMap,
    texture: Texture,
    clip: bool,
}

impl Scene {
    pub fn new(texture: Option<&Path>) -> Result<Self> {
        let palette = Palette::rgb332();
        let rgb_map = palette.rgb_map();
        let lighting = palette.lighting_map(&rgb_map);
        let blend = palette.blend_map(&rgb_map, 128);

        let texture = match texture {
            Some(path) => {
                info!("loading texture {}", path.display());
                Texture::from_file(path, &rgb_map)?
            }
            None => Texture::checkerboard(64, 8, 0xFC, MASK_COLOR)?,
        };
        info!("texture is {}x{}", texture.width(), texture.height());

        Ok(Self {
            palette,
            rgb_map,
            lighting,
            blend,
            texture,
            clip: true,
        })
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    #[cfg(feature = "viewer")]
    pub fn toggle_clip(&mut self) {
        self.clip = !self.clip;
        info!("clipping {}", if self.clip { "on" } else { "off" });
    }

    pub fn render(&self, bitmap: &mut Bitmap, time: f32) -> Result<()> {
        let w = bitmap.width() as f32;
        let h = bitmap.height() as f32;

        bitmap.set_clipping(self.clip);
        bitmap.set_clip_rect(0, 0, i32::MAX, i32::MAX);
        bitmap.clear(BACKGROUND);

        let solid = PolygonRasterizer::new().with_rgb_map(&self.rgb_map);
        let lit = solid.with_color_map(&self.lighting);
        let trans = solid.with_color_map(&self.blend);

        let tile_w = w / TILE_COLUMNS as f32;
        let tile_h = h * 0.75 / TILE_ROWS as f32;
        let focal = tile_w.min(tile_h) * 0.4 * DEPTH;

        for (i, ty) in PolygonType::ALL.into_iter().enumerate() {
            let cx = tile_w * ((i % TILE_COLUMNS) as f32 + 0.5);
            let cy = tile_h * ((i / TILE_COLUMNS) as f32 + 0.5);

            if ty.is_masked() || ty.is_trans() {
                let r = (tile_w.min(tile_h) * 0.45) as i32;
                let (x, y) = (cx as i32, cy as i32);
                let diamond = [(x - r, y), (x, y - r), (x + r, y), (x, y + r)];
                solid.polygon(bitmap, &diamond, BACKDROP)?;
            }

            let rasterizer = if ty.is_lit() {
                &lit
            } else if ty.is_trans() {
                &trans
            } else {
                &solid
            };
            let q = self.tile(ty, time + i as f32 * 0.4, focal, cx, cy);
            let texture = Some(&self.texture);

            // alternate drivers so both get exercised
            if i % 2 == 0 {
                rasterizer.quad3d(bitmap, ty, texture, &q[0], &q[1], &q[2], &q[3])?;
            } else {
                rasterizer.triangle3d(bitmap, ty, texture, &q[0], &q[1], &q[2])?;
                rasterizer.triangle3d(bitmap, ty, texture, &q[0], &q[2], &q[3])?;
            }
        }

        self.viewport(bitmap, &solid, time)?;
        self.shapes(bitmap, &solid, &trans, time)?;
        Ok(())
    }

    /// A unit square spun by `angle`, textured and colored for `ty`.
    fn tile(&self, ty: PolygonType, angle: f32, focal: f32, cx: f32, cy: f32) -> [Vertex; 4] {
        let tw = self.texture.width() as f32;
        let th = self.texture.height() as f32;
        let corners = [
            (-1.0, -1.0, 0.0, 0.0),
            (1.0, -1.0, tw, 0.0),
            (1.0, 1.0, tw, th),
            (-1.0, 1.0, 0.0, th),
        ];
        let colors = match ty {
            PolygonType::Flat => [CYAN as i32; 4],
            PolygonType::Gcol => [0xE0, 0x1C, 0x03, 0xFF],
            PolygonType::Grgb => [0xFF0000, 0x00FF00, 0x0000FF, 0xFFFFFF],
            _ if ty.is_lit() => [255, 96, 192, 24],
            _ => [0; 4],
        };

        let mut out = [Vertex::default(); 4];
        for ((vertex, (x, y, u, v)), color) in out.iter_mut().zip(corners).zip(colors) {
            let pos = Vec3::new(x, y, 0.0).rotate_y(angle).rotate_x(angle * 0.6)
                + Vec3::new(0.0, 0.0, DEPTH);
            *vertex = Vertex {
                pos: pos.project(focal, cx, cy),
                uv: Vec2::new(u, v),
                color,
            };
        }
        out
    }

    /// A framed region of the bitmap's lower left with an oversized
    /// perspective hexagon clipped to it.
    fn viewport(
        &self,
        bitmap: &mut Bitmap,
        rasterizer: &PolygonRasterizer,
        time: f32,
    ) -> Result<()> {
        let w = bitmap.width() as i32;
        let h = bitmap.height() as i32;
        let (x1, y1) = (w / 16, h * 3 / 4 + h / 32);
        let (x2, y2) = (w / 2 - w / 16, h - h / 32 - 1);

        bitmap.hline(x1 - 1, y1 - 1, x2 + 1, FRAME);
        bitmap.hline(x1 - 1, y2 + 1, x2 + 1, FRAME);
        for y in y1..=y2 {
            bitmap.putpixel(x1 - 1, y, FRAME);
            bitmap.putpixel(x2 + 1, y, FRAME);
        }

        let cx = (x1 + x2) as f32 / 2.0;
        let cy = (y1 + y2) as f32 / 2.0;
        let radius = (x2 - x1) as f32 * 0.4;
        let tw = self.texture.width() as f32;

        let hexagon: Vec<Vertex> = (0..6)
            .map(|k| {
                let a = k as f32 * std::f32::consts::TAU / 6.0;
                let (s, c) = a.sin_cos();
                let pos = Vec3::new(c, s, 0.0).rotate_z(time * 0.5).rotate_x(1.1)
                    + Vec3::new(0.0, 0.0, 2.0);
                Vertex {
                    pos: pos.project(radius * 2.0, cx, cy),
                    uv: Vec2::new((c + 1.0) * tw, (s + 1.0) * tw),
                    color: 0,
                }
            })
            .collect();

        bitmap.set_clip_rect(x1, y1, x2, y2);
        let result = rasterizer.polygon3d(bitmap, PolygonType::Ptex, Some(&self.texture), &hexagon);
        bitmap.set_clip_rect(0, 0, i32::MAX, i32::MAX);
        result
    }

    /// 2D filler: a concave star, a plain triangle and a translucent band.
    fn shapes(
        &self,
        bitmap: &mut Bitmap,
        solid: &PolygonRasterizer,
        trans: &PolygonRasterizer,
        time: f32,
    ) -> Result<()> {
        let w = bitmap.width() as f32;
        let h = bitmap.height() as f32;
        let cx = w * 0.68;
        let cy = h * 0.875;
        let outer = h * 0.1;

        let star: Vec<(i32, i32)> = (0..10)
            .map(|k| {
                let r = if k % 2 == 0 { outer } else { outer * 0.45 };
                let a = time * 0.8 + k as f32 * std::f32::consts::PI / 5.0;
                ((cx + r * a.cos()) as i32, (cy + r * a.sin()) as i32)
            })
            .collect();
        solid.polygon(bitmap, &star, ORANGE)?;

        let tx = (w * 0.88) as i32;
        let ty = (h * 0.8) as i32;
        let s = (outer * 0.9) as i32;
        solid.triangle(bitmap, tx - s, ty + s, tx + s, ty + s, tx, ty - s / 2, GREEN)?;

        let band_y = (h * 0.86) as i32;
        let band = [
            ((w * 0.55) as i32, band_y),
            ((w * 0.97) as i32, band_y - 4),
            ((w * 0.97) as i32, band_y + 6),
            ((w * 0.55) as i32, band_y + 10),
        ];
        trans
            .with_drawing_mode(DrawMode::Trans)
            .polygon(bitmap, &band, CYAN)
    }
}
