//! Whole-pipeline properties of the public drawing entry points.

use palette_raster::prelude::*;
use palette_raster::MASK_COLOR;

const BACKGROUND: u8 = 0xAA;

fn flat(x: f32, y: f32, color: i32) -> Vertex {
    Vertex::new(x, y, 1.0, 0.0, 0.0, color)
}

fn textured(x: f32, y: f32, z: f32, u: f32, v: f32) -> Vertex {
    Vertex::new(x, y, z, u, v, 0)
}

/// 8x8 texture with distinct non-zero texels.
fn distinct_texture() -> Texture {
    Texture::from_indices(8, 8, (0..64).map(|i| ((i * 7) % 63 + 1) as u8).collect()).unwrap()
}

fn rows(bitmap: &Bitmap, from: u32) -> Vec<Vec<u8>> {
    (from..bitmap.height())
        .map(|y| bitmap.row(y as usize).to_vec())
        .collect()
}

#[test]
fn flat_triangle_fills_55_cells() {
    let v = [flat(0.0, 0.0, 7), flat(10.0, 0.0, 7), flat(0.0, 10.0, 7)];
    let r = PolygonRasterizer::new();

    let mut tri = Bitmap::new(20, 20);
    tri.set_clipping(false);
    r.triangle3d(&mut tri, PolygonType::Flat, None, &v[0], &v[1], &v[2])
        .unwrap();

    let mut poly = Bitmap::new(20, 20);
    poly.set_clipping(false);
    r.polygon3d(&mut poly, PolygonType::Flat, None, &v).unwrap();

    for bitmap in [&tri, &poly] {
        for y in 0..20 {
            for x in 0..20 {
                let expected = if x + y < 10 { 7 } else { 0 };
                assert_eq!(bitmap.getpixel(x, y), Some(expected), "({x}, {y})");
            }
        }
    }
}

#[test]
fn two_by_two_texture_magnifies_twice() {
    let texture = Texture::from_indices(2, 2, vec![3, 5, 7, 9]).unwrap();
    let quad = [
        textured(0.0, 0.0, 1.0, 0.0, 0.0),
        textured(4.0, 0.0, 1.0, 2.0, 0.0),
        textured(4.0, 1.0, 1.0, 2.0, 1.0),
        textured(0.0, 1.0, 1.0, 0.0, 1.0),
    ];

    for ty in [PolygonType::Atex, PolygonType::Ptex] {
        let mut bitmap = Bitmap::new(8, 4);
        PolygonRasterizer::new()
            .polygon3d(&mut bitmap, ty, Some(&texture), &quad)
            .unwrap();
        assert_eq!(bitmap.row(0), &[3, 3, 5, 5, 0, 0, 0, 0], "{ty}");
        for y in 1..4 {
            assert_eq!(bitmap.row(y), &[0; 8], "{ty}");
        }
    }
}

#[test]
fn perspective_matches_affine_at_constant_depth() {
    let texture = distinct_texture();
    let r = PolygonRasterizer::new();

    for z in [0.5, 1.0, 2.0] {
        let q = [
            textured(1.0, 1.0, z, 0.0, 0.0),
            textured(17.0, 1.0, z, 8.0, 0.0),
            textured(17.0, 17.0, z, 8.0, 8.0),
            textured(1.0, 17.0, z, 0.0, 8.0),
        ];

        let mut affine = Bitmap::new(24, 24);
        let mut persp = Bitmap::new(24, 24);
        r.quad3d(&mut affine, PolygonType::Atex, Some(&texture), &q[0], &q[1], &q[2], &q[3])
            .unwrap();
        r.quad3d(&mut persp, PolygonType::Ptex, Some(&texture), &q[0], &q[1], &q[2], &q[3])
            .unwrap();
        assert_eq!(affine.pixels(), persp.pixels(), "quad at z = {z}");
        assert!(affine.pixels().iter().any(|&p| p != 0));

        let mut affine = Bitmap::new(24, 24);
        let mut persp = Bitmap::new(24, 24);
        r.triangle3d(&mut affine, PolygonType::Atex, Some(&texture), &q[0], &q[1], &q[2])
            .unwrap();
        r.triangle3d(&mut persp, PolygonType::Ptex, Some(&texture), &q[0], &q[1], &q[2])
            .unwrap();
        assert_eq!(affine.pixels(), persp.pixels(), "triangle at z = {z}");
    }
}

#[test]
fn perspective_matches_affine_with_fractional_vertices() {
    let texture = distinct_texture();
    let r = PolygonRasterizer::new();
    let q = [
        textured(1.3, 0.7, 2.0, 0.5, 0.25),
        textured(15.6, 2.2, 2.0, 7.5, 0.5),
        textured(13.1, 14.9, 2.0, 6.0, 7.75),
        textured(2.4, 12.5, 2.0, 0.25, 6.5),
    ];

    let mut affine = Bitmap::new(24, 24);
    let mut persp = Bitmap::new(24, 24);
    r.polygon3d(&mut affine, PolygonType::Atex, Some(&texture), &q)
        .unwrap();
    r.polygon3d(&mut persp, PolygonType::Ptex, Some(&texture), &q)
        .unwrap();
    assert_eq!(affine.pixels(), persp.pixels());

    let mut affine = Bitmap::new(24, 24);
    let mut persp = Bitmap::new(24, 24);
    r.triangle3d(&mut affine, PolygonType::Atex, Some(&texture), &q[0], &q[1], &q[2])
        .unwrap();
    r.triangle3d(&mut persp, PolygonType::Ptex, Some(&texture), &q[0], &q[1], &q[2])
        .unwrap();
    assert_eq!(affine.pixels(), persp.pixels());
}

#[test]
fn masked_types_never_write_mask_color() {
    let texture = Texture::checkerboard(8, 2, 0x1C, MASK_COLOR).unwrap();
    let map = ColorMap::identity();
    let r = PolygonRasterizer::new().with_color_map(&map);
    let v = [
        Vertex::new(2.0, 1.0, 1.5, 0.0, 0.0, 255),
        Vertex::new(30.0, 4.0, 3.0, 16.0, 0.0, 255),
        Vertex::new(27.0, 29.0, 2.0, 16.0, 16.0, 255),
        Vertex::new(3.0, 26.0, 1.0, 0.0, 16.0, 255),
    ];

    for ty in PolygonType::ALL.into_iter().filter(|t| t.is_masked()) {
        let mut bitmap = Bitmap::new(32, 32);
        bitmap.clear(BACKGROUND);
        r.polygon3d(&mut bitmap, ty, Some(&texture), &v).unwrap();
        r.triangle3d(&mut bitmap, ty, Some(&texture), &v[0], &v[1], &v[2])
            .unwrap();

        assert!(!bitmap.pixels().contains(&MASK_COLOR), "{ty}");
        assert!(bitmap.pixels().contains(&BACKGROUND), "{ty}");
    }

    // unmasked types do draw the sentinel
    let mut bitmap = Bitmap::new(32, 32);
    bitmap.clear(BACKGROUND);
    r.polygon3d(&mut bitmap, PolygonType::Atex, Some(&texture), &v)
        .unwrap();
    assert!(bitmap.pixels().contains(&MASK_COLOR));
}

#[test]
fn nothing_is_written_outside_the_clip_rect() {
    let texture = distinct_texture();
    let map = ColorMap::from_fn(|row, col| row ^ col | 1);
    let rgb_map = RgbMap::from_fn(|r, g, b| r ^ g ^ b | 1);
    let r = PolygonRasterizer::new()
        .with_color_map(&map)
        .with_rgb_map(&rgb_map);

    // larger than the bitmap on every side
    let shapes: [[Vertex; 4]; 2] = [
        [
            Vertex::new(-20.0, -15.0, 1.0, 0.0, 0.0, 0x102030),
            Vertex::new(60.0, -8.0, 2.0, 8.0, 0.0, 0xFF8000),
            Vertex::new(55.0, 50.0, 4.0, 8.0, 8.0, 0x00FF00),
            Vertex::new(-12.0, 45.0, 2.0, 0.0, 8.0, 0x0000FF),
        ],
        [
            Vertex::new(9.3, 3.7, 1.0, 0.0, 0.0, 40),
            Vertex::new(26.1, 10.2, 1.0, 8.0, 0.0, 200),
            Vertex::new(20.8, 27.5, 1.0, 8.0, 8.0, 120),
            Vertex::new(4.4, 22.9, 1.0, 0.0, 8.0, 90),
        ],
    ];

    for ty in PolygonType::ALL {
        for v in &shapes {
            let mut bitmap = Bitmap::new(32, 32);
            bitmap.clear(BACKGROUND);
            bitmap.set_clip_rect(7, 5, 21, 18);
            let clip = bitmap.clip_rect();

            r.polygon3d(&mut bitmap, ty, Some(&texture), v).unwrap();
            r.triangle3d(&mut bitmap, ty, Some(&texture), &v[0], &v[2], &v[3])
                .unwrap();

            for y in 0..32 {
                for x in 0..32 {
                    if !clip.contains(x, y) {
                        assert_eq!(bitmap.getpixel(x, y), Some(BACKGROUND), "{ty} ({x}, {y})");
                    }
                }
            }
        }
    }

    let mut bitmap = Bitmap::new(32, 32);
    bitmap.clear(BACKGROUND);
    bitmap.set_clip_rect(7, 5, 21, 18);
    let clip = bitmap.clip_rect();
    r.polygon(&mut bitmap, &[(-5, -5), (40, 2), (30, 40), (0, 25)], 3)
        .unwrap();
    for y in 0..32 {
        for x in 0..32 {
            let expected = if clip.contains(x, y) { 3 } else { BACKGROUND };
            assert_eq!(bitmap.getpixel(x, y), Some(expected), "({x}, {y})");
        }
    }
}

#[test]
fn disabled_clipping_draws_whole_bitmap_only() {
    let mut bitmap = Bitmap::new(16, 16);
    bitmap.set_clip_rect(4, 4, 8, 8);
    bitmap.set_clipping(false);
    let v = [
        flat(-10.0, -10.0, 5),
        flat(40.0, -10.0, 5),
        flat(40.0, 40.0, 5),
        flat(-10.0, 40.0, 5),
    ];
    PolygonRasterizer::new()
        .polygon3d(&mut bitmap, PolygonType::Flat, None, &v)
        .unwrap();
    assert!(bitmap.pixels().iter().all(|&p| p == 5));
}

#[test]
fn top_clip_keeps_interpolated_values() {
    let tri = [flat(3.5, 1.2, 10), flat(18.7, 6.4, 200), flat(6.1, 19.3, 90)];
    let r = PolygonRasterizer::new();

    let mut full_tri = Bitmap::new(24, 24);
    r.triangle3d(&mut full_tri, PolygonType::Gcol, None, &tri[0], &tri[1], &tri[2])
        .unwrap();
    let mut full_poly = Bitmap::new(24, 24);
    r.polygon3d(&mut full_poly, PolygonType::Gcol, None, &tri)
        .unwrap();

    for n in [1, 4, 7, 9] {
        let mut clipped = Bitmap::new(24, 24);
        clipped.set_clip_rect(0, n, 23, 23);
        r.triangle3d(&mut clipped, PolygonType::Gcol, None, &tri[0], &tri[1], &tri[2])
            .unwrap();
        assert_eq!(rows(&clipped, n as u32), rows(&full_tri, n as u32), "triangle n = {n}");
        assert!(clipped.pixels()[..24 * n as usize].iter().all(|&p| p == 0));

        let mut clipped = Bitmap::new(24, 24);
        clipped.set_clip_rect(0, n, 23, 23);
        r.polygon3d(&mut clipped, PolygonType::Gcol, None, &tri)
            .unwrap();
        assert_eq!(rows(&clipped, n as u32), rows(&full_poly, n as u32), "polygon n = {n}");
    }
}

#[test]
fn top_clip_keeps_texture_coordinates() {
    let texture = distinct_texture();
    let r = PolygonRasterizer::new();
    let tri = [
        textured(3.5, 1.2, 2.0, 0.0, 0.0),
        textured(18.7, 6.4, 2.0, 7.5, 1.0),
        textured(6.1, 19.3, 2.0, 1.0, 7.5),
    ];

    for ty in [PolygonType::Atex, PolygonType::Ptex] {
        let mut full = Bitmap::new(24, 24);
        r.triangle3d(&mut full, ty, Some(&texture), &tri[0], &tri[1], &tri[2])
            .unwrap();
        for n in [2, 5, 8] {
            let mut clipped = Bitmap::new(24, 24);
            clipped.set_clip_rect(0, n, 23, 23);
            r.triangle3d(&mut clipped, ty, Some(&texture), &tri[0], &tri[1], &tri[2])
                .unwrap();
            assert_eq!(rows(&clipped, n as u32), rows(&full, n as u32), "{ty} n = {n}");
        }
    }
}

#[test]
fn left_clip_keeps_interpolated_values() {
    let tri = [flat(3.5, 1.2, 10), flat(18.7, 6.4, 200), flat(6.1, 19.3, 90)];
    let r = PolygonRasterizer::new();
    let mut full = Bitmap::new(24, 24);
    r.triangle3d(&mut full, PolygonType::Gcol, None, &tri[0], &tri[1], &tri[2])
        .unwrap();

    for n in [2, 5, 8] {
        let mut clipped = Bitmap::new(24, 24);
        clipped.set_clip_rect(n, 0, 23, 23);
        r.triangle3d(&mut clipped, PolygonType::Gcol, None, &tri[0], &tri[1], &tri[2])
            .unwrap();
        for y in 0..24 {
            for x in 0..24 {
                let expected = if x >= n { full.getpixel(x, y) } else { Some(0) };
                assert_eq!(clipped.getpixel(x, y), expected, "n = {n} ({x}, {y})");
            }
        }
    }
}

#[test]
fn quad_equals_two_triangles_without_seam() {
    // Coverage only: the texture is uniform and every write adds one to the
    // destination, so overdraw shows up as 2. Interpolated values may differ
    // by one between the drivers, see the gradient test below.
    let map = ColorMap::from_fn(|_, dst| dst.wrapping_add(1));
    let texture = Texture::from_indices(2, 2, vec![1; 4]).unwrap();
    let r = PolygonRasterizer::new().with_color_map(&map);

    let quads = [
        (
            [
                textured(1.0, 1.0, 1.0, 0.0, 0.0),
                textured(12.0, 2.0, 1.0, 1.0, 0.0),
                textured(13.0, 11.0, 1.0, 1.0, 1.0),
                textured(2.0, 12.0, 1.0, 0.0, 1.0),
            ],
            109,
        ),
        (
            [
                textured(1.5, 1.25, 1.0, 0.0, 0.0),
                textured(12.25, 2.5, 1.0, 1.0, 0.0),
                textured(13.75, 11.5, 1.0, 1.0, 1.0),
                textured(2.25, 12.75, 1.0, 0.0, 1.0),
            ],
            114,
        ),
    ];

    for (q, covered) in quads {
        let mut whole = Bitmap::new(16, 16);
        r.quad3d(&mut whole, PolygonType::AtexTrans, Some(&texture), &q[0], &q[1], &q[2], &q[3])
            .unwrap();

        let mut halves = Bitmap::new(16, 16);
        for [a, b, c] in [[0, 1, 2], [0, 2, 3]] {
            r.triangle3d(&mut halves, PolygonType::AtexTrans, Some(&texture), &q[a], &q[b], &q[c])
                .unwrap();
        }

        assert_eq!(whole.pixels(), halves.pixels());
        assert_eq!(halves.pixels().iter().copied().max(), Some(1));
        let sum: u32 = whole.pixels().iter().map(|&p| p as u32).sum();
        assert_eq!(sum, covered);

        // flat polygons drawn translucently share the edge walk
        let trans = r.with_drawing_mode(DrawMode::Trans);
        let mut whole_flat = Bitmap::new(16, 16);
        trans
            .quad3d(&mut whole_flat, PolygonType::Flat, None, &q[0], &q[1], &q[2], &q[3])
            .unwrap();
        let mut halves_flat = Bitmap::new(16, 16);
        for [a, b, c] in [[0, 1, 2], [0, 2, 3]] {
            trans
                .triangle3d(&mut halves_flat, PolygonType::Flat, None, &q[a], &q[b], &q[c])
                .unwrap();
        }
        assert_eq!(whole_flat.pixels(), halves_flat.pixels());
        assert_eq!(whole_flat.pixels().iter().copied().max(), Some(1));
    }
}

#[test]
fn quad_and_triangles_agree_on_gradient_within_one() {
    // planar gouraud ramp, c = 10 + 4x + 3y at each corner
    let corner = |x: f32, y: f32| flat(x, y, 10 + 4 * x as i32 + 3 * y as i32);
    let q = [
        corner(1.0, 1.0),
        corner(12.0, 2.0),
        corner(13.0, 11.0),
        corner(2.0, 12.0),
    ];
    let r = PolygonRasterizer::new();

    let mut whole = Bitmap::new(16, 16);
    r.quad3d(&mut whole, PolygonType::Gcol, None, &q[0], &q[1], &q[2], &q[3])
        .unwrap();
    let mut halves = Bitmap::new(16, 16);
    r.triangle3d(&mut halves, PolygonType::Gcol, None, &q[0], &q[1], &q[2])
        .unwrap();
    r.triangle3d(&mut halves, PolygonType::Gcol, None, &q[0], &q[2], &q[3])
        .unwrap();

    let mut covered = 0;
    for (&a, &b) in whole.pixels().iter().zip(halves.pixels()) {
        assert_eq!(a != 0, b != 0);
        assert!(a.abs_diff(b) <= 1, "{a} vs {b}");
        covered += (a != 0) as u32;
    }
    assert_eq!(covered, 109);
}

#[test]
fn lit_texture_follows_light_level() {
    let palette = Palette::rgb332();
    let rgb_map = palette.rgb_map();
    let lighting = palette.lighting_map(&rgb_map);
    let texture = Texture::checkerboard(8, 2, 0xFC, 0x1C).unwrap();
    let r = PolygonRasterizer::new().with_color_map(&lighting);

    let quad = |light: i32| {
        [
            Vertex::new(0.0, 0.0, 1.0, 0.0, 0.0, light),
            Vertex::new(16.0, 0.0, 1.0, 8.0, 0.0, light),
            Vertex::new(16.0, 16.0, 1.0, 8.0, 8.0, light),
            Vertex::new(0.0, 16.0, 1.0, 0.0, 8.0, light),
        ]
    };

    for ty in [PolygonType::AtexLit, PolygonType::PtexLit] {
        let mut bright = Bitmap::new(16, 16);
        r.polygon3d(&mut bright, ty, Some(&texture), &quad(255))
            .unwrap();
        assert!(bright.pixels().iter().all(|&p| p == 0xFC || p == 0x1C), "{ty}");
        assert!(bright.pixels().contains(&0xFC) && bright.pixels().contains(&0x1C));

        let mut dark = Bitmap::new(16, 16);
        r.polygon3d(&mut dark, ty, Some(&texture), &quad(0)).unwrap();
        let black = rgb_map.makecol(0, 0, 0);
        assert!(dark.pixels().iter().all(|&p| p == black), "{ty}");
    }
}

#[test]
fn rgb_gouraud_maps_through_rgb_map() {
    let palette = Palette::rgb332();
    let rgb_map = palette.rgb_map();
    let red = [
        Vertex::new(1.0, 1.0, 1.0, 0.0, 0.0, 0xFF0000),
        Vertex::new(14.0, 2.0, 1.0, 0.0, 0.0, 0xFF0000),
        Vertex::new(7.0, 14.0, 1.0, 0.0, 0.0, 0xFF0000),
    ];

    let mut bitmap = Bitmap::new(16, 16);
    bitmap.clear(BACKGROUND);
    PolygonRasterizer::new()
        .with_rgb_map(&rgb_map)
        .triangle3d(&mut bitmap, PolygonType::Grgb, None, &red[0], &red[1], &red[2])
        .unwrap();
    let drawn: Vec<u8> = bitmap
        .pixels()
        .iter()
        .copied()
        .filter(|&p| p != BACKGROUND)
        .collect();
    assert!(!drawn.is_empty());
    assert!(drawn.iter().all(|&p| p == 0xE0));

    // without a table every pixel resolves to index 0
    let mut bitmap = Bitmap::new(16, 16);
    bitmap.clear(BACKGROUND);
    PolygonRasterizer::new()
        .triangle3d(&mut bitmap, PolygonType::Grgb, None, &red[0], &red[1], &red[2])
        .unwrap();
    assert!(bitmap.pixels().contains(&0));
}

#[test]
fn two_dimensional_shapes() {
    let r = PolygonRasterizer::new();

    let mut bitmap = Bitmap::new(12, 12);
    r.polygon(&mut bitmap, &[(2, 2), (6, 2), (6, 5), (2, 5)], 1)
        .unwrap();
    assert_eq!(bitmap.pixels().iter().filter(|&&p| p == 1).count(), 20);

    let mut bitmap = Bitmap::new(12, 12);
    r.triangle(&mut bitmap, 0, 0, 10, 0, 0, 10, 1).unwrap();
    for y in 0..12 {
        for x in 0..12 {
            assert_eq!(bitmap.getpixel(x, y), Some((x + y <= 10) as u8), "({x}, {y})");
        }
    }
}
