//! A software polygon rasterizer for 8-bit paletted bitmaps.
//!
//! Draws flat, gouraud, affine and perspective-correct textured polygons
//! (optionally masked, lit or translucent through a 256x256 color map) into
//! a [`Bitmap`] of palette indices. All rendering is done on the CPU with
//! 16.16 fixed-point edge stepping.
//!
//! # Quick Start
//!
//! ```
//! use palette_raster::prelude::*;
//!
//! let mut bitmap = Bitmap::new(64, 64);
//! let texture = Texture::checkerboard(8, 2, 15, 3)?;
//! let rasterizer = PolygonRasterizer::new();
//!
//! let v1 = Vertex::new(4.0, 4.0, 2.0, 0.0, 0.0, 0);
//! let v2 = Vertex::new(60.0, 8.0, 4.0, 8.0, 0.0, 0);
//! let v3 = Vertex::new(32.0, 60.0, 3.0, 4.0, 8.0, 0);
//! rasterizer.triangle3d(&mut bitmap, PolygonType::Ptex, Some(&texture), &v1, &v2, &v3)?;
//! # Ok::<(), palette_raster::RasterError>(())
//! ```

// Public API - exposed to library consumers
pub mod error;
pub mod math;
pub mod palette;
pub mod render;
pub mod tables;
pub mod texture;

#[cfg(feature = "viewer")]
pub mod window;

// Re-export commonly needed types at crate root for convenience
pub use error::{RasterError, Result};
pub use palette::{Palette, Rgb};
pub use render::bitmap::{Bitmap, ClipRect};
pub use render::rasterizer::{
    DrawMode, InterpFlags, PolygonRasterizer, PolygonType, Vertex, MASK_COLOR,
};
pub use tables::{ColorMap, RgbMap};
pub use texture::Texture;

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use palette_raster::prelude::*;
/// ```
pub mod prelude {
    // Destination
    pub use crate::render::bitmap::{Bitmap, ClipRect};

    // Rasterizer
    pub use crate::render::rasterizer::{DrawMode, PolygonRasterizer, PolygonType, Vertex};

    // Resources
    pub use crate::palette::{Palette, Rgb};
    pub use crate::tables::{ColorMap, RgbMap};
    pub use crate::texture::Texture;

    // Math
    pub use crate::math::fixed::{fixtof, ftofix, itofix, Fixed};
    pub use crate::math::vec2::Vec2;
    pub use crate::math::vec3::Vec3;

    pub use crate::error::RasterError;
}

/// Module exposing internals for benchmarking. Not part of the stable API.
pub mod bench {
    pub use crate::math::fixed::{fixceil, fixdiv, fixmul, ftofix};
    pub use crate::render::bitmap::Bitmap;
    pub use crate::render::rasterizer::{PolygonRasterizer, PolygonType, Vertex};
    pub use crate::tables::ColorMap;
    pub use crate::texture::Texture;
}
