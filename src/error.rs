//! Error type shared by every fallible entry point.

use thiserror::Error;

use crate::render::rasterizer::PolygonType;

/// Errors reported by the rasterizer and its resource constructors.
///
/// Degenerate geometry is never an error: a polygon that covers no pixel
/// simply draws nothing.
#[derive(Debug, Error)]
pub enum RasterError {
    /// The scratch edge table for a polygon could not be allocated.
    #[error("failed to allocate edge table for {edges} edges")]
    EdgeTableAlloc { edges: usize },

    /// A textured polygon type was requested without a texture.
    #[error("polygon type {0:?} needs a texture")]
    MissingTexture(PolygonType),

    /// A lit or translucent polygon type was requested without a color map.
    #[error("polygon type {0:?} needs a color map")]
    MissingColorMap(PolygonType),

    /// Texture dimensions must be powers of two no larger than 65536.
    #[error("invalid texture size {width}x{height}: dimensions must be powers of two up to 65536")]
    TextureSize { width: u32, height: u32 },

    /// Texel data does not match the declared dimensions.
    #[error("texture data has {actual} texels, expected {expected}")]
    TextureLength { expected: usize, actual: usize },

    /// Loading or saving an image file failed.
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, RasterError>;
