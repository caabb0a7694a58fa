//! Polygon types and the scanline filler each one selects.

use bitflags::bitflags;

use super::filler::{Blend, ScanlineFiller, TextureFill};
use crate::error::{RasterError, Result};
use crate::tables::{ColorMap, RgbMap};
use crate::texture::Texture;

bitflags! {
    /// Which fields of a [`PolygonSegment`](super::segment::PolygonSegment)
    /// are interpolated for a polygon type.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct InterpFlags: u32 {
        /// Solid color, no interpolation at all.
        const FLAT            = 0x01;
        /// One fixed-point channel `c` (gouraud index or light level).
        const ONE_COLOR       = 0x02;
        /// Three fixed-point channels `r, g, b`.
        const THREE_COLOR     = 0x04;
        /// Affine fixed-point `u, v`.
        const FIX_UV          = 0x08;
        /// Float inverse depth.
        const Z               = 0x10;
        /// Float `u/z, v/z`.
        const FLOAT_UV        = 0x20;
        /// Spans with constant depth may be drawn by the affine filler.
        const FLOAT_UV_TO_FIX = 0x40;
    }
}

/// The fifteen shading/texturing combinations, in their numeric order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PolygonType {
    /// Single color from the first vertex.
    #[default]
    Flat,
    /// Gouraud over the vertex colors taken as palette indices.
    Gcol,
    /// Gouraud over packed `0xRRGGBB` vertex colors, mapped back through an
    /// [`RgbMap`].
    Grgb,
    Atex,
    Ptex,
    AtexMask,
    PtexMask,
    AtexLit,
    PtexLit,
    AtexMaskLit,
    PtexMaskLit,
    AtexTrans,
    PtexTrans,
    AtexMaskTrans,
    PtexMaskTrans,
}

impl PolygonType {
    pub const ALL: [PolygonType; 15] = [
        PolygonType::Flat,
        PolygonType::Gcol,
        PolygonType::Grgb,
        PolygonType::Atex,
        PolygonType::Ptex,
        PolygonType::AtexMask,
        PolygonType::PtexMask,
        PolygonType::AtexLit,
        PolygonType::PtexLit,
        PolygonType::AtexMaskLit,
        PolygonType::PtexMaskLit,
        PolygonType::AtexTrans,
        PolygonType::PtexTrans,
        PolygonType::AtexMaskTrans,
        PolygonType::PtexMaskTrans,
    ];

    /// Type for a numeric index, clamping out-of-range values to the
    /// nearest valid one.
    pub fn from_index(index: i32) -> Self {
        Self::ALL[index.clamp(0, Self::ALL.len() as i32 - 1) as usize]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_textured(self) -> bool {
        self.index() >= PolygonType::Atex.index()
    }

    pub fn is_perspective(self) -> bool {
        use PolygonType::*;
        matches!(
            self,
            Ptex | PtexMask | PtexLit | PtexMaskLit | PtexTrans | PtexMaskTrans
        )
    }

    pub fn is_masked(self) -> bool {
        use PolygonType::*;
        matches!(
            self,
            AtexMask | PtexMask | AtexMaskLit | PtexMaskLit | AtexMaskTrans | PtexMaskTrans
        )
    }

    pub fn is_lit(self) -> bool {
        use PolygonType::*;
        matches!(self, AtexLit | PtexLit | AtexMaskLit | PtexMaskLit)
    }

    pub fn is_trans(self) -> bool {
        use PolygonType::*;
        matches!(self, AtexTrans | PtexTrans | AtexMaskTrans | PtexMaskTrans)
    }

    /// Whether drawing this type reads a [`ColorMap`].
    pub fn needs_color_map(self) -> bool {
        self.is_lit() || self.is_trans()
    }

    pub fn flags(self) -> InterpFlags {
        match self {
            PolygonType::Flat => InterpFlags::FLAT,
            PolygonType::Gcol => InterpFlags::ONE_COLOR,
            PolygonType::Grgb => InterpFlags::THREE_COLOR,
            _ => {
                let mut flags = if self.is_perspective() {
                    InterpFlags::Z | InterpFlags::FLOAT_UV | InterpFlags::FLOAT_UV_TO_FIX
                } else {
                    InterpFlags::FIX_UV
                };
                if self.is_lit() {
                    flags |= InterpFlags::ONE_COLOR;
                }
                flags
            }
        }
    }
}

impl std::fmt::Display for PolygonType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PolygonType::Flat => "flat",
            PolygonType::Gcol => "gcol",
            PolygonType::Grgb => "grgb",
            PolygonType::Atex => "atex",
            PolygonType::Ptex => "ptex",
            PolygonType::AtexMask => "atex_mask",
            PolygonType::PtexMask => "ptex_mask",
            PolygonType::AtexLit => "atex_lit",
            PolygonType::PtexLit => "ptex_lit",
            PolygonType::AtexMaskLit => "atex_mask_lit",
            PolygonType::PtexMaskLit => "ptex_mask_lit",
            PolygonType::AtexTrans => "atex_trans",
            PolygonType::PtexTrans => "ptex_trans",
            PolygonType::AtexMaskTrans => "atex_mask_trans",
            PolygonType::PtexMaskTrans => "ptex_mask_trans",
        };
        f.write_str(name)
    }
}

/// Everything a driver needs to know about one draw call's shading.
///
/// `alternative` is the affine filler a perspective type hands a span to
/// when that span has constant depth.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SpanSetup<'a> {
    pub filler: ScanlineFiller<'a>,
    pub alternative: Option<ScanlineFiller<'a>>,
    pub flags: InterpFlags,
}

impl<'a> SpanSetup<'a> {
    /// Selects the filler for `ty`, checking that the resources it reads are
    /// present.
    pub fn new(
        ty: PolygonType,
        texture: Option<&'a Texture>,
        color_map: Option<&'a ColorMap>,
        rgb_map: Option<&'a RgbMap>,
    ) -> Result<Self> {
        let filler = match ty {
            PolygonType::Flat => ScanlineFiller::Flat,
            PolygonType::Gcol => ScanlineFiller::Gcol,
            PolygonType::Grgb => ScanlineFiller::Grgb(rgb_map),
            _ => {
                let texture = texture.ok_or(RasterError::MissingTexture(ty))?;
                let blend = if ty.needs_color_map() {
                    let map = color_map.ok_or(RasterError::MissingColorMap(ty))?;
                    if ty.is_lit() {
                        Blend::Lit(map)
                    } else {
                        Blend::Trans(map)
                    }
                } else {
                    Blend::Opaque
                };
                let fill = TextureFill {
                    texture,
                    masked: ty.is_masked(),
                    blend,
                };
                if ty.is_perspective() {
                    ScanlineFiller::Perspective(fill)
                } else {
                    ScanlineFiller::Affine(fill)
                }
            }
        };

        Ok(Self {
            filler,
            alternative: filler.affine_alternative(),
            flags: ty.flags(),
        })
    }
}
