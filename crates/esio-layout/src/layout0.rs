//! Layout 0: dense global 3-D storage, rank order `(c, b, a)` slowest to
//! fastest. A rank's local buffer may itself be padded (`stride > local` on
//! any axis); the file-side dataset never is.
//!
//! The packing order below walks the two outer axes one element at a time
//! and copies a contiguous run along the fastest axis, which is exactly
//! nested row-major iteration once a rank's local buffer has no ghost
//! padding.

use esio_core::{invalid_argument, EsioResult};

use crate::piece::LocalPiece;
use crate::strategy::LayoutStrategy;

pub const LAYOUT0_TAG: u32 = 0;

#[derive(Debug, Default, Clone, Copy)]
pub struct Layout0;

impl Layout0 {
    pub fn new() -> Self {
        Self
    }

    /// Flat element offset into the rank's local buffer for logical index
    /// `(k, j, i)` along `(c, b, a)`. Each axis's stride is the spacing
    /// between consecutive elements along that axis alone, so the offset is
    /// their independent sum, not a nested product — `LocalPiece::assemble`
    /// is what makes sure three independently-chosen strides don't alias.
    fn local_offset(piece: &LocalPiece, k: u64, j: u64, i: u64) -> u64 {
        k * piece.c.stride + j * piece.b.stride + i * piece.a.stride
    }
}

impl LayoutStrategy for Layout0 {
    fn tag(&self) -> u32 {
        LAYOUT0_TAG
    }

    fn file_region(&self, piece: &LocalPiece) -> ([u64; 3], [u64; 3], [u64; 3]) {
        (
            [piece.c.start, piece.b.start, piece.a.start],
            [piece.c.local, piece.b.local, piece.a.local],
            [1, 1, 1],
        )
    }

    fn pack(&self, piece: &LocalPiece, elem_size: usize, ncomponents: u32, src: &[u8]) -> EsioResult<Vec<u8>> {
        let component_size = elem_size * ncomponents as usize;
        let needed = Self::local_offset(piece, piece.c.local.max(1) - 1, piece.b.local.max(1) - 1, piece.a.local.max(1) - 1)
            as usize
            * component_size
            + component_size;
        if piece.local_elements() > 0 && src.len() < needed {
            return Err(invalid_argument(format!(
                "local buffer is {} bytes, layout needs at least {needed}",
                src.len()
            )));
        }

        let mut out = Vec::with_capacity(piece.local_elements() as usize * component_size);
        for k in 0..piece.c.local {
            for j in 0..piece.b.local {
                for i in 0..piece.a.local {
                    let offset = Self::local_offset(piece, k, j, i) as usize * component_size;
                    out.extend_from_slice(&src[offset..offset + component_size]);
                }
            }
        }
        Ok(out)
    }

    fn unpack(
        &self,
        piece: &LocalPiece,
        elem_size: usize,
        ncomponents: u32,
        contiguous: &[u8],
        dst: &mut [u8],
    ) -> EsioResult<()> {
        let component_size = elem_size * ncomponents as usize;
        let expected = piece.local_elements() as usize * component_size;
        if contiguous.len() != expected {
            return Err(invalid_argument(format!(
                "contiguous buffer is {} bytes, layout produced {expected}",
                contiguous.len()
            )));
        }

        let mut cursor = 0usize;
        for k in 0..piece.c.local {
            for j in 0..piece.b.local {
                for i in 0..piece.a.local {
                    let offset = Self::local_offset(piece, k, j, i) as usize * component_size;
                    dst[offset..offset + component_size]
                        .copy_from_slice(&contiguous[cursor..cursor + component_size]);
                    cursor += component_size;
                }
            }
        }
        Ok(())
    }
}
