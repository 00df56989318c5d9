//! The pluggable on-disk layout seam: how a rank's local piece of a
//! distributed array maps onto a dataset's dense global storage order.

use esio_core::EsioResult;

use crate::piece::LocalPiece;

/// A named, versioned strategy for laying a distributed array onto a
/// dataset. Each strategy owns both directions of the transfer: packing a
/// rank's (possibly padded) local buffer into the contiguous wire order a
/// [`esio_substrate::Substrate::write_region`] call expects, and unpacking a
/// contiguous read back into that same local buffer layout.
pub trait LayoutStrategy: Send + Sync {
    /// Stable on-disk tag stamped into every dataset's metadata block.
    fn tag(&self) -> u32;

    /// File-side hyperslab selection (`start`, `count`, `stride`, each
    /// `[c, b, a]`) this piece occupies in the dataset's dense global order.
    fn file_region(&self, piece: &LocalPiece) -> ([u64; 3], [u64; 3], [u64; 3]);

    /// Gather `piece.local_elements() * ncomponents` elements (each
    /// `elem_size` bytes) out of `src`, which is laid out per-axis with
    /// `piece`'s local strides, into a contiguous row-major (`c`, `b`, `a`)
    /// buffer ready for [`esio_substrate::Substrate::write_region`].
    fn pack(&self, piece: &LocalPiece, elem_size: usize, ncomponents: u32, src: &[u8]) -> EsioResult<Vec<u8>>;

    /// Scatter a contiguous row-major buffer returned by
    /// [`esio_substrate::Substrate::read_region`] back into `dst`, which is
    /// laid out per-axis with `piece`'s local strides.
    fn unpack(
        &self,
        piece: &LocalPiece,
        elem_size: usize,
        ncomponents: u32,
        contiguous: &[u8],
        dst: &mut [u8],
    ) -> EsioResult<()>;
}
