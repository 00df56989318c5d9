//! Per-axis descriptors for a rank's slice of a distributed 3-D array.

/// One axis of a rank's local piece of a distributed array: the global
/// extent, this rank's starting offset into the global extent, how many
/// elements this rank owns along the axis, and the element stride of the
/// rank's *local* in-memory buffer along the axis (not the file) — the
/// number of elements to advance for each unit step of this axis's index,
/// independent of the other two axes.
///
/// `stride` lets a caller hand over a buffer with ghost zones or other
/// padding without copying first. `stride == 0` means "unset": leave it to
/// [`LocalPiece::assemble`] to derive a tight nested default from the axes
/// that *are* pinned down, since a correct default for one axis generally
/// depends on its neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisPiece {
    pub global: u64,
    pub start: u64,
    pub local: u64,
    pub stride: u64,
}

impl AxisPiece {
    pub fn new(global: u64, start: u64, local: u64, stride: u64) -> Self {
        Self {
            global,
            start,
            local,
            stride,
        }
    }

    /// Axis with no explicit stride: `LocalPiece::assemble` fills one in.
    pub fn contiguous(global: u64, start: u64, local: u64) -> Self {
        Self::new(global, start, local, 0)
    }
}

/// This rank's local piece of a distributed 3-D array: the slowest (`c`),
/// middle (`b`), and fastest (`a`) axes, in that row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalPiece {
    pub c: AxisPiece,
    pub b: AxisPiece,
    pub a: AxisPiece,
}

impl LocalPiece {
    /// Assembles a piece from three axes exactly as given, strides included.
    /// A `stride == 0` axis is taken literally — use [`Self::assemble`]
    /// instead when any axis should get a derived default.
    pub fn new(c: AxisPiece, b: AxisPiece, a: AxisPiece) -> Self {
        Self { c, b, a }
    }

    /// Assembles a piece, deriving a tight nested stride for any axis left
    /// at `stride == 0`: the fastest axis (`a`) defaults to 1, and each
    /// coarser axis defaults to enough to clear one full pass of the axis
    /// immediately inside it (`local * stride`), so axes that *are* pinned
    /// to an explicit, padded stride are never overrun by a sibling's
    /// default.
    pub fn assemble(c: AxisPiece, b: AxisPiece, a: AxisPiece) -> Self {
        let a = AxisPiece {
            stride: if a.stride == 0 { 1 } else { a.stride },
            ..a
        };
        let b = AxisPiece {
            stride: if b.stride == 0 { a.local * a.stride } else { b.stride },
            ..b
        };
        let c = AxisPiece {
            stride: if c.stride == 0 { b.local * b.stride } else { c.stride },
            ..c
        };
        Self { c, b, a }
    }

    pub fn global_shape(&self) -> (u64, u64, u64) {
        (self.c.global, self.b.global, self.a.global)
    }

    pub fn local_elements(&self) -> u64 {
        self.c.local * self.b.local * self.a.local
    }
}
