//! The 8-integer metadata block stamped on every dataset.
//!
//! This block is the *only* source of truth for a dataset's shape and
//! on-disk layout: once written it is immutable, and every read of the
//! dataset must go through it rather than trusting a caller's restated
//! shape. The wire width is fixed at 8 `i32`s regardless of rank (1-D/2-D
//! callers simply carry unused extents of 1) so the format never has to
//! distinguish "how many axes" at the attribute level.

use esio_core::{sanity, EsioResult};

pub const METADATA_LEN: usize = 8;

/// Current format version stamped into every metadata block written by this
/// crate. Bumping `MAJOR` without a migration path is the one thing
/// `esio-metadata` explicitly does not support (schema evolution across major
/// versions is out of scope).
pub const FORMAT_MAJOR: i32 = 0;
pub const FORMAT_MINOR: i32 = 1;
pub const FORMAT_PATCH: i32 = 0;

/// Global shape and bookkeeping carried as an 8-`i32` attribute on a dataset.
///
/// Field order on the wire is `[major, minor, patch, layout_tag, c, b, a,
/// ncomponents]`, kept stable so a reader always knows the field order
/// without consulting anything but this struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetadataBlock {
    pub major: i32,
    pub minor: i32,
    pub patch: i32,
    pub layout_tag: u32,
    pub c: u64,
    pub b: u64,
    pub a: u64,
    pub ncomponents: u32,
}

impl MetadataBlock {
    pub fn new(layout_tag: u32, c: u64, b: u64, a: u64, ncomponents: u32) -> Self {
        Self {
            major: FORMAT_MAJOR,
            minor: FORMAT_MINOR,
            patch: FORMAT_PATCH,
            layout_tag,
            c,
            b,
            a,
            ncomponents,
        }
    }

    /// Encode to the wire representation: 8 `i32`s, global extents clamped to
    /// what fits (shapes in practice never approach `i32::MAX` per axis).
    pub fn to_wire(self) -> [i32; METADATA_LEN] {
        [
            self.major,
            self.minor,
            self.patch,
            self.layout_tag as i32,
            self.c as i32,
            self.b as i32,
            self.a as i32,
            self.ncomponents as i32,
        ]
    }

    /// Decode from the wire representation, validating the layout tag falls
    /// within `layout_count` and every shape/component field is non-negative.
    ///
    /// Does not itself talk to the reporter: callers reading a metadata block
    /// to probe dataset existence run this inside a
    /// [`esio_core::SuspendedReporter`] scope.
    pub fn from_wire(raw: [i32; METADATA_LEN], layout_count: u32) -> EsioResult<Self> {
        let [major, minor, patch, layout_tag, c, b, a, ncomponents] = raw;
        if layout_tag < 0 || layout_tag as u32 >= layout_count {
            return Err(sanity(format!(
                "metadata contains unknown layout_tag {layout_tag} (registry size {layout_count})"
            )));
        }
        if c < 0 || b < 0 || a < 0 || ncomponents <= 0 {
            return Err(sanity(
                "metadata contains a negative extent or non-positive ncomponents",
            ));
        }
        Ok(Self {
            major,
            minor,
            patch,
            layout_tag: layout_tag as u32,
            c: c as u64,
            b: b as u64,
            a: a as u64,
            ncomponents: ncomponents as u32,
        })
    }

    pub fn shape(&self) -> (u64, u64, u64) {
        (self.c, self.b, self.a)
    }
}

/// Sentinel-guarded buffer used while probing a dataset's metadata attribute.
///
/// Requests one slot more than the block occupies, poisons it with a
/// sentinel before the read, and treats any change to that slot as proof
/// the substrate over-wrote the buffer, rather than trusting the
/// substrate's own length reporting.
#[derive(Debug, Clone, Copy)]
pub struct ProbeBuffer {
    raw: [i32; METADATA_LEN + 1],
}

const SENTINEL: i32 = i32::MIN + 999_983;

impl ProbeBuffer {
    pub fn new() -> Self {
        let mut raw = [0; METADATA_LEN + 1];
        raw[METADATA_LEN] = SENTINEL;
        Self { raw }
    }

    pub fn as_mut_metadata_slice(&mut self) -> &mut [i32] {
        &mut self.raw[..METADATA_LEN]
    }

    /// Confirm the sentinel slot is untouched, then return the metadata
    /// portion of the buffer.
    pub fn into_metadata(self) -> EsioResult<[i32; METADATA_LEN]> {
        if self.raw[METADATA_LEN] != SENTINEL {
            return Err(sanity("detected metadata buffer overflow during probe"));
        }
        let mut out = [0; METADATA_LEN];
        out.copy_from_slice(&self.raw[..METADATA_LEN]);
        Ok(out)
    }
}

impl Default for ProbeBuffer {
    fn default() -> Self {
        Self::new()
    }
}
