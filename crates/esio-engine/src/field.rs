//! Core distributed-array write/read engine: the create-vs-overwrite
//! dispatch, shape/type validation cascade, and the collective transfer
//! itself, handed off to whichever layout strategy the dataset was stamped
//! with.

use tracing::{debug, instrument};

use esio_core::{failed, invalid_argument, sanity, ErrorKind, EsioError, EsioResult, SuspendedReporter};
use esio_layout::{AxisPiece, LayoutRegistry, LocalPiece};
use esio_metadata::{MetadataBlock, ProbeBuffer, ScalarKind, METADATA_LEN};
use esio_substrate::{Handle, Region, Substrate};

use crate::convert::convert_elements;

pub const METADATA_ATTR: &str = "esio_metadata";

/// One axis of a write/read request: global extent, this rank's start
/// offset, how many elements this rank owns, and the element stride of the
/// rank's local in-memory buffer along this axis.
///
/// `stride == 0` means "unset": `write_field`/`read_field` derive a tight
/// nested default from the axes that are left unset, the same way
/// `esio_layout::LocalPiece::assemble` does. A nonzero stride lets a caller
/// hand over a buffer with ghost zones or other padding without copying
/// first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisSpec {
    pub global: u64,
    pub start: u64,
    pub local: u64,
    pub stride: u64,
}

impl AxisSpec {
    /// An axis with no explicit stride: its default is derived once the
    /// other two axes are known, when the piece is assembled.
    pub fn new(global: u64, start: u64, local: u64) -> Self {
        Self {
            global,
            start,
            local,
            stride: 0,
        }
    }

    /// An axis backed by a padded local buffer with an explicit element
    /// stride (e.g. ghost zones).
    pub fn with_stride(global: u64, start: u64, local: u64, stride: u64) -> Self {
        Self {
            global,
            start,
            local,
            stride,
        }
    }

    fn validate(&self, axis: &str, ncomponents: u32) -> EsioResult<()> {
        if self.local < 1 {
            return Err(invalid_argument(format!("{axis} local extent must be >= 1")));
        }
        if self.start + self.local > self.global {
            return Err(invalid_argument(format!(
                "{axis} local piece [{}, {}) exceeds global extent {}",
                self.start,
                self.start + self.local,
                self.global
            )));
        }
        if self.stride != 0 {
            if self.stride < self.local {
                return Err(invalid_argument(format!(
                    "{axis} stride {} is narrower than the local extent {}",
                    self.stride, self.local
                )));
            }
            if self.stride % ncomponents as u64 != 0 {
                return Err(invalid_argument(format!(
                    "{axis} stride {} is not a multiple of ncomponents {}",
                    self.stride, ncomponents
                )));
            }
        }
        Ok(())
    }

    fn to_piece(self) -> AxisPiece {
        AxisPiece::new(self.global, self.start, self.local, self.stride)
    }
}

fn validate_axes(c: AxisSpec, b: AxisSpec, a: AxisSpec, ncomponents: u32) -> EsioResult<()> {
    c.validate("c", ncomponents)?;
    b.validate("b", ncomponents)?;
    a.validate("a", ncomponents)?;
    Ok(())
}

/// Reads and decodes the named dataset's metadata attribute — the single
/// probe used both to test whether the dataset exists and, when it does, to
/// recover the layout tag it was stamped with.
///
/// Runs the substrate read inside a [`SuspendedReporter`] scope and copies
/// the result through a [`ProbeBuffer`] sentinel check before decoding, so a
/// missing attribute (or a substrate that over-reports the attribute's
/// length) never reaches the process-global reporter. Pass `None` for
/// `layout_count` when the caller has no registry to validate the tag
/// against (e.g. a pure size probe).
fn metadata_block(
    substrate: &impl Substrate,
    path: &std::path::Path,
    name: &str,
    layout_count: Option<u32>,
) -> EsioResult<MetadataBlock> {
    let _suspend = SuspendedReporter::new();
    let raw = substrate.read_attribute_i32(path, Some(name), METADATA_ATTR)?;
    if raw.len() != METADATA_LEN {
        return Err(sanity(format!("metadata attribute on {name} has the wrong length")));
    }
    let mut probe = ProbeBuffer::new();
    probe.as_mut_metadata_slice().copy_from_slice(&raw);
    let wire = probe.into_metadata()?;
    MetadataBlock::from_wire(wire, layout_count.unwrap_or(u32::MAX))
}

/// Writes (creating the dataset on first use, overwriting data in place on
/// subsequent calls) `bytes` — `request_scalar`-typed elements, `ncomponents`
/// per array element — as this rank's `(c, b, a)` piece of a distributed
/// array named `name`.
#[instrument(level = "debug", target = "esio::engine", skip(handle, registry, bytes))]
pub fn write_field<S: Substrate>(
    handle: &Handle<S>,
    registry: &LayoutRegistry,
    name: &str,
    bytes: &[u8],
    request_scalar: ScalarKind,
    ncomponents: u32,
    c: AxisSpec,
    b: AxisSpec,
    a: AxisSpec,
) -> EsioResult<()> {
    if ncomponents == 0 {
        return Err(invalid_argument("ncomponents must be >= 1"));
    }
    validate_axes(c, b, a, ncomponents)?;
    let path = handle.require_writable()?.to_path_buf();
    let substrate = handle.substrate();

    let (stored_scalar, layout_tag) = match metadata_block(substrate, &path, name, Some(registry.len())) {
        Ok(block) => {
            let (shape, stored_scalar, stored_nc) = substrate.dataset_shape(&path, name)?;
            if shape != [c.global, b.global, a.global] {
                return Err(invalid_argument(format!(
                    "request shape {:?} mismatches existing field shape {shape:?}",
                    [c.global, b.global, a.global]
                )));
            }
            if stored_nc != ncomponents {
                return Err(invalid_argument("request ncomponents mismatch with existing field"));
            }
            if !request_scalar.convertible_to(stored_scalar) {
                return Err(invalid_argument("request type not convertible to existing field type"));
            }
            (stored_scalar, block.layout_tag)
        }
        Err(_) => {
            substrate.create_dataset(&path, name, &[c.global, b.global, a.global], request_scalar, ncomponents)?;
            let layout_tag = handle.default_layout_tag();
            let block = MetadataBlock::new(layout_tag, c.global, b.global, a.global, ncomponents);
            substrate.write_attribute_i32(&path, Some(name), METADATA_ATTR, &block.to_wire())?;
            (request_scalar, layout_tag)
        }
    };

    let piece = LocalPiece::assemble(c.to_piece(), b.to_piece(), a.to_piece());
    let strategy = registry.get(layout_tag)?;
    let (start, count, stride) = strategy.file_region(&piece);

    let packed = strategy.pack(&piece, request_scalar.size_bytes(), ncomponents, bytes)?;
    let converted = convert_elements(&packed, request_scalar, stored_scalar)?;

    handle.communicator().barrier();
    substrate.write_region(&path, name, Region::new(&start, &count, &stride), &converted)?;
    handle.communicator().barrier();
    debug!(target: "esio::engine", name, layout_tag, "wrote field");
    Ok(())
}

/// Reads this rank's `(c, b, a)` piece of dataset `name` into `dst`, decoding
/// it as `request_scalar`-typed elements with `ncomponents` per array
/// element.
#[instrument(level = "debug", target = "esio::engine", skip(handle, registry, dst))]
pub fn read_field<S: Substrate>(
    handle: &Handle<S>,
    registry: &LayoutRegistry,
    name: &str,
    dst: &mut [u8],
    request_scalar: ScalarKind,
    ncomponents: u32,
    c: AxisSpec,
    b: AxisSpec,
    a: AxisSpec,
) -> EsioResult<()> {
    if ncomponents == 0 {
        return Err(invalid_argument("ncomponents must be >= 1"));
    }
    validate_axes(c, b, a, ncomponents)?;
    let path = handle.require_open()?.to_path_buf();
    let substrate = handle.substrate();

    let block = metadata_block(substrate, &path, name, Some(registry.len()))
        .map_err(|_| failed(format!("unable to read field's metadata: no such field {name}")))?;
    let (shape, stored_scalar, stored_nc) = substrate.dataset_shape(&path, name)?;
    if shape != [c.global, b.global, a.global] {
        return Err(invalid_argument(format!(
            "read request shape {:?} mismatches field shape {shape:?}",
            [c.global, b.global, a.global]
        )));
    }
    if stored_nc != ncomponents {
        return Err(invalid_argument("request ncomponents mismatch with existing field"));
    }
    if !stored_scalar.convertible_to(request_scalar) {
        return Err(invalid_argument("field type not convertible to requested type"));
    }

    let piece = LocalPiece::assemble(c.to_piece(), b.to_piece(), a.to_piece());
    let strategy = registry.get(block.layout_tag)?;
    let (start, count, stride) = strategy.file_region(&piece);

    handle.communicator().barrier();
    let raw = substrate.read_region(&path, name, Region::new(&start, &count, &stride))?;
    handle.communicator().barrier();

    let converted = convert_elements(&raw, stored_scalar, request_scalar)?;
    strategy.unpack(&piece, request_scalar.size_bytes(), ncomponents, &converted, dst)?;
    debug!(target: "esio::engine", name, "read field");
    Ok(())
}

/// The global shape and component count of an existing field, without
/// validating against any particular caller-supplied shape.
///
/// A probe, not a read: queries the metadata block directly rather than the
/// payload, and a missing `name` is a normal outcome rather than a
/// diagnostic-worthy failure, so the probe's own miss is reported via
/// `new_silent` instead of the usual constructors that notify the
/// process-global reporter.
pub fn field_size<S: Substrate>(handle: &Handle<S>, name: &str) -> EsioResult<(u64, u64, u64, u32)> {
    let path = handle.require_open()?;
    let substrate = handle.substrate();
    let block = metadata_block(substrate, path, name, None).map_err(|_| {
        EsioError::new_silent(
            ErrorKind::Failed,
            format!("unable to open field's metadata: no such field {name}"),
        )
    })?;
    Ok((block.c, block.b, block.a, block.ncomponents))
}

#[cfg(test)]
mod tests {
    use super::*;
    use esio_core::SerialCommunicator;
    use esio_layout::LayoutRegistry;
    use esio_substrate::LocalSubstrate;
    use tempfile::tempdir;

    fn open_handle(dir: &std::path::Path) -> Handle<LocalSubstrate> {
        let mut h = Handle::initialize(&SerialCommunicator::default(), LocalSubstrate::new(), 0);
        h.file_create(dir.join("t.esio"), true).unwrap();
        h
    }

    fn whole_axis(n: u64) -> AxisSpec {
        AxisSpec::new(n, 0, n)
    }

    #[test]
    fn write_then_read_round_trips_f64_field() {
        let dir = tempdir().unwrap();
        let handle = open_handle(dir.path());
        let registry = LayoutRegistry::with_defaults();

        let values: Vec<f64> = (0..(2 * 3 * 4)).map(|v| v as f64).collect();
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_ne_bytes()).collect();

        write_field(
            &handle,
            &registry,
            "u",
            &bytes,
            ScalarKind::F64,
            1,
            whole_axis(2),
            whole_axis(3),
            whole_axis(4),
        )
        .unwrap();

        let mut out = vec![0u8; bytes.len()];
        read_field(
            &handle,
            &registry,
            "u",
            &mut out,
            ScalarKind::F64,
            1,
            whole_axis(2),
            whole_axis(3),
            whole_axis(4),
        )
        .unwrap();
        assert_eq!(out, bytes);
        assert_eq!(field_size(&handle, "u").unwrap(), (2, 3, 4, 1));
    }

    #[test]
    fn overwrite_with_mismatched_shape_is_rejected() {
        let dir = tempdir().unwrap();
        let handle = open_handle(dir.path());
        let registry = LayoutRegistry::with_defaults();

        let bytes = vec![0u8; 2 * 2 * 2 * 8];
        write_field(
            &handle,
            &registry,
            "u",
            &bytes,
            ScalarKind::F64,
            1,
            whole_axis(2),
            whole_axis(2),
            whole_axis(2),
        )
        .unwrap();

        let other = vec![0u8; 2 * 2 * 4 * 8];
        let err = write_field(
            &handle,
            &registry,
            "u",
            &other,
            ScalarKind::F64,
            1,
            whole_axis(2),
            whole_axis(2),
            whole_axis(4),
        )
        .unwrap_err();
        assert_eq!(err.kind(), esio_core::ErrorKind::InvalidArgument);
    }

    #[test]
    fn write_widens_then_read_narrow_type_is_rejected() {
        let dir = tempdir().unwrap();
        let handle = open_handle(dir.path());
        let registry = LayoutRegistry::with_defaults();

        let ints: Vec<i32> = vec![1, 2, 3, 4];
        let bytes: Vec<u8> = ints.iter().flat_map(|v| v.to_ne_bytes()).collect();
        write_field(
            &handle,
            &registry,
            "counts",
            &bytes,
            ScalarKind::I32,
            1,
            whole_axis(1),
            whole_axis(2),
            whole_axis(2),
        )
        .unwrap();

        // Reading i32-stored data back as f64 is a widening conversion, allowed.
        let mut widened = vec![0u8; 4 * 8];
        read_field(
            &handle,
            &registry,
            "counts",
            &mut widened,
            ScalarKind::F64,
            1,
            whole_axis(1),
            whole_axis(2),
            whole_axis(2),
        )
        .unwrap();

        // But requesting a write of f64 data into an i32-typed field is
        // narrowing and must be rejected.
        let f64_bytes = vec![0u8; 4 * 8];
        let err = write_field(
            &handle,
            &registry,
            "counts",
            &f64_bytes,
            ScalarKind::F64,
            1,
            whole_axis(1),
            whole_axis(2),
            whole_axis(2),
        )
        .unwrap_err();
        assert_eq!(err.kind(), esio_core::ErrorKind::InvalidArgument);
    }

    #[test]
    fn padded_local_buffer_round_trips_via_explicit_stride() {
        let dir = tempdir().unwrap();
        let handle = open_handle(dir.path());
        let registry = LayoutRegistry::with_defaults();

        // a-axis local buffer has 2 live elements padded to a stride of 3
        // (one ghost slot per row); c and b are single-element axes here so
        // only the a-axis stride matters.
        let padded_a = AxisSpec::with_stride(2, 0, 2, 3);
        // Stride 3 means the live elements sit at offsets 0 and 3; slots 1
        // and 2 are ghost padding never touched by pack/unpack.
        let bytes: [f64; 4] = [1.0, f64::NAN, f64::NAN, 2.0];
        let raw: Vec<u8> = bytes.iter().flat_map(|v| v.to_ne_bytes()).collect();

        write_field(
            &handle,
            &registry,
            "padded",
            &raw,
            ScalarKind::F64,
            1,
            whole_axis(1),
            whole_axis(1),
            padded_a,
        )
        .unwrap();

        let mut out = vec![0u8; 4 * 8];
        read_field(
            &handle,
            &registry,
            "padded",
            &mut out,
            ScalarKind::F64,
            1,
            whole_axis(1),
            whole_axis(1),
            padded_a,
        )
        .unwrap();

        let got: Vec<f64> = out.chunks_exact(8).map(|c| f64::from_ne_bytes(c.try_into().unwrap())).collect();
        assert_eq!(got[0], 1.0);
        assert_eq!(got[3], 2.0);
        // Slots 1 and 2 are the ghost stride gap, untouched by unpack.
    }

    #[test]
    fn field_size_on_a_missing_field_is_silent_and_distinct_from_an_existing_one() {
        let dir = tempdir().unwrap();
        let handle = open_handle(dir.path());
        let registry = LayoutRegistry::with_defaults();

        let err = field_size(&handle, "ghost").unwrap_err();
        assert_eq!(err.kind(), esio_core::ErrorKind::Failed);

        let bytes = vec![0u8; 2 * 2 * 2 * 8];
        write_field(
            &handle,
            &registry,
            "u",
            &bytes,
            ScalarKind::F64,
            1,
            whole_axis(2),
            whole_axis(2),
            whole_axis(2),
        )
        .unwrap();
        assert_eq!(field_size(&handle, "u").unwrap(), (2, 2, 2, 1));
    }

    #[test]
    fn stride_narrower_than_local_extent_is_rejected() {
        let dir = tempdir().unwrap();
        let handle = open_handle(dir.path());
        let registry = LayoutRegistry::with_defaults();
        let bad_a = AxisSpec::with_stride(4, 0, 4, 2);
        let bytes = vec![0u8; 4 * 8];
        let err = write_field(
            &handle,
            &registry,
            "bad",
            &bytes,
            ScalarKind::F64,
            1,
            whole_axis(1),
            whole_axis(1),
            bad_a,
        )
        .unwrap_err();
        assert_eq!(err.kind(), esio_core::ErrorKind::InvalidArgument);
    }
}
