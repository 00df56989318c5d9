//! 1-D "line" and 2-D "plane" conveniences: thin wrappers around the 3-D
//! engine with the unused axes collapsed to a single, whole, unpartitioned
//! extent, so lower-rank data reuses the same validation and transfer path
//! instead of a separate implementation.

use esio_core::EsioResult;
use esio_layout::LayoutRegistry;
use esio_metadata::ScalarKind;
use esio_substrate::{Handle, Substrate};

use crate::field::{field_size, read_field, write_field, AxisSpec};

fn degenerate_axis() -> AxisSpec {
    AxisSpec::new(1, 0, 1)
}

#[allow(clippy::too_many_arguments)]
pub fn line_write<S: Substrate>(
    handle: &Handle<S>,
    registry: &LayoutRegistry,
    name: &str,
    bytes: &[u8],
    scalar: ScalarKind,
    ncomponents: u32,
    a: AxisSpec,
) -> EsioResult<()> {
    write_field(
        handle,
        registry,
        name,
        bytes,
        scalar,
        ncomponents,
        degenerate_axis(),
        degenerate_axis(),
        a,
    )
}

#[allow(clippy::too_many_arguments)]
pub fn line_read<S: Substrate>(
    handle: &Handle<S>,
    registry: &LayoutRegistry,
    name: &str,
    dst: &mut [u8],
    scalar: ScalarKind,
    ncomponents: u32,
    a: AxisSpec,
) -> EsioResult<()> {
    read_field(
        handle,
        registry,
        name,
        dst,
        scalar,
        ncomponents,
        degenerate_axis(),
        degenerate_axis(),
        a,
    )
}

pub fn line_size<S: Substrate>(handle: &Handle<S>, name: &str) -> EsioResult<(u64, u32)> {
    let (_, _, a, ncomponents) = field_size(handle, name)?;
    Ok((a, ncomponents))
}

#[allow(clippy::too_many_arguments)]
pub fn plane_write<S: Substrate>(
    handle: &Handle<S>,
    registry: &LayoutRegistry,
    name: &str,
    bytes: &[u8],
    scalar: ScalarKind,
    ncomponents: u32,
    b: AxisSpec,
    a: AxisSpec,
) -> EsioResult<()> {
    write_field(handle, registry, name, bytes, scalar, ncomponents, degenerate_axis(), b, a)
}

#[allow(clippy::too_many_arguments)]
pub fn plane_read<S: Substrate>(
    handle: &Handle<S>,
    registry: &LayoutRegistry,
    name: &str,
    dst: &mut [u8],
    scalar: ScalarKind,
    ncomponents: u32,
    b: AxisSpec,
    a: AxisSpec,
) -> EsioResult<()> {
    read_field(handle, registry, name, dst, scalar, ncomponents, degenerate_axis(), b, a)
}

pub fn plane_size<S: Substrate>(handle: &Handle<S>, name: &str) -> EsioResult<(u64, u64, u32)> {
    let (_, b, a, ncomponents) = field_size(handle, name)?;
    Ok((b, a, ncomponents))
}

#[cfg(test)]
mod tests {
    use super::*;
    use esio_core::SerialCommunicator;
    use esio_substrate::LocalSubstrate;
    use tempfile::tempdir;

    fn open_handle(dir: &std::path::Path) -> Handle<LocalSubstrate> {
        let mut h = Handle::initialize(&SerialCommunicator::default(), LocalSubstrate::new(), 0);
        h.file_create(dir.join("t.esio"), true).unwrap();
        h
    }

    #[test]
    fn line_round_trips_a_vector_of_scalars() {
        let dir = tempdir().unwrap();
        let handle = open_handle(dir.path());
        let registry = LayoutRegistry::with_defaults();

        let values: Vec<f64> = (0..6).map(|v| v as f64).collect();
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_ne_bytes()).collect();
        line_write(&handle, &registry, "energy", &bytes, ScalarKind::F64, 1, AxisSpec::new(6, 0, 6)).unwrap();

        let mut out = vec![0u8; bytes.len()];
        line_read(&handle, &registry, "energy", &mut out, ScalarKind::F64, 1, AxisSpec::new(6, 0, 6)).unwrap();
        assert_eq!(out, bytes);
        assert_eq!(line_size(&handle, "energy").unwrap(), (6, 1));
    }

    #[test]
    fn plane_round_trips_a_grid_of_scalars() {
        let dir = tempdir().unwrap();
        let handle = open_handle(dir.path());
        let registry = LayoutRegistry::with_defaults();

        let values: Vec<f32> = (0..12).map(|v| v as f32).collect();
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_ne_bytes()).collect();
        plane_write(
            &handle,
            &registry,
            "slice",
            &bytes,
            ScalarKind::F32,
            1,
            AxisSpec::new(3, 0, 3),
            AxisSpec::new(4, 0, 4),
        )
        .unwrap();

        let mut out = vec![0u8; bytes.len()];
        plane_read(
            &handle,
            &registry,
            "slice",
            &mut out,
            ScalarKind::F32,
            1,
            AxisSpec::new(3, 0, 3),
            AxisSpec::new(4, 0, 4),
        )
        .unwrap();
        assert_eq!(out, bytes);
        assert_eq!(plane_size(&handle, "slice").unwrap(), (3, 4, 1));
    }
}
