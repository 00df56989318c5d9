//! Scalar, vector, and string attribute accessors. Unlike fields, attributes
//! are never distributed — every rank is expected to supply (and receive)
//! the same value, so these calls skip the layout machinery entirely and
//! talk straight to the substrate.

use tracing::instrument;

use esio_core::{invalid_argument, ErrorKind, EsioError, EsioResult};
use esio_metadata::ScalarKind;
use esio_substrate::{Handle, Substrate};

use crate::convert::{convert_elements, narrow_to_i32};

/// Writes a single scalar-valued attribute, `request_scalar`-typed, attached
/// to `dataset` (or to the open file itself when `dataset` is `None`).
#[instrument(level = "trace", target = "esio::engine", skip(handle, value))]
pub fn attribute_write<S: Substrate>(
    handle: &Handle<S>,
    dataset: Option<&str>,
    name: &str,
    value: &[u8],
    request_scalar: ScalarKind,
) -> EsioResult<()> {
    attribute_writev(handle, dataset, name, value, request_scalar, 1)
}

pub fn attribute_read<S: Substrate>(
    handle: &Handle<S>,
    dataset: Option<&str>,
    name: &str,
    request_scalar: ScalarKind,
) -> EsioResult<Vec<u8>> {
    attribute_readv(handle, dataset, name, request_scalar, 1)
}

/// Writes a vector-valued attribute: `ncomponents` scalars per logical
/// value, stored on the wire as `i32`s regardless of the caller's type
/// (matching every other attribute this crate stores). The write side casts
/// down to `i32` the way a C cast would (truncating, not rejecting); the
/// read side widens back out to `request_scalar` losslessly.
#[instrument(level = "trace", target = "esio::engine", skip(handle, values))]
pub fn attribute_writev<S: Substrate>(
    handle: &Handle<S>,
    dataset: Option<&str>,
    name: &str,
    values: &[u8],
    request_scalar: ScalarKind,
    ncomponents: u32,
) -> EsioResult<()> {
    if ncomponents == 0 {
        return Err(invalid_argument("ncomponents must be >= 1"));
    }
    let path = handle.require_open()?;
    let as_i32 = narrow_to_i32(values, request_scalar)?;
    let ints: Vec<i32> = as_i32
        .chunks_exact(4)
        .map(|c| i32::from_ne_bytes(c.try_into().unwrap()))
        .collect();
    handle
        .substrate()
        .write_attribute_i32(path, dataset, name, &ints)
}

pub fn attribute_readv<S: Substrate>(
    handle: &Handle<S>,
    dataset: Option<&str>,
    name: &str,
    request_scalar: ScalarKind,
    ncomponents: u32,
) -> EsioResult<Vec<u8>> {
    if ncomponents == 0 {
        return Err(invalid_argument("ncomponents must be >= 1"));
    }
    let path = handle.require_open()?;
    let ints = handle
        .substrate()
        .read_attribute_i32(path, dataset, name)?;
    if ints.len() as u32 != ncomponents {
        return Err(invalid_argument(format!(
            "attribute {name} has {} components, requested {ncomponents}",
            ints.len()
        )));
    }
    let as_bytes: Vec<u8> = ints.iter().flat_map(|v| v.to_ne_bytes()).collect();
    convert_elements(&as_bytes, ScalarKind::I32, request_scalar)
}

/// Number of components stored in a vector (or scalar) attribute, without
/// decoding the values themselves.
///
/// A probe, not a read: a missing `name` is a normal outcome, not a
/// diagnostic-worthy failure, so it's reported via `new_silent` rather than
/// the usual constructors that notify the process-global reporter.
pub fn attribute_sizev<S: Substrate>(handle: &Handle<S>, dataset: Option<&str>, name: &str) -> EsioResult<u32> {
    let path = handle.require_open()?;
    let substrate = handle.substrate();
    if !substrate.attribute_exists(path, dataset, name) {
        return Err(EsioError::new_silent(ErrorKind::Failed, format!("no such attribute {name}")));
    }
    let ints = substrate.read_attribute_i32(path, dataset, name)?;
    Ok(ints.len() as u32)
}

pub fn string_set<S: Substrate>(handle: &Handle<S>, dataset: Option<&str>, name: &str, value: &str) -> EsioResult<()> {
    let path = handle.require_open()?;
    handle
        .substrate()
        .write_attribute_string(path, dataset, name, value)
}

pub fn string_get<S: Substrate>(handle: &Handle<S>, dataset: Option<&str>, name: &str) -> EsioResult<String> {
    let path = handle.require_open()?;
    handle.substrate().read_attribute_string(path, dataset, name)
}
