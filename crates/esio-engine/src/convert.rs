//! Elementwise numeric conversion between scalar kinds, used whenever a
//! caller's requested type differs from a dataset's stored native type but
//! remains convertible to it.

use esio_core::{invalid_argument, sanity, EsioResult};
use esio_metadata::ScalarKind;

/// Converts a tightly-packed buffer of `from`-kind scalars into a buffer of
/// `to`-kind scalars, elementwise. Returns the input unchanged (cloned) when
/// the kinds match; otherwise requires `from.convertible_to(to)`.
pub fn convert_elements(src: &[u8], from: ScalarKind, to: ScalarKind) -> EsioResult<Vec<u8>> {
    if from == to {
        return Ok(src.to_vec());
    }
    if !from.convertible_to(to) {
        return Err(invalid_argument(format!(
            "{from:?} is not convertible to {to:?}"
        )));
    }

    let from_size = from.size_bytes();
    let to_size = to.size_bytes();
    if src.len() % from_size != 0 {
        return Err(sanity("buffer length is not a multiple of the source element size"));
    }
    let n = src.len() / from_size;
    let mut out = Vec::with_capacity(n * to_size);

    for chunk in src.chunks_exact(from_size) {
        match (from, to) {
            (ScalarKind::I32, ScalarKind::I64) => {
                let v = i32::from_ne_bytes(chunk.try_into().unwrap()) as i64;
                out.extend_from_slice(&v.to_ne_bytes());
            }
            (ScalarKind::I32, ScalarKind::F32) => {
                let v = i32::from_ne_bytes(chunk.try_into().unwrap()) as f32;
                out.extend_from_slice(&v.to_ne_bytes());
            }
            (ScalarKind::I32, ScalarKind::F64) => {
                let v = i32::from_ne_bytes(chunk.try_into().unwrap()) as f64;
                out.extend_from_slice(&v.to_ne_bytes());
            }
            (ScalarKind::F32, ScalarKind::F64) => {
                let v = f32::from_ne_bytes(chunk.try_into().unwrap()) as f64;
                out.extend_from_slice(&v.to_ne_bytes());
            }
            (ScalarKind::I64, ScalarKind::F64) => {
                let v = i64::from_ne_bytes(chunk.try_into().unwrap()) as f64;
                out.extend_from_slice(&v.to_ne_bytes());
            }
            _ => unreachable!("ScalarKind::convertible_to only allows the pairs handled above"),
        }
    }
    Ok(out)
}

/// Casts a buffer of `from`-kind scalars down to `i32`, elementwise, the way
/// a C cast would: out-of-range floats saturate and fractional parts are
/// truncated rather than rejected. Attributes are always stored on the wire
/// as `i32` regardless of the caller's requested kind, so this is a distinct
/// operation from [`convert_elements`] and its lossless-widening-only
/// contract — it is the encode half of that wire format, not a type
/// conversion a caller would reach for on its own.
pub fn narrow_to_i32(src: &[u8], from: ScalarKind) -> EsioResult<Vec<u8>> {
    let from_size = from.size_bytes();
    if src.len() % from_size != 0 {
        return Err(sanity("buffer length is not a multiple of the source element size"));
    }
    let n = src.len() / from_size;
    let mut out = Vec::with_capacity(n * ScalarKind::I32.size_bytes());

    for chunk in src.chunks_exact(from_size) {
        let v = match from {
            ScalarKind::I32 => i32::from_ne_bytes(chunk.try_into().unwrap()),
            ScalarKind::I64 => i64::from_ne_bytes(chunk.try_into().unwrap()) as i32,
            ScalarKind::F32 => f32::from_ne_bytes(chunk.try_into().unwrap()) as i32,
            ScalarKind::F64 => f64::from_ne_bytes(chunk.try_into().unwrap()) as i32,
        };
        out.extend_from_slice(&v.to_ne_bytes());
    }
    Ok(out)
}
