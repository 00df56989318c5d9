//! Type-dispatching thin wrappers over the raw-byte engine, one per scalar
//! kind, so callers get a typed `&[f64]`/`&[i32]`/... signature instead of
//! juggling raw bytes and a `ScalarKind` at every call site.

use esio_core::EsioResult;
use esio_layout::LayoutRegistry;
use esio_metadata::ScalarKind;
use esio_substrate::{Handle, Substrate};

use crate::field::{read_field, write_field, AxisSpec};

macro_rules! define_scalar_field_ops {
    ($write:ident, $read:ident, $ty:ty, $kind:expr) => {
        #[allow(clippy::too_many_arguments)]
        pub fn $write<S: Substrate>(
            handle: &Handle<S>,
            registry: &LayoutRegistry,
            name: &str,
            field: &[$ty],
            c: AxisSpec,
            b: AxisSpec,
            a: AxisSpec,
        ) -> EsioResult<()> {
            let bytes: Vec<u8> = field.iter().flat_map(|v| v.to_ne_bytes()).collect();
            write_field(handle, registry, name, &bytes, $kind, 1, c, b, a)
        }

        #[allow(clippy::too_many_arguments)]
        pub fn $read<S: Substrate>(
            handle: &Handle<S>,
            registry: &LayoutRegistry,
            name: &str,
            field: &mut [$ty],
            c: AxisSpec,
            b: AxisSpec,
            a: AxisSpec,
        ) -> EsioResult<()> {
            let elem_size = std::mem::size_of::<$ty>();
            let mut bytes = vec![0u8; field.len() * elem_size];
            read_field(handle, registry, name, &mut bytes, $kind, 1, c, b, a)?;
            for (dst, chunk) in field.iter_mut().zip(bytes.chunks_exact(elem_size)) {
                *dst = <$ty>::from_ne_bytes(chunk.try_into().unwrap());
            }
            Ok(())
        }
    };
}

define_scalar_field_ops!(field_write_f64, field_read_f64, f64, ScalarKind::F64);
define_scalar_field_ops!(field_write_f32, field_read_f32, f32, ScalarKind::F32);
define_scalar_field_ops!(field_write_i32, field_read_i32, i32, ScalarKind::I32);
define_scalar_field_ops!(field_write_i64, field_read_i64, i64, ScalarKind::I64);
