//! The distributed-array write/read engine: shape and type validation,
//! collective transfer dispatch through a dataset's layout strategy,
//! attribute accessors, and the 1-D/2-D degenerate-axis conveniences.

mod attribute;
mod convert;
mod field;
mod line_plane;
mod typed;

pub use attribute::{attribute_read, attribute_readv, attribute_sizev, attribute_write, attribute_writev, string_get, string_set};
pub use convert::convert_elements;
pub use field::{field_size, read_field, write_field, AxisSpec, METADATA_ATTR};
pub use line_plane::{line_read, line_size, line_write, plane_read, plane_size, plane_write};
pub use typed::{
    field_read_f32, field_read_f64, field_read_i32, field_read_i64, field_write_f32, field_write_f64,
    field_write_i32, field_write_i64,
};
