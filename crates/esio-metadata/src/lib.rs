//! Dataset metadata block and the element-type taxonomy it carries.
//!
//! Nothing in this crate touches a file or a communicator; it only describes
//! what a dataset's header means and whether two element types may be
//! substituted for each other on a read or write.

mod block;
mod element_type;

pub use block::{MetadataBlock, ProbeBuffer, FORMAT_MAJOR, FORMAT_MINOR, FORMAT_PATCH, METADATA_LEN};
pub use element_type::{ElementType, ScalarKind};
