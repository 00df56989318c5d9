//! `esio`: a parallel restart-file library for distributed simulations.
//!
//! A handle binds a communicator, a collective-I/O info bag, and at most one
//! open file together ([`Handle`]); every file-touching call on it is
//! collective across the communicator. Data moves through lines, planes, and
//! fields — 1-D, 2-D, and 3-D distributed-array read/write operations backed
//! by a pluggable on-disk [`LayoutStrategy`] — plus scalar, vector, and
//! string attributes. [`esio_restart::rotate`] handles the separate concern
//! of template-based restart file retention, independent of any handle.
//!
//! This crate wires the lower-level crates (`esio-core`, `esio-config`,
//! `esio-metadata`, `esio-substrate`, `esio-layout`, `esio-engine`,
//! `esio-restart`) into one public surface; application code should depend
//! on this crate alone.

mod layout;
mod logging;

pub use esio_core::{
    current_reporter, fault, failed, invalid_argument, out_of_memory, sanity, set_reporter,
    Communicator, ErrorKind, EsioError, EsioResult, InfoBag, Reporter, SerialCommunicator,
    SuspendedReporter,
};

pub use esio_config::{discover, load as load_config, Config, ConfigFile, ReporterConfig, TestDirs};

pub use esio_metadata::{
    ElementType, MetadataBlock, ProbeBuffer, ScalarKind, FORMAT_MAJOR, FORMAT_MINOR, FORMAT_PATCH,
    METADATA_LEN,
};

pub use esio_substrate::{Handle, LocalSubstrate, OpenMode, Region, Substrate};

pub use esio_layout::{AxisPiece, Layout0, LayoutRegistry, LayoutStrategy, LocalPiece, LAYOUT0_TAG};

pub use esio_engine::{
    attribute_read, attribute_readv, attribute_sizev, attribute_write, attribute_writev, convert_elements,
    field_read_f32, field_read_f64, field_read_i32, field_read_i64, field_size, field_write_f32,
    field_write_f64, field_write_i32, field_write_i64, line_read, line_size, line_write, plane_read,
    plane_size, plane_write, read_field, string_get, string_set, write_field, AxisSpec, METADATA_ATTR,
};

pub use esio_restart::{nextindex, rotate};

pub use layout::{layout_count, layout_get, layout_set};
pub use logging::init_logging;
