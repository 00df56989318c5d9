//! The `Substrate` trait: everything the engine and layout crates need from a
//! concrete storage backend, and nothing more. A real deployment wires this
//! against HDF5 with an MPI-aware driver; this crate ships the one backend
//! esio-rs can run anywhere without an external library, [`LocalSubstrate`].

use std::path::Path;

use esio_core::EsioResult;
use esio_metadata::ScalarKind;

/// A rectangular region of a dataset selected for transfer: per-axis start
/// offset, element count, and stride, all in elements (not bytes). Rank is
/// implied by the slice length and must match the dataset's rank.
#[derive(Debug, Clone)]
pub struct Region<'a> {
    pub start: &'a [u64],
    pub count: &'a [u64],
    pub stride: &'a [u64],
}

impl<'a> Region<'a> {
    pub fn new(start: &'a [u64], count: &'a [u64], stride: &'a [u64]) -> Self {
        Self { start, count, stride }
    }

    pub fn rank(&self) -> usize {
        self.start.len()
    }
}

/// Storage backend for esio-rs containers: file lifecycle, dataset creation
/// and shape discovery, strided region transfer, and attribute storage on
/// either a dataset or the file itself (`dataset = None`).
///
/// Every method is a single-process-local operation; the collective-ness of
/// esio-rs's public API (every rank calling the same thing with compatible
/// arguments) is enforced by [`crate::Handle`], not by implementations of
/// this trait.
pub trait Substrate {
    fn create_file(&self, path: &Path) -> EsioResult<()>;
    fn open_file(&self, path: &Path) -> EsioResult<()>;
    fn flush_file(&self, path: &Path) -> EsioResult<()>;
    fn close_file(&self, path: &Path) -> EsioResult<()>;

    fn dataset_exists(&self, path: &Path, name: &str) -> bool;
    fn create_dataset(
        &self,
        path: &Path,
        name: &str,
        shape: &[u64],
        scalar: ScalarKind,
        ncomponents: u32,
    ) -> EsioResult<()>;
    fn dataset_shape(&self, path: &Path, name: &str) -> EsioResult<(Vec<u64>, ScalarKind, u32)>;

    fn write_region(&self, path: &Path, name: &str, region: Region<'_>, bytes: &[u8]) -> EsioResult<()>;
    fn read_region(&self, path: &Path, name: &str, region: Region<'_>) -> EsioResult<Vec<u8>>;

    fn attribute_exists(&self, path: &Path, dataset: Option<&str>, attr: &str) -> bool;
    fn write_attribute_i32(
        &self,
        path: &Path,
        dataset: Option<&str>,
        attr: &str,
        values: &[i32],
    ) -> EsioResult<()>;
    fn read_attribute_i32(&self, path: &Path, dataset: Option<&str>, attr: &str) -> EsioResult<Vec<i32>>;
    fn write_attribute_string(
        &self,
        path: &Path,
        dataset: Option<&str>,
        attr: &str,
        value: &str,
    ) -> EsioResult<()>;
    fn read_attribute_string(&self, path: &Path, dataset: Option<&str>, attr: &str) -> EsioResult<String>;
}
