//! `std::fs`-backed [`Substrate`]: an esio-rs "file" is a directory, a
//! dataset is a flat binary blob inside it plus a small sidecar describing
//! its shape, and attributes live in a per-dataset TOML sidecar. No external
//! I/O library is required to run the full engine and restart-rotation test
//! suite without HDF5 or MPI installed.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use esio_core::{failed, invalid_argument, sanity, EsioResult};
use esio_metadata::ScalarKind;
use serde::{Deserialize, Serialize};

use crate::substrate::{Region, Substrate};

#[derive(Debug, Serialize, Deserialize)]
struct DatasetMeta {
    shape: Vec<u64>,
    scalar_tag: i32,
    ncomponents: u32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct AttributeStore {
    #[serde(default)]
    ints: BTreeMap<String, Vec<i32>>,
    #[serde(default)]
    strings: BTreeMap<String, String>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LocalSubstrate;

impl LocalSubstrate {
    pub fn new() -> Self {
        Self
    }

    fn data_path(path: &Path, name: &str) -> PathBuf {
        path.join(format!("{name}.bin"))
    }

    fn meta_path(path: &Path, name: &str) -> PathBuf {
        path.join(format!("{name}.meta.toml"))
    }

    fn attrs_path(path: &Path, dataset: Option<&str>) -> PathBuf {
        match dataset {
            Some(name) => path.join(format!("{name}.attrs.toml")),
            None => path.join("__root__.attrs.toml"),
        }
    }

    fn load_meta(path: &Path, name: &str) -> EsioResult<DatasetMeta> {
        let raw = fs::read_to_string(Self::meta_path(path, name))
            .map_err(|e| sanity(format!("dataset {name} has no metadata sidecar: {e}")))?;
        toml::from_str(&raw).map_err(|e| sanity(format!("corrupt metadata sidecar for {name}: {e}")))
    }

    fn load_attrs(path: &Path, dataset: Option<&str>) -> EsioResult<AttributeStore> {
        let attrs_path = Self::attrs_path(path, dataset);
        if !attrs_path.exists() {
            return Ok(AttributeStore::default());
        }
        let raw = fs::read_to_string(&attrs_path).map_err(|e| failed(format!("reading attributes: {e}")))?;
        toml::from_str(&raw).map_err(|e| sanity(format!("corrupt attribute sidecar: {e}")))
    }

    fn save_attrs(path: &Path, dataset: Option<&str>, store: &AttributeStore) -> EsioResult<()> {
        let raw = toml::to_string(store).map_err(|e| failed(format!("serializing attributes: {e}")))?;
        fs::write(Self::attrs_path(path, dataset), raw).map_err(|e| failed(format!("writing attributes: {e}")))
    }

    fn row_major_strides(shape: &[u64]) -> Vec<u64> {
        let mut strides = vec![1u64; shape.len()];
        for i in (0..shape.len().saturating_sub(1)).rev() {
            strides[i] = strides[i + 1] * shape[i + 1];
        }
        strides
    }

    fn validate_region(shape: &[u64], region: &Region<'_>) -> EsioResult<()> {
        let rank = shape.len();
        if region.start.len() != rank || region.count.len() != rank || region.stride.len() != rank {
            return Err(invalid_argument(format!(
                "region rank {} does not match dataset rank {rank}",
                region.start.len()
            )));
        }
        for axis in 0..rank {
            if region.count[axis] == 0 {
                continue;
            }
            let last_index = region.start[axis] + (region.count[axis] - 1) * region.stride[axis].max(1);
            if last_index >= shape[axis] {
                return Err(invalid_argument(format!(
                    "region on axis {axis} reaches index {last_index}, dataset extent is {}",
                    shape[axis]
                )));
            }
        }
        Ok(())
    }

    /// Outer-axis index combinations (every axis but the last), in row-major
    /// iteration order.
    fn outer_combinations(count: &[u64]) -> Vec<Vec<u64>> {
        let outer = &count[..count.len().saturating_sub(1)];
        let mut combos = vec![Vec::new()];
        for &extent in outer {
            let mut next = Vec::with_capacity(combos.len() * extent.max(1) as usize);
            for combo in &combos {
                for v in 0..extent {
                    let mut grown = combo.clone();
                    grown.push(v);
                    next.push(grown);
                }
            }
            combos = next;
        }
        combos
    }
}

impl Substrate for LocalSubstrate {
    fn create_file(&self, path: &Path) -> EsioResult<()> {
        if path.exists() {
            fs::remove_dir_all(path).map_err(|e| failed(format!("clearing existing file at {path:?}: {e}")))?;
        }
        fs::create_dir_all(path).map_err(|e| failed(format!("creating file at {path:?}: {e}")))
    }

    fn open_file(&self, path: &Path) -> EsioResult<()> {
        if !path.is_dir() {
            return Err(invalid_argument(format!("no such file: {path:?}")));
        }
        Ok(())
    }

    fn flush_file(&self, _path: &Path) -> EsioResult<()> {
        Ok(())
    }

    fn close_file(&self, _path: &Path) -> EsioResult<()> {
        Ok(())
    }

    fn dataset_exists(&self, path: &Path, name: &str) -> bool {
        Self::meta_path(path, name).is_file() && Self::data_path(path, name).is_file()
    }

    fn create_dataset(
        &self,
        path: &Path,
        name: &str,
        shape: &[u64],
        scalar: ScalarKind,
        ncomponents: u32,
    ) -> EsioResult<()> {
        if self.dataset_exists(path, name) {
            return Err(sanity(format!("dataset {name} already exists")));
        }
        let elem_size = scalar.size_bytes() as u64 * ncomponents as u64;
        let total_elems: u64 = shape.iter().product();
        let meta = DatasetMeta {
            shape: shape.to_vec(),
            scalar_tag: scalar.tag(),
            ncomponents,
        };
        let raw = toml::to_string(&meta).map_err(|e| failed(format!("serializing dataset metadata: {e}")))?;
        fs::write(Self::meta_path(path, name), raw).map_err(|e| failed(format!("writing dataset metadata: {e}")))?;

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(Self::data_path(path, name))
            .map_err(|e| failed(format!("creating dataset storage: {e}")))?;
        file.set_len(total_elems * elem_size)
            .map_err(|e| failed(format!("sizing dataset storage: {e}")))
    }

    fn dataset_shape(&self, path: &Path, name: &str) -> EsioResult<(Vec<u64>, ScalarKind, u32)> {
        let meta = Self::load_meta(path, name)?;
        let scalar = ScalarKind::from_tag(meta.scalar_tag)?;
        Ok((meta.shape, scalar, meta.ncomponents))
    }

    fn write_region(&self, path: &Path, name: &str, region: Region<'_>, bytes: &[u8]) -> EsioResult<()> {
        let meta = Self::load_meta(path, name)?;
        Self::validate_region(&meta.shape, &region)?;
        let elem_size = ScalarKind::from_tag(meta.scalar_tag)?.size_bytes() * meta.ncomponents as usize;
        let expected: u64 = region.count.iter().product();
        if bytes.len() as u64 != expected * elem_size as u64 {
            return Err(invalid_argument(format!(
                "write buffer is {} bytes, region needs {}",
                bytes.len(),
                expected * elem_size as u64
            )));
        }

        let rank = meta.shape.len();
        let strides = Self::row_major_strides(&meta.shape);
        let last = rank - 1;
        let mut file = OpenOptions::new()
            .write(true)
            .open(Self::data_path(path, name))
            .map_err(|e| failed(format!("opening dataset storage: {e}")))?;

        let mut cursor = 0usize;
        for outer in Self::outer_combinations(region.count) {
            let mut global = vec![0u64; rank];
            for axis in 0..last {
                global[axis] = region.start[axis] + outer[axis] * region.stride[axis];
            }
            if region.stride[last] == 1 {
                global[last] = region.start[last];
                let offset: u64 = (0..rank).map(|a| global[a] * strides[a]).sum();
                let chunk_len = region.count[last] as usize * elem_size;
                file.seek(SeekFrom::Start(offset * elem_size as u64))
                    .map_err(|e| failed(format!("seeking dataset storage: {e}")))?;
                file.write_all(&bytes[cursor..cursor + chunk_len])
                    .map_err(|e| failed(format!("writing dataset storage: {e}")))?;
                cursor += chunk_len;
            } else {
                for j in 0..region.count[last] {
                    global[last] = region.start[last] + j * region.stride[last];
                    let offset: u64 = (0..rank).map(|a| global[a] * strides[a]).sum();
                    file.seek(SeekFrom::Start(offset * elem_size as u64))
                        .map_err(|e| failed(format!("seeking dataset storage: {e}")))?;
                    file.write_all(&bytes[cursor..cursor + elem_size])
                        .map_err(|e| failed(format!("writing dataset storage: {e}")))?;
                    cursor += elem_size;
                }
            }
        }
        Ok(())
    }

    fn read_region(&self, path: &Path, name: &str, region: Region<'_>) -> EsioResult<Vec<u8>> {
        let meta = Self::load_meta(path, name)?;
        Self::validate_region(&meta.shape, &region)?;
        let elem_size = ScalarKind::from_tag(meta.scalar_tag)?.size_bytes() * meta.ncomponents as usize;
        let total: u64 = region.count.iter().product();
        let mut out = vec![0u8; (total * elem_size as u64) as usize];

        let rank = meta.shape.len();
        let strides = Self::row_major_strides(&meta.shape);
        let last = rank - 1;
        let mut file = OpenOptions::new()
            .read(true)
            .open(Self::data_path(path, name))
            .map_err(|e| failed(format!("opening dataset storage: {e}")))?;

        let mut cursor = 0usize;
        for outer in Self::outer_combinations(region.count) {
            let mut global = vec![0u64; rank];
            for axis in 0..last {
                global[axis] = region.start[axis] + outer[axis] * region.stride[axis];
            }
            if region.stride[last] == 1 {
                global[last] = region.start[last];
                let offset: u64 = (0..rank).map(|a| global[a] * strides[a]).sum();
                let chunk_len = region.count[last] as usize * elem_size;
                file.seek(SeekFrom::Start(offset * elem_size as u64))
                    .map_err(|e| failed(format!("seeking dataset storage: {e}")))?;
                file.read_exact(&mut out[cursor..cursor + chunk_len])
                    .map_err(|e| failed(format!("reading dataset storage: {e}")))?;
                cursor += chunk_len;
            } else {
                for j in 0..region.count[last] {
                    global[last] = region.start[last] + j * region.stride[last];
                    let offset: u64 = (0..rank).map(|a| global[a] * strides[a]).sum();
                    file.seek(SeekFrom::Start(offset * elem_size as u64))
                        .map_err(|e| failed(format!("seeking dataset storage: {e}")))?;
                    file.read_exact(&mut out[cursor..cursor + elem_size])
                        .map_err(|e| failed(format!("reading dataset storage: {e}")))?;
                    cursor += elem_size;
                }
            }
        }
        Ok(out)
    }

    fn attribute_exists(&self, path: &Path, dataset: Option<&str>, attr: &str) -> bool {
        Self::load_attrs(path, dataset)
            .map(|store| store.ints.contains_key(attr) || store.strings.contains_key(attr))
            .unwrap_or(false)
    }

    fn write_attribute_i32(&self, path: &Path, dataset: Option<&str>, attr: &str, values: &[i32]) -> EsioResult<()> {
        let mut store = Self::load_attrs(path, dataset)?;
        store.strings.remove(attr);
        store.ints.insert(attr.to_string(), values.to_vec());
        Self::save_attrs(path, dataset, &store)
    }

    fn read_attribute_i32(&self, path: &Path, dataset: Option<&str>, attr: &str) -> EsioResult<Vec<i32>> {
        let store = Self::load_attrs(path, dataset)?;
        store
            .ints
            .get(attr)
            .cloned()
            .ok_or_else(|| sanity(format!("no such integer attribute {attr}")))
    }

    fn write_attribute_string(&self, path: &Path, dataset: Option<&str>, attr: &str, value: &str) -> EsioResult<()> {
        let mut store = Self::load_attrs(path, dataset)?;
        store.ints.remove(attr);
        store.strings.insert(attr.to_string(), value.to_string());
        Self::save_attrs(path, dataset, &store)
    }

    fn read_attribute_string(&self, path: &Path, dataset: Option<&str>, attr: &str) -> EsioResult<String> {
        let store = Self::load_attrs(path, dataset)?;
        store
            .strings
            .get(attr)
            .cloned()
            .ok_or_else(|| sanity(format!("no such string attribute {attr}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn create_dataset_round_trips_shape_and_scalar_kind() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("t.esio");
        let sub = LocalSubstrate::new();
        sub.create_file(&file).unwrap();
        sub.create_dataset(&file, "u", &[2, 3, 4], ScalarKind::F64, 1).unwrap();
        let (shape, scalar, ncomponents) = sub.dataset_shape(&file, "u").unwrap();
        assert_eq!(shape, vec![2, 3, 4]);
        assert_eq!(scalar, ScalarKind::F64);
        assert_eq!(ncomponents, 1);
    }

    #[test]
    fn strided_region_write_then_read_round_trips() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("t.esio");
        let sub = LocalSubstrate::new();
        sub.create_file(&file).unwrap();
        sub.create_dataset(&file, "u", &[4, 4], ScalarKind::I32, 1).unwrap();

        let region = Region::new(&[0, 0], &[2, 2], &[2, 1]);
        let payload: Vec<u8> = [1i32, 2, 3, 4].iter().flat_map(|v| v.to_ne_bytes()).collect();
        sub.write_region(&file, "u", region.clone(), &payload).unwrap();

        let back = sub.read_region(&file, "u", region).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn region_exceeding_extent_is_rejected() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("t.esio");
        let sub = LocalSubstrate::new();
        sub.create_file(&file).unwrap();
        sub.create_dataset(&file, "u", &[4], ScalarKind::I32, 1).unwrap();
        let region = Region::new(&[0], &[8], &[1]);
        let payload = vec![0u8; 32];
        assert!(sub.write_region(&file, "u", region, &payload).is_err());
    }

    #[test]
    fn attributes_round_trip_and_report_missing() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("t.esio");
        let sub = LocalSubstrate::new();
        sub.create_file(&file).unwrap();
        sub.create_dataset(&file, "u", &[2], ScalarKind::I32, 1).unwrap();

        sub.write_attribute_i32(&file, Some("u"), "esio_metadata", &[0, 1, 0, 0, 1, 1, 2, 1])
            .unwrap();
        assert!(sub.attribute_exists(&file, Some("u"), "esio_metadata"));
        assert_eq!(
            sub.read_attribute_i32(&file, Some("u"), "esio_metadata").unwrap(),
            vec![0, 1, 0, 0, 1, 1, 2, 1]
        );
        assert!(sub.read_attribute_i32(&file, Some("u"), "missing").is_err());

        sub.write_attribute_string(&file, None, "generated_by", "esio-rs")
            .unwrap();
        assert_eq!(
            sub.read_attribute_string(&file, None, "generated_by").unwrap(),
            "esio-rs"
        );
    }
}
