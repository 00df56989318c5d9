//! Process-local handle binding a communicator, a collective-I/O info bag,
//! at most one open file, and a default layout tag.

use std::path::{Path, PathBuf};

use esio_core::{invalid_argument, Communicator, EsioResult, InfoBag};
use tracing::{info, instrument};

use crate::substrate::Substrate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    ReadOnly,
    ReadWrite,
}

pub struct Handle<S: Substrate> {
    communicator: Box<dyn Communicator>,
    info: InfoBag,
    substrate: S,
    open_file: Option<(PathBuf, OpenMode)>,
    default_layout_tag: u32,
}

impl<S: Substrate> Handle<S> {
    /// Duplicates the communicator so the handle's collective calls never
    /// alias the caller's own use of it.
    pub fn initialize(communicator: &dyn Communicator, substrate: S, default_layout_tag: u32) -> Self {
        Self {
            communicator: communicator.duplicate(),
            info: InfoBag::new(),
            substrate,
            open_file: None,
            default_layout_tag,
        }
    }

    pub fn communicator(&self) -> &dyn Communicator {
        self.communicator.as_ref()
    }

    pub fn info(&self) -> &InfoBag {
        &self.info
    }

    pub fn info_mut(&mut self) -> &mut InfoBag {
        &mut self.info
    }

    pub fn substrate(&self) -> &S {
        &self.substrate
    }

    pub fn default_layout_tag(&self) -> u32 {
        self.default_layout_tag
    }

    pub fn set_default_layout_tag(&mut self, tag: u32) {
        self.default_layout_tag = tag;
    }

    pub fn open_path(&self) -> Option<&Path> {
        self.open_file.as_ref().map(|(path, _)| path.as_path())
    }

    pub fn is_open(&self) -> bool {
        self.open_file.is_some()
    }

    #[instrument(level = "debug", target = "esio::handle", skip(self, path), fields(rank = self.communicator.rank()))]
    pub fn file_create(&mut self, path: impl AsRef<Path>, overwrite: bool) -> EsioResult<()> {
        let path = path.as_ref();
        if self.open_file.is_some() {
            return Err(invalid_argument("a file is already open on this handle"));
        }
        if !overwrite && path.exists() {
            return Err(invalid_argument(format!("{path:?} already exists and overwrite=false")));
        }
        self.substrate.create_file(path)?;
        self.communicator.barrier();
        self.open_file = Some((path.to_path_buf(), OpenMode::ReadWrite));
        info!(target: "esio::handle", path = %path.display(), "created file");
        Ok(())
    }

    #[instrument(level = "debug", target = "esio::handle", skip(self, path), fields(rank = self.communicator.rank()))]
    pub fn file_open(&mut self, path: impl AsRef<Path>, mode: OpenMode) -> EsioResult<()> {
        let path = path.as_ref();
        if self.open_file.is_some() {
            return Err(invalid_argument("a file is already open on this handle"));
        }
        self.substrate.open_file(path)?;
        self.communicator.barrier();
        self.open_file = Some((path.to_path_buf(), mode));
        info!(target: "esio::handle", path = %path.display(), "opened file");
        Ok(())
    }

    #[instrument(level = "debug", target = "esio::handle", skip(self), fields(rank = self.communicator.rank()))]
    pub fn file_flush(&mut self) -> EsioResult<()> {
        let (path, _) = self
            .open_file
            .as_ref()
            .ok_or_else(|| invalid_argument("no file is open on this handle"))?;
        self.substrate.flush_file(path)?;
        self.communicator.barrier();
        Ok(())
    }

    #[instrument(level = "debug", target = "esio::handle", skip(self), fields(rank = self.communicator.rank()))]
    pub fn file_close(&mut self) -> EsioResult<()> {
        let (path, _) = self
            .open_file
            .take()
            .ok_or_else(|| invalid_argument("no file is open on this handle"))?;
        self.substrate.flush_file(&path)?;
        self.substrate.close_file(&path)?;
        self.communicator.barrier();
        info!(target: "esio::handle", path = %path.display(), "closed file");
        Ok(())
    }

    /// Closing an already-open file first is a convenience, not a
    /// requirement a caller must remember.
    pub fn finalize(mut self) -> EsioResult<()> {
        if self.is_open() {
            self.file_close()?;
        }
        Ok(())
    }

    pub fn require_open(&self) -> EsioResult<&Path> {
        self.open_file
            .as_ref()
            .map(|(path, _)| path.as_path())
            .ok_or_else(|| invalid_argument("no file is open on this handle"))
    }

    pub fn require_writable(&self) -> EsioResult<&Path> {
        match &self.open_file {
            Some((path, OpenMode::ReadWrite)) => Ok(path.as_path()),
            Some((_, OpenMode::ReadOnly)) => Err(invalid_argument("file was opened read-only")),
            None => Err(invalid_argument("no file is open on this handle")),
        }
    }
}
