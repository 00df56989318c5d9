//! Error taxonomy and the process-global diagnostic reporter.
//!
//! `EsioError` is the typed, idiomatic error every fallible entry point in the
//! workspace returns. Its `kind()` maps onto the five-way taxonomy the
//! on-disk/ABI contract exposes as small positive integers, so a caller
//! bridging to a C-style status code never has to re-derive the mapping.

use std::fmt;
use std::sync::{Mutex, OnceLock};

/// Coarse failure category, stable across the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Null/absent arguments, out-of-range shapes, stride/component mismatches,
    /// an overwrite whose shape disagrees with the existing dataset.
    InvalidArgument,
    /// An internal invariant was violated: a corrupt metadata block, an
    /// unknown layout tag, a registry self-check failure.
    Sanity,
    /// The substrate (or filesystem) reported a failure on an otherwise
    /// well-formed request: create/open/close/read/write/flush/rename/stat.
    Failed,
    /// Allocation failure while growing a path or scratch buffer.
    OutOfMemory,
    /// A required argument was absent at a boundary with no recovery path.
    Fault,
}

impl ErrorKind {
    /// The legacy positive-integer status code an ABI-style caller expects.
    /// `0` is reserved for success and is never returned here.
    pub const fn status_code(self) -> i32 {
        match self {
            ErrorKind::InvalidArgument => 1,
            ErrorKind::Failed => 2,
            ErrorKind::OutOfMemory => 3,
            ErrorKind::Sanity => 4,
            ErrorKind::Fault => 5,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::InvalidArgument => "EINVAL",
            ErrorKind::Failed => "EFAILED",
            ErrorKind::OutOfMemory => "ENOMEM",
            ErrorKind::Sanity => "ESANITY",
            ErrorKind::Fault => "EFAULT",
        };
        f.write_str(label)
    }
}

/// The error type returned by every fallible esio operation.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct EsioError {
    kind: ErrorKind,
    message: String,
}

impl EsioError {
    /// Construct an error and notify the process-global reporter.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let err = Self {
            kind,
            message: message.into(),
        };
        report(&err);
        err
    }

    /// Construct an error without notifying the reporter.
    ///
    /// Used exclusively by the metadata probe, where "attribute absent" is a
    /// normal outcome rather than a diagnostic-worthy failure.
    pub fn new_silent(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn status_code(&self) -> i32 {
        self.kind.status_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub fn invalid_argument(message: impl Into<String>) -> EsioError {
    EsioError::new(ErrorKind::InvalidArgument, message)
}

pub fn sanity(message: impl Into<String>) -> EsioError {
    EsioError::new(ErrorKind::Sanity, message)
}

pub fn failed(message: impl Into<String>) -> EsioError {
    EsioError::new(ErrorKind::Failed, message)
}

pub fn out_of_memory(message: impl Into<String>) -> EsioError {
    EsioError::new(ErrorKind::OutOfMemory, message)
}

pub fn fault(message: impl Into<String>) -> EsioError {
    EsioError::new(ErrorKind::Fault, message)
}

pub type EsioResult<T> = Result<T, EsioError>;

/// The process-global diagnostic reporter.
///
/// Re-architected from a single settable callback into a small sum type held
/// behind a synchronized cell, per the design notes: `Off` swallows every
/// diagnostic, `Default` routes through `tracing`, `Custom` hands the error to
/// caller-supplied code (e.g. to mirror it into an application's own log).
#[derive(Clone, Copy)]
pub enum Reporter {
    Off,
    Default,
    Custom(fn(&EsioError)),
}

impl fmt::Debug for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reporter::Off => f.write_str("Reporter::Off"),
            Reporter::Default => f.write_str("Reporter::Default"),
            Reporter::Custom(_) => f.write_str("Reporter::Custom(..)"),
        }
    }
}

static REPORTER: OnceLock<Mutex<Reporter>> = OnceLock::new();

fn reporter_cell() -> &'static Mutex<Reporter> {
    REPORTER.get_or_init(|| Mutex::new(Reporter::Default))
}

/// Replace the process-global reporter, returning the previous setting.
pub fn set_reporter(reporter: Reporter) -> Reporter {
    std::mem::replace(
        &mut *reporter_cell().lock().expect("reporter mutex poisoned"),
        reporter,
    )
}

/// Read the currently installed reporter.
pub fn current_reporter() -> Reporter {
    *reporter_cell().lock().expect("reporter mutex poisoned")
}

fn report(err: &EsioError) {
    let reporter = *reporter_cell().lock().expect("reporter mutex poisoned");
    match reporter {
        Reporter::Off => {}
        Reporter::Default => {
            tracing::error!(target: "esio::reporter", kind = %err.kind, "{}", err.message);
        }
        Reporter::Custom(f) => f(err),
    }
}

/// RAII guard that suspends the reporter for its scope and restores whatever
/// was installed beforehand on drop, even if the guarded code panics.
///
/// Used around the metadata probe read so a clean "attribute absent" miss
/// never reaches the caller's diagnostic stream.
pub struct SuspendedReporter {
    previous: Reporter,
}

impl SuspendedReporter {
    pub fn new() -> Self {
        let previous = set_reporter(Reporter::Off);
        Self { previous }
    }
}

impl Default for SuspendedReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SuspendedReporter {
    fn drop(&mut self) {
        set_reporter(self.previous);
    }
}
