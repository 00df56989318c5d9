//! `ESIO_TEST_INPUT_DIR` / `ESIO_TEST_OUTPUT_DIR` resolution, giving test
//! harnesses a scratch area for fixtures and artifacts without hardcoding a
//! path.

use std::env;
use std::path::PathBuf;

/// Directories a test harness should read fixtures from and write artifacts
/// to, resolved from the environment with `.` as the fallback for each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestDirs {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl TestDirs {
    pub fn from_env() -> Self {
        Self {
            input: env::var("ESIO_TEST_INPUT_DIR").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from(".")),
            output: env::var("ESIO_TEST_OUTPUT_DIR").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from(".")),
        }
    }
}
