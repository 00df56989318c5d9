//! Ambient configuration: `esio.toml` discovery and parsing, reporter
//! wiring, and test-harness directory resolution. Nothing here is on the
//! hot path of a read or write — it runs once, typically just after
//! `Handle::initialize`.

mod discover;
mod reporter;
mod test_dirs;

pub use discover::{discover, load, Config, ConfigFile};
pub use reporter::ReporterConfig;
pub use test_dirs::TestDirs;
