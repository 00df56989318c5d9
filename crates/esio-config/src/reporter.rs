//! Configuration-driven wiring of the process-global diagnostic reporter.

use std::fmt;

use esio_core::Reporter;
use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;
use tracing::info;

/// The `reporter` key in `esio.toml`: `"off"` and `"default"` select the
/// matching `esio_core::Reporter` variant; any other string names a tracing
/// target that structured diagnostics should be filed under.
///
/// `esio_core::Reporter::Custom` only accepts a bare `fn` pointer, so it
/// cannot carry a caller-chosen target string as captured state. A named
/// target therefore still reports through `Reporter::Default` — the target
/// name is recorded once via a `tracing` event at `apply()` time so log
/// processors can pick it up as a structured field instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReporterConfig {
    Off,
    Default,
    Target(String),
}

impl Default for ReporterConfig {
    fn default() -> Self {
        ReporterConfig::Default
    }
}

impl ReporterConfig {
    /// Installs the corresponding `esio_core::Reporter`, returning the one
    /// it replaced.
    pub fn apply(&self) -> Reporter {
        match self {
            ReporterConfig::Off => esio_core::set_reporter(Reporter::Off),
            ReporterConfig::Default => esio_core::set_reporter(Reporter::Default),
            ReporterConfig::Target(name) => {
                info!(target: "esio::config", reporter_target = %name, "named reporter target configured");
                esio_core::set_reporter(Reporter::Default)
            }
        }
    }
}

impl<'de> Deserialize<'de> for ReporterConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ReporterVisitor;

        impl Visitor<'_> for ReporterVisitor {
            type Value = ReporterConfig;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("\"off\", \"default\", or a tracing target name")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(match v {
                    "off" => ReporterConfig::Off,
                    "default" => ReporterConfig::Default,
                    other => ReporterConfig::Target(other.to_string()),
                })
            }
        }

        deserializer.deserialize_str(ReporterVisitor)
    }
}
