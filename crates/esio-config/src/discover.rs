//! `esio.toml` discovery: explicit path, `ESIO_CONFIG` env var, working
//! directory, platform config directory, built-in defaults.

use std::env;
use std::fs;
use std::path::PathBuf;

use esio_core::{invalid_argument, EsioResult};
use tracing::debug;

use crate::reporter::ReporterConfig;

/// Best-effort config path following platform conventions (XDG / AppData
/// Roaming), used only once the cheaper lookups below have all missed.
pub fn discover() -> PathBuf {
    let local = PathBuf::from("esio.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("esio").join("esio.toml");
    }
    PathBuf::from("esio.toml")
}

fn candidate_paths(explicit: Option<PathBuf>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(path) = explicit {
        candidates.push(path);
    }
    if let Ok(path) = env::var("ESIO_CONFIG") {
        candidates.push(PathBuf::from(path));
    }
    candidates.push(discover());
    candidates
}

#[derive(Debug, serde::Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub default_layout_tag: u32,
    #[serde(default)]
    pub reporter: ReporterConfig,
}

/// Effective configuration: the parsed file contents (or built-in defaults
/// when nothing readable was found).
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub default_layout_tag: u32,
    pub reporter: ReporterConfig,
}

impl From<ConfigFile> for Config {
    fn from(file: ConfigFile) -> Self {
        Self {
            default_layout_tag: file.default_layout_tag,
            reporter: file.reporter,
        }
    }
}

/// Loads configuration by walking the discovery order (see module docs);
/// an explicit `path` takes priority over every fallback. A missing or
/// unreadable file at any candidate is not an error — it just falls through
/// to the next candidate and eventually to built-in defaults. A file that
/// exists but fails to parse as TOML *is* an error.
pub fn load(path: Option<PathBuf>) -> EsioResult<Config> {
    for candidate in candidate_paths(path) {
        let content = match fs::read_to_string(&candidate) {
            Ok(content) => content,
            Err(_) => continue,
        };
        let file: ConfigFile = toml::from_str(&content)
            .map_err(|e| invalid_argument(format!("malformed config at {candidate:?}: {e}")))?;
        debug!(target: "esio::config", path = %candidate.display(), "loaded config");
        return Ok(file.into());
    }
    debug!(target: "esio::config", "no config file found, using built-in defaults");
    Ok(Config::default())
}
