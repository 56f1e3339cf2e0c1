//! # Settings
//!
//! CLI settings are managed by [`confique`], layered in priority order:
//! 1. **Command-line flags** (applied by the caller after loading).
//! 2. **Environment variables**: `GALOSHES_PRETTY`, `GALOSHES_SCHEMA`, `GALOSHES_LOG`.
//! 3. **Settings file**: `galoshes.toml` in the working directory, if present.
//! 4. **Compiled defaults**.
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `pretty` | `true` | Pretty-print JSON output |
//! | `schema` | none | Schema document used when `--schema` is omitted |
//! | `log` | `warn` | Log filter used when `RUST_LOG` is unset |

use std::path::{Path, PathBuf};

use confique::Config;

pub const SETTINGS_FILE: &str = "galoshes.toml";

#[derive(Config, Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Pretty-print JSON output.
    #[config(env = "GALOSHES_PRETTY", default = true)]
    pub pretty: bool,

    /// Schema document to use when none is passed on the command line.
    #[config(env = "GALOSHES_SCHEMA")]
    pub schema: Option<PathBuf>,

    /// Log filter directive, e.g. "debug" or "galoshes=trace".
    #[config(env = "GALOSHES_LOG", default = "warn")]
    pub log: String,
}

impl Settings {
    /// Load from the environment and an optional settings file in `dir`.
    pub fn load(dir: &Path) -> Result<Self, confique::Error> {
        Settings::builder()
            .env()
            .file(dir.join(SETTINGS_FILE))
            .load()
    }
}
