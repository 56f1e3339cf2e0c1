//! Reading schema documents and configuration files.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use galoshes::{Config, SchemaSet};
use tracing::debug;

/// Configuration file formats, picked by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Toml,
    Yaml,
}

impl Format {
    /// JSON unless the extension says otherwise.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("toml") => Format::Toml,
            Some("yaml") | Some("yml") => Format::Yaml,
            _ => Format::Json,
        }
    }
}

pub fn load_schemas(path: &Path) -> Result<SchemaSet> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading schema document {}", path.display()))?;
    let set = match Format::from_path(path) {
        Format::Json => SchemaSet::from_json_str(&text),
        _ => SchemaSet::from_toml_str(&text),
    }
    .with_context(|| format!("loading schema document {}", path.display()))?;
    debug!(path = %path.display(), schemas = set.len(), "loaded schemas");
    Ok(set)
}

/// Read a configuration file; `-` reads JSON from stdin.
pub fn load_config(path: &Path) -> Result<Config> {
    let (text, format) = if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("reading configuration from stdin")?;
        (text, Format::Json)
    } else {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading configuration {}", path.display()))?;
        (text, Format::from_path(path))
    };

    parse_config(&text, format)
        .with_context(|| format!("parsing configuration {}", path.display()))
}

pub fn parse_config(text: &str, format: Format) -> Result<Config> {
    let config = match format {
        Format::Json => serde_json::from_str(text)?,
        Format::Toml => toml::from_str(text)?,
        Format::Yaml => serde_yaml::from_str(text)?,
    };
    Ok(config)
}
