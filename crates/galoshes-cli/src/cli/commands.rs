use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use galoshes::{Attributes, Config, ConfigFilter, SchemaSet};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use super::input::{load_config, load_schemas};
use super::render::{keys_report, to_json, KeySets};
use super::setup::{Cli, Commands};
use crate::settings::Settings;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let settings = Settings::load(&cwd).context("loading settings")?;

    init_logging(cli.verbosity_filter().unwrap_or(settings.log.as_str()));
    debug!(?settings, "loaded settings");

    let schema_path = cli
        .schema
        .clone()
        .or_else(|| settings.schema.clone())
        .context("no schema document given (use --schema or the `schema` setting)")?;
    let schemas = load_schemas(&schema_path)?;
    let pretty = cli.pretty_output(settings.pretty);

    let output = match &cli.command {
        Commands::Keys { types, combined } => handle_keys(&schemas, types, *combined, pretty)?,
        Commands::Filter { types, config } => handle_filter(&schemas, types, config, pretty)?,
        Commands::Construct { type_name, config } => {
            handle_construct(&schemas, type_name, config, pretty)?
        }
    };
    println!("{}", output);
    Ok(())
}

fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    // A second init (e.g. in tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn handle_keys(
    schemas: &SchemaSet,
    types: &[String],
    combined: bool,
    pretty: bool,
) -> Result<String> {
    let selected = if types.is_empty() {
        schemas.iter().collect::<Vec<_>>()
    } else {
        types
            .iter()
            .map(|name| schemas.require(name))
            .collect::<galoshes::Result<Vec<_>>>()?
    };

    if combined {
        let filter = ConfigFilter::new(selected);
        to_json(&KeySets::of_filter(&filter), pretty)
    } else {
        to_json(&keys_report(selected), pretty)
    }
}

pub fn handle_filter(
    schemas: &SchemaSet,
    types: &[String],
    config_path: &Path,
    pretty: bool,
) -> Result<String> {
    let selected = types
        .iter()
        .map(|name| schemas.require(name))
        .collect::<galoshes::Result<Vec<_>>>()?;
    let config = load_config(config_path)?;
    let pruned = filter_config(ConfigFilter::new(selected), &config)?;
    to_json(&pruned, pretty)
}

fn filter_config(filter: ConfigFilter, config: &Config) -> Result<Config> {
    let pruned = filter.filter(config)?;
    debug!(
        kept = pruned.len(),
        dropped = config.len() - pruned.len(),
        "filtered configuration"
    );
    Ok(pruned)
}

pub fn handle_construct(
    schemas: &SchemaSet,
    type_name: &str,
    config_path: &Path,
    pretty: bool,
) -> Result<String> {
    let schema = schemas.require(type_name)?;
    let config = load_config(config_path)?;
    let attributes: Attributes = schema.populate(&config)?;
    to_json(&attributes, pretty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SCHEMAS: &str = r#"
[[schema]]
name = "Solver"
fields = { nx = { required = true, coerce = "int64" }, tol = { coerce = "float64" } }

[[schema]]
name = "Source"
fields = { freq = { required = true, coerce = "complex128" }, amp = { rename = "_amp", coerce = "float" } }
"#;

    fn schemas() -> SchemaSet {
        SchemaSet::from_toml_str(SCHEMAS).unwrap()
    }

    fn write_config(dir: &tempfile::TempDir, name: &str, text: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_keys_for_all_schemas() {
        let out = handle_keys(&schemas(), &[], false, false).unwrap();
        assert_eq!(
            out,
            r#"{"Solver":{"required":["nx"],"optional":["tol"]},"Source":{"required":["freq"],"optional":["amp"]}}"#
        );
    }

    #[test]
    fn test_keys_combined() {
        let out = handle_keys(&schemas(), &["Solver".into(), "Source".into()], true, false).unwrap();
        assert_eq!(out, r#"{"required":["freq","nx"],"optional":["amp","tol"]}"#);
    }

    #[test]
    fn test_keys_unknown_schema() {
        assert!(handle_keys(&schemas(), &["Ghost".into()], false, false).is_err());
    }

    #[test]
    fn test_filter_prunes_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "run.yaml", "nx: 4\nfreq: 5+2j\ncolour: red\n");
        let out = handle_filter(&schemas(), &["Solver".into(), "Source".into()], &path, false)
            .unwrap();
        assert_eq!(out, r#"{"freq":"5+2j","nx":4}"#);
    }

    #[test]
    fn test_filter_reports_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "run.json", r#"{"nx": 4}"#);
        let err = handle_filter(&schemas(), &["Solver".into(), "Source".into()], &path, false)
            .unwrap_err();
        assert!(err.to_string().contains("Source requires parameter 'freq'"));
    }

    #[test]
    fn test_construct_coerces_and_renames() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "run.toml", "freq = \"3+4j\"\namp = \"0.5\"\n");
        let out = handle_construct(&schemas(), "Source", &path, false).unwrap();
        assert_eq!(out, r#"{"_amp":0.5,"freq":{"re":3.0,"im":4.0}}"#);
    }
}
