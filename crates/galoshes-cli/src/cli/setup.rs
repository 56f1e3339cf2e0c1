use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "galoshes",
    bin_name = "galoshes",
    version,
    disable_help_subcommand = true,
    after_help = "Schemas are read from a TOML or JSON schema document.\nConfigurations may be JSON, TOML or YAML; use '-' to read JSON from stdin."
)]
#[command(about = "Validate, prune and map configuration files against declared schemas", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Schema document (defaults to the `schema` setting)
    #[arg(short, long, global = true, value_name = "FILE", help_heading = "Options")]
    pub schema: Option<PathBuf>,

    /// Pretty-print output (overrides the `pretty` setting)
    #[arg(long, global = true, conflicts_with = "compact", help_heading = "Options")]
    pub pretty: bool,

    /// Compact single-line output
    #[arg(long, global = true, help_heading = "Options")]
    pub compact: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count, help_heading = "Options")]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show required and optional keys of schemas
    Keys {
        /// Schemas to describe (all when omitted)
        types: Vec<String>,

        /// Report the combined filter sets instead of one entry per schema
        #[arg(long)]
        combined: bool,
    },

    /// Check a configuration against schemas and drop undeclared keys
    Filter {
        /// Schemas whose keys are kept
        #[arg(short = 't', long = "type", value_name = "TYPE", required = true)]
        types: Vec<String>,

        /// Configuration file
        config: PathBuf,
    },

    /// Map a configuration onto a schema's attributes
    Construct {
        /// Schema to construct
        #[arg(short = 't', long = "type", value_name = "TYPE")]
        type_name: String,

        /// Configuration file
        config: PathBuf,
    },
}

impl Cli {
    /// Output style: flags win over the setting.
    pub fn pretty_output(&self, setting: bool) -> bool {
        if self.pretty {
            true
        } else if self.compact {
            false
        } else {
            setting
        }
    }

    /// Log filter implied by `-v` flags, if any.
    pub fn verbosity_filter(&self) -> Option<&'static str> {
        match self.verbose {
            0 => None,
            1 => Some("debug"),
            _ => Some("trace"),
        }
    }
}
