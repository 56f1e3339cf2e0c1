//! # CLI Behavior
//!
//! This is one client of the galoshes library. It is the only place that
//! knows about files, stdout/stderr and exit codes.
//!
//! ## Commands
//!
//! - `galoshes keys [TYPE...] [--combined]`: required/optional keys per schema,
//!   or the combined sets a filter over those schemas would use.
//! - `galoshes filter -t TYPE [-t TYPE...] CONFIG`: fail if a required key is
//!   missing, otherwise print CONFIG reduced to the declared keys.
//! - `galoshes construct -t TYPE CONFIG`: print the attributes TYPE would be
//!   populated with, after renames and coercion.
//!
//! ## Module Structure
//!
//! - `commands`: dispatch and per-command handlers
//! - `input`: schema/config loading
//! - `render`: JSON output
//! - `setup`: argument parsing via clap

mod commands;
mod input;
mod render;
pub mod setup;

pub use commands::run;
