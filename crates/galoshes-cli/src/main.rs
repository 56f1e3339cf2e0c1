//! # Galoshes CLI
//!
//! A thin command-line client over the `galoshes` library. Schemas come from a
//! schema document (TOML or JSON) instead of Rust code; configurations come
//! from JSON, TOML or YAML files. Everything else (merging, validation,
//! coercion, pruning) is the library's job.
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (src/cli/)                                       │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Dispatch + file loading (commands.rs, input.rs)          │
//! │  - JSON rendering (render.rs)                               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  galoshes library                                           │
//! │  - SchemaSet, Schema::populate, ConfigFilter                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Settings that outlive a single invocation (output style, a default schema
//! document, the log filter) live in `settings.rs`.

mod cli;
mod settings;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
