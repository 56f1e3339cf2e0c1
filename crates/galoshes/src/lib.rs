//! # Galoshes Architecture
//!
//! Galoshes turns loosely-typed configuration dictionaries into populated
//! objects. A type declares, per configuration key, whether the key is
//! required, which attribute it lands in and how its value is coerced. The
//! library does the bookkeeping: merging declarations across a type's bases,
//! checking presence, coercing, and pruning configurations down to the keys a
//! set of types actually understands.
//!
//! Like any library meant to be embedded, nothing here writes to stdout or
//! stderr. Diagnostics go through `tracing` at `debug`/`trace` level; errors
//! are returned, never logged.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Caching (cache.rs)                                         │
//! │  - Pruned configuration copy + invalidated derived values   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Construction (mapper.rs) and Filtering (filter.rs)         │
//! │  - Schema::populate, construct(), ConfigFilter              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Declaration Registry (schema.rs, document.rs)              │
//! │  - Per-type merged tables, built once                       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Declarations and Values (attributes/, value.rs)            │
//! │  - FieldDecl, Slot, Coercer, Value, Config                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Tour
//!
//! ```
//! use galoshes::attributes::{Coercer, FieldDecl};
//! use galoshes::{Complex, Config, ConfigFilter, GaloshesError, Schema, Value};
//!
//! let schema = Schema::builder("Wave")
//!     .field(FieldDecl::required("freq").coerce(Coercer::Complex128))
//!     .field(FieldDecl::required("nx").coerce(Coercer::Int64))
//!     .build();
//!
//! let config = Config::from([
//!     ("freq".to_string(), Value::from(Complex::new(5.0, 2.0))),
//!     ("nx".to_string(), Value::from("10")),
//!     ("colour".to_string(), Value::from("red")),
//! ]);
//!
//! let attrs = schema.populate(&config).unwrap();
//! assert_eq!(attrs.get_as::<i64>("nx").unwrap(), 10);
//!
//! let pruned = ConfigFilter::from(&schema).filter(&config).unwrap();
//! assert!(!pruned.contains_key("colour"));
//!
//! let missing = Config::from([("nx".to_string(), Value::from(10))]);
//! assert!(matches!(
//!     schema.populate(&missing),
//!     Err(GaloshesError::MissingRequiredKey { .. })
//! ));
//! ```
//!
//! ## Testing Strategy
//!
//! Each module carries focused unit tests. Cross-module behavior (inheritance
//! chains, construction through [`AttributeMapper`], caching objects) lives in
//! `tests/`, including property tests for the merge and filter laws.

pub mod attributes;
pub mod cache;
pub mod document;
pub mod error;
pub mod filter;
pub mod mapper;
pub mod schema;
pub mod value;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

pub use cache::CachedObject;
pub use document::{SchemaDocument, SchemaSet};
pub use error::{GaloshesError, Result};
pub use filter::ConfigFilter;
pub use mapper::{construct, construct_from_args, AttributeMapper, Attributes};
pub use schema::{Schema, SchemaBuilder};
pub use value::{Complex, Config, FromValue, Value};
