//! # Attribute Declarations
//!
//! A type describes the configuration it consumes with a table of field
//! declarations. Each declaration answers three questions about one key:
//!
//! - **Required?** Construction fails when a required key is absent.
//! - **Stored as?** The attribute name, which defaults to the key itself.
//! - **Coerced how?** An optional [`Coercer`] applied to the raw value.
//!
//! ## Declaration Table
//!
//! | Key | Required | Rename | Coercer |
//! |-----|----------|--------|---------|
//! | `c` | yes | `_c` | `complex128` |
//! | `rho` | no | `_rho` | `float64` |
//! | `freq` | yes | | `complex128` |
//! | `nx` | yes | | `int64` |
//! | `freeSurf` | no | `_freeSurf` | `list` |
//!
//! ## Usage
//!
//! ```
//! use galoshes::attributes::{Coercer, FieldDecl};
//!
//! let freq = FieldDecl::required("freq").coerce(Coercer::Complex128);
//! let rho = FieldDecl::optional("rho").rename("_rho").coerce(Coercer::Float64);
//! assert_eq!(rho.stored_name(), "_rho");
//! assert!(freq.required);
//! ```
//!
//! ## Complex Narrowing
//!
//! A complex value handed to a real floating coercer keeps its real part and
//! silently loses its imaginary part. No other coercer pair is narrowed.

mod coerce;
mod decl;

pub use coerce::{CoerceFailure, Coercer, CustomCoercer, FailureKind, UnknownCoercer};
pub use decl::{FieldDecl, Slot};
