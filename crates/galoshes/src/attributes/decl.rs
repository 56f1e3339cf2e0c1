//! Field declarations: one entry of a type's declaration table.

use tracing::debug;

use super::coerce::Coercer;
use crate::error::{GaloshesError, Result};
use crate::value::Value;

/// How one configuration key maps onto an attribute.
#[derive(Debug, Clone)]
pub struct FieldDecl {
    /// The configuration key to read.
    pub key: String,

    /// Whether construction fails when the key is absent.
    pub required: bool,

    /// Attribute name to store under; `None` stores under `key`.
    pub rename: Option<String>,

    /// Coercion applied to the raw value; `None` stores it unchanged.
    pub coercer: Option<Coercer>,
}

impl FieldDecl {
    /// Create an optional declaration with no rename and no coercion.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            required: false,
            rename: None,
            coercer: None,
        }
    }

    /// Shorthand for a required declaration.
    pub fn required(key: impl Into<String>) -> Self {
        Self::new(key).require()
    }

    /// Shorthand for an optional declaration.
    pub fn optional(key: impl Into<String>) -> Self {
        Self::new(key)
    }

    /// Set the required flag.
    pub fn require(mut self) -> Self {
        self.required = true;
        self
    }

    /// Store the value under a different attribute name.
    pub fn rename(mut self, name: impl Into<String>) -> Self {
        self.rename = Some(name.into());
        self
    }

    /// Coerce the value before storing it.
    pub fn coerce(mut self, coercer: Coercer) -> Self {
        self.coercer = Some(coercer);
        self
    }

    /// The attribute name the value ends up under.
    pub fn stored_name(&self) -> &str {
        self.rename.as_deref().unwrap_or(&self.key)
    }

    /// Coerce a raw configuration value for `type_name`.
    ///
    /// A coercer targeting a real floating type that rejects a complex value
    /// with a non-zero imaginary part with a type failure is retried on the
    /// real component; the imaginary part is discarded. `3+0j` is not retried. Every other failure is reported as
    /// [`GaloshesError::Coercion`].
    pub fn coerce_value(&self, type_name: &str, raw: &Value) -> Result<Value> {
        let Some(coercer) = &self.coercer else {
            return Ok(raw.clone());
        };

        let failure = match coercer.apply(raw) {
            Ok(value) => return Ok(value),
            Err(failure) => failure,
        };

        let retry = failure.kind == super::FailureKind::Type
            && raw.has_imaginary_part()
            && coercer.is_real_floating();
        let failure = if retry {
            debug!(
                target: "galoshes::coerce",
                type_name,
                key = %self.key,
                coercer = %coercer,
                "discarding imaginary part for real floating coercer"
            );
            match coercer.apply(&raw.real_part()) {
                Ok(value) => return Ok(value),
                Err(failure) => failure,
            }
        } else {
            failure
        };

        Err(GaloshesError::Coercion {
            type_name: type_name.to_string(),
            key: self.key.clone(),
            coercer: coercer.name().to_string(),
            source: failure,
        })
    }
}

/// A declaration table entry: either a field, or the retraction of an
/// inherited one.
#[derive(Debug, Clone)]
pub enum Slot {
    Present(FieldDecl),
    Removed,
}

impl From<FieldDecl> for Slot {
    fn from(decl: FieldDecl) -> Self {
        Slot::Present(decl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{CoerceFailure, FailureKind};
    use crate::value::Complex;

    #[test]
    fn test_stored_name_defaults_to_key() {
        assert_eq!(FieldDecl::required("freq").stored_name(), "freq");
        assert_eq!(FieldDecl::optional("c").rename("_c").stored_name(), "_c");
    }

    #[test]
    fn test_builder_sets_flags() {
        let decl = FieldDecl::new("dx").require().coerce(Coercer::Float64);
        assert!(decl.required);
        assert_eq!(decl.coercer.as_ref().map(Coercer::name), Some("float64"));
        assert!(!FieldDecl::optional("dx").required);
    }

    #[test]
    fn test_no_coercer_stores_value_unchanged() {
        let decl = FieldDecl::optional("anything");
        let raw = Value::List(vec![Value::Int(1)]);
        assert_eq!(decl.coerce_value("T", &raw).unwrap(), raw);
    }

    #[test]
    fn test_complex_to_float_keeps_real_part() {
        let decl = FieldDecl::required("rho").coerce(Coercer::Float64);
        let raw = Value::Complex(Complex::new(3.0, 4.0));
        assert_eq!(decl.coerce_value("T", &raw).unwrap(), Value::Float(3.0));
    }

    #[test]
    fn test_complex_to_int_is_not_narrowed() {
        let decl = FieldDecl::required("nx").coerce(Coercer::Int64);
        let raw = Value::Complex(Complex::new(3.0, 4.0));
        let err = decl.coerce_value("Grid", &raw).unwrap_err();
        match err {
            GaloshesError::Coercion {
                type_name,
                key,
                coercer,
                source,
            } => {
                assert_eq!(type_name, "Grid");
                assert_eq!(key, "nx");
                assert_eq!(coercer, "int64");
                assert_eq!(source.kind, FailureKind::Type);
            }
            other => panic!("Expected Coercion, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_imaginary_complex_to_float_is_not_narrowed() {
        let decl = FieldDecl::required("x").coerce(Coercer::Float64);
        let raw = Value::Complex(Complex::new(3.0, 0.0));
        match decl.coerce_value("T", &raw).unwrap_err() {
            GaloshesError::Coercion { key, source, .. } => {
                assert_eq!(key, "x");
                assert_eq!(source.kind, FailureKind::Type);
            }
            other => panic!("Expected Coercion, got {other:?}"),
        }
    }

    #[test]
    fn test_value_failure_on_float_is_not_retried() {
        let decl = FieldDecl::required("dx").coerce(Coercer::Float64);
        let err = decl
            .coerce_value("T", &Value::Str("wide".into()))
            .unwrap_err();
        assert!(matches!(err, GaloshesError::Coercion { .. }));
    }

    #[test]
    fn test_custom_floating_coercer_gets_real_part() {
        let strict = Coercer::custom_floating("strict_float", |v| match v {
            Value::Float(f) => Ok(Value::Float(*f * 10.0)),
            _ => Err(CoerceFailure::type_error("floats only")),
        });
        let decl = FieldDecl::required("x").coerce(strict);
        let raw = Value::Complex(Complex::new(1.5, -2.0));
        assert_eq!(decl.coerce_value("T", &raw).unwrap(), Value::Float(15.0));
    }

    #[test]
    fn test_custom_non_floating_coercer_is_not_retried() {
        let strict = Coercer::custom("strict", |v| match v {
            Value::Float(_) => Ok(v.clone()),
            _ => Err(CoerceFailure::type_error("floats only")),
        });
        let decl = FieldDecl::required("x").coerce(strict);
        let raw = Value::Complex(Complex::new(1.5, -2.0));
        assert!(decl.coerce_value("T", &raw).is_err());
    }
}
