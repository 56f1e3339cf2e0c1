//! Coercers: how a raw configuration value becomes a stored attribute.
//!
//! The built-in targets follow numpy scalar constructor semantics closely
//! enough for configuration work: numeric strings parse, floats truncate to
//! integers, and complex input refuses to narrow to a real type with a *type*
//! failure. That last distinction matters to the constructor, which retries a
//! type failure on the real component when the target is a real floating type.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::value::{Complex, Value};

/// Why a coercer rejected a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The value's type cannot be converted at all (e.g. complex to float).
    Type,
    /// The type is acceptable but this particular value is not (e.g. "ten" to int).
    Value,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Type => write!(f, "TypeError"),
            FailureKind::Value => write!(f, "ValueError"),
        }
    }
}

/// A coercer-level failure, carried as the source of a coercion error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct CoerceFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl CoerceFailure {
    pub fn type_error(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Type,
            message: message.into(),
        }
    }

    pub fn value_error(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Value,
            message: message.into(),
        }
    }
}

type CoerceFn = dyn Fn(&Value) -> Result<Value, CoerceFailure> + Send + Sync;

/// A user-supplied coercion function.
#[derive(Clone)]
pub struct CustomCoercer {
    name: String,
    real_floating: bool,
    func: Arc<CoerceFn>,
}

impl fmt::Debug for CustomCoercer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomCoercer")
            .field("name", &self.name)
            .field("real_floating", &self.real_floating)
            .finish_non_exhaustive()
    }
}

/// The coercion applied to a declared key.
#[derive(Debug, Clone)]
pub enum Coercer {
    Float64,
    Float32,
    Int64,
    Int32,
    Complex128,
    Bool,
    Str,
    List,
    Custom(CustomCoercer),
}

impl Coercer {
    /// Wrap a function as a coercer.
    pub fn custom<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, CoerceFailure> + Send + Sync + 'static,
    {
        Coercer::Custom(CustomCoercer {
            name: name.into(),
            real_floating: false,
            func: Arc::new(func),
        })
    }

    /// Wrap a function that produces real floating values.
    ///
    /// Complex input that it rejects with a type failure is retried on the
    /// real component, as with [`Coercer::Float64`].
    pub fn custom_floating<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, CoerceFailure> + Send + Sync + 'static,
    {
        Coercer::Custom(CustomCoercer {
            name: name.into(),
            real_floating: true,
            func: Arc::new(func),
        })
    }

    pub fn name(&self) -> &str {
        match self {
            Coercer::Float64 => "float64",
            Coercer::Float32 => "float32",
            Coercer::Int64 => "int64",
            Coercer::Int32 => "int32",
            Coercer::Complex128 => "complex128",
            Coercer::Bool => "bool",
            Coercer::Str => "str",
            Coercer::List => "list",
            Coercer::Custom(custom) => &custom.name,
        }
    }

    /// Whether this coercer targets a real floating type.
    pub fn is_real_floating(&self) -> bool {
        match self {
            Coercer::Float64 | Coercer::Float32 => true,
            Coercer::Custom(custom) => custom.real_floating,
            _ => false,
        }
    }

    pub fn apply(&self, value: &Value) -> Result<Value, CoerceFailure> {
        match self {
            Coercer::Float64 => to_float(value).map(Value::Float),
            Coercer::Float32 => to_float(value).map(|v| Value::Float(f64::from(v as f32))),
            Coercer::Int64 => to_int(value).map(Value::Int),
            Coercer::Int32 => {
                let v = to_int(value)?;
                i32::try_from(v)
                    .map(|v| Value::Int(v.into()))
                    .map_err(|_| CoerceFailure::value_error(format!("{v} out of range for int32")))
            }
            Coercer::Complex128 => to_complex(value).map(Value::Complex),
            Coercer::Bool => to_bool(value).map(Value::Bool),
            Coercer::Str => Ok(match value {
                Value::Str(s) => Value::Str(s.clone()),
                other => Value::Str(other.to_string()),
            }),
            Coercer::List => to_list(value).map(Value::List),
            Coercer::Custom(custom) => (custom.func)(value),
        }
    }
}

impl fmt::Display for Coercer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCoercer(pub String);

impl fmt::Display for UnknownCoercer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown coercer '{}'", self.0)
    }
}

impl std::error::Error for UnknownCoercer {}

impl FromStr for Coercer {
    type Err = UnknownCoercer;

    /// Built-in coercers by name, as used in schema documents.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "float64" | "float" | "f64" => Ok(Coercer::Float64),
            "float32" | "f32" => Ok(Coercer::Float32),
            "int64" | "int" | "i64" => Ok(Coercer::Int64),
            "int32" | "i32" => Ok(Coercer::Int32),
            "complex128" | "complex" => Ok(Coercer::Complex128),
            "bool" => Ok(Coercer::Bool),
            "str" | "string" => Ok(Coercer::Str),
            "list" => Ok(Coercer::List),
            _ => Err(UnknownCoercer(s.to_string())),
        }
    }
}

fn not_a_number(target: &str, value: &Value) -> CoerceFailure {
    CoerceFailure::type_error(format!(
        "{target}() argument must be a string or a number, not '{}'",
        value.kind_name()
    ))
}

fn to_float(value: &Value) -> Result<f64, CoerceFailure> {
    match value {
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Int(i) => Ok(*i as f64),
        Value::Float(f) => Ok(*f),
        Value::Str(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| CoerceFailure::value_error(format!("could not convert string to float: '{s}'"))),
        Value::Complex(_) => Err(CoerceFailure::type_error("can't convert complex to float")),
        other => Err(not_a_number("float", other)),
    }
}

fn to_int(value: &Value) -> Result<i64, CoerceFailure> {
    match value {
        Value::Bool(b) => Ok(i64::from(*b)),
        Value::Int(i) => Ok(*i),
        Value::Float(f) => {
            let truncated = f.trunc();
            if !truncated.is_finite() {
                return Err(CoerceFailure::value_error(format!(
                    "cannot convert float {f} to integer"
                )));
            }
            // i64::MAX as f64 rounds up to 2^63, which is already out of range.
            if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
                return Err(CoerceFailure::value_error(format!("{f} out of range for int64")));
            }
            Ok(truncated as i64)
        }
        Value::Str(s) => s.trim().parse::<i64>().map_err(|_| {
            CoerceFailure::value_error(format!("invalid literal for int() with base 10: '{s}'"))
        }),
        Value::Complex(_) => Err(CoerceFailure::type_error("can't convert complex to int")),
        other => Err(not_a_number("int", other)),
    }
}

fn to_complex(value: &Value) -> Result<Complex, CoerceFailure> {
    match value {
        Value::Bool(b) => Ok(Complex::new(if *b { 1.0 } else { 0.0 }, 0.0)),
        Value::Int(i) => Ok(Complex::new(*i as f64, 0.0)),
        Value::Float(f) => Ok(Complex::new(*f, 0.0)),
        Value::Complex(c) => Ok(*c),
        Value::Str(s) => s
            .parse::<Complex>()
            .map_err(|err| CoerceFailure::value_error(err.to_string())),
        other => Err(not_a_number("complex", other)),
    }
}

fn to_bool(value: &Value) -> Result<bool, CoerceFailure> {
    match value {
        Value::Null => Ok(false),
        Value::Bool(b) => Ok(*b),
        Value::Int(i) => Ok(*i != 0),
        Value::Float(f) => Ok(*f != 0.0),
        Value::Complex(c) => Ok(c.re != 0.0 || c.im != 0.0),
        Value::Str(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" | "" => Ok(false),
            _ => Err(CoerceFailure::value_error(format!("not a boolean: '{s}'"))),
        },
        Value::List(items) => Ok(!items.is_empty()),
        Value::Map(map) => Ok(!map.is_empty()),
    }
}

fn to_list(value: &Value) -> Result<Vec<Value>, CoerceFailure> {
    match value {
        Value::List(items) => Ok(items.clone()),
        Value::Str(s) => Ok(s.chars().map(|c| Value::Str(c.to_string())).collect()),
        Value::Map(map) => Ok(map.keys().cloned().map(Value::Str).collect()),
        other => Err(CoerceFailure::type_error(format!(
            "'{}' object is not iterable",
            other.kind_name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float64_accepts_numbers_and_numeric_strings() {
        assert_eq!(Coercer::Float64.apply(&Value::Int(3)), Ok(Value::Float(3.0)));
        assert_eq!(
            Coercer::Float64.apply(&Value::Str(" 2.5 ".into())),
            Ok(Value::Float(2.5))
        );
        assert_eq!(Coercer::Float64.apply(&Value::Bool(true)), Ok(Value::Float(1.0)));
    }

    #[test]
    fn test_float64_rejects_complex_with_type_failure() {
        let err = Coercer::Float64
            .apply(&Value::Complex(Complex::new(3.0, 4.0)))
            .unwrap_err();
        assert_eq!(err.kind, FailureKind::Type);
    }

    #[test]
    fn test_float64_rejects_bad_string_with_value_failure() {
        let err = Coercer::Float64.apply(&Value::Str("abc".into())).unwrap_err();
        assert_eq!(err.kind, FailureKind::Value);
    }

    #[test]
    fn test_float32_rounds_to_single_precision() {
        let Value::Float(v) = Coercer::Float32.apply(&Value::Float(0.1)).unwrap() else {
            panic!("Expected Float");
        };
        assert_eq!(v, f64::from(0.1f32));
        assert_ne!(v, 0.1);
    }

    #[test]
    fn test_int64_parses_strings_and_truncates_floats() {
        assert_eq!(Coercer::Int64.apply(&Value::Str("10".into())), Ok(Value::Int(10)));
        assert_eq!(Coercer::Int64.apply(&Value::Float(3.7)), Ok(Value::Int(3)));
        assert_eq!(Coercer::Int64.apply(&Value::Float(-3.7)), Ok(Value::Int(-3)));
    }

    #[test]
    fn test_int64_rejects_non_integer_strings() {
        let err = Coercer::Int64.apply(&Value::Str("3.5".into())).unwrap_err();
        assert_eq!(err.kind, FailureKind::Value);
    }

    #[test]
    fn test_int64_rejects_nan_and_overflow() {
        assert!(Coercer::Int64.apply(&Value::Float(f64::NAN)).is_err());
        assert!(Coercer::Int64.apply(&Value::Float(1e300)).is_err());
    }

    #[test]
    fn test_int64_rejects_complex_with_type_failure() {
        let err = Coercer::Int64
            .apply(&Value::Complex(Complex::new(1.0, 1.0)))
            .unwrap_err();
        assert_eq!(err.kind, FailureKind::Type);
    }

    #[test]
    fn test_int32_checks_range() {
        assert_eq!(Coercer::Int32.apply(&Value::Int(7)), Ok(Value::Int(7)));
        assert!(Coercer::Int32.apply(&Value::Int(i64::from(i32::MAX) + 1)).is_err());
    }

    #[test]
    fn test_complex128_widens_and_parses() {
        assert_eq!(
            Coercer::Complex128.apply(&Value::Float(1.5)),
            Ok(Value::Complex(Complex::new(1.5, 0.0)))
        );
        assert_eq!(
            Coercer::Complex128.apply(&Value::Str("5+2j".into())),
            Ok(Value::Complex(Complex::new(5.0, 2.0)))
        );
    }

    #[test]
    fn test_bool_accepts_common_spellings() {
        assert_eq!(Coercer::Bool.apply(&Value::Str("yes".into())), Ok(Value::Bool(true)));
        assert_eq!(Coercer::Bool.apply(&Value::Str("off".into())), Ok(Value::Bool(false)));
        assert_eq!(Coercer::Bool.apply(&Value::Int(0)), Ok(Value::Bool(false)));
        assert!(Coercer::Bool.apply(&Value::Str("maybe".into())).is_err());
    }

    #[test]
    fn test_str_renders_any_value() {
        assert_eq!(Coercer::Str.apply(&Value::Int(4)), Ok(Value::Str("4".into())));
        assert_eq!(
            Coercer::Str.apply(&Value::Str("x".into())),
            Ok(Value::Str("x".into()))
        );
    }

    #[test]
    fn test_list_copies_and_iterates() {
        let items = Value::List(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(Coercer::List.apply(&items), Ok(items.clone()));
        assert_eq!(
            Coercer::List.apply(&Value::Str("ab".into())),
            Ok(Value::List(vec![Value::Str("a".into()), Value::Str("b".into())]))
        );
        let err = Coercer::List.apply(&Value::Int(1)).unwrap_err();
        assert_eq!(err.kind, FailureKind::Type);
    }

    #[test]
    fn test_custom_coercer_runs_function() {
        let double = Coercer::custom("double", |v| {
            v.as_i64()
                .map(|i| Value::Int(i * 2))
                .ok_or_else(|| CoerceFailure::type_error("expected int"))
        });
        assert_eq!(double.name(), "double");
        assert!(!double.is_real_floating());
        assert_eq!(double.apply(&Value::Int(21)), Ok(Value::Int(42)));
    }

    #[test]
    fn test_real_floating_targets() {
        assert!(Coercer::Float64.is_real_floating());
        assert!(Coercer::Float32.is_real_floating());
        assert!(!Coercer::Complex128.is_real_floating());
        assert!(!Coercer::Int64.is_real_floating());
        assert!(Coercer::custom_floating("f", |v| Ok(v.clone())).is_real_floating());
    }

    #[test]
    fn test_parse_coercer_names() {
        assert_eq!("float".parse::<Coercer>().unwrap().name(), "float64");
        assert_eq!("I32".parse::<Coercer>().unwrap().name(), "int32");
        assert_eq!("complex".parse::<Coercer>().unwrap().name(), "complex128");
        assert!("decimal".parse::<Coercer>().is_err());
    }
}
