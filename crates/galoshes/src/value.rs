//! Configuration values.
//!
//! Configuration dictionaries are loosely typed: the same key may arrive as a
//! string from a JSON file or as a number from code. [`Value`] captures every
//! shape a configuration entry can take, and [`Config`] is the dictionary
//! itself.

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A configuration dictionary: string keys to loosely-typed values.
pub type Config = BTreeMap<String, Value>;

/// A complex number with `f64` components.
///
/// Serialized as `{"re": .., "im": ..}`. Parses from the Python literal forms
/// `"5+2j"`, `"3j"` and `"-1.5-2j"` (an `i` suffix is accepted too).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }
}

// Only a map with exactly `re` and `im` is a complex number. A derived impl
// would also accept `[re, im]`, turning two-element lists into complex values.
impl<'de> Deserialize<'de> for Complex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ComplexVisitor;

        impl<'de> Visitor<'de> for ComplexVisitor {
            type Value = Complex;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map with `re` and `im`")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Complex, A::Error> {
                let mut re = None;
                let mut im = None;
                while let Some(key) = map.next_key::<String>()? {
                    let slot = match key.as_str() {
                        "re" => &mut re,
                        "im" => &mut im,
                        other => return Err(de::Error::unknown_field(other, &["re", "im"])),
                    };
                    if slot.is_some() {
                        return Err(de::Error::custom(format!("duplicate field `{key}`")));
                    }
                    *slot = Some(map.next_value::<f64>()?);
                }
                let re = re.ok_or_else(|| de::Error::missing_field("re"))?;
                let im = im.ok_or_else(|| de::Error::missing_field("im"))?;
                Ok(Complex::new(re, im))
            }
        }

        deserializer.deserialize_map(ComplexVisitor)
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.im.is_sign_negative() {
            write!(f, "{}-{}j", self.re, -self.im)
        } else {
            write!(f, "{}+{}j", self.re, self.im)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseComplexError(String);

impl fmt::Display for ParseComplexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "complex() arg is a malformed string: '{}'", self.0)
    }
}

impl std::error::Error for ParseComplexError {}

impl FromStr for Complex {
    type Err = ParseComplexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ParseComplexError(s.to_string());
        let text: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let text = text
            .strip_prefix('(')
            .and_then(|t| t.strip_suffix(')'))
            .unwrap_or(&text);
        if text.is_empty() {
            return Err(malformed());
        }

        let Some(body) = text.strip_suffix(['j', 'J', 'i']) else {
            let re = text.parse::<f64>().map_err(|_| malformed())?;
            return Ok(Complex::new(re, 0.0));
        };

        // Split at the last sign that is not part of an exponent.
        let bytes = body.as_bytes();
        let split = (1..bytes.len())
            .rev()
            .find(|&i| matches!(bytes[i], b'+' | b'-') && !matches!(bytes[i - 1], b'e' | b'E'));

        let parse_imag = |part: &str| -> Result<f64, ParseComplexError> {
            match part {
                "" | "+" => Ok(1.0),
                "-" => Ok(-1.0),
                _ => part.parse::<f64>().map_err(|_| malformed()),
            }
        };

        match split {
            Some(idx) => {
                let re = body[..idx].parse::<f64>().map_err(|_| malformed())?;
                let im = parse_imag(&body[idx..])?;
                Ok(Complex::new(re, im))
            }
            None => Ok(Complex::new(0.0, parse_imag(body)?)),
        }
    }
}

/// A loosely-typed configuration value.
///
/// Serde (de)serializes this untagged, so plain JSON, TOML or YAML data maps
/// onto it directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Complex(Complex),
    Str(String),
    List(Vec<Value>),
    Map(Config),
}

impl Value {
    /// Short type name used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Complex(_) => "complex",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    pub fn is_complex(&self) -> bool {
        matches!(self, Value::Complex(_))
    }

    /// A complex value with a non-zero imaginary part. `3+0j` is not.
    pub fn has_imaginary_part(&self) -> bool {
        matches!(self, Value::Complex(c) if c.im != 0.0)
    }

    /// The real component of a complex value; any other value is returned as is.
    pub fn real_part(&self) -> Value {
        match self {
            Value::Complex(c) => Value::Float(c.re),
            other => other.clone(),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Floats, and integers widened to float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Complex values, and real numbers widened to complex.
    pub fn as_complex(&self) -> Option<Complex> {
        match self {
            Value::Complex(c) => Some(*c),
            Value::Float(v) => Some(Complex::new(*v, 0.0)),
            Value::Int(v) => Some(Complex::new(*v as f64, 0.0)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Config> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Complex(c) => write!(f, "{c}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, item)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {item}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<Complex> for Value {
    fn from(v: Complex) -> Self {
        Value::Complex(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

impl From<Config> for Value {
    fn from(v: Config) -> Self {
        Value::Map(v)
    }
}

/// Typed extraction of a stored attribute value.
pub trait FromValue: Sized {
    /// What the accessor expected, for error messages.
    const EXPECTED: &'static str;

    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for Value {
    const EXPECTED: &'static str = "any";

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromValue for bool {
    const EXPECTED: &'static str = "bool";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FromValue for i64 {
    const EXPECTED: &'static str = "int";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_i64()
    }
}

impl FromValue for f64 {
    const EXPECTED: &'static str = "float";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_f64()
    }
}

impl FromValue for Complex {
    const EXPECTED: &'static str = "complex";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_complex()
    }
}

impl FromValue for String {
    const EXPECTED: &'static str = "str";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl FromValue for Vec<Value> {
    const EXPECTED: &'static str = "list";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_list().map(<[Value]>::to_vec)
    }
}
