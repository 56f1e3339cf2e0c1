//! Mapped-object construction.
//!
//! Construction runs in two phases. First the type's [`Schema`] populates an
//! [`Attributes`] table from the configuration: required keys are checked,
//! values are coerced, renames are applied. Only when every declared key has
//! been processed does the type's own [`AttributeMapper::initialize`] run,
//! receiving the populated attributes together with the original arguments.

use std::collections::btree_map;
use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::trace;

use crate::error::{GaloshesError, Result};
use crate::schema::Schema;
use crate::value::{Config, FromValue, Value};

/// Attribute values of one mapped object, keyed by attribute name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attributes {
    #[serde(skip)]
    owner: String,
    #[serde(flatten)]
    values: BTreeMap<String, Value>,
}

impl Attributes {
    /// An empty table for an object of type `owner`.
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            values: BTreeMap::new(),
        }
    }

    /// The type name reported in attribute errors.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Look up an attribute. Fails like a missing attribute access when the
    /// field was optional and absent from the configuration.
    pub fn get(&self, name: &str) -> Result<&Value> {
        self.values
            .get(name)
            .ok_or_else(|| GaloshesError::MissingAttribute {
                owner: self.owner.clone(),
                name: name.to_string(),
            })
    }

    /// Look up an attribute and extract it as `T`.
    pub fn get_as<T: FromValue>(&self, name: &str) -> Result<T> {
        let value = self.get(name)?;
        T::from_value(value).ok_or_else(|| GaloshesError::AttributeType {
            owner: self.owner.clone(),
            name: name.to_string(),
            expected: T::EXPECTED,
            found: value.kind_name(),
        })
    }

    /// Like [`Attributes::get_as`], but an absent attribute is `None`.
    pub fn get_opt<T: FromValue>(&self, name: &str) -> Result<Option<T>> {
        if self.contains(name) {
            self.get_as(name).map(Some)
        } else {
            Ok(None)
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.values.insert(name.into(), value)
    }

    /// Remove an attribute; removing an absent one is a no-op.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.values.iter()
    }

    pub fn into_values(self) -> BTreeMap<String, Value> {
        self.values
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl Schema {
    /// Populate attributes from `config` according to this registry.
    ///
    /// Keys are processed in sorted order. The first required key missing
    /// from `config` or the first coercion failure aborts with an error, and
    /// no attributes are returned. `config` itself is never modified.
    pub fn populate(&self, config: &Config) -> Result<Attributes> {
        let mut attributes = Attributes::new(self.name());

        for decl in self.fields() {
            let Some(raw) = config.get(&decl.key) else {
                if decl.required {
                    return Err(GaloshesError::MissingRequiredKey {
                        type_name: self.name().to_string(),
                        key: decl.key.clone(),
                    });
                }
                continue;
            };

            let value = decl.coerce_value(self.name(), raw)?;
            trace!(
                schema = %self.name(),
                key = %decl.key,
                attribute = decl.stored_name(),
                "mapped configuration key"
            );
            attributes.insert(decl.stored_name(), value);
        }

        Ok(attributes)
    }
}

/// A type whose instances are built from a configuration dictionary.
///
/// Implementors supply their merged [`Schema`] and an initializer. The
/// initializer receives attributes that are already populated; it performs
/// auxiliary setup and must not re-derive the mapped values from `config`.
///
/// ```
/// use galoshes::attributes::{Coercer, FieldDecl};
/// use galoshes::{construct, AttributeMapper, Attributes, Config, Result, Schema, Value};
/// use once_cell::sync::Lazy;
///
/// struct Grid {
///     attrs: Attributes,
/// }
///
/// impl AttributeMapper for Grid {
///     fn schema() -> &'static Schema {
///         static SCHEMA: Lazy<Schema> = Lazy::new(|| {
///             Schema::builder("Grid")
///                 .field(FieldDecl::required("nx").coerce(Coercer::Int64))
///                 .build()
///         });
///         &SCHEMA
///     }
///
///     fn initialize(attrs: Attributes, _config: &Config, _extra: &[Value]) -> Result<Self> {
///         Ok(Grid { attrs })
///     }
/// }
///
/// let config = Config::from([("nx".to_string(), Value::from("10"))]);
/// let grid: Grid = construct(&config, &[]).unwrap();
/// assert_eq!(grid.attrs.get_as::<i64>("nx").unwrap(), 10);
/// ```
pub trait AttributeMapper: Sized {
    /// The type's merged declaration registry, built once.
    fn schema() -> &'static Schema;

    /// Finish construction after the mapped attributes are populated.
    fn initialize(attributes: Attributes, config: &Config, extra: &[Value]) -> Result<Self>;

    /// Keys this type requires.
    fn required() -> BTreeSet<&'static str> {
        Self::schema().required()
    }

    /// Keys this type accepts but does not require.
    fn optional() -> BTreeSet<&'static str> {
        Self::schema().optional()
    }
}

/// Build a `T` from a configuration and extra positional arguments.
pub fn construct<T: AttributeMapper>(config: &Config, extra: &[Value]) -> Result<T> {
    let attributes = T::schema().populate(config)?;
    T::initialize(attributes, config, extra)
}

/// Build a `T` from loosely-typed positional arguments.
///
/// The first argument must be the configuration mapping; the rest are passed
/// through to the initializer.
pub fn construct_from_args<T: AttributeMapper>(args: &[Value]) -> Result<T> {
    let type_name = T::schema().name();
    let (first, extra) = args
        .split_first()
        .ok_or_else(|| GaloshesError::ArgumentCount {
            type_name: type_name.to_string(),
        })?;
    let config = first.as_map().ok_or_else(|| GaloshesError::NotAMapping {
        type_name: type_name.to_string(),
        found: first.kind_name(),
    })?;
    construct(config, extra)
}
