//! Configuration filtering.
//!
//! A [`ConfigFilter`] combines the declared keys of several types. Applied to
//! a configuration dictionary it checks that every combined required key is
//! present and returns only the entries some type declares, which makes it a
//! convenient way to hand each component just the slice of a shared
//! configuration it understands.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, trace};

use crate::error::{GaloshesError, Result};
use crate::mapper::AttributeMapper;
use crate::schema::Schema;
use crate::value::Config;

/// Validator and pruner built from one or more schemas.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFilter {
    /// Required key -> name of the first schema that requires it.
    required: BTreeMap<String, String>,
    optional: BTreeSet<String>,
}

impl ConfigFilter {
    /// Combine the declared keys of `schemas`.
    ///
    /// A key required by any schema is required by the filter and is never
    /// also reported as optional.
    pub fn new<'a, I>(schemas: I) -> Self
    where
        I: IntoIterator<Item = &'a Schema>,
    {
        let mut required: BTreeMap<String, String> = BTreeMap::new();
        let mut optional: BTreeSet<String> = BTreeSet::new();
        let mut count = 0usize;

        for schema in schemas {
            count += 1;
            for key in schema.required() {
                required
                    .entry(key.to_string())
                    .or_insert_with(|| schema.name().to_string());
            }
            optional.extend(schema.optional().into_iter().map(str::to_string));
        }
        optional.retain(|key| !required.contains_key(key));

        debug!(
            schemas = count,
            required = required.len(),
            optional = optional.len(),
            "built configuration filter"
        );

        Self { required, optional }
    }

    /// A filter over a single mapped type.
    pub fn for_type<T: AttributeMapper>() -> Self {
        Self::new([T::schema()])
    }

    pub fn required(&self) -> BTreeSet<&str> {
        self.required.keys().map(String::as_str).collect()
    }

    pub fn optional(&self) -> BTreeSet<&str> {
        self.optional.iter().map(String::as_str).collect()
    }

    /// Whether `key` is declared by any of the combined schemas.
    pub fn accepts(&self, key: &str) -> bool {
        self.required.contains_key(key) || self.optional.contains(key)
    }

    /// Validate `config` and return the declared subset of it.
    ///
    /// Fails with [`GaloshesError::MissingRequiredKey`] naming the schema
    /// that demanded the first missing key. Undeclared keys are dropped
    /// silently.
    pub fn filter(&self, config: &Config) -> Result<Config> {
        if let Some((key, type_name)) = self
            .required
            .iter()
            .find(|(key, _)| !config.contains_key(key.as_str()))
        {
            return Err(GaloshesError::MissingRequiredKey {
                type_name: type_name.clone(),
                key: key.clone(),
            });
        }

        let mut kept = Config::new();
        for (key, value) in config {
            if self.accepts(key) {
                kept.insert(key.clone(), value.clone());
            } else {
                trace!(key = %key, "dropping undeclared configuration key");
            }
        }
        Ok(kept)
    }
}

impl From<&Schema> for ConfigFilter {
    fn from(schema: &Schema) -> Self {
        Self::new([schema])
    }
}

impl<'a> FromIterator<&'a Schema> for ConfigFilter {
    fn from_iter<I: IntoIterator<Item = &'a Schema>>(iter: I) -> Self {
        Self::new(iter)
    }
}
