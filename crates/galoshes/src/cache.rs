//! Configuration caching.
//!
//! A [`CachedObject`] keeps its own copy of the configuration it was built
//! from, minus the schema's masked keys, next to its mapped attributes.
//! Attributes derived from that configuration are named in the schema's
//! cache-item list and are dropped every time the configuration is replaced,
//! so the next [`CachedObject::cached`] call recomputes them.

use std::collections::BTreeSet;

use tracing::debug;

use crate::error::Result;
use crate::mapper::Attributes;
use crate::schema::Schema;
use crate::value::{Config, Value};

/// Mapped attributes plus a cached configuration copy.
#[derive(Debug, Clone)]
pub struct CachedObject {
    attributes: Attributes,
    config: Config,
    mask_keys: BTreeSet<String>,
    cache_items: Vec<String>,
}

impl CachedObject {
    /// Store a copy of `config` without the schema's masked keys.
    ///
    /// Any attribute on the cache-item list that `attributes` already holds is
    /// cleared, exactly as on a later reassignment.
    pub fn new(schema: &Schema, attributes: Attributes, config: &Config) -> Self {
        let pruned: Config = config
            .iter()
            .filter(|(key, _)| !schema.mask_keys().contains(key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        let mut cached = Self {
            attributes,
            config: Config::new(),
            mask_keys: schema.mask_keys().clone(),
            cache_items: schema.cache_items().to_vec(),
        };
        cached.set_config(pruned);
        cached
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replace the configuration and invalidate every cached attribute.
    ///
    /// The new configuration is stored as given; masking only applies to the
    /// copy taken at construction.
    pub fn set_config(&mut self, config: Config) {
        self.config = config;
        self.clear_cache();
    }

    /// Drop every attribute on the cache-item list. Absent ones are skipped.
    pub fn clear_cache(&mut self) {
        let mut cleared = 0usize;
        for name in &self.cache_items {
            if self.attributes.remove(name).is_some() {
                cleared += 1;
            }
        }
        debug!(owner = %self.attributes.owner(), cleared, "cleared cached attributes");
    }

    /// Return the cached attribute `name`, computing and storing it first if
    /// it is not materialized.
    pub fn cached<F>(&mut self, name: &str, compute: F) -> Result<&Value>
    where
        F: FnOnce(&Config, &Attributes) -> Result<Value>,
    {
        if !self.attributes.contains(name) {
            let value = compute(&self.config, &self.attributes)?;
            self.attributes.insert(name, value);
        }
        self.attributes.get(name)
    }

    pub fn mask_keys(&self) -> &BTreeSet<String> {
        &self.mask_keys
    }

    pub fn cache_items(&self) -> &[String] {
        &self.cache_items
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }
}
