#![allow(dead_code)]

use galoshes::attributes::{Coercer, FieldDecl};
use galoshes::{AttributeMapper, Attributes, CachedObject, Config, Result, Schema, Value};
use once_cell::sync::Lazy;

pub fn config(pairs: &[(&str, Value)]) -> Config {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

/// Base model: frequency and grid size.
pub struct Wave {
    pub attrs: Attributes,
    pub extra: Vec<Value>,
}

impl AttributeMapper for Wave {
    fn schema() -> &'static Schema {
        static SCHEMA: Lazy<Schema> = Lazy::new(|| {
            Schema::builder("Wave")
                .field(FieldDecl::required("freq").coerce(Coercer::Complex128))
                .field(FieldDecl::required("nx").coerce(Coercer::Int64))
                .field(FieldDecl::optional("rho").rename("_rho").coerce(Coercer::Float64))
                .field(FieldDecl::optional("label"))
                .build()
        });
        &SCHEMA
    }

    fn initialize(attrs: Attributes, _config: &Config, extra: &[Value]) -> Result<Self> {
        Ok(Wave {
            attrs,
            extra: extra.to_vec(),
        })
    }
}

/// Adds a depth dimension, relaxes `freq` to a real value and drops `label`.
pub struct DeepWave {
    pub attrs: Attributes,
    pub cells: i64,
}

impl AttributeMapper for DeepWave {
    fn schema() -> &'static Schema {
        static SCHEMA: Lazy<Schema> = Lazy::new(|| {
            Schema::builder("DeepWave")
                .extends(Wave::schema())
                .field(FieldDecl::optional("freq").coerce(Coercer::Float64))
                .field(FieldDecl::required("nz").coerce(Coercer::Int64))
                .remove("label")
                .build()
        });
        &SCHEMA
    }

    fn initialize(attrs: Attributes, _config: &Config, _extra: &[Value]) -> Result<Self> {
        let cells = attrs.get_as::<i64>("nx")? * attrs.get_as::<i64>("nz")?;
        Ok(DeepWave { attrs, cells })
    }
}

/// A caching model whose derived `grid_area` depends on its configuration.
pub struct CachedSurvey {
    pub state: CachedObject,
}

impl AttributeMapper for CachedSurvey {
    fn schema() -> &'static Schema {
        static SCHEMA: Lazy<Schema> = Lazy::new(|| {
            Schema::builder("CachedSurvey")
                .extends(Wave::schema())
                .mask("credentials")
                .cache_items(["grid_area", "solver"])
                .build()
        });
        &SCHEMA
    }

    fn initialize(attrs: Attributes, config: &Config, _extra: &[Value]) -> Result<Self> {
        Ok(CachedSurvey {
            state: CachedObject::new(Self::schema(), attrs, config),
        })
    }
}

impl CachedSurvey {
    pub fn grid_area(&mut self) -> Result<i64> {
        let value = self.state.cached("grid_area", |config, _| {
            let nx = config.get("nx").and_then(Value::as_i64).unwrap_or(0);
            Ok(Value::Int(nx * nx))
        })?;
        Ok(value.as_i64().unwrap_or_default())
    }
}
