use crate::attributes::{Coercer, FieldDecl};
use crate::schema::Schema;
use crate::value::{Config, Value};
use once_cell::sync::Lazy;

/// A frequency-domain wave model, the canonical declaration table.
pub static WAVE_MODEL: Lazy<Schema> = Lazy::new(|| {
    Schema::builder("WaveModel")
        .field(FieldDecl::required("c").rename("_c").coerce(Coercer::Complex128))
        .field(FieldDecl::optional("rho").rename("_rho").coerce(Coercer::Float64))
        .field(FieldDecl::required("freq").coerce(Coercer::Complex128))
        .field(FieldDecl::optional("dx").rename("_dx").coerce(Coercer::Float64))
        .field(FieldDecl::optional("dz").rename("_dz").coerce(Coercer::Float64))
        .field(FieldDecl::required("nx").coerce(Coercer::Int64))
        .field(FieldDecl::required("nz").coerce(Coercer::Int64))
        .field(FieldDecl::optional("freeSurf").rename("_freeSurf").coerce(Coercer::List))
        .build()
});

pub fn wave_model_schema() -> &'static Schema {
    &WAVE_MODEL
}

/// Build a configuration from key/value pairs.
pub fn config(pairs: &[(&str, Value)]) -> Config {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}
