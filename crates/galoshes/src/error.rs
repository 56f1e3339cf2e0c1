use thiserror::Error;

use crate::attributes::CoerceFailure;

#[derive(Error, Debug)]
pub enum GaloshesError {
    /// The dynamic construction entry point was called without a configuration.
    #[error("{type_name}() takes at least 1 positional argument (0 given)")]
    ArgumentCount { type_name: String },

    #[error("{type_name}() expects a configuration mapping as its first argument, got {found}")]
    NotAMapping {
        type_name: String,
        found: &'static str,
    },

    #[error("{type_name} requires parameter '{key}'")]
    MissingRequiredKey { type_name: String, key: String },

    #[error("{type_name}: cannot coerce '{key}' with {coercer}: {source}")]
    Coercion {
        type_name: String,
        key: String,
        coercer: String,
        #[source]
        source: CoerceFailure,
    },

    #[error("'{owner}' object has no attribute '{name}'")]
    MissingAttribute { owner: String, name: String },

    #[error("'{owner}' attribute '{name}' is {found}, expected {expected}")]
    AttributeType {
        owner: String,
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Schema document error: {0}")]
    Document(String),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GaloshesError>;
