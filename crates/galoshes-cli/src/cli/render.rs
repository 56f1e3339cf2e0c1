//! Output rendering. Every command prints one JSON document.

use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result;
use galoshes::{ConfigFilter, Schema};
use serde::Serialize;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct KeySets<'a> {
    pub required: BTreeSet<&'a str>,
    pub optional: BTreeSet<&'a str>,
}

impl<'a> KeySets<'a> {
    pub fn of_schema(schema: &'a Schema) -> Self {
        Self {
            required: schema.required(),
            optional: schema.optional(),
        }
    }

    pub fn of_filter(filter: &'a ConfigFilter) -> Self {
        Self {
            required: filter.required(),
            optional: filter.optional(),
        }
    }
}

/// Key sets per schema name.
pub fn keys_report<'a, I>(schemas: I) -> BTreeMap<&'a str, KeySets<'a>>
where
    I: IntoIterator<Item = &'a Schema>,
{
    schemas
        .into_iter()
        .map(|schema| (schema.name(), KeySets::of_schema(schema)))
        .collect()
}

pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}
