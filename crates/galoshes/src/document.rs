//! Schema documents.
//!
//! Declaration tables can also be written as data, which is how the CLI gets
//! them. A document lists schemas in definition order; a schema may extend
//! any schema defined before it.
//!
//! ```toml
//! [[schema]]
//! name = "Base"
//! mask = ["secret"]
//! cache = ["grid"]
//!
//! [schema.fields]
//! freq = { required = true, coerce = "complex128" }
//! dx = { rename = "_dx", coerce = "float64" }
//!
//! [[schema]]
//! name = "Child"
//! extends = ["Base"]
//! remove = ["dx"]
//! ```
//!
//! Coercer names are those accepted by [`Coercer`]'s `FromStr`, plus `any`
//! for "store unchanged".

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::debug;

use crate::attributes::{Coercer, FieldDecl};
use crate::error::{GaloshesError, Result};
use crate::schema::Schema;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDocument {
    #[serde(default, rename = "schema")]
    pub schemas: Vec<SchemaEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaEntry {
    pub name: String,
    /// Bases, highest precedence first.
    #[serde(default)]
    pub extends: Vec<String>,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldEntry>,
    /// Inherited keys to retract.
    #[serde(default)]
    pub remove: Vec<String>,
    #[serde(default)]
    pub mask: Vec<String>,
    pub cache: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldEntry {
    #[serde(default)]
    pub required: bool,
    pub rename: Option<String>,
    pub coerce: Option<String>,
}

impl FieldEntry {
    fn to_decl(&self, schema: &str, key: &str) -> Result<FieldDecl> {
        let mut decl = FieldDecl::new(key);
        decl.required = self.required;
        decl.rename = self.rename.clone();
        decl.coercer = match self.coerce.as_deref() {
            None | Some("any") => None,
            Some(name) => Some(name.parse::<Coercer>().map_err(|err| {
                GaloshesError::Document(format!("schema '{schema}', field '{key}': {err}"))
            })?),
        };
        Ok(decl)
    }
}

/// Named schemas resolved from a document.
#[derive(Debug, Clone, Default)]
pub struct SchemaSet {
    schemas: BTreeMap<String, Schema>,
    order: Vec<String>,
}

impl SchemaSet {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let document: SchemaDocument = toml::from_str(text)?;
        Self::from_document(&document)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let document: SchemaDocument = serde_json::from_str(text)?;
        Self::from_document(&document)
    }

    /// Build every schema in definition order.
    pub fn from_document(document: &SchemaDocument) -> Result<Self> {
        let mut set = SchemaSet::default();

        for entry in &document.schemas {
            if set.schemas.contains_key(&entry.name) {
                return Err(GaloshesError::Document(format!(
                    "schema '{}' is defined twice",
                    entry.name
                )));
            }
            if let Some(key) = entry.remove.iter().find(|key| entry.fields.contains_key(*key)) {
                return Err(GaloshesError::Document(format!(
                    "schema '{}' both declares and removes '{key}'",
                    entry.name
                )));
            }

            let schema = {
                let mut builder = Schema::builder(entry.name.as_str());
                for base in &entry.extends {
                    let base = set.schemas.get(base).ok_or_else(|| {
                        GaloshesError::Document(format!(
                            "schema '{}' extends '{base}', which is not defined before it",
                            entry.name
                        ))
                    })?;
                    builder = builder.extends(base);
                }
                for (key, field) in &entry.fields {
                    builder = builder.field(field.to_decl(&entry.name, key)?);
                }
                for key in &entry.remove {
                    builder = builder.remove(key.as_str());
                }
                for key in &entry.mask {
                    builder = builder.mask(key.as_str());
                }
                if let Some(items) = &entry.cache {
                    builder = builder.cache_items(items.iter().cloned());
                }
                builder.build()
            };

            set.order.push(entry.name.clone());
            set.schemas.insert(entry.name.clone(), schema);
        }

        debug!(schemas = set.order.len(), "loaded schema document");
        Ok(set)
    }

    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    /// Like [`SchemaSet::get`], but an unknown name is an error.
    pub fn require(&self, name: &str) -> Result<&Schema> {
        self.get(name)
            .ok_or_else(|| GaloshesError::Document(format!("unknown schema '{name}'")))
    }

    /// Schema names in definition order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Schemas in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &Schema> {
        self.order.iter().filter_map(|name| self.schemas.get(name))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"
[[schema]]
name = "Base"
mask = ["secret"]
cache = ["grid"]

[schema.fields]
freq = { required = true, coerce = "complex128" }
dx = { rename = "_dx", coerce = "float64" }
label = {}

[[schema]]
name = "Child"
extends = ["Base"]
remove = ["dx"]

[schema.fields]
nx = { required = true, coerce = "int" }
"#;

    #[test]
    fn test_loads_toml_document_in_order() {
        let set = SchemaSet::from_toml_str(DOC).unwrap();
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["Base", "Child"]);

        let base = set.require("Base").unwrap();
        assert_eq!(base.get("dx").unwrap().stored_name(), "_dx");
        assert!(base.get("label").unwrap().coercer.is_none());
        assert_eq!(base.cache_items(), ["grid".to_string()]);
    }

    #[test]
    fn test_child_inherits_and_retracts() {
        let set = SchemaSet::from_toml_str(DOC).unwrap();
        let child = set.require("Child").unwrap();
        assert!(!child.contains_key("dx"));
        assert!(child.contains_key("freq"));
        assert!(child.mask_keys().contains("secret"));
        assert_eq!(child.cache_items(), ["grid".to_string()]);
        assert_eq!(
            child.required().into_iter().collect::<Vec<_>>(),
            vec!["freq", "nx"]
        );
    }

    #[test]
    fn test_loads_json_document() {
        let set = SchemaSet::from_json_str(
            r#"{"schema": [{"name": "Only", "fields": {"k": {"required": true}}}]}"#,
        )
        .unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.require("Only").unwrap().get("k").unwrap().required);
    }

    #[test]
    fn test_forward_reference_is_rejected() {
        let err = SchemaSet::from_toml_str(
            r#"
[[schema]]
name = "Child"
extends = ["Later"]

[[schema]]
name = "Later"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, GaloshesError::Document(_)));
    }

    #[test]
    fn test_duplicate_schema_is_rejected() {
        let err = SchemaSet::from_toml_str(
            r#"
[[schema]]
name = "Twice"

[[schema]]
name = "Twice"
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("defined twice"));
    }

    #[test]
    fn test_unknown_coercer_is_rejected() {
        let err = SchemaSet::from_toml_str(
            r#"
[[schema]]
name = "Bad"
fields = { x = { coerce = "decimal" } }
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("decimal"));
    }

    #[test]
    fn test_declare_and_remove_same_key_is_rejected() {
        let err = SchemaSet::from_toml_str(
            r#"
[[schema]]
name = "Confused"
remove = ["x"]
fields = { x = {} }
"#,
        )
        .unwrap_err();
        assert!(matches!(err, GaloshesError::Document(_)));
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        assert!(SchemaSet::from_json_str(r#"{"schema": [{"name": "X", "colour": 1}]}"#).is_err());
    }

    #[test]
    fn test_unknown_name_lookup_fails() {
        let set = SchemaSet::default();
        assert!(set.is_empty());
        assert!(set.require("Nope").is_err());
    }
}
