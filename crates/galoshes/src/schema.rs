//! Declaration registries.
//!
//! A [`Schema`] is the merged declaration table of one type. It is composed
//! once, when the type is defined, from the schemas of its bases and the
//! type's own slots, and is immutable afterwards. Types usually keep theirs in
//! a `once_cell::sync::Lazy` static:
//!
//! ```
//! use galoshes::attributes::{Coercer, FieldDecl};
//! use galoshes::Schema;
//! use once_cell::sync::Lazy;
//!
//! static BASE: Lazy<Schema> = Lazy::new(|| {
//!     Schema::builder("Base")
//!         .field(FieldDecl::required("nx").coerce(Coercer::Int64))
//!         .field(FieldDecl::optional("dx").rename("_dx").coerce(Coercer::Float64))
//!         .build()
//! });
//!
//! static CHILD: Lazy<Schema> = Lazy::new(|| {
//!     Schema::builder("Child")
//!         .extends(&BASE)
//!         .field(FieldDecl::optional("nx").coerce(Coercer::Int64))
//!         .remove("dx")
//!         .build()
//! });
//!
//! assert!(CHILD.required().is_empty());
//! assert_eq!(CHILD.optional().into_iter().collect::<Vec<_>>(), vec!["nx"]);
//! ```
//!
//! ## Merge Order
//!
//! Bases are listed the way a class header lists them: an earlier base takes
//! precedence over a later one. The merge starts from an empty table, overlays
//! the lowest-precedence base first and the highest last, then overlays the
//! type's own slots. A [`Slot::Removed`] drops the key, so a type can retract
//! a field it would otherwise inherit.
//!
//! Masked keys are a plain union over every base and the type itself. The
//! cache-item list is looked up like a class attribute: the type's own list
//! if it declares one, else the list of the first schema in its C3
//! linearization that declares one. In a diamond `D(B, C)` with `B(A)` and
//! `C(A)`, a list declared on `C` wins over one declared on `A`.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::attributes::{FieldDecl, Slot};

/// One entry of a schema's linearization: a schema name and the cache-item
/// list that schema declared itself.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Lineage {
    name: String,
    own_cache_items: Option<Vec<String>>,
}

/// The merged declaration registry of one type.
#[derive(Debug, Clone)]
pub struct Schema {
    name: String,
    fields: BTreeMap<String, FieldDecl>,
    mask_keys: BTreeSet<String>,
    /// This schema first, then its ancestors in C3 order.
    lineage: Vec<Lineage>,
}

impl Schema {
    pub fn builder<'a>(name: impl Into<String>) -> SchemaBuilder<'a> {
        SchemaBuilder::new(name)
    }

    /// The type name reported in errors.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, key: &str) -> Option<&FieldDecl> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Declarations in key order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDecl> {
        self.fields.values()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Keys whose declaration is required.
    pub fn required(&self) -> BTreeSet<&str> {
        self.fields
            .values()
            .filter(|decl| decl.required)
            .map(|decl| decl.key.as_str())
            .collect()
    }

    /// Declared keys that are not required.
    pub fn optional(&self) -> BTreeSet<&str> {
        self.fields
            .values()
            .filter(|decl| !decl.required)
            .map(|decl| decl.key.as_str())
            .collect()
    }

    /// Keys left out of a cached configuration copy.
    pub fn mask_keys(&self) -> &BTreeSet<String> {
        &self.mask_keys
    }

    /// Attribute names cleared when a cached configuration is replaced.
    pub fn cache_items(&self) -> &[String] {
        self.lineage
            .iter()
            .find_map(|entry| entry.own_cache_items.as_deref())
            .unwrap_or(&[])
    }

    /// This schema's name followed by its ancestors' in lookup order.
    pub fn linearization(&self) -> impl Iterator<Item = &str> {
        self.lineage.iter().map(|entry| entry.name.as_str())
    }
}

/// Composes a [`Schema`] from bases and own slots.
#[derive(Debug)]
pub struct SchemaBuilder<'a> {
    name: String,
    bases: Vec<&'a Schema>,
    slots: BTreeMap<String, Slot>,
    mask_keys: BTreeSet<String>,
    cache_items: Option<Vec<String>>,
}

impl<'a> SchemaBuilder<'a> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bases: Vec::new(),
            slots: BTreeMap::new(),
            mask_keys: BTreeSet::new(),
            cache_items: None,
        }
    }

    /// Add a base. Earlier bases take precedence over later ones.
    pub fn extends(mut self, base: &'a Schema) -> Self {
        self.bases.push(base);
        self
    }

    /// Declare a field. A later declaration of the same key replaces it.
    pub fn field(mut self, decl: FieldDecl) -> Self {
        self.slots.insert(decl.key.clone(), Slot::Present(decl));
        self
    }

    /// Retract a key inherited from a base.
    pub fn remove(mut self, key: impl Into<String>) -> Self {
        self.slots.insert(key.into(), Slot::Removed);
        self
    }

    /// Set a raw slot. A present declaration is re-keyed to `key`, so the
    /// registry key and the key the declaration reads always agree.
    pub fn slot(mut self, key: impl Into<String>, slot: Slot) -> Self {
        let key = key.into();
        let slot = match slot {
            Slot::Present(mut decl) => {
                decl.key.clone_from(&key);
                Slot::Present(decl)
            }
            Slot::Removed => Slot::Removed,
        };
        self.slots.insert(key, slot);
        self
    }

    /// Mask a key out of cached configuration copies.
    pub fn mask(mut self, key: impl Into<String>) -> Self {
        self.mask_keys.insert(key.into());
        self
    }

    /// Declare the attribute names cleared on configuration reassignment.
    pub fn cache_items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cache_items = Some(items.into_iter().map(Into::into).collect());
        self
    }

    pub fn build(self) -> Schema {
        let mut fields: BTreeMap<String, FieldDecl> = BTreeMap::new();
        for base in self.bases.iter().rev() {
            fields.extend(
                base.fields
                    .iter()
                    .map(|(key, decl)| (key.clone(), decl.clone())),
            );
        }

        let mut removed = 0usize;
        for (key, slot) in self.slots {
            match slot {
                Slot::Present(decl) => {
                    fields.insert(key, decl);
                }
                Slot::Removed => {
                    if fields.remove(&key).is_some() {
                        removed += 1;
                    }
                }
            }
        }

        let mut mask_keys: BTreeSet<String> = self
            .bases
            .iter()
            .flat_map(|base| base.mask_keys.iter().cloned())
            .collect();
        mask_keys.extend(self.mask_keys);

        let own = Lineage {
            name: self.name.clone(),
            own_cache_items: self.cache_items,
        };
        let lineage = linearize(own, &self.bases);

        debug!(
            schema = %self.name,
            bases = self.bases.len(),
            fields = fields.len(),
            removed,
            masked = mask_keys.len(),
            "merged declaration registry"
        );

        Schema {
            name: self.name,
            fields,
            mask_keys,
            lineage,
        }
    }
}

/// C3 merge of the bases' linearizations, preceded by `own`.
///
/// Schemas are identified by name. An inconsistent hierarchy, which a class
/// system would reject, falls back to taking the head of the first remaining
/// sequence.
fn linearize(own: Lineage, bases: &[&Schema]) -> Vec<Lineage> {
    let mut sequences: Vec<Vec<&Lineage>> = bases
        .iter()
        .map(|base| base.lineage.iter().collect())
        .collect();
    sequences.push(bases.iter().filter_map(|base| base.lineage.first()).collect());

    let mut result = vec![own];
    loop {
        sequences.retain(|seq| !seq.is_empty());
        let Some(first) = sequences.first() else {
            break;
        };

        let in_a_tail =
            |name: &str| sequences.iter().any(|seq| seq[1..].iter().any(|e| e.name == name));
        let next = sequences
            .iter()
            .map(|seq| seq[0])
            .find(|head| !in_a_tail(&head.name))
            .unwrap_or(first[0])
            .clone();

        for seq in &mut sequences {
            seq.retain(|entry| entry.name != next.name);
        }
        result.push(next);
    }
    result
}
