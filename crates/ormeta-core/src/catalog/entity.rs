//! Entity metadata.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::attribute::Attribute;
use super::constraint::{ForeignKey, Index};
use super::raw::RawMeta;
use crate::error::{Error, Result};

/// Metadata for one entity: its table, attributes, and table-level constraints.
///
/// `column_to_attribute` is maintained alongside the attributes and is always
/// the exact inverse of their column names (override or attribute name).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMeta", into = "RawMeta")]
pub struct Meta {
    /// Globally unique entity identifier.
    pub uid: String,
    /// Physical table name.
    pub table_name: String,
    pub singular_name: Option<String>,
    attributes: IndexMap<String, Attribute>,
    pub indexes: Vec<Index>,
    pub foreign_keys: Option<Vec<ForeignKey>>,
    pub lifecycles: Option<IndexMap<String, Value>>,
    column_to_attribute: IndexMap<String, String>,
    /// Uid of the Meta storing this entity's component data.
    pub component_link: Option<String>,
}

impl Meta {
    /// Create entity metadata with no attributes.
    pub fn new(uid: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            table_name: table_name.into(),
            singular_name: None,
            attributes: IndexMap::new(),
            indexes: Vec::new(),
            foreign_keys: None,
            lifecycles: None,
            column_to_attribute: IndexMap::new(),
            component_link: None,
        }
    }

    /// Set the singular name.
    pub fn with_singular_name(mut self, name: impl Into<String>) -> Self {
        self.singular_name = Some(name.into());
        self
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, attribute: Attribute) -> Result<Self> {
        self.insert_attribute(name, attribute)?;
        Ok(self)
    }

    /// Add an index.
    pub fn with_index(mut self, index: Index) -> Self {
        self.indexes.push(index);
        self
    }

    /// Add a foreign key.
    pub fn with_foreign_key(mut self, foreign_key: ForeignKey) -> Self {
        self.foreign_keys.get_or_insert_with(Vec::new).push(foreign_key);
        self
    }

    /// Register a lifecycle hook descriptor.
    pub fn with_lifecycle(mut self, event: impl Into<String>, hook: impl Into<Value>) -> Self {
        self.lifecycles
            .get_or_insert_with(IndexMap::new)
            .insert(event.into(), hook.into());
        self
    }

    /// Link the Meta that stores this entity's component data.
    pub fn with_component_link(mut self, uid: impl Into<String>) -> Self {
        self.component_link = Some(uid.into());
        self
    }

    /// Insert or replace an attribute, keeping the column map consistent.
    ///
    /// A replaced attribute keeps its position. Fails if the attribute's
    /// column is already used by a different attribute.
    pub fn insert_attribute(
        &mut self,
        name: impl Into<String>,
        attribute: Attribute,
    ) -> Result<Option<Attribute>> {
        let name = name.into();
        let column = attribute.column_name().unwrap_or(&name).to_string();

        if let Some(owner) = self.column_to_attribute.get(&column) {
            if *owner != name {
                return Err(Error::DuplicateColumn {
                    uid: self.uid.clone(),
                    column,
                });
            }
        }

        let previous = self.attributes.insert(name.clone(), attribute);
        if let Some(old) = &previous {
            let old_column = old.column_name().unwrap_or(&name);
            if old_column != column {
                self.column_to_attribute.shift_remove(old_column);
            }
        }
        self.column_to_attribute.insert(column, name);

        Ok(previous)
    }

    /// Get an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// All attributes in declaration order.
    pub fn attributes(&self) -> &IndexMap<String, Attribute> {
        &self.attributes
    }

    /// Column name to attribute name map.
    pub fn column_to_attribute(&self) -> &IndexMap<String, String> {
        &self.column_to_attribute
    }

    /// Column backing an attribute.
    pub fn column_name_of(&self, attribute: &str) -> Option<&str> {
        self.attributes
            .get_key_value(attribute)
            .map(|(name, attr)| attr.column_name().unwrap_or(name))
    }

    /// Attribute stored in a column.
    pub fn attribute_for_column(&self, column: &str) -> Option<&str> {
        self.column_to_attribute.get(column).map(String::as_str)
    }

    /// Relational attributes in declaration order.
    pub fn relations(&self) -> impl Iterator<Item = (&str, &Attribute)> {
        self.attributes
            .iter()
            .filter(|(_, attr)| attr.is_relation())
            .map(|(name, attr)| (name.as_str(), attr))
    }

    /// Check if this entity links a component Meta.
    pub fn has_component_link(&self) -> bool {
        self.component_link.is_some()
    }

    /// Materialize into a [`Model`] with defaults filled in.
    pub fn to_model(&self) -> Model {
        Model::from(self)
    }
}

impl TryFrom<RawMeta> for Meta {
    type Error = Error;

    fn try_from(raw: RawMeta) -> Result<Self> {
        let mut meta = Meta::new(raw.uid, raw.table_name);
        meta.singular_name = raw.singular_name;
        meta.indexes = raw.indexes;
        meta.foreign_keys = raw.foreign_keys;
        meta.lifecycles = raw.lifecycles;
        meta.component_link = raw.component_link;

        for (name, raw_attribute) in raw.attributes {
            let attribute = Attribute::try_from(raw_attribute)
                .map_err(|err| err.for_attribute(name.clone()))?;
            meta.insert_attribute(name, attribute)?;
        }

        if let Some(declared) = raw.column_to_attribute {
            let derived = &meta.column_to_attribute;
            let mismatch = declared
                .iter()
                .find(|(column, attr)| derived.get(*column) != Some(*attr))
                .map(|(column, _)| column.clone())
                .or_else(|| {
                    derived
                        .keys()
                        .find(|column| !declared.contains_key(*column))
                        .cloned()
                });
            if let Some(column) = mismatch {
                return Err(Error::ColumnMapMismatch {
                    uid: meta.uid,
                    column,
                });
            }
        }

        Ok(meta)
    }
}

impl From<Meta> for RawMeta {
    fn from(meta: Meta) -> Self {
        Self {
            uid: meta.uid,
            table_name: meta.table_name,
            singular_name: meta.singular_name,
            attributes: meta
                .attributes
                .into_iter()
                .map(|(name, attr)| (name, attr.into()))
                .collect(),
            indexes: meta.indexes,
            foreign_keys: meta.foreign_keys,
            lifecycles: meta.lifecycles,
            column_to_attribute: Some(meta.column_to_attribute),
            component_link: meta.component_link,
        }
    }
}

/// Fully-resolved entity metadata with every optional field populated.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub uid: String,
    pub table_name: String,
    pub singular_name: String,
    pub attributes: IndexMap<String, Attribute>,
    pub lifecycles: IndexMap<String, Value>,
    pub indexes: Vec<Index>,
    pub foreign_keys: Vec<ForeignKey>,
    pub column_to_attribute: IndexMap<String, String>,
    pub component_link: Option<String>,
}

impl From<&Meta> for Model {
    fn from(meta: &Meta) -> Self {
        Self {
            uid: meta.uid.clone(),
            table_name: meta.table_name.clone(),
            singular_name: meta
                .singular_name
                .clone()
                .unwrap_or_else(|| default_singular_name(&meta.uid).to_string()),
            attributes: meta.attributes.clone(),
            lifecycles: meta.lifecycles.clone().unwrap_or_default(),
            indexes: meta.indexes.clone(),
            foreign_keys: meta.foreign_keys.clone().unwrap_or_default(),
            column_to_attribute: meta.column_to_attribute.clone(),
            component_link: meta.component_link.clone(),
        }
    }
}

// "api::article.article" -> "article"
fn default_singular_name(uid: &str) -> &str {
    uid.rsplit(|c: char| c == '.' || c == ':').next().unwrap_or(uid)
}
