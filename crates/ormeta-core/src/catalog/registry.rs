//! Metadata registry: one [`Meta`] per entity uid.
//!
//! The registry is populated by a single writer during bootstrap, validated
//! once, and then shared read-only (see [`SharedMetadata`]). With the default
//! [`MetadataConfig`], a successful [`Metadata::validate`] freezes it.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, info, instrument, warn};

use super::attribute::Attribute;
use super::entity::Meta;
use crate::config::MetadataConfig;
use crate::error::{Error, Result};

/// Shared handle to a validated registry.
pub type SharedMetadata = Arc<Metadata>;

/// Keyed store of entity metadata, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    entries: IndexMap<String, Meta>,
    config: MetadataConfig,
    frozen: bool,
}

impl Metadata {
    /// Create an empty registry with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry with the given configuration.
    pub fn with_config(config: MetadataConfig) -> Self {
        Self {
            entries: IndexMap::new(),
            config,
            frozen: false,
        }
    }

    /// The registry configuration.
    pub fn config(&self) -> &MetadataConfig {
        &self.config
    }

    /// Insert or overwrite the entry keyed by `meta.uid`.
    ///
    /// An overwritten entry keeps its original position. Fails once the
    /// registry is frozen.
    pub fn add(&mut self, meta: Meta) -> Result<()> {
        if self.frozen {
            return Err(Error::RegistryFrozen { uid: meta.uid });
        }

        debug!(uid = %meta.uid, table = %meta.table_name, "registering entity metadata");
        let uid = meta.uid.clone();
        if let Some(previous) = self.entries.insert(uid, meta) {
            warn!(uid = %previous.uid, table = %previous.table_name, "overwrote entity metadata");
        }
        Ok(())
    }

    /// Get the metadata registered for `uid`.
    pub fn get(&self, uid: &str) -> Result<&Meta> {
        self.entries.get(uid).ok_or_else(|| Error::MetadataNotFound {
            uid: uid.to_string(),
        })
    }

    /// Check that no two entities claim the same table, then freeze the
    /// registry if so configured.
    ///
    /// Safe to repeat; an unchanged registry gives the same answer.
    #[instrument(skip(self), fields(entities = self.entries.len()))]
    pub fn validate(&mut self) -> Result<()> {
        self.check_table_names()?;
        info!("entity metadata validated");

        if self.config.freeze_on_validate && !self.frozen {
            self.frozen = true;
            info!("metadata registry frozen");
        }
        Ok(())
    }

    /// Fail on the second entity, in insertion order, that reuses a table name.
    pub fn check_table_names(&self) -> Result<()> {
        let mut seen: HashMap<&str, &str> = HashMap::with_capacity(self.entries.len());
        for meta in self.entries.values() {
            if let Some(existing_uid) = seen.insert(&meta.table_name, &meta.uid) {
                return Err(Error::DuplicateTable {
                    table: meta.table_name.clone(),
                    uid: meta.uid.clone(),
                    existing_uid: existing_uid.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Check if the registry rejects further writes.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Check if `uid` is registered.
    pub fn contains(&self, uid: &str) -> bool {
        self.entries.contains_key(uid)
    }

    /// Number of registered entities.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All registered metadata, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Meta> {
        self.entries.values()
    }

    /// All registered uids, in insertion order.
    pub fn uids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Resolve the component Meta linked from `meta`.
    ///
    /// A dangling link fails with [`Error::MetadataNotFound`].
    pub fn component_link(&self, meta: &Meta) -> Result<Option<&Meta>> {
        meta.component_link
            .as_deref()
            .map(|uid| self.get(uid))
            .transpose()
    }

    /// Every relational attribute whose target is `uid`, with its owning entity.
    pub fn relations_to(&self, uid: &str) -> Vec<(&Meta, &str, &Attribute)> {
        self.entries
            .values()
            .flat_map(|meta| {
                meta.relations()
                    .filter(move |(_, attr)| attr.target() == Some(uid))
                    .map(move |(name, attr)| (meta, name, attr))
            })
            .collect()
    }

    /// Hand the registry to concurrent readers.
    pub fn into_shared(self) -> SharedMetadata {
        Arc::new(self)
    }
}

impl<'a> IntoIterator for &'a Metadata {
    type Item = &'a Meta;
    type IntoIter = indexmap::map::Values<'a, String, Meta>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.values()
    }
}
