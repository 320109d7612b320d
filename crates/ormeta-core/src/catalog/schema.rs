//! Schema document - the schema compiler's output for a whole application.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::entity::Meta;
use super::raw::RawMeta;
use super::registry::Metadata;
use crate::config::MetadataConfig;
use crate::error::Result;

/// Every entity of an application, in registration order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SchemaDocument {
    /// Entity metadata.
    pub entities: Vec<Meta>,
}

#[derive(Deserialize)]
struct RawSchemaDocument {
    #[serde(default)]
    entities: Vec<RawMeta>,
}

impl SchemaDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity to the document.
    pub fn with_entity(mut self, meta: Meta) -> Self {
        self.entities.push(meta);
        self
    }

    /// Parse a document from JSON.
    ///
    /// Attribute errors surface as [`Error::InvalidAttribute`](crate::Error::InvalidAttribute)
    /// naming the offending attribute.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawSchemaDocument = serde_json::from_str(json)?;
        let entities = raw
            .entities
            .into_iter()
            .map(Meta::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { entities })
    }

    /// Read and parse a JSON document from disk.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let document = Self::from_json(&json)?;
        debug!(entities = document.entities.len(), "schema document loaded");
        Ok(document)
    }

    /// Snapshot every entity of a registry.
    pub fn from_metadata(metadata: &Metadata) -> Self {
        Self {
            entities: metadata.iter().cloned().collect(),
        }
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Register every entity, then validate if the configuration asks for it.
    #[instrument(skip_all, fields(entities = self.entities.len()))]
    pub fn into_metadata(self, config: MetadataConfig) -> Result<Metadata> {
        let validate = config.validate_on_load;
        let mut metadata = Metadata::with_config(config);
        for meta in self.entities {
            metadata.add(meta)?;
        }
        if validate {
            metadata.validate()?;
        }
        Ok(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const BLOG: &str = r#"{
        "entities": [
            {
                "uid": "article",
                "tableName": "articles",
                "attributes": {
                    "id": { "type": "increments" },
                    "title": { "type": "string", "required": true },
                    "author": { "type": "relation", "relation": "oneWay", "target": "author" }
                }
            },
            {
                "uid": "author",
                "tableName": "authors",
                "attributes": {
                    "id": { "type": "increments" },
                    "name": { "type": "string", "columnName": "full_name" }
                }
            }
        ]
    }"#;

    #[test]
    fn test_from_json() {
        let document = SchemaDocument::from_json(BLOG).unwrap();

        assert_eq!(document.entities.len(), 2);
        assert_eq!(document.entities[1].attribute_for_column("full_name"), Some("name"));
    }

    #[test]
    fn test_into_metadata_validates() {
        let metadata = SchemaDocument::from_json(BLOG)
            .unwrap()
            .into_metadata(MetadataConfig::default())
            .unwrap();

        assert!(metadata.is_frozen());
        assert_eq!(metadata.get("article").unwrap().table_name, "articles");
    }

    #[test]
    fn test_into_metadata_without_validation() {
        let document = SchemaDocument::new()
            .with_entity(Meta::new("article", "entries"))
            .with_entity(Meta::new("page", "entries"));

        let metadata = document
            .clone()
            .into_metadata(MetadataConfig::new().validate_on_load(false))
            .unwrap();
        assert!(!metadata.is_frozen());

        let err = document.into_metadata(MetadataConfig::default()).unwrap_err();
        assert!(matches!(err, Error::DuplicateTable { ref table, .. } if table == "entries"));
    }

    #[test]
    fn test_json_roundtrip_through_registry() {
        let metadata = SchemaDocument::from_json(BLOG)
            .unwrap()
            .into_metadata(MetadataConfig::default())
            .unwrap();

        let json = SchemaDocument::from_metadata(&metadata).to_json_pretty().unwrap();
        let reparsed = SchemaDocument::from_json(&json).unwrap();

        assert_eq!(reparsed.entities, metadata.iter().cloned().collect::<Vec<_>>());
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");
        std::fs::write(&path, BLOG).unwrap();

        let document = SchemaDocument::from_path(&path).unwrap();
        assert_eq!(document.entities.len(), 2);

        let missing = SchemaDocument::from_path(dir.path().join("missing.json"));
        assert!(matches!(missing, Err(Error::Io(_))));
    }

    #[test]
    fn test_malformed_json() {
        let err = SchemaDocument::from_json("{ \"entities\": [ { \"uid\": 1 } ] }").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
