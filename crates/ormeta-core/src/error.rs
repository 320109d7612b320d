//! Core error types.

use thiserror::Error;

use crate::catalog::RelationKind;

/// Metadata model errors.
#[derive(Debug, Error)]
pub enum Error {
    /// An attribute's fields do not match its type/relation discriminator.
    #[error(transparent)]
    InvalidAttribute(#[from] InvalidAttributeError),

    /// Lookup of an entity that was never registered.
    #[error("metadata for \"{uid}\" not found")]
    MetadataNotFound {
        /// The missing entity uid.
        uid: String,
    },

    /// Two entities resolve to the same physical table.
    #[error(
        "DB table \"{table}\" already exists (claimed by \"{existing_uid}\" and \"{uid}\"). \
         Change the collectionName of the related content type."
    )]
    DuplicateTable {
        /// The contested table name.
        table: String,
        /// The entity that claimed the table second.
        uid: String,
        /// The entity that claimed the table first.
        existing_uid: String,
    },

    /// The registry no longer accepts writes.
    #[error("metadata registry is frozen, cannot add \"{uid}\"")]
    RegistryFrozen {
        /// The entity that was being added.
        uid: String,
    },

    /// Two attributes of one entity map onto the same column.
    #[error("column \"{column}\" of \"{uid}\" is claimed by more than one attribute")]
    DuplicateColumn {
        /// The entity uid.
        uid: String,
        /// The contested column name.
        column: String,
    },

    /// A supplied `columnToAttribute` map is not the inverse of the attributes.
    #[error("columnToAttribute of \"{uid}\" disagrees with its attributes at column \"{column}\"")]
    ColumnMapMismatch {
        /// The entity uid.
        uid: String,
        /// The first column that disagrees.
        column: String,
    },

    /// Malformed schema document.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Schema document could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for metadata operations.
pub type Result<T> = std::result::Result<T, Error>;

/// An attribute whose field set does not match its discriminator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid attribute{}: {fault}", quoted(.attribute))]
pub struct InvalidAttributeError {
    /// Name of the offending attribute, empty until attached to an entity field.
    pub attribute: String,
    /// What is wrong with it.
    pub fault: AttributeFault,
}

impl InvalidAttributeError {
    /// Create an error for an attribute that has not been named yet.
    pub fn new(fault: AttributeFault) -> Self {
        Self {
            attribute: String::new(),
            fault,
        }
    }

    /// Attach the attribute name.
    pub fn for_attribute(mut self, name: impl Into<String>) -> Self {
        self.attribute = name.into();
        self
    }
}

impl From<AttributeFault> for InvalidAttributeError {
    fn from(fault: AttributeFault) -> Self {
        Self::new(fault)
    }
}

/// The specific mismatch behind an [`InvalidAttributeError`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttributeFault {
    /// The `type` is neither a scalar type nor `relation`.
    #[error("unknown attribute type \"{0}\"")]
    UnknownType(String),

    /// The `relation` value names no known relation kind.
    #[error("unknown relation kind \"{0}\"")]
    UnknownRelation(String),

    /// `type = relation` without a `relation` kind.
    #[error("relation attribute has no relation kind")]
    MissingRelationKind,

    /// A field required by the relation kind is absent.
    #[error("{relation} relation requires `{field}`")]
    MissingField {
        /// The relation kind.
        relation: RelationKind,
        /// The absent field.
        field: &'static str,
    },

    /// A field that belongs to another branch of the taxonomy is present.
    #[error("`{field}` is not allowed on {kind} attributes")]
    UnexpectedField {
        /// The offending field.
        field: &'static str,
        /// The attribute type or relation kind it was found on.
        kind: String,
    },

    /// A bidirectional join table lacks one of its ordering columns.
    #[error("join table \"{table}\" requires `{field}`")]
    MissingOrderColumn {
        /// The join table name.
        table: String,
        /// The absent ordering column field.
        field: &'static str,
    },

    /// Declared pivot columns differ from the join/inverse/morph columns.
    #[error("join table \"{table}\" pivot columns {found:?} do not match {expected:?}")]
    PivotMismatch {
        /// The join table name.
        table: String,
        /// Columns implied by the join table descriptors.
        expected: Vec<String>,
        /// Columns that were declared.
        found: Vec<String>,
    },
}

fn quoted(name: &str) -> String {
    if name.is_empty() {
        String::new()
    } else {
        format!(" \"{name}\"")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_attribute_message() {
        let err = InvalidAttributeError::new(AttributeFault::MissingField {
            relation: RelationKind::MorphOne,
            field: "morphColumn",
        });
        assert_eq!(
            err.to_string(),
            "invalid attribute: morphOne relation requires `morphColumn`"
        );

        let named = err.for_attribute("cover");
        assert_eq!(
            named.to_string(),
            "invalid attribute \"cover\": morphOne relation requires `morphColumn`"
        );
    }

    #[test]
    fn test_duplicate_table_message_names_table() {
        let err = Error::DuplicateTable {
            table: "entries".into(),
            uid: "page".into(),
            existing_uid: "article".into(),
        };
        let message = err.to_string();
        assert!(message.contains("\"entries\""));
        assert!(message.contains("collectionName"));
    }
}
