//! Index and foreign key definitions for entity tables.

use serde::{Deserialize, Serialize};

/// Kind of a table index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexType {
    /// Primary key index.
    Primary,
    /// Uniqueness index.
    Unique,
}

/// An index on an entity table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    /// Index name.
    pub name: String,
    /// Indexed columns, in key order.
    pub columns: Vec<String>,
    /// Index kind; a plain index when absent.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub index_type: Option<IndexType>,
}

/// Action taken on referencing rows when a referenced row changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferentialAction {
    /// Propagate the change.
    #[serde(rename = "CASCADE")]
    Cascade,
    /// Reject the change while references exist.
    #[serde(rename = "RESTRICT")]
    Restrict,
    /// Set the referencing columns to null.
    #[serde(rename = "SET NULL")]
    SetNull,
    /// Defer to the database's check at statement end.
    #[serde(rename = "NO ACTION")]
    NoAction,
    /// Set the referencing columns to their defaults.
    #[serde(rename = "SET DEFAULT")]
    SetDefault,
}

/// A foreign key from an entity table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKey {
    /// Constraint name.
    pub name: String,
    /// Referencing columns.
    pub columns: Vec<String>,
    /// Referenced table.
    pub referenced_table: String,
    /// Referenced columns, paired with `columns`.
    pub referenced_columns: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_update: Option<ReferentialAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_delete: Option<ReferentialAction>,
}

impl Index {
    /// Create a plain index.
    pub fn new(
        name: impl Into<String>,
        columns: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            index_type: None,
        }
    }

    /// Create a unique index.
    pub fn unique(
        name: impl Into<String>,
        columns: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            index_type: Some(IndexType::Unique),
            ..Self::new(name, columns)
        }
    }

    /// Create a primary key index.
    pub fn primary(
        name: impl Into<String>,
        columns: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            index_type: Some(IndexType::Primary),
            ..Self::new(name, columns)
        }
    }

    /// Check if this index enforces uniqueness.
    pub fn is_unique(&self) -> bool {
        self.index_type.is_some()
    }
}

impl ForeignKey {
    /// Create a single-column foreign key.
    pub fn new(
        name: impl Into<String>,
        column: impl Into<String>,
        referenced_table: impl Into<String>,
        referenced_column: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            columns: vec![column.into()],
            referenced_table: referenced_table.into(),
            referenced_columns: vec![referenced_column.into()],
            on_update: None,
            on_delete: None,
        }
    }

    /// Set the delete action.
    pub fn with_on_delete(mut self, action: ReferentialAction) -> Self {
        self.on_delete = Some(action);
        self
    }

    /// Set the update action.
    pub fn with_on_update(mut self, action: ReferentialAction) -> Self {
        self.on_update = Some(action);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_index() {
        let index = Index::unique("articles_slug_unique", ["slug"]);

        assert!(index.is_unique());
        assert_eq!(index.columns, vec!["slug".to_string()]);
        assert!(!Index::new("articles_title_index", ["title"]).is_unique());
    }

    #[test]
    fn test_composite_index_json() {
        let index = Index::primary("articles_tags_pk", ["article_id", "tag_id"]);
        let json = serde_json::to_value(&index).unwrap();

        assert_eq!(json["type"], "primary");
        assert_eq!(json["columns"][1], "tag_id");
    }

    #[test]
    fn test_foreign_key_actions() {
        let fk = ForeignKey::new("articles_author_fk", "author_id", "authors", "id")
            .with_on_delete(ReferentialAction::SetNull);
        let json = serde_json::to_value(&fk).unwrap();

        assert_eq!(json["referencedTable"], "authors");
        assert_eq!(json["onDelete"], "SET NULL");
        assert!(json.get("onUpdate").is_none());

        let decoded: ForeignKey = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, fk);
    }
}
