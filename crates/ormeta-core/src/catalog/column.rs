//! Column descriptors.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// A present field, `null` included, is `Some`; only a missing one is `None`.
pub(crate) fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Physical column options.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnInfo {
    /// Whether a numeric column is unsigned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unsigned: Option<bool>,
    /// Database-level default literal.
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_to: Option<Value>,
}

impl ColumnInfo {
    /// Mark the column unsigned.
    pub fn unsigned(mut self) -> Self {
        self.unsigned = Some(true);
        self
    }

    /// Set the database-level default.
    pub fn with_default_to(mut self, value: impl Into<Value>) -> Self {
        self.default_to = Some(value.into());
        self
    }
}

/// Raw database column type override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnType {
    /// Native type name.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Type arguments (length, precision, ...).
    #[serde(default)]
    pub args: Vec<Value>,
}

impl ColumnType {
    /// Create a column type without arguments.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            args: Vec::new(),
        }
    }

    /// Append a type argument.
    pub fn with_arg(mut self, arg: impl Into<Value>) -> Self {
        self.args.push(arg.into());
        self
    }
}

/// A join-table column and the column/table it references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinColumn {
    /// Column name in the join table.
    pub name: String,
    /// Referenced column.
    pub referenced_column: String,
    /// Referenced table, when not implied by the relation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referenced_table: Option<String>,
}

impl JoinColumn {
    /// Create a join column.
    pub fn new(name: impl Into<String>, referenced_column: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            referenced_column: referenced_column.into(),
            referenced_table: None,
        }
    }

    /// Set the referenced table.
    pub fn with_referenced_table(mut self, table: impl Into<String>) -> Self {
        self.referenced_table = Some(table.into());
        self
    }
}

/// A column referencing a column of another table.
///
/// Used for the inverse side of a join table and the id half of a morph column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnRef {
    /// Local column name.
    pub name: String,
    /// Referenced column.
    pub referenced_column: String,
}

impl ColumnRef {
    /// Create a column reference.
    pub fn new(name: impl Into<String>, referenced_column: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            referenced_column: referenced_column.into(),
        }
    }
}

/// A column known only by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedColumn {
    /// Column name.
    pub name: String,
}

/// Discriminator plus foreign id pointing at a row of a varying table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MorphColumn {
    /// Attribute that exposes the discriminator, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_field: Option<String>,
    /// Column holding the target entity type.
    pub type_column: NamedColumn,
    /// Column holding the target row id.
    pub id_column: ColumnRef,
}

impl MorphColumn {
    /// Create a morph column from its discriminator and id columns.
    pub fn new(type_column: impl Into<String>, id_column: ColumnRef) -> Self {
        Self {
            type_field: None,
            type_column: NamedColumn {
                name: type_column.into(),
            },
            id_column,
        }
    }

    /// Set the attribute exposing the discriminator.
    pub fn with_type_field(mut self, field: impl Into<String>) -> Self {
        self.type_field = Some(field.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_column_wire_names() {
        let column = JoinColumn::new("article_id", "id").with_referenced_table("articles");
        let json = serde_json::to_value(&column).unwrap();

        assert_eq!(json["name"], "article_id");
        assert_eq!(json["referencedColumn"], "id");
        assert_eq!(json["referencedTable"], "articles");
    }

    #[test]
    fn test_morph_column_from_json() {
        let column: MorphColumn = serde_json::from_str(
            r#"{
                "typeColumn": { "name": "related_type" },
                "idColumn": { "name": "related_id", "referencedColumn": "id" }
            }"#,
        )
        .unwrap();

        assert_eq!(column, MorphColumn::new("related_type", ColumnRef::new("related_id", "id")));
        assert!(column.type_field.is_none());
    }

    #[test]
    fn test_column_info_builder() {
        let info = ColumnInfo::default().unsigned().with_default_to(0);

        assert_eq!(info.unsigned, Some(true));
        assert_eq!(info.default_to, Some(Value::from(0)));
    }
}
