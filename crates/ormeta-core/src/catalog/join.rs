//! Join table descriptors for two-sided and polymorphic relations.
//!
//! Every join table keeps its `pivot_columns` equal (as a set) to the columns
//! implied by its join, inverse and `on` descriptors. Constructors derive the
//! pivot list; [`AttributeJoinTable::with_pivot_columns`] and
//! [`MorphJoinTable::with_pivot_columns`] accept a declared list only if it
//! matches.

use std::ops::Deref;

use indexmap::IndexMap;
use serde_json::Value;

use super::column::{ColumnRef, JoinColumn, MorphColumn};
use super::types::OrderDirection;
use crate::error::AttributeFault;

/// Column ordering applied when reading a join table.
pub type JoinOrderBy = IndexMap<String, OrderDirection>;

/// Pivot table for a two-sided relation.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeJoinTable {
    name: String,
    join_column: JoinColumn,
    inverse_join_column: ColumnRef,
    pivot_columns: Vec<String>,
    order_by: Option<JoinOrderBy>,
    on: Option<IndexMap<String, Value>>,
    order_column_name: Option<String>,
    inverse_order_column_name: Option<String>,
}

impl AttributeJoinTable {
    /// Create a join table; pivot columns are the join and inverse columns.
    pub fn new(
        name: impl Into<String>,
        join_column: JoinColumn,
        inverse_join_column: ColumnRef,
    ) -> Self {
        let pivot_columns = distinct_columns([&join_column.name, &inverse_join_column.name]);
        Self {
            name: name.into(),
            join_column,
            inverse_join_column,
            pivot_columns,
            order_by: None,
            on: None,
            order_column_name: None,
            inverse_order_column_name: None,
        }
    }

    /// Restrict rows to those matching `on`; its keys become extra pivot columns.
    pub fn with_on(mut self, on: IndexMap<String, Value>) -> Self {
        for column in on.keys() {
            if !self.pivot_columns.contains(column) {
                self.pivot_columns.push(column.clone());
            }
        }
        self.on = Some(on);
        self
    }

    /// Set the read ordering.
    pub fn with_order_by(mut self, order_by: JoinOrderBy) -> Self {
        self.order_by = Some(order_by);
        self
    }

    /// Set both ordering columns.
    pub fn with_order_columns(
        mut self,
        order_column_name: impl Into<String>,
        inverse_order_column_name: impl Into<String>,
    ) -> Self {
        self.order_column_name = Some(order_column_name.into());
        self.inverse_order_column_name = Some(inverse_order_column_name.into());
        self
    }

    /// Set the owning-side ordering column.
    pub fn with_order_column_name(mut self, name: Option<String>) -> Self {
        self.order_column_name = name;
        self
    }

    /// Set the inverse-side ordering column.
    pub fn with_inverse_order_column_name(mut self, name: Option<String>) -> Self {
        self.inverse_order_column_name = name;
        self
    }

    /// Replace the pivot column list, keeping its order.
    ///
    /// Fails unless `columns` names exactly the join, inverse and `on` columns.
    pub fn with_pivot_columns(mut self, columns: Vec<String>) -> Result<Self, AttributeFault> {
        check_pivot_columns(&self.name, self.expected_pivot_columns(), &columns)?;
        self.pivot_columns = columns;
        Ok(self)
    }

    /// Columns the pivot list must consist of.
    pub fn expected_pivot_columns(&self) -> Vec<String> {
        let on = self.on.iter().flat_map(IndexMap::keys);
        distinct_columns(
            [&self.join_column.name, &self.inverse_join_column.name]
                .into_iter()
                .chain(on),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn join_column(&self) -> &JoinColumn {
        &self.join_column
    }

    pub fn inverse_join_column(&self) -> &ColumnRef {
        &self.inverse_join_column
    }

    pub fn pivot_columns(&self) -> &[String] {
        &self.pivot_columns
    }

    pub fn order_by(&self) -> Option<&JoinOrderBy> {
        self.order_by.as_ref()
    }

    pub fn on(&self) -> Option<&IndexMap<String, Value>> {
        self.on.as_ref()
    }

    pub fn order_column_name(&self) -> Option<&str> {
        self.order_column_name.as_deref()
    }

    pub fn inverse_order_column_name(&self) -> Option<&str> {
        self.inverse_order_column_name.as_deref()
    }
}

/// Join table of a bidirectional relation: both ordering columns are present.
#[derive(Debug, Clone, PartialEq)]
pub struct BidirectionalJoinTable(AttributeJoinTable);

impl BidirectionalJoinTable {
    /// Owning-side ordering column.
    pub fn order_column_name(&self) -> &str {
        self.0.order_column_name.as_deref().unwrap_or_default()
    }

    /// Inverse-side ordering column.
    pub fn inverse_order_column_name(&self) -> &str {
        self.0.inverse_order_column_name.as_deref().unwrap_or_default()
    }

    /// Unwrap into the plain join table.
    pub fn into_inner(self) -> AttributeJoinTable {
        self.0
    }
}

impl TryFrom<AttributeJoinTable> for BidirectionalJoinTable {
    type Error = AttributeFault;

    fn try_from(table: AttributeJoinTable) -> Result<Self, Self::Error> {
        if table.order_column_name.is_none() {
            return Err(AttributeFault::MissingOrderColumn {
                table: table.name,
                field: "orderColumnName",
            });
        }
        if table.inverse_order_column_name.is_none() {
            return Err(AttributeFault::MissingOrderColumn {
                table: table.name,
                field: "inverseOrderColumnName",
            });
        }
        Ok(Self(table))
    }
}

impl Deref for BidirectionalJoinTable {
    type Target = AttributeJoinTable;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Pivot table whose inverse side is a morph column instead of a fixed key.
#[derive(Debug, Clone, PartialEq)]
pub struct MorphJoinTable {
    name: String,
    join_column: JoinColumn,
    morph_column: MorphColumn,
    pivot_columns: Vec<String>,
    order_by: Option<JoinOrderBy>,
    order_column_name: Option<String>,
    inverse_order_column_name: Option<String>,
}

impl MorphJoinTable {
    /// Create a morph join table; pivot columns are the join, type and id columns.
    pub fn new(name: impl Into<String>, join_column: JoinColumn, morph_column: MorphColumn) -> Self {
        let pivot_columns = distinct_columns([
            &join_column.name,
            &morph_column.type_column.name,
            &morph_column.id_column.name,
        ]);
        Self {
            name: name.into(),
            join_column,
            morph_column,
            pivot_columns,
            order_by: None,
            order_column_name: None,
            inverse_order_column_name: None,
        }
    }

    /// Set the read ordering.
    pub fn with_order_by(mut self, order_by: JoinOrderBy) -> Self {
        self.order_by = Some(order_by);
        self
    }

    /// Set the owning-side ordering column.
    pub fn with_order_column_name(mut self, name: Option<String>) -> Self {
        self.order_column_name = name;
        self
    }

    /// Set the inverse-side ordering column.
    pub fn with_inverse_order_column_name(mut self, name: Option<String>) -> Self {
        self.inverse_order_column_name = name;
        self
    }

    /// Replace the pivot column list, keeping its order.
    ///
    /// Fails unless `columns` names exactly the join, type and id columns.
    pub fn with_pivot_columns(mut self, columns: Vec<String>) -> Result<Self, AttributeFault> {
        check_pivot_columns(&self.name, self.expected_pivot_columns(), &columns)?;
        self.pivot_columns = columns;
        Ok(self)
    }

    /// Columns the pivot list must consist of.
    pub fn expected_pivot_columns(&self) -> Vec<String> {
        distinct_columns([
            &self.join_column.name,
            &self.morph_column.type_column.name,
            &self.morph_column.id_column.name,
        ])
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn join_column(&self) -> &JoinColumn {
        &self.join_column
    }

    pub fn morph_column(&self) -> &MorphColumn {
        &self.morph_column
    }

    pub fn pivot_columns(&self) -> &[String] {
        &self.pivot_columns
    }

    pub fn order_by(&self) -> Option<&JoinOrderBy> {
        self.order_by.as_ref()
    }

    pub fn order_column_name(&self) -> Option<&str> {
        self.order_column_name.as_deref()
    }

    pub fn inverse_order_column_name(&self) -> Option<&str> {
        self.inverse_order_column_name.as_deref()
    }
}

// Column names in first-seen order, each once.
fn distinct_columns<'a>(columns: impl IntoIterator<Item = &'a String>) -> Vec<String> {
    let mut distinct: Vec<String> = Vec::new();
    for column in columns {
        if !distinct.contains(column) {
            distinct.push(column.clone());
        }
    }
    distinct
}

// Set equality; a repeated column never matches.
fn check_pivot_columns(
    table: &str,
    expected: Vec<String>,
    found: &[String],
) -> Result<(), AttributeFault> {
    let mut sorted_found = found.to_vec();
    sorted_found.sort();
    let mut sorted_expected = expected.clone();
    sorted_expected.sort();

    if sorted_found == sorted_expected {
        return Ok(());
    }

    Err(AttributeFault::PivotMismatch {
        table: table.to_string(),
        expected,
        found: found.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn articles_tags() -> AttributeJoinTable {
        AttributeJoinTable::new(
            "articles_tags",
            JoinColumn::new("article_id", "id"),
            ColumnRef::new("tag_id", "id"),
        )
    }

    #[test]
    fn test_join_table_derives_pivot_columns() {
        let table = articles_tags();

        assert_eq!(table.pivot_columns(), ["article_id", "tag_id"]);
        assert!(table.order_column_name().is_none());
    }

    #[test]
    fn test_on_keys_extend_pivot_columns() {
        let mut on = IndexMap::new();
        on.insert("field".to_string(), Value::from("blocks"));
        let table = articles_tags().with_on(on);

        assert_eq!(table.pivot_columns(), ["article_id", "tag_id", "field"]);
        assert!(table
            .clone()
            .with_pivot_columns(vec!["field".into(), "tag_id".into(), "article_id".into()])
            .is_ok());
    }

    #[test]
    fn test_pivot_columns_must_match() {
        let err = articles_tags()
            .with_pivot_columns(vec!["article_id".into(), "label_id".into()])
            .unwrap_err();

        assert!(matches!(err, AttributeFault::PivotMismatch { ref table, .. } if table == "articles_tags"));

        let repeated = articles_tags()
            .with_pivot_columns(vec!["article_id".into(), "tag_id".into(), "tag_id".into()]);
        assert!(repeated.is_err());
    }

    #[test]
    fn test_bidirectional_requires_both_order_columns() {
        let missing_both = BidirectionalJoinTable::try_from(articles_tags()).unwrap_err();
        assert_eq!(
            missing_both,
            AttributeFault::MissingOrderColumn {
                table: "articles_tags".into(),
                field: "orderColumnName",
            }
        );

        let missing_inverse = BidirectionalJoinTable::try_from(
            articles_tags().with_order_column_name(Some("tag_order".into())),
        )
        .unwrap_err();
        assert_eq!(
            missing_inverse,
            AttributeFault::MissingOrderColumn {
                table: "articles_tags".into(),
                field: "inverseOrderColumnName",
            }
        );

        let table = BidirectionalJoinTable::try_from(
            articles_tags().with_order_columns("tag_order", "article_order"),
        )
        .unwrap();
        assert_eq!(table.order_column_name(), "tag_order");
        assert_eq!(table.inverse_order_column_name(), "article_order");
        assert_eq!(table.name(), "articles_tags");
    }

    #[test]
    fn test_self_join_pivot_columns_consistent() {
        let table = AttributeJoinTable::new(
            "articles_related_links",
            JoinColumn::new("article_id", "id"),
            ColumnRef::new("article_id", "id"),
        );

        assert_eq!(table.pivot_columns(), ["article_id"]);
        assert_eq!(table.expected_pivot_columns(), ["article_id"]);
        assert!(table
            .clone()
            .with_pivot_columns(table.pivot_columns().to_vec())
            .is_ok());
        assert!(table
            .with_pivot_columns(vec!["article_id".into(), "article_id".into()])
            .is_err());
    }

    #[test]
    fn test_morph_join_table_pivot_columns() {
        let table = MorphJoinTable::new(
            "files_related_morphs",
            JoinColumn::new("file_id", "id"),
            MorphColumn::new("related_type", ColumnRef::new("related_id", "id")),
        );

        assert_eq!(table.pivot_columns(), ["file_id", "related_type", "related_id"]);
        assert!(table
            .with_pivot_columns(vec!["file_id".into(), "related_id".into()])
            .is_err());
    }
}
