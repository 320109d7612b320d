//! Flat document shapes produced by the schema compiler.
//!
//! These mirror the JSON emitted upstream: every field is optional and the
//! `(type, relation)` discriminator decides which ones must be present.
//! Converting a [`RawAttribute`] into an [`Attribute`] enforces that table.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::attribute::{
    Attribute, AttributeOptions, BidirectionalRelation, MorphRelation, RelationOptions,
    ScalarAttribute, WayRelation,
};
use super::column::{present_value, ColumnInfo, ColumnRef, ColumnType, JoinColumn, MorphColumn};
use super::constraint::{ForeignKey, Index};
use super::join::{AttributeJoinTable, BidirectionalJoinTable, JoinOrderBy, MorphJoinTable};
use super::types::{RelationFamily, RelationKind, ScalarType, RELATION_TYPE};
use crate::error::{AttributeFault, InvalidAttributeError};

/// An attribute as it appears in a schema document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAttribute {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inversed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub morph_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_join_table: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_table: Option<RawJoinTable>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_column: Option<JoinColumn>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub morph_column: Option<MorphColumn>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_name: Option<String>,
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<ColumnInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeatable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_type: Option<ColumnType>,
}

/// A join table as it appears in a schema document.
///
/// Plain and bidirectional join tables use `inverseJoinColumn`; morph join
/// tables use `morphColumn` instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawJoinTable {
    pub name: String,
    pub join_column: JoinColumn,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inverse_join_column: Option<ColumnRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub morph_column: Option<MorphColumn>,
    pub pivot_columns: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<JoinOrderBy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on: Option<IndexMap<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_column_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inverse_order_column_name: Option<String>,
}

/// An entity as it appears in a schema document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMeta {
    pub uid: String,
    pub table_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub singular_name: Option<String>,
    #[serde(default)]
    pub attributes: IndexMap<String, RawAttribute>,
    #[serde(default)]
    pub indexes: Vec<Index>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_keys: Option<Vec<ForeignKey>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifecycles: Option<IndexMap<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_to_attribute: Option<IndexMap<String, String>>,
    /// Uid of the linked component Meta.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_link: Option<String>,
}

impl RawJoinTable {
    fn into_join_table(self, kind: RelationKind) -> Result<AttributeJoinTable, AttributeFault> {
        if self.morph_column.is_some() {
            return Err(AttributeFault::UnexpectedField {
                field: "joinTable.morphColumn",
                kind: kind.to_string(),
            });
        }
        let inverse = self.inverse_join_column.ok_or(AttributeFault::MissingField {
            relation: kind,
            field: "joinTable.inverseJoinColumn",
        })?;

        let mut table = AttributeJoinTable::new(self.name, self.join_column, inverse);
        if let Some(on) = self.on {
            table = table.with_on(on);
        }
        if let Some(order_by) = self.order_by {
            table = table.with_order_by(order_by);
        }
        table
            .with_order_column_name(self.order_column_name)
            .with_inverse_order_column_name(self.inverse_order_column_name)
            .with_pivot_columns(self.pivot_columns)
    }

    fn into_morph_join_table(self, kind: RelationKind) -> Result<MorphJoinTable, AttributeFault> {
        if self.inverse_join_column.is_some() {
            return Err(AttributeFault::UnexpectedField {
                field: "joinTable.inverseJoinColumn",
                kind: kind.to_string(),
            });
        }
        if self.on.is_some() {
            return Err(AttributeFault::UnexpectedField {
                field: "joinTable.on",
                kind: kind.to_string(),
            });
        }
        let morph_column = self.morph_column.ok_or(AttributeFault::MissingField {
            relation: kind,
            field: "joinTable.morphColumn",
        })?;

        let mut table = MorphJoinTable::new(self.name, self.join_column, morph_column);
        if let Some(order_by) = self.order_by {
            table = table.with_order_by(order_by);
        }
        table
            .with_order_column_name(self.order_column_name)
            .with_inverse_order_column_name(self.inverse_order_column_name)
            .with_pivot_columns(self.pivot_columns)
    }
}

impl From<AttributeJoinTable> for RawJoinTable {
    fn from(table: AttributeJoinTable) -> Self {
        Self {
            name: table.name().to_string(),
            join_column: table.join_column().clone(),
            inverse_join_column: Some(table.inverse_join_column().clone()),
            morph_column: None,
            pivot_columns: table.pivot_columns().to_vec(),
            order_by: table.order_by().cloned(),
            on: table.on().cloned(),
            order_column_name: table.order_column_name().map(String::from),
            inverse_order_column_name: table.inverse_order_column_name().map(String::from),
        }
    }
}

impl From<MorphJoinTable> for RawJoinTable {
    fn from(table: MorphJoinTable) -> Self {
        Self {
            name: table.name().to_string(),
            join_column: table.join_column().clone(),
            inverse_join_column: None,
            morph_column: Some(table.morph_column().clone()),
            pivot_columns: table.pivot_columns().to_vec(),
            order_by: table.order_by().cloned(),
            on: None,
            order_column_name: table.order_column_name().map(String::from),
            inverse_order_column_name: table.inverse_order_column_name().map(String::from),
        }
    }
}

impl RawAttribute {
    fn take_options(&mut self) -> AttributeOptions {
        AttributeOptions {
            column_name: self.column_name.take(),
            default: self.default.take(),
            column: self.column.take(),
            required: self.required.take(),
            unique: self.unique.take(),
            component: self.component.take(),
            repeatable: self.repeatable.take(),
            column_type: self.column_type.take(),
        }
    }

    fn put_options(&mut self, options: AttributeOptions) {
        self.column_name = options.column_name;
        self.default = options.default;
        self.column = options.column;
        self.required = options.required;
        self.unique = options.unique;
        self.component = options.component;
        self.repeatable = options.repeatable;
        self.column_type = options.column_type;
    }

    fn take_relation_options(&mut self) -> RelationOptions {
        RelationOptions {
            owner: self.owner.take(),
            use_join_table: self.use_join_table.take(),
            join_column: self.join_column.take(),
        }
    }

    fn put_relation_options(&mut self, relation: RelationOptions) {
        self.owner = relation.owner;
        self.use_join_table = relation.use_join_table;
        self.join_column = relation.join_column;
    }

    fn into_scalar(mut self) -> Result<Attribute, AttributeFault> {
        let scalar_type: ScalarType = self.type_name.parse()?;
        if let Some(relation) = &self.relation {
            return Err(AttributeFault::UnexpectedField {
                field: "relation",
                kind: format!("{scalar_type} ({relation})"),
            });
        }
        let relation_only = [
            ("target", self.target.is_some()),
            ("inversedBy", self.inversed_by.is_some()),
            ("morphBy", self.morph_by.is_some()),
            ("joinTable", self.join_table.is_some()),
            ("joinColumn", self.join_column.is_some()),
            ("morphColumn", self.morph_column.is_some()),
            ("owner", self.owner.is_some()),
            ("useJoinTable", self.use_join_table.is_some()),
        ];
        if let Some((field, _)) = relation_only.into_iter().find(|(_, present)| *present) {
            return Err(AttributeFault::UnexpectedField {
                field,
                kind: scalar_type.to_string(),
            });
        }

        Ok(Attribute::Scalar(ScalarAttribute {
            scalar_type,
            options: self.take_options(),
        }))
    }

    fn into_relation(mut self) -> Result<Attribute, AttributeFault> {
        let kind: RelationKind = self
            .relation
            .as_deref()
            .ok_or(AttributeFault::MissingRelationKind)?
            .parse()?;
        let options = self.take_options();
        let relation = self.take_relation_options();
        let target = self.target.ok_or(AttributeFault::MissingField {
            relation: kind,
            field: "target",
        })?;
        let missing = |field| AttributeFault::MissingField {
            relation: kind,
            field,
        };
        let unexpected = |field| AttributeFault::UnexpectedField {
            field,
            kind: kind.to_string(),
        };

        match kind.family() {
            RelationFamily::Way => {
                if self.inversed_by.is_some() {
                    return Err(unexpected("inversedBy"));
                }
                if self.morph_by.is_some() {
                    return Err(unexpected("morphBy"));
                }
                if self.morph_column.is_some() {
                    return Err(unexpected("morphColumn"));
                }
                let join_table = self
                    .join_table
                    .map(|table| table.into_join_table(kind))
                    .transpose()?;

                Ok(Attribute::Way(WayRelation {
                    kind: narrow(kind)?,
                    target,
                    join_table,
                    relation,
                    options,
                }))
            }
            RelationFamily::Bidirectional => {
                if self.morph_by.is_some() {
                    return Err(unexpected("morphBy"));
                }
                if self.morph_column.is_some() {
                    return Err(unexpected("morphColumn"));
                }
                let inversed_by = self.inversed_by.ok_or_else(|| missing("inversedBy"))?;
                let join_table = self.join_table.ok_or_else(|| missing("joinTable"))?;
                let join_table = BidirectionalJoinTable::try_from(join_table.into_join_table(kind)?)?;

                Ok(Attribute::Bidirectional(BidirectionalRelation {
                    kind: narrow(kind)?,
                    target,
                    inversed_by,
                    join_table,
                    relation,
                    options,
                }))
            }
            RelationFamily::Morph => {
                if self.inversed_by.is_some() {
                    return Err(unexpected("inversedBy"));
                }
                let morph_by = self.morph_by.ok_or_else(|| missing("morphBy"))?;
                let morph_column = self.morph_column.ok_or_else(|| missing("morphColumn"))?;
                let join_table = self
                    .join_table
                    .ok_or_else(|| missing("joinTable"))?
                    .into_morph_join_table(kind)?;

                Ok(Attribute::Morph(MorphRelation {
                    kind: narrow(kind)?,
                    target,
                    morph_by,
                    morph_column,
                    join_table,
                    relation,
                    options,
                }))
            }
        }
    }
}

// The family match guarantees the conversion succeeds.
fn narrow<K>(kind: RelationKind) -> Result<K, AttributeFault>
where
    K: TryFrom<RelationKind, Error = RelationKind>,
{
    K::try_from(kind).map_err(|other| AttributeFault::UnknownRelation(other.to_string()))
}

impl TryFrom<RawAttribute> for Attribute {
    type Error = InvalidAttributeError;

    fn try_from(raw: RawAttribute) -> Result<Self, Self::Error> {
        let attribute = if raw.type_name == RELATION_TYPE {
            raw.into_relation()?
        } else {
            raw.into_scalar()?
        };
        Ok(attribute)
    }
}

impl From<Attribute> for RawAttribute {
    fn from(attribute: Attribute) -> Self {
        let mut raw = RawAttribute {
            type_name: attribute.type_name().to_string(),
            relation: attribute.relation_kind().map(|kind| kind.to_string()),
            ..Default::default()
        };

        match attribute {
            Attribute::Scalar(scalar) => raw.put_options(scalar.options),
            Attribute::Way(way) => {
                raw.target = Some(way.target);
                raw.join_table = way.join_table.map(RawJoinTable::from);
                raw.put_relation_options(way.relation);
                raw.put_options(way.options);
            }
            Attribute::Bidirectional(bi) => {
                raw.target = Some(bi.target);
                raw.inversed_by = Some(bi.inversed_by);
                raw.join_table = Some(bi.join_table.into_inner().into());
                raw.put_relation_options(bi.relation);
                raw.put_options(bi.options);
            }
            Attribute::Morph(morph) => {
                raw.target = Some(morph.target);
                raw.morph_by = Some(morph.morph_by);
                raw.morph_column = Some(morph.morph_column);
                raw.join_table = Some(morph.join_table.into());
                raw.put_relation_options(morph.relation);
                raw.put_options(morph.options);
            }
        }
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BidirectionalKind, MorphKind, WayKind};

    fn parse(json: &str) -> Result<Attribute, InvalidAttributeError> {
        let raw: RawAttribute = serde_json::from_str(json).unwrap();
        Attribute::try_from(raw)
    }

    fn fault(json: &str) -> AttributeFault {
        parse(json).unwrap_err().fault
    }

    const MANY_TO_MANY: &str = r#"{
        "type": "relation",
        "relation": "manyToMany",
        "target": "tag",
        "inversedBy": "articles",
        "joinTable": {
            "name": "articles_tags",
            "joinColumn": { "name": "article_id", "referencedColumn": "id" },
            "inverseJoinColumn": { "name": "tag_id", "referencedColumn": "id" },
            "pivotColumns": ["article_id", "tag_id"],
            "orderColumnName": "article_order",
            "inverseOrderColumnName": "tag_order"
        }
    }"#;

    const MORPH_TO_MANY: &str = r#"{
        "type": "relation",
        "relation": "morphToMany",
        "target": "file",
        "morphBy": "related",
        "morphColumn": {
            "typeColumn": { "name": "related_type" },
            "idColumn": { "name": "related_id", "referencedColumn": "id" }
        },
        "joinTable": {
            "name": "files_related_morphs",
            "joinColumn": { "name": "file_id", "referencedColumn": "id" },
            "morphColumn": {
                "typeColumn": { "name": "related_type" },
                "idColumn": { "name": "related_id", "referencedColumn": "id" }
            },
            "pivotColumns": ["file_id", "related_id", "related_type"],
            "orderColumnName": "order"
        }
    }"#;

    #[test]
    fn test_scalar_from_raw() {
        let attribute = parse(r#"{ "type": "decimal", "column": { "unsigned": true }, "default": 0 }"#).unwrap();

        match attribute {
            Attribute::Scalar(scalar) => {
                assert_eq!(scalar.scalar_type, ScalarType::Decimal);
                assert_eq!(scalar.options.column.and_then(|c| c.unsigned), Some(true));
                assert_eq!(scalar.options.default, Some(Value::from(0)));
            }
            other => panic!("Expected Scalar, got {other:?}"),
        }
    }

    #[test]
    fn test_many_to_many_fields_retrievable() {
        let Attribute::Bidirectional(rel) = parse(MANY_TO_MANY).unwrap() else {
            panic!("Expected Bidirectional");
        };

        assert_eq!(rel.kind, BidirectionalKind::ManyToMany);
        assert_eq!(rel.target, "tag");
        assert_eq!(rel.inversed_by, "articles");
        assert_eq!(rel.join_table.name(), "articles_tags");
        assert_eq!(rel.join_table.join_column(), &JoinColumn::new("article_id", "id"));
        assert_eq!(rel.join_table.inverse_join_column(), &ColumnRef::new("tag_id", "id"));
        assert_eq!(rel.join_table.pivot_columns(), ["article_id", "tag_id"]);
        assert_eq!(rel.join_table.order_column_name(), "article_order");
        assert_eq!(rel.join_table.inverse_order_column_name(), "tag_order");
    }

    #[test]
    fn test_many_to_many_without_join_table() {
        assert_eq!(
            fault(r#"{ "type": "relation", "relation": "manyToMany", "target": "tag", "inversedBy": "articles" }"#),
            AttributeFault::MissingField {
                relation: RelationKind::ManyToMany,
                field: "joinTable",
            }
        );
    }

    #[test]
    fn test_bidirectional_missing_order_column() {
        let mut raw: RawAttribute = serde_json::from_str(MANY_TO_MANY).unwrap();
        if let Some(table) = raw.join_table.as_mut() {
            table.inverse_order_column_name = None;
        }

        let err = Attribute::try_from(raw).unwrap_err();
        assert_eq!(
            err.fault,
            AttributeFault::MissingOrderColumn {
                table: "articles_tags".into(),
                field: "inverseOrderColumnName",
            }
        );
    }

    #[test]
    fn test_bidirectional_missing_inversed_by() {
        let mut raw: RawAttribute = serde_json::from_str(MANY_TO_MANY).unwrap();
        raw.inversed_by = None;

        assert!(matches!(
            Attribute::try_from(raw).unwrap_err().fault,
            AttributeFault::MissingField { field: "inversedBy", .. }
        ));
    }

    #[test]
    fn test_pivot_mismatch_rejected() {
        let mut raw: RawAttribute = serde_json::from_str(MANY_TO_MANY).unwrap();
        if let Some(table) = raw.join_table.as_mut() {
            table.pivot_columns = vec!["article_id".into()];
        }

        assert!(matches!(
            Attribute::try_from(raw).unwrap_err().fault,
            AttributeFault::PivotMismatch { .. }
        ));
    }

    #[test]
    fn test_morph_relation_from_raw() {
        let Attribute::Morph(rel) = parse(MORPH_TO_MANY).unwrap() else {
            panic!("Expected Morph");
        };

        assert_eq!(rel.kind, MorphKind::MorphToMany);
        assert_eq!(rel.morph_by, "related");
        assert_eq!(rel.morph_column.type_column.name, "related_type");
        assert_eq!(rel.join_table.pivot_columns(), ["file_id", "related_id", "related_type"]);
        assert_eq!(rel.join_table.order_column_name(), Some("order"));
    }

    #[test]
    fn test_morph_without_morph_column() {
        let mut raw: RawAttribute = serde_json::from_str(MORPH_TO_MANY).unwrap();
        raw.morph_column = None;

        assert_eq!(
            Attribute::try_from(raw).unwrap_err().fault,
            AttributeFault::MissingField {
                relation: RelationKind::MorphToMany,
                field: "morphColumn",
            }
        );
    }

    #[test]
    fn test_way_relation_from_raw() {
        let Attribute::Way(rel) = parse(
            r#"{ "type": "relation", "relation": "manyWay", "target": "tag", "owner": true,
                 "joinColumn": { "name": "tag_id", "referencedColumn": "id" } }"#,
        )
        .unwrap() else {
            panic!("Expected Way");
        };

        assert_eq!(rel.kind, WayKind::ManyWay);
        assert!(rel.join_table.is_none());
        assert_eq!(rel.relation.owner, Some(true));
        assert_eq!(rel.relation.join_column.map(|c| c.name), Some("tag_id".to_string()));
    }

    #[test]
    fn test_cross_branch_fields_rejected() {
        assert!(matches!(
            fault(r#"{ "type": "relation", "relation": "oneWay", "target": "tag", "inversedBy": "x" }"#),
            AttributeFault::UnexpectedField { field: "inversedBy", .. }
        ));
        assert!(matches!(
            fault(r#"{ "type": "string", "target": "tag" }"#),
            AttributeFault::UnexpectedField { field: "target", .. }
        ));
        assert!(matches!(
            fault(r#"{ "type": "string", "relation": "oneWay" }"#),
            AttributeFault::UnexpectedField { field: "relation", .. }
        ));
        assert!(matches!(
            fault(r#"{ "type": "string", "owner": true }"#),
            AttributeFault::UnexpectedField { field: "owner", .. }
        ));
        assert!(matches!(
            fault(r#"{ "type": "integer", "useJoinTable": false }"#),
            AttributeFault::UnexpectedField { field: "useJoinTable", .. }
        ));
    }

    #[test]
    fn test_null_default_preserved() {
        let raw: RawAttribute = serde_json::from_str(
            r#"{ "type": "string", "default": null, "column": { "defaultTo": null } }"#,
        )
        .unwrap();
        assert_eq!(raw.default, Some(Value::Null));

        let attribute = Attribute::try_from(raw.clone()).unwrap();
        assert_eq!(attribute.options().default, Some(Value::Null));
        assert_eq!(
            attribute.options().column.as_ref().and_then(|c| c.default_to.clone()),
            Some(Value::Null)
        );

        let json = serde_json::to_value(RawAttribute::from(attribute)).unwrap();
        assert_eq!(json["default"], Value::Null);
        assert!(json.as_object().unwrap().contains_key("default"));

        let absent: RawAttribute = serde_json::from_str(r#"{ "type": "string" }"#).unwrap();
        assert_eq!(absent.default, None);
    }

    #[test]
    fn test_unknown_discriminators() {
        assert_eq!(
            fault(r#"{ "type": "component" }"#),
            AttributeFault::UnknownType("component".into())
        );
        assert_eq!(
            fault(r#"{ "type": "relation", "relation": "someToSome", "target": "x" }"#),
            AttributeFault::UnknownRelation("someToSome".into())
        );
        assert_eq!(
            fault(r#"{ "type": "relation", "target": "x" }"#),
            AttributeFault::MissingRelationKind
        );
        assert_eq!(
            fault(r#"{ "type": "relation", "relation": "oneWay" }"#),
            AttributeFault::MissingField {
                relation: RelationKind::OneWay,
                field: "target",
            }
        );
    }

    #[test]
    fn test_raw_roundtrip_preserves_fields() {
        for json in [MANY_TO_MANY, MORPH_TO_MANY] {
            let raw: RawAttribute = serde_json::from_str(json).unwrap();
            let attribute = Attribute::try_from(raw.clone()).unwrap();
            assert_eq!(RawAttribute::from(attribute), raw);
        }
    }
}
