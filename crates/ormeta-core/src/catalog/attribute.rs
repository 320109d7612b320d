//! The attribute taxonomy.
//!
//! An [`Attribute`] is one of four closed variants selected by its
//! `(type, relation)` discriminator. Each variant carries exactly the
//! descriptors its kind requires, so a many-to-many relation without a join
//! table, or a morph relation without a morph column, cannot be built.
//! Schema-compiler output enters through [`RawAttribute`], whose conversion
//! is the single place that checks the required-field table.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::column::{ColumnInfo, ColumnType, JoinColumn, MorphColumn};
use super::join::{AttributeJoinTable, BidirectionalJoinTable, MorphJoinTable};
use super::raw::RawAttribute;
use super::types::{BidirectionalKind, MorphKind, RelationKind, ScalarType, WayKind, RELATION_TYPE};

/// Fields every attribute may carry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttributeOptions {
    /// Column name override; the attribute name is used otherwise.
    pub column_name: Option<String>,
    /// Application-level default value.
    pub default: Option<Value>,
    /// Physical column options.
    pub column: Option<ColumnInfo>,
    pub required: Option<bool>,
    pub unique: Option<bool>,
    /// Embedded component schema reference.
    pub component: Option<String>,
    pub repeatable: Option<bool>,
    /// Raw database type override.
    pub column_type: Option<ColumnType>,
}

impl AttributeOptions {
    /// Override the column name.
    pub fn with_column_name(mut self, name: impl Into<String>) -> Self {
        self.column_name = Some(name.into());
        self
    }

    /// Set the default value.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Set physical column options.
    pub fn with_column(mut self, column: ColumnInfo) -> Self {
        self.column = Some(column);
        self
    }

    /// Mark as required.
    pub fn required(mut self) -> Self {
        self.required = Some(true);
        self
    }

    /// Mark as unique.
    pub fn unique(mut self) -> Self {
        self.unique = Some(true);
        self
    }

    /// Reference an embedded component schema.
    pub fn with_component(mut self, component: impl Into<String>, repeatable: bool) -> Self {
        self.component = Some(component.into());
        self.repeatable = Some(repeatable);
        self
    }

    /// Override the database column type.
    pub fn with_column_type(mut self, column_type: ColumnType) -> Self {
        self.column_type = Some(column_type);
        self
    }
}

/// Relation flags shared by every relational variant.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RelationOptions {
    /// Whether this side owns the association rows.
    pub owner: Option<bool>,
    /// Whether the relation is stored through a join table.
    pub use_join_table: Option<bool>,
    /// Foreign-key column on the entity's own table.
    pub join_column: Option<JoinColumn>,
}

/// An attribute stored in a column of the entity's own table.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarAttribute {
    pub scalar_type: ScalarType,
    pub options: AttributeOptions,
}

/// A unidirectional relation (`oneWay`, `manyWay`).
#[derive(Debug, Clone, PartialEq)]
pub struct WayRelation {
    pub kind: WayKind,
    /// Target entity uid.
    pub target: String,
    /// Pivot table, when the relation is stored through one.
    pub join_table: Option<AttributeJoinTable>,
    pub relation: RelationOptions,
    pub options: AttributeOptions,
}

/// A relation whose inverse side is tracked (`oneToOne` .. `manyToMany`).
#[derive(Debug, Clone, PartialEq)]
pub struct BidirectionalRelation {
    pub kind: BidirectionalKind,
    /// Target entity uid.
    pub target: String,
    /// Attribute on the target holding the inverse side.
    pub inversed_by: String,
    pub join_table: BidirectionalJoinTable,
    pub relation: RelationOptions,
    pub options: AttributeOptions,
}

/// A polymorphic relation (`morphMany`, `morphOne`, `morphToOne`, `morphToMany`).
#[derive(Debug, Clone, PartialEq)]
pub struct MorphRelation {
    pub kind: MorphKind,
    /// Target entity uid.
    pub target: String,
    /// Attribute on the target driving the morph.
    pub morph_by: String,
    pub morph_column: MorphColumn,
    pub join_table: MorphJoinTable,
    pub relation: RelationOptions,
    pub options: AttributeOptions,
}

/// A named field of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAttribute", into = "RawAttribute")]
pub enum Attribute {
    Scalar(ScalarAttribute),
    Way(WayRelation),
    Bidirectional(BidirectionalRelation),
    Morph(MorphRelation),
}

impl Attribute {
    /// Create a scalar attribute.
    pub fn scalar(scalar_type: ScalarType) -> Self {
        Attribute::Scalar(ScalarAttribute {
            scalar_type,
            options: AttributeOptions::default(),
        })
    }

    /// Create a unidirectional relation.
    pub fn way(kind: WayKind, target: impl Into<String>) -> Self {
        Attribute::Way(WayRelation {
            kind,
            target: target.into(),
            join_table: None,
            relation: RelationOptions::default(),
            options: AttributeOptions::default(),
        })
    }

    /// Create a bidirectional relation.
    pub fn bidirectional(
        kind: BidirectionalKind,
        target: impl Into<String>,
        inversed_by: impl Into<String>,
        join_table: BidirectionalJoinTable,
    ) -> Self {
        Attribute::Bidirectional(BidirectionalRelation {
            kind,
            target: target.into(),
            inversed_by: inversed_by.into(),
            join_table,
            relation: RelationOptions::default(),
            options: AttributeOptions::default(),
        })
    }

    /// Create a polymorphic relation.
    pub fn morph(
        kind: MorphKind,
        target: impl Into<String>,
        morph_by: impl Into<String>,
        morph_column: MorphColumn,
        join_table: MorphJoinTable,
    ) -> Self {
        Attribute::Morph(MorphRelation {
            kind,
            target: target.into(),
            morph_by: morph_by.into(),
            morph_column,
            join_table,
            relation: RelationOptions::default(),
            options: AttributeOptions::default(),
        })
    }

    /// Replace the common options.
    pub fn with_options(mut self, options: AttributeOptions) -> Self {
        *self.options_mut() = options;
        self
    }

    /// Common options.
    pub fn options(&self) -> &AttributeOptions {
        match self {
            Attribute::Scalar(a) => &a.options,
            Attribute::Way(a) => &a.options,
            Attribute::Bidirectional(a) => &a.options,
            Attribute::Morph(a) => &a.options,
        }
    }

    /// Mutable common options.
    pub fn options_mut(&mut self) -> &mut AttributeOptions {
        match self {
            Attribute::Scalar(a) => &mut a.options,
            Attribute::Way(a) => &mut a.options,
            Attribute::Bidirectional(a) => &mut a.options,
            Attribute::Morph(a) => &mut a.options,
        }
    }

    /// Relation flags, for relational attributes.
    pub fn relation_options(&self) -> Option<&RelationOptions> {
        match self {
            Attribute::Scalar(_) => None,
            Attribute::Way(a) => Some(&a.relation),
            Attribute::Bidirectional(a) => Some(&a.relation),
            Attribute::Morph(a) => Some(&a.relation),
        }
    }

    /// The `type` discriminator.
    pub fn type_name(&self) -> &'static str {
        match self {
            Attribute::Scalar(a) => a.scalar_type.as_str(),
            _ => RELATION_TYPE,
        }
    }

    /// The scalar type, for scalar attributes.
    pub fn scalar_type(&self) -> Option<ScalarType> {
        match self {
            Attribute::Scalar(a) => Some(a.scalar_type),
            _ => None,
        }
    }

    /// The `relation` discriminator, for relational attributes.
    pub fn relation_kind(&self) -> Option<RelationKind> {
        match self {
            Attribute::Scalar(_) => None,
            Attribute::Way(a) => Some(a.kind.into()),
            Attribute::Bidirectional(a) => Some(a.kind.into()),
            Attribute::Morph(a) => Some(a.kind.into()),
        }
    }

    /// Target entity uid, for relational attributes.
    pub fn target(&self) -> Option<&str> {
        match self {
            Attribute::Scalar(_) => None,
            Attribute::Way(a) => Some(a.target.as_str()),
            Attribute::Bidirectional(a) => Some(a.target.as_str()),
            Attribute::Morph(a) => Some(a.target.as_str()),
        }
    }

    /// Name of the pivot table backing this attribute, if any.
    pub fn join_table_name(&self) -> Option<&str> {
        match self {
            Attribute::Scalar(_) => None,
            Attribute::Way(a) => a.join_table.as_ref().map(AttributeJoinTable::name),
            Attribute::Bidirectional(a) => Some(a.join_table.name()),
            Attribute::Morph(a) => Some(a.join_table.name()),
        }
    }

    /// Check if this attribute references other entities.
    pub fn is_relation(&self) -> bool {
        !matches!(self, Attribute::Scalar(_))
    }

    /// Column name override.
    pub fn column_name(&self) -> Option<&str> {
        self.options().column_name.as_deref()
    }
}
