//! Entity metadata catalog.
//!
//! Describes how entity schemas map onto tables, columns and join tables,
//! and stores one [`Meta`] per entity in the [`Metadata`] registry.

mod attribute;
mod column;
mod constraint;
mod entity;
mod join;
mod raw;
mod registry;
mod schema;
mod types;

pub use attribute::{
    Attribute, AttributeOptions, BidirectionalRelation, MorphRelation, RelationOptions,
    ScalarAttribute, WayRelation,
};
pub use column::{ColumnInfo, ColumnRef, ColumnType, JoinColumn, MorphColumn, NamedColumn};
pub use constraint::{ForeignKey, Index, IndexType, ReferentialAction};
pub use entity::{Meta, Model};
pub use join::{AttributeJoinTable, BidirectionalJoinTable, JoinOrderBy, MorphJoinTable};
pub use raw::{RawAttribute, RawJoinTable, RawMeta};
pub use registry::{Metadata, SharedMetadata};
pub use schema::SchemaDocument;
pub use types::{
    BidirectionalKind, MorphKind, OrderDirection, RelationFamily, RelationKind, ScalarType,
    WayKind, RELATION_TYPE,
};
