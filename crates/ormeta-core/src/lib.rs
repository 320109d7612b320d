//! ORMeta Core - entity metadata model and registry.
//!
//! This crate describes how entity schemas map onto tables, columns and join
//! tables, and keeps one [`Meta`] per entity in a [`Metadata`] registry that
//! query planning and persistence code can look up by uid.

pub mod catalog;
pub mod config;
pub mod error;

pub use catalog::{
    Attribute, AttributeJoinTable, AttributeOptions, BidirectionalJoinTable, BidirectionalKind,
    BidirectionalRelation, ColumnInfo, ColumnRef, ColumnType, ForeignKey, Index, IndexType,
    JoinColumn, JoinOrderBy, Meta, Metadata, Model, MorphColumn, MorphJoinTable, MorphKind,
    MorphRelation, NamedColumn, OrderDirection, RawAttribute, RawJoinTable, RawMeta,
    ReferentialAction, RelationFamily, RelationKind, RelationOptions, ScalarAttribute,
    ScalarType, SchemaDocument, SharedMetadata, WayKind, WayRelation,
};
pub use config::MetadataConfig;
pub use error::{AttributeFault, Error, InvalidAttributeError, Result};
