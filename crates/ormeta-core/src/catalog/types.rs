//! Core type definitions for the catalog.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AttributeFault;

/// The `type` discriminator shared by every relational attribute.
pub const RELATION_TYPE: &str = "relation";

/// Scalar attribute types, stored in a column of the entity's own table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    /// Auto-incrementing integer key.
    Increments,
    /// Hashed password string.
    Password,
    /// Email address string.
    Email,
    /// Short string.
    String,
    /// One of a fixed set of string values.
    Enumeration,
    /// URL-safe unique identifier string.
    Uid,
    /// Rich text document.
    RichText,
    /// Long text.
    Text,
    /// Arbitrary JSON document.
    Json,
    /// 32-bit integer.
    Integer,
    /// 64-bit integer.
    BigInteger,
    /// Floating point number.
    Float,
    /// Fixed-precision decimal.
    Decimal,
    /// Boolean value.
    Boolean,
    /// Calendar date.
    Date,
    /// Time of day.
    Time,
    /// Date and time.
    DateTime,
    /// Timestamp.
    Timestamp,
}

impl ScalarType {
    /// Every scalar type, in declaration order.
    pub const ALL: [ScalarType; 18] = [
        ScalarType::Increments,
        ScalarType::Password,
        ScalarType::Email,
        ScalarType::String,
        ScalarType::Enumeration,
        ScalarType::Uid,
        ScalarType::RichText,
        ScalarType::Text,
        ScalarType::Json,
        ScalarType::Integer,
        ScalarType::BigInteger,
        ScalarType::Float,
        ScalarType::Decimal,
        ScalarType::Boolean,
        ScalarType::Date,
        ScalarType::Time,
        ScalarType::DateTime,
        ScalarType::Timestamp,
    ];

    /// The schema name of this type.
    pub fn as_str(self) -> &'static str {
        match self {
            ScalarType::Increments => "increments",
            ScalarType::Password => "password",
            ScalarType::Email => "email",
            ScalarType::String => "string",
            ScalarType::Enumeration => "enumeration",
            ScalarType::Uid => "uid",
            ScalarType::RichText => "richtext",
            ScalarType::Text => "text",
            ScalarType::Json => "json",
            ScalarType::Integer => "integer",
            ScalarType::BigInteger => "biginteger",
            ScalarType::Float => "float",
            ScalarType::Decimal => "decimal",
            ScalarType::Boolean => "boolean",
            ScalarType::Date => "date",
            ScalarType::Time => "time",
            ScalarType::DateTime => "datetime",
            ScalarType::Timestamp => "timestamp",
        }
    }

    /// Check if this type is numeric.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            ScalarType::Increments
                | ScalarType::Integer
                | ScalarType::BigInteger
                | ScalarType::Float
                | ScalarType::Decimal
        )
    }

    /// Check if this type is a string-like type.
    pub fn is_string_like(self) -> bool {
        matches!(
            self,
            ScalarType::Password
                | ScalarType::Email
                | ScalarType::String
                | ScalarType::Enumeration
                | ScalarType::Uid
                | ScalarType::RichText
                | ScalarType::Text
        )
    }

    /// Check if this type holds a date and/or time.
    pub fn is_temporal(self) -> bool {
        matches!(
            self,
            ScalarType::Date | ScalarType::Time | ScalarType::DateTime | ScalarType::Timestamp
        )
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScalarType {
    type Err = AttributeFault;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScalarType::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| AttributeFault::UnknownType(s.to_string()))
    }
}

/// Which branch of the attribute taxonomy a relation kind belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationFamily {
    /// Unidirectional, no inverse tracked.
    Way,
    /// Inverse tracked via `inversedBy`.
    Bidirectional,
    /// Target type varies per row.
    Morph,
}

/// The `relation` discriminator of a relational attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    OneWay,
    ManyWay,
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
    MorphMany,
    MorphOne,
    MorphToOne,
    MorphToMany,
}

impl RelationKind {
    /// Every relation kind, in declaration order.
    pub const ALL: [RelationKind; 10] = [
        RelationKind::OneWay,
        RelationKind::ManyWay,
        RelationKind::OneToOne,
        RelationKind::OneToMany,
        RelationKind::ManyToOne,
        RelationKind::ManyToMany,
        RelationKind::MorphMany,
        RelationKind::MorphOne,
        RelationKind::MorphToOne,
        RelationKind::MorphToMany,
    ];

    /// The schema name of this relation kind.
    pub fn as_str(self) -> &'static str {
        match self {
            RelationKind::OneWay => "oneWay",
            RelationKind::ManyWay => "manyWay",
            RelationKind::OneToOne => "oneToOne",
            RelationKind::OneToMany => "oneToMany",
            RelationKind::ManyToOne => "manyToOne",
            RelationKind::ManyToMany => "manyToMany",
            RelationKind::MorphMany => "morphMany",
            RelationKind::MorphOne => "morphOne",
            RelationKind::MorphToOne => "morphToOne",
            RelationKind::MorphToMany => "morphToMany",
        }
    }

    /// The taxonomy branch this kind selects.
    pub fn family(self) -> RelationFamily {
        match self {
            RelationKind::OneWay | RelationKind::ManyWay => RelationFamily::Way,
            RelationKind::OneToOne
            | RelationKind::OneToMany
            | RelationKind::ManyToOne
            | RelationKind::ManyToMany => RelationFamily::Bidirectional,
            RelationKind::MorphMany
            | RelationKind::MorphOne
            | RelationKind::MorphToOne
            | RelationKind::MorphToMany => RelationFamily::Morph,
        }
    }

    /// Check if the owning side may reference more than one row.
    pub fn is_to_many(self) -> bool {
        matches!(
            self,
            RelationKind::ManyWay
                | RelationKind::OneToMany
                | RelationKind::ManyToMany
                | RelationKind::MorphMany
                | RelationKind::MorphToMany
        )
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationKind {
    type Err = AttributeFault;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RelationKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| AttributeFault::UnknownRelation(s.to_string()))
    }
}

/// Unidirectional relation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WayKind {
    OneWay,
    ManyWay,
}

/// Bidirectional relation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BidirectionalKind {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

/// Polymorphic relation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MorphKind {
    MorphMany,
    MorphOne,
    MorphToOne,
    MorphToMany,
}

impl From<WayKind> for RelationKind {
    fn from(kind: WayKind) -> Self {
        match kind {
            WayKind::OneWay => RelationKind::OneWay,
            WayKind::ManyWay => RelationKind::ManyWay,
        }
    }
}

impl From<BidirectionalKind> for RelationKind {
    fn from(kind: BidirectionalKind) -> Self {
        match kind {
            BidirectionalKind::OneToOne => RelationKind::OneToOne,
            BidirectionalKind::OneToMany => RelationKind::OneToMany,
            BidirectionalKind::ManyToOne => RelationKind::ManyToOne,
            BidirectionalKind::ManyToMany => RelationKind::ManyToMany,
        }
    }
}

impl From<MorphKind> for RelationKind {
    fn from(kind: MorphKind) -> Self {
        match kind {
            MorphKind::MorphMany => RelationKind::MorphMany,
            MorphKind::MorphOne => RelationKind::MorphOne,
            MorphKind::MorphToOne => RelationKind::MorphToOne,
            MorphKind::MorphToMany => RelationKind::MorphToMany,
        }
    }
}

impl TryFrom<RelationKind> for WayKind {
    type Error = RelationKind;

    fn try_from(kind: RelationKind) -> Result<Self, Self::Error> {
        match kind {
            RelationKind::OneWay => Ok(WayKind::OneWay),
            RelationKind::ManyWay => Ok(WayKind::ManyWay),
            other => Err(other),
        }
    }
}

impl TryFrom<RelationKind> for BidirectionalKind {
    type Error = RelationKind;

    fn try_from(kind: RelationKind) -> Result<Self, Self::Error> {
        match kind {
            RelationKind::OneToOne => Ok(BidirectionalKind::OneToOne),
            RelationKind::OneToMany => Ok(BidirectionalKind::OneToMany),
            RelationKind::ManyToOne => Ok(BidirectionalKind::ManyToOne),
            RelationKind::ManyToMany => Ok(BidirectionalKind::ManyToMany),
            other => Err(other),
        }
    }
}

impl TryFrom<RelationKind> for MorphKind {
    type Error = RelationKind;

    fn try_from(kind: RelationKind) -> Result<Self, Self::Error> {
        match kind {
            RelationKind::MorphMany => Ok(MorphKind::MorphMany),
            RelationKind::MorphOne => Ok(MorphKind::MorphOne),
            RelationKind::MorphToOne => Ok(MorphKind::MorphToOne),
            RelationKind::MorphToMany => Ok(MorphKind::MorphToMany),
            other => Err(other),
        }
    }
}

/// Sort direction for join-table ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}
