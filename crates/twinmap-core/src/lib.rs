use chrono::{DateTime, Utc};
use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identifier of a thing (a node in the twin graph).
///
/// The registry issues UUID strings, but older records were keyed by integer
/// ids, so deserialization accepts either and normalizes to a string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ThingId(pub String);

impl fmt::Display for ThingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ThingId {
    fn from(s: &str) -> Self {
        ThingId(s.to_string())
    }
}

impl<'de> Deserialize<'de> for ThingId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(ThingId(deserialize_flexible_id(deserializer)?))
    }
}

/// Identifier of a relationship (a directed edge in the twin graph).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RelationId(pub String);

impl fmt::Display for RelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RelationId {
    fn from(s: &str) -> Self {
        RelationId(s.to_string())
    }
}

impl<'de> Deserialize<'de> for RelationId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(RelationId(deserialize_flexible_id(deserializer)?))
    }
}

fn deserialize_flexible_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
    })
}

/// Closed set of thing types known to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThingKind {
    Person,
    Machine,
    Object,
    /// Catch-all for records written by a newer registry version.
    #[default]
    #[serde(other)]
    Unknown,
}

impl ThingKind {
    pub const ALL: [ThingKind; 3] = [ThingKind::Person, ThingKind::Machine, ThingKind::Object];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThingKind::Person => "person",
            ThingKind::Machine => "machine",
            ThingKind::Object => "object",
            ThingKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ThingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ThingKind {
    type Err = KindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "person" => Ok(ThingKind::Person),
            "machine" => Ok(ThingKind::Machine),
            "object" => Ok(ThingKind::Object),
            other => Err(KindParseError::Thing(other.to_string())),
        }
    }
}

/// Closed set of relationship types.
///
/// The first three are the strong associations; the rest are weak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    Contains,
    Composes,
    Owns,
    RelatesTo,
    DependsOn,
    Influences,
    Collaborates,
    /// Catch-all so one unrecognized record cannot fail a whole fetch.
    #[default]
    #[serde(other)]
    Unknown,
}

impl RelationKind {
    pub const ALL: [RelationKind; 7] = [
        RelationKind::Contains,
        RelationKind::Composes,
        RelationKind::Owns,
        RelationKind::RelatesTo,
        RelationKind::DependsOn,
        RelationKind::Influences,
        RelationKind::Collaborates,
    ];

    pub fn strength(&self) -> Strength {
        match self {
            RelationKind::Contains | RelationKind::Composes | RelationKind::Owns => {
                Strength::Strong
            }
            _ => Strength::Weak,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::Contains => "contains",
            RelationKind::Composes => "composes",
            RelationKind::Owns => "owns",
            RelationKind::RelatesTo => "relates_to",
            RelationKind::DependsOn => "depends_on",
            RelationKind::Influences => "influences",
            RelationKind::Collaborates => "collaborates",
            RelationKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RelationKind {
    type Err = KindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "contains" => Ok(RelationKind::Contains),
            "composes" => Ok(RelationKind::Composes),
            "owns" => Ok(RelationKind::Owns),
            "relates_to" => Ok(RelationKind::RelatesTo),
            "depends_on" => Ok(RelationKind::DependsOn),
            "influences" => Ok(RelationKind::Influences),
            "collaborates" => Ok(RelationKind::Collaborates),
            other => Err(KindParseError::Relation(other.to_string())),
        }
    }
}

/// Error type for parsing kind names from user input (CLI flags, query params).
#[derive(Error, Debug, Clone)]
pub enum KindParseError {
    #[error("unknown thing kind: {0}")]
    Thing(String),
    #[error("unknown relation kind: {0}")]
    Relation(String),
}

/// Display strength class of a relationship type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strength {
    Strong,
    Weak,
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strength::Strong => write!(f, "strong"),
            Strength::Weak => write!(f, "weak"),
        }
    }
}

/// A digital-twin entity as returned by the registry.
///
/// Treated as an immutable snapshot for the duration of a render cycle;
/// `attributes` and `features` are opaque pass-through payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thing {
    pub id: ThingId,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: ThingKind,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default)]
    pub features: Map<String, Value>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A directed, typed relationship between two things.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    pub id: RelationId,
    #[serde(rename = "sourceId")]
    pub source: ThingId,
    #[serde(rename = "targetId")]
    pub target: ThingId,
    #[serde(rename = "type", default)]
    pub kind: RelationKind,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}
