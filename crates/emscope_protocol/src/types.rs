//! Target catalog and property payload types.
//!
//! These mirror the OEM REST wire format closely enough to deserialize its
//! responses directly, while keeping the type name as a real enum so the
//! mapper never matches on loose strings.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Target types
// ============================================================================

/// Monitored target type.
///
/// Only the six variants below carry mapping semantics. Everything else the
/// catalog contains (weblogic domains, agents, ...) is preserved verbatim as
/// `Other` so a cache round-trip never loses the original type string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetType {
    /// Physical or virtual host
    Host,
    /// Database listener process
    OracleListener,
    /// Database system (owning container for a cluster + its instances)
    OracleDbsys,
    /// Clustered (RAC) database
    RacDatabase,
    /// Single database instance
    OracleDatabase,
    /// Pluggable database hosted inside a cluster database
    OraclePdb,
    /// Any catalog type the mapper does not reason about
    Other(String),
}

impl TargetType {
    pub fn as_str(&self) -> &str {
        match self {
            TargetType::Host => "host",
            TargetType::OracleListener => "oracle_listener",
            TargetType::OracleDbsys => "oracle_dbsys",
            TargetType::RacDatabase => "rac_database",
            TargetType::OracleDatabase => "oracle_database",
            TargetType::OraclePdb => "oracle_pdb",
            TargetType::Other(raw) => raw.as_str(),
        }
    }
}

impl From<&str> for TargetType {
    fn from(raw: &str) -> Self {
        match raw {
            "host" => TargetType::Host,
            "oracle_listener" => TargetType::OracleListener,
            "oracle_dbsys" => TargetType::OracleDbsys,
            "rac_database" => TargetType::RacDatabase,
            "oracle_database" => TargetType::OracleDatabase,
            "oracle_pdb" => TargetType::OraclePdb,
            other => TargetType::Other(other.to_string()),
        }
    }
}

impl From<String> for TargetType {
    fn from(raw: String) -> Self {
        TargetType::from(raw.as_str())
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for TargetType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TargetType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(TargetType::from(raw))
    }
}

// ============================================================================
// Catalog rows
// ============================================================================

/// One row of the flat target catalog. Identity is `id`; `name` and
/// `type_name` are the matching keys used by the mapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: String,
    pub name: String,
    #[serde(rename = "typeName")]
    pub type_name: TargetType,
    #[serde(
        rename = "displayName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub display_name: Option<String>,
}

/// A target as emitted by the mapper (and stored in site config): the minimal
/// catalog shape plus enrichment fields and the derived tag set.
///
/// `machine_name` and `listener_name` persist even when the corresponding
/// host/listener target could not be located in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedTarget {
    pub id: String,
    pub name: String,
    #[serde(rename = "typeName")]
    pub type_name: TargetType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dg_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listener_name: Option<String>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl TaggedTarget {
    /// Project a catalog row to its minimal public shape, with no tags yet.
    pub fn from_target(target: &Target) -> Self {
        Self {
            id: target.id.clone(),
            name: target.name.clone(),
            type_name: target.type_name.clone(),
            dg_role: None,
            machine_name: None,
            listener_name: None,
            tags: BTreeMap::new(),
        }
    }
}

// ============================================================================
// Target properties
// ============================================================================

/// One property item as returned by the OEM properties endpoint. Some
/// deployments key items by `id`, others by `name`; value may be any scalar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

impl PropertyItem {
    fn key(&self) -> Option<&str> {
        self.id.as_deref().or(self.name.as_deref())
    }
}

/// Runtime properties of a single target.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetProperties {
    #[serde(default)]
    pub items: Vec<PropertyItem>,
}

impl TargetProperties {
    /// Look up a property value by key, matched case-insensitively against
    /// the item's `id` falling back to its `name`. Scalars are rendered to
    /// their plain string form; explicit nulls read as absent.
    pub fn value_of(&self, key: &str) -> Option<String> {
        let want = key.to_ascii_lowercase();
        self.items
            .iter()
            .find(|item| {
                item.key()
                    .map(|k| k.to_ascii_lowercase() == want)
                    .unwrap_or(false)
            })
            .and_then(|item| item.value.as_ref())
            .and_then(|value| match value {
                serde_json::Value::Null => None,
                serde_json::Value::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            })
    }
}
