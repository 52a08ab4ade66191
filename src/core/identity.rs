//! Entity identity - prefixed ULID identifiers

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use ulid::Ulid;

/// Entity type prefixes used in ids and filenames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityPrefix {
    Deal,
    Pro,
    Task,
    Con,
    Tml,
}

impl EntityPrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityPrefix::Deal => "DEAL",
            EntityPrefix::Pro => "PRO",
            EntityPrefix::Task => "TASK",
            EntityPrefix::Con => "CON",
            EntityPrefix::Tml => "TML",
        }
    }

    /// All known prefixes
    pub fn all() -> &'static [EntityPrefix] {
        &[
            EntityPrefix::Deal,
            EntityPrefix::Pro,
            EntityPrefix::Task,
            EntityPrefix::Con,
            EntityPrefix::Tml,
        ]
    }

    /// Directory (relative to the project root) where entities of this type live
    pub fn dir(&self) -> &'static str {
        match self {
            EntityPrefix::Deal => "deals",
            EntityPrefix::Pro => "financials/proformas",
            EntityPrefix::Task => "tasks",
            EntityPrefix::Con => "contacts",
            EntityPrefix::Tml => "timelines",
        }
    }

    /// Detect the prefix from an entity filename like `DEAL-01J8G....plat.yaml`
    pub fn from_filename(name: &str) -> Option<EntityPrefix> {
        let head = name.split('-').next()?;
        EntityPrefix::all()
            .iter()
            .copied()
            .find(|p| p.as_str() == head)
    }
}

impl fmt::Display for EntityPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityPrefix {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_ascii_uppercase();
        EntityPrefix::all()
            .iter()
            .copied()
            .find(|p| p.as_str() == upper)
            .ok_or_else(|| IdParseError::UnknownPrefix(s.to_string()))
    }
}

/// A prefixed ULID identifier, e.g. `DEAL-01J8G3QV9X2M4N6P8R0T2V4X6Z`
///
/// Ids are minted once at creation time and never change; the ULID part
/// sorts chronologically, so id order within one entity type is creation
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId {
    prefix: EntityPrefix,
    ulid: Ulid,
}

impl EntityId {
    /// Mint a new id for the given entity type
    pub fn new(prefix: EntityPrefix) -> Self {
        Self {
            prefix,
            ulid: Ulid::new(),
        }
    }

    /// Parse a full `PREFIX-ULID` id string
    pub fn parse(s: &str) -> Result<Self, IdParseError> {
        let (prefix_part, ulid_part) = s
            .split_once('-')
            .ok_or_else(|| IdParseError::MissingSeparator(s.to_string()))?;
        let prefix = prefix_part.parse::<EntityPrefix>()?;
        let ulid = Ulid::from_string(ulid_part).map_err(|source| IdParseError::InvalidUlid {
            id: s.to_string(),
            source,
        })?;
        Ok(Self { prefix, ulid })
    }

    pub fn prefix(&self) -> EntityPrefix {
        self.prefix
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.prefix, self.ulid)
    }
}

impl FromStr for EntityId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityId::parse(s)
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        EntityId::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Errors from parsing id strings
#[derive(Debug, Error)]
pub enum IdParseError {
    #[error("id '{0}' is missing the PREFIX- separator")]
    MissingSeparator(String),

    #[error("unknown entity prefix '{0}'")]
    UnknownPrefix(String),

    #[error("id '{id}' has an invalid ULID part")]
    InvalidUlid {
        id: String,
        #[source]
        source: ulid::DecodeError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_id_has_prefix() {
        let id = EntityId::new(EntityPrefix::Deal);
        assert_eq!(id.prefix(), EntityPrefix::Deal);
        assert!(id.to_string().starts_with("DEAL-"));
    }

    #[test]
    fn test_parse_roundtrip() {
        let id = EntityId::new(EntityPrefix::Task);
        let parsed = EntityId::parse(&id.to_string()).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_parse_rejects_unknown_prefix() {
        let err = EntityId::parse("WIDGET-01J8G3QV9X2M4N6P8R0T2V4X6Z").unwrap_err();
        assert!(matches!(err, IdParseError::UnknownPrefix(_)));
    }

    #[test]
    fn test_parse_rejects_missing_separator() {
        let err = EntityId::parse("DEAL01J8G3QV9X").unwrap_err();
        assert!(matches!(err, IdParseError::MissingSeparator(_)));
    }

    #[test]
    fn test_parse_rejects_bad_ulid() {
        let err = EntityId::parse("DEAL-not_a_ulid").unwrap_err();
        assert!(matches!(err, IdParseError::InvalidUlid { .. }));
    }

    #[test]
    fn test_serde_as_string() {
        let id = EntityId::new(EntityPrefix::Pro);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
        let back: EntityId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_prefix_from_filename() {
        assert_eq!(
            EntityPrefix::from_filename("DEAL-01J8G3QV9X2M4N6P8R0T2V4X6Z.plat.yaml"),
            Some(EntityPrefix::Deal)
        );
        assert_eq!(
            EntityPrefix::from_filename("TML-01J8G3QV9X2M4N6P8R0T2V4X6Z.plat.yaml"),
            Some(EntityPrefix::Tml)
        );
        assert_eq!(EntityPrefix::from_filename("notes.md"), None);
    }

    #[test]
    fn test_ids_sort_in_creation_order() {
        let older = EntityId::parse("DEAL-01J0000000000000000000000001").unwrap();
        let newer = EntityId::parse("DEAL-01J0000000000000000000000002").unwrap();
        assert!(older < newer);
    }

    #[test]
    fn test_prefix_parse_case_insensitive() {
        assert_eq!("deal".parse::<EntityPrefix>().unwrap(), EntityPrefix::Deal);
        assert_eq!("Task".parse::<EntityPrefix>().unwrap(), EntityPrefix::Task);
    }
}
