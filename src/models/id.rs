use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid id: {0}")]
pub struct InvalidId(pub String);

/// Document identifier stored as `_id` and used for every foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(raw: &str) -> Result<Self, InvalidId> {
        Uuid::parse_str(raw.trim()).map(Self).map_err(|_| InvalidId(raw.to_string()))
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for DocumentId {
    type Err = InvalidId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_plain_string() {
        let id = DocumentId::parse("6f9619ff-8b86-4d01-b42d-00cf4fc964ff").unwrap();
        assert_eq!(serde_json::to_value(id).unwrap(), serde_json::json!("6f9619ff-8b86-4d01-b42d-00cf4fc964ff"));
        assert_eq!(id.to_string(), "6f9619ff-8b86-4d01-b42d-00cf4fc964ff");
    }

    #[test]
    fn rejects_malformed_ids() {
        let err = DocumentId::parse("not-an-id").unwrap_err();
        assert_eq!(err.to_string(), "invalid id: not-an-id");
        assert!("".parse::<DocumentId>().is_err());
    }

    #[test]
    fn fresh_ids_differ() {
        assert_ne!(DocumentId::new(), DocumentId::new());
    }
}
