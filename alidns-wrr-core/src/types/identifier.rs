//! Resource and import identifiers

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Ordered remote record IDs of a weighted record set, rendered comma-joined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceId(Vec<String>);

impl ResourceId {
    /// Build from record IDs; every ID must be non-empty and comma-free.
    pub fn new(record_ids: Vec<String>) -> Result<Self, CoreError> {
        if record_ids.is_empty()
            || record_ids
                .iter()
                .any(|id| id.trim().is_empty() || id.contains(','))
        {
            return Err(CoreError::InvalidResourceId(record_ids.join(",")));
        }
        Ok(Self(record_ids))
    }

    pub fn record_ids(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(","))
    }
}

impl FromStr for ResourceId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(CoreError::InvalidResourceId(s.to_string()));
        }
        let ids: Vec<String> = s.split(',').map(|id| id.trim().to_string()).collect();
        if ids.iter().any(String::is_empty) {
            return Err(CoreError::InvalidResourceId(s.to_string()));
        }
        Ok(Self(ids))
    }
}

impl TryFrom<String> for ResourceId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ResourceId> for String {
    fn from(id: ResourceId) -> Self {
        id.to_string()
    }
}

/// `<domain_name>/<record_id>` as accepted by import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportId {
    pub domain_name: String,
    pub record_id: String,
}

impl FromStr for ImportId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidImportId(s.to_string());
        let (domain_name, record_id) = s.split_once('/').ok_or_else(invalid)?;
        if domain_name.is_empty() || record_id.is_empty() || record_id.contains('/') {
            return Err(invalid());
        }
        Ok(Self {
            domain_name: domain_name.to_string(),
            record_id: record_id.to_string(),
        })
    }
}

impl fmt::Display for ImportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.domain_name, self.record_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_id_round_trips_through_string() {
        let id: ResourceId = "101,102,103".parse().unwrap();
        assert_eq!(id.record_ids(), ["101", "102", "103"]);
        assert_eq!(id.to_string(), "101,102,103");
        assert_eq!(id.len(), 3);
    }

    #[test]
    fn resource_id_rejects_empty_segments() {
        for raw in ["", "101,,102", "101,", ",101", " "] {
            assert!(
                matches!(raw.parse::<ResourceId>(), Err(CoreError::InvalidResourceId(_))),
                "expected '{raw}' to be rejected"
            );
        }
        assert!(ResourceId::new(vec![]).is_err());
        assert!(ResourceId::new(vec!["1,2".to_string()]).is_err());
    }

    #[test]
    fn resource_id_serializes_as_string() {
        let id = ResourceId::new(vec!["1".to_string(), "2".to_string()]).unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"1,2\"");
        let back: ResourceId = serde_json::from_str("\"1,2\"").unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<ResourceId>("\"1,,2\"").is_err());
    }

    #[test]
    fn import_id_parses_domain_and_record() {
        let id: ImportId = "example.com/rec-123".parse().unwrap();
        assert_eq!(id.domain_name, "example.com");
        assert_eq!(id.record_id, "rec-123");
        assert_eq!(id.to_string(), "example.com/rec-123");
    }

    #[test]
    fn import_id_rejects_malformed_input() {
        for raw in ["example.com", "a/b/c", "/x", "x/", "/", ""] {
            assert!(
                matches!(raw.parse::<ImportId>(), Err(CoreError::InvalidImportId(ref s)) if s == raw),
                "expected '{raw}' to be rejected"
            );
        }
    }
}
