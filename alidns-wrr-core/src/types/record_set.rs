//! Weighted record set configuration

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use alidns_wrr_provider::{RecordType, Toggle};

use crate::error::{CoreError, CoreResult};

/// Maximum number of records in one weighted record set.
pub const MAX_RECORDS: usize = 50;
/// Upper bound accepted for a record weight.
pub const MAX_WEIGHT: u32 = 100;
/// Resolution line used when none is configured.
pub const DEFAULT_LINE: &str = "default";

fn default_line() -> String {
    DEFAULT_LINE.to_string()
}

/// Desired configuration of a weighted record set.
///
/// All records share `domain_name`, `rr`, `type` and `line`; the ordered
/// `records` list is matched against remote records by position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeightedRecordSet {
    /// Zone, e.g. `example.com`.
    pub domain_name: String,
    /// Host record, `@` for the apex.
    pub rr: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    #[serde(default = "default_line")]
    pub line: String,
    /// MX priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
    /// Whether weighting is switched on for `rr.domain_name`.
    #[serde(default)]
    pub wrr_status: Toggle,
    #[serde(default)]
    pub records: Vec<WeightedRecord>,
}

/// One member of a weighted record set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeightedRecord {
    pub value: String,
    pub ttl: u32,
    /// 0 leaves the remote default untouched.
    pub weight: u32,
    pub status: Toggle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

impl WeightedRecord {
    /// Remark with "unset" and "empty" folded together.
    pub fn remark_or_empty(&self) -> &str {
        self.remark.as_deref().unwrap_or_default()
    }
}

impl WeightedRecordSet {
    /// Check the configuration without contacting the remote side.
    pub fn validate(&self) -> CoreResult<()> {
        for (field, value) in [
            ("domain_name", &self.domain_name),
            ("rr", &self.rr),
            ("line", &self.line),
        ] {
            if value.trim().is_empty() {
                return Err(CoreError::Validation(format!("{field} must not be empty")));
            }
        }

        if self.records.is_empty() {
            return Err(CoreError::Validation(
                "records must contain at least one entry".to_string(),
            ));
        }
        if self.records.len() > MAX_RECORDS {
            return Err(CoreError::Validation(format!(
                "records holds {} entries, at most {MAX_RECORDS} are allowed",
                self.records.len()
            )));
        }

        let mut seen = HashSet::new();
        for (i, record) in self.records.iter().enumerate() {
            if record.value.trim().is_empty() {
                return Err(CoreError::Validation(format!(
                    "records[{i}].value must not be empty"
                )));
            }
            if record.ttl == 0 {
                return Err(CoreError::Validation(format!(
                    "records[{i}].ttl must be at least 1"
                )));
            }
            if record.weight > MAX_WEIGHT {
                return Err(CoreError::Validation(format!(
                    "records[{i}].weight must be between 0 and {MAX_WEIGHT}, got {}",
                    record.weight
                )));
            }
            // Alidns refuses two identical records under one RR
            if !seen.insert(record.value.as_str()) {
                return Err(CoreError::Validation(format!(
                    "records[{i}].value '{}' is duplicated",
                    record.value
                )));
            }
        }

        Ok(())
    }

    /// Whether attributes shared by every record differ from `other`.
    pub fn shared_attributes_differ(&self, other: &Self) -> bool {
        self.rr != other.rr
            || self.record_type != other.record_type
            || self.line != other.line
            || self.priority != other.priority
    }
}
