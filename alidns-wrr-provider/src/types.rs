use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============ Pagination ============

/// Pagination parameters for list operations.
///
/// Pages are 1-indexed.
///
/// # Default
///
/// The default is `page = 1, page_size = 20`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    /// Page number (1-indexed).
    pub page: u32,
    /// Number of items per page.
    pub page_size: u32,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
        }
    }
}

impl PaginationParams {
    /// Clamp pagination values to valid ranges.
    ///
    /// - `page` is clamped to `>= 1`
    /// - `page_size` is clamped to `1..=max_page_size`
    #[must_use]
    pub fn validated(&self, max_page_size: u32) -> Self {
        Self {
            page: self.page.max(1),
            page_size: self.page_size.clamp(1, max_page_size),
        }
    }

    /// Parameters for the page following this one.
    #[must_use]
    pub fn next(&self) -> Self {
        Self {
            page: self.page + 1,
            page_size: self.page_size,
        }
    }
}

/// A paginated response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    /// Items in the current page.
    pub items: Vec<T>,
    /// Current page number.
    pub page: u32,
    /// Page size used for this request.
    pub page_size: u32,
    /// Total number of items across all pages.
    pub total_count: u32,
    /// Whether there are more pages after this one.
    pub has_more: bool,
}

impl<T> PaginatedResponse<T> {
    /// Create a new paginated response, automatically computing [`has_more`](Self::has_more).
    pub fn new(items: Vec<T>, page: u32, page_size: u32, total_count: u32) -> Self {
        let has_more = page.saturating_mul(page_size) < total_count;
        Self {
            items,
            page,
            page_size,
            total_count,
            has_more,
        }
    }
}

// ============ Record Types ============

/// DNS record types accepted for weighted record sets.
///
/// Serialized as uppercase strings (`"A"`, `"AAAA"`, `"CNAME"`, etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// IPv4 address record.
    A,
    /// Name server record.
    Ns,
    /// Mail exchange record.
    Mx,
    /// Text record.
    Txt,
    /// Canonical name (alias) record.
    Cname,
    /// Service locator record.
    Srv,
    /// IPv6 address record.
    Aaaa,
    /// Certificate Authority Authorization record.
    Caa,
}

impl RecordType {
    /// Wire name used by the Alidns API.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Ns => "NS",
            Self::Mx => "MX",
            Self::Txt => "TXT",
            Self::Cname => "CNAME",
            Self::Srv => "SRV",
            Self::Aaaa => "AAAA",
            Self::Caa => "CAA",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a supported enum value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported {kind}: {value}")]
pub struct ParseEnumError {
    /// Which enum was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl FromStr for RecordType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "A" => Ok(Self::A),
            "NS" => Ok(Self::Ns),
            "MX" => Ok(Self::Mx),
            "TXT" => Ok(Self::Txt),
            "CNAME" => Ok(Self::Cname),
            "SRV" => Ok(Self::Srv),
            "AAAA" => Ok(Self::Aaaa),
            "CAA" => Ok(Self::Caa),
            _ => Err(ParseEnumError {
                kind: "record type",
                value: s.to_string(),
            }),
        }
    }
}

/// Enabled/disabled switch, used both for record status and for WRR status.
///
/// Serialized as `"ENABLE"` / `"DISABLE"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Toggle {
    /// Switched on.
    #[default]
    Enable,
    /// Switched off.
    Disable,
}

impl Toggle {
    /// Canonical uppercase form (`ENABLE` / `DISABLE`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Enable => "ENABLE",
            Self::Disable => "DISABLE",
        }
    }

    /// Form expected by `SetDomainRecordStatus` (`Enable` / `Disable`).
    pub fn as_api_param(self) -> &'static str {
        match self {
            Self::Enable => "Enable",
            Self::Disable => "Disable",
        }
    }

    pub fn is_enabled(self) -> bool {
        self == Self::Enable
    }

    pub fn from_enabled(enabled: bool) -> Self {
        if enabled { Self::Enable } else { Self::Disable }
    }
}

impl fmt::Display for Toggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Toggle {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ENABLE" => Ok(Self::Enable),
            "DISABLE" => Ok(Self::Disable),
            _ => Err(ParseEnumError {
                kind: "status",
                value: s.to_string(),
            }),
        }
    }
}

// ============ Remote Objects ============

/// A record as stored by Alidns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainRecord {
    /// Remote record ID.
    pub record_id: String,
    /// Zone the record belongs to.
    pub domain_name: String,
    /// Host record (`@` for the apex).
    pub rr: String,
    pub record_type: RecordType,
    pub value: String,
    pub ttl: u32,
    /// Resolution line (`default` unless a routing line is used).
    pub line: String,
    /// WRR weight, absent when the action does not report it.
    pub weight: Option<u32>,
    pub status: Toggle,
    pub remark: Option<String>,
    /// MX priority.
    pub priority: Option<u16>,
    pub locked: bool,
}

/// Domain (zone) summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainInfo {
    pub domain_id: Option<String>,
    pub domain_name: String,
    pub record_count: Option<u32>,
}

/// WRR state of one sub-domain, as listed by `DescribeDNSSLBSubDomains`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrrSubDomain {
    /// Fully qualified sub-domain, e.g. `www.example.com`.
    pub sub_domain: String,
    /// Number of records under the sub-domain.
    pub record_count: u32,
    /// Whether weighting is switched on.
    pub open: bool,
    pub record_type: Option<String>,
    pub line: Option<String>,
}

// ============ Requests ============

/// Record search filters for `DescribeDomainRecords`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordQuery {
    /// Host record keyword (the API matches it fuzzily).
    pub rr_keyword: Option<String>,
    /// Exact record type filter.
    pub record_type: Option<RecordType>,
    /// Value keyword (fuzzy).
    pub value_keyword: Option<String>,
}

/// Parameters for `AddDomainRecord`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddRecordRequest {
    pub domain_name: String,
    pub rr: String,
    pub record_type: RecordType,
    pub value: String,
    pub ttl: u32,
    pub line: String,
    pub priority: Option<u16>,
}

/// Parameters for `UpdateDomainRecord`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecordRequest {
    pub record_id: String,
    pub rr: String,
    pub record_type: RecordType,
    pub value: String,
    pub ttl: u32,
    pub line: String,
    pub priority: Option<u16>,
}

/// Parameters for `SetDNSSLBStatus`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrrStatusRequest {
    pub domain_name: String,
    /// Host record; combined with the domain into the sub-domain.
    pub rr: String,
    pub record_type: Option<RecordType>,
    pub line: Option<String>,
    pub open: bool,
}

// ============ Credentials ============

/// Aliyun access key pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderCredentials {
    pub access_key_id: String,
    pub access_key_secret: String,
}

/// Credential validation failure, reported per field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CredentialValidationError {
    #[error("{label} is required")]
    MissingField { field: String, label: String },
    #[error("{label} must not be empty")]
    EmptyField { field: String, label: String },
}

impl ProviderCredentials {
    /// Check that both halves of the key pair are present.
    pub fn validate(&self) -> Result<(), CredentialValidationError> {
        for (field, label, value) in [
            ("accessKeyId", "Access Key ID", &self.access_key_id),
            (
                "accessKeySecret",
                "Access Key Secret",
                &self.access_key_secret,
            ),
        ] {
            if value.trim().is_empty() {
                return Err(CredentialValidationError::EmptyField {
                    field: field.to_string(),
                    label: label.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Build credentials from a flat key-value map (`accessKeyId`, `accessKeySecret`).
    pub fn from_map(
        map: &std::collections::HashMap<String, String>,
    ) -> Result<Self, CredentialValidationError> {
        let get = |key: &str, label: &str| {
            map.get(key)
                .cloned()
                .ok_or_else(|| CredentialValidationError::MissingField {
                    field: key.to_string(),
                    label: label.to_string(),
                })
        };
        let credentials = Self {
            access_key_id: get("accessKeyId", "Access Key ID")?,
            access_key_secret: get("accessKeySecret", "Access Key Secret")?,
        };
        credentials.validate()?;
        Ok(credentials)
    }
}
