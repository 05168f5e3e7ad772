//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use alidns_wrr_provider::ProviderError;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// The configuration was rejected before any remote call
    #[error("Validation error: {0}")]
    Validation(String),

    /// Import identifier is not `<domain_name>/<record_id>`
    #[error("Invalid import ID '{0}': expected <domain_name>/<record_id>")]
    InvalidImportId(String),

    /// Resource identifier is not a comma-separated list of record IDs
    #[error("Invalid resource ID '{0}': expected comma-separated record IDs")]
    InvalidResourceId(String),

    /// Tracked record IDs and configured records diverged
    #[error("Record count mismatch: {ids} record IDs tracked for {records} records")]
    RecordCountMismatch { ids: usize, records: usize },

    /// An imported record lives under another domain
    #[error("Record {record_id} belongs to domain {actual}, not {expected}")]
    DomainMismatch {
        record_id: String,
        expected: String,
        actual: String,
    },

    /// A remote call failed
    #[error("{operation} {target} failed: {source}")]
    Remote {
        operation: String,
        target: String,
        source: ProviderError,
    },
}

impl CoreError {
    /// Whether it is expected behavior (user input, resource does not exist, etc.) is used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added. **
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::Validation(_)
            | Self::InvalidImportId(_)
            | Self::InvalidResourceId(_)
            | Self::DomainMismatch { .. } => true,
            Self::Remote { source, .. } => source.is_expected(),
            Self::RecordCountMismatch { .. } => false,
        }
    }

    /// Whether the remote side reported the record as missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Remote { source, .. } if source.is_not_found())
    }

    /// Wrap a [`ProviderError`] with the operation and object it concerned.
    pub(crate) fn remote(
        operation: &'static str,
        target: impl Into<String>,
    ) -> impl FnOnce(ProviderError) -> Self {
        let target = target.into();
        move |source| Self::Remote {
            operation: operation.to_string(),
            target,
            source,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
