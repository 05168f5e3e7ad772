use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned by every Alidns API action.
///
/// Each variant names the `provider` that raised it. Variants serialize with a
/// `code` tag so callers can report them as structured data.
///
/// [`NetworkError`](Self::NetworkError), [`Timeout`](Self::Timeout) and
/// [`RateLimited`](Self::RateLimited) are transient; the HTTP layer retries them
/// with exponential backoff before they surface.
#[derive(Debug, Clone, Serialize, Deserialize, Error)]
#[serde(tag = "code")]
pub enum ProviderError {
    /// Connection, DNS resolution or a 502/503/504 from the gateway.
    #[error("[{provider}] Network error: {detail}")]
    NetworkError { provider: String, detail: String },

    /// AccessKey rejected, or the signature did not verify.
    #[error("[{provider}] Invalid credentials{}", suffix(.raw_message))]
    InvalidCredentials {
        provider: String,
        raw_message: Option<String>,
    },

    /// An identical RR/type/value record is already present.
    #[error("[{provider}] Record '{record_name}' already exists")]
    RecordExists {
        provider: String,
        record_name: String,
        raw_message: Option<String>,
    },

    /// The record is gone or belongs to another account.
    #[error("[{provider}] Record '{record_id}' not found")]
    RecordNotFound {
        provider: String,
        record_id: String,
        raw_message: Option<String>,
    },

    #[error("[{provider}] Invalid parameter '{param}': {detail}")]
    InvalidParameter {
        provider: String,
        param: String,
        detail: String,
    },

    /// A listed record has a type outside [`RecordType`](crate::RecordType).
    #[error("[{provider}] Unsupported record type: {record_type}")]
    UnsupportedRecordType {
        provider: String,
        record_type: String,
    },

    /// Account record or WRR quota reached. Not transient.
    #[error("[{provider}] Quota exceeded")]
    QuotaExceeded {
        provider: String,
        raw_message: Option<String>,
    },

    /// HTTP 429 or a `Throttling*` code. `retry_after` is in seconds.
    #[error("[{provider}] Rate limited{}", retry_hint(*.retry_after))]
    RateLimited {
        provider: String,
        retry_after: Option<u64>,
        raw_message: Option<String>,
    },

    #[error("[{provider}] Request timeout: {detail}")]
    Timeout { provider: String, detail: String },

    #[error("[{provider}] Domain '{domain}' not found{}", suffix(.raw_message))]
    DomainNotFound {
        provider: String,
        domain: String,
        raw_message: Option<String>,
    },

    /// Domain or record locked against changes.
    #[error("[{provider}] Domain '{domain}' is locked{}", suffix(.raw_message))]
    DomainLocked {
        provider: String,
        domain: String,
        raw_message: Option<String>,
    },

    /// The RAM policy does not allow the action.
    #[error("[{provider}] Permission denied{}", suffix(.raw_message))]
    PermissionDenied {
        provider: String,
        raw_message: Option<String>,
    },

    /// Response body did not match the expected shape.
    #[error("[{provider}] Parse error: {detail}")]
    ParseError { provider: String, detail: String },

    /// Request parameters could not be encoded.
    #[error("[{provider}] Serialization error: {detail}")]
    SerializationError { provider: String, detail: String },

    /// Any Alidns code without a dedicated variant.
    #[error("[{provider}] {}{raw_message}", code_prefix(.raw_code))]
    Unknown {
        provider: String,
        raw_code: Option<String>,
        raw_message: String,
    },
}

fn suffix(raw_message: &Option<String>) -> String {
    raw_message
        .as_deref()
        .map(|msg| format!(": {msg}"))
        .unwrap_or_default()
}

fn retry_hint(retry_after: Option<u64>) -> String {
    retry_after
        .map(|secs| format!(" (retry after {secs}s)"))
        .unwrap_or_default()
}

fn code_prefix(raw_code: &Option<String>) -> String {
    raw_code
        .as_deref()
        .map(|code| format!("{code}: "))
        .unwrap_or_default()
}

impl ProviderError {
    /// 是否为预期行为（用户输入、资源不存在等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    /// **新增变体时请同步更新此方法。**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials { .. }
                | Self::RecordExists { .. }
                | Self::RecordNotFound { .. }
                | Self::InvalidParameter { .. }
                | Self::UnsupportedRecordType { .. }
                | Self::QuotaExceeded { .. }
                | Self::DomainNotFound { .. }
                | Self::DomainLocked { .. }
                | Self::PermissionDenied { .. }
        )
    }

    /// Whether the remote object is already gone.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RecordNotFound { .. })
    }

    /// Whether a retry may succeed (network errors, timeouts and throttling).
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NetworkError { .. } | Self::Timeout { .. } | Self::RateLimited { .. }
        )
    }
}

/// `Result` alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ProviderError>;
