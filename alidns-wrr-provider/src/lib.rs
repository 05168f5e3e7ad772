//! # alidns-wrr-provider
//!
//! A typed client for the Aliyun DNS (Alidns) API, covering the record and
//! weighted round-robin (WRR, "DNSSLB") actions needed to manage a weighted
//! record set.
//!
//! ## Actions
//!
//! | Method | Alidns action |
//! |--------|---------------|
//! | [`AlidnsApi::describe_domain_info`] | `DescribeDomainInfo` |
//! | [`AlidnsApi::describe_domain_records`] | `DescribeDomainRecords` |
//! | [`AlidnsApi::describe_record`] | `DescribeDomainRecordInfo` |
//! | [`AlidnsApi::add_record`] | `AddDomainRecord` |
//! | [`AlidnsApi::update_record`] | `UpdateDomainRecord` |
//! | [`AlidnsApi::delete_record`] | `DeleteDomainRecord` |
//! | [`AlidnsApi::set_record_weight`] | `UpdateDNSSLBWeight` |
//! | [`AlidnsApi::update_record_remark`] | `UpdateDomainRecordRemark` |
//! | [`AlidnsApi::set_record_status`] | `SetDomainRecordStatus` |
//! | [`AlidnsApi::set_wrr_status`] | `SetDNSSLBStatus` |
//! | [`AlidnsApi::describe_wrr_sub_domains`] | `DescribeDNSSLBSubDomains` |
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)* — Use the platform's native TLS implementation.
//! - **`rustls`** — Use rustls. Recommended for cross-compilation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use alidns_wrr_provider::{ClientOptions, ProviderCredentials, RecordQuery, create_provider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = create_provider(
//!         ProviderCredentials {
//!             access_key_id: "your-access-key-id".to_string(),
//!             access_key_secret: "your-access-key-secret".to_string(),
//!         },
//!         &ClientOptions::default(),
//!     )?;
//!
//!     let records = api
//!         .list_all_records("example.com", &RecordQuery::default())
//!         .await?;
//!     for record in &records {
//!         println!("{} {} -> {} (weight {:?})", record.rr, record.record_type, record.value, record.weight);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All actions return [`Result<T, ProviderError>`](ProviderError). Alidns error
//! codes are mapped onto structured variants:
//!
//! - [`ProviderError::InvalidCredentials`] — authentication failed
//! - [`ProviderError::RecordNotFound`] — record missing or not owned by the caller
//! - [`ProviderError::RateLimited`] — throttled (retryable)
//! - [`ProviderError::NetworkError`] — network connectivity issue (retryable)
//!
//! Transient errors (`NetworkError`, `Timeout`, `RateLimited`) are automatically
//! retried with exponential backoff.

mod error;
mod factory;
mod http_client;
mod providers;
mod traits;
mod types;
mod utils;

// Re-export error types
pub use error::{ProviderError, Result};

// Re-export factory
pub use factory::{ClientOptions, create_provider};

// Re-export the client trait only (internal traits are not exported)
pub use traits::AlidnsApi;

// Re-export types
pub use types::{
    AddRecordRequest, CredentialValidationError, DomainInfo, DomainRecord, PaginatedResponse,
    PaginationParams, ParseEnumError, ProviderCredentials, RecordQuery, RecordType, Toggle,
    UpdateRecordRequest, WrrStatusRequest, WrrSubDomain,
};

// Re-export name helpers
pub use providers::common::relative_to_full_name;

pub use providers::{AliyunProvider, AliyunProviderBuilder};
