//! 阿里云 DNS (Alidns) client

mod error;
mod http;
mod provider;
mod sign;
mod types;

use reqwest::Client;

use crate::error::Result;
use crate::providers::common::create_http_client;

pub(crate) use types::serialize_to_query_string;

pub(crate) const ALIYUN_PROVIDER_NAME: &str = "aliyun";
pub(crate) const ALIYUN_DNS_ENDPOINT: &str = "https://alidns.cn-hangzhou.aliyuncs.com";
pub(crate) const ALIYUN_DNS_VERSION: &str = "2015-01-09";
/// 空 body 的 SHA256 hash (固定值)
pub(crate) const EMPTY_BODY_SHA256: &str =
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
/// 阿里云 API 单页最大记录数
pub(crate) const MAX_PAGE_SIZE: u32 = 500;

/// Alidns client.
///
/// Authenticates via ACS3-HMAC-SHA256 signing with an Access Key ID/Secret.
///
/// # Construction
///
/// ```rust,no_run
/// use alidns_wrr_provider::AliyunProvider;
///
/// let provider = AliyunProvider::builder(
///     "your-access-key-id".to_string(),
///     "your-access-key-secret".to_string(),
/// )
/// .max_retries(3)
/// .build()?;
/// # Ok::<(), alidns_wrr_provider::ProviderError>(())
/// ```
pub struct AliyunProvider {
    pub(crate) client: Client,
    pub(crate) access_key_id: String,
    pub(crate) access_key_secret: String,
    pub(crate) max_retries: u32,
    /// Scheme and authority, without trailing slash.
    pub(crate) endpoint: String,
    /// Authority part of `endpoint`, signed as the `host` header.
    pub(crate) host: String,
}

/// Builder for [`AliyunProvider`] with configurable retry behavior and endpoint.
pub struct AliyunProviderBuilder {
    access_key_id: String,
    access_key_secret: String,
    max_retries: u32,
    endpoint: String,
}

impl AliyunProviderBuilder {
    fn new(access_key_id: String, access_key_secret: String) -> Self {
        Self {
            access_key_id,
            access_key_secret,
            max_retries: 2,
            endpoint: ALIYUN_DNS_ENDPOINT.to_string(),
        }
    }

    /// Set the maximum number of automatic retries for transient errors (default: 2).
    #[must_use]
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Override the API endpoint, e.g. `https://alidns.ap-southeast-1.aliyuncs.com`.
    ///
    /// A bare host is treated as `https://<host>`.
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Build the [`AliyunProvider`] instance.
    pub fn build(self) -> Result<AliyunProvider> {
        let (endpoint, host) = split_endpoint(&self.endpoint);
        Ok(AliyunProvider {
            client: create_http_client(ALIYUN_PROVIDER_NAME)?,
            access_key_id: self.access_key_id,
            access_key_secret: self.access_key_secret,
            max_retries: self.max_retries,
            endpoint,
            host,
        })
    }
}

impl AliyunProvider {
    /// Creates a client against the default endpoint with 2 retries.
    pub fn new(access_key_id: String, access_key_secret: String) -> Result<Self> {
        Self::builder(access_key_id, access_key_secret).build()
    }

    /// Returns a builder for customizing the client configuration.
    pub fn builder(access_key_id: String, access_key_secret: String) -> AliyunProviderBuilder {
        AliyunProviderBuilder::new(access_key_id, access_key_secret)
    }
}

/// Normalize an endpoint into (`scheme://authority`, `authority`).
fn split_endpoint(raw: &str) -> (String, String) {
    let trimmed = raw.trim().trim_end_matches('/');
    let (scheme, rest) = match trimmed.split_once("://") {
        Some((scheme, rest)) => (scheme, rest),
        None => ("https", trimmed),
    };
    let host = rest.split('/').next().unwrap_or(rest).to_string();
    (format!("{scheme}://{host}"), host)
}
