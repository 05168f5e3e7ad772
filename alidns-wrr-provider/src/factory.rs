//! Client factory.

use std::sync::Arc;

use crate::error::{ProviderError, Result};
use crate::providers::AliyunProvider;
use crate::traits::AlidnsApi;
use crate::types::ProviderCredentials;
use crate::utils::log_sanitizer::mask_access_key;

/// Transport options applied when building a client.
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// API endpoint override; the Hangzhou endpoint is used when unset.
    pub endpoint: Option<String>,
    /// Retry budget for transient errors; the client default applies when unset.
    pub max_retries: Option<u32>,
}

/// Creates an [`AlidnsApi`] client from the given credentials.
///
/// Credentials are checked locally first; an empty key half yields
/// [`ProviderError::InvalidCredentials`] without touching the network.
///
/// # Examples
///
/// ```rust,no_run
/// use alidns_wrr_provider::{ClientOptions, ProviderCredentials, create_provider};
///
/// let api = create_provider(
///     ProviderCredentials {
///         access_key_id: "your-access-key-id".to_string(),
///         access_key_secret: "your-access-key-secret".to_string(),
///     },
///     &ClientOptions::default(),
/// )
/// .unwrap();
/// ```
pub fn create_provider(
    credentials: ProviderCredentials,
    options: &ClientOptions,
) -> Result<Arc<dyn AlidnsApi>> {
    credentials
        .validate()
        .map_err(|e| ProviderError::InvalidCredentials {
            provider: "aliyun".to_string(),
            raw_message: Some(e.to_string()),
        })?;

    log::debug!(
        "Building Alidns client for AccessKey {}",
        mask_access_key(&credentials.access_key_id)
    );
    let mut builder =
        AliyunProvider::builder(credentials.access_key_id, credentials.access_key_secret);
    if let Some(endpoint) = &options.endpoint {
        builder = builder.endpoint(endpoint.clone());
    }
    if let Some(retries) = options.max_retries {
        builder = builder.max_retries(retries);
    }

    Ok(Arc::new(builder.build()?))
}
