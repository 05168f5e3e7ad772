//! Alidns RPC request execution

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, Result};
use crate::http_client::HttpUtils;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};
use crate::utils::log_sanitizer::truncate_for_log;

use super::{ALIYUN_DNS_VERSION, AliyunProvider, EMPTY_BODY_SHA256, serialize_to_query_string};

impl AliyunProvider {
    /// Execute an Alidns API action (RPC style: parameters travel in the query string).
    ///
    /// Transient failures, including API-level throttling, are retried with a
    /// freshly signed request.
    pub(crate) async fn request<T: for<'de> Deserialize<'de>, B: Serialize>(
        &self,
        action: &str,
        params: &B,
        ctx: ErrorContext,
    ) -> Result<T> {
        let query_string = serialize_to_query_string(params)?;
        let label = format!("{} (Action: {action})", self.endpoint);

        HttpUtils::with_retry(self.provider_name(), &label, self.max_retries, || {
            self.send_once(action, &query_string, &label, ctx.clone())
        })
        .await
    }

    async fn send_once<T: for<'de> Deserialize<'de>>(
        &self,
        action: &str,
        query_string: &str,
        label: &str,
        ctx: ErrorContext,
    ) -> Result<T> {
        let timestamp = Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
        let nonce = uuid::Uuid::new_v4().to_string();

        // 1. Sign over the sorted query string
        let authorization = self.sign(action, query_string, &timestamp, &nonce);

        // 2. Build URL
        let url = if query_string.is_empty() {
            format!("{}/", self.endpoint)
        } else {
            format!("{}/?{query_string}", self.endpoint)
        };

        // 3. Send (empty body)
        let request = self
            .client
            .post(&url)
            .header("Host", &self.host)
            .header("x-acs-action", action)
            .header("x-acs-version", ALIYUN_DNS_VERSION)
            .header("x-acs-date", &timestamp)
            .header("x-acs-signature-nonce", &nonce)
            .header("x-acs-content-sha256", EMPTY_BODY_SHA256)
            .header("Authorization", authorization);

        let (status, response_text) =
            HttpUtils::execute_request(request, self.provider_name(), "POST", label).await?;

        // 4. Error bodies carry Code/Message, on 4xx/5xx as well as (rarely) on 200
        if let Some(err) = self.api_error(&response_text, ctx) {
            return Err(err);
        }
        if status >= 500 {
            return Err(ProviderError::NetworkError {
                provider: self.provider_name().to_string(),
                detail: format!("HTTP {status}: {}", truncate_for_log(&response_text)),
            });
        }
        if status >= 400 {
            return Err(self.unknown_error(RawApiError {
                code: None,
                message: format!("HTTP {status}: {}", truncate_for_log(&response_text)),
            }));
        }

        HttpUtils::parse_json(&response_text, self.provider_name())
    }

    /// Extract and map an API error from a response body, if it is one.
    fn api_error(&self, response_text: &str, ctx: ErrorContext) -> Option<ProviderError> {
        let value = serde_json::from_str::<serde_json::Value>(response_text).ok()?;
        let code = value.get("Code").and_then(|v| v.as_str())?;
        let message = value
            .get("Message")
            .and_then(|v| v.as_str())
            .unwrap_or_default();

        let err = self.map_error(RawApiError::with_code(code, message), ctx);
        if err.is_expected() {
            log::warn!("API error: {code} - {message}");
        } else {
            log::error!("API error: {code} - {message}");
        }
        Some(err)
    }
}
