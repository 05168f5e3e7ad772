use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::types::{
    AddRecordRequest, DomainInfo, DomainRecord, PaginatedResponse, PaginationParams, RecordQuery,
    Toggle, UpdateRecordRequest, WrrStatusRequest, WrrSubDomain,
};

/// Page size used when walking every page of a listing.
pub(crate) const LIST_ALL_PAGE_SIZE: u32 = 100;
/// Hard stop for page walks, in case the remote total never converges.
const MAX_LIST_PAGES: u32 = 500;

/// 原始 API 错误（内部使用）
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// 错误码
    pub code: Option<String>,
    /// 原始错误消息
    pub message: String,
}

impl RawApiError {
    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// 错误上下文信息（内部使用）
/// 用于在映射错误时提供额外信息
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// 主机记录（用于 `RecordExists` 等错误）
    pub record_name: Option<String>,
    /// 记录 ID（用于 `RecordNotFound` 等错误）
    pub record_id: Option<String>,
    /// 域名（用于 `DomainNotFound` 等错误）
    pub domain: Option<String>,
}

impl ErrorContext {
    pub fn record(record_id: &str) -> Self {
        Self {
            record_id: Some(record_id.to_string()),
            ..Self::default()
        }
    }

    pub fn domain(domain: &str) -> Self {
        Self {
            domain: Some(domain.to_string()),
            ..Self::default()
        }
    }
}

/// Provider 错误映射 Trait（内部使用）
pub(crate) trait ProviderErrorMapper {
    /// 返回 Provider 标识符
    fn provider_name(&self) -> &'static str;

    /// 将原始 API 错误映射到统一错误类型
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    /// 快捷方法：解析错误
    fn parse_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::ParseError {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }

    /// 快捷方法：未知错误（fallback）
    fn unknown_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::Unknown {
            provider: self.provider_name().to_string(),
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }
}

/// The Alidns API surface used by weighted record sets.
///
/// One method per remote action. Implementations must not retry business
/// errors; transient transport errors may be retried internally.
#[async_trait]
pub trait AlidnsApi: Send + Sync {
    /// 提供商标识符
    fn id(&self) -> &'static str;

    /// `DescribeDomainInfo`
    async fn describe_domain_info(&self, domain_name: &str) -> Result<DomainInfo>;

    /// `DescribeDomainRecords`, one page.
    async fn describe_domain_records(
        &self,
        domain_name: &str,
        query: &RecordQuery,
        page: &PaginationParams,
    ) -> Result<PaginatedResponse<DomainRecord>>;

    /// `DescribeDomainRecordInfo`. A missing record yields [`ProviderError::RecordNotFound`].
    async fn describe_record(&self, record_id: &str) -> Result<DomainRecord>;

    /// `AddDomainRecord`; returns the new record ID.
    async fn add_record(&self, req: &AddRecordRequest) -> Result<String>;

    /// `UpdateDomainRecord`
    async fn update_record(&self, req: &UpdateRecordRequest) -> Result<()>;

    /// `DeleteDomainRecord`
    async fn delete_record(&self, record_id: &str) -> Result<()>;

    /// `UpdateDNSSLBWeight`
    async fn set_record_weight(&self, record_id: &str, weight: u32) -> Result<()>;

    /// `UpdateDomainRecordRemark`. An empty remark clears it.
    async fn update_record_remark(&self, record_id: &str, remark: &str) -> Result<()>;

    /// `SetDomainRecordStatus`
    async fn set_record_status(&self, record_id: &str, status: Toggle) -> Result<()>;

    /// `SetDNSSLBStatus`
    async fn set_wrr_status(&self, req: &WrrStatusRequest) -> Result<()>;

    /// `DescribeDNSSLBSubDomains`, one page.
    async fn describe_wrr_sub_domains(
        &self,
        domain_name: &str,
        rr: Option<&str>,
        page: &PaginationParams,
    ) -> Result<PaginatedResponse<WrrSubDomain>>;

    /// Walk every page of `DescribeDomainRecords`.
    async fn list_all_records(
        &self,
        domain_name: &str,
        query: &RecordQuery,
    ) -> Result<Vec<DomainRecord>> {
        let mut params = PaginationParams {
            page: 1,
            page_size: LIST_ALL_PAGE_SIZE,
        };
        let mut records = Vec::new();

        loop {
            let page = self
                .describe_domain_records(domain_name, query, &params)
                .await?;
            let fetched = page.items.len();
            records.extend(page.items);
            if !page.has_more || fetched == 0 || params.page >= MAX_LIST_PAGES {
                break;
            }
            params = params.next();
        }

        Ok(records)
    }

    /// Look up the WRR state of `sub_domain` (fully qualified).
    ///
    /// Returns `None` when the sub-domain has never been listed for weighting.
    async fn find_wrr_sub_domain(
        &self,
        domain_name: &str,
        rr: &str,
        sub_domain: &str,
    ) -> Result<Option<WrrSubDomain>> {
        let mut params = PaginationParams {
            page: 1,
            page_size: LIST_ALL_PAGE_SIZE,
        };

        loop {
            let page = self
                .describe_wrr_sub_domains(domain_name, Some(rr), &params)
                .await?;
            if let Some(found) = page
                .items
                .iter()
                .find(|s| s.sub_domain.eq_ignore_ascii_case(sub_domain))
            {
                return Ok(Some(found.clone()));
            }
            if !page.has_more || page.items.is_empty() || params.page >= MAX_LIST_PAGES {
                return Ok(None);
            }
            params = params.next();
        }
    }
}
