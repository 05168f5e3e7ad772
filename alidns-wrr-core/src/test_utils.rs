//! 测试辅助模块
//!
//! 提供内存版 Alidns mock 和便捷的测试工厂方法。

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use alidns_wrr_provider::{
    AddRecordRequest, AlidnsApi, DomainInfo, DomainRecord, PaginatedResponse, PaginationParams,
    ProviderError, RecordQuery, RecordType, Result, Toggle, UpdateRecordRequest, WrrStatusRequest,
    WrrSubDomain, relative_to_full_name,
};
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::services::WeightedRecordService;
use crate::types::{WeightedRecord, WeightedRecordSet};

pub const TEST_DOMAIN: &str = "example.com";

/// Mutating call observed by [`MockAlidnsApi`], in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    AddRecord { rr: String, value: String },
    UpdateRecord { record_id: String },
    DeleteRecord { record_id: String },
    SetWeight { record_id: String, weight: u32 },
    UpdateRemark { record_id: String, remark: String },
    SetStatus { record_id: String, status: Toggle },
    SetWrrStatus { sub_domain: String, open: bool },
}

// ===== MockAlidnsApi =====

/// In-memory Alidns for a single zone.
///
/// Like the real service, `describe_record` omits weights and weights can only
/// be set while WRR is open for the sub-domain.
pub struct MockAlidnsApi {
    records: RwLock<Vec<DomainRecord>>,
    /// Fully qualified sub-domain -> WRR open
    wrr: RwLock<HashMap<String, bool>>,
    calls: RwLock<Vec<MockCall>>,
    /// 如果存在，对应方法返回此错误
    failures: RwLock<HashMap<&'static str, ProviderError>>,
    next_id: AtomicU64,
}

impl MockAlidnsApi {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            wrr: RwLock::new(HashMap::new()),
            calls: RwLock::new(Vec::new()),
            failures: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1000),
        }
    }

    /// Make `method` fail with `err` from now on.
    pub async fn fail_on(&self, method: &'static str, err: ProviderError) {
        self.failures.write().await.insert(method, err);
    }

    /// Insert a record without journaling a call; returns its ID.
    pub async fn seed_record(&self, rr: &str, record_type: RecordType, value: &str, ttl: u32) -> String {
        let record_id = self.allocate_id();
        self.records.write().await.push(DomainRecord {
            record_id: record_id.clone(),
            domain_name: TEST_DOMAIN.to_string(),
            rr: rr.to_string(),
            record_type,
            value: value.to_string(),
            ttl,
            line: "default".to_string(),
            weight: Some(1),
            status: Toggle::Enable,
            remark: None,
            priority: None,
            locked: false,
        });
        record_id
    }

    /// Remove a record behind the service's back.
    pub async fn remove_silently(&self, record_id: &str) {
        self.records.write().await.retain(|r| r.record_id != record_id);
    }

    pub async fn record(&self, record_id: &str) -> Option<DomainRecord> {
        self.records
            .read()
            .await
            .iter()
            .find(|r| r.record_id == record_id)
            .cloned()
    }

    pub async fn record_count(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn calls(&self) -> Vec<MockCall> {
        self.calls.read().await.clone()
    }

    pub async fn clear_calls(&self) {
        self.calls.write().await.clear();
    }

    fn allocate_id(&self) -> String {
        self.next_id.fetch_add(1, Ordering::SeqCst).to_string()
    }

    async fn check(&self, method: &'static str) -> Result<()> {
        match self.failures.read().await.get(method) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    async fn journal(&self, call: MockCall) {
        self.calls.write().await.push(call);
    }

    fn not_found(record_id: &str) -> ProviderError {
        ProviderError::RecordNotFound {
            provider: "mock".to_string(),
            record_id: record_id.to_string(),
            raw_message: Some("The specified domain record does not exist.".to_string()),
        }
    }

    /// Apply `f` to a stored record, or report it missing.
    async fn with_record(&self, record_id: &str, f: impl FnOnce(&mut DomainRecord)) -> Result<()> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| r.record_id == record_id)
            .ok_or_else(|| Self::not_found(record_id))?;
        f(record);
        Ok(())
    }
}

#[async_trait]
impl AlidnsApi for MockAlidnsApi {
    fn id(&self) -> &'static str {
        "mock"
    }

    async fn describe_domain_info(&self, domain_name: &str) -> Result<DomainInfo> {
        self.check("describe_domain_info").await?;
        if domain_name != TEST_DOMAIN {
            return Err(ProviderError::DomainNotFound {
                provider: "mock".to_string(),
                domain: domain_name.to_string(),
                raw_message: None,
            });
        }
        Ok(DomainInfo {
            domain_id: Some("dom-1".to_string()),
            domain_name: TEST_DOMAIN.to_string(),
            record_count: None,
        })
    }

    async fn describe_domain_records(
        &self,
        domain_name: &str,
        query: &RecordQuery,
        page: &PaginationParams,
    ) -> Result<PaginatedResponse<DomainRecord>> {
        self.check("describe_domain_records").await?;
        let matching: Vec<DomainRecord> = self
            .records
            .read()
            .await
            .iter()
            .filter(|r| r.domain_name == domain_name)
            .filter(|r| query.rr_keyword.as_ref().is_none_or(|kw| r.rr.contains(kw.as_str())))
            .filter(|r| query.record_type.is_none_or(|t| r.record_type == t))
            .filter(|r| {
                query
                    .value_keyword
                    .as_ref()
                    .is_none_or(|kw| r.value.contains(kw.as_str()))
            })
            .cloned()
            .collect();

        let total = u32::try_from(matching.len()).unwrap_or(u32::MAX);
        let start = ((page.page.max(1) - 1) * page.page_size) as usize;
        let items = matching
            .into_iter()
            .skip(start)
            .take(page.page_size as usize)
            .collect();
        Ok(PaginatedResponse::new(items, page.page, page.page_size, total))
    }

    async fn describe_record(&self, record_id: &str) -> Result<DomainRecord> {
        self.check("describe_record").await?;
        self.record(record_id)
            .await
            .map(|r| DomainRecord { weight: None, ..r })
            .ok_or_else(|| Self::not_found(record_id))
    }

    async fn add_record(&self, req: &AddRecordRequest) -> Result<String> {
        self.check("add_record").await?;
        let duplicate = self.records.read().await.iter().any(|r| {
            r.rr == req.rr && r.record_type == req.record_type && r.value == req.value
        });
        if duplicate {
            return Err(ProviderError::RecordExists {
                provider: "mock".to_string(),
                record_name: req.rr.clone(),
                raw_message: None,
            });
        }

        let record_id = self.allocate_id();
        self.records.write().await.push(DomainRecord {
            record_id: record_id.clone(),
            domain_name: req.domain_name.clone(),
            rr: req.rr.clone(),
            record_type: req.record_type,
            value: req.value.clone(),
            ttl: req.ttl,
            line: req.line.clone(),
            weight: Some(1),
            status: Toggle::Enable,
            remark: None,
            priority: req.priority,
            locked: false,
        });
        self.journal(MockCall::AddRecord {
            rr: req.rr.clone(),
            value: req.value.clone(),
        })
        .await;
        Ok(record_id)
    }

    async fn update_record(&self, req: &UpdateRecordRequest) -> Result<()> {
        self.check("update_record").await?;
        self.with_record(&req.record_id, |r| {
            r.rr.clone_from(&req.rr);
            r.record_type = req.record_type;
            r.value.clone_from(&req.value);
            r.ttl = req.ttl;
            r.line.clone_from(&req.line);
            r.priority = req.priority;
        })
        .await?;
        self.journal(MockCall::UpdateRecord {
            record_id: req.record_id.clone(),
        })
        .await;
        Ok(())
    }

    async fn delete_record(&self, record_id: &str) -> Result<()> {
        self.check("delete_record").await?;
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.record_id != record_id);
        if records.len() == before {
            return Err(Self::not_found(record_id));
        }
        drop(records);
        self.journal(MockCall::DeleteRecord {
            record_id: record_id.to_string(),
        })
        .await;
        Ok(())
    }

    async fn set_record_weight(&self, record_id: &str, weight: u32) -> Result<()> {
        self.check("set_record_weight").await?;
        let record = self
            .record(record_id)
            .await
            .ok_or_else(|| Self::not_found(record_id))?;
        let sub_domain = relative_to_full_name(&record.rr, &record.domain_name);
        if !self.wrr.read().await.get(&sub_domain).copied().unwrap_or(false) {
            return Err(ProviderError::InvalidParameter {
                provider: "mock".to_string(),
                param: "Weight".to_string(),
                detail: format!("WRR is not enabled for {sub_domain}"),
            });
        }
        self.with_record(record_id, |r| r.weight = Some(weight))
            .await?;
        self.journal(MockCall::SetWeight {
            record_id: record_id.to_string(),
            weight,
        })
        .await;
        Ok(())
    }

    async fn update_record_remark(&self, record_id: &str, remark: &str) -> Result<()> {
        self.check("update_record_remark").await?;
        self.with_record(record_id, |r| {
            r.remark = (!remark.is_empty()).then(|| remark.to_string());
        })
        .await?;
        self.journal(MockCall::UpdateRemark {
            record_id: record_id.to_string(),
            remark: remark.to_string(),
        })
        .await;
        Ok(())
    }

    async fn set_record_status(&self, record_id: &str, status: Toggle) -> Result<()> {
        self.check("set_record_status").await?;
        self.with_record(record_id, |r| r.status = status).await?;
        self.journal(MockCall::SetStatus {
            record_id: record_id.to_string(),
            status,
        })
        .await;
        Ok(())
    }

    async fn set_wrr_status(&self, req: &WrrStatusRequest) -> Result<()> {
        self.check("set_wrr_status").await?;
        let sub_domain = relative_to_full_name(&req.rr, &req.domain_name);
        self.wrr.write().await.insert(sub_domain.clone(), req.open);
        self.journal(MockCall::SetWrrStatus {
            sub_domain,
            open: req.open,
        })
        .await;
        Ok(())
    }

    async fn describe_wrr_sub_domains(
        &self,
        domain_name: &str,
        rr: Option<&str>,
        page: &PaginationParams,
    ) -> Result<PaginatedResponse<WrrSubDomain>> {
        self.check("describe_wrr_sub_domains").await?;
        let records = self.records.read().await;
        let items: Vec<WrrSubDomain> = self
            .wrr
            .read()
            .await
            .iter()
            .filter(|(sub, _)| {
                rr.is_none_or(|rr| **sub == relative_to_full_name(rr, domain_name))
            })
            .map(|(sub, open)| WrrSubDomain {
                sub_domain: sub.clone(),
                record_count: u32::try_from(
                    records
                        .iter()
                        .filter(|r| &relative_to_full_name(&r.rr, &r.domain_name) == sub)
                        .count(),
                )
                .unwrap_or(u32::MAX),
                open: *open,
                record_type: None,
                line: None,
            })
            .collect();
        let total = u32::try_from(items.len()).unwrap_or(u32::MAX);
        Ok(PaginatedResponse::new(items, page.page, page.page_size, total))
    }
}

// ===== 测试工厂方法 =====

/// Service over a fresh [`MockAlidnsApi`].
pub fn create_test_service() -> (WeightedRecordService, Arc<MockAlidnsApi>) {
    let api = Arc::new(MockAlidnsApi::new());
    (WeightedRecordService::new(api.clone()), api)
}

/// `n` A records under `www.example.com`, values `192.0.2.1..`, weight 10, WRR enabled.
pub fn record_set(n: usize) -> WeightedRecordSet {
    WeightedRecordSet {
        domain_name: TEST_DOMAIN.to_string(),
        rr: "www".to_string(),
        record_type: RecordType::A,
        line: "default".to_string(),
        priority: None,
        wrr_status: Toggle::Enable,
        records: (1..=n)
            .map(|i| WeightedRecord {
                value: format!("192.0.2.{i}"),
                ttl: 600,
                weight: 10,
                status: Toggle::Enable,
                remark: None,
            })
            .collect(),
    }
}
