//! 阿里云 AlidnsApi trait 实现

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;
use crate::providers::common::relative_to_full_name;
use crate::traits::{AlidnsApi, ErrorContext};
use crate::types::{
    AddRecordRequest, DomainInfo, DomainRecord, PaginatedResponse, PaginationParams, RecordQuery,
    Toggle, UpdateRecordRequest, WrrStatusRequest, WrrSubDomain,
};

use super::types::{
    ActionResponse, AddDomainRecordResponse, AliyunRecord, DescribeDnsSlbSubDomainsResponse,
    DescribeDomainInfoResponse, DescribeDomainRecordsResponse,
};
use super::{ALIYUN_PROVIDER_NAME, AliyunProvider, MAX_PAGE_SIZE};

/// 只需要 `RecordId` 的请求
#[derive(Serialize)]
struct RecordIdRequest<'a> {
    #[serde(rename = "RecordId")]
    record_id: &'a str,
}

#[derive(Serialize)]
struct DomainNameRequest<'a> {
    #[serde(rename = "DomainName")]
    domain_name: &'a str,
}

impl AliyunProvider {
    fn record_context(record_id: &str, rr: Option<&str>) -> ErrorContext {
        ErrorContext {
            record_name: rr.map(str::to_string),
            ..ErrorContext::record(record_id)
        }
    }
}

#[async_trait]
impl AlidnsApi for AliyunProvider {
    fn id(&self) -> &'static str {
        ALIYUN_PROVIDER_NAME
    }

    async fn describe_domain_info(&self, domain_name: &str) -> Result<DomainInfo> {
        let response: DescribeDomainInfoResponse = self
            .request(
                "DescribeDomainInfo",
                &DomainNameRequest { domain_name },
                ErrorContext::domain(domain_name),
            )
            .await?;
        Ok(response.into())
    }

    async fn describe_domain_records(
        &self,
        domain_name: &str,
        query: &RecordQuery,
        page: &PaginationParams,
    ) -> Result<PaginatedResponse<DomainRecord>> {
        #[derive(Serialize)]
        struct DescribeDomainRecordsRequest<'a> {
            #[serde(rename = "DomainName")]
            domain_name: &'a str,
            #[serde(rename = "PageNumber")]
            page_number: u32,
            #[serde(rename = "PageSize")]
            page_size: u32,
            /// 主机记录关键字（模糊搜索）
            #[serde(rename = "RRKeyWord", skip_serializing_if = "Option::is_none")]
            rr_keyword: Option<&'a str>,
            #[serde(rename = "Type", skip_serializing_if = "Option::is_none")]
            record_type: Option<&'static str>,
            #[serde(rename = "ValueKeyWord", skip_serializing_if = "Option::is_none")]
            value_keyword: Option<&'a str>,
        }

        let page = page.validated(MAX_PAGE_SIZE);
        let req = DescribeDomainRecordsRequest {
            domain_name,
            page_number: page.page,
            page_size: page.page_size,
            rr_keyword: query.rr_keyword.as_deref().filter(|k| !k.is_empty()),
            record_type: query.record_type.map(|t| t.as_str()),
            value_keyword: query.value_keyword.as_deref().filter(|k| !k.is_empty()),
        };

        let response: DescribeDomainRecordsResponse = self
            .request(
                "DescribeDomainRecords",
                &req,
                ErrorContext::domain(domain_name),
            )
            .await?;

        let total_count = response.total_count.unwrap_or(0);
        let mut records = Vec::new();
        for raw in response
            .domain_records
            .and_then(|r| r.record)
            .unwrap_or_default()
        {
            // 本资源不管理的记录类型（如显性 URL 转发）直接跳过
            match raw.into_domain_record(domain_name) {
                Ok(record) => records.push(record),
                Err(e) => log::debug!("Skipping record in {domain_name}: {e}"),
            }
        }

        Ok(PaginatedResponse::new(
            records,
            page.page,
            page.page_size,
            total_count,
        ))
    }

    async fn describe_record(&self, record_id: &str) -> Result<DomainRecord> {
        let raw: AliyunRecord = self
            .request(
                "DescribeDomainRecordInfo",
                &RecordIdRequest { record_id },
                ErrorContext::record(record_id),
            )
            .await?;
        raw.into_domain_record("")
    }

    async fn add_record(&self, req: &AddRecordRequest) -> Result<String> {
        #[derive(Serialize)]
        struct AddDomainRecordRequest<'a> {
            #[serde(rename = "DomainName")]
            domain_name: &'a str,
            #[serde(rename = "RR")]
            rr: &'a str,
            #[serde(rename = "Type")]
            record_type: &'static str,
            #[serde(rename = "Value")]
            value: &'a str,
            #[serde(rename = "TTL")]
            ttl: u32,
            #[serde(rename = "Line")]
            line: &'a str,
            #[serde(rename = "Priority", skip_serializing_if = "Option::is_none")]
            priority: Option<u16>,
        }

        let api_req = AddDomainRecordRequest {
            domain_name: &req.domain_name,
            rr: &req.rr,
            record_type: req.record_type.as_str(),
            value: &req.value,
            ttl: req.ttl,
            line: &req.line,
            priority: req.priority,
        };

        let ctx = ErrorContext {
            record_name: Some(req.rr.clone()),
            ..ErrorContext::domain(&req.domain_name)
        };
        let response: AddDomainRecordResponse =
            self.request("AddDomainRecord", &api_req, ctx).await?;

        log::debug!(
            "Added {} record {}.{} -> {} (id {})",
            req.record_type,
            req.rr,
            req.domain_name,
            req.value,
            response.record_id
        );
        Ok(response.record_id)
    }

    async fn update_record(&self, req: &UpdateRecordRequest) -> Result<()> {
        #[derive(Serialize)]
        struct UpdateDomainRecordRequest<'a> {
            #[serde(rename = "RecordId")]
            record_id: &'a str,
            #[serde(rename = "RR")]
            rr: &'a str,
            #[serde(rename = "Type")]
            record_type: &'static str,
            #[serde(rename = "Value")]
            value: &'a str,
            #[serde(rename = "TTL")]
            ttl: u32,
            #[serde(rename = "Line")]
            line: &'a str,
            #[serde(rename = "Priority", skip_serializing_if = "Option::is_none")]
            priority: Option<u16>,
        }

        let api_req = UpdateDomainRecordRequest {
            record_id: &req.record_id,
            rr: &req.rr,
            record_type: req.record_type.as_str(),
            value: &req.value,
            ttl: req.ttl,
            line: &req.line,
            priority: req.priority,
        };

        let _response: ActionResponse = self
            .request(
                "UpdateDomainRecord",
                &api_req,
                Self::record_context(&req.record_id, Some(&req.rr)),
            )
            .await?;
        Ok(())
    }

    async fn delete_record(&self, record_id: &str) -> Result<()> {
        let _response: ActionResponse = self
            .request(
                "DeleteDomainRecord",
                &RecordIdRequest { record_id },
                ErrorContext::record(record_id),
            )
            .await?;
        Ok(())
    }

    async fn set_record_weight(&self, record_id: &str, weight: u32) -> Result<()> {
        #[derive(Serialize)]
        struct UpdateDnsSlbWeightRequest<'a> {
            #[serde(rename = "RecordId")]
            record_id: &'a str,
            #[serde(rename = "Weight")]
            weight: u32,
        }

        let _response: ActionResponse = self
            .request(
                "UpdateDNSSLBWeight",
                &UpdateDnsSlbWeightRequest { record_id, weight },
                ErrorContext::record(record_id),
            )
            .await?;
        Ok(())
    }

    async fn update_record_remark(&self, record_id: &str, remark: &str) -> Result<()> {
        #[derive(Serialize)]
        struct UpdateDomainRecordRemarkRequest<'a> {
            #[serde(rename = "RecordId")]
            record_id: &'a str,
            #[serde(rename = "Remark")]
            remark: &'a str,
        }

        let _response: ActionResponse = self
            .request(
                "UpdateDomainRecordRemark",
                &UpdateDomainRecordRemarkRequest { record_id, remark },
                ErrorContext::record(record_id),
            )
            .await?;
        Ok(())
    }

    async fn set_record_status(&self, record_id: &str, status: Toggle) -> Result<()> {
        #[derive(Serialize)]
        struct SetDomainRecordStatusRequest<'a> {
            #[serde(rename = "RecordId")]
            record_id: &'a str,
            #[serde(rename = "Status")]
            status: &'static str,
        }

        let _response: ActionResponse = self
            .request(
                "SetDomainRecordStatus",
                &SetDomainRecordStatusRequest {
                    record_id,
                    status: status.as_api_param(),
                },
                ErrorContext::record(record_id),
            )
            .await?;
        Ok(())
    }

    async fn set_wrr_status(&self, req: &WrrStatusRequest) -> Result<()> {
        #[derive(Serialize)]
        struct SetDnsSlbStatusRequest<'a> {
            #[serde(rename = "DomainName")]
            domain_name: &'a str,
            #[serde(rename = "SubDomain")]
            sub_domain: String,
            #[serde(rename = "Open")]
            open: bool,
            #[serde(rename = "Type", skip_serializing_if = "Option::is_none")]
            record_type: Option<&'static str>,
            #[serde(rename = "Line", skip_serializing_if = "Option::is_none")]
            line: Option<&'a str>,
        }

        let api_req = SetDnsSlbStatusRequest {
            domain_name: &req.domain_name,
            sub_domain: relative_to_full_name(&req.rr, &req.domain_name),
            open: req.open,
            record_type: req.record_type.map(|t| t.as_str()),
            line: req.line.as_deref(),
        };

        let ctx = ErrorContext {
            record_name: Some(req.rr.clone()),
            ..ErrorContext::domain(&req.domain_name)
        };
        let _response: ActionResponse = self.request("SetDNSSLBStatus", &api_req, ctx).await?;

        log::debug!(
            "WRR for {} switched {}",
            api_req.sub_domain,
            if req.open { "on" } else { "off" }
        );
        Ok(())
    }

    async fn describe_wrr_sub_domains(
        &self,
        domain_name: &str,
        rr: Option<&str>,
        page: &PaginationParams,
    ) -> Result<PaginatedResponse<WrrSubDomain>> {
        #[derive(Serialize)]
        struct DescribeDnsSlbSubDomainsRequest<'a> {
            #[serde(rename = "DomainName")]
            domain_name: &'a str,
            #[serde(rename = "PageNumber")]
            page_number: u32,
            #[serde(rename = "PageSize")]
            page_size: u32,
            #[serde(rename = "Rr", skip_serializing_if = "Option::is_none")]
            rr: Option<&'a str>,
        }

        let page = page.validated(MAX_PAGE_SIZE);
        let req = DescribeDnsSlbSubDomainsRequest {
            domain_name,
            page_number: page.page,
            page_size: page.page_size,
            rr: rr.filter(|r| !r.is_empty()),
        };

        let response: DescribeDnsSlbSubDomainsResponse = self
            .request(
                "DescribeDNSSLBSubDomains",
                &req,
                ErrorContext::domain(domain_name),
            )
            .await?;

        let total_count = response.total_count.unwrap_or(0);
        let items = response
            .slb_sub_domains
            .and_then(|s| s.slb_sub_domain)
            .unwrap_or_default()
            .into_iter()
            .map(WrrSubDomain::from)
            .collect();

        Ok(PaginatedResponse::new(
            items,
            page.page,
            page.page_size,
            total_count,
        ))
    }
}
