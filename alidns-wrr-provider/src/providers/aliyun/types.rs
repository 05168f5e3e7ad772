//! 阿里云 API 类型定义和辅助函数

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write;

use crate::error::{ProviderError, Result};
use crate::types::{DomainInfo, DomainRecord, RecordType, Toggle, WrrSubDomain};

use super::ALIYUN_PROVIDER_NAME;

// ============ RFC3986 URL 编码 ============

/// RFC3986 URL 编码
pub fn url_encode(s: &str) -> String {
    let mut result = String::new();
    for c in s.chars() {
        match c {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '-' | '_' | '.' | '~' => {
                result.push(c);
            }
            _ => {
                let mut buf = [0_u8; 4];
                for byte in c.encode_utf8(&mut buf).as_bytes() {
                    let _ = write!(result, "%{byte:02X}");
                }
            }
        }
    }
    result
}

/// 将 `serde_json::Value` 展平为 key-value 对 (处理嵌套对象)
pub fn flatten_value(prefix: &str, value: &serde_json::Value, result: &mut BTreeMap<String, String>) {
    match value {
        serde_json::Value::Object(map) => {
            for (k, v) in map {
                let new_key = if prefix.is_empty() {
                    k.clone()
                } else {
                    format!("{prefix}.{k}")
                };
                flatten_value(&new_key, v, result);
            }
        }
        serde_json::Value::Array(arr) => {
            for (i, v) in arr.iter().enumerate() {
                let new_key = format!("{}.{}", prefix, i + 1);
                flatten_value(&new_key, v, result);
            }
        }
        serde_json::Value::String(s) => {
            result.insert(prefix.to_string(), s.clone());
        }
        serde_json::Value::Number(n) => {
            result.insert(prefix.to_string(), n.to_string());
        }
        serde_json::Value::Bool(b) => {
            result.insert(prefix.to_string(), b.to_string());
        }
        serde_json::Value::Null => {}
    }
}

/// 将结构体序列化为排序后的 query string
pub fn serialize_to_query_string<T: Serialize>(params: &T) -> Result<String> {
    let value = serde_json::to_value(params).map_err(|e| ProviderError::SerializationError {
        provider: ALIYUN_PROVIDER_NAME.to_string(),
        detail: e.to_string(),
    })?;

    let mut flat_map = BTreeMap::new();
    flatten_value("", &value, &mut flat_map);

    let query_string = flat_map
        .iter()
        .map(|(k, v)| format!("{}={}", url_encode(k), url_encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    Ok(query_string)
}

// ============ 通用响应 ============

/// 只携带 `RequestId` 的写操作响应
#[derive(Debug, Deserialize)]
pub struct ActionResponse {
    #[serde(rename = "RequestId")]
    pub request_id: Option<String>,
}

// ============ 域名相关结构 ============

#[derive(Debug, Deserialize)]
pub struct DescribeDomainInfoResponse {
    #[serde(rename = "DomainId")]
    pub domain_id: Option<String>,
    #[serde(rename = "DomainName")]
    pub domain_name: String,
    #[serde(rename = "RecordCount")]
    pub record_count: Option<u32>,
}

impl From<DescribeDomainInfoResponse> for DomainInfo {
    fn from(r: DescribeDomainInfoResponse) -> Self {
        Self {
            domain_id: r.domain_id,
            domain_name: r.domain_name,
            record_count: r.record_count,
        }
    }
}

// ============ 记录相关结构 ============

#[derive(Debug, Deserialize)]
pub struct DescribeDomainRecordsResponse {
    #[serde(rename = "DomainRecords")]
    pub domain_records: Option<DomainRecordsWrapper>,
    #[serde(rename = "TotalCount")]
    pub total_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct DomainRecordsWrapper {
    #[serde(rename = "Record")]
    pub record: Option<Vec<AliyunRecord>>,
}

/// `DescribeDomainRecords` 列表项，也是 `DescribeDomainRecordInfo` 的响应体
#[derive(Debug, Deserialize)]
pub struct AliyunRecord {
    #[serde(rename = "RecordId")]
    pub record_id: String,
    #[serde(rename = "DomainName", default)]
    pub domain_name: Option<String>,
    #[serde(rename = "RR")]
    pub rr: String,
    #[serde(rename = "Type")]
    pub record_type: String,
    #[serde(rename = "Value")]
    pub value: String,
    #[serde(rename = "TTL")]
    pub ttl: u32,
    #[serde(rename = "Line", default)]
    pub line: Option<String>,
    #[serde(rename = "Weight")]
    pub weight: Option<u32>,
    #[serde(rename = "Status", default)]
    pub status: Option<String>,
    #[serde(rename = "Remark")]
    pub remark: Option<String>,
    #[serde(rename = "Priority")]
    pub priority: Option<u16>,
    #[serde(rename = "Locked", default)]
    pub locked: bool,
}

impl AliyunRecord {
    /// 转换为统一记录类型；`fallback_domain` 用于响应中缺失 `DomainName` 的情况
    pub fn into_domain_record(self, fallback_domain: &str) -> Result<DomainRecord> {
        let record_type: RecordType =
            self.record_type
                .parse()
                .map_err(|_| ProviderError::UnsupportedRecordType {
                    provider: ALIYUN_PROVIDER_NAME.to_string(),
                    record_type: self.record_type.clone(),
                })?;

        // 缺失或无法识别的状态按启用处理
        let status = self
            .status
            .as_deref()
            .and_then(|s| s.parse::<Toggle>().ok())
            .unwrap_or_default();

        Ok(DomainRecord {
            record_id: self.record_id,
            domain_name: self
                .domain_name
                .unwrap_or_else(|| fallback_domain.to_string()),
            rr: self.rr,
            record_type,
            value: self.value,
            ttl: self.ttl,
            line: self.line.unwrap_or_else(|| "default".to_string()),
            weight: self.weight,
            status,
            remark: self.remark.filter(|r| !r.is_empty()),
            priority: self.priority,
            locked: self.locked,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct AddDomainRecordResponse {
    #[serde(rename = "RecordId")]
    pub record_id: String,
}

// ============ 权重轮询 (DNSSLB) 相关结构 ============

#[derive(Debug, Deserialize)]
pub struct DescribeDnsSlbSubDomainsResponse {
    #[serde(rename = "SlbSubDomains")]
    pub slb_sub_domains: Option<SlbSubDomainsWrapper>,
    #[serde(rename = "TotalCount")]
    pub total_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SlbSubDomainsWrapper {
    #[serde(rename = "SlbSubDomain")]
    pub slb_sub_domain: Option<Vec<AliyunSlbSubDomain>>,
}

#[derive(Debug, Deserialize)]
pub struct AliyunSlbSubDomain {
    #[serde(rename = "SubDomain")]
    pub sub_domain: String,
    #[serde(rename = "RecordCount", default)]
    pub record_count: u32,
    #[serde(rename = "Open", default)]
    pub open: bool,
    #[serde(rename = "Type")]
    pub record_type: Option<String>,
    #[serde(rename = "Line")]
    pub line: Option<String>,
}

impl From<AliyunSlbSubDomain> for WrrSubDomain {
    fn from(s: AliyunSlbSubDomain) -> Self {
        Self {
            sub_domain: s.sub_domain,
            record_count: s.record_count,
            open: s.open,
            record_type: s.record_type,
            line: s.line,
        }
    }
}
