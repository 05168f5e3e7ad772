//! 阿里云错误映射

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::{ALIYUN_PROVIDER_NAME, AliyunProvider};

/// 阿里云错误码映射
/// 参考: <https://api.aliyun.com/document/Alidns/2015-01-09/errorCode>
impl ProviderErrorMapper for AliyunProvider {
    fn provider_name(&self) -> &'static str {
        ALIYUN_PROVIDER_NAME
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        match raw.code.as_deref() {
            // ============ 认证错误 ============
            Some(
                "InvalidAccessKeyId.NotFound"
                | "InvalidAccessKeyId.Inactive"
                | "SignatureDoesNotMatch"
                | "IncompleteSignature",
            ) => ProviderError::InvalidCredentials {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            // ============ 记录已存在 ============
            Some("DomainRecordDuplicate" | "DomainRecordConflict") => ProviderError::RecordExists {
                provider: self.provider_name().to_string(),
                record_name: context.record_name.unwrap_or_default(),
                raw_message: Some(raw.message),
            },

            // ============ 记录不存在 ============
            Some(
                "DomainRecordNotBelongToUser"
                | "InvalidRecordId.NotFound"
                | "InvalidRR.NoExist"
                | "RecordNotExist",
            ) => ProviderError::RecordNotFound {
                provider: self.provider_name().to_string(),
                record_id: context.record_id.unwrap_or_default(),
                raw_message: Some(raw.message),
            },

            // ============ 域名不存在 ============
            Some("InvalidDomainName.NoExist" | "DomainNotFound" | "IncorrectDomainUser") => {
                ProviderError::DomainNotFound {
                    provider: self.provider_name().to_string(),
                    domain: context.domain.unwrap_or_default(),
                    raw_message: Some(raw.message),
                }
            }

            // ============ 配额限制 ============
            Some(
                "QuotaExceeded.ARecord"
                | "QuotaExceeded.Record"
                | "QuotaExceeded.FreeDnsRecord"
                | "QuotaExceeded.SubDomain"
                | "QuotaExceeded.TTL"
                | "LineDnsSlb.QuotaExceeded",
            ) => ProviderError::QuotaExceeded {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            // ============ 频率限流（可重试） ============
            Some("Throttling" | "Throttling.User" | "Throttling.Api") => {
                ProviderError::RateLimited {
                    provider: self.provider_name().to_string(),
                    retry_after: None,
                    raw_message: Some(raw.message),
                }
            }

            // ============ 域名/记录被锁定 ============
            Some(
                "DomainRecordLocked"
                | "DomainExpiredDNSForbidden"
                | "Forbidden.DomainExpired"
                | "RecordForbidden.BlackHole",
            ) => ProviderError::DomainLocked {
                provider: self.provider_name().to_string(),
                domain: context.domain.unwrap_or_default(),
                raw_message: Some(raw.message),
            },

            // ============ 权限/操作被拒绝 ============
            Some(
                "Forbidden"
                | "Forbidden.RiskControl"
                | "Forbidden.RAM"
                | "OperationDomain.NoPermission"
                | "IllegalUser",
            ) => ProviderError::PermissionDenied {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            // ============ 参数无效 - 记录类型 ============
            Some("InvalidRR.TypeEmpty" | "SubDomainInvalid.Type") => {
                ProviderError::InvalidParameter {
                    provider: self.provider_name().to_string(),
                    param: "type".to_string(),
                    detail: raw.message,
                }
            }

            // ============ 参数无效 - 记录值 ============
            Some(
                "InvalidRR.AValue" | "InvalidRR.AAAAValue" | "InvalidRR.MXValue" | "InvalidRR.NSValue",
            ) => ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: "value".to_string(),
                detail: raw.message,
            },

            // ============ 参数无效 - 主机记录 ============
            Some(
                "InvalidRR.RrEmpty" | "InvalidRR.Format" | "Record.Invalid.Rr" | "InvalidRR.Length",
            ) => ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: "rr".to_string(),
                detail: raw.message,
            },

            // ============ 参数无效 - TTL ============
            Some("SubDomainInvalid.TTL") => ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: "ttl".to_string(),
                detail: raw.message,
            },

            // ============ 参数无效 - 线路 ============
            Some("SubDomainInvalid.Line" | "UnsupportedLine") => ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: "line".to_string(),
                detail: raw.message,
            },

            // ============ 参数无效 - MX优先级 ============
            Some("SubDomainInvalid.Priority") => ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: "priority".to_string(),
                detail: raw.message,
            },

            // ============ 参数无效 - 权重 ============
            Some("InvalidWeight" | "LineDnsSlb.InvalidWeight") => {
                ProviderError::InvalidParameter {
                    provider: self.provider_name().to_string(),
                    param: "weight".to_string(),
                    detail: raw.message,
                }
            }

            // ============ 参数无效 - 域名格式 ============
            Some(
                "InvalidDomainName.Format"
                | "InvalidDomainName.Suffix"
                | "InvalidDomainName.Length"
                | "DomainEmpty",
            ) => ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: "domain".to_string(),
                detail: raw.message,
            },

            // ============ 其他错误 fallback ============
            _ => self.unknown_error(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> AliyunProvider {
        AliyunProvider::new("id".to_string(), "secret".to_string()).unwrap()
    }

    #[test]
    fn record_not_found_codes_carry_record_id() {
        let p = provider();
        for code in [
            "DomainRecordNotBelongToUser",
            "InvalidRecordId.NotFound",
            "InvalidRR.NoExist",
        ] {
            let raw = RawApiError::with_code(code, "gone");
            let err = p.map_error(raw, ErrorContext::record("rec-1"));
            assert!(
                matches!(err, ProviderError::RecordNotFound { ref record_id, .. } if record_id == "rec-1"),
                "expected RecordNotFound for code '{code}', got {err:?}"
            );
        }
    }

    #[test]
    fn domain_not_found_carries_domain() {
        let p = provider();
        let raw = RawApiError::with_code("InvalidDomainName.NoExist", "no domain");
        let err = p.map_error(raw, ErrorContext::domain("example.com"));
        assert!(
            matches!(err, ProviderError::DomainNotFound { ref domain, .. } if domain == "example.com"),
            "expected DomainNotFound, got {err:?}"
        );
    }

    #[test]
    fn auth_codes() {
        let p = provider();
        for code in ["InvalidAccessKeyId.NotFound", "SignatureDoesNotMatch"] {
            let err = p.map_error(RawApiError::with_code(code, "bad"), ErrorContext::default());
            assert!(
                matches!(err, ProviderError::InvalidCredentials { .. }),
                "expected InvalidCredentials for code '{code}', got {err:?}"
            );
        }
    }

    #[test]
    fn throttling_is_rate_limited() {
        let p = provider();
        let err = p.map_error(
            RawApiError::with_code("Throttling.User", "slow down"),
            ErrorContext::default(),
        );
        assert!(err.is_retryable(), "expected retryable, got {err:?}");
    }

    #[test]
    fn duplicate_record_is_record_exists() {
        let p = provider();
        let ctx = ErrorContext {
            record_name: Some("www".to_string()),
            ..ErrorContext::default()
        };
        let err = p.map_error(RawApiError::with_code("DomainRecordDuplicate", "dup"), ctx);
        assert!(
            matches!(err, ProviderError::RecordExists { ref record_name, .. } if record_name == "www"),
            "expected RecordExists, got {err:?}"
        );
    }

    #[test]
    fn weight_code_is_invalid_parameter() {
        let p = provider();
        let err = p.map_error(
            RawApiError::with_code("LineDnsSlb.InvalidWeight", "weight out of range"),
            ErrorContext::record("rec-1"),
        );
        assert!(
            matches!(err, ProviderError::InvalidParameter { ref param, .. } if param == "weight"),
            "expected InvalidParameter(weight), got {err:?}"
        );
    }

    #[test]
    fn unmapped_code_falls_back_to_unknown() {
        let p = provider();
        let err = p.map_error(
            RawApiError::with_code("SomethingNew", "surprise"),
            ErrorContext::default(),
        );
        assert!(
            matches!(err, ProviderError::Unknown { raw_code: Some(ref c), .. } if c == "SomethingNew"),
            "expected Unknown, got {err:?}"
        );
    }
}
