//! 共享测试工具和辅助函数

#![allow(dead_code)]

use std::env;
use std::sync::Arc;

use alidns_wrr_provider::{
    AddRecordRequest, AlidnsApi, ClientOptions, ProviderCredentials, RecordQuery, RecordType,
    create_provider,
};

/// 跳过测试的宏（当环境变量缺失时）
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("跳过测试: 缺少环境变量 {}", $var);
                return;
            }
        )+
    };
}

/// 断言 `Option` 为 `Some`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_some {
    ($expr:expr $(,)?) => {{
        let opt = $expr;
        assert!(opt.is_some(), "expected Some(..), got None");
        let Some(val) = opt else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let opt = $expr;
        assert!(opt.is_some(), "{}", format_args!($($msg)+));
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// 生成唯一的测试主机记录
pub fn generate_test_record_name() -> String {
    let uuid = uuid::Uuid::new_v4();
    format!("_test-{}", &uuid.to_string()[..8])
}

/// 测试上下文 - 封装 client 和测试域名
pub struct TestContext {
    pub api: Arc<dyn AlidnsApi>,
    pub domain: String,
}

impl TestContext {
    /// 从环境变量创建测试上下文
    pub fn from_env() -> Option<Self> {
        let access_key_id = env::var("ALIYUN_ACCESS_KEY_ID").ok()?;
        let access_key_secret = env::var("ALIYUN_ACCESS_KEY_SECRET").ok()?;
        let domain = env::var("TEST_DOMAIN").ok()?;

        let api = create_provider(
            ProviderCredentials {
                access_key_id,
                access_key_secret,
            },
            &ClientOptions::default(),
        )
        .ok()?;

        Some(Self { api, domain })
    }

    /// 创建一条 A 测试记录，返回记录 ID
    pub async fn create_test_record(&self, rr: &str, value: &str) -> Option<String> {
        let request = AddRecordRequest {
            domain_name: self.domain.clone(),
            rr: rr.to_string(),
            record_type: RecordType::A,
            value: value.to_string(),
            ttl: 600,
            line: "default".to_string(),
            priority: None,
        };

        self.api.add_record(&request).await.ok()
    }

    /// 清理测试记录
    pub async fn cleanup_record(&self, record_id: &str) {
        let _ = self.api.delete_record(record_id).await;
    }

    /// 查找并清理所有测试记录（以 _test- 开头的记录）
    pub async fn cleanup_all_test_records(&self) {
        let query = RecordQuery {
            rr_keyword: Some("_test-".to_string()),
            ..RecordQuery::default()
        };

        if let Ok(records) = self.api.list_all_records(&self.domain, &query).await {
            for record in records {
                if record.rr.starts_with("_test-") {
                    let _ = self.api.delete_record(&record.record_id).await;
                }
            }
        }
    }
}
