//! Alidns 在线集成测试
//!
//! 运行方式:
//! ```bash
//! ALIYUN_ACCESS_KEY_ID=xxx ALIYUN_ACCESS_KEY_SECRET=xxx TEST_DOMAIN=example.com \
//!     cargo test -p alidns-wrr-provider --test aliyun_test -- --ignored --nocapture --test-threads=1
//! ```

mod common;

use alidns_wrr_provider::{
    PaginationParams, RecordQuery, RecordType, Toggle, UpdateRecordRequest, WrrStatusRequest,
    relative_to_full_name,
};
use common::{TestContext, generate_test_record_name};

// ============ 基础测试 ============

#[tokio::test]
#[ignore = "integration test: requires ALIYUN_ACCESS_KEY_ID, ALIYUN_ACCESS_KEY_SECRET and TEST_DOMAIN"]
async fn test_aliyun_describe_domain_info() {
    skip_if_no_credentials!(
        "ALIYUN_ACCESS_KEY_ID",
        "ALIYUN_ACCESS_KEY_SECRET",
        "TEST_DOMAIN"
    );

    let ctx = require_some!(TestContext::from_env(), "创建测试上下文失败");
    let info = require_ok!(
        ctx.api.describe_domain_info(&ctx.domain).await,
        "describe_domain_info 调用失败"
    );
    assert_eq!(info.domain_name, ctx.domain, "域名名称不匹配");

    println!("✓ describe_domain_info 测试通过: {}", info.domain_name);
}

#[tokio::test]
#[ignore = "integration test: requires ALIYUN_ACCESS_KEY_ID, ALIYUN_ACCESS_KEY_SECRET and TEST_DOMAIN"]
async fn test_aliyun_describe_domain_records() {
    skip_if_no_credentials!(
        "ALIYUN_ACCESS_KEY_ID",
        "ALIYUN_ACCESS_KEY_SECRET",
        "TEST_DOMAIN"
    );

    let ctx = require_some!(TestContext::from_env(), "创建测试上下文失败");
    let page = require_ok!(
        ctx.api
            .describe_domain_records(
                &ctx.domain,
                &RecordQuery::default(),
                &PaginationParams::default()
            )
            .await,
        "describe_domain_records 调用失败"
    );
    println!(
        "✓ describe_domain_records 测试通过，共 {} 条记录",
        page.total_count
    );
}

#[tokio::test]
#[ignore = "integration test: requires ALIYUN_ACCESS_KEY_ID, ALIYUN_ACCESS_KEY_SECRET and TEST_DOMAIN"]
async fn test_aliyun_describe_missing_record() {
    skip_if_no_credentials!(
        "ALIYUN_ACCESS_KEY_ID",
        "ALIYUN_ACCESS_KEY_SECRET",
        "TEST_DOMAIN"
    );

    let ctx = require_some!(TestContext::from_env(), "创建测试上下文失败");
    let err = ctx
        .api
        .describe_record("1")
        .await
        .expect_err("不存在的记录应返回错误");
    assert!(err.is_not_found(), "应映射为 RecordNotFound: {err:?}");

    println!("✓ describe_record 不存在测试通过");
}

// ============ 清理测试 ============

/// 清理所有残留的测试记录（手动运行）
#[tokio::test]
#[ignore = "integration test: requires ALIYUN_ACCESS_KEY_ID, ALIYUN_ACCESS_KEY_SECRET and TEST_DOMAIN"]
async fn test_aliyun_cleanup_test_records() {
    skip_if_no_credentials!(
        "ALIYUN_ACCESS_KEY_ID",
        "ALIYUN_ACCESS_KEY_SECRET",
        "TEST_DOMAIN"
    );

    let ctx = require_some!(TestContext::from_env(), "创建测试上下文失败");
    ctx.cleanup_all_test_records().await;
    println!("✓ 清理完成");
}

// ============ 记录生命周期 ============

#[tokio::test]
#[ignore = "integration test: requires ALIYUN_ACCESS_KEY_ID, ALIYUN_ACCESS_KEY_SECRET and TEST_DOMAIN"]
async fn test_aliyun_record_lifecycle() {
    skip_if_no_credentials!(
        "ALIYUN_ACCESS_KEY_ID",
        "ALIYUN_ACCESS_KEY_SECRET",
        "TEST_DOMAIN"
    );

    let ctx = require_some!(TestContext::from_env(), "创建测试上下文失败");
    let rr = generate_test_record_name();
    println!("测试主机记录: {rr}");

    // 1. 创建
    let record_id = require_some!(
        ctx.create_test_record(&rr, "192.0.2.1").await,
        "add_record 失败"
    );
    println!("  ✓ 创建成功: id={record_id}");

    // 2. 读取
    let record = require_ok!(
        ctx.api.describe_record(&record_id).await,
        "describe_record 失败"
    );
    assert_eq!(record.rr, rr);
    assert_eq!(record.value, "192.0.2.1");
    println!("  ✓ 读取成功");

    // 3. 更新 TTL 和值
    let update = UpdateRecordRequest {
        record_id: record_id.clone(),
        rr: rr.clone(),
        record_type: RecordType::A,
        value: "192.0.2.2".to_string(),
        ttl: 900,
        line: "default".to_string(),
        priority: None,
    };
    require_ok!(ctx.api.update_record(&update).await, "update_record 失败");
    println!("  ✓ 更新成功");

    // 4. 备注和状态
    require_ok!(
        ctx.api.update_record_remark(&record_id, "integration").await,
        "update_record_remark 失败"
    );
    require_ok!(
        ctx.api.set_record_status(&record_id, Toggle::Disable).await,
        "set_record_status 失败"
    );

    let record = require_ok!(
        ctx.api.describe_record(&record_id).await,
        "describe_record 失败"
    );
    assert_eq!(record.ttl, 900);
    assert_eq!(record.remark.as_deref(), Some("integration"));
    assert_eq!(record.status, Toggle::Disable);
    println!("  ✓ 属性验证通过");

    // 5. 删除
    require_ok!(
        ctx.api.delete_record(&record_id).await,
        "delete_record 失败"
    );
    let gone = ctx.api.describe_record(&record_id).await;
    assert!(
        matches!(&gone, Err(e) if e.is_not_found()),
        "记录应该已被删除: {gone:?}"
    );
    println!("✓ 记录生命周期测试通过");
}

// ============ 权重轮询 ============

#[tokio::test]
#[ignore = "integration test: requires ALIYUN_ACCESS_KEY_ID, ALIYUN_ACCESS_KEY_SECRET and TEST_DOMAIN"]
async fn test_aliyun_wrr_toggle_and_weight() {
    skip_if_no_credentials!(
        "ALIYUN_ACCESS_KEY_ID",
        "ALIYUN_ACCESS_KEY_SECRET",
        "TEST_DOMAIN"
    );

    let ctx = require_some!(TestContext::from_env(), "创建测试上下文失败");
    let rr = generate_test_record_name();

    let first = require_some!(
        ctx.create_test_record(&rr, "192.0.2.10").await,
        "add_record 失败"
    );
    let second = require_some!(
        ctx.create_test_record(&rr, "192.0.2.11").await,
        "add_record 失败"
    );

    let mut status = WrrStatusRequest {
        domain_name: ctx.domain.clone(),
        rr: rr.clone(),
        record_type: Some(RecordType::A),
        line: Some("default".to_string()),
        open: true,
    };
    let opened = ctx.api.set_wrr_status(&status).await;
    if opened.is_ok() {
        require_ok!(
            ctx.api.set_record_weight(&first, 10).await,
            "set_record_weight 失败"
        );

        let sub_domain = relative_to_full_name(&rr, &ctx.domain);
        let found = require_ok!(
            ctx.api.find_wrr_sub_domain(&ctx.domain, &rr, &sub_domain).await,
            "find_wrr_sub_domain 失败"
        );
        let found = require_some!(found, "应能查到权重子域名");
        assert!(found.open, "权重轮询应已开启");

        status.open = false;
        require_ok!(ctx.api.set_wrr_status(&status).await, "关闭权重轮询失败");
        println!("✓ 权重轮询测试通过");
    } else {
        println!("⚠ 当前套餐不支持权重轮询，跳过: {opened:?}");
    }

    ctx.cleanup_record(&first).await;
    ctx.cleanup_record(&second).await;
}
