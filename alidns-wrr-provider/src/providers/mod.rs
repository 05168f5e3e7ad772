//! Alidns client implementation

/// Shared utilities used by the client.
pub mod common;

mod aliyun;

pub use aliyun::{AliyunProvider, AliyunProviderBuilder};
