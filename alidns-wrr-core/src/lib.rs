//! Weighted record set core library
//!
//! Manages a group of Alidns records sharing one host record and type,
//! balanced with weighted round-robin (WRR):
//! - Configuration types and validation ([`WeightedRecordSet`])
//! - Lifecycle operations ([`WeightedRecordService`]): create, read, update, delete, import
//! - Update planning ([`plan_update`])
//!
//! Remote access goes through the [`AlidnsApi`](alidns_wrr_provider::AlidnsApi) trait,
//! so the service runs unchanged against the real API or an in-memory fake.

pub mod error;
pub mod services;
pub mod types;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use services::{RecordAction, UpdatePlan, WeightedRecordService, plan_update};
pub use types::{ImportId, ResourceId, ResourceState, WeightedRecord, WeightedRecordSet};
