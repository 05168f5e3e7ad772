//! 类型定义模块

mod identifier;
mod record_set;
mod state;

pub use identifier::{ImportId, ResourceId};
pub use record_set::{
    DEFAULT_LINE, MAX_RECORDS, MAX_WEIGHT, WeightedRecord, WeightedRecordSet,
};
pub use state::ResourceState;

// Re-export provider 库的公共类型
pub use alidns_wrr_provider::{DomainRecord, RecordType, Toggle};
