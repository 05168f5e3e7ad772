//! 业务逻辑服务层

mod planner;
mod weighted_record_service;

pub use planner::{RecordAction, UpdatePlan, plan_update};
pub use weighted_record_service::WeightedRecordService;
