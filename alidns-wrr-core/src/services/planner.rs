//! Update planning
//!
//! [`plan_update`] compares the prior state with the desired configuration and
//! lists the remote work an update needs, without performing any of it.
//! Records are matched by list index: reordering the configured records is
//! indistinguishable from editing them in place.

use serde::Serialize;

use alidns_wrr_provider::Toggle;

use crate::error::{CoreError, CoreResult};
use crate::types::{ResourceState, WeightedRecordSet};

/// Work for one record index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RecordAction {
    /// Keep the record at `index`, patching what changed.
    Reconcile {
        index: usize,
        record_id: String,
        /// Fetch the remote record and rewrite RR/type/value/TTL/line if stale.
        check_core: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        weight: Option<u32>,
        /// New remark; empty clears it.
        #[serde(skip_serializing_if = "Option::is_none")]
        remark: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        status: Option<Toggle>,
    },
    /// Create the record configured at `index`.
    Create { index: usize },
    /// Delete the record no longer configured at `index`.
    Delete { index: usize, record_id: String },
}

/// Ordered remote work for an update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdatePlan {
    pub actions: Vec<RecordAction>,
    /// Target WRR state, present only when it changes. Applied after all record actions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrr_status: Option<Toggle>,
    /// Weight calls wait until WRR has been switched on.
    pub defer_weights: bool,
}

impl UpdatePlan {
    /// Whether the update needs no remote writes.
    pub fn is_noop(&self) -> bool {
        self.actions.is_empty() && self.wrr_status.is_none()
    }
}

/// Compute the actions turning `prior` into `desired`.
///
/// Weight changes are planned only when `desired` has WRR enabled, and a zero
/// weight never produces a call. Remark, weight and status are each compared
/// against the prior configuration entry at the same index. Moving the set to
/// another host, type or line re-applies the WRR state and every weight there.
pub fn plan_update(prior: &ResourceState, desired: &WeightedRecordSet) -> CoreResult<UpdatePlan> {
    let old = &prior.config;

    if old.domain_name != desired.domain_name {
        return Err(CoreError::Validation(format!(
            "domain_name cannot change from '{}' to '{}'; the record set must be replaced",
            old.domain_name, desired.domain_name
        )));
    }
    if prior.id.len() != old.records.len() {
        return Err(CoreError::RecordCountMismatch {
            ids: prior.id.len(),
            records: old.records.len(),
        });
    }

    // WRR is keyed by host, type and line; moved records land on a host with WRR off
    let wrr_moved = !old.rr.eq_ignore_ascii_case(&desired.rr)
        || old.record_type != desired.record_type
        || old.line != desired.line;
    let wrr_status = (wrr_moved || old.wrr_status != desired.wrr_status)
        .then_some(desired.wrr_status);
    let mut plan = UpdatePlan {
        actions: Vec::new(),
        wrr_status,
        defer_weights: wrr_status == Some(Toggle::Enable),
    };

    let shared_changed = old.shared_attributes_differ(desired);
    if !shared_changed && old.records == desired.records {
        return Ok(plan);
    }

    let weights_enabled = desired.wrr_status.is_enabled();
    let record_ids = prior.id.record_ids();
    let len = old.records.len().max(desired.records.len());

    for index in 0..len {
        match (old.records.get(index), desired.records.get(index)) {
            (Some(before), Some(after)) => {
                let check_core =
                    shared_changed || before.value != after.value || before.ttl != after.ttl;
                let weight = (weights_enabled
                    && after.weight != 0
                    && (wrr_moved || after.weight != before.weight))
                    .then_some(after.weight);
                let remark = (after.remark_or_empty() != before.remark_or_empty())
                    .then(|| after.remark_or_empty().to_string());
                let status = (after.status != before.status).then_some(after.status);

                if check_core || weight.is_some() || remark.is_some() || status.is_some() {
                    plan.actions.push(RecordAction::Reconcile {
                        index,
                        record_id: record_ids[index].clone(),
                        check_core,
                        weight,
                        remark,
                        status,
                    });
                }
            }
            (None, Some(_)) => plan.actions.push(RecordAction::Create { index }),
            (Some(_), None) => plan.actions.push(RecordAction::Delete {
                index,
                record_id: record_ids[index].clone(),
            }),
            (None, None) => {}
        }
    }

    Ok(plan)
}
