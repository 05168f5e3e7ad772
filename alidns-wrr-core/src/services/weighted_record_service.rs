//! 权重轮询记录集生命周期服务

use std::sync::Arc;

use alidns_wrr_provider::{
    AddRecordRequest, AlidnsApi, DomainRecord, RecordQuery, Toggle, UpdateRecordRequest,
    WrrStatusRequest, relative_to_full_name,
};

use crate::error::{CoreError, CoreResult};
use crate::services::planner::{RecordAction, UpdatePlan, plan_update};
use crate::types::{ImportId, ResourceId, ResourceState, WeightedRecord, WeightedRecordSet};

/// Remark and status a record currently carries remotely.
struct RemoteExtras {
    remark: String,
    status: Toggle,
}

impl RemoteExtras {
    /// What Alidns assigns to a freshly added record.
    fn fresh() -> Self {
        Self {
            remark: String::new(),
            status: Toggle::Enable,
        }
    }

    fn of(record: &DomainRecord) -> Self {
        Self {
            remark: record.remark.clone().unwrap_or_default(),
            status: record.status,
        }
    }
}

/// 权重轮询记录集服务
///
/// Every operation runs its remote calls one after another; call order is
/// significant (records exist before WRR is switched on, weights follow WRR).
pub struct WeightedRecordService {
    api: Arc<dyn AlidnsApi>,
    preflight: bool,
}

impl WeightedRecordService {
    /// 创建服务实例
    #[must_use]
    pub fn new(api: Arc<dyn AlidnsApi>) -> Self {
        Self {
            api,
            preflight: true,
        }
    }

    /// Toggle the `DescribeDomainInfo` check made before create (default: on).
    #[must_use]
    pub fn with_preflight(mut self, enabled: bool) -> Self {
        self.preflight = enabled;
        self
    }

    // ===== Create =====

    /// Create every configured record, then switch on WRR and apply weights,
    /// remarks and statuses. Returns the state read back from the remote side.
    ///
    /// A remote record with the same RR, type and value is adopted instead of
    /// duplicated. Nothing is rolled back on failure.
    pub async fn create(&self, config: &WeightedRecordSet) -> CoreResult<ResourceState> {
        config.validate()?;
        let domain = &config.domain_name;
        log::info!(
            "Creating weighted record set {} ({} {} records)",
            relative_to_full_name(&config.rr, domain),
            config.records.len(),
            config.record_type
        );

        if self.preflight {
            self.api
                .describe_domain_info(domain)
                .await
                .map_err(CoreError::remote("describe domain", domain.clone()))?;
        }

        let existing = self.existing_records(config).await?;
        let mut record_ids = Vec::with_capacity(config.records.len());
        let mut extras = Vec::with_capacity(config.records.len());
        for record in &config.records {
            let (record_id, remote) = self.ensure_record(config, record, &existing).await?;
            record_ids.push(record_id);
            extras.push(remote);
        }

        if config.wrr_status.is_enabled() {
            self.set_wrr(config, Toggle::Enable).await?;
            for (record_id, record) in record_ids.iter().zip(&config.records) {
                if record.weight != 0 {
                    self.set_weight(record_id, record.weight).await?;
                }
            }
        }

        for ((record_id, record), remote) in record_ids.iter().zip(&config.records).zip(&extras) {
            self.apply_extras(record_id, record, remote).await?;
        }

        let id = ResourceId::new(record_ids)?;
        log::info!("Created weighted record set {id}");
        self.read_back(&id, config).await
    }

    // ===== Read =====

    /// Fetch the remote state of `id`. Records that no longer exist are
    /// dropped; `Ok(None)` means none is left.
    pub async fn read(
        &self,
        id: &ResourceId,
        domain_name: &str,
    ) -> CoreResult<Option<ResourceState>> {
        let mut records = Vec::with_capacity(id.len());
        for record_id in id.record_ids() {
            match self.api.describe_record(record_id).await {
                Ok(record) => records.push(record),
                Err(e) if e.is_not_found() => {
                    log::debug!("Record {record_id} no longer exists, dropping it from state");
                }
                Err(e) => return Err(CoreError::remote("read record", record_id.clone())(e)),
            }
        }

        if records.is_empty() {
            log::info!("Weighted record set {id} is gone");
            return Ok(None);
        }
        self.assemble_state(domain_name, records).await.map(Some)
    }

    // ===== Update =====

    /// Compute the plan for moving `prior` to `desired`, without applying it.
    pub fn plan(&self, prior: &ResourceState, desired: &WeightedRecordSet) -> CoreResult<UpdatePlan> {
        desired.validate()?;
        plan_update(prior, desired)
    }

    /// Reconcile the remote records of `prior` with `desired`, matching records by index.
    pub async fn update(
        &self,
        prior: &ResourceState,
        desired: &WeightedRecordSet,
    ) -> CoreResult<ResourceState> {
        let plan = self.plan(prior, desired)?;
        if plan.is_noop() {
            log::info!("Weighted record set {} is up to date", prior.id);
            return self.read_back(&prior.id, desired).await;
        }
        log::info!(
            "Updating weighted record set {} ({} record actions)",
            prior.id,
            plan.actions.len()
        );

        let weights_enabled = desired.wrr_status.is_enabled();
        let mut record_ids = prior.id.record_ids().to_vec();
        let mut pending_weights: Vec<(String, u32)> = Vec::new();
        let mut existing: Option<Vec<DomainRecord>> = None;

        for action in &plan.actions {
            match action {
                RecordAction::Reconcile {
                    index,
                    record_id,
                    check_core,
                    weight,
                    remark,
                    status,
                } => {
                    let record = &desired.records[*index];
                    let mut target = record_id.clone();
                    let mut weight = *weight;
                    let mut remark = remark.clone();
                    let mut status = *status;

                    if let Some(new_id) = self
                        .reconcile_existing(desired, record, record_id, *check_core)
                        .await?
                    {
                        // Replacement starts from remote defaults
                        weight = (weights_enabled && record.weight != 0).then_some(record.weight);
                        remark = (!record.remark_or_empty().is_empty())
                            .then(|| record.remark_or_empty().to_string());
                        status = (record.status != Toggle::Enable).then_some(record.status);
                        record_ids[*index].clone_from(&new_id);
                        target = new_id;
                    }

                    if let Some(weight) = weight {
                        if plan.defer_weights {
                            pending_weights.push((target.clone(), weight));
                        } else {
                            self.set_weight(&target, weight).await?;
                        }
                    }
                    if let Some(remark) = remark {
                        self.set_remark(&target, &remark).await?;
                    }
                    if let Some(status) = status {
                        self.set_status(&target, status).await?;
                    }
                }
                RecordAction::Create { index } => {
                    if record_ids.len() != *index {
                        return Err(CoreError::RecordCountMismatch {
                            ids: record_ids.len(),
                            records: *index,
                        });
                    }
                    let record = &desired.records[*index];
                    if existing.is_none() {
                        existing = Some(self.existing_records(desired).await?);
                    }
                    let known = existing.as_deref().unwrap_or_default();
                    let (record_id, remote) = self.ensure_record(desired, record, known).await?;

                    if weights_enabled && record.weight != 0 {
                        if plan.defer_weights {
                            pending_weights.push((record_id.clone(), record.weight));
                        } else {
                            self.set_weight(&record_id, record.weight).await?;
                        }
                    }
                    self.apply_extras(&record_id, record, &remote).await?;
                    record_ids.push(record_id);
                }
                RecordAction::Delete { record_id, .. } => {
                    self.delete_one(record_id).await?;
                }
            }
        }
        record_ids.truncate(desired.records.len());

        if let Some(wrr_status) = plan.wrr_status {
            self.set_wrr(desired, wrr_status).await?;
        }
        for (record_id, weight) in pending_weights {
            self.set_weight(&record_id, weight).await?;
        }

        let id = ResourceId::new(record_ids)?;
        self.read_back(&id, desired).await
    }

    // ===== Delete =====

    /// Delete every tracked record. Records already gone count as deleted.
    pub async fn delete(&self, id: &ResourceId) -> CoreResult<()> {
        log::info!("Deleting weighted record set {id}");
        for record_id in id.record_ids() {
            self.delete_one(record_id).await?;
        }
        Ok(())
    }

    // ===== Import =====

    /// Adopt a single existing record, identified as `<domain_name>/<record_id>`.
    pub async fn import(&self, import_id: &str) -> CoreResult<ResourceState> {
        let import_id: ImportId = import_id.parse()?;
        log::info!("Importing record {import_id}");

        let record = self
            .api
            .describe_record(&import_id.record_id)
            .await
            .map_err(CoreError::remote("read record", import_id.record_id.clone()))?;

        if !record.domain_name.is_empty()
            && !record
                .domain_name
                .eq_ignore_ascii_case(&import_id.domain_name)
        {
            return Err(CoreError::DomainMismatch {
                record_id: import_id.record_id,
                expected: import_id.domain_name,
                actual: record.domain_name,
            });
        }

        self.assemble_state(&import_id.domain_name, vec![record])
            .await
    }

    // ===== Helpers =====

    /// Records under the configured RR and type, for adopting duplicates.
    async fn existing_records(&self, config: &WeightedRecordSet) -> CoreResult<Vec<DomainRecord>> {
        let query = RecordQuery {
            rr_keyword: Some(config.rr.clone()),
            record_type: Some(config.record_type),
            value_keyword: None,
        };
        let records = self
            .api
            .list_all_records(&config.domain_name, &query)
            .await
            .map_err(CoreError::remote("list records", config.domain_name.clone()))?;

        // RRKeyWord matches fuzzily
        Ok(records
            .into_iter()
            .filter(|r| r.rr.eq_ignore_ascii_case(&config.rr) && r.record_type == config.record_type)
            .collect())
    }

    /// Adopt a matching remote record or add a new one.
    async fn ensure_record(
        &self,
        config: &WeightedRecordSet,
        record: &WeightedRecord,
        existing: &[DomainRecord],
    ) -> CoreResult<(String, RemoteExtras)> {
        if let Some(found) = existing.iter().find(|r| r.value == record.value) {
            log::info!(
                "Adopting existing record {} for value {}",
                found.record_id,
                record.value
            );
            if !core_matches(found, config, record) {
                self.rewrite_core(config, record, &found.record_id).await?;
            }
            return Ok((found.record_id.clone(), RemoteExtras::of(found)));
        }

        let record_id = self.add_record(config, record).await?;
        Ok((record_id, RemoteExtras::fresh()))
    }

    /// Bring the core attributes of `record_id` in line with `record`.
    ///
    /// Returns the ID of a replacement when the remote record has vanished.
    async fn reconcile_existing(
        &self,
        config: &WeightedRecordSet,
        record: &WeightedRecord,
        record_id: &str,
        check_core: bool,
    ) -> CoreResult<Option<String>> {
        match self.api.describe_record(record_id).await {
            Ok(remote) => {
                if check_core && !core_matches(&remote, config, record) {
                    self.rewrite_core(config, record, record_id).await?;
                }
                Ok(None)
            }
            Err(e) if e.is_not_found() => {
                log::warn!("Record {record_id} disappeared, creating a replacement");
                self.add_record(config, record).await.map(Some)
            }
            Err(e) => Err(CoreError::remote("read record", record_id)(e)),
        }
    }

    async fn add_record(
        &self,
        config: &WeightedRecordSet,
        record: &WeightedRecord,
    ) -> CoreResult<String> {
        let request = AddRecordRequest {
            domain_name: config.domain_name.clone(),
            rr: config.rr.clone(),
            record_type: config.record_type,
            value: record.value.clone(),
            ttl: record.ttl,
            line: config.line.clone(),
            priority: config.priority,
        };
        self.api.add_record(&request).await.map_err(CoreError::remote(
            "create record",
            format!("{} {}", relative_to_full_name(&config.rr, &config.domain_name), record.value),
        ))
    }

    async fn rewrite_core(
        &self,
        config: &WeightedRecordSet,
        record: &WeightedRecord,
        record_id: &str,
    ) -> CoreResult<()> {
        let request = UpdateRecordRequest {
            record_id: record_id.to_string(),
            rr: config.rr.clone(),
            record_type: config.record_type,
            value: record.value.clone(),
            ttl: record.ttl,
            line: config.line.clone(),
            priority: config.priority,
        };
        self.api
            .update_record(&request)
            .await
            .map_err(CoreError::remote("update record", record_id))
    }

    /// Apply remark and status where they differ from what the record carries.
    async fn apply_extras(
        &self,
        record_id: &str,
        record: &WeightedRecord,
        remote: &RemoteExtras,
    ) -> CoreResult<()> {
        if record.remark_or_empty() != remote.remark {
            self.set_remark(record_id, record.remark_or_empty()).await?;
        }
        if record.status != remote.status {
            self.set_status(record_id, record.status).await?;
        }
        Ok(())
    }

    async fn set_weight(&self, record_id: &str, weight: u32) -> CoreResult<()> {
        self.api
            .set_record_weight(record_id, weight)
            .await
            .map_err(CoreError::remote("set weight of record", record_id))
    }

    async fn set_remark(&self, record_id: &str, remark: &str) -> CoreResult<()> {
        self.api
            .update_record_remark(record_id, remark)
            .await
            .map_err(CoreError::remote("set remark of record", record_id))
    }

    async fn set_status(&self, record_id: &str, status: Toggle) -> CoreResult<()> {
        self.api
            .set_record_status(record_id, status)
            .await
            .map_err(CoreError::remote("set status of record", record_id))
    }

    async fn set_wrr(&self, config: &WeightedRecordSet, status: Toggle) -> CoreResult<()> {
        let sub_domain = relative_to_full_name(&config.rr, &config.domain_name);
        log::info!("Switching WRR for {sub_domain} to {status}");
        let request = WrrStatusRequest {
            domain_name: config.domain_name.clone(),
            rr: config.rr.clone(),
            record_type: Some(config.record_type),
            line: Some(config.line.clone()),
            open: status.is_enabled(),
        };
        self.api
            .set_wrr_status(&request)
            .await
            .map_err(CoreError::remote("set WRR status of", sub_domain))
    }

    async fn delete_one(&self, record_id: &str) -> CoreResult<()> {
        match self.api.delete_record(record_id).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => {
                log::debug!("Record {record_id} already deleted");
                Ok(())
            }
            Err(e) => Err(CoreError::remote("delete record", record_id)(e)),
        }
    }

    /// Read back after a write; the ID must cover every configured record.
    async fn read_back(
        &self,
        id: &ResourceId,
        config: &WeightedRecordSet,
    ) -> CoreResult<ResourceState> {
        if id.len() != config.records.len() {
            return Err(CoreError::RecordCountMismatch {
                ids: id.len(),
                records: config.records.len(),
            });
        }
        self.read(id, &config.domain_name)
            .await?
            .ok_or(CoreError::RecordCountMismatch {
                ids: 0,
                records: config.records.len(),
            })
    }

    /// Map fetched records into resource state. `records` must not be empty.
    async fn assemble_state(
        &self,
        domain_name: &str,
        mut records: Vec<DomainRecord>,
    ) -> CoreResult<ResourceState> {
        let Some(first) = records.first() else {
            return Err(CoreError::RecordCountMismatch { ids: 0, records: 0 });
        };
        let rr = first.rr.clone();
        let record_type = first.record_type;
        let line = first.line.clone();
        let priority = first.priority;

        // DescribeDomainRecordInfo omits weights; the record listing carries them
        if records.iter().any(|r| r.weight.is_none()) {
            let query = RecordQuery {
                rr_keyword: Some(rr.clone()),
                record_type: Some(record_type),
                value_keyword: None,
            };
            let listed = self
                .api
                .list_all_records(domain_name, &query)
                .await
                .map_err(CoreError::remote("list records", domain_name))?;
            for record in records.iter_mut().filter(|r| r.weight.is_none()) {
                record.weight = listed
                    .iter()
                    .find(|l| l.record_id == record.record_id)
                    .and_then(|l| l.weight);
            }
        }

        let sub_domain = relative_to_full_name(&rr, domain_name);
        let wrr_status = self
            .api
            .find_wrr_sub_domain(domain_name, &rr, &sub_domain)
            .await
            .map_err(CoreError::remote("read WRR status of", sub_domain.clone()))?
            .map_or(Toggle::Disable, |s| Toggle::from_enabled(s.open));

        let id = ResourceId::new(records.iter().map(|r| r.record_id.clone()).collect())?;
        let records = records
            .into_iter()
            .map(|r| WeightedRecord {
                value: r.value,
                ttl: r.ttl,
                weight: r.weight.unwrap_or(0),
                status: r.status,
                remark: r.remark.filter(|s| !s.is_empty()),
            })
            .collect();

        Ok(ResourceState {
            id,
            config: WeightedRecordSet {
                domain_name: domain_name.to_string(),
                rr,
                record_type,
                line,
                priority,
                wrr_status,
                records,
            },
        })
    }
}

/// Whether `remote` already carries the configured RR, type, value, TTL and line.
fn core_matches(remote: &DomainRecord, config: &WeightedRecordSet, record: &WeightedRecord) -> bool {
    remote.rr.eq_ignore_ascii_case(&config.rr)
        && remote.record_type == config.record_type
        && remote.value == record.value
        && remote.ttl == record.ttl
        && remote.line == config.line
        && (config.priority.is_none() || remote.priority == config.priority)
}
