//! Subcommand execution

use std::sync::Arc;

use alidns_wrr_core::{ResourceId, ResourceState, WeightedRecordService};
use alidns_wrr_provider::{AlidnsApi, ClientOptions, ProviderCredentials, create_provider};
use anyhow::{Context, Result, anyhow, bail};
use serde_json::Value;

use crate::cli::{Command, GlobalArgs, PriorArgs};
use crate::config::{load_record_set, load_state};

/// Build the Alidns client from global flags.
pub fn build_client(global: &GlobalArgs) -> Result<Arc<dyn AlidnsApi>> {
    let credentials = ProviderCredentials {
        access_key_id: global
            .access_key_id
            .clone()
            .context("--access-key-id or ALIYUN_ACCESS_KEY_ID is required")?,
        access_key_secret: global
            .access_key_secret
            .clone()
            .context("--access-key-secret or ALIYUN_ACCESS_KEY_SECRET is required")?,
    };
    let options = ClientOptions {
        endpoint: global.endpoint.clone(),
        max_retries: global.max_retries,
    };
    Ok(create_provider(credentials, &options)?)
}

/// Run a subcommand and return the JSON document to print.
///
/// `api` may be `None` only for commands that stay offline.
pub async fn run(command: Command, api: Option<Arc<dyn AlidnsApi>>) -> Result<Value> {
    match command {
        Command::Validate { config } => {
            let set = load_record_set(&config)?;
            set.validate()?;
            tracing::info!("{} is valid", config.display());
            Ok(serde_json::to_value(set)?)
        }
        Command::Create { config } => {
            let set = load_record_set(&config)?;
            let state = service(api)?.create(&set).await?;
            Ok(serde_json::to_value(state)?)
        }
        Command::Read { config, id } => {
            let set = load_record_set(&config)?;
            let id: ResourceId = id.parse()?;
            match service(api)?.read(&id, &set.domain_name).await? {
                Some(state) => Ok(serde_json::to_value(state)?),
                None => {
                    tracing::warn!("No record of {id} exists any more");
                    Ok(Value::Null)
                }
            }
        }
        Command::Update { config, prior } => {
            let set = load_record_set(&config)?;
            let service = service(api)?;
            let prior = prior_state(&service, &prior, &set.domain_name).await?;
            let state = service.update(&prior, &set).await?;
            Ok(serde_json::to_value(state)?)
        }
        Command::Delete { id } => {
            let id: ResourceId = id.parse()?;
            service(api)?.delete(&id).await?;
            Ok(serde_json::json!({ "deleted": id }))
        }
        Command::Import { import_id } => {
            let state = service(api)?.import(&import_id).await?;
            Ok(serde_json::to_value(state)?)
        }
        Command::Plan { config, prior } => {
            let set = load_record_set(&config)?;
            let service = service(api)?;
            let prior = prior_state(&service, &prior, &set.domain_name).await?;
            let plan = service.plan(&prior, &set)?;
            if plan.is_noop() {
                tracing::info!("No changes");
            }
            Ok(serde_json::to_value(plan)?)
        }
    }
}

fn service(api: Option<Arc<dyn AlidnsApi>>) -> Result<WeightedRecordService> {
    api.map(WeightedRecordService::new)
        .ok_or_else(|| anyhow!("an Alidns client is required"))
}

/// Prior state from a state file, or refreshed from Alidns by ID.
async fn prior_state(
    service: &WeightedRecordService,
    prior: &PriorArgs,
    domain_name: &str,
) -> Result<ResourceState> {
    if let Some(path) = &prior.state {
        return load_state(path);
    }
    let Some(id) = &prior.id else {
        bail!("either --id or --state is required");
    };
    let id: ResourceId = id.parse()?;
    service
        .read(&id, domain_name)
        .await?
        .with_context(|| format!("no record of {id} exists any more; create the record set again"))
}
