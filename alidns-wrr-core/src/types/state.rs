use serde::{Deserialize, Serialize};

use super::{ResourceId, WeightedRecordSet};

/// Identifier plus configuration as observed remotely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceState {
    pub id: ResourceId,
    pub config: WeightedRecordSet,
}
