use serde::{Deserialize, Serialize};

/// A mining worker connected through the proxy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Worker {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub profile_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub algorithm: String,
    #[serde(default)]
    pub hashrate: u64,
}

/// One page of the worker listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkersResponse {
    #[serde(default)]
    pub data: Vec<Worker>,
    #[serde(default)]
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u32,
    pub total_pages: u32,
}

/// Body of the bulk-assign request
#[derive(Debug, Clone, Serialize)]
pub struct BulkAssignRequest<'a> {
    pub worker_ids: &'a [String],
    pub profile_id: &'a str,
}

/// Response of the aggregated hashrate endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HashrateResponse {
    #[serde(default)]
    pub hours: u32,
    #[serde(default)]
    pub granularity: u32,
    #[serde(default)]
    pub stats: Option<HashrateStats>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HashrateStats {
    #[serde(default)]
    pub avg_hashrate: f64,
    #[serde(default)]
    pub peak_hashrate: f64,
}
