use super::check_status;
use crate::config::ProxyConfig;
use crate::error::AppResult;
use crate::models::worker::BulkAssignRequest;
use crate::models::{HashrateResponse, Worker, WorkersResponse};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

const WORKERS_PAGE_LIMIT: u32 = 100;

/// Client for the mining proxy that owns the workers and their profiles
#[derive(Clone)]
pub struct ProxyClient {
    base_url: String,
    api_key: String,
    algorithm: String,
    client: Client,
}

impl ProxyClient {
    /// Create a new client with a fixed per-request timeout
    pub fn new(config: &ProxyConfig, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            algorithm: config.algorithm.clone(),
            client,
        })
    }

    /// List every worker for the configured algorithm, following pagination
    pub async fn fetch_all_workers(&self) -> AppResult<Vec<Worker>> {
        let mut all = Vec::new();
        let mut page = 1;

        loop {
            let url = format!(
                "{}/v1/workers?page={}&limit={}&algorithm={}",
                self.base_url, page, WORKERS_PAGE_LIMIT, self.algorithm
            );
            let response = self
                .client
                .get(&url)
                .header("X-API-Key", &self.api_key)
                .send()
                .await?;
            let response = check_status(&url, response).await?;
            let body = response.json::<WorkersResponse>().await?;

            all.extend(body.data);
            if page >= body.pagination.total_pages {
                break;
            }
            page += 1;
        }

        debug!("Fetched {} worker(s) over {} page(s)", all.len(), page);
        Ok(all)
    }

    /// Move the given workers to `profile_id`
    pub async fn bulk_assign_workers(&self, worker_ids: &[String], profile_id: &str) -> AppResult<()> {
        let url = format!("{}/v1/workers/bulk-assign", self.base_url);
        let payload = BulkAssignRequest {
            worker_ids,
            profile_id,
        };
        let response = self
            .client
            .post(&url)
            .header("X-API-Key", &self.api_key)
            .json(&payload)
            .send()
            .await?;
        check_status(&url, response).await?;
        Ok(())
    }

    /// Make `profile_id` the profile new workers land on
    pub async fn set_default_profile(&self, profile_id: &str) -> AppResult<()> {
        let url = format!("{}/v1/profiles/{}/default", self.base_url, profile_id);
        let response = self
            .client
            .post(&url)
            .header("X-API-Key", &self.api_key)
            .send()
            .await?;
        check_status(&url, response).await?;
        Ok(())
    }

    /// 1h average and peak hashrate in H/s; zeros when the proxy has no stats yet
    pub async fn fetch_hashrate(&self) -> AppResult<(f64, f64)> {
        let url = format!(
            "{}/v1/workers/hashrate?algorithm={}&timeRange=1h",
            self.base_url, self.algorithm
        );
        let response = self
            .client
            .get(&url)
            .header("X-API-Key", &self.api_key)
            .send()
            .await?;
        let response = check_status(&url, response).await?;
        let body = response.json::<HashrateResponse>().await?;

        Ok(body
            .stats
            .map(|s| (s.avg_hashrate, s.peak_hashrate))
            .unwrap_or((0.0, 0.0)))
    }
}
