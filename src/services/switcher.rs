use crate::clients::ProxyClient;
use crate::error::AppResult;
use crate::models::{CoinProfitability, Worker};
use crate::render::format::percent_gain;
use tracing::info;

/// Outcome of comparing the ranked coins against what is being mined
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchDecision {
    pub from: String,
    pub to: String,
    pub profile_id: String,
    /// False on the very first decision, when nothing was being mined yet
    pub is_switch: bool,
    /// Gain of the new coin over the old one, when the old one is still ranked
    pub gain_percent: Option<f64>,
}

/// Decide whether the top-ranked coin differs from `current`
pub fn decide(current: &str, ranked: &[CoinProfitability]) -> Option<SwitchDecision> {
    let best = ranked.first()?;
    if best.ticker == current {
        return None;
    }

    let gain_percent = ranked
        .iter()
        .find(|p| p.ticker == current)
        .and_then(|old| percent_gain(old.fiat_revenue, best.fiat_revenue));

    Some(SwitchDecision {
        from: current.to_string(),
        to: best.ticker.clone(),
        profile_id: best.profile_id.clone(),
        is_switch: !current.is_empty(),
        gain_percent,
    })
}

/// Ids of workers not already on `target_profile_id`
pub fn workers_to_move(workers: &[Worker], target_profile_id: &str) -> Vec<String> {
    workers
        .iter()
        .filter(|w| !w.id.is_empty() && w.profile_id != target_profile_id)
        .map(|w| w.id.clone())
        .collect()
}

/// Reassigns proxy workers between coin profiles
pub struct WorkerSwitcher {
    proxy: ProxyClient,
}

impl WorkerSwitcher {
    pub fn new(proxy: ProxyClient) -> Self {
        Self { proxy }
    }

    /// Bulk-assign every worker not yet on the target profile; returns how many moved
    pub async fn switch_to(&self, target_profile_id: &str, target_ticker: &str) -> AppResult<usize> {
        let workers = self.proxy.fetch_all_workers().await?;
        let ids = workers_to_move(&workers, target_profile_id);

        if ids.is_empty() {
            return Ok(0);
        }

        info!(
            "Assigning {}/{} worker(s) to profile {} ({})",
            ids.len(),
            workers.len(),
            target_profile_id,
            target_ticker
        );
        self.proxy.bulk_assign_workers(&ids, target_profile_id).await?;
        Ok(ids.len())
    }

    /// Point newly connecting workers at `profile_id`
    pub async fn set_default_profile(&self, profile_id: &str) -> AppResult<()> {
        self.proxy.set_default_profile(profile_id).await
    }
}
