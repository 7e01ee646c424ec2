use crate::clients::{KryptexClient, ProxyClient};
use crate::config::AppConfig;
use crate::error::AppResult;
use crate::history::History;
use crate::models::{CoinProfitability, Snapshot};
use crate::render::{format_hashrate, print_chart, print_table};
use crate::services::switcher::decide;
use crate::services::{ProfitabilityService, WorkerSwitcher};
use chrono::Utc;
use std::future::Future;
use std::sync::Arc;
use tokio::time::{self, MissedTickBehavior};
use tracing::{error, info, warn};

/// Result of one polling cycle
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// A snapshot was recorded
    Recorded { ticker: String, switched: bool },
    /// The cycle ended early; nothing was recorded
    Skipped,
}

/// Polling loop that keeps workers on the most profitable coin
pub struct ProfitSwitcher {
    config: AppConfig,
    profitability: ProfitabilityService<KryptexClient>,
    proxy: ProxyClient,
    switcher: WorkerSwitcher,
    history: Arc<History>,
    current_ticker: String,
    dry_run: bool,
}

impl ProfitSwitcher {
    /// Create a new switcher; `current_ticker` is what was last being mined, if known
    pub fn new(config: AppConfig, history: Arc<History>, current_ticker: String) -> AppResult<Self> {
        let kryptex = KryptexClient::new(config.kryptex_base_url.clone(), config.http_timeout())?;
        let proxy = ProxyClient::new(&config.proxy, config.http_timeout())?;

        Ok(Self {
            profitability: ProfitabilityService::new(kryptex),
            switcher: WorkerSwitcher::new(proxy.clone()),
            proxy,
            config,
            history,
            current_ticker,
            dry_run: false,
        })
    }

    /// Skip all worker and profile changes
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Run cycles every poll interval until `shutdown` resolves.
    ///
    /// Shutdown is only observed between cycles.
    pub async fn start<F>(mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut interval = time::interval(self.config.poll_interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!("Profit switcher started, polling every {:?}", self.config.poll_interval());

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.run_cycle().await;
                }
                _ = &mut shutdown => {
                    info!("Shutting down...");
                    return;
                }
            }
        }
    }

    /// Live 1h average hashrate, or the configured default when unavailable
    async fn resolve_hashrate(&self) -> u64 {
        match self.proxy.fetch_hashrate().await {
            Ok((avg, peak)) if avg >= 1.0 => {
                info!(
                    "Live hashrate (1h avg): {}, peak: {}",
                    format_hashrate(avg),
                    format_hashrate(peak)
                );
                avg as u64
            }
            Ok(_) => {
                warn!("No hashrate data, using default: {} H/s", self.config.default_hashrate);
                self.config.default_hashrate
            }
            Err(e) => {
                warn!(
                    "Failed to fetch hashrate: {} - using default {} H/s",
                    e, self.config.default_hashrate
                );
                self.config.default_hashrate
            }
        }
    }

    /// Evaluate, switch if needed, record, persist and render
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        let hashrate = self.resolve_hashrate().await;

        let ranked = match self
            .profitability
            .compute(&self.config.coins, &self.config.fiat_currency, hashrate)
            .await
        {
            Ok(ranked) => ranked,
            Err(e) => {
                error!("Profitability cycle failed: {}", e);
                return CycleOutcome::Skipped;
            }
        };

        let Some(best) = ranked.first() else {
            warn!("No profitability data available");
            return CycleOutcome::Skipped;
        };

        let (averages, mined) = self.history.averages();
        print_table(
            &ranked,
            &self.config.fiat_currency,
            &self.current_ticker,
            &averages,
            &mined,
            hashrate,
        );

        // New miners connecting should land on the best coin
        if !self.dry_run {
            if let Err(e) = self.switcher.set_default_profile(&best.profile_id).await {
                warn!("Failed to set default profile: {}", e);
            }
        }

        let mut switched = false;
        if let Some(decision) = decide(&self.current_ticker, &ranked) {
            switched = decision.is_switch;
            match (decision.is_switch, decision.gain_percent) {
                (true, Some(gain)) => info!(
                    "[SWITCH] {} → {} (more profitable by +{:.1}%)",
                    decision.from, decision.to, gain
                ),
                (true, None) => info!("[SWITCH] → {} (most profitable)", decision.to),
                (false, _) => info!("Starting with most profitable coin: {}", decision.to),
            }

            if !self.dry_run {
                if let Err(e) = self.switcher.switch_to(&decision.profile_id, &decision.to).await {
                    error!("Switch failed: {}", e);
                    return CycleOutcome::Skipped;
                }
            }
            self.current_ticker = decision.to;
        }

        self.record(&ranked, switched);

        CycleOutcome::Recorded {
            ticker: self.current_ticker.clone(),
            switched,
        }
    }

    /// Append this cycle's snapshot, persist the history and draw the chart
    fn record(&self, ranked: &[CoinProfitability], switched: bool) {
        self.history
            .add(snapshot_from(ranked, &self.current_ticker, switched));

        if let Err(e) = self.history.save(&self.config.history_file) {
            warn!("Failed to save history: {}", e);
        }

        print_chart(&self.history.all(), &self.config.fiat_currency);
    }
}

/// Build the snapshot recorded for one cycle
pub fn snapshot_from(ranked: &[CoinProfitability], active_ticker: &str, switched: bool) -> Snapshot {
    ranked.iter().fold(
        Snapshot::new(Utc::now()).with_active(active_ticker, switched),
        |snapshot, p| snapshot.with_coin(&p.ticker, p.fiat_revenue, p.normalized_value),
    )
}

/// Hydrate `history` from disk, returning the ticker mined at the last stored sample.
///
/// A missing file is expected on first start; other failures are logged.
pub fn restore_history(history: &History, path: &str) -> String {
    match history.load(path) {
        Ok(count) => {
            let last_ticker = history
                .last()
                .map(|s| s.active_ticker)
                .unwrap_or_default();
            if count > 0 {
                info!(
                    "Restored {} snapshots from {} (last mining: {})",
                    count, path, last_ticker
                );
            }
            last_ticker
        }
        Err(e) if e.is_missing_file() => String::new(),
        Err(e) => {
            warn!("Failed to load history: {}", e);
            String::new()
        }
    }
}
