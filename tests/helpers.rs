#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use profswitch::error::{AppError, AppResult};
use profswitch::models::{RateTable, Snapshot};
use profswitch::services::RevenueSource;
use profswitch::CoinConfig;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

static PATH_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Unique scratch file path under the system temp dir
pub fn temp_history_path(label: &str) -> PathBuf {
    let n = PATH_COUNTER.fetch_add(1, Ordering::SeqCst);
    std::env::temp_dir().join(format!(
        "profswitch-{}-{}-{}.json",
        label,
        std::process::id(),
        n
    ))
}

/// Fixed base time plus `minutes`
pub fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap() + Duration::minutes(minutes)
}

pub fn snapshot(minutes: i64, coins: &[(&str, f64)], active: &str, switched: bool) -> Snapshot {
    coins
        .iter()
        .fold(Snapshot::new(at(minutes)), |s, (ticker, value)| {
            s.with_coin(ticker, *value, value / 1000.0)
        })
        .with_active(active, switched)
}

pub fn coin(ticker: &str) -> CoinConfig {
    CoinConfig {
        ticker: ticker.to_string(),
        revenue_ticker: None,
        profile_id: format!("profile-{}", ticker.to_lowercase()),
    }
}

/// In-memory rate and revenue source
#[derive(Default)]
pub struct StubSource {
    pub rates: RateTable,
    pub revenue: HashMap<String, f64>,
    pub fail_rates: bool,
    pub requested: Mutex<Vec<(String, u64)>>,
}

impl StubSource {
    pub fn new() -> Self {
        let mut source = Self::default();
        source.rates.fiat.insert("USD".to_string(), 1.0);
        source.rates.crypto.insert("BTC".to_string(), 20_000.0);
        source
    }

    pub fn with_coin(mut self, ticker: &str, price: f64, revenue: f64) -> Self {
        self.rates.crypto.insert(ticker.to_string(), price);
        self.revenue.insert(ticker.to_string(), revenue);
        self
    }

    pub fn with_fiat(mut self, currency: &str, rate: f64) -> Self {
        self.rates.fiat.insert(currency.to_string(), rate);
        self
    }

    pub fn requested_tickers(&self) -> Vec<String> {
        let mut tickers: Vec<String> = self
            .requested
            .lock()
            .unwrap()
            .iter()
            .map(|(t, _)| t.clone())
            .collect();
        tickers.sort();
        tickers
    }
}

impl RevenueSource for StubSource {
    async fn fetch_rates(&self) -> AppResult<RateTable> {
        if self.fail_rates {
            return Err(AppError::ExternalService("rates unavailable".to_string()));
        }
        Ok(self.rates.clone())
    }

    async fn fetch_daily_revenue(&self, ticker: &str, hashrate: u64) -> AppResult<f64> {
        self.requested
            .lock()
            .unwrap()
            .push((ticker.to_string(), hashrate));
        self.revenue
            .get(ticker)
            .copied()
            .ok_or_else(|| AppError::ExternalService(format!("no revenue for {}", ticker)))
    }
}
