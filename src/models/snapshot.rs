use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One timestamped sample of every coin's profitability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub timestamp: DateTime<Utc>,
    /// ticker -> daily revenue in fiat
    pub values: HashMap<String, f64>,
    /// ticker -> anchor coin per reference hashrate per day
    pub normalized_values: HashMap<String, f64>,
    /// Ticker being mined when the sample was taken, empty if undecided
    #[serde(default)]
    pub active_ticker: String,
    /// True if this cycle changed the active ticker
    #[serde(default)]
    pub switched: bool,
}

impl Snapshot {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            values: HashMap::new(),
            normalized_values: HashMap::new(),
            active_ticker: String::new(),
            switched: false,
        }
    }

    /// Record one coin's fiat and normalized figures
    pub fn with_coin(mut self, ticker: &str, fiat: f64, normalized: f64) -> Self {
        self.values.insert(ticker.to_string(), fiat);
        self.normalized_values.insert(ticker.to_string(), normalized);
        self
    }

    /// Mark the ticker being mined and whether this sample is a switch event
    pub fn with_active(mut self, ticker: &str, switched: bool) -> Self {
        self.active_ticker = ticker.to_string();
        self.switched = switched;
        self
    }

    /// Whether `ticker` was the coin being mined at this sample
    pub fn is_mining(&self, ticker: &str) -> bool {
        !self.active_ticker.is_empty() && self.active_ticker == ticker
    }
}

/// Averaged values for a single coin across all retained snapshots
#[derive(Debug, Clone, PartialEq)]
pub struct CoinAverage {
    pub ticker: String,
    pub avg_fiat: f64,
    pub avg_normalized: f64,
    pub count: usize,
}

/// Average of whatever was actually being mined at each sample
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MinedAverage {
    pub avg_fiat: f64,
    pub avg_normalized: f64,
    pub count: usize,
}
