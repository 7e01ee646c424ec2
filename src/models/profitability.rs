use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fiat conversion factors and crypto prices, both in the rate source's reference currency
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RateTable {
    #[serde(default)]
    pub fiat: HashMap<String, f64>,
    #[serde(default)]
    pub crypto: HashMap<String, f64>,
}

impl RateTable {
    pub fn fiat_rate(&self, currency: &str) -> Option<f64> {
        self.fiat.get(&currency.to_uppercase()).copied()
    }

    pub fn crypto_price(&self, ticker: &str) -> Option<f64> {
        self.crypto.get(ticker).copied()
    }
}

/// Profitability metrics computed for a single coin in one cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinProfitability {
    pub ticker: String,
    pub profile_id: String,
    /// Daily revenue in native coin units at the queried hashrate
    pub raw_revenue: f64,
    /// Coin price in the rate source's reference currency
    pub reference_price: f64,
    pub fiat_revenue: f64,
    /// Anchor coin per reference hashrate per day
    pub normalized_value: f64,
}
