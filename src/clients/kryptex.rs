use super::check_status;
use crate::error::{AppError, AppResult};
use crate::models::RateTable;
use crate::services::profitability::RevenueSource;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Client for the pool API serving exchange rates and per-coin daily revenue
#[derive(Clone)]
pub struct KryptexClient {
    base_url: String,
    client: Client,
}

impl KryptexClient {
    /// Create a new client with a fixed per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch fiat conversion factors and crypto prices
    pub async fn rates(&self) -> AppResult<RateTable> {
        let url = format!("{}/rates", self.base_url);
        let response = self.client.get(&url).send().await?;
        let response = check_status(&url, response).await?;
        let rates = response.json::<RateTable>().await?;
        debug!(
            "Fetched {} fiat and {} crypto rates",
            rates.fiat.len(),
            rates.crypto.len()
        );
        Ok(rates)
    }

    /// Fetch the daily revenue, in coin units, of `hashrate` H/s mining `ticker`
    pub async fn daily_revenue(&self, ticker: &str, hashrate: u64) -> AppResult<f64> {
        let url = format!(
            "{}/daily-revenue/{}?hashrate={}",
            self.base_url, ticker, hashrate
        );
        let response = self.client.get(&url).send().await?;
        let response = check_status(&url, response).await?;
        let body = response.text().await?;
        parse_revenue(ticker, &body)
    }
}

/// The revenue endpoint answers with a bare number
fn parse_revenue(ticker: &str, body: &str) -> AppResult<f64> {
    let revenue = body.trim().parse::<f64>().map_err(|e| {
        AppError::ExternalService(format!("invalid revenue for {}: {:?}: {}", ticker, body.trim(), e))
    })?;

    if !revenue.is_finite() || revenue < 0.0 {
        return Err(AppError::ExternalService(format!(
            "invalid revenue for {}: {}",
            ticker, revenue
        )));
    }
    Ok(revenue)
}

impl RevenueSource for KryptexClient {
    async fn fetch_rates(&self) -> AppResult<RateTable> {
        self.rates().await
    }

    async fn fetch_daily_revenue(&self, ticker: &str, hashrate: u64) -> AppResult<f64> {
        self.daily_revenue(ticker, hashrate).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_revenue() {
        assert_eq!(parse_revenue("ETC", " 0.0125\n").unwrap(), 0.0125);
        assert_eq!(parse_revenue("ETC", "0").unwrap(), 0.0);
        assert!(parse_revenue("ETC", "not a number").is_err());
        assert!(parse_revenue("ETC", "-1").is_err());
        assert!(parse_revenue("ETC", "NaN").is_err());
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = KryptexClient::new("https://pool.example/api/v1/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "https://pool.example/api/v1");
    }

    #[test]
    fn test_rate_table_shape() {
        let rates: RateTable =
            serde_json::from_str(r#"{"fiat": {"USD": 1.0, "EUR": 0.9}, "crypto": {"BTC": 60000.0}}"#)
                .unwrap();
        assert_eq!(rates.fiat_rate("eur"), Some(0.9));
        assert_eq!(rates.crypto_price("BTC"), Some(60000.0));
        assert_eq!(rates.crypto_price("ETC"), None);
    }
}
