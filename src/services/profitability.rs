//! Per-cycle profitability aggregation.
//!
//! One rate table is fetched per cycle, then every configured coin's revenue
//! is fetched concurrently. Each coin writes only its own result slot; the
//! slots are joined once all fetches settle and failed coins are dropped.

use crate::config::CoinConfig;
use crate::error::{AppError, AppResult};
use crate::models::{CoinProfitability, RateTable};
use futures::future::join_all;
use std::future::Future;
use tracing::{debug, warn};

/// Coin every normalized value is expressed in
pub const ANCHOR_TICKER: &str = "BTC";

/// Hashrate (H/s) normalized values are scaled to
pub const REFERENCE_HASHRATE: f64 = 1_000_000.0;

/// Source of exchange rates and per-coin daily revenue
pub trait RevenueSource {
    /// Fiat conversion factors and crypto prices
    fn fetch_rates(&self) -> impl Future<Output = AppResult<RateTable>> + Send;

    /// Daily revenue in coin units of `hashrate` H/s mining `ticker`
    fn fetch_daily_revenue(
        &self,
        ticker: &str,
        hashrate: u64,
    ) -> impl Future<Output = AppResult<f64>> + Send;
}

/// Computes and ranks the profitability of the configured coins
pub struct ProfitabilityService<S> {
    source: S,
}

impl<S: RevenueSource + Sync> ProfitabilityService<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch live rates and revenue for all coins, most profitable first.
    ///
    /// Fails only when the rate table itself is unusable; individual coins
    /// that fail are logged and left out.
    pub async fn compute(
        &self,
        coins: &[CoinConfig],
        fiat_currency: &str,
        hashrate: u64,
    ) -> AppResult<Vec<CoinProfitability>> {
        if hashrate == 0 {
            return Err(AppError::Message("hashrate must be greater than 0".to_string()));
        }

        let rates = self.source.fetch_rates().await?;

        let fiat_rate = rates
            .fiat_rate(fiat_currency)
            .filter(|r| *r > 0.0)
            .ok_or_else(|| AppError::MissingRate(format!("unknown fiat currency: {}", fiat_currency)))?;

        let anchor_price = rates
            .crypto_price(ANCHOR_TICKER)
            .filter(|p| *p > 0.0)
            .ok_or_else(|| AppError::MissingRate(format!("{} rate not found in rates", ANCHOR_TICKER)))?;

        let rates = &rates;
        let fetches = coins.iter().map(|coin| async move {
            let raw_revenue = self
                .source
                .fetch_daily_revenue(coin.revenue_lookup_ticker(), hashrate)
                .await?;
            evaluate_coin(coin, raw_revenue, rates, fiat_rate, anchor_price, hashrate)
        });

        let results = join_all(fetches).await;

        let mut profitabilities: Vec<CoinProfitability> = results
            .into_iter()
            .zip(coins)
            .filter_map(|(result, coin)| match result {
                Ok(p) => Some(p),
                Err(e) => {
                    warn!("Skipping {} this cycle: {}", coin.ticker, e);
                    None
                }
            })
            .collect();

        rank(&mut profitabilities);
        debug!(
            "Computed profitability for {}/{} coin(s)",
            profitabilities.len(),
            coins.len()
        );

        Ok(profitabilities)
    }
}

/// Convert one coin's raw revenue into fiat and normalized figures.
///
/// Price lookups always use the base ticker, never the revenue override.
pub fn evaluate_coin(
    coin: &CoinConfig,
    raw_revenue: f64,
    rates: &RateTable,
    fiat_rate: f64,
    anchor_price: f64,
    hashrate: u64,
) -> AppResult<CoinProfitability> {
    let reference_price = rates
        .crypto_price(&coin.ticker)
        .ok_or_else(|| AppError::MissingRate(format!("no crypto rate for {}", coin.ticker)))?;

    let fiat_revenue = raw_revenue * reference_price / fiat_rate;
    let normalized_value =
        (raw_revenue * reference_price / anchor_price) * (REFERENCE_HASHRATE / hashrate as f64);

    Ok(CoinProfitability {
        ticker: coin.ticker.clone(),
        profile_id: coin.profile_id.clone(),
        raw_revenue,
        reference_price,
        fiat_revenue,
        normalized_value,
    })
}

/// Sort by descending fiat revenue, ties by ticker
pub fn rank(profitabilities: &mut [CoinProfitability]) {
    profitabilities.sort_by(|a, b| {
        b.fiat_revenue
            .total_cmp(&a.fiat_revenue)
            .then_with(|| a.ticker.cmp(&b.ticker))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coin(ticker: &str) -> CoinConfig {
        CoinConfig {
            ticker: ticker.to_string(),
            revenue_ticker: None,
            profile_id: format!("profile-{}", ticker.to_lowercase()),
        }
    }

    fn rates() -> RateTable {
        let mut rates = RateTable::default();
        rates.fiat.insert("USD".to_string(), 1.0);
        rates.fiat.insert("EUR".to_string(), 0.5);
        rates.crypto.insert("BTC".to_string(), 20_000.0);
        rates.crypto.insert("A".to_string(), 2.0);
        rates.crypto.insert("B".to_string(), 3.0);
        rates
    }

    #[test]
    fn test_evaluate_coin() {
        let rates = rates();
        let a = evaluate_coin(&coin("A"), 10.0, &rates, 1.0, 20_000.0, 1_000_000).unwrap();
        assert_eq!(a.fiat_revenue, 20.0);
        assert!((a.normalized_value - 0.001).abs() < 1e-12);
        assert_eq!(a.profile_id, "profile-a");

        // Half the hashrate doubles the normalized figure
        let a = evaluate_coin(&coin("A"), 10.0, &rates, 1.0, 20_000.0, 500_000).unwrap();
        assert!((a.normalized_value - 0.002).abs() < 1e-12);

        // Fiat factor divides
        let a = evaluate_coin(&coin("A"), 10.0, &rates, 0.5, 20_000.0, 1_000_000).unwrap();
        assert_eq!(a.fiat_revenue, 40.0);
    }

    #[test]
    fn test_evaluate_coin_uses_base_ticker_for_price() {
        let mut c = coin("A");
        c.revenue_ticker = Some("A_ALT".to_string());
        let p = evaluate_coin(&c, 1.0, &rates(), 1.0, 20_000.0, 1_000_000).unwrap();
        assert_eq!(p.ticker, "A");
        assert_eq!(p.reference_price, 2.0);
    }

    #[test]
    fn test_evaluate_coin_missing_price() {
        let result = evaluate_coin(&coin("ZZZ"), 1.0, &rates(), 1.0, 20_000.0, 1_000_000);
        assert!(matches!(result, Err(AppError::MissingRate(_))));
    }

    #[test]
    fn test_rank_ties_by_ticker() {
        let rates = rates();
        let mut list = vec![
            evaluate_coin(&coin("B"), 2.0, &rates, 1.0, 20_000.0, 1_000_000).unwrap(),
            evaluate_coin(&coin("A"), 3.0, &rates, 1.0, 20_000.0, 1_000_000).unwrap(),
        ];
        rank(&mut list);
        assert_eq!(list[0].ticker, "A");
        assert_eq!(list[1].ticker, "B");
    }
}
