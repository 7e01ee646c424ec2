use std::env;
use std::time::Duration;

const SECONDS_PER_DAY: u64 = 86_400;

/// A coin the switcher may point workers at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinConfig {
    /// Base ticker, used for every rate lookup
    pub ticker: String,
    /// Override used only for the daily-revenue endpoint (e.g. XTM_RX)
    pub revenue_ticker: Option<String>,
    /// Proxy profile that mines this coin
    pub profile_id: String,
}

impl CoinConfig {
    /// Ticker to query the daily-revenue endpoint with
    pub fn revenue_lookup_ticker(&self) -> &str {
        self.revenue_ticker.as_deref().unwrap_or(&self.ticker)
    }

    /// Parse a single `TICKER[:REVENUE_TICKER]=PROFILE_ID` entry
    pub fn parse(entry: &str) -> Result<Self, String> {
        let (tickers, profile_id) = entry
            .split_once('=')
            .ok_or_else(|| format!("Invalid coin entry '{}': expected TICKER=PROFILE_ID", entry))?;

        let profile_id = profile_id.trim();
        if profile_id.is_empty() {
            return Err(format!("Coin entry '{}' has an empty profile id", entry));
        }

        let (ticker, revenue_ticker) = match tickers.split_once(':') {
            Some((t, r)) => (t.trim(), Some(r.trim())),
            None => (tickers.trim(), None),
        };

        if ticker.is_empty() {
            return Err(format!("Coin entry '{}' has an empty ticker", entry));
        }

        Ok(Self {
            ticker: ticker.to_uppercase(),
            revenue_ticker: revenue_ticker
                .filter(|r| !r.is_empty())
                .map(|r| r.to_uppercase()),
            profile_id: profile_id.to_string(),
        })
    }
}

/// Worker proxy configuration
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub base_url: String,
    pub api_key: String,
    pub algorithm: String,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub proxy: ProxyConfig,
    pub kryptex_base_url: String,
    pub fiat_currency: String,
    pub poll_interval_secs: u64,
    pub default_hashrate: u64,
    pub history_file: String,
    pub http_timeout_secs: u64,
    pub log_level: String,
    pub coins: Vec<CoinConfig>,
}

impl AppConfig {
    /// Create application config from environment variables
    pub fn from_env() -> Result<Self, String> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Create application config from an arbitrary variable lookup
    pub fn from_vars<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let algorithm = lookup("PROXY_ALGORITHM")
            .filter(|s| !s.trim().is_empty())
            .ok_or("PROXY_ALGORITHM is required (e.g. kawpow, randomx, verushash)")?;

        let proxy = ProxyConfig {
            base_url: lookup("PROXY_BASE_URL")
                .unwrap_or_else(|| "https://api.ultimate-proxy.com".to_string()),
            api_key: lookup("PROXY_API_KEY").unwrap_or_default(),
            algorithm: algorithm.trim().to_lowercase(),
        };

        let kryptex_base_url = lookup("KRYPTEX_BASE_URL")
            .unwrap_or_else(|| "https://pool.kryptex.com/api/v1".to_string());

        let fiat_currency = lookup("FIAT_CURRENCY")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "USD".to_string())
            .trim()
            .to_uppercase();

        let poll_interval_secs = lookup("POLL_INTERVAL_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(300);

        let default_hashrate = lookup("DEFAULT_HASHRATE")
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(1000);

        let history_file = lookup("HISTORY_FILE")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "profswitch_history.json".to_string());

        let http_timeout_secs = lookup("HTTP_TIMEOUT_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(15);

        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let coins = lookup("COINS")
            .ok_or("COINS is required (e.g. ETC=profile1,XTM:XTM_RX=profile2)")?
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(CoinConfig::parse)
            .collect::<Result<Vec<_>, _>>()?;

        // Validate configuration
        if coins.is_empty() {
            return Err("No coins configured".to_string());
        }

        if poll_interval_secs == 0 {
            return Err("POLL_INTERVAL_SECS must be greater than 0".to_string());
        }

        if default_hashrate == 0 {
            return Err("DEFAULT_HASHRATE must be greater than 0".to_string());
        }

        if http_timeout_secs == 0 {
            return Err("HTTP_TIMEOUT_SECS must be greater than 0".to_string());
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&log_level.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid LOG_LEVEL: {}. Must be one of: {:?}",
                log_level, valid_log_levels
            ));
        }

        Ok(Self {
            proxy,
            kryptex_base_url,
            fiat_currency,
            poll_interval_secs,
            default_hashrate,
            history_file,
            http_timeout_secs,
            log_level: log_level.to_lowercase(),
            coins,
        })
    }

    /// Polling interval as Duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Outbound request timeout as Duration
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Number of snapshots covering a 24h window at the configured interval, plus one
    pub fn history_capacity(&self) -> usize {
        (SECONDS_PER_DAY / self.poll_interval_secs) as usize + 1
    }
}
