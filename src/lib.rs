//! Profswitch Library
//!
//! Evaluates the fiat profitability of mining several coins on shared
//! hashing capacity, moves proxy workers to the best one, and keeps a
//! rolling 24h history that is rendered as a terminal chart.

pub mod clients;
pub mod config;
pub mod error;
pub mod history;
pub mod models;
pub mod poller;
pub mod render;
pub mod services;

// Re-export commonly used types
pub use config::{AppConfig, CoinConfig};
pub use error::{AppError, AppResult};
pub use history::History;
pub use poller::ProfitSwitcher;
