//! Domain models for the profit switcher.
//!
//! Snapshots are what the history store keeps; the remaining types are
//! handed between the REST clients, the aggregator and the renderers.

pub mod profitability;
pub mod snapshot;
pub mod worker;

// Re-export all models for convenient access
pub use profitability::{CoinProfitability, RateTable};
pub use snapshot::{CoinAverage, MinedAverage, Snapshot};
pub use worker::{HashrateResponse, HashrateStats, Pagination, Worker, WorkersResponse};
