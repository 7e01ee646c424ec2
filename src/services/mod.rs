pub mod profitability;
pub mod switcher;

pub use profitability::{ProfitabilityService, RevenueSource, ANCHOR_TICKER, REFERENCE_HASHRATE};
pub use switcher::{SwitchDecision, WorkerSwitcher};
