//! Terminal output: the profitability tables and the history chart.
//!
//! Renderers build plain `String`s; the `print_*` wrappers write them to stdout.

pub mod chart;
pub mod format;
pub mod table;

pub use chart::{print_chart, render_chart, render_chart_in};
pub use format::format_hashrate;
pub use table::{print_table, render_table};
