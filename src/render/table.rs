use super::format::{format_hashrate, COLOR_BOLD, COLOR_RESET};
use crate::models::{CoinAverage, CoinProfitability, MinedAverage};
use chrono::Local;
use std::fmt::Write;

const RANKING_RULE_WIDTH: usize = 84;
const AVERAGES_RULE_WIDTH: usize = 56;

fn rule(width: usize) -> String {
    "─".repeat(width)
}

fn marker(ticker: &str, current: &str) -> &'static str {
    if ticker == current {
        "★ "
    } else {
        "  "
    }
}

/// Ranking of this cycle's coins, followed by history averages once there is more than one sample
pub fn render_table(
    ranked: &[CoinProfitability],
    fiat_currency: &str,
    current_ticker: &str,
    averages: &[CoinAverage],
    mined: &MinedAverage,
    hashrate: u64,
) -> String {
    let currency = fiat_currency.to_uppercase();
    let mut out = String::new();

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "  Profitability Report — {}  ⚡ {}",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        format_hashrate(hashrate as f64)
    );
    let _ = writeln!(out, "{}", rule(RANKING_RULE_WIDTH));
    let _ = writeln!(
        out,
        "  {:<4}  {:<10}  {:>16}  {:>16}  {:>14}  {:>12}",
        "Rank",
        "Coin",
        "Daily (coin)",
        format!("Daily ({})", currency),
        "BTC/MH/Day",
        "Price (USD)"
    );
    let _ = writeln!(out, "{}", rule(RANKING_RULE_WIDTH));

    for (i, p) in ranked.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {:<4}  {}{:<8}  {:>16.8}  {:>16.8}  {:>14.10}  {:>12.6}",
            i + 1,
            marker(&p.ticker, current_ticker),
            p.ticker,
            p.raw_revenue,
            p.fiat_revenue,
            p.normalized_value,
            p.reference_price
        );
    }

    let _ = writeln!(out, "{}", rule(RANKING_RULE_WIDTH));
    let _ = writeln!(out, "  ★ = currently mining");

    if averages.first().is_some_and(|a| a.count > 1) {
        let _ = writeln!(out);
        let _ = writeln!(out, "  Averages ({} samples)", averages[0].count);
        let _ = writeln!(out, "{}", rule(AVERAGES_RULE_WIDTH));
        let _ = writeln!(
            out,
            "  {:<4}  {:<10}  {:>16}  {:>14}",
            "Rank",
            "Coin",
            format!("Avg ({})", currency),
            "Avg BTC/MH/D"
        );
        let _ = writeln!(out, "{}", rule(AVERAGES_RULE_WIDTH));
        for (i, a) in averages.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {:<4}  {}{:<8}  {:>16.8}  {:>14.10}",
                i + 1,
                marker(&a.ticker, current_ticker),
                a.ticker,
                a.avg_fiat,
                a.avg_normalized
            );
        }
        let _ = writeln!(out, "{}", rule(AVERAGES_RULE_WIDTH));
        if mined.count > 0 {
            let _ = writeln!(
                out,
                "  {}⛏  MINED AVG{}  {:>16.8}  {:>14.10}",
                COLOR_BOLD, COLOR_RESET, mined.avg_fiat, mined.avg_normalized
            );
            let _ = writeln!(out, "{}", rule(AVERAGES_RULE_WIDTH));
        }
    }

    let _ = writeln!(out);
    out
}

/// Print the ranking and averages tables to stdout
pub fn print_table(
    ranked: &[CoinProfitability],
    fiat_currency: &str,
    current_ticker: &str,
    averages: &[CoinAverage],
    mined: &MinedAverage,
    hashrate: u64,
) {
    print!(
        "{}",
        render_table(ranked, fiat_currency, current_ticker, averages, mined, hashrate)
    );
}
