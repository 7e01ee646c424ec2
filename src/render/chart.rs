//! Scan-line chart of fiat profitability over the retained history.
//!
//! Each column is one snapshot, each row a value band; row 0 is the top of
//! the value range. Consecutive samples of a coin are joined with rounded
//! box-drawing corners and vertical runs.

use super::format::{coin_color, COLOR_BOLD, COLOR_DIM, COLOR_RESET};
use crate::models::Snapshot;
use chrono::{Local, TimeZone};
use std::collections::BTreeSet;
use std::fmt::Write;
use std::ops::Range;

pub const CHART_HEIGHT: usize = 15;
pub const CHART_WIDTH: usize = 60;

pub const GLYPH_BLANK: char = ' ';
pub const GLYPH_FLAT: char = '─';
pub const GLYPH_VERTICAL: char = '│';
pub const GLYPH_RISE_ARRIVE: char = '╭';
pub const GLYPH_RISE_DEPART: char = '╯';
pub const GLYPH_FALL_ARRIVE: char = '╰';
pub const GLYPH_FALL_DEPART: char = '╮';
pub const GLYPH_MINING: char = '●';
pub const GLYPH_SWITCH: char = '┊';

/// One character of the chart body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub glyph: char,
    pub color: Option<&'static str>,
}

impl Cell {
    const BLANK: Cell = Cell {
        glyph: GLYPH_BLANK,
        color: None,
    };

    pub fn is_blank(&self) -> bool {
        self.glyph == GLYPH_BLANK
    }
}

/// Glyphs joining a sample at `from_row` in the previous column to one at `to_row`.
///
/// `origin` and `fill` only go into blank cells; `destination` is always drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connector {
    pub origin: Option<(usize, char)>,
    pub fill: Range<usize>,
    pub destination: char,
}

pub fn connector(from_row: usize, to_row: usize) -> Connector {
    if to_row < from_row {
        Connector {
            origin: Some((from_row, GLYPH_RISE_DEPART)),
            fill: to_row + 1..from_row,
            destination: GLYPH_RISE_ARRIVE,
        }
    } else if to_row > from_row {
        Connector {
            origin: Some((from_row, GLYPH_FALL_DEPART)),
            fill: from_row + 1..to_row,
            destination: GLYPH_FALL_ARRIVE,
        }
    } else {
        Connector {
            origin: None,
            fill: to_row..to_row,
            destination: GLYPH_FLAT,
        }
    }
}

/// Value range mapped onto the chart rows
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub min: f64,
    pub max: f64,
    pub range: f64,
}

impl Scale {
    /// Fit every fiat value in `snapshots`, with 5% headroom and a zero floor for positive data
    pub fn fit(snapshots: &[Snapshot]) -> Self {
        let (mut min, mut max) = snapshots
            .iter()
            .flat_map(|s| s.values.values().copied())
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
                None => Some((v, v)),
            })
            .unwrap_or((0.0, 0.0));

        let mut range = max - min;
        if range == 0.0 {
            range = 1.0;
        }
        max += range * 0.05;
        if min > 0.0 {
            min = 0.0;
        }
        range = max - min;
        if range <= 0.0 {
            range = 1.0;
        }

        Self { min, max, range }
    }

    /// Row for `value`; 0 is the top (max), `height - 1` the bottom (min)
    pub fn row(&self, value: f64, height: usize) -> usize {
        let last = height.saturating_sub(1) as f64;
        let row = (last * (1.0 - (value - self.min) / self.range)).round();
        row.clamp(0.0, last) as usize
    }

    /// Value shown on the axis at `row`
    pub fn label(&self, row: usize, height: usize) -> f64 {
        let last = height.saturating_sub(1).max(1) as f64;
        self.max - row as f64 / last * self.range
    }
}

/// Chart body, `height` rows by one column per snapshot
#[derive(Debug, Clone)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
    width: usize,
}

impl Grid {
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            rows: vec![vec![Cell::BLANK; width]; height],
            width,
        }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.rows[row][col]
    }

    /// Glyphs of one column, top to bottom
    pub fn column(&self, col: usize) -> Vec<char> {
        self.rows.iter().map(|r| r[col].glyph).collect()
    }

    fn set(&mut self, row: usize, col: usize, glyph: char, color: &'static str) {
        self.rows[row][col] = Cell {
            glyph,
            color: Some(color),
        };
    }

    fn set_if_blank(&mut self, row: usize, col: usize, glyph: char, color: &'static str) {
        if self.rows[row][col].is_blank() {
            self.set(row, col, glyph, color);
        }
    }
}

/// Every ticker with a fiat value in any snapshot, sorted
pub fn collect_tickers(snapshots: &[Snapshot]) -> Vec<String> {
    snapshots
        .iter()
        .flat_map(|s| s.values.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Plot `tickers` (colored by their index) over `snapshots`, then overlay switch markers
pub fn build_grid(snapshots: &[Snapshot], tickers: &[String], scale: &Scale, height: usize) -> Grid {
    let mut grid = Grid::new(height, snapshots.len());

    for (index, ticker) in tickers.iter().enumerate() {
        let color = coin_color(index);
        let mut previous_row: Option<usize> = None;

        for (col, snapshot) in snapshots.iter().enumerate() {
            let Some(value) = snapshot.values.get(ticker) else {
                previous_row = None;
                continue;
            };
            let row = scale.row(*value, height);

            let mut glyph = GLYPH_FLAT;
            if let Some(from_row) = previous_row {
                let joint = connector(from_row, row);
                if let Some((origin_row, origin_glyph)) = joint.origin {
                    grid.set_if_blank(origin_row, col, origin_glyph, color);
                }
                for r in joint.fill {
                    grid.set_if_blank(r, col, GLYPH_VERTICAL, color);
                }
                glyph = joint.destination;
            }

            if snapshot.is_mining(ticker) {
                glyph = GLYPH_MINING;
            }
            grid.set(row, col, glyph, color);
            previous_row = Some(row);
        }
    }

    for (col, snapshot) in snapshots.iter().enumerate() {
        if snapshot.switched {
            for row in 0..height {
                grid.set_if_blank(row, col, GLYPH_SWITCH, COLOR_DIM);
            }
        }
    }

    grid
}

/// Start and end time labels, the end one right-aligned to `width`
pub fn time_axis(first: &str, last: &str, width: usize) -> String {
    let pad = width.saturating_sub(first.len() + last.len()).max(1);
    format!("{}{}{}", first, " ".repeat(pad), last)
}

/// Render the most recent `CHART_WIDTH` snapshots in local time; empty when fewer than two exist
pub fn render_chart(snapshots: &[Snapshot], fiat_currency: &str) -> String {
    render_chart_in(snapshots, fiat_currency, &Local)
}

/// Same as [`render_chart`] with time labels shown in `tz`
pub fn render_chart_in<Tz>(snapshots: &[Snapshot], fiat_currency: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    if snapshots.len() < 2 {
        return String::new();
    }

    let tickers = collect_tickers(snapshots);
    let window = &snapshots[snapshots.len().saturating_sub(CHART_WIDTH)..];
    let scale = Scale::fit(window);
    let grid = build_grid(window, &tickers, &scale, CHART_HEIGHT);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "\n  {}Profitability Chart ({}/day){}",
        COLOR_BOLD,
        fiat_currency.to_uppercase(),
        COLOR_RESET
    );

    for row in 0..grid.height() {
        if row == 0 || row == grid.height() - 1 || row == grid.height() / 2 {
            let _ = write!(out, "  {:10.6} │", scale.label(row, grid.height()));
        } else {
            out.push_str("             │");
        }
        for col in 0..grid.width() {
            let cell = grid.get(row, col);
            match cell.color {
                Some(color) => {
                    let _ = write!(out, "{}{}{}", color, cell.glyph, COLOR_RESET);
                }
                None => out.push(cell.glyph),
            }
        }
        out.push('\n');
    }

    let _ = writeln!(out, "             └{}", GLYPH_FLAT.to_string().repeat(grid.width()));

    if let (Some(first), Some(last)) = (window.first(), window.last()) {
        let first = first.timestamp.with_timezone(tz).format("%H:%M").to_string();
        let last = last.timestamp.with_timezone(tz).format("%H:%M").to_string();
        let _ = writeln!(out, "              {}", time_axis(&first, &last, grid.width()));
    }

    out.push_str("  ");
    for (index, ticker) in tickers.iter().enumerate() {
        let _ = write!(out, " {}{}{} {}", coin_color(index), GLYPH_MINING, COLOR_RESET, ticker);
    }
    let _ = writeln!(out, "   {}{}{} = switch\n", COLOR_DIM, GLYPH_SWITCH, COLOR_RESET);

    out
}

/// Print the history chart to stdout
pub fn print_chart(snapshots: &[Snapshot], fiat_currency: &str) {
    let chart = render_chart(snapshots, fiat_currency);
    if !chart.is_empty() {
        print!("{}", chart);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn snap(minute: i64, coins: &[(&str, f64)]) -> Snapshot {
        let time = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap() + Duration::minutes(minute);
        coins
            .iter()
            .fold(Snapshot::new(time), |s, (t, v)| s.with_coin(t, *v, 0.0))
    }

    #[test]
    fn test_connector_rising() {
        let joint = connector(10, 3);
        assert_eq!(joint.origin, Some((10, GLYPH_RISE_DEPART)));
        assert_eq!(joint.destination, GLYPH_RISE_ARRIVE);
        assert_eq!(joint.fill, 4..10);
        assert_eq!(joint.fill.len(), 6);
    }

    #[test]
    fn test_connector_falling() {
        let joint = connector(2, 5);
        assert_eq!(joint.origin, Some((2, GLYPH_FALL_DEPART)));
        assert_eq!(joint.destination, GLYPH_FALL_ARRIVE);
        assert_eq!(joint.fill.collect::<Vec<_>>(), vec![3, 4]);
    }

    #[test]
    fn test_connector_adjacent_and_flat() {
        let joint = connector(4, 3);
        assert!(joint.fill.is_empty());
        assert_eq!(joint.origin, Some((4, GLYPH_RISE_DEPART)));

        let joint = connector(7, 7);
        assert_eq!(joint.origin, None);
        assert!(joint.fill.is_empty());
        assert_eq!(joint.destination, GLYPH_FLAT);
    }

    #[test]
    fn test_scale_zero_floor_and_headroom() {
        let scale = Scale::fit(&[snap(0, &[("ETC", 40.0)]), snap(1, &[("ETC", 60.0)])]);
        assert_eq!(scale.min, 0.0);
        assert!((scale.max - 61.0).abs() < 1e-9);
        assert!((scale.range - 61.0).abs() < 1e-9);
        assert_eq!(scale.row(scale.max, CHART_HEIGHT), 0);
        assert_eq!(scale.row(0.0, CHART_HEIGHT), CHART_HEIGHT - 1);
    }

    #[test]
    fn test_scale_flat_and_empty_data() {
        let scale = Scale::fit(&[snap(0, &[("ETC", 0.0)]), snap(1, &[("ETC", 0.0)])]);
        assert!(scale.range > 0.0);

        let scale = Scale::fit(&[snap(0, &[]), snap(1, &[])]);
        assert!(scale.range > 0.0);
        assert!(scale.row(0.0, CHART_HEIGHT) < CHART_HEIGHT);
    }

    #[test]
    fn test_scale_negative_min_kept() {
        let scale = Scale::fit(&[snap(0, &[("ETC", -10.0)]), snap(1, &[("ETC", 10.0)])]);
        assert_eq!(scale.min, -10.0);
        assert_eq!(scale.row(-1000.0, CHART_HEIGHT), CHART_HEIGHT - 1);
        assert_eq!(scale.row(1000.0, CHART_HEIGHT), 0);
    }

    #[test]
    fn test_rising_line_fill_count() {
        // A pins the top of the range; X rises from row 10 to row 3
        let snapshots = vec![
            snap(0, &[("A", 100.0), ("X", 30.0)]),
            snap(1, &[("A", 100.0), ("X", 81.0)]),
        ];
        let tickers = collect_tickers(&snapshots);
        let scale = Scale::fit(&snapshots);
        assert_eq!(scale.row(30.0, CHART_HEIGHT), 10);
        assert_eq!(scale.row(81.0, CHART_HEIGHT), 3);

        let grid = build_grid(&snapshots, &tickers, &scale, CHART_HEIGHT);
        let column = grid.column(1);
        assert_eq!(column[3], GLYPH_RISE_ARRIVE);
        assert_eq!(column[10], GLYPH_RISE_DEPART);
        assert_eq!(column.iter().filter(|g| **g == GLYPH_VERTICAL).count(), 6);
        for row in 4..=9 {
            assert_eq!(column[row], GLYPH_VERTICAL);
            assert_eq!(grid.get(row, 1).color, Some(coin_color(1)));
        }
    }

    #[test]
    fn test_mining_marker_and_switch_overlay() {
        let snapshots = vec![
            snap(0, &[("ETC", 10.0), ("RVN", 5.0)]).with_active("RVN", false),
            snap(1, &[("ETC", 10.0), ("RVN", 5.0)]).with_active("ETC", true),
        ];
        let tickers = collect_tickers(&snapshots);
        let scale = Scale::fit(&snapshots);
        let grid = build_grid(&snapshots, &tickers, &scale, CHART_HEIGHT);

        let etc_row = scale.row(10.0, CHART_HEIGHT);
        let rvn_row = scale.row(5.0, CHART_HEIGHT);

        assert_eq!(grid.get(rvn_row, 0).glyph, GLYPH_MINING);
        assert_eq!(grid.get(etc_row, 0).glyph, GLYPH_FLAT);
        assert_eq!(grid.get(etc_row, 1).glyph, GLYPH_MINING);
        assert_eq!(grid.get(etc_row, 1).color, Some(coin_color(0)));
        assert_eq!(grid.get(rvn_row, 1).glyph, GLYPH_FLAT);

        // Switch markers fill only blank cells of the switched column
        for row in 0..CHART_HEIGHT {
            let cell = grid.get(row, 1);
            if row == etc_row || row == rvn_row {
                assert_ne!(cell.glyph, GLYPH_SWITCH);
            } else {
                assert_eq!(cell.glyph, GLYPH_SWITCH);
                assert_eq!(cell.color, Some(COLOR_DIM));
            }
        }
        assert!(grid.column(0).iter().all(|g| *g != GLYPH_SWITCH));
    }

    #[test]
    fn test_gap_breaks_line() {
        let snapshots = vec![
            snap(0, &[("ETC", 10.0)]),
            snap(1, &[("RVN", 1.0)]),
            snap(2, &[("ETC", 1.0), ("RVN", 1.0)]),
        ];
        let tickers = collect_tickers(&snapshots);
        let scale = Scale::fit(&snapshots);
        let grid = build_grid(&snapshots, &tickers, &scale, CHART_HEIGHT);

        let row = scale.row(1.0, CHART_HEIGHT);
        assert_eq!(grid.get(row, 2).glyph, GLYPH_FLAT);
        assert!(grid.column(2).iter().all(|g| *g != GLYPH_VERTICAL));
    }

    #[test]
    fn test_render_requires_two_samples() {
        assert!(render_chart(&[], "usd").is_empty());
        assert!(render_chart(&[snap(0, &[("ETC", 1.0)])], "usd").is_empty());
    }

    #[test]
    fn test_render_window_and_legend() {
        let snapshots: Vec<Snapshot> = (0..75)
            .map(|i| snap(i, &[("ETC", 1.0 + i as f64), ("RVN", 2.0)]))
            .collect();
        let chart = render_chart(&snapshots, "eur");

        assert!(chart.contains("Profitability Chart (EUR/day)"));
        assert!(chart.contains(&format!("└{}", "─".repeat(CHART_WIDTH))));
        assert!(chart.contains(" ETC"));
        assert!(chart.contains(" RVN"));
        assert!(chart.contains("= switch"));
        assert_eq!(chart.lines().filter(|l| l.contains('│')).count(), CHART_HEIGHT);
    }

    #[test]
    fn test_time_axis_right_aligns_end_label() {
        assert_eq!(time_axis("12:15", "13:14", CHART_WIDTH), format!("12:15{}13:14", " ".repeat(50)));
        assert_eq!(time_axis("12:15", "13:14", CHART_WIDTH).chars().count(), CHART_WIDTH);
        assert_eq!(time_axis("12:00", "12:01", 4), "12:00 12:01");
    }

    #[test]
    fn test_time_labels_use_given_zone() {
        let snapshots: Vec<Snapshot> = (0..75).map(|i| snap(i, &[("ETC", 1.0)])).collect();
        let chart = render_chart_in(&snapshots, "usd", &Utc);

        let labels = chart
            .lines()
            .find(|l| l.trim_start().starts_with("12:15"))
            .expect("time label line");
        assert_eq!(labels, format!("              12:15{}13:14", " ".repeat(50)));

        // Narrow windows still keep one space between the labels
        let short = render_chart_in(&snapshots[..3], "usd", &Utc);
        assert!(short.contains("              12:00 12:02\n"));
    }

    #[test]
    fn test_colors_stable_across_calls() {
        let first = collect_tickers(&[snap(0, &[("RVN", 1.0), ("ETC", 1.0)])]);
        let second = collect_tickers(&[snap(0, &[("ETC", 1.0)]), snap(1, &[("RVN", 2.0)])]);
        assert_eq!(first, second);
        assert_eq!(first, vec!["ETC".to_string(), "RVN".to_string()]);
    }
}
