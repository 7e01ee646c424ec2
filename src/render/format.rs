/// ANSI colors assigned to coins by their position in the sorted ticker set
pub const COIN_COLORS: [&str; 8] = [
    "\x1b[38;5;196m", // red
    "\x1b[38;5;46m",  // green
    "\x1b[38;5;33m",  // blue
    "\x1b[38;5;226m", // yellow
    "\x1b[38;5;208m", // orange
    "\x1b[38;5;201m", // magenta
    "\x1b[38;5;51m",  // cyan
    "\x1b[38;5;255m", // white
];

pub const COLOR_RESET: &str = "\x1b[0m";
pub const COLOR_DIM: &str = "\x1b[2m";
pub const COLOR_BOLD: &str = "\x1b[1m";

/// Color for the coin at `index` in the sorted ticker set
pub fn coin_color(index: usize) -> &'static str {
    COIN_COLORS[index % COIN_COLORS.len()]
}

/// Human-readable hashrate (H/s, KH/s, MH/s, GH/s, TH/s)
pub fn format_hashrate(hashrate: f64) -> String {
    match hashrate {
        h if h >= 1e12 => format!("{:.2} TH/s", h / 1e12),
        h if h >= 1e9 => format!("{:.2} GH/s", h / 1e9),
        h if h >= 1e6 => format!("{:.2} MH/s", h / 1e6),
        h if h >= 1e3 => format!("{:.2} KH/s", h / 1e3),
        h => format!("{:.0} H/s", h),
    }
}

/// Percentage by which `new` exceeds `old`; undefined unless `old` is positive
pub fn percent_gain(old: f64, new: f64) -> Option<f64> {
    (old > 0.0).then(|| (new - old) / old * 100.0)
}
