//! Bounded, persisted history of profitability snapshots.
//!
//! The store keeps at most `max_len` snapshots in chronological order and
//! evicts the oldest once full. Every operation takes the internal lock for
//! its full duration; callers get copies and do their I/O or rendering
//! outside the lock.

use crate::error::{AppError, AppResult};
use crate::models::{CoinAverage, MinedAverage, Snapshot};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// On-disk document layout
#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedHistory {
    snapshots: Vec<Snapshot>,
}

/// Thread-safe sliding window of snapshots
pub struct History {
    snapshots: Mutex<VecDeque<Snapshot>>,
    max_len: usize,
}

#[derive(Default)]
struct Accumulator {
    sum_fiat: f64,
    count: usize,
    sum_normalized: f64,
    normalized_count: usize,
}

impl History {
    /// Create an empty history holding at most `max_len` snapshots
    pub fn new(max_len: usize) -> Self {
        Self {
            snapshots: Mutex::new(VecDeque::with_capacity(max_len.min(4096))),
            max_len,
        }
    }

    pub fn capacity(&self) -> usize {
        self.max_len
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Snapshot>> {
        // A panic while holding the lock cannot leave the deque half-updated
        self.snapshots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a snapshot, evicting from the front once over capacity
    pub fn add(&self, snapshot: Snapshot) {
        let mut snapshots = self.lock();
        snapshots.push_back(snapshot);
        while snapshots.len() > self.max_len {
            snapshots.pop_front();
        }
    }

    /// Copy of every retained snapshot, oldest first
    pub fn all(&self) -> Vec<Snapshot> {
        self.lock().iter().cloned().collect()
    }

    /// Most recent snapshot, if any
    pub fn last(&self) -> Option<Snapshot> {
        self.lock().back().cloned()
    }

    /// Per-coin averages plus the average of what was actually mined.
    ///
    /// Coin averages are sorted by descending fiat mean, ties by ticker.
    pub fn averages(&self) -> (Vec<CoinAverage>, MinedAverage) {
        let snapshots = self.lock();

        let mut accumulators: HashMap<&str, Accumulator> = HashMap::new();
        let mut mined = MinedAverage::default();

        for snapshot in snapshots.iter() {
            for (ticker, value) in &snapshot.values {
                let acc = accumulators.entry(ticker.as_str()).or_default();
                acc.sum_fiat += value;
                acc.count += 1;
            }
            for (ticker, value) in &snapshot.normalized_values {
                if let Some(acc) = accumulators.get_mut(ticker.as_str()) {
                    acc.sum_normalized += value;
                    acc.normalized_count += 1;
                }
            }

            if snapshot.active_ticker.is_empty() {
                continue;
            }
            if let Some(fiat) = snapshot.values.get(&snapshot.active_ticker) {
                mined.avg_fiat += fiat;
                mined.count += 1;
                if let Some(normalized) = snapshot.normalized_values.get(&snapshot.active_ticker) {
                    mined.avg_normalized += normalized;
                }
            }
        }

        let mut averages: Vec<CoinAverage> = accumulators
            .into_iter()
            .filter(|(_, acc)| acc.count > 0)
            .map(|(ticker, acc)| CoinAverage {
                ticker: ticker.to_string(),
                avg_fiat: acc.sum_fiat / acc.count as f64,
                avg_normalized: if acc.normalized_count > 0 {
                    acc.sum_normalized / acc.normalized_count as f64
                } else {
                    0.0
                },
                count: acc.count,
            })
            .collect();

        averages.sort_by(|a, b| {
            b.avg_fiat
                .total_cmp(&a.avg_fiat)
                .then_with(|| a.ticker.cmp(&b.ticker))
        });

        if mined.count > 0 {
            mined.avg_fiat /= mined.count as f64;
            mined.avg_normalized /= mined.count as f64;
        }

        (averages, mined)
    }

    /// Overwrite `path` with the full snapshot sequence
    pub fn save(&self, path: impl AsRef<Path>) -> AppResult<()> {
        let path = path.as_ref();
        let data = {
            let snapshots = self.lock();
            let document = PersistedHistory {
                snapshots: snapshots.iter().cloned().collect(),
            };
            serde_json::to_vec(&document)?
        };

        std::fs::write(path, data)?;
        debug!("Saved history to {}", path.display());
        Ok(())
    }

    /// Replace the contents with the snapshots stored at `path`, keeping the newest `max_len`.
    ///
    /// A missing file surfaces as an error for which `AppError::is_missing_file` holds.
    pub fn load(&self, path: impl AsRef<Path>) -> AppResult<usize> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let document: PersistedHistory = serde_json::from_slice(&data)
            .map_err(|e| AppError::Message(format!("Failed to parse history {}: {}", path.display(), e)))?;

        let mut loaded: VecDeque<Snapshot> = document.snapshots.into();
        while loaded.len() > self.max_len {
            loaded.pop_front();
        }

        let mut snapshots = self.lock();
        *snapshots = loaded;
        Ok(snapshots.len())
    }
}
