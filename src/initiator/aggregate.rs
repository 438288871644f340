use crate::initiator::metrics::{AsymmetryRatio, ExchangeMetrics};
use tracing::debug;

/// Median-based summary over all completed exchanges of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub exchanges: usize,
    /// Median of the per-exchange chrony deltas
    pub median_adjustment: f64,
    pub median_rtt_ms: f64,
    pub local_percentage: f64,
    pub remote_percentage: f64,
    /// Reduced from the last exchange's raw percentages, not from the
    /// summary percentages above.
    pub ratio: AsymmetryRatio,
}

/// Running collection of per-exchange values for one initiator run
#[derive(Debug, Clone, Default)]
pub struct Aggregate {
    adjustments: Vec<f64>,
    rtts_us: Vec<i64>,
    last_split: Option<(u32, u32)>,
}

impl Aggregate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, metrics: &ExchangeMetrics) {
        self.adjustments.push(metrics.chrony_delta);
        self.rtts_us.push(metrics.rtt_us);
        self.last_split = Some((metrics.local_pct, metrics.remote_pct));
    }

    pub fn len(&self) -> usize {
        self.adjustments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjustments.is_empty()
    }

    /// Summarise the collected exchanges, or `None` when nothing completed.
    pub fn summarize(&self) -> Option<Summary> {
        let (last_local, last_remote) = self.last_split?;
        let median_adjustment = median(&self.adjustments)?;
        let rtts: Vec<f64> = self.rtts_us.iter().map(|&rtt| rtt as f64).collect();
        let median_rtt_ms = median(&rtts)? / 1000.0;

        let remote_percentage = 50.0 + median_adjustment * 100.0 / 2.0;
        let local_percentage = 100.0 - remote_percentage;

        debug!(
            exchanges = self.len(),
            median_adjustment,
            median_rtt_ms,
            "Summary computed"
        );

        Some(Summary {
            exchanges: self.len(),
            median_adjustment,
            median_rtt_ms,
            local_percentage,
            remote_percentage,
            ratio: AsymmetryRatio::simplify(last_local, last_remote),
        })
    }
}

/// Median of `values`; even counts average the two middle values.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}
