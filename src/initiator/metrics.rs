//! Per-exchange offset, asymmetry and skew arithmetic

use tracing::debug;

/// Local:remote percentage split reduced to lowest terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AsymmetryRatio {
    pub local: u32,
    pub remote: u32,
}

impl AsymmetryRatio {
    /// Reduce `local : remote` by their greatest common divisor.
    ///
    /// `0 : 0` has no divisor and is passed through unchanged.
    pub fn simplify(local: u32, remote: u32) -> Self {
        let divisor = gcd(local, remote);
        if divisor == 0 {
            return Self { local, remote };
        }
        Self {
            local: local / divisor,
            remote: remote / divisor,
        }
    }
}

pub fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Quantities derived from one completed exchange.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExchangeMetrics {
    /// Round-trip time in microseconds
    pub rtt_us: i64,
    /// Responder receive time minus local clock after receipt, in microseconds
    pub local_offset_us: i64,
    /// Offset computed by the responder, as received (before clamping)
    pub remote_offset_us: i64,
    pub local_pct: u32,
    pub remote_pct: u32,
    pub ratio: AsymmetryRatio,
    pub skew_ms: f64,
    /// `(remote_pct - local_pct) / 100`
    pub chrony_delta: f64,
}

impl ExchangeMetrics {
    pub fn compute(rtt_us: i64, local_offset_us: i64, remote_offset_us: i64) -> Self {
        let rtt_ms = to_ms(rtt_us);
        let local_ms = to_ms(local_offset_us);
        let remote_ms = to_ms(remote_offset_us);

        // Guards the total against zero only; negative remote offsets count as 1.
        let clamped_remote = remote_offset_us.max(1);
        let total = local_offset_us.unsigned_abs() + clamped_remote.unsigned_abs();
        let local_pct = percent_of(local_offset_us, total);
        let remote_pct = percent_of(clamped_remote, total);

        let ratio = AsymmetryRatio::simplify(local_pct, remote_pct);
        let skew_ms = rtt_ms - (local_ms + remote_ms);
        let chrony_delta = f64::from(remote_pct) / 100.0 - f64::from(local_pct) / 100.0;

        debug!(
            rtt_us,
            local_offset_us,
            remote_offset_us,
            local_pct,
            remote_pct,
            chrony_delta,
            "Exchange metrics computed"
        );

        Self {
            rtt_us,
            local_offset_us,
            remote_offset_us,
            local_pct,
            remote_pct,
            ratio,
            skew_ms,
            chrony_delta,
        }
    }

    pub fn rtt_ms(&self) -> f64 {
        to_ms(self.rtt_us)
    }

    pub fn local_offset_ms(&self) -> f64 {
        to_ms(self.local_offset_us)
    }

    pub fn remote_offset_ms(&self) -> f64 {
        to_ms(self.remote_offset_us)
    }
}

pub(crate) fn to_ms(micros: i64) -> f64 {
    micros as f64 / 1000.0
}

// Half-to-even rounding, then magnitude.
fn percent_of(value: i64, total: u64) -> u32 {
    let pct = (value as f64 / total as f64 * 100.0)
        .round_ties_even()
        .abs();
    pct as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gcd() {
        assert_eq!(gcd(50, 50), 50);
        assert_eq!(gcd(60, 40), 20);
        assert_eq!(gcd(0, 100), 100);
        assert_eq!(gcd(100, 0), 100);
        assert_eq!(gcd(0, 0), 0);
    }

    #[test]
    fn test_ratio_simplify() {
        assert_eq!(
            AsymmetryRatio::simplify(60, 40),
            AsymmetryRatio { local: 3, remote: 2 }
        );
        assert_eq!(
            AsymmetryRatio::simplify(0, 100),
            AsymmetryRatio { local: 0, remote: 1 }
        );
        assert_eq!(
            AsymmetryRatio::simplify(0, 0),
            AsymmetryRatio { local: 0, remote: 0 }
        );
    }

    #[test]
    fn test_near_even_split() {
        let metrics = ExchangeMetrics::compute(100, -51, 50);
        assert_eq!(metrics.local_pct, 50);
        assert_eq!(metrics.remote_pct, 50);
        assert_eq!(metrics.ratio, AsymmetryRatio { local: 1, remote: 1 });
        assert_eq!(metrics.chrony_delta, 0.0);
        assert!((metrics.skew_ms - 0.101).abs() < 1e-9);
    }

    #[test]
    fn test_uneven_split() {
        let metrics = ExchangeMetrics::compute(2_000, 300, 700);
        assert_eq!(metrics.local_pct, 30);
        assert_eq!(metrics.remote_pct, 70);
        assert_eq!(metrics.ratio, AsymmetryRatio { local: 3, remote: 7 });
        assert!((metrics.chrony_delta - 0.4).abs() < 1e-9);
        assert!((metrics.skew_ms - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_ties_round_to_even() {
        // 1/8 * 100 = 12.5 and 7/8 * 100 = 87.5
        let metrics = ExchangeMetrics::compute(0, 1, 7);
        assert_eq!(metrics.local_pct, 12);
        assert_eq!(metrics.remote_pct, 88);
    }

    #[test]
    fn test_zero_offsets_use_clamped_remote() {
        let metrics = ExchangeMetrics::compute(10, 0, 0);
        assert_eq!(metrics.local_pct, 0);
        assert_eq!(metrics.remote_pct, 100);
        assert_eq!(metrics.ratio, AsymmetryRatio { local: 0, remote: 1 });
        assert_eq!(metrics.chrony_delta, 1.0);
    }

    #[test]
    fn test_negative_remote_is_clamped_for_percentages_only() {
        let metrics = ExchangeMetrics::compute(1_000, 99, -500);
        assert_eq!(metrics.local_pct, 99);
        assert_eq!(metrics.remote_pct, 1);
        assert_eq!(metrics.remote_offset_us, -500);
        assert!((metrics.remote_offset_ms() + 0.5).abs() < 1e-9);
        assert!((metrics.skew_ms - (1.0 - (0.099 - 0.5))).abs() < 1e-9);
    }
}
