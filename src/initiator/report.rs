use crate::initiator::aggregate::Summary;
use crate::initiator::run::RunOutcome;
use crate::initiator::session::Exchange;
use colored::*;
use tracing::{debug, info, warn};

/// Console output for an initiator run
pub struct Reporter;

impl Reporter {
    /// One line per completed exchange.
    pub fn exchange_line(index: usize, exchange: &Exchange) -> String {
        let metrics = &exchange.metrics;
        format!(
            "Exchange {} - RTT: {:.2} ms, Local Offset: {:.2} ms,  Remote Offset: {:.2} ms,    \
             Asymmetry Ratio: {}/{} ({:.2}, {}:{}),    Skew: {:.2} ms",
            index,
            metrics.rtt_ms(),
            metrics.local_offset_ms(),
            metrics.remote_offset_ms(),
            metrics.local_pct,
            metrics.remote_pct,
            metrics.chrony_delta,
            metrics.ratio.local,
            metrics.ratio.remote,
            metrics.skew_ms,
        )
    }

    pub fn skipped_line(index: usize) -> String {
        format!("Exchange {}: No response received, skipping.", index)
    }

    /// Summary lines after the `---- MEDIANS:` heading.
    ///
    /// Percentages print with zero decimals; the bracketed ratio is the
    /// reduced split of the last exchange.
    pub fn summary_lines(summary: &Summary) -> Vec<String> {
        vec![
            format!("RTT: {:.2}", summary.median_rtt_ms),
            format!(
                "Ratio: {:.0}/{:.0} ({}:{})",
                summary.local_percentage,
                summary.remote_percentage,
                summary.ratio.local,
                summary.ratio.remote
            ),
            format!("Chrony offset: {:.5}", summary.median_adjustment),
        ]
    }

    pub fn print_exchange(index: usize, exchange: &Exchange) {
        println!("{}", Self::exchange_line(index, exchange));
    }

    pub fn print_skipped(index: usize) {
        println!("{}", Self::skipped_line(index).yellow());
    }

    pub fn print_cancelled() {
        println!("{}", "Cancelled by user".yellow());
    }

    /// Print the summary block, or nothing when no exchange completed.
    pub fn print_summary(outcome: &RunOutcome) {
        debug!(
            attempted = outcome.attempted,
            completed = outcome.completed(),
            lost = outcome.lost,
            cancelled = outcome.cancelled,
            "Printing run summary"
        );

        let Some(summary) = outcome.aggregate.summarize() else {
            warn!(attempted = outcome.attempted, "No exchanges completed");
            return;
        };

        info!(
            exchanges = summary.exchanges,
            median_adjustment = summary.median_adjustment,
            median_rtt_ms = summary.median_rtt_ms,
            "Run summary"
        );

        println!("\n{}", "---- MEDIANS:".bold());
        for line in Self::summary_lines(&summary) {
            println!("{}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::initiator::aggregate::Aggregate;
    use crate::initiator::metrics::ExchangeMetrics;
    use crate::protocol::{Probe, ProbeReply, NO_PRIOR_OFFSET};

    fn exchange(rtt_us: i64, local: i64, remote: i64) -> Exchange {
        Exchange {
            probe: Probe::new(1_000_000, NO_PRIOR_OFFSET),
            reply: ProbeReply::new(1_000_050, remote as i32),
            recv_time: 1_000_000 + rtt_us as u64,
            metrics: ExchangeMetrics::compute(rtt_us, local, remote),
        }
    }

    #[test]
    fn test_exchange_line() {
        let line = Reporter::exchange_line(3, &exchange(2_000, 300, 700));
        assert_eq!(
            line,
            "Exchange 3 - RTT: 2.00 ms, Local Offset: 0.30 ms,  Remote Offset: 0.70 ms,    \
             Asymmetry Ratio: 30/70 (0.40, 3:7),    Skew: 1.00 ms"
        );
    }

    #[test]
    fn test_skipped_line() {
        assert_eq!(
            Reporter::skipped_line(7),
            "Exchange 7: No response received, skipping."
        );
    }

    #[test]
    fn test_summary_lines() {
        let mut aggregate = Aggregate::new();
        aggregate.record(&exchange(1_500, 300, 700).metrics);
        let summary = aggregate.summarize().unwrap();

        assert_eq!(
            Reporter::summary_lines(&summary),
            vec![
                "RTT: 1.50".to_string(),
                "Ratio: 30/70 (3:7)".to_string(),
                "Chrony offset: 0.40000".to_string(),
            ]
        );
    }
}
