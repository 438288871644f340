//! Initiator state carried from one exchange to the next

use crate::clock::Clock;
use crate::initiator::metrics::ExchangeMetrics;
use crate::protocol::{Probe, ProbeReply, NO_PRIOR_OFFSET};
use tracing::debug;

/// A probe that has been built and is awaiting its reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingExchange {
    pub probe: Probe,
}

/// One completed round trip with its derived metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exchange {
    pub probe: Probe,
    pub reply: ProbeReply,
    /// Local clock right after the reply was decoded
    pub recv_time: u64,
    pub metrics: ExchangeMetrics,
}

/// Builds probes and completes exchanges, threading the prior local offset
/// into each following probe.
#[derive(Debug)]
pub struct Session<C: Clock> {
    clock: C,
    prior_offset: i32,
}

impl<C: Clock> Session<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            prior_offset: NO_PRIOR_OFFSET,
        }
    }

    /// Offset the next probe will report.
    pub fn prior_offset(&self) -> i32 {
        self.prior_offset
    }

    /// Stamp a new probe with the current clock and the carried offset.
    pub fn begin(&self) -> PendingExchange {
        let probe = Probe::new(self.clock.now_micros(), self.prior_offset);
        debug!(
            send_time = probe.send_time,
            reported_offset = probe.reported_offset,
            "Probe built"
        );
        PendingExchange { probe }
    }

    /// Complete an exchange with the decoded reply.
    ///
    /// The local offset is taken against a second clock read, not against
    /// the receive timestamp used for the RTT.
    pub fn complete(&mut self, pending: PendingExchange, reply: ProbeReply) -> Exchange {
        let recv_time = self.clock.now_micros();
        let rtt_us = signed_diff(recv_time, pending.probe.send_time);
        let local_offset_us = signed_diff(reply.recv_time, self.clock.now_micros());
        let remote_offset_us = i64::from(reply.computed_offset);

        self.prior_offset = carried_offset(local_offset_us);

        Exchange {
            probe: pending.probe,
            reply,
            recv_time,
            metrics: ExchangeMetrics::compute(rtt_us, local_offset_us, remote_offset_us),
        }
    }
}

fn signed_diff(a: u64, b: u64) -> i64 {
    let diff = i128::from(a) - i128::from(b);
    diff.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

// Saturate into the wire field without landing on the sentinel.
fn carried_offset(local_offset_us: i64) -> i32 {
    local_offset_us.clamp(i64::from(i32::MIN), i64::from(NO_PRIOR_OFFSET) - 1) as i32
}
