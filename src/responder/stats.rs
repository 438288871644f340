//! Responder packet counters

use std::time::{Duration, Instant};

/// Counters for the responder receive loop.
///
/// The loop is single-threaded, so plain integers are enough.
#[derive(Debug, Clone)]
pub struct ResponderStats {
    pub packets_received: u64,
    pub replies_sent: u64,
    pub malformed: u64,
    pub errors: u64,
    start_time: Instant,
}

impl ResponderStats {
    pub fn new() -> Self {
        Self {
            packets_received: 0,
            replies_sent: 0,
            malformed: 0,
            errors: 0,
            start_time: Instant::now(),
        }
    }

    #[inline]
    pub fn increment_received(&mut self) {
        self.packets_received += 1;
    }

    #[inline]
    pub fn increment_sent(&mut self) {
        self.replies_sent += 1;
    }

    #[inline]
    pub fn increment_malformed(&mut self) {
        self.malformed += 1;
    }

    #[inline]
    pub fn increment_error(&mut self) {
        self.errors += 1;
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

impl Default for ResponderStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let mut stats = ResponderStats::new();

        stats.increment_received();
        stats.increment_received();
        stats.increment_sent();
        stats.increment_malformed();
        stats.increment_error();

        assert_eq!(stats.packets_received, 2);
        assert_eq!(stats.replies_sent, 1);
        assert_eq!(stats.malformed, 1);
        assert_eq!(stats.errors, 1);
        assert!(stats.elapsed() < Duration::from_secs(60));
    }
}
