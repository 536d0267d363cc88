//! Round-trip time measurement
use bevy_ecs::component::Component;
use core::time::Duration;

/// Sends a ping to the room every `interval` and keeps the last measured round-trip time
#[derive(Component, Debug, Clone, PartialEq)]
pub struct PingTracker {
    pub interval: Duration,
    last_sent: Option<Duration>,
    rtt: Option<Duration>,
}

impl Default for PingTracker {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

impl PingTracker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_sent: None,
            rtt: None,
        }
    }

    /// Returns the timestamp to put in a ping if one is due at `now`
    pub fn poll(&mut self, now: Duration) -> Option<u64> {
        let due = self
            .last_sent
            .is_none_or(|last| now.saturating_sub(last) >= self.interval);
        if !due {
            return None;
        }
        self.last_sent = Some(now);
        Some(now.as_millis() as u64)
    }

    /// Record the pong echoing the ping sent at `sent_at_ms`
    pub fn record_pong(&mut self, sent_at_ms: u64, now: Duration) {
        let sent_at = Duration::from_millis(sent_at_ms);
        self.rtt = Some(now.saturating_sub(sent_at));
    }

    pub fn rtt(&self) -> Option<Duration> {
        self.rtt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_ping_schedule() {
        let mut tracker = PingTracker::new(Duration::from_secs(10));
        assert_eq!(tracker.poll(Duration::from_millis(500)), Some(500));
        assert_eq!(tracker.poll(Duration::from_secs(5)), None);
        assert_eq!(tracker.poll(Duration::from_millis(10_500)), Some(10_500));
    }

    #[test]
    fn test_rtt_from_pong() {
        let mut tracker = PingTracker::default();
        assert_eq!(tracker.rtt(), None);
        let sent = tracker.poll(Duration::from_secs(1)).unwrap();
        tracker.record_pong(sent, Duration::from_millis(1_080));
        assert_eq!(tracker.rtt(), Some(Duration::from_millis(80)));
    }
}
