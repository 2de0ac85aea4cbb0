//! FIFO latency simulation: every payload is stamped with a scheduled
//! release time and released once the clock reaches it.
//!
//! Relies on scheduled times being non-decreasing as entries are pushed
//! (true as long as `now_ns` is monotonic and jitter is drawn independently
//! per call) so `release_due` only ever has to look at the front of the
//! queue, never scan the whole line.

use rand_distr::{Distribution, Normal};
use std::collections::VecDeque;

pub struct DelayLine<T> {
    entries: VecDeque<(u128, T)>,
}

impl<T> DelayLine<T> {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }

    /// Draws `max(0, Normal(mean_ns, std_ns))` jitter and enqueues the
    /// payload for release at `now_ns + jitter`. Skips the RNG draw
    /// entirely when both latency parameters are zero, matching the
    /// reference simulator's zero-latency fast path.
    pub fn schedule(&mut self, now_ns: u128, mean_ns: f64, std_ns: f64, payload: T) {
        let jitter_ns = if mean_ns > 0.0 || std_ns > 0.0 {
            let normal = Normal::new(mean_ns, std_ns.max(0.0)).unwrap_or_else(|_| {
                Normal::new(mean_ns.max(0.0), 1.0).expect("fallback normal is always valid")
            });
            let mut rng = rand::thread_rng();
            normal.sample(&mut rng).max(0.0)
        } else {
            0.0
        };
        let scheduled_ns = now_ns + jitter_ns as u128;
        self.entries.push_back((scheduled_ns, payload));
    }

    /// Drains and returns every payload whose scheduled time has arrived.
    pub fn release_due(&mut self, now_ns: u128) -> Vec<T> {
        let mut released = Vec::new();
        while let Some((scheduled_ns, _)) = self.entries.front() {
            if *scheduled_ns > now_ns {
                break;
            }
            let (_, payload) = self.entries.pop_front().unwrap();
            released.push(payload);
        }
        released
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<T> Default for DelayLine<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_latency_releases_immediately() {
        let mut line = DelayLine::new();
        line.schedule(1000, 0.0, 0.0, "a");
        let released = line.release_due(1000);
        assert_eq!(released, vec!["a"]);
    }

    #[test]
    fn entries_wait_until_scheduled_time() {
        let mut line = DelayLine::new();
        line.schedule(1000, 0.0, 0.0, "a");
        // manually push a future entry to test the release boundary
        line.entries.push_back((5000, "b"));
        assert!(line.release_due(999).is_empty());
        let released = line.release_due(1000);
        assert_eq!(released, vec!["a"]);
        assert!(line.release_due(4999).is_empty());
        let released = line.release_due(5000);
        assert_eq!(released, vec!["b"]);
    }

    #[test]
    fn fifo_order_is_preserved_on_release() {
        let mut line: DelayLine<u32> = DelayLine::new();
        line.entries.push_back((100, 1));
        line.entries.push_back((100, 2));
        line.entries.push_back((200, 3));
        let released = line.release_due(200);
        assert_eq!(released, vec![1, 2, 3]);
    }

    #[test]
    fn empty_line_releases_nothing() {
        let mut line: DelayLine<u32> = DelayLine::new();
        assert!(line.release_due(1_000_000).is_empty());
        assert!(line.is_empty());
    }
}
