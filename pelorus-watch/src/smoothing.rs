//! Time-windowed averaging for the speed and course channels.
//!
//! Raw RMC speed and course jitter with every fix; the display and the
//! logbook want a short moving average instead. Each channel keeps its
//! samples in arrival order and drops everything older than the window
//! width relative to the newest sample, so the deque never grows beyond
//! the feed rate times the width.

use std::collections::VecDeque;

/// A bounded window of (timestamp, value) samples with an arithmetic
/// mean. Timestamps are seconds on any monotonic-enough scale; the
/// engine feeds Unix seconds.
#[derive(Debug, Clone)]
pub struct SlidingWindow {
    width_seconds: f64,
    samples: VecDeque<(f64, f64)>,
}

impl SlidingWindow {
    pub fn new(width_seconds: f64) -> Self {
        Self {
            width_seconds,
            samples: VecDeque::new(),
        }
    }

    pub fn width_seconds(&self) -> f64 {
        self.width_seconds
    }

    /// Appends a sample and evicts everything older than the window.
    pub fn push(&mut self, timestamp_seconds: f64, value: f64) {
        self.samples.push_back((timestamp_seconds, value));
        let cutoff = timestamp_seconds - self.width_seconds;
        while self
            .samples
            .front()
            .is_some_and(|(t, _)| *t < cutoff)
        {
            self.samples.pop_front();
        }
    }

    /// Mean of the surviving samples, or 0.0 when empty.
    pub fn mean(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().map(|(_, v)| v).sum::<f64>() / self.samples.len() as f64
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_window_averages_to_zero() {
        let window = SlidingWindow::new(20.0);
        assert_eq!(window.mean(), 0.0);
        assert!(window.is_empty());
    }

    #[test]
    fn eviction_keeps_only_the_window() {
        // Samples at t = 0, 5, 10, 15, 20, 25 with a 20 s window: after
        // the insert at t = 25 nothing older than t = 5 may remain.
        let mut window = SlidingWindow::new(20.0);
        for t in [0.0, 5.0, 10.0, 15.0, 20.0, 25.0] {
            window.push(t, t);
        }
        assert_eq!(window.len(), 5);
        assert!((window.mean() - (5.0 + 10.0 + 15.0 + 20.0 + 25.0) / 5.0).abs() < 1e-12);
    }

    #[test]
    fn boundary_sample_survives() {
        let mut window = SlidingWindow::new(20.0);
        window.push(0.0, 1.0);
        window.push(20.0, 3.0);
        // t = 0 is exactly width old, not older.
        assert_eq!(window.len(), 2);
        assert!((window.mean() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn mean_of_constant_series() {
        let mut window = SlidingWindow::new(20.0);
        for t in 0..10 {
            window.push(t as f64, 7.5);
        }
        assert!((window.mean() - 7.5).abs() < 1e-12);
    }

    #[test]
    fn clear_empties_the_window() {
        let mut window = SlidingWindow::new(20.0);
        window.push(1.0, 2.0);
        window.clear();
        assert!(window.is_empty());
        assert_eq!(window.mean(), 0.0);
    }
}
