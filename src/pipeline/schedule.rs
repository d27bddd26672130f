//! Linear exploration schedule

use serde::{Deserialize, Serialize};

/// Linearly decaying ε.
///
/// With `episodes` planned and decay factor `decay`, ε drops by
/// `1 / (episodes * decay)` before every episode and never goes below the
/// minimum. A decay of `1.0` reaches zero (and so the floor) exactly at the
/// last episode; larger factors decay more slowly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpsilonSchedule {
    start: f64,
    min: f64,
    step: f64,
    current: f64,
}

impl EpsilonSchedule {
    pub fn new(start: f64, min: f64, decay: f64, episodes: usize) -> Self {
        Self {
            start,
            min,
            step: 1.0 / (episodes as f64 * decay),
            current: start,
        }
    }

    /// Amount subtracted per episode.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Last value handed out, or the start value before the first episode.
    pub fn current(&self) -> f64 {
        self.current
    }

    /// ε for the next episode.
    pub fn next_epsilon(&mut self) -> f64 {
        self.current = (self.current - self.step).max(self.min);
        self.current
    }

    /// Back to the start value, e.g. when moving on to another map.
    pub fn reset(&mut self) {
        self.current = self.start;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decrements_before_each_episode() {
        let mut schedule = EpsilonSchedule::new(0.9, 0.1, 1.0, 10);
        assert!((schedule.step() - 0.1).abs() < 1e-12);
        assert!((schedule.next_epsilon() - 0.8).abs() < 1e-12);
        assert!((schedule.next_epsilon() - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_clamps_at_minimum() {
        let mut schedule = EpsilonSchedule::new(0.5, 0.2, 0.5, 4);
        let values: Vec<f64> = (0..6).map(|_| schedule.next_epsilon()).collect();
        assert!((values[0] - 0.2).abs() < 1e-12);
        assert!(values.iter().all(|&epsilon| epsilon >= 0.2));
        assert_eq!(schedule.current(), 0.2);
    }

    #[test]
    fn test_reset_restores_start() {
        let mut schedule = EpsilonSchedule::new(0.9, 0.1, 0.8, 100);
        schedule.next_epsilon();
        schedule.reset();
        assert_eq!(schedule.current(), 0.9);
    }
}
