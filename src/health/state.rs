//! Backend health state machine.
//!
//! # State Transitions
//! ```text
//! Alive → Down:  consecutive failures >= unhealthy_threshold
//! Down  → Alive: consecutive successes >= healthy_threshold
//! ```
//!
//! Counters reset on every transition and on every opposite result, so a
//! single flapping probe never flips the state.

/// Hysteresis tracker for one backend. Starts alive.
#[derive(Debug, Clone)]
pub struct HealthState {
    alive: bool,
    consecutive_failures: u32,
    consecutive_successes: u32,
    unhealthy_threshold: u32,
    healthy_threshold: u32,
}

impl HealthState {
    pub fn new(unhealthy_threshold: u32, healthy_threshold: u32) -> Self {
        Self {
            alive: true,
            consecutive_failures: 0,
            consecutive_successes: 0,
            unhealthy_threshold: unhealthy_threshold.max(1),
            healthy_threshold: healthy_threshold.max(1),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Feed one probe result. Returns the new liveness when it changed.
    pub fn record(&mut self, success: bool) -> Option<bool> {
        if success {
            self.consecutive_failures = 0;
            if self.alive {
                return None;
            }
            self.consecutive_successes += 1;
            if self.consecutive_successes >= self.healthy_threshold {
                return Some(self.transition(true));
            }
        } else {
            self.consecutive_successes = 0;
            if !self.alive {
                return None;
            }
            self.consecutive_failures += 1;
            if self.consecutive_failures >= self.unhealthy_threshold {
                return Some(self.transition(false));
            }
        }
        None
    }

    fn transition(&mut self, alive: bool) -> bool {
        self.alive = alive;
        self.consecutive_failures = 0;
        self.consecutive_successes = 0;
        alive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_alive() {
        assert!(HealthState::new(3, 2).is_alive());
    }

    #[test]
    fn goes_down_after_threshold_failures() {
        let mut state = HealthState::new(3, 2);
        assert_eq!(state.record(false), None);
        assert_eq!(state.record(false), None);
        assert_eq!(state.record(false), Some(false));
        assert!(!state.is_alive());
        // Further failures are not transitions.
        assert_eq!(state.record(false), None);
    }

    #[test]
    fn success_resets_failure_streak() {
        let mut state = HealthState::new(2, 2);
        state.record(false);
        state.record(true);
        assert_eq!(state.record(false), None);
        assert!(state.is_alive());
    }

    #[test]
    fn recovers_after_threshold_successes() {
        let mut state = HealthState::new(1, 2);
        assert_eq!(state.record(false), Some(false));
        assert_eq!(state.record(true), None);
        assert_eq!(state.record(false), None);
        assert_eq!(state.record(true), None);
        assert_eq!(state.record(true), Some(true));
        assert!(state.is_alive());
    }

    #[test]
    fn zero_thresholds_behave_as_one() {
        let mut state = HealthState::new(0, 0);
        assert_eq!(state.record(false), Some(false));
        assert_eq!(state.record(true), Some(true));
    }
}
