//! Sleep timer
//!
//! Counts down to a deadline and fires once. Time is passed in by the
//! caller so the timer can be driven by any clock.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default)]
pub struct SleepTimer {
    deadline: Option<Instant>,
}

impl SleepTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the countdown
    pub fn start(&mut self, duration: Duration, now: Instant) {
        self.deadline = Some(now + duration);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_running(&self) -> bool {
        self.deadline.is_some()
    }

    /// Time left, or `None` if the timer is not running
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Returns true exactly once, when the deadline has passed
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once() {
        let start = Instant::now();
        let mut timer = SleepTimer::new();
        timer.start(Duration::from_secs(60), start);

        assert!(!timer.poll(start + Duration::from_secs(59)));
        assert_eq!(
            timer.remaining(start + Duration::from_secs(20)),
            Some(Duration::from_secs(40))
        );
        assert!(timer.poll(start + Duration::from_secs(61)));
        assert!(!timer.poll(start + Duration::from_secs(62)));
        assert!(!timer.is_running());
    }

    #[test]
    fn cancel_stops_countdown() {
        let start = Instant::now();
        let mut timer = SleepTimer::new();
        timer.start(Duration::from_secs(1), start);
        timer.cancel();
        assert!(!timer.poll(start + Duration::from_secs(5)));
        assert_eq!(timer.remaining(start), None);
    }
}
