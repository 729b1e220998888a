//! Time source for the deploy scheduler
//!
//! The scheduler never reads the wall clock or sleeps directly; it goes
//! through [Clock] so tests can run a whole rollout on a [VirtualClock].

use chrono::{DateTime, Local, TimeDelta};
use std::sync::Mutex;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;

    /// Block for `duration`; non-positive durations return immediately
    fn sleep(&self, duration: TimeDelta);
}

/// Wall clock backed by [std::thread::sleep]
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn sleep(&self, duration: TimeDelta) {
        if let Ok(std_duration) = duration.to_std() {
            std::thread::sleep(std_duration);
        }
    }
}

/// Deterministic clock: `sleep` advances the current time instantly
#[derive(Debug)]
pub struct VirtualClock {
    now: Mutex<DateTime<Local>>,
    sleeps: Mutex<Vec<TimeDelta>>,
}

impl VirtualClock {
    pub fn new(start: DateTime<Local>) -> Self {
        VirtualClock {
            now: Mutex::new(start),
            sleeps: Mutex::new(Vec::new()),
        }
    }

    /// Move time forward without recording a sleep, e.g. to simulate a slow operator
    pub fn advance(&self, duration: TimeDelta) {
        let mut now = self.now.lock().unwrap();
        *now += duration;
    }

    /// Every duration passed to `sleep`, in call order
    pub fn sleeps(&self) -> Vec<TimeDelta> {
        self.sleeps.lock().unwrap().clone()
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock().unwrap()
    }

    fn sleep(&self, duration: TimeDelta) {
        self.sleeps.lock().unwrap().push(duration);
        if duration > TimeDelta::zero() {
            self.advance(duration);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_virtual_clock_sleep_advances_time() {
        let start = Local.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let clock = VirtualClock::new(start);

        clock.sleep(TimeDelta::minutes(10));
        clock.sleep(TimeDelta::seconds(30));

        assert_eq!(clock.now(), start + TimeDelta::seconds(630));
        assert_eq!(
            clock.sleeps(),
            vec![TimeDelta::minutes(10), TimeDelta::seconds(30)]
        );
    }

    #[test]
    fn test_virtual_clock_ignores_negative_sleep() {
        let start = Local.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let clock = VirtualClock::new(start);
        clock.sleep(TimeDelta::seconds(-5));
        assert_eq!(clock.now(), start);
    }

    #[test]
    fn test_system_clock_negative_sleep_returns() {
        SystemClock.sleep(TimeDelta::milliseconds(-1));
    }
}
