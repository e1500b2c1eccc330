//! Wall-clock sampling and the minute-boundary refresh deadline.
//!
//! The controller never reads the system clock directly. It asks a
//! [`TimeSource`] for a [`ClockSample`], which keeps ticks deterministic
//! under test.

use std::cell::Cell;
use std::time::Duration;

use chrono::{Local, NaiveTime};
use verseclock_types::ClockSample;

/// Seconds in one minute.
const SECONDS_PER_MINUTE: u32 = 60;

/// A source of twelve-hour clock samples.
pub trait TimeSource {
    /// Sample the current time of day.
    fn now(&self) -> ClockSample;
}

/// Reads the local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTimeSource;

impl TimeSource for LocalTimeSource {
    fn now(&self) -> ClockSample {
        ClockSample::from_time(&Local::now())
    }
}

/// Always reports a preset time until told otherwise.
#[derive(Debug, Clone)]
pub struct FixedTimeSource {
    sample: Cell<ClockSample>,
}

impl FixedTimeSource {
    /// Fix the clock at `time`.
    pub fn new(time: NaiveTime) -> Self {
        Self {
            sample: Cell::new(ClockSample::from_time(&time)),
        }
    }

    /// Move the clock to `time`.
    pub fn set(&self, time: NaiveTime) {
        self.sample.set(ClockSample::from_time(&time));
    }
}

impl TimeSource for FixedTimeSource {
    fn now(&self) -> ClockSample {
        self.sample.get()
    }
}

/// Seconds remaining until the next minute boundary.
///
/// At second 0 this is a full 60 seconds: the boundary that was just
/// crossed does not count.
pub const fn seconds_until_next_minute(sample: &ClockSample) -> u32 {
    SECONDS_PER_MINUTE.saturating_sub(sample.second)
}

/// Delay until the next full refresh should fire.
pub fn refresh_delay(sample: &ClockSample) -> Duration {
    Duration::from_secs(u64::from(seconds_until_next_minute(sample)))
}
