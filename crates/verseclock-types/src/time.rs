//! Twelve-hour clock samples.
//!
//! A [`ClockSample`] is taken fresh from the wall clock on every tick and
//! thrown away once the display has been updated. It is never stored.

use std::fmt;

use chrono::Timelike;
use serde::{Deserialize, Serialize};

/// Half of the day a [`ClockSample`] falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Meridiem {
    /// Midnight up to (not including) noon.
    Am,
    /// Noon up to (not including) midnight.
    Pm,
}

impl fmt::Display for Meridiem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Am => f.write_str("AM"),
            Self::Pm => f.write_str("PM"),
        }
    }
}

/// A wall-clock reading converted to the twelve-hour clock.
///
/// Hour 0 reads as 12 AM, hour 12 as 12 PM, and hours 13-23 as 1-11 PM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockSample {
    /// Hour on the twelve-hour dial (1-12).
    pub hour12: u32,
    /// Minute of the hour (0-59).
    pub minute: u32,
    /// Second of the minute (0-59).
    pub second: u32,
    /// AM or PM.
    pub meridiem: Meridiem,
}

impl ClockSample {
    /// Convert any chrono time-of-day value into a twelve-hour sample.
    pub fn from_time<T: Timelike>(time: &T) -> Self {
        let (is_pm, hour12) = time.hour12();
        Self {
            hour12,
            minute: time.minute(),
            // Leap seconds surface as second 59 with extra nanoseconds,
            // so `second()` already stays within 0-59.
            second: time.second(),
            meridiem: if is_pm { Meridiem::Pm } else { Meridiem::Am },
        }
    }
}

impl fmt::Display for ClockSample {
    /// Renders as `h:mm:ss AM`, e.g. `3:05:09 PM`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{:02}:{:02} {}",
            self.hour12, self.minute, self.second, self.meridiem
        )
    }
}
