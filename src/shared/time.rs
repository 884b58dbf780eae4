//! Minute-resolution time-of-day arithmetic with an explicit "unreached" sentinel.

use std::ops::{Add, AddAssign, Sub, SubAssign};

use chrono::{Local, Timelike};
use serde::Serialize;

/// Sentinel minute value meaning "not yet reached by the search".
///
/// `u32::MAX` rather than wrapping every `Time` in `Option`, so `Time` stays
/// `Copy`/`Ord` and compares directly against real times.
pub const UNREACHED: Time = Time(u32::MAX);

/// Smallest representable time, used as an "always improves" floor.
pub const MIN: Time = Time(0);

/// A point in time expressed as non-negative minutes since day origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Time(u32);

impl From<u32> for Time {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl Time {
    /// The current wall-clock time of day, in minutes.
    pub fn now() -> Self {
        let now = Local::now();
        Self(now.num_seconds_from_midnight() / 60)
    }

    pub const fn from_minutes(minutes: u32) -> Self {
        Self(minutes)
    }

    pub const fn as_minutes(&self) -> u32 {
        self.0
    }

    pub const fn plus(self, duration: Duration) -> Self {
        Self(self.0 + duration.as_minutes())
    }

    pub const fn is_before(&self, other: &Self) -> bool {
        self.0 < other.0
    }

    pub const fn is_after(&self, other: &Self) -> bool {
        self.0 > other.0
    }

    pub const fn equals(&self, other: &Self) -> bool {
        self.0 == other.0
    }

    pub fn min(self, other: Self) -> Self {
        if self.0 <= other.0 { self } else { other }
    }

    /// `false` only for the `UNREACHED` sentinel.
    pub const fn is_reached(&self) -> bool {
        self.0 != UNREACHED.0
    }
}

impl Add<Duration> for Time {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        self.plus(rhs)
    }
}

impl AddAssign<Duration> for Time {
    fn add_assign(&mut self, rhs: Duration) {
        *self = self.plus(rhs);
    }
}

impl Sub<Time> for Time {
    type Output = Duration;

    fn sub(self, rhs: Self) -> Self::Output {
        Duration(self.0 - rhs.0)
    }
}

/// A non-negative span of time. Canonical storage unit is minutes; transfer
/// thresholds are frequently specified in seconds, hence the dedicated
/// `from_seconds`/`as_seconds` pair alongside the minute-based constructors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Duration(u32);

impl From<u32> for Duration {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl Duration {
    pub const fn from_minutes(minutes: u32) -> Self {
        Self(minutes)
    }

    pub const fn from_seconds(seconds: u32) -> Self {
        Self(seconds / 60)
    }

    pub const fn from_hours(hours: u32) -> Self {
        Self(hours * 60)
    }

    pub const fn as_minutes(&self) -> u32 {
        self.0
    }

    pub const fn as_seconds(&self) -> u32 {
        self.0 * 60
    }
}

impl Add for Duration {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Duration {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Duration {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Duration {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}
