use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

pub const DAWN: GameTime = GameTime(600);
pub const NOON: GameTime = GameTime(1200);
pub const END_OF_DAY: GameTime = GameTime(2600);

pub const DEFAULT_MS_PER_MINUTE: u32 = 700;
const MINUTES_PER_TICK: u32 = 10;

/// Clock time in the host's `hhmm` encoding. Values past midnight keep
/// counting (`2530` is 1:30 the next morning).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GameTime(pub i32);

impl GameTime {
    #[must_use]
    pub fn from_hm(hour: i32, minute: i32) -> Self {
        Self(hour * 100 + minute)
    }

    #[must_use]
    pub fn hour(self) -> i32 {
        self.0 / 100
    }

    #[must_use]
    pub fn minute(self) -> i32 {
        self.0 % 100
    }

    #[must_use]
    pub fn minutes(self) -> i32 {
        self.hour() * 60 + self.minute()
    }

    #[must_use]
    pub fn from_minutes(total: i32) -> Self {
        Self(total / 60 * 100 + total % 60)
    }

    #[cfg(test)]
    #[must_use]
    pub(crate) fn minutes_until(self, later: GameTime) -> i32 {
        later.minutes() - self.minutes()
    }

    #[must_use]
    pub fn add_minutes(self, minutes: i32) -> Self {
        Self::from_minutes(self.minutes() + minutes)
    }

    /// Shift by whole hours in `hhmm` space.
    #[must_use]
    pub fn hours_earlier(self, hours: i32) -> Self {
        Self(self.0 - hours * 100)
    }
}

impl fmt::Display for GameTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour().rem_euclid(24), self.minute())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockReading {
    pub time_of_day: GameTime,
    pub tick_elapsed_ms: u32,
    pub ms_per_minute: u32,
    pub total_elapsed: Duration,
}

impl ClockReading {
    #[must_use]
    pub fn at(time_of_day: GameTime) -> Self {
        Self {
            time_of_day,
            tick_elapsed_ms: 0,
            ms_per_minute: DEFAULT_MS_PER_MINUTE,
            total_elapsed: Duration::ZERO,
        }
    }

    fn ms_per_minute(&self) -> u32 {
        self.ms_per_minute.max(1)
    }

    #[must_use]
    pub fn whole_minutes_into_tick(&self) -> u32 {
        (self.tick_elapsed_ms / self.ms_per_minute()) % MINUTES_PER_TICK
    }

    #[must_use]
    pub fn minute_fraction(&self) -> f32 {
        (self.tick_elapsed_ms % self.ms_per_minute()) as f32 / self.ms_per_minute() as f32
    }

    #[must_use]
    pub fn current_time(&self) -> GameTime {
        GameTime(self.time_of_day.0 + self.whole_minutes_into_tick() as i32)
    }

    /// Minutes since midnight including the partial minute, so transitions
    /// keyed off it move every frame instead of every tick.
    #[must_use]
    pub fn continuous_minutes(&self) -> f32 {
        self.current_time().minutes() as f32 + self.minute_fraction()
    }

    #[must_use]
    pub fn elapsed_seconds(&self) -> f64 {
        self.total_elapsed.as_secs_f64()
    }

    #[must_use]
    pub fn arrival_seed(&self) -> u64 {
        u64::try_from(self.total_elapsed.as_millis()).unwrap_or(u64::MAX)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DarknessThresholds {
    pub starting: GameTime,
    pub moderate: GameTime,
    pub truly: GameTime,
}

impl DarknessThresholds {
    #[must_use]
    pub fn from_starting(starting: GameTime) -> Self {
        Self {
            starting,
            moderate: starting.add_minutes(60),
            truly: starting.add_minutes(120),
        }
    }

    #[must_use]
    pub fn dusk_transition_start(&self) -> GameTime {
        self.starting.hours_earlier(1)
    }
}

impl Default for DarknessThresholds {
    fn default() -> Self {
        Self::from_starting(GameTime(1800))
    }
}
