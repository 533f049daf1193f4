use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Wall-clock duration of a pool run, exposed in several units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ElapsedTime {
    secs: f64,
}

impl ElapsedTime {
    pub fn from_secs_f64(secs: f64) -> Self {
        Self { secs }
    }

    pub fn from_duration(d: Duration) -> Self {
        Self::from_secs_f64(d.as_secs_f64())
    }

    /// Whole microseconds (truncated).
    pub fn micros(&self) -> u64 {
        (self.secs * 1_000_000.0) as u64
    }

    pub fn micros_f64(&self) -> f64 {
        self.secs * 1_000_000.0
    }

    /// Whole milliseconds (truncated).
    pub fn millis(&self) -> u64 {
        (self.secs * 1000.0) as u64
    }

    pub fn millis_f64(&self) -> f64 {
        self.secs * 1000.0
    }

    pub fn secs(&self) -> f64 {
        self.secs
    }

    pub fn mins(&self) -> f64 {
        self.secs / 60.0
    }

    pub fn hours(&self) -> f64 {
        self.mins() / 60.0
    }

    pub fn days(&self) -> f64 {
        self.hours() / 24.0
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_secs_f64(self.secs.max(0.0))
    }
}

impl From<Duration> for ElapsedTime {
    fn from(d: Duration) -> Self {
        Self::from_duration(d)
    }
}

impl fmt::Display for ElapsedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<ElapsedTime({} microseconds, {} milliseconds, {} seconds, {} minutes)>",
            self.micros(),
            self.millis(),
            self.secs,
            self.mins()
        )
    }
}
