use std::fmt;
use std::time::{Duration, SystemTime, SystemTimeError};

/// One temperature measurement, formatted as a CSV line.
pub struct Sample<'a> {
    timestamp: Duration,
    location: &'a str,
    value: f64,
}

impl<'a> Sample<'a> {
    pub fn new(now: SystemTime, location: &'a str, value: f64) -> Result<Self, SystemTimeError> {
        Ok(Sample {
            timestamp: now.duration_since(SystemTime::UNIX_EPOCH)?,
            location,
            value,
        })
    }
}

/* <seconds>.<microseconds>;"<location>";"mlx90614";"temperature";<value> */
impl fmt::Display for Sample<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}.{:06};\"{}\";\"mlx90614\";\"temperature\";{:.6}",
            self.timestamp.as_secs(),
            self.timestamp.subsec_micros(),
            self.location,
            self.value
        )
    }
}
