use core::fmt;

/* The sensor reports temperatures in Kelvin, 0.02 K per LSB. */
const KELVIN_PER_LSB: f64 = 0.02;
const ZERO_CELSIUS: f64 = 273.15;

/// A temperature in degrees Celsius.
#[derive(Debug, PartialEq, PartialOrd, Clone, Copy)]
pub struct Temperature(pub(crate) f64);

impl Temperature {
    /// Placeholder for a temperature that has not been read yet.
    pub const UNKNOWN: Temperature = Temperature(f64::NAN);

    pub fn is_known(&self) -> bool {
        !self.0.is_nan()
    }
}

impl Default for Temperature {
    fn default() -> Self {
        Temperature::UNKNOWN
    }
}

/// Convert a raw RAM temperature register value.
impl From<u16> for Temperature {
    fn from(raw: u16) -> Self {
        Temperature(f64::from(raw) * KELVIN_PER_LSB - ZERO_CELSIUS)
    }
}

impl From<Temperature> for f64 {
    fn from(temp: Temperature) -> Self {
        temp.0
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Ambient and object temperatures, as read by one [crate::Mlx90614::refresh].
#[derive(Debug, Default, PartialEq, Clone, Copy)]
pub struct Readings {
    pub ambient: Temperature,
    pub object1: Temperature,
    pub object2: Temperature,
}
