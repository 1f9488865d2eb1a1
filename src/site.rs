use serde::{Deserialize, Serialize};

use crate::constants::{Meter, Radian};

/// Observing site parameters used by the apparent-to-observed transform.
///
/// Units follow the conventions of the original catalog framework:
/// angles in radians, height in meters, temperature in Kelvin, pressure in
/// hectopascal and relative humidity as a fraction in [0, 1].
///
/// The `lapse_rate` field is part of the site description for PAL-style
/// refraction models; the ERFA backend derives its refraction constants from
/// pressure, temperature and humidity alone and does not read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    /// Geodetic longitude, east positive [rad]
    pub longitude: Radian,
    /// Geodetic latitude [rad]
    pub latitude: Radian,
    /// Height above the reference ellipsoid [m]
    pub height: Meter,
    /// Polar motion x component [rad]
    pub x_polar: Radian,
    /// Polar motion y component [rad]
    pub y_polar: Radian,
    /// Mean ambient temperature [K]
    pub mean_temperature: f64,
    /// Mean ambient pressure [hPa]
    pub mean_pressure: f64,
    /// Mean relative humidity [0..1]
    pub mean_humidity: f64,
    /// Tropospheric lapse rate [K/m]
    pub lapse_rate: f64,
}

impl Default for Site {
    /// The LSST site on Cerro Pachón.
    fn default() -> Self {
        Site {
            longitude: -1.2320792,
            latitude: -0.517781017,
            height: 2650.0,
            x_polar: 0.0,
            y_polar: 0.0,
            mean_temperature: 284.655,
            mean_pressure: 749.3,
            mean_humidity: 0.4,
            lapse_rate: 0.0065,
        }
    }
}

impl Site {
    /// Mean ambient temperature in degrees Celsius, as expected by ERFA.
    pub fn temperature_celsius(&self) -> f64 {
        self.mean_temperature - crate::constants::ZERO_CELSIUS
    }
}
