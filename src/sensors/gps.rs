//! GPS receiver with atmospheric/multipath error and fault injection
//! Location: src/sensors/gps.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::types::GpsFix;
use crate::config::constants::sensors::*;
use crate::error::EmuError;
use crate::state::VehicleState;
use crate::utils::noise::NoiseGenerator;

/// Named GPS fault types accepted by the injection hook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GpsErrorKind {
    /// Inflates reported accuracy (and therefore noise)
    Multipath,
    /// Systematic position bias in metres
    Atmospheric,
}

impl GpsErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GpsErrorKind::Multipath => "multipath",
            GpsErrorKind::Atmospheric => "atmospheric",
        }
    }
}

impl fmt::Display for GpsErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GpsErrorKind {
    type Err = EmuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "multipath" => Ok(GpsErrorKind::Multipath),
            "atmospheric" => Ok(GpsErrorKind::Atmospheric),
            _ => Err(EmuError::UnknownSensorFault { name: s.to_string() }),
        }
    }
}

/// Injected faults that persist until cleared
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct GpsFaults {
    pub accuracy_inflation_m: f64,
    pub bias_m: f64,
}

#[derive(Debug, Clone)]
pub struct GpsSimulator {
    faults: GpsFaults,
    noise: NoiseGenerator,
}

impl GpsSimulator {
    pub fn new(noise: NoiseGenerator) -> Self {
        Self {
            faults: GpsFaults::default(),
            noise,
        }
    }

    pub fn inject(&mut self, kind: GpsErrorKind, magnitude: f64) {
        if !magnitude.is_finite() {
            return;
        }
        match kind {
            GpsErrorKind::Multipath => {
                self.faults.accuracy_inflation_m = (self.faults.accuracy_inflation_m + magnitude).max(0.0)
            }
            GpsErrorKind::Atmospheric => self.faults.bias_m += magnitude,
        }
    }

    pub fn clear_faults(&mut self) {
        self.faults = GpsFaults::default();
    }

    pub fn faults(&self) -> GpsFaults {
        self.faults
    }

    /// Produce a fresh fix for the current position
    pub fn fix(&mut self, state: &VehicleState) -> GpsFix {
        let meters_per_degree_lat = METERS_PER_DEGREE;
        let meters_per_degree_lon = METERS_PER_DEGREE * GPS_ORIGIN_LAT.to_radians().cos();

        let (atm_low, atm_high) = GPS_ATMOSPHERIC_ERROR_M;
        let (mp_low, mp_high) = GPS_MULTIPATH_ERROR_M;
        let accuracy = GPS_BASE_ACCURACY_M
            + self.noise.uniform(atm_low, atm_high)
            + self.noise.uniform(mp_low, mp_high)
            + self.faults.accuracy_inflation_m;
        // accuracy is treated as a 3-sigma bound
        let sigma = accuracy / 3.0;

        let north = state.y + self.faults.bias_m;
        let east = state.x + self.faults.bias_m;

        let satellites = self
            .noise
            .normal(GPS_SATELLITES_MEAN, GPS_SATELLITES_STDDEV)
            .trunc()
            .clamp(GPS_MIN_SATELLITES as f64, GPS_MAX_SATELLITES as f64) as u8;
        let (hdop_min, hdop_max) = GPS_HDOP_RANGE;

        GpsFix {
            latitude: self
                .noise
                .add_noise(GPS_ORIGIN_LAT + north / meters_per_degree_lat, sigma / meters_per_degree_lat),
            longitude: self
                .noise
                .add_noise(GPS_ORIGIN_LON + east / meters_per_degree_lon, sigma / meters_per_degree_lon),
            altitude: self.noise.add_noise(GPS_ORIGIN_ALT_M, sigma),
            accuracy,
            satellites,
            hdop: self
                .noise
                .normal(GPS_HDOP_MEAN, GPS_HDOP_STDDEV)
                .clamp(hdop_min, hdop_max),
        }
    }
}
