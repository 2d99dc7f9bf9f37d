//! Terrain and weather descriptors fed to the drive model
//! Location: src/drive/environment.rs

use serde::{Deserialize, Serialize};

use crate::utils::math::clamp_unit;

/// Ground surface under the chair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainProperties {
    /// Tyre/ground friction coefficient (0-1)
    pub friction_coefficient: f64,
    pub rolling_resistance: f64,
    /// Incline in radians, positive uphill
    pub slope_angle: f64,
    /// Surface roughness (0 smooth, 1 rubble)
    pub surface_roughness: f64,
    /// Surface wetness (0 dry, 1 flooded)
    pub wetness: f64,
}

impl Default for TerrainProperties {
    fn default() -> Self {
        Self {
            friction_coefficient: 0.8,
            rolling_resistance: 0.02,
            slope_angle: 0.0,
            surface_roughness: 0.0,
            wetness: 0.0,
        }
    }
}

impl TerrainProperties {
    /// Copy with every field pulled into its physical range
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        Self {
            friction_coefficient: clamp_unit(self.friction_coefficient, defaults.friction_coefficient),
            rolling_resistance: clamp_unit(self.rolling_resistance, defaults.rolling_resistance),
            slope_angle: if self.slope_angle.is_finite() {
                self.slope_angle.clamp(-std::f64::consts::FRAC_PI_4, std::f64::consts::FRAC_PI_4)
            } else {
                0.0
            },
            surface_roughness: clamp_unit(self.surface_roughness, 0.0),
            wetness: clamp_unit(self.wetness, 0.0),
        }
    }

    pub fn slope_degrees(&self) -> f64 {
        self.slope_angle.to_degrees()
    }
}

/// Ambient weather around the chair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalConditions {
    /// Ambient temperature (°C)
    pub temperature: f64,
    /// Relative humidity (0-1)
    pub humidity: f64,
    /// Wind speed (m/s)
    pub wind_speed: f64,
    /// Direction the wind blows toward (rad, world frame)
    pub wind_direction: f64,
    /// Precipitation intensity (0-1)
    pub precipitation: f64,
}

impl Default for EnvironmentalConditions {
    fn default() -> Self {
        Self {
            temperature: 20.0,
            humidity: 0.5,
            wind_speed: 0.0,
            wind_direction: 0.0,
            precipitation: 0.0,
        }
    }
}

impl EnvironmentalConditions {
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        Self {
            temperature: if self.temperature.is_finite() {
                self.temperature.clamp(-40.0, 60.0)
            } else {
                defaults.temperature
            },
            humidity: clamp_unit(self.humidity, defaults.humidity),
            wind_speed: if self.wind_speed.is_finite() { self.wind_speed.clamp(0.0, 40.0) } else { 0.0 },
            wind_direction: if self.wind_direction.is_finite() { self.wind_direction } else { 0.0 },
            precipitation: clamp_unit(self.precipitation, 0.0),
        }
    }
}
