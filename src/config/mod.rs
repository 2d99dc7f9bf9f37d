// src/config/mod.rs
//! Emulator configuration
//!
//! Plain serde structs with per-field defaults drawn from [`constants`].
//! Loading files from disk is left to the embedding application; these
//! types only need to round-trip through TOML or JSON.

pub mod constants;
pub mod models;

pub use models::WheelchairModel;

use serde::{Deserialize, Serialize};

use crate::error::{EmuError, EmuResult};
use crate::utils::validation::{
    validate_count, validate_ordered, validate_positive, validate_range, ValidationError,
};

/// Complete emulator configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EmulatorConfig {
    #[serde(default)]
    pub wheelchair: WheelchairConfig,
    #[serde(default)]
    pub power: PowerConfig,
    #[serde(default)]
    pub sensors: SensorConfig,
    #[serde(default)]
    pub simulation: SimulationSettings,
}

/// Physical chassis parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WheelchairConfig {
    /// Distance between drive wheels (m)
    #[serde(default = "defaults::wheelbase")]
    pub wheelbase: f64,

    #[serde(default = "defaults::wheel_radius")]
    pub wheel_radius: f64,

    /// Ground speed at full command (m/s)
    #[serde(default = "defaults::max_velocity")]
    pub max_velocity: f64,

    #[serde(default = "defaults::max_acceleration")]
    pub max_acceleration: f64,

    /// Chair plus occupant (kg)
    #[serde(default = "defaults::mass")]
    pub mass: f64,
}

/// Battery pack layout and limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerConfig {
    #[serde(default = "defaults::series_cells")]
    pub series_cells: usize,

    #[serde(default = "defaults::parallel_cells")]
    pub parallel_cells: usize,

    #[serde(default = "defaults::cell_capacity_ah")]
    pub cell_capacity_ah: f64,

    #[serde(default = "defaults::cell_internal_resistance")]
    pub cell_internal_resistance: f64,

    /// Terminal voltage floor per cell (V)
    #[serde(default = "defaults::min_cell_voltage")]
    pub min_cell_voltage: f64,

    #[serde(default = "defaults::max_cell_voltage")]
    pub max_cell_voltage: f64,

    /// Pack voltage below which the battery counts as low (V)
    #[serde(default = "defaults::min_voltage")]
    pub min_voltage: f64,

    #[serde(default = "defaults::ambient_temperature")]
    pub ambient_temperature: f64,
}

/// Sensor suite parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorConfig {
    #[serde(default = "defaults::proximity_update_rate")]
    pub proximity_update_rate: f64,

    #[serde(default = "defaults::proximity_range")]
    pub proximity_range: f64,

    #[serde(default = "defaults::proximity_noise_stddev")]
    pub proximity_noise_stddev: f64,

    #[serde(default = "defaults::imu_noise_stddev")]
    pub imu_noise_stddev: f64,

    /// Encoder ticks per wheel revolution
    #[serde(default = "defaults::encoder_resolution")]
    pub encoder_resolution: u32,

    /// Randomly placed circular obstacles
    #[serde(default = "defaults::obstacle_count")]
    pub obstacle_count: usize,

    /// Half side length of the square perimeter wall (m)
    #[serde(default = "defaults::world_half_extent")]
    pub world_half_extent: f64,
}

/// Settings consumed by the external scheduler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSettings {
    #[serde(default = "defaults::update_rate")]
    pub update_rate: f64,

    /// Fixed seed for reproducible noise; entropy when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

mod defaults {
    use crate::config::constants::*;

    pub fn wheelbase() -> f64 { drive::DEFAULT_WHEELBASE_M }
    pub fn wheel_radius() -> f64 { drive::DEFAULT_WHEEL_RADIUS_M }
    pub fn max_velocity() -> f64 { drive::DEFAULT_MAX_VELOCITY_MPS }
    pub fn max_acceleration() -> f64 { drive::DEFAULT_MAX_ACCELERATION_MPS2 }
    pub fn mass() -> f64 { drive::DEFAULT_MASS_KG }

    pub fn series_cells() -> usize { power::DEFAULT_SERIES_CELLS }
    pub fn parallel_cells() -> usize { power::DEFAULT_PARALLEL_CELLS }
    pub fn cell_capacity_ah() -> f64 { power::DEFAULT_CELL_CAPACITY_AH }
    pub fn cell_internal_resistance() -> f64 { power::DEFAULT_CELL_RESISTANCE_OHM }
    pub fn min_cell_voltage() -> f64 { power::DEFAULT_MIN_CELL_VOLTAGE }
    pub fn max_cell_voltage() -> f64 { power::DEFAULT_MAX_CELL_VOLTAGE }
    pub fn min_voltage() -> f64 { power::DEFAULT_MIN_PACK_VOLTAGE }
    pub fn ambient_temperature() -> f64 { power::DEFAULT_AMBIENT_TEMPERATURE_C }

    pub fn proximity_update_rate() -> f64 { sensors::DEFAULT_PROXIMITY_UPDATE_RATE_HZ }
    pub fn proximity_range() -> f64 { sensors::DEFAULT_PROXIMITY_RANGE_M }
    pub fn proximity_noise_stddev() -> f64 { sensors::DEFAULT_PROXIMITY_NOISE_STDDEV_M }
    pub fn imu_noise_stddev() -> f64 { sensors::DEFAULT_IMU_NOISE_STDDEV }
    pub fn encoder_resolution() -> u32 { sensors::DEFAULT_ENCODER_RESOLUTION }
    pub fn obstacle_count() -> usize { sensors::DEFAULT_OBSTACLE_COUNT }
    pub fn world_half_extent() -> f64 { sensors::DEFAULT_WORLD_HALF_EXTENT_M }

    pub fn update_rate() -> f64 { simulation::DEFAULT_UPDATE_RATE_HZ }
}

impl Default for WheelchairConfig {
    fn default() -> Self {
        Self {
            wheelbase: defaults::wheelbase(),
            wheel_radius: defaults::wheel_radius(),
            max_velocity: defaults::max_velocity(),
            max_acceleration: defaults::max_acceleration(),
            mass: defaults::mass(),
        }
    }
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            series_cells: defaults::series_cells(),
            parallel_cells: defaults::parallel_cells(),
            cell_capacity_ah: defaults::cell_capacity_ah(),
            cell_internal_resistance: defaults::cell_internal_resistance(),
            min_cell_voltage: defaults::min_cell_voltage(),
            max_cell_voltage: defaults::max_cell_voltage(),
            min_voltage: defaults::min_voltage(),
            ambient_temperature: defaults::ambient_temperature(),
        }
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            proximity_update_rate: defaults::proximity_update_rate(),
            proximity_range: defaults::proximity_range(),
            proximity_noise_stddev: defaults::proximity_noise_stddev(),
            imu_noise_stddev: defaults::imu_noise_stddev(),
            encoder_resolution: defaults::encoder_resolution(),
            obstacle_count: defaults::obstacle_count(),
            world_half_extent: defaults::world_half_extent(),
        }
    }
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            update_rate: defaults::update_rate(),
            seed: None,
        }
    }
}

impl WheelchairConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_range("wheelbase", self.wheelbase, 0.2, 2.0)?;
        validate_range("wheel_radius", self.wheel_radius, 0.05, 0.5)?;
        validate_positive("max_velocity", self.max_velocity)?;
        validate_positive("max_acceleration", self.max_acceleration)?;
        validate_range("mass", self.mass, 10.0, 500.0)?;
        Ok(())
    }
}

impl PowerConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_count("series_cells", self.series_cells, 1, 64)?;
        validate_count("parallel_cells", self.parallel_cells, 1, 16)?;
        validate_positive("cell_capacity_ah", self.cell_capacity_ah)?;
        validate_positive("cell_internal_resistance", self.cell_internal_resistance)?;
        validate_positive("min_cell_voltage", self.min_cell_voltage)?;
        validate_ordered(
            "min_cell_voltage",
            self.min_cell_voltage,
            "max_cell_voltage",
            self.max_cell_voltage,
        )?;
        validate_positive("min_voltage", self.min_voltage)?;
        validate_range("ambient_temperature", self.ambient_temperature, -40.0, 60.0)?;
        Ok(())
    }

    /// Number of cells in the grid
    pub fn cell_count(&self) -> usize {
        self.series_cells * self.parallel_cells
    }

    /// Highest pack voltage the grid can report (V)
    pub fn max_pack_voltage(&self) -> f64 {
        self.series_cells as f64 * self.max_cell_voltage
    }
}

impl SensorConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_positive("proximity_update_rate", self.proximity_update_rate)?;
        validate_positive("proximity_range", self.proximity_range)?;
        validate_range("proximity_noise_stddev", self.proximity_noise_stddev, 0.0, 1.0)?;
        validate_range("imu_noise_stddev", self.imu_noise_stddev, 0.0, 10.0)?;
        validate_count("encoder_resolution", self.encoder_resolution as usize, 1, 1 << 20)?;
        validate_count("obstacle_count", self.obstacle_count, 0, 1000)?;
        validate_positive("world_half_extent", self.world_half_extent)?;
        Ok(())
    }
}

impl SimulationSettings {
    pub fn validate(&self) -> Result<(), ValidationError> {
        use constants::simulation::{MAX_UPDATE_RATE_HZ, MIN_UPDATE_RATE_HZ};
        validate_range("update_rate", self.update_rate, MIN_UPDATE_RATE_HZ, MAX_UPDATE_RATE_HZ)
    }

    /// Fixed tick length implied by the update rate (s)
    pub fn tick_seconds(&self) -> f64 {
        1.0 / self.update_rate
    }
}

impl EmulatorConfig {
    /// Configuration built around a named wheelchair preset
    pub fn for_model(model: WheelchairModel) -> Self {
        Self {
            wheelchair: model.config(),
            ..Self::default()
        }
    }

    /// Parse a TOML document and validate it; absent fields take defaults
    pub fn from_toml_str(text: &str) -> EmuResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| EmuError::ConfigFormat {
            format: "TOML",
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// JSON counterpart of [`from_toml_str`](Self::from_toml_str)
    pub fn from_json_str(text: &str) -> EmuResult<Self> {
        let config: Self = serde_json::from_str(text).map_err(|e| EmuError::ConfigFormat {
            format: "JSON",
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> EmuResult<String> {
        toml::to_string_pretty(self).map_err(|e| EmuError::ConfigFormat {
            format: "TOML",
            reason: e.to_string(),
        })
    }

    /// Check every section, stopping at the first failure
    pub fn validate(&self) -> EmuResult<()> {
        self.wheelchair.validate()?;
        self.power.validate()?;
        self.sensors.validate()?;
        self.simulation.validate()?;
        Ok(())
    }

    /// Cross-section consistency checks, collecting every problem found
    pub fn validate_consistency(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        let min_pack = self.power.series_cells as f64 * self.power.min_cell_voltage;
        if self.power.min_voltage < min_pack {
            errors.push(format!(
                "Low-battery threshold {:.2} V is below the pack floor {:.2} V",
                self.power.min_voltage, min_pack
            ));
        }
        if self.power.min_voltage >= self.power.max_pack_voltage() {
            errors.push(format!(
                "Low-battery threshold {:.2} V is above a full pack ({:.2} V)",
                self.power.min_voltage,
                self.power.max_pack_voltage()
            ));
        }
        if self.sensors.proximity_update_rate > self.simulation.update_rate {
            errors.push(format!(
                "Proximity rate {} Hz exceeds the tick rate {} Hz",
                self.sensors.proximity_update_rate, self.simulation.update_rate
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn summary(&self) -> ConfigSummary {
        ConfigSummary {
            max_velocity: self.wheelchair.max_velocity,
            pack_layout: format!("{}S{}P", self.power.series_cells, self.power.parallel_cells),
            nominal_capacity_ah: self.power.cell_capacity_ah * self.power.parallel_cells as f64,
            update_rate: self.simulation.update_rate,
            deterministic: self.simulation.seed.is_some(),
        }
    }
}

/// Configuration summary for display/logging
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigSummary {
    pub max_velocity: f64,
    pub pack_layout: String,
    pub nominal_capacity_ah: f64,
    pub update_rate: f64,
    pub deterministic: bool,
}
