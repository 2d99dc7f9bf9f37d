// src/scenario.rs
//! Scenario presets, wear and fault injection
//!
//! Everything here acts on already-built models: a scenario sets terrain,
//! weather and sensor conditions; degradation ages motors and cells; a
//! [`FaultSet`] breaks specific components for test harnesses.

use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::EmulatorConfig;
use crate::drive::{DriveModel, EnvironmentalConditions, MotorSide, TerrainProperties};
use crate::error::{EmuError, EmuResult};
use crate::power::{ConsumerKind, PowerModel};
use crate::sensors::{GpsErrorKind, ProximityPosition, SensorSuite};
use crate::state::VehicleState;

/// Efficiency of a motor with an injected fault
pub const MOTOR_FAULT_EFFICIENCY: f64 = 0.3;
/// Wear factor of a motor with an injected fault
pub const MOTOR_FAULT_WEAR: f64 = 0.2;
/// Distance of the obstacle the testing scenario places ahead of the chair (m)
pub const TESTING_OBSTACLE_DISTANCE_M: f64 = 2.0;

/// Named operating conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// Indoor, controlled
    #[default]
    Default,
    /// Smooth pavement, light wind, hazy
    Urban,
    /// Grass and dirt, slight hill, light rain
    Outdoor,
    /// Known obstacle ahead, cooling disabled
    Testing,
    /// Wet slope, heat, headwind and degraded GPS
    Extreme,
}

impl Scenario {
    pub const ALL: [Scenario; 5] = [
        Scenario::Default,
        Scenario::Urban,
        Scenario::Outdoor,
        Scenario::Testing,
        Scenario::Extreme,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::Default => "default",
            Scenario::Urban => "urban",
            Scenario::Outdoor => "outdoor",
            Scenario::Testing => "testing",
            Scenario::Extreme => "extreme",
        }
    }

    pub fn terrain(&self) -> TerrainProperties {
        let (friction_coefficient, rolling_resistance, slope_angle, surface_roughness, wetness) = match self {
            Scenario::Default => return TerrainProperties::default(),
            Scenario::Urban => (0.9, 0.015, 0.0, 0.1, 0.0),
            Scenario::Outdoor => (0.7, 0.03, 0.05, 0.3, 0.2),
            Scenario::Testing => (0.8, 0.02, 0.0, 0.05, 0.0),
            Scenario::Extreme => (0.5, 0.05, 0.1, 0.5, 0.7),
        };
        TerrainProperties {
            friction_coefficient,
            rolling_resistance,
            slope_angle,
            surface_roughness,
            wetness,
        }
    }

    pub fn environment(&self) -> EnvironmentalConditions {
        let (temperature, humidity, wind_speed, wind_direction, precipitation) = match self {
            Scenario::Default => return EnvironmentalConditions::default(),
            Scenario::Urban => (25.0, 0.6, 1.0, 0.0, 0.0),
            Scenario::Outdoor => (15.0, 0.8, 3.0, FRAC_PI_2, 0.1),
            Scenario::Testing => (20.0, 0.5, 0.0, 0.0, 0.0),
            Scenario::Extreme => (35.0, 0.9, 5.0, PI, 0.5),
        };
        EnvironmentalConditions {
            temperature,
            humidity,
            wind_speed,
            wind_direction,
            precipitation,
        }
    }

    pub fn camera_visibility(&self) -> f64 {
        match self {
            Scenario::Urban => 0.8,
            Scenario::Outdoor => 0.9,
            Scenario::Extreme => 0.5,
            Scenario::Default | Scenario::Testing => 1.0,
        }
    }

    /// Pack ambient override, when the scenario changes it
    pub fn pack_ambient(&self) -> Option<f64> {
        match self {
            Scenario::Outdoor => Some(15.0),
            Scenario::Extreme => Some(35.0),
            _ => None,
        }
    }

    /// Apply this scenario to freshly built models
    ///
    /// `state` positions any obstacle the scenario places relative to the chair.
    pub fn apply(
        &self,
        drive: &mut DriveModel,
        power: &mut PowerModel,
        sensors: &mut SensorSuite,
        state: &VehicleState,
    ) -> EmuResult<()> {
        let terrain = self.terrain();
        let environment = self.environment();

        drive.set_terrain(terrain);
        drive.set_environment(environment);
        sensors.set_tilt(terrain.slope_angle);
        sensors.set_ambient_temperature(environment.temperature);
        sensors.set_visibility(self.camera_visibility());
        if let Some(ambient) = self.pack_ambient() {
            power.set_ambient_temperature(ambient);
        }

        match self {
            Scenario::Testing => {
                sensors.inject_obstacle(state, ProximityPosition::Front, TESTING_OBSTACLE_DISTANCE_M)?;
                power.set_consumer_enabled(ConsumerKind::Cooling, false);
            }
            Scenario::Extreme => sensors.inject_gps_fault(GpsErrorKind::Multipath, 5.0),
            _ => {}
        }

        info!(scenario = %self, "scenario applied");
        Ok(())
    }

    fn valid_names() -> Vec<String> {
        Self::ALL.iter().map(|s| s.as_str().to_string()).collect()
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scenario {
    type Err = EmuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|scenario| scenario.as_str() == key)
            .ok_or_else(|| EmuError::UnknownScenario {
                name: s.to_string(),
                valid: Self::valid_names(),
            })
    }
}

/// Configuration for an aged chair: slower, weaker, smaller battery
///
/// `wear_factor` and `battery_health` are fractions of new (0.1 to 1).
pub fn degraded_config(base: &EmulatorConfig, wear_factor: f64, battery_health: f64) -> EmulatorConfig {
    let wear_factor = wear_factor.clamp(0.1, 1.0);
    let battery_health = battery_health.clamp(0.1, 1.0);
    let mut config = base.clone();
    config.wheelchair.max_velocity *= wear_factor;
    config.wheelchair.max_acceleration *= wear_factor;
    config.power.cell_capacity_ah *= battery_health;
    config
}

/// Age built motors and cells
pub fn degrade(drive: &mut DriveModel, power: &mut PowerModel, wear_factor: f64, battery_health: f64) {
    drive.degrade_motors(wear_factor);
    power.degrade_cells(battery_health);
    info!(wear_factor, battery_health, "wear applied");
}

/// Component faults for harness runs
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FaultSet {
    pub left_motor_fault: bool,
    pub right_motor_fault: bool,
    /// Multipath error injected into the GPS (m)
    pub gps_error: Option<f64>,
    /// Cells driven to failure, counted from the first series group
    pub battery_cell_failures: usize,
}

impl FaultSet {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, drive: &mut DriveModel, power: &mut PowerModel, sensors: &mut SensorSuite) {
        if self.left_motor_fault {
            drive.set_motor_fault(MotorSide::Left, MOTOR_FAULT_EFFICIENCY, MOTOR_FAULT_WEAR);
        }
        if self.right_motor_fault {
            drive.set_motor_fault(MotorSide::Right, MOTOR_FAULT_EFFICIENCY, MOTOR_FAULT_WEAR);
        }
        if let Some(error) = self.gps_error {
            sensors.inject_gps_fault(GpsErrorKind::Multipath, error);
        }
        if self.battery_cell_failures > 0 {
            power.fail_cells(self.battery_cell_failures);
        }
        if !self.is_empty() {
            warn!(faults = ?self, "fault set applied");
        }
    }
}
