//! Per-wheel motor physical state
//! Location: src/drive/motor.rs
//!
//! Thermal, wear and efficiency models for one drive motor. The drive model
//! calls these passes in a fixed order each tick.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::config::constants::drive::*;

/// Which drive wheel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotorSide {
    Left,
    Right,
}

impl MotorSide {
    pub const BOTH: [MotorSide; 2] = [MotorSide::Left, MotorSide::Right];

    pub(crate) fn index(self) -> usize {
        match self {
            MotorSide::Left => 0,
            MotorSide::Right => 1,
        }
    }
}

/// Physical state of one drive motor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotorState {
    /// Winding temperature (°C)
    pub temperature: f64,
    /// Electrical to mechanical efficiency
    pub efficiency: f64,
    /// 1.0 new, floored at 0.1
    pub wear_factor: f64,
    /// Shaft torque (N·m)
    pub torque: f64,
    pub rpm: f64,
    /// Electrical draw (W)
    pub power_draw: f64,
    /// Accumulated run time (h)
    pub runtime_hours: f64,
}

impl Default for MotorState {
    fn default() -> Self {
        Self {
            temperature: 20.0,
            efficiency: BASE_MOTOR_EFFICIENCY,
            wear_factor: 1.0,
            torque: 0.0,
            rpm: 0.0,
            power_draw: 0.0,
            runtime_hours: 0.0,
        }
    }
}

impl MotorState {
    /// Efficiency after ambient temperature and humidity losses
    pub fn apply_environment(&mut self, base_efficiency: f64, ambient: f64, humidity: f64) {
        let temp_factor = 1.0 - (ambient - EFFICIENCY_REFERENCE_TEMP_C).abs() * EFFICIENCY_LOSS_PER_DEGREE;
        let humidity_factor = 1.0 - humidity * HUMIDITY_EFFICIENCY_LOSS;
        self.efficiency =
            (base_efficiency * temp_factor * humidity_factor).clamp(MIN_MOTOR_EFFICIENCY, 1.0);
    }

    /// Explicit-Euler heat balance against ambient, clamped to `[ambient, 120]`
    pub fn update_thermal(&mut self, dt: f64, ambient: f64) {
        let heat_generated = self.power_draw * (1.0 - self.efficiency) * HEAT_GENERATION_COEFF;
        let heat_lost = MOTOR_COOLING_COEFF * (self.temperature - ambient);
        self.temperature += (heat_generated - heat_lost) * dt / MOTOR_THERMAL_MASS;
        self.clamp_temperature(ambient);
    }

    /// Accumulate run time and wear; wear never recovers
    pub fn update_wear(&mut self, dt: f64) {
        let hours = dt / 3600.0;
        self.runtime_hours += hours;

        let load_factor = self.torque.abs() / MOTOR_MAX_TORQUE_NM;
        let overheat_factor =
            ((self.temperature - WEAR_ONSET_TEMPERATURE_C) / WEAR_TEMPERATURE_SPAN_C).max(0.0);
        let wear_rate =
            (BASE_WEAR_RATE + load_factor * LOAD_WEAR_RATE + overheat_factor * OVERHEAT_WEAR_RATE) * hours;

        self.wear_factor = (self.wear_factor - wear_rate).clamp(MIN_WEAR_FACTOR, 1.0);
    }

    /// Linear derating above 60 °C, floored at 0.3
    pub fn temperature_derating(&self) -> f64 {
        (1.0 - (self.temperature - DERATING_ONSET_C) / DERATING_SPAN_C)
            .clamp(MIN_TEMPERATURE_DERATING, 1.0)
    }

    /// Combined derating applied to the acceleration limit
    pub fn performance(&self) -> f64 {
        self.temperature_derating() * self.wear_factor * self.efficiency
    }

    /// Recompute rpm, torque and electrical draw from a normalized wheel speed
    pub fn update_output(&mut self, speed: f64) {
        let magnitude = speed.abs();
        self.rpm = magnitude * MOTOR_MAX_RPM;
        self.torque = magnitude * MOTOR_MAX_TORQUE_NM * 0.5;
        let mechanical = self.torque * self.rpm * 2.0 * PI / 60.0;
        self.power_draw = mechanical / self.efficiency.max(MIN_MOTOR_EFFICIENCY);
    }

    /// Heat dumped into the windings by an emergency stop from `speed`
    pub fn absorb_braking_heat(&mut self, speed: f64, ambient: f64) {
        self.temperature += speed.abs() * BRAKING_ENERGY_FACTOR * BRAKING_HEAT_COEFF;
        self.clamp_temperature(ambient);
    }

    fn clamp_temperature(&mut self, ambient: f64) {
        let floor = ambient.min(MOTOR_MAX_TEMPERATURE_C);
        self.temperature = self.temperature.clamp(floor, MOTOR_MAX_TEMPERATURE_C);
    }
}
