// src/state.rs
//! Shared per-tick vehicle state and the normalized motion command
//!
//! `VehicleState` is owned by the caller and lent out each tick: Drive and
//! Power take it by `&mut` (pose/velocity and battery fields respectively),
//! the sensor suite only ever sees `&VehicleState`.

use serde::{Deserialize, Serialize};

use crate::utils::math::normalize_angle;

/// Physical state of the chair as of the last completed tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleState {
    /// World X position (m)
    pub x: f64,
    /// World Y position (m)
    pub y: f64,
    /// Heading in `(-π, π]`
    pub theta: f64,
    /// Forward velocity (m/s)
    pub linear_velocity: f64,
    /// Yaw rate (rad/s, CCW positive)
    pub angular_velocity: f64,
    /// Normalized left wheel speed in `[-1, 1]`
    pub left_motor_speed: f64,
    /// Normalized right wheel speed in `[-1, 1]`
    pub right_motor_speed: f64,
    /// Pack terminal voltage (V)
    pub battery_voltage: f64,
    /// Pack state of charge (0-100)
    pub battery_percent: f64,
    pub emergency_stop: bool,
    pub deadman_active: bool,
}

impl Default for VehicleState {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            theta: 0.0,
            linear_velocity: 0.0,
            angular_velocity: 0.0,
            left_motor_speed: 0.0,
            right_motor_speed: 0.0,
            battery_voltage: 24.0,
            battery_percent: 100.0,
            emergency_stop: false,
            deadman_active: false,
        }
    }
}

impl VehicleState {
    /// State at a given pose with everything else at rest
    pub fn at_pose(x: f64, y: f64, theta: f64) -> Self {
        Self {
            x,
            y,
            theta: normalize_angle(theta),
            ..Self::default()
        }
    }

    /// Absolute speed over ground (m/s)
    pub fn speed(&self) -> f64 {
        self.linear_velocity.abs()
    }

    /// Straight-line distance from the world origin (m)
    pub fn distance_from_origin(&self) -> f64 {
        self.x.hypot(self.y)
    }
}

/// Hardware-independent motion command produced by the controller layer
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedCommand {
    /// Forward/backward demand in `[-1, 1]`
    pub linear: f64,
    /// Turn demand in `[-1, 1]`, positive turns left
    pub angular: f64,
    pub emergency_stop: bool,
    pub deadman_pressed: bool,
    pub mode_switch: bool,
}

impl NormalizedCommand {
    /// All axes zero, all flags false
    pub const NEUTRAL: Self = Self {
        linear: 0.0,
        angular: 0.0,
        emergency_stop: false,
        deadman_pressed: false,
        mode_switch: false,
    };

    /// Motion command with the deadman held; axes are clamped to `[-1, 1]`
    pub fn drive(linear: f64, angular: f64) -> Self {
        Self {
            linear: clamp_axis(linear),
            angular: clamp_axis(angular),
            deadman_pressed: true,
            ..Self::NEUTRAL
        }
    }

    /// Return a copy with both axes forced into `[-1, 1]`
    pub fn clamped(self) -> Self {
        Self {
            linear: clamp_axis(self.linear),
            angular: clamp_axis(self.angular),
            ..self
        }
    }

    pub fn is_neutral(&self) -> bool {
        *self == Self::NEUTRAL
    }
}

/// Clamp an axis to `[-1, 1]`; NaN collapses to 0
pub(crate) fn clamp_axis(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_at_rest() {
        let state = VehicleState::default();
        assert_eq!(state.speed(), 0.0);
        assert_eq!(state.distance_from_origin(), 0.0);
        assert!(!state.emergency_stop);
    }

    #[test]
    fn test_at_pose_normalizes_heading() {
        let state = VehicleState::at_pose(1.0, 2.0, 3.0 * std::f64::consts::PI);
        assert!(state.theta > -std::f64::consts::PI && state.theta <= std::f64::consts::PI);
    }

    #[test]
    fn test_command_clamping() {
        let cmd = NormalizedCommand::drive(1.7, f64::NAN);
        assert_eq!(cmd.linear, 1.0);
        assert_eq!(cmd.angular, 0.0);
        assert!(cmd.deadman_pressed);

        let raw = NormalizedCommand {
            linear: -3.0,
            ..NormalizedCommand::NEUTRAL
        };
        assert_eq!(raw.clamped().linear, -1.0);
        assert!(NormalizedCommand::default().is_neutral());
    }

    #[test]
    fn test_state_serializes() {
        let json = serde_json::to_string(&VehicleState::default()).unwrap();
        assert!(json.contains("\"battery_voltage\":24.0"));
    }
}
