//! Differential-drive dynamics model
//! Location: src/drive/dynamics.rs

use serde::Serialize;
use tracing::{debug, info, trace, warn};

use super::environment::{EnvironmentalConditions, TerrainProperties};
use super::motor::{MotorSide, MotorState};
use crate::config::constants::drive::*;
use crate::config::WheelchairConfig;
use crate::error::EmuResult;
use crate::state::{clamp_axis, NormalizedCommand, VehicleState};
use crate::utils::math::normalize_angle;
use crate::utils::noise::NoiseGenerator;

/// Drive train, wheel/ground contact and pose integration
///
/// Owns both motors and writes the pose, velocity and motor-speed fields of
/// the shared [`VehicleState`]. Per tick the passes run in a fixed order:
/// environment, thermal, wear, performance, speed, vehicle dynamics,
/// integration and finally motor output.
#[derive(Debug, Clone)]
pub struct DriveModel {
    config: WheelchairConfig,
    terrain: TerrainProperties,
    environment: EnvironmentalConditions,
    motors: [MotorState; 2],
    /// Efficiency before environmental losses; lowered by fault injection
    base_efficiency: [f64; 2],
    target_speeds: [f64; 2],
    current_speeds: [f64; 2],
    /// Last post-backlash target per wheel
    backlash: [f64; 2],
    wheel_slip: [f64; 2],
    emergency_active: bool,
    noise: NoiseGenerator,
}

impl DriveModel {
    pub fn new(config: WheelchairConfig, seed: Option<u64>) -> EmuResult<Self> {
        config.validate()?;
        debug!(
            max_velocity = config.max_velocity,
            wheelbase = config.wheelbase,
            "drive model created"
        );
        Ok(Self {
            config,
            terrain: TerrainProperties::default(),
            environment: EnvironmentalConditions::default(),
            motors: [MotorState::default(); 2],
            base_efficiency: [BASE_MOTOR_EFFICIENCY; 2],
            target_speeds: [0.0; 2],
            current_speeds: [0.0; 2],
            backlash: [0.0; 2],
            wheel_slip: [0.0; 2],
            emergency_active: false,
            noise: NoiseGenerator::new(seed),
        })
    }

    /// Mix a normalized command into wheel targets
    ///
    /// An emergency-stop command latches the stop; while latched, motion
    /// commands are ignored until [`release_emergency_stop`](Self::release_emergency_stop).
    pub fn apply_command(&mut self, command: &NormalizedCommand, state: &mut VehicleState) {
        state.deadman_active = command.deadman_pressed;

        if command.emergency_stop {
            if !self.emergency_active {
                self.emergency_stop(state);
            }
            return;
        }
        if self.emergency_active {
            return;
        }

        let linear = clamp_axis(command.linear);
        let angular = clamp_axis(command.angular);
        self.set_motor_speeds(clamp_axis(linear - angular), clamp_axis(linear + angular));
    }

    /// Low-pass filter new wheel targets into the current ones
    pub fn set_motor_speeds(&mut self, left: f64, right: f64) {
        if self.emergency_active {
            return;
        }
        for (target, input) in self.target_speeds.iter_mut().zip([left, right]) {
            *target = COMMAND_FILTER_FACTOR * *target + (1.0 - COMMAND_FILTER_FACTOR) * clamp_axis(input);
        }
    }

    /// Zero the targets and dump braking heat into the motors
    ///
    /// Wheels still decelerate under the normal acceleration limit.
    pub fn emergency_stop(&mut self, state: &mut VehicleState) {
        warn!(
            left = self.current_speeds[0],
            right = self.current_speeds[1],
            "emergency stop engaged"
        );
        self.emergency_active = true;
        self.target_speeds = [0.0; 2];
        let ambient = self.environment.temperature;
        for (motor, speed) in self.motors.iter_mut().zip(self.current_speeds) {
            motor.absorb_braking_heat(speed, ambient);
        }
        state.emergency_stop = true;
    }

    pub fn release_emergency_stop(&mut self, state: &mut VehicleState) {
        if self.emergency_active {
            info!("emergency stop released");
        }
        self.emergency_active = false;
        state.emergency_stop = false;
    }

    pub fn is_emergency_stopped(&self) -> bool {
        self.emergency_active
    }

    /// Advance the drive train by `dt` seconds
    pub fn update(&mut self, dt: f64, state: &mut VehicleState) {
        if !(dt.is_finite() && dt > 0.0) {
            trace!(dt, "ignoring non-positive drive step");
            return;
        }

        let ambient = self.environment.temperature;
        let humidity = self.environment.humidity;
        for (motor, base) in self.motors.iter_mut().zip(self.base_efficiency) {
            motor.apply_environment(base, ambient, humidity);
            motor.update_thermal(dt, ambient);
            motor.update_wear(dt);
        }

        self.update_speeds(dt);
        state.left_motor_speed = self.current_speeds[0];
        state.right_motor_speed = self.current_speeds[1];

        let (linear, angular) = self.vehicle_velocities(state.theta);
        state.linear_velocity = linear;
        state.angular_velocity = angular;

        self.integrate_pose(dt, state);

        for (motor, speed) in self.motors.iter_mut().zip(self.current_speeds) {
            motor.update_output(speed);
        }

        trace!(
            x = state.x,
            y = state.y,
            theta = state.theta,
            v = state.linear_velocity,
            "drive tick"
        );
    }

    fn update_speeds(&mut self, dt: f64) {
        let base_limit = self.config.max_acceleration * dt / self.config.max_velocity;
        for i in 0..2 {
            let target = apply_backlash(self.target_speeds[i], &mut self.backlash[i]);
            let max_change = base_limit * self.motors[i].performance();
            let delta = (target - self.current_speeds[i]).clamp(-max_change, max_change);
            self.current_speeds[i] = clamp_axis(self.current_speeds[i] + delta);
        }
    }

    /// Slip, differential kinematics, terrain resistance and wind
    fn vehicle_velocities(&mut self, heading: f64) -> (f64, f64) {
        let max_velocity = self.config.max_velocity;
        let mut effective = [0.0; 2];
        for i in 0..2 {
            let wheel_velocity = self.current_speeds[i] * max_velocity;
            self.wheel_slip[i] = self.slip_for(wheel_velocity);
            effective[i] = wheel_velocity * (1.0 - self.wheel_slip[i]);
        }

        let mut linear = (effective[0] + effective[1]) / 2.0;
        let angular = (effective[1] - effective[0]) / self.config.wheelbase;

        let slope_resistance =
            GRAVITY_MPS2 * self.terrain.slope_angle.sin() * self.config.mass / SLOPE_RESISTANCE_SCALE;
        let rolling = self.terrain.rolling_resistance * linear.abs() * ROLLING_RESISTANCE_SCALE;
        linear *= (1.0 - (slope_resistance + rolling)).max(0.0);

        if linear.abs() > f64::EPSILON && self.environment.wind_speed > 0.0 {
            let along_heading = self.environment.wind_speed
                * (self.environment.wind_direction - heading).cos()
                * WIND_EFFECT_COEFF;
            let pushed = linear + along_heading;
            // wind slows the chair but never reverses it
            linear = if pushed.signum() == linear.signum() { pushed } else { 0.0 };
        }

        (linear, angular)
    }

    fn slip_for(&self, wheel_velocity: f64) -> f64 {
        let slip = (1.0 - self.terrain.friction_coefficient) * FRICTION_SLIP_COEFF
            + self.terrain.wetness * WETNESS_SLIP_COEFF
            + self.terrain.surface_roughness * ROUGHNESS_SLIP_COEFF
            + wheel_velocity.abs() / self.config.max_velocity * TORQUE_SLIP_COEFF;
        slip.clamp(0.0, MAX_WHEEL_SLIP)
    }

    /// Midpoint (RK2) pose update with odometry noise while moving
    fn integrate_pose(&mut self, dt: f64, state: &mut VehicleState) {
        let v = state.linear_velocity;
        let omega = state.angular_velocity;

        let mid_theta = state.theta + omega * dt / 2.0;
        state.x += v * mid_theta.cos() * dt;
        state.y += v * mid_theta.sin() * dt;
        state.theta = normalize_angle(state.theta + omega * dt);

        if v.abs() > f64::EPSILON || omega.abs() > f64::EPSILON {
            state.x += self.noise.gaussian(POSITION_NOISE_STDDEV_M);
            state.y += self.noise.gaussian(POSITION_NOISE_STDDEV_M);
        }
    }

    pub fn set_terrain(&mut self, terrain: TerrainProperties) {
        self.terrain = terrain.sanitized();
        debug!(terrain = ?self.terrain, "terrain updated");
    }

    pub fn set_environment(&mut self, environment: EnvironmentalConditions) {
        self.environment = environment.sanitized();
        debug!(environment = ?self.environment, "environment updated");
    }

    pub fn terrain(&self) -> &TerrainProperties {
        &self.terrain
    }

    pub fn environment(&self) -> &EnvironmentalConditions {
        &self.environment
    }

    pub fn config(&self) -> &WheelchairConfig {
        &self.config
    }

    pub fn motor(&self, side: MotorSide) -> &MotorState {
        &self.motors[side.index()]
    }

    /// Current normalized (left, right) wheel speeds
    pub fn motor_speeds(&self) -> (f64, f64) {
        (self.current_speeds[0], self.current_speeds[1])
    }

    /// Filtered (left, right) targets
    pub fn target_speeds(&self) -> (f64, f64) {
        (self.target_speeds[0], self.target_speeds[1])
    }

    /// Both motors plus the drive electronics (W)
    pub fn total_power_draw(&self) -> f64 {
        self.motors.iter().map(|m| m.power_draw).sum::<f64>() + DRIVE_BASE_POWER_W
    }

    /// Override one motor's base efficiency (fault injection)
    pub fn set_motor_efficiency(&mut self, side: MotorSide, efficiency: f64) {
        let efficiency = efficiency.clamp(MIN_MOTOR_EFFICIENCY, 1.0);
        self.base_efficiency[side.index()] = efficiency;
        self.motors[side.index()].efficiency = efficiency;
    }

    /// Force one motor's wear factor (fault injection)
    pub fn set_motor_wear(&mut self, side: MotorSide, wear_factor: f64) {
        self.motors[side.index()].wear_factor = wear_factor.clamp(MIN_WEAR_FACTOR, 1.0);
    }

    /// Put one motor into a degraded fault state
    pub fn set_motor_fault(&mut self, side: MotorSide, efficiency: f64, wear_factor: f64) {
        warn!(?side, efficiency, wear_factor, "motor fault injected");
        self.set_motor_efficiency(side, efficiency);
        self.set_motor_wear(side, wear_factor);
    }

    /// Age both motors to `wear_factor` and shave 10% off their efficiency
    pub fn degrade_motors(&mut self, wear_factor: f64) {
        for side in MotorSide::BOTH {
            let base = self.base_efficiency[side.index()];
            self.set_motor_wear(side, wear_factor);
            self.set_motor_efficiency(side, base * 0.9);
        }
        info!(wear_factor, "motors degraded");
    }

    /// On-demand diagnostic view of the drive train
    pub fn motor_diagnostics(&self) -> MotorDiagnostics {
        MotorDiagnostics {
            left: self.motors[0],
            right: self.motors[1],
            wheel_slip: WheelSlip {
                left: self.wheel_slip[0],
                right: self.wheel_slip[1],
            },
            terrain: TerrainSummary {
                friction: self.terrain.friction_coefficient,
                slope_degrees: self.terrain.slope_degrees(),
                roughness: self.terrain.surface_roughness,
                wetness: self.terrain.wetness,
            },
            emergency_stop_active: self.emergency_active,
            total_power_draw: self.total_power_draw(),
        }
    }
}

/// Blend only part of the way through a direction reversal
///
/// `last` holds the previous effective target; once its sign agrees with the
/// new target the backlash is absorbed and the target passes through.
fn apply_backlash(target: f64, last: &mut f64) -> f64 {
    let reversing = target.abs() > BACKLASH_MIN_TARGET
        && last.abs() > f64::EPSILON
        && target.signum() != last.signum();
    let effective = if reversing {
        *last + (target - *last) * BACKLASH_BLEND
    } else {
        target
    };
    *last = effective;
    effective
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WheelSlip {
    pub left: f64,
    pub right: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TerrainSummary {
    pub friction: f64,
    pub slope_degrees: f64,
    pub roughness: f64,
    pub wetness: f64,
}

/// Drive-train diagnostics for observers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MotorDiagnostics {
    pub left: MotorState,
    pub right: MotorState,
    pub wheel_slip: WheelSlip,
    pub terrain: TerrainSummary,
    pub emergency_stop_active: bool,
    pub total_power_draw: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn model() -> DriveModel {
        DriveModel::new(WheelchairConfig::default(), Some(7)).unwrap()
    }

    fn drive_for(model: &mut DriveModel, state: &mut VehicleState, command: NormalizedCommand, ticks: usize) {
        for _ in 0..ticks {
            model.apply_command(&command, state);
            model.update(0.02, state);
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = WheelchairConfig {
            wheelbase: 0.0,
            ..WheelchairConfig::default()
        };
        assert!(DriveModel::new(config, None).is_err());
    }

    #[test]
    fn test_command_mixing() {
        let mut drive = model();
        let mut state = VehicleState::default();
        drive.apply_command(&NormalizedCommand::drive(0.5, 0.5), &mut state);
        let (left, right) = drive.target_speeds();
        assert_relative_eq!(left, 0.0);
        assert_relative_eq!(right, 0.1, epsilon = 1e-12);
        assert!(state.deadman_active);
    }

    #[test]
    fn test_forward_motion() {
        let mut drive = model();
        let mut state = VehicleState::default();
        drive_for(&mut drive, &mut state, NormalizedCommand::drive(1.0, 0.0), 250);

        assert!(state.x > 1.0, "chair barely moved: {}", state.x);
        assert!(state.y.abs() < 0.1);
        assert!(state.linear_velocity > 0.0);
        assert!(state.left_motor_speed > 0.5);
    }

    #[test]
    fn test_stationary_chair_does_not_drift() {
        let mut drive = model();
        let mut state = VehicleState::default();
        drive_for(&mut drive, &mut state, NormalizedCommand::NEUTRAL, 100);
        assert_eq!(state.x, 0.0);
        assert_eq!(state.y, 0.0);
    }

    #[test]
    fn test_acceleration_is_limited() {
        let mut drive = model();
        let mut state = VehicleState::default();
        drive.apply_command(&NormalizedCommand::drive(1.0, 0.0), &mut state);
        drive.update(0.02, &mut state);
        let (left, _) = drive.motor_speeds();
        // 1.0 m/s² over 20 ms is 1% of a 2 m/s top speed before derating
        assert!(left <= 0.01 + 1e-12);
    }

    #[test]
    fn test_emergency_stop_latches() {
        let mut drive = model();
        let mut state = VehicleState::default();
        drive_for(&mut drive, &mut state, NormalizedCommand::drive(1.0, 0.0), 100);
        let speed_before = drive.motor_speeds().0;
        let temp_before = drive.motor(MotorSide::Left).temperature;

        let stop = NormalizedCommand {
            emergency_stop: true,
            ..NormalizedCommand::NEUTRAL
        };
        drive.apply_command(&stop, &mut state);
        assert!(state.emergency_stop);
        assert!(drive.is_emergency_stopped());
        assert_eq!(drive.target_speeds(), (0.0, 0.0));
        assert!(drive.motor(MotorSide::Left).temperature > temp_before);

        // no instantaneous stop
        drive.update(0.02, &mut state);
        assert!(drive.motor_speeds().0 > 0.0);
        assert!(drive.motor_speeds().0 < speed_before);

        // motion commands ignored while latched
        drive_for(&mut drive, &mut state, NormalizedCommand::drive(1.0, 0.0), 500);
        assert_eq!(drive.motor_speeds().0, 0.0);

        drive.release_emergency_stop(&mut state);
        assert!(!state.emergency_stop);
        drive_for(&mut drive, &mut state, NormalizedCommand::drive(1.0, 0.0), 50);
        assert!(drive.motor_speeds().0 > 0.0);
    }

    #[test]
    fn test_backlash_blends_reversal() {
        let mut last = 0.5;
        let first = apply_backlash(-0.5, &mut last);
        assert_relative_eq!(first, 0.2, epsilon = 1e-12);
        let second = apply_backlash(-0.5, &mut last);
        assert_relative_eq!(second, -0.01, epsilon = 1e-12);
        // absorbed: same sign now
        assert_eq!(apply_backlash(-0.5, &mut last), -0.5);
    }

    #[test]
    fn test_backlash_ignores_small_targets_and_rest() {
        let mut last = 0.0;
        assert_eq!(apply_backlash(0.8, &mut last), 0.8);
        let mut last = 0.5;
        assert_eq!(apply_backlash(-0.05, &mut last), -0.05);
    }

    #[test]
    fn test_spin_in_place() {
        let mut drive = model();
        let mut state = VehicleState::default();
        drive_for(&mut drive, &mut state, NormalizedCommand::drive(0.0, 1.0), 300);
        assert!(state.angular_velocity > 0.0);
        assert!(state.linear_velocity.abs() < 1e-9);
        assert!(state.theta > -std::f64::consts::PI && state.theta <= std::f64::consts::PI);
    }

    #[test]
    fn test_uphill_slower_than_flat() {
        let mut flat = model();
        let mut hill = model();
        hill.set_terrain(TerrainProperties {
            slope_angle: 0.1,
            ..TerrainProperties::default()
        });
        let mut flat_state = VehicleState::default();
        let mut hill_state = VehicleState::default();
        drive_for(&mut flat, &mut flat_state, NormalizedCommand::drive(1.0, 0.0), 200);
        drive_for(&mut hill, &mut hill_state, NormalizedCommand::drive(1.0, 0.0), 200);
        assert!(hill_state.linear_velocity < flat_state.linear_velocity);
    }

    #[test]
    fn test_headwind_slows_chair() {
        let mut calm = model();
        let mut windy = model();
        windy.set_environment(EnvironmentalConditions {
            wind_speed: 5.0,
            wind_direction: std::f64::consts::PI,
            ..EnvironmentalConditions::default()
        });
        let mut calm_state = VehicleState::default();
        let mut windy_state = VehicleState::default();
        drive_for(&mut calm, &mut calm_state, NormalizedCommand::drive(1.0, 0.0), 100);
        drive_for(&mut windy, &mut windy_state, NormalizedCommand::drive(1.0, 0.0), 100);
        assert!(windy_state.linear_velocity < calm_state.linear_velocity);
    }

    #[test]
    fn test_power_draw_tracks_speed() {
        let mut drive = model();
        let mut state = VehicleState::default();
        assert_relative_eq!(drive.total_power_draw(), DRIVE_BASE_POWER_W);
        drive_for(&mut drive, &mut state, NormalizedCommand::drive(1.0, 0.0), 100);
        assert!(drive.total_power_draw() > DRIVE_BASE_POWER_W);
    }

    #[test]
    fn test_diagnostics() {
        let mut drive = model();
        let mut state = VehicleState::default();
        drive.set_terrain(TerrainProperties {
            slope_angle: 0.1,
            wetness: 0.4,
            ..TerrainProperties::default()
        });
        drive_for(&mut drive, &mut state, NormalizedCommand::drive(0.5, 0.0), 50);

        let diagnostics = drive.motor_diagnostics();
        assert_relative_eq!(diagnostics.terrain.slope_degrees, 0.1_f64.to_degrees());
        assert!(diagnostics.wheel_slip.left > 0.0);
        assert!(diagnostics.wheel_slip.left <= MAX_WHEEL_SLIP);
        assert!(!diagnostics.emergency_stop_active);

        let json = serde_json::to_value(&diagnostics).unwrap();
        assert!(json["left"]["temperature"].is_number());
    }

    #[test]
    fn test_fault_efficiency_survives_environment_pass() {
        let mut drive = model();
        let mut state = VehicleState::default();
        drive.set_motor_fault(MotorSide::Left, 0.3, 0.2);
        drive.update(0.02, &mut state);
        assert!(drive.motor(MotorSide::Left).efficiency < 0.3 + 1e-9);
        assert_eq!(drive.motor(MotorSide::Left).wear_factor, 0.2);
        assert!(drive.motor(MotorSide::Right).efficiency > 0.7);
    }

    #[test]
    fn test_non_positive_dt_is_ignored() {
        let mut drive = model();
        let mut state = VehicleState::default();
        drive.apply_command(&NormalizedCommand::drive(1.0, 0.0), &mut state);
        drive.update(0.0, &mut state);
        drive.update(-1.0, &mut state);
        drive.update(f64::NAN, &mut state);
        assert_eq!(drive.motor_speeds(), (0.0, 0.0));
    }
}
