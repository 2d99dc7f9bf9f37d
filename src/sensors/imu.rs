//! Inertial measurement unit with bias drift and magnetometer distortion
//! Location: src/sensors/imu.rs

use std::f64::consts::PI;

use serde::Serialize;

use super::types::ImuReading;
use crate::config::constants::drive::GRAVITY_MPS2;
use crate::config::constants::sensors::*;
use crate::state::VehicleState;
use crate::utils::math::mat3_mul_vec3;
use crate::utils::noise::NoiseGenerator;

/// Accumulated sensor biases, exposed for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ImuBiases {
    pub accel: [f64; 3],
    pub gyro: [f64; 3],
}

#[derive(Debug, Clone)]
pub struct ImuSimulator {
    biases: ImuBiases,
    last_velocity: Option<f64>,
    /// Own simulation clock driving the vibration phase
    elapsed: f64,
    /// Body pitch from ground slope (rad), positive nose-up
    pitch: f64,
    noise_stddev: f64,
    noise: NoiseGenerator,
}

impl ImuSimulator {
    pub fn new(noise_stddev: f64, noise: NoiseGenerator) -> Self {
        Self {
            biases: ImuBiases::default(),
            last_velocity: None,
            elapsed: 0.0,
            pitch: 0.0,
            noise_stddev,
            noise,
        }
    }

    pub fn set_pitch(&mut self, pitch: f64) {
        if pitch.is_finite() {
            self.pitch = pitch.clamp(-PI / 2.0, PI / 2.0);
        }
    }

    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    pub fn biases(&self) -> ImuBiases {
        self.biases
    }

    pub fn update(&mut self, dt: f64, state: &VehicleState, ambient_temperature: f64) -> ImuReading {
        self.elapsed += dt;
        self.drift_biases(dt, ambient_temperature);

        let linear_accel = match self.last_velocity {
            Some(previous) => (state.linear_velocity - previous) / dt,
            None => 0.0,
        };
        self.last_velocity = Some(state.linear_velocity);

        let vibration = state.linear_velocity.abs()
            * VIBRATION_PER_MPS
            * (2.0 * PI * VIBRATION_FREQUENCY_HZ * self.elapsed).sin();

        let gravity = [
            -GRAVITY_MPS2 * self.pitch.sin(),
            0.0,
            GRAVITY_MPS2 * self.pitch.cos(),
        ];
        let accel_bias = self.biases.accel;
        let gyro_bias = self.biases.gyro;
        let stddev = self.noise_stddev;

        let accel = [
            self.noise.add_noise(gravity[0] + linear_accel + accel_bias[0] + vibration, stddev),
            self.noise.add_noise(gravity[1] + accel_bias[1] + vibration, stddev),
            self.noise.add_noise(gravity[2] + accel_bias[2] + vibration, stddev),
        ];
        let gyro = [
            self.noise.add_noise(gyro_bias[0], GYRO_NOISE_STDDEV),
            self.noise.add_noise(gyro_bias[1], GYRO_NOISE_STDDEV),
            self.noise.add_noise(state.angular_velocity + gyro_bias[2], GYRO_NOISE_STDDEV),
        ];

        ImuReading {
            accel,
            gyro,
            magnetometer: self.magnetometer(state.theta),
        }
    }

    /// Bias random walk, faster the further ambient is from 25 °C
    fn drift_biases(&mut self, dt: f64, ambient_temperature: f64) {
        let rate = ACCEL_BIAS_DRIFT_BASE
            + ((ambient_temperature - REFERENCE_TEMPERATURE_C) * ACCEL_BIAS_TEMP_COEFF).abs();
        for axis in 0..3 {
            self.biases.accel[axis] += self.noise.gaussian(rate) * dt;
            self.biases.gyro[axis] += self.noise.gaussian(GYRO_BIAS_DRIFT) * dt;
        }
    }

    fn magnetometer(&mut self, heading: f64) -> [f64; 3] {
        let bearing = heading + MAG_DECLINATION_RAD;
        let field = [
            MAG_FIELD_STRENGTH_UT * bearing.cos() + MAG_HARD_IRON[0],
            MAG_FIELD_STRENGTH_UT * bearing.sin() + MAG_HARD_IRON[1],
            MAG_VERTICAL_UT + MAG_HARD_IRON[2],
        ];
        let distorted = mat3_mul_vec3(&MAG_SOFT_IRON, field);
        distorted.map(|component| self.noise.add_noise(component, MAG_NOISE_STDDEV_UT))
    }
}
