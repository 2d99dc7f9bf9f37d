//! Quadrature wheel encoders
//! Location: src/sensors/encoders.rs

use std::f64::consts::PI;

use super::types::EncoderReadings;
use crate::config::constants::sensors::ENCODER_NOISE_FRACTION;
use crate::state::VehicleState;
use crate::utils::noise::NoiseGenerator;

/// Per-wheel counter with sub-tick carry
#[derive(Debug, Clone, Copy, Default)]
struct WheelCounter {
    count: u64,
    carry: f64,
}

impl WheelCounter {
    /// Add `ticks` of travel and return the whole ticks emitted, signed
    fn advance(&mut self, ticks: f64) -> i64 {
        self.carry += ticks.abs();
        let whole = self.carry.floor();
        self.carry -= whole;
        self.count = self.count.saturating_add(whole as u64);
        if ticks < 0.0 {
            -(whole as i64)
        } else {
            whole as i64
        }
    }
}

#[derive(Debug, Clone)]
pub struct EncoderSimulator {
    resolution: u32,
    circumference: f64,
    wheels: [WheelCounter; 2],
    noise: NoiseGenerator,
}

impl EncoderSimulator {
    pub fn new(resolution: u32, wheel_radius: f64, noise: NoiseGenerator) -> Self {
        Self {
            resolution,
            circumference: 2.0 * PI * wheel_radius,
            wheels: [WheelCounter::default(); 2],
            noise,
        }
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn counts(&self) -> (u64, u64) {
        (self.wheels[0].count, self.wheels[1].count)
    }

    pub fn update(&mut self, dt: f64, state: &VehicleState) -> EncoderReadings {
        let resolution = self.resolution as f64;
        let mut velocities = [0.0; 2];

        for (wheel, motor_speed) in [state.left_motor_speed, state.right_motor_speed]
            .into_iter()
            .enumerate()
        {
            let rotations = motor_speed * state.linear_velocity * dt / self.circumference;
            let ticks = rotations * resolution * (1.0 + self.noise.gaussian(ENCODER_NOISE_FRACTION));
            let emitted = self.wheels[wheel].advance(ticks);
            velocities[wheel] = emitted as f64 / resolution * self.circumference / dt;
        }

        EncoderReadings {
            left_ticks: self.wheels[0].count,
            right_ticks: self.wheels[1].count,
            left_velocity: velocities[0],
            right_velocity: velocities[1],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moving(speed: f64, velocity: f64) -> VehicleState {
        VehicleState {
            left_motor_speed: speed,
            right_motor_speed: speed,
            linear_velocity: velocity,
            ..VehicleState::default()
        }
    }

    #[test]
    fn test_stationary_emits_no_ticks() {
        let mut encoders = EncoderSimulator::new(1000, 0.15, NoiseGenerator::new(Some(4)));
        let readings = encoders.update(0.02, &VehicleState::default());
        assert_eq!(readings.left_ticks, 0);
        assert_eq!(readings.left_velocity, 0.0);
    }

    #[test]
    fn test_counts_accumulate() {
        let mut encoders = EncoderSimulator::new(1000, 0.15, NoiseGenerator::new(Some(4)));
        let state = moving(1.0, 1.0);
        for _ in 0..50 {
            encoders.update(0.02, &state);
        }
        // One metre of travel is roughly 1061 ticks
        let (left, right) = encoders.counts();
        assert!((1000..1120).contains(&left));
        assert!((1000..1120).contains(&right));
    }

    #[test]
    fn test_counters_never_decrease_when_reversing() {
        let mut encoders = EncoderSimulator::new(1000, 0.15, NoiseGenerator::new(Some(4)));
        let mut previous = 0;
        for step in 0..100 {
            let state = if step % 2 == 0 { moving(1.0, 1.0) } else { moving(-1.0, 1.0) };
            let readings = encoders.update(0.02, &state);
            assert!(readings.left_ticks >= previous);
            previous = readings.left_ticks;
            if step > 0 && readings.left_velocity != 0.0 {
                assert_eq!(readings.left_velocity > 0.0, step % 2 == 0);
            }
        }
    }
}
