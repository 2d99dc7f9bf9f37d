//! Four short-range distance sensors around the chassis
//! Location: src/sensors/proximity.rs

use super::types::{ProximityPosition, ProximityReadings};
use super::world::ObstacleWorld;
use crate::state::VehicleState;
use crate::utils::math::body_to_world;
use crate::utils::noise::NoiseGenerator;

#[derive(Debug, Clone)]
pub struct ProximityArray {
    range: f64,
    noise_stddev: f64,
    noise: NoiseGenerator,
}

impl ProximityArray {
    pub fn new(range: f64, noise_stddev: f64, noise: NoiseGenerator) -> Self {
        Self {
            range,
            noise_stddev,
            noise,
        }
    }

    pub fn range(&self) -> f64 {
        self.range
    }

    pub fn read(&mut self, state: &VehicleState, world: &ObstacleWorld) -> ProximityReadings {
        let mut readings = ProximityReadings::default();
        for position in ProximityPosition::ALL {
            let (x, y) = body_to_world(state.x, state.y, state.theta, position.mount());
            let distance = world.nearest_surface(x, y);
            let reading = (distance < self.range).then(|| {
                self.noise
                    .add_noise(distance, self.noise_stddev)
                    .clamp(0.0, self.range)
            });
            readings.set(position, reading);
        }
        readings
    }
}
