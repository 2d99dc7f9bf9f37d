//! 360° ranging scanner over the obstacle world
//! Location: src/sensors/lidar.rs

use super::types::LidarScan;
use super::world::ObstacleWorld;
use crate::config::constants::sensors::*;
use crate::state::VehicleState;
use crate::utils::noise::NoiseGenerator;

#[derive(Debug, Clone)]
pub struct LidarSimulator {
    noise: NoiseGenerator,
}

impl LidarSimulator {
    pub fn new(noise: NoiseGenerator) -> Self {
        Self { noise }
    }

    /// One ray per degree, body-relative, noise growing with range
    pub fn scan(&mut self, state: &VehicleState, world: &ObstacleWorld, scan_time: f64) -> LidarScan {
        let mut scan = LidarScan {
            distances: Vec::with_capacity(LIDAR_RAYS),
            angles: Vec::with_capacity(LIDAR_RAYS),
            intensities: Vec::with_capacity(LIDAR_RAYS),
            scan_time,
        };
        let (intensity_low, intensity_high) = LIDAR_INTENSITY_RANGE;

        for ray in 0..LIDAR_RAYS {
            let angle = (ray as f64 * 360.0 / LIDAR_RAYS as f64).to_radians();
            let distance = world.cast_ray(
                state.x,
                state.y,
                state.theta + angle,
                LIDAR_MAX_RANGE_M,
                LIDAR_STEP_M,
            );
            let stddev = LIDAR_BASE_NOISE_M + distance * LIDAR_NOISE_PER_M;
            let measured = self
                .noise
                .add_noise(distance, stddev)
                .clamp(LIDAR_MIN_RANGE_M, LIDAR_MAX_RANGE_M);

            scan.distances.push(measured);
            scan.angles.push(angle);
            scan.intensities
                .push(self.noise.uniform(intensity_low, intensity_high));
        }
        scan
    }
}
