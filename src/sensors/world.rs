//! Static obstacle field shared by the ranging sensors
//! Location: src/sensors/world.rs

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::constants::sensors::*;
use crate::utils::noise::NoiseGenerator;

/// Circular obstacle in world coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

impl Obstacle {
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Self { x, y, radius }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        (x - self.x).hypot(y - self.y) < self.radius
    }

    /// Signed distance from `(x, y)` to the circle's edge; negative inside
    pub fn surface_distance(&self, x: f64, y: f64) -> f64 {
        (x - self.x).hypot(y - self.y) - self.radius
    }
}

/// Circles inside a square perimeter wall at `±half_extent`
#[derive(Debug, Clone, PartialEq)]
pub struct ObstacleWorld {
    obstacles: Vec<Obstacle>,
    half_extent: f64,
}

impl ObstacleWorld {
    pub fn new(half_extent: f64) -> Self {
        Self {
            obstacles: Vec::new(),
            half_extent,
        }
    }

    /// Scatter `count` random obstacles, keeping the spawn area clear
    pub fn generate(count: usize, half_extent: f64, noise: &mut NoiseGenerator) -> Self {
        let mut world = Self::new(half_extent);
        let field = OBSTACLE_FIELD_HALF_EXTENT_M.min(half_extent);
        let (min_radius, max_radius) = OBSTACLE_RADIUS_RANGE_M;

        for _ in 0..count {
            let placed = (0..OBSTACLE_PLACEMENT_ATTEMPTS).find_map(|_| {
                let candidate = Obstacle::new(
                    noise.uniform(-field, field),
                    noise.uniform(-field, field),
                    noise.uniform(min_radius, max_radius),
                );
                (candidate.surface_distance(0.0, 0.0) >= SPAWN_CLEARANCE_M).then_some(candidate)
            });
            match placed {
                Some(obstacle) => world.obstacles.push(obstacle),
                None => debug!("no clear spot found for obstacle, skipping"),
            }
        }

        debug!(
            obstacles = world.obstacles.len(),
            half_extent, "obstacle world generated"
        );
        world
    }

    pub fn add_obstacle(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn half_extent(&self) -> f64 {
        self.half_extent
    }

    /// Point lies on or beyond the wall, or inside any circle
    pub fn is_blocked(&self, x: f64, y: f64) -> bool {
        x.abs() >= self.half_extent
            || y.abs() >= self.half_extent
            || self.obstacles.iter().any(|o| o.contains(x, y))
    }

    /// March a ray from `(x, y)` along `angle`, returning the first blocked distance
    ///
    /// Sampling starts at the origin of the ray and advances in `step`
    /// increments, with a final sample at `max_range` itself; `max_range` is
    /// returned when nothing is hit.
    pub fn cast_ray(&self, x: f64, y: f64, angle: f64, max_range: f64, step: f64) -> f64 {
        if !(step > 0.0 && max_range.is_finite() && max_range > 0.0) {
            return max_range.max(0.0);
        }
        let (sin, cos) = angle.sin_cos();
        let steps = (max_range / step).ceil() as usize;
        (0..=steps)
            .map(|i| (i as f64 * step).min(max_range))
            .find(|d| self.is_blocked(x + d * cos, y + d * sin))
            .unwrap_or(max_range)
    }

    /// Distance from `(x, y)` to the nearest surface, 0 when inside one
    pub fn nearest_surface(&self, x: f64, y: f64) -> f64 {
        let wall = (self.half_extent - x.abs()).min(self.half_extent - y.abs());
        self.obstacles
            .iter()
            .map(|o| o.surface_distance(x, y))
            .fold(wall, f64::min)
            .max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_generated_world_keeps_spawn_clear() {
        let mut noise = NoiseGenerator::new(Some(11));
        let world = ObstacleWorld::generate(50, 25.0, &mut noise);
        assert!(!world.obstacles().is_empty());
        for obstacle in world.obstacles() {
            assert!(obstacle.surface_distance(0.0, 0.0) >= SPAWN_CLEARANCE_M);
            assert!(obstacle.x.abs() <= OBSTACLE_FIELD_HALF_EXTENT_M);
        }
    }

    #[test]
    fn test_ray_hits_circle() {
        let mut world = ObstacleWorld::new(25.0);
        world.add_obstacle(Obstacle::new(5.0, 0.0, 1.0));
        let distance = world.cast_ray(0.0, 0.0, 0.0, 30.0, 0.1);
        assert!((distance - 4.0).abs() <= 0.1 + 1e-9);
    }

    #[test]
    fn test_ray_hits_wall() {
        let world = ObstacleWorld::new(10.0);
        let distance = world.cast_ray(0.0, 0.0, std::f64::consts::FRAC_PI_2, 30.0, 0.1);
        assert!((distance - 10.0).abs() <= 0.1 + 1e-9);
    }

    #[test]
    fn test_ray_samples_partial_last_step() {
        let mut world = ObstacleWorld::new(25.0);
        // Edge at 0.95, beyond the last whole step below a 1.05 range
        world.add_obstacle(Obstacle::new(1.2, 0.0, 0.25));
        let distance = world.cast_ray(0.0, 0.0, 0.0, 1.05, 0.1);
        assert_relative_eq!(distance, 1.0, epsilon = 1e-9);

        // Edge between the last whole step and the range itself
        let mut world = ObstacleWorld::new(25.0);
        world.add_obstacle(Obstacle::new(1.5, 0.0, 0.47));
        let distance = world.cast_ray(0.0, 0.0, 0.0, 1.05, 0.1);
        assert_relative_eq!(distance, 1.05, epsilon = 1e-12);
        assert!(world.is_blocked(distance, 0.0));
    }

    #[test]
    fn test_ray_misses_returns_max_range() {
        let world = ObstacleWorld::new(100.0);
        assert_eq!(world.cast_ray(0.0, 0.0, 1.0, 30.0, 0.1), 30.0);
    }

    #[test]
    fn test_nearest_surface() {
        let mut world = ObstacleWorld::new(25.0);
        world.add_obstacle(Obstacle::new(3.0, 0.0, 1.0));
        assert_relative_eq!(world.nearest_surface(0.0, 0.0), 2.0, epsilon = 1e-12);
        assert_relative_eq!(world.nearest_surface(0.0, 24.0), 1.0, epsilon = 1e-12);
        assert_eq!(world.nearest_surface(3.0, 0.0), 0.0);
    }
}
