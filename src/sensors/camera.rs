//! Forward camera producing obstacle detections
//! Location: src/sensors/camera.rs

use super::types::{CameraFrame, Detection, DetectionKind};
use super::world::ObstacleWorld;
use crate::config::constants::sensors::*;
use crate::state::VehicleState;
use crate::utils::math::{clamp_unit, normalize_angle};

#[derive(Debug, Clone)]
pub struct CameraSimulator {
    visibility: f64,
}

impl Default for CameraSimulator {
    fn default() -> Self {
        Self { visibility: 1.0 }
    }
}

impl CameraSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Weather degradation factor; NaN leaves the current value
    pub fn set_visibility(&mut self, visibility: f64) {
        self.visibility = clamp_unit(visibility, self.visibility);
    }

    pub fn visibility(&self) -> f64 {
        self.visibility
    }

    /// Every obstacle centre inside the forward cone, nearest first
    pub fn capture(&self, state: &VehicleState, world: &ObstacleWorld) -> CameraFrame {
        let half_fov = CAMERA_FOV_DEG.to_radians() / 2.0;

        let mut detections: Vec<Detection> = world
            .obstacles()
            .iter()
            .filter_map(|obstacle| {
                let (dx, dy) = (obstacle.x - state.x, obstacle.y - state.y);
                let distance = dx.hypot(dy);
                if distance >= CAMERA_RANGE_M {
                    return None;
                }
                let angle = normalize_angle(dy.atan2(dx) - state.theta);
                if angle.abs() >= half_fov {
                    return None;
                }
                let confidence = (1.0 - distance / CAMERA_RANGE_M) * self.visibility;
                (confidence > 0.0).then_some(Detection {
                    kind: DetectionKind::Obstacle,
                    distance,
                    angle,
                    confidence,
                    size: obstacle.radius * 2.0,
                })
            })
            .collect();
        detections.sort_by(|a, b| a.distance.total_cmp(&b.distance));

        CameraFrame {
            detections,
            visibility: self.visibility,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::world::Obstacle;

    fn world() -> ObstacleWorld {
        let mut world = ObstacleWorld::new(25.0);
        world.add_obstacle(Obstacle::new(4.0, 0.0, 0.5));
        world.add_obstacle(Obstacle::new(2.0, 0.5, 0.5));
        world.add_obstacle(Obstacle::new(-3.0, 0.0, 1.0));
        world.add_obstacle(Obstacle::new(15.0, 0.0, 1.0));
        world
    }

    #[test]
    fn test_detects_only_forward_cone() {
        let frame = CameraSimulator::new().capture(&VehicleState::default(), &world());
        assert_eq!(frame.detections.len(), 2);
        assert!(frame.detections[0].distance < frame.detections[1].distance);
        assert_eq!(frame.detections[1].size, 1.0);
    }

    #[test]
    fn test_confidence_falls_with_distance() {
        let frame = CameraSimulator::new().capture(&VehicleState::default(), &world());
        let far = frame.detections[1];
        assert!((far.confidence - 0.6).abs() < 1e-12);
        assert!(frame.detections[0].confidence > far.confidence);
    }

    #[test]
    fn test_visibility_scales_confidence() {
        let mut camera = CameraSimulator::new();
        camera.set_visibility(0.5);
        let frame = camera.capture(&VehicleState::default(), &world());
        assert_eq!(frame.visibility, 0.5);
        assert!((frame.detections[1].confidence - 0.3).abs() < 1e-12);

        camera.set_visibility(0.0);
        assert!(camera.capture(&VehicleState::default(), &world()).detections.is_empty());

        camera.set_visibility(f64::NAN);
        assert_eq!(camera.visibility(), 0.0);
        camera.set_visibility(3.0);
        assert_eq!(camera.visibility(), 1.0);
    }

    #[test]
    fn test_turning_brings_obstacle_into_view() {
        let state = VehicleState::at_pose(0.0, 0.0, std::f64::consts::PI);
        let frame = CameraSimulator::new().capture(&state, &world());
        assert_eq!(frame.detections.len(), 1);
        assert!(frame.detections[0].angle.abs() < 1e-9);
    }
}
