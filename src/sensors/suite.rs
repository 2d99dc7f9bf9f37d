//! Multi-rate sensor suite
//! Location: src/sensors/suite.rs

use serde::Serialize;
use tracing::{debug, info, trace, warn};

use super::camera::CameraSimulator;
use super::encoders::EncoderSimulator;
use super::environmental::EnvironmentSensors;
use super::gps::{GpsErrorKind, GpsFaults, GpsSimulator};
use super::imu::{ImuBiases, ImuSimulator};
use super::lidar::LidarSimulator;
use super::proximity::ProximityArray;
use super::types::{ProximityPosition, SensorSnapshot, SystemHealth};
use super::world::{Obstacle, ObstacleWorld};
use crate::config::constants::sensors::*;
use crate::config::{SensorConfig, WheelchairConfig};
use crate::error::{EmuError, EmuResult};
use crate::state::VehicleState;
use crate::utils::math::body_to_world;
use crate::utils::noise::NoiseGenerator;

/// Elapsed-time accumulator for one sensor cadence
///
/// Starts due so the first update fills every modality.
#[derive(Debug, Clone, Copy)]
struct Cadence {
    period: f64,
    elapsed: f64,
}

impl Cadence {
    fn new(period: f64) -> Self {
        Self { period, elapsed: period }
    }

    fn tick(&mut self, dt: f64) -> bool {
        self.elapsed += dt;
        if self.elapsed + CADENCE_EPSILON_S >= self.period {
            self.elapsed = 0.0;
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Cadences {
    proximity: Cadence,
    gps: Cadence,
    lidar: Cadence,
    camera: Cadence,
}

/// Synthetic sensors reading the shared vehicle state
///
/// IMU, encoders and the environmental/health sensors refresh on every
/// update; proximity, GPS, lidar and camera fire on their own cadences.
/// The suite only ever reads [`VehicleState`].
#[derive(Debug, Clone)]
pub struct SensorSuite {
    config: SensorConfig,
    world: ObstacleWorld,
    imu: ImuSimulator,
    gps: GpsSimulator,
    lidar: LidarSimulator,
    camera: CameraSimulator,
    proximity: ProximityArray,
    encoders: EncoderSimulator,
    environment: EnvironmentSensors,
    cadences: Cadences,
    motor_temperatures: (f64, f64),
    elapsed: f64,
    snapshot: SensorSnapshot,
}

impl SensorSuite {
    pub fn new(config: &SensorConfig, wheelchair: &WheelchairConfig, seed: Option<u64>) -> EmuResult<Self> {
        config.validate()?;
        wheelchair.validate()?;

        let mut root = NoiseGenerator::new(seed);
        let world = ObstacleWorld::generate(config.obstacle_count, config.world_half_extent, &mut root);

        debug!(
            obstacles = world.obstacles().len(),
            proximity_rate = config.proximity_update_rate,
            "sensor suite created"
        );

        Ok(Self {
            config: config.clone(),
            world,
            imu: ImuSimulator::new(config.imu_noise_stddev, root.fork()),
            gps: GpsSimulator::new(root.fork()),
            lidar: LidarSimulator::new(root.fork()),
            camera: CameraSimulator::new(),
            proximity: ProximityArray::new(config.proximity_range, config.proximity_noise_stddev, root.fork()),
            encoders: EncoderSimulator::new(config.encoder_resolution, wheelchair.wheel_radius, root.fork()),
            environment: EnvironmentSensors::new(root.fork()),
            cadences: Cadences {
                proximity: Cadence::new(1.0 / config.proximity_update_rate),
                gps: Cadence::new(GPS_PERIOD_S),
                lidar: Cadence::new(LIDAR_PERIOD_S),
                camera: Cadence::new(CAMERA_PERIOD_S),
            },
            motor_temperatures: (DEFAULT_MOTOR_TEMPERATURE_C, DEFAULT_MOTOR_TEMPERATURE_C),
            elapsed: 0.0,
            snapshot: SensorSnapshot::default(),
        })
    }

    /// Advance every sensor by `dt` seconds against `state`
    pub fn update(&mut self, dt: f64, state: &VehicleState) {
        if !(dt.is_finite() && dt > 0.0) {
            trace!(dt, "ignoring non-positive sensor step");
            return;
        }
        self.elapsed += dt;

        let ambient = self.environment.readings().ambient_temperature;
        self.snapshot.imu = self.imu.update(dt, state, ambient);
        self.snapshot.encoders = self.encoders.update(dt, state);

        if self.cadences.proximity.tick(dt) {
            self.snapshot.proximity = self.proximity.read(state, &self.world);
        }
        if self.cadences.gps.tick(dt) {
            self.snapshot.gps = self.gps.fix(state);
        }
        if self.cadences.lidar.tick(dt) {
            self.snapshot.lidar = self.lidar.scan(state, &self.world, self.elapsed);
        }
        if self.cadences.camera.tick(dt) {
            self.snapshot.camera = self.camera.capture(state, &self.world);
        }

        self.snapshot.environment = self.environment.drift(dt);
        self.snapshot.system = self.environment.system_health(state);
        self.snapshot.electrical = self.environment.electrical(state, self.motor_temperatures);
        self.snapshot.timestamp = self.elapsed;

        trace!(t = self.elapsed, "sensor tick");
    }

    /// Latest readings; copy out before the next update if needed
    pub fn snapshot(&self) -> &SensorSnapshot {
        &self.snapshot
    }

    /// Inject a named GPS fault that persists until cleared
    pub fn inject_gps_error(&mut self, name: &str, magnitude: f64) -> EmuResult<()> {
        let kind: GpsErrorKind = name.parse()?;
        self.inject_gps_fault(kind, magnitude);
        Ok(())
    }

    pub fn inject_gps_fault(&mut self, kind: GpsErrorKind, magnitude: f64) {
        self.gps.inject(kind, magnitude);
        warn!(kind = %kind, magnitude, "GPS fault injected");
    }

    pub fn clear_gps_errors(&mut self) {
        self.gps.clear_faults();
        info!("GPS faults cleared");
    }

    pub fn set_visibility(&mut self, visibility: f64) {
        self.camera.set_visibility(visibility);
        debug!(visibility = self.camera.visibility(), "camera visibility set");
    }

    /// Body pitch seen by the accelerometer (rad)
    pub fn set_tilt(&mut self, pitch: f64) {
        self.imu.set_pitch(pitch);
    }

    pub fn set_ambient_temperature(&mut self, temperature: f64) {
        self.environment.set_ambient_temperature(temperature);
    }

    /// Feed motor temperatures from the drive model into the electrical readings
    pub fn record_motor_temperatures(&mut self, left: f64, right: f64) {
        self.motor_temperatures = (left, right);
    }

    pub fn add_obstacle(&mut self, obstacle: Obstacle) -> EmuResult<()> {
        if !(obstacle.x.is_finite() && obstacle.y.is_finite() && obstacle.radius.is_finite() && obstacle.radius > 0.0)
        {
            return Err(EmuError::invalid_config(
                "SensorSuite",
                format!("obstacle {:?} must have finite position and positive radius", obstacle),
            ));
        }
        self.world.add_obstacle(obstacle);
        debug!(x = obstacle.x, y = obstacle.y, radius = obstacle.radius, "obstacle added");
        Ok(())
    }

    /// Place an obstacle whose near edge is `distance` beyond the given sensor
    pub fn inject_obstacle(
        &mut self,
        state: &VehicleState,
        position: ProximityPosition,
        distance: f64,
    ) -> EmuResult<Obstacle> {
        if !(distance.is_finite() && distance >= 0.0) {
            return Err(EmuError::invalid_config(
                "SensorSuite",
                format!("obstacle distance {} must be non-negative", distance),
            ));
        }
        let (mx, my) = position.mount();
        let (ox, oy) = position.outward();
        let reach = distance + PLACED_OBSTACLE_RADIUS_M;
        let (x, y) = body_to_world(state.x, state.y, state.theta, (mx + ox * reach, my + oy * reach));
        let obstacle = Obstacle::new(x, y, PLACED_OBSTACLE_RADIUS_M);
        self.add_obstacle(obstacle)?;
        Ok(obstacle)
    }

    pub fn world(&self) -> &ObstacleWorld {
        &self.world
    }

    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    /// On-demand diagnostic view of sensor internals
    pub fn sensor_diagnostics(&self) -> SensorDiagnostics {
        let (left_count, right_count) = self.encoders.counts();
        SensorDiagnostics {
            imu: self.imu.biases(),
            gps: GpsDiagnostics {
                accuracy: self.snapshot.gps.accuracy,
                satellites: self.snapshot.gps.satellites,
                hdop: self.snapshot.gps.hdop,
                faults: self.gps.faults(),
            },
            encoders: EncoderDiagnostics {
                left_count,
                right_count,
                resolution: self.encoders.resolution(),
            },
            system: self.snapshot.system,
            visibility: self.camera.visibility(),
            obstacle_count: self.world.obstacles().len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GpsDiagnostics {
    pub accuracy: f64,
    pub satellites: u8,
    pub hdop: f64,
    pub faults: GpsFaults,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EncoderDiagnostics {
    pub left_count: u64,
    pub right_count: u64,
    pub resolution: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SensorDiagnostics {
    pub imu: ImuBiases,
    pub gps: GpsDiagnostics,
    pub encoders: EncoderDiagnostics,
    pub system: SystemHealth,
    pub visibility: f64,
    pub obstacle_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suite() -> SensorSuite {
        SensorSuite::new(&SensorConfig::default(), &WheelchairConfig::default(), Some(42)).unwrap()
    }

    #[test]
    fn test_cadence_fires_on_period() {
        let mut cadence = Cadence::new(0.1);
        assert!(cadence.tick(0.02));
        let fired: Vec<bool> = (0..10).map(|_| cadence.tick(0.02)).collect();
        assert_eq!(fired.iter().filter(|f| **f).count(), 2);
        assert!(fired[4] && fired[9]);
    }

    #[test]
    fn test_first_update_fills_every_modality() {
        let mut suite = suite();
        suite.update(0.02, &VehicleState::default());
        let snapshot = suite.snapshot();
        assert_eq!(snapshot.lidar.len(), LIDAR_RAYS);
        assert!(snapshot.gps.accuracy >= GPS_BASE_ACCURACY_M);
        assert_eq!(snapshot.timestamp, 0.02);
    }

    #[test]
    fn test_lidar_holds_between_scans() {
        let mut suite = suite();
        suite.update(0.02, &VehicleState::default());
        let first = suite.snapshot().lidar.scan_time;
        suite.update(0.02, &VehicleState::default());
        assert_eq!(suite.snapshot().lidar.scan_time, first);
        suite.update(0.02, &VehicleState::default());
        suite.update(0.02, &VehicleState::default());
        assert!(suite.snapshot().lidar.scan_time > first);
    }

    #[test]
    fn test_invalid_step_ignored() {
        let mut suite = suite();
        suite.update(-1.0, &VehicleState::default());
        suite.update(f64::NAN, &VehicleState::default());
        assert_eq!(suite.snapshot().timestamp, 0.0);
        assert!(suite.snapshot().lidar.is_empty());
    }

    #[test]
    fn test_unknown_gps_fault_rejected() {
        let mut suite = suite();
        assert!(matches!(
            suite.inject_gps_error("spoofing", 1.0),
            Err(EmuError::UnknownSensorFault { .. })
        ));
        assert!(suite.inject_gps_error("multipath", 4.0).is_ok());
        assert_eq!(suite.sensor_diagnostics().gps.faults.accuracy_inflation_m, 4.0);
        suite.clear_gps_errors();
        assert_eq!(suite.sensor_diagnostics().gps.faults, GpsFaults::default());
    }

    #[test]
    fn test_inject_obstacle_in_front() {
        let mut suite = suite();
        let state = VehicleState::default();
        let obstacle = suite.inject_obstacle(&state, ProximityPosition::Front, 1.0).unwrap();
        assert!((obstacle.x - 1.8).abs() < 1e-9);
        assert!(suite.inject_obstacle(&state, ProximityPosition::Front, -1.0).is_err());

        suite.update(0.02, &state);
        let front = suite.snapshot().proximity.front.unwrap();
        assert!((front - 1.0).abs() < 0.1);
    }

    #[test]
    fn test_same_seed_same_readings() {
        let mut a = suite();
        let mut b = suite();
        let state = VehicleState::default();
        for _ in 0..10 {
            a.update(0.02, &state);
            b.update(0.02, &state);
        }
        assert_eq!(a.snapshot(), b.snapshot());
    }
}
