// src/sensors/mod.rs
//! Synthetic sensor suite
//!
//! Inertial, GPS, ranging, imaging, proximity, encoder, environmental and
//! system-health sensors, each on its own update cadence, all observing a
//! shared static obstacle world.

pub mod camera;
pub mod encoders;
pub mod environmental;
pub mod gps;
pub mod imu;
pub mod lidar;
pub mod proximity;
pub mod suite;
pub mod types;
pub mod world;

pub use gps::{GpsErrorKind, GpsFaults};
pub use imu::ImuBiases;
pub use suite::{EncoderDiagnostics, GpsDiagnostics, SensorDiagnostics, SensorSuite};
pub use types::{
    CameraFrame, Detection, DetectionKind, ElectricalReadings, EncoderReadings, EnvironmentReadings, GpsFix,
    ImuReading, LidarScan, ProximityPosition, ProximityReadings, SensorSnapshot, SystemHealth,
};
pub use world::{Obstacle, ObstacleWorld};
