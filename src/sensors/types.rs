//! Sensor reading types
//! Location: src/sensors/types.rs

use serde::{Deserialize, Serialize};

use crate::config::constants::sensors::*;

/// Accelerometer (m/s²), gyroscope (rad/s) and magnetometer (µT) triples
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ImuReading {
    pub accel: [f64; 3],
    pub gyro: [f64; 3],
    pub magnetometer: [f64; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsFix {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    /// Estimated horizontal accuracy (m)
    pub accuracy: f64,
    pub satellites: u8,
    pub hdop: f64,
}

impl Default for GpsFix {
    fn default() -> Self {
        Self {
            latitude: GPS_ORIGIN_LAT,
            longitude: GPS_ORIGIN_LON,
            altitude: GPS_ORIGIN_ALT_M,
            accuracy: GPS_BASE_ACCURACY_M,
            satellites: 8,
            hdop: 1.0,
        }
    }
}

/// One 360° ranging sweep; the three vectors are index-aligned
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LidarScan {
    pub distances: Vec<f64>,
    /// Body-relative ray angles (rad)
    pub angles: Vec<f64>,
    pub intensities: Vec<f64>,
    /// Simulation time of the sweep (s)
    pub scan_time: f64,
}

impl LidarScan {
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    /// Closest return and its body-relative angle
    pub fn closest(&self) -> Option<(f64, f64)> {
        self.distances
            .iter()
            .zip(&self.angles)
            .min_by(|a, b| a.0.total_cmp(b.0))
            .map(|(d, a)| (*d, *a))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionKind {
    Obstacle,
}

/// Object seen by the camera
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub kind: DetectionKind,
    pub distance: f64,
    /// Bearing relative to the heading, positive to the left (rad)
    pub angle: f64,
    pub confidence: f64,
    /// Apparent diameter (m)
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraFrame {
    pub detections: Vec<Detection>,
    /// 0 blind, 1 perfect
    pub visibility: f64,
}

impl Default for CameraFrame {
    fn default() -> Self {
        Self {
            detections: Vec::new(),
            visibility: 1.0,
        }
    }
}

/// Mount positions of the short-range sensors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProximityPosition {
    Front,
    Rear,
    Left,
    Right,
}

impl ProximityPosition {
    pub const ALL: [ProximityPosition; 4] = [
        ProximityPosition::Front,
        ProximityPosition::Rear,
        ProximityPosition::Left,
        ProximityPosition::Right,
    ];

    /// Body-frame mount offset (m)
    pub fn mount(&self) -> (f64, f64) {
        PROXIMITY_MOUNTS[*self as usize]
    }

    /// Unit vector pointing away from the chair at this mount
    pub fn outward(&self) -> (f64, f64) {
        match self {
            ProximityPosition::Front => (1.0, 0.0),
            ProximityPosition::Rear => (-1.0, 0.0),
            ProximityPosition::Left => (0.0, 1.0),
            ProximityPosition::Right => (0.0, -1.0),
        }
    }
}

/// Distances to the nearest surface; `None` means nothing within range
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProximityReadings {
    pub front: Option<f64>,
    pub rear: Option<f64>,
    pub left: Option<f64>,
    pub right: Option<f64>,
}

impl ProximityReadings {
    pub fn get(&self, position: ProximityPosition) -> Option<f64> {
        match position {
            ProximityPosition::Front => self.front,
            ProximityPosition::Rear => self.rear,
            ProximityPosition::Left => self.left,
            ProximityPosition::Right => self.right,
        }
    }

    pub fn set(&mut self, position: ProximityPosition, reading: Option<f64>) {
        match position {
            ProximityPosition::Front => self.front = reading,
            ProximityPosition::Rear => self.rear = reading,
            ProximityPosition::Left => self.left = reading,
            ProximityPosition::Right => self.right = reading,
        }
    }

    /// Closest detection across all four sensors
    pub fn nearest(&self) -> Option<f64> {
        ProximityPosition::ALL
            .iter()
            .filter_map(|p| self.get(*p))
            .min_by(f64::total_cmp)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EncoderReadings {
    /// Cumulative ticks, never decreasing
    pub left_ticks: u64,
    pub right_ticks: u64,
    /// Wheel surface velocity from this tick's counts (m/s)
    pub left_velocity: f64,
    pub right_velocity: f64,
}

/// Onboard electrical sensors, measured independently of the pack model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElectricalReadings {
    pub battery_voltage: f64,
    pub battery_current: f64,
    pub battery_temperature: f64,
    /// Left and right motor temperature (°C)
    pub motor_temperatures: (f64, f64),
}

impl Default for ElectricalReadings {
    fn default() -> Self {
        Self {
            battery_voltage: NOMINAL_BATTERY_VOLTAGE,
            battery_current: 0.0,
            battery_temperature: 25.0,
            motor_temperatures: (DEFAULT_MOTOR_TEMPERATURE_C, DEFAULT_MOTOR_TEMPERATURE_C),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentReadings {
    pub ambient_temperature: f64,
    /// Relative humidity (0-1)
    pub humidity: f64,
    /// Barometric pressure (hPa)
    pub pressure: f64,
}

impl Default for EnvironmentReadings {
    fn default() -> Self {
        Self {
            ambient_temperature: DEFAULT_AMBIENT_TEMPERATURE_C,
            humidity: DEFAULT_HUMIDITY,
            pressure: DEFAULT_PRESSURE_HPA,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SystemHealth {
    pub cpu_temperature: f64,
    pub system_load: f64,
    /// Fraction of memory free
    pub available_memory: f64,
}

impl Default for SystemHealth {
    fn default() -> Self {
        Self {
            cpu_temperature: 45.0,
            system_load: SYSTEM_LOAD_IDLE,
            available_memory: MEMORY_AVAILABLE_IDLE,
        }
    }
}

/// Everything the sensor suite reports, as of its last update
///
/// Each modality is replaced whole when its cadence fires, so the snapshot
/// can be copied out by observers between ticks.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SensorSnapshot {
    /// Simulation time of the last update (s)
    pub timestamp: f64,
    pub imu: ImuReading,
    pub gps: GpsFix,
    pub lidar: LidarScan,
    pub camera: CameraFrame,
    pub proximity: ProximityReadings,
    pub encoders: EncoderReadings,
    pub electrical: ElectricalReadings,
    pub environment: EnvironmentReadings,
    pub system: SystemHealth,
}
