//! Named wheelchair chassis presets
//! Location: src/config/models.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::WheelchairConfig;
use crate::error::EmuError;

/// Chassis presets with known physical constants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WheelchairModel {
    Standard,
    HeavyDuty,
    Lightweight,
    Racing,
}

impl WheelchairModel {
    pub const ALL: [WheelchairModel; 4] = [
        WheelchairModel::Standard,
        WheelchairModel::HeavyDuty,
        WheelchairModel::Lightweight,
        WheelchairModel::Racing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WheelchairModel::Standard => "standard",
            WheelchairModel::HeavyDuty => "heavy_duty",
            WheelchairModel::Lightweight => "lightweight",
            WheelchairModel::Racing => "racing",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            WheelchairModel::Standard => "Standard indoor/outdoor power chair",
            WheelchairModel::HeavyDuty => "Bariatric chassis with larger wheels and lower top speed",
            WheelchairModel::Lightweight => "Folding travel chair",
            WheelchairModel::Racing => "Wide-track high-speed sport chassis",
        }
    }

    /// Physical configuration for this preset
    pub fn config(&self) -> WheelchairConfig {
        let (wheelbase, wheel_radius, max_velocity, max_acceleration, mass) = match self {
            WheelchairModel::Standard => (0.6, 0.15, 2.0, 1.0, 100.0),
            WheelchairModel::HeavyDuty => (0.65, 0.18, 1.5, 0.8, 150.0),
            WheelchairModel::Lightweight => (0.55, 0.12, 2.5, 1.5, 80.0),
            WheelchairModel::Racing => (0.7, 0.2, 4.0, 2.0, 90.0),
        };
        WheelchairConfig {
            wheelbase,
            wheel_radius,
            max_velocity,
            max_acceleration,
            mass,
        }
    }

    fn valid_names() -> Vec<String> {
        Self::ALL.iter().map(|m| m.as_str().to_string()).collect()
    }
}

impl fmt::Display for WheelchairModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WheelchairModel {
    type Err = EmuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == key)
            .ok_or_else(|| EmuError::UnknownWheelchairModel {
                name: s.to_string(),
                valid: Self::valid_names(),
            })
    }
}
