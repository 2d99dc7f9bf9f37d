//! Fixed onboard power consumers
//! Location: src/power/consumers.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::constants::power::*;
use crate::error::EmuError;

/// Onboard loads fed from the pack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsumerKind {
    Motors,
    Computer,
    Sensors,
    Wireless,
    Lights,
    Cooling,
    Bms,
}

impl ConsumerKind {
    pub const ALL: [ConsumerKind; 7] = [
        ConsumerKind::Motors,
        ConsumerKind::Computer,
        ConsumerKind::Sensors,
        ConsumerKind::Wireless,
        ConsumerKind::Lights,
        ConsumerKind::Cooling,
        ConsumerKind::Bms,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConsumerKind::Motors => "motors",
            ConsumerKind::Computer => "computer",
            ConsumerKind::Sensors => "sensors",
            ConsumerKind::Wireless => "wireless",
            ConsumerKind::Lights => "lights",
            ConsumerKind::Cooling => "cooling",
            ConsumerKind::Bms => "bms",
        }
    }
}

impl fmt::Display for ConsumerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConsumerKind {
    type Err = EmuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == key)
            .ok_or_else(|| EmuError::UnknownConsumer { name: s.to_string() })
    }
}

/// One power consumer with its draw model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerConsumer {
    pub kind: ConsumerKind,
    /// Draw at rest (W)
    pub base_power: f64,
    /// Draw grows with vehicle speed
    pub load_dependent: bool,
    /// Conversion efficiency between pack and load
    pub efficiency: f64,
    pub enabled: bool,
}

impl PowerConsumer {
    pub fn new(kind: ConsumerKind, base_power: f64, load_dependent: bool, efficiency: f64) -> Self {
        Self {
            kind,
            base_power,
            load_dependent,
            efficiency,
            enabled: true,
        }
    }

    /// Power pulled from the pack at `load_factor` (W)
    pub fn pack_draw(&self, load_factor: f64) -> f64 {
        if !self.enabled {
            return 0.0;
        }
        let mut power = self.base_power;
        if self.load_dependent {
            power += power * load_factor;
        }
        power / self.efficiency
    }
}

/// Standard consumer set in fixed order
pub fn default_consumers() -> Vec<PowerConsumer> {
    vec![
        PowerConsumer::new(ConsumerKind::Motors, 0.0, true, 0.85),
        PowerConsumer::new(ConsumerKind::Computer, 15.0, false, 0.95),
        PowerConsumer::new(ConsumerKind::Sensors, 8.0, false, 0.9),
        PowerConsumer::new(ConsumerKind::Wireless, 3.0, false, 0.8),
        PowerConsumer::new(ConsumerKind::Lights, 5.0, false, 0.9),
        PowerConsumer::new(ConsumerKind::Cooling, COOLING_BASE_POWER_W, true, 0.7),
        PowerConsumer::new(ConsumerKind::Bms, 1.0, false, 0.95),
    ]
}

/// Cooling fan demand from pack temperature and motor load (W)
pub fn cooling_demand(pack_temperature: f64, motor_power: f64) -> f64 {
    COOLING_BASE_POWER_W
        + ((pack_temperature - COOLING_ONSET_C) / COOLING_SPAN_C).max(0.0) * COOLING_THERMAL_POWER_W
        + motor_power / MOTOR_POWER_REFERENCE_W * COOLING_LOAD_POWER_W
}
