//! wheelchair-emu: hardware emulation core for powered wheelchairs
//!
//! A digital twin standing in for a chair's joystick controller, motors,
//! battery pack and sensor suite, so control software can run without
//! physical hardware. It provides:
//!
//! - Signal translation for six joystick controller families (analog and bus)
//! - Drive dynamics with motor heating, wear, wheel slip, terrain and weather
//! - A multi-cell battery pack with aging, a simplified BMS and power consumers
//! - Multi-rate synthetic sensors over a static obstacle world
//! - Scenario presets plus wear and fault injection
//!
//! Ticking is left to the caller. Within one tick the models must run in the
//! order controller, drive, power, sensors.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use wheelchair_emu::config::EmulatorConfig;
//! use wheelchair_emu::controller::{AnalogSignals, ControllerFamily, EmulatedController};
//! use wheelchair_emu::drive::DriveModel;
//! use wheelchair_emu::power::PowerModel;
//! use wheelchair_emu::sensors::SensorSuite;
//! use wheelchair_emu::state::VehicleState;
//!
//! fn main() -> Result<(), wheelchair_emu::EmuError> {
//!     let config = EmulatorConfig::default();
//!     let seed = Some(7);
//!
//!     let mut controller = EmulatedController::with_family(ControllerFamily::RNet);
//!     let mut drive = DriveModel::new(config.wheelchair.clone(), seed)?;
//!     let mut power = PowerModel::new(&config.power)?;
//!     let mut sensors = SensorSuite::new(&config.sensors, &config.wheelchair, seed)?;
//!     let mut state = VehicleState::default();
//!
//!     // Push the stick most of the way forward
//!     controller.set_raw_signals(AnalogSignals::default().with_axes(2.5, 4.5).into());
//!
//!     let dt = config.simulation.tick_seconds();
//!     for _ in 0..100 {
//!         let command = controller.read();
//!         drive.apply_command(&command, &mut state);
//!         drive.update(dt, &mut state);
//!         power.update(dt, drive.total_power_draw(), &mut state);
//!         sensors.update(dt, &state);
//!     }
//!
//!     println!("x = {:.2} m, battery {:.1}%", state.x, state.battery_percent);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod controller;
pub mod drive;
pub mod error;
pub mod power;
pub mod scenario;
pub mod sensors;
pub mod state;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::{EmulatorConfig, WheelchairModel};
pub use controller::{ControllerFamily, EmulatedController, RawSignals, SignalTranslator};
pub use drive::{DriveModel, EnvironmentalConditions, TerrainProperties};
pub use error::{EmuError, EmuResult};
pub use power::PowerModel;
pub use scenario::{FaultSet, Scenario};
pub use sensors::{SensorSnapshot, SensorSuite};
pub use state::{NormalizedCommand, VehicleState};
pub use utils::validation::{ValidationError, ValidationResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn version_info() -> VersionInfo {
    VersionInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: "Hardware emulation core for powered wheelchairs".to_string(),
        features: vec![
            "Controller family signal translation".to_string(),
            "Drive dynamics with thermal and wear models".to_string(),
            "Multi-cell battery pack with BMS".to_string(),
            "Multi-rate synthetic sensor suite".to_string(),
            "Scenario presets and fault injection".to_string(),
        ],
        controller_families: ControllerFamily::ALL.iter().map(|f| f.as_str().to_string()).collect(),
    }
}

/// Library version information
#[derive(Debug, Clone)]
pub struct VersionInfo {
    /// Library name
    pub name: String,
    /// Version string
    pub version: String,
    /// Description
    pub description: String,
    /// List of features
    pub features: Vec<String>,
    /// Supported controller family identifiers
    pub controller_families: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_info() {
        let info = version_info();
        assert_eq!(info.name, NAME);
        assert_eq!(info.version, VERSION);
        assert!(!info.features.is_empty());
        assert_eq!(info.controller_families.len(), 6);
        assert!(info.controller_families.contains(&"rnet".to_string()));
    }

    #[test]
    fn test_constants() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "wheelchair-emu");
    }
}
