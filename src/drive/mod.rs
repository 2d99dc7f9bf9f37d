// src/drive/mod.rs
//! Drive train and vehicle dynamics
//!
//! Motor heating, wear and efficiency, wheel/ground slip, differential-drive
//! kinematics and pose integration under configurable terrain and weather.

pub mod dynamics;
pub mod environment;
pub mod motor;

pub use dynamics::{DriveModel, MotorDiagnostics, TerrainSummary, WheelSlip};
pub use environment::{EnvironmentalConditions, TerrainProperties};
pub use motor::{MotorSide, MotorState};
