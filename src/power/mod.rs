// src/power/mod.rs
//! Battery and power distribution
//!
//! A series x parallel grid of lithium-ion cells with a simplified BMS,
//! a fixed set of onboard consumers and a lumped pack thermal model.

pub mod cell;
pub mod consumers;
pub mod pack;

pub use cell::{soc_to_voltage, BatteryCell};
pub use consumers::{ConsumerKind, PowerConsumer};
pub use pack::{
    BatterySummary, BmsStatus, CellSummary, ConsumerStatus, PowerDiagnostics, PowerHistory, PowerModel,
    PowerStatistics, ThermalSummary,
};
