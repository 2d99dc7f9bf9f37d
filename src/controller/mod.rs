// src/controller/mod.rs
//! Joystick controller emulation
//!
//! Raw hardware signals (analog voltages or pre-decoded bus frames) are
//! translated into [`NormalizedCommand`](crate::state::NormalizedCommand)s by
//! a family-specific translator. [`EmulatedController`] holds the current
//! signals, a scripted command sequence or a manual command and hands one
//! command per tick to the drive model.

pub mod emulated;
pub mod families;
pub mod signals;

pub use emulated::{ControllerMode, ControllerStatus, EmulatedController};
pub use families::{
    apply_deadzone,
    drive_profile_scale,
    speed_pot_scale,
    voltage_to_axis,
    AxisScaling,
    ControllerFamily,
    FamilyCharacteristics,
    FamilyDescriptor,
    SignalTier,
    SignalTranslator,
};
pub use signals::{AnalogSignals, BusPayload, RawSignals};
