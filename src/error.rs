// src/error.rs
//! Unified error type for the emulator
//!
//! Only configuration-time operations fail. Runtime inputs such as raw
//! controller signals, terrain values and sensor ticks are clamped or
//! neutralised by the models and never surface as errors.

use thiserror::Error;

use crate::utils::validation::ValidationError;

/// Result alias used across the crate
pub type EmuResult<T> = Result<T, EmuError>;

/// Emulator error
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EmuError {
    /// Controller family name not in the supported set
    #[error("Unknown controller family '{name}' (expected one of: {})", .valid.join(", "))]
    UnknownControllerFamily { name: String, valid: Vec<String> },

    /// Wheelchair preset name not recognised
    #[error("Unknown wheelchair model '{name}' (expected one of: {})", .valid.join(", "))]
    UnknownWheelchairModel { name: String, valid: Vec<String> },

    /// Scenario preset name not recognised
    #[error("Unknown scenario '{name}' (expected one of: {})", .valid.join(", "))]
    UnknownScenario { name: String, valid: Vec<String> },

    /// Sensor fault kind not recognised
    #[error("Unknown sensor fault '{name}'")]
    UnknownSensorFault { name: String },

    /// Power consumer name not recognised
    #[error("Unknown power consumer '{name}'")]
    UnknownConsumer { name: String },

    /// Structurally invalid configuration
    #[error("Invalid configuration for {component}: {reason}")]
    InvalidConfiguration { component: String, reason: String },

    /// Configuration text could not be parsed or emitted
    #[error("Failed to process {format} configuration: {reason}")]
    ConfigFormat { format: &'static str, reason: String },

    /// Range or consistency check failed
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
}

impl EmuError {
    pub fn invalid_config(component: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            component: component.into(),
            reason: reason.into(),
        }
    }

    /// True for errors raised by name lookups
    pub fn is_unknown_name(&self) -> bool {
        matches!(
            self,
            Self::UnknownControllerFamily { .. }
                | Self::UnknownWheelchairModel { .. }
                | Self::UnknownScenario { .. }
                | Self::UnknownSensorFault { .. }
                | Self::UnknownConsumer { .. }
        )
    }
}
