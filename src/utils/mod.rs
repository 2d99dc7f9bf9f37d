//! Common utility functions for the emulator
//!
//! - Seedable noise generation shared by every stochastic model
//! - Angle and frame helpers
//! - Configuration validation helpers
//!
//! Physical constants live in the config module, not here.

pub mod math;
pub mod noise;
pub mod validation;

pub use math::{body_to_world, clamp_unit, mat3_mul_vec3, normalize_angle};
pub use noise::NoiseGenerator;
pub use validation::{
    validate_count,
    validate_ordered,
    validate_positive,
    validate_range,
    ValidationError,
    ValidationResult,
};
