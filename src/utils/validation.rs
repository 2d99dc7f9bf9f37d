//! Validation utilities for emulator configuration
//!
//! Range and consistency checks used when models are constructed. Runtime
//! inputs (signals, terrain, commands) are never validated through here;
//! those are clamped by the models themselves.

use thiserror::Error;

/// Validation result type
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Value out of valid range
    #[error("Field '{field}' value '{value}' is out of range [{min}, {max}]")]
    OutOfRange {
        field: String,
        value: String,
        min: String,
        max: String,
    },
    /// NaN or infinite value
    #[error("Field '{field}' must be a finite number")]
    NotFinite { field: String },
    /// Cross-field validation failure
    #[error("Constraint violated between {}: {message}", .fields.join(", "))]
    ConstraintViolation { fields: Vec<String>, message: String },
}

/// Check that `value` is finite and inside `[min, max]`
pub fn validate_range(field: &str, value: f64, min: f64, max: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field: field.to_string() });
    }
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        });
    }
    Ok(())
}

/// Check that `value` is finite and strictly positive
pub fn validate_positive(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field: field.to_string() });
    }
    if value <= 0.0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value: value.to_string(),
            min: "0 (exclusive)".to_string(),
            max: "inf".to_string(),
        });
    }
    Ok(())
}

/// Check an integer count against `[min, max]`
pub fn validate_count(field: &str, value: usize, min: usize, max: usize) -> ValidationResult<()> {
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        });
    }
    Ok(())
}

/// Require `lower < upper` for two related fields
pub fn validate_ordered(
    lower_field: &str,
    lower: f64,
    upper_field: &str,
    upper: f64,
) -> ValidationResult<()> {
    if lower >= upper {
        return Err(ValidationError::ConstraintViolation {
            fields: vec![lower_field.to_string(), upper_field.to_string()],
            message: format!("{} ({}) must be below {} ({})", lower_field, lower, upper_field, upper),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_range() {
        assert!(validate_range("humidity", 0.5, 0.0, 1.0).is_ok());
        assert!(validate_range("humidity", 1.0, 0.0, 1.0).is_ok());

        match validate_range("humidity", 1.5, 0.0, 1.0) {
            Err(ValidationError::OutOfRange { field, .. }) => assert_eq!(field, "humidity"),
            other => panic!("Expected OutOfRange, got {:?}", other),
        }

        assert!(matches!(
            validate_range("humidity", f64::NAN, 0.0, 1.0),
            Err(ValidationError::NotFinite { .. })
        ));
    }

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive("mass", 100.0).is_ok());
        assert!(validate_positive("mass", 0.0).is_err());
        assert!(validate_positive("mass", f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_ordered() {
        assert!(validate_ordered("min_cell_voltage", 2.5, "max_cell_voltage", 4.2).is_ok());
        let err = validate_ordered("min_cell_voltage", 4.5, "max_cell_voltage", 4.2).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("min_cell_voltage"));
        assert!(message.contains("max_cell_voltage"));
    }

    #[test]
    fn test_validate_count() {
        assert!(validate_count("series_cells", 6, 1, 32).is_ok());
        assert!(validate_count("series_cells", 0, 1, 32).is_err());
    }
}
