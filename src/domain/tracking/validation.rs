//! Tracking record validation

use thiserror::Error;

use crate::domain::DomainError;

/// Errors that can occur while validating tracking records
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TrackingValidationError {
    #[error("{0} cannot be empty")]
    Empty(&'static str),

    #[error("{0} cannot exceed {1} characters")]
    TooLong(&'static str, usize),

    #[error("Latitude must be between -90 and 90, got {0}")]
    LatitudeOutOfRange(f64),

    #[error("Longitude must be between -180 and 180, got {0}")]
    LongitudeOutOfRange(f64),

    #[error("{0} must be a finite, non-negative number")]
    NegativeOrNonFinite(&'static str),
}

impl From<TrackingValidationError> for DomainError {
    fn from(err: TrackingValidationError) -> Self {
        DomainError::validation(err.to_string())
    }
}

pub(crate) const MAX_TITLE_LENGTH: usize = 200;

/// Validate a human-readable label such as an activity title or route name
pub fn validate_label(field: &'static str, value: &str) -> Result<(), TrackingValidationError> {
    if value.trim().is_empty() {
        return Err(TrackingValidationError::Empty(field));
    }

    if value.chars().count() > MAX_TITLE_LENGTH {
        return Err(TrackingValidationError::TooLong(field, MAX_TITLE_LENGTH));
    }

    Ok(())
}

/// Validate a WGS84 coordinate pair
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), TrackingValidationError> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(TrackingValidationError::LatitudeOutOfRange(latitude));
    }

    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(TrackingValidationError::LongitudeOutOfRange(longitude));
    }

    Ok(())
}

/// Validate a measurement such as a distance, duration or speed
pub fn validate_measurement(field: &'static str, value: f64) -> Result<(), TrackingValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(TrackingValidationError::NegativeOrNonFinite(field));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_label() {
        assert!(validate_label("title", "Morning laps").is_ok());
        assert_eq!(
            validate_label("title", "   "),
            Err(TrackingValidationError::Empty("title"))
        );
        assert_eq!(
            validate_label("title", &"x".repeat(MAX_TITLE_LENGTH + 1)),
            Err(TrackingValidationError::TooLong("title", MAX_TITLE_LENGTH))
        );
    }

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_coordinates(47.3769, 8.5417).is_ok());
        assert!(validate_coordinates(-90.0, 180.0).is_ok());
        assert!(validate_coordinates(90.5, 0.0).is_err());
        assert!(validate_coordinates(0.0, -180.1).is_err());
        assert!(validate_coordinates(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_validate_measurement() {
        assert!(validate_measurement("distance", 0.0).is_ok());
        assert!(validate_measurement("distance", 1234.5).is_ok());
        assert!(validate_measurement("distance", -1.0).is_err());
        assert!(validate_measurement("distance", f64::INFINITY).is_err());
    }

    #[test]
    fn test_into_domain_error() {
        let err: DomainError = TrackingValidationError::Empty("name").into();
        assert_eq!(err.to_string(), "Validation error: name cannot be empty");
    }
}
