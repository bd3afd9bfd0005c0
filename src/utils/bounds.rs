//! Bounds utilities for the telemetry model
//!
//! Random-walk steps are clamped into their closed range; manual inputs
//! (finger angles from the control panel) are checked instead.

use crate::error::{ErrorContext, TelemetryError, TelemetryResult};

/// Clamp a value into a closed `(min, max)` range
///
/// NaN collapses to `min` so a bad draw can never escape the range.
#[inline]
pub fn clamp_to_range(value: f64, (min, max): (f64, f64)) -> f64 {
    if value.is_nan() {
        return min;
    }
    value.max(min).min(max)
}

/// Apply a centred random-walk step and clamp
///
/// `draw` is a uniform sample in `[0, 1)`; the step is `(draw - 0.5) * amplitude`.
#[inline]
pub fn walk(previous: f64, draw: f64, amplitude: f64, range: (f64, f64)) -> f64 {
    clamp_to_range(previous + (draw - 0.5) * amplitude, range)
}

/// Whether a value lies inside a closed range
#[inline]
pub fn within(value: f64, (min, max): (f64, f64)) -> bool {
    value >= min && value <= max
}

/// Check a value against a closed range, reporting the field on failure
pub fn check_numeric_range(
    field: &str,
    value: f64,
    range: (f64, f64),
    context: ErrorContext,
) -> TelemetryResult<()> {
    if within(value, range) {
        Ok(())
    } else {
        Err(TelemetryError::invalid_configuration(
            field,
            value,
            format!("[{}, {}]", range.0, range.1),
            context,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_context;

    #[test]
    fn test_clamp_to_range() {
        assert_eq!(clamp_to_range(5.0, (0.0, 10.0)), 5.0);
        assert_eq!(clamp_to_range(-1.0, (0.0, 10.0)), 0.0);
        assert_eq!(clamp_to_range(11.0, (0.0, 10.0)), 10.0);
        assert_eq!(clamp_to_range(f64::NAN, (3.0, 10.0)), 3.0);
    }

    #[test]
    fn test_walk_is_centred() {
        assert_eq!(walk(50.0, 0.5, 10.0, (0.0, 100.0)), 50.0);
        assert_eq!(walk(50.0, 0.0, 10.0, (0.0, 100.0)), 45.0);
        assert_eq!(walk(99.0, 0.99, 10.0, (0.0, 100.0)), 100.0);
    }

    #[test]
    fn test_check_numeric_range() {
        assert!(check_numeric_range("angle", 90.0, (0.0, 180.0), error_context!("t", "t")).is_ok());
        assert!(check_numeric_range("angle", 181.0, (0.0, 180.0), error_context!("t", "t")).is_err());
        assert!(check_numeric_range("angle", f64::NAN, (0.0, 180.0), error_context!("t", "t")).is_err());
    }
}
