//! Range validation of scalar header values.
//!
//! Out-of-range values are rejected and replaced by the default; they are
//! never clamped to the violated bound.

use obsmeta_model::HeaderValue;

/// Returns true if `value` is a number within the optional bounds.
pub fn is_valid_value(value: f64, minimum: Option<f64>, maximum: Option<f64>) -> bool {
    if value.is_nan() {
        return false;
    }
    if minimum.is_some_and(|minimum| value < minimum) {
        return false;
    }
    !maximum.is_some_and(|maximum| value > maximum)
}

/// Validate a value, returning `default` if it is absent, NaN or out of range.
///
/// The minimum is checked before the maximum; either violation yields the
/// default.
pub fn validate_value(
    value: Option<f64>,
    default: f64,
    minimum: Option<f64>,
    maximum: Option<f64>,
) -> f64 {
    match value {
        Some(value) if is_valid_value(value, minimum, maximum) => value,
        _ => default,
    }
}

/// Validate a numeric header value against a default of the same kind.
///
/// The original value (keeping its integer or float representation) is
/// returned when it passes; otherwise the default is returned. Values or
/// defaults that are not numeric are passed through untouched.
pub fn validate_header_value(
    value: &HeaderValue,
    default: &HeaderValue,
    minimum: Option<f64>,
    maximum: Option<f64>,
) -> HeaderValue {
    let (Some(number), Some(_)) = (value.as_f64(), default.as_f64()) else {
        return value.clone();
    };
    if is_valid_value(number, minimum, maximum) {
        value.clone()
    } else {
        default.clone()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn missing_or_nan_values_use_default() {
        assert_eq!(validate_value(None, 40.0, None, None), 40.0);
        assert_eq!(validate_value(Some(f64::NAN), 40.0, Some(0.0), Some(100.0)), 40.0);
    }

    #[test]
    fn out_of_range_is_rejected_not_clamped() {
        assert_eq!(validate_value(Some(150.0), 40.0, Some(0.0), Some(100.0)), 40.0);
        assert_eq!(validate_value(Some(-5.0), 40.0, Some(0.0), Some(100.0)), 40.0);
        assert_eq!(validate_value(Some(100.0), 40.0, Some(0.0), Some(100.0)), 100.0);
    }

    #[test]
    fn header_values_keep_integer_representation() {
        let value = HeaderValue::Int(23);
        let default = HeaderValue::Float(40.0);
        assert_eq!(
            validate_header_value(&value, &default, Some(0.0), Some(100.0)),
            HeaderValue::Int(23)
        );
        assert_eq!(
            validate_header_value(&HeaderValue::Int(150), &default, None, Some(100.0)),
            HeaderValue::Float(40.0)
        );
        let text = HeaderValue::from("n/a");
        assert_eq!(validate_header_value(&text, &default, None, None), text);
    }

    proptest! {
        #[test]
        fn nan_always_yields_default(default in -1.0e6f64..1.0e6) {
            prop_assert_eq!(validate_value(Some(f64::NAN), default, None, None), default);
        }

        #[test]
        fn below_minimum_yields_default(
            minimum in -1.0e6f64..1.0e6,
            below in 0.001f64..1.0e3,
            default in -1.0e6f64..1.0e6,
        ) {
            let value = minimum - below;
            prop_assert_eq!(validate_value(Some(value), default, Some(minimum), None), default);
        }

        #[test]
        fn at_or_above_minimum_is_unchanged(
            minimum in -1.0e6f64..1.0e6,
            above in 0.0f64..1.0e3,
            default in -1.0e6f64..1.0e6,
        ) {
            let value = minimum + above;
            prop_assert_eq!(validate_value(Some(value), default, Some(minimum), None), value);
        }
    }
}
