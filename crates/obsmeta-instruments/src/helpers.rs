//! Resolver building blocks shared by several instruments.

use obsmeta_model::{
    HeaderValue, Property, PropertyValue, SkyPosition, TranslationError, TranslationResult,
};
use obsmeta_translate::HeaderTranslator;

use crate::fits::invalid;

/// Unit of a coordinate stored in a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngleUnit {
    Degree,
    /// Hours of right ascension (15 degrees each).
    HourAngle,
}

impl AngleUnit {
    fn to_degrees(self, value: f64) -> f64 {
        match self {
            AngleUnit::Degree => value,
            AngleUnit::HourAngle => value * 15.0,
        }
    }
}

/// Parse `"[+-]DD:MM:SS.ss"` (or a plain decimal) into decimal units.
pub fn parse_sexagesimal(text: &str) -> Result<f64, String> {
    let text = text.trim();
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let parts: Vec<&str> = body.split([':', ' ']).filter(|part| !part.is_empty()).collect();
    if parts.is_empty() || parts.len() > 3 {
        return Err(format!("{text:?} is not a sexagesimal value"));
    }
    let mut value = 0.0;
    let mut scale = 1.0;
    for part in parts {
        let component = part
            .parse::<f64>()
            .map_err(|error| format!("{text:?} is not a sexagesimal value: {error}"))?;
        if component < 0.0 {
            return Err(format!("{text:?} has a negative inner component"));
        }
        value += component / scale;
        scale *= 60.0;
    }
    Ok(if negative { -value } else { value })
}

/// Angle in degrees from a numeric or sexagesimal header value.
pub fn angle_degrees(value: &HeaderValue, unit: AngleUnit) -> Result<f64, String> {
    let raw = match value {
        HeaderValue::Text(text) => parse_sexagesimal(text)?,
        other => other.coerce_f64()?,
    };
    Ok(unit.to_degrees(raw))
}

/// Coordinate from a header keyword. Does not record the field.
pub fn angle_from_card(
    translator: &HeaderTranslator<'_>,
    key: &str,
    unit: AngleUnit,
) -> TranslationResult<f64> {
    let value = translator.value(key)?;
    angle_degrees(value, unit).map_err(|reason| invalid(key, &value.to_string(), reason))
}

/// Observation types are lower case, and `object` means `science`.
pub fn normalize_observation_type(raw: &str) -> String {
    let value = raw.trim().to_lowercase();
    if value == "object" {
        "science".to_string()
    } else {
        value
    }
}

pub fn observation_type_from_card(
    translator: &HeaderTranslator<'_>,
    key: &str,
) -> TranslationResult<Option<PropertyValue>> {
    let value = normalize_observation_type(translator.text(key)?);
    translator.used_these_cards([key]);
    Ok(Some(PropertyValue::Text(value)))
}

pub fn is_science(translator: &HeaderTranslator<'_>) -> TranslationResult<bool> {
    Ok(translator.require_text(Property::ObservationType)? == "science")
}

pub fn altitude_from_zenith_distance(zenith_distance: f64) -> f64 {
    90.0 - zenith_distance
}

/// Tracking RA/Dec from the first complete pair of degree-valued keywords.
///
/// The frame is read from the first present `radecsys` keyword and defaults
/// to ICRS. A `GAPPT` frame marks a moving target and yields nothing. When
/// no pair is present, non-science observations yield nothing and science
/// observations fail.
pub fn tracking_from_degree_headers(
    translator: &HeaderTranslator<'_>,
    radecsys: &[&str],
    pairs: &[(&str, &str)],
) -> TranslationResult<Option<PropertyValue>> {
    let mut used = Vec::new();
    let frame = match translator.first_present(radecsys) {
        Some((key, value)) => {
            used.push(key);
            let frame = value.to_string().trim().to_lowercase();
            if frame == "gappt" {
                translator.used_these_cards(used);
                return Ok(None);
            }
            frame
        }
        None => "icrs".to_string(),
    };

    for &(ra_key, dec_key) in pairs {
        if translator.has(ra_key) && translator.has(dec_key) {
            let ra = angle_from_card(translator, ra_key, AngleUnit::Degree)?;
            let dec = angle_from_card(translator, dec_key, AngleUnit::Degree)?;
            translator.used_these_cards([ra_key, dec_key].into_iter().chain(used));
            return Ok(Some(SkyPosition { ra, dec, frame }.into()));
        }
    }

    if is_science(translator)? {
        return Err(TranslationError::unparseable(
            Property::TrackingRadec.as_str(),
            "unable to determine tracking RA/Dec of science observation",
        ));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sexagesimal_strings() {
        assert_eq!(parse_sexagesimal("01:30:00").unwrap(), 1.5);
        assert_eq!(parse_sexagesimal("-00:30:00").unwrap(), -0.5);
        assert_eq!(parse_sexagesimal("+10:30:00").unwrap(), 10.5);
        assert_eq!(parse_sexagesimal("12.25").unwrap(), 12.25);
        assert!(parse_sexagesimal("north").is_err());
        assert!(parse_sexagesimal("").is_err());
    }

    #[test]
    fn hour_angles_convert_to_degrees() {
        let ra = angle_degrees(&HeaderValue::from("02:00:00.0"), AngleUnit::HourAngle).unwrap();
        assert_eq!(ra, 30.0);
        let dec = angle_degrees(&HeaderValue::Float(-4.5), AngleUnit::Degree).unwrap();
        assert_eq!(dec, -4.5);
    }

    #[test]
    fn object_is_science() {
        assert_eq!(normalize_observation_type(" OBJECT "), "science");
        assert_eq!(normalize_observation_type("Dome Flat"), "dome flat");
    }

    #[test]
    fn zenith_distance_to_altitude() {
        assert_eq!(altitude_from_zenith_distance(30.0), 60.0);
    }
}
