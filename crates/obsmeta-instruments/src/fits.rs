//! Generic FITS translation base.
//!
//! Understands the standard keywords shared by most instruments:
//! `INSTRUME`, `TELESCOP`, `DATE-OBS`, `DATE-END`, `TIMESYS` and
//! `OBSGEO-[XYZ]`. The class is unnamed and only serves as a base for
//! instrument translators.

use std::sync::Arc;

use chrono::NaiveDateTime;
use obsmeta_model::{
    EarthLocation, ObsTime, Property, PropertyValue, TimeScale, TranslationError,
    TranslationResult,
};
use obsmeta_translate::{HeaderTranslator, TranslatorBuilder, TranslatorClass};

const FITS_DATE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Compiled FITS base class.
pub fn translator() -> Arc<TranslatorClass> {
    TranslatorBuilder::new()
        .trivial("instrument", "INSTRUME")
        .trivial("telescope", "TELESCOP")
        .resolver(Property::DatetimeBegin, |translator| {
            date_from_card(translator, "DATE-OBS").map(|time| Some(time.into()))
        })
        .resolver(Property::DatetimeEnd, |translator| {
            date_from_card(translator, "DATE-END").map(|time| Some(time.into()))
        })
        .resolver(Property::Location, location_from_obsgeo)
        .build()
}

/// Parse a FITS ISO-style date.
///
/// When `time` is given it replaces any time component of `date`, keeping
/// only the leading `YYYY-MM-DD`. A bare date is taken as midnight.
pub fn parse_fits_date(date: &str, time: Option<&str>, scale: TimeScale) -> Result<ObsTime, String> {
    let date = date.trim();
    let text = match time {
        Some(time) => {
            let day = date
                .get(..10)
                .ok_or_else(|| format!("date {date:?} is too short"))?;
            format!("{day}T{}", time.trim())
        }
        None if date.len() == 10 => format!("{date}T00:00:00"),
        None => date.to_string(),
    };
    FITS_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&text, format).ok())
        .map(|instant| ObsTime::new(instant, scale))
        .ok_or_else(|| format!("{text:?} is not a FITS ISO date"))
}

/// Date from a header keyword, in the scale named by `TIMESYS` (UTC if absent).
pub fn date_from_card(translator: &HeaderTranslator<'_>, key: &str) -> TranslationResult<ObsTime> {
    let date = translator.text(key)?;
    let (scale, timesys) = match translator.text("TIMESYS") {
        Ok(timesys) => {
            let scale = timesys
                .parse::<TimeScale>()
                .map_err(|reason| invalid("TIMESYS", timesys, reason))?;
            (scale, Some("TIMESYS"))
        }
        Err(error) if error.is_field_not_found() => (TimeScale::Utc, None),
        Err(error) => return Err(error),
    };
    let time = parse_fits_date(date, None, scale).map_err(|reason| invalid(key, date, reason))?;
    translator.used_these_cards(std::iter::once(key).chain(timesys));
    Ok(time)
}

/// UTC date from a date keyword with the time of day taken from another.
pub fn date_with_time_card(
    translator: &HeaderTranslator<'_>,
    date_key: &str,
    time_key: &str,
) -> TranslationResult<ObsTime> {
    let date = translator.text(date_key)?;
    let time = translator.text(time_key)?;
    let value = parse_fits_date(date, Some(time), TimeScale::Utc)
        .map_err(|reason| invalid(time_key, time, reason))?;
    translator.used_these_cards([date_key, time_key]);
    Ok(value)
}

fn location_from_obsgeo(translator: &HeaderTranslator<'_>) -> TranslationResult<Option<PropertyValue>> {
    let cards = ["OBSGEO-X", "OBSGEO-Y", "OBSGEO-Z"];
    let x = translator.number(cards[0])?;
    let y = translator.number(cards[1])?;
    let z = translator.number(cards[2])?;
    translator.used_these_cards(cards);
    Ok(Some(EarthLocation::Geocentric { x, y, z }.into()))
}

pub(crate) fn invalid(field: &str, value: &str, reason: impl Into<String>) -> TranslationError {
    TranslationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}
