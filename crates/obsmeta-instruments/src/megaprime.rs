//! MegaPrime on the Canada-France-Hawaii Telescope.
//!
//! MegaPrime headers changed vocabulary several times, so many properties
//! are read from lists of candidate keywords.

use std::sync::Arc;

use obsmeta_model::{
    AltAz, EarthLocation, Property, PropertyValue, Quantity, TranslationError,
    TranslationResult, Unit,
};
use obsmeta_translate::{FieldSpec, HeaderTranslator, TranslatorBuilder, TranslatorClass};

use crate::fits::date_with_time_card;
use crate::helpers::{is_science, observation_type_from_card, tracking_from_degree_headers};
use crate::suprimecam::detector_exposure_id;

pub const NAME: &str = "MegaPrime";

/// Height of CFHT, missing from some MegaPrime headers.
const CFHT_HEIGHT: f64 = 4215.0;

/// CFHT site, used when the header has no location keywords.
pub const CFHT_LOCATION: EarthLocation = EarthLocation::Geodetic {
    longitude: -155.468876,
    latitude: 19.825252,
    height: CFHT_HEIGHT,
};

/// Detector number for headers without `EXTNAME` (primary HDU).
const PRIMARY_DETECTOR: i64 = 99;

/// Filter names used by the MegaPrime filter set.
pub const FILTERS: &[(&str, &str)] = &[
    ("u.MP9301", "u"),
    ("u.MP9302", "u2"),
    ("g.MP9401", "g"),
    ("g.MP9402", "g2"),
    ("r.MP9601", "r"),
    ("r.MP9602", "r2"),
    ("i.MP9701", "i"),
    ("i.MP9702", "i2"),
    ("i.MP9703", "i3"),
    ("z.MP9801", "z"),
    ("z.MP9901", "z2"),
];

/// Short band name for a MegaPrime physical filter.
pub fn band_for_filter(physical_filter: &str) -> Option<&'static str> {
    FILTERS
        .iter()
        .find(|(physical, _)| *physical == physical_filter)
        .map(|(_, band)| *band)
}

/// MegaPrime rules, layered on the FITS base.
pub fn builder(fits: &Arc<TranslatorClass>) -> TranslatorBuilder {
    TranslatorBuilder::named(NAME)
        .extends(fits)
        .supported_instrument(NAME)
        .constant(
            "boresight_rotation_angle",
            Quantity::new(f64::NAN, Unit::Degree),
        )
        .constant("boresight_rotation_coord", "unknown")
        .trivial("physical_filter", "FILTER")
        .trivial("dark_time", FieldSpec::new("DARKTIME").unit(Unit::Second))
        .trivial("exposure_time", FieldSpec::new("EXPTIME").unit(Unit::Second))
        .trivial("observation_id", "OBSID")
        .trivial("object", "OBJECT")
        .trivial("science_program", "RUNID")
        .trivial("exposure_id", "EXPNUM")
        .trivial("visit_id", "EXPNUM")
        .trivial("detector_name", "CCDNAME")
        .trivial("relative_humidity", ["RELHUMID", "HUMIDITY"])
        .trivial(
            "temperature",
            FieldSpec::any(["TEMPERAT", "AIRTEMP"]).unit(Unit::Celsius),
        )
        .trivial("boresight_airmass", ["AIRMASS", "BORE-AIRMASS"])
        .resolver(Property::DatetimeBegin, |translator| {
            date_with_time_card(translator, "DATE-OBS", "UTC-OBS").map(|time| Some(time.into()))
        })
        .resolver(Property::DatetimeEnd, datetime_end)
        .resolver(Property::Location, location)
        .resolver(Property::DetectorNum, detector_num)
        .resolver(Property::ObservationType, |translator| {
            observation_type_from_card(translator, "OBSTYPE")
        })
        .resolver(Property::TrackingRadec, |translator| {
            tracking_from_degree_headers(
                translator,
                &["RADECSYS", "OBJRADEC", "RADESYS"],
                &[("RA_DEG", "DEC_DEG"), ("BORE-RA", "BORE-DEC")],
            )
        })
        .resolver(Property::AltazBegin, altaz_begin)
        .resolver(Property::DetectorExposureId, |translator| {
            detector_exposure_id(translator, 36)
        })
        .resolver(Property::Pressure, pressure)
}

/// Older files lack `UTCEND`; estimate from the exposure time.
fn datetime_end(translator: &HeaderTranslator<'_>) -> TranslationResult<Option<PropertyValue>> {
    if translator.has("UTCEND") {
        let end = date_with_time_card(translator, "DATE-OBS", "UTCEND")?;
        return Ok(Some(end.into()));
    }
    let begin = translator.require_time(Property::DatetimeBegin)?;
    let exposure = translator.require_quantity(Property::ExposureTime)?;
    let end = begin.checked_add_seconds(exposure.value).ok_or_else(|| {
        TranslationError::unparseable(
            Property::DatetimeEnd.as_str(),
            format!("cannot offset {begin} by {exposure}"),
        )
    })?;
    Ok(Some(end.into()))
}

fn location(translator: &HeaderTranslator<'_>) -> TranslationResult<Option<PropertyValue>> {
    for (longitude_key, latitude_key) in [("LONGITUD", "LATITUDE"), ("OBS-LONG", "OBS-LAT")] {
        if translator.has(longitude_key) && translator.has(latitude_key) {
            let longitude = translator.number(longitude_key)?;
            let latitude = translator.number(latitude_key)?;
            translator.used_these_cards([longitude_key, latitude_key]);
            return Ok(Some(
                EarthLocation::Geodetic {
                    longitude,
                    latitude,
                    height: CFHT_HEIGHT,
                }
                .into(),
            ));
        }
    }
    Ok(Some(CFHT_LOCATION.into()))
}

/// Detector number from `EXTNAME` (`ccdNN`).
fn detector_num(translator: &HeaderTranslator<'_>) -> TranslationResult<Option<PropertyValue>> {
    let number = translator
        .text("EXTNAME")
        .ok()
        .and_then(|extname| extname.get(3..))
        .and_then(|digits| digits.trim().parse::<i64>().ok());
    match number {
        Some(number) => {
            translator.used_these_cards(["EXTNAME"]);
            Ok(Some(number.into()))
        }
        None => Ok(Some(PRIMARY_DETECTOR.into())),
    }
}

/// Calibrations use magic negative positions when the telescope is not
/// involved; those yield no alt/az.
fn altaz_begin(translator: &HeaderTranslator<'_>) -> TranslationResult<Option<PropertyValue>> {
    for (azimuth_key, altitude_key) in [("TELAZ", "TELALT"), ("BORE-AZ", "BORE-ALT")] {
        if translator.has(azimuth_key) && translator.has(altitude_key) {
            let azimuth = translator.number(azimuth_key)?;
            let altitude = translator.number(altitude_key)?;
            if azimuth < 1.0 || altitude < 1.0 {
                return Ok(None);
            }
            translator.used_these_cards([azimuth_key, altitude_key]);
            return Ok(Some(AltAz { azimuth, altitude }.into()));
        }
    }
    if is_science(translator)? {
        return Err(TranslationError::unparseable(
            Property::AltazBegin.as_str(),
            "unable to determine alt/az of science observation",
        ));
    }
    Ok(None)
}

/// `PRESSURE` is in mbar, `AIRPRESS` in Pa.
fn pressure(translator: &HeaderTranslator<'_>) -> TranslationResult<Option<PropertyValue>> {
    for (key, unit) in [("PRESSURE", Unit::Hectopascal), ("AIRPRESS", Unit::Pascal)] {
        if translator.has(key) {
            return Ok(Some(translator.quantity_from_key(key, unit)?.into()));
        }
    }
    Err(TranslationError::field_not_found(["PRESSURE", "AIRPRESS"]))
}
