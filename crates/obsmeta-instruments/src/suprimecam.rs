//! SuprimeCam on the Subaru telescope.

use std::sync::{Arc, LazyLock};

use obsmeta_model::{
    AltAz, Header, Property, PropertyValue, SkyPosition, TranslationError, TranslationResult,
    Unit,
};
use obsmeta_translate::{FieldSpec, HeaderTranslator, TranslatorBuilder, TranslatorClass};
use regex::Regex;
use tracing::warn;

use crate::fits::date_with_time_card;
use crate::helpers::{AngleUnit, angle_from_card, is_science, observation_type_from_card};

pub const NAME: &str = "SuprimeCam";

static EXP_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^SUP[A-Z](\d{7})0$").expect("Invalid EXP-ID regex"));

static FRAME_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^SUP[A-Z](\d{7})\d$").expect("Invalid FRAMEID regex"));

/// SuprimeCam rules, layered on the Subaru base.
pub fn builder(subaru: &Arc<TranslatorClass>) -> TranslatorBuilder {
    TranslatorBuilder::named(NAME)
        .extends(subaru)
        .supported_instrument(NAME)
        .recognizer(|header| recognizes(header, "SuprimeCam", "SUP"))
        .constant("boresight_rotation_coord", "unknown")
        .trivial("observation_id", "EXP-ID")
        .trivial("object", "OBJECT")
        .trivial("science_program", "PROP-ID")
        .trivial("detector_num", "DET-ID")
        .trivial("detector_name", "DETECTOR")
        .trivial("boresight_airmass", "AIRMASS")
        .trivial("relative_humidity", "OUT-HUM")
        .trivial("temperature", FieldSpec::new("OUT-TMP").unit(Unit::Kelvin))
        .trivial("pressure", FieldSpec::new("OUT-PRS").unit(Unit::Hectopascal))
        .trivial("exposure_time", FieldSpec::new("EXPTIME").unit(Unit::Second))
        // Assume same as exposure time.
        .trivial("dark_time", FieldSpec::new("EXPTIME").unit(Unit::Second))
        .resolver(Property::PhysicalFilter, |translator| {
            let value = translator.text("FILTER01")?.trim().to_uppercase();
            translator.used_these_cards(["FILTER01"]);
            Ok(Some(value.into()))
        })
        .resolver(Property::DatetimeBegin, |translator| {
            date_with_time_card(translator, "DATE-OBS", "UT").map(|time| Some(time.into()))
        })
        .resolver(Property::DatetimeEnd, |translator| {
            date_with_time_card(translator, "DATE-OBS", "UT-END").map(|time| Some(time.into()))
        })
        .resolver(Property::ExposureId, exposure_id)
        .resolver(Property::VisitId, visit_id_for_science)
        .resolver(Property::ObservationType, |translator| {
            observation_type_from_card(translator, "DATA-TYP")
        })
        .resolver(Property::TrackingRadec, |translator| {
            let ra = angle_from_card(translator, "RA2000", AngleUnit::HourAngle)?;
            let dec = angle_from_card(translator, "DEC2000", AngleUnit::Degree)?;
            translator.used_these_cards(["RA2000", "DEC2000"]);
            Ok(Some(
                SkyPosition {
                    ra,
                    dec,
                    frame: "icrs".to_string(),
                }
                .into(),
            ))
        })
        .resolver(Property::AltazBegin, altaz_begin)
        .resolver(Property::BoresightRotationAngle, |translator| {
            let angle = translator.quantity_from_key("INR-STR", Unit::Degree)?;
            Ok(Some(angle.wrap_at_360().into()))
        })
        .resolver(Property::DetectorExposureId, |translator| {
            detector_exposure_id(translator, 10)
        })
}

/// Accept headers naming `instrument`, or, for old headers without
/// `INSTRUME`, whose `EXP-ID` or `FRAMEID` starts with `prefix`.
pub(crate) fn recognizes(header: &Header, instrument: &str, prefix: &str) -> bool {
    if let Some(value) = header.get("INSTRUME") {
        return value.as_str() == Some(instrument);
    }
    ["EXP-ID", "FRAMEID"]
        .into_iter()
        .filter_map(|key| header.get(key))
        .any(|value| value.as_str().is_some_and(|id| id.starts_with(prefix)))
}

fn exposure_id(translator: &HeaderTranslator<'_>) -> TranslationResult<Option<PropertyValue>> {
    let exp_id = translator.text("EXP-ID")?.trim();
    let mut exposure = capture_number(&EXP_ID_REGEX, exp_id, "EXP-ID")?;
    if exposure == 0 {
        // EXP-ID carries a zero exposure; FRAMEID has the real one.
        let frame_id = translator.text("FRAMEID")?.trim();
        exposure = capture_number(&FRAME_ID_REGEX, frame_id, "FRAMEID")?;
        translator.used_these_cards(["EXP-ID", "FRAMEID"]);
    } else {
        translator.used_these_cards(["EXP-ID"]);
    }
    Ok(Some(exposure.into()))
}

fn capture_number(regex: &Regex, value: &str, key: &str) -> TranslationResult<i64> {
    regex
        .captures(value)
        .and_then(|captures| captures.get(1))
        .and_then(|digits| digits.as_str().parse::<i64>().ok())
        .ok_or_else(|| {
            TranslationError::unparseable(
                Property::ExposureId.as_str(),
                format!("unable to interpret {key}: {value}"),
            )
        })
}

/// Visits exist only for science observations and share the exposure ID.
pub(crate) fn visit_id_for_science(
    translator: &HeaderTranslator<'_>,
) -> TranslationResult<Option<PropertyValue>> {
    if is_science(translator)? {
        Ok(Some(translator.require_int(Property::ExposureId)?.into()))
    } else {
        Ok(None)
    }
}

fn altaz_begin(translator: &HeaderTranslator<'_>) -> TranslationResult<Option<PropertyValue>> {
    let mut altitude = translator.number("ALTITUDE")?;
    if altitude > 90.0 {
        warn!(altitude, "clipping altitude at 90 degrees");
        altitude = 90.0;
    }
    let azimuth = translator.number("AZIMUTH")?;
    translator.used_these_cards(["AZIMUTH", "ALTITUDE"]);
    Ok(Some(AltAz { azimuth, altitude }.into()))
}

/// Combine exposure and detector numbers as `exposure * factor + detector`.
pub(crate) fn detector_exposure_id(
    translator: &HeaderTranslator<'_>,
    factor: i64,
) -> TranslationResult<Option<PropertyValue>> {
    let exposure = translator.require_int(Property::ExposureId)?;
    let detector = translator.require_int(Property::DetectorNum)?;
    let combined = exposure
        .checked_mul(factor)
        .and_then(|value| value.checked_add(detector))
        .ok_or_else(|| {
            TranslationError::unparseable(
                Property::DetectorExposureId.as_str(),
                format!("exposure {exposure} with detector {detector} overflows"),
            )
        })?;
    Ok(Some(combined.into()))
}
