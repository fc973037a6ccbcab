//! Dark Energy Camera on the Blanco 4m telescope.

use std::sync::{Arc, LazyLock};

use obsmeta_model::{
    AltAz, EarthLocation, Property, PropertyValue, Quantity, SkyPosition, TranslationError,
    TranslationResult, Unit,
};
use obsmeta_translate::{FieldSpec, HeaderTranslator, TranslatorBuilder, TranslatorClass};
use regex::Regex;

use crate::fits::date_from_card;
use crate::helpers::{
    AngleUnit, altitude_from_zenith_distance, angle_from_card, observation_type_from_card,
};
use crate::suprimecam::detector_exposure_id;

pub const NAME: &str = "DECam";

/// Filter recorded by calibration products in `CALIB_ID`.
static CALIB_FILTER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"filter=(\S+)").expect("Invalid CALIB_ID regex"));

/// DECam rules, layered on the FITS base.
pub fn builder(fits: &Arc<TranslatorClass>) -> TranslatorBuilder {
    TranslatorBuilder::named(NAME)
        .extends(fits)
        .supported_instrument(NAME)
        .constant(
            "boresight_rotation_angle",
            Quantity::new(f64::NAN, Unit::Degree),
        )
        .constant("boresight_rotation_coord", "unknown")
        .trivial("exposure_time", FieldSpec::new("EXPTIME").unit(Unit::Second))
        .trivial("dark_time", FieldSpec::new("DARKTIME").unit(Unit::Second))
        .trivial("boresight_airmass", "AIRMASS")
        .trivial("observation_id", "OBSID")
        .trivial("object", "OBJECT")
        .trivial("science_program", "PROPID")
        .trivial("detector_num", "CCDNUM")
        .trivial("detector_name", "DETPOS")
        // Weather keywords are unreliable; keep values physically plausible.
        .trivial(
            "relative_humidity",
            FieldSpec::new("HUMIDITY")
                .with_default(40.0)
                .minimum(0.0)
                .maximum(100.0),
        )
        .trivial(
            "temperature",
            FieldSpec::new("OUTTEMP")
                .unit(Unit::Celsius)
                .with_default(10.0)
                .minimum(-10.0)
                .maximum(40.0),
        )
        // Labelled torr but recorded in mbar.
        .trivial(
            "pressure",
            FieldSpec::new("PRESSURE")
                .unit(Unit::Hectopascal)
                .with_default(771.611)
                .minimum(700.0)
                .maximum(850.0),
        )
        .trivial("exposure_id", "EXPNUM")
        .trivial("visit_id", "EXPNUM")
        .resolver(Property::DatetimeEnd, |translator| {
            date_from_card(translator, "DTUTC").map(|time| Some(time.into()))
        })
        .resolver(Property::PhysicalFilter, physical_filter)
        .resolver(Property::Location, |translator| {
            // OBS-LONG is west-positive.
            let longitude = -translator.number("OBS-LONG")?;
            let latitude = translator.number("OBS-LAT")?;
            let height = translator.number("OBS-ELEV")?;
            translator.used_these_cards(["OBS-LONG", "OBS-LAT", "OBS-ELEV"]);
            Ok(Some(
                EarthLocation::Geodetic {
                    longitude,
                    latitude,
                    height,
                }
                .into(),
            ))
        })
        .resolver(Property::ObservationType, |translator| {
            observation_type_from_card(translator, "OBSTYPE")
        })
        .resolver(Property::TrackingRadec, tracking_radec)
        .resolver(Property::AltazBegin, |translator| {
            let azimuth = translator.number("AZ")?;
            let altitude = altitude_from_zenith_distance(translator.number("ZD")?);
            translator.used_these_cards(["AZ", "ZD"]);
            Ok(Some(AltAz { azimuth, altitude }.into()))
        })
        .resolver(Property::DetectorExposureId, |translator| {
            detector_exposure_id(translator, 100)
        })
}

/// `FILTER`, or the filter recorded in `CALIB_ID` for calibration products.
///
/// Some valid community pipeline products have neither, giving no filter.
fn physical_filter(translator: &HeaderTranslator<'_>) -> TranslationResult<Option<PropertyValue>> {
    if translator.has("FILTER") {
        if translator.require_text(Property::ObservationType)? == "zero" {
            return Ok(Some("NONE".into()));
        }
        let value = translator.text("FILTER")?.trim().to_string();
        translator.used_these_cards(["FILTER"]);
        return Ok(Some(value.into()));
    }
    if translator.has("CALIB_ID") {
        let calib_id = translator.text("CALIB_ID")?;
        let filter = CALIB_FILTER_REGEX
            .captures(calib_id)
            .and_then(|captures| captures.get(1))
            .ok_or_else(|| {
                TranslationError::unparseable(
                    Property::PhysicalFilter.as_str(),
                    format!("no filter in CALIB_ID: {calib_id}"),
                )
            })?;
        translator.used_these_cards(["CALIB_ID"]);
        return Ok(Some(filter.as_str().into()));
    }
    Ok(None)
}

fn tracking_radec(translator: &HeaderTranslator<'_>) -> TranslationResult<Option<PropertyValue>> {
    let frame = match translator.value("RADESYS") {
        Ok(value) => {
            let frame = value.to_string().trim().to_lowercase();
            if frame == "gappt" {
                // Moving target.
                translator.used_these_cards(["RADESYS"]);
                return Ok(None);
            }
            Some(frame)
        }
        Err(error) if error.is_field_not_found() => None,
        Err(error) => return Err(error),
    };
    let ra = angle_from_card(translator, "TELRA", AngleUnit::HourAngle)?;
    let dec = angle_from_card(translator, "TELDEC", AngleUnit::Degree)?;
    translator.used_these_cards(["TELRA", "TELDEC"]);
    if frame.is_some() {
        translator.used_these_cards(["RADESYS"]);
    }
    Ok(Some(
        SkyPosition {
            ra,
            dec,
            frame: frame.unwrap_or_else(|| "icrs".to_string()),
        }
        .into(),
    ))
}
