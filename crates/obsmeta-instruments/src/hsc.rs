//! Hyper Suprime-Cam on the Subaru telescope.
//!
//! Early HSC files have no `INSTRUME` keyword and recent ones call the
//! instrument "Hyper Suprime-Cam"; the instrument is always reported as
//! `HSC`.

use std::sync::{Arc, LazyLock};

use obsmeta_model::{Property, PropertyValue, Quantity, TranslationError, TranslationResult, Unit};
use obsmeta_translate::{HeaderTranslator, TranslatorBuilder, TranslatorClass};
use regex::Regex;

use crate::suprimecam::{detector_exposure_id, recognizes};

pub const NAME: &str = "HSC";

/// `HSCE########`, used from mid 2016.
static EXP_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^HSCE(\d{8})$").expect("Invalid EXP-ID regex"));

static OLD_EXP_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^HSC([A-Z])(\d{6})00$").expect("Invalid EXP-ID regex"));

static FRAME_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^HSC([A-Z])(\d{6})\d{2}$").expect("Invalid FRAMEID regex"));

/// HSC rules, layered on SuprimeCam.
pub fn builder(suprimecam: &Arc<TranslatorClass>) -> TranslatorBuilder {
    TranslatorBuilder::named(NAME)
        .extends(suprimecam)
        .supported_instrument(NAME)
        .recognizer(|header| recognizes(header, "Hyper Suprime-Cam", "HSC"))
        .constant("instrument", NAME)
        .constant("boresight_rotation_coord", "sky")
        .trivial("detector_name", "T_CCDSN")
        .resolver(Property::ExposureId, exposure_id)
        .resolver(Property::BoresightRotationAngle, |translator| {
            let position_angle = translator.quantity_from_key("INST-PA", Unit::Degree)?;
            let angle = Quantity::new(270.0 - position_angle.value, Unit::Degree);
            Ok(Some(angle.wrap_at_360().into()))
        })
        .resolver(Property::DetectorExposureId, |translator| {
            detector_exposure_id(translator, 200)
        })
}

fn exposure_id(translator: &HeaderTranslator<'_>) -> TranslationResult<Option<PropertyValue>> {
    let exp_id = translator.text("EXP-ID")?.trim();
    if let Some(digits) = EXP_ID_REGEX.captures(exp_id).and_then(|captures| captures.get(1))
        && let Ok(exposure) = digits.as_str().parse::<i64>()
    {
        translator.used_these_cards(["EXP-ID"]);
        return Ok(Some(exposure.into()));
    }

    let (mut letter, mut visit) = letter_and_visit(&OLD_EXP_ID_REGEX, exp_id, "EXP-ID")?;
    if visit == 0 {
        // EXP-ID carries a zero visit; FRAMEID has the real one.
        let frame_id = translator.text("FRAMEID")?.trim();
        (letter, visit) = letter_and_visit(&FRAME_ID_REGEX, frame_id, "FRAMEID")?;
        if visit % 2 == 1 {
            visit -= 1;
        }
        translator.used_these_cards(["EXP-ID", "FRAMEID"]);
    } else {
        translator.used_these_cards(["EXP-ID"]);
    }
    let offset = i64::from(letter as u8 - b'A');
    Ok(Some((visit + 1_000_000 * offset).into()))
}

fn letter_and_visit(regex: &Regex, value: &str, key: &str) -> TranslationResult<(char, i64)> {
    regex
        .captures(value)
        .and_then(|captures| {
            let letter = captures.get(1)?.as_str().chars().next()?;
            let visit = captures.get(2)?.as_str().parse::<i64>().ok()?;
            Some((letter, visit))
        })
        .ok_or_else(|| {
            TranslationError::unparseable(
                Property::ExposureId.as_str(),
                format!("unable to interpret {key}: {value}"),
            )
        })
}
