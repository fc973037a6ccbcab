//! Tests for unit-attached quantities.

use obsmeta_model::{Header, Property, PropertyValue, Quantity, TranslationError, Unit};
use obsmeta_translate::{FieldSpec, TranslatorBuilder};

fn bare_translator_class() -> std::sync::Arc<obsmeta_translate::TranslatorClass> {
    TranslatorBuilder::named("Bare").build()
}

#[test]
fn absent_field_fails_even_with_default() {
    let header = Header::new().with("TELESCOP", "JCMT");
    let class = bare_translator_class();
    let translator = class.translator(&header);

    let spec = FieldSpec::new("AIRMASS").with_default(1.0).minimum(1.0);
    let error = translator
        .quantity_from_card(&spec, Unit::Dimensionless)
        .unwrap_err();
    assert_eq!(error, TranslationError::field_not_found(["AIRMASS"]));
    assert!(translator.cards_used().is_empty());
}

#[test]
fn out_of_range_value_uses_default_not_bound() {
    let header = Header::new().with("HUMIDITY", 150);
    let class = bare_translator_class();
    let translator = class.translator(&header);

    let spec = FieldSpec::new("HUMIDITY").with_default(40.0).maximum(100.0);
    let quantity = translator
        .quantity_from_card(&spec, Unit::Dimensionless)
        .expect("humidity");
    assert_eq!(quantity.value, 40.0);
    assert!(translator.cards_used().contains("HUMIDITY"));
}

#[test]
fn text_values_are_parsed_as_numbers() {
    let header = Header::new().with("EXPTIME", " 30.5 ").with("OUT-TMP", "NaN");
    let class = bare_translator_class();
    let translator = class.translator(&header);

    let exposure = translator
        .quantity_from_key("EXPTIME", Unit::Second)
        .expect("exposure time");
    assert_eq!(exposure, Quantity::new(30.5, Unit::Second));

    let spec = FieldSpec::new("OUT-TMP").with_default(273.0);
    let temperature = translator
        .quantity_from_card(&spec, Unit::Kelvin)
        .expect("temperature");
    assert_eq!(temperature, Quantity::new(273.0, Unit::Kelvin));
}

#[test]
fn non_numeric_text_is_an_invalid_value() {
    let header = Header::new().with("EXPTIME", "long");
    let class = bare_translator_class();
    let translator = class.translator(&header);

    let error = translator
        .quantity_from_key("EXPTIME", Unit::Second)
        .unwrap_err();
    assert!(matches!(error, TranslationError::InvalidValue { ref field, .. } if field == "EXPTIME"));
    assert!(translator.cards_used().is_empty());
}

#[test]
fn trivial_mapping_with_unit_delegates_to_quantity() {
    let class = TranslatorBuilder::named("Units")
        .trivial("exposure_time", FieldSpec::new("EXPTIME").unit(Unit::Second))
        .trivial(
            "temperature",
            FieldSpec::any(["TEMPERAT", "AIRTEMP"])
                .with_default(10.0)
                .minimum(-10.0)
                .maximum(40.0)
                .unit(Unit::Celsius),
        )
        .build();

    let header = Header::new().with("EXPTIME", 200).with("AIRTEMP", 55.0);
    let translator = class.translator(&header);

    assert_eq!(
        translator.require_quantity(Property::ExposureTime).expect("exposure"),
        Quantity::new(200.0, Unit::Second)
    );
    assert_eq!(
        translator.resolve(Property::Temperature).expect("temperature"),
        Some(PropertyValue::Quantity(Quantity::new(10.0, Unit::Celsius)))
    );
    assert!(translator.cards_used().contains("AIRTEMP"));
    assert!(!translator.cards_used().contains("TEMPERAT"));

    let empty = Header::new();
    let translator = class.translator(&empty);
    let error = translator.resolve(Property::Temperature).unwrap_err();
    assert_eq!(error, TranslationError::field_not_found(["TEMPERAT", "AIRTEMP"]));
}
