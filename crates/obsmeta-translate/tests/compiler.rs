//! Tests for compiled translation classes.

mod common;

use common::{capture_logs, scuba_header};
use obsmeta_model::{Header, Property, PropertyKey, PropertyValue, TranslationError};
use obsmeta_translate::{FieldSpec, TranslatorBuilder};

fn scuba_class() -> std::sync::Arc<obsmeta_translate::TranslatorClass> {
    TranslatorBuilder::named("SCUBA_test")
        .supported_instrument("SCUBA_test")
        .trivial("telescope", "TELESCOP")
        .trivial("instrument", "INSTRUME")
        .trivial("observation_id", "OBSID")
        .trivial(
            "relative_humidity",
            FieldSpec::any(["RELHUMID", "HUMIDITY"])
                .with_default(40.0)
                .minimum(0.0)
                .maximum(100.0),
        )
        .build()
}

#[test]
fn trivial_mapping_reads_field_and_records_it() {
    let header = scuba_header();
    let translator = scuba_class().translator(&header);

    let telescope = translator.resolve(Property::Telescope).expect("telescope");
    assert_eq!(telescope, Some(PropertyValue::from("JCMT")));
    assert!(translator.cards_used().contains("TELESCOP"));
}

#[test]
fn constant_mapping_ignores_header_and_tracker() {
    let header = scuba_header();
    let (class, logs) = capture_logs(|| {
        TranslatorBuilder::named("SCUBA_test")
            .trivial("telescope", "TELESCOP")
            .constant("format", "HDF5")
            .build()
    });
    assert!(logs.contains("unexpected constant translator"));
    assert!(logs.contains("format"));

    for header in [header, Header::new()] {
        let translator = class.translator(&header);
        assert_eq!(
            translator.resolve("format").expect("format"),
            Some(PropertyValue::from("HDF5"))
        );
        assert!(translator.cards_used().is_empty());
    }
}

#[test]
fn fallback_candidates_record_only_the_winner() {
    let header = scuba_header();
    let translator = scuba_class().translator(&header);

    let humidity = translator.resolve(Property::RelativeHumidity).expect("humidity");
    assert_eq!(humidity, Some(PropertyValue::Float(23.0)));
    let used = translator.cards_used();
    assert!(used.contains("RELHUMID"));
    assert!(!used.contains("HUMIDITY"));

    let mut header = scuba_header();
    header.remove("RELHUMID");
    let translator = scuba_class().translator(&header);
    let humidity = translator.resolve(Property::RelativeHumidity).expect("humidity");
    assert_eq!(humidity, Some(PropertyValue::Float(88.0)));
    assert_eq!(translator.cards_used().into_iter().collect::<Vec<_>>(), ["HUMIDITY"]);
}

#[test]
fn trivial_default_rejects_out_of_range_values() {
    let header = Header::new().with("HUMIDITY", 150);
    let translator = scuba_class().translator(&header);
    let humidity = translator.resolve(Property::RelativeHumidity).expect("humidity");
    assert_eq!(humidity, Some(PropertyValue::Float(40.0)));
    assert!(translator.cards_used().contains("HUMIDITY"));
}

#[test]
fn trivial_default_applies_when_every_candidate_is_absent() {
    let header = Header::new();
    let translator = scuba_class().translator(&header);
    let humidity = translator.resolve(Property::RelativeHumidity).expect("humidity");
    assert_eq!(humidity, Some(PropertyValue::Float(40.0)));
    assert!(translator.cards_used().is_empty());
}

#[test]
fn text_properties_are_forced_to_text() {
    let header = Header::new().with("OBSID", 2_000_010_100_002_i64);
    let translator = scuba_class().translator(&header);
    assert_eq!(
        translator.require_text(Property::ObservationId).expect("observation id"),
        "2000010100002"
    );
}

#[test]
fn resolving_twice_is_idempotent() {
    let header = scuba_header();
    let translator = scuba_class().translator(&header);

    let first = translator.resolve(Property::Telescope).expect("first");
    let used_after_first = translator.cards_used();
    let second = translator.resolve(Property::Telescope).expect("second");

    assert_eq!(first, second);
    assert_eq!(translator.cards_used(), used_after_first);
}

#[test]
fn missing_resolver_is_distinct_from_missing_field() {
    let header = Header::new();
    let translator = scuba_class().translator(&header);

    let error = translator.resolve(Property::ExposureId).unwrap_err();
    assert_eq!(
        error,
        TranslationError::NotImplemented {
            property: "exposure_id".to_string(),
            translator: "SCUBA_test".to_string(),
        }
    );

    let error = translator.resolve(Property::Telescope).unwrap_err();
    assert_eq!(error, TranslationError::field_not_found(["TELESCOP"]));
    assert!(!error.is_not_implemented());
}

#[test]
fn stub_classes_warn_and_yield_nothing() {
    let class = TranslatorBuilder::named("NewCam")
        .stubbed()
        .trivial("telescope", "TELESCOP")
        .build();
    let header = scuba_header();
    let translator = class.translator(&header);

    let (value, logs) = capture_logs(|| translator.resolve(Property::Object));
    assert_eq!(value, Ok(None));
    assert!(logs.contains("please implement translator for property"));
    assert!(logs.contains("object"));

    // Non-standard names are not stubbed.
    assert!(translator.resolve("format").unwrap_err().is_not_implemented());
}

#[test]
fn unknown_trivial_names_warn_but_stay_usable() {
    let (class, logs) = capture_logs(|| {
        TranslatorBuilder::named("SCUBA_test")
            .trivial("foobar", "BAZ")
            .build()
    });
    assert!(logs.contains("unexpected trivial translator"));
    assert!(logs.contains("foobar"));
    assert!(class.has_resolver(PropertyKey::Extra("foobar".to_string())));

    let header = scuba_header();
    let translator = class.translator(&header);
    assert_eq!(
        translator.resolve("foobar").expect("foobar"),
        Some(PropertyValue::from("bar"))
    );
    assert!(translator.cards_used().contains("BAZ"));
}

#[test]
fn subclasses_inherit_and_override_resolvers() {
    let base = TranslatorBuilder::new()
        .trivial("telescope", "TELESCOP")
        .trivial("instrument", "INSTRUME")
        .build();
    let derived = TranslatorBuilder::named("Derived")
        .extends(&base)
        .supported_instrument("Derived")
        .constant("instrument", "Derived")
        .trivial("telescope", "TELCODE")
        .build();

    let header = scuba_header();
    let base_translator = base.translator(&header);
    let derived_translator = derived.translator(&header);

    assert_eq!(base.name(), None);
    assert_eq!(
        base_translator.require_text(Property::Instrument).expect("base instrument"),
        "SCUBA_test"
    );
    assert_eq!(
        derived_translator.require_text(Property::Instrument).expect("derived instrument"),
        "Derived"
    );
    assert_eq!(
        derived_translator.require_text(Property::Telescope).expect("derived telescope"),
        "LSST"
    );
    assert_eq!(
        base_translator.require_text(Property::Telescope).expect("base telescope"),
        "JCMT"
    );
}

#[test]
fn hand_written_resolvers_can_call_other_properties() {
    let class = TranslatorBuilder::named("Composite")
        .trivial("telescope", "TELESCOP")
        .trivial("instrument", "INSTRUME")
        .resolver(Property::ObservationId, |translator| {
            let telescope = translator.require_text(Property::Telescope)?;
            let instrument = translator.require_text(Property::Instrument)?;
            Ok(Some(PropertyValue::Text(format!("{telescope}/{instrument}"))))
        })
        .build();

    let header = scuba_header();
    let translator = class.translator(&header);
    assert_eq!(
        translator.require_text(Property::ObservationId).expect("observation id"),
        "JCMT/SCUBA_test"
    );
    let used = translator.cards_used();
    assert!(used.contains("TELESCOP") && used.contains("INSTRUME"));
}

#[test]
fn missing_properties_lists_unresolved_standard_properties() {
    let class = scuba_class();
    let missing = class.missing_properties();
    assert!(missing.contains(&Property::ExposureId));
    assert!(!missing.contains(&Property::Telescope));
    assert_eq!(missing.len(), Property::ALL.len() - 4);
}
