//! HSC and SuprimeCam translation.

use obsmeta_instruments::default_registry;
use obsmeta_instruments::subaru::SUBARU_LOCATION;
use obsmeta_model::{Header, Property, PropertyValue, Quantity, TranslationError, Unit};

fn hsc_header() -> Header {
    Header::new()
        .with("INSTRUME", "Hyper Suprime-Cam")
        .with("TELESCOP", "Subaru")
        .with("EXP-ID", "HSCA90402400")
        .with("FRAMEID", "HSCA90402450")
        .with("DATE-OBS", "2013-11-02")
        .with("UT", "05:44:55.457")
        .with("UT-END", "05:45:25.457")
        .with("EXPTIME", 30.0)
        .with("OBJECT", "STRIPE82L")
        .with("PROP-ID", "o13015")
        .with("DET-ID", 50)
        .with("T_CCDSN", "120")
        .with("DETECTOR", "1_53")
        .with("AIRMASS", 1.072)
        .with("OUT-HUM", 33.1)
        .with("OUT-TMP", 272.35)
        .with("OUT-PRS", 621.7)
        .with("FILTER01", "HSC-I")
        .with("DATA-TYP", "OBJECT")
        .with("RA2000", "01:38:46.558")
        .with("DEC2000", "+00:27:22.11")
        .with("ALTITUDE", 63.0)
        .with("AZIMUTH", 230.5)
        .with("INST-PA", 90.0)
}

fn suprimecam_header() -> Header {
    Header::new()
        .with("INSTRUME", "SuprimeCam")
        .with("TELESCOP", "Subaru")
        .with("EXP-ID", "SUPE00535770")
        .with("FRAMEID", "SUPE00535770")
        .with("DATE-OBS", "2008-07-25")
        .with("UT", "09:41:23.512")
        .with("UT-END", "09:44:43.512")
        .with("EXPTIME", 200.0)
        .with("OBJECT", "Ecliptic Deep Field")
        .with("PROP-ID", "o07222")
        .with("DET-ID", 0)
        .with("DETECTOR", "w67c1")
        .with("AIRMASS", 1.024)
        .with("OUT-HUM", 4.9)
        .with("OUT-TMP", 273.15)
        .with("OUT-PRS", 621.5)
        .with("FILTER01", "w-s-r+ ")
        .with("DATA-TYP", "OBJECT")
        .with("RA2000", "20:00:00.0")
        .with("DEC2000", "-20:30:00.0")
        .with("ALTITUDE", 90.5)
        .with("AZIMUTH", 12.0)
        .with("INR-STR", -30.0)
}

#[test]
fn translates_hsc_exposure() {
    let header = hsc_header();
    let class = default_registry()
        .determine_translator(&header)
        .expect("HSC header recognized");
    assert_eq!(class.name(), Some("HSC"));
    assert!(class.missing_properties().is_empty());

    let translator = class.translator(&header);
    let text = |property: Property| translator.require_text(property).expect("text");
    let int = |property: Property| translator.require_int(property).expect("int");
    let quantity = |property: Property| translator.require_quantity(property).expect("quantity");

    assert_eq!(text(Property::Telescope), "Subaru");
    assert_eq!(text(Property::Instrument), "HSC");
    assert_eq!(text(Property::BoresightRotationCoord), "sky");
    assert_eq!(text(Property::DetectorName), "120");
    assert_eq!(text(Property::Object), "STRIPE82L");
    assert_eq!(text(Property::ObservationId), "HSCA90402400");
    assert_eq!(text(Property::ObservationType), "science");
    assert_eq!(text(Property::PhysicalFilter), "HSC-I");
    assert_eq!(text(Property::ScienceProgram), "o13015");
    assert_eq!(int(Property::DetectorNum), 50);
    assert_eq!(int(Property::ExposureId), 904024);
    assert_eq!(int(Property::VisitId), 904024);
    assert_eq!(int(Property::DetectorExposureId), 180804850);
    assert_eq!(quantity(Property::ExposureTime), Quantity::new(30.0, Unit::Second));
    assert_eq!(quantity(Property::DarkTime), Quantity::new(30.0, Unit::Second));
    assert_eq!(quantity(Property::Pressure), Quantity::new(621.7, Unit::Hectopascal));
    assert_eq!(quantity(Property::Temperature), Quantity::new(272.35, Unit::Kelvin));
    assert_eq!(
        quantity(Property::BoresightRotationAngle),
        Quantity::new(180.0, Unit::Degree)
    );
    assert_eq!(
        translator.resolve(Property::RelativeHumidity).expect("humidity"),
        Some(PropertyValue::Float(33.1))
    );
    assert_eq!(
        translator.require(Property::Location).expect("location"),
        PropertyValue::Location(SUBARU_LOCATION)
    );

    let begin = translator.require_time(Property::DatetimeBegin).expect("begin");
    assert_eq!(begin.instant.to_string(), "2013-11-02 05:44:55.457");
}

#[test]
fn hsc_exposure_id_schemes() {
    let class = default_registry().get("HSC").expect("registered");
    let exposure_id = |header: &Header| class.translator(header).require_int(Property::ExposureId);

    let current = hsc_header().with("EXP-ID", "HSCE00012345");
    assert_eq!(exposure_id(&current), Ok(12345));

    let older = hsc_header()
        .with("EXP-ID", "HSCA04090000")
        .with("FRAMEID", "HSCA04090107");
    assert_eq!(exposure_id(&older), Ok(40900));

    // A zero visit in EXP-ID is replaced from FRAMEID, rounded down to even.
    let zero = hsc_header()
        .with("EXP-ID", "HSCA00000000")
        .with("FRAMEID", "HSCB00123501");
    assert_eq!(exposure_id(&zero), Ok(1_001_234));
    let translator = class.translator(&zero);
    translator.resolve(Property::ExposureId).expect("exposure id");
    assert!(translator.cards_used().contains("FRAMEID"));

    let garbage = hsc_header().with("EXP-ID", "HSC-something");
    assert!(matches!(
        exposure_id(&garbage),
        Err(TranslationError::Unparseable { .. })
    ));
}

#[test]
fn hsc_recognized_from_frame_id_without_instrument() {
    let mut header = hsc_header();
    header.remove("INSTRUME");
    let class = default_registry()
        .determine_translator(&header)
        .expect("HSC header recognized");
    assert_eq!(class.name(), Some("HSC"));
    // The instrument is fixed, so the missing keyword does not matter.
    assert_eq!(
        class.translator(&header).require_text(Property::Instrument),
        Ok("HSC".to_string())
    );
}

#[test]
fn translates_suprimecam_exposure() {
    let header = suprimecam_header();
    let class = default_registry()
        .determine_translator(&header)
        .expect("SuprimeCam header recognized");
    assert_eq!(class.name(), Some("SuprimeCam"));

    let translator = class.translator(&header);
    let text = |property: Property| translator.require_text(property).expect("text");
    let int = |property: Property| translator.require_int(property).expect("int");

    assert_eq!(text(Property::Instrument), "SuprimeCam");
    assert_eq!(text(Property::BoresightRotationCoord), "unknown");
    assert_eq!(text(Property::DetectorName), "w67c1");
    assert_eq!(text(Property::PhysicalFilter), "W-S-R+");
    assert_eq!(int(Property::ExposureId), 53577);
    assert_eq!(int(Property::VisitId), 53577);
    assert_eq!(int(Property::DetectorExposureId), 535770);

    let altaz = translator.require(Property::AltazBegin).expect("altaz");
    assert_eq!(altaz.as_altaz().map(|altaz| altaz.altitude), Some(90.0));

    let rotation = translator
        .require_quantity(Property::BoresightRotationAngle)
        .expect("rotation");
    assert_eq!(rotation, Quantity::new(330.0, Unit::Degree));

    let tracking = translator.require(Property::TrackingRadec).expect("tracking");
    let tracking = tracking.as_tracking().expect("sky position");
    assert_eq!((tracking.ra, tracking.dec), (300.0, -20.5));
    assert_eq!(tracking.frame, "icrs");

    let end = translator.require_time(Property::DatetimeEnd).expect("end");
    assert_eq!(end.instant.to_string(), "2008-07-25 09:44:43.512");
    assert!(translator.cards_used().contains("UT-END"));
}

#[test]
fn suprimecam_calibrations_have_no_visit() {
    let header = suprimecam_header().with("DATA-TYP", "DOMEFLAT");
    let class = default_registry().get("SuprimeCam").expect("registered");
    let translator = class.translator(&header);
    assert_eq!(
        translator.require_text(Property::ObservationType),
        Ok("domeflat".to_string())
    );
    assert_eq!(translator.resolve(Property::VisitId), Ok(None));
}

#[test]
fn suprimecam_recognized_from_exposure_prefix() {
    let mut header = suprimecam_header();
    header.remove("INSTRUME");
    let class = default_registry()
        .determine_translator(&header)
        .expect("SuprimeCam header recognized");
    assert_eq!(class.name(), Some("SuprimeCam"));
}
