//! Standardized observation record.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use obsmeta_instruments::default_registry;
use obsmeta_model::{
    AltAz, EarthLocation, Header, ObsTime, Property, PropertyKey, PropertyValue, Quantity,
    SkyPosition,
};
use obsmeta_translate::{TranslatorClass, TranslatorRegistry};
use serde::Serialize;
use tracing::warn;

use crate::error::ObservationError;
use crate::options::ObservationOptions;

/// Standard properties of one observation, resolved from its header.
///
/// Every standard property is attempted. A property is absent from the
/// record when the translator returned no value, or when it failed and the
/// record was not built in pedantic mode.
#[derive(Debug, Clone, Serialize)]
pub struct ObservationInfo {
    translator: String,
    properties: BTreeMap<Property, PropertyValue>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    extensions: BTreeMap<String, PropertyValue>,
    cards_used: BTreeSet<String>,
    #[serde(skip)]
    header: Header,
}

impl ObservationInfo {
    /// Build a record with the built-in translators and default options.
    ///
    /// # Errors
    ///
    /// Returns [`ObservationError::Selection`] if no translator recognizes
    /// the header.
    pub fn new(header: Header) -> Result<Self, ObservationError> {
        Self::with_options(header, &ObservationOptions::default())
    }

    /// Build a record with the built-in translators.
    ///
    /// # Errors
    ///
    /// See [`ObservationInfo::from_registry`].
    pub fn with_options(header: Header, options: &ObservationOptions) -> Result<Self, ObservationError> {
        Self::from_registry(header, default_registry(), options)
    }

    /// Build a record, selecting the translator from `registry`.
    ///
    /// A translator named in the options is used without asking whether it
    /// recognizes the header.
    ///
    /// # Errors
    ///
    /// Returns [`ObservationError::UnknownTranslator`] for a requested name
    /// that is not registered, [`ObservationError::Selection`] when no
    /// registered translator recognizes the header, and
    /// [`ObservationError::Property`] for the first failing property in
    /// pedantic mode.
    pub fn from_registry(
        header: Header,
        registry: &TranslatorRegistry,
        options: &ObservationOptions,
    ) -> Result<Self, ObservationError> {
        let class = match options.translator.as_deref() {
            Some(name) => registry
                .get(name)
                .cloned()
                .ok_or_else(|| ObservationError::UnknownTranslator {
                    name: name.to_string(),
                })?,
            None => registry.determine_translator(&header)?,
        };
        Self::with_translator(header, &class, options)
    }

    /// Build a record with an explicit translation class.
    ///
    /// # Errors
    ///
    /// Returns [`ObservationError::Property`] for the first failing property
    /// in pedantic mode.
    pub fn with_translator(
        header: Header,
        class: &Arc<TranslatorClass>,
        options: &ObservationOptions,
    ) -> Result<Self, ObservationError> {
        let mut properties = BTreeMap::new();
        let mut extensions = BTreeMap::new();

        let cards_used = {
            let translator = class.translator(&header);
            let extra_keys: Vec<PropertyKey> = class
                .properties()
                .filter(|key| !key.is_standard())
                .cloned()
                .collect();
            let keys = Property::ALL
                .into_iter()
                .map(PropertyKey::from)
                .chain(extra_keys);

            for key in keys {
                let value = match translator.resolve(&key) {
                    Ok(value) => value,
                    Err(source) if options.pedantic => {
                        return Err(ObservationError::Property {
                            property: key,
                            source,
                        });
                    }
                    Err(error) if error.is_not_implemented() => {
                        warn!(
                            property = key.as_str(),
                            translator = class.display_name(),
                            "no translation exists for property"
                        );
                        continue;
                    }
                    Err(error) => {
                        warn!(
                            property = key.as_str(),
                            translator = class.display_name(),
                            %error,
                            "error calculating property"
                        );
                        continue;
                    }
                };
                let Some(value) = value else { continue };
                match key {
                    PropertyKey::Standard(property) => {
                        properties.insert(property, value);
                    }
                    PropertyKey::Extra(name) => {
                        extensions.insert(name, value);
                    }
                }
            }
            translator.cards_used()
        };

        Ok(Self {
            translator: class.display_name().to_string(),
            properties,
            extensions,
            cards_used,
            header,
        })
    }

    /// Name of the translation class that produced the record.
    pub fn translator_name(&self) -> &str {
        &self.translator
    }

    pub fn get(&self, property: Property) -> Option<&PropertyValue> {
        self.properties.get(&property)
    }

    /// Value of a property the translation class defines beyond the
    /// standard set.
    pub fn extension(&self, name: &str) -> Option<&PropertyValue> {
        self.extensions.get(name)
    }

    pub fn properties(&self) -> &BTreeMap<Property, PropertyValue> {
        &self.properties
    }

    pub fn extensions(&self) -> &BTreeMap<String, PropertyValue> {
        &self.extensions
    }

    /// Header keywords consulted while building the record.
    pub fn cards_used(&self) -> &BTreeSet<String> {
        &self.cards_used
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Copy of the header without the keywords used to build the record.
    pub fn stripped_header(&self) -> Header {
        self.header
            .without(self.cards_used.iter().map(String::as_str))
    }

    pub fn telescope(&self) -> Option<&str> {
        self.text(Property::Telescope)
    }

    pub fn instrument(&self) -> Option<&str> {
        self.text(Property::Instrument)
    }

    pub fn location(&self) -> Option<&EarthLocation> {
        self.get(Property::Location)
            .and_then(PropertyValue::as_location)
    }

    pub fn exposure_id(&self) -> Option<i64> {
        self.int(Property::ExposureId)
    }

    pub fn visit_id(&self) -> Option<i64> {
        self.int(Property::VisitId)
    }

    pub fn physical_filter(&self) -> Option<&str> {
        self.text(Property::PhysicalFilter)
    }

    pub fn datetime_begin(&self) -> Option<&ObsTime> {
        self.time(Property::DatetimeBegin)
    }

    pub fn datetime_end(&self) -> Option<&ObsTime> {
        self.time(Property::DatetimeEnd)
    }

    pub fn exposure_time(&self) -> Option<&Quantity> {
        self.quantity(Property::ExposureTime)
    }

    pub fn dark_time(&self) -> Option<&Quantity> {
        self.quantity(Property::DarkTime)
    }

    pub fn boresight_airmass(&self) -> Option<f64> {
        self.get(Property::BoresightAirmass)
            .and_then(PropertyValue::as_f64)
    }

    pub fn boresight_rotation_angle(&self) -> Option<&Quantity> {
        self.quantity(Property::BoresightRotationAngle)
    }

    pub fn boresight_rotation_coord(&self) -> Option<&str> {
        self.text(Property::BoresightRotationCoord)
    }

    pub fn detector_num(&self) -> Option<i64> {
        self.int(Property::DetectorNum)
    }

    pub fn detector_name(&self) -> Option<&str> {
        self.text(Property::DetectorName)
    }

    pub fn detector_exposure_id(&self) -> Option<i64> {
        self.int(Property::DetectorExposureId)
    }

    pub fn object(&self) -> Option<&str> {
        self.text(Property::Object)
    }

    pub fn temperature(&self) -> Option<&Quantity> {
        self.quantity(Property::Temperature)
    }

    pub fn pressure(&self) -> Option<&Quantity> {
        self.quantity(Property::Pressure)
    }

    pub fn relative_humidity(&self) -> Option<f64> {
        self.get(Property::RelativeHumidity)
            .and_then(PropertyValue::as_f64)
    }

    pub fn tracking_radec(&self) -> Option<&SkyPosition> {
        self.get(Property::TrackingRadec)
            .and_then(PropertyValue::as_tracking)
    }

    pub fn altaz_begin(&self) -> Option<&AltAz> {
        self.get(Property::AltazBegin)
            .and_then(PropertyValue::as_altaz)
    }

    pub fn science_program(&self) -> Option<&str> {
        self.text(Property::ScienceProgram)
    }

    pub fn observation_type(&self) -> Option<&str> {
        self.text(Property::ObservationType)
    }

    pub fn observation_id(&self) -> Option<&str> {
        self.text(Property::ObservationId)
    }

    fn text(&self, property: Property) -> Option<&str> {
        self.get(property).and_then(PropertyValue::as_text)
    }

    fn int(&self, property: Property) -> Option<i64> {
        self.get(property).and_then(PropertyValue::as_int)
    }

    fn quantity(&self, property: Property) -> Option<&Quantity> {
        self.get(property).and_then(PropertyValue::as_quantity)
    }

    fn time(&self, property: Property) -> Option<&ObsTime> {
        self.get(property).and_then(PropertyValue::as_time)
    }
}

impl fmt::Display for ObservationInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for property in Property::ALL {
            if let Some(value) = self.properties.get(&property) {
                writeln!(f, "{property}: {value}")?;
            }
        }
        for (name, value) in &self.extensions {
            writeln!(f, "{name}: {value}")?;
        }
        Ok(())
    }
}
