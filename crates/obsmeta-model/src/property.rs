use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declared semantic type of a standardized property.
///
/// Resolvers synthesized from trivial mappings use this to coerce header
/// values: [`ValueType::Text`] properties are always returned as text and
/// [`ValueType::Float`] properties are always returned as floating point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Text,
    Int,
    Float,
    Quantity,
    Angle,
    Time,
    Location,
    SkyCoord,
    AltAz,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Text => "str",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Quantity => "quantity",
            ValueType::Angle => "angle",
            ValueType::Time => "time",
            ValueType::Location => "location",
            ValueType::SkyCoord => "skycoord",
            ValueType::AltAz => "altaz",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Standardized observation properties.
///
/// This is the shared property registry: every translation class resolves
/// some subset of these, and any property it does not resolve is reported
/// as not implemented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    Telescope,
    Instrument,
    Location,
    ExposureId,
    VisitId,
    PhysicalFilter,
    DatetimeBegin,
    DatetimeEnd,
    ExposureTime,
    DarkTime,
    BoresightAirmass,
    BoresightRotationAngle,
    BoresightRotationCoord,
    DetectorNum,
    DetectorName,
    DetectorExposureId,
    Object,
    Temperature,
    Pressure,
    RelativeHumidity,
    TrackingRadec,
    AltazBegin,
    ScienceProgram,
    ObservationType,
    ObservationId,
}

impl Property {
    /// All standard properties in registry order.
    pub const ALL: [Property; 25] = [
        Property::Telescope,
        Property::Instrument,
        Property::Location,
        Property::ExposureId,
        Property::VisitId,
        Property::PhysicalFilter,
        Property::DatetimeBegin,
        Property::DatetimeEnd,
        Property::ExposureTime,
        Property::DarkTime,
        Property::BoresightAirmass,
        Property::BoresightRotationAngle,
        Property::BoresightRotationCoord,
        Property::DetectorNum,
        Property::DetectorName,
        Property::DetectorExposureId,
        Property::Object,
        Property::Temperature,
        Property::Pressure,
        Property::RelativeHumidity,
        Property::TrackingRadec,
        Property::AltazBegin,
        Property::ScienceProgram,
        Property::ObservationType,
        Property::ObservationId,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Property::Telescope => "telescope",
            Property::Instrument => "instrument",
            Property::Location => "location",
            Property::ExposureId => "exposure_id",
            Property::VisitId => "visit_id",
            Property::PhysicalFilter => "physical_filter",
            Property::DatetimeBegin => "datetime_begin",
            Property::DatetimeEnd => "datetime_end",
            Property::ExposureTime => "exposure_time",
            Property::DarkTime => "dark_time",
            Property::BoresightAirmass => "boresight_airmass",
            Property::BoresightRotationAngle => "boresight_rotation_angle",
            Property::BoresightRotationCoord => "boresight_rotation_coord",
            Property::DetectorNum => "detector_num",
            Property::DetectorName => "detector_name",
            Property::DetectorExposureId => "detector_exposure_id",
            Property::Object => "object",
            Property::Temperature => "temperature",
            Property::Pressure => "pressure",
            Property::RelativeHumidity => "relative_humidity",
            Property::TrackingRadec => "tracking_radec",
            Property::AltazBegin => "altaz_begin",
            Property::ScienceProgram => "science_program",
            Property::ObservationType => "observation_type",
            Property::ObservationId => "observation_id",
        }
    }

    /// Human-readable description of the property.
    pub fn description(&self) -> &'static str {
        match self {
            Property::Telescope => "Full name of the telescope.",
            Property::Instrument => "The instrument used to observe the exposure.",
            Property::Location => "Location of the observatory.",
            Property::ExposureId => {
                "Unique (with instrument) integer identifier for this observation."
            }
            Property::VisitId => {
                "ID of the Visit this Exposure is associated with. Science observations \
                 should essentially always be associated with a visit, but calibration \
                 observations may not be."
            }
            Property::PhysicalFilter => "The bandpass filter used for this observation.",
            Property::DatetimeBegin => "Time of the start of the observation.",
            Property::DatetimeEnd => "Time of the end of the observation.",
            Property::ExposureTime => "Duration of the exposure with shutter open (seconds).",
            Property::DarkTime => "Duration of the exposure with shutter closed (seconds).",
            Property::BoresightAirmass => "Airmass of the boresight of the telescope.",
            Property::BoresightRotationAngle => {
                "Angle of the instrument in boresight_rotation_coord frame."
            }
            Property::BoresightRotationCoord => {
                "Coordinate frame of the instrument rotation angle (options: sky, unknown)."
            }
            Property::DetectorNum => "Unique (for instrument) integer identifier for the sensor.",
            Property::DetectorName => {
                "Name of the detector within the instrument (might not be unique)."
            }
            Property::DetectorExposureId => {
                "Unique integer identifier for this detector in this exposure."
            }
            Property::Object => "Object of interest or field name.",
            Property::Temperature => "Temperature outside the dome.",
            Property::Pressure => "Atmospheric pressure outside the dome.",
            Property::RelativeHumidity => "Relative humidity outside the dome.",
            Property::TrackingRadec => "Requested RA/Dec to track.",
            Property::AltazBegin => {
                "Telescope boresight azimuth and elevation at start of observation."
            }
            Property::ScienceProgram => "Observing program (survey or proposal) identifier.",
            Property::ObservationType => {
                "Type of observation (currently: science, dark, flat, bias, focus)."
            }
            Property::ObservationId => {
                "Label uniquely identifying this observation (can be related to 'exposure_id')."
            }
        }
    }

    /// Declared type of the resolved value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Property::Telescope
            | Property::Instrument
            | Property::PhysicalFilter
            | Property::BoresightRotationCoord
            | Property::DetectorName
            | Property::Object
            | Property::ScienceProgram
            | Property::ObservationType
            | Property::ObservationId => ValueType::Text,
            Property::ExposureId
            | Property::VisitId
            | Property::DetectorNum
            | Property::DetectorExposureId => ValueType::Int,
            Property::BoresightAirmass | Property::RelativeHumidity => ValueType::Float,
            Property::ExposureTime
            | Property::DarkTime
            | Property::Temperature
            | Property::Pressure => ValueType::Quantity,
            Property::BoresightRotationAngle => ValueType::Angle,
            Property::DatetimeBegin | Property::DatetimeEnd => ValueType::Time,
            Property::Location => ValueType::Location,
            Property::TrackingRadec => ValueType::SkyCoord,
            Property::AltazBegin => ValueType::AltAz,
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Property {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Property::ALL
            .iter()
            .copied()
            .find(|property| property.as_str() == s)
            .ok_or_else(|| format!("Unknown property: {s}"))
    }
}

/// Key under which a resolver is stored in a translation class.
///
/// Mapping tables may name properties outside the standard registry; those
/// are kept as [`PropertyKey::Extra`] so the class stays usable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyKey {
    Standard(Property),
    Extra(String),
}

impl PropertyKey {
    /// Parse a property name, falling back to [`PropertyKey::Extra`].
    pub fn parse(name: &str) -> Self {
        match name.parse::<Property>() {
            Ok(property) => PropertyKey::Standard(property),
            Err(_) => PropertyKey::Extra(name.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PropertyKey::Standard(property) => property.as_str(),
            PropertyKey::Extra(name) => name,
        }
    }

    pub fn standard(&self) -> Option<Property> {
        match self {
            PropertyKey::Standard(property) => Some(*property),
            PropertyKey::Extra(_) => None,
        }
    }

    pub fn is_standard(&self) -> bool {
        matches!(self, PropertyKey::Standard(_))
    }

    /// Declared type, if the key names a standard property.
    pub fn value_type(&self) -> Option<ValueType> {
        self.standard().map(|property| property.value_type())
    }
}

impl From<Property> for PropertyKey {
    fn from(property: Property) -> Self {
        PropertyKey::Standard(property)
    }
}

impl From<&str> for PropertyKey {
    fn from(name: &str) -> Self {
        PropertyKey::parse(name)
    }
}

impl From<&PropertyKey> for PropertyKey {
    fn from(key: &PropertyKey) -> Self {
        key.clone()
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
