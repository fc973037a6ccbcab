//! Typed values produced by property resolvers.
//!
//! Units are attached, never converted: a [`Quantity`] carries the value as
//! read from the header together with the unit the header is declared in.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

/// Physical unit attached to a header value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Second,
    Kelvin,
    Celsius,
    Hectopascal,
    Pascal,
    Degree,
    Meter,
    Dimensionless,
}

impl Unit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Second => "s",
            Unit::Kelvin => "K",
            Unit::Celsius => "deg_C",
            Unit::Hectopascal => "hPa",
            Unit::Pascal => "Pa",
            Unit::Degree => "deg",
            Unit::Meter => "m",
            Unit::Dimensionless => "",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A numeric value with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: f64,
    pub unit: Unit,
}

impl Quantity {
    pub fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    /// Angle in degrees wrapped into `[0, 360)`.
    ///
    /// Non-degree quantities and NaN are returned unchanged.
    #[must_use]
    pub fn wrap_at_360(self) -> Self {
        if self.unit != Unit::Degree || !self.value.is_finite() {
            return self;
        }
        Self {
            value: self.value.rem_euclid(360.0),
            unit: self.unit,
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            Unit::Dimensionless => write!(f, "{}", self.value),
            unit => write!(f, "{} {unit}", self.value),
        }
    }
}

/// Time scale of an observation timestamp (FITS `TIMESYS`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeScale {
    #[default]
    Utc,
    Tai,
    Tt,
    Ut1,
    Tcg,
    Tcb,
    Tdb,
}

impl TimeScale {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeScale::Utc => "utc",
            TimeScale::Tai => "tai",
            TimeScale::Tt => "tt",
            TimeScale::Ut1 => "ut1",
            TimeScale::Tcg => "tcg",
            TimeScale::Tcb => "tcb",
            TimeScale::Tdb => "tdb",
        }
    }
}

impl FromStr for TimeScale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utc" => Ok(TimeScale::Utc),
            "tai" => Ok(TimeScale::Tai),
            "tt" => Ok(TimeScale::Tt),
            "ut1" => Ok(TimeScale::Ut1),
            "tcg" => Ok(TimeScale::Tcg),
            "tcb" => Ok(TimeScale::Tcb),
            "tdb" => Ok(TimeScale::Tdb),
            _ => Err(format!("Unknown time scale: {s}")),
        }
    }
}

/// Timestamp in a named time scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObsTime {
    pub instant: NaiveDateTime,
    pub scale: TimeScale,
}

impl ObsTime {
    pub fn new(instant: NaiveDateTime, scale: TimeScale) -> Self {
        Self { instant, scale }
    }

    /// Offset by a (possibly fractional) number of seconds.
    pub fn checked_add_seconds(&self, seconds: f64) -> Option<Self> {
        if !seconds.is_finite() {
            return None;
        }
        let delta = TimeDelta::microseconds((seconds * 1e6).round() as i64);
        self.instant
            .checked_add_signed(delta)
            .map(|instant| Self::new(instant, self.scale))
    }
}

impl fmt::Display for ObsTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({})",
            self.instant.format("%Y-%m-%dT%H:%M:%S%.3f"),
            self.scale.as_str()
        )
    }
}

/// Observatory location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "frame", rename_all = "snake_case")]
pub enum EarthLocation {
    /// Longitude and latitude in degrees (east-positive), height in metres.
    Geodetic {
        longitude: f64,
        latitude: f64,
        height: f64,
    },
    /// Earth-centred cartesian coordinates in metres.
    Geocentric { x: f64, y: f64, z: f64 },
}

/// Requested tracking position, in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkyPosition {
    pub ra: f64,
    pub dec: f64,
    pub frame: String,
}

/// Telescope azimuth and altitude, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AltAz {
    pub azimuth: f64,
    pub altitude: f64,
}

/// Value of a resolved property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PropertyValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Quantity(Quantity),
    Time(ObsTime),
    Location(EarthLocation),
    Tracking(SkyPosition),
    AltAz(AltAz),
}

impl PropertyValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            PropertyValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Numeric view: floats, integers and the magnitude of quantities.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Float(value) => Some(*value),
            PropertyValue::Int(value) => Some(*value as f64),
            PropertyValue::Quantity(quantity) => Some(quantity.value),
            _ => None,
        }
    }

    pub fn as_quantity(&self) -> Option<&Quantity> {
        match self {
            PropertyValue::Quantity(quantity) => Some(quantity),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<&ObsTime> {
        match self {
            PropertyValue::Time(time) => Some(time),
            _ => None,
        }
    }

    pub fn as_location(&self) -> Option<&EarthLocation> {
        match self {
            PropertyValue::Location(location) => Some(location),
            _ => None,
        }
    }

    pub fn as_tracking(&self) -> Option<&SkyPosition> {
        match self {
            PropertyValue::Tracking(position) => Some(position),
            _ => None,
        }
    }

    pub fn as_altaz(&self) -> Option<&AltAz> {
        match self {
            PropertyValue::AltAz(altaz) => Some(altaz),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Text(text) => f.write_str(text),
            PropertyValue::Int(value) => write!(f, "{value}"),
            PropertyValue::Float(value) => write!(f, "{value}"),
            PropertyValue::Bool(value) => write!(f, "{value}"),
            PropertyValue::Quantity(quantity) => write!(f, "{quantity}"),
            PropertyValue::Time(time) => write!(f, "{time}"),
            PropertyValue::Location(EarthLocation::Geodetic {
                longitude,
                latitude,
                height,
            }) => write!(f, "lon={longitude} lat={latitude} height={height}"),
            PropertyValue::Location(EarthLocation::Geocentric { x, y, z }) => {
                write!(f, "x={x} y={y} z={z}")
            }
            PropertyValue::Tracking(position) => {
                write!(f, "ra={} dec={} ({})", position.ra, position.dec, position.frame)
            }
            PropertyValue::AltAz(altaz) => {
                write!(f, "az={} alt={}", altaz.azimuth, altaz.altitude)
            }
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Int(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Float(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<Quantity> for PropertyValue {
    fn from(value: Quantity) -> Self {
        PropertyValue::Quantity(value)
    }
}

impl From<ObsTime> for PropertyValue {
    fn from(value: ObsTime) -> Self {
        PropertyValue::Time(value)
    }
}

impl From<EarthLocation> for PropertyValue {
    fn from(value: EarthLocation) -> Self {
        PropertyValue::Location(value)
    }
}

impl From<SkyPosition> for PropertyValue {
    fn from(value: SkyPosition) -> Self {
        PropertyValue::Tracking(value)
    }
}

impl From<AltAz> for PropertyValue {
    fn from(value: AltAz) -> Self {
        PropertyValue::AltAz(value)
    }
}
