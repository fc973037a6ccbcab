//! Instrument header input.
//!
//! A header is a flat mapping from case-sensitive keyword to scalar value.
//! Keywords are stored exactly as supplied (e.g. 8-character FITS keywords
//! such as `DATE-OBS`).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Scalar value stored under a header keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl HeaderValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            HeaderValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Numeric view of the value without parsing text.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            HeaderValue::Int(value) => Some(*value as f64),
            HeaderValue::Float(value) => Some(*value),
            HeaderValue::Bool(_) | HeaderValue::Text(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            HeaderValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, HeaderValue::Text(_))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, HeaderValue::Int(_) | HeaderValue::Float(_))
    }

    /// Text form of the value, as header-writing tools print it.
    ///
    /// Floats keep a decimal point (`2.0`) and switch to exponent notation
    /// outside `[1e-4, 1e16)` (`1.5e+20`); booleans print as `True`/`False`.
    pub fn to_text(&self) -> String {
        match self {
            HeaderValue::Bool(true) => "True".to_string(),
            HeaderValue::Bool(false) => "False".to_string(),
            HeaderValue::Int(value) => value.to_string(),
            HeaderValue::Float(value) => format_float(*value),
            HeaderValue::Text(text) => text.clone(),
        }
    }

    /// Coerce to a float, parsing text values.
    ///
    /// Headers sometimes store numeric quantities as strings (including
    /// `"NaN"`), so text is trimmed and parsed.
    pub fn coerce_f64(&self) -> Result<f64, String> {
        match self {
            HeaderValue::Int(value) => Ok(*value as f64),
            HeaderValue::Float(value) => Ok(*value),
            HeaderValue::Bool(value) => Ok(if *value { 1.0 } else { 0.0 }),
            HeaderValue::Text(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|error| format!("not a number: {error}")),
        }
    }
}

/// Format a float with the shortest round-trip digits.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let scientific = format!("{value:e}");
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    if (-4..16).contains(&exponent) {
        let fixed = value.to_string();
        if fixed.contains('.') {
            fixed
        } else {
            format!("{fixed}.0")
        }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.abs())
    }
}

impl fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderValue::Bool(value) => write!(f, "{value}"),
            HeaderValue::Int(value) => write!(f, "{value}"),
            HeaderValue::Float(value) => write!(f, "{value}"),
            HeaderValue::Text(value) => f.write_str(value),
        }
    }
}

impl From<&str> for HeaderValue {
    fn from(value: &str) -> Self {
        HeaderValue::Text(value.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(value: String) -> Self {
        HeaderValue::Text(value)
    }
}

impl From<i64> for HeaderValue {
    fn from(value: i64) -> Self {
        HeaderValue::Int(value)
    }
}

impl From<i32> for HeaderValue {
    fn from(value: i32) -> Self {
        HeaderValue::Int(i64::from(value))
    }
}

impl From<f64> for HeaderValue {
    fn from(value: f64) -> Self {
        HeaderValue::Float(value)
    }
}

impl From<bool> for HeaderValue {
    fn from(value: bool) -> Self {
        HeaderValue::Bool(value)
    }
}

/// Key/value header for a single exposure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Header {
    cards: BTreeMap<String, HeaderValue>,
}

impl Header {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<HeaderValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<HeaderValue>,
    ) -> Option<HeaderValue> {
        self.cards.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&HeaderValue> {
        self.cards.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.cards.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<HeaderValue> {
        self.cards.remove(key)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.cards.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderValue)> + '_ {
        self.cards.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Copy of this header without the given keywords.
    pub fn without<'a, I>(&self, keys: I) -> Header
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut stripped = self.clone();
        for key in keys {
            stripped.cards.remove(key);
        }
        stripped
    }
}

impl From<BTreeMap<String, HeaderValue>> for Header {
    fn from(cards: BTreeMap<String, HeaderValue>) -> Self {
        Self { cards }
    }
}

impl<K, V> FromIterator<(K, V)> for Header
where
    K: Into<String>,
    V: Into<HeaderValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let cards = iter
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self { cards }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floats_format_as_text() {
        assert_eq!(format_float(2.0), "2.0");
        assert_eq!(format_float(-0.5), "-0.5");
        assert_eq!(format_float(0.0001), "0.0001");
        assert_eq!(format_float(1e-5), "1e-05");
        assert_eq!(format_float(1e15), "1000000000000000.0");
        assert_eq!(format_float(1e16), "1e+16");
        assert_eq!(format_float(1.5e20), "1.5e+20");
        assert_eq!(format_float(f64::NAN), "nan");
        assert_eq!(HeaderValue::Bool(true).to_text(), "True");
        assert_eq!(HeaderValue::Int(7).to_text(), "7");
    }

    #[test]
    fn text_values_coerce_to_float() {
        assert_eq!(HeaderValue::from(" 12.5 ").coerce_f64(), Ok(12.5));
        assert!(HeaderValue::from("NaN").coerce_f64().unwrap().is_nan());
        assert!(HeaderValue::from("cloudy").coerce_f64().is_err());
    }

    #[test]
    fn without_drops_only_named_keys() {
        let header = Header::new().with("INSTRUME", "DECam").with("EXPTIME", 30.0);
        let stripped = header.without(["INSTRUME", "MISSING"]);
        assert!(!stripped.contains_key("INSTRUME"));
        assert!(stripped.contains_key("EXPTIME"));
        assert_eq!(header.len(), 2);
    }
}
