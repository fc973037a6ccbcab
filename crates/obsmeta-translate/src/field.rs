//! Field specifications for trivial mappings.

use obsmeta_model::{HeaderValue, Unit};

/// Where a trivially mapped property is read from, and how.
///
/// Candidate keys are tried in declaration order and the first one present
/// in the header wins, which lets one rule cover headers whose vocabulary
/// changed over time.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    keys: Vec<String>,
    default: Option<HeaderValue>,
    minimum: Option<f64>,
    maximum: Option<f64>,
    unit: Option<Unit>,
}

impl FieldSpec {
    /// Read from a single header keyword.
    pub fn new(key: impl Into<String>) -> Self {
        Self::any([key.into()])
    }

    /// Read from the first present of several keywords.
    pub fn any<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            default: None,
            minimum: None,
            maximum: None,
            unit: None,
        }
    }

    /// Value used when the header value is missing, NaN or out of range.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<HeaderValue>) -> Self {
        self.default = Some(default.into());
        self
    }

    #[must_use]
    pub fn minimum(mut self, minimum: f64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    #[must_use]
    pub fn maximum(mut self, maximum: f64) -> Self {
        self.maximum = Some(maximum);
        self
    }

    /// Attach a unit; the property then resolves to a quantity.
    #[must_use]
    pub fn unit(mut self, unit: Unit) -> Self {
        self.unit = Some(unit);
        self
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn default_value(&self) -> Option<&HeaderValue> {
        self.default.as_ref()
    }

    pub fn minimum_value(&self) -> Option<f64> {
        self.minimum
    }

    pub fn maximum_value(&self) -> Option<f64> {
        self.maximum
    }

    pub fn unit_value(&self) -> Option<Unit> {
        self.unit
    }
}

impl From<&str> for FieldSpec {
    fn from(key: &str) -> Self {
        FieldSpec::new(key)
    }
}

impl<const N: usize> From<[&str; N]> for FieldSpec {
    fn from(keys: [&str; N]) -> Self {
        FieldSpec::any(keys)
    }
}
