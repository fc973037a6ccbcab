//! A translation class bound to one concrete header.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use obsmeta_model::{
    Header, HeaderValue, ObsTime, PropertyKey, PropertyValue, Quantity, TranslationError,
    TranslationResult, Unit,
};

use crate::compiler::TranslatorClass;
use crate::field::FieldSpec;
use crate::validate::validate_value;

/// Runtime pairing of a [`TranslatorClass`] with a header.
///
/// Tracks every header field consumed by the resolvers invoked through it.
/// The used-field set only grows for the lifetime of the instance. Successful
/// resolutions are cached, so invoking a property twice returns the same
/// value without consulting the header again.
pub struct HeaderTranslator<'h> {
    class: Arc<TranslatorClass>,
    header: &'h Header,
    used: RefCell<BTreeSet<String>>,
    cache: RefCell<BTreeMap<PropertyKey, Option<PropertyValue>>>,
}

impl<'h> HeaderTranslator<'h> {
    pub fn new(class: Arc<TranslatorClass>, header: &'h Header) -> Self {
        Self {
            class,
            header,
            used: RefCell::new(BTreeSet::new()),
            cache: RefCell::new(BTreeMap::new()),
        }
    }

    pub fn class(&self) -> &Arc<TranslatorClass> {
        &self.class
    }

    pub fn header(&self) -> &'h Header {
        self.header
    }

    /// Resolve a property through the class's resolver table.
    ///
    /// # Errors
    ///
    /// Propagates the resolver's error, or [`TranslationError::NotImplemented`]
    /// when the class has no resolver for the property.
    pub fn resolve(&self, key: impl Into<PropertyKey>) -> TranslationResult<Option<PropertyValue>> {
        let key = key.into();
        if let Some(cached) = self.cache.borrow().get(&key) {
            return Ok(cached.clone());
        }
        let value = self.class.invoke(&key, self)?;
        self.cache.borrow_mut().insert(key, value.clone());
        Ok(value)
    }

    /// Resolve a property that must produce a value.
    pub fn require(&self, key: impl Into<PropertyKey>) -> TranslationResult<PropertyValue> {
        let key = key.into();
        self.resolve(&key)?
            .ok_or_else(|| TranslationError::unparseable(key.as_str(), "no value available"))
    }

    pub fn require_text(&self, key: impl Into<PropertyKey>) -> TranslationResult<String> {
        let key = key.into();
        match self.require(&key)? {
            PropertyValue::Text(text) => Ok(text),
            other => Err(mismatch(&key, "text", &other)),
        }
    }

    pub fn require_int(&self, key: impl Into<PropertyKey>) -> TranslationResult<i64> {
        let key = key.into();
        match self.require(&key)? {
            PropertyValue::Int(value) => Ok(value),
            other => Err(mismatch(&key, "integer", &other)),
        }
    }

    pub fn require_quantity(&self, key: impl Into<PropertyKey>) -> TranslationResult<Quantity> {
        let key = key.into();
        match self.require(&key)? {
            PropertyValue::Quantity(quantity) => Ok(quantity),
            other => Err(mismatch(&key, "quantity", &other)),
        }
    }

    pub fn require_time(&self, key: impl Into<PropertyKey>) -> TranslationResult<ObsTime> {
        let key = key.into();
        match self.require(&key)? {
            PropertyValue::Time(time) => Ok(time),
            other => Err(mismatch(&key, "time", &other)),
        }
    }

    /// Raw header value. Does not record the field as used.
    pub fn value(&self, key: &str) -> TranslationResult<&'h HeaderValue> {
        self.header
            .get(key)
            .ok_or_else(|| TranslationError::field_not_found([key]))
    }

    /// Header value that must be text. Does not record the field as used.
    pub fn text(&self, key: &str) -> TranslationResult<&'h str> {
        let value = self.value(key)?;
        value.as_str().ok_or_else(|| TranslationError::InvalidValue {
            field: key.to_string(),
            value: value.to_string(),
            reason: "expected text".to_string(),
        })
    }

    /// Header value coerced to a float. Does not record the field as used.
    pub fn number(&self, key: &str) -> TranslationResult<f64> {
        let value = self.value(key)?;
        value
            .coerce_f64()
            .map_err(|reason| TranslationError::InvalidValue {
                field: key.to_string(),
                value: value.to_string(),
                reason,
            })
    }

    pub fn has(&self, key: &str) -> bool {
        self.header.contains_key(key)
    }

    /// First candidate key present in the header, with its value.
    pub fn first_present<'k, S>(&self, keys: &'k [S]) -> Option<(&'k str, &'h HeaderValue)>
    where
        S: AsRef<str>,
    {
        keys.iter().find_map(|key| {
            let key = key.as_ref();
            self.header.get(key).map(|value| (key, value))
        })
    }

    /// Record header fields as consumed.
    pub fn used_these_cards<I, S>(&self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut used = self.used.borrow_mut();
        for key in keys {
            let key = key.as_ref();
            if !used.contains(key) {
                used.insert(key.to_string());
            }
        }
    }

    /// Snapshot of the header fields consumed so far.
    pub fn cards_used(&self) -> BTreeSet<String> {
        self.used.borrow().clone()
    }

    /// Build a quantity from the first present candidate field.
    ///
    /// Text values are parsed as numbers. When the field spec carries a default,
    /// the value is validated against its bounds; the default and bounds are
    /// in the header's unit. A default never substitutes for a missing field.
    ///
    /// # Errors
    ///
    /// [`TranslationError::FieldNotFound`] if no candidate is present, and
    /// [`TranslationError::InvalidValue`] if the value is not numeric.
    pub fn quantity_from_card(&self, spec: &FieldSpec, unit: Unit) -> TranslationResult<Quantity> {
        let Some((field, raw)) = self.first_present(spec.keys()) else {
            return Err(TranslationError::field_not_found(spec.keys()));
        };
        let mut value = raw
            .coerce_f64()
            .map_err(|reason| TranslationError::InvalidValue {
                field: field.to_string(),
                value: raw.to_string(),
                reason,
            })?;
        self.used_these_cards([field]);
        if let Some(default) = spec.default_value() {
            if let Ok(default) = default.coerce_f64() {
                value = validate_value(
                    Some(value),
                    default,
                    spec.minimum_value(),
                    spec.maximum_value(),
                );
            }
        }
        Ok(Quantity::new(value, unit))
    }

    /// Quantity from a single keyword without default or bounds.
    pub fn quantity_from_key(&self, key: &str, unit: Unit) -> TranslationResult<Quantity> {
        self.quantity_from_card(&FieldSpec::new(key), unit)
    }
}

fn mismatch(key: &PropertyKey, expected: &str, found: &PropertyValue) -> TranslationError {
    TranslationError::unparseable(key.as_str(), format!("expected {expected}, got {found}"))
}
