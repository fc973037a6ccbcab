//! Compilation of declarative mapping tables into resolver tables.
//!
//! A [`TranslatorBuilder`] collects a class's constant map, trivial map and
//! hand-written resolvers, and [`TranslatorBuilder::build`] turns them into a
//! [`TranslatorClass`] holding one resolver per property. Properties left
//! without a resolver fail with [`TranslationError::NotImplemented`], or, for
//! stub classes used while a new instrument is being developed, warn and
//! resolve to nothing.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use obsmeta_model::{
    Header, HeaderValue, Property, PropertyKey, PropertyValue, TranslationError,
    TranslationResult, ValueType,
};
use tracing::{debug, warn};

use crate::field::FieldSpec;
use crate::registry::TranslatorRegistry;
use crate::translator::HeaderTranslator;
use crate::validate::validate_header_value;

/// Resolver for a single property.
pub type Resolver =
    Arc<dyn Fn(&HeaderTranslator<'_>) -> TranslationResult<Option<PropertyValue>> + Send + Sync>;

/// Predicate deciding whether a class understands a header.
pub type Recognizer = Arc<dyn Fn(&Header) -> bool + Send + Sync>;

#[derive(Clone)]
enum Recognition {
    /// Resolve `instrument` and compare it with the supported instrument.
    SupportedInstrument,
    Custom(Recognizer),
}

/// A compiled translation class.
pub struct TranslatorClass {
    name: Option<String>,
    supported_instrument: Option<String>,
    resolvers: BTreeMap<PropertyKey, Resolver>,
    recognition: Recognition,
    stub: bool,
}

impl TranslatorClass {
    /// Instrument name the class is registered under.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed translator>")
    }

    pub fn supported_instrument(&self) -> Option<&str> {
        self.supported_instrument.as_deref()
    }

    pub fn is_stub(&self) -> bool {
        self.stub
    }

    pub fn has_resolver(&self, key: impl Into<PropertyKey>) -> bool {
        self.resolvers.contains_key(&key.into())
    }

    /// Properties with a resolver, in key order.
    pub fn properties(&self) -> impl Iterator<Item = &PropertyKey> + '_ {
        self.resolvers.keys()
    }

    /// Standard properties that have no resolver in this class.
    pub fn missing_properties(&self) -> Vec<Property> {
        Property::ALL
            .into_iter()
            .filter(|property| !self.has_resolver(*property))
            .collect()
    }

    /// Bind the class to a header.
    pub fn translator<'h>(self: &Arc<Self>, header: &'h Header) -> HeaderTranslator<'h> {
        HeaderTranslator::new(Arc::clone(self), header)
    }

    /// Whether this class can translate the header.
    ///
    /// The default test builds a translator and compares its `instrument`
    /// with the supported instrument; a missing instrument field means no.
    ///
    /// # Errors
    ///
    /// Any other failure to resolve `instrument`, such as a class with a
    /// supported instrument but no `instrument` resolver.
    pub fn can_translate(self: &Arc<Self>, header: &Header) -> TranslationResult<bool> {
        match &self.recognition {
            Recognition::Custom(recognizer) => Ok(recognizer(header)),
            Recognition::SupportedInstrument => {
                let Some(supported) = self.supported_instrument.as_deref() else {
                    return Ok(false);
                };
                match self.translator(header).resolve(Property::Instrument) {
                    Ok(value) => {
                        Ok(value.as_ref().and_then(PropertyValue::as_text) == Some(supported))
                    }
                    Err(error) if error.is_field_not_found() => Ok(false),
                    Err(error) => Err(error),
                }
            }
        }
    }

    pub(crate) fn invoke(
        &self,
        key: &PropertyKey,
        translator: &HeaderTranslator<'_>,
    ) -> TranslationResult<Option<PropertyValue>> {
        match self.resolvers.get(key) {
            Some(resolver) => resolver(translator),
            None if self.stub && key.is_standard() => {
                warn!(
                    property = key.as_str(),
                    translator = self.display_name(),
                    "please implement translator for property"
                );
                Ok(None)
            }
            None => Err(TranslationError::NotImplemented {
                property: key.as_str().to_string(),
                translator: self.display_name().to_string(),
            }),
        }
    }
}

impl fmt::Debug for TranslatorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslatorClass")
            .field("name", &self.name)
            .field("supported_instrument", &self.supported_instrument)
            .field("properties", &self.resolvers.keys().collect::<Vec<_>>())
            .field("stub", &self.stub)
            .finish()
    }
}

/// Declarative description of a translation class.
///
/// Layers are applied in order: the base class's resolvers, then
/// hand-written resolvers, then the trivial map, then the constant map.
/// A later layer replaces an earlier one for the same property.
#[derive(Default)]
pub struct TranslatorBuilder {
    name: Option<String>,
    supported_instrument: Option<String>,
    base: Option<Arc<TranslatorClass>>,
    overrides: Vec<(PropertyKey, Resolver)>,
    trivial_map: Vec<(String, FieldSpec)>,
    const_map: Vec<(String, PropertyValue)>,
    recognition: Option<Recognition>,
    stub: Option<bool>,
}

impl TranslatorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a class registered under `name`.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new().name(name)
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Inherit resolvers, recognition, supported instrument and stub mode.
    #[must_use]
    pub fn extends(mut self, base: &Arc<TranslatorClass>) -> Self {
        self.base = Some(Arc::clone(base));
        self
    }

    #[must_use]
    pub fn supported_instrument(mut self, instrument: impl Into<String>) -> Self {
        self.supported_instrument = Some(instrument.into());
        self
    }

    /// Unresolved standard properties warn and yield nothing instead of failing.
    ///
    /// Only for translators under development; records built this way are
    /// silently incomplete.
    #[must_use]
    pub fn stubbed(mut self) -> Self {
        self.stub = Some(true);
        self
    }

    /// Replace the default recognition test.
    #[must_use]
    pub fn recognizer<F>(mut self, recognizer: F) -> Self
    where
        F: Fn(&Header) -> bool + Send + Sync + 'static,
    {
        self.recognition = Some(Recognition::Custom(Arc::new(recognizer)));
        self
    }

    /// Hand-written resolver for a property.
    #[must_use]
    pub fn resolver<F>(mut self, key: impl Into<PropertyKey>, resolver: F) -> Self
    where
        F: Fn(&HeaderTranslator<'_>) -> TranslationResult<Option<PropertyValue>>
            + Send
            + Sync
            + 'static,
    {
        self.overrides.push((key.into(), Arc::new(resolver)));
        self
    }

    /// Read a property from header field(s).
    #[must_use]
    pub fn trivial(mut self, property: &str, spec: impl Into<FieldSpec>) -> Self {
        self.trivial_map.push((property.to_string(), spec.into()));
        self
    }

    /// Fix a property to a literal value.
    #[must_use]
    pub fn constant(mut self, property: &str, value: impl Into<PropertyValue>) -> Self {
        self.const_map.push((property.to_string(), value.into()));
        self
    }

    /// Compile the mapping tables into a class.
    pub fn build(self) -> Arc<TranslatorClass> {
        let class_name = self
            .name
            .clone()
            .unwrap_or_else(|| "<unnamed translator>".to_string());

        let (mut resolvers, base_recognition, base_instrument, base_stub) = match &self.base {
            Some(base) => (
                base.resolvers.clone(),
                Some(base.recognition.clone()),
                base.supported_instrument.clone(),
                base.stub,
            ),
            None => (BTreeMap::new(), None, None, false),
        };

        for (key, resolver) in self.overrides {
            resolvers.insert(key, resolver);
        }

        for (property, spec) in self.trivial_map {
            let key = PropertyKey::parse(&property);
            if !key.is_standard() {
                warn!(
                    property = property.as_str(),
                    translator = class_name.as_str(),
                    "unexpected trivial translator"
                );
            }
            let resolver = trivial_resolver(key.clone(), spec);
            if resolvers.insert(key, resolver).is_some() {
                debug!(
                    property = property.as_str(),
                    translator = class_name.as_str(),
                    "trivial mapping replaces inherited resolver"
                );
            }
        }

        for (property, value) in self.const_map {
            let key = PropertyKey::parse(&property);
            if !key.is_standard() {
                warn!(
                    property = property.as_str(),
                    translator = class_name.as_str(),
                    "unexpected constant translator"
                );
            }
            resolvers.insert(key, constant_resolver(value));
        }

        Arc::new(TranslatorClass {
            name: self.name,
            supported_instrument: self.supported_instrument.or(base_instrument),
            resolvers,
            recognition: self
                .recognition
                .or(base_recognition)
                .unwrap_or(Recognition::SupportedInstrument),
            stub: self.stub.unwrap_or(base_stub),
        })
    }

    /// Compile, and register the class if it is named.
    pub fn build_into(self, registry: &mut TranslatorRegistry) -> Arc<TranslatorClass> {
        let class = self.build();
        if class.name().is_some() {
            // Named classes always register; the only error is for unnamed ones.
            let _ = registry.register(Arc::clone(&class));
        }
        class
    }
}

fn resolver<F>(resolver: F) -> Resolver
where
    F: Fn(&HeaderTranslator<'_>) -> TranslationResult<Option<PropertyValue>>
        + Send
        + Sync
        + 'static,
{
    Arc::new(resolver)
}

fn constant_resolver(value: PropertyValue) -> Resolver {
    resolver(move |_| Ok(Some(value.clone())))
}

fn trivial_resolver(key: PropertyKey, spec: FieldSpec) -> Resolver {
    let value_type = key.value_type();
    resolver(move |translator| {
        if let Some(unit) = spec.unit_value() {
            let quantity = translator.quantity_from_card(&spec, unit)?;
            return Ok(Some(quantity.into()));
        }

        let (field, value) = match translator.first_present(spec.keys()) {
            Some((field, raw)) => {
                let value = match spec.default_value() {
                    Some(default) => validate_header_value(
                        raw,
                        default,
                        spec.minimum_value(),
                        spec.maximum_value(),
                    ),
                    None => raw.clone(),
                };
                translator.used_these_cards([field]);
                (Some(field), value)
            }
            None => match spec.default_value() {
                Some(default) => (None, default.clone()),
                None => return Err(TranslationError::field_not_found(spec.keys())),
            },
        };

        coerce_to_declared(value_type, field, value).map(Some)
    })
}

/// Force text-typed properties to text and float-typed ones to floats.
fn coerce_to_declared(
    value_type: Option<ValueType>,
    field: Option<&str>,
    value: HeaderValue,
) -> TranslationResult<PropertyValue> {
    match (value_type, value) {
        (Some(ValueType::Text), HeaderValue::Text(text)) => Ok(PropertyValue::Text(text)),
        (Some(ValueType::Text), other) => Ok(PropertyValue::Text(other.to_text())),
        (Some(ValueType::Float), value) => {
            value
                .coerce_f64()
                .map(PropertyValue::Float)
                .map_err(|reason| TranslationError::InvalidValue {
                    field: field.unwrap_or("<default>").to_string(),
                    value: value.to_string(),
                    reason,
                })
        }
        (_, HeaderValue::Text(text)) => Ok(PropertyValue::Text(text)),
        (_, HeaderValue::Int(value)) => Ok(PropertyValue::Int(value)),
        (_, HeaderValue::Float(value)) => Ok(PropertyValue::Float(value)),
        (_, HeaderValue::Bool(value)) => Ok(PropertyValue::Bool(value)),
    }
}
