use thiserror::Error;

/// Failures raised while resolving a property from a header.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TranslationError {
    /// None of the candidate fields is present and no default applies.
    #[error("could not find {candidates:?} in header")]
    FieldNotFound { candidates: Vec<String> },

    /// No registered translation class recognized the header.
    #[error("none of the registered translation classes understood this header")]
    UnrecognizedHeader,

    /// The translation class has no resolver for the property.
    #[error("translator for '{property}' undefined in {translator}")]
    NotImplemented { property: String, translator: String },

    /// A present header value could not be coerced to the required type.
    #[error("header field {field} has unusable value {value:?}: {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// A hand-written resolver could not interpret the header content.
    #[error("unable to interpret {property}: {reason}")]
    Unparseable { property: String, reason: String },
}

impl TranslationError {
    pub fn field_not_found<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::FieldNotFound {
            candidates: candidates
                .into_iter()
                .map(|candidate| candidate.as_ref().to_string())
                .collect(),
        }
    }

    pub fn unparseable(property: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unparseable {
            property: property.into(),
            reason: reason.into(),
        }
    }

    pub fn is_field_not_found(&self) -> bool {
        matches!(self, Self::FieldNotFound { .. })
    }

    pub fn is_not_implemented(&self) -> bool {
        matches!(self, Self::NotImplemented { .. })
    }
}

pub type TranslationResult<T> = std::result::Result<T, TranslationError>;

/// Failures raised by the translator registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Unnamed classes are mixins and cannot be selected automatically.
    #[error("translation class without a name cannot be registered")]
    Unnamed,
}
