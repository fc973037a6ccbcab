use obsmeta_model::{PropertyKey, TranslationError};
use thiserror::Error;

/// Failures raised while building an observation record.
#[derive(Debug, Error)]
pub enum ObservationError {
    /// No translator could be selected for the header.
    #[error("cannot select a translator: {0}")]
    Selection(#[from] TranslationError),

    /// The translator requested by name is not registered.
    #[error("no translator named {name:?} is registered")]
    UnknownTranslator { name: String },

    /// A property failed to translate in pedantic mode.
    #[error("failed to translate {property}")]
    Property {
        property: PropertyKey,
        #[source]
        source: TranslationError,
    },
}

impl ObservationError {
    /// Property that failed, for per-property errors.
    pub fn property(&self) -> Option<&PropertyKey> {
        match self {
            ObservationError::Property { property, .. } => Some(property),
            _ => None,
        }
    }
}
