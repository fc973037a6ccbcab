//! Translator registry and header-driven selection.
//!
//! The registry maps instrument names to compiled [`TranslatorClass`]es and
//! answers "which class understands this header?".
//!
//! # Ordering
//!
//! Selection walks classes in registration order and returns the first
//! whose recognizer accepts the header; there is no best-match scoring.
//! Registering a second class under an existing name replaces the earlier
//! class in place, so it keeps the original position.
//!
//! # Example
//!
//! ```ignore
//! let mut registry = TranslatorRegistry::new();
//! TranslatorBuilder::named("DECam")
//!     .extends(&fits)
//!     .supported_instrument("DECam")
//!     .build_into(&mut registry);
//!
//! let class = registry.determine_translator(&header)?;
//! let exposure_time = class.translator(&header).resolve(Property::ExposureTime)?;
//! ```

use std::sync::Arc;

use obsmeta_model::{Header, RegistryError, TranslationError, TranslationResult};
use tracing::debug;

use crate::compiler::TranslatorClass;

/// Outcome of a registration.
#[derive(Debug, Clone)]
pub struct Registration {
    /// The class now registered under its name.
    pub class: Arc<TranslatorClass>,
    /// The class previously registered under the same name, if any.
    pub replaced: Option<Arc<TranslatorClass>>,
}

/// Registry of translation classes keyed by instrument name.
///
/// Meant to be filled during a single-threaded startup phase and read
/// afterwards; it can then be shared freely across threads.
#[derive(Debug, Default)]
pub struct TranslatorRegistry {
    classes: Vec<Arc<TranslatorClass>>,
}

impl TranslatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a named class.
    ///
    /// If a class with this name is already registered, it is replaced and
    /// returned in [`Registration::replaced`].
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Unnamed`] for classes without a name.
    pub fn register(
        &mut self,
        class: Arc<TranslatorClass>,
    ) -> Result<Registration, RegistryError> {
        let name = class.name().ok_or(RegistryError::Unnamed)?;
        let replaced = match self
            .classes
            .iter()
            .position(|existing| existing.name() == Some(name))
        {
            Some(index) => {
                debug!(translator = name, "replacing registered translator");
                Some(std::mem::replace(&mut self.classes[index], Arc::clone(&class)))
            }
            None => {
                debug!(translator = name, "registering translator");
                self.classes.push(Arc::clone(&class));
                None
            }
        };
        Ok(Registration { class, replaced })
    }

    pub fn get(&self, name: &str) -> Option<&Arc<TranslatorClass>> {
        self.classes
            .iter()
            .find(|class| class.name() == Some(name))
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.classes.iter().filter_map(|class| class.name())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<TranslatorClass>> + '_ {
        self.classes.iter()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Find the first registered class that can translate the header.
    ///
    /// # Errors
    ///
    /// Returns [`TranslationError::UnrecognizedHeader`] if no class matches,
    /// or the recognition error of a class that cannot resolve `instrument`.
    pub fn determine_translator(&self, header: &Header) -> TranslationResult<Arc<TranslatorClass>> {
        for class in &self.classes {
            if class.can_translate(header)? {
                debug!(translator = class.display_name(), "using translation class");
                return Ok(Arc::clone(class));
            }
        }
        Err(TranslationError::UnrecognizedHeader)
    }
}
