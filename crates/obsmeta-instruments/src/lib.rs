#![deny(unsafe_code)]

//! Instrument translation classes.
//!
//! Each instrument module exposes a builder layered on its base class;
//! [`register_all`] compiles and registers them in a fixed order.

use std::sync::OnceLock;

use obsmeta_translate::TranslatorRegistry;

pub mod decam;
pub mod fits;
pub mod helpers;
pub mod hsc;
pub mod megaprime;
pub mod subaru;
pub mod suprimecam;

/// Cached registry with every built-in translator.
static DEFAULT_REGISTRY: OnceLock<TranslatorRegistry> = OnceLock::new();

/// Returns the registry with all built-in instrument translators.
///
/// # Registered Translators
///
/// In selection order: SuprimeCam, HSC, DECam, MegaPrime.
pub fn default_registry() -> &'static TranslatorRegistry {
    DEFAULT_REGISTRY.get_or_init(|| {
        let mut registry = TranslatorRegistry::new();
        register_all(&mut registry);
        registry
    })
}

/// Compile the built-in translators and add them to `registry`.
pub fn register_all(registry: &mut TranslatorRegistry) {
    let fits = fits::translator();
    let subaru = subaru::translator(&fits);
    let suprimecam = suprimecam::builder(&subaru).build_into(registry);
    hsc::builder(&suprimecam).build_into(registry);
    decam::builder(&fits).build_into(registry);
    megaprime::builder(&fits).build_into(registry);
}
