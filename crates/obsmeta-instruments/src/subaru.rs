//! Subaru telescope base.

use std::sync::Arc;

use obsmeta_model::EarthLocation;
use obsmeta_translate::{TranslatorBuilder, TranslatorClass};

/// Subaru on Mauna Kea. Headers carry no usable location keywords.
pub const SUBARU_LOCATION: EarthLocation = EarthLocation::Geodetic {
    longitude: -155.476667,
    latitude: 19.825556,
    height: 4139.0,
};

/// Compiled Subaru base class, layered on the FITS base.
pub fn translator(fits: &Arc<TranslatorClass>) -> Arc<TranslatorClass> {
    TranslatorBuilder::new()
        .extends(fits)
        .constant("location", SUBARU_LOCATION)
        .build()
}
