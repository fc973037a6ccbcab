#![deny(unsafe_code)]

pub mod error;
pub mod header;
pub mod property;
pub mod value;

pub use error::{RegistryError, TranslationError, TranslationResult};
pub use header::{Header, HeaderValue, format_float};
pub use property::{Property, PropertyKey, ValueType};
pub use value::{AltAz, EarthLocation, ObsTime, PropertyValue, Quantity, SkyPosition, TimeScale, Unit};
