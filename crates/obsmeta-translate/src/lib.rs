#![deny(unsafe_code)]

//! Translation of instrument headers into standardized observation
//! properties.
//!
//! Translation classes are declared with a [`TranslatorBuilder`] (constant
//! map, trivial map, hand-written resolvers), compiled once at startup, and
//! registered in a [`TranslatorRegistry`]. A header is matched to a class
//! with [`TranslatorRegistry::determine_translator`], and properties are
//! resolved through a [`HeaderTranslator`] that records which header fields
//! were consumed.

pub mod compiler;
pub mod field;
pub mod registry;
pub mod translator;
pub mod validate;

pub use compiler::{Recognizer, Resolver, TranslatorBuilder, TranslatorClass};
pub use field::FieldSpec;
pub use registry::{Registration, TranslatorRegistry};
pub use translator::HeaderTranslator;
pub use validate::{is_valid_value, validate_header_value, validate_value};
